//! Landing page: intro copy around the auth status card.

use leptos::prelude::*;

use crate::components::auth_status::AuthStatusPanel;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <main class="home">
            <h1 class="home__title">"Welcome"</h1>
            <p class="home__subtitle">"Sign in with Google or GitHub to continue."</p>
            <section class="home__status">
                <AuthStatusPanel/>
            </section>
            <section class="home__about">
                <h3>"How it works"</h3>
                <ul>
                    <li>"Sign in through your Google or GitHub account."</li>
                    <li>"Your session is kept in a secure, HTTP-only cookie."</li>
                    <li>"Every tab re-checks your session when it regains focus."</li>
                </ul>
            </section>
        </main>
    }
}
