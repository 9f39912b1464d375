//! Root component and context wiring.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::pages::home::HomePage;
use crate::state::auth::AuthState;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(RwSignal::new(AuthState::default()));

    view! {
        <Title text="Sign In"/>
        <HomePage/>
    }
}
