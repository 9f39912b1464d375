//! Authentication status panel.
//!
//! The panel content is decided by [`AuthPanel::from_status`], a pure mapping
//! that is tested natively; the component only renders it.

#[cfg(test)]
#[path = "auth_status_test.rs"]
mod auth_status_test;

use leptos::prelude::*;

use crate::net::api::now_millis;
use crate::net::types::Provider;
use crate::state::auth::{AuthState, AuthStatus};

pub const FAILED_HEADLINE: &str = "Failed to load authentication status";
pub const WELCOME_HEADLINE: &str = "Welcome back!";
pub const GET_STARTED_HEADLINE: &str = "Get Started";

/// What the status card shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthPanel {
    Skeleton,
    Failed { details: String },
    Welcome { name: String, email: String, image: Option<String> },
    GetStarted { providers: Vec<Provider> },
}

impl AuthPanel {
    pub fn from_status(status: AuthStatus) -> Self {
        match status {
            AuthStatus::Loading => Self::Skeleton,
            AuthStatus::Errored(details) => Self::Failed { details },
            AuthStatus::Authenticated { user, .. } => {
                Self::Welcome { name: user.name, email: user.email, image: user.image }
            }
            AuthStatus::Unauthenticated => Self::GetStarted { providers: Provider::ALL.to_vec() },
        }
    }

    /// Card title; the skeleton has none.
    pub fn headline(&self) -> Option<&'static str> {
        match self {
            Self::Skeleton => None,
            Self::Failed { .. } => Some(FAILED_HEADLINE),
            Self::Welcome { .. } => Some(WELCOME_HEADLINE),
            Self::GetStarted { .. } => Some(GET_STARTED_HEADLINE),
        }
    }
}

/// Status card: skeleton, error, welcome with sign-out, or sign-in buttons.
#[component]
pub fn AuthStatusPanel() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    #[cfg(feature = "csr")]
    let sync = crate::state::sync::SessionSync::new(crate::net::api::BrowserTransport, auth);
    #[cfg(feature = "csr")]
    crate::util::auth::install_revalidation_triggers(sync);

    let panel = Memo::new(move |_| AuthPanel::from_status(auth.get().status(now_millis())));

    move || match panel.get() {
        AuthPanel::Skeleton => view! {
            <div class="auth-card auth-card--loading">
                <div class="auth-skeleton auth-skeleton--wide"></div>
                <div class="auth-skeleton"></div>
            </div>
        }
        .into_any(),
        AuthPanel::Failed { details } => view! {
            <div class="auth-card">
                <p class="auth-card__error">{FAILED_HEADLINE}</p>
                <p class="auth-card__details">{details}</p>
            </div>
        }
        .into_any(),
        AuthPanel::Welcome { name, email, image } => {
            let avatar = image.map(|src| {
                let alt = name.clone();
                view! { <img class="auth-card__avatar" src=src alt=alt width="64" height="64"/> }
            });
            let on_sign_out = move |_| {
                #[cfg(feature = "csr")]
                leptos::task::spawn_local(async move {
                    sync.sign_out().await;
                });
            };
            view! {
                <div class="auth-card">
                    <h2 class="auth-card__title auth-card__title--welcome">{WELCOME_HEADLINE}</h2>
                    {avatar}
                    <p class="auth-card__name">{name}</p>
                    <p class="auth-card__email">{email}</p>
                    <button class="auth-button auth-button--danger" on:click=on_sign_out>
                        "Sign Out"
                    </button>
                </div>
            }
            .into_any()
        }
        AuthPanel::GetStarted { providers } => view! {
            <div class="auth-card">
                <h2 class="auth-card__title">{GET_STARTED_HEADLINE}</h2>
                <p class="auth-card__hint">"Sign in to access your account."</p>
                {providers
                    .into_iter()
                    .map(|provider| {
                        view! {
                            <button
                                class="auth-button"
                                on:click=move |_| {
                                    #[cfg(feature = "csr")]
                                    sync.login(provider);
                                }
                            >
                                {format!("Continue with {}", provider.label())}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        }
        .into_any(),
    }
}
