use super::*;
use crate::net::types::{Session, User};

fn ada(image: Option<&str>) -> (User, Session) {
    let user = User {
        id: "u-1".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        image: image.map(str::to_owned),
    };
    let session = Session { id: "s-1".into(), user_id: "u-1".into(), expires_at: time::OffsetDateTime::UNIX_EPOCH };
    (user, session)
}

#[test]
fn loading_renders_skeleton_without_headline() {
    let panel = AuthPanel::from_status(AuthStatus::Loading);
    assert_eq!(panel, AuthPanel::Skeleton);
    assert_eq!(panel.headline(), None);
}

#[test]
fn errored_renders_failure_with_details() {
    let panel = AuthPanel::from_status(AuthStatus::Errored("network down".into()));
    assert_eq!(panel, AuthPanel::Failed { details: "network down".into() });
    assert_eq!(panel.headline(), Some("Failed to load authentication status"));
}

#[test]
fn authenticated_renders_welcome_with_profile() {
    let (user, session) = ada(Some("https://img.example.com/ada.png"));
    let panel = AuthPanel::from_status(AuthStatus::Authenticated { user, session });
    assert_eq!(
        panel,
        AuthPanel::Welcome {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            image: Some("https://img.example.com/ada.png".into()),
        }
    );
    assert_eq!(panel.headline(), Some("Welcome back!"));
}

#[test]
fn authenticated_without_avatar_has_no_image() {
    let (user, session) = ada(None);
    let AuthPanel::Welcome { image, .. } = AuthPanel::from_status(AuthStatus::Authenticated { user, session }) else {
        panic!("expected welcome panel");
    };
    assert_eq!(image, None);
}

#[test]
fn unauthenticated_offers_both_providers() {
    let panel = AuthPanel::from_status(AuthStatus::Unauthenticated);
    assert_eq!(panel, AuthPanel::GetStarted { providers: vec![Provider::Google, Provider::GitHub] });
    assert_eq!(panel.headline(), Some("Get Started"));
}
