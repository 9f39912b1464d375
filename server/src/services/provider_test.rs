use super::*;

// =============================================================================
// Provider parsing
// =============================================================================

#[test]
fn parses_known_providers() {
    assert_eq!("google".parse::<Provider>(), Ok(Provider::Google));
    assert_eq!("github".parse::<Provider>(), Ok(Provider::GitHub));
}

#[test]
fn rejects_unknown_and_miscased_providers() {
    assert_eq!("gitlab".parse::<Provider>(), Err(UnknownProvider("gitlab".into())));
    assert!("GitHub".parse::<Provider>().is_err());
}

#[test]
fn display_matches_path_segment() {
    for provider in Provider::ALL {
        assert_eq!(provider.to_string(), provider.as_str());
    }
}

#[test]
fn display_names_are_capitalized() {
    assert_eq!(Provider::Google.display_name(), "Google");
    assert_eq!(Provider::GitHub.display_name(), "GitHub");
}

#[test]
fn github_endpoints_include_email_fallback() {
    let endpoints = ProviderEndpoints::for_provider(Provider::GitHub);
    assert!(endpoints.authorize_url.starts_with("https://github.com/login/oauth/authorize"));
    assert!(endpoints.emails_url.is_some());
    assert!(ProviderEndpoints::for_provider(Provider::Google).emails_url.is_none());
}

// =============================================================================
// Profile normalization
// =============================================================================

#[test]
fn google_profile_uses_sub_as_account_id() {
    let info: GoogleUserInfo = serde_json::from_str(
        r#"{"sub":"1089","name":"Ada","email":"ada@example.com","picture":"https://img.example.com/a.png"}"#,
    )
    .unwrap();
    let profile = info.into_profile().unwrap();
    assert_eq!(profile.provider, Provider::Google);
    assert_eq!(profile.account_id, "1089");
    assert_eq!(profile.name, "Ada");
    assert_eq!(profile.image.as_deref(), Some("https://img.example.com/a.png"));
}

#[test]
fn google_profile_without_email_is_rejected() {
    let info: GoogleUserInfo = serde_json::from_str(r#"{"sub":"1"}"#).unwrap();
    assert!(info.into_profile().is_none());
}

#[test]
fn google_profile_name_falls_back_to_email() {
    let info: GoogleUserInfo = serde_json::from_str(r#"{"sub":"1","email":"x@example.com"}"#).unwrap();
    assert_eq!(info.into_profile().unwrap().name, "x@example.com");
}

#[test]
fn github_profile_prefers_display_name_over_login() {
    let user: GitHubUser = serde_json::from_str(
        r#"{"id": 12345, "login": "octocat", "name": "The Octocat", "email": "octo@example.com", "avatar_url": null}"#,
    )
    .unwrap();
    let profile = user.into_profile(&[]).unwrap();
    assert_eq!(profile.account_id, "12345");
    assert_eq!(profile.name, "The Octocat");
    assert_eq!(profile.email, "octo@example.com");
    assert!(profile.image.is_none());
}

#[test]
fn github_profile_uses_login_when_name_missing() {
    let user: GitHubUser =
        serde_json::from_str(r#"{"id": 1, "login": "octocat", "name": "", "email": "o@example.com"}"#).unwrap();
    assert_eq!(user.into_profile(&[]).unwrap().name, "octocat");
}

#[test]
fn github_profile_falls_back_to_primary_email() {
    let user: GitHubUser = serde_json::from_str(r#"{"id": 1, "login": "octocat"}"#).unwrap();
    let emails: Vec<GitHubEmail> = serde_json::from_str(
        r#"[{"email":"old@example.com","primary":false,"verified":true},
            {"email":"main@example.com","primary":true,"verified":true}]"#,
    )
    .unwrap();
    assert_eq!(user.into_profile(&emails).unwrap().email, "main@example.com");
}

#[test]
fn primary_email_skips_unverified_primary() {
    let emails = vec![
        GitHubEmail { email: "p@example.com".into(), primary: true, verified: false },
        GitHubEmail { email: "v@example.com".into(), primary: false, verified: true },
    ];
    assert_eq!(primary_email(&emails).as_deref(), Some("v@example.com"));
}

#[test]
fn github_profile_without_any_email_is_rejected() {
    let user: GitHubUser = serde_json::from_str(r#"{"id": 1, "login": "octocat"}"#).unwrap();
    assert!(user.into_profile(&[]).is_none());
}
