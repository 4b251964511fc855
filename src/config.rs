use std::env;

use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, TokenUrl};
use structopt::StructOpt;

use crate::GoogleAdsAuthError;

pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const ADWORDS_SCOPE: &str = "https://www.googleapis.com/auth/adwords";

/// Everything a working Google Ads API setup needs in its environment.
pub const REQUIRED_VARS: [&str; 5] = [
    "GOOGLE_ADS_CLIENT_ID",
    "GOOGLE_ADS_CLIENT_SECRET",
    "GOOGLE_ADS_REFRESH_TOKEN",
    "GOOGLE_ADS_DEVELOPER_TOKEN",
    "GOOGLE_ADS_CUSTOMER_ID",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarStatus {
    /// Set to a real-looking value; `preview` is the first few characters,
    /// enough to spot a paste of the wrong credential.
    Present { preview: String },
    /// Still carrying one of the `INSERT_..._HERE` markers from the template.
    Placeholder,
    Missing,
}

#[derive(Debug, Clone)]
pub struct VarCheck {
    pub key: &'static str,
    pub status: VarStatus,
}

pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.starts_with("INSERT_")
}

/// Checklist over [`REQUIRED_VARS`] in the process environment.
pub fn check_environment() -> Vec<VarCheck> {
    check_with(|key| env::var(key).ok())
}

/// Same checklist, but against an arbitrary lookup.
pub fn check_with(lookup: impl Fn(&str) -> Option<String>) -> Vec<VarCheck> {
    REQUIRED_VARS
        .iter()
        .map(|&key| {
            let status = match lookup(key) {
                None => VarStatus::Missing,
                Some(value) if is_placeholder(&value) => VarStatus::Placeholder,
                Some(value) => VarStatus::Present {
                    preview: value.chars().take(4).collect(),
                },
            };
            VarCheck { key, status }
        })
        .collect()
}

pub fn all_present(checks: &[VarCheck]) -> bool {
    checks
        .iter()
        .all(|check| matches!(check.status, VarStatus::Present { .. }))
}

/// A [`BasicClient`] against Google's fixed OAuth endpoints.
pub fn oauth_client(
    client_id: &str,
    client_secret: &str,
) -> Result<BasicClient, GoogleAdsAuthError> {
    Ok(BasicClient::new(
        ClientId::new(client_id.to_string()),
        Some(ClientSecret::new(client_secret.to_string())),
        AuthUrl::new(AUTH_URL.to_string())?,
        Some(TokenUrl::new(TOKEN_URL.to_string())?),
    ))
}

/// OAuth application identity, from flags or the usual environment variables.
#[derive(Debug, StructOpt)]
pub struct ClientOpt {
    /// OAuth client ID of the app registered in the Google Cloud console.
    #[structopt(long, env = "GOOGLE_ADS_CLIENT_ID", hide_env_values = true)]
    pub client_id: String,

    /// OAuth client secret paired with the client ID.
    #[structopt(long, env = "GOOGLE_ADS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
}

impl ClientOpt {
    pub fn to_oauth_client(&self) -> Result<BasicClient, GoogleAdsAuthError> {
        oauth_client(&self.client_id, &self.client_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env_of(&[
            ("GOOGLE_ADS_CLIENT_ID", "12345-abc.apps.googleusercontent.com"),
            ("GOOGLE_ADS_CLIENT_SECRET", "GOCSPX-secret"),
            ("GOOGLE_ADS_REFRESH_TOKEN", "1//0refresh"),
            ("GOOGLE_ADS_DEVELOPER_TOKEN", "devtoken"),
            ("GOOGLE_ADS_CUSTOMER_ID", "1234567890"),
        ])
    }

    #[test]
    fn complete_environment_passes() {
        let env = full_env();
        let checks = check_with(|key| env.get(key).cloned());
        assert!(all_present(&checks));
    }

    #[test]
    fn missing_variable_is_reported_and_fails_overall() {
        let mut env = full_env();
        env.remove("GOOGLE_ADS_REFRESH_TOKEN");
        let checks = check_with(|key| env.get(key).cloned());
        assert!(!all_present(&checks));
        let refresh = checks
            .iter()
            .find(|check| check.key == "GOOGLE_ADS_REFRESH_TOKEN")
            .unwrap();
        assert_eq!(refresh.status, VarStatus::Missing);
    }

    #[test]
    fn template_placeholder_is_not_a_value() {
        let mut env = full_env();
        env.insert(
            "GOOGLE_ADS_DEVELOPER_TOKEN".to_string(),
            "INSERT_DEVELOPER_TOKEN_HERE".to_string(),
        );
        let checks = check_with(|key| env.get(key).cloned());
        assert!(!all_present(&checks));
        let dev = checks
            .iter()
            .find(|check| check.key == "GOOGLE_ADS_DEVELOPER_TOKEN")
            .unwrap();
        assert_eq!(dev.status, VarStatus::Placeholder);
    }

    #[test]
    fn present_values_get_a_short_preview() {
        let env = full_env();
        let checks = check_with(|key| env.get(key).cloned());
        match &checks[0].status {
            VarStatus::Present { preview } => assert_eq!(preview, "1234"),
            other => panic!("expected Present, got {:?}", other),
        }
    }

    #[test]
    fn blank_counts_as_placeholder() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
        assert!(is_placeholder("INSERT_CLIENT_ID_HERE"));
        assert!(!is_placeholder("GOCSPX-real-secret"));
    }
}
