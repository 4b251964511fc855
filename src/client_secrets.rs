use std::fs;
use std::path::Path;

use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use serde::Deserialize;

use crate::config::{AUTH_URL, TOKEN_URL};
use crate::GoogleAdsAuthError;

/// The document the Google Cloud console hands out when an OAuth client is
/// created. Desktop clients nest the identity under `"installed"`, web
/// clients under `"web"`; both carry the same fields.
#[derive(Debug, Deserialize)]
pub struct ClientSecrets {
    #[serde(alias = "web")]
    installed: AppIdentity,
}

#[derive(Debug, Deserialize)]
struct AppIdentity {
    client_id: String,
    client_secret: String,
    #[serde(default = "default_auth_uri")]
    auth_uri: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_auth_uri() -> String {
    AUTH_URL.to_string()
}

fn default_token_uri() -> String {
    TOKEN_URL.to_string()
}

impl ClientSecrets {
    pub fn load(path: &Path) -> Result<Self, GoogleAdsAuthError> {
        let raw = fs::read_to_string(path).map_err(|source| GoogleAdsAuthError::CredentialsFile {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| GoogleAdsAuthError::CredentialsFormat {
            path: path.to_owned(),
            source,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.installed.client_id
    }

    pub fn to_oauth_client(&self, redirect_uri: &str) -> Result<BasicClient, GoogleAdsAuthError> {
        Ok(BasicClient::new(
            ClientId::new(self.installed.client_id.clone()),
            Some(ClientSecret::new(self.installed.client_secret.clone())),
            AuthUrl::new(self.installed.auth_uri.clone())?,
            Some(TokenUrl::new(self.installed.token_uri.clone())?),
        )
        .set_redirect_uri(RedirectUrl::new(redirect_uri.to_string())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_desktop_client_document() {
        let secrets: ClientSecrets = serde_json::from_str(
            r#"{
                "installed": {
                    "client_id": "12345-abc.apps.googleusercontent.com",
                    "client_secret": "GOCSPX-secret",
                    "auth_uri": "https://accounts.google.com/o/oauth2/v2/auth",
                    "token_uri": "https://oauth2.googleapis.com/token",
                    "redirect_uris": ["http://localhost"]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(secrets.client_id(), "12345-abc.apps.googleusercontent.com");
    }

    #[test]
    fn reads_a_web_client_document() {
        let secrets: ClientSecrets = serde_json::from_str(
            r#"{
                "web": {
                    "client_id": "web-id",
                    "client_secret": "web-secret"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(secrets.client_id(), "web-id");
    }

    #[test]
    fn endpoints_default_to_googles_when_absent() {
        let secrets: ClientSecrets = serde_json::from_str(
            r#"{"installed": {"client_id": "id", "client_secret": "secret"}}"#,
        )
        .unwrap();
        assert_eq!(secrets.installed.auth_uri, AUTH_URL);
        assert_eq!(secrets.installed.token_uri, TOKEN_URL);
    }

    #[test]
    fn a_document_without_an_identity_is_rejected() {
        let err = serde_json::from_str::<ClientSecrets>(r#"{"other": {}}"#);
        assert!(err.is_err());
    }
}
