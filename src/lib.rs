use std::io;
use std::path::PathBuf;

use thiserror;

pub mod client_secrets;
pub mod config;
pub mod env_file;
pub mod flow;

pub use config::ClientOpt;

#[derive(thiserror::Error, Debug)]
pub enum GoogleAdsAuthError {
    #[error("Google rejected the credentials: {0}")]
    Authentication(String),

    #[error("Couldn't complete the token request: {0}")]
    TokenRequest(String),

    #[error("Google redirected back with an error: {0}")]
    AuthorizationDenied(String),

    #[error("The redirect's anti-forgery state didn't match the one we sent")]
    CsrfMismatch,

    #[error("The redirect carried no authorization code")]
    MissingCode,

    #[error("Google answered without a refresh token; approve the consent prompt again")]
    NoRefreshToken,

    #[error("The callback listener failed: {0}")]
    Listener(String),

    #[error("The callback listener stopped before a redirect arrived")]
    ListenerClosed,

    #[error("Couldn't read {}: {}", .path.display(), .source)]
    CredentialsFile { path: PathBuf, source: io::Error },

    #[error("{} isn't a usable client-secrets document: {}", .path.display(), .source)]
    CredentialsFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Not a valid URL: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("Local I/O failed: {0}")]
    Io(#[from] io::Error),
}
