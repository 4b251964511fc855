use std::sync::Mutex;

use oauth2::basic::{BasicClient, BasicErrorResponse, BasicTokenResponse};
use oauth2::reqwest::async_http_client;
use oauth2::{AuthorizationCode, CsrfToken, RefreshToken, RequestTokenError, Scope};
use rocket::{get, routes, Shutdown, State};
use tokio::sync::oneshot;
use url::Url;

use crate::config::{ADWORDS_SCOPE, AUTH_URL};
use crate::GoogleAdsAuthError;

type RequestError = RequestTokenError<oauth2::reqwest::Error<reqwest::Error>, BasicErrorResponse>;

/// Query parameters Google sends back to the redirect URI.
#[derive(Debug)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Consent URL that asks for a refresh token: offline access, and a forced
/// consent prompt so Google reissues one even for an already-approved app.
pub fn authorize_url_offline(client: &BasicClient) -> (Url, CsrfToken) {
    client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new(ADWORDS_SCOPE.to_string()))
        .add_extra_param("access_type", "offline")
        .add_extra_param("prompt", "consent")
        .url()
}

/// Consent URL built by hand, without the offline-access parameters. The
/// operator copies the resulting code back themselves.
pub fn authorize_url_basic(client_id: &str, redirect_uri: &str) -> Result<Url, GoogleAdsAuthError> {
    let mut url = Url::parse(AUTH_URL)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", ADWORDS_SCOPE);
    Ok(url)
}

struct CallbackSender(Mutex<Option<oneshot::Sender<CallbackParams>>>);

#[get("/?<code>&<state>&<error>")]
fn callback(
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    sender: &State<CallbackSender>,
    shutdown: Shutdown,
) -> &'static str {
    if let Some(tx) = sender.0.lock().unwrap().take() {
        let _ = tx.send(CallbackParams { code, state, error });
    }
    shutdown.notify();
    "Authorization received. You can close this tab and return to the terminal."
}

/// Serve a single consent redirect on 127.0.0.1:`port`, then shut down.
///
/// Blocks until the browser comes back; there is no timeout.
pub async fn wait_for_callback(port: u16) -> Result<CallbackParams, GoogleAdsAuthError> {
    let (tx, rx) = oneshot::channel();
    let figment = rocket::Config::figment()
        .merge(("address", "127.0.0.1"))
        .merge(("port", port))
        .merge(("log_level", "off"));
    let server = rocket::custom(figment)
        .mount("/", routes![callback])
        .manage(CallbackSender(Mutex::new(Some(tx))));

    let running = tokio::spawn(server.launch());
    match rx.await {
        Ok(params) => {
            let _ = running.await;
            Ok(params)
        }
        // The sender was dropped without firing, so the server died first,
        // typically because the port is already taken.
        Err(_) => match running.await {
            Ok(Err(err)) => Err(GoogleAdsAuthError::Listener(err.to_string())),
            _ => Err(GoogleAdsAuthError::ListenerClosed),
        },
    }
}

/// Pull the authorization code out of a redirect, refusing consent errors
/// and forged or replayed states.
pub fn extract_code(
    params: CallbackParams,
    expected_state: &CsrfToken,
) -> Result<String, GoogleAdsAuthError> {
    if let Some(error) = params.error {
        return Err(GoogleAdsAuthError::AuthorizationDenied(error));
    }
    match params.state {
        Some(ref state) if state == expected_state.secret() => {}
        _ => return Err(GoogleAdsAuthError::CsrfMismatch),
    }
    params.code.ok_or(GoogleAdsAuthError::MissingCode)
}

/// A pasted authorization code arrives percent-encoded when copied straight
/// out of the redirect's query string.
pub fn decode_pasted_code(raw: &str) -> String {
    let trimmed = raw.trim();
    urlencoding::decode(trimmed)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| trimmed.to_string())
}

pub async fn exchange_code(
    client: &BasicClient,
    code: String,
) -> Result<BasicTokenResponse, GoogleAdsAuthError> {
    client
        .exchange_code(AuthorizationCode::new(code))
        .request_async(async_http_client)
        .await
        .map_err(classify)
}

pub async fn refresh_access_token(
    client: &BasicClient,
    refresh_token: &str,
) -> Result<BasicTokenResponse, GoogleAdsAuthError> {
    client
        .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
        .request_async(async_http_client)
        .await
        .map_err(classify)
}

/// First few characters of a token, for console output that shouldn't leak
/// the whole thing.
pub fn truncate_token(token: &str) -> String {
    let head: String = token.chars().take(12).collect();
    if head.len() < token.len() {
        format!("{}...", head)
    } else {
        head
    }
}

/// An answer from the authorization server itself means the credentials were
/// refused; anything else (transport, malformed body) is just a failed
/// request.
fn classify(err: RequestError) -> GoogleAdsAuthError {
    match err {
        RequestTokenError::ServerResponse(response) => {
            let mut message = response.error().to_string();
            if let Some(description) = response.error_description() {
                message = format!("{} ({})", message, description);
            }
            GoogleAdsAuthError::Authentication(message)
        }
        other => GoogleAdsAuthError::TokenRequest(other.to_string()),
    }
}
