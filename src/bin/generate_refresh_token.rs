use std::path::PathBuf;

use dotenv::dotenv;
use google_ads_auth::client_secrets::ClientSecrets;
use google_ads_auth::{env_file, flow, GoogleAdsAuthError};
use oauth2::TokenResponse;
use structopt::StructOpt;

/// Walk through Google's consent screen with offline access and store the
/// resulting refresh token in the env file.
#[derive(Debug, StructOpt)]
struct Opt {
    /// Client-secrets document downloaded from the Google Cloud console.
    #[structopt(long, default_value = "google_ads_credentials.json", parse(from_os_str))]
    credentials_file: PathBuf,

    /// Env file that receives GOOGLE_ADS_REFRESH_TOKEN.
    #[structopt(long, default_value = ".env", parse(from_os_str))]
    env_file: PathBuf,

    /// Local port the consent redirect comes back to.
    #[structopt(long, default_value = "8080")]
    port: u16,
}

#[rocket::main]
async fn main() {
    dotenv().ok();
    let opt = Opt::from_args();
    if let Err(err) = run(opt).await {
        report(&err);
    }
}

async fn run(opt: Opt) -> Result<(), GoogleAdsAuthError> {
    let secrets = ClientSecrets::load(&opt.credentials_file)?;
    let redirect_uri = format!("http://127.0.0.1:{}", opt.port);
    let client = secrets.to_oauth_client(&redirect_uri)?;

    let (auth_url, csrf_state) = flow::authorize_url_offline(&client);

    println!("Opening your browser on Google's consent screen.");
    println!("If nothing opens, paste this into a browser yourself:");
    println!();
    println!("  {}", auth_url);
    println!();
    println!(
        "The OAuth client must have {} registered as a redirect URI.",
        redirect_uri,
    );

    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Couldn't launch a browser here; use the URL above.");
    }

    println!();
    println!("Waiting for the consent redirect on port {}...", opt.port);
    let params = flow::wait_for_callback(opt.port).await?;
    let code = flow::extract_code(params, &csrf_state)?;

    println!("Authorization code received. Exchanging it for tokens...");
    let token = flow::exchange_code(&client, code).await?;
    let refresh_token = token
        .refresh_token()
        .ok_or(GoogleAdsAuthError::NoRefreshToken)?;

    env_file::set_key(
        &opt.env_file,
        "GOOGLE_ADS_REFRESH_TOKEN",
        refresh_token.secret(),
    )?;

    println!();
    println!("Refresh token written to {}:", opt.env_file.display());
    println!();
    println!("  GOOGLE_ADS_REFRESH_TOKEN={}", refresh_token.secret());
    println!();
    println!("Run verify-credentials to confirm the whole credential set works.");
    Ok(())
}

fn report(err: &GoogleAdsAuthError) {
    println!();
    println!("{}", err);
    match err {
        GoogleAdsAuthError::Authentication(_) => {
            println!("Check that the client ID and secret in the credentials file match the");
            println!("OAuth client in the Google Cloud console, then run this again.");
        }
        GoogleAdsAuthError::AuthorizationDenied(_) => {
            println!("Consent wasn't granted. Run this again and approve access.");
        }
        GoogleAdsAuthError::Listener(_) | GoogleAdsAuthError::ListenerClosed => {
            println!("Make sure nothing else is listening on the callback port and that the");
            println!("port matches the redirect URI registered on the OAuth client.");
        }
        _ => {}
    }
}
