use std::env;

use chrono::{Duration, Utc};
use dotenv::dotenv;
use google_ads_auth::config::{self, VarStatus};
use google_ads_auth::{flow, GoogleAdsAuthError};
use oauth2::TokenResponse;

#[tokio::main]
async fn main() {
    dotenv().ok();

    println!("Google Ads API credential check");
    println!("-------------------------------");

    let checks = config::check_environment();
    for check in &checks {
        match &check.status {
            VarStatus::Present { preview } => {
                println!("  [ ok ] {} ({}...)", check.key, preview)
            }
            VarStatus::Placeholder => {
                println!("  [FAIL] {} still holds the template placeholder", check.key)
            }
            VarStatus::Missing => println!("  [FAIL] {} is not set", check.key),
        }
    }

    if !config::all_present(&checks) {
        println!();
        println!("Fill in the values above (in .env or the environment) and run this again.");
        println!("A refresh token can be minted with generate-refresh-token.");
        return;
    }

    println!();
    println!("All variables set. Asking Google for a fresh access token...");

    match probe().await {
        Ok(()) => {}
        Err(err @ GoogleAdsAuthError::Authentication(_)) => {
            println!("  [FAIL] {}", err);
            println!();
            println!("Google would not accept this refresh token. Things to try:");
            println!("  - mint a new token with generate-refresh-token");
            println!("  - confirm GOOGLE_ADS_CLIENT_ID and GOOGLE_ADS_CLIENT_SECRET belong to");
            println!("    the OAuth client that issued the token");
            println!("  - confirm your account is still listed on the OAuth consent screen");
        }
        Err(err) => {
            println!("  [FAIL] unexpected error: {}", err);
        }
    }
}

async fn probe() -> Result<(), GoogleAdsAuthError> {
    // The checklist above already established these are set.
    let client_id = env::var("GOOGLE_ADS_CLIENT_ID").unwrap_or_default();
    let client_secret = env::var("GOOGLE_ADS_CLIENT_SECRET").unwrap_or_default();
    let refresh_token = env::var("GOOGLE_ADS_REFRESH_TOKEN").unwrap_or_default();

    let client = config::oauth_client(&client_id, &client_secret)?;
    let token = flow::refresh_access_token(&client, &refresh_token).await?;

    println!(
        "  [ ok ] access token {}",
        flow::truncate_token(token.access_token().secret()),
    );
    if let Some(ttl) = token.expires_in().and_then(|ttl| Duration::from_std(ttl).ok()) {
        println!("  [ ok ] expires around {}", (Utc::now() + ttl).to_rfc3339());
    }
    println!();
    println!("Credentials look good.");
    Ok(())
}
