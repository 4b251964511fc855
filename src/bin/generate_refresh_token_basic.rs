use std::io::{self, Write};

use dotenv::dotenv;
use google_ads_auth::{flow, ClientOpt, GoogleAdsAuthError};
use oauth2::{RedirectUrl, TokenResponse};
use structopt::StructOpt;

/// Run the consent flow by hand: open the consent URL, then paste the code
/// from the redirect back here. Nothing is written to disk.
#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(flatten)]
    client: ClientOpt,

    /// Port the registered redirect URI points at. No listener runs there;
    /// the code is copied out of the browser's address bar.
    #[structopt(long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let opt = Opt::from_args();
    if let Err(err) = run(opt).await {
        report(&err);
    }
}

async fn run(opt: Opt) -> Result<(), GoogleAdsAuthError> {
    let redirect_uri = format!("http://127.0.0.1:{}", opt.port);
    let auth_url = flow::authorize_url_basic(&opt.client.client_id, &redirect_uri)?;

    println!("Opening your browser on Google's consent screen.");
    println!("If nothing opens, paste this into a browser yourself:");
    println!();
    println!("  {}", auth_url);
    println!();

    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Couldn't launch a browser here; use the URL above.");
    }

    println!(
        "After approving, the browser lands on {}/?code=... and will show a",
        redirect_uri,
    );
    println!("connection error, which is fine. Copy the code parameter out of the");
    println!("address bar and paste it below.");
    println!();
    print!("Authorization code: ");
    io::stdout().flush()?;

    let mut raw = String::new();
    io::stdin().read_line(&mut raw)?;
    let code = flow::decode_pasted_code(&raw);
    if code.is_empty() {
        return Err(GoogleAdsAuthError::MissingCode);
    }

    println!("Exchanging the code for tokens...");
    let client = opt
        .client
        .to_oauth_client()?
        .set_redirect_uri(RedirectUrl::new(redirect_uri)?);
    let token = flow::exchange_code(&client, code).await?;

    println!();
    println!(
        "Access token: {}",
        flow::truncate_token(token.access_token().secret()),
    );
    match token.refresh_token() {
        Some(refresh_token) => println!("Refresh token: {}", refresh_token.secret()),
        None => {
            println!("Refresh token: none issued. This flow doesn't ask for offline");
            println!("access; use generate-refresh-token if you need one.");
        }
    }
    println!();
    println!("Nothing was written to disk.");
    Ok(())
}

fn report(err: &GoogleAdsAuthError) {
    println!();
    println!("{}", err);
    match err {
        GoogleAdsAuthError::Authentication(_) => {
            println!("The code may have expired (they are single-use and short-lived), or the");
            println!("client ID and secret don't match the OAuth client that issued it.");
            println!("Run this again and paste a fresh code.");
        }
        GoogleAdsAuthError::MissingCode => {
            println!("Nothing usable was pasted. Run this again and paste the value of the");
            println!("code query parameter from the redirect URL.");
        }
        _ => {}
    }
}
