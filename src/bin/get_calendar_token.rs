use startmeeting::components::google_calendar::{OAuthClient, TokenManager};
use startmeeting::error::{credential_error, other_error, BotResult, Error};
use startmeeting::startup;
use tiny_http::{Response, Server, StatusCode};
use tracing::debug;
use url::Url;

/// Local address the OAuth redirect lands on
const LISTEN_ADDR: &str = "127.0.0.1:8080";
const REDIRECT_URI: &str = "http://127.0.0.1:8080";

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    // Load configuration
    let config = startup::load_config()?;

    let oauth = OAuthClient::load(&config.client_secret_path())?.with_redirect_uri(REDIRECT_URI);
    let token_manager = TokenManager::new(oauth, config.token_cache_path()?);

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();
    let auth_url = token_manager.authorization_url(&state)?;

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if let Err(e) = webbrowser::open(&auth_url) {
        println!("Could not open a browser ({}). Visit this URL instead:\n{}", e, auth_url);
    }

    // Start local server to receive the callback
    let server = Server::http(LISTEN_ADDR)
        .map_err(|e| other_error(&format!("Failed to listen on {}: {}", LISTEN_ADDR, e)))?;
    println!("Waiting for authorization callback...");

    let code = loop {
        let request = server.recv().map_err(Error::from)?;

        // Browsers also ask for things like /favicon.ico
        if !request.url().contains('?') {
            debug!("Ignoring request for {}", request.url());
            request
                .respond(Response::from_string("").with_status_code(StatusCode(404)))
                .map_err(Error::from)?;
            continue;
        }

        match parse_callback(request.url(), &state) {
            Ok(code) => {
                request
                    .respond(Response::from_string(
                        "Authorization successful! You can close this window.",
                    ))
                    .map_err(Error::from)?;
                break code;
            }
            Err(e) => {
                let _ = request.respond(Response::from_string(format!("Authorization failed: {}", e)));
                return Err(e.into());
            }
        }
    };

    // Exchange code for tokens and cache them where startmeeting looks
    let token = token_manager.exchange_code(&code).await?;
    token_manager.set_token(&token)?;

    println!("Token saved to {}", token_manager.cache_path().display());
    Ok(())
}

/// Pull the authorization code out of the callback request path
fn parse_callback(path: &str, expected_state: &str) -> BotResult<String> {
    let url = Url::parse("http://localhost")
        .and_then(|base| base.join(path))
        .map_err(|e| other_error(&format!("Invalid callback URL {}: {}", path, e)))?;

    let mut code = None;
    let mut state = None;
    let mut denied = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => denied = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(reason) = denied {
        return Err(credential_error(&format!("Authorization denied: {}", reason)));
    }
    if state.as_deref() != Some(expected_state) {
        return Err(credential_error("State mismatch in authorization callback"));
    }

    code.ok_or_else(|| other_error("No authorization code found in callback"))
}
