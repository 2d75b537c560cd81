use chrono::Utc;
use reqwest::{StatusCode, Url};

use crate::{config::Config, error::CatalogError, spotify::SpotifyClient, types::Token};

/// Builds the Spotify authorization URL for the authorization-code flow.
///
/// The URL carries the client ID, redirect URI and scope from the
/// configuration, the anti-forgery `state` and a PKCE S256 `code_challenge`.
/// All parameters are URL-encoded.
///
/// # Example
///
/// ```
/// let verifier = utils::generate_code_verifier();
/// let challenge = utils::generate_code_challenge(&verifier);
/// let url = authorize_url(&config, &utils::generate_state(), &challenge)?;
/// ```
pub fn authorize_url(config: &Config, state: &str, code_challenge: &str) -> Result<String, String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
        ],
    )
    .map_err(|e| format!("invalid authorization url '{}': {}", config.auth_url, e))?;

    Ok(url.to_string())
}

impl SpotifyClient {
    /// Exchanges an authorization code for an access token.
    ///
    /// Sends the PKCE `code_verifier` and, when one is configured, the client
    /// secret. The returned token is stamped with the time it was obtained so
    /// its expiry can be checked later.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Unauthorized`] if the code or verifier was rejected
    /// - [`CatalogError::Status`] for any other non-2xx answer
    /// - [`CatalogError::Http`] for network or decoding failures
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<Token, CatalogError> {
        let config = self.config();

        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("client_id", config.client_id.as_str()),
            ("code_verifier", verifier),
        ];
        if let Some(secret) = &config.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let res = self
            .http()
            .post(&config.token_url)
            .form(&form)
            .send()
            .await?;

        match res.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(CatalogError::Unauthorized);
            }
            status if !status.is_success() => return Err(CatalogError::Status(status)),
            _ => {}
        }

        let mut token = res.json::<Token>().await?;
        token.obtained_at = Utc::now().timestamp() as u64;
        Ok(token)
    }
}
