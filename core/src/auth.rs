//! Authentication strategies.
//!
//! # Design
//! A client carries exactly one `AuthStrategy`, chosen when it is built.
//! `Basic` sends an `Authorization: Basic` header; `OAuth` signs every
//! request with OAuth 1.0a HMAC-SHA1 and sends the signed parameters in an
//! `Authorization: OAuth` header. The strategies are alternatives, never
//! layered.
//!
//! The OAuth user token is obtained once through the `authexchange`
//! endpoint. A second exchange while a token is held is a caller bug and is
//! rejected with `Error::CredentialState`.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, Params};

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// The authentication policy of a client.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    Basic(BasicAuth),
    OAuth(OAuth),
}

impl AuthStrategy {
    pub fn basic(username: &str, password: &str) -> Self {
        AuthStrategy::Basic(BasicAuth::new(username, password))
    }

    pub fn oauth(consumer_key: &str, consumer_secret: &str) -> Self {
        AuthStrategy::OAuth(OAuth::new(consumer_key, consumer_secret))
    }

    /// Whether requests will carry user-level credentials.
    pub fn has_credentials(&self) -> bool {
        match self {
            AuthStrategy::Basic(basic) => basic.has_credentials(),
            AuthStrategy::OAuth(oauth) => oauth.has_token(),
        }
    }

    /// Fails unless a one-time OAuth token exchange is currently allowed.
    pub fn ensure_exchange_allowed(&self) -> Result<()> {
        match self {
            AuthStrategy::Basic(_) => Err(Error::CredentialState(
                "token exchange requires the OAuth strategy".to_string(),
            )),
            AuthStrategy::OAuth(oauth) => oauth.ensure_exchange_allowed(),
        }
    }

    /// The `Authorization` header value for a request, if any.
    pub(crate) fn authorization(&self, method: HttpMethod, url: &str, params: &Params) -> Result<Option<String>> {
        match self {
            AuthStrategy::Basic(basic) => Ok(basic.authorization().map(str::to_string)),
            AuthStrategy::OAuth(oauth) => oauth.authorization(method, url, params).map(Some),
        }
    }
}

/// `Authorization: Basic` credentials. Empty username or password leaves the
/// strategy without a credential rather than sending empty values.
#[derive(Clone, Default)]
pub struct BasicAuth {
    header: Option<String>,
}

impl BasicAuth {
    pub fn new(username: &str, password: &str) -> Self {
        let mut basic = Self::default();
        basic.set_credentials(username, password);
        basic
    }

    /// Replace the stored credential. Either part empty clears it.
    pub fn set_credentials(&mut self, username: &str, password: &str) {
        self.header = if username.is_empty() || password.is_empty() {
            None
        } else {
            Some(basic_header(username, password))
        };
    }

    pub fn has_credentials(&self) -> bool {
        self.header.is_some()
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header.as_deref()
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

pub(crate) fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// A user token and its secret.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthToken {
    pub token: String,
    pub secret: String,
}

/// OAuth 1.0a consumer identity plus an optional user token.
#[derive(Clone)]
pub struct OAuth {
    consumer_key: String,
    consumer_secret: String,
    token: Option<OAuthToken>,
}

impl OAuth {
    pub fn new(consumer_key: &str, consumer_secret: &str) -> Self {
        Self {
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
            token: None,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&OAuthToken> {
        self.token.as_ref()
    }

    /// Store a user token. An empty token or secret clears it.
    pub fn set_token(&mut self, token: &str, secret: &str) {
        self.token = if token.is_empty() || secret.is_empty() {
            None
        } else {
            Some(OAuthToken {
                token: token.to_string(),
                secret: secret.to_string(),
            })
        };
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn ensure_exchange_allowed(&self) -> Result<()> {
        if self.has_token() {
            return Err(Error::CredentialState(
                "cannot exchange credentials while an OAuth token is already set".to_string(),
            ));
        }
        Ok(())
    }

    /// Sign a request with a fresh nonce and the current time.
    pub fn authorization(&self, method: HttpMethod, url: &str, params: &Params) -> Result<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::CredentialState(format!("system clock before epoch: {e}")))?
            .as_secs();
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        self.authorization_with(method, url, params, &nonce, timestamp)
    }

    /// Deterministic signing with an explicit nonce and timestamp.
    pub fn authorization_with(
        &self,
        method: HttpMethod,
        url: &str,
        params: &Params,
        nonce: &str,
        timestamp: u64,
    ) -> Result<String> {
        let oauth_params = self.protocol_params(nonce, timestamp);
        let signature = self.sign(method, url, params, &oauth_params)?;

        let mut header = String::from("OAuth ");
        let fields = oauth_params
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(std::iter::once(("oauth_signature", signature.as_str())))
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        header.push_str(&fields);
        Ok(header)
    }

    fn protocol_params(&self, nonce: &str, timestamp: u64) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("oauth_consumer_key", self.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp", timestamp.to_string()),
        ];
        if let Some(token) = &self.token {
            params.push(("oauth_token", token.token.clone()));
        }
        params.push(("oauth_version", OAUTH_VERSION.to_string()));
        params
    }

    fn sign(
        &self,
        method: HttpMethod,
        url: &str,
        params: &Params,
        oauth_params: &[(&'static str, String)],
    ) -> Result<String> {
        let base = signature_base_string(method, url, params, oauth_params);
        let token_secret = self.token.as_ref().map(|t| t.secret.as_str()).unwrap_or("");
        let key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(token_secret)
        );
        let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
            .map_err(|e| Error::CredentialState(format!("invalid signing key: {e}")))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for OAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth")
            .field("consumer_key", &self.consumer_key)
            .field("has_token", &self.has_token())
            .finish()
    }
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken").field("token", &self.token).finish()
    }
}

fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `METHOD&url&params` with params percent-encoded and sorted by name then
/// value (RFC 5849 section 3.4.1).
fn signature_base_string(
    method: HttpMethod,
    url: &str,
    params: &Params,
    oauth_params: &[(&'static str, String)],
) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            oauth_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    pairs.sort();
    let normalized = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode(url),
        percent_encode(&normalized)
    )
}
