//! Request builder and response pipeline for the Foursquare v1 API.
//!
//! # Design
//! `FoursquareClient` holds the base URL, the user agent and the single
//! active `AuthStrategy`; it performs no I/O. Each operation in
//! `endpoints` returns an `ApiCall`, which pairs the finished `HttpRequest`
//! with the parser for its response. The host executes the request and hands
//! the `HttpResponse` back to `ApiCall::parse`, or lets `Foursquare` drive
//! both halves through a `Transport`.
//!
//! The pipeline for a response is: status check, error normalization,
//! envelope unwrapping, then the operation's parser.

use tracing::{debug, warn};

use crate::auth::AuthStrategy;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Params, Transport};
use crate::normalize::{normalize, unwrap_payload};
use crate::parsers::{CredentialsParser, Parser};
use crate::types::Credentials;

pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com";
const API_VERSION_PREFIX: &str = "/v1";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous request builder for the v1 API.
#[derive(Debug, Clone)]
pub struct FoursquareClient {
    base_url: String,
    user_agent: Option<String>,
    auth: AuthStrategy,
}

impl FoursquareClient {
    pub fn new(base_url: &str, auth: AuthStrategy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: None,
            auth,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(&config.base_url, config.auth_strategy());
        match &config.user_agent {
            Some(agent) => client.with_user_agent(agent),
            None => client,
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    pub fn auth(&self) -> &AuthStrategy {
        &self.auth
    }

    /// Credentials may be swapped between calls, never during one.
    pub fn auth_mut(&mut self) -> &mut AuthStrategy {
        &mut self.auth
    }

    /// `<base>/v1<path>.json`
    pub fn full_url(&self, path: &str) -> String {
        format!("{}{API_VERSION_PREFIX}{path}.json", self.base_url)
    }

    pub(crate) fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Assemble an authenticated request.
    ///
    /// Anything but GET goes out as POST with `method=<verb>` appended, since
    /// some networks only pass GET and POST.
    pub(crate) fn build<P: Parser>(
        &self,
        method: HttpMethod,
        path: &str,
        mut params: Params,
        parser: P,
    ) -> Result<ApiCall<P>> {
        let wire_method = if method == HttpMethod::Get {
            HttpMethod::Get
        } else {
            params.push_str("method", Some(method.as_str()));
            HttpMethod::Post
        };
        let url = self.full_url(path);
        debug!("building {} {} ({} params)", wire_method.as_str(), url, params.len());

        let mut headers = Vec::new();
        if let Some(agent) = &self.user_agent {
            headers.push(("User-Agent".to_string(), agent.clone()));
        }
        if let Some(authorization) = self.auth.authorization(wire_method, &url, &params)? {
            headers.push(("Authorization".to_string(), authorization));
        }

        let request = match wire_method {
            HttpMethod::Get if params.is_empty() => HttpRequest {
                method: wire_method,
                url,
                headers,
                body: None,
            },
            HttpMethod::Get => HttpRequest {
                method: wire_method,
                url: format!("{url}?{}", params.encode()),
                headers,
                body: None,
            },
            _ => {
                headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                HttpRequest {
                    method: wire_method,
                    url,
                    headers,
                    body: Some(params.encode().into_bytes()),
                }
            }
        };
        Ok(ApiCall::new(request, parser))
    }
}

/// A built request together with the parser for its response.
#[derive(Debug, Clone)]
pub struct ApiCall<P> {
    request: HttpRequest,
    parser: P,
}

impl<P: Parser> ApiCall<P> {
    pub(crate) fn new(request: HttpRequest, parser: P) -> Self {
        Self { request, parser }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn into_request(self) -> HttpRequest {
        self.request
    }

    pub fn parse(&self, response: HttpResponse) -> Result<P::Output> {
        parse_response(&self.parser, response)
    }
}

/// Run a response through status mapping, error normalization, envelope
/// unwrapping and `parser`.
pub fn parse_response<P: Parser>(parser: &P, response: HttpResponse) -> Result<P::Output> {
    debug!("parsing {} response with {} parser", response.status, parser.name());
    check_status(&response)?;
    let value = normalize(&response.body).inspect_err(|err| warn!("server signaled an error: {err}"))?;
    let payload = unwrap_payload(value, parser.envelope());
    Ok(parser.parse(&payload)?)
}

/// Map non-success status codes to the appropriate `Error` variant. A 400
/// body usually carries one of the normalizable error shapes.
fn check_status(response: &HttpResponse) -> Result<()> {
    match response.status {
        200 => Ok(()),
        400 => match normalize(&response.body) {
            Err(err @ (Error::Api(_) | Error::Credentials(_) | Error::RateLimited(_))) => Err(err),
            _ => Err(http_error(response)),
        },
        401 => Err(Error::Credentials(response.body.clone())),
        404 => Err(Error::NotFound),
        _ => Err(http_error(response)),
    }
}

fn http_error(response: &HttpResponse) -> Error {
    Error::Http {
        status: response.status,
        body: response.body.clone(),
    }
}

/// Executes `ApiCall`s through a `Transport`.
///
/// Synchronous: every call blocks for one round trip. Nothing is retried.
#[derive(Debug)]
pub struct Foursquare<T> {
    client: FoursquareClient,
    transport: T,
}

impl<T: Transport> Foursquare<T> {
    pub fn new(client: FoursquareClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &FoursquareClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut FoursquareClient {
        &mut self.client
    }

    pub fn execute<P: Parser>(&self, call: ApiCall<P>) -> Result<P::Output> {
        let response = self.transport.execute(call.request())?;
        call.parse(response)
    }

    /// Trade a username and password for an OAuth token and install it.
    ///
    /// Allowed once: with a token already present this fails with
    /// `Error::CredentialState` before any request is sent.
    pub fn auth_exchange(&mut self, username: &str, password: &str) -> Result<Credentials> {
        let call = self.client.auth_exchange(username, password)?;
        let credentials = self.execute(call)?;
        let (Some(token), Some(secret)) = (
            credentials.oauth_token.as_deref(),
            credentials.oauth_token_secret.as_deref(),
        ) else {
            return Err(Error::Credentials("exchange returned no token".to_string()));
        };
        if let AuthStrategy::OAuth(oauth) = self.client.auth_mut() {
            oauth.set_token(token, secret);
        }
        debug!("installed OAuth token from credential exchange");
        Ok(credentials)
    }
}

impl FoursquareClient {
    /// `POST /authexchange`: OAuth strategy only, and only while no token is
    /// held.
    pub fn auth_exchange(&self, username: &str, password: &str) -> Result<ApiCall<CredentialsParser>> {
        self.auth.ensure_exchange_allowed()?;
        let mut params = Params::new();
        params
            .push_str("fs_username", Some(username))
            .push_str("fs_password", Some(password));
        self.build(HttpMethod::Post, "/authexchange", params, CredentialsParser)
    }
}
