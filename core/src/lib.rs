//! Synchronous client core for the Foursquare v1 API.
//!
//! # Overview
//! Builds authenticated `HttpRequest` values for every v1 operation and turns
//! raw response bodies into typed domain records. The network round trip is
//! left to a `Transport`, either supplied by the host or the bundled
//! `UreqTransport`.
//!
//! # Design
//! - `FoursquareClient` holds an explicit base URL and `AuthStrategy`; there
//!   is no global credential state.
//! - Each operation returns an `ApiCall`: the request plus the parser that
//!   decodes its response, so the result type is fixed at build time.
//! - Responses pass through a normalizer that folds the server's legacy
//!   error shapes into `Error::Api` before any parser runs.
//! - Parsers are small strategy objects composed recursively; `GroupParser`
//!   turns any of them into a collection parser.

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod normalize;
pub mod parsers;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use auth::{AuthStrategy, BasicAuth, OAuth, OAuthToken};
pub use client::{parse_response, ApiCall, Foursquare, FoursquareClient};
pub use config::{AuthConfig, ClientConfig, ConfigError};
pub use error::{ApiError, Error, ParseError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Params, Transport};
pub use parsers::{Envelope, GroupParser, Parser};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::*;
