//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `FoursquareClient` builds
//! `HttpRequest` values and `ApiCall::parse` consumes `HttpResponse` values
//! without touching the network; a `Transport` (supplied by the host, or the
//! bundled `UreqTransport`) performs the round trip in between.
//!
//! Request parameters are an ordered list of flat name/value pairs. The same
//! encoding is used for GET query strings and POST form bodies.

use crate::error::TransportError;

/// HTTP method for a request.
///
/// Operations are declared with their natural verb; the client rewrites
/// anything other than `Get` to `Post` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// True for multipart uploads, whose socket failures are reported as
    /// `TransportError::Socket`.
    pub fn is_upload(&self) -> bool {
        self.header("content-type")
            .is_some_and(|value| value.starts_with("multipart/form-data"))
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Performs one blocking HTTP round trip.
///
/// Implementations must not interpret the status code; 4xx/5xx responses are
/// returned as data so the client can map them.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Ordered request parameters. Absent values are kept and sent as empty
/// strings; validation is the server's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, Option<String>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: impl Into<Option<String>>) -> &mut Self {
        self.pairs.push((name.to_string(), value.into()));
        self
    }

    pub fn push_str(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.push(name, value.map(str::to_string))
    }

    /// Boolean flags travel as `"1"`/`"0"`.
    pub fn push_flag(&mut self, name: &str, value: bool) -> &mut Self {
        self.push(name, Some(if value { "1" } else { "0" }.to_string()))
    }

    pub fn push_num<N: ToString>(&mut self, name: &str, value: Option<N>) -> &mut Self {
        self.push(name, value.map(|n| n.to_string()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }

    /// Name/value pairs with absent values rendered as empty strings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref().unwrap_or("")))
    }

    /// `application/x-www-form-urlencoded` rendering, shared by query
    /// strings and POST bodies.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    pub fn decode(encoded: &str) -> Vec<(String, String)> {
        url::form_urlencoded::parse(encoded.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }
}
