//! Parsers from API JSON to domain records.
//!
//! # Design
//! Each record type has a unit-struct parser implementing `Parser`. Call
//! sites pick the parser explicitly, so dispatch is static. Parsers for
//! nested fields are invoked recursively through the helpers in `fields`,
//! which treat a missing or `null` key as absent and never fail on it.
//!
//! Only `GroupParser` has an array form. Any other parser handed an array
//! fails with `ParseError::UnsupportedArray`, which surfaces an endpoint
//! wired to the wrong parser instead of quietly returning nothing.

mod checkin;
mod fields;
mod tip;
mod user;
mod venue;

use serde_json::Value;

use crate::error::ParseError;
use crate::types::{Group, Response};

pub use checkin::{CheckinParser, CheckinResultParser, RankParser, ScoreParser};
pub use fields::JsonObject;
pub use tip::{TipParser, TodoParser};
pub use user::{BadgeParser, CredentialsParser, FriendInvitesResultParser, SettingsParser, UserParser};
pub use venue::{
    BeenhereParser, CategoryParser, CityParser, MayorParser, SpecialParser, StatsParser, VenueParser,
};

/// How a parser's payload is wrapped in a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Any single-key object whose value is an object or array.
    Any,
    /// Only an object whose single key is this one. Other bodies are the
    /// payload itself, even when they have a single key.
    Key(&'static str),
}

/// Converts one JSON value into a typed result.
pub trait Parser {
    type Output;

    /// Short label used in error messages.
    fn name(&self) -> &'static str;

    fn envelope(&self) -> Envelope {
        Envelope::Any
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Self::Output, ParseError>;

    fn parse_array(&self, _json: &[Value]) -> Result<Self::Output, ParseError> {
        Err(ParseError::UnsupportedArray { parser: self.name() })
    }

    /// Dispatch on the JSON shape.
    fn parse(&self, json: &Value) -> Result<Self::Output, ParseError> {
        match json {
            Value::Object(object) => self.parse_object(object),
            Value::Array(array) => self.parse_array(array),
            other => Err(ParseError::UnexpectedShape {
                parser: self.name(),
                found: fields::json_kind(other),
            }),
        }
    }
}

/// Parses a JSON array, or an object wrapping arrays, into a `Group` by
/// applying the inner parser to each element in order.
///
/// In object form, `"type"` names the group's kind and every other key must
/// hold an array whose elements join the group. Elements that are themselves
/// arrays go to the inner parser's array form, which is how
/// `GroupParser<GroupParser<P>>` builds nested groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupParser<P> {
    inner: P,
}

impl<P: Parser> GroupParser<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    fn extend(&self, group: &mut Group<P::Output>, items: &[Value]) -> Result<(), ParseError> {
        for item in items {
            group.push(self.inner.parse(item)?);
        }
        Ok(())
    }
}

impl<P: Parser> Parser for GroupParser<P> {
    type Output = Group<P::Output>;

    fn name(&self) -> &'static str {
        "group"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Self::Output, ParseError> {
        let mut group = Group::new();
        for (key, value) in json {
            if key == "type" {
                group.set_kind(fields::string(json, "type")?);
                continue;
            }
            match value {
                Value::Array(items) => self.extend(&mut group, items)?,
                Value::Null => {}
                _ => {
                    return Err(ParseError::InvalidField {
                        field: key.clone(),
                        expected: "an array",
                    })
                }
            }
        }
        Ok(group)
    }

    fn parse_array(&self, json: &[Value]) -> Result<Self::Output, ParseError> {
        let mut group = Group::new();
        self.extend(&mut group, json)?;
        Ok(group)
    }
}

/// Generic acknowledgement bodies: `{"value": true}` (synthesised from a bare
/// `true`) or `{"response": "..."}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl Parser for ResponseParser {
    type Output = Response;

    fn name(&self) -> &'static str {
        "response"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Response, ParseError> {
        Ok(Response {
            value: fields::boolean(json, "value")?,
            message: fields::string(json, "response")?,
        })
    }
}
