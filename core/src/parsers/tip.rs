//! Tip and todo parsers. A todo wraps the tip it was made from.

use super::fields::{self, JsonObject};
use super::{Parser, UserParser, VenueParser};
use crate::error::ParseError;
use crate::types::{Tip, Todo};

#[derive(Debug, Clone, Copy, Default)]
pub struct TipParser;

impl Parser for TipParser {
    type Output = Tip;

    fn name(&self) -> &'static str {
        "tip"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Tip, ParseError> {
        Ok(Tip {
            id: fields::string(json, "id")?,
            text: fields::string(json, "text")?,
            created: fields::string(json, "created")?,
            status: fields::string(json, "status")?,
            url: fields::string(json, "url")?,
            distance: fields::int(json, "distance")?,
            user: fields::boxed(json, "user", &UserParser)?,
            venue: fields::boxed(json, "venue", &VenueParser)?,
        })
    }
}

/// A todo owns its own snapshot of the tip it refers to.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoParser;

impl Parser for TodoParser {
    type Output = Todo;

    fn name(&self) -> &'static str {
        "todo"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Todo, ParseError> {
        Ok(Todo {
            id: fields::string(json, "id")?,
            created: fields::string(json, "created")?,
            tip: fields::nested(json, "tip", &TipParser)?,
        })
    }
}
