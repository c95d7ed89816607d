//! Checkin parsers, including the scoring and leaderboard of a new checkin.

use super::fields::{self, JsonObject};
use super::{BadgeParser, MayorParser, Parser, SpecialParser, UserParser, VenueParser};
use crate::error::ParseError;
use crate::types::{Checkin, CheckinResult, Rank, Score};

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckinParser;

impl Parser for CheckinParser {
    type Output = Checkin;

    fn name(&self) -> &'static str {
        "checkin"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Checkin, ParseError> {
        Ok(Checkin {
            id: fields::string(json, "id")?,
            created: fields::string(json, "created")?,
            shout: fields::string(json, "shout")?,
            display: fields::string(json, "display")?,
            is_mayor: fields::boolean(json, "ismayor")?,
            distance: fields::int(json, "distance")?,
            private: fields::boolean(json, "private")?,
            ping: fields::boolean(json, "ping")?,
            user: fields::boxed(json, "user", &UserParser)?,
            venue: fields::boxed(json, "venue", &VenueParser)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckinResultParser;

impl Parser for CheckinResultParser {
    type Output = CheckinResult;

    fn name(&self) -> &'static str {
        "checkin result"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<CheckinResult, ParseError> {
        Ok(CheckinResult {
            id: fields::string(json, "id")?,
            created: fields::string(json, "created")?,
            message: fields::string(json, "message")?,
            mayor: fields::nested(json, "mayor", &MayorParser)?,
            badges: fields::group(json, "badges", BadgeParser)?,
            scoring: fields::group(json, "scoring", ScoreParser)?,
            leaderboard: fields::group(json, "leaderboard", RankParser)?,
            specials: fields::group(json, "specials", SpecialParser)?,
            venue: fields::nested(json, "venue", &VenueParser)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreParser;

impl Parser for ScoreParser {
    type Output = Score;

    fn name(&self) -> &'static str {
        "score"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Score, ParseError> {
        Ok(Score {
            points: fields::int(json, "points")?,
            message: fields::string(json, "message")?,
            icon: fields::string(json, "icon")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RankParser;

impl Parser for RankParser {
    type Output = Rank;

    fn name(&self) -> &'static str {
        "rank"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Rank, ParseError> {
        Ok(Rank {
            city: fields::string(json, "city")?,
            message: fields::string(json, "message")?,
            position: fields::int(json, "position")?,
            user_id: fields::string(json, "userid")?,
        })
    }
}
