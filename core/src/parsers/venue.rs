//! Parsers for venues and their nested records.
//!
//! # Design
//! A venue carries its stats, tips, todos, checkins and specials inline.
//! Categories recurse through `categories` until a leaf without the key.

use super::fields::{self, JsonObject};
use super::{CheckinParser, Parser, TipParser, TodoParser, UserParser};
use crate::error::ParseError;
use crate::types::{Beenhere, Category, City, Mayor, Special, Stats, Venue};

#[derive(Debug, Clone, Copy, Default)]
pub struct VenueParser;

impl Parser for VenueParser {
    type Output = Venue;

    fn name(&self) -> &'static str {
        "venue"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Venue, ParseError> {
        Ok(Venue {
            id: fields::string(json, "id")?,
            name: fields::string(json, "name")?,
            address: fields::string(json, "address")?,
            cross_street: fields::string(json, "crossstreet")?,
            city: fields::string(json, "city")?,
            state: fields::string(json, "state")?,
            zip: fields::string(json, "zip")?,
            phone: fields::string(json, "phone")?,
            twitter: fields::string(json, "twitter")?,
            geolat: fields::float(json, "geolat")?,
            geolong: fields::float(json, "geolong")?,
            distance: fields::int(json, "distance")?,
            has_todo: fields::boolean(json, "hasTodo")?,
            primary_category: fields::boxed(json, "primarycategory", &CategoryParser)?,
            stats: fields::nested(json, "stats", &StatsParser)?,
            tips: fields::group(json, "tips", TipParser)?,
            todos: fields::group(json, "todos", TodoParser)?,
            checkins: fields::group(json, "checkins", CheckinParser)?,
            specials: fields::group(json, "specials", SpecialParser)?,
        })
    }
}

/// Categories nest to any depth under `"categories"`; a leaf simply has no
/// such key.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryParser;

impl Parser for CategoryParser {
    type Output = Category;

    fn name(&self) -> &'static str {
        "category"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Category, ParseError> {
        Ok(Category {
            id: fields::string(json, "id")?,
            full_path_name: fields::string(json, "fullpathname")?,
            node_name: fields::string(json, "nodename")?,
            icon_url: fields::string(json, "iconurl")?,
            child_categories: fields::group(json, "categories", CategoryParser)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CityParser;

impl Parser for CityParser {
    type Output = City;

    fn name(&self) -> &'static str {
        "city"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<City, ParseError> {
        Ok(City {
            id: fields::string(json, "id")?,
            name: fields::string(json, "name")?,
            short_name: fields::string(json, "shortname")?,
            timezone: fields::string(json, "timezone")?,
            geolat: fields::float(json, "geolat")?,
            geolong: fields::float(json, "geolong")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatsParser;

impl Parser for StatsParser {
    type Output = Stats;

    fn name(&self) -> &'static str {
        "stats"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Stats, ParseError> {
        Ok(Stats {
            checkins: fields::int(json, "checkins")?,
            here_now: fields::int(json, "herenow")?,
            beenhere: fields::nested(json, "beenhere", &BeenhereParser)?,
            mayor: fields::nested(json, "mayor", &MayorParser)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BeenhereParser;

impl Parser for BeenhereParser {
    type Output = Beenhere;

    fn name(&self) -> &'static str {
        "beenhere"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Beenhere, ParseError> {
        Ok(Beenhere {
            me: fields::boolean(json, "me")?,
            friends: fields::boolean(json, "friends")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MayorParser;

impl Parser for MayorParser {
    type Output = Mayor;

    fn name(&self) -> &'static str {
        "mayor"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Mayor, ParseError> {
        Ok(Mayor {
            kind: fields::string(json, "type")?,
            checkins: fields::int(json, "checkins")?,
            count: fields::int(json, "count")?,
            message: fields::string(json, "message")?,
            user: fields::boxed(json, "user", &UserParser)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialParser;

impl Parser for SpecialParser {
    type Output = Special;

    fn name(&self) -> &'static str {
        "special"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Special, ParseError> {
        Ok(Special {
            id: fields::string(json, "id")?,
            kind: fields::string(json, "type")?,
            message: fields::string(json, "message")?,
            venue: fields::boxed(json, "venue", &VenueParser)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_venue_with_nested_collections() {
        let json = json!({
            "id": 44,
            "name": "Cafe Grumpy",
            "crossstreet": "at 20th St",
            "geolat": 40.7434,
            "geolong": "-74.0002",
            "distance": "15",
            "hasTodo": "true",
            "primarycategory": {"id": 79, "fullpathname": "Food:Coffee Shop", "nodename": "Coffee Shop"},
            "stats": {
                "checkins": 812,
                "herenow": "3",
                "beenhere": {"me": "1", "friends": "0"},
                "mayor": {"count": 31, "user": {"id": "7", "firstname": "Ann"}}
            },
            "tips": [
                {"id": "t1", "text": "Get the cortado", "venue": {"id": 44, "name": "Cafe Grumpy"}},
                {"id": "t2", "text": "Wifi is slow"}
            ],
            "specials": [{"id": "s1", "type": "mayor", "message": "Free coffee"}],
            "checkins": [{"id": "c1", "user": {"id": "7"}}]
        });
        let venue = VenueParser.parse(&json).unwrap();
        assert_eq!(venue.id.as_deref(), Some("44"));
        assert_eq!(venue.geolong, Some(-74.0002));
        assert_eq!(venue.distance, Some(15));
        assert_eq!(venue.has_todo, Some(true));
        assert_eq!(
            venue.primary_category.unwrap().node_name.as_deref(),
            Some("Coffee Shop")
        );

        let stats = venue.stats.unwrap();
        assert_eq!(stats.here_now, Some(3));
        assert_eq!(
            stats.beenhere,
            Some(Beenhere {
                me: Some(true),
                friends: Some(false)
            })
        );
        let mayor = stats.mayor.unwrap();
        assert_eq!(mayor.count, Some(31));
        assert_eq!(mayor.user.unwrap().first_name.as_deref(), Some("Ann"));

        let tips = venue.tips.unwrap();
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0].venue_id(), Some("44"));
        assert!(tips[1].venue.is_none());
        assert_eq!(venue.specials.unwrap()[0].kind.as_deref(), Some("mayor"));
        assert_eq!(venue.checkins.unwrap().len(), 1);
        assert!(venue.todos.is_none());
    }

    #[test]
    fn missing_fields_stay_default() {
        assert_eq!(VenueParser.parse(&json!({})).unwrap(), Venue::default());
        assert_eq!(StatsParser.parse(&json!({})).unwrap(), Stats::default());
        assert_eq!(MayorParser.parse(&json!({})).unwrap(), Mayor::default());
        assert_eq!(SpecialParser.parse(&json!({})).unwrap(), Special::default());
    }

    #[test]
    fn categories_nest_recursively() {
        let json = json!({
            "id": 1,
            "nodename": "Food",
            "categories": [
                {
                    "id": 2,
                    "nodename": "Coffee",
                    "categories": [{"id": 4, "nodename": "Espresso Bar"}]
                },
                {"id": 3, "nodename": "Pizza"}
            ]
        });
        let category = CategoryParser.parse(&json).unwrap();
        let children = category.child_categories.unwrap();
        assert_eq!(children.len(), 2);

        let coffee = &children[0];
        let grandchildren = coffee.child_categories.as_ref().unwrap();
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(grandchildren[0].node_name.as_deref(), Some("Espresso Bar"));
        assert!(grandchildren[0].child_categories.is_none());

        assert_eq!(children[1].node_name.as_deref(), Some("Pizza"));
        assert!(children[1].child_categories.is_none());
    }

    #[test]
    fn invalid_nested_field_fails_whole_record() {
        let json = json!({"id": "1", "stats": {"herenow": "several"}});
        assert_eq!(
            VenueParser.parse(&json).unwrap_err(),
            ParseError::InvalidField {
                field: "herenow".to_string(),
                expected: "an integer"
            }
        );
    }
}
