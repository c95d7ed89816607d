//! Parsers for users and the records hanging off them.
//!
//! # Design
//! A user embeds its latest checkin, badges, mayorships and settings. The
//! server names the mayorships list `mayor`; it lands in `User::mayorships`.
//! `FriendInvitesResultParser` carries its own envelope key because a body
//! with only `users` or only `emails` is otherwise indistinguishable from a
//! wrapper.

use serde_json::Value;

use super::fields::{self, JsonObject};
use super::{CheckinParser, CityParser, Envelope, Parser, VenueParser};
use crate::error::ParseError;
use crate::types::{Badge, Credentials, FriendInvitesResult, Group, Settings, User};

#[derive(Debug, Clone, Copy, Default)]
pub struct UserParser;

impl Parser for UserParser {
    type Output = User;

    fn name(&self) -> &'static str {
        "user"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<User, ParseError> {
        Ok(User {
            id: fields::string(json, "id")?,
            first_name: fields::string(json, "firstname")?,
            last_name: fields::string(json, "lastname")?,
            gender: fields::string(json, "gender")?,
            photo: fields::string(json, "photo")?,
            phone: fields::string(json, "phone")?,
            email: fields::string(json, "email")?,
            twitter: fields::string(json, "twitter")?,
            facebook: fields::string(json, "facebook")?,
            friend_status: fields::string(json, "friendstatus")?,
            created: fields::string(json, "created")?,
            mayor_count: fields::int(json, "mayorcount")?,
            city: fields::nested(json, "city", &CityParser)?,
            checkin: fields::boxed(json, "checkin", &CheckinParser)?,
            badges: fields::group(json, "badges", BadgeParser)?,
            mayorships: fields::group(json, "mayor", VenueParser)?,
            settings: fields::nested(json, "settings", &SettingsParser)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeParser;

impl Parser for BadgeParser {
    type Output = Badge;

    fn name(&self) -> &'static str {
        "badge"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Badge, ParseError> {
        Ok(Badge {
            id: fields::string(json, "id")?,
            name: fields::string(json, "name")?,
            description: fields::string(json, "description")?,
            icon: fields::string(json, "icon")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsParser;

impl Parser for SettingsParser {
    type Output = Settings;

    fn name(&self) -> &'static str {
        "settings"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Settings, ParseError> {
        Ok(Settings {
            pings: fields::string(json, "pings")?,
            send_to_twitter: fields::boolean(json, "sendtotwitter")?,
            send_to_facebook: fields::boolean(json, "sendtofacebook")?,
            feeds_key: fields::string(json, "feeds_key")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialsParser;

impl Parser for CredentialsParser {
    type Output = Credentials;

    fn name(&self) -> &'static str {
        "credentials"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Credentials, ParseError> {
        Ok(Credentials {
            oauth_token: fields::string(json, "oauth_token")?,
            oauth_token_secret: fields::string(json, "oauth_token_secret")?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FriendInvitesResultParser;

impl Parser for FriendInvitesResultParser {
    type Output = FriendInvitesResult;

    fn name(&self) -> &'static str {
        "friend invites result"
    }

    /// `users` and `emails` are each optional, so a body carrying only one of
    /// them must not be mistaken for a wrapper.
    fn envelope(&self) -> Envelope {
        Envelope::Key("friendinvitesresult")
    }

    fn parse_object(&self, json: &JsonObject) -> Result<FriendInvitesResult, ParseError> {
        Ok(FriendInvitesResult {
            users: fields::group(json, "users", UserParser)?,
            emails: emails(json)?,
        })
    }
}

/// `"emails"` is a single `{"email": ...}` object when one address matched
/// and an array (of strings or such objects) otherwise.
fn emails(json: &JsonObject) -> Result<Option<Group<String>>, ParseError> {
    match json.get("emails") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items.iter().map(email).collect::<Result<Group<_>, _>>().map(Some),
        Some(single) => Ok(Some(std::iter::once(email(single)?).collect())),
    }
}

fn email(value: &Value) -> Result<String, ParseError> {
    let invalid = || ParseError::InvalidField {
        field: "emails".to_string(),
        expected: "an email address",
    };
    match value {
        Value::String(address) => Ok(address.clone()),
        Value::Object(entry) => fields::string(entry, "email")?.ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_full_user() {
        let json = json!({
            "id": 9,
            "firstname": "Jane",
            "lastname": "D.",
            "gender": "female",
            "friendstatus": "friend",
            "mayorcount": "2",
            "city": {"id": 23, "name": "New York", "shortname": "NYC"},
            "checkin": {"id": 77, "shout": "hi", "ismayor": "1", "venue": {"id": "5", "name": "Joe's"}},
            "badges": [{"id": "b1", "name": "Newbie"}],
            "mayor": [{"id": "5", "name": "Joe's"}],
            "settings": {"pings": "on", "sendtotwitter": "0"}
        });
        let user = UserParser.parse(&json).unwrap();
        assert_eq!(user.id.as_deref(), Some("9"));
        assert_eq!(user.first_name.as_deref(), Some("Jane"));
        assert_eq!(user.mayor_count, Some(2));
        assert_eq!(user.city.unwrap().short_name.as_deref(), Some("NYC"));
        let checkin = user.checkin.unwrap();
        assert_eq!(checkin.is_mayor, Some(true));
        assert_eq!(checkin.venue.unwrap().name.as_deref(), Some("Joe's"));
        assert_eq!(user.badges.unwrap()[0].name.as_deref(), Some("Newbie"));
        assert_eq!(user.mayorships.unwrap().len(), 1);
        assert_eq!(user.settings.unwrap().send_to_twitter, Some(false));
    }

    #[test]
    fn missing_fields_stay_default() {
        let user = UserParser.parse(&json!({})).unwrap();
        assert_eq!(user, User::default());

        let user = UserParser.parse(&json!({"id": "1"})).unwrap();
        assert_eq!(
            user,
            User {
                id: Some("1".to_string()),
                ..User::default()
            }
        );
    }

    #[test]
    fn emails_single_object_normalizes_to_group() {
        let json = json!({"emails": {"email": "a@x.com"}});
        let result = FriendInvitesResultParser.parse(&json).unwrap();
        let emails = result.emails.unwrap();
        assert_eq!(&emails[..], ["a@x.com".to_string()]);
        assert!(result.users.is_none());
    }

    #[test]
    fn emails_array_normalizes_to_group() {
        let json = json!({"emails": ["a@x.com", "b@x.com"], "users": [{"id": "1"}]});
        let result = FriendInvitesResultParser.parse(&json).unwrap();
        let emails = result.emails.unwrap();
        assert_eq!(&emails[..], ["a@x.com".to_string(), "b@x.com".to_string()]);
        assert_eq!(result.users.unwrap().len(), 1);
    }

    #[test]
    fn emails_array_of_objects_is_accepted() {
        let json = json!({"emails": [{"email": "a@x.com"}, "b@x.com"]});
        let emails = FriendInvitesResultParser.parse(&json).unwrap().emails.unwrap();
        assert_eq!(emails.len(), 2);
    }

    #[test]
    fn emails_entry_without_address_is_invalid() {
        let json = json!({"emails": {"name": "nobody"}});
        assert!(matches!(
            FriendInvitesResultParser.parse(&json),
            Err(ParseError::InvalidField { .. })
        ));
    }

    #[test]
    fn credentials_round_trip_verbatim() {
        let json = json!({"oauth_token": "tok", "oauth_token_secret": "sec"});
        let credentials = CredentialsParser.parse(&json).unwrap();
        assert_eq!(credentials.oauth_token.as_deref(), Some("tok"));
        assert_eq!(credentials.oauth_token_secret.as_deref(), Some("sec"));
    }
}
