//! Domain records and request payloads for the v1 API.
//!
//! # Design
//! Every record field is optional: the server omits fields per endpoint and
//! per response variant, so a missing key is normal. Records are built fresh
//! by the parsers and never mutated by this crate afterwards.
//!
//! Nested entities are owned snapshots of whatever the JSON tree carried. A
//! tip listed under a venue may embed its venue again; that is a second,
//! independent copy, never a pointer back to the parent, so no reference
//! cycles exist.

use std::ops::Deref;

/// Ordered list of results, optionally tagged with a kind (for example the
/// proximity tier of a venue group). Duplicates are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    kind: Option<String>,
    items: Vec<T>,
}

impl<T> Group<T> {
    pub fn new() -> Self {
        Self {
            kind: None,
            items: Vec::new(),
        }
    }

    pub fn with_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_kind(&mut self, kind: Option<String>) {
        self.kind = kind;
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Group<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> FromIterator<T> for Group<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            kind: None,
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Group<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Group<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub photo: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    /// `friend`, `pendingyou`, `pendingthem` or `followingthem`.
    pub friend_status: Option<String>,
    pub created: Option<String>,
    pub mayor_count: Option<i64>,
    pub city: Option<City>,
    pub checkin: Option<Box<Checkin>>,
    pub badges: Option<Group<Badge>>,
    pub mayorships: Option<Group<Venue>>,
    pub settings: Option<Settings>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Venue {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub cross_street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub twitter: Option<String>,
    pub geolat: Option<f64>,
    pub geolong: Option<f64>,
    /// Meters from the request location.
    pub distance: Option<i64>,
    pub has_todo: Option<bool>,
    pub primary_category: Option<Box<Category>>,
    pub stats: Option<Stats>,
    pub tips: Option<Group<Tip>>,
    pub todos: Option<Group<Todo>>,
    pub checkins: Option<Group<Checkin>>,
    pub specials: Option<Group<Special>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tip {
    pub id: Option<String>,
    pub text: Option<String>,
    pub created: Option<String>,
    /// `todo` or `done` when the viewer has marked the tip.
    pub status: Option<String>,
    pub url: Option<String>,
    pub distance: Option<i64>,
    pub user: Option<Box<User>>,
    pub venue: Option<Box<Venue>>,
}

impl Tip {
    pub fn venue_id(&self) -> Option<&str> {
        self.venue.as_ref().and_then(|venue| venue.id.as_deref())
    }

    pub fn is_todo(&self) -> bool {
        self.status.as_deref() == Some("todo")
    }

    pub fn is_done(&self) -> bool {
        self.status.as_deref() == Some("done")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Todo {
    pub id: Option<String>,
    pub created: Option<String>,
    pub tip: Option<Tip>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkin {
    pub id: Option<String>,
    pub created: Option<String>,
    pub shout: Option<String>,
    pub display: Option<String>,
    pub is_mayor: Option<bool>,
    pub distance: Option<i64>,
    pub private: Option<bool>,
    pub ping: Option<bool>,
    pub user: Option<Box<User>>,
    pub venue: Option<Box<Venue>>,
}

/// Result of posting a checkin: rewards and the venue checked into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckinResult {
    pub id: Option<String>,
    pub created: Option<String>,
    pub message: Option<String>,
    pub mayor: Option<Mayor>,
    pub badges: Option<Group<Badge>>,
    pub scoring: Option<Group<Score>>,
    pub leaderboard: Option<Group<Rank>>,
    pub specials: Option<Group<Special>>,
    pub venue: Option<Venue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct City {
    pub id: Option<String>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub timezone: Option<String>,
    pub geolat: Option<f64>,
    pub geolong: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub id: Option<String>,
    pub full_path_name: Option<String>,
    pub node_name: Option<String>,
    pub icon_url: Option<String>,
    pub child_categories: Option<Group<Category>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub oauth_token: Option<String>,
    pub oauth_token_secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub pings: Option<String>,
    pub send_to_twitter: Option<bool>,
    pub send_to_facebook: Option<bool>,
    pub feeds_key: Option<String>,
}

/// Generic acknowledgement. A bare `true` body becomes `value: Some(true)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub value: Option<bool>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Badge {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    pub points: Option<i64>,
    pub message: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rank {
    pub city: Option<String>,
    pub message: Option<String>,
    pub position: Option<i64>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mayor {
    /// `nochange`, `new` or `stolen`.
    pub kind: Option<String>,
    pub checkins: Option<i64>,
    pub count: Option<i64>,
    pub message: Option<String>,
    pub user: Option<Box<User>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub checkins: Option<i64>,
    pub here_now: Option<i64>,
    pub beenhere: Option<Beenhere>,
    pub mayor: Option<Mayor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Beenhere {
    pub me: Option<bool>,
    pub friends: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Special {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub message: Option<String>,
    pub venue: Option<Box<Venue>>,
}

/// Contacts matched by phone number or email address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FriendInvitesResult {
    pub users: Option<Group<User>>,
    /// Addresses with no account yet; candidates for an invite.
    pub emails: Option<Group<String>>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Device location attached to location-aware requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub long: f64,
    pub horizontal_accuracy: Option<f64>,
    pub vertical_accuracy: Option<f64>,
    pub altitude: Option<f64>,
}

impl Location {
    pub fn new(lat: f64, long: f64) -> Self {
        Self {
            lat,
            long,
            ..Self::default()
        }
    }
}

/// Input for the checkin operation. Either `venue_id` or `venue_name`
/// identifies the place; a name alone creates an ad-hoc checkin.
#[derive(Debug, Clone, Default)]
pub struct CheckinRequest {
    pub venue_id: Option<String>,
    pub venue_name: Option<String>,
    pub shout: Option<String>,
    pub private: bool,
    pub tell_followers: bool,
    pub twitter: bool,
    pub facebook: bool,
    pub location: Option<Location>,
}

/// Venue fields for adding a venue or proposing an edit.
#[derive(Debug, Clone, Default)]
pub struct VenueDraft {
    pub name: String,
    pub address: Option<String>,
    pub cross_street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub category_id: Option<String>,
}

/// Ping delivery preference for checkins by friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingSetting {
    On,
    Off,
    Goodnight,
}

impl PingSetting {
    pub fn as_str(self) -> &'static str {
        match self {
            PingSetting::On => "on",
            PingSetting::Off => "off",
            PingSetting::Goodnight => "goodnight",
        }
    }
}
