//! The v1 operation catalog.
//!
//! Every operation builds one `ApiCall` whose parser fixes the result type:
//! a single record, or a `Group` of records for collection endpoints.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::auth::basic_header;
use crate::client::{ApiCall, FoursquareClient};
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, Params};
use crate::parsers::{
    CategoryParser, CheckinParser, CheckinResultParser, CityParser, FriendInvitesResultParser, GroupParser,
    ResponseParser, SettingsParser, TipParser, TodoParser, UserParser, VenueParser,
};
use crate::types::{CheckinRequest, Location, PingSetting, VenueDraft};

/// Multipart boundary of the photo upload.
pub const UPLOAD_BOUNDARY: &str = "0xKhTmLbOuNdArY";

fn push_location(params: &mut Params, location: Option<&Location>) {
    params
        .push_num("geolat", location.map(|l| l.lat))
        .push_num("geolong", location.map(|l| l.long))
        .push_num("geohacc", location.and_then(|l| l.horizontal_accuracy))
        .push_num("geovacc", location.and_then(|l| l.vertical_accuracy))
        .push_num("geoalt", location.and_then(|l| l.altitude));
}

fn push_venue_draft(params: &mut Params, draft: &VenueDraft) {
    params
        .push_str("name", Some(&draft.name))
        .push_str("address", draft.address.as_deref())
        .push_str("crossstreet", draft.cross_street.as_deref())
        .push_str("city", draft.city.as_deref())
        .push_str("state", draft.state.as_deref())
        .push_str("zip", draft.zip.as_deref())
        .push_str("phone", draft.phone.as_deref())
        .push_str("primarycategoryid", draft.category_id.as_deref());
}

fn single(name: &str, value: &str) -> Params {
    let mut params = Params::new();
    params.push_str(name, Some(value));
    params
}

impl FoursquareClient {
    // -----------------------------------------------------------------------
    // Users and friends
    // -----------------------------------------------------------------------

    /// `uid: None` asks for the authenticated user.
    pub fn user(
        &self,
        uid: Option<&str>,
        mayor: bool,
        badges: bool,
        location: Option<&Location>,
    ) -> Result<ApiCall<UserParser>> {
        let mut params = Params::new();
        params
            .push_str("uid", uid)
            .push_flag("mayor", mayor)
            .push_flag("badges", badges);
        push_location(&mut params, location);
        self.build(HttpMethod::Get, "/user", params, UserParser)
    }

    /// Upload a new profile photo.
    ///
    /// Unlike every other operation this one authenticates with Basic
    /// credentials given here, whatever the client's strategy is.
    pub fn user_update(&self, image: &Path, username: &str, password: &str) -> Result<ApiCall<UserParser>> {
        let file = File::open(image).map_err(|source| Error::Upload {
            path: Some(image.to_path_buf()),
            source,
        })?;
        self.user_update_from_reader(file, username, password)
            .map_err(|err| match err {
                Error::Upload { path: None, source } => Error::Upload {
                    path: Some(image.to_path_buf()),
                    source,
                },
                other => other,
            })
    }

    pub fn user_update_from_reader<R: Read>(
        &self,
        mut image: R,
        username: &str,
        password: &str,
    ) -> Result<ApiCall<UserParser>> {
        let mut jpeg = Vec::new();
        image
            .read_to_end(&mut jpeg)
            .map_err(|source| Error::Upload { path: None, source })?;

        let mut body = Vec::with_capacity(jpeg.len() + 256);
        body.extend_from_slice(format!("--{UPLOAD_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"image,jpeg\"; filename=\"image.jpeg\"\r\n");
        body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
        body.extend_from_slice(&jpeg);
        body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--\r\n").as_bytes());

        let mut headers = Vec::new();
        if let Some(agent) = self.user_agent() {
            headers.push(("User-Agent".to_string(), agent.to_string()));
        }
        headers.push((
            "Content-Type".to_string(),
            format!("multipart/form-data; boundary={UPLOAD_BOUNDARY}"),
        ));
        headers.push(("Authorization".to_string(), basic_header(username, password)));

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.full_url("/user/update"),
            headers,
            body: Some(body),
        };
        tracing::debug!("building photo upload of {} bytes", jpeg.len());
        Ok(ApiCall::new(request, UserParser))
    }

    pub fn friends(&self, uid: Option<&str>) -> Result<ApiCall<GroupParser<UserParser>>> {
        let mut params = Params::new();
        params.push_str("uid", uid);
        self.build(HttpMethod::Get, "/friends", params, GroupParser::new(UserParser))
    }

    pub fn friend_requests(&self) -> Result<ApiCall<GroupParser<UserParser>>> {
        self.build(
            HttpMethod::Get,
            "/friend/requests",
            Params::new(),
            GroupParser::new(UserParser),
        )
    }

    pub fn friend_approve(&self, uid: &str) -> Result<ApiCall<UserParser>> {
        self.build(HttpMethod::Post, "/friend/approve", single("uid", uid), UserParser)
    }

    pub fn friend_deny(&self, uid: &str) -> Result<ApiCall<UserParser>> {
        self.build(HttpMethod::Post, "/friend/deny", single("uid", uid), UserParser)
    }

    pub fn friend_send_request(&self, uid: &str) -> Result<ApiCall<UserParser>> {
        self.build(HttpMethod::Post, "/friend/sendrequest", single("uid", uid), UserParser)
    }

    pub fn find_friends_by_name(&self, query: &str) -> Result<ApiCall<GroupParser<UserParser>>> {
        self.find_friends("/findfriends/byname", query)
    }

    pub fn find_friends_by_phone(&self, query: &str) -> Result<ApiCall<GroupParser<UserParser>>> {
        self.find_friends("/findfriends/byphone", query)
    }

    pub fn find_friends_by_facebook(&self, query: &str) -> Result<ApiCall<GroupParser<UserParser>>> {
        self.find_friends("/findfriends/byfacebook", query)
    }

    pub fn find_friends_by_twitter(&self, query: &str) -> Result<ApiCall<GroupParser<UserParser>>> {
        self.find_friends("/findfriends/bytwitter", query)
    }

    fn find_friends(&self, path: &str, query: &str) -> Result<ApiCall<GroupParser<UserParser>>> {
        self.build(HttpMethod::Get, path, single("q", query), GroupParser::new(UserParser))
    }

    /// Match address-book contacts. Phones and emails travel comma-joined.
    pub fn find_friends_by_phone_or_email(
        &self,
        phones: &[&str],
        emails: &[&str],
    ) -> Result<ApiCall<FriendInvitesResultParser>> {
        let mut params = Params::new();
        params
            .push("p", Some(phones.join(",")))
            .push("e", Some(emails.join(",")));
        self.build(
            HttpMethod::Post,
            "/findfriends/byphoneoremail",
            params,
            FriendInvitesResultParser,
        )
    }

    pub fn invite_by_email(&self, emails: &[&str]) -> Result<ApiCall<ResponseParser>> {
        let mut params = Params::new();
        params.push("email", Some(emails.join(",")));
        self.build(HttpMethod::Post, "/invite/byemail", params, ResponseParser)
    }

    /// `uid: None` changes the authenticated user's own setting.
    pub fn set_pings(&self, uid: Option<&str>, setting: PingSetting) -> Result<ApiCall<SettingsParser>> {
        let mut params = Params::new();
        params.push_str(uid.unwrap_or("self"), Some(setting.as_str()));
        self.build(HttpMethod::Post, "/settings/setpings", params, SettingsParser)
    }

    // -----------------------------------------------------------------------
    // Checkins
    // -----------------------------------------------------------------------

    /// Recent checkins of the user's friends.
    pub fn checkins(&self, location: Option<&Location>) -> Result<ApiCall<GroupParser<CheckinParser>>> {
        let mut params = Params::new();
        push_location(&mut params, location);
        self.build(HttpMethod::Get, "/checkins", params, GroupParser::new(CheckinParser))
    }

    pub fn checkin(&self, request: &CheckinRequest) -> Result<ApiCall<CheckinResultParser>> {
        let mut params = Params::new();
        params
            .push_str("vid", request.venue_id.as_deref())
            .push_str("venue", request.venue_name.as_deref())
            .push_str("shout", request.shout.as_deref())
            .push_flag("private", request.private)
            .push_flag("followers", request.tell_followers)
            .push_flag("twitter", request.twitter)
            .push_flag("facebook", request.facebook);
        push_location(&mut params, request.location.as_ref());
        self.build(HttpMethod::Post, "/checkin", params, CheckinResultParser)
    }

    pub fn history(&self, limit: Option<u32>, since_id: Option<&str>) -> Result<ApiCall<GroupParser<CheckinParser>>> {
        let mut params = Params::new();
        params.push_num("l", limit).push_str("sinceid", since_id);
        self.build(HttpMethod::Get, "/history", params, GroupParser::new(CheckinParser))
    }

    // -----------------------------------------------------------------------
    // Venues
    // -----------------------------------------------------------------------

    /// Venues near `location`, grouped by proximity tier.
    pub fn venues(
        &self,
        location: &Location,
        query: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ApiCall<GroupParser<GroupParser<VenueParser>>>> {
        let mut params = Params::new();
        push_location(&mut params, Some(location));
        params.push_str("q", query).push_num("l", limit);
        self.build(
            HttpMethod::Get,
            "/venues",
            params,
            GroupParser::new(GroupParser::new(VenueParser)),
        )
    }

    pub fn venue(&self, venue_id: &str, location: Option<&Location>) -> Result<ApiCall<VenueParser>> {
        let mut params = single("vid", venue_id);
        push_location(&mut params, location);
        self.build(HttpMethod::Get, "/venue", params, VenueParser)
    }

    pub fn add_venue(&self, draft: &VenueDraft, location: Option<&Location>) -> Result<ApiCall<VenueParser>> {
        let mut params = Params::new();
        push_venue_draft(&mut params, draft);
        push_location(&mut params, location);
        self.build(HttpMethod::Post, "/addvenue", params, VenueParser)
    }

    pub fn propose_edit(
        &self,
        venue_id: &str,
        draft: &VenueDraft,
        location: Option<&Location>,
    ) -> Result<ApiCall<ResponseParser>> {
        let mut params = single("vid", venue_id);
        push_venue_draft(&mut params, draft);
        push_location(&mut params, location);
        self.build(HttpMethod::Post, "/venue/proposeedit", params, ResponseParser)
    }

    pub fn flag_closed(&self, venue_id: &str) -> Result<ApiCall<ResponseParser>> {
        self.build(HttpMethod::Post, "/venue/flagclosed", single("vid", venue_id), ResponseParser)
    }

    pub fn flag_mislocated(&self, venue_id: &str) -> Result<ApiCall<ResponseParser>> {
        self.build(
            HttpMethod::Post,
            "/venue/flagmislocated",
            single("vid", venue_id),
            ResponseParser,
        )
    }

    pub fn flag_duplicate(&self, venue_id: &str) -> Result<ApiCall<ResponseParser>> {
        self.build(
            HttpMethod::Post,
            "/venue/flagduplicate",
            single("vid", venue_id),
            ResponseParser,
        )
    }

    /// The full category tree; children sit under each node's `categories`.
    pub fn categories(&self) -> Result<ApiCall<GroupParser<CategoryParser>>> {
        self.build(
            HttpMethod::Get,
            "/categories",
            Params::new(),
            GroupParser::new(CategoryParser),
        )
    }

    // -----------------------------------------------------------------------
    // Tips and todos
    // -----------------------------------------------------------------------

    pub fn tips(
        &self,
        location: Option<&Location>,
        uid: Option<&str>,
        filter: Option<&str>,
        sort: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ApiCall<GroupParser<TipParser>>> {
        let mut params = Params::new();
        push_location(&mut params, location);
        params
            .push_str("uid", uid)
            .push_str("filter", filter)
            .push_str("sort", sort)
            .push_num("l", limit);
        self.build(HttpMethod::Get, "/tips", params, GroupParser::new(TipParser))
    }

    pub fn tip_detail(&self, tip_id: &str) -> Result<ApiCall<TipParser>> {
        self.build(HttpMethod::Get, "/tip/detail", single("tid", tip_id), TipParser)
    }

    /// `kind` is `tip` or `todo`.
    pub fn add_tip(
        &self,
        venue_id: &str,
        text: &str,
        kind: Option<&str>,
        location: Option<&Location>,
    ) -> Result<ApiCall<TipParser>> {
        let mut params = single("vid", venue_id);
        params.push_str("text", Some(text)).push_str("type", kind);
        push_location(&mut params, location);
        self.build(HttpMethod::Post, "/addtip", params, TipParser)
    }

    pub fn todos(
        &self,
        uid: Option<&str>,
        location: Option<&Location>,
        sort: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ApiCall<GroupParser<TodoParser>>> {
        let mut params = Params::new();
        params.push_str("uid", uid);
        push_location(&mut params, location);
        params.push_str("sort", sort).push_num("l", limit);
        self.build(HttpMethod::Get, "/todos", params, GroupParser::new(TodoParser))
    }

    pub fn mark_todo(&self, tip_id: &str) -> Result<ApiCall<TodoParser>> {
        self.build(HttpMethod::Post, "/mark/todo", single("tid", tip_id), TodoParser)
    }

    pub fn mark_ignore(&self, tip_id: &str) -> Result<ApiCall<TipParser>> {
        self.build(HttpMethod::Post, "/mark/ignore", single("tid", tip_id), TipParser)
    }

    pub fn mark_done(&self, tip_id: &str) -> Result<ApiCall<TipParser>> {
        self.build(HttpMethod::Post, "/mark/done", single("tid", tip_id), TipParser)
    }

    pub fn unmark_todo(&self, tip_id: &str) -> Result<ApiCall<TipParser>> {
        self.build(HttpMethod::Post, "/unmark/todo", single("tid", tip_id), TipParser)
    }

    pub fn unmark_done(&self, tip_id: &str) -> Result<ApiCall<TipParser>> {
        self.build(HttpMethod::Post, "/unmark/done", single("tid", tip_id), TipParser)
    }

    // -----------------------------------------------------------------------
    // Cities
    // -----------------------------------------------------------------------

    pub fn cities(&self) -> Result<ApiCall<GroupParser<CityParser>>> {
        self.build(HttpMethod::Get, "/cities", Params::new(), GroupParser::new(CityParser))
    }

    /// The supported city closest to `location`.
    pub fn check_city(&self, location: &Location) -> Result<ApiCall<CityParser>> {
        let mut params = Params::new();
        push_location(&mut params, Some(location));
        self.build(HttpMethod::Get, "/checkcity", params, CityParser)
    }

    pub fn switch_city(&self, city_id: &str) -> Result<ApiCall<ResponseParser>> {
        self.build(HttpMethod::Post, "/switchcity", single("cityid", city_id), ResponseParser)
    }
}
