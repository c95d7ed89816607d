//! Verify request building and the response pipeline against the JSON
//! vectors stored in `test-vectors/`.
//!
//! Request params are compared after form-decoding, so the vectors stay
//! readable and independent of percent-encoding choices.

use foursquare_core::parsers::JsonObject;
use foursquare_core::{
    parse_response, AuthStrategy, CheckinRequest, Error, FoursquareClient, HttpMethod, HttpRequest,
    HttpResponse, Location, ParseError, Params, Parser,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> FoursquareClient {
    FoursquareClient::new(BASE_URL, AuthStrategy::basic("jane", "pw"))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn str_arg<'a>(args: &'a Value, key: &str) -> &'a str {
    args[key].as_str().unwrap()
}

fn location_arg(args: &Value) -> Option<Location> {
    Some(Location::new(args["lat"].as_f64()?, args["long"].as_f64()?))
}

fn str_list(args: &Value, key: &str) -> Vec<String> {
    args[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

/// Build the request a vector describes.
fn build(c: &FoursquareClient, operation: &str, args: &Value) -> HttpRequest {
    match operation {
        "venues" => {
            let location = location_arg(args).unwrap();
            let limit = args["l"].as_u64().map(|l| l as u32);
            c.venues(&location, args["q"].as_str(), limit).unwrap().into_request()
        }
        "venue" => c.venue(str_arg(args, "vid"), location_arg(args).as_ref()).unwrap().into_request(),
        "categories" => c.categories().unwrap().into_request(),
        "flag_closed" => c.flag_closed(str_arg(args, "vid")).unwrap().into_request(),
        "mark_todo" => c.mark_todo(str_arg(args, "tid")).unwrap().into_request(),
        "friend_approve" => c.friend_approve(str_arg(args, "uid")).unwrap().into_request(),
        "find_friends_by_phone_or_email" => {
            let phones = str_list(args, "phones");
            let emails = str_list(args, "emails");
            let phones: Vec<&str> = phones.iter().map(String::as_str).collect();
            let emails: Vec<&str> = emails.iter().map(String::as_str).collect();
            c.find_friends_by_phone_or_email(&phones, &emails).unwrap().into_request()
        }
        "checkin" => {
            let request = CheckinRequest {
                venue_id: args["vid"].as_str().map(str::to_string),
                shout: args["shout"].as_str().map(str::to_string),
                private: args["private"].as_bool().unwrap_or(false),
                twitter: args["twitter"].as_bool().unwrap_or(false),
                location: location_arg(args),
                ..CheckinRequest::default()
            };
            c.checkin(&request).unwrap().into_request()
        }
        "history" => {
            let limit = args["l"].as_u64().map(|l| l as u32);
            c.history(limit, args["sinceid"].as_str()).unwrap().into_request()
        }
        "switch_city" => c.switch_city(str_arg(args, "cityid")).unwrap().into_request(),
        other => panic!("no builder for operation {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(&c, case["operation"].as_str().unwrap(), &case["args"]);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.headers, string_pairs(&expected["headers"]), "{name}: headers");

        let expected_params = string_pairs(&expected["params"]);
        let expected_url = expected["url"].as_str().unwrap();
        let sent_params = match req.method {
            HttpMethod::Get => {
                assert!(req.body.is_none(), "{name}: GET must not carry a body");
                match req.url.split_once('?') {
                    Some((url, query)) => {
                        assert_eq!(url, expected_url, "{name}: url");
                        Params::decode(query)
                    }
                    None => {
                        assert_eq!(req.url, expected_url, "{name}: url");
                        Vec::new()
                    }
                }
            }
            _ => {
                assert_eq!(req.url, expected_url, "{name}: url");
                let body = String::from_utf8(req.body.clone().unwrap()).unwrap();
                Params::decode(&body)
            }
        };
        assert_eq!(sent_params, expected_params, "{name}: params");
    }
}

/// Hands back the unwrapped payload untouched.
struct RawParser;

impl Parser for RawParser {
    type Output = Value;

    fn name(&self) -> &'static str {
        "raw"
    }

    fn parse_object(&self, json: &JsonObject) -> Result<Value, ParseError> {
        Ok(Value::Object(json.clone()))
    }

    fn parse_array(&self, json: &[Value]) -> Result<Value, ParseError> {
        Ok(Value::Array(json.to_vec()))
    }
}

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected"];
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let result = parse_response(&RawParser, response);

        if let Some(payload) = expected.get("payload") {
            assert_eq!(&result.unwrap(), payload, "{name}: payload");
            continue;
        }

        let err = result.unwrap_err();
        match (expected["error"].as_str().unwrap(), err) {
            ("api", Error::Api(api)) => {
                assert_eq!(api.message, expected["message"].as_str().unwrap(), "{name}: message");
                assert_eq!(api.kind.as_deref(), expected["kind"].as_str(), "{name}: kind");
                assert_eq!(api.code, expected["code"].as_i64(), "{name}: code");
            }
            ("credentials", Error::Credentials(_)) => {}
            ("rate_limited", Error::RateLimited(_)) => {}
            ("not_found", Error::NotFound) => {}
            ("malformed", Error::MalformedResponse(_)) => {}
            ("http", Error::Http { status, .. }) => {
                assert_eq!(u64::from(status), expected["status"].as_u64().unwrap(), "{name}: status");
            }
            (kind, other) => panic!("{name}: expected {kind} error, got {other:?}"),
        }
    }
}
