//! Tests for the Delivery API client against a mock server

use contentsync_client::ContentfulClient;
use contentsync_core::{ContentfulSection, Error, EntrySource, FetchQuery, FieldValue, Link, Resolved, Resolver};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const ENTRIES_PATH: &str = "/spaces/sp4ce/environments/master/entries";

fn section(limit: u32) -> ContentfulSection {
    ContentfulSection {
        space: "sp4ce".into(),
        access_token: "secret".into(),
        limit,
        ..ContentfulSection::default()
    }
}

fn client(server: &MockServer, limit: u32) -> ContentfulClient {
    ContentfulClient::with_host(&section(limit), "en-US", &server.base_url()).unwrap()
}

fn entry(id: &str, content_type: &str, fields: Value) -> Value {
    json!({
        "sys": {
            "id": id,
            "type": "Entry",
            "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": content_type}},
        },
        "fields": fields,
    })
}

fn title(value: &str) -> Value {
    json!({"title": {"en-US": value}})
}

#[test]
fn test_fetch_follows_pagination() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path(ENTRIES_PATH)
            .query_param("content_type", "post")
            .query_param("locale", "*")
            .query_param("include", "2")
            .query_param("limit", "2")
            .query_param("skip", "0")
            .header("authorization", "Bearer secret");
        then.status(200).json_body(json!({
            "total": 3, "skip": 0, "limit": 2,
            "items": [entry("e1", "post", title("One")), entry("e2", "post", title("Two"))],
        }));
    });
    let second = server.mock(|when, then| {
        when.method(GET).path(ENTRIES_PATH).query_param("skip", "2");
        then.status(200).json_body(json!({
            "total": 3, "skip": 2, "limit": 2,
            "items": [entry("e3", "post", title("Three"))],
        }));
    });

    let entries = client(&server, 2)
        .fetch_entries(&FetchQuery::new("post", 2))
        .expect("Should fetch every page");

    first.assert();
    second.assert();
    let ids: Vec<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);
    assert_eq!(entries[2].raw_fields["title"]["en-US"], FieldValue::from("Three"));
}

#[test]
fn test_includes_are_materialized() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(ENTRIES_PATH);
        then.status(200).json_body(json!({
            "total": 1,
            "items": [entry("e1", "post", json!({
                "author": {"en-US": {"sys": {"type": "Link", "linkType": "Entry", "id": "a1"}}},
            }))],
            "includes": {"Entry": [entry("a1", "author", json!({"name": {"en-US": "Ann"}}))]},
        }));
    });

    let entries = client(&server, 100)
        .fetch_entries(&FetchQuery::new("post", 2))
        .unwrap();

    let FieldValue::Entry(author) = &entries[0].raw_fields["author"]["en-US"] else {
        panic!("author should be materialized from includes");
    };
    assert_eq!(author.raw_fields["name"]["en-US"], FieldValue::from("Ann"));
}

#[test]
fn test_server_error_is_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(ENTRIES_PATH);
        then.status(500).json_body(json!({"message": "Internal error"}));
    });

    let err = client(&server, 100)
        .fetch_entries(&FetchQuery::new("post", 2))
        .expect_err("Should fail");

    assert!(matches!(err, Error::Transport { .. }));
    assert!(err.to_string().contains("Internal error"), "{err}");
}

#[test]
fn test_resolve_fetches_missing_target_once() {
    let server = MockServer::start();
    let single = server.mock(|when, then| {
        when.method(GET)
            .path("/spaces/sp4ce/environments/master/entries/a1")
            .query_param("locale", "*");
        then.status(200)
            .json_body(entry("a1", "author", json!({"name": {"en-US": "Ann"}})));
    });
    let client = client(&server, 100);

    for _ in 0..2 {
        let Resolved::Entry(author) = client.resolve(&Link::entry("a1")).unwrap() else {
            panic!("should resolve to an entry");
        };
        assert_eq!(author.content_type, "author");
    }
    single.assert_hits(1);
}

#[test]
fn test_resolve_missing_target_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/spaces/sp4ce/environments/master/assets/gone");
        then.status(404).json_body(json!({"sys": {"type": "Error", "id": "NotFound"}}));
    });

    let err = client(&server, 100)
        .resolve(&Link::asset("gone"))
        .expect_err("Should not resolve");

    assert!(err.is_not_found());
}

#[test]
fn test_unresolvable_link_skips_request() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(ENTRIES_PATH);
        then.status(200).json_body(json!({
            "total": 0,
            "items": [],
            "errors": [{
                "sys": {"id": "notResolvable", "type": "error"},
                "details": {"type": "Link", "linkType": "Entry", "id": "gone"},
            }],
        }));
    });
    let single = server.mock(|when, then| {
        when.method(GET).path("/spaces/sp4ce/environments/master/entries/gone");
        then.status(200).json_body(entry("gone", "post", title("Ghost")));
    });
    let client = client(&server, 100);

    client.fetch_entries(&FetchQuery::new("post", 2)).unwrap();
    let err = client.resolve(&Link::entry("gone")).expect_err("Should be unresolvable");

    assert!(err.is_not_found());
    single.assert_hits(0);
}
