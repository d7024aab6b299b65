//! End-to-end tests for the sync pipeline
//!
//! Config loading -> Delivery API client (against a mock server) -> entry
//! transformation -> reconciliation on disk.

use contentsync_client::ContentfulClient;
use contentsync_core::{ConfigResolver, Manifest, SyncEngine, SyncOptions, SyncReport};
use contentsync_fs::{DocumentContent, NormalizedPath};
use contentsync_test_utils::TestPod;
use httpmock::prelude::*;
use httpmock::Mock;
use pretty_assertions::assert_eq;
use serde_yaml::Value;

const CONFIG: &str = include_str!("../../../test-fixtures/contentful/contentsync.toml");
const POSTS: &str = include_str!("../../../test-fixtures/contentful/posts.json");
const POSTS_UNPUBLISHED: &str = include_str!("../../../test-fixtures/contentful/posts_unpublished.json");
const ENTRIES_PATH: &str = "/spaces/sp4ce/environments/master/entries";

fn serve<'a>(server: &'a MockServer, body: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(ENTRIES_PATH)
            .query_param("content_type", "post")
            .query_param("locale", "*")
            .header("authorization", "Bearer secret");
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}

fn setup_pod() -> TestPod {
    let pod = TestPod::new();
    pod.write_config(CONFIG);
    pod.write_file("content/posts/_blueprint.yaml", "$path: /posts/{base}/\n");
    pod
}

fn load_manifest(pod: &TestPod) -> Manifest {
    ConfigResolver::new(NormalizedPath::from(pod.root()))
        .resolve()
        .expect("fixture config should resolve")
}

fn sync(pod: &TestPod, server: &MockServer) -> SyncReport {
    let manifest = load_manifest(pod);
    let client = ContentfulClient::with_host(&manifest.contentful, &manifest.default_locale, &server.base_url())
        .unwrap();
    let mut engine = SyncEngine::new(manifest, Box::new(client), Box::new(pod.store()));
    engine.run(&SyncOptions::default()).expect("sync should run")
}

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_first_sync_writes_transformed_documents() {
    let server = MockServer::start();
    let mock = serve(&server, POSTS);
    let pod = setup_pod();

    let report = sync(&pod, &server);

    mock.assert();
    assert!(report.success());
    let posts = &report.bindings[0];
    assert_eq!(
        posts.created,
        vec!["/content/posts/hello.md", "/content/posts/second--beta.yaml"]
    );
    assert_eq!(posts.warnings.len(), 1, "warnings: {:?}", posts.warnings);

    let path = NormalizedPath::new("/content/posts/hello.md");
    let hello = DocumentContent::parse(&path, &pod.read_file("content/posts/hello.md")).unwrap();
    assert_eq!(hello.body.as_deref(), Some("Intro paragraph.\n"));
    let fields = Value::Mapping(hello.fields);
    assert_eq!(fields["$title"], "Hello");
    assert_eq!(fields["$title@de"], "Hallo");
    assert_eq!(fields["$title@en"], "Hello UK");
    assert_eq!(fields["$slug"], "hello");
    assert_eq!(fields["$slug@de"], "hallo");
    assert_eq!(fields["_id"], "e1");
    assert_eq!(fields["_content_type"], "post");
    assert_eq!(
        fields["author"],
        yaml("{name: Ann, _content_type: author, _id: a1}")
    );
    assert_eq!(
        fields["hero"],
        yaml("{file: {contentType: image/png, url: //images.ctfassets.net/sp4ce/img1/cover.png}, title: Cover}")
    );
    assert_eq!(fields["related"], yaml("{}"));
    assert_eq!(fields["$localization"], yaml("locales: [de, en, en_US]"));
    assert!(fields.get("body").is_none());

    let second = pod.read_yaml("content/posts/second--beta.yaml");
    assert_eq!(second["$slug"], "second");
    assert_eq!(second["$path"], "/beta/beta/");
    assert!(second.get("$localization").is_none());
}

#[test]
fn test_resync_is_stable() {
    let server = MockServer::start();
    let _mock = serve(&server, POSTS);
    let pod = setup_pod();

    sync(&pod, &server);
    let before = pod.read_file("content/posts/hello.md");
    let report = sync(&pod, &server);

    let posts = &report.bindings[0];
    assert!(posts.created.is_empty());
    assert!(posts.updated.is_empty());
    assert!(posts.deleted.is_empty());
    assert_eq!(posts.unchanged.len(), 2);
    assert_eq!(pod.read_file("content/posts/hello.md"), before);
}

#[test]
fn test_unpublished_entry_is_deleted() {
    let server = MockServer::start();
    let mut mock = serve(&server, POSTS);
    let pod = setup_pod();
    pod.write_file("content/posts/notes.txt", "kept");

    sync(&pod, &server);
    pod.assert_file_exists("content/posts/second--beta.yaml");

    mock.delete();
    let _mock = serve(&server, POSTS_UNPUBLISHED);
    let report = sync(&pod, &server);

    assert_eq!(
        report.bindings[0].deleted,
        vec!["/content/posts/second--beta.yaml"]
    );
    pod.assert_file_missing("content/posts/second--beta.yaml");
    pod.assert_file_exists("content/posts/hello.md");
    pod.assert_file_exists("content/posts/_blueprint.yaml");
    pod.assert_file_exists("content/posts/notes.txt");
}

#[test]
fn test_failed_fetch_keeps_collection() {
    let server = MockServer::start();
    let mut mock = serve(&server, POSTS);
    let pod = setup_pod();
    sync(&pod, &server);

    mock.delete();
    server.mock(|when, then| {
        when.method(GET).path(ENTRIES_PATH);
        then.status(500);
    });
    let report = sync(&pod, &server);

    assert!(!report.success());
    pod.assert_file_exists("content/posts/hello.md");
    pod.assert_file_exists("content/posts/second--beta.yaml");
}
