//! Tests for manifest parsing and layered config resolution

use contentsync_core::config::{ConfigResolver, Manifest};
use contentsync_core::{CollisionPolicy, Error};
use contentsync_fs::NormalizedPath;
use contentsync_test_utils::TestPod;
use rstest::rstest;

const BASE_CONFIG: &str = r#"
default_locale = "en-US"
skip_related_fields = ["related"]

[contentful]
space = "sp4ce"
access_token = ""

[[bind]]
collection = "/content/posts/"
content_type = "post"
key = "slug"

[[bind]]
collection = "/content/pages"
content_type = "page"
body_field = "body"

[[rewrite_locales]]
from = "en_GB"
to = "en"
"#;

mod manifest_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_manifest_parse_full() {
        let manifest = Manifest::parse(BASE_CONFIG).expect("Should parse valid TOML");

        assert_eq!(manifest.contentful.space, "sp4ce");
        assert_eq!(manifest.skip_related_fields, vec!["related"]);
        assert_eq!(manifest.bindings.len(), 2);
        assert_eq!(manifest.bindings[0].key_field.as_deref(), Some("slug"));
        assert_eq!(manifest.bindings[1].body_field.as_deref(), Some("body"));
        assert_eq!(manifest.normalizer().normalize("en-GB"), "en");
        assert_eq!(manifest.reconcile.on_collision, CollisionPolicy::LastWriteWins);
        assert!(!manifest.reconcile.skip_unchanged);
    }

    #[test]
    fn test_manifest_parse_reconcile_section() {
        let manifest = Manifest::parse(
            r#"
[reconcile]
on_collision = "error"
skip_unchanged = true
"#,
        )
        .expect("Should parse reconcile section");

        assert_eq!(manifest.reconcile.on_collision, CollisionPolicy::Error);
        assert!(manifest.reconcile.skip_unchanged);
    }

    #[rstest]
    #[case::empty_content_type("[[bind]]\ncollection = \"/content/posts/\"\ncontent_type = \"\"\n")]
    #[case::empty_collection("[[bind]]\ncollection = \" \"\ncontent_type = \"post\"\n")]
    #[case::parent_segment("[[bind]]\ncollection = \"/content/../secrets/\"\ncontent_type = \"post\"\n")]
    #[case::empty_separator("[variation]\nseparator = \"\"\npath_template = \"/v/{variation}/\"\n")]
    #[case::template_without_placeholder("[variation]\npath_template = \"/v/\"\n")]
    #[case::empty_default_locale("default_locale = \"\"\n")]
    fn test_manifest_validation_rejects(#[case] content: &str) {
        let err = Manifest::parse(content).expect_err("Should reject invalid manifest");
        assert!(matches!(err, Error::InvalidConfig { .. }), "unexpected error: {err}");
    }

    #[test]
    fn test_manifest_parse_rejects_bad_toml() {
        let err = Manifest::parse("[[bind]\n").expect_err("Should reject malformed TOML");
        assert!(matches!(err, Error::TomlDe(_)));
    }

    #[test]
    fn test_validate_remote_requires_space_and_token() {
        let manifest = Manifest::parse(BASE_CONFIG).unwrap();
        assert!(manifest.validate_remote().is_err());

        let mut manifest = manifest;
        manifest.contentful.access_token = "token".into();
        assert!(manifest.validate_remote().is_ok());

        manifest.contentful.space.clear();
        assert!(manifest.validate_remote().is_err());
    }

    #[test]
    fn test_validate_remote_preview_token_only_counts_in_preview() {
        let mut manifest = Manifest::parse(BASE_CONFIG).unwrap();
        manifest.contentful.preview_access_token = Some("preview".into());
        assert!(manifest.validate_remote().is_err());
        assert_eq!(manifest.contentful.request_token(), "");

        manifest.contentful.preview = true;
        assert!(manifest.validate_remote().is_ok());
        assert_eq!(manifest.contentful.request_token(), "preview");
    }
}

mod binding_lookup_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case("/content/posts/", Some("post"))]
    #[case("/content/posts", Some("post"))]
    #[case("/content/pages/", Some("page"))]
    #[case("/content/other/", None)]
    fn test_binding_for_collection(#[case] collection: &str, #[case] expected: Option<&str>) {
        let manifest = Manifest::parse(BASE_CONFIG).unwrap();
        let found = manifest
            .binding_for_collection(collection)
            .map(|binding| binding.content_type.as_str());
        assert_eq!(found, expected);
    }

    #[rstest]
    #[case("/content/posts/hello.yaml", Some("post"))]
    #[case("/content/pages/about.md", Some("page"))]
    #[case("/content/postscript/x.yaml", None)]
    #[case("/content/x.yaml", None)]
    fn test_binding_for_document(#[case] path: &str, #[case] expected: Option<&str>) {
        let manifest = Manifest::parse(BASE_CONFIG).unwrap();
        let found = manifest
            .binding_for_document(path)
            .map(|binding| binding.content_type.as_str());
        assert_eq!(found, expected);
    }

    #[test]
    fn test_binding_for_document_prefers_deepest_collection() {
        let manifest = Manifest::parse(
            r#"
[[bind]]
collection = "/content/"
content_type = "any"

[[bind]]
collection = "/content/posts/"
content_type = "post"
"#,
        )
        .unwrap();

        let binding = manifest.binding_for_document("/content/posts/a.yaml").unwrap();
        assert_eq!(binding.content_type, "post");
    }
}

mod resolver_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver_for(pod: &TestPod) -> ConfigResolver {
        ConfigResolver::new(NormalizedPath::from(pod.root()))
    }

    #[test]
    fn test_resolve_missing_config() {
        let pod = TestPod::new();
        let resolver = resolver_for(&pod);

        assert!(!resolver.has_config());
        let err = resolver.resolve().expect_err("Should fail without contentsync.toml");
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_resolve_repository_config_only() {
        let pod = TestPod::new();
        pod.write_config(BASE_CONFIG);

        let manifest = resolver_for(&pod).resolve().expect("Should resolve");
        assert_eq!(manifest.contentful.space, "sp4ce");
        assert_eq!(manifest.contentful.access_token, "");
    }

    #[test]
    fn test_resolve_local_overrides_token() {
        let pod = TestPod::new();
        pod.write_config(BASE_CONFIG);
        pod.write_local_config("[contentful]\naccess_token = \"local-secret\"\n");

        let manifest = resolver_for(&pod).resolve().expect("Should resolve");

        assert_eq!(manifest.contentful.access_token, "local-secret");
        assert_eq!(manifest.contentful.space, "sp4ce");
        assert_eq!(manifest.bindings.len(), 2);
    }

    #[test]
    fn test_resolve_local_replaces_arrays() {
        let pod = TestPod::new();
        pod.write_config(BASE_CONFIG);
        pod.write_local_config(
            "[[bind]]\ncollection = \"/content/local/\"\ncontent_type = \"local\"\n",
        );

        let manifest = resolver_for(&pod).resolve().expect("Should resolve");

        assert_eq!(manifest.bindings.len(), 1);
        assert_eq!(manifest.bindings[0].content_type, "local");
    }

    #[test]
    fn test_resolve_validates_merged_result() {
        let pod = TestPod::new();
        pod.write_config(BASE_CONFIG);
        pod.write_local_config("default_locale = \"\"\n");

        let err = resolver_for(&pod).resolve().expect_err("Should reject merged config");
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}
