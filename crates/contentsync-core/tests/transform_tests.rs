//! Tests for entry transformation, link representation and localization

use contentsync_core::model::Link;
use contentsync_core::resolver::Resolver;
use contentsync_core::{
    Error, FieldValue, LocaleNormalizer, LocaleRewriteRule, MemorySource, Resolved, Result, Transformer,
    VariationConfig,
};
use contentsync_test_utils::{AssetBuilder, EntryBuilder};
use serde_yaml::{Mapping, Value};

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).expect("test YAML should parse")
}

fn localized_post() -> contentsync_core::RemoteEntry {
    EntryBuilder::new("e1", "post")
        .field("title", "Hello")
        .localized("title", "de", "Hallo")
        .field("slug", "hello")
        .localized("slug", "de", "hallo")
        .field("body", "text")
        .build()
}

mod localization_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_renamed_and_tagged() {
        let source = MemorySource::new();
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&source, &normalizer, &[], None);

        let doc = transformer.transform(&localized_post(), None).expect("Should transform");

        assert_eq!(doc.basename, "e1.yaml");
        assert_eq!(doc.entry_id, "e1");
        assert_eq!(
            doc.fields.keys().collect::<Vec<_>>(),
            vec![
                "body",
                "$slug",
                "$title",
                "$slug@de",
                "$title@de",
                "_content_type",
                "_id",
                "$localization",
            ]
        );
        assert_eq!(doc.fields.get("$title"), Some(&Value::from("Hello")));
        assert_eq!(doc.fields.get("$title@de"), Some(&Value::from("Hallo")));
        assert_eq!(doc.fields.get("_content_type"), Some(&Value::from("post")));
        assert_eq!(
            doc.fields.get("$localization"),
            Some(&yaml("locales: [de, en_US]"))
        );
    }

    #[test]
    fn test_single_locale_entry_has_no_localization() {
        let source = MemorySource::new();
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&source, &normalizer, &[], None);
        let entry = EntryBuilder::new("e2", "post")
            .field("title", "Only English")
            .localized("summary", "de", "Nur im Text")
            .build();

        let doc = transformer.transform(&entry, None).unwrap();

        assert_eq!(doc.fields.get("$title"), Some(&Value::from("Only English")));
        assert!(!doc.fields.contains_key("$localization"));
        assert!(!doc.fields.contains_key("summary"));
    }

    #[test]
    fn test_entry_without_title_is_not_localized() {
        let source = MemorySource::new();
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&source, &normalizer, &[], None);
        let entry = EntryBuilder::new("e3", "post")
            .field("summary", "English")
            .localized("summary", "de", "Deutsch")
            .build();

        let doc = transformer.transform(&entry, None).unwrap();

        assert!(!doc.fields.contains_key("summary@de"));
        assert!(!doc.fields.contains_key("$localization"));
    }

    #[test]
    fn test_rewrite_rules_apply_to_tags_and_locales() {
        let source = MemorySource::new();
        let normalizer = LocaleNormalizer::new(vec![LocaleRewriteRule::new("en_GB", "en")]);
        let transformer = Transformer::new(&source, &normalizer, &[], None);
        let entry = EntryBuilder::new("e4", "post")
            .field("title", "Color")
            .localized("title", "en-GB", "Colour")
            .field("category", "news")
            .localized("category", "en-GB", "news-uk")
            .build();

        let doc = transformer.transform(&entry, None).unwrap();

        assert_eq!(doc.fields.get("$title@en"), Some(&Value::from("Colour")));
        assert_eq!(doc.fields.get("$category"), Some(&Value::from("news")));
        assert_eq!(doc.fields.get("$category@en"), Some(&Value::from("news-uk")));
        assert_eq!(doc.fields.get("$localization"), Some(&yaml("locales: [en, en_US]")));
    }
}

mod representation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct BrokenResolver;

    impl Resolver for BrokenResolver {
        fn resolve(&self, _link: &Link) -> Result<Resolved> {
            Err(Error::transport("connection reset"))
        }
    }

    #[test]
    fn test_linked_entry_represented_inline() {
        let author = EntryBuilder::new("a1", "author")
            .field("name", "Ann")
            .field("related", Link::entry("e1"))
            .field("friend", Link::entry("a2"))
            .build();
        let source = MemorySource::new().with_entry(author);
        let normalizer = LocaleNormalizer::default();
        let skip = vec!["related".to_string()];
        let transformer = Transformer::new(&source, &normalizer, &skip, None);
        let entry = EntryBuilder::new("e1", "post")
            .field("author", Link::entry("a1"))
            .build();

        let doc = transformer.transform(&entry, None).unwrap();

        assert_eq!(
            doc.fields.get("author"),
            Some(&yaml(
                r#"
friend:
  sys: {type: Link, linkType: Entry, id: a2}
name: Ann
_content_type: author
_id: a1
"#
            ))
        );
    }

    #[test]
    fn test_materialized_entry_not_resolved_again() {
        let related = EntryBuilder::new("r1", "post")
            .field("title", "Related")
            .localized("title", "de", "Verwandt")
            .build();
        let source = MemorySource::new();
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&source, &normalizer, &[], None);
        let entry = EntryBuilder::new("e1", "post")
            .field("related", FieldValue::List(vec![FieldValue::Entry(Box::new(related))]))
            .build();

        let doc = transformer.transform(&entry, None).unwrap();

        let related = &doc.fields.get("related").unwrap()[0];
        assert_eq!(related["title"], Value::from("Related"));
        assert_eq!(related["title@de"], Value::from("Verwandt"));
        assert_eq!(related["_id"], Value::from("r1"));
        assert_eq!(doc.fields.get("$localization"), Some(&yaml("locales: [de, en_US]")));
    }

    #[test]
    fn test_linked_entry_locales_reach_top_level() {
        let author = EntryBuilder::new("a1", "author")
            .field("title", "Ann")
            .localized("title", "de", "Anna")
            .build();
        let source = MemorySource::new().with_entry(author);
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&source, &normalizer, &[], None);
        let entry = EntryBuilder::new("e1", "post")
            .field("title", "Post")
            .field("author", Link::entry("a1"))
            .build();

        let doc = transformer.transform(&entry, None).unwrap();

        assert_eq!(doc.fields.get("author").unwrap()["title@de"], Value::from("Anna"));
        assert!(!doc.fields.contains_key("$title@de"));
        assert_eq!(doc.fields.get("$localization"), Some(&yaml("locales: [de, en_US]")));
    }

    #[test]
    fn test_asset_locales_reach_top_level() {
        let asset = AssetBuilder::new("img1", "//images.example/x.png")
            .field("title", "Pic")
            .localized("title", "fr-CA", "Image")
            .build();
        let source = MemorySource::new().with_asset(asset);
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&source, &normalizer, &[], None);
        let entry = EntryBuilder::new("e1", "post")
            .field("hero", Link::asset("img1"))
            .build();

        let doc = transformer.transform(&entry, None).unwrap();

        assert_eq!(doc.fields.get("$localization"), Some(&yaml("locales: [en_US, fr_CA]")));
    }

    #[test]
    fn test_asset_link_represented_with_fields() {
        let asset = AssetBuilder::new("img1", "//images.example/x.png")
            .field("title", "Pic")
            .build();
        let source = MemorySource::new().with_asset(asset);
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&source, &normalizer, &[], None);
        let entry = EntryBuilder::new("e1", "post")
            .field("hero", Link::asset("img1"))
            .build();

        let doc = transformer.transform(&entry, None).unwrap();

        assert_eq!(
            doc.fields.get("hero"),
            Some(&yaml("file: {url: //images.example/x.png}\ntitle: Pic\n"))
        );
    }

    #[test]
    fn test_missing_link_becomes_empty_mapping() {
        let source = MemorySource::new();
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&source, &normalizer, &[], None);
        let entry = EntryBuilder::new("e1", "post")
            .field("hero", Link::asset("gone"))
            .field("title", "Still here")
            .build();
        let mut warnings = Vec::new();

        let doc = transformer
            .transform_collecting(&entry, None, &mut warnings)
            .expect("Missing links should not fail the entry");

        assert_eq!(doc.fields.get("hero"), Some(&Value::Mapping(Mapping::new())));
        assert_eq!(doc.fields.get("$title"), Some(&Value::from("Still here")));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("gone"), "warning: {}", warnings[0]);
    }

    #[test]
    fn test_transport_failure_propagates() {
        let resolver = BrokenResolver;
        let normalizer = LocaleNormalizer::default();
        let transformer = Transformer::new(&resolver, &normalizer, &[], None);
        let entry = EntryBuilder::new("e1", "post")
            .field("author", Link::entry("a1"))
            .build();

        let err = transformer.transform(&entry, None).expect_err("Should propagate");
        assert!(matches!(err, Error::Transport { .. }));
    }
}

mod key_and_variation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn transform_with(
        entry: &contentsync_core::RemoteEntry,
        key_field: Option<&str>,
        variation: Option<&VariationConfig>,
        warnings: &mut Vec<String>,
    ) -> contentsync_core::LocalDocument {
        let source = MemorySource::new();
        let normalizer = LocaleNormalizer::default();
        Transformer::new(&source, &normalizer, &[], variation)
            .transform_collecting(entry, key_field, warnings)
            .unwrap()
    }

    #[test]
    fn test_key_field_names_document() {
        let entry = EntryBuilder::new("e1", "post").field("slug", "hello-world").build();
        let doc = transform_with(&entry, Some("slug"), None, &mut Vec::new());
        assert_eq!(doc.basename, "hello-world.yaml");
    }

    #[test]
    fn test_key_field_path_separators_replaced() {
        let entry = EntryBuilder::new("e1", "post").field("slug", "a/b\\c").build();
        let doc = transform_with(&entry, Some("slug"), None, &mut Vec::new());
        assert_eq!(doc.basename, "a-b-c.yaml");
    }

    #[test]
    fn test_reserved_key_falls_back_to_id() {
        for slug in ["_draft", ".hidden"] {
            let entry = EntryBuilder::new("e1", "post").field("slug", slug).build();
            let mut warnings = Vec::new();
            let doc = transform_with(&entry, Some("slug"), None, &mut warnings);
            assert_eq!(doc.basename, "e1.yaml");
            assert_eq!(doc.fields.get("$slug"), Some(&Value::from(slug)));
            assert_eq!(warnings.len(), 1, "slug {slug}");
        }
    }

    #[test]
    fn test_reserved_entry_id_is_prefixed() {
        let entry = EntryBuilder::new("_e1", "post").field("title", "T").build();
        let doc = transform_with(&entry, None, None, &mut Vec::new());
        assert_eq!(doc.basename, "-_e1.yaml");
        assert!(contentsync_fs::is_document_name(&doc.basename));
    }

    #[test]
    fn test_missing_key_field_falls_back_to_id() {
        let entry = EntryBuilder::new("e1", "post").field("title", "T").build();
        let mut warnings = Vec::new();
        let doc = transform_with(&entry, Some("slug"), None, &mut warnings);
        assert_eq!(doc.basename, "e1.yaml");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_non_scalar_key_field_warns() {
        let entry = EntryBuilder::new("e1", "post")
            .field("slug", FieldValue::List(vec![FieldValue::from("x")]))
            .build();
        let mut warnings = Vec::new();
        let doc = transform_with(&entry, Some("slug"), None, &mut warnings);
        assert_eq!(doc.basename, "e1.yaml");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_variation_split_sets_path() {
        let config = VariationConfig::new("/pages/{variation}/");
        let entry = EntryBuilder::new("e1", "page").field("slug", "about--b").build();
        let mut warnings = Vec::new();

        let doc = transform_with(&entry, None, Some(&config), &mut warnings);

        assert_eq!(doc.fields.get("$slug"), Some(&Value::from("about")));
        assert_eq!(doc.fields.get("$path"), Some(&Value::from("/pages/b/")));
        assert!(!doc.fields.contains_key("slug"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_value_without_separator_left_alone() {
        let config = VariationConfig::new("/pages/{variation}/");
        let entry = EntryBuilder::new("e1", "page").field("slug", "about").build();

        let doc = transform_with(&entry, None, Some(&config), &mut Vec::new());

        assert_eq!(doc.fields.get("$slug"), Some(&Value::from("about")));
        assert!(!doc.fields.contains_key("$path"));
    }

    #[test]
    fn test_repeated_separator_splits_on_first_and_warns() {
        let config = VariationConfig::new("/pages/{variation}/");
        let entry = EntryBuilder::new("e1", "page").field("slug", "a--b--c").build();
        let mut warnings = Vec::new();

        let doc = transform_with(&entry, None, Some(&config), &mut warnings);

        assert_eq!(doc.fields.get("$slug"), Some(&Value::from("a")));
        assert_eq!(doc.fields.get("$path"), Some(&Value::from("/pages/b--c/")));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_body_field_extracted_to_markdown() {
        let entry = EntryBuilder::new("p1", "page")
            .field("title", "About")
            .field("body", "# About us\n")
            .build();

        let doc = transform_with(&entry, None, None, &mut Vec::new()).extract_body("body");
        let content = doc.to_content();

        assert_eq!(doc.basename, "p1.md");
        assert_eq!(content.body.as_deref(), Some("# About us\n"));
        assert!(content.fields.get("body").is_none());
        assert_eq!(content.fields.get("$title"), Some(&Value::from("About")));
    }
}
