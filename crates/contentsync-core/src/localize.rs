//! Field localization tagging
//!
//! Non-default locale values are exploded into sibling keys
//! `{field}@{locale}` next to the default-locale value.

use std::collections::BTreeSet;

use crate::locale::LocaleNormalizer;
use crate::model::{FieldValue, Fields, LocalizedFields};

/// Field whose raw locale map decides which locales an entry has.
pub const LOCALE_DISCOVERY_FIELD: &str = "title";

/// Fields that become `$`-prefixed builtins on the top-level document.
pub const BUILTIN_FIELDS: [&str; 3] = ["title", "category", "slug"];

/// Normalized locales seen while tagging an entry and everything
/// represented inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleSet {
    locales: BTreeSet<String>,
    /// A value was tagged under a raw code other than its default locale
    non_default: bool,
}

impl LocaleSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_default(&mut self, locale: String) {
        self.locales.insert(locale);
    }

    fn record(&mut self, locale: String) {
        self.locales.insert(locale);
        self.non_default = true;
    }

    /// Whether any value was tagged for a non-default locale.
    ///
    /// Decided on raw codes, so a rewrite rule that maps a locale onto the
    /// normalized default still counts.
    pub fn has_non_default(&self) -> bool {
        self.non_default
    }

    /// Sorted, deduplicated normalized locales including the default.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.locales.iter().cloned().collect()
    }
}

/// Add `{field}@{locale}` keys to `fields` for every discovered locale.
///
/// Locales are discovered from the raw `title` map only: an entry counts as
/// localized into `L` iff its title has a value for `L`. Entries localized
/// on other fields but not on `title` are not tagged. This is a known
/// limitation kept for compatibility with existing collections.
///
/// With `tag_builtins`, the synthesized keys of `title`, `category` and
/// `slug` are prefixed with `$` so they match the builtin rename applied
/// later to the base key.
pub fn tag_localized_fields(
    fields: &mut Fields<FieldValue>,
    raw_fields: &LocalizedFields,
    default_locale: &str,
    tag_builtins: bool,
    normalizer: &LocaleNormalizer,
    locales: &mut LocaleSet,
) {
    locales.record_default(normalizer.normalize(default_locale));

    let Some(discovered) = raw_fields.get(LOCALE_DISCOVERY_FIELD) else {
        return;
    };

    let keys: Vec<String> = fields.keys().map(str::to_string).collect();
    for key in keys {
        let Some(per_locale) = raw_fields.get(&key) else {
            continue;
        };
        for locale in discovered.keys().filter(|l| l.as_str() != default_locale) {
            let Some(value) = per_locale.get(locale) else {
                continue;
            };
            let normalized = normalizer.normalize(locale);
            let tagged = if tag_builtins && BUILTIN_FIELDS.contains(&key.as_str()) {
                format!("${key}@{normalized}")
            } else {
                format!("{key}@{normalized}")
            };
            fields.insert(tagged, value.clone());
            locales.record(normalized);
        }
    }
}
