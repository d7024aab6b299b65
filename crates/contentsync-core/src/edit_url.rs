//! Links into the CMS web app for editing synced content

use serde_yaml::Value;

use contentsync_fs::{DocumentContent, NormalizedPath};

use crate::represent::ID_KEY;

const EDIT_ENTRY_URL: &str = "https://app.contentful.com/spaces/{space}/entries/{entry}";
const EDIT_SPACE_URL: &str = "https://app.contentful.com/spaces/{space}/entries";

pub fn entry_edit_url(space: &str, entry_id: &str) -> String {
    EDIT_ENTRY_URL
        .replace("{space}", space)
        .replace("{entry}", entry_id)
}

pub fn space_edit_url(space: &str) -> String {
    EDIT_SPACE_URL.replace("{space}", space)
}

/// Entry id behind a synced document: its `_id` field, or the file stem
/// for documents keyed by entry id.
pub fn document_entry_id(path: &NormalizedPath, content: Option<&DocumentContent>) -> Option<String> {
    let stamped = content
        .and_then(|content| content.fields.get(ID_KEY))
        .and_then(Value::as_str)
        .map(str::to_string);
    stamped.or_else(|| path.file_stem().map(str::to_string))
}

/// Edit URL for a document, or for the whole space without one.
pub fn edit_url(space: &str, document: Option<(&NormalizedPath, Option<&DocumentContent>)>) -> String {
    match document.and_then(|(path, content)| document_entry_id(path, content)) {
        Some(entry_id) => entry_edit_url(space, &entry_id),
        None => space_edit_url(space),
    }
}
