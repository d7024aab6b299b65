//! Edit URL command implementation

use contentsync_core::edit_url::edit_url;
use contentsync_fs::{DocumentContent, DocumentStore, NormalizedPath};

use crate::context::Pod;
use crate::error::{CliError, Result};

/// Print the CMS edit URL of a synced document, or of the whole space.
pub fn run_edit_url(pod: &Pod, doc_path: Option<&str>) -> Result<()> {
    let space = pod.manifest.contentful.space.as_str();
    if space.trim().is_empty() {
        return Err(CliError::user("contentful.space is not configured"));
    }

    let Some(doc_path) = doc_path else {
        println!("{}", edit_url(space, None));
        return Ok(());
    };

    let path = NormalizedPath::new(format!("/{}", doc_path.trim_start_matches('/')));
    if pod.manifest.binding_for_document(path.as_str()).is_none() {
        return Err(CliError::user(format!(
            "{path} is not inside a bound collection"
        )));
    }

    let content = match pod.store().read_text(&path)? {
        Some(text) => Some(DocumentContent::parse(&path, &text)?),
        None => None,
    };
    println!("{}", edit_url(space, Some((&path, content.as_ref()))));
    Ok(())
}
