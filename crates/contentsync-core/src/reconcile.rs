//! Collection reconciliation
//!
//! Makes a collection's document set equal to the produced set: produced
//! documents are created or overwritten, existing documents that were not
//! produced are deleted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use contentsync_fs::{DocumentContent, DocumentStore, NormalizedPath};

use crate::config::Binding;
use crate::transform::LocalDocument;
use crate::{Error, Result};

/// What to do when two entries of one binding produce the same basename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Keep the later entry's document and log a warning
    #[default]
    LastWriteWins,
    /// Abort the binding before anything is written or deleted
    Error,
}

/// Reconciliation behavior, the `[reconcile]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    #[serde(default)]
    pub on_collision: CollisionPolicy,
    /// Skip rewriting documents whose stored text already matches
    #[serde(default)]
    pub skip_unchanged: bool,
}

/// How a produced document changes the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    /// No file yet: placeholder first, then the document
    Create,
    Update,
    /// Stored text already matches; rewritten unless `skip_unchanged`
    Unchanged,
}

/// One produced document and its effect.
#[derive(Debug, Clone)]
pub struct PlannedWrite {
    pub path: NormalizedPath,
    pub entry_id: String,
    pub action: WriteAction,
    pub content: DocumentContent,
    /// Rendered text about to be written
    pub text: String,
    /// Text currently stored, if any
    pub existing: Option<String>,
}

/// Everything one reconciliation pass would do.
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    pub collection: NormalizedPath,
    pub writes: Vec<PlannedWrite>,
    pub deletes: Vec<NormalizedPath>,
    pub warnings: Vec<String>,
}

impl ReconcilePlan {
    /// Compute what reconciling `produced` into the binding's collection
    /// would do, without touching the store.
    pub fn build(
        store: &dyn DocumentStore,
        binding: &Binding,
        produced: Vec<LocalDocument>,
        options: ReconcileOptions,
    ) -> Result<Self> {
        let collection = binding.collection();
        let existing = store.list_document_paths(&collection)?;

        let mut plan = ReconcilePlan {
            collection: collection.clone(),
            ..ReconcilePlan::default()
        };
        let mut by_path: HashMap<NormalizedPath, usize> = HashMap::new();

        for document in produced {
            let path = collection.join(&document.basename);
            let content = document.to_content();
            let text = content.render(&path)?;
            let existing_text = store.read_text(&path)?;
            let action = match &existing_text {
                None => WriteAction::Create,
                Some(current) if *current == text => WriteAction::Unchanged,
                Some(_) => WriteAction::Update,
            };
            let write = PlannedWrite {
                path: path.clone(),
                entry_id: document.entry_id,
                action,
                content,
                text,
                existing: existing_text,
            };

            // Two entries, one basename
            match by_path.get(&path) {
                Some(&idx) => {
                    let collision = Error::BasenameCollision {
                        collection: collection.to_string(),
                        basename: document.basename,
                        first: plan.writes[idx].entry_id.clone(),
                        second: write.entry_id.clone(),
                    };
                    if options.on_collision == CollisionPolicy::Error {
                        return Err(collision);
                    }
                    tracing::warn!(collection = %collection, path = %path, "{}; keeping the later entry", collision);
                    plan.warnings.push(collision.to_string());
                    plan.writes[idx] = write;
                }
                None => {
                    by_path.insert(path, plan.writes.len());
                    plan.writes.push(write);
                }
            }
        }

        // Existing minus produced
        plan.deletes = existing
            .into_iter()
            .filter(|path| !by_path.contains_key(path))
            .collect();

        Ok(plan)
    }

    pub fn paths_with(&self, action: WriteAction) -> Vec<NormalizedPath> {
        self.writes
            .iter()
            .filter(|write| write.action == action)
            .map(|write| write.path.clone())
            .collect()
    }

    /// True when no document would change content.
    pub fn is_noop(&self) -> bool {
        self.deletes.is_empty()
            && self
                .writes
                .iter()
                .all(|write| write.action == WriteAction::Unchanged)
    }
}

/// Applies reconciliation plans to a [`DocumentStore`].
pub struct Reconciler<'s> {
    store: &'s mut dyn DocumentStore,
    options: ReconcileOptions,
}

impl<'s> Reconciler<'s> {
    pub fn new(store: &'s mut dyn DocumentStore, options: ReconcileOptions) -> Self {
        Self { store, options }
    }

    /// Carry out a plan: writes first, then deletes.
    ///
    /// A path without a file gets a placeholder before the document is
    /// written to it.
    pub fn apply(&mut self, plan: &ReconcilePlan) -> Result<()> {
        for write in &plan.writes {
            if write.action == WriteAction::Unchanged && self.options.skip_unchanged {
                tracing::debug!(path = %write.path, "Unchanged -> {}", write.path);
                continue;
            }
            if !self.store.file_exists(&write.path) {
                self.store.create_placeholder(&write.path)?;
            }
            self.store.write_document(&write.path, &write.content)?;
            tracing::info!(path = %write.path, entry_id = %write.entry_id, "Saved -> {}", write.path);
        }

        for path in &plan.deletes {
            self.store.delete_document(path)?;
            tracing::info!(path = %path, "Deleted -> {}", path);
        }
        Ok(())
    }

    /// Plan and apply in one step.
    pub fn reconcile(&mut self, binding: &Binding, produced: Vec<LocalDocument>) -> Result<ReconcilePlan> {
        let plan = ReconcilePlan::build(&*self.store, binding, produced, self.options)?;
        self.apply(&plan)?;
        Ok(plan)
    }
}
