//! SyncEngine implementation

use contentsync_fs::DocumentStore;

use crate::config::{Binding, Manifest};
use crate::locale::LocaleNormalizer;
use crate::reconcile::{ReconcilePlan, Reconciler};
use crate::resolver::{EntrySource, FetchQuery};
use crate::transform::Transformer;
use crate::{Error, Result};

use super::report::{BindingReport, SyncReport};

/// Options for a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Compute and report the changes without touching the store
    pub dry_run: bool,
    /// Restrict the run to the binding of this collection
    pub only: Option<String>,
}

/// Runs every binding of a manifest against a source and a store.
pub struct SyncEngine {
    manifest: Manifest,
    normalizer: LocaleNormalizer,
    source: Box<dyn EntrySource>,
    store: Box<dyn DocumentStore>,
}

impl SyncEngine {
    pub fn new(manifest: Manifest, source: Box<dyn EntrySource>, store: Box<dyn DocumentStore>) -> Self {
        let normalizer = manifest.normalizer();
        Self {
            manifest,
            normalizer,
            source,
            store,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Bindings selected by `only`, or all of them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `only` names no configured collection.
    pub fn selected_bindings(&self, only: Option<&str>) -> Result<Vec<Binding>> {
        match only {
            None => Ok(self.manifest.bindings.clone()),
            Some(collection) => self
                .manifest
                .binding_for_collection(collection)
                .cloned()
                .map(|binding| vec![binding])
                .ok_or_else(|| Error::invalid_config(format!("no binding for collection {collection}"))),
        }
    }

    /// Run all selected bindings.
    ///
    /// Binding failures are recorded in the report, not returned.
    pub fn run(&mut self, options: &SyncOptions) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        for binding in self.selected_bindings(options.only.as_deref())? {
            match self.sync_binding(&binding, options.dry_run) {
                Ok(binding_report) => report.bindings.push(binding_report),
                Err(err) => {
                    tracing::error!(
                        collection = %binding.collection_path,
                        content_type = %binding.content_type,
                        "Binding aborted: {}",
                        err
                    );
                    report.bindings.push(BindingReport::failed(&binding, &err));
                }
            }
        }
        Ok(report)
    }

    /// Fetch, transform and reconcile one binding.
    pub fn sync_binding(&mut self, binding: &Binding, dry_run: bool) -> Result<BindingReport> {
        let plan = self.plan_binding(binding)?;
        if !dry_run {
            Reconciler::new(self.store.as_mut(), self.manifest.reconcile).apply(&plan)?;
        }
        Ok(BindingReport::from_plan(binding, &plan, dry_run))
    }

    /// Everything reconciling `binding` would do, with the store untouched.
    ///
    /// A failed fetch returns before the existing documents are even
    /// listed, so an incomplete fetch never produces deletes. Missing link
    /// targets are recovered inside the transformer; any other error while
    /// transforming aborts the binding the same way.
    pub fn plan_binding(&self, binding: &Binding) -> Result<ReconcilePlan> {
        let query = FetchQuery::new(&binding.content_type, self.manifest.contentful.include_depth);
        let entries = self.source.fetch_entries(&query)?;
        tracing::debug!(
            content_type = %binding.content_type,
            count = entries.len(),
            "Fetched entries"
        );

        let transformer = Transformer::new(
            self.source.as_ref(),
            &self.normalizer,
            &self.manifest.skip_related_fields,
            self.manifest.variation.as_ref(),
        );

        let mut produced = Vec::with_capacity(entries.len());
        let mut warnings = Vec::new();

        for entry in &entries {
            if entry.content_type != binding.content_type {
                tracing::debug!(entry_id = %entry.id, content_type = %entry.content_type, "Skipping entry of another content type");
                continue;
            }
            let document = transformer.transform_collecting(entry, binding.key_field.as_deref(), &mut warnings)?;
            let document = match &binding.body_field {
                Some(body_field) => document.extract_body(body_field),
                None => document,
            };
            produced.push(document);
        }

        let mut plan = ReconcilePlan::build(self.store.as_ref(), binding, produced, self.manifest.reconcile)?;
        warnings.append(&mut plan.warnings);
        plan.warnings = warnings;
        Ok(plan)
    }
}
