//! Reports produced by a sync run

use serde::{Deserialize, Serialize};

use crate::config::Binding;
use crate::reconcile::{ReconcilePlan, WriteAction};

/// Outcome of reconciling one binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingReport {
    pub collection: String,
    pub content_type: String,
    /// Nothing was written or deleted
    pub dry_run: bool,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub deleted: Vec<String>,
    /// Recovered problems: missing links, malformed variations, collisions
    pub warnings: Vec<String>,
    /// Set when the binding was aborted
    pub error: Option<String>,
}

impl BindingReport {
    pub fn from_plan(binding: &Binding, plan: &ReconcilePlan, dry_run: bool) -> Self {
        let paths = |action: WriteAction| -> Vec<String> {
            plan.paths_with(action)
                .into_iter()
                .map(|path| path.to_string())
                .collect()
        };
        Self {
            collection: binding.collection_path.clone(),
            content_type: binding.content_type.clone(),
            dry_run,
            created: paths(WriteAction::Create),
            updated: paths(WriteAction::Update),
            unchanged: paths(WriteAction::Unchanged),
            deleted: plan.deletes.iter().map(|path| path.to_string()).collect(),
            warnings: plan.warnings.clone(),
            error: None,
        }
    }

    pub fn failed(binding: &Binding, error: impl ToString) -> Self {
        Self {
            collection: binding.collection_path.clone(),
            content_type: binding.content_type.clone(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of one run over every selected binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub bindings: Vec<BindingReport>,
}

impl SyncReport {
    /// True when no binding was aborted.
    pub fn success(&self) -> bool {
        self.bindings.iter().all(BindingReport::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &BindingReport> {
        self.bindings.iter().filter(|report| !report.is_success())
    }
}
