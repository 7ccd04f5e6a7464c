// 🔄 Sync Engine - Bring a target catalog up to date with a source catalog
//
// For every source modifier list, in listing order:
//   twin found in target → merge missing modifiers into it
//   no twin              → clone the whole list into the target
// A failure on one list is recorded and the next list is processed.
// Changed lists are written back with batch upserts at the end.

use crate::api::CatalogApi;
use crate::catalog::{modifier_list_merger, CatalogObject, CatalogObjectType, ModifierList};
use crate::client::ApiError;
use crate::sanitize::prepare_clone;
use crate::signature::Container;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum objects per upsert request accepted by the catalog API
pub const DEFAULT_BATCH_SIZE: usize = 1000;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("could not list the {account} catalog: {source}")]
    Api {
        account: &'static str,
        #[source]
        source: ApiError,
    },
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    /// Twin found and new modifiers appended to it
    Merged { target_id: String, added: usize },

    /// Twin found, nothing to add
    Unchanged { target_id: String },

    /// No twin, list copied into the target account
    Cloned { children: usize },

    /// This list could not be processed
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerOutcome {
    pub name: String,
    pub signature: String,
    #[serde(flatten)]
    pub action: SyncAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub outcomes: Vec<ContainerOutcome>,

    /// Lists that need writing back (written unless dry run)
    pub pending_writes: usize,

    /// Lists the target account accepted
    pub upserted: usize,

    pub upsert_errors: Vec<String>,
}

impl SyncReport {
    fn count(&self, f: impl Fn(&SyncAction) -> bool) -> usize {
        self.outcomes.iter().filter(|o| f(&o.action)).count()
    }

    pub fn merged(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Merged { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Unchanged { .. }))
    }

    pub fn cloned(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Cloned { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Failed { .. }))
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.upsert_errors.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} source lists: {} merged, {} cloned, {} unchanged, {} failed; {} of {} writes applied{}",
            self.outcomes.len(),
            self.merged(),
            self.cloned(),
            self.unchanged(),
            self.failed(),
            self.upserted,
            self.pending_writes,
            if self.dry_run { " (dry run)" } else { "" }
        )
    }
}

// ============================================================================
// SYNC ENGINE
// ============================================================================

pub struct SyncEngine<'a, S: CatalogApi + ?Sized, T: CatalogApi + ?Sized> {
    source: &'a S,
    target: &'a T,
    dry_run: bool,
    batch_size: usize,
}

impl<'a, S: CatalogApi + ?Sized, T: CatalogApi + ?Sized> SyncEngine<'a, S, T> {
    pub fn new(source: &'a S, target: &'a T) -> Self {
        SyncEngine {
            source,
            target,
            dry_run: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Compute everything but write nothing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn sync_modifier_lists(&self) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let merger = modifier_list_merger();

        let sources = load_modifier_lists(self.source, "source")?;
        let mut targets = load_modifier_lists(self.target, "target")?;
        tracing::info!(
            target: "catalog_merge::sync",
            sources = sources.len(),
            targets = targets.len(),
            "Loaded modifier lists"
        );

        // Target indices to write back, in the order they first changed
        let mut dirty: Vec<usize> = Vec::new();
        let mut outcomes = Vec::with_capacity(sources.len());

        for source in sources {
            let name = source.name().to_string();
            let signature = merger.container_signature(&source);

            let action = match merger.find_match_index(&source, &targets) {
                Some(index) => {
                    let before = targets[index].children().len();
                    match merger.merge_into(source, &mut targets[index]) {
                        Ok(Some(updated)) => {
                            let action = SyncAction::Merged {
                                target_id: updated.id().to_string(),
                                added: updated.children().len() - before,
                            };
                            if !dirty.contains(&index) {
                                dirty.push(index);
                            }
                            action
                        }
                        Ok(None) => SyncAction::Unchanged {
                            target_id: targets[index].id().to_string(),
                        },
                        Err(e) => SyncAction::Failed { reason: e.to_string() },
                    }
                }
                // Later source lists with the same signature merge into the clone
                None => match prepare_clone(source) {
                    Ok(clone) => {
                        let children = clone.children().len();
                        targets.push(clone);
                        dirty.push(targets.len() - 1);
                        SyncAction::Cloned { children }
                    }
                    Err(e) => SyncAction::Failed { reason: e.to_string() },
                },
            };

            match &action {
                SyncAction::Failed { reason } => {
                    tracing::warn!(target: "catalog_merge::sync", list = %signature, %reason, "Skipping list");
                }
                other => {
                    tracing::info!(target: "catalog_merge::sync", list = %signature, action = ?other, "Processed list");
                }
            }

            outcomes.push(ContainerOutcome { name, signature, action });
        }

        let pending_writes = dirty.len();
        let mut upserted = 0;
        let mut upsert_errors = Vec::new();

        if self.dry_run {
            tracing::info!(target: "catalog_merge::sync", pending_writes, "Dry run, nothing written");
        } else if pending_writes > 0 {
            let mut slots: Vec<Option<ModifierList>> = targets.into_iter().map(Some).collect();
            let objects: Vec<CatalogObject> = dirty
                .iter()
                .filter_map(|&i| slots[i].take())
                .map(ModifierList::into_object)
                .collect();

            let (written, errors) = self.upsert_in_batches(objects);
            upserted = written;
            upsert_errors = errors;
        }

        Ok(SyncReport {
            started_at,
            finished_at: Utc::now(),
            dry_run: self.dry_run,
            outcomes,
            pending_writes,
            upserted,
            upsert_errors,
        })
    }

    /// Each batch stands alone: a rejected batch does not stop the rest.
    fn upsert_in_batches(&self, mut remaining: Vec<CatalogObject>) -> (usize, Vec<String>) {
        let mut written = 0;
        let mut errors = Vec::new();

        while !remaining.is_empty() {
            let rest = remaining.split_off(remaining.len().min(self.batch_size));
            let batch = std::mem::replace(&mut remaining, rest);
            let size = batch.len();

            match self.target.batch_upsert(batch) {
                Ok(response) => {
                    tracing::info!(
                        target: "catalog_merge::sync",
                        size,
                        mapped_ids = response.id_mappings.len(),
                        "Upserted batch"
                    );
                    written += size;
                }
                Err(e) => {
                    tracing::error!(target: "catalog_merge::sync", size, error = %e, "Batch upsert failed");
                    errors.push(e.to_string());
                }
            }
        }

        (written, errors)
    }
}

/// All modifier lists of one account. Objects that are not usable lists are
/// logged and left out.
pub fn load_modifier_lists<A: CatalogApi + ?Sized>(
    api: &A,
    account: &'static str,
) -> Result<Vec<ModifierList>, SyncError> {
    let objects = api
        .list_objects(&[CatalogObjectType::ModifierList])
        .map_err(|source| SyncError::Api { account, source })?;

    let mut lists = Vec::with_capacity(objects.len());
    for object in objects {
        match ModifierList::try_from(object) {
            Ok(list) => lists.push(list),
            Err(e) => tracing::warn!(target: "catalog_merge::sync", account, error = %e, "Ignoring object"),
        }
    }
    Ok(lists)
}

// ============================================================================
// TESTS
// ============================================================================
