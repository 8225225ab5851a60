//! Per-item pipeline over a whole listing.
//!
//! Items run strictly one after another: lookup, normalize and extract the
//! year, decide, confirm when needed, execute. A failing or panicking item is
//! recorded in the batch report and the loop moves on.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use retitle_model::{
    CanonicalRecord, MatchAction, MatchDecision, MediaItem, ReleaseYear,
    RenameOutcome, RenameStatus,
};
use tracing::{debug, error, info, warn};

use crate::confirm::{ConfirmRequest, ConfirmationProvider};
use crate::decision::{MatchInput, Thresholds, decide};
use crate::error::{ItemError, ItemStage, SourceError};
use crate::normalize::{NoiseWords, NormalizedTitle, normalize};
use crate::rename::{RenameExecutor, RenameFs, StdFs};
use crate::source::{ItemListing, MetadataSource};
use crate::year::extract_year;

/// Immutable engine configuration passed into every call.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub noise_words: NoiseWords,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Decide and report only; never touch the filesystem.
    pub dry_run: bool,
}

/// Everything learned about one item.
#[derive(Debug, Clone)]
pub struct ItemReport {
    pub path: PathBuf,
    pub raw_filename: String,
    pub normalized_title: NormalizedTitle,
    pub filename_year: Option<ReleaseYear>,
    pub record: CanonicalRecord,
    pub decision: MatchDecision,
    /// Absent when skipped by the engine or in dry-run mode.
    pub outcome: Option<RenameOutcome>,
}

/// Counts per decision and per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub auto_rename: usize,
    pub ask_confirm: usize,
    pub skipped: usize,
    pub renamed: usize,
    pub already_correct: usize,
    pub skipped_exists: usize,
    pub declined: usize,
    pub failed: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn record(&mut self, result: &Result<ItemReport, ItemError>) {
        self.total += 1;
        let report = match result {
            Ok(report) => report,
            Err(_) => {
                self.errors += 1;
                return;
            }
        };

        match report.decision.action {
            MatchAction::AutoRename => self.auto_rename += 1,
            MatchAction::AskConfirm => self.ask_confirm += 1,
            MatchAction::Skip => self.skipped += 1,
        }

        if let Some(outcome) = &report.outcome {
            match outcome.status {
                RenameStatus::Renamed => self.renamed += 1,
                RenameStatus::AlreadyCorrect => self.already_correct += 1,
                RenameStatus::SkippedExists => self.skipped_exists += 1,
                RenameStatus::SkippedUserDeclined => self.declined += 1,
                RenameStatus::Failed => self.failed += 1,
            }
        }
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub items: Vec<Result<ItemReport, ItemError>>,
    pub summary: BatchSummary,
}

/// Drives the engine over a listing.
#[derive(Debug)]
pub struct Reconciler<F: RenameFs = StdFs> {
    settings: EngineSettings,
    executor: RenameExecutor<F>,
    options: RunOptions,
}

impl<F: RenameFs> Reconciler<F> {
    pub fn new(
        settings: EngineSettings,
        executor: RenameExecutor<F>,
        options: RunOptions,
    ) -> Self {
        if settings.thresholds.is_inverted() {
            warn!(
                "ask threshold {} is above auto threshold {}; nothing will be asked",
                settings.thresholds.ask, settings.thresholds.auto
            );
        }
        Self {
            settings,
            executor,
            options,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn executor(&self) -> &RenameExecutor<F> {
        &self.executor
    }

    /// Normalize, extract the year and decide, without side effects.
    pub fn analyze(
        &self,
        item: &MediaItem,
        record: CanonicalRecord,
    ) -> Result<ItemReport, ItemError> {
        let mut stage = ItemStage::Normalize;
        self.analyze_tracked(item, record, &mut stage)
    }

    fn analyze_tracked(
        &self,
        item: &MediaItem,
        record: CanonicalRecord,
        stage: &mut ItemStage,
    ) -> Result<ItemReport, ItemError> {
        *stage = ItemStage::Normalize;
        let raw_filename = item
            .raw_filename()
            .ok_or_else(|| ItemError::InvalidPath {
                path: item.path.clone(),
            })?
            .to_string();

        let normalized_title = normalize(&raw_filename, &self.settings.noise_words);
        let filename_year = extract_year(&raw_filename);
        debug!(
            file = %raw_filename,
            normalized = %normalized_title,
            year = ?filename_year.map(ReleaseYear::get),
            "normalized"
        );

        *stage = ItemStage::Decide;
        let input = MatchInput::new(
            &raw_filename,
            normalized_title.as_str(),
            filename_year,
            &record,
        );
        let decision = decide(&input, &self.settings.thresholds);

        Ok(ItemReport {
            path: item.path.clone(),
            raw_filename,
            normalized_title,
            filename_year,
            record,
            decision,
            outcome: None,
        })
    }

    /// Full pipeline for one item.
    pub fn process_item(
        &self,
        item: &MediaItem,
        metadata: &dyn MetadataSource,
        confirm: &mut dyn ConfirmationProvider,
    ) -> Result<ItemReport, ItemError> {
        let mut stage = ItemStage::Lookup;
        self.process_tracked(item, metadata, confirm, &mut stage)
    }

    fn process_tracked(
        &self,
        item: &MediaItem,
        metadata: &dyn MetadataSource,
        confirm: &mut dyn ConfirmationProvider,
        stage: &mut ItemStage,
    ) -> Result<ItemReport, ItemError> {
        *stage = ItemStage::Lookup;
        let record = metadata
            .lookup(&item.key)
            .map_err(|source| ItemError::Metadata {
                path: item.path.clone(),
                source,
            })?
            .ok_or_else(|| ItemError::MissingRecord {
                path: item.path.clone(),
                key: item.key.clone(),
            })?;

        let mut report = self.analyze_tracked(item, record, stage)?;

        let Some(proposed) = report.decision.proposed_name.clone() else {
            return Ok(report);
        };
        if self.options.dry_run {
            return Ok(report);
        }

        if report.decision.action == MatchAction::AskConfirm {
            let request = ConfirmRequest::Rename {
                path: &item.path,
                proposed_name: &proposed,
                decision: &report.decision,
            };
            if !confirm.confirm(&request) {
                let target =
                    RenameExecutor::<F>::target_path(&item.path, &proposed);
                info!("rename of {:?} declined", item.path);
                report.outcome = Some(
                    RenameOutcome::new(
                        &item.path,
                        target,
                        RenameStatus::SkippedUserDeclined,
                    )
                    .with_detail("declined by user"),
                );
                return Ok(report);
            }
        }

        *stage = ItemStage::Execute;
        let mut outcome = self.executor.execute_rename(&item.path, &proposed, false);
        if outcome.status == RenameStatus::SkippedExists {
            let request = ConfirmRequest::Overwrite {
                source: &outcome.old_path,
                destination: &outcome.new_path,
            };
            if confirm.confirm(&request) {
                outcome = self.executor.execute_rename(&item.path, &proposed, true);
            }
        }

        report.outcome = Some(outcome);
        Ok(report)
    }

    /// Process every listed item; `on_item` sees each result as soon as it
    /// is ready. Only a failing listing aborts the run.
    pub fn run(
        &self,
        listing: &dyn ItemListing,
        metadata: &dyn MetadataSource,
        confirm: &mut dyn ConfirmationProvider,
        mut on_item: impl FnMut(&Result<ItemReport, ItemError>),
    ) -> Result<BatchReport, SourceError> {
        let items = listing.items()?;
        info!(
            "processing {} items{}",
            items.len(),
            if self.options.dry_run { " (dry run)" } else { "" }
        );

        let mut summary = BatchSummary::default();
        let mut results = Vec::with_capacity(items.len());

        for item in &items {
            let result = self.process_isolated(item, metadata, &mut *confirm);
            if let Err(err) = &result {
                error!(
                    path = ?err.path(),
                    stage = %err.stage(),
                    "item failed: {err}"
                );
            }
            summary.record(&result);
            on_item(&result);
            results.push(result);
        }

        info!(
            renamed = summary.renamed,
            failed = summary.failed,
            errors = summary.errors,
            "batch finished"
        );

        Ok(BatchReport {
            items: results,
            summary,
        })
    }

    fn process_isolated(
        &self,
        item: &MediaItem,
        metadata: &dyn MetadataSource,
        confirm: &mut dyn ConfirmationProvider,
    ) -> Result<ItemReport, ItemError> {
        let mut stage = ItemStage::Lookup;
        match panic::catch_unwind(AssertUnwindSafe(|| {
            self.process_tracked(item, metadata, confirm, &mut stage)
        })) {
            Ok(result) => result,
            Err(payload) => Err(ItemError::Panicked {
                path: item.path.clone(),
                stage,
                message: panic_message(&*payload),
            }),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
