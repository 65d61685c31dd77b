//! The end-to-end run: load → report → aggregate → export.
//!
//! A [`Pipeline`] is the handle for one configured run. It owns nothing global: the loaded table
//! lives only for the duration of [`Pipeline::run`] and is dropped when the run returns.
//!
//! When an observer is configured, `run` reports:
//!
//! - `on_stage` after loading, after each view is computed, after each view is exported, and at
//!   the end of the run
//! - `on_failure` on failure, with a severity computed from the error kind
//! - `on_alert` on failure when that severity is >= the alert threshold

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{PipelineConfig, ShowLimits};
use crate::error::{PipelineError, PipelineResult};
use crate::export::{ensure_output_dir, export_view};
use crate::ingestion::ingest_csv_inferred_from_path;
use crate::observability::{PipelineContext, PipelineObserver, PipelineSeverity, PipelineStage};
use crate::report::{render_schema, render_table};
use crate::transactions::{AggregateView, TransactionTable};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows in the loaded input (including rows with a null amount).
    pub input_rows: usize,
    /// Every exported view with the file it was written to, in export order.
    pub exported: Vec<(AggregateView, PathBuf)>,
}

/// One configured pipeline run.
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    observer: Option<Arc<dyn PipelineObserver>>,
    alert_at_or_above: PipelineSeverity,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            observer: None,
            alert_at_or_above: PipelineSeverity::Critical,
        }
    }

    /// Attach an observer for stage and failure events.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Severity at or above which failures are also raised as alerts (default: `Critical`).
    pub fn with_alert_threshold(mut self, severity: PipelineSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline, writing the human-readable report to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> PipelineResult<RunSummary> {
        let ctx = PipelineContext {
            input_path: self.config.input_path.clone(),
            output_dir: self.config.output_dir.clone(),
        };

        let result = self.run_stages(&ctx, out);

        if let (Err(e), Some(obs)) = (&result, self.observer.as_ref()) {
            let sev = PipelineSeverity::for_error(e);
            obs.on_failure(&ctx, sev, e);
            if sev >= self.alert_at_or_above {
                obs.on_alert(&ctx, sev, e);
            }
        }

        result
    }

    fn run_stages<W: Write>(&self, ctx: &PipelineContext, out: &mut W) -> PipelineResult<RunSummary> {
        let start = Instant::now();
        let cfg = &self.config;

        ensure_output_dir(&cfg.output_dir)?;

        let data = ingest_csv_inferred_from_path(&cfg.input_path)?;
        info!(path = %cfg.input_path.display(), rows = data.row_count(), "dataset loaded");
        self.emit(
            ctx,
            PipelineStage::Loaded {
                rows: data.row_count(),
                columns: data.schema.fields.len(),
            },
        );

        let mut report = String::new();
        report.push_str(&render_schema(&data.schema));
        report.push('\n');
        report.push_str(&render_table(&data, cfg.preview_rows));
        report.push_str(&format!("\nTotal rows: {}\n", data.row_count()));
        write_report(out, &report)?;

        let table = TransactionTable::new(data)?;
        let input_rows = table.row_count();

        let mut exported = Vec::with_capacity(AggregateView::ALL.len());
        for view in AggregateView::ALL {
            let result = view.compute(&table)?;
            debug!(view = view.name(), rows = result.row_count(), "view computed");
            self.emit(
                ctx,
                PipelineStage::ViewComputed {
                    view,
                    rows: result.row_count(),
                },
            );

            let limit = show_limit(&cfg.show_limits, view).unwrap_or(result.row_count());
            write_report(out, &format!("\n{}\n{}", view.name(), render_table(&result, limit)))?;

            let path = export_view(&result, &cfg.output_dir, view.name())?;
            self.emit(ctx, PipelineStage::ViewExported { view, path: path.clone() });
            exported.push((view, path));
        }

        write_report(
            out,
            &format!("\nResults saved to {}\n", cfg.output_dir.display()),
        )?;
        self.emit(ctx, PipelineStage::Finished { elapsed: start.elapsed() });

        Ok(RunSummary {
            input_rows,
            exported,
        })
    }

    fn emit(&self, ctx: &PipelineContext, stage: PipelineStage) {
        if let Some(obs) = &self.observer {
            obs.on_stage(ctx, &stage);
        }
    }
}

fn show_limit(limits: &ShowLimits, view: AggregateView) -> Option<usize> {
    match view {
        AggregateView::Summary => limits.summary,
        AggregateView::TopAccounts => limits.top_accounts,
        AggregateView::ByType => limits.by_type,
        AggregateView::MonthlyTrends => limits.monthly_trends,
    }
}

fn write_report<W: Write>(out: &mut W, text: &str) -> PipelineResult<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| PipelineError::file_access("<report output>", e))
}
