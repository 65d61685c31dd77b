//! Observer hooks for pipeline runs.
//!
//! A [`crate::pipeline::Pipeline`] reports each completed stage and any fatal failure to an
//! optional [`PipelineObserver`]. Failures whose severity meets the configured threshold are
//! also raised through [`PipelineObserver::on_alert`].

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::{ErrorKind, PipelineError};
use crate::transactions::AggregateView;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineSeverity {
    /// Error-level event (run failed on bad data).
    Error,
    /// Critical error (input or output not accessible).
    Critical,
}

impl PipelineSeverity {
    /// Severity of a fatal error: file access problems are critical, parse problems are errors.
    pub fn for_error(error: &PipelineError) -> Self {
        match error.kind() {
            ErrorKind::FileAccess => Self::Critical,
            ErrorKind::Parse => Self::Error,
        }
    }
}

/// Context about a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// The input CSV path.
    pub input_path: PathBuf,
    /// Directory receiving the exported views.
    pub output_dir: PathBuf,
}

/// A completed stage of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStage {
    /// The input table was loaded.
    Loaded { rows: usize, columns: usize },
    /// An aggregate view was computed.
    ViewComputed { view: AggregateView, rows: usize },
    /// An aggregate view was written to disk.
    ViewExported { view: AggregateView, path: PathBuf },
    /// Every view was exported.
    Finished { elapsed: Duration },
}

/// Observer interface for pipeline runs.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage completes.
    fn on_stage(&self, _ctx: &PipelineContext, _stage: &PipelineStage) {}

    /// Called when the run fails.
    fn on_failure(&self, _ctx: &PipelineContext, _severity: PipelineSeverity, _error: &PipelineError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PipelineError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_stage(&self, ctx: &PipelineContext, stage: &PipelineStage) {
        for o in &self.observers {
            o.on_stage(ctx, stage);
        }
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards pipeline events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage(&self, ctx: &PipelineContext, stage: &PipelineStage) {
        match stage {
            PipelineStage::Loaded { rows, columns } => {
                info!(path = %ctx.input_path.display(), rows, columns, "input loaded")
            }
            PipelineStage::ViewComputed { view, rows } => {
                info!(view = view.name(), rows, "view computed")
            }
            PipelineStage::ViewExported { view, path } => {
                info!(view = view.name(), path = %path.display(), "view exported")
            }
            PipelineStage::Finished { elapsed } => {
                info!(output_dir = %ctx.output_dir.display(), ?elapsed, "run finished")
            }
        }
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PipelineError) {
        warn!(
            ?severity,
            path = %ctx.input_path.display(),
            %error,
            "run failed"
        );
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PipelineError) {
        error!(
            ?severity,
            path = %ctx.input_path.display(),
            output_dir = %ctx.output_dir.display(),
            %error,
            "ALERT: run failed"
        );
    }
}

/// Appends pipeline events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", chrono::Utc::now().to_rfc3339());
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_stage(&self, ctx: &PipelineContext, stage: &PipelineStage) {
        let line = match stage {
            PipelineStage::Loaded { rows, columns } => format!(
                "loaded path={} rows={rows} columns={columns}",
                ctx.input_path.display()
            ),
            PipelineStage::ViewComputed { view, rows } => {
                format!("computed view={} rows={rows}", view.name())
            }
            PipelineStage::ViewExported { view, path } => {
                format!("exported view={} path={}", view.name(), path.display())
            }
            PipelineStage::Finished { elapsed } => format!(
                "finished output_dir={} elapsed_ms={}",
                ctx.output_dir.display(),
                elapsed.as_millis()
            ),
        };
        self.append_line(&line);
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PipelineError) {
        self.append_line(&format!(
            "fail severity={severity:?} path={} err={error}",
            ctx.input_path.display()
        ));
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &PipelineError) {
        self.append_line(&format!(
            "ALERT severity={severity:?} path={} err={error}",
            ctx.input_path.display()
        ));
    }
}
