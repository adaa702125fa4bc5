//! The generate pipeline: validate, detect, then write every asset.

use std::io::Write;

use tracing::{debug, info};

use crate::detect::{Detector, ResolvedPlatform};
use crate::generate::orchestrator::{RunState, RunStatus};
use crate::generate::{Orchestrator, Outcome, ProgressEvent, Resampler, RunSummary};
use crate::preflight::{self, PreflightError, Sources};
use crate::project::ProjectConfig;
use crate::report::Reporter;
use crate::settings::Settings;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Tracks the run's lifecycle and rejects out-of-order transitions.
struct Lifecycle {
    state: RunState,
}

impl Lifecycle {
    fn new() -> Self {
        Lifecycle {
            state: RunState::NotStarted,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!("run state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Run the whole pipeline. Nothing is written unless validation passes.
///
/// `Ok` means generation ran; individual assets may still have failed, see
/// [`RunSummary::is_success`]. `Err` means the run aborted before any write.
/// Every error has already been reported through `reporter`.
pub fn run<W: Write>(settings: &Settings, reporter: &mut Reporter<W>) -> Result<RunSummary, RunError> {
    let orchestrator = match Orchestrator::<Resampler>::default().with_jobs(settings.jobs) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            reporter.error(&format!("could not start worker pool: {}", e));
            return Err(e.into());
        }
    };

    let mut lifecycle = Lifecycle::new();
    lifecycle.advance(RunState::Validating);
    reporter.header("Checking Project, Icon, and Splash");

    let (platforms, sources) = match validate(settings, reporter, &mut lifecycle) {
        Ok(validated) => validated,
        Err(e) => {
            info!("aborted during validation: {}", e);
            lifecycle.advance(RunState::Done(RunStatus::AbortedAtValidation));
            return Err(e.into());
        }
    };

    lifecycle.advance(RunState::Generating);
    let summary = orchestrator.run(&platforms, &sources, |event| report_progress(reporter, event));
    report_summary(&summary, reporter);
    lifecycle.advance(RunState::Done(RunStatus::Success));

    Ok(summary)
}

fn validate<W: Write>(
    settings: &Settings,
    reporter: &mut Reporter<W>,
    lifecycle: &mut Lifecycle,
) -> Result<(Vec<ResolvedPlatform>, Sources), PreflightError> {
    preflight::check_config(&settings.config, reporter)?;

    let config = ProjectConfig::load(&settings.config)
        .map_err(PreflightError::from)
        .inspect_err(|e| reporter.error(&e.to_string()))?;
    info!("project name: {}", config.name);

    let catalog = settings
        .load_catalog()
        .and_then(|mut catalog| {
            catalog.apply_declarations(&config.declarations)?;
            Ok(catalog)
        })
        .map_err(PreflightError::from)
        .inspect_err(|e| reporter.error(&e.to_string()))?;

    lifecycle.advance(RunState::Detecting);
    let platforms = Detector::new(settings.project_root(), &config.name)
        .with_resource_path(settings.resource_path.clone())
        .detect(&catalog);
    preflight::check_platforms(&platforms, reporter)?;

    let sources = preflight::resolve_sources(
        &settings.icon_request(),
        &settings.splash_request(),
        settings.background.as_deref(),
        reporter,
    )?;

    Ok((platforms, sources))
}

fn report_progress<W: Write>(reporter: &mut Reporter<W>, event: ProgressEvent<'_>) {
    match event {
        ProgressEvent::BatchStarted {
            platform,
            kind,
            total,
        } => {
            reporter.header(&format!("Generating {} {} assets for {}", total, kind, platform));
        }
        ProgressEvent::AssetFinished {
            result,
            index,
            total,
        } => {
            let name = &result.asset.file_name;
            match &result.outcome {
                Outcome::Failed { reason } => {
                    reporter.error(&format!("[{}/{}] {}: {}", index + 1, total, name, reason));
                }
                outcome => reporter.success(&format!("[{}/{}] {} {}", index + 1, total, name, outcome)),
            }
        }
        ProgressEvent::ManifestFinished { record } => {
            let name = record
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match &record.outcome {
                Outcome::Failed { reason } => reporter.error(&format!("{}: {}", name, reason)),
                outcome => reporter.success(&format!("{} {}", name, outcome)),
            }
        }
        ProgressEvent::Warning { message } => reporter.warn(&message),
    }
}

fn report_summary<W: Write>(summary: &RunSummary, reporter: &mut Reporter<W>) {
    reporter.blank();
    let total = summary.results.len();
    if summary.is_success() {
        reporter.success(&format!(
            "{} assets generated ({} created, {} unchanged)",
            total,
            summary.written(),
            summary.unchanged()
        ));
    } else {
        reporter.error(&format!("{} of {} assets failed", summary.failed(), total));
    }
}
