//! Runs asset generation across the detected platforms.
//!
//! Platforms are processed one at a time in catalog order, icons before
//! splashes. Assets inside one platform/kind batch are independent and run
//! on the rayon pool; their results are reported in catalog order once the
//! batch has joined. A failed asset is recorded and never stops its
//! siblings.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use rayon::prelude::*;
use tracing::info;

use crate::catalog::{AssetKind, AssetSpec};
use crate::detect::{ResolvedPlatform, present};
use crate::generate::asset::AssetGenerator;
use crate::generate::contents::{self, CONTENTS_FILENAME, Contents};
use crate::generate::transform::{self, ImageTransform, Resampler};
use crate::generate::{GenerationResult, Outcome};
use crate::preflight::Sources;
use crate::utils::file_ops::WriteStatus;

/// Lifecycle of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Validating,
    Detecting,
    Generating,
    Done(RunStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    AbortedAtValidation,
}

impl RunState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_advance_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (NotStarted, Validating)
                | (Validating, Detecting)
                | (Detecting, Generating)
                | (Validating | Detecting, Done(RunStatus::AbortedAtValidation))
                | (Generating, Done(RunStatus::Success))
        )
    }
}

/// Progress notifications, emitted in a deterministic order.
#[derive(Debug, Clone)]
pub enum ProgressEvent<'a> {
    BatchStarted {
        platform: &'a str,
        kind: AssetKind,
        total: usize,
    },
    AssetFinished {
        result: &'a GenerationResult,
        index: usize,
        total: usize,
    },
    ManifestFinished {
        record: &'a ManifestRecord,
    },
    Warning {
        message: String,
    },
}

/// Outcome of writing one `Contents.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Every result of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub results: Vec<GenerationResult>,
    pub manifests: Vec<ManifestRecord>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Written))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| !o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &GenerationResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.manifests.iter().all(|m| m.outcome.is_success())
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// A decoded source, or why it could not be decoded.
type Loaded = Result<DynamicImage, String>;

/// Source bitmaps decoded once per run.
#[derive(Debug)]
pub struct SourceImages {
    icon: Option<Loaded>,
    splash: Option<Loaded>,
    background: Option<Loaded>,
}

impl SourceImages {
    /// Decode every source in `sources`. A source that fails to decode is
    /// kept as an error so each asset depending on it reports the failure.
    pub fn load(sources: &Sources) -> Self {
        let decode = |path: &Path| transform::load(path).map_err(|e| e.to_string());

        SourceImages {
            icon: sources.icon.as_deref().map(decode),
            splash: sources.splash.as_deref().map(decode),
            background: sources.background.as_deref().map(decode),
        }
    }

    fn get(&self, kind: AssetKind) -> Option<&Loaded> {
        match kind {
            AssetKind::Icon => self.icon.as_ref(),
            AssetKind::Splash => self.splash.as_ref(),
        }
    }
}

pub struct Orchestrator<T = Resampler> {
    generator: AssetGenerator<T>,
    pool: Option<rayon::ThreadPool>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(AssetGenerator::default())
    }
}

impl<T: ImageTransform> Orchestrator<T> {
    pub fn new(generator: AssetGenerator<T>) -> Self {
        Orchestrator {
            generator,
            pool: None,
        }
    }

    /// Bound batch parallelism to `jobs` threads. `None` uses rayon's
    /// global pool.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Result<Self, rayon::ThreadPoolBuildError> {
        self.pool = match jobs {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };
        Ok(self)
    }

    /// Generate every asset of every present platform.
    pub fn run<F>(&self, platforms: &[ResolvedPlatform], sources: &Sources, on_progress: F) -> RunSummary
    where
        F: FnMut(ProgressEvent<'_>),
    {
        let images = SourceImages::load(sources);
        self.run_with_images(platforms, &images, on_progress)
    }

    pub fn run_with_images<F>(
        &self,
        platforms: &[ResolvedPlatform],
        images: &SourceImages,
        mut on_progress: F,
    ) -> RunSummary
    where
        F: FnMut(ProgressEvent<'_>),
    {
        let mut summary = RunSummary::default();

        for platform in present(platforms) {
            for kind in AssetKind::ALL {
                let assets = platform.spec.assets(kind);
                let Some(loaded) = images.get(kind) else {
                    continue;
                };
                if assets.is_empty() {
                    continue;
                }

                info!("generating {} {} assets for {}", assets.len(), kind, platform.id());
                on_progress(ProgressEvent::BatchStarted {
                    platform: platform.id(),
                    kind,
                    total: assets.len(),
                });

                let source = self.batch_source(platform, kind, loaded, images, &mut on_progress);
                let results = self.generate_batch(platform, kind, assets, source);

                let total = results.len();
                for (index, result) in results.iter().enumerate() {
                    on_progress(ProgressEvent::AssetFinished {
                        result,
                        index,
                        total,
                    });
                }

                let dir = platform.output_dir(kind);
                if contents::is_asset_set(dir) {
                    if let Some(record) = write_manifest(dir, &results) {
                        on_progress(ProgressEvent::ManifestFinished { record: &record });
                        summary.manifests.push(record);
                    }
                }

                summary.results.extend(results);
            }
        }

        summary
    }

    /// The bitmap a batch is derived from: the decoded source, composited
    /// over the background for platforms that want one.
    fn batch_source<'a, F>(
        &self,
        platform: &ResolvedPlatform,
        kind: AssetKind,
        loaded: &'a Loaded,
        images: &'a SourceImages,
        on_progress: &mut F,
    ) -> Result<Cow<'a, DynamicImage>, &'a str>
    where
        F: FnMut(ProgressEvent<'_>),
    {
        let source = loaded.as_ref().map_err(String::as_str)?;

        let background = match (&images.background, kind) {
            (Some(background), AssetKind::Icon) if platform.spec.icon_background => background,
            _ => return Ok(Cow::Borrowed(source)),
        };

        let composited = background.as_ref().map_err(String::clone).and_then(|background| {
            self.generator
                .transform()
                .composite(source, background)
                .map_err(|e| e.to_string())
        });

        match composited {
            Ok(composited) => Ok(Cow::Owned(composited)),
            Err(reason) => {
                info!("background skipped for {}: {}", platform.id(), reason);
                on_progress(ProgressEvent::Warning {
                    message: format!("{}: using icon without background ({})", platform.id(), reason),
                });
                Ok(Cow::Borrowed(source))
            }
        }
    }

    fn generate_batch(
        &self,
        platform: &ResolvedPlatform,
        kind: AssetKind,
        assets: &[AssetSpec],
        source: Result<Cow<'_, DynamicImage>, &str>,
    ) -> Vec<GenerationResult> {
        let dir = platform.output_dir(kind);
        let source = source.as_ref().map(|image| &**image);

        let batch = || {
            assets
                .par_iter()
                .map(|asset| {
                    let outcome = match source {
                        Ok(image) => match self.generator.generate_from(image, asset, dir) {
                            Ok(WriteStatus::Written) => Outcome::Written,
                            Ok(WriteStatus::Unchanged) => Outcome::Unchanged,
                            Err(e) => Outcome::Failed {
                                reason: e.to_string(),
                            },
                        },
                        Err(reason) => Outcome::Failed {
                            reason: reason.to_string(),
                        },
                    };
                    GenerationResult {
                        platform: platform.id().to_string(),
                        kind,
                        asset: asset.clone(),
                        path: AssetGenerator::<T>::destination(asset, dir),
                        outcome,
                    }
                })
                .collect::<Vec<_>>()
        };

        match &self.pool {
            Some(pool) => pool.install(batch),
            None => batch(),
        }
    }
}

/// Write `Contents.json` for a batch. Skipped when nothing in the batch
/// succeeded with a role.
fn write_manifest(dir: &Path, results: &[GenerationResult]) -> Option<ManifestRecord> {
    let contents = Contents::from_results(results);
    if contents.is_empty() {
        return None;
    }

    let path = dir.join(CONTENTS_FILENAME);
    let outcome = match contents.save(&path) {
        Ok(WriteStatus::Written) => Outcome::Written,
        Ok(WriteStatus::Unchanged) => Outcome::Unchanged,
        Err(e) => Outcome::Failed {
            reason: e.to_string(),
        },
    };
    Some(ManifestRecord { path, outcome })
}
