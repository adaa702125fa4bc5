//! Checks that run before anything is written.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::{AssetKind, CatalogError};
use crate::detect::{ResolvedPlatform, present};
use crate::project::ConfigError;
use crate::report::Reporter;

/// Validation failures. Any of these aborts the run before generation.
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("config file does not exist: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("could not read project config: {0}")]
    ConfigParse(ConfigError),

    #[error("invalid asset catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error(
        "no platforms found; make sure the config file location is correct \
         (or run from the project root) and that platforms have been added"
    )]
    NoPlatformsDetected,

    #[error("{kind} asset doesn't exist at: {}", path.display())]
    SourceAssetMissing { kind: AssetKind, path: PathBuf },

    #[error("at least one asset type (icon or splash) must be available")]
    NoSourceAssets,
}

impl From<ConfigError> for PreflightError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { path } => PreflightError::ConfigMissing { path },
            other => PreflightError::ConfigParse(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Exists,
    Missing,
}

/// A source bitmap the user asked for (explicitly or by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub kind: AssetKind,
    pub path: PathBuf,
    /// A missing required source aborts the run; an optional one only
    /// disables its kind.
    pub required: bool,
}

/// Source bitmaps that passed preflight. `None` disables that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    pub icon: Option<PathBuf>,
    pub splash: Option<PathBuf>,
    pub background: Option<PathBuf>,
}

impl Sources {
    pub fn get(&self, kind: AssetKind) -> Option<&Path> {
        match kind {
            AssetKind::Icon => self.icon.as_deref(),
            AssetKind::Splash => self.splash.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.icon.is_none() && self.splash.is_none()
    }
}

pub fn config_file_exists(path: &Path) -> bool {
    path.is_file()
}

pub fn at_least_one_platform_present(platforms: &[ResolvedPlatform]) -> bool {
    present(platforms).next().is_some()
}

/// A source exists when it is a regular file that can be opened.
pub fn source_asset_exists(kind: AssetKind, path: &Path) -> SourceStatus {
    if path.is_file() && File::open(path).is_ok() {
        SourceStatus::Exists
    } else {
        tracing::debug!("{} source not readable at {}", kind, path.display());
        SourceStatus::Missing
    }
}

pub fn check_config<W: Write>(path: &Path, reporter: &mut Reporter<W>) -> Result<(), PreflightError> {
    if config_file_exists(path) {
        reporter.success(&format!("config file exists at: {}", path.display()));
        Ok(())
    } else {
        let err = PreflightError::ConfigMissing {
            path: path.to_path_buf(),
        };
        reporter.error(&err.to_string());
        Err(err)
    }
}

pub fn check_platforms<W: Write>(
    platforms: &[ResolvedPlatform],
    reporter: &mut Reporter<W>,
) -> Result<(), PreflightError> {
    if !at_least_one_platform_present(platforms) {
        let err = PreflightError::NoPlatformsDetected;
        reporter.error(&err.to_string());
        return Err(err);
    }

    let names: Vec<&str> = present(platforms).map(|p| p.id()).collect();
    reporter.success(&format!("platforms found: {}", names.join(", ")));
    Ok(())
}

/// Check one source. Returns `Ok(None)` when an optional source is missing.
pub fn check_source<W: Write>(
    request: &SourceRequest,
    reporter: &mut Reporter<W>,
) -> Result<Option<PathBuf>, PreflightError> {
    match source_asset_exists(request.kind, &request.path) {
        SourceStatus::Exists => {
            reporter.success(&format!(
                "{} asset exists at: {}",
                request.kind,
                request.path.display()
            ));
            Ok(Some(request.path.clone()))
        }
        SourceStatus::Missing if request.required => {
            let err = PreflightError::SourceAssetMissing {
                kind: request.kind,
                path: request.path.clone(),
            };
            reporter.error(&err.to_string());
            Err(err)
        }
        SourceStatus::Missing => {
            info!("{} source missing at {}", request.kind, request.path.display());
            reporter.warn(&format!(
                "{} asset not found at {}, skipping {} generation",
                request.kind,
                request.path.display(),
                request.kind
            ));
            Ok(None)
        }
    }
}

/// Resolve icon, splash and optional background sources.
///
/// Fails if a required source is missing or if neither icon nor splash is
/// available. A missing background only produces a warning.
pub fn resolve_sources<W: Write>(
    icon: &SourceRequest,
    splash: &SourceRequest,
    background: Option<&Path>,
    reporter: &mut Reporter<W>,
) -> Result<Sources, PreflightError> {
    let icon = check_source(icon, reporter)?;
    let splash = check_source(splash, reporter)?;

    if icon.is_none() && splash.is_none() {
        let err = PreflightError::NoSourceAssets;
        reporter.error(&err.to_string());
        return Err(err);
    }

    let background = background.and_then(|path| {
        match source_asset_exists(AssetKind::Icon, path) {
            SourceStatus::Exists => {
                reporter.success(&format!("background exists at: {}", path.display()));
                Some(path.to_path_buf())
            }
            SourceStatus::Missing => {
                reporter.warn(&format!(
                    "background not found at {}, icons will not be composited",
                    path.display()
                ));
                None
            }
        }
    });

    Ok(Sources {
        icon,
        splash,
        background,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, IosLayout};
    use crate::detect::detect;
    use std::fs;
    use tempfile::tempdir;

    fn request(kind: AssetKind, path: PathBuf, required: bool) -> SourceRequest {
        SourceRequest {
            kind,
            path,
            required,
        }
    }

    fn quiet() -> Reporter<Vec<u8>> {
        Reporter::new(Vec::new())
    }

    #[test]
    fn config_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.xml");

        assert!(matches!(
            check_config(&path, &mut quiet()),
            Err(PreflightError::ConfigMissing { .. })
        ));

        fs::write(&path, "<widget/>").unwrap();
        assert!(check_config(&path, &mut quiet()).is_ok());
    }

    #[test]
    fn directory_is_not_a_config_file() {
        let dir = tempdir().unwrap();
        assert!(!config_file_exists(dir.path()));
    }

    #[test]
    fn platform_check() {
        let root = tempdir().unwrap();
        let catalog = Catalog::builtin(IosLayout::default());

        let none = detect(&catalog, root.path(), "App");
        assert!(matches!(
            check_platforms(&none, &mut quiet()),
            Err(PreflightError::NoPlatformsDetected)
        ));

        fs::create_dir_all(root.path().join("platforms/ios")).unwrap();
        fs::create_dir_all(root.path().join("platforms/android")).unwrap();
        let some = detect(&catalog, root.path(), "App");

        let mut reporter = quiet();
        check_platforms(&some, &mut reporter).unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("platforms found: ios, android"));
    }

    #[test]
    fn missing_optional_icon_is_a_warning() {
        let dir = tempdir().unwrap();
        let splash = dir.path().join("splash.png");
        fs::write(&splash, b"png").unwrap();

        let mut reporter = quiet();
        let sources = resolve_sources(
            &request(AssetKind::Icon, dir.path().join("icon.png"), false),
            &request(AssetKind::Splash, splash.clone(), false),
            None,
            &mut reporter,
        )
        .unwrap();

        assert_eq!(sources.icon, None);
        assert_eq!(sources.splash, Some(splash));
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("⚠  icon asset not found"));
    }

    #[test]
    fn missing_optional_source_stays_off_the_warn_log() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct CountWarnings(Arc<AtomicUsize>);

        impl<S: Subscriber> Layer<S> for CountWarnings {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() <= Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let dir = tempdir().unwrap();
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountWarnings(warnings.clone()));

        let mut reporter = quiet();
        let resolved = tracing::subscriber::with_default(subscriber, || {
            check_source(
                &request(AssetKind::Splash, dir.path().join("splash.png"), false),
                &mut reporter,
            )
        });

        assert_eq!(resolved.unwrap(), None);
        assert_eq!(warnings.load(Ordering::SeqCst), 0);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("⚠  splash asset not found"));
    }

    #[test]
    fn missing_required_icon_is_fatal() {
        let dir = tempdir().unwrap();
        let splash = dir.path().join("splash.png");
        fs::write(&splash, b"png").unwrap();

        let result = resolve_sources(
            &request(AssetKind::Icon, dir.path().join("icon.png"), true),
            &request(AssetKind::Splash, splash, false),
            None,
            &mut quiet(),
        );

        assert!(matches!(
            result,
            Err(PreflightError::SourceAssetMissing { kind: AssetKind::Icon, .. })
        ));
    }

    #[test]
    fn both_sources_missing_is_fatal() {
        let dir = tempdir().unwrap();

        let result = resolve_sources(
            &request(AssetKind::Icon, dir.path().join("icon.png"), false),
            &request(AssetKind::Splash, dir.path().join("splash.png"), false),
            None,
            &mut quiet(),
        );

        assert!(matches!(result, Err(PreflightError::NoSourceAssets)));
    }

    #[test]
    fn missing_background_is_dropped() {
        let dir = tempdir().unwrap();
        let icon = dir.path().join("icon.png");
        fs::write(&icon, b"png").unwrap();
        let background = dir.path().join("bg.png");

        let sources = resolve_sources(
            &request(AssetKind::Icon, icon, true),
            &request(AssetKind::Splash, dir.path().join("splash.png"), false),
            Some(&background),
            &mut quiet(),
        )
        .unwrap();

        assert_eq!(sources.background, None);
        assert!(sources.get(AssetKind::Icon).is_some());
        assert!(sources.get(AssetKind::Splash).is_none());
    }

    #[test]
    fn config_error_conversion() {
        let missing: PreflightError = ConfigError::Missing {
            path: PathBuf::from("config.xml"),
        }
        .into();
        assert!(matches!(missing, PreflightError::ConfigMissing { .. }));

        let parse: PreflightError = ConfigError::MissingName.into();
        assert!(matches!(parse, PreflightError::ConfigParse(_)));
    }
}
