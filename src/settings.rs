use std::path::{Path, PathBuf};

use crate::catalog::{AssetKind, Catalog, CatalogError, IosLayout};
use crate::preflight::SourceRequest;

pub const DEFAULT_ICON: &str = "icon.png";
pub const DEFAULT_SPLASH: &str = "splash.png";
pub const DEFAULT_CONFIG: &str = "config.xml";

/// Everything one run needs, fixed before the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub icon: PathBuf,
    pub splash: PathBuf,
    pub config: PathBuf,
    pub background: Option<PathBuf>,
    /// The splash source was named explicitly, so a missing icon only
    /// disables icon generation.
    pub splash_requested: bool,
    pub ios_layout: IosLayout,
    pub resource_path: Option<PathBuf>,
    /// Replaces the built-in catalog.
    pub catalog: Option<PathBuf>,
    /// Restrict generation to these platform ids. Empty means all.
    pub platforms: Vec<String>,
    pub jobs: Option<usize>,
}

impl Settings {
    /// Defaults for a project rooted at `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Settings {
            icon: dir.join(DEFAULT_ICON),
            splash: dir.join(DEFAULT_SPLASH),
            config: dir.join(DEFAULT_CONFIG),
            background: None,
            splash_requested: false,
            ios_layout: IosLayout::default(),
            resource_path: None,
            catalog: None,
            platforms: Vec::new(),
            jobs: None,
        }
    }

    /// The directory holding the config file.
    pub fn project_root(&self) -> PathBuf {
        self.config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn icon_request(&self) -> SourceRequest {
        SourceRequest {
            kind: AssetKind::Icon,
            path: self.icon.clone(),
            required: !self.splash_requested,
        }
    }

    pub fn splash_request(&self) -> SourceRequest {
        SourceRequest {
            kind: AssetKind::Splash,
            path: self.splash.clone(),
            required: false,
        }
    }

    /// The catalog this run works from, narrowed to `platforms`.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let mut catalog = match &self.catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin(self.ios_layout),
        };
        if !self.platforms.is_empty() {
            catalog.retain(&self.platforms)?;
        }
        Ok(catalog)
    }
}
