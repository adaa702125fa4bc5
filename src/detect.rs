//! Works out which catalog platforms were added to a project and where their
//! assets go.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::{AssetKind, Catalog, PROJECT_PLACEHOLDER, PlatformSpec};

/// A catalog entry bound to a concrete project tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlatform {
    pub spec: PlatformSpec,
    pub is_present: bool,
    pub icon_dir: PathBuf,
    pub splash_dir: PathBuf,
}

impl ResolvedPlatform {
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn output_dir(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Icon => &self.icon_dir,
            AssetKind::Splash => &self.splash_dir,
        }
    }
}

/// Resolves catalog entries against a project root.
#[derive(Debug, Clone)]
pub struct Detector {
    project_root: PathBuf,
    project_name: String,
    resource_path: Option<PathBuf>,
}

impl Detector {
    pub fn new(project_root: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Detector {
            project_root: project_root.into(),
            project_name: project_name.into(),
            resource_path: None,
        }
    }

    /// Write assets to `<resource_path>/<platform>/<kind>/` instead of the
    /// platform's own tree. Detection is unaffected.
    pub fn with_resource_path(mut self, resource_path: Option<PathBuf>) -> Self {
        self.resource_path = resource_path;
        self
    }

    /// One [`ResolvedPlatform`] per catalog entry, in catalog order. A missing
    /// platform is reported as `is_present == false`, never as an error.
    pub fn detect(&self, catalog: &Catalog) -> Vec<ResolvedPlatform> {
        catalog
            .platforms()
            .iter()
            .map(|spec| self.resolve(spec))
            .collect()
    }

    fn resolve(&self, spec: &PlatformSpec) -> ResolvedPlatform {
        let detection_path = self.project_root.join(&spec.detection_path);
        let is_present = detection_path.is_dir();
        debug!(
            "platform {}: {} ({})",
            spec.id,
            if is_present { "present" } else { "absent" },
            detection_path.display()
        );

        ResolvedPlatform {
            is_present,
            icon_dir: self.output_dir(spec, AssetKind::Icon),
            splash_dir: self.output_dir(spec, AssetKind::Splash),
            spec: spec.clone(),
        }
    }

    fn output_dir(&self, spec: &PlatformSpec, kind: AssetKind) -> PathBuf {
        match &self.resource_path {
            Some(resources) => resources.join(&spec.id).join(kind.as_str()),
            None => self
                .project_root
                .join(substitute(spec.dir_template(kind), &self.project_name)),
        }
    }
}

/// Convenience wrapper around [`Detector::detect`].
pub fn detect(catalog: &Catalog, project_root: &Path, project_name: &str) -> Vec<ResolvedPlatform> {
    Detector::new(project_root, project_name).detect(catalog)
}

pub fn present(platforms: &[ResolvedPlatform]) -> impl Iterator<Item = &ResolvedPlatform> {
    platforms.iter().filter(|p| p.is_present)
}

fn substitute(template: &Path, project_name: &str) -> PathBuf {
    PathBuf::from(
        template
            .to_string_lossy()
            .replace(PROJECT_PLACEHOLDER, project_name),
    )
}
