//! Platform catalog: which platforms exist, where they live in a project
//! tree, and which bitmaps each one requires.
//!
//! The built-in tables live in [`tables`]. A catalog can also be loaded from
//! a JSON document with the same shape, which is how teams pin the asset
//! list for a particular toolchain version.

mod tables;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the project name in directory templates.
pub const PROJECT_PLACEHOLDER: &str = "{project}";

/// The two families of bitmaps a platform can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Icon,
    Splash,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Icon, AssetKind::Splash];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Icon => "icon",
            AssetKind::Splash => "splash",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How iOS resources are laid out inside the Xcode project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IosLayout {
    /// `Images.xcassets` asset catalog sets with `Contents.json` manifests.
    #[default]
    AssetCatalog,
    /// Flat `Resources/icons` and `Resources/splash` directories used by
    /// older Xcode templates.
    Legacy,
}

/// Role of an image inside an Xcode asset catalog set.
///
/// Serialized with the key names Xcode expects in `Contents.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageRole {
    pub idiom: String,
    pub scale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_system_version: Option<String>,
}

impl ImageRole {
    /// App icon slot, e.g. `icon("iphone", "60x60", "2x")`.
    pub fn icon(idiom: &str, size: &str, scale: &str) -> Self {
        ImageRole {
            idiom: idiom.to_string(),
            scale: scale.to_string(),
            size: Some(size.to_string()),
            orientation: None,
            extent: None,
            subtype: None,
            minimum_system_version: None,
        }
    }

    /// Full-screen launch image slot.
    pub fn launch(idiom: &str, orientation: &str, scale: &str, min_version: &str) -> Self {
        ImageRole {
            idiom: idiom.to_string(),
            scale: scale.to_string(),
            size: None,
            orientation: Some(orientation.to_string()),
            extent: Some("full-screen".to_string()),
            subtype: None,
            minimum_system_version: Some(min_version.to_string()),
        }
    }

    pub fn with_subtype(mut self, subtype: &str) -> Self {
        self.subtype = Some(subtype.to_string());
        self
    }
}

/// One output bitmap required by a platform.
///
/// The source is resized to `width × height`. When `crop_height` is set, the
/// resized image is then cropped (centre-anchored) to `width × crop_height`,
/// which is how wide tiles are derived from a square icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSpec {
    /// File name (or relative path) under the platform's output directory.
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<ImageRole>,
}

impl AssetSpec {
    pub fn new(file_name: impl Into<String>, width: u32, height: u32) -> Self {
        AssetSpec {
            file_name: file_name.into(),
            width,
            height,
            crop_height: None,
            roles: Vec::new(),
        }
    }

    pub fn square(file_name: impl Into<String>, size: u32) -> Self {
        Self::new(file_name, size, size)
    }

    pub fn cropped_to(mut self, crop_height: u32) -> Self {
        self.crop_height = Some(crop_height);
        self
    }

    pub fn with_role(mut self, role: ImageRole) -> Self {
        self.roles.push(role);
        self
    }

    /// Dimensions of the file that ends up on disk.
    pub fn output_size(&self) -> (u32, u32) {
        (self.width, self.crop_height.unwrap_or(self.height))
    }

    fn validate(&self, platform: &str) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidAsset {
            platform: platform.to_string(),
            file: self.file_name.clone(),
            reason,
        };

        if self.file_name.trim().is_empty() {
            return Err(invalid("empty file name".to_string()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(crop) = self.crop_height {
            if crop == self.height {
                return Err(invalid("crop height equals height".to_string()));
            }
            if crop == 0 || crop > self.height {
                return Err(invalid(format!(
                    "crop height {} outside 1..={}",
                    crop, self.height
                )));
            }
        }
        Ok(())
    }
}

/// Static description of one target platform.
///
/// Directory templates are relative to the project root and may contain
/// [`PROJECT_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub id: String,
    /// Directory whose presence means the platform was added to the project.
    pub detection_path: PathBuf,
    pub icon_dir: PathBuf,
    #[serde(default)]
    pub splash_dir: PathBuf,
    /// Icons are composited over `--background` when one is given.
    #[serde(default)]
    pub icon_background: bool,
    #[serde(default)]
    pub icons: Vec<AssetSpec>,
    #[serde(default)]
    pub splashes: Vec<AssetSpec>,
}

impl PlatformSpec {
    pub fn assets(&self, kind: AssetKind) -> &[AssetSpec] {
        match kind {
            AssetKind::Icon => &self.icons,
            AssetKind::Splash => &self.splashes,
        }
    }

    pub fn dir_template(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Icon => &self.icon_dir,
            AssetKind::Splash => &self.splash_dir,
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for kind in AssetKind::ALL {
            let mut seen = HashSet::new();
            for asset in self.assets(kind) {
                asset.validate(&self.id)?;
                if !seen.insert(asset.file_name.as_str()) {
                    return Err(CatalogError::InvalidAsset {
                        platform: self.id.clone(),
                        file: asset.file_name.clone(),
                        reason: format!("duplicate {} file name", kind),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A catalog-replacing declaration for one platform, typically read from
/// the project's `config.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformDeclaration {
    pub platform: String,
    pub icons: Vec<AssetSpec>,
    pub splashes: Vec<AssetSpec>,
}

/// Errors raised while loading or narrowing a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid asset '{file}' for platform '{platform}': {reason}")]
    InvalidAsset {
        platform: String,
        file: String,
        reason: String,
    },

    #[error("duplicate platform '{0}' in catalog")]
    DuplicatePlatform(String),

    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),
}

/// Ordered set of platform specifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    platforms: Vec<PlatformSpec>,
}

impl Catalog {
    pub fn new(platforms: Vec<PlatformSpec>) -> Result<Self, CatalogError> {
        let catalog = Catalog { platforms };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in catalog: ios, android, windows, osx, web.
    pub fn builtin(layout: IosLayout) -> Self {
        Catalog {
            platforms: tables::all(layout),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Platforms in catalog order.
    pub fn platforms(&self) -> &[PlatformSpec] {
        &self.platforms
    }

    pub fn get(&self, id: &str) -> Option<&PlatformSpec> {
        self.platforms.iter().find(|p| p.id == id)
    }

    /// Keep only the named platforms, preserving catalog order.
    pub fn retain(&mut self, ids: &[String]) -> Result<(), CatalogError> {
        for id in ids {
            if self.get(id).is_none() {
                return Err(CatalogError::UnknownPlatform(id.clone()));
            }
        }
        self.platforms.retain(|p| ids.iter().any(|id| *id == p.id));
        Ok(())
    }

    /// Replace asset lists with project-declared ones.
    ///
    /// A declaration replaces a kind only when it lists at least one asset of
    /// that kind. Declared file names are relative to the project root, so
    /// the corresponding directory template becomes the root itself.
    /// Declarations for platforms outside the catalog are ignored.
    pub fn apply_declarations(
        &mut self,
        declarations: &[PlatformDeclaration],
    ) -> Result<(), CatalogError> {
        for declaration in declarations {
            let Some(platform) = self
                .platforms
                .iter_mut()
                .find(|p| p.id == declaration.platform)
            else {
                tracing::debug!(
                    "ignoring declarations for unknown platform '{}'",
                    declaration.platform
                );
                continue;
            };

            if !declaration.icons.is_empty() {
                platform.icons = declaration.icons.clone();
                platform.icon_dir = PathBuf::new();
            }
            if !declaration.splashes.is_empty() {
                platform.splashes = declaration.splashes.clone();
                platform.splash_dir = PathBuf::new();
            }
            platform.validate()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        for platform in &self.platforms {
            if !ids.insert(platform.id.as_str()) {
                return Err(CatalogError::DuplicatePlatform(platform.id.clone()));
            }
            platform.validate()?;
        }
        Ok(())
    }
}
