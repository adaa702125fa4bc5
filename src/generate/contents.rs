//! `Contents.json` manifests for Xcode asset catalog sets.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::catalog::ImageRole;
use crate::generate::GenerationResult;
use crate::utils::file_ops::{WriteStatus, write_atomic};

pub const CONTENTS_FILENAME: &str = "Contents.json";

const SET_EXTENSIONS: [&str; 2] = ["appiconset", "launchimage"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsImage {
    pub filename: String,
    #[serde(flatten)]
    pub role: ImageRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsInfo {
    pub version: u32,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contents {
    pub images: Vec<ContentsImage>,
    pub info: ContentsInfo,
}

impl Contents {
    /// Manifest listing every successfully generated asset that declares a
    /// role. One file may fill several roles.
    pub fn from_results(results: &[GenerationResult]) -> Self {
        let images = results
            .iter()
            .filter(|r| r.is_success())
            .flat_map(|r| {
                r.asset.roles.iter().map(|role| ContentsImage {
                    filename: r.asset.file_name.clone(),
                    role: role.clone(),
                })
            })
            .collect();

        Contents {
            images,
            info: ContentsInfo {
                version: 1,
                author: env!("CARGO_PKG_NAME").to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn load(path: &Path) -> io::Result<Contents> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save(&self, path: &Path) -> io::Result<WriteStatus> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        write_atomic(path, content.as_bytes())
    }
}

/// Whether `dir` is an Xcode asset catalog set that needs a manifest.
pub fn is_asset_set(dir: &Path) -> bool {
    dir.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SET_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AssetKind, AssetSpec};
    use crate::generate::Outcome;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn result(asset: AssetSpec, outcome: Outcome) -> GenerationResult {
        GenerationResult {
            platform: "ios".to_string(),
            kind: AssetKind::Icon,
            path: PathBuf::from(&asset.file_name),
            asset,
            outcome,
        }
    }

    #[test]
    fn detects_asset_sets() {
        assert!(is_asset_set(Path::new("ios/App/Images.xcassets/AppIcon.appiconset")));
        assert!(is_asset_set(Path::new("ios/App/Images.xcassets/LaunchImage.launchimage")));
        assert!(!is_asset_set(Path::new("ios/App/Resources/icons")));
        assert!(!is_asset_set(Path::new("")));
    }

    #[test]
    fn lists_only_successful_assets_with_roles() {
        let results = vec![
            result(
                AssetSpec::square("icon-20@2x.png", 40)
                    .with_role(ImageRole::icon("iphone", "20x20", "2x"))
                    .with_role(ImageRole::icon("ipad", "20x20", "2x")),
                Outcome::Written,
            ),
            result(
                AssetSpec::square("icon-60@2x.png", 120)
                    .with_role(ImageRole::icon("iphone", "60x60", "2x")),
                Outcome::Failed {
                    reason: "boom".to_string(),
                },
            ),
            result(AssetSpec::square("no-role.png", 10), Outcome::Unchanged),
        ];

        let contents = Contents::from_results(&results);

        assert_eq!(contents.images.len(), 2);
        assert!(contents.images.iter().all(|i| i.filename == "icon-20@2x.png"));
        assert_eq!(contents.images[1].role.idiom, "ipad");
    }

    #[test]
    fn serializes_xcode_keys() {
        let results = vec![result(
            AssetSpec::new("Default-736h.png", 1242, 2208)
                .with_role(ImageRole::launch("iphone", "portrait", "3x", "8.0").with_subtype("736h")),
            Outcome::Written,
        )];

        let json = serde_json::to_string_pretty(&Contents::from_results(&results)).unwrap();

        assert!(json.contains("\"filename\": \"Default-736h.png\""));
        assert!(json.contains("\"minimum-system-version\": \"8.0\""));
        assert!(json.contains("\"extent\": \"full-screen\""));
        assert!(json.contains("\"subtype\": \"736h\""));
        assert!(!json.contains("\"size\""));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("AppIcon.appiconset").join(CONTENTS_FILENAME);
        let contents = Contents::from_results(&[result(
            AssetSpec::square("icon-1024.png", 1024)
                .with_role(ImageRole::icon("ios-marketing", "1024x1024", "1x")),
            Outcome::Written,
        )]);

        contents.save(&path).unwrap();

        assert_eq!(Contents::load(&path).unwrap(), contents);
    }
}
