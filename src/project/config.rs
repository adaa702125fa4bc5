use std::fs;
use std::path::{Component, Path, PathBuf};

use roxmltree::{Document, Node};

use crate::catalog::{AssetKind, AssetSpec, PlatformDeclaration};

/// Android density buckets accepted in place of explicit icon sizes.
const ICON_DENSITIES: [(&str, u32); 6] = [
    ("ldpi", 36),
    ("mdpi", 48),
    ("hdpi", 72),
    ("xhdpi", 96),
    ("xxhdpi", 144),
    ("xxxhdpi", 192),
];

const SPLASH_DENSITIES: [(&str, u32, u32); 12] = [
    ("land-ldpi", 320, 200),
    ("land-mdpi", 480, 320),
    ("land-hdpi", 800, 480),
    ("land-xhdpi", 1280, 720),
    ("land-xxhdpi", 1600, 960),
    ("land-xxxhdpi", 1920, 1280),
    ("port-ldpi", 200, 320),
    ("port-mdpi", 320, 480),
    ("port-hdpi", 480, 800),
    ("port-xhdpi", 720, 1280),
    ("port-xxhdpi", 960, 1600),
    ("port-xxxhdpi", 1280, 1920),
];

/// Errors raised while reading the project configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file does not exist: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("config has no <name> element under <widget>")]
    MissingName,

    #[error("project name '{0}' must be a single directory name")]
    InvalidName(String),

    #[error("invalid <{element}> declaration for platform '{platform}': {reason}")]
    InvalidDeclaration {
        platform: String,
        element: String,
        reason: String,
    },
}

/// What the pipeline needs from the project's `config.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    pub declarations: Vec<PlatformDeclaration>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }
        let xml = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&xml)
    }

    pub fn parse(xml: &str) -> Result<Self, ConfigError> {
        let doc = Document::parse(xml)?;
        let widget = doc.root_element();

        let name = project_name(widget)?;
        let declarations = widget
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "platform")
            .map(platform_declaration)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProjectConfig { name, declarations })
    }
}

/// Extract only the project name from config XML.
pub fn parse_project_name(xml: &str) -> Result<String, ConfigError> {
    let doc = Document::parse(xml)?;
    project_name(doc.root_element())
}

fn project_name(widget: Node<'_, '_>) -> Result<String, ConfigError> {
    if widget.tag_name().name() != "widget" {
        return Err(ConfigError::MissingName);
    }
    widget
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "name")
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ConfigError::MissingName)
        .and_then(checked_name)
}

/// The name becomes a directory inside the platform tree, so it must be one
/// plain path component.
fn checked_name(name: &str) -> Result<String, ConfigError> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single && !name.contains(['/', '\\']) {
        Ok(name.to_string())
    } else {
        Err(ConfigError::InvalidName(name.to_string()))
    }
}

fn platform_declaration(node: Node<'_, '_>) -> Result<PlatformDeclaration, ConfigError> {
    let platform = node.attribute("name").unwrap_or_default().to_string();
    let mut declaration = PlatformDeclaration {
        platform,
        ..Default::default()
    };

    for child in node.children().filter(Node::is_element) {
        let kind = match child.tag_name().name() {
            "icon" => AssetKind::Icon,
            "splash" => AssetKind::Splash,
            _ => continue,
        };
        let asset = declared_asset(&declaration.platform, kind, child)?;
        match kind {
            AssetKind::Icon => declaration.icons.push(asset),
            AssetKind::Splash => declaration.splashes.push(asset),
        }
    }

    Ok(declaration)
}

fn declared_asset(platform: &str, kind: AssetKind, node: Node<'_, '_>) -> Result<AssetSpec, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidDeclaration {
        platform: platform.to_string(),
        element: kind.to_string(),
        reason,
    };

    let src = node
        .attribute("src")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| invalid("missing src attribute".to_string()))?;

    let dimension = |attr: &str| -> Result<Option<u32>, ConfigError> {
        node.attribute(attr)
            .map(|v| {
                v.trim()
                    .parse::<u32>()
                    .map_err(|_| invalid(format!("{} '{}' is not a positive integer", attr, v)))
            })
            .transpose()
    };

    let (width, height) = match (dimension("width")?, dimension("height")?) {
        (Some(w), Some(h)) => (w, h),
        (Some(size), None) | (None, Some(size)) if kind == AssetKind::Icon => (size, size),
        _ => match node.attribute("density") {
            Some(density) => density_size(kind, density)
                .ok_or_else(|| invalid(format!("unknown density '{}'", density)))?,
            None => return Err(invalid("needs width/height or density".to_string())),
        },
    };

    if width == 0 || height == 0 {
        return Err(invalid(format!("dimensions must be positive, got {}x{}", width, height)));
    }

    Ok(AssetSpec::new(src, width, height))
}

fn density_size(kind: AssetKind, density: &str) -> Option<(u32, u32)> {
    match kind {
        AssetKind::Icon => ICON_DENSITIES
            .iter()
            .find(|(d, _)| *d == density)
            .map(|(_, size)| (*size, *size)),
        AssetKind::Splash => SPLASH_DENSITIES
            .iter()
            .find(|(d, _, _)| *d == density)
            .map(|(_, w, h)| (*w, *h)),
    }
}
