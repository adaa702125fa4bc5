//! Built-in asset tables.
//!
//! File names and pixel sizes are dictated by each platform's packaging
//! rules; do not "tidy" them.

use super::{AssetSpec, ImageRole, IosLayout, PlatformSpec};
use std::path::PathBuf;

pub(super) fn all(layout: IosLayout) -> Vec<PlatformSpec> {
    vec![ios(layout), android(), blackberry(), windows(), osx(), web()]
}

fn ios(layout: IosLayout) -> PlatformSpec {
    let (icon_dir, splash_dir) = match layout {
        IosLayout::AssetCatalog => (
            "platforms/ios/{project}/Images.xcassets/AppIcon.appiconset",
            "platforms/ios/{project}/Images.xcassets/LaunchImage.launchimage",
        ),
        IosLayout::Legacy => (
            "platforms/ios/{project}/Resources/icons",
            "platforms/ios/{project}/Resources/splash",
        ),
    };

    let icons = vec![
        AssetSpec::square("icon-20.png", 20).with_role(ImageRole::icon("ipad", "20x20", "1x")),
        AssetSpec::square("icon-20@2x.png", 40)
            .with_role(ImageRole::icon("iphone", "20x20", "2x"))
            .with_role(ImageRole::icon("ipad", "20x20", "2x")),
        AssetSpec::square("icon-20@3x.png", 60).with_role(ImageRole::icon("iphone", "20x20", "3x")),
        AssetSpec::square("icon-small.png", 29)
            .with_role(ImageRole::icon("iphone", "29x29", "1x"))
            .with_role(ImageRole::icon("ipad", "29x29", "1x")),
        AssetSpec::square("icon-small@2x.png", 58)
            .with_role(ImageRole::icon("iphone", "29x29", "2x"))
            .with_role(ImageRole::icon("ipad", "29x29", "2x")),
        AssetSpec::square("icon-small@3x.png", 87).with_role(ImageRole::icon("iphone", "29x29", "3x")),
        AssetSpec::square("icon-40.png", 40).with_role(ImageRole::icon("ipad", "40x40", "1x")),
        AssetSpec::square("icon-40@2x.png", 80)
            .with_role(ImageRole::icon("iphone", "40x40", "2x"))
            .with_role(ImageRole::icon("ipad", "40x40", "2x")),
        AssetSpec::square("icon-40@3x.png", 120).with_role(ImageRole::icon("iphone", "40x40", "3x")),
        AssetSpec::square("icon-50.png", 50).with_role(ImageRole::icon("ipad", "50x50", "1x")),
        AssetSpec::square("icon-50@2x.png", 100).with_role(ImageRole::icon("ipad", "50x50", "2x")),
        AssetSpec::square("icon.png", 57).with_role(ImageRole::icon("iphone", "57x57", "1x")),
        AssetSpec::square("icon@2x.png", 114).with_role(ImageRole::icon("iphone", "57x57", "2x")),
        AssetSpec::square("icon-60@2x.png", 120).with_role(ImageRole::icon("iphone", "60x60", "2x")),
        AssetSpec::square("icon-60@3x.png", 180).with_role(ImageRole::icon("iphone", "60x60", "3x")),
        AssetSpec::square("icon-72.png", 72).with_role(ImageRole::icon("ipad", "72x72", "1x")),
        AssetSpec::square("icon-72@2x.png", 144).with_role(ImageRole::icon("ipad", "72x72", "2x")),
        AssetSpec::square("icon-76.png", 76).with_role(ImageRole::icon("ipad", "76x76", "1x")),
        AssetSpec::square("icon-76@2x.png", 152).with_role(ImageRole::icon("ipad", "76x76", "2x")),
        AssetSpec::square("icon-83.5@2x.png", 167)
            .with_role(ImageRole::icon("ipad", "83.5x83.5", "2x")),
        AssetSpec::square("icon-1024.png", 1024)
            .with_role(ImageRole::icon("ios-marketing", "1024x1024", "1x")),
    ];

    let splashes = vec![
        AssetSpec::new("Default~iphone.png", 320, 480)
            .with_role(ImageRole::launch("iphone", "portrait", "1x", "7.0")),
        AssetSpec::new("Default@2x~iphone.png", 640, 960)
            .with_role(ImageRole::launch("iphone", "portrait", "2x", "7.0")),
        AssetSpec::new("Default-568h@2x~iphone.png", 640, 1136)
            .with_role(ImageRole::launch("iphone", "portrait", "2x", "7.0").with_subtype("retina4")),
        AssetSpec::new("Default-667h.png", 750, 1334)
            .with_role(ImageRole::launch("iphone", "portrait", "2x", "8.0").with_subtype("667h")),
        AssetSpec::new("Default-736h.png", 1242, 2208)
            .with_role(ImageRole::launch("iphone", "portrait", "3x", "8.0").with_subtype("736h")),
        AssetSpec::new("Default-Landscape-736h.png", 2208, 1242)
            .with_role(ImageRole::launch("iphone", "landscape", "3x", "8.0").with_subtype("736h")),
        AssetSpec::new("Default-Portrait~ipad.png", 768, 1024)
            .with_role(ImageRole::launch("ipad", "portrait", "1x", "7.0")),
        AssetSpec::new("Default-Portrait@2x~ipad.png", 1536, 2048)
            .with_role(ImageRole::launch("ipad", "portrait", "2x", "7.0")),
        AssetSpec::new("Default-Landscape~ipad.png", 1024, 768)
            .with_role(ImageRole::launch("ipad", "landscape", "1x", "7.0")),
        AssetSpec::new("Default-Landscape@2x~ipad.png", 2048, 1536)
            .with_role(ImageRole::launch("ipad", "landscape", "2x", "7.0")),
    ];

    PlatformSpec {
        id: "ios".to_string(),
        detection_path: PathBuf::from("platforms/ios"),
        icon_dir: PathBuf::from(icon_dir),
        splash_dir: PathBuf::from(splash_dir),
        icon_background: false,
        icons,
        splashes,
    }
}

fn android() -> PlatformSpec {
    const ICONS: [(&str, u32); 7] = [
        ("drawable", 96),
        ("drawable-ldpi", 36),
        ("drawable-mdpi", 48),
        ("drawable-hdpi", 72),
        ("drawable-xhdpi", 96),
        ("drawable-xxhdpi", 144),
        ("drawable-xxxhdpi", 192),
    ];
    const SPLASHES: [(&str, u32, u32); 12] = [
        ("drawable-land-ldpi", 320, 200),
        ("drawable-land-mdpi", 480, 320),
        ("drawable-land-hdpi", 800, 480),
        ("drawable-land-xhdpi", 1280, 720),
        ("drawable-land-xxhdpi", 1600, 960),
        ("drawable-land-xxxhdpi", 1920, 1280),
        ("drawable-port-ldpi", 200, 320),
        ("drawable-port-mdpi", 320, 480),
        ("drawable-port-hdpi", 480, 800),
        ("drawable-port-xhdpi", 720, 1280),
        ("drawable-port-xxhdpi", 960, 1600),
        ("drawable-port-xxxhdpi", 1280, 1920),
    ];

    PlatformSpec {
        id: "android".to_string(),
        detection_path: PathBuf::from("platforms/android"),
        icon_dir: PathBuf::from("platforms/android/res"),
        splash_dir: PathBuf::from("platforms/android/res"),
        icon_background: false,
        icons: ICONS
            .iter()
            .map(|(dir, size)| AssetSpec::square(format!("{}/icon.png", dir), *size))
            .collect(),
        splashes: SPLASHES
            .iter()
            .map(|(dir, w, h)| AssetSpec::new(format!("{}/screen.png", dir), *w, *h))
            .collect(),
    }
}

fn blackberry() -> PlatformSpec {
    PlatformSpec {
        id: "blackberry".to_string(),
        detection_path: PathBuf::from("platforms/bb10"),
        icon_dir: PathBuf::from("platforms/bb10/www/res/icon"),
        splash_dir: PathBuf::from("platforms/bb10/www/res/screen"),
        icon_background: false,
        icons: vec![
            AssetSpec::square("icon-86.png", 86),
            AssetSpec::square("icon-150.png", 150),
        ],
        splashes: vec![
            AssetSpec::new("splash-720x720.png", 720, 720),
            AssetSpec::new("splash-768x1280.png", 768, 1280),
            AssetSpec::new("splash-1280x768.png", 1280, 768),
        ],
    }
}

fn windows() -> PlatformSpec {
    let icons = vec![
        AssetSpec::square("StoreLogo.scale-100.png", 50),
        AssetSpec::square("StoreLogo.scale-125.png", 63),
        AssetSpec::square("StoreLogo.scale-150.png", 75),
        AssetSpec::square("StoreLogo.scale-200.png", 100),
        AssetSpec::square("StoreLogo.scale-400.png", 200),
        AssetSpec::square("Square30x30Logo.scale-100.png", 30),
        AssetSpec::square("Square44x44Logo.scale-100.png", 44),
        AssetSpec::square("Square44x44Logo.scale-125.png", 55),
        AssetSpec::square("Square44x44Logo.scale-150.png", 66),
        AssetSpec::square("Square44x44Logo.scale-200.png", 88),
        AssetSpec::square("Square44x44Logo.scale-240.png", 106),
        AssetSpec::square("Square44x44Logo.scale-400.png", 176),
        AssetSpec::square("Square70x70Logo.scale-100.png", 70),
        AssetSpec::square("Square71x71Logo.scale-100.png", 71),
        AssetSpec::square("Square71x71Logo.scale-240.png", 170),
        AssetSpec::square("Square150x150Logo.scale-100.png", 150),
        AssetSpec::square("Square150x150Logo.scale-125.png", 188),
        AssetSpec::square("Square150x150Logo.scale-150.png", 225),
        AssetSpec::square("Square150x150Logo.scale-200.png", 300),
        AssetSpec::square("Square150x150Logo.scale-240.png", 360),
        AssetSpec::square("Square150x150Logo.scale-400.png", 600),
        AssetSpec::square("Square310x310Logo.scale-100.png", 310),
        AssetSpec::square("Wide310x150Logo.scale-100.png", 310).cropped_to(150),
        AssetSpec::square("Wide310x150Logo.scale-240.png", 744).cropped_to(360),
    ];

    let splashes = vec![
        AssetSpec::new("SplashScreen.scale-100.png", 620, 300),
        AssetSpec::new("SplashScreen.scale-125.png", 775, 375),
        AssetSpec::new("SplashScreen.scale-150.png", 930, 450),
        AssetSpec::new("SplashScreen.scale-200.png", 1240, 600),
        AssetSpec::new("SplashScreen.scale-400.png", 2480, 1200),
        AssetSpec::new("SplashScreenPhone.scale-240.png", 1152, 1920),
    ];

    PlatformSpec {
        id: "windows".to_string(),
        detection_path: PathBuf::from("platforms/windows"),
        icon_dir: PathBuf::from("platforms/windows/images"),
        splash_dir: PathBuf::from("platforms/windows/images"),
        icon_background: true,
        icons,
        splashes,
    }
}

fn osx() -> PlatformSpec {
    let icons = vec![
        AssetSpec::square("icon-16x16.png", 16).with_role(ImageRole::icon("mac", "16x16", "1x")),
        AssetSpec::square("icon-32x32.png", 32)
            .with_role(ImageRole::icon("mac", "16x16", "2x"))
            .with_role(ImageRole::icon("mac", "32x32", "1x")),
        AssetSpec::square("icon-64x64.png", 64).with_role(ImageRole::icon("mac", "32x32", "2x")),
        AssetSpec::square("icon-128x128.png", 128).with_role(ImageRole::icon("mac", "128x128", "1x")),
        AssetSpec::square("icon-256x256.png", 256)
            .with_role(ImageRole::icon("mac", "128x128", "2x"))
            .with_role(ImageRole::icon("mac", "256x256", "1x")),
        AssetSpec::square("icon-512x512.png", 512)
            .with_role(ImageRole::icon("mac", "256x256", "2x"))
            .with_role(ImageRole::icon("mac", "512x512", "1x")),
        AssetSpec::square("icon-1024x1024.png", 1024)
            .with_role(ImageRole::icon("mac", "512x512", "2x")),
    ];

    PlatformSpec {
        id: "osx".to_string(),
        detection_path: PathBuf::from("platforms/osx"),
        icon_dir: PathBuf::from("platforms/osx/{project}/Images.xcassets/AppIcon.appiconset"),
        splash_dir: PathBuf::new(),
        icon_background: false,
        icons,
        splashes: Vec::new(),
    }
}

fn web() -> PlatformSpec {
    let icons = vec![
        AssetSpec::square("favicon-16x16.png", 16),
        AssetSpec::square("favicon-32x32.png", 32),
        AssetSpec::square("apple-touch-icon.png", 180),
        AssetSpec::square("android-chrome-192x192.png", 192),
        AssetSpec::square("android-chrome-512x512.png", 512),
    ];

    PlatformSpec {
        id: "web".to_string(),
        detection_path: PathBuf::from("www"),
        icon_dir: PathBuf::from("www/img/icons"),
        splash_dir: PathBuf::new(),
        icon_background: false,
        icons,
        splashes: Vec::new(),
    }
}
