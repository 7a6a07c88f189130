//! Platform manifest documents: adaptive-icon XML, the iOS asset
//! catalog `Contents.json`, and the web manifest icons fragment.

use serde::Serialize;

use crate::error::RenderError;

// ============================================================================
// Android adaptive icon XML
// ============================================================================

/// The three-element adaptive icon document referencing the
/// background, foreground and monochrome drawables by resource name.
pub fn adaptive_icon_xml(name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<adaptive-icon xmlns:android="http://schemas.android.com/apk/res/android">
  <background android:drawable="@mipmap/{name}_background"/>
  <foreground android:drawable="@mipmap/{name}_foreground"/>
  <monochrome android:drawable="@mipmap/{name}_monochrome"/>
</adaptive-icon>"#
    )
}

// ============================================================================
// iOS Contents.json
// ============================================================================

/// One slot of the iOS app icon set.
#[derive(Debug, Clone, Copy)]
pub struct IosArtifactSpec {
    /// Filename modifier, e.g. `"@2x"` or `"-83.5@2x~ipad"`.
    pub modifier: &'static str,
    pub idiom: &'static str,
    pub scale: u32,
    /// Point size; fractional for the 83.5pt iPad Pro slot.
    pub size_points: f32,
    pub size_pixels: u32,
}

const fn spec(
    modifier: &'static str,
    idiom: &'static str,
    scale: u32,
    size_points: f32,
    size_pixels: u32,
) -> IosArtifactSpec {
    IosArtifactSpec {
        modifier,
        idiom,
        scale,
        size_points,
        size_pixels,
    }
}

/// Every slot of the iOS icon set, keyed by filename modifier.
/// https://developer.apple.com/library/archive/documentation/Xcode/Reference/xcode_ref-Asset_Catalog_Format/Contents.html
pub const IOS_ARTIFACT_SPECS: &[IosArtifactSpec] = &[
    // app icons
    spec("@2x", "iphone", 2, 60.0, 120),
    spec("@3x", "iphone", 3, 60.0, 180),
    spec("~ipad", "ipad", 1, 76.0, 76),
    spec("@2x~ipad", "ipad", 2, 76.0, 152),
    spec("-83.5@2x~ipad", "ipad", 2, 83.5, 167), // ipad pro
    // spotlight
    spec("-40@2x", "iphone", 2, 40.0, 80),
    spec("-40@3x", "iphone", 3, 40.0, 120),
    spec("-40~ipad", "ipad", 1, 40.0, 40),
    spec("-40@2x~ipad", "ipad", 2, 40.0, 80),
    // notifications
    spec("-20@2x", "iphone", 2, 20.0, 40),
    spec("-20@3x", "iphone", 3, 20.0, 60),
    spec("-20~ipad", "ipad", 1, 20.0, 20),
    spec("-20@2x~ipad", "ipad", 2, 20.0, 40),
    // settings
    spec("-29", "iphone", 1, 29.0, 29),
    spec("-29@2x", "iphone", 2, 29.0, 58),
    spec("-29@3x", "iphone", 3, 29.0, 87),
    spec("-29~ipad", "ipad", 1, 29.0, 29),
    spec("-29@2x~ipad", "ipad", 2, 29.0, 58),
    // carplay
    spec("-60@2x~car", "car", 2, 60.0, 120),
    spec("-60@3x~car", "car", 3, 60.0, 180),
    // store
    spec("~ios-marketing", "ios-marketing", 1, 1024.0, 1024),
];

#[derive(Serialize)]
struct ContentsImage {
    filename: String,
    idiom: &'static str,
    scale: String,
    size: String,
}

#[derive(Serialize)]
struct ContentsInfo {
    author: &'static str,
    version: u32,
}

#[derive(Serialize)]
struct Contents {
    images: Vec<ContentsImage>,
    info: ContentsInfo,
}

/// Prints a point size the way asset catalogs expect: integral sizes
/// without a decimal point, `83.5` with one.
fn format_points(points: f32) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as u32)
    } else {
        format!("{points}")
    }
}

/// The asset catalog `Contents.json` for [`IOS_ARTIFACT_SPECS`].
pub fn ios_contents_json() -> Result<String, RenderError> {
    let contents = Contents {
        images: IOS_ARTIFACT_SPECS
            .iter()
            .map(|spec| ContentsImage {
                filename: format!("AppIcon{}.png", spec.modifier),
                idiom: spec.idiom,
                scale: format!("{}x", spec.scale),
                size: format!(
                    "{0}x{0}",
                    format_points(spec.size_points)
                ),
            })
            .collect(),
        info: ContentsInfo {
            author: "iconsmith",
            version: 1,
        },
    };
    Ok(serde_json::to_string_pretty(&contents)?)
}

// ============================================================================
// Web manifest fragment
// ============================================================================

#[derive(Serialize)]
struct ManifestIcon {
    src: &'static str,
    #[serde(rename = "type")]
    mime: &'static str,
    sizes: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<&'static str>,
}

#[derive(Serialize)]
struct ManifestIcons {
    icons: Vec<ManifestIcon>,
}

/// The `icons` fragment for a web app manifest, covering the files
/// the web target emits.
pub fn web_manifest_icons() -> Result<String, RenderError> {
    let icons = ManifestIcons {
        icons: vec![
            ManifestIcon {
                src: "/favicon.ico",
                mime: "image/x-icon",
                sizes: "16x16 32x32",
                purpose: None,
            },
            ManifestIcon {
                src: "/icon-192.png",
                mime: "image/png",
                sizes: "192x192",
                purpose: None,
            },
            ManifestIcon {
                src: "/icon-512.png",
                mime: "image/png",
                sizes: "512x512",
                purpose: None,
            },
            ManifestIcon {
                src: "/icon-192-maskable.png",
                mime: "image/png",
                sizes: "192x192",
                purpose: Some("maskable"),
            },
            ManifestIcon {
                src: "/icon-512-maskable.png",
                mime: "image/png",
                sizes: "512x512",
                purpose: Some("maskable"),
            },
        ],
    };
    Ok(serde_json::to_string_pretty(&icons)?)
}

/// Deployment instructions bundled alongside the web icons.
pub fn web_readme() -> String {
    r#"Add this to your HTML <head>:

    <link rel="icon" href="/favicon.ico" sizes="any">
    <link rel="apple-touch-icon" href="/apple-touch-icon.png">

Add this to your app's manifest.json:

    ...
    {
      "icons": [
        { "src": "/favicon.ico", "type": "image/x-icon", "sizes": "16x16 32x32" },
        { "src": "/icon-192.png", "type": "image/png", "sizes": "192x192" },
        { "src": "/icon-512.png", "type": "image/png", "sizes": "512x512" },
        { "src": "/icon-192-maskable.png", "type": "image/png", "sizes": "192x192", "purpose": "maskable" },
        { "src": "/icon-512-maskable.png", "type": "image/png", "sizes": "512x512", "purpose": "maskable" }
      ]
    }
    ...
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_xml_references_all_three_drawables() {
        let xml = adaptive_icon_xml("ic_launcher");
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<background android:drawable="@mipmap/ic_launcher_background"/>"#));
        assert!(xml.contains(r#"<foreground android:drawable="@mipmap/ic_launcher_foreground"/>"#));
        assert!(xml.contains(r#"<monochrome android:drawable="@mipmap/ic_launcher_monochrome"/>"#));
    }

    #[test]
    fn contents_json_is_valid_and_complete() {
        let json = ios_contents_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let images = parsed["images"].as_array().unwrap();
        assert_eq!(images.len(), IOS_ARTIFACT_SPECS.len());
        assert_eq!(parsed["info"]["version"], 1);
    }

    #[test]
    fn contents_json_formats_fractional_points() {
        let json = ios_contents_json().unwrap();
        assert!(json.contains(r#""size": "83.5x83.5""#));
        assert!(json.contains(r#""size": "60x60""#));
        assert!(json.contains(r#""filename": "AppIcon-83.5@2x~ipad.png""#));
    }

    #[test]
    fn manifest_fragment_has_maskable_variants() {
        let json = web_manifest_icons().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let icons = parsed["icons"].as_array().unwrap();
        assert_eq!(icons.len(), 5);
        let maskable = icons
            .iter()
            .filter(|i| i["purpose"] == "maskable")
            .count();
        assert_eq!(maskable, 2);
        assert!(icons.iter().all(|i| i["src"].as_str().is_some()));
    }
}
