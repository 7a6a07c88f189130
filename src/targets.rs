//! Per-platform artifact generation.
//!
//! Each function renders the value bag at the sizes a platform needs
//! and wraps the results in that platform's container and manifest
//! formats. Functions are independent of each other; callers that want
//! several platforms at once can run them in any order (or in
//! parallel, as no mutable state is shared).

use crate::color::Color;
use crate::effects::Effect;
use crate::encode::icns::{IcnsOptions, make_icns, supported_sizes};
use crate::encode::ico::make_ico;
use crate::encode::manifest::{
    IOS_ARTIFACT_SPECS, adaptive_icon_xml, ios_contents_json, web_manifest_icons, web_readme,
};
use crate::encode::Artifact;
use crate::error::RenderError;
use crate::geom::Size;
use crate::renderer::{IconValues, RenderConfig, RenderLayer, render_app_icon};
use crate::shape::{CornerRadii, MACOS_RADIUS, Shape, platform_squircle, rounded_rect_path};
use crate::surface::{GradientStop, Surface};

/// Android density buckets and their scale factors relative to mdpi.
const DENSITIES: &[(&str, f32)] = &[
    ("xxxhdpi", 4.0),
    ("xxhdpi", 3.0),
    ("xhdpi", 2.0),
    ("hdpi", 1.5),
    ("mdpi", 1.0),
];

/// watchOS icon slots: filename modifier and pixel size.
const WATCH_ARTIFACT_SPECS: &[(&str, u32)] = &[
    // home screen icons
    ("-40@2x~watch", 80),  // 38mm/42mm
    ("-44@2x~watch", 88),  // 40mm
    ("-50@2x~watch", 100), // 44mm
    // notification center
    ("-24@2x~watch", 48), // 38mm
    ("-27.5@2x~watch", 55), // 40mm/42mm
    ("-29@2x~watch", 58), // 44mm
    ("-29@3x~watch", 87),
    // short look
    ("-86@2x~watch", 172),  // 38mm
    ("-98@2x~watch", 196),  // 40mm/42mm
    ("-108@2x~watch", 216), // 44mm
    // store
    ("~watch-marketing", 1024),
];

const TV_BANNER: Size = Size { w: 400, h: 240 };

fn png_artifact(
    filename: impl Into<String>,
    values: &IconValues,
    config: &RenderConfig,
) -> Result<Artifact, RenderError> {
    let surface = render_app_icon(values, config)?;
    Ok(Artifact::new(filename, surface.encode_png()?))
}

// ============================================================================
// Android
// ============================================================================

/// Legacy launcher icons leave different margins per silhouette.
fn legacy_content_size(shape: &Shape) -> u32 {
    match shape {
        Shape::Square => 38,
        Shape::Squircle => 42,
        Shape::Circle => 44,
        _ => 38,
    }
}

fn legacy_final_effects(scale: f32) -> Vec<Effect> {
    vec![
        Effect::inner_shadow(Color::WHITE.with_alpha(0.2), 0.0, (0.0, 0.25 * scale)),
        Effect::inner_shadow(Color::BLACK.with_alpha(0.2), 0.0, (0.0, -0.25 * scale)),
        Effect::outer_shadow(Color::BLACK.with_alpha(0.3), 0.7 * scale, (0.0, 0.7 * scale)),
        Effect::FillRadialGradient {
            center: (0.0, 0.0),
            radius: 48.0 * scale,
            stops: vec![
                GradientStop::new(0.0, Color::WHITE.with_alpha(0.1)),
                GradientStop::new(1.0, Color::WHITE.with_alpha(0.0)),
            ],
            opacity: None,
        },
    ]
}

/// Adaptive icon XML plus per-density adaptive layers, legacy icons,
/// and the 512px Play Store rendition.
pub fn android_artifacts(values: &IconValues, name: &str) -> Result<Vec<Artifact>, RenderError> {
    let mut artifacts = vec![Artifact::new(
        format!("res/mipmap-anydpi-v26/{name}.xml"),
        adaptive_icon_xml(name).into_bytes(),
    )];

    artifacts.push(png_artifact(
        "play_store_512.png",
        values,
        &RenderConfig::new(Size::square(512), Shape::SquareSharp),
    )?);

    for (density, scale) in DENSITIES {
        let adaptive_size = Size::square((108.0 * scale) as u32);
        let adaptive_content = Size::square((72.0 * scale) as u32);
        for (suffix, layer, monochrome) in [
            ("_background", RenderLayer::Background, false),
            ("_foreground", RenderLayer::Foreground, false),
            ("_monochrome", RenderLayer::Foreground, true),
        ] {
            let mut config = RenderConfig::new(adaptive_size, Shape::SquareSharp);
            config.content_size = Some(adaptive_content);
            config.layer = layer;
            config.android_monochrome = monochrome;
            artifacts.push(png_artifact(
                format!("res/mipmap-{density}/{name}{suffix}.png"),
                values,
                &config,
            )?);
        }

        let legacy = legacy_content_size(&values.bg_shape);
        let mut config = RenderConfig::new(
            Size::square((48.0 * scale) as u32),
            values.bg_shape.clone(),
        );
        config.content_size = Some(Size::square((legacy as f32 * scale) as u32));
        config.final_effects = legacy_final_effects(*scale);
        artifacts.push(png_artifact(
            format!("res/mipmap-{density}/{name}.png"),
            values,
            &config,
        )?);
    }

    Ok(artifacts)
}

// ============================================================================
// iOS
// ============================================================================

/// `Contents.json` plus the full AppIcon PNG set. Slots sharing a
/// pixel size share one rendered image.
pub fn ios_artifacts(values: &IconValues) -> Result<Vec<Artifact>, RenderError> {
    let mut artifacts = vec![Artifact::new(
        "Contents.json",
        ios_contents_json()?.into_bytes(),
    )];

    let mut by_size: Vec<(u32, Vec<u8>)> = Vec::new();
    for spec in IOS_ARTIFACT_SPECS {
        let png = match by_size.iter().find(|(s, _)| *s == spec.size_pixels) {
            Some((_, png)) => png.clone(),
            None => {
                let config =
                    RenderConfig::new(Size::square(spec.size_pixels), Shape::SquareSharp);
                let png = render_app_icon(values, &config)?.encode_png()?;
                by_size.push((spec.size_pixels, png.clone()));
                png
            }
        };
        artifacts.push(Artifact::new(format!("AppIcon{}.png", spec.modifier), png));
    }

    Ok(artifacts)
}

// ============================================================================
// macOS
// ============================================================================

/// Renders one macOS icon size onto the standard squircle plate.
///
/// Sizes from 128 up get the full plate treatment (inset content with
/// highlight/shade inner shadows and a drop shadow); small sizes are
/// rendered edge to edge so they stay legible.
pub fn render_macos_icon(
    values: &IconValues,
    size: u32,
    force_effects: bool,
) -> Result<Surface, RenderError> {
    let scale = size as f32 / 1024.0;
    let mut config = RenderConfig::new(
        Size::square(size),
        Shape::Path(platform_squircle(MACOS_RADIUS)),
    );

    if size >= 128 || force_effects {
        config.content_size = Some(Size::square((824.0 * scale).round() as u32));
        config.final_effects = vec![
            Effect::inner_shadow(Color::WHITE.with_alpha(0.44), scale, (0.0, 4.0 * scale)),
            Effect::inner_shadow(Color::BLACK.with_alpha(0.25), 2.0 * scale, (0.0, -3.0 * scale)),
            Effect::outer_shadow(Color::BLACK.with_alpha(0.25), 10.0 * scale, (0.0, 14.0 * scale)),
        ];
    }

    render_app_icon(values, &config)
}

/// `AppIcon.icns` with every size the container supports under the
/// given options.
pub fn macos_artifacts(
    values: &IconValues,
    options: &IcnsOptions,
) -> Result<Vec<Artifact>, RenderError> {
    let mut surfaces = Vec::new();
    for size in supported_sizes(options) {
        surfaces.push(render_macos_icon(values, size, false)?);
    }
    Ok(vec![Artifact::new(
        "AppIcon.icns",
        make_icns(&surfaces, options)?,
    )])
}

// ============================================================================
// watchOS
// ============================================================================

/// The watchOS AppIcon PNG set. The system masks these to a circle at
/// display time, so they render unmasked.
pub fn watchos_artifacts(values: &IconValues) -> Result<Vec<Artifact>, RenderError> {
    let mut artifacts = Vec::new();
    let mut by_size: Vec<(u32, Vec<u8>)> = Vec::new();
    for (modifier, size) in WATCH_ARTIFACT_SPECS {
        let png = match by_size.iter().find(|(s, _)| s == size) {
            Some((_, png)) => png.clone(),
            None => {
                let config = RenderConfig::new(Size::square(*size), Shape::SquareSharp);
                let png = render_app_icon(values, &config)?.encode_png()?;
                by_size.push((*size, png.clone()));
                png
            }
        };
        artifacts.push(Artifact::new(format!("AppIcon{modifier}.png"), png));
    }
    Ok(artifacts)
}

// ============================================================================
// tvOS
// ============================================================================

/// Layered tvOS banner (background and foreground planes at 1x/2x)
/// plus the store icon.
pub fn tvos_artifacts(values: &IconValues) -> Result<Vec<Artifact>, RenderError> {
    let mut artifacts = Vec::new();

    for scale in [1u32, 2] {
        let size = Size::new(TV_BANNER.w * scale, TV_BANNER.h * scale);
        for (plane, layer) in [
            ("foreground", RenderLayer::Foreground),
            ("background", RenderLayer::Background),
        ] {
            let mut config = RenderConfig::new(size, Shape::SquareSharp);
            config.layer = layer;
            artifacts.push(png_artifact(
                format!("{scale}x/{plane}.png"),
                values,
                &config,
            )?);
        }
    }

    artifacts.push(png_artifact(
        "app_store_icon.png",
        values,
        &RenderConfig::new(Size::new(1280, 768), Shape::SquareSharp),
    )?);

    Ok(artifacts)
}

// ============================================================================
// Web
// ============================================================================

/// Favicon ICO (16 + 32), touch icon, web app icons and their
/// maskable variants, the manifest icons fragment, and a README.
pub fn web_artifacts(values: &IconValues) -> Result<Vec<Artifact>, RenderError> {
    // Square favicons read better with a slightly rounder corner than
    // the launcher square.
    let favicon_shape = match &values.bg_shape {
        Shape::Square => Shape::Path(rounded_rect_path(
            crate::geom::Rect::unit(),
            CornerRadii::uniform(4.0 / 16.0),
        )),
        other => other.clone(),
    };

    let favicon16 = render_app_icon(
        values,
        &RenderConfig::new(Size::square(16), favicon_shape.clone()),
    )?;
    let favicon32 = render_app_icon(
        values,
        &RenderConfig::new(Size::square(32), favicon_shape.clone()),
    )?;

    let mut artifacts = vec![Artifact::new(
        "favicon.ico",
        make_ico(&[favicon16, favicon32]),
    )];

    artifacts.push(png_artifact(
        "apple-touch-icon.png",
        values,
        &RenderConfig::new(Size::square(180), Shape::SquareSharp),
    )?);

    for size in [192u32, 512] {
        artifacts.push(png_artifact(
            format!("icon-{size}.png"),
            values,
            &RenderConfig::new(Size::square(size), favicon_shape.clone()),
        )?);
        artifacts.push(png_artifact(
            format!("icon-{size}-maskable.png"),
            values,
            &RenderConfig::new(Size::square(size), Shape::SquareSharp),
        )?);
    }

    artifacts.push(Artifact::new(
        "manifest-icons.json",
        web_manifest_icons()?.into_bytes(),
    ));
    artifacts.push(Artifact::new("README.txt", web_readme().into_bytes()));

    Ok(artifacts)
}

// ============================================================================
// Play Store
// ============================================================================

/// The 512px Play Store icon in the user's chosen silhouette.
pub fn play_store_artifacts(values: &IconValues) -> Result<Vec<Artifact>, RenderError> {
    Ok(vec![png_artifact(
        "play_store_512.png",
        values,
        &RenderConfig::new(Size::square(512), values.bg_shape.clone()),
    )?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Background;

    fn values() -> IconValues {
        IconValues {
            background: Background::Color(Color::rgb(30, 60, 90)),
            bg_shape: Shape::Circle,
            ..IconValues::default()
        }
    }

    #[test]
    fn android_set_is_complete() {
        let artifacts = android_artifacts(&values(), "ic_launcher").unwrap();
        // XML + play store + 5 densities x 4 files.
        assert_eq!(artifacts.len(), 2 + 5 * 4);
        let names: Vec<&str> = artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert!(names.contains(&"res/mipmap-anydpi-v26/ic_launcher.xml"));
        assert!(names.contains(&"res/mipmap-xxxhdpi/ic_launcher_monochrome.png"));
        assert!(names.contains(&"res/mipmap-mdpi/ic_launcher.png"));
        assert!(names.contains(&"play_store_512.png"));
    }

    #[test]
    fn android_adaptive_pngs_have_png_signature() {
        let artifacts = android_artifacts(&values(), "ic").unwrap();
        let bg = artifacts
            .iter()
            .find(|a| a.filename == "res/mipmap-mdpi/ic_background.png")
            .unwrap();
        assert_eq!(&bg.content[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn ios_set_shares_renders_across_equal_sizes() {
        let artifacts = ios_artifacts(&values()).unwrap();
        assert_eq!(artifacts.len(), 1 + IOS_ARTIFACT_SPECS.len());
        assert_eq!(artifacts[0].filename, "Contents.json");
        // -40@2x (80px) and -40@2x~ipad (80px) carry identical bytes.
        let a = artifacts
            .iter()
            .find(|a| a.filename == "AppIcon-40@2x.png")
            .unwrap();
        let b = artifacts
            .iter()
            .find(|a| a.filename == "AppIcon-40@2x~ipad.png")
            .unwrap();
        assert_eq!(a.content, b.content);
    }

    #[test]
    fn web_set_has_container_and_manifest() {
        let artifacts = web_artifacts(&values()).unwrap();
        let ico = artifacts
            .iter()
            .find(|a| a.filename == "favicon.ico")
            .unwrap();
        // ICONDIR: reserved 0, type 1, two entries.
        assert_eq!(&ico.content[0..6], &[0, 0, 1, 0, 2, 0]);
        assert!(artifacts.iter().any(|a| a.filename == "manifest-icons.json"));
        assert!(artifacts.iter().any(|a| a.filename == "README.txt"));
        assert!(
            artifacts
                .iter()
                .any(|a| a.filename == "icon-512-maskable.png")
        );
    }

    #[test]
    fn macos_small_sizes_render_without_plate_effects() {
        let plain = render_macos_icon(&values(), 32, false).unwrap();
        let forced = render_macos_icon(&values(), 32, true).unwrap();
        assert_eq!(plain.size(), Size::square(32));
        assert_eq!(forced.size(), Size::square(32));
        // Forced plate effects inset the content, so the plain render
        // covers pixels the plated one leaves empty.
        assert!(plain.pixel(16, 1).unwrap().a > 0);
        assert_eq!(forced.pixel(16, 0).unwrap().a, 0);
    }

    #[test]
    fn macos_target_emits_a_single_icns() {
        let artifacts = macos_artifacts(&values(), &IcnsOptions::default()).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].filename, "AppIcon.icns");
        let icns = &artifacts[0].content;
        assert_eq!(&icns[0..4], b"icns");
        let declared = u32::from_be_bytes(icns[4..8].try_into().unwrap());
        assert_eq!(declared as usize, icns.len());
    }

    #[test]
    fn tvos_set_has_layered_banner() {
        let artifacts = tvos_artifacts(&values()).unwrap();
        let names: Vec<&str> = artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(
            names,
            [
                "1x/foreground.png",
                "1x/background.png",
                "2x/foreground.png",
                "2x/background.png",
                "app_store_icon.png",
            ]
        );
    }

    #[test]
    fn watchos_set_is_complete() {
        let artifacts = watchos_artifacts(&values()).unwrap();
        assert_eq!(artifacts.len(), WATCH_ARTIFACT_SPECS.len());
        assert!(
            artifacts
                .iter()
                .any(|a| a.filename == "AppIcon~watch-marketing.png")
        );
    }
}
