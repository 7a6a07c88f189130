//! Builds and renders the app icon layer tree.
//!
//! [`render_app_icon`] turns a flat value bag ([`IconValues`]) and a
//! [`RenderConfig`] into a composited surface. The tree always has the
//! same fixed set of nodes: a background silhouette (doubling as the
//! group mask), an optional background image or texture, the
//! foreground content, and an optional badge.
//!
//! Text-like content (clipart glyphs, text, badge labels) arrives as
//! pre-shaped rasters from the collaborator that owns font loading;
//! this module only scales, recolors and positions them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use resvg::tiny_skia::Transform;
use resvg::usvg;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::draw::{draw_center_crop, draw_center_inside, draw_scaled};
use crate::effects::Effect;
use crate::error::RenderError;
use crate::geom::{Rect, Size};
use crate::layer::{Layer, LayerGroup, LayerNode, render_layer_tree};
use crate::shape::{CornerRadii, Shape, rounded_rect_path};
use crate::surface::{Composite, GradientStop, Paint, Surface};
use crate::texture::{TextureValue, draw_texture};

// ============================================================================
// Render configuration
// ============================================================================

/// Which part of the icon a render produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderLayer {
    #[default]
    All,
    Foreground,
    Background,
}

/// Badge layout variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BadgeStyle {
    /// Full-width banner along the bottom edge.
    #[default]
    #[serde(rename = "default")]
    Banner,
    /// Rounded pill hugging the bottom-right side.
    #[serde(rename = "side")]
    Side,
}

/// Configuration for a single render call.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub layer: RenderLayer,
    /// Full output size in pixels.
    pub asset_size: Size,
    /// The icon content area; must fit inside `asset_size`, centered.
    /// Defaults to the full asset.
    pub content_size: Option<Size>,
    pub shape: Shape,
    /// Effects applied to the fully composited icon.
    pub final_effects: Vec<Effect>,
    pub badge_style: BadgeStyle,
    /// Themed-icon rendering: forces the foreground to black and
    /// disables custom foreground effects.
    pub android_monochrome: bool,
}

impl RenderConfig {
    pub fn new(asset_size: Size, shape: Shape) -> Self {
        Self {
            layer: RenderLayer::All,
            asset_size,
            content_size: None,
            shape,
            final_effects: Vec::new(),
            badge_style: BadgeStyle::Banner,
            android_monochrome: false,
        }
    }
}

// ============================================================================
// Value bag
// ============================================================================

/// A decoded user-supplied image: either raster pixels or SVG markup
/// to be rasterized at render time.
#[derive(Clone)]
pub enum ImageSource {
    Raster(RgbaImage),
    Svg(String),
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Raster(img) => {
                write!(f, "Raster({}x{})", img.width(), img.height())
            }
            ImageSource::Svg(markup) => write!(f, "Svg({} bytes)", markup.len()),
        }
    }
}

/// Linear gradient selection for the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientValue {
    pub color1: Color,
    pub color2: Color,
    /// Direction in degrees; 0 points right, 90 points down.
    pub angle: f32,
}

/// Background content selection.
#[derive(Debug, Clone)]
pub enum Background {
    Color(Color),
    Gradient(GradientValue),
    Image(ImageSource),
    Texture { base: Color, texture: TextureValue },
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(Color::WHITE)
    }
}

/// Foreground content selection.
///
/// Clipart glyphs and text are pre-shaped rasters supplied by the
/// caller (shaping needs a font engine, which is out of scope here);
/// images may still be SVG and are rasterized on demand.
#[derive(Debug, Clone)]
pub enum Foreground {
    Image { source: ImageSource },
    Clipart { glyph: Surface },
    Text { raster: Surface },
}

/// How an image foreground fits its content rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentScaling {
    #[default]
    Center,
    Crop,
}

/// Foreground effect presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForegroundEffect {
    /// Drop shadow only.
    Elevate,
    /// Long cast shadow plus drop shadow.
    Shadow,
}

/// Foreground padding, as percentages of the content rect per side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub fn uniform(percent: f32) -> Self {
        Self {
            top: percent,
            left: percent,
            right: percent,
            bottom: percent,
        }
    }
}

/// A badge: a short pre-shaped label raster and a fill color. The
/// label is treated as an alpha mask and recolored for contrast
/// against the badge fill.
#[derive(Debug, Clone)]
pub struct Badge {
    pub label: Surface,
    pub color: Color,
}

/// The flat property-value bag a render consumes.
#[derive(Debug, Clone)]
pub struct IconValues {
    pub background: Background,
    /// The user-selected silhouette, for targets that honor it.
    pub bg_shape: Shape,
    pub foreground: Option<Foreground>,
    pub fg_color: Color,
    pub fg_scaling: ContentScaling,
    /// Recolor true-color image foregrounds as if they were masks.
    pub fg_mask: bool,
    pub fg_effects: Option<ForegroundEffect>,
    pub fg_padding: Option<Padding>,
    pub badge: Option<Badge>,
}

impl Default for IconValues {
    fn default() -> Self {
        Self {
            background: Background::default(),
            bg_shape: Shape::Circle,
            foreground: None,
            fg_color: Color::rgb(0x3d, 0x73, 0xe8),
            fg_scaling: ContentScaling::Center,
            fg_mask: false,
            fg_effects: None,
            fg_padding: None,
            badge: None,
        }
    }
}

/// Candidate badge text colors; the more readable one wins.
const BADGE_TEXT_CANDIDATES: [Color; 2] = [Color::WHITE, Color::rgb(0x44, 0x44, 0x44)];

/// 20% black, the standard elevation shadow tint.
const SHADOW_TINT: Color = Color::rgba(0, 0, 0, 51);

// ============================================================================
// Rendering
// ============================================================================

/// Renders the icon described by `values` under `config`.
///
/// A missing foreground source renders as a fully transparent
/// foreground; an unknown shape name was already rejected when the
/// [`Shape`] was parsed.
pub fn render_app_icon(values: &IconValues, config: &RenderConfig) -> Result<Surface, RenderError> {
    let asset_size = config.asset_size;
    let content_size = config.content_size.unwrap_or(asset_size);
    let target_rect = Rect::centered_in(asset_size, content_size);

    let fore = render_foreground(values, asset_size)?;

    let mut fg_color = values.fg_color;
    let mut fg_effects = values.fg_effects;
    if config.android_monochrome {
        fg_color = Color::BLACK;
        fg_effects = None;
    }
    let crop = matches!(values.foreground, Some(Foreground::Image { .. }))
        && values.fg_scaling == ContentScaling::Crop;

    // Pre-rasterize the background image before any layer closures
    // capture it.
    let bg_image = match &values.background {
        Background::Image(source) => Some(decode_image_source(source, None)?),
        _ => None,
    };

    let bg_effects = background_effects(values, asset_size, content_size);

    // -- Background silhouette (and group mask) -------------------------
    let shape_path = config.shape.unit_path();
    let full_background = config.layer == RenderLayer::Background;
    let mut background_layer = Layer::with_draw(move |surface: &mut Surface| {
        // For a bare background render (adaptive icon background) the
        // fill spans the whole asset; otherwise the silhouette covers
        // the content rect and masks everything drawn after it.
        let transform = if full_background {
            Transform::from_scale(asset_size.w as f32, asset_size.h as f32)
        } else {
            Transform::from_translate(target_rect.x, target_rect.y)
                .pre_scale(target_rect.w, target_rect.h)
        };
        surface.fill_path(&shape_path, &Paint::Solid(Color::BLACK), transform);
    })
    .with_effects(bg_effects);
    background_layer.mask = !full_background;

    // -- Background image -----------------------------------------------
    let bg_image_layer = bg_image.as_ref().map(|img| {
        // Use the middle 2/3 of the image, so adaptive-icon safe-zone
        // cropping keeps the interesting part visible.
        let bg_target = Rect::new(
            target_rect.x - target_rect.w / 4.0,
            target_rect.y - target_rect.h / 4.0,
            target_rect.w * 3.0 / 2.0,
            target_rect.h * 3.0 / 2.0,
        );
        Layer::with_draw(move |surface: &mut Surface| {
            draw_center_crop(surface, img, bg_target, Rect::from_size(img.size()));
        })
    });

    // -- Background texture ---------------------------------------------
    let bg_texture_layer = match &values.background {
        Background::Texture { texture, .. } => {
            let texture = *texture;
            Some(Layer::with_draw(move |surface: &mut Surface| {
                let transform = if full_background {
                    Transform::from_scale(asset_size.w as f32, asset_size.h as f32)
                } else {
                    Transform::from_translate(target_rect.x, target_rect.y)
                        .pre_scale(target_rect.w, target_rect.h)
                };
                draw_texture(surface, &texture, transform);
            }))
        }
        _ => None,
    };

    // -- Foreground content ----------------------------------------------
    let fg_padding = values.fg_padding;
    let foreground_layer = Layer::with_draw(move |surface: &mut Surface| {
        let Some(fore) = &fore else {
            return;
        };
        let mut content_rect = target_rect;
        if let Some(p) = &fg_padding {
            content_rect.y += p.top / 100.0 * target_rect.h;
            content_rect.x += p.left / 100.0 * target_rect.w;
            content_rect.w -= (p.right + p.left) / 100.0 * target_rect.w;
            content_rect.h -= (p.bottom + p.top) / 100.0 * target_rect.h;
        }
        let src_rect = Rect::from_size(fore.size());
        if crop {
            draw_center_crop(surface, fore, content_rect, src_rect);
        } else {
            draw_center_inside(surface, fore, content_rect, src_rect);
        }
    })
    .with_effects(foreground_effects(values, fg_color, fg_effects, content_size));

    // -- Badge ------------------------------------------------------------
    let badge_style = config.badge_style;
    let circle = matches!(config.shape, Shape::Circle);
    let badge_layer = values.badge.as_ref().map(|badge| {
        let text_color = Color::most_readable(badge.color, &BADGE_TEXT_CANDIDATES);
        Layer::with_draw(move |surface: &mut Surface| {
            draw_badge(
                surface,
                badge,
                text_color,
                badge_style,
                asset_size,
                target_rect,
                content_size,
                circle,
            );
        })
        .with_effects(vec![Effect::outer_shadow(
            SHADOW_TINT,
            0.0,
            (0.0, -0.5 * content_size.w as f32 / 48.0),
        )])
    });

    let include_bg = matches!(config.layer, RenderLayer::All | RenderLayer::Background);
    let include_fg = matches!(config.layer, RenderLayer::All | RenderLayer::Foreground);

    let root = LayerGroup::new([
        include_bg.then(|| LayerNode::from(background_layer)),
        bg_image_layer.filter(|_| include_bg).map(LayerNode::from),
        bg_texture_layer.filter(|_| include_bg).map(LayerNode::from),
        include_fg.then(|| LayerNode::from(foreground_layer)),
        badge_layer.filter(|_| include_fg).map(LayerNode::from),
    ])
    .with_effects(config.final_effects.clone());

    let mut out = Surface::new(asset_size)?;
    render_layer_tree(&mut out, asset_size, &root);
    Ok(out)
}

/// Effects recoloring the background silhouette.
fn background_effects(values: &IconValues, asset_size: Size, content_size: Size) -> Vec<Effect> {
    match &values.background {
        Background::Color(color) => vec![Effect::fill_color(color.opaque())],
        Background::Gradient(gradient) => {
            let cx = asset_size.w as f32 / 2.0;
            let cy = asset_size.h as f32 / 2.0;
            let radius = content_size.w as f32 / 2.0;
            let rad = gradient.angle.to_radians();
            vec![Effect::FillLinearGradient {
                from: (cx - radius * rad.cos(), cy - radius * rad.sin()),
                to: (cx + radius * rad.cos(), cy + radius * rad.sin()),
                stops: vec![
                    GradientStop::new(0.0, gradient.color1),
                    GradientStop::new(1.0, gradient.color2),
                ],
                opacity: None,
            }]
        }
        Background::Texture { base, .. } => vec![Effect::fill_color(base.opaque())],
        Background::Image(_) => Vec::new(),
    }
}

/// Effects applied to the foreground content layer.
fn foreground_effects(
    values: &IconValues,
    fg_color: Color,
    fg_effects: Option<ForegroundEffect>,
    content_size: Size,
) -> Vec<Effect> {
    let mut effects = Vec::new();

    if fg_effects == Some(ForegroundEffect::Shadow) {
        effects.push(Effect::CastShadow);
    }

    // Recolor the foreground, except for true-color images (unless the
    // explicit mask flag is set) and text, which keeps its own color.
    let recolor = match &values.foreground {
        Some(Foreground::Image { .. }) => values.fg_mask,
        Some(Foreground::Text { .. }) => false,
        _ => true,
    };
    if recolor {
        effects.push(Effect::fill_color(fg_color));
    }

    if matches!(
        fg_effects,
        Some(ForegroundEffect::Elevate) | Some(ForegroundEffect::Shadow)
    ) {
        let scale = content_size.w as f32 / 48.0;
        effects.push(Effect::outer_shadow(SHADOW_TINT, 0.0, (0.0, 0.25 * scale)));
        effects.push(Effect::outer_shadow(SHADOW_TINT, scale, (0.0, scale)));
    }

    effects
}

#[allow(clippy::too_many_arguments)]
fn draw_badge(
    surface: &mut Surface,
    badge: &Badge,
    text_color: Color,
    style: BadgeStyle,
    asset_size: Size,
    target_rect: Rect,
    content_size: Size,
    circle: bool,
) {
    let mut scale = content_size.w as f32 / 48.0;
    if style == BadgeStyle::Side {
        scale *= 0.75;
    }
    let text_h = 5.0 * scale;
    let label = &badge.label;
    if label.size().is_empty() || text_h < 1.0 {
        return;
    }
    let label_w = label.width() as f32 / label.height() as f32 * text_h;

    // Recolor the label raster for contrast against the badge fill.
    let tinted = {
        let Ok(mut tinted) = Surface::new(Size::new(
            label_w.ceil().max(1.0) as u32,
            text_h.ceil().max(1.0) as u32,
        )) else {
            return;
        };
        let dst = Rect::from_size(tinted.size());
        draw_scaled(
            &mut tinted,
            label,
            Rect::from_size(label.size()),
            dst,
        );
        tinted.fill_rect(
            Rect::from_size(tinted.size()),
            &Paint::Solid(text_color),
            Composite::SourceIn,
            1.0,
        );
        tinted
    };

    match style {
        BadgeStyle::Banner => {
            let badge_h = if circle { 12.0 } else { 10.0 } * scale;
            surface.fill_rect(
                Rect::new(
                    0.0,
                    target_rect.y + target_rect.h - badge_h,
                    asset_size.w as f32,
                    badge_h + asset_size.h as f32 - target_rect.h,
                ),
                &Paint::Solid(badge.color),
                Composite::SourceOver,
                1.0,
            );
            draw_scaled(
                surface,
                &tinted,
                Rect::from_size(tinted.size()),
                Rect::new(
                    asset_size.w as f32 / 2.0 - label_w / 2.0,
                    target_rect.y + target_rect.h - badge_h + 2.5 * scale,
                    label_w,
                    text_h,
                ),
            );
        }
        BadgeStyle::Side => {
            let badge_h = 9.0 * scale;
            let badge_w = label_w + 10.0 * scale;
            let pill = rounded_rect_path(
                Rect::new(
                    target_rect.w - badge_w,
                    target_rect.y + target_rect.h - badge_h,
                    badge_w,
                    badge_h,
                ),
                CornerRadii {
                    tl: badge_h / 2.0,
                    ..CornerRadii::default()
                },
            );
            surface.fill_path(&pill, &Paint::Solid(badge.color), Transform::identity());
            draw_scaled(
                surface,
                &tinted,
                Rect::from_size(tinted.size()),
                Rect::new(
                    target_rect.w - badge_w + 5.0 * scale,
                    target_rect.y + target_rect.h - badge_h + 2.5 * scale,
                    label_w,
                    text_h,
                ),
            );
        }
    }
}

// ============================================================================
// Foreground sources
// ============================================================================

/// Renders the foreground content into its own intermediate surface,
/// independent of the final icon size.
fn render_foreground(
    values: &IconValues,
    max_final_size: Size,
) -> Result<Option<Surface>, RenderError> {
    match &values.foreground {
        None => Ok(None),
        Some(Foreground::Image { source }) => {
            decode_image_source(source, Some(max_final_size)).map(Some)
        }
        Some(Foreground::Clipart { glyph }) => Ok(Some(glyph.clone())),
        Some(Foreground::Text { raster }) => Ok(Some(raster.clone())),
    }
}

fn decode_image_source(
    source: &ImageSource,
    max_size: Option<Size>,
) -> Result<Surface, RenderError> {
    match source {
        ImageSource::Raster(img) => Surface::from_rgba(img),
        ImageSource::Svg(markup) => rasterize_svg(markup, max_size),
    }
}

/// Rasterizes SVG markup, aspect-fit to `max_size` when given so a
/// vector source is never rendered larger than the final icon needs.
fn rasterize_svg(markup: &str, max_size: Option<Size>) -> Result<Surface, RenderError> {
    let tree = usvg::Tree::from_str(markup, &usvg::Options::default())
        .map_err(|e| RenderError::Svg(e.to_string()))?;
    let svg_size = tree.size();
    let (orig_w, orig_h) = (svg_size.width(), svg_size.height());

    let (w, h) = match max_size {
        Some(max) if !max.is_empty() => {
            if orig_w / orig_h > max.w as f32 / max.h as f32 {
                (max.w as f32, max.w as f32 * orig_h / orig_w)
            } else {
                (max.h as f32 * orig_w / orig_h, max.h as f32)
            }
        }
        _ => (orig_w, orig_h),
    };

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w.ceil() as u32, h.ceil() as u32).ok_or(
        RenderError::InvalidSurfaceSize {
            w: w.ceil() as u32,
            h: h.ceil() as u32,
        },
    )?;
    resvg::render(
        &tree,
        Transform::from_scale(w / orig_w, h / orig_h),
        &mut pixmap.as_mut(),
    );
    Ok(Surface::from_pixmap(pixmap))
}

// ============================================================================
// Cancellation
// ============================================================================

/// A staleness signal for long-running preview renders.
///
/// Cancellation is cooperative and coarse: the render runs to
/// completion and the result is discarded at the end, so a stale
/// preview never becomes observable. Nothing preempts mid-render.
#[derive(Debug, Clone, Default)]
pub struct RenderToken(Arc<AtomicBool>);

impl RenderToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the associated render as stale.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Renders a preview, returning `None` without side effects if `token`
/// was cancelled while rendering.
pub fn render_preview(
    values: &IconValues,
    config: &RenderConfig,
    token: &RenderToken,
) -> Result<Option<Surface>, RenderError> {
    let surface = render_app_icon(values, config)?;
    if token.is_cancelled() {
        return Ok(None);
    }
    Ok(Some(surface))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle_icon(bg: Color) -> IconValues {
        IconValues {
            background: Background::Color(bg),
            ..IconValues::default()
        }
    }

    #[test]
    fn circular_background_clips_corners() {
        let values = circle_icon(Color::rgb(20, 40, 60));
        let config = RenderConfig::new(Size::square(48), Shape::Circle);
        let out = render_app_icon(&values, &config).unwrap();
        // Corner is outside the circle.
        assert_eq!(out.pixel(0, 0).unwrap().a, 0);
        // Center matches the configured background color.
        assert_eq!(out.pixel(24, 24), Some(Color::rgb(20, 40, 60)));
    }

    #[test]
    fn missing_foreground_renders_transparent_foreground() {
        let values = IconValues {
            background: Background::Color(Color::WHITE),
            foreground: None,
            ..IconValues::default()
        };
        let mut config = RenderConfig::new(Size::square(32), Shape::SquareSharp);
        config.layer = RenderLayer::Foreground;
        let out = render_app_icon(&values, &config).unwrap();
        assert_eq!(out.pixel(16, 16).unwrap().a, 0);
    }

    #[test]
    fn background_only_render_spans_the_full_asset() {
        // With a content size smaller than the asset, a bare
        // background render (adaptive icon background) still fills the
        // whole asset rather than just the content rect.
        let values = circle_icon(Color::rgb(1, 2, 3));
        let mut config = RenderConfig::new(Size::square(32), Shape::SquareSharp);
        config.content_size = Some(Size::square(16));
        config.layer = RenderLayer::Background;
        let out = render_app_icon(&values, &config).unwrap();
        assert_eq!(out.pixel(2, 2), Some(Color::rgb(1, 2, 3)));

        // A full render masks to the content rect instead.
        config.layer = RenderLayer::All;
        let out = render_app_icon(&values, &config).unwrap();
        assert_eq!(out.pixel(2, 2).unwrap().a, 0);
        assert_eq!(out.pixel(16, 16), Some(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn gradient_background_interpolates() {
        let values = IconValues {
            background: Background::Gradient(GradientValue {
                color1: Color::rgb(255, 0, 0),
                color2: Color::rgb(0, 0, 255),
                angle: 0.0,
            }),
            ..IconValues::default()
        };
        let config = RenderConfig::new(Size::square(64), Shape::SquareSharp);
        let out = render_app_icon(&values, &config).unwrap();
        let left = out.pixel(4, 32).unwrap();
        let right = out.pixel(60, 32).unwrap();
        assert!(left.r > 200 && left.b < 60, "left was {left:?}");
        assert!(right.b > 200 && right.r < 60, "right was {right:?}");
    }

    #[test]
    fn clipart_foreground_is_recolored() {
        // A white glyph blob; recolor should turn it fg_color.
        let mut glyph = Surface::new(Size::square(16)).unwrap();
        glyph.fill_rect(
            Rect::from_size(glyph.size()),
            &Paint::Solid(Color::WHITE),
            Composite::SourceOver,
            1.0,
        );
        let values = IconValues {
            background: Background::Color(Color::WHITE),
            foreground: Some(Foreground::Clipart { glyph }),
            fg_color: Color::rgb(200, 16, 16),
            ..IconValues::default()
        };
        let mut config = RenderConfig::new(Size::square(32), Shape::SquareSharp);
        config.layer = RenderLayer::Foreground;
        let out = render_app_icon(&values, &config).unwrap();
        assert_eq!(out.pixel(16, 16), Some(Color::rgb(200, 16, 16)));
    }

    #[test]
    fn image_foreground_keeps_its_colors_without_mask_flag() {
        let img = RgbaImage::from_pixel(8, 8, image::Rgba([10, 250, 10, 255]));
        let values = IconValues {
            background: Background::Color(Color::WHITE),
            foreground: Some(Foreground::Image {
                source: ImageSource::Raster(img),
            }),
            fg_color: Color::rgb(200, 16, 16),
            fg_padding: None,
            ..IconValues::default()
        };
        let mut config = RenderConfig::new(Size::square(32), Shape::SquareSharp);
        config.layer = RenderLayer::Foreground;
        let out = render_app_icon(&values, &config).unwrap();
        assert_eq!(out.pixel(16, 16), Some(Color::rgb(10, 250, 10)));
    }

    #[test]
    fn android_monochrome_forces_black_foreground() {
        let mut glyph = Surface::new(Size::square(16)).unwrap();
        glyph.fill_rect(
            Rect::from_size(glyph.size()),
            &Paint::Solid(Color::WHITE),
            Composite::SourceOver,
            1.0,
        );
        let values = IconValues {
            foreground: Some(Foreground::Clipart { glyph }),
            fg_color: Color::rgb(200, 16, 16),
            fg_effects: Some(ForegroundEffect::Elevate),
            ..IconValues::default()
        };
        let mut config = RenderConfig::new(Size::square(32), Shape::SquareSharp);
        config.layer = RenderLayer::Foreground;
        config.android_monochrome = true;
        let out = render_app_icon(&values, &config).unwrap();
        assert_eq!(out.pixel(16, 16), Some(Color::BLACK));
    }

    #[test]
    fn svg_foreground_rasterizes() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;
        let values = IconValues {
            foreground: Some(Foreground::Image {
                source: ImageSource::Svg(svg.to_string()),
            }),
            ..IconValues::default()
        };
        let mut config = RenderConfig::new(Size::square(32), Shape::SquareSharp);
        config.layer = RenderLayer::Foreground;
        let out = render_app_icon(&values, &config).unwrap();
        let center = out.pixel(16, 16).unwrap();
        assert!(center.g > 200, "center was {center:?}");
    }

    #[test]
    fn invalid_svg_is_fatal() {
        let values = IconValues {
            foreground: Some(Foreground::Image {
                source: ImageSource::Svg("not svg".to_string()),
            }),
            ..IconValues::default()
        };
        let config = RenderConfig::new(Size::square(32), Shape::Circle);
        assert!(matches!(
            render_app_icon(&values, &config),
            Err(RenderError::Svg(_))
        ));
    }

    #[test]
    fn badge_draws_banner_with_readable_text() {
        let mut label = Surface::new(Size::new(24, 8)).unwrap();
        label.fill_rect(
            Rect::from_size(label.size()),
            &Paint::Solid(Color::WHITE),
            Composite::SourceOver,
            1.0,
        );
        let values = IconValues {
            background: Background::Color(Color::WHITE),
            badge: Some(Badge {
                label,
                color: Color::rgb(0x20, 0x20, 0x28),
            }),
            ..IconValues::default()
        };
        let config = RenderConfig::new(Size::square(96), Shape::SquareSharp);
        let out = render_app_icon(&values, &config).unwrap();
        // Banner occupies the bottom edge.
        let banner = out.pixel(4, 92).unwrap();
        assert_eq!(
            (banner.r, banner.g, banner.b),
            (0x20, 0x20, 0x28),
            "banner was {banner:?}"
        );
        // Label center is the readable (white) candidate.
        let text = out.pixel(48, 85).unwrap();
        assert!(text.r > 200 && text.g > 200, "text was {text:?}");
    }

    #[test]
    fn cancelled_preview_is_discarded() {
        let values = circle_icon(Color::BLACK);
        let config = RenderConfig::new(Size::square(16), Shape::Circle);
        let token = RenderToken::new();
        token.cancel();
        let result = render_preview(&values, &config, &token).unwrap();
        assert!(result.is_none());

        let fresh = RenderToken::new();
        assert!(render_preview(&values, &config, &fresh).unwrap().is_some());
    }
}
