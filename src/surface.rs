//! Off-screen raster surfaces.
//!
//! [`Surface`] wraps a premultiplied-alpha [`tiny_skia::Pixmap`] and
//! exposes the small set of operations the compositor and the effects
//! engine are written against: image blits with a composite mode and
//! opacity, path/rect fills with solid or gradient paint, Gaussian
//! blur, and straight-alpha pixel access. One unit is always one pixel;
//! there is no device-pixel scaling at this level.

use image::RgbaImage;
use resvg::tiny_skia::{
    self, BlendMode, FillRule, FilterQuality, Pattern, Pixmap, PixmapPaint, Point, SpreadMode,
    Stroke, Transform,
};

use crate::color::Color;
use crate::error::RenderError;
use crate::geom::{Rect, Size};

// ============================================================================
// Composite modes
// ============================================================================

/// The Porter-Duff subset the pipeline uses.
///
/// `SourceAtop` keeps the destination silhouette (fills, masked group
/// unwinding), `SourceIn`/`SourceOut` carve shadows, and `SourceOver`
/// is ordinary painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    #[default]
    SourceOver,
    SourceAtop,
    SourceIn,
    SourceOut,
}

impl Composite {
    fn to_blend(self) -> BlendMode {
        match self {
            Composite::SourceOver => BlendMode::SourceOver,
            Composite::SourceAtop => BlendMode::SourceAtop,
            Composite::SourceIn => BlendMode::SourceIn,
            Composite::SourceOut => BlendMode::SourceOut,
        }
    }
}

// ============================================================================
// Paint
// ============================================================================

/// A gradient color stop. Offsets are in `[0, 1]`; ordering is the
/// caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Paint source for fills: a solid color or a gradient in surface
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient {
        from: (f32, f32),
        to: (f32, f32),
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        center: (f32, f32),
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    fn to_shader(&self) -> Option<tiny_skia::Shader<'static>> {
        let make_stops = |stops: &[GradientStop]| {
            stops
                .iter()
                .map(|s| tiny_skia::GradientStop::new(s.offset, s.color.to_skia()))
                .collect::<Vec<_>>()
        };
        match self {
            Paint::Solid(color) => Some(tiny_skia::Shader::SolidColor(color.to_skia())),
            Paint::LinearGradient { from, to, stops } => tiny_skia::LinearGradient::new(
                Point::from_xy(from.0, from.1),
                Point::from_xy(to.0, to.1),
                make_stops(stops),
                SpreadMode::Pad,
                Transform::identity(),
            ),
            Paint::RadialGradient {
                center,
                radius,
                stops,
            } => tiny_skia::RadialGradient::new(
                Point::from_xy(center.0, center.1),
                Point::from_xy(center.0, center.1),
                *radius,
                make_stops(stops),
                SpreadMode::Pad,
                Transform::identity(),
            ),
        }
    }
}

// ============================================================================
// Surface
// ============================================================================

/// An off-screen 2D raster buffer.
#[derive(Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("w", &self.width())
            .field("h", &self.height())
            .finish()
    }
}

impl Surface {
    /// Creates a blank, fully transparent surface of exactly `size`.
    pub fn new(size: Size) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(size.w, size.h).ok_or(RenderError::InvalidSurfaceSize {
            w: size.w,
            h: size.h,
        })?;
        Ok(Self { pixmap })
    }

    /// Wraps a straight-alpha RGBA image, premultiplying into the
    /// surface's native representation.
    pub fn from_rgba(img: &RgbaImage) -> Result<Self, RenderError> {
        let mut surface = Self::new(Size::new(img.width(), img.height()))?;
        for (pixel, src) in surface.pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
            let [r, g, b, a] = src.0;
            *pixel = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(surface)
    }

    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    // ---- Blits ----

    /// Draws `src` at `(x, y)` with source-over compositing.
    pub fn draw(&mut self, src: &Surface, x: f32, y: f32) {
        self.draw_with(src, x, y, Composite::SourceOver, 1.0);
    }

    /// Draws `src` at `(x, y)` with an explicit composite mode and
    /// opacity.
    pub fn draw_with(&mut self, src: &Surface, x: f32, y: f32, composite: Composite, opacity: f32) {
        let paint = PixmapPaint {
            opacity,
            blend_mode: composite.to_blend(),
            quality: FilterQuality::Bilinear,
        };
        if x.fract() == 0.0 && y.fract() == 0.0 {
            self.pixmap.draw_pixmap(
                x as i32,
                y as i32,
                src.pixmap.as_ref(),
                &paint,
                Transform::identity(),
                None,
            );
        } else {
            self.pixmap.draw_pixmap(
                0,
                0,
                src.pixmap.as_ref(),
                &paint,
                Transform::from_translate(x, y),
                None,
            );
        }
    }

    /// Draws the `src_rect` region of `src` into `dst_rect`, scaling
    /// with bilinear filtering.
    ///
    /// This is a single blit step; callers that may reduce by more than
    /// 2x should go through [`crate::draw::draw_scaled`] instead.
    pub fn draw_region(
        &mut self,
        src: &Surface,
        src_rect: Rect,
        dst_rect: Rect,
        composite: Composite,
        opacity: f32,
    ) {
        let Some(rect) = tiny_skia::Rect::from_xywh(src_rect.x, src_rect.y, src_rect.w, src_rect.h)
        else {
            log::error!("draw_region: degenerate source rect {src_rect:?}");
            return;
        };
        if dst_rect.w <= 0.0 || dst_rect.h <= 0.0 {
            log::error!("draw_region: degenerate destination rect {dst_rect:?}");
            return;
        }

        let shader = Pattern::new(
            src.pixmap.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            opacity,
            Transform::identity(),
        );
        let mut paint = tiny_skia::Paint::default();
        paint.shader = shader;
        paint.blend_mode = composite.to_blend();
        paint.anti_alias = false;

        // Maps source-space coordinates onto the destination rect; the
        // pattern shader is carried through the same transform.
        let transform = Transform::from_translate(dst_rect.x, dst_rect.y)
            .pre_scale(dst_rect.w / src_rect.w, dst_rect.h / src_rect.h)
            .pre_translate(-src_rect.x, -src_rect.y);
        self.pixmap.fill_rect(rect, &paint, transform, None);
    }

    // ---- Fills ----

    /// Fills a closed path under `transform`.
    ///
    /// Shapes are authored in the unit rectangle and rescaled here by
    /// affine transform, never by rebuilding control points.
    pub fn fill_path(&mut self, path: &tiny_skia::Path, paint: &Paint, transform: Transform) {
        self.fill_path_with(path, paint, Composite::SourceOver, transform);
    }

    pub fn fill_path_with(
        &mut self,
        path: &tiny_skia::Path,
        paint: &Paint,
        composite: Composite,
        transform: Transform,
    ) {
        let Some(shader) = paint.to_shader() else {
            log::warn!("fill_path: unrenderable paint, skipping");
            return;
        };
        let mut sk_paint = tiny_skia::Paint::default();
        sk_paint.shader = shader;
        sk_paint.blend_mode = composite.to_blend();
        sk_paint.anti_alias = true;
        self.pixmap
            .fill_path(path, &sk_paint, FillRule::Winding, transform, None);
    }

    /// Strokes a path under `transform`; the line width is in path
    /// space and scales with the transform.
    pub fn stroke_path(
        &mut self,
        path: &tiny_skia::Path,
        color: Color,
        line_width: f32,
        transform: Transform,
    ) {
        let mut sk_paint = tiny_skia::Paint::default();
        sk_paint.set_color(color.to_skia());
        sk_paint.anti_alias = true;
        let stroke = Stroke {
            width: line_width,
            line_join: tiny_skia::LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &sk_paint, &stroke, transform, None);
    }

    /// Fills an axis-aligned rect with a paint, composite mode and
    /// opacity.
    pub fn fill_rect(&mut self, rect: Rect, paint: &Paint, composite: Composite, opacity: f32) {
        let Some(sk_rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.w, rect.h) else {
            log::error!("fill_rect: degenerate rect {rect:?}");
            return;
        };
        let Some(shader) = paint.to_shader() else {
            log::warn!("fill_rect: unrenderable paint, skipping");
            return;
        };
        let mut sk_paint = tiny_skia::Paint::default();
        sk_paint.shader = shader;
        sk_paint.anti_alias = false;
        if opacity < 1.0 {
            // Route through an intermediate so opacity applies to the
            // fill as a whole, matching a global-alpha fill.
            let mut tmp = match Surface::new(self.size()) {
                Ok(tmp) => tmp,
                Err(_) => return,
            };
            tmp.pixmap
                .fill_rect(sk_rect, &sk_paint, Transform::identity(), None);
            self.draw_with(&tmp, 0.0, 0.0, composite, opacity);
            return;
        }
        sk_paint.blend_mode = composite.to_blend();
        self.pixmap
            .fill_rect(sk_rect, &sk_paint, Transform::identity(), None);
    }

    // ---- Filters ----

    /// Returns a Gaussian-blurred copy of the surface.
    ///
    /// `radius` follows the CSS `blur()` convention (sigma = radius/2).
    /// The blur runs on the premultiplied representation so transparent
    /// regions do not bleed darkness into the result.
    pub fn blurred(&self, radius: f32) -> Surface {
        if radius <= 0.0 {
            return self.clone();
        }
        let sigma = radius / 2.0;
        let size = self.size();
        let premultiplied =
            RgbaImage::from_raw(size.w, size.h, self.pixmap.data().to_vec())
                .expect("pixmap data length matches dimensions");
        let blurred = image::imageops::blur(&premultiplied, sigma);
        let mut out = self.clone();
        out.pixmap.data_mut().copy_from_slice(blurred.as_raw());
        out
    }

    // ---- Pixel access ----

    /// Reads a pixel back as straight-alpha RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Converts to a straight-alpha RGBA image for encoding.
    pub fn to_rgba(&self) -> RgbaImage {
        let size = self.size();
        let mut img = RgbaImage::new(size.w, size.h);
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let p = src.demultiply();
            dst.0 = [p.red(), p.green(), p.blue(), p.alpha()];
        }
        img
    }

    /// Encodes the surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        use image::ImageEncoder;
        let img = self.to_rgba();
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out).write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(out)
    }
}
