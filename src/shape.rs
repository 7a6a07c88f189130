//! Icon silhouette shapes and unit-rectangle path builders.
//!
//! All paths are authored in the unit rectangle `{0, 0, 1, 1}` and
//! rescaled to pixel space by affine transform at draw time.

use resvg::tiny_skia::{Path, PathBuilder, Rect as SkRect};

use crate::error::RenderError;
use crate::geom::Rect;

/// Circle-to-bezier control point factor for a quarter arc.
const ARC_K: f32 = 0.552_284_8;

/// Corner radius of an iOS app icon plate, as a fraction of its width.
pub const IOS_RADIUS: f32 = 0.242; // 28.6 / 118

/// Corner radius of a macOS app icon plate, as a fraction of its width.
pub const MACOS_RADIUS: f32 = 0.225; // 185 / 824

// ============================================================================
// Shape
// ============================================================================

/// The silhouette an icon is masked to.
///
/// Either one of the four named primitives or an arbitrary closed
/// outline in the unit rectangle.
#[derive(Clone)]
pub enum Shape {
    Circle,
    Squircle,
    /// Rounded square (3/48 corner radius).
    Square,
    /// Square with sharp corners.
    SquareSharp,
    /// An opaque closed path in the unit rectangle.
    Path(Path),
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Circle => f.write_str("Circle"),
            Shape::Squircle => f.write_str("Squircle"),
            Shape::Square => f.write_str("Square"),
            Shape::SquareSharp => f.write_str("SquareSharp"),
            Shape::Path(_) => f.write_str("Path(..)"),
        }
    }
}

impl Shape {
    /// Parses a primitive shape name.
    ///
    /// Unknown names are a fatal configuration error; callers are
    /// expected to have validated their input against a fixed option
    /// list.
    pub fn from_name(name: &str) -> Result<Self, RenderError> {
        match name {
            "circle" => Ok(Shape::Circle),
            "squircle" => Ok(Shape::Squircle),
            "square" => Ok(Shape::Square),
            "square-sharp" => Ok(Shape::SquareSharp),
            other => Err(RenderError::UnknownShape(other.to_string())),
        }
    }

    /// The shape's outline in the unit rectangle.
    pub fn unit_path(&self) -> Path {
        match self {
            Shape::Circle => ellipse_path(Rect::unit()),
            Shape::Squircle => squircle_path(Rect::unit(), 0.1),
            Shape::Square => rounded_rect_path(Rect::unit(), CornerRadii::uniform(3.0 / 48.0)),
            Shape::SquareSharp => rect_path(Rect::unit()),
            Shape::Path(path) => path.clone(),
        }
    }
}

// ============================================================================
// Path builders
// ============================================================================

fn finish(pb: PathBuilder) -> Path {
    pb.finish().expect("path builders emit non-empty paths")
}

/// An ellipse inscribed in `rect`.
pub fn ellipse_path(rect: Rect) -> Path {
    let mut pb = PathBuilder::new();
    // SkRect rejects degenerate rects; unit-space shape rects are
    // always positive.
    if let Some(oval) = SkRect::from_xywh(rect.x, rect.y, rect.w, rect.h) {
        pb.push_oval(oval);
    }
    finish(pb)
}

/// The rectangle itself as a closed path.
pub fn rect_path(rect: Rect) -> Path {
    let mut pb = PathBuilder::new();
    if let Some(r) = SkRect::from_xywh(rect.x, rect.y, rect.w, rect.h) {
        pb.push_rect(r);
    }
    finish(pb)
}

/// Per-corner radii for [`rounded_rect_path`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub tl: f32,
    pub tr: f32,
    pub bl: f32,
    pub br: f32,
}

impl CornerRadii {
    pub fn uniform(r: f32) -> Self {
        Self {
            tl: r,
            tr: r,
            bl: r,
            br: r,
        }
    }
}

/// A rectangle with circular-arc corners of the given radii.
pub fn rounded_rect_path(rect: Rect, radii: CornerRadii) -> Path {
    let Rect { x, y, w, h } = rect;
    let CornerRadii { tl, tr, bl, br } = radii;
    let mut pb = PathBuilder::new();

    pb.move_to(x + w - tr, y);
    pb.cubic_to(
        x + w - tr + ARC_K * tr,
        y,
        x + w,
        y + tr - ARC_K * tr,
        x + w,
        y + tr,
    );
    pb.line_to(x + w, y + h - br);
    pb.cubic_to(
        x + w,
        y + h - br + ARC_K * br,
        x + w - br + ARC_K * br,
        y + h,
        x + w - br,
        y + h,
    );
    pb.line_to(x + bl, y + h);
    pb.cubic_to(
        x + bl - ARC_K * bl,
        y + h,
        x,
        y + h - bl + ARC_K * bl,
        x,
        y + h - bl,
    );
    pb.line_to(x, y + tl);
    pb.cubic_to(x, y + tl - ARC_K * tl, x + tl - ARC_K * tl, y, x + tl, y);
    pb.close();
    finish(pb)
}

/// A squircle whose sides bow continuously between the edge midpoints.
///
/// `smooth` controls how far the control points sit from the corners;
/// 0.1 gives the squat "platter" used for squircle-shaped icons.
pub fn squircle_path(rect: Rect, smooth: f32) -> Path {
    let l = rect.x;
    let t = rect.y;
    let r = rect.x + rect.w;
    let b = rect.y + rect.h;
    let w = rect.w;
    let h = rect.h;
    let mut pb = PathBuilder::new();
    pb.move_to((l + r) / 2.0, t);
    pb.cubic_to(r - smooth * w, t, r, t + smooth * h, r, (t + b) / 2.0);
    pb.cubic_to(r, b - smooth * h, r - smooth * h, b, (l + r) / 2.0, b);
    pb.cubic_to(l + smooth * w, b, l, b - smooth * h, l, (t + b) / 2.0);
    pb.cubic_to(l, t + smooth * h, l + smooth * w, t, (l + r) / 2.0, t);
    pb.close();
    finish(pb)
}

/// The continuous-curvature rounded square used for iOS and macOS icon
/// plates, in the unit rectangle.
///
/// Each corner is a single cubic whose handles sit on the straight
/// edges, with the tangent points pushed out beyond the nominal radius
/// so curvature picks up gradually instead of kinking at the arc
/// boundary the way a circular corner does.
pub fn platform_squircle(radius: f32) -> Path {
    // Tangent extension factor; the corner curve starts this much
    // beyond the nominal radius along each edge.
    const SMOOTHING: f32 = 0.61;
    let r = (radius * (1.0 + SMOOTHING)).min(0.5);
    let (l, t, rr, b) = (0.0, 0.0, 1.0f32, 1.0f32);
    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rr - r, t);
    pb.cubic_to(rr, t, rr, t, rr, t + r);
    pb.line_to(rr, b - r);
    pb.cubic_to(rr, b, rr, b, rr - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l, b, l, b, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t, l, t, l + r, t);
    pb.close();
    finish(pb)
}
