//! Scaled and cropped image blitting.
//!
//! The heart of this module is [`draw_scaled`], which never reduces an
//! image by more than a factor of two per blit: large downscales are
//! staged through intermediate surfaces, because a single big bilinear
//! reduction drops most of the source pixels and looks muddy at icon
//! sizes.

use crate::geom::{Rect, Size};
use crate::surface::{Composite, Surface};

/// Plans the intermediate surface sizes for a halving downsample from
/// `(sw, sh)` to `(dw, dh)`. Empty when a direct blit is within 2x.
pub(crate) fn halving_plan(mut sw: f32, mut sh: f32, dw: f32, dh: f32) -> Vec<Size> {
    let mut steps = Vec::new();
    while dw < sw / 2.0 || dh < sh / 2.0 {
        let tw = dw.max(sw / 2.0).ceil();
        let th = dh.max(sh / 2.0).ceil();
        steps.push(Size::new(tw as u32, th as u32));
        sw = tw;
        sh = th;
    }
    steps
}

/// Copies the `src_rect` region of `src` into `dst_rect` of `dst`.
///
/// Downscales of more than 2x in either dimension are staged through
/// intermediate half-size blits. Non-positive widths or heights are a
/// logged no-op; the destination is left untouched and the render
/// continues degraded.
pub fn draw_scaled(dst: &mut Surface, src: &Surface, src_rect: Rect, dst_rect: Rect) {
    if dst_rect.w <= 0.0 || dst_rect.h <= 0.0 || src_rect.w <= 0.0 || src_rect.h <= 0.0 {
        log::error!("draw_scaled: width/height must be positive ({src_rect:?} -> {dst_rect:?})");
        return;
    }

    let mut work: Option<Surface> = None;
    let mut cur = src_rect;

    for step in halving_plan(src_rect.w, src_rect.h, dst_rect.w, dst_rect.h) {
        let Ok(mut tmp) = Surface::new(step) else {
            log::error!("draw_scaled: could not allocate {step:?} intermediate");
            return;
        };
        let step_rect = Rect::from_size(step);
        {
            let from = work.as_ref().unwrap_or(src);
            tmp.draw_region(from, cur, step_rect, Composite::SourceOver, 1.0);
        }
        work = Some(tmp);
        cur = step_rect;
    }

    let from = work.as_ref().unwrap_or(src);
    dst.draw_region(from, cur, dst_rect, Composite::SourceOver, 1.0);
}

/// Letterboxes `src_rect` of `src` to fit entirely inside `dst_rect`,
/// preserving aspect ratio, centered.
pub fn draw_center_inside(dst: &mut Surface, src: &Surface, dst_rect: Rect, src_rect: Rect) {
    if src_rect.aspect() > dst_rect.aspect() {
        let h = src_rect.h * dst_rect.w / src_rect.w;
        draw_scaled(
            dst,
            src,
            src_rect,
            Rect::new(
                dst_rect.x,
                dst_rect.y + (dst_rect.h - h) / 2.0,
                dst_rect.w,
                h,
            ),
        );
    } else {
        let w = src_rect.w * dst_rect.h / src_rect.h;
        draw_scaled(
            dst,
            src,
            src_rect,
            Rect::new(
                dst_rect.x + (dst_rect.w - w) / 2.0,
                dst_rect.y,
                w,
                dst_rect.h,
            ),
        );
    }
}

/// Scales `src_rect` of `src` to fully cover `dst_rect`, preserving
/// aspect ratio and cropping the overflow, centered.
pub fn draw_center_crop(dst: &mut Surface, src: &Surface, dst_rect: Rect, src_rect: Rect) {
    if src_rect.aspect() > dst_rect.aspect() {
        let w = src_rect.h * dst_rect.w / dst_rect.h;
        draw_scaled(
            dst,
            src,
            Rect::new(
                src_rect.x + (src_rect.w - w) / 2.0,
                src_rect.y,
                w,
                src_rect.h,
            ),
            dst_rect,
        );
    } else {
        let h = src_rect.w * dst_rect.h / dst_rect.w;
        draw_scaled(
            dst,
            src,
            Rect::new(
                src_rect.x,
                src_rect.y + (src_rect.h - h) / 2.0,
                src_rect.w,
                h,
            ),
            dst_rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::surface::Paint;

    fn solid(size: Size, color: Color) -> Surface {
        let mut s = Surface::new(size).unwrap();
        s.fill_rect(
            Rect::from_size(size),
            &Paint::Solid(color),
            Composite::SourceOver,
            1.0,
        );
        s
    }

    #[test]
    fn plan_is_empty_within_factor_of_two() {
        assert!(halving_plan(100.0, 100.0, 60.0, 60.0).is_empty());
        assert!(halving_plan(100.0, 100.0, 50.0, 50.0).is_empty());
    }

    #[test]
    fn plan_steps_never_exceed_two_x() {
        let steps = halving_plan(1024.0, 1024.0, 16.0, 16.0);
        assert!(!steps.is_empty());
        let mut prev = Size::square(1024);
        for step in &steps {
            assert!(prev.w as f32 / step.w as f32 <= 2.0 + f32::EPSILON);
            assert!(prev.h as f32 / step.h as f32 <= 2.0 + f32::EPSILON);
            prev = *step;
        }
        // Last intermediate is within 2x of the target.
        assert!(prev.w <= 32 && prev.h <= 32);
    }

    #[test]
    fn plan_handles_anisotropic_reduction() {
        // Width shrinks 8x, height grows: the height axis must not be
        // reduced while the width halves.
        let steps = halving_plan(800.0, 50.0, 100.0, 100.0);
        assert!(!steps.is_empty());
        for step in &steps {
            assert!(step.h >= 50);
        }
        assert_eq!(steps.last().unwrap().h, 100);
    }

    #[test]
    fn degenerate_rect_is_a_no_op() {
        let src = solid(Size::square(8), Color::WHITE);
        let mut dst = Surface::new(Size::square(8)).unwrap();
        draw_scaled(
            &mut dst,
            &src,
            Rect::from_size(src.size()),
            Rect::new(0.0, 0.0, 0.0, 8.0),
        );
        assert_eq!(dst.pixel(4, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn deep_downscale_preserves_solid_fill() {
        let src = solid(Size::square(512), Color::rgb(40, 80, 120));
        let mut dst = Surface::new(Size::square(16)).unwrap();
        let dst_rect = Rect::from_size(dst.size());
        draw_scaled(
            &mut dst,
            &src,
            Rect::from_size(src.size()),
            dst_rect,
        );
        assert_eq!(dst.pixel(8, 8), Some(Color::rgb(40, 80, 120)));
    }

    #[test]
    fn center_inside_letterboxes_wide_source() {
        // 8x4 source into an 8x8 target: vertical bars of transparency
        // above and below.
        let src = solid(Size::new(8, 4), Color::WHITE);
        let mut dst = Surface::new(Size::square(8)).unwrap();
        let dst_rect = Rect::from_size(dst.size());
        draw_center_inside(
            &mut dst,
            &src,
            dst_rect,
            Rect::from_size(src.size()),
        );
        assert_eq!(dst.pixel(4, 0).unwrap().a, 0);
        assert_eq!(dst.pixel(4, 4).unwrap().a, 255);
        assert_eq!(dst.pixel(4, 7).unwrap().a, 0);
    }

    #[test]
    fn center_crop_covers_target() {
        let src = solid(Size::new(8, 4), Color::WHITE);
        let mut dst = Surface::new(Size::square(8)).unwrap();
        let dst_rect = Rect::from_size(dst.size());
        draw_center_crop(
            &mut dst,
            &src,
            dst_rect,
            Rect::from_size(src.size()),
        );
        for (x, y) in [(0, 0), (7, 0), (0, 7), (7, 7), (4, 4)] {
            assert_eq!(dst.pixel(x, y).unwrap().a, 255, "pixel ({x},{y})");
        }
    }
}
