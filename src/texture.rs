//! Seeded procedural background textures.
//!
//! Textures draw in the unit square and are mapped into the icon's
//! content rect by an affine transform. A texture is fully determined
//! by its kind, seed and color, so previews and final artifacts come
//! out identical.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use resvg::tiny_skia::{PathBuilder, Rect as SkRect, Transform};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::surface::{Paint, Surface};

const SQRT_3: f32 = 1.732_050_8;
const SIN_60: f32 = 0.866_025_4;

/// The available texture patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextureKind {
    Stipple,
    Mosaic,
    Waves,
    Polka,
    Argyle,
}

/// A texture selection: pattern, deterministic seed, and draw color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureValue {
    pub kind: TextureKind,
    pub seed: u64,
    pub color: Color,
}

/// Draws a texture in unit space, mapped through `transform`.
pub fn draw_texture(surface: &mut Surface, value: &TextureValue, transform: Transform) {
    let mut rng = SmallRng::seed_from_u64(value.seed);
    match value.kind {
        TextureKind::Stipple => stipple(surface, value.color, &mut rng, transform),
        TextureKind::Mosaic => mosaic(surface, value.color, &mut rng, transform),
        TextureKind::Waves => waves(surface, value.color, &mut rng, transform),
        TextureKind::Polka => polka(surface, value.color, &mut rng, transform),
        TextureKind::Argyle => argyle(surface, value.color, &mut rng, transform),
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Zooms the unit square out from its center by 2x so pattern edges
/// overscan the visible area.
fn zoom2() -> Transform {
    Transform::from_translate(0.5, 0.5)
        .pre_scale(2.0, 2.0)
        .pre_translate(-0.5, -0.5)
}

fn stipple(surface: &mut Surface, color: Color, rng: &mut SmallRng, base: Transform) {
    const MIN_R: f32 = 0.008;
    const MAX_R: f32 = 0.015;
    const DRIFT: f32 = 0.015;
    let cols = lerp(12.0, 30.0, rng.random()).round() as u32;

    let transform = base.pre_concat(zoom2());
    let mut pb = PathBuilder::new();
    let step = 1.0 / cols as f32;
    let mut x = 0.0;
    while x < 1.0 {
        let mut y = 0.0;
        while y < 1.0 {
            pb.push_circle(
                x + DRIFT * rng.random::<f32>() / 0.5,
                y + DRIFT * rng.random::<f32>() / 0.5,
                lerp(MIN_R, MAX_R, rng.random()),
            );
            y += step;
        }
        x += step;
    }
    if let Some(path) = pb.finish() {
        surface.fill_path(&path, &Paint::Solid(color), transform);
    }
}

fn mosaic(surface: &mut Surface, color: Color, rng: &mut SmallRng, base: Transform) {
    let cols = lerp(6.0, 9.0, rng.random()).round() as u32;
    let levels = lerp(2.0, 5.0, rng.random()).round() as f32;

    let transform = base.pre_concat(zoom2());
    let cell = 1.0 / cols as f32;
    for x in 0..cols {
        for y in 0..cols {
            let alpha = (levels * rng.random::<f32>()).round() / levels;
            if alpha <= 0.0 {
                continue;
            }
            let Some(rect) = SkRect::from_xywh(x as f32 * cell, y as f32 * cell, cell, cell)
            else {
                continue;
            };
            let mut pb = PathBuilder::new();
            pb.push_rect(rect);
            if let Some(path) = pb.finish() {
                surface.fill_path(
                    &path,
                    &Paint::Solid(color.with_alpha(alpha * color.alpha_f32())),
                    transform,
                );
            }
        }
    }
}

fn waves(surface: &mut Surface, color: Color, rng: &mut SmallRng, base: Transform) {
    let freq = lerp(4.0, 18.0, rng.random()).round() as u32;
    let lines = lerp(6.0, 8.0, rng.random()).round() as u32;
    let thickness = lerp(0.05, 0.5, rng.random());
    let rotation_deg = rng.random::<f32>() * 360.0;
    // 0.56 is roughly circular (equivalent to an arc join).
    const D: f32 = 0.66;

    let step = 1.0 / freq as f32;
    let cp_offs = D * step / 2.0;
    let line_w = thickness / lines as f32;

    let oriented = base
        .pre_concat(Transform::from_translate(0.5, 0.5))
        .pre_scale(2.0, 2.0)
        .pre_concat(Transform::from_rotate(rotation_deg))
        .pre_translate(-0.5, -0.5);

    for l in 0..lines {
        let transform = oriented.pre_translate(0.0, (0.5 + l as f32) / lines as f32);
        let mut pb = PathBuilder::new();
        pb.move_to(0.0, 0.0);
        for i in 0..freq {
            let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
            pb.cubic_to(
                i as f32 * step + cp_offs,
                cp_offs * sign,
                (i + 1) as f32 * step - cp_offs,
                cp_offs * sign,
                (i + 1) as f32 * step,
                0.0,
            );
        }
        if let Some(path) = pb.finish() {
            surface.stroke_path(&path, color, line_w, transform);
        }
    }
}

fn polka(surface: &mut Surface, color: Color, rng: &mut SmallRng, base: Transform) {
    let rad = lerp(0.1, 0.15, rng.random());
    let hspace = lerp(0.1, 0.2, rng.random()) + 2.0 * rad;
    let num = (1.0 / hspace).round() as i32;
    let thickness = lerp(0.01, 0.1, rng.random());
    let rotation_deg = rng.random::<f32>() * 360.0;

    let transform = base
        .pre_concat(Transform::from_translate(0.5, 0.5))
        .pre_concat(Transform::from_rotate(rotation_deg))
        .pre_translate(-0.5, -0.5)
        .pre_translate(0.5, 0.5 + hspace / SQRT_3);

    for x in -num..=num {
        for y in -num..=num {
            let row_shift = if y % 2 == 0 { 0.0 } else { hspace / 2.0 };
            let mut pb = PathBuilder::new();
            pb.push_circle(x as f32 * hspace + row_shift, y as f32 * hspace * SIN_60, rad);
            if let Some(path) = pb.finish() {
                surface.stroke_path(&path, color, thickness, transform);
            }
        }
    }
}

fn argyle(surface: &mut Surface, color: Color, rng: &mut SmallRng, base: Transform) {
    let freq = lerp(8.0, 14.0, rng.random()).round() as u32;
    let aspect = lerp(1.0, 2.0, rng.random());
    let lines = freq as f32 / aspect;
    let half = 0.5 / lines;
    let thickness = lerp(0.01, 0.02, rng.random());
    let filled = rng.random::<f32>() < 0.5;

    let step = 1.0 / freq as f32;
    let transform_base = base.pre_concat(zoom2());

    let mut l = 0u32;
    while (l as f32) < lines {
        let transform = transform_base.pre_translate(0.0, l as f32 / lines);
        let mut pb = PathBuilder::new();
        pb.move_to(0.0, 0.0);
        for i in 0..freq {
            let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
            pb.line_to((i as f32 + 0.5) * step, half * sign);
            pb.line_to((i + 1) as f32 * step, 0.0);
        }
        for i in (0..freq).rev() {
            let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
            pb.line_to((i as f32 + 1.5) * step, half * sign);
            pb.line_to((i + 1) as f32 * step, 0.0);
        }
        pb.close();
        if let Some(path) = pb.finish() {
            if filled {
                surface.fill_path(&path, &Paint::Solid(color), transform);
            } else {
                surface.stroke_path(&path, color, thickness, transform);
            }
        }
        l += 1;
    }
}
