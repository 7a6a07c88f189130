//! iconsmith: app icon compositing and container encoding
//!
//! This crate renders composable app icons (background, foreground
//! content, effects, badge) and exports them in the container formats
//! the platforms require: ICNS for macOS, ICO for Windows/web
//! favicons, plus PNG sets with their accompanying XML/JSON manifests
//! for Android, iOS, watchOS, tvOS, the web and the Play Store.
//!
//! # Pipeline
//!
//! A render starts from a flat value bag ([`IconValues`]) and a
//! [`RenderConfig`] (target size, silhouette shape, which half of the
//! icon to produce). The renderer builds a small layer tree, the
//! compositor renders each layer into its own surface and applies its
//! effects, and group masking clips content to the icon silhouette.
//! The resulting [`Surface`]s go to the encoders.
//!
//! ```
//! use iconsmith::{
//!     Background, Color, IconValues, RenderConfig, Shape, Size, render_app_icon,
//! };
//!
//! let values = IconValues {
//!     background: Background::Color(Color::from_hex("#3d73e8").unwrap()),
//!     ..IconValues::default()
//! };
//! let config = RenderConfig::new(Size::square(48), Shape::Circle);
//! let icon = render_app_icon(&values, &config).unwrap();
//! assert_eq!(icon.pixel(0, 0).unwrap().a, 0); // outside the circle
//! ```
//!
//! # Artifacts
//!
//! The [`targets`] module bundles renders into per-platform artifact
//! sets:
//!
//! ```no_run
//! use iconsmith::{IconValues, targets};
//!
//! let values = IconValues::default();
//! for artifact in targets::web_artifacts(&values).unwrap() {
//!     std::fs::write(&artifact.filename, &artifact.content).unwrap();
//! }
//! ```

mod color;
mod draw;
mod effects;
pub mod encode;
mod error;
mod geom;
mod layer;
mod renderer;
mod shape;
mod surface;
pub mod targets;
pub mod texture;

pub use color::Color;
pub use draw::{draw_center_crop, draw_center_inside, draw_scaled};
pub use effects::{Effect, apply_effects};
pub use encode::Artifact;
pub use encode::icns::{IcnsOptions, make_icns};
pub use encode::ico::make_ico;
pub use error::RenderError;
pub use geom::{Rect, Size};
pub use layer::{Layer, LayerGroup, LayerNode, render_layer_tree};
pub use renderer::{
    Badge, BadgeStyle, Background, ContentScaling, Foreground, ForegroundEffect, GradientValue,
    IconValues, ImageSource, Padding, RenderConfig, RenderLayer, RenderToken, render_app_icon,
    render_preview,
};
pub use shape::{
    CornerRadii, IOS_RADIUS, MACOS_RADIUS, Shape, ellipse_path, platform_squircle, rect_path,
    rounded_rect_path, squircle_path,
};
pub use surface::{Composite, GradientStop, Paint, Surface};
