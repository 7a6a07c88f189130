//! Layer trees and the recursive compositor.
//!
//! A render is described as a tree of layers. Leaves draw into a fresh
//! surface via a callback; groups composite their children. Any layer
//! can carry effects and an opacity, and a child with `mask` set
//! constrains everything drawn after it within the same group to its
//! own alpha.
//!
//! The tree is built fresh for every render call and owned by that
//! call; the fixed set of renderer-constructed nodes keeps depth and
//! branching bounded, so there is no cycle detection.

use crate::effects::{Effect, apply_effects};
use crate::geom::Size;
use crate::surface::{Composite, Surface};

// ============================================================================
// Layer types
// ============================================================================

/// The draw callback of a leaf layer: a pure function writing into a
/// blank surface of the ambient render size.
pub type DrawFn<'a> = Box<dyn Fn(&mut Surface) + 'a>;

/// A leaf unit of rendering.
#[derive(Default)]
pub struct Layer<'a> {
    /// Draws the layer's content. A layer without a draw callback
    /// renders as fully transparent.
    pub draw: Option<DrawFn<'a>>,

    /// When set, siblings after this layer are clipped to its alpha.
    pub mask: bool,

    /// Uniform opacity applied when compositing onto the parent.
    pub opacity: Option<f32>,

    /// Effects applied to the layer's rendered content.
    pub effects: Vec<Effect>,
}

impl<'a> Layer<'a> {
    /// A layer that just draws.
    pub fn with_draw(draw: impl Fn(&mut Surface) + 'a) -> Self {
        Self {
            draw: Some(Box::new(draw)),
            ..Self::default()
        }
    }

    pub fn masked(mut self) -> Self {
        self.mask = true;
        self
    }

    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }
}

/// A node in the layer tree.
pub enum LayerNode<'a> {
    Leaf(Layer<'a>),
    Group(LayerGroup<'a>),
}

impl<'a> LayerNode<'a> {
    fn mask(&self) -> bool {
        match self {
            LayerNode::Leaf(l) => l.mask,
            LayerNode::Group(g) => g.mask,
        }
    }

    fn opacity(&self) -> Option<f32> {
        match self {
            LayerNode::Leaf(l) => l.opacity,
            LayerNode::Group(g) => g.opacity,
        }
    }

    fn effects(&self) -> &[Effect] {
        match self {
            LayerNode::Leaf(l) => &l.effects,
            LayerNode::Group(g) => &g.effects,
        }
    }
}

impl<'a> From<Layer<'a>> for LayerNode<'a> {
    fn from(layer: Layer<'a>) -> Self {
        LayerNode::Leaf(layer)
    }
}

impl<'a> From<LayerGroup<'a>> for LayerNode<'a> {
    fn from(group: LayerGroup<'a>) -> Self {
        LayerNode::Group(group)
    }
}

/// A layer with children.
#[derive(Default)]
pub struct LayerGroup<'a> {
    pub mask: bool,
    pub opacity: Option<f32>,
    pub effects: Vec<Effect>,
    pub children: Vec<LayerNode<'a>>,
}

impl<'a> LayerGroup<'a> {
    /// Builds a group from conditionally-included children; `None`
    /// entries are skipped.
    pub fn new(children: impl IntoIterator<Item = Option<LayerNode<'a>>>) -> Self {
        Self {
            children: children.into_iter().flatten().collect(),
            ..Self::default()
        }
    }

    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }
}

// ============================================================================
// Compositor
// ============================================================================

/// Renders a layer tree onto `dst`.
///
/// Each node renders into its own fresh surface, its effects are
/// applied into a new surface, and the result is alpha-composited onto
/// the parent honoring the node's opacity.
pub fn render_layer_tree(dst: &mut Surface, size: Size, root: &LayerGroup<'_>) {
    let Ok(mut group_surface) = Surface::new(size) else {
        log::error!("render_layer_tree: could not allocate a {size:?} root surface");
        return;
    };
    draw_group(&mut group_surface, size, root);
    composite_onto(dst, size, group_surface, &root.effects, root.opacity);
}

fn draw_node(dst: &mut Surface, size: Size, node: &LayerNode<'_>) {
    let Ok(mut layer_surface) = Surface::new(size) else {
        log::error!("render_layer_tree: could not allocate a {size:?} layer surface");
        return;
    };

    match node {
        LayerNode::Group(group) => draw_group(&mut layer_surface, size, group),
        LayerNode::Leaf(layer) => {
            if let Some(draw) = &layer.draw {
                draw(&mut layer_surface);
            }
        }
    }

    composite_onto(dst, size, layer_surface, node.effects(), node.opacity());
}

/// Applies a node's effects (in a new buffer) and alpha-composites the
/// result onto the parent.
fn composite_onto(
    dst: &mut Surface,
    size: Size,
    mut rendered: Surface,
    effects: &[Effect],
    opacity: Option<f32>,
) {
    if !effects.is_empty() {
        let Ok(mut effects_surface) = Surface::new(size) else {
            return;
        };
        apply_effects(effects, &mut effects_surface, &rendered, size);
        rendered = effects_surface;
    }

    dst.draw_with(
        &rendered,
        0.0,
        0.0,
        Composite::SourceOver,
        opacity.unwrap_or(1.0),
    );
}

/// Draws a group's children, honoring the masking protocol.
///
/// Children accumulate into the top of a surface stack. Each masking
/// child, after being drawn, pushes a new accumulation surface so that
/// later siblings land there. On exit the stack unwinds with
/// source-atop composites, clipping each accumulated batch to the
/// alpha already below it (nominally the mask's own shape).
fn draw_group(dst: &mut Surface, size: Size, group: &LayerGroup<'_>) {
    let mut stack: Vec<Surface> = Vec::new();

    for child in &group.children {
        match stack.last_mut() {
            Some(top) => draw_node(top, size, child),
            None => draw_node(dst, size, child),
        }
        if child.mask() {
            match Surface::new(size) {
                Ok(surface) => stack.push(surface),
                Err(_) => log::error!("render_layer_tree: could not push a mask surface"),
            }
        }
    }

    while let Some(top) = stack.pop() {
        match stack.last_mut() {
            Some(below) => below.draw_with(&top, 0.0, 0.0, Composite::SourceAtop, 1.0),
            None => dst.draw_with(&top, 0.0, 0.0, Composite::SourceAtop, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geom::Rect;
    use crate::surface::Paint;

    fn fill_layer<'a>(rect: Rect, color: Color) -> Layer<'a> {
        Layer::with_draw(move |surface: &mut Surface| {
            surface.fill_rect(rect, &Paint::Solid(color), Composite::SourceOver, 1.0);
        })
    }

    #[test]
    fn leaf_draws_onto_destination() {
        let size = Size::square(8);
        let mut dst = Surface::new(size).unwrap();
        let tree = LayerGroup::new([Some(LayerNode::from(fill_layer(
            Rect::from_size(size),
            Color::rgb(1, 2, 3),
        )))]);
        render_layer_tree(&mut dst, size, &tree);
        assert_eq!(dst.pixel(4, 4), Some(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn falsy_children_are_skipped() {
        let size = Size::square(8);
        let mut dst = Surface::new(size).unwrap();
        let include = false;
        let tree = LayerGroup::new([
            include.then(|| LayerNode::from(fill_layer(Rect::from_size(size), Color::WHITE))),
            None,
        ]);
        render_layer_tree(&mut dst, size, &tree);
        assert_eq!(dst.pixel(4, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn opacity_applies_at_composite_time() {
        let size = Size::square(8);
        let mut dst = Surface::new(size).unwrap();
        let mut layer = fill_layer(Rect::from_size(size), Color::BLACK);
        layer.opacity = Some(0.5);
        let tree = LayerGroup::new([Some(LayerNode::from(layer))]);
        render_layer_tree(&mut dst, size, &tree);
        let a = dst.pixel(4, 4).unwrap().a;
        assert!((126..=129).contains(&a), "alpha was {a}");
    }

    #[test]
    fn mask_clips_following_siblings() {
        let size = Size::square(8);
        let mut dst = Surface::new(size).unwrap();
        // Mask: left half. Sibling: full white fill.
        let mask = fill_layer(Rect::new(0.0, 0.0, 4.0, 8.0), Color::BLACK).masked();
        let content = fill_layer(Rect::from_size(size), Color::WHITE);
        let tree = LayerGroup::new([
            Some(LayerNode::from(mask)),
            Some(LayerNode::from(content)),
        ]);
        render_layer_tree(&mut dst, size, &tree);
        assert_eq!(dst.pixel(2, 4), Some(Color::WHITE));
        assert_eq!(dst.pixel(6, 4).unwrap().a, 0);
    }

    #[test]
    fn transparent_mask_blanks_following_siblings() {
        let size = Size::square(8);
        let mut dst = Surface::new(size).unwrap();
        let mask = Layer::default().masked();
        let content = fill_layer(Rect::from_size(size), Color::WHITE);
        let tree = LayerGroup::new([
            Some(LayerNode::from(mask)),
            Some(LayerNode::from(content)),
        ]);
        render_layer_tree(&mut dst, size, &tree);
        assert_eq!(dst.pixel(4, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn content_before_the_mask_is_unaffected() {
        let size = Size::square(8);
        let mut dst = Surface::new(size).unwrap();
        let before = fill_layer(Rect::new(0.0, 0.0, 8.0, 2.0), Color::rgb(9, 9, 9));
        let mask = fill_layer(Rect::new(0.0, 4.0, 8.0, 4.0), Color::BLACK).masked();
        let content = fill_layer(Rect::from_size(size), Color::WHITE);
        let tree = LayerGroup::new([
            Some(LayerNode::from(before)),
            Some(LayerNode::from(mask)),
            Some(LayerNode::from(content)),
        ]);
        render_layer_tree(&mut dst, size, &tree);
        // The strip drawn before the mask survives (white clips onto
        // it, so it reads white, but it is not erased).
        assert_eq!(dst.pixel(4, 1).unwrap().a, 255);
        // Inside the mask region the sibling shows.
        assert_eq!(dst.pixel(4, 6), Some(Color::WHITE));
        // Outside both, nothing.
        assert_eq!(dst.pixel(4, 3).unwrap().a, 0);
    }

    #[test]
    fn nested_masks_stack_and_unwind() {
        let size = Size::square(8);
        let mut dst = Surface::new(size).unwrap();
        // First mask: left half. Second mask: top half. Content: full.
        // Result: only the top-left quadrant.
        let tree = LayerGroup::new([
            Some(LayerNode::from(
                fill_layer(Rect::new(0.0, 0.0, 4.0, 8.0), Color::BLACK).masked(),
            )),
            Some(LayerNode::from(
                fill_layer(Rect::new(0.0, 0.0, 8.0, 4.0), Color::BLACK).masked(),
            )),
            Some(LayerNode::from(fill_layer(
                Rect::from_size(size),
                Color::WHITE,
            ))),
        ]);
        render_layer_tree(&mut dst, size, &tree);
        assert!(dst.pixel(2, 2).unwrap().a == 255);
        assert_eq!(dst.pixel(6, 2).unwrap().a, 0);
        assert_eq!(dst.pixel(2, 6).unwrap().a, 255); // first mask only
        assert_eq!(dst.pixel(6, 6).unwrap().a, 0);
    }

    #[test]
    fn group_effects_apply_to_composited_children() {
        let size = Size::square(16);
        let mut dst = Surface::new(size).unwrap();
        let group = LayerGroup::new([Some(LayerNode::from(fill_layer(
            Rect::new(4.0, 4.0, 8.0, 8.0),
            Color::WHITE,
        )))])
        .with_effects(vec![Effect::fill_color(Color::rgb(0, 128, 0))]);
        render_layer_tree(&mut dst, size, &group);
        assert_eq!(dst.pixel(8, 8), Some(Color::rgb(0, 128, 0)));
        assert_eq!(dst.pixel(1, 1).unwrap().a, 0);
    }
}
