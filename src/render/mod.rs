//! Renderer adapters. Each one turns a [`Scene`] into some output.

pub mod svg;

use crate::services::Scene;

pub use svg::SvgRenderer;

/// Paints a scene. Adapters never reach back into the heatmap state.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene) -> Self::Output;
}
