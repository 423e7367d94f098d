//! Layout services: date window, value index, geometry, tooltip and scene assembly

pub mod assembler;
pub mod date_range;
pub mod document;
pub mod geometry;
pub mod indexer;
pub mod scale;
pub mod tooltip;

pub use assembler::{CalendarHeatmap, CellKey, RectDescriptor, Scene};
pub use date_range::DateRange;
pub use document::HeatmapDocument;
pub use geometry::{GridGeometry, LabelDescriptor, ViewBox};
pub use indexer::ValueIndex;
pub use scale::ClassScale;
pub use tooltip::{TooltipDescriptor, TooltipState};
