//! Calendar heatmap layout engine.
//!
//! [`services::CalendarHeatmap`] turns a sparse list of dated values into a
//! week-aligned grid of positioned, classified cells. Renderers in [`render`]
//! and [`tui`] paint the resulting [`services::Scene`].

pub mod cli;
pub mod render;
pub mod services;
pub mod tui;
pub mod types;
