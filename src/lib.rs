//! Social media analytics dashboard: CSV loading, a filter-driven
//! aggregation pipeline, and an egui rendering surface on top.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
