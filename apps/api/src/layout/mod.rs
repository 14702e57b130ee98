// Page layout for export.
// Font metrics, color parsing and the composer that positions a visual document on A4.
// Pure CPU work; no I/O.

pub mod color;
pub mod font_metrics;
pub mod page;

pub use font_metrics::a4_portrait;
pub use page::{compose, DrawOp, PageLayout};
