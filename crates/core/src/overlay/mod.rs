//! Visualization of detection results: landmark dots, the mouth crop
//! rectangle, and its label, rendered onto a pluggable surface.

pub mod domain;
pub mod infrastructure;
