//! Core library for lipmark: mouth region localization over playing video.
//!
//! Bounded contexts, each split into pure `domain` logic and `infrastructure`
//! adapters where I/O is involved:
//! - [`video`]: frame acquisition from playable sources
//! - [`detection`]: face estimation, landmark synthesis, crop planning
//! - [`session`]: the periodic detection cycle and its lifecycle
//! - [`overlay`]: rendering results for inspection
//! - [`shared`]: the value types the contexts exchange

pub mod detection;
pub mod overlay;
pub mod session;
pub mod shared;
pub mod video;
