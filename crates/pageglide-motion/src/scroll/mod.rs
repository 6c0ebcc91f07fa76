//! Wheel-driven smooth scrolling.
//!
//! `smoothing` holds the frame-rate-independent interpolation math,
//! `engine` owns the page wiring and the frame task, and `config`
//! re-exports the scroll settings with the viewport-dependent smoothness
//! pick.
//!
//! # Usage
//!
//! ```ignore
//! use pageglide_motion::scroll::SmoothScroll;
//!
//! let mut engine = SmoothScroll::builder(config.scroll.clone())
//!     .start(&mut doc, &sched.handle());
//!
//! // wheel deltas now feed the engine; step the scheduler each frame
//! doc.wheel(120.0);
//! sched.step(&mut doc, dt);
//!
//! // later
//! engine.destroy(&mut doc);
//! ```

pub mod config;
pub mod engine;
pub mod smoothing;

pub use config::{ScrollConfig, ScrollConfigExt};
pub use engine::{SmoothScroll, SmoothScrollBuilder};
pub use smoothing::{approach, frame_factor};
