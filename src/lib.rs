//! # fillrate
//!
//! Viewport fill-rate sampling and scene-change notification for virtualized
//! list UIs.
//!
//! ## Overview
//!
//! `fillrate` provides two leaf utilities for list-rendering frameworks:
//!
//! - [`SceneTracker`](scene::SceneTracker): holds the currently-active scene
//!   and broadcasts changes synchronously to registered listeners.
//! - [`FillRateSampler`](fill_rate::FillRateSampler): measures the fraction
//!   of a scrollable viewport not covered by mounted rows ("blankness") and
//!   aggregates sampled measurements into periodic reports.
//!
//! The host framework stays in charge of rendering and layout; it supplies
//! row geometry through the [`ListMetrics`](fill_rate::ListMetrics) accessor
//! and consumes [`FillRateReport`](fill_rate::FillRateReport)s. Everything
//! runs synchronously within the caller's invocation: no threads, no
//! asynchronous suspension.
//!
//! ## Quick Start
//!
//! ```rust
//! use fillrate::prelude::*;
//!
//! # fn main() -> fillrate::error::Result<()> {
//! // Scene changes are broadcast to every registered listener.
//! let tracker = SceneTracker::new();
//! let subscription = tracker.on_scene_changed(|scene: &String| {
//!     println!("now showing {scene}");
//! });
//! tracker.set_active_scene("home".to_string());
//! subscription.remove();
//!
//! // Blankness sampling: opt in with a rate, then sample per list.
//! let context = FillRateContext::builder()
//!     .sample_rate(1.0)
//!     .min_sample_count(0)
//!     .build()?;
//! let _reports = context.add_listener(|report: &FillRateReport| {
//!     println!("blank fraction: {}", report.blankness());
//! });
//!
//! let rows = vec![
//!     CellMetrics { offset: 0.0, length: 50.0, is_mounted: true },
//!     CellMetrics { offset: 50.0, length: 50.0, is_mounted: true },
//! ];
//! let mut sampler = FillRateSampler::new(&context);
//! sampler.activate();
//! let blankness = sampler.compute_blankness(
//!     &rows,
//!     RenderWindow::new(0, 1),
//!     ScrollMetrics { offset: 0.0, visible_length: 100.0, velocity: 0.0, d_offset: 0.0 },
//! );
//! assert_eq!(blankness, 0.0);
//! sampler.deactivate_and_flush();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod error;
pub mod fill_rate;
pub mod notify;
pub mod scene;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::error::{FillRateError, Result};
    pub use crate::fill_rate::{
        CellMetrics, FillRateContext, FillRateReport, FillRateSampler, ListMetrics, RenderWindow,
        SamplerConfig, ScrollMetrics,
    };
    pub use crate::notify::SubscriptionHandle;
    pub use crate::scene::SceneTracker;
}
