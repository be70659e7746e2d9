//! Viewport blankness sampling for virtualized lists.
//!
//! A [`FillRateContext`] holds the sampling configuration and the report
//! listener list. Each virtualized list creates a [`FillRateSampler`] from
//! the shared context; the sampler measures how much of the visible viewport
//! is not covered by mounted rows and, for the sampled subset of instances,
//! aggregates those measurements into a [`FillRateReport`] delivered to the
//! context's listeners on flush.
//!
//! Row geometry comes from the host list framework through the
//! [`ListMetrics`] accessor trait.

mod config;
mod context;
mod geometry;
mod sampler;

pub use config::SamplerConfig;
pub use context::{FillRateContext, FillRateContextBuilder, SampleDecider};
pub use geometry::{CellMetrics, ListMetrics, RenderWindow, ScrollMetrics};
pub use sampler::{FillRateReport, FillRateSampler};
