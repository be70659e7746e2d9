//! Shared sampling context: configuration, report listeners, and the
//! participation decider.

use crate::error::Result;
use crate::fill_rate::config::SamplerConfig;
use crate::fill_rate::sampler::FillRateReport;
use crate::notify::{ListenerRegistry, SubscriptionHandle};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Decides whether a sampler participates, given the configured rate.
pub type SampleDecider = Arc<dyn Fn(f64) -> bool + Send + Sync>;

fn default_decider() -> SampleDecider {
    Arc::new(|rate: f64| fastrand::f64() < rate)
}

/// Shared context for fill-rate sampling.
///
/// Owns the sampling configuration, the report listener list, and the
/// participation decider. Every [`FillRateSampler`](crate::fill_rate::FillRateSampler)
/// created from the same context (or a clone of it) shares all three.
///
/// Configuration reads are lock-free via `arc-swap`. Rate changes apply to
/// samplers constructed afterwards; a sampler's participation is decided once
/// at construction and never revisited.
///
/// # Examples
///
/// ```rust
/// use fillrate::fill_rate::{FillRateContext, FillRateReport};
///
/// # fn main() -> fillrate::error::Result<()> {
/// let context = FillRateContext::builder()
///     .sample_rate(1.0)
///     .min_sample_count(0)
///     .build()?;
///
/// let _subscription = context.add_listener(|report: &FillRateReport| {
///     println!("aggregate blankness: {}", report.blankness());
/// });
/// # Ok(())
/// # }
/// ```
pub struct FillRateContext {
    config: Arc<ArcSwap<SamplerConfig>>,
    listeners: ListenerRegistry<FillRateReport>,
    decider: SampleDecider,
}

impl FillRateContext {
    /// Create a context with the default (sampling-disabled) configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(ArcSwap::new(Arc::new(SamplerConfig::default()))),
            listeners: ListenerRegistry::new(),
            decider: default_decider(),
        }
    }

    /// Start building a context.
    pub fn builder() -> FillRateContextBuilder {
        FillRateContextBuilder::new()
    }

    /// The current configuration.
    pub fn config(&self) -> SamplerConfig {
        **self.config.load()
    }

    /// Set the sampling rate for future participation decisions.
    ///
    /// Samplers whose participation was already decided are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`FillRateError::InvalidSampleRate`](crate::error::FillRateError::InvalidSampleRate)
    /// if `rate` is NaN or outside `[0.0, 1.0]`; the configuration is left
    /// unchanged.
    pub fn set_sample_rate(&self, rate: f64) -> Result<()> {
        let mut config = self.config();
        config.sample_rate = rate;
        config.validate()?;
        self.config.store(Arc::new(config));
        Ok(())
    }

    /// Set the minimum sample count required for a flush to emit a report.
    ///
    /// Read at flush time, so the new threshold applies to active samplers.
    pub fn set_min_sample_count(&self, count: u32) {
        let mut config = self.config();
        config.min_sample_count = count;
        self.config.store(Arc::new(config));
    }

    /// Register a listener for flushed reports.
    ///
    /// Returns a handle that unsubscribes the listener when dropped or
    /// removed; a removed listener never receives reports.
    pub fn add_listener<F>(&self, callback: F) -> SubscriptionHandle<FillRateReport>
    where
        F: Fn(&FillRateReport) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    /// Number of currently-registered report listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Draw the once-per-sampler participation decision at the current rate.
    pub(crate) fn decide_enabled(&self) -> bool {
        (self.decider)(self.config().sample_rate)
    }

    pub(crate) fn emit(&self, report: &FillRateReport) {
        self.listeners.notify(report);
    }
}

impl Default for FillRateContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FillRateContext {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            listeners: self.listeners.clone(),
            decider: Arc::clone(&self.decider),
        }
    }
}

/// Builder for constructing a [`FillRateContext`].
///
/// # Examples
///
/// ```rust
/// use fillrate::fill_rate::FillRateContext;
///
/// # fn main() -> fillrate::error::Result<()> {
/// let context = FillRateContext::builder()
///     .sample_rate(0.1)
///     .min_sample_count(5)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct FillRateContextBuilder {
    config: SamplerConfig,
    decider: Option<SampleDecider>,
}

impl FillRateContextBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: SamplerConfig::default(),
            decider: None,
        }
    }

    /// Set the sampling rate (validated at build time).
    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.config.sample_rate = rate;
        self
    }

    /// Set the minimum sample count required for a flush to emit a report.
    pub fn min_sample_count(mut self, count: u32) -> Self {
        self.config.min_sample_count = count;
        self
    }

    /// Replace the entire configuration.
    pub fn config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject the participation decider.
    ///
    /// The default draws `fastrand::f64() < rate`; tests inject a
    /// deterministic decider instead.
    pub fn decider<F>(mut self, decider: F) -> Self
    where
        F: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.decider = Some(Arc::new(decider));
        self
    }

    /// Validate the configuration and build the context.
    ///
    /// # Errors
    ///
    /// Returns [`FillRateError::InvalidSampleRate`](crate::error::FillRateError::InvalidSampleRate)
    /// if the configured rate is NaN or outside `[0.0, 1.0]`.
    pub fn build(self) -> Result<FillRateContext> {
        self.config.validate()?;
        let decider = self.decider.unwrap_or_else(default_decider);
        Ok(FillRateContext {
            config: Arc::new(ArcSwap::new(Arc::new(self.config))),
            listeners: ListenerRegistry::new(),
            decider,
        })
    }
}

impl Default for FillRateContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
