//! Blankness sampling over a rendered row window.

use crate::fill_rate::context::FillRateContext;
use crate::fill_rate::geometry::{self, ListMetrics, RenderWindow, ScrollMetrics};
use serde::Serialize;
use std::time::Instant;

/// Aggregate fill-rate statistics emitted on flush.
///
/// All pixel fields are totals over the sampled session; `blankness()` gives
/// the session-wide blank fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillRateReport {
    /// Total blank pixels observed across all samples.
    pub pixels_blank: f64,
    /// Total visible pixels examined across all samples.
    pub pixels_sampled: f64,
    /// Total absolute scroll distance across all samples.
    pub pixels_scrolled: f64,
    /// Number of samples contributing to this report.
    pub sample_count: u32,
    /// Samples with any blank pixels.
    pub any_blank_count: u32,
    /// Milliseconds spent with any part of the viewport blank.
    pub any_blank_ms: f64,
    /// Sum of absolute scroll speeds (px/s) over blank samples.
    pub any_blank_speed_sum: f64,
    /// Samples more than half blank.
    pub mostly_blank_count: u32,
    /// Milliseconds spent with the viewport more than half blank.
    pub mostly_blank_ms: f64,
    /// Milliseconds between activation and flush.
    pub total_time_spent_ms: f64,
}

impl FillRateReport {
    /// Aggregate blank fraction, `0.0` when nothing was sampled.
    pub fn blankness(&self) -> f64 {
        if self.pixels_sampled > 0.0 {
            self.pixels_blank / self.pixels_sampled
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    pixels_blank: f64,
    pixels_sampled: f64,
    pixels_scrolled: f64,
    sample_count: u32,
    any_blank_count: u32,
    any_blank_ms: f64,
    any_blank_speed_sum: f64,
    mostly_blank_count: u32,
    mostly_blank_ms: f64,
    any_blank_start: Option<Instant>,
    mostly_blank_start: Option<Instant>,
}

impl Accumulator {
    fn report(&self, activated_at: Instant) -> FillRateReport {
        FillRateReport {
            pixels_blank: self.pixels_blank,
            pixels_sampled: self.pixels_sampled,
            pixels_scrolled: self.pixels_scrolled,
            sample_count: self.sample_count,
            any_blank_count: self.any_blank_count,
            any_blank_ms: self.any_blank_ms,
            any_blank_speed_sum: self.any_blank_speed_sum,
            mostly_blank_count: self.mostly_blank_count,
            mostly_blank_ms: self.mostly_blank_ms,
            total_time_spent_ms: millis_since(activated_at, Instant::now()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SamplerState {
    Inactive,
    Active { since: Instant },
}

fn millis_since(start: Instant, end: Instant) -> f64 {
    end.duration_since(start).as_secs_f64() * 1000.0
}

/// Samples viewport blankness for one virtualized list.
///
/// Participation is decided once, at construction, weighted by the context's
/// configured sample rate. A participating sampler accumulates statistics
/// between [`activate`](FillRateSampler::activate) and
/// [`deactivate_and_flush`](FillRateSampler::deactivate_and_flush); the flush
/// emits one [`FillRateReport`] to the context's listeners when at least
/// `min_sample_count` samples accumulated.
///
/// [`compute_blankness`](FillRateSampler::compute_blankness) always returns
/// the instantaneous blank fraction; sampling state only controls whether the
/// call contributes to the aggregate.
///
/// # Examples
///
/// ```rust
/// use fillrate::fill_rate::{
///     CellMetrics, FillRateContext, FillRateSampler, RenderWindow, ScrollMetrics,
/// };
///
/// # fn main() -> fillrate::error::Result<()> {
/// let context = FillRateContext::builder()
///     .sample_rate(1.0)
///     .min_sample_count(0)
///     .build()?;
///
/// let rows = vec![
///     CellMetrics { offset: 0.0, length: 50.0, is_mounted: true },
///     CellMetrics { offset: 50.0, length: 50.0, is_mounted: true },
/// ];
///
/// let mut sampler = FillRateSampler::new(&context);
/// sampler.activate();
/// let blankness = sampler.compute_blankness(
///     &rows,
///     RenderWindow::new(0, 1),
///     ScrollMetrics { offset: 0.0, visible_length: 100.0, velocity: 0.0, d_offset: 0.0 },
/// );
/// assert_eq!(blankness, 0.0);
/// sampler.deactivate_and_flush();
/// # Ok(())
/// # }
/// ```
pub struct FillRateSampler {
    context: FillRateContext,
    enabled: bool,
    state: SamplerState,
    acc: Accumulator,
}

impl FillRateSampler {
    /// Create a sampler, drawing its participation decision from `context`.
    pub fn new(context: &FillRateContext) -> Self {
        let enabled = context.decide_enabled();
        tracing::debug!(enabled, "fill-rate sampler created");
        Self {
            context: context.clone(),
            enabled,
            state: SamplerState::Inactive,
            acc: Accumulator::default(),
        }
    }

    /// Whether this sampler participates in aggregation.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a sampling session is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SamplerState::Active { .. })
    }

    /// Begin a sampling session. No-op when already active or not
    /// participating.
    pub fn activate(&mut self) {
        if self.enabled && !self.is_active() {
            self.state = SamplerState::Active {
                since: Instant::now(),
            };
        }
    }

    /// Fraction of the viewport not covered by any mounted row in `window`.
    ///
    /// Always in `[0.0, 1.0]`; `0.0` for an empty list, an empty window, or a
    /// non-positive visible length. While a session is active, the sample
    /// also contributes to the aggregate flushed later.
    ///
    /// `list.cell_metrics` is consulted once per row, only for indices inside
    /// `window`.
    pub fn compute_blankness<M: ListMetrics + ?Sized>(
        &mut self,
        list: &M,
        window: RenderWindow,
        scroll: ScrollMetrics,
    ) -> f64 {
        if list.is_empty() || window.is_empty() || scroll.visible_length <= 0.0 {
            return 0.0;
        }

        let viewport_start = scroll.offset;
        let viewport_end = scroll.offset + scroll.visible_length;
        let blank = geometry::blank_pixels(list, window, viewport_start, viewport_end);
        let blankness = blank / scroll.visible_length;

        if self.enabled && self.is_active() {
            self.record(blank, blankness, scroll);
        }
        blankness
    }

    fn record(&mut self, blank: f64, blankness: f64, scroll: ScrollMetrics) {
        let now = Instant::now();
        let acc = &mut self.acc;

        acc.sample_count += 1;
        acc.pixels_sampled += scroll.visible_length;
        acc.pixels_scrolled += scroll.d_offset.abs();

        // Close out blank intervals opened by the previous sample.
        if let Some(start) = acc.any_blank_start.take() {
            acc.any_blank_ms += millis_since(start, now);
        }
        if let Some(start) = acc.mostly_blank_start.take() {
            acc.mostly_blank_ms += millis_since(start, now);
        }

        if blankness > 0.0 {
            acc.pixels_blank += blank;
            acc.any_blank_count += 1;
            acc.any_blank_speed_sum += scroll.velocity.abs();
            acc.any_blank_start = Some(now);
            if blankness > 0.5 {
                acc.mostly_blank_count += 1;
                acc.mostly_blank_start = Some(now);
            }
        }
    }

    /// End the sampling session, emitting one report to the context's
    /// listeners when enough samples accumulated.
    ///
    /// The `min_sample_count` threshold is read at flush time. Under-sampled
    /// sessions reset silently. No-op when not participating or not active.
    pub fn deactivate_and_flush(&mut self) {
        if !self.enabled {
            return;
        }
        let SamplerState::Active { since } = self.state else {
            return;
        };

        let min_sample_count = self.context.config().min_sample_count;
        if self.acc.sample_count >= min_sample_count {
            let report = self.acc.report(since);
            tracing::debug!(
                sample_count = report.sample_count,
                pixels_blank = report.pixels_blank,
                pixels_sampled = report.pixels_sampled,
                "flushing fill-rate report"
            );
            self.context.emit(&report);
        }

        self.acc = Accumulator::default();
        self.state = SamplerState::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill_rate::geometry::CellMetrics;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn always_on_context(min_sample_count: u32) -> FillRateContext {
        FillRateContext::builder()
            .sample_rate(1.0)
            .min_sample_count(min_sample_count)
            .decider(|_| true)
            .build()
            .unwrap()
    }

    fn two_rows() -> Vec<CellMetrics> {
        vec![
            CellMetrics {
                offset: 0.0,
                length: 40.0,
                is_mounted: true,
            },
            CellMetrics {
                offset: 40.0,
                length: 40.0,
                is_mounted: true,
            },
        ]
    }

    fn full_viewport() -> ScrollMetrics {
        ScrollMetrics {
            offset: 0.0,
            visible_length: 100.0,
            velocity: 0.0,
            d_offset: 0.0,
        }
    }

    fn capture_reports(context: &FillRateContext) -> Arc<Mutex<Vec<FillRateReport>>> {
        let reports: Arc<Mutex<Vec<FillRateReport>>> = Arc::new(Mutex::new(Vec::new()));
        let reports_clone = Arc::clone(&reports);
        context
            .add_listener(move |report: &FillRateReport| {
                reports_clone.lock().push(*report);
            })
            .detach();
        reports
    }

    #[test]
    fn test_disabled_sampler_never_activates() {
        let context = FillRateContext::builder()
            .sample_rate(0.0)
            .decider(|rate| rate > 0.0)
            .build()
            .unwrap();
        let mut sampler = FillRateSampler::new(&context);
        assert!(!sampler.is_enabled());

        sampler.activate();
        assert!(!sampler.is_active());
    }

    #[test]
    fn test_disabled_sampler_still_reports_instantaneous_blankness() {
        let context = FillRateContext::builder()
            .sample_rate(0.0)
            .decider(|rate| rate > 0.0)
            .build()
            .unwrap();
        let reports = capture_reports(&context);

        let mut sampler = FillRateSampler::new(&context);
        sampler.activate();
        let blankness =
            sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        assert_eq!(blankness, 0.2);

        sampler.deactivate_and_flush();
        assert!(reports.lock().is_empty());
    }

    #[test]
    fn test_inactive_sampler_does_not_accumulate() {
        let context = always_on_context(0);
        let reports = capture_reports(&context);

        let mut sampler = FillRateSampler::new(&context);
        sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());

        sampler.deactivate_and_flush();
        assert!(reports.lock().is_empty());
    }

    #[test]
    fn test_single_sample_flush_matches_instantaneous_blankness() {
        let context = always_on_context(0);
        let reports = capture_reports(&context);

        let mut sampler = FillRateSampler::new(&context);
        sampler.activate();
        let blankness =
            sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        assert_eq!(blankness, 0.2);

        sampler.deactivate_and_flush();
        let reports = reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].sample_count, 1);
        assert_eq!(reports[0].pixels_sampled, 100.0);
        assert_eq!(reports[0].pixels_blank, 20.0);
        assert_eq!(reports[0].blankness(), blankness);
        assert_eq!(reports[0].any_blank_count, 1);
        assert_eq!(reports[0].mostly_blank_count, 0);
    }

    #[test]
    fn test_samples_aggregate_across_calls() {
        let context = always_on_context(0);
        let reports = capture_reports(&context);

        let mut sampler = FillRateSampler::new(&context);
        sampler.activate();
        sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        sampler.compute_blankness(
            &two_rows(),
            RenderWindow::new(0, 1),
            ScrollMetrics {
                offset: 30.0,
                visible_length: 100.0,
                velocity: 120.0,
                d_offset: 30.0,
            },
        );

        sampler.deactivate_and_flush();
        let reports = reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].sample_count, 2);
        assert_eq!(reports[0].pixels_sampled, 200.0);
        // 20 blank at offset 0, 50 blank at offset 30 (viewport [30, 130]).
        assert_eq!(reports[0].pixels_blank, 70.0);
        assert_eq!(reports[0].pixels_scrolled, 30.0);
        assert_eq!(reports[0].any_blank_count, 2);
        assert_eq!(reports[0].any_blank_speed_sum, 120.0);
    }

    #[test]
    fn test_mostly_blank_counted_past_half() {
        let context = always_on_context(0);
        let reports = capture_reports(&context);

        let mut sampler = FillRateSampler::new(&context);
        sampler.activate();
        // Viewport [100, 200] is past both rows: fully blank.
        let blankness = sampler.compute_blankness(
            &two_rows(),
            RenderWindow::new(0, 1),
            ScrollMetrics {
                offset: 100.0,
                visible_length: 100.0,
                velocity: 0.0,
                d_offset: 0.0,
            },
        );
        assert_eq!(blankness, 1.0);

        sampler.deactivate_and_flush();
        let reports = reports.lock();
        assert_eq!(reports[0].mostly_blank_count, 1);
        assert_eq!(reports[0].any_blank_count, 1);
    }

    #[test]
    fn test_min_sample_count_suppresses_flush() {
        let context = always_on_context(2);
        let reports = capture_reports(&context);

        let mut sampler = FillRateSampler::new(&context);
        sampler.activate();
        sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        sampler.deactivate_and_flush();
        assert!(reports.lock().is_empty());

        // Accumulator was reset; a new session reaching the threshold reports.
        sampler.activate();
        sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        sampler.deactivate_and_flush();

        let reports = reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].sample_count, 2);
    }

    #[test]
    fn test_flush_resets_accumulator() {
        let context = always_on_context(0);
        let reports = capture_reports(&context);

        let mut sampler = FillRateSampler::new(&context);
        sampler.activate();
        sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        sampler.deactivate_and_flush();

        sampler.activate();
        sampler.deactivate_and_flush();

        let reports = reports.lock();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].sample_count, 0);
        assert_eq!(reports[1].pixels_sampled, 0.0);
    }

    #[test]
    fn test_rate_change_not_retroactive() {
        let context = FillRateContext::builder()
            .sample_rate(1.0)
            .min_sample_count(0)
            .decider(|rate| rate >= 0.5)
            .build()
            .unwrap();
        let reports = capture_reports(&context);

        let mut decided = FillRateSampler::new(&context);
        context.set_sample_rate(0.0).unwrap();

        assert!(decided.is_enabled());
        decided.activate();
        decided.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        decided.deactivate_and_flush();
        assert_eq!(reports.lock().len(), 1);

        let mut late = FillRateSampler::new(&context);
        assert!(!late.is_enabled());
        late.activate();
        late.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        late.deactivate_and_flush();
        assert_eq!(reports.lock().len(), 1);
    }

    #[test]
    fn test_empty_window_and_degenerate_viewport_are_zero() {
        let context = always_on_context(0);
        let mut sampler = FillRateSampler::new(&context);
        sampler.activate();

        assert_eq!(
            sampler.compute_blankness(&two_rows(), RenderWindow::new(1, 0), full_viewport()),
            0.0
        );
        assert_eq!(
            sampler.compute_blankness(
                &two_rows(),
                RenderWindow::new(0, 1),
                ScrollMetrics {
                    offset: 0.0,
                    visible_length: 0.0,
                    velocity: 0.0,
                    d_offset: 0.0,
                },
            ),
            0.0
        );
        let empty: Vec<CellMetrics> = Vec::new();
        assert_eq!(
            sampler.compute_blankness(&empty, RenderWindow::new(0, 0), full_viewport()),
            0.0
        );
    }

    #[test]
    fn test_report_serializes() {
        let context = always_on_context(0);
        let reports = capture_reports(&context);

        let mut sampler = FillRateSampler::new(&context);
        sampler.activate();
        sampler.compute_blankness(&two_rows(), RenderWindow::new(0, 1), full_viewport());
        sampler.deactivate_and_flush();

        let json = serde_json::to_value(reports.lock()[0]).unwrap();
        assert_eq!(json["pixels_blank"], 20.0);
        assert_eq!(json["pixels_sampled"], 100.0);
        assert_eq!(json["sample_count"], 1);
    }
}
