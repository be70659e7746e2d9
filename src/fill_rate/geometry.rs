//! Row geometry and the viewport coverage computation.

/// Layout metrics for a single row, supplied by the host list framework.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Leading edge of the row along the scroll axis, in pixels.
    pub offset: f64,
    /// Extent of the row along the scroll axis, in pixels.
    pub length: f64,
    /// Whether the row is currently mounted. Unmounted rows cover nothing.
    pub is_mounted: bool,
}

/// Inclusive range of row indices currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderWindow {
    /// First rendered row index.
    pub first: usize,
    /// Last rendered row index, inclusive.
    pub last: usize,
}

impl RenderWindow {
    /// Create a window spanning `first..=last`.
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// A window with `last < first` renders nothing.
    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }
}

/// Scroll position of the viewport at sampling time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Scroll offset of the viewport's leading edge, in pixels.
    pub offset: f64,
    /// Visible extent of the viewport along the scroll axis, in pixels.
    pub visible_length: f64,
    /// Scroll velocity in pixels per second.
    pub velocity: f64,
    /// Offset delta since the previous scroll event, in pixels.
    pub d_offset: f64,
}

/// Row-layout accessor supplied by the host list framework.
///
/// [`cell_metrics`](ListMetrics::cell_metrics) is called at most once per row
/// per blankness computation, and only for indices inside the rendered
/// window. Returning `None` marks the row as not yet measured; its span
/// counts as blank.
pub trait ListMetrics {
    /// Total number of rows in the list.
    fn len(&self) -> usize;

    /// Whether the list has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Layout metrics for the row at `index`, or `None` if unmeasured.
    fn cell_metrics(&self, index: usize) -> Option<CellMetrics>;
}

impl ListMetrics for [CellMetrics] {
    fn len(&self) -> usize {
        <[CellMetrics]>::len(self)
    }

    fn cell_metrics(&self, index: usize) -> Option<CellMetrics> {
        self.get(index).copied()
    }
}

impl ListMetrics for Vec<CellMetrics> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn cell_metrics(&self, index: usize) -> Option<CellMetrics> {
        self.get(index).copied()
    }
}

/// Pixels of `[viewport_start, viewport_end]` not covered by any mounted row
/// in `window`, clamped to the viewport length.
pub(crate) fn blank_pixels<M: ListMetrics + ?Sized>(
    list: &M,
    window: RenderWindow,
    viewport_start: f64,
    viewport_end: f64,
) -> f64 {
    let visible = viewport_end - viewport_start;
    let mut covered = 0.0;
    for index in window.first..=window.last {
        let Some(cell) = list.cell_metrics(index) else {
            continue;
        };
        if !cell.is_mounted {
            continue;
        }
        let start = cell.offset.max(viewport_start);
        let end = (cell.offset + cell.length).min(viewport_end);
        covered += (end - start).max(0.0);
    }
    (visible - covered).clamp(0.0, visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted(offset: f64, length: f64) -> CellMetrics {
        CellMetrics {
            offset,
            length,
            is_mounted: true,
        }
    }

    #[test]
    fn test_fully_covered_viewport_has_no_blank() {
        let rows = vec![mounted(0.0, 50.0), mounted(50.0, 50.0)];
        let blank = blank_pixels(&rows, RenderWindow::new(0, 1), 0.0, 100.0);
        assert_eq!(blank, 0.0);
    }

    #[test]
    fn test_uncovered_tail_is_blank() {
        let rows = vec![mounted(0.0, 50.0), mounted(50.0, 50.0)];
        let blank = blank_pixels(&rows, RenderWindow::new(0, 0), 0.0, 100.0);
        assert_eq!(blank, 50.0);
    }

    #[test]
    fn test_rows_clipped_to_viewport() {
        let rows = vec![mounted(0.0, 50.0), mounted(50.0, 50.0)];
        let blank = blank_pixels(&rows, RenderWindow::new(0, 1), 25.0, 125.0);
        assert_eq!(blank, 25.0);
    }

    #[test]
    fn test_viewport_past_all_rows_is_fully_blank() {
        let rows = vec![mounted(0.0, 50.0), mounted(50.0, 50.0)];
        let blank = blank_pixels(&rows, RenderWindow::new(0, 1), 100.0, 200.0);
        assert_eq!(blank, 100.0);
    }

    #[test]
    fn test_unmounted_rows_cover_nothing() {
        let rows = vec![
            CellMetrics {
                offset: 0.0,
                length: 60.0,
                is_mounted: false,
            },
            mounted(60.0, 40.0),
        ];
        let blank = blank_pixels(&rows, RenderWindow::new(0, 1), 0.0, 100.0);
        assert_eq!(blank, 60.0);
    }

    #[test]
    fn test_unmeasured_rows_cover_nothing() {
        struct Sparse;
        impl ListMetrics for Sparse {
            fn len(&self) -> usize {
                2
            }
            fn cell_metrics(&self, index: usize) -> Option<CellMetrics> {
                (index == 1).then_some(CellMetrics {
                    offset: 50.0,
                    length: 50.0,
                    is_mounted: true,
                })
            }
        }
        let blank = blank_pixels(&Sparse, RenderWindow::new(0, 1), 0.0, 100.0);
        assert_eq!(blank, 50.0);
    }

    #[test]
    fn test_overlapping_rows_clamp_to_zero() {
        let rows = vec![mounted(0.0, 100.0), mounted(0.0, 100.0)];
        let blank = blank_pixels(&rows, RenderWindow::new(0, 1), 0.0, 100.0);
        assert_eq!(blank, 0.0);
    }
}
