//! Plot area, axis scaling, ticks and chart decorations.

use super::canvas::{Align, Canvas, TextStyle, BLACK, GRID};
use std::f64::consts::FRAC_PI_2;

/// Pixel margins around the plot area.
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub const STANDARD: Margins = Margins {
        left: 100.0,
        right: 40.0,
        top: 70.0,
        bottom: 90.0,
    };

    /// Extra room below the axis for rotated category labels.
    pub const ROTATED_LABELS: Margins = Margins {
        left: 100.0,
        right: 40.0,
        top: 70.0,
        bottom: 170.0,
    };
}

/// Maps data coordinates onto the plot area of a canvas.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Frame {
    pub fn new(canvas: &Canvas, margins: Margins, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            left: margins.left,
            top: margins.top,
            right: f64::from(canvas.width()) - margins.right,
            bottom: f64::from(canvas.height()) - margins.bottom,
            x_range: widen(x_range),
            y_range: widen(y_range),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn x(&self, value: f64) -> f64 {
        let (lo, hi) = self.x_range;
        self.left + (value - lo) / (hi - lo) * self.width()
    }

    #[must_use]
    pub fn y(&self, value: f64) -> f64 {
        let (lo, hi) = self.y_range;
        self.bottom - (value - lo) / (hi - lo) * (self.bottom - self.top)
    }

    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        self.x_range
    }

    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        self.y_range
    }
}

/// A degenerate range becomes one unit wide around its value.
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi - lo > f64::EPSILON * lo.abs().max(1.0) {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Range padded by `fraction` of its span on both ends.
#[must_use]
pub fn padded((lo, hi): (f64, f64), fraction: f64) -> (f64, f64) {
    let pad = (hi - lo) * fraction;
    (lo - pad, hi + pad)
}

fn nice_number(value: f64, round: bool) -> f64 {
    let exponent = value.log10().floor();
    let fraction = value / 10f64.powf(exponent);
    let nice = if round {
        match fraction {
            f if f < 1.5 => 1.0,
            f if f < 3.0 => 2.0,
            f if f < 7.0 => 5.0,
            _ => 10.0,
        }
    } else {
        match fraction {
            f if f <= 1.0 => 1.0,
            f if f <= 2.0 => 2.0,
            f if f <= 5.0 => 5.0,
            _ => 10.0,
        }
    };
    nice * 10f64.powf(exponent)
}

const MAX_TICKS: f64 = 50.0;

/// Round tick positions inside `[lo, hi]`, roughly `target` of them.
///
/// Falls back to the two end points when the step is too small to advance
/// at the magnitude of the range.
#[must_use]
pub fn nice_ticks((lo, hi): (f64, f64), target: usize) -> Vec<f64> {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 || target < 2 {
        return vec![lo];
    }
    let step = nice_number(nice_number(span, false) / (target - 1) as f64, true);
    let first = (lo / step).ceil();
    let last = (hi / step + 1e-9).floor();
    let count = last - first;
    let start = first * step;
    if !count.is_finite() || !(0.0..=MAX_TICKS).contains(&count) || start + step == start {
        return vec![lo, hi];
    }
    // Index-based so values like 0.30000000000000004 stay on the grid.
    (0..=count as usize)
        .map(|i| (first + i as f64) * step)
        .collect()
}

/// Short tick label: thousands and millions abbreviated, at most two decimals.
#[must_use]
pub fn format_tick(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e4 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    let text = format!("{scaled:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    let text = if text == "-0" { "0" } else { text };
    format!("{text}{suffix}")
}

/// Axis labels and title shared by every chart.
pub struct Decorations<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// Grid, axes box, y ticks, title and axis labels. X ticks are drawn by callers.
pub fn draw_frame(canvas: &mut Canvas, frame: &Frame, y_ticks: &[f64], text: &Decorations<'_>) {
    for &tick in y_ticks {
        let y = frame.y(tick);
        canvas.line(frame.left, y, frame.right, y, GRID, 1);
        canvas.line(frame.left - 5.0, y, frame.left, y, BLACK, 1);
        canvas.text(
            &format_tick(tick),
            frame.left - 9.0,
            y,
            TextStyle::new(2, Align::End),
        );
    }
    canvas.stroke_rect(frame.left, frame.top, frame.right, frame.bottom, BLACK);

    let center_x = (frame.left + frame.right) / 2.0;
    canvas.text(text.title, center_x, frame.top / 2.0, TextStyle::new(3, Align::Center));
    canvas.text(
        text.x_label,
        center_x,
        f64::from(canvas.height()) - 22.0,
        TextStyle::new(2, Align::Center),
    );
    canvas.text(
        text.y_label,
        20.0,
        (frame.top + frame.bottom) / 2.0,
        TextStyle::new(2, Align::Center).rotated(-FRAC_PI_2),
    );
}

/// Vertical grid line, tick mark and label for one x position.
pub fn draw_x_tick(canvas: &mut Canvas, frame: &Frame, x: f64, label: &str) {
    canvas.line(x, frame.top, x, frame.bottom, GRID, 1);
    canvas.line(x, frame.bottom, x, frame.bottom + 5.0, BLACK, 1);
    canvas.text(label, x, frame.bottom + 18.0, TextStyle::new(2, Align::Center));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks((0.0, 10.0), 6), [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks((3.0, 5.0), 5), [3.0, 3.5, 4.0, 4.5, 5.0]);
        assert_eq!(nice_ticks((1.0, 1.0), 5), [1.0]);
    }

    #[test]
    fn test_nice_ticks_terminates_at_large_magnitude() {
        // 1.0 is below the float spacing at 1e16
        let range = (1e16 - 0.5, 1e16 + 2.5);
        let ticks = nice_ticks(range, 8);
        assert!(ticks.len() <= 51);
        assert_eq!(ticks, [range.0, range.1]);

        let ticks = nice_ticks((1e15, 1e15 + 10.0), 6);
        assert!(!ticks.is_empty() && ticks.len() <= 51);
        assert!(ticks.iter().all(|t| (1e15..=1e15 + 10.0).contains(t)));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(1500.0), "1500");
        assert_eq!(format_tick(15000.0), "15K");
        assert_eq!(format_tick(2_500_000.0), "2.5M");
        assert_eq!(format_tick(-0.001), "0");
    }

    #[test]
    fn test_frame_mapping() {
        let canvas = Canvas::new(1000, 600);
        let frame = Frame::new(&canvas, Margins::STANDARD, (0.0, 10.0), (0.0, 100.0));
        assert!((frame.x(0.0) - 100.0).abs() < 1e-9);
        assert!((frame.x(10.0) - 960.0).abs() < 1e-9);
        assert!((frame.y(0.0) - 510.0).abs() < 1e-9);
        assert!((frame.y(100.0) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let canvas = Canvas::new(1000, 600);
        let frame = Frame::new(&canvas, Margins::STANDARD, (4.0, 4.0), (0.0, 1.0));
        assert_eq!(frame.x_range(), (3.5, 4.5));
    }
}
