use super::canvas::{Canvas, BLACK, SKY_BLUE};
use super::frame::{draw_frame, draw_x_tick, format_tick, nice_ticks, Decorations, Frame, Margins};
use crate::route::RenderRequest;
use serde::Serialize;

/// One histogram bar: the half-open interval `[start, end)`, closed for the last bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]` of `values`.
///
/// When every value is the same the bins span one unit centred on it.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &value in values {
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

pub(crate) fn draw(canvas: &mut Canvas, request: &RenderRequest, bins: &[HistogramBin]) {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return;
    };
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let y_range = (0.0, max_count as f64 * 1.05);
    let frame = Frame::new(canvas, Margins::STANDARD, (first.start, last.end), y_range);

    let mut y_ticks = nice_ticks(y_range, 6);
    y_ticks.retain(|t| t.fract() == 0.0);
    for tick in nice_ticks(frame.x_range(), 8) {
        draw_x_tick(canvas, &frame, frame.x(tick), &format_tick(tick));
    }
    draw_frame(
        canvas,
        &frame,
        &y_ticks,
        &Decorations {
            title: &request.title,
            x_label: &request.x_label,
            y_label: &request.y_label,
        },
    );

    for bin in bins.iter().filter(|b| b.count > 0) {
        let (x0, x1) = (frame.x(bin.start), frame.x(bin.end));
        let (y0, y1) = (frame.y(0.0), frame.y(bin.count as f64));
        canvas.fill_rect(x0, y0, x1, y1, SKY_BLUE);
        canvas.stroke_rect(x0, y0, x1, y1, BLACK);
    }
}
