use super::canvas::{Canvas, GREEN};
use super::frame::{
    draw_frame, draw_x_tick, format_tick, nice_ticks, padded, Decorations, Frame, Margins,
};
use crate::route::RenderRequest;

const MARKER_RADIUS: f64 = 4.0;

/// Plot `(row index, value)` points in row order.
pub(crate) fn draw(canvas: &mut Canvas, request: &RenderRequest, points: &[(usize, f64)], markers: bool) {
    let (Some(&(first_x, _)), Some(&(last_x, _))) = (points.first(), points.last()) else {
        return;
    };
    let lo = points.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|&(_, v)| v).fold(f64::NEG_INFINITY, f64::max);
    let x_range = padded((first_x as f64, last_x as f64), 0.03);
    let frame = Frame::new(canvas, Margins::STANDARD, x_range, padded((lo, hi), 0.05));

    for tick in nice_ticks(frame.x_range(), 8)
        .into_iter()
        .filter(|t| t.fract() == 0.0)
    {
        draw_x_tick(canvas, &frame, frame.x(tick), &format_tick(tick));
    }
    let y_ticks = nice_ticks(frame.y_range(), 6);
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

    let mapped: Vec<(f64, f64)> = points
        .iter()
        .map(|&(x, y)| (frame.x(x as f64), frame.y(y)))
        .collect();
    for pair in mapped.windows(2) {
        canvas.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, GREEN, 2);
    }
    if markers {
        for &(x, y) in &mapped {
            canvas.disc(x, y, MARKER_RADIUS, GREEN);
        }
    }
}
