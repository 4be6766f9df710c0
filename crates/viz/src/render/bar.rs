use super::canvas::{Align, Canvas, TextStyle, BLACK, SKY_BLUE};
use super::frame::{draw_frame, nice_ticks, Decorations, Frame, Margins};
use crate::route::RenderRequest;
use indexmap::IndexMap;
use serde::Serialize;
use sheetviz_sheet::CellValue;
use std::f64::consts::FRAC_PI_4;

const MAX_LABEL_CHARS: usize = 18;

/// How often a category value occurs in a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// The `n` most frequent non-empty values, most frequent first.
///
/// Ties keep the order in which values were first seen.
#[must_use]
pub fn top_categories<'a, I>(cells: I, n: usize) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for cell in cells.into_iter().filter(|c| !c.is_empty()) {
        *counts.entry(cell.as_str()).or_insert(0) += 1;
    }
    let mut categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    // stable: equal counts stay in first-seen order
    categories.sort_by(|a, b| b.count.cmp(&a.count));
    categories.truncate(n);
    categories
}

fn shorten(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 2).collect();
        format!("{head}..")
    }
}

pub(crate) fn draw(canvas: &mut Canvas, request: &RenderRequest, categories: &[CategoryCount], rotate_labels: bool) {
    if categories.is_empty() {
        return;
    }
    let max_count = categories.iter().map(|c| c.count).max().unwrap_or(1);
    let y_range = (0.0, max_count as f64 * 1.05);
    let margins = if rotate_labels {
        Margins::ROTATED_LABELS
    } else {
        Margins::STANDARD
    };
    let slots = categories.len() as f64;
    let frame = Frame::new(canvas, margins, (0.0, slots), y_range);

    let mut y_ticks = nice_ticks(y_range, 6);
    y_ticks.retain(|t| t.fract() == 0.0);
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

    for (index, category) in categories.iter().enumerate() {
        let center = index as f64 + 0.5;
        let (x0, x1) = (frame.x(center - 0.4), frame.x(center + 0.4));
        let (y0, y1) = (frame.y(0.0), frame.y(category.count as f64));
        canvas.fill_rect(x0, y0, x1, y1, SKY_BLUE);
        canvas.stroke_rect(x0, y0, x1, y1, BLACK);

        let x = frame.x(center);
        canvas.line(x, frame.bottom, x, frame.bottom + 5.0, BLACK, 1);
        let label = shorten(&category.label);
        if rotate_labels {
            // reads upward to the right, ending under the bar
            canvas.text(
                &label,
                x,
                frame.bottom + 16.0,
                TextStyle::new(2, Align::End).rotated(-FRAC_PI_4),
            );
        } else {
            canvas.text(&label, x, frame.bottom + 18.0, TextStyle::new(2, Align::Center));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    #[test]
    fn test_top_n_by_count_with_first_seen_ties() {
        let column = cells(&["b", "a", "c", "a", "b", "d", "a"]);
        let top = top_categories(&column, 3);
        let labels: Vec<&str> = top.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].count, 2);
    }

    #[test]
    fn test_empty_cells_ignored() {
        let column = vec![CellValue::Null, CellValue::from(""), CellValue::from("x")];
        assert_eq!(
            top_categories(&column, 10),
            [CategoryCount {
                label: "x".into(),
                count: 1
            }]
        );
    }

    #[test]
    fn test_shorten_long_labels() {
        assert_eq!(shorten("short"), "short");
        let long = "Bút bi Thiên Long TL-027 xanh";
        let short = shorten(long);
        assert_eq!(short.chars().count(), MAX_LABEL_CHARS);
        assert!(short.ends_with(".."));
    }
}
