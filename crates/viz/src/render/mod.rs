//! Chart rasterisation.
//!
//! Each [`RenderRequest`] becomes one PNG image. Drawing is done directly on
//! an RGB buffer with a built-in bitmap font, so output does not depend on
//! fonts installed on the host.

mod bar;
mod canvas;
mod font;
mod frame;
mod histogram;
mod line;

pub use bar::{top_categories, CategoryCount};
pub use canvas::encode_png;
pub use histogram::{histogram, HistogramBin};

use crate::artifact::{artifact_file_name, ArtifactStore, ChartArtifact};
use crate::coerce::{coerce_numeric, ColumnCoercionWarning};
use crate::error::{VizError, VizResult};
use crate::notify::{ArtifactEvent, ArtifactObserver};
use crate::route::{ChartParams, RenderRequest};
use canvas::Canvas;
use image::RgbImage;
use serde::Serialize;
use sheetviz_sheet::CleanedTable;

/// What a chart shows, without the pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSummary {
    Histogram { values: usize, bins: Vec<HistogramBin> },
    LineChart { points: usize },
    BarChart { categories: Vec<CategoryCount> },
}

/// A rendered chart held in memory.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub image: RgbImage,
    pub summary: ChartSummary,
    pub warning: Option<ColumnCoercionWarning>,
}

/// A rendered chart after it has been written to the artifact store.
#[derive(Debug, Clone, Serialize)]
pub struct SavedChart {
    pub artifact: ChartArtifact,
    pub summary: ChartSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ColumnCoercionWarning>,
}

#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(1000, 600)
    }
}

impl ChartRenderer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Draw the chart described by `request` from the rows of `table`.
    pub fn render(&self, request: &RenderRequest, table: &CleanedTable) -> VizResult<RenderedChart> {
        let cells = table.column_by_name(&request.column)?;
        let mut canvas = Canvas::new(self.width, self.height);

        let (summary, warning) = match request.params {
            ChartParams::Histogram { bins } => {
                let numeric = coerce_numeric(cells.iter().copied());
                let warning = coercion_warning(request, numeric.dropped);
                if numeric.is_empty() {
                    return Err(VizError::NoNumericData {
                        column: request.column.clone(),
                    });
                }
                let values = numeric.values();
                let bins = histogram(&values, bins);
                histogram::draw(&mut canvas, request, &bins);
                (
                    ChartSummary::Histogram {
                        values: values.len(),
                        bins,
                    },
                    warning,
                )
            }
            ChartParams::LineChart { markers } => {
                let numeric = coerce_numeric(cells.iter().copied());
                let warning = coercion_warning(request, numeric.dropped);
                if numeric.is_empty() {
                    return Err(VizError::NoNumericData {
                        column: request.column.clone(),
                    });
                }
                line::draw(&mut canvas, request, &numeric.points, markers);
                (
                    ChartSummary::LineChart {
                        points: numeric.points.len(),
                    },
                    warning,
                )
            }
            ChartParams::BarChart {
                top_n,
                rotate_labels,
            } => {
                let categories = top_categories(cells.iter().copied(), top_n);
                bar::draw(&mut canvas, request, &categories, rotate_labels);
                (ChartSummary::BarChart { categories }, None)
            }
        };

        Ok(RenderedChart {
            image: canvas.into_image(),
            summary,
            warning,
        })
    }

    /// Render, write to `store` and then tell `observer`.
    ///
    /// The observer is called only after the file is complete on disk.
    pub fn render_and_save(
        &self,
        request: &RenderRequest,
        table: &CleanedTable,
        store: &ArtifactStore,
        observer: &dyn ArtifactObserver,
    ) -> VizResult<SavedChart> {
        let rendered = self.render(request, table)?;
        let bytes = encode_png(&rendered.image)?;
        let file_name = artifact_file_name(&request.sheet, request.kind());
        let path = store.write(&file_name, &bytes)?;
        tracing::info!(sheet = %request.sheet, chart = %request.kind(), file = %file_name, "chart saved");

        observer.artifact_ready(&ArtifactEvent {
            file_name: file_name.clone(),
            path: path.clone(),
        });
        Ok(SavedChart {
            artifact: ChartArtifact {
                sheet: request.sheet.clone(),
                kind: request.kind(),
                file_name,
                path,
            },
            summary: rendered.summary,
            warning: rendered.warning,
        })
    }
}

fn coercion_warning(request: &RenderRequest, dropped: usize) -> Option<ColumnCoercionWarning> {
    if dropped == 0 {
        return None;
    }
    tracing::warn!(
        sheet = %request.sheet,
        column = %request.column,
        dropped,
        "non-numeric cells dropped"
    );
    Some(ColumnCoercionWarning {
        sheet: request.sheet.clone(),
        column: request.column.clone(),
        dropped,
    })
}
