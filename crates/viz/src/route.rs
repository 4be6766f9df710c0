//! Chart selection per sheet.

use crate::classify::{Classification, ColumnRole};
use serde::{Deserialize, Serialize};
use sheetviz_sheet::CleanedTable;
use std::fmt;

/// Kind of chart rendered for a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    BarChart,
    LineChart,
}

impl ChartKind {
    /// Slug used in artifact file names.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::BarChart => "bar_chart",
            Self::LineChart => "line_chart",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Chart-specific rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartParams {
    Histogram { bins: usize },
    LineChart { markers: bool },
    BarChart { top_n: usize, rotate_labels: bool },
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub sheet: String,
    pub column: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub params: ChartParams,
}

impl RenderRequest {
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self.params {
            ChartParams::Histogram { .. } => ChartKind::Histogram,
            ChartParams::LineChart { .. } => ChartKind::LineChart,
            ChartParams::BarChart { .. } => ChartKind::BarChart,
        }
    }
}

/// Which chart a role feeds, in emission order.
const ROUTES: &[(ColumnRole, ChartKind)] = &[
    (ColumnRole::Quantity, ChartKind::Histogram),
    (ColumnRole::MonetaryAmount, ChartKind::LineChart),
    (ColumnRole::ProductIdentifier, ChartKind::BarChart),
];

/// Picks charts for a classified sheet.
#[derive(Debug, Clone, Copy)]
pub struct ChartRouter {
    histogram_bins: usize,
    bar_top_n: usize,
}

impl Default for ChartRouter {
    fn default() -> Self {
        Self::new(15, 10)
    }
}

impl ChartRouter {
    #[must_use]
    pub fn new(histogram_bins: usize, bar_top_n: usize) -> Self {
        Self {
            histogram_bins,
            bar_top_n,
        }
    }

    /// One request per non-empty role bucket, fed by that bucket's first column.
    #[must_use]
    pub fn route(
        &self,
        sheet: &str,
        table: &CleanedTable,
        classification: &Classification,
    ) -> Vec<RenderRequest> {
        let mut requests = Vec::new();
        for &(role, kind) in ROUTES {
            let Some(column) = classification.first(role) else {
                continue;
            };
            if table.column_index(column).is_none() {
                tracing::warn!(sheet, column, "classified column missing from table");
                continue;
            }
            requests.push(self.request(sheet, column, kind));
        }
        requests
    }

    fn request(&self, sheet: &str, column: &str, kind: ChartKind) -> RenderRequest {
        let (title, x_label, y_label, params) = match kind {
            ChartKind::Histogram => (
                format!("Số lượng - {sheet}"),
                column.to_string(),
                "Tần suất".to_string(),
                ChartParams::Histogram {
                    bins: self.histogram_bins,
                },
            ),
            ChartKind::LineChart => (
                format!("Tổng tiền - {sheet}"),
                "Index".to_string(),
                column.to_string(),
                ChartParams::LineChart { markers: true },
            ),
            ChartKind::BarChart => (
                format!("Sản phẩm bán chạy nhất - {sheet}"),
                "Sản phẩm".to_string(),
                "Số lượng bán".to_string(),
                ChartParams::BarChart {
                    top_n: self.bar_top_n,
                    rotate_labels: true,
                },
            ),
        };
        RenderRequest {
            sheet: sheet.to_string(),
            column: column.to_string(),
            title,
            x_label,
            y_label,
            params,
        }
    }
}
