//! End-to-end run: clean, classify, route, render.

use crate::artifact::{ArtifactStore, ChartArtifact};
use crate::classify::{classify, Classification};
use crate::coerce::ColumnCoercionWarning;
use crate::config::PipelineConfig;
use crate::error::VizResult;
use crate::notify::{ArtifactObserver, NoopObserver};
use crate::render::{ChartRenderer, ChartSummary};
use crate::route::{ChartKind, ChartRouter};
use serde::Serialize;
use sheetviz_sheet::{CleanedTable, Workbook, WorkbookProcessor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A chart that could not be produced. Other charts are unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct ChartFailure {
    pub kind: ChartKind,
    pub column: String,
    pub error: String,
}

/// A produced chart and what it shows.
#[derive(Debug, Clone, Serialize)]
pub struct ChartReport {
    pub artifact: ChartArtifact,
    pub summary: ChartSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub classification: Classification,
    pub charts: Vec<ChartReport>,
    pub warnings: Vec<ColumnCoercionWarning>,
    pub failures: Vec<ChartFailure>,
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub cleaned_path: Option<PathBuf>,
    pub sheets: Vec<SheetReport>,
}

impl RunReport {
    pub fn artifacts(&self) -> impl Iterator<Item = &ChartArtifact> {
        self.sheets
            .iter()
            .flat_map(|s| s.charts.iter().map(|c| &c.artifact))
    }

    #[must_use]
    pub fn chart_count(&self) -> usize {
        self.sheets.iter().map(|s| s.charts.len()).sum()
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    processor: WorkbookProcessor,
    router: ChartRouter,
    renderer: ChartRenderer,
    store: ArtifactStore,
    observer: Arc<dyn ArtifactObserver>,
}

impl Pipeline {
    /// Validate `config` and create its directories.
    pub fn new(config: PipelineConfig) -> VizResult<Self> {
        config.validate()?;
        config.ensure_dirs()?;
        Ok(Self {
            processor: WorkbookProcessor::new(config.cleaned_dir()),
            router: ChartRouter::new(config.histogram_bins, config.bar_top_n),
            renderer: ChartRenderer::new(config.image_width, config.image_height),
            store: ArtifactStore::new(&config.result_dir),
            observer: Arc::new(NoopObserver),
            config,
        })
    }

    /// Notify `observer` of every chart written by this pipeline.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ArtifactObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Process one spreadsheet file.
    ///
    /// Unreadable input fails the whole run. Problems with individual charts
    /// are recorded in the report instead.
    pub fn run(&self, input: &Path) -> VizResult<RunReport> {
        tracing::info!(input = %input.display(), "pipeline run started");
        let (book, cleaned_path) = if self.config.write_cleaned {
            let (book, path) = self.processor.process_file(input)?;
            (book, Some(path))
        } else {
            (self.processor.process_all(input)?, None)
        };

        let report = RunReport {
            input: input.to_path_buf(),
            cleaned_path,
            sheets: self.visualize(&book),
        };
        tracing::info!(
            input = %input.display(),
            sheets = report.sheets.len(),
            charts = report.chart_count(),
            "pipeline run finished"
        );
        Ok(report)
    }

    /// Chart every sheet of an already cleaned workbook.
    pub fn visualize(&self, book: &Workbook) -> Vec<SheetReport> {
        book.sheets()
            .map(|(name, table)| self.visualize_sheet(name, table))
            .collect()
    }

    pub fn visualize_sheet(&self, name: &str, table: &CleanedTable) -> SheetReport {
        let classification = classify(table);
        let requests = self.router.route(name, table, &classification);
        tracing::debug!(sheet = name, charts = requests.len(), "sheet routed");

        let mut report = SheetReport {
            name: name.to_string(),
            rows: table.row_count(),
            columns: table.col_count(),
            classification,
            charts: Vec::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
        };

        for request in &requests {
            match self
                .renderer
                .render_and_save(request, table, &self.store, self.observer.as_ref())
            {
                Ok(saved) => {
                    report.warnings.extend(saved.warning);
                    report.charts.push(ChartReport {
                        artifact: saved.artifact,
                        summary: saved.summary,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        sheet = name,
                        chart = %request.kind(),
                        column = %request.column,
                        error = %e,
                        "chart skipped"
                    );
                    report.failures.push(ChartFailure {
                        kind: request.kind(),
                        column: request.column.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        report
    }
}
