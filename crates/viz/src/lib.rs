//! # sheetviz-viz
//!
//! Turns cleaned sheets into chart images.
//!
//! Columns are classified by keywords in their names, each role is routed to
//! a chart kind, and charts are rendered to PNG files in a result directory:
//!
//! | Role                | Chart                          |
//! |---------------------|--------------------------------|
//! | `Quantity`          | histogram, 15 bins             |
//! | `MonetaryAmount`    | line chart by row index        |
//! | `ProductIdentifier` | bar chart of the 10 most common |
//!
//! ```no_run
//! use sheetviz_viz::{Pipeline, PipelineConfig};
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let report = pipeline.run(Path::new("uploads/sales.xlsx"))?;
//! for artifact in report.artifacts() {
//!     println!("{}", artifact.file_name);
//! }
//! # Ok::<(), sheetviz_viz::VizError>(())
//! ```

pub mod artifact;
pub mod classify;
pub mod coerce;
pub mod config;
pub mod error;
pub mod notify;
pub mod pipeline;
pub mod render;
pub mod route;
pub mod watch;

pub use artifact::{
    artifact_file_name, safe_filename, safe_upload_name, ArtifactStore, ChartArtifact, KeyedLocks,
};
pub use classify::{classify, classify_columns, Classification, ColumnRole};
pub use coerce::{coerce_numeric, ColumnCoercionWarning, NumericColumn};
pub use config::PipelineConfig;
pub use error::{VizError, VizResult};
pub use notify::{ArtifactEvent, ArtifactObserver, BroadcastObserver, NoopObserver};
pub use pipeline::{ChartFailure, ChartReport, Pipeline, RunReport, SheetReport};
pub use render::{ChartRenderer, ChartSummary, RenderedChart, SavedChart};
pub use route::{ChartKind, ChartParams, ChartRouter, RenderRequest};
pub use watch::DirectoryWatcher;
