//! One report run, from input file to summary workbook.

use crate::application::pipeline::aggregator::{FailedRow, aggregate};
use crate::application::pipeline::dispatcher::{DispatchItem, Dispatcher};
use crate::application::pipeline::quote_client::QuoteClient;
use crate::config::Config;
use crate::domain::errors::PipelineError;
use crate::domain::ports::ProgressSink;
use crate::domain::trading::outcome::{Outcome, OutputRow};
use crate::infrastructure::spreadsheet::{
    archive_input, read_table, write_parameter_extract, write_summary_report,
};
use crate::infrastructure::spreadsheet::writer::ensure_dir;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where a run's artifacts go.
#[derive(Debug, Clone)]
pub struct RunLayout {
    /// Directory of the parameter extract.
    pub base_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl RunLayout {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            archive_dir: config.archive_dir(),
            output_dir: config.output_dir(),
        }
    }

    /// `base`, `base/INPUT`, `base/OUTPUT`.
    pub fn under(base: &Path) -> Self {
        Self {
            base_dir: base.to_path_buf(),
            archive_dir: base.join("INPUT"),
            output_dir: base.join("OUTPUT"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub symbol: String,
    pub archive_path: PathBuf,
    pub parameter_path: PathBuf,
    pub summary_path: PathBuf,
    pub rows: Vec<OutputRow>,
    pub failures: Vec<FailedRow>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.rows.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

pub struct ReportPipeline {
    dispatcher: Dispatcher,
    layout: RunLayout,
}

impl ReportPipeline {
    pub fn new(client: QuoteClient, workers: usize, layout: RunLayout) -> Self {
        Self {
            dispatcher: Dispatcher::new(client, workers),
            layout,
        }
    }

    /// Run the whole report for `input`.
    ///
    /// Input errors are detected before anything is written. Record errors
    /// only drop their row from the summary.
    pub async fn run(&self, input: &Path, sink: &dyn ProgressSink) -> Result<RunReport, PipelineError> {
        let table = read_table(input)?;
        table.validate()?;
        let symbol = table.report_symbol();
        let parsed = table.parse_records()?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        info!(
            "Pipeline: {} rows for {} from {}",
            table.len(),
            symbol,
            input.display()
        );

        let archive_path = archive_input(input, &self.layout.archive_dir, &stamp)?;
        ensure_dir(&self.layout.base_dir)?;
        let parameter_path =
            write_parameter_extract(&self.layout.base_dir, &symbol, &table.parameter_rows())?;

        let mut items = Vec::with_capacity(parsed.len());
        let mut outcomes = Vec::new();
        for (row, record) in parsed {
            match record {
                Ok(record) => {
                    if let Some(expected) = record.lot_size_mismatch() {
                        warn!(
                            "Pipeline: SL_N0 {} has TOTAL_LOT_SIZE {} but LOT_SIZE x NO_OF_LOTS = {}; using {}",
                            record.sl_no, record.total_lot_size, expected, record.total_lot_size
                        );
                    }
                    items.push(DispatchItem { row, record });
                }
                Err(e) => outcomes.push(Outcome::Failure {
                    row,
                    sl_no: table.sl_no_hint(row),
                    error: e.to_string(),
                }),
            }
        }

        outcomes.extend(self.dispatcher.dispatch(items, sink).await);
        let aggregate = aggregate(outcomes);

        let summary_path =
            write_summary_report(&self.layout.output_dir, &symbol, &stamp, &aggregate.rows)?;
        info!(
            "Pipeline: {} rows written, {} excluded",
            aggregate.rows.len(),
            aggregate.failures.len()
        );

        Ok(RunReport {
            symbol,
            archive_path,
            parameter_path,
            summary_path,
            rows: aggregate.rows,
            failures: aggregate.failures,
        })
    }
}
