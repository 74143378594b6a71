mod common;

use brokerage_report::application::pipeline::{LoggingProgressSink, QuoteClient, ReportPipeline, RunLayout};
use brokerage_report::domain::trading::outcome::SUMMARY_COLUMNS;
use brokerage_report::infrastructure::mock::MockQuoteService;
use brokerage_report::infrastructure::quote::ScheduleQuoteService;
use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use std::path::Path;
use std::sync::Arc;

fn mock_pipeline(base: &Path) -> ReportPipeline {
    ReportPipeline::new(
        QuoteClient::new(Arc::new(MockQuoteService::new())),
        5,
        RunLayout::under(base),
    )
}

fn read_sheet(path: &Path, name: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.worksheet_range(name).unwrap()
}

fn cell<'a>(range: &'a Range<Data>, row: usize, column: &str) -> &'a Data {
    let col = SUMMARY_COLUMNS.iter().position(|c| *c == column).unwrap();
    range.get((row, col)).unwrap()
}

#[tokio::test]
async fn test_nifty_leg_end_to_end() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();

    let dir = tempfile::tempdir()?;
    let input = common::write_csv(
        dir.path(),
        "NIFTY_parameter_Input.csv",
        &[(1, "NIFTY", 50, 2, 100, "100.0", "105.0")],
    );

    let report = mock_pipeline(dir.path()).run(&input, &LoggingProgressSink).await?;

    // Archive is a byte-identical timestamped copy.
    let archived_name = report.archive_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(archived_name.starts_with("NIFTY_parameter_Input_"));
    assert!(archived_name.ends_with(".csv"));
    assert_eq!(std::fs::read(&report.archive_path)?, std::fs::read(&input)?);

    // Parameter extract carries the seven input columns.
    let params = read_sheet(&report.parameter_path, "Parameters");
    assert_eq!(params.get_size(), (2, 7));
    assert_eq!(params.get((1, 1)), Some(&Data::String("NIFTY".to_string())));

    // Summary report.
    let summary_name = report.summary_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(summary_name.starts_with("NIFTYSUMMARY_REPORT"));
    assert!(summary_name.ends_with("_intra_equity.xlsx"));

    let summary = read_sheet(&report.summary_path, "Summary");
    assert_eq!(summary.get_size(), (2, SUMMARY_COLUMNS.len()));
    for (i, header) in SUMMARY_COLUMNS.iter().enumerate() {
        assert_eq!(summary.get((0, i)), Some(&Data::String(header.to_string())));
    }
    assert_eq!(cell(&summary, 1, "SL_N0"), &Data::Float(1.0));
    assert_eq!(cell(&summary, 1, "SYMBOLS"), &Data::String("NIFTY".to_string()));
    assert_eq!(cell(&summary, 1, "PREMUIM_VALUE"), &Data::Float(205.0));
    assert_eq!(cell(&summary, 1, "TOTAL_PREMIUM_VALUE"), &Data::Float(20500.0));
    assert_eq!(cell(&summary, 1, "TOTAL TAX AND CHARGES"), &Data::String("₹50.00".to_string()));
    assert_eq!(cell(&summary, 1, "BROKERAGE %"), &Data::String("0.244%".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_report_is_idempotent_with_deterministic_service() {
    let input_dir = tempfile::tempdir().unwrap();
    let input = common::write_csv(
        input_dir.path(),
        "trades.csv",
        &[
            (3, "NIFTY", 50, 1, 50, "98.75", "101.20"),
            (1, "NIFTY", 50, 2, 100, "100.0", "105.0"),
            (2, "NIFTY", 75, 2, 150, "1250.00", "1260"),
        ],
    );

    let mut summaries = Vec::new();
    for _ in 0..2 {
        let out = tempfile::tempdir().unwrap();
        let pipeline = ReportPipeline::new(
            QuoteClient::new(Arc::new(ScheduleQuoteService::default())),
            5,
            RunLayout::under(out.path()),
        );
        let report = pipeline.run(&input, &LoggingProgressSink).await.unwrap();
        summaries.push(read_sheet(&report.summary_path, "Summary"));
    }

    let cells = |r: &Range<Data>| r.rows().map(|row| row.to_vec()).collect::<Vec<_>>();
    assert_eq!(cells(&summaries[0]), cells(&summaries[1]));
}

#[tokio::test]
async fn test_schedule_service_figures_in_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_csv(dir.path(), "trades.csv", &[(1, "NIFTY", 50, 2, 100, "100", "105")]);
    let pipeline = ReportPipeline::new(
        QuoteClient::new(Arc::new(ScheduleQuoteService::default())),
        5,
        RunLayout::under(dir.path()),
    );

    let report = pipeline.run(&input, &LoggingProgressSink).await.unwrap();
    let summary = read_sheet(&report.summary_path, "Summary");

    assert_eq!(cell(&summary, 1, "BROKERAGE"), &Data::String("₹6.15".to_string()));
    assert_eq!(cell(&summary, 1, "TOTAL TAX AND CHARGES"), &Data::String("₹11.07".to_string()));
    assert_eq!(cell(&summary, 1, "BROKERAGE %"), &Data::String("0.054%".to_string()));
}

#[tokio::test]
async fn test_xlsx_input_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("trades.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in brokerage_report::domain::trading::record::REQUIRED_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    sheet.write_number(1, 0, 1.0).unwrap();
    sheet.write_string(1, 1, "BANKNIFTY").unwrap();
    sheet.write_number(1, 2, 15.0).unwrap();
    sheet.write_number(1, 3, 2.0).unwrap();
    sheet.write_number(1, 4, 30.0).unwrap();
    sheet.write_number(1, 5, 250.5).unwrap();
    sheet.write_number(1, 6, 260.0).unwrap();
    workbook.save(&input).unwrap();

    let report = mock_pipeline(dir.path()).run(&input, &LoggingProgressSink).await.unwrap();

    assert_eq!(report.symbol, "BANKNIFTY");
    assert_eq!(report.succeeded(), 1);
    assert!(dir.path().join("BANKNIFTY_parameter.xlsx").is_file());
}
