mod common;

use brokerage_report::application::pipeline::aggregator::aggregate;
use brokerage_report::application::pipeline::dispatcher::{DispatchItem, Dispatcher};
use brokerage_report::application::pipeline::{LoggingProgressSink, QuoteClient, ReportPipeline, RunLayout};
use brokerage_report::domain::trading::record::{CellValue, TradeRecord};
use brokerage_report::infrastructure::mock::MockQuoteService;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn shuffled_items(n: i64) -> Vec<DispatchItem> {
    // Interleave odd and even SL_N0 so queue order is not sorted either.
    let mut order: Vec<i64> = (1..=n).filter(|s| s % 2 == 1).collect();
    order.extend((1..=n).filter(|s| s % 2 == 0).rev());
    order
        .into_iter()
        .enumerate()
        .map(|(row, sl_no)| DispatchItem {
            row,
            record: TradeRecord {
                sl_no,
                symbol: "NIFTY".into(),
                lot_size: 25,
                no_of_lots: 4,
                total_lot_size: 100,
                buy_value: dec!(200) + Decimal::from(sl_no),
                sell_value: dec!(210),
            },
        })
        .collect()
}

#[tokio::test]
async fn test_summary_order_is_sequence_order_under_random_latency() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();

    for _ in 0..3 {
        let mock = MockQuoteService::new().with_latency_jitter(0, 20);
        let dispatcher = Dispatcher::new(QuoteClient::new(Arc::new(mock)), 5);

        let outcomes = dispatcher.dispatch(shuffled_items(40), &LoggingProgressSink).await;
        assert_eq!(outcomes.len(), 40);

        let aggregate = aggregate(outcomes);
        let order: Vec<i64> = aggregate.rows.iter().map(|r| r.sl_no).collect();
        assert_eq!(order, (1..=40).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_failed_rows_leave_gaps_without_duplicates() {
    let mock = MockQuoteService::new()
        .with_latency_jitter(0, 10)
        .fail_when(|req| req.buy_value == dec!(207) || req.buy_value == dec!(215));
    let dispatcher = Dispatcher::new(QuoteClient::new(Arc::new(mock)), 5);

    let aggregate = aggregate(dispatcher.dispatch(shuffled_items(20), &LoggingProgressSink).await);

    let order: Vec<i64> = aggregate.rows.iter().map(|r| r.sl_no).collect();
    let expected: Vec<i64> = (1..=20).filter(|s| *s != 7 && *s != 15).collect();
    assert_eq!(order, expected);

    let failed: Vec<Option<i64>> = aggregate.failures.iter().map(|f| f.sl_no).collect();
    assert_eq!(failed.len(), 2);
    assert!(failed.contains(&Some(7)) && failed.contains(&Some(15)));
}

#[tokio::test]
async fn test_pipeline_sorts_reversed_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_reversed_csv(dir.path(), "reversed.csv", 15);

    let mock = MockQuoteService::new().with_latency_jitter(0, 15);
    let pipeline = ReportPipeline::new(QuoteClient::new(Arc::new(mock)), 5, RunLayout::under(dir.path()));
    let report = pipeline.run(&input, &LoggingProgressSink).await.unwrap();

    let order: Vec<i64> = report.rows.iter().map(|r| r.sl_no).collect();
    assert_eq!(order, (1..=15).collect::<Vec<_>>());
    assert_eq!(report.rows[0].get("SL_N0"), Some(&CellValue::Integer(1)));
}
