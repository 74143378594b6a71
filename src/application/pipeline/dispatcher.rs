//! Bounded worker pool that quotes every record.
//!
//! The coordinating task feeds records into a shared queue, `workers` tasks
//! pull from it and send back one [`Outcome`] each. Progress is published by
//! the coordinator as outcomes arrive, so the sink never sees a worker thread.

use crate::application::pipeline::progress::percent_complete;
use crate::application::pipeline::quote_client::QuoteClient;
use crate::domain::errors::RecordError;
use crate::domain::ports::{ProgressEvent, ProgressSink, QuoteRequest};
use crate::domain::trading::outcome::Outcome;
use crate::domain::trading::record::TradeRecord;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{error, info, warn};

/// Concurrent quote sessions allowed against the fee calculator.
pub const DEFAULT_WORKERS: usize = 5;

/// A record queued for quoting, tagged with its input row.
#[derive(Debug, Clone)]
pub struct DispatchItem {
    pub row: usize,
    pub record: TradeRecord,
}

pub struct Dispatcher {
    client: QuoteClient,
    workers: usize,
}

impl Dispatcher {
    pub fn new(client: QuoteClient, workers: usize) -> Self {
        Self {
            client,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Quote every item and return one outcome per item, in arrival order.
    ///
    /// Runs to completion; a failing or panicking record only produces a
    /// [`Outcome::Failure`] for itself.
    pub async fn dispatch(&self, items: Vec<DispatchItem>, sink: &dyn ProgressSink) -> Vec<Outcome> {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }

        let pool_size = self.workers.min(total);
        info!(
            "Dispatcher: quoting {} records with {} workers via {}",
            total,
            pool_size,
            self.client.service_name()
        );

        let (job_tx, job_rx) = mpsc::channel::<DispatchItem>(total);
        for item in items {
            // Capacity equals the item count, so this never waits.
            if job_tx.send(item).await.is_err() {
                break;
            }
        }
        drop(job_tx);

        let job_rx = Arc::new(Mutex::new(job_rx));
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<Outcome>(pool_size);

        let mut handles = Vec::with_capacity(pool_size);
        for worker_id in 0..pool_size {
            let job_rx = job_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let client = self.client.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let next = { job_rx.lock().await.recv().await };
                    let Some(item) = next else { break };
                    let outcome = process_item(&client, worker_id, item).await;
                    if outcome_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            }));
        }
        drop(outcome_tx);

        let mut outcomes = Vec::with_capacity(total);
        let mut failed = 0;
        while let Some(outcome) = outcome_rx.recv().await {
            if !outcome.is_success() {
                failed += 1;
            }
            outcomes.push(outcome);
            let completed = outcomes.len();
            sink.publish(ProgressEvent::Advanced {
                completed,
                total,
                percent: percent_complete(completed, total),
            });
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Dispatcher: worker task ended abnormally: {}", e);
            }
        }

        if outcomes.len() < total {
            error!(
                "Dispatcher: {} of {} records produced no outcome",
                total - outcomes.len(),
                total
            );
        }

        sink.publish(ProgressEvent::Finished {
            total,
            succeeded: outcomes.len() - failed,
            failed,
        });
        outcomes
    }
}

async fn process_item(client: &QuoteClient, worker_id: usize, item: DispatchItem) -> Outcome {
    let DispatchItem { row, record } = item;
    let sl_no = record.sl_no;

    let request = QuoteRequest::from(&record);

    let attempt = AssertUnwindSafe(client.quote(&request)).catch_unwind().await;

    let error = match attempt {
        Ok(Ok(breakdown)) => {
            return Outcome::Success {
                row,
                record,
                breakdown,
            };
        }
        Ok(Err(e)) => RecordError::from(e),
        Err(payload) => RecordError::WorkerPanic {
            reason: panic_message(payload.as_ref()),
        },
    };

    warn!(
        "Worker {}: SL_N0 {} ({}) failed: {}",
        worker_id, sl_no, record.symbol, error
    );
    Outcome::Failure {
        row,
        sl_no: Some(sl_no),
        error: error.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
