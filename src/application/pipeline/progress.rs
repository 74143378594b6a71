use crate::domain::ports::{ProgressEvent, ProgressSink};
use crossbeam_channel::Sender;
use tracing::info;

/// `completed / total * 100`, where `completed` counts arrivals.
pub fn percent_complete(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Writes progress to the log.
#[derive(Debug, Default)]
pub struct LoggingProgressSink;

impl ProgressSink for LoggingProgressSink {
    fn publish(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Advanced {
                completed,
                total,
                percent,
            } => info!("Processing: {:.1}% ({}/{})", percent, completed, total),
            ProgressEvent::Finished {
                total,
                succeeded,
                failed,
            } => info!(
                "Processing complete: {} rows, {} succeeded, {} failed",
                total, succeeded, failed
            ),
        }
    }
}

/// Forwards progress to another thread (a UI or terminal renderer).
///
/// A disconnected receiver is ignored: progress is advisory.
#[derive(Clone)]
pub struct ChannelProgressSink {
    sender: Sender<ProgressEvent>,
}

impl ChannelProgressSink {
    pub fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn publish(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(1, 4), 25.0);
        assert_eq!(percent_complete(4, 4), 100.0);
        assert_eq!(percent_complete(0, 0), 100.0);
    }

    #[test]
    fn test_channel_sink_forwards_events() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = ChannelProgressSink::new(tx);
        sink.publish(ProgressEvent::Advanced {
            completed: 1,
            total: 2,
            percent: 50.0,
        });
        drop(rx);
        // Receiver gone: must not panic.
        sink.publish(ProgressEvent::Finished {
            total: 2,
            succeeded: 2,
            failed: 0,
        });
    }

    #[test]
    fn test_channel_sink_preserves_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = ChannelProgressSink::new(tx);
        for completed in 1..=3 {
            sink.publish(ProgressEvent::Advanced {
                completed,
                total: 3,
                percent: percent_complete(completed, 3),
            });
        }
        let received: Vec<ProgressEvent> = rx.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(received[2], ProgressEvent::Advanced { completed: 3, .. }));
    }
}
