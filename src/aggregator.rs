//! Error aggregation for concurrent resolutions
//!
//! Resolver tasks write through cloned [`ErrorSink`] handles; a single
//! drainer task collects records in arrival order. Failure ids come from a
//! counter owned by the aggregator, so every id handed to a resolver has
//! exactly one record behind it.

use crate::domain::{ErrorRecord, LibrarySpec};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Write handle into the aggregator
#[derive(Clone)]
pub struct ErrorSink {
    next_id: Arc<AtomicU32>,
    tx: mpsc::UnboundedSender<ErrorRecord>,
}

impl ErrorSink {
    /// Allocate a failure id and record the failure, returning the id
    pub fn record(&self, spec: &LibrarySpec, message: impl Into<String>) -> u32 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = ErrorRecord::new(id, spec, message);
        debug!(id, library = %spec.name, "recording failure");

        if self.tx.send(record).is_err() {
            // Only possible if the drainer died, which means it panicked
            error!(id, library = %spec.name, "error drainer is gone, record lost");
        }
        id
    }
}

/// Collects error records from many writers into one ordered list
pub struct ErrorAggregator {
    sink: ErrorSink,
    drainer: JoinHandle<Vec<ErrorRecord>>,
}

impl ErrorAggregator {
    /// Create a new aggregator and start its drainer
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let drainer = tokio::spawn(async move {
            let mut records = Vec::new();
            while let Some(record) = rx.recv().await {
                records.push(record);
            }
            records
        });

        Self {
            sink: ErrorSink {
                next_id: Arc::new(AtomicU32::new(0)),
                tx,
            },
            drainer,
        }
    }

    /// Get a write handle for a resolver task
    pub fn sink(&self) -> ErrorSink {
        self.sink.clone()
    }

    /// Close the aggregator for writing and return every record
    ///
    /// Completes once all outstanding sinks have been dropped, so callers
    /// must have joined every writer first.
    pub async fn close(self) -> Vec<ErrorRecord> {
        let ErrorAggregator { sink, drainer } = self;
        drop(sink);

        match drainer.await {
            Ok(records) => records,
            Err(e) => {
                error!("error drainer failed: {}", e);
                Vec::new()
            }
        }
    }
}

impl Default for ErrorAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_close_without_records() {
        let aggregator = ErrorAggregator::new();
        assert!(aggregator.close().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_assigns_increasing_ids() {
        let aggregator = ErrorAggregator::new();
        let sink = aggregator.sink();
        let spec = LibrarySpec::new("libC", "1.0.0");

        assert_eq!(sink.record(&spec, "first"), 1);
        assert_eq!(sink.record(&spec, "second"), 2);
        drop(sink);

        let records = aggregator.close().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].id, 2);
    }

    #[tokio::test]
    async fn test_concurrent_writers_lose_nothing() {
        let aggregator = ErrorAggregator::new();
        let mut handles = Vec::new();

        for i in 0..50 {
            let sink = aggregator.sink();
            handles.push(tokio::spawn(async move {
                let spec = LibrarySpec::new(format!("lib{}", i), "1.0.0");
                tokio::task::yield_now().await;
                sink.record(&spec, "boom")
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        let records = aggregator.close().await;
        assert_eq!(records.len(), 50);
        assert_eq!(ids.len(), 50);

        let recorded: HashSet<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(recorded, ids);
    }
}
