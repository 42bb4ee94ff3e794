//! Moves decoded scan events from a [`ScanSource`] through the catalog
//! lookup and hands each outcome to a [`ScanSink`], strictly in arrival
//! order. The catalog is immutable, so lookups need no locking; the only
//! coordination is a bounded channel between producer and consumer.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use shelfscan_core::{Catalog, ScanEvent};

use crate::sink::{LookupOutcome, ScanSink};
use crate::source::{ScanSource, SourceError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("scan producer task failed: {0}")]
    Producer(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub processed: u64,
    pub found: u64,
    pub not_found: u64,
}

pub struct ScanPipeline {
    catalog: Arc<Catalog>,
    queue_capacity: usize,
}

impl ScanPipeline {
    pub fn new(catalog: Arc<Catalog>, queue_capacity: usize) -> Self {
        Self { catalog, queue_capacity: queue_capacity.max(1) }
    }

    /// Drains the source to exhaustion. Source failures terminate the run;
    /// sink failures are logged and the pipeline keeps going, so one bad
    /// render never stalls the scan stream.
    pub async fn run(
        &self,
        source: Arc<dyn ScanSource>,
        sink: Arc<dyn ScanSink>,
    ) -> Result<PipelineSummary, PipelineError> {
        let (events_tx, mut events_rx) = mpsc::channel::<ScanEvent>(self.queue_capacity);

        let producer = tokio::spawn(async move {
            loop {
                match source.next_scan().await {
                    Ok(Some(event)) => {
                        // Receiver dropped means the consumer is gone.
                        if events_tx.send(event).await.is_err() {
                            return Ok(());
                        }
                    }
                    Ok(None) => return Ok(()),
                    Err(error) => return Err(error),
                }
            }
        });

        let mut summary = PipelineSummary::default();
        while let Some(event) = events_rx.recv().await {
            let product = self.catalog.lookup(&event.payload).cloned();
            summary.processed += 1;
            if product.is_some() {
                summary.found += 1;
            } else {
                summary.not_found += 1;
            }

            debug!(
                payload = %event.payload,
                found = product.is_some(),
                "processed scan event"
            );

            let outcome = LookupOutcome { event, product };
            if let Err(error) = sink.present(&outcome).await {
                warn!(
                    payload = %outcome.event.payload,
                    error = %error,
                    "sink failed to present outcome; continuing scan loop"
                );
            }
        }

        producer
            .await
            .map_err(|join_error| PipelineError::Producer(join_error.to_string()))??;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use shelfscan_core::{Catalog, Product, ProductId};

    use crate::sink::{LookupOutcome, ScanSink, SinkError};
    use crate::source::{NoopScanSource, ScanSource, ScriptedScanSource, SourceError};

    use super::{PipelineError, ScanPipeline};

    #[derive(Default)]
    struct CollectingSink {
        outcomes: Mutex<Vec<LookupOutcome>>,
    }

    #[async_trait]
    impl ScanSink for CollectingSink {
        async fn present(&self, outcome: &LookupOutcome) -> Result<(), SinkError> {
            self.outcomes
                .lock()
                .map_err(|_| SinkError::Present("collector poisoned".to_string()))?
                .push(outcome.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl ScanSink for FailingSink {
        async fn present(&self, _outcome: &LookupOutcome) -> Result<(), SinkError> {
            Err(SinkError::Present("render surface lost".to_string()))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ScanSource for FailingSource {
        async fn next_scan(
            &self,
        ) -> Result<Option<shelfscan_core::ScanEvent>, SourceError> {
            Err(SourceError::Disconnected("decoder went away".to_string()))
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            Product {
                id: ProductId("A1".to_string()),
                name: "Widget".to_string(),
                price: Decimal::new(999, 2),
                weight: Decimal::new(5, 1),
            },
            Product {
                id: ProductId("B2".to_string()),
                name: "Gadget".to_string(),
                price: Decimal::new(1250, 2),
                weight: Decimal::new(125, 2),
            },
        ]))
    }

    #[tokio::test]
    async fn outcomes_preserve_arrival_order() {
        let pipeline = ScanPipeline::new(catalog(), 4);
        let source = Arc::new(ScriptedScanSource::new(["B2", "Z9", "A1"]));
        let sink = Arc::new(CollectingSink::default());

        let summary =
            pipeline.run(source, sink.clone()).await.expect("pipeline should complete");

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.found, 2);
        assert_eq!(summary.not_found, 1);

        let outcomes = sink.outcomes.lock().expect("collector");
        let payloads: Vec<&str> =
            outcomes.iter().map(|outcome| outcome.event.payload.as_str()).collect();
        assert_eq!(payloads, ["B2", "Z9", "A1"]);
        assert!(outcomes[0].is_found());
        assert!(!outcomes[1].is_found());
        assert!(outcomes[2].is_found());
    }

    #[tokio::test]
    async fn repeated_scans_of_the_same_code_yield_the_same_outcome() {
        let pipeline = ScanPipeline::new(catalog(), 2);
        let source = Arc::new(ScriptedScanSource::new(["A1", "A1", "A1"]));
        let sink = Arc::new(CollectingSink::default());

        pipeline.run(source, sink.clone()).await.expect("pipeline should complete");

        let outcomes = sink.outcomes.lock().expect("collector");
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|outcome| outcome.product == outcomes[0].product));
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_the_pipeline() {
        let pipeline = ScanPipeline::new(catalog(), 2);
        let source = Arc::new(ScriptedScanSource::new(["A1", "B2"]));

        let summary = pipeline
            .run(source, Arc::new(FailingSink))
            .await
            .expect("sink failures should not abort the run");

        assert_eq!(summary.processed, 2);
    }

    #[tokio::test]
    async fn source_failure_terminates_the_run() {
        let pipeline = ScanPipeline::new(catalog(), 2);

        let error = pipeline
            .run(Arc::new(FailingSource), Arc::new(CollectingSink::default()))
            .await
            .expect_err("source failure should surface");

        assert!(matches!(error, PipelineError::Source(SourceError::Disconnected(_))));
    }

    #[tokio::test]
    async fn exhausted_source_completes_with_empty_summary() {
        let pipeline = ScanPipeline::new(catalog(), 2);

        let summary = pipeline
            .run(Arc::new(NoopScanSource), Arc::new(CollectingSink::default()))
            .await
            .expect("empty run should complete");

        assert_eq!(summary.processed, 0);
    }
}
