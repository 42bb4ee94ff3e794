use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use shelfscan_core::{Product, ScanEvent};

/// Result of running one scan event through the lookup service. Absence is
/// a normal outcome; the sink decides how to render it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LookupOutcome {
    pub event: ScanEvent,
    pub product: Option<Product>,
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        self.product.is_some()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("sink failed to present outcome: {0}")]
    Present(String),
}

/// The external presentation collaborator. On-screen overlay rendering
/// happens behind this seam.
#[async_trait]
pub trait ScanSink: Send + Sync {
    async fn present(&self, outcome: &LookupOutcome) -> Result<(), SinkError>;
}

/// Renders outcomes as structured log events. The default sink for headless
/// runs of the pipeline.
#[derive(Default)]
pub struct TracingSink;

#[async_trait]
impl ScanSink for TracingSink {
    async fn present(&self, outcome: &LookupOutcome) -> Result<(), SinkError> {
        match &outcome.product {
            Some(product) => info!(
                event_name = "scan.lookup.found",
                payload = %outcome.event.payload,
                product_name = %product.name,
                price = %product.price,
                weight = %product.weight,
                "scan matched catalog record"
            ),
            None => info!(
                event_name = "scan.lookup.not_found",
                payload = %outcome.event.payload,
                "scan did not match any catalog record"
            ),
        }
        Ok(())
    }
}
