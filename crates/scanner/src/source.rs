use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use shelfscan_core::ScanEvent;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("scan source failed to deliver: {0}")]
    Deliver(String),
    #[error("scan source disconnected: {0}")]
    Disconnected(String),
}

/// The external barcode-decoding collaborator. Camera capture and symbol
/// decoding happen behind this seam; the pipeline only sees decoded
/// payload strings, one per scan event.
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Next decoded scan event, or `None` once the source is exhausted.
    async fn next_scan(&self) -> Result<Option<ScanEvent>, SourceError>;
}

/// A source that never produces an event. Stands in where no decoder is
/// wired up, mirroring how the pipeline is exercised in isolation.
#[derive(Default)]
pub struct NoopScanSource;

#[async_trait]
impl ScanSource for NoopScanSource {
    async fn next_scan(&self) -> Result<Option<ScanEvent>, SourceError> {
        Ok(None)
    }
}

/// Replays a fixed list of payloads in order, then reports exhaustion.
/// Used by the CLI `scan` command and by pipeline tests.
pub struct ScriptedScanSource {
    queue: Mutex<VecDeque<ScanEvent>>,
}

impl ScriptedScanSource {
    pub fn new(payloads: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let queue = payloads.into_iter().map(ScanEvent::now).collect();
        Self { queue: Mutex::new(queue) }
    }
}

#[async_trait]
impl ScanSource for ScriptedScanSource {
    async fn next_scan(&self) -> Result<Option<ScanEvent>, SourceError> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| SourceError::Deliver("scripted queue poisoned".to_string()))?;
        Ok(queue.pop_front())
    }
}
