//! SDK telemetry hub.
//!
//! Lifecycle transitions, failed calls and handler registrations are
//! published on a broadcast channel and kept in a bounded history so the CLI
//! can print a snapshot after the fact.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

pub mod events;

pub use events::{TelemetryEvent, TelemetryEventKind};

const DEFAULT_HISTORY: usize = 64;

/// Snapshot of hub state for CLI reporting.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<TelemetryEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

pub struct TelemetryHub {
    tx: broadcast::Sender<TelemetryEvent>,
    history: Mutex<VecDeque<TelemetryEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl TelemetryHub {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn with_buffer(buffer: usize) -> Self {
        Self::new(buffer, DEFAULT_HISTORY)
    }

    pub fn emit(&self, kind: TelemetryEventKind) {
        let event = TelemetryEvent {
            timestamp_ms: now_timestamp_ms(),
            kind,
        };
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if self.history_capacity > 0 {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        }

        // No subscribers is not an error.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.tx.subscribe()
    }

    /// Stream of events from now on. Lagged receivers skip what they missed.
    pub fn stream(&self) -> impl Stream<Item = TelemetryEvent> + Send + 'static {
        BroadcastStream::new(self.tx.subscribe())
            .filter_map(|result| async move { result.ok() })
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::new(128, DEFAULT_HISTORY)
    }
}

fn now_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::EventKind;

    #[test]
    fn hub_keeps_bounded_history_in_order() {
        let hub = TelemetryHub::new(8, 2);
        hub.emit(TelemetryEventKind::Initialized);
        hub.emit(TelemetryEventKind::HandlerRegistered {
            kind: EventKind::DeviceAdded,
        });
        hub.emit(TelemetryEventKind::Released);

        let snapshot = hub.snapshot();
        assert_eq!(snapshot.total_events, 3);
        assert_eq!(snapshot.dropped_events, 1);
        let kinds: Vec<_> = snapshot.recent.into_iter().map(|event| event.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TelemetryEventKind::HandlerRegistered {
                    kind: EventKind::DeviceAdded
                },
                TelemetryEventKind::Released,
            ]
        );
    }

    #[test]
    fn subscribers_receive_events() {
        let hub = TelemetryHub::default();
        let mut rx = hub.subscribe();
        hub.emit(TelemetryEventKind::CallFailed {
            operation: "audio_devices".to_string(),
            code: 8,
        });

        let event = rx.try_recv().expect("event should be buffered");
        assert_eq!(
            event.kind,
            TelemetryEventKind::CallFailed {
                operation: "audio_devices".to_string(),
                code: 8
            }
        );
    }

    #[tokio::test]
    async fn stream_yields_published_events() {
        let hub = TelemetryHub::default();
        let stream = hub.stream();
        hub.emit(TelemetryEventKind::Initialized);
        hub.emit(TelemetryEventKind::Released);

        let kinds: Vec<_> = stream.take(2).map(|event| event.kind).collect().await;
        assert_eq!(
            kinds,
            vec![TelemetryEventKind::Initialized, TelemetryEventKind::Released]
        );
    }

    #[test]
    fn snapshot_serializes_as_tagged_json() {
        let hub = TelemetryHub::default();
        hub.emit(TelemetryEventKind::ReleaseFailed { code: 1 });
        let json = serde_json::to_value(hub.snapshot()).unwrap();
        assert_eq!(json["recent"][0]["kind"]["type"], "release_failed");
        assert_eq!(json["recent"][0]["kind"]["code"], 1);
    }
}
