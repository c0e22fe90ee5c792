use std::future::Future;

use log::debug;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::FetchResult;

/// Monotonic token identifying one issued request within a screen.
pub type Generation = u64;

/// A completed fetch, tagged with the generation it was issued under.
#[derive(Debug)]
pub struct Tagged<T> {
    pub generation: Generation,
    pub outcome: FetchResult<T>,
}

/// Owns the single in-flight request of a screen.
///
/// Spawning a new request aborts the previous task; completions arrive over
/// a channel so the UI loop can drain them between frames.
pub struct FetchSlot<T> {
    tx: UnboundedSender<Tagged<T>>,
    rx: UnboundedReceiver<Tagged<T>>,
    inflight: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> FetchSlot<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            inflight: None,
        }
    }

    pub fn spawn<F>(&mut self, generation: Generation, future: F)
    where
        F: Future<Output = FetchResult<T>> + Send + 'static,
    {
        self.cancel();
        let tx = self.tx.clone();
        self.inflight = Some(tokio::spawn(async move {
            let outcome = future.await;
            // The screen may already be gone.
            let _ = tx.send(Tagged {
                generation,
                outcome,
            });
        }));
    }

    /// Abort the in-flight task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.inflight.take() {
            if !handle.is_finished() {
                debug!("Aborting superseded request");
                handle.abort();
            }
        }
    }

    /// Next completion without blocking.
    pub fn poll(&mut self) -> Option<Tagged<T>> {
        match self.rx.try_recv() {
            Ok(tagged) => Some(tagged),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next completion.
    pub async fn next(&mut self) -> Option<Tagged<T>> {
        self.rx.recv().await
    }
}

impl<T: Send + 'static> Default for FetchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for FetchSlot<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}
