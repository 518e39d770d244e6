//! Background refresh of every tracked key.
//!
//! The refresher thread waits one interval on a stop channel, then refetches
//! each key with the credential it was stored with. A failed fetch is logged
//! and skipped; the pass moves on to the next key and the loop to the next
//! interval. Stopping wakes the wait at once; a pass already under way runs
//! to its end first.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, error, info, warn};
use stock_common::Result;

use crate::source::QuoteSource;
use crate::store::Shared;

/// Handle to a running refresh thread.
pub(crate) struct Refresher {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Refresher {
    /// Spawns the refresh thread.
    pub(crate) fn start<S: QuoteSource + 'static>(shared: Arc<Shared<S>>, interval: Duration) -> Result<Self> {
        let (stop_tx, stop_rx) = unbounded::<()>();
        let handle = thread::Builder::new()
            .name("quote-refresh".to_string())
            .spawn(move || run(shared, interval, stop_rx))?;
        info!("Quote refresh started, interval {:?}", interval);
        Ok(Self { stop_tx, handle })
    }

    /// Signals the thread and waits for it to finish.
    pub(crate) fn stop(self) {
        // The thread also stops when the sender is dropped, so a failed send is fine.
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            error!("Quote refresh thread panicked");
        }
        info!("Quote refresh stopped");
    }
}

fn run<S: QuoteSource>(shared: Arc<Shared<S>>, interval: Duration, stop_rx: Receiver<()>) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        let tracked = shared.tracked();
        let mut failed = 0usize;
        for (key, credential) in &tracked {
            if let Err(e) = shared.refresh(key, credential) {
                failed += 1;
                warn!("Refresh of {} failed: {}", key, e);
            }
        }
        debug!("Refresh pass done: {} keys, {} failed", tracked.len(), failed);
    }
}
