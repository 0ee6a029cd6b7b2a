//! Fixed-interval list polling.
//!
//! `Poller::spawn` fetches `/torrents` right away and then once per period,
//! pushing every result (success or failure) into a channel. Each fetch runs
//! as its own task, so a request that never answers does not hold back the
//! next tick; results may overlap and the last one delivered wins.
//!
//! Every task listens on a shutdown broadcast. `stop` or dropping the handle
//! ends the ticker and any fetch still in flight, and nothing is delivered
//! afterwards.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::api::{ApiClient, ApiError};
use crate::protocol::Torrent;

pub type PollResult = Result<Vec<Torrent>, ApiError>;

pub struct Poller {
    shutdown_tx: broadcast::Sender<()>,
}

impl Poller {
    /// Start polling. `wrap` turns each result into the channel's message
    /// type so callers can feed their own event bus.
    pub fn spawn<T, F>(api: ApiClient, period: Duration, tx: mpsc::Sender<T>, wrap: F) -> Self
    where
        T: Send + 'static,
        F: Fn(PollResult) -> T + Send + Sync + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
        let wrap = Arc::new(wrap);
        tokio::spawn(async move {
            debug!("poller started for {} every {:?}", api.base_url(), period);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                // Err(Closed) means the handle was dropped; same as a stop.
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = ticker.tick() => {}
                }
                if tx.is_closed() {
                    break;
                }
                tokio::spawn(fetch_once(
                    api.clone(),
                    tx.clone(),
                    Arc::clone(&wrap),
                    shutdown_rx.resubscribe(),
                ));
            }
            debug!("poller for {} stopped", api.base_url());
        });
        Self { shutdown_tx }
    }

    pub fn stop(&self) {
        // No receiver left means every task already ended.
        let _ = self.shutdown_tx.send(());
    }
}

async fn fetch_once<T, F>(
    api: ApiClient,
    tx: mpsc::Sender<T>,
    wrap: Arc<F>,
    mut shutdown_rx: broadcast::Receiver<()>,
) where
    F: Fn(PollResult) -> T,
{
    let result = tokio::select! {
        _ = shutdown_rx.recv() => {
            trace!("fetch abandoned on stop");
            return;
        }
        result = api.torrents() => result,
    };
    if !matches!(
        shutdown_rx.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ) {
        trace!("dropping poll result after stop");
        return;
    }
    let _ = tx.send(wrap(result)).await;
}
