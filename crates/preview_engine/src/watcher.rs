use std::sync::Arc;
use std::time::Duration;

use preview_core::Msg;
use preview_logging::preview_debug;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::PageHost;

/// Reports the document location every `interval` until cancelled.
///
/// The host's client-side routing changes the location without firing a
/// navigation event, so the location is polled and change detection happens
/// in the state machine.
pub async fn poll_location(
    host: Arc<dyn PageHost>,
    interval: Duration,
    cancel: CancellationToken,
    tx: UnboundedSender<Msg>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the bootstrap already saw this location.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let location = host.location();
                if tx.send(Msg::LocationPolled { location }).is_err() {
                    break;
                }
            }
        }
    }
    preview_debug!("location polling stopped");
}
