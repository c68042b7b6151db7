//! Background workers.
//!
//! Socket I/O never runs on the task that owns the [`Panel`]. Two workers
//! do it instead:
//!
//! - the dispatcher sends every command on its own task and connection,
//!   logging and dropping failures. It finishes queued and in-flight sends
//!   before it stops
//! - the poller fetches status on a timer and on request, and forwards
//!   successful snapshots over a channel
//!
//! The owning task applies snapshots itself via [`Panel::apply_status`].

use std::time::Duration;

use nbfc_rpc::{NbfcClient, Transport};
use nbfc_types::{Command, StatusSnapshot};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::fan::FanControl;
use crate::panel::Panel;

/// Hands commands to the dispatcher
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a command. Returns false once the dispatcher is gone.
    pub fn send(&self, command: Command) -> bool {
        match self.tx.send(command) {
            Ok(()) => true,
            Err(mpsc::error::SendError(command)) => {
                warn!("Dispatcher stopped, dropping {}", command);
                false
            }
        }
    }
}

/// Asks the poller for an immediate status fetch
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl RefreshHandle {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns false once the poller is gone.
    pub fn request(&self) -> bool {
        if self.tx.send(()).is_err() {
            warn!("Poller stopped, ignoring refresh request");
            return false;
        }
        true
    }
}

/// How long [`Workers::shutdown`] waits for outstanding sends
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Send each received command on its own task.
///
/// Runs until every [`CommandSender`] is dropped, then waits for the sends
/// still in flight before finishing.
pub fn spawn_dispatcher<T>(
    client: NbfcClient<T>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) -> JoinHandle<()>
where
    T: Transport + Clone + 'static,
{
    tokio::spawn(async move {
        let mut in_flight = JoinSet::new();

        while let Some(command) = commands.recv().await {
            let client = client.clone();
            in_flight.spawn(async move {
                match client.send(&command).await {
                    Ok(_) => debug!("Delivered {}", command),
                    Err(e) => warn!("Dropped {}: {}", command, e),
                }
            });
            while in_flight.try_join_next().is_some() {}
        }

        debug!(
            "Command channel closed, waiting for {} sends",
            in_flight.len()
        );
        while in_flight.join_next().await.is_some() {}
    })
}

/// Poll status every `interval` and on every refresh request.
///
/// With `interval` set to `None` only refresh requests trigger a poll.
/// Polls run one at a time so snapshots arrive in order; requests that
/// queue up during a poll are served by the next one. Stops when the
/// refresh channel or the snapshot receiver closes.
pub fn spawn_poller<T>(
    client: NbfcClient<T>,
    interval: Option<Duration>,
    mut refresh: mpsc::UnboundedReceiver<()>,
    snapshots: mpsc::UnboundedSender<StatusSnapshot>,
) -> JoinHandle<()>
where
    T: Transport + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval.map(|period| {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            tokio::select! {
                () = next_tick(ticker.as_mut()) => {}
                request = refresh.recv() => {
                    if request.is_none() {
                        debug!("Refresh channel closed, stopping poller");
                        break;
                    }
                }
            }

            let Some(snapshot) = poll_once(&client).await else {
                continue;
            };

            while refresh.try_recv().is_ok() {}

            if snapshots.send(snapshot).is_err() {
                debug!("Snapshot receiver closed, stopping poller");
                break;
            }
        }
    })
}

async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// One poll cycle. Failures are logged and yield `None`, leaving the
/// display as it was.
pub async fn poll_once<T: Transport>(client: &NbfcClient<T>) -> Option<StatusSnapshot> {
    match client.status().await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("Status poll failed: {}", e);
            None
        }
    }
}

/// Handles of the running workers
#[derive(Debug)]
pub struct Workers {
    dispatcher: JoinHandle<()>,
    poller: JoinHandle<()>,
}

impl Workers {
    /// Stop both workers.
    ///
    /// Dropping `panel` closes the command channel. Commands it already
    /// queued are still sent, and the dispatcher is awaited for up to
    /// [`SHUTDOWN_GRACE`] so the runtime is not torn down under them.
    pub async fn shutdown(self, panel: Panel) {
        drop(panel);
        self.poller.abort();

        match tokio::time::timeout(SHUTDOWN_GRACE, self.dispatcher).await {
            Ok(Ok(())) => debug!("Dispatcher finished"),
            Ok(Err(e)) => warn!("Dispatcher failed: {}", e),
            Err(_) => warn!("Gave up on pending sends after {:?}", SHUTDOWN_GRACE),
        }
    }
}

/// Wire a [`Panel`] for `controls` to freshly spawned workers.
///
/// Returns the panel, the receiver its owner drains into
/// [`Panel::apply_status`], and the worker handles.
pub fn start<T>(
    client: NbfcClient<T>,
    poll_interval: Option<Duration>,
    controls: Vec<FanControl>,
) -> (Panel, mpsc::UnboundedReceiver<StatusSnapshot>, Workers)
where
    T: Transport + Clone + 'static,
{
    let (commands, command_rx) = CommandSender::channel();
    let (refresh, refresh_rx) = RefreshHandle::channel();
    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();

    let workers = Workers {
        dispatcher: spawn_dispatcher(client.clone(), command_rx),
        poller: spawn_poller(client, poll_interval, refresh_rx, snapshot_tx),
    };

    (Panel::new(controls, commands, refresh), snapshot_rx, workers)
}
