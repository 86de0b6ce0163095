use crate::{AppCommand, AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument};

/// Turn process signals into [`AppCommand`]s.
///
/// Ctrl-C requests shutdown. On unix, `SIGUSR1` stands in for the host
/// becoming active and asks the loop to check for a pending action.
#[instrument(skip_all)]
pub(crate) async fn forward_signals(
    command_tx: mpsc::Sender<AppCommand>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> AppResult<()> {
    let mut foreground = ForegroundSignal::new()?;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Interrupt received");
                send(&command_tx, AppCommand::Shutdown).await?;
                break;
            }

            _ = foreground.recv() => {
                debug!("Foreground signal received");
                send(&command_tx, AppCommand::Foreground).await?;
            }

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    debug!("Signal forwarder stopped");
    Ok(())
}

/// Forward `cmd` to the event loop.
///
/// The location is captured before the future is built so errors point at
/// the caller.
#[track_caller]
pub(crate) fn send(
    command_tx: &mpsc::Sender<AppCommand>,
    cmd: AppCommand,
) -> impl Future<Output = AppResult<()>> + '_ {
    let location = ErrorLocation::from(Location::caller());
    async move {
        command_tx
            .send(cmd)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}", e.0),
                location,
            })
    }
}

#[cfg(unix)]
struct ForegroundSignal(tokio::signal::unix::Signal);

#[cfg(unix)]
impl ForegroundSignal {
    fn new() -> AppResult<Self> {
        use tokio::signal::unix::{SignalKind, signal};
        Ok(Self(signal(SignalKind::user_defined1())?))
    }

    async fn recv(&mut self) -> Option<()> {
        self.0.recv().await
    }
}

#[cfg(not(unix))]
struct ForegroundSignal;

#[cfg(not(unix))]
impl ForegroundSignal {
    fn new() -> AppResult<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> Option<()> {
        std::future::pending().await
    }
}
