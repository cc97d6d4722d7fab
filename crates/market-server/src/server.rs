//! Headless daemon wiring.
//!
//! Everything market-related runs on one thread inside a `LocalSet`:
//! - the market runtime (price ticks, alert evaluation, notifications),
//! - the output loop writing listing and notification lines.
//!
//! Stdin is read on a detached OS thread that feeds the command channel.
//! A blocking read there never holds up shutdown: once the loop returns
//! the process may exit with the read still pending.
//!
//! The listing load runs concurrently with the already-mounted tick
//! timer and never delays it. The shutdown signal cancels every timer
//! before exit.

use std::future::Future;
use std::io::BufRead;
use std::rc::Rc;
use std::thread;

use market_core::{KeyValueStore, Scheduler};
use market_protocol::{format_listing_line, format_notification_line, parse_command_line};
use tokio::io::{self, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::data_source;
use crate::file_store::FileStore;
use crate::market_task::MarketRuntime;
use crate::scheduler::TokioScheduler;
use crate::types::{CommandRx, CommandTx, EventRx, EventTx, MarketEvent};

/// Run the daemon on stdin/stdout until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let (command_tx, command_rx): (CommandTx, CommandRx) = mpsc::unbounded_channel();
    spawn_stdin_reader(command_tx)?;

    let local = LocalSet::new();
    local
        .run_until(serve(config, command_rx, tokio::signal::ctrl_c(), io::stdout()))
        .await
}

/// Drive the market until `shutdown` resolves, applying `commands` and
/// writing protocol lines to `out`. Must run inside a `LocalSet`.
///
/// Returns as soon as `shutdown` fires, even if the command sender is
/// still alive.
pub async fn serve<S, W>(
    config: Config,
    mut command_rx: CommandRx,
    shutdown: S,
    mut out: W,
) -> anyhow::Result<()>
where
    S: Future<Output = std::io::Result<()>>,
    W: AsyncWrite + Unpin,
{
    let scheduler: Rc<dyn Scheduler> = Rc::new(TokioScheduler::new());
    let store: Rc<dyn KeyValueStore> = Rc::new(FileStore::new(&config.store_dir));
    info!(dir = %config.store_dir.display(), "using file store");

    let (event_tx, mut event_rx): (EventTx, EventRx) = mpsc::unbounded_channel();

    let mut runtime = MarketRuntime::start(&config, scheduler, store, event_tx);

    let load = data_source::load_app_data(config.data_path.as_deref());
    tokio::pin!(load);
    let mut loaded = false;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            (data, origin) = &mut load, if !loaded => {
                loaded = true;
                info!(?origin, listings = data.market_listings.len(), "market data ready");
                runtime.replace_listings(data.market_listings);
            }
            Some(command) = command_rx.recv() => {
                if let Err(e) = runtime.apply(command) {
                    warn!("command rejected: {}", e);
                }
            }
            Some(event) = event_rx.recv() => {
                for line in event_lines(&event) {
                    out.write_all(line.as_bytes()).await?;
                    out.write_all(b"\n").await?;
                }
                out.flush().await?;
            }
            res = &mut shutdown => {
                res?;
                info!("shutting down");
                break;
            }
        }
    }

    runtime.shutdown();
    Ok(())
}

/// Render an event as protocol lines.
pub fn event_lines(event: &MarketEvent) -> Vec<String> {
    match event {
        MarketEvent::Listings(rows) => rows
            .iter()
            .map(|row| format_listing_line(&row.listing, row.has_alert))
            .collect(),
        MarketEvent::Notification(message) => vec![format_notification_line(message)],
    }
}

/// Read operator commands from stdin on a detached thread.
fn spawn_stdin_reader(commands: CommandTx) -> std::io::Result<()> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            if let Err(e) = read_commands(std::io::stdin().lock(), &commands) {
                warn!("stdin reader stopped: {}", e);
            }
        })?;
    Ok(())
}

fn read_commands(input: impl BufRead, commands: &CommandTx) -> std::io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_command_line(trimmed) {
            Some(command) => {
                if commands.send(command).is_err() {
                    break;
                }
            }
            None => warn!(line = %trimmed, "ignoring unparseable command"),
        }
    }

    debug!("stdin closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::{Listing, NotificationMessage, NotificationPhase};
    use market_protocol::Command;

    use crate::types::ListingRow;

    #[test]
    fn listing_event_renders_one_line_per_row() {
        let event = MarketEvent::Listings(vec![
            ListingRow {
                listing: Listing::new("1", "Hard Red Wheat", 12500.0, "/ bushel"),
                has_alert: true,
            },
            ListingRow {
                listing: Listing::new("8", "Egyptian Cotton", 1500.0, "/ lb"),
                has_alert: false,
            },
        ]);
        assert_eq!(
            event_lines(&event),
            vec![
                "L, 1, Hard Red Wheat, 12500.00, / bushel, *".to_string(),
                "L, 8, Egyptian Cotton, 1500.00, / lb, -".to_string(),
            ]
        );
    }

    #[test]
    fn command_reader_skips_comments_and_garbage() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input = "# operator script\nR, 7\n\nnonsense\nD, 3\n";
        read_commands(input.as_bytes(), &tx).unwrap();

        assert_eq!(rx.try_recv().unwrap(), Command::RemoveAlert { crop_id: "7".to_string() });
        assert_eq!(rx.try_recv().unwrap(), Command::Dismiss { id: 3 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn notification_event_renders_a_single_line() {
        let event = MarketEvent::Notification(NotificationMessage {
            id: 1,
            message: "hello".to_string(),
            phase: NotificationPhase::Visible,
        });
        assert_eq!(event_lines(&event), vec!["N, 1, hello".to_string()]);
    }
}
