// crates/market-client/src/main.rs

mod app;
mod components;
mod config;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::{io, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use market_core::{KeyValueStore, RandomSource, Scheduler, ThreadRandom};
use market_server::{load_app_data, FileStore, TokioScheduler};

use crate::app::{App, AppSettings};
use crate::config::ClientConfig;

/// Redraw and input polling period. Timers run while the loop sleeps.
const FRAME: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[clap(name = "market-client")]
#[clap(about = "Terminal crop market with live prices and price alerts")]
struct Cli {
    /// JSON market data file (built-in data when absent or unreadable)
    #[clap(long)]
    data: Option<PathBuf>,

    /// Directory holding alerts and the user profile
    #[clap(long)]
    store_dir: Option<PathBuf>,

    /// Price tick interval in milliseconds
    #[clap(short, long)]
    tick_ms: Option<u64>,

    /// Seed for reproducible price movement
    #[clap(long)]
    seed: Option<u64>,

    /// TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Write debug logs to market-client.log
    #[clap(short, long)]
    debug: bool,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn merge_into(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(data) = &self.data {
            config.data_path = Some(data.clone());
        }
        if let Some(dir) = &self.store_dir {
            config.store_dir = dir.clone();
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    let config = cli.merge_into(file_config);

    // The terminal owns stdout, so logs go to a file.
    if cli.debug {
        let log = File::create("market-client.log").context("creating market-client.log")?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(Mutex::new(log))
            .with_ansi(false)
            .init();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let local = LocalSet::new();
    let res = local.run_until(run_app(&mut terminal, config)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("client stopped: {:?}", err);
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, config: ClientConfig) -> Result<()> {
    let scheduler: Rc<dyn Scheduler> = Rc::new(TokioScheduler::new());
    let store: Rc<dyn KeyValueStore> = Rc::new(FileStore::new(&config.store_dir));
    info!(dir = %config.store_dir.display(), "using file store");

    let seed = config.seed;
    let make_rng = Box::new(move || -> Box<dyn RandomSource> {
        match seed {
            Some(seed) => Box::new(ThreadRandom::seeded(seed)),
            None => Box::new(ThreadRandom::new()),
        }
    });
    let mut app = App::new(AppSettings::from(&config), scheduler, store, make_rng);

    // Market data loads in the background; the UI is usable meanwhile.
    let (data_tx, mut data_rx) = mpsc::unbounded_channel();
    let data_path = config.data_path.clone();
    tokio::task::spawn_local(async move {
        let loaded = load_app_data(data_path.as_deref()).await;
        let _ = data_tx.send(loaded);
    });

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if let Ok((data, origin)) = data_rx.try_recv() {
            app.set_market_data(data, origin);
        }

        if app.should_quit {
            break;
        }

        tokio::time::sleep(FRAME).await;
    }

    app.shutdown();
    Ok(())
}
