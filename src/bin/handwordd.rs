//! handwordd - gesture-to-word daemon
//!
//! This daemon:
//! 1. Loads configuration (HANDWORD_CONFIG file + HANDWORD_* overrides)
//! 2. Opens the configured landmark source
//! 3. Reads commands (start, stop, clear, copy, speak, switch, stats, quit) on stdin
//! 4. Writes session events to stdout as JSON lines

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::{self, BufRead, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use handword::{
    open_source, run_frames, Command, EventSink, HandwordConfig, JsonLinesSink, LoopOptions,
    Session, SessionEvent, SharedSession,
};

#[derive(Parser, Debug)]
#[command(name = "handwordd", about = "Translate held hand gestures into words")]
struct Args {
    /// Landmark source URI (overrides config): stub://..., or a JSON-lines file
    #[arg(long, value_name = "URI")]
    source: Option<String>,

    /// Pace recorded/synthetic frames at their timestamps
    #[arg(long)]
    realtime: bool,

    /// Wait for a `start` command instead of starting immediately
    #[arg(long)]
    no_auto_start: bool,

    /// Exit once the session goes idle (e.g. the source ran out)
    #[arg(long)]
    exit_when_idle: bool,
}

/// Stdout sink shared by the frame loop and the command reader.
#[derive(Clone)]
struct SharedStdout {
    inner: Arc<Mutex<JsonLinesSink<Stdout>>>,
}

impl SharedStdout {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(JsonLinesSink::new(io::stdout()))),
        }
    }
}

impl EventSink for SharedStdout {
    fn emit(&mut self, event: &SessionEvent) -> Result<()> {
        let mut sink = self
            .inner
            .lock()
            .map_err(|_| anyhow!("stdout sink lock poisoned"))?;
        sink.emit(event)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = HandwordConfig::load()?;
    if let Some(uri) = args.source {
        config.source.uri = uri;
    }
    if args.realtime {
        config.source.realtime = true;
    }

    let mut source = open_source(&config.source)?;
    log::info!(
        "handwordd {} using {} source {}",
        env!("CARGO_PKG_VERSION"),
        source.name(),
        config.source.uri
    );

    let session = SharedSession::new(Session::new(config.session.clone()));
    if config.auto_start && !args.no_auto_start {
        session.with(|s| s.request_start())??;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;
    }

    let sink = SharedStdout::new();
    {
        let session = session.clone();
        let sink = sink.clone();
        let shutdown = Arc::clone(&shutdown);
        std::thread::spawn(move || {
            if let Err(e) = read_commands(&session, sink, &shutdown) {
                log::error!("command reader stopped: {:#}", e);
            }
        });
    }

    let options = LoopOptions {
        exit_when_idle: args.exit_when_idle,
        idle_poll: Duration::from_millis(50),
    };
    let mut frame_sink = sink;
    let summary = run_frames(&session, source.as_mut(), &mut frame_sink, &shutdown, &options)?;

    let stats = session.with(|s| s.stats())?;
    log::info!(
        "handwordd exiting: frames={} events={} words={} message={:?}",
        summary.frames_processed,
        summary.events_emitted,
        stats.words_formed,
        stats.message
    );
    Ok(())
}

fn read_commands(session: &SharedSession, mut sink: SharedStdout, shutdown: &AtomicBool) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            log::info!("quit requested");
            shutdown.store(true, Ordering::SeqCst);
            break;
        }
        let command = match input.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                log::warn!("{:#}", e);
                continue;
            }
        };
        // Emitted under the session lock so command events never interleave
        // out of order with frame events.
        session.update(&mut sink, |s| {
            s.apply(command).unwrap_or_else(|e| {
                log::warn!("{:?} rejected: {}", command, e);
                Vec::new()
            })
        })?;
    }
    log::debug!("command input closed");
    Ok(())
}
