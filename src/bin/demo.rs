//! demo - end-to-end synthetic run
//!
//! Plays a scripted sequence of hand poses through the full pipeline
//! (source -> classifier -> hold tracker -> message) and prints what a UI
//! would show: each committed word, then the final session statistics.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::atomic::AtomicBool;

use handword::ingest::synthetic::DEMO_URI;
use handword::{
    run_frames, LoopOptions, MemorySink, Session, SessionConfig, SessionEvent, SharedSession,
    SourceSettings, SyntheticConfig, SyntheticSource, ThumbRule,
};

#[allow(dead_code)]
#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Synthetic script, e.g. stub://peace:1200,none:200,fist
    #[arg(long, default_value = DEMO_URI)]
    script: String,
    /// Frames per second for the synthetic source.
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Seed for landmark jitter.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Sleep between frames to play the script in real time.
    #[arg(long)]
    realtime: bool,
    /// Thumb extension rule (ip | ip_and_mcp).
    #[arg(long, env = "HANDWORD_THUMB_RULE", default_value = "ip")]
    thumb_rule: ThumbRule,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.fps == 0 {
        return Err(anyhow!("fps must be >= 1"));
    }
    let ui = ui::Ui::from_args(
        &args.ui,
        std::io::stderr().is_terminal(),
        std::io::stdout().is_terminal(),
    );

    let settings = SourceSettings {
        uri: args.script.clone(),
        target_fps: args.fps,
        realtime: args.realtime,
        seed: args.seed,
    };
    let mut source = {
        let _stage = ui.stage("Load script");
        SyntheticSource::new(SyntheticConfig::from_settings(&settings)?)
    };

    let mut session = Session::new(SessionConfig {
        thumb_rule: args.thumb_rule,
        ..SessionConfig::default()
    });
    session.request_start()?;
    let session = SharedSession::new(session);

    let mut sink = MemorySink::new();
    let summary = {
        let _stage = ui.stage(&format!("Play {} ms of gestures", source.duration_ms()));
        let shutdown = AtomicBool::new(false);
        run_frames(
            &session,
            &mut source,
            &mut sink,
            &shutdown,
            &LoopOptions::default(),
        )?
    };

    for event in &sink.events {
        match event {
            SessionEvent::GestureStarted {
                label, confidence, ..
            } => println!("  gesture   {:<10} ({}%)", label, confidence),
            SessionEvent::WordCommitted { word, message, .. } => {
                println!("  word      {:<10} -> {}", word, message)
            }
            SessionEvent::CameraError { reason } => println!("  error     {}", reason),
            _ => {}
        }
    }

    let stats = session.with(|s| s.stats())?;
    println!();
    println!("frames processed:  {}", summary.frames_processed);
    println!("events emitted:    {}", summary.events_emitted);
    println!("gestures detected: {}", stats.total_gestures);
    println!("words formed:      {}", stats.words_formed);
    println!("message:           {}", stats.message);
    Ok(())
}
