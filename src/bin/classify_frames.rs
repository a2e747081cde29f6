//! classify_frames - offline gesture classification of a landmark recording
//!
//! Replays a JSON-lines recording (or a stub:// script) through the rule
//! classifier and the hold tracker, and prints a summary as JSON. With
//! `--per-frame`, every classification is printed as one JSON line first.

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::IsTerminal;

use handword::{
    open_source, FingerFlags, GestureClassifier, RuleClassifier, Session, SessionConfig,
    SessionEvent, SourceSettings, SourceStats, ThumbRule, DEFAULT_HOLD_MS,
};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "classify_frames",
    about = "Classify recorded hand landmarks and report the words formed"
)]
struct Args {
    /// JSON-lines recording path, or a stub:// script
    input: String,

    /// Thumb extension rule (ip | ip_and_mcp)
    #[arg(long, env = "HANDWORD_THUMB_RULE", default_value = "ip", value_name = "RULE")]
    thumb_rule: ThumbRule,

    /// Hold threshold in milliseconds
    #[arg(long, default_value_t = DEFAULT_HOLD_MS)]
    hold_ms: u64,

    /// Frame rate for stub:// scripts
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Print one JSON line per frame before the summary
    #[arg(long)]
    per_frame: bool,

    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

#[derive(Serialize)]
struct FrameLine {
    t_ms: u64,
    label: Option<&'static str>,
    word: Option<&'static str>,
    confidence: u8,
    fingers: Option<FingerFlags>,
}

#[derive(Serialize)]
struct Summary {
    source: SourceStats,
    label_counts: BTreeMap<&'static str, u64>,
    unmatched_hands: u64,
    gestures: u64,
    words: Vec<String>,
    message: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.hold_ms == 0 {
        return Err(anyhow!("hold_ms must be greater than zero"));
    }
    let ui = ui::Ui::from_args(
        &args.ui,
        std::io::stderr().is_terminal(),
        std::io::stdout().is_terminal(),
    );

    let settings = SourceSettings {
        uri: args.input.clone(),
        target_fps: args.fps,
        ..SourceSettings::default()
    };
    let session_config = SessionConfig {
        hold_ms: args.hold_ms,
        thumb_rule: args.thumb_rule,
        ..SessionConfig::default()
    };

    let mut source = {
        let _stage = ui.stage("Open source");
        let mut source = open_source(&settings)?;
        source.connect(session_config.facing)?;
        source
    };

    let classifier = RuleClassifier::new(args.thumb_rule);
    let mut session = Session::new(session_config);
    session.request_start()?;
    session.complete_start(Ok(()))?;

    let mut label_counts: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut unmatched_hands = 0u64;
    let mut words = Vec::new();
    {
        let _stage = ui.stage(&format!("Classify frames ({})", classifier.name()));
        let counter = ui.frame_counter();
        while let Some(frame) = source.next_frame()? {
            let hand = frame.hand.as_ref();
            let classification = classifier.classify(hand);
            match classification.label {
                Some(label) => *label_counts.entry(label.as_str()).or_default() += 1,
                None if hand.is_some() => unmatched_hands += 1,
                None => {}
            }
            if args.per_frame {
                let line = FrameLine {
                    t_ms: frame.t_ms,
                    label: classification.label.map(|l| l.as_str()),
                    word: classification.label.map(|l| l.word().as_str()),
                    confidence: classification.confidence,
                    fingers: hand.map(|h| classifier.finger_flags(h)),
                };
                println!("{}", serde_json::to_string(&line)?);
            }
            for event in session.process_frame(&frame) {
                if let SessionEvent::WordCommitted { word, .. } = event {
                    counter.set_message(format!("last word {}", word));
                    words.push(word.to_string());
                }
            }
            counter.inc(1);
        }
        counter.finish_and_clear();
    }
    source.disconnect();

    let summary = Summary {
        source: source.stats(),
        label_counts,
        unmatched_hands,
        gestures: session.total_gestures(),
        words,
        message: session.message().text(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
