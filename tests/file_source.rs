use std::io::Write;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use tempfile::NamedTempFile;

use handword::{
    open_source, pose, run_frames, Frame, FrameRecord, GestureLabel, LoopOptions, MemorySink,
    Session, SessionEvent, SessionState, SharedSession, SourceSettings, Word,
};

fn write_record(file: &mut NamedTempFile, frame: &Frame) -> Result<()> {
    serde_json::to_writer(&mut *file, &FrameRecord::from_frame(frame))?;
    file.write_all(b"\n")?;
    Ok(())
}

fn recording() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for t in (0..=950).step_by(50) {
        write_record(&mut file, &Frame::new(t, Some(pose::for_label(GestureLabel::Peace))))?;
    }
    writeln!(file, "not json")?;
    writeln!(file)?;
    // Five points only: a hand the detector could not fully resolve.
    let short: Vec<_> = pose::for_label(GestureLabel::Fist).points()[..5].to_vec();
    writeln!(
        file,
        "{}",
        serde_json::to_string(&FrameRecord {
            t_ms: 1_000,
            hands: vec![short],
        })?
    )?;
    for t in (1_050..=1_950).step_by(50) {
        write_record(&mut file, &Frame::new(t, Some(pose::for_label(GestureLabel::Fist))))?;
    }
    file.flush()?;
    Ok(file)
}

#[test]
fn replays_recording_into_words() -> Result<()> {
    let file = recording()?;
    let settings = SourceSettings {
        uri: file.path().display().to_string(),
        ..SourceSettings::default()
    };
    let mut source = open_source(&settings)?;
    assert_eq!(source.name(), "file");

    let mut session = Session::default();
    session.request_start()?;
    let session = SharedSession::new(session);
    let mut sink = MemorySink::new();
    let shutdown = AtomicBool::new(false);

    let summary = run_frames(
        &session,
        source.as_mut(),
        &mut sink,
        &shutdown,
        &LoopOptions::default(),
    )?;

    assert_eq!(sink.committed_words(), vec![Word::Peace, Word::Stop]);
    assert_eq!(summary.frames_processed, 40);
    assert_eq!(summary.source.frames_delivered, 40);
    assert_eq!(summary.source.hands_seen, 39);
    assert_eq!(summary.source.malformed, 2);
    assert!(sink.events.contains(&SessionEvent::NoHandDetected));

    let session = session.lock()?;
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.message().text(), "PEACE STOP");
    assert!(!source.is_connected());
    Ok(())
}

#[test]
fn switching_camera_mid_hold_restarts_on_reopened_recording() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    for t in (0..=5_000).step_by(50) {
        write_record(&mut file, &Frame::new(t, Some(pose::for_label(GestureLabel::Peace))))?;
    }
    file.flush()?;
    let settings = SourceSettings {
        uri: file.path().display().to_string(),
        ..SourceSettings::default()
    };
    let mut source = open_source(&settings)?;

    // Run the first four seconds by hand, then switch while Peace is held.
    let mut session = Session::default();
    session.request_start()?;
    source.connect(session.facing())?;
    session.complete_start(Ok(()))?;
    while let Some(frame) = source.next_frame()? {
        session.process_frame(&frame);
        if frame.t_ms >= 4_000 {
            break;
        }
    }
    assert_eq!(session.words_formed(), 4);
    session.switch_camera();
    assert_eq!(session.state(), SessionState::Starting);

    let session = SharedSession::new(session);
    let mut sink = MemorySink::new();
    run_frames(
        &session,
        source.as_mut(),
        &mut sink,
        &AtomicBool::new(false),
        &LoopOptions::default(),
    )?;

    // The reopened file starts again at t=0: a fresh 850 ms hold per word.
    let commits: Vec<usize> = sink
        .events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::WordCommitted { words_formed, .. } => Some(*words_formed),
            _ => None,
        })
        .collect();
    assert_eq!(commits, vec![5, 6, 7, 8, 9]);

    let session = session.lock()?;
    let stats = session.stats();
    assert_eq!(stats.detections_per_minute, 101);
    assert_eq!(stats.message, vec!["PEACE"; 9].join(" "));
    assert_eq!(session.state(), SessionState::Idle);
    Ok(())
}

#[test]
fn missing_file_is_a_camera_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let settings = SourceSettings {
        uri: dir.path().join("missing.jsonl").display().to_string(),
        ..SourceSettings::default()
    };
    let mut source = open_source(&settings)?;

    let mut session = Session::default();
    session.request_start()?;
    let session = SharedSession::new(session);
    let mut sink = MemorySink::new();

    run_frames(
        &session,
        source.as_mut(),
        &mut sink,
        &AtomicBool::new(false),
        &LoopOptions::default(),
    )?;

    assert!(matches!(
        sink.events.as_slice(),
        [SessionEvent::CameraError { reason }] if reason.starts_with("unable to access camera")
    ));
    assert_eq!(session.lock()?.state(), SessionState::Idle);
    Ok(())
}

#[test]
fn url_schemes_are_rejected() {
    let settings = SourceSettings {
        uri: "rtsp://camera-1/stream".to_string(),
        ..SourceSettings::default()
    };
    assert!(open_source(&settings).is_err());
}
