//! End-to-end behavior of classification, hold-to-commit and session stats
//! through the public API.

use handword::{
    classify, pose, Classification, FingerFlags, Frame, GestureClassifier, GestureLabel, Hand,
    Landmark, RuleClassifier, Session, SessionConfig, SessionEvent, ThumbRule, Word,
};

fn running_session() -> Session {
    let mut session = Session::default();
    session.request_start().expect("start");
    session.complete_start(Ok(())).expect("acquire");
    session
}

fn feed(session: &mut Session, label: Option<GestureLabel>, t_ms: u64) -> Vec<SessionEvent> {
    session.process_frame(&Frame::new(t_ms, label.map(pose::for_label)))
}

fn commits(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::WordCommitted { .. }))
        .count()
}

#[test]
fn every_rule_yields_its_label_and_confidence() {
    let expected = [
        (GestureLabel::ThumbsUp, 95, Word::Yes),
        (GestureLabel::Fist, 98, Word::Stop),
        (GestureLabel::Peace, 97, Word::Peace),
        (GestureLabel::OpenPalm, 99, Word::Hello),
        (GestureLabel::Ok, 92, Word::Okay),
        (GestureLabel::PointUp, 94, Word::Wait),
        (GestureLabel::Rock, 91, Word::Rock),
        (GestureLabel::Call, 93, Word::Call),
    ];
    for (label, confidence, word) in expected {
        let result = classify(Some(&pose::for_label(label)));
        assert_eq!(result, Classification::new(label, confidence), "{label}");
        assert_eq!(label.word(), word);
    }
}

#[test]
fn rock_always_beats_love() {
    let result = classify(Some(&pose::for_label(GestureLabel::Love)));
    assert_eq!(result.label, Some(GestureLabel::Rock));
    assert_eq!(result.confidence, 91);
}

#[test]
fn no_hand_and_unmatched_hand_are_none() {
    assert_eq!(classify(None), Classification::NONE);
    // Index and pinky only; with the thumb folded no rule matches.
    let hand = pose::hand(FingerFlags::new(false, true, false, false, true));
    assert!(classify(Some(&hand)).is_none());
}

#[test]
fn thumb_rule_variants_can_disagree() {
    // Thumb tip above the IP joint but below the MCP joint.
    let mut points: Vec<Landmark> = pose::for_label(GestureLabel::Fist).points().to_vec();
    points[3] = Landmark::new(0.33, 0.70, 0.0);
    points[2] = Landmark::new(0.37, 0.60, 0.0);
    points[4] = Landmark::new(0.31, 0.65, 0.0);
    let hand = Hand::from_points(&points).expect("21 points");

    let ip = RuleClassifier::new(ThumbRule::Ip);
    let ip_and_mcp = RuleClassifier::new(ThumbRule::IpAndMcp);
    assert_eq!(ip.classify(Some(&hand)).label, Some(GestureLabel::ThumbsUp));
    assert_eq!(ip_and_mcp.classify(Some(&hand)).label, Some(GestureLabel::Fist));
}

#[test]
fn short_landmark_sets_are_treated_as_no_hand() {
    let points = vec![Landmark::new(0.5, 0.5, 0.0); 20];
    assert!(Hand::from_points(&points).is_none());
    let mut points = vec![Landmark::new(0.5, 0.5, 0.0); 21];
    points[7].y = f32::NAN;
    assert!(Hand::from_points(&points).is_none());
}

#[test]
fn hold_just_over_threshold_commits_once() {
    let mut session = running_session();
    let mut events = feed(&mut session, Some(GestureLabel::Peace), 0);
    events.extend(feed(&mut session, Some(GestureLabel::Peace), 801));
    assert_eq!(commits(&events), 1);
    assert_eq!(session.message().text(), "PEACE");
}

#[test]
fn hold_at_threshold_does_not_commit() {
    let mut session = running_session();
    let mut events = feed(&mut session, Some(GestureLabel::Peace), 0);
    events.extend(feed(&mut session, Some(GestureLabel::Peace), 800));
    assert_eq!(commits(&events), 0);
    assert!(session.message().is_empty());
}

#[test]
fn long_hold_commits_repeatedly() {
    let mut session = running_session();
    let mut events = Vec::new();
    for t in (0..=2_500).step_by(10) {
        events.extend(feed(&mut session, Some(GestureLabel::ThumbsUp), t));
    }
    assert_eq!(commits(&events), 3);
    assert_eq!(session.message().text(), "YES YES YES");
    assert_eq!(session.total_gestures(), 1);
}

#[test]
fn interrupted_hold_never_commits() {
    let mut session = running_session();
    let mut events = Vec::new();
    for t in (0..=700).step_by(10) {
        events.extend(feed(&mut session, Some(GestureLabel::Fist), t));
    }
    events.extend(feed(&mut session, None, 710));
    for t in (720..=1_420).step_by(10) {
        events.extend(feed(&mut session, Some(GestureLabel::Fist), t));
    }
    assert_eq!(commits(&events), 0);
    assert_eq!(session.total_gestures(), 2);
}

#[test]
fn detection_rate_uses_sliding_window() {
    let mut session = running_session();
    feed(&mut session, Some(GestureLabel::Call), 0);
    feed(&mut session, Some(GestureLabel::Call), 30_000);
    let events = feed(&mut session, Some(GestureLabel::Call), 61_000);
    assert!(events.contains(&SessionEvent::DetectionRateUpdated { per_minute: 2 }));
    assert_eq!(session.stats().detections_per_minute, 2);
}

#[test]
fn clear_resets_message_independent_of_hold() {
    let mut session = running_session();
    feed(&mut session, Some(GestureLabel::OpenPalm), 0);
    feed(&mut session, Some(GestureLabel::OpenPalm), 900);
    assert_eq!(session.words_formed(), 1);

    session.clear_message();
    let stats = session.stats();
    assert_eq!(stats.words_formed, 0);
    assert_eq!(stats.message, "");
    assert_eq!(stats.current_gesture, "HELLO");

    // Hold continues from the last commit.
    let events = feed(&mut session, Some(GestureLabel::OpenPalm), 1_710);
    assert_eq!(commits(&events), 1);
    assert_eq!(session.message().text(), "HELLO");
}

#[test]
fn stopped_session_ignores_frames_until_restarted() {
    let mut session = running_session();
    feed(&mut session, Some(GestureLabel::Rock), 0);
    session.stop();
    assert!(feed(&mut session, Some(GestureLabel::Rock), 900).is_empty());

    session.request_start().expect("restart");
    session.complete_start(Ok(())).expect("acquire");
    let events = feed(&mut session, Some(GestureLabel::Rock), 1_000);
    assert!(matches!(
        events[0],
        SessionEvent::GestureStarted {
            label: GestureLabel::Rock,
            total_gestures: 2,
            ..
        }
    ));
}

#[test]
fn frame_events_report_confidence() {
    let mut session = Session::new(SessionConfig {
        emit_frame_events: true,
        ..SessionConfig::default()
    });
    session.request_start().expect("start");
    session.complete_start(Ok(())).expect("acquire");
    let events = feed(&mut session, Some(GestureLabel::Ok), 40);
    assert_eq!(
        events[0],
        SessionEvent::FrameClassified {
            t_ms: 40,
            label: Some(GestureLabel::Ok),
            confidence: 92,
        }
    );
}
