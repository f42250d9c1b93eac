//! Contract Test: Status Change Detection
//!
//! This test verifies that the engine reports a homework exactly when its
//! verdict differs from the last one seen.
//!
//! Constraints verified:
//! - First observation and every verdict change produce one message
//! - A repeated verdict produces no message and leaves the tracker alone
//! - Unknown verdicts are reported, never stored
//! - An empty homework list never reaches the tracker or the notifier

mod common;

use common::*;
use hwbot_core::config::CursorPolicy;
use hwbot_core::{EngineEvent, PollEngine, PollOutcome, Verdict};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn reviewing_then_approved_notifies_twice() {
    let source = ScriptedSource::new(vec![
        Ok(homework_body("hw1", "reviewing", 1_700_000_000)),
        Ok(homework_body("hw1", "approved", 1_700_000_600)),
    ]);
    let notifier = RecordingNotifier::new();

    let (mut engine, mut event_rx) = PollEngine::new(
        Box::new(source),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        minimal_config(CursorPolicy::Advance),
    )
    .expect("engine construction succeeds");

    assert_ok!(engine.run_cycle().await);
    assert_ok!(engine.run_cycle().await);

    let messages = notifier.messages();
    assert_eq!(messages.len(), 2, "one message per change, got {:?}", messages);
    assert!(messages[0].contains("\"hw1\""));
    assert!(messages[0].contains(Verdict::Reviewing.display_text()));
    assert!(messages[1].contains(Verdict::Approved.display_text()));

    let changes: Vec<_> = drain_events(&mut event_rx)
        .into_iter()
        .filter(|event| matches!(event, EngineEvent::StatusChanged { .. }))
        .collect();
    assert_eq!(
        changes,
        vec![
            EngineEvent::StatusChanged {
                homework_name: "hw1".to_string(),
                status: Verdict::Reviewing,
                previous: None,
            },
            EngineEvent::StatusChanged {
                homework_name: "hw1".to_string(),
                status: Verdict::Approved,
                previous: Some(Verdict::Reviewing),
            },
        ]
    );
    assert_eq!(engine.tracker().last_status("hw1"), Some(Verdict::Approved));
}

#[tokio::test]
async fn repeated_verdict_is_silent() {
    let source = ScriptedSource::new(vec![
        Ok(homework_body("hw1", "reviewing", 1_700_000_000)),
        Ok(homework_body("hw1", "reviewing", 1_700_000_600)),
    ]);
    let notifier = RecordingNotifier::new();

    let (mut engine, mut event_rx) = PollEngine::new(
        Box::new(source),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        minimal_config(CursorPolicy::Advance),
    )
    .expect("engine construction succeeds");

    assert_ok!(engine.run_cycle().await);
    assert_eq!(engine.tracker().len(), 1);

    assert_ok!(engine.run_cycle().await);

    // Second cycle: no chat message, tracker untouched
    assert_eq!(notifier.messages().len(), 1);
    assert_eq!(engine.tracker().len(), 1);
    assert_eq!(engine.tracker().last_status("hw1"), Some(Verdict::Reviewing));
    assert!(drain_events(&mut event_rx).contains(&EngineEvent::StatusUnchanged {
        homework_name: "hw1".to_string(),
        status: Verdict::Reviewing,
    }));
}

#[tokio::test]
async fn poll_reports_unchanged_outcome() {
    let source = ScriptedSource::new(vec![
        Ok(homework_body("hw1", "rejected", 1_700_000_000)),
        Ok(homework_body("hw1", "rejected", 1_700_000_600)),
    ]);

    let (mut engine, _event_rx) = PollEngine::new(
        Box::new(source),
        Box::new(RecordingNotifier::new()),
        minimal_config(CursorPolicy::Advance),
    )
    .expect("engine construction succeeds");

    let first = assert_ok!(engine.poll().await);
    assert!(matches!(first, PollOutcome::Changed(ref change) if change.previous.is_none()));

    let second = assert_ok!(engine.poll().await);
    assert!(matches!(second, PollOutcome::Unchanged(ref record) if record.name == "hw1"));
}

#[tokio::test]
async fn unknown_verdict_is_reported_not_stored() {
    let source = ScriptedSource::new(vec![Ok(homework_body("hw1", "archived", 1_700_000_000))]);
    let notifier = RecordingNotifier::new();

    let (mut engine, _event_rx) = PollEngine::new(
        Box::new(source),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        minimal_config(CursorPolicy::Advance),
    )
    .expect("engine construction succeeds");

    let err = assert_err!(engine.poll().await);
    assert!(matches!(err, hwbot_core::Error::UnexpectedStatus { ref status } if status == "archived"));
    assert!(engine.tracker().is_empty());

    assert_ok!(engine.run_cycle().await);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Сбой в работе программы"));
    assert!(messages[0].contains("archived"));
    assert!(engine.tracker().is_empty());
}

#[tokio::test]
async fn empty_list_skips_tracker_and_notifier() {
    let source = ScriptedSource::new(vec![Ok(empty_body(1_700_000_000))]);
    let notifier = RecordingNotifier::new();

    let (mut engine, mut event_rx) = PollEngine::new(
        Box::new(source),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        minimal_config(CursorPolicy::Advance),
    )
    .expect("engine construction succeeds");

    assert_ok!(engine.run_cycle().await);

    assert!(engine.tracker().is_empty());
    assert!(notifier.messages().is_empty());
    let events = drain_events(&mut event_rx);
    assert!(events.contains(&EngineEvent::EmptyHomeworkList));
    assert!(!events.iter().any(|e| matches!(e, EngineEvent::NotificationSent)));
}

#[tokio::test]
async fn empty_list_can_be_relayed_to_chat() {
    let source = ScriptedSource::new(vec![Ok(empty_body(1_700_000_000))]);
    let notifier = RecordingNotifier::new();

    let mut config = minimal_config(CursorPolicy::Advance);
    config.notify_on_empty = true;

    let (mut engine, _event_rx) = PollEngine::new(
        Box::new(source),
        Box::new(RecordingNotifier::sharing_counters_with(&notifier)),
        config,
    )
    .expect("engine construction succeeds");

    assert_ok!(engine.run_cycle().await);

    assert!(engine.tracker().is_empty());
    assert_eq!(notifier.messages().len(), 1);
}
