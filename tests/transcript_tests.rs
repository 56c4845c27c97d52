use livescribe::TranscriptAccumulator;

#[test]
fn test_update_replaces_previous_snapshot() {
    let accumulator = TranscriptAccumulator::new();

    accumulator.update("a b".to_string());
    assert_eq!(accumulator.current(), "a b");

    // A later snapshot replaces the earlier one; nothing is appended.
    accumulator.update("c".to_string());
    assert_eq!(accumulator.current(), "c");
}

#[test]
fn test_starts_empty_and_resets_empty() {
    let accumulator = TranscriptAccumulator::new();
    assert_eq!(accumulator.current(), "");
    assert!(accumulator.snapshot().last_updated.is_none());

    accumulator.update("something".to_string());
    assert!(accumulator.snapshot().last_updated.is_some());

    accumulator.reset();
    assert_eq!(accumulator.current(), "");
    assert!(accumulator.snapshot().last_updated.is_none());
}

#[tokio::test]
async fn test_subscribers_observe_updates() {
    let accumulator = TranscriptAccumulator::new();
    let mut rx = accumulator.subscribe();

    accumulator.update("hello".to_string());

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().text, "hello");
}
