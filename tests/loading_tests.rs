// Host-side tests for preload tracking.

#![allow(dead_code)]
mod common;

use common::core::loading::{LoadProgress, LoadTracker};

#[test]
fn completes_once_every_load_settles() {
    let mut t = LoadTracker::default();
    for _ in 0..3 {
        t.begin();
    }
    assert_eq!(t.finish(true), LoadProgress::Pending { finished: 1, total: 3 });
    assert_eq!(t.finish(false), LoadProgress::Pending { finished: 2, total: 3 });
    assert!(!t.is_complete());
    assert_eq!(t.finish(true), LoadProgress::Complete { failed: 1 });
    assert!(t.is_complete());
    assert_eq!(t.failed(), 1);
}

#[test]
fn completion_is_reported_only_once() {
    let mut t = LoadTracker::default();
    t.begin();
    assert_eq!(t.finish(true), LoadProgress::Complete { failed: 0 });
    // A stray finish does not re-trigger completion.
    assert!(matches!(t.finish(true), LoadProgress::Pending { .. }));
    assert_eq!(t.finished(), 1);
}

#[test]
fn all_failures_still_complete() {
    let mut t = LoadTracker::default();
    for _ in 0..9 {
        t.begin();
    }
    let mut last = None;
    for _ in 0..9 {
        last = Some(t.finish(false));
    }
    assert_eq!(last, Some(LoadProgress::Complete { failed: 9 }));
}

#[test]
fn idle_tracker_completes_immediately() {
    let mut t = LoadTracker::default();
    assert!(t.complete_if_idle());
    assert!(!t.complete_if_idle());
    assert!(t.is_complete());

    let mut busy = LoadTracker::default();
    busy.begin();
    assert!(!busy.complete_if_idle());
}
