// Host-side tests for the rolling frequency history.

#![allow(dead_code)]
mod common;

use common::core::error::VizError;
use common::core::history::FrequencyHistory;

fn filled(len: usize) -> FrequencyHistory {
    let mut h = FrequencyHistory::new(len);
    let seed: Vec<u8> = (0..len as u8).map(|i| i.wrapping_mul(7).wrapping_add(3)).collect();
    h.update(&seed).unwrap();
    h
}

#[test]
fn new_history_is_silent() {
    let h = FrequencyHistory::new(320);
    assert_eq!(h.len(), 320);
    assert!(h.as_slice().iter().all(|&v| v == 0));
    assert_eq!(h.peak(), 0);
    assert_eq!(h.mean(), 0.0);
}

#[test]
fn update_shifts_right_and_writes_front() {
    let len = 24;
    for n in 0..=len {
        let mut h = filled(len);
        let before = h.as_slice().to_vec();
        let frame: Vec<u8> = (0..n).map(|i| 200 + (i % 50) as u8).collect();
        h.update(&frame).unwrap();
        let after = h.as_slice();
        assert_eq!(&after[..n], &frame[..], "front for n={n}");
        for i in n..len {
            assert_eq!(after[i], before[i - n], "shifted slot {i} for n={n}");
        }
    }
}

#[test]
fn oversize_frame_is_rejected_without_touching_history() {
    let mut h = filled(16);
    let before = h.clone();
    let err = h.update(&[1u8; 17]).unwrap_err();
    assert_eq!(
        err,
        VizError::ConfigurationMismatch {
            expected: 16,
            actual: 17
        }
    );
    assert_eq!(h, before);
}

#[test]
fn zero_frames_converge_to_silence() {
    let len = 320;
    let n = 32;
    let mut h = FrequencyHistory::new(len);
    h.update(&vec![255u8; len]).unwrap();
    assert_eq!(h.peak(), 255);

    let needed = len.div_ceil(n);
    for _ in 0..needed - 1 {
        h.update(&vec![0u8; n]).unwrap();
    }
    // One frame short: the oldest loud block is still in the tail
    assert_eq!(h.as_slice()[len - 1], 255);
    h.update(&vec![0u8; n]).unwrap();
    assert!(h.as_slice().iter().all(|&v| v == 0));
}

#[test]
fn uneven_frame_sizes_still_converge() {
    let len = 10;
    let n = 3;
    let mut h = filled(len);
    for _ in 0..len.div_ceil(n) {
        h.update(&[0u8; 3]).unwrap();
    }
    assert_eq!(h.peak(), 0);
}

#[test]
fn empty_frame_is_a_no_op() {
    let mut h = filled(8);
    let before = h.clone();
    h.update(&[]).unwrap();
    assert_eq!(h, before);
}

#[test]
fn peak_and_mean_summarize_contents() {
    let mut h = FrequencyHistory::new(4);
    h.update(&[10, 20, 30, 40]).unwrap();
    assert_eq!(h.peak(), 40);
    assert!((h.mean() - 25.0).abs() < 1e-6);
}
