// Integration tests for attention classification
//
// These tests pin down when a tracker reading counts as looking at the
// screen, in both coordinate spaces.

mod common;

use chrono::Local;
use common::{lost, normalized, viewport};
use gaze_attention::{
    is_attending, AttentionSample, CoordinateSpace, GazePosition, TrackingConfidence,
    TrackingSample,
};
use std::time::Duration;

const TRACKED_LEVELS: [TrackingConfidence; 3] = [
    TrackingConfidence::Low,
    TrackingConfidence::Medium,
    TrackingConfidence::High,
];

const ALL_LEVELS: [TrackingConfidence; 4] = [
    TrackingConfidence::LostTracking,
    TrackingConfidence::Low,
    TrackingConfidence::Medium,
    TrackingConfidence::High,
];

fn classify(sample: &TrackingSample, space: CoordinateSpace) -> AttentionSample {
    AttentionSample::classify(sample, space, Local::now(), Duration::ZERO)
}

#[test]
fn test_lost_head_or_gaze_is_never_attending() {
    let positions = [(0.5, 0.5), (0.0, 1.0), (1.5, 0.2), (-0.2, -0.2)];

    for space in [CoordinateSpace::Pixel, CoordinateSpace::Normalized] {
        for &(x, y) in &positions {
            for &other in &ALL_LEVELS {
                let head_lost = TrackingSample::at_normalized(
                    &viewport(),
                    x,
                    y,
                    TrackingConfidence::LostTracking,
                    other,
                );
                let gaze_lost = TrackingSample::at_normalized(
                    &viewport(),
                    x,
                    y,
                    other,
                    TrackingConfidence::LostTracking,
                );

                assert!(!classify(&head_lost, space).is_attending());
                assert!(!classify(&gaze_lost, space).is_attending());
            }
        }
    }
}

#[test]
fn test_out_of_bounds_normalized_gaze_is_not_attending() {
    let outside = [
        (1.5, 0.2),
        (-0.01, 0.5),
        (0.5, 1.01),
        (0.5, -3.0),
        (2.0, 2.0),
    ];

    for &(x, y) in &outside {
        for &level in &TRACKED_LEVELS {
            let sample = normalized(x, y, level);
            assert!(
                !is_attending(&sample, CoordinateSpace::Normalized),
                "({}, {}) at {:?} should be looking away",
                x,
                y,
                level
            );
        }
    }
}

#[test]
fn test_in_bounds_tracked_normalized_gaze_is_attending() {
    let steps = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];

    for &x in &steps {
        for &y in &steps {
            for &level in &TRACKED_LEVELS {
                let sample = normalized(x, y, level);
                assert!(
                    is_attending(&sample, CoordinateSpace::Normalized),
                    "({}, {}) at {:?} should be looking",
                    x,
                    y,
                    level
                );
            }
        }
    }
}

#[test]
fn test_center_gaze_tracked_is_attending() {
    let sample = normalized(0.5, 0.5, TrackingConfidence::High);
    let classified = classify(&sample, CoordinateSpace::Normalized);

    assert!(classified.is_attending());
    assert_eq!(classified.gaze(), GazePosition::Normalized { x: 0.5, y: 0.5 });
    assert_eq!(classified.confidence(), TrackingConfidence::High);
}

#[test]
fn test_off_screen_gaze_tracked_is_not_attending() {
    let sample = normalized(1.5, 0.2, TrackingConfidence::High);

    assert!(!classify(&sample, CoordinateSpace::Normalized).is_attending());
}

#[test]
fn test_pixel_space_records_integer_screen_position() {
    let sample = normalized(0.5, 0.5, TrackingConfidence::Medium);
    let classified = classify(&sample, CoordinateSpace::Pixel);

    assert!(classified.is_attending());
    assert_eq!(classified.gaze(), GazePosition::Pixel { x: 800, y: 450 });
}

#[test]
fn test_lost_sample_keeps_position_and_confidence() {
    let classified = classify(&lost(), CoordinateSpace::Normalized);

    assert!(!classified.is_attending());
    assert_eq!(classified.confidence(), TrackingConfidence::LostTracking);
    assert_eq!(classified.head_confidence(), TrackingConfidence::LostTracking);
    assert_eq!(classified.gaze(), GazePosition::Normalized { x: 0.5, y: 0.5 });
}
