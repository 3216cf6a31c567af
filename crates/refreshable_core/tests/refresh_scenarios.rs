//! Integration tests for the refresh state machine and store
//!
//! These tests walk whole drag gestures through the public API and verify:
//! - Percentage always follows the two measured rectangles
//! - A pull past the travel distance arms exactly one refresh
//! - Releasing mid-refresh freezes the indicator slot until completion
//! - Floating indicators are unaffected by the drag

use refreshable_core::{Rect, RectSource, RefreshConfig, RefreshMode, RefreshState, RefreshStore};
use std::sync::{Arc, Mutex};

const CONTAINER_TOP: f32 = 64.0;

fn container() -> Rect {
    Rect::new(0.0, CONTAINER_TOP, 390.0, 700.0)
}

fn marker(scroll_offset: f32) -> Rect {
    Rect::new(0.0, CONTAINER_TOP + scroll_offset, 390.0, 0.0)
}

fn mounted(mode: RefreshMode) -> RefreshState {
    let mut state = RefreshState::new(RefreshConfig::from_mode(mode).unwrap());
    state.update(RectSource::Fixed, container());
    state.update(RectSource::Moving, marker(0.0));
    state
}

/// Percentage is a pure function of the two rectangles
#[test]
fn test_percentage_matches_rectangles() {
    let mut state = RefreshState::new(RefreshConfig::normal());
    let tops = [-120.0f32, -1.0, 0.0, 13.0, 40.0, 79.0, 80.0, 81.0, 400.0];

    for &fixed_top in &tops {
        for &moving_top in &tops {
            state.update(RectSource::Fixed, Rect::new(0.0, fixed_top, 10.0, 10.0));
            state.update(RectSource::Moving, Rect::new(0.0, moving_top, 10.0, 0.0));

            let expected = ((moving_top - fixed_top) / 80.0).clamp(0.0, 1.0);
            assert_eq!(
                state.percentage(),
                expected,
                "fixed {fixed_top}, moving {moving_top}"
            );
        }
    }
}

/// Scenario A: 0, 40, 90 arms exactly once
#[test]
fn test_pull_arms_refresh_once() {
    let mut state = mounted(RefreshMode::Normal);
    let mut armed = 0;
    let mut percentages = Vec::new();

    for offset in [0.0, 40.0, 90.0] {
        let outcome = state.update(RectSource::Moving, marker(offset));
        if outcome.armed().is_some() {
            armed += 1;
        }
        percentages.push(state.percentage());
    }

    assert_eq!(percentages, vec![0.0, 0.5, 1.0]);
    assert_eq!(armed, 1);
    assert!(state.is_refreshing());
}

/// Scenario B then C: release freezes, completion plus one update unfreezes
#[test]
fn test_release_freezes_until_completion() {
    let mut state = mounted(RefreshMode::Normal);
    state.update(RectSource::Moving, marker(40.0));
    let ticket = state
        .update(RectSource::Moving, marker(90.0))
        .armed()
        .expect("pull past travel distance should arm");

    state.update(RectSource::Moving, marker(60.0));
    assert!(state.is_frozen());
    assert_eq!(state.indicator_offset(), -80.0);

    // User keeps scrolling while the refresh runs
    state.update(RectSource::Moving, marker(10.0));
    state.update(RectSource::Moving, marker(0.0));
    assert!(state.is_frozen());
    assert_eq!(state.alignment_offset(), -80.0);

    assert!(state.finish_refresh(ticket));
    assert!(!state.is_refreshing());

    state.update(RectSource::Moving, marker(0.0));
    assert!(!state.is_frozen());
    assert_eq!(state.alignment_offset(), 0.0);
}

/// Scenario D: floating indicator with custom values
#[test]
fn test_custom_floating_indicator() {
    let mut state = mounted(RefreshMode::Custom {
        travel_distance: 100.0,
        activity_offset: 50.0,
        insert_activity: false,
    });

    for offset in [10.0, 60.0, 110.0, 95.0, 30.0, 0.0] {
        state.update(RectSource::Moving, marker(offset));
        assert_eq!(state.indicator_offset(), -50.0);
        assert_eq!(state.alignment_offset(), 0.0);
    }
}

/// Navigation presets float their indicator further down
#[test]
fn test_navigation_presets_float() {
    for (mode, offset) in [
        (RefreshMode::Navigation, -160.0),
        (RefreshMode::SearchableNavigation, -240.0),
    ] {
        let mut state = mounted(mode);
        state.update(RectSource::Moving, marker(90.0));
        state.update(RectSource::Moving, marker(20.0));
        assert!(state.is_frozen());
        assert_eq!(state.indicator_offset(), offset);
        assert_eq!(state.alignment_offset(), 0.0);
    }
}

/// Repeated identical layout passes never double-fire
#[test]
fn test_duplicate_reports_do_not_refire() {
    let mut state = mounted(RefreshMode::Normal);
    state.update(RectSource::Moving, marker(90.0));
    let previous = state.previous_scroll_offset();

    for _ in 0..10 {
        let moving = state.update(RectSource::Moving, marker(90.0));
        let fixed = state.update(RectSource::Fixed, container());
        assert!(moving.armed().is_none() && fixed.armed().is_none());
    }

    assert_eq!(state.previous_scroll_offset(), previous);
    assert_eq!(state.refresh_count(), 1);
}

/// The fixed rectangle moving (e.g. a collapsing toolbar) counts as drag too
#[test]
fn test_fixed_rect_motion_changes_offset() {
    let mut state = mounted(RefreshMode::Normal);
    state.update(RectSource::Moving, marker(50.0));
    let outcome = state.update(RectSource::Fixed, container().offset(0.0, -40.0));
    assert_eq!(state.scroll_offset(), 90.0);
    assert!(outcome.armed().is_some());
}

/// Store observers see a full pull-release-complete cycle in order
#[test]
fn test_store_observes_cycle() {
    let mut store = RefreshStore::new(RefreshConfig::normal());
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    store.subscribe(move |s| sink.lock().unwrap().push((s.refreshing, s.frozen)));

    store.update(RectSource::Fixed, container());
    store.update(RectSource::Moving, marker(40.0));
    let ticket = store.update(RectSource::Moving, marker(90.0)).armed().unwrap();
    store.update(RectSource::Moving, marker(60.0));
    store.finish_refresh(ticket);
    store.update(RectSource::Moving, marker(0.0));

    let log = log.lock().unwrap();
    assert_eq!(log.first(), Some(&(false, false)));
    assert!(log.contains(&(true, false)));
    assert!(log.contains(&(true, true)));
    assert!(log.contains(&(false, true)));
    assert_eq!(log.last(), Some(&(false, false)));
}
