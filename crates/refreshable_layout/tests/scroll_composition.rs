//! Integration tests for the refreshable scroll composition
//!
//! These tests drive the container the way a renderer would: probes report
//! geometry every frame, the controller drains its queue, and `render`
//! produces the layout for the next frame.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use refreshable_layout::prelude::*;
use tokio::sync::Notify;

const TOP: f32 = 88.0;
const WIDTH: f32 = 390.0;

struct Frame {
    fixed: BoundsReader,
    moving: BoundsReader,
}

impl Frame {
    fn new(scroll: &RefreshableScroll, controller: &RefreshController) -> Self {
        let (fixed, moving) = scroll.bounds_readers(controller);
        Self { fixed, moving }
    }

    /// One layout pass with the content dragged `offset` points down
    fn layout(&mut self, controller: &mut RefreshController, offset: f32) {
        self.fixed.report(Rect::new(0.0, TOP, WIDTH, 600.0)).unwrap();
        self.moving
            .report(Rect::new(0.0, TOP + offset, WIDTH, 0.0))
            .unwrap();
        controller.process_pending().unwrap();
    }
}

fn gated(calls: Arc<AtomicUsize>, gate: Arc<Notify>) -> RefreshAction {
    RefreshAction::new(move || {
        let calls = calls.clone();
        let gate = gate.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
            Ok(())
        }
    })
}

#[tokio::test]
async fn test_inline_indicator_pushes_content_while_frozen() {
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());
    let scroll = RefreshableScroll::new();
    let mut controller = scroll.mount().unwrap();
    let env = RefreshEnvironment::new().with_action(gated(calls.clone(), gate.clone()));
    let mut frame = Frame::new(&scroll, &controller);

    for offset in [0.0, 30.0, 60.0] {
        frame.layout(&mut controller, offset);
        let layout = scroll.render(&mut controller, &env);
        assert_eq!(layout.content_offset_y, 0.0);
        assert_eq!(layout.indicator.offset_y, -offset);
    }

    // Past the travel distance: armed and fully faded in
    frame.layout(&mut controller, 95.0);
    let layout = scroll.render(&mut controller, &env);
    assert!(layout.indicator.animating);
    assert_eq!(layout.indicator.opacity, 1.0);

    // Released: slot held open above the content
    frame.layout(&mut controller, 40.0);
    let layout = scroll.render(&mut controller, &env);
    assert_eq!(layout.content_offset_y, 80.0);
    assert_eq!(layout.indicator.offset_y, -80.0);
    assert_eq!(layout.indicator.frame(TOP, WIDTH), Rect::new(0.0, 8.0, WIDTH, 80.0));

    gate.notify_one();
    controller.wait_until_idle().await.unwrap();
    frame.layout(&mut controller, 0.0);
    let layout = scroll.render(&mut controller, &env);
    assert_eq!(layout.content_offset_y, 0.0);
    assert!(!layout.indicator.animating);
    assert!(!layout.indicator.is_visible());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_navigation_indicator_floats() {
    let gate = Arc::new(Notify::new());
    let scroll = RefreshableScroll::new().mode(RefreshMode::Navigation);
    let mut controller = scroll.mount().unwrap();
    let env = RefreshEnvironment::new().with_action(gated(Arc::default(), gate.clone()));
    let mut frame = Frame::new(&scroll, &controller);

    for offset in [0.0, 50.0, 95.0, 20.0] {
        frame.layout(&mut controller, offset);
        let layout = scroll.render(&mut controller, &env);
        assert_eq!(layout.content_offset_y, 0.0);
        assert_eq!(layout.indicator.offset_y, -160.0);
    }
    assert!(controller.snapshot().frozen);

    gate.notify_one();
    controller.wait_until_idle().await.unwrap();
}

#[tokio::test]
async fn test_pull_while_searching_does_not_run_action() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let scroll = RefreshableScroll::new().mode(RefreshMode::SearchableNavigation);
    let mut controller = scroll.mount().unwrap();
    let env = RefreshEnvironment::new()
        .with_action(RefreshAction::infallible(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }))
        .searching(true);
    let mut frame = Frame::new(&scroll, &controller);

    let layout = scroll.render(&mut controller, &env);
    assert!(!layout.scroll_enabled);

    // Geometry still flows; the refresh completes without an action
    frame.layout(&mut controller, 0.0);
    frame.layout(&mut controller, 100.0);
    assert!(controller.snapshot().refreshing);
    controller.wait_until_idle().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!controller.snapshot().refreshing);
}
