use std::time::{Duration, Instant};

use barrier_bars::config::DemoConfig;
use barrier_bars::surface::{CanvasDocument, CanvasHandle};
use barrier_bars::types::Color;
use barrier_bars::{Demo, Stage};

fn seeded(seed: u64) -> DemoConfig {
    DemoConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

fn demo(config: DemoConfig) -> (Demo<CanvasDocument>, CanvasHandle) {
    let (w, h) = config.canvas_size();
    let canvas = CanvasHandle::new(w, h);
    let doc = CanvasDocument::new().with_surface(config.canvas.clone(), canvas.clone());
    (Demo::new(config, doc).unwrap(), canvas)
}

fn total_fill(demo: &Demo<CanvasDocument>) -> u32 {
    demo.bars().iter().map(|b| b.current_fill()).sum()
}

/// Poll at every deadline until `stop` says so or the run finishes.
/// Returns the time of the last poll.
fn drive_until(
    demo: &mut Demo<CanvasDocument>,
    mut stop: impl FnMut(&Demo<CanvasDocument>) -> bool,
) -> Option<Instant> {
    let mut last = None;
    while let Some(deadline) = demo.next_deadline() {
        demo.poll(deadline).unwrap();
        last = Some(deadline);
        if stop(demo) {
            break;
        }
    }
    last
}

#[test]
fn full_run_ends_with_every_bar_at_phase_two_capacity() {
    let (mut demo, canvas) = demo(seeded(42));
    demo.pre_start().unwrap();
    demo.start(Instant::now()).unwrap();

    drive_until(&mut demo, |_| false);

    assert_eq!(demo.stage(), Some(Stage::Done));
    assert!(demo.is_finished());
    assert!(demo.next_deadline().is_none());
    assert!(demo.bars().iter().all(|b| b.current_fill() == 300 && b.max_fill() == 300));

    let canvas = canvas.borrow();
    assert_eq!(canvas.count(&Color::GREEN), 0);
    // Barrier erased between the bars, bars painted in the wait color over it.
    assert_eq!(canvas.pixel(45, 210), None);
    assert_eq!(canvas.pixel(15, 210), Some(&Color::RED));
}

#[test]
fn phase_two_carries_phase_one_fill_forward() {
    let (mut demo, _canvas) = demo(seeded(5));
    demo.start(Instant::now()).unwrap();

    drive_until(&mut demo, |d| d.stage() == Some(Stage::Pause));
    assert!(demo.bars().iter().all(|b| b.current_fill() == 200 && b.max_fill() == 200));

    drive_until(&mut demo, |d| d.stage() == Some(Stage::PhaseTwo));
    assert!(demo.bars().iter().all(|b| b.current_fill() == 200 && b.max_fill() == 300));
    assert_eq!(demo.active_bars(), 5);

    // 5 bars × 100 remaining units at 10 per tick, plus the closing tick.
    let mut ticks = 0;
    drive_until(&mut demo, |_| {
        ticks += 1;
        false
    });
    assert_eq!(ticks, 5 * 10 + 1);
}

#[test]
fn each_tick_advances_exactly_one_bar() {
    let (mut demo, _canvas) = demo(seeded(9));
    demo.start(Instant::now()).unwrap();

    for k in 1..=30 {
        let deadline = demo.next_deadline().unwrap();
        demo.poll(deadline).unwrap();
        assert_eq!(total_fill(&demo), 10 * k);
    }
}

#[test]
fn stop_leaves_nothing_able_to_fire() {
    let (mut demo, canvas) = demo(seeded(1));
    let t0 = Instant::now();
    let handle = demo.start(t0).unwrap();

    for _ in 0..7 {
        let deadline = demo.next_deadline().unwrap();
        demo.poll(deadline).unwrap();
    }
    demo.stop();
    demo.stop();

    let fills: Vec<u32> = demo.bars().iter().map(|b| b.current_fill()).collect();
    let revision = canvas.borrow().revision();
    assert!(handle.is_cancelled());
    assert_eq!(handle.live_timers(), 0);
    assert!(demo.is_finished());
    assert!(demo.next_deadline().is_none());

    for ms in (100..5_000).step_by(100) {
        demo.poll(t0 + Duration::from_millis(ms)).unwrap();
    }
    let after: Vec<u32> = demo.bars().iter().map(|b| b.current_fill()).collect();
    assert_eq!(after, fills);
    assert_eq!(canvas.borrow().revision(), revision);
}

#[test]
fn stop_during_the_pause_prevents_phase_two() {
    let (mut demo, canvas) = demo(seeded(3));
    let handle = demo.start(Instant::now()).unwrap();

    let paused_at = drive_until(&mut demo, |d| d.stage() == Some(Stage::Pause)).unwrap();
    let (recurring, deferred) = handle.timers().len();
    assert_eq!((recurring, deferred), (1, 1));
    assert_eq!(handle.live_timers(), 1);

    handle.cancel();
    let revision = canvas.borrow().revision();
    demo.poll(paused_at + Duration::from_secs(10)).unwrap();

    assert_eq!(demo.stage(), Some(Stage::Stopped));
    assert!(demo.bars().iter().all(|b| b.max_fill() == 200));
    assert_eq!(canvas.borrow().revision(), revision);
}

#[test]
fn starting_again_cancels_the_previous_run() {
    let (mut demo, _canvas) = demo(seeded(8));
    let t0 = Instant::now();
    let first = demo.start(t0).unwrap();
    for _ in 0..12 {
        let deadline = demo.next_deadline().unwrap();
        demo.poll(deadline).unwrap();
    }
    assert_eq!(total_fill(&demo), 120);

    let t1 = t0 + Duration::from_secs(2);
    let second = demo.start(t1).unwrap();

    assert!(first.is_cancelled());
    assert_eq!(first.live_timers(), 0);
    assert_eq!(second.live_timers(), 1);
    assert_eq!(total_fill(&demo), 0);
    assert_eq!(demo.stage(), Some(Stage::PhaseOne));

    // Only one controller is ticking: one bar advances per interval.
    for k in 1..=5 {
        demo.poll(t1 + Duration::from_millis(100 * k)).unwrap();
        assert_eq!(total_fill(&demo), 10 * k as u32);
    }
}

#[test]
fn same_seed_replays_the_same_run() {
    let trace = |seed| {
        let (mut demo, _canvas) = demo(seeded(seed));
        demo.start(Instant::now()).unwrap();
        let mut fills = Vec::new();
        for _ in 0..40 {
            let deadline = demo.next_deadline().unwrap();
            demo.poll(deadline).unwrap();
            fills.push(demo.bars().iter().map(|b| b.current_fill()).collect::<Vec<_>>());
        }
        fills
    };

    assert_eq!(trace(77), trace(77));
}
