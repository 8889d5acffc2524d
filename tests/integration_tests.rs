//! Integration tests for the timer engine and the configuration store.
//!
//! These tests drive a `TimerEngine` against a shared `ConfigStore` and a
//! manual clock, covering:
//! - Drift-free countdown regardless of tick timing
//! - The mode-switch and long-break cycle rule
//! - Immediate reaction to duration changes
//! - Several engines sharing one store

use std::sync::Arc;

use tokio::sync::mpsc;

use bento::config::ConfigStore;
use bento::sound::{MockSoundPlayer, SoundSource};
use bento::timer::{ManualClock, SwitchReason, TimerEngine, TimerEvent};
use bento::types::{format_time, Configuration, TimerMode};

// ============================================================================
// Test Helpers
// ============================================================================

const EPOCH_MS: u64 = 1_700_000_000_000;

struct Fixture {
    engine: TimerEngine,
    store: Arc<ConfigStore>,
    clock: Arc<ManualClock>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
}

/// Creates an engine over `config` with a manual clock.
fn create_fixture(config: Configuration) -> Fixture {
    let store = Arc::new(ConfigStore::new(config).unwrap());
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    let (tx, events) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(store.clone(), clock.clone(), tx);
    Fixture {
        engine,
        store,
        clock,
        events,
    }
}

fn default_fixture() -> Fixture {
    create_fixture(Configuration::default())
}

fn drain(events: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn mode_switches(events: &[TimerEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, TimerEvent::ModeSwitched { .. }))
        .count()
}

// ============================================================================
// Countdown
// ============================================================================

#[test]
fn test_format_time_examples() {
    assert_eq!(format_time(65), "01:05");
    assert_eq!(format_time(0), "00:00");
    assert_eq!(format_time(1500), "25:00");
}

#[test]
fn test_full_duration_without_ticks_switches_once() {
    let mut f = default_fixture();
    assert_eq!(f.engine.remaining_seconds(), 1500);
    assert!(f.engine.start());

    f.clock.advance_ms(1_500_000);
    assert_eq!(f.engine.remaining_seconds(), 0);

    let switch = f.engine.tick().expect("completion");
    assert_eq!(switch.reason, SwitchReason::Completed);
    assert!(f.engine.tick().is_none());

    assert_eq!(mode_switches(&drain(&mut f.events)), 1);
}

#[test]
fn test_stop_after_unticked_expiry_still_completes() {
    let mut f = default_fixture();
    let player = Arc::new(MockSoundPlayer::new());
    let mut engine = f.engine.with_sound(player.clone(), SoundSource::chime());
    engine.start();

    // Ticks were dropped while the target passed.
    f.clock.advance_ms(1_500_000);
    assert!(engine.stop());

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.mode, TimerMode::ShortBreak);
    assert_eq!(snapshot.formatted_time, "05:00");
    assert!(!snapshot.running);
    assert_eq!(f.store.get().completed_focus_cycles, 1);
    assert_eq!(player.play_count(), 1);

    // The next start runs the break, not an already-expired focus.
    engine.start();
    f.clock.advance_ms(1_000);
    assert!(engine.tick().is_none());
    assert_eq!(engine.remaining_seconds(), 299);

    drop(engine);
    assert_eq!(mode_switches(&drain(&mut f.events)), 1);
}

#[test]
fn test_irregular_ticks_do_not_drift() {
    let config = Configuration::from_seconds(3, 60, 120);
    let mut f = create_fixture(config);
    f.engine.start();

    let gaps = [50, 2000, 50, 300, 600];
    assert_eq!(gaps.iter().sum::<u64>(), 3000);

    let mut switched = None;
    for gap in gaps {
        f.clock.advance_ms(gap);
        if let Some(switch) = f.engine.tick() {
            switched = Some(switch);
        }
    }

    let switch = switched.expect("countdown should complete exactly at the target");
    assert_eq!(switch.from, TimerMode::Focus);
    assert_eq!(f.engine.mode(), TimerMode::ShortBreak);
    assert_eq!(f.engine.remaining_seconds(), 60);
}

#[test]
fn test_partial_second_rounds_up() {
    let mut f = default_fixture();
    f.engine.start();
    f.clock.advance_ms(1);
    f.engine.tick();
    assert_eq!(f.engine.remaining_seconds(), 1500);

    f.clock.advance_ms(999);
    f.engine.tick();
    assert_eq!(f.engine.remaining_seconds(), 1499);
}

#[test]
fn test_stop_commits_and_resume_continues() {
    let mut f = default_fixture();
    f.engine.start();
    f.clock.advance_ms(10_400);
    assert!(f.engine.stop());
    assert_eq!(f.engine.remaining_seconds(), 1490);

    // Paused time does not count.
    f.clock.advance_ms(60_000);
    assert_eq!(f.engine.remaining_seconds(), 1490);

    f.engine.start();
    f.clock.advance_ms(1_490_000);
    assert!(f.engine.tick().is_some());
}

#[test]
fn test_stop_while_paused_is_idempotent() {
    let mut f = default_fixture();
    let before = f.engine.state();
    assert!(!f.engine.stop());
    assert_eq!(f.engine.state(), before);
    assert!(drain(&mut f.events).is_empty());
}

// ============================================================================
// Cycle Rule
// ============================================================================

#[test]
fn test_fourth_focus_goes_to_long_break() {
    let config = Configuration::default().with_completed_focus_cycles(3);
    let mut f = create_fixture(config);
    f.engine.start();
    f.clock.advance_ms(1_500_000);

    let switch = f.engine.tick().unwrap();
    assert_eq!(switch.to, TimerMode::LongBreak);
    assert_eq!(f.store.get().completed_focus_cycles, 4);
    assert_eq!(f.engine.remaining_seconds(), 900);
}

#[test]
fn test_first_focus_goes_to_short_break() {
    let mut f = default_fixture();
    f.engine.start();
    f.clock.advance_ms(1_500_000);

    let switch = f.engine.tick().unwrap();
    assert_eq!(switch.to, TimerMode::ShortBreak);
    assert_eq!(f.store.get().completed_focus_cycles, 1);
}

#[test]
fn test_full_round_of_modes() {
    let mut f = create_fixture(Configuration::default().with_cycles_before_long_break(2));
    let mut visited = vec![f.engine.mode()];
    for _ in 0..4 {
        f.engine.skip();
        visited.push(f.engine.mode());
    }
    assert_eq!(
        visited,
        vec![
            TimerMode::Focus,
            TimerMode::ShortBreak,
            TimerMode::Focus,
            TimerMode::LongBreak,
            TimerMode::Focus,
        ]
    );
    assert_eq!(f.store.get().completed_focus_cycles, 2);
}

#[test]
fn test_skip_loads_full_duration_paused() {
    let mut f = default_fixture();
    f.engine.start();
    f.clock.advance_ms(200_000);

    let switch = f.engine.skip();
    assert_eq!(switch.reason, SwitchReason::Skipped);
    assert!(!f.engine.is_running());
    assert_eq!(f.engine.remaining_seconds(), 300);

    // Breaks always return to focus without counting a cycle.
    f.engine.skip();
    assert_eq!(f.engine.mode(), TimerMode::Focus);
    assert_eq!(f.store.get().completed_focus_cycles, 1);
}

#[test]
fn test_external_cycle_reset_is_respected() {
    let config = Configuration::default().with_completed_focus_cycles(3);
    let mut f = create_fixture(config);
    f.store.reset_cycles();

    let switch = f.engine.skip();
    assert_eq!(switch.to, TimerMode::ShortBreak);
    assert_eq!(switch.completed_focus_cycles, 1);
}

// ============================================================================
// Configuration Changes
// ============================================================================

#[test]
fn test_focus_duration_change_while_paused_applies_immediately() {
    let mut f = default_fixture();
    f.store.set_durations(40, 5, 15).unwrap();

    assert_eq!(f.engine.remaining_seconds(), 2400);
    assert_eq!(f.engine.snapshot().formatted_time, "40:00");
    assert!(f.engine.sync_config());
    assert!(matches!(
        drain(&mut f.events).as_slice(),
        [TimerEvent::Reset {
            mode: TimerMode::Focus,
            remaining_seconds: 2400
        }]
    ));
}

#[test]
fn test_focus_duration_change_while_running_stops_and_resets() {
    let mut f = default_fixture();
    f.engine.start();
    f.clock.advance_ms(30_000);

    f.store.set_durations(10, 5, 15).unwrap();
    assert!(!f.engine.is_running());
    assert_eq!(f.engine.remaining_seconds(), 600);
    assert!(f.engine.tick().is_none());
}

#[test]
fn test_other_mode_change_keeps_countdown() {
    let mut f = default_fixture();
    f.engine.start();
    f.clock.advance_ms(30_000);

    f.store.set_durations(25, 7, 20).unwrap();
    assert!(!f.engine.sync_config());
    assert!(f.engine.is_running());
    assert_eq!(f.engine.remaining_seconds(), 1470);

    f.engine.skip();
    assert_eq!(f.engine.remaining_seconds(), 420);
}

#[test]
fn test_rejected_input_keeps_countdown() {
    let mut f = default_fixture();
    let err = f.store.set_durations_from_input("-3", "5", "15").unwrap_err();
    assert!(err.is_invalid_duration());
    assert!(!f.engine.sync_config());
    assert_eq!(f.engine.remaining_seconds(), 1500);
}

// ============================================================================
// Shared Store
// ============================================================================

#[test]
fn test_engines_share_store_but_not_state() {
    let store = Arc::new(ConfigStore::default());
    let clock = Arc::new(ManualClock::new(EPOCH_MS));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut first = TimerEngine::new(store.clone(), clock.clone(), tx.clone());
    let mut second = TimerEngine::new(store.clone(), clock.clone(), tx);

    first.start();
    clock.advance_ms(5_000);
    assert_eq!(first.remaining_seconds(), 1495);
    assert_eq!(second.remaining_seconds(), 1500);

    second.skip();
    assert_eq!(store.get().completed_focus_cycles, 1);
    assert_eq!(first.mode(), TimerMode::Focus);
    assert!(first.is_running());
}

// ============================================================================
// Completion Sound
// ============================================================================

#[test]
fn test_sound_failure_never_stops_the_timer() {
    let mut f = default_fixture();
    let player = Arc::new(MockSoundPlayer::new());
    player.set_should_fail(true);
    let mut engine = f.engine.with_sound(player.clone(), SoundSource::chime());

    engine.start();
    f.clock.advance_ms(1_500_000);
    assert!(engine.tick().is_some());
    assert_eq!(engine.mode(), TimerMode::ShortBreak);

    player.set_should_fail(false);
    engine.start();
    f.clock.advance_ms(300_000);
    assert!(engine.tick().is_some());
    assert_eq!(player.play_count(), 1);

    drop(engine);
    assert_eq!(mode_switches(&drain(&mut f.events)), 2);
}
