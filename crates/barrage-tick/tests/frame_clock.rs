//! Integration tests for the frame and step clocks.
//!
//! Real-time tests run on Tokio's paused clock so `sleep_until` resolves
//! as soon as virtual time reaches the deadline.

use std::time::Duration;

use barrage_tick::{FrameClock, MAX_TIME_SCALE, StepClock, TickConfig, TickPolicy};
use barrage_timer::Timer;

// =========================================================================
// Helpers
// =========================================================================

fn config_20hz() -> TickConfig {
    TickConfig::with_rate(20)
}

// =========================================================================
// TickConfig
// =========================================================================

#[test]
fn test_default_config_is_60hz_real_time() {
    let cfg = TickConfig::default();
    assert_eq!(cfg.tick_rate_hz, 60);
    assert_eq!(cfg.time_scale, 1.0);
    assert_eq!(cfg.policy, TickPolicy::Skip);
}

#[test]
fn test_with_rate_sets_duration() {
    let cfg = TickConfig::with_rate(20);
    assert_eq!(cfg.tick_duration(), Duration::from_millis(50));
}

#[test]
fn test_rate_above_max_is_clamped() {
    let clock = FrameClock::new(TickConfig::with_rate(10_000));
    assert_eq!(clock.tick_rate_hz(), TickConfig::MAX_TICK_RATE_HZ);
}

// =========================================================================
// Frame clock
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_for_tick_fires_and_increments() {
    let mut clock = FrameClock::new(config_20hz());

    let info = clock.wait_for_tick().await;
    assert_eq!(info.tick, 1);
    assert_eq!(info.dt, Duration::from_millis(50));
    assert!(!info.overrun);
    assert_eq!(info.ticks_skipped, 0);
    assert_eq!(info.delta.scaled, 0.05);
    assert_eq!(info.delta.unscaled, 0.05);
    assert_eq!(clock.tick_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_multiple_ticks_increment_monotonically() {
    let mut clock = FrameClock::new(config_20hz());
    for expected in 1..=5 {
        let info = clock.wait_for_tick().await;
        assert_eq!(info.tick, expected);
    }
    assert_eq!(clock.metrics().total_ticks, 5);
}

#[tokio::test(start_paused = true)]
async fn test_time_scale_splits_delta() {
    let mut clock = FrameClock::new(config_20hz());
    clock.set_time_scale(0.0);

    let info = clock.wait_for_tick().await;
    assert_eq!(info.delta.scaled, 0.0);
    assert_eq!(info.delta.unscaled, 0.05);

    clock.set_time_scale(2.0);
    let info = clock.wait_for_tick().await;
    assert_eq!(info.delta.scaled, 0.1);
}

#[test]
fn test_time_scale_is_clamped() {
    let mut clock = StepClock::new(20);
    clock.set_time_scale(100.0);
    assert_eq!(clock.time_scale(), MAX_TIME_SCALE);
    clock.set_time_scale(-3.0);
    assert_eq!(clock.time_scale(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_pause_prevents_ticks() {
    let mut clock = FrameClock::new(config_20hz());
    clock.wait_for_tick().await;

    clock.pause();
    assert!(clock.is_paused());
    let result = tokio::time::timeout(Duration::from_secs(1), clock.wait_for_tick()).await;
    assert!(result.is_err(), "paused clock should pend");
}

#[tokio::test(start_paused = true)]
async fn test_resume_allows_ticks_again() {
    let mut clock = FrameClock::new(config_20hz());
    clock.wait_for_tick().await;
    clock.pause();
    clock.pause();
    clock.resume();
    clock.resume();
    assert!(!clock.is_paused());

    let info = clock.wait_for_tick().await;
    assert_eq!(info.tick, 2);
}

#[tokio::test(start_paused = true)]
async fn test_record_tick_end_without_wait_is_noop() {
    let mut clock = FrameClock::new(config_20hz());
    clock.record_tick_end();
    assert_eq!(clock.metrics().total_ticks, 0);
    assert_eq!(clock.metrics().max_tick_time, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_metrics_disabled_skips_avg_update() {
    let mut clock = FrameClock::new(TickConfig {
        metrics_enabled: false,
        ..config_20hz()
    });

    clock.wait_for_tick().await;
    std::thread::sleep(Duration::from_micros(50));
    clock.record_tick_end();

    assert_eq!(clock.metrics().avg_tick_time, Duration::ZERO);
    assert_eq!(clock.metrics().max_tick_time, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_skip_policy_reports_skipped_ticks() {
    let mut clock = FrameClock::new(config_20hz());
    clock.wait_for_tick().await;

    // Simulate a stalled frame: virtual time jumps three ticks past the deadline.
    tokio::time::advance(Duration::from_millis(200)).await;
    let info = clock.wait_for_tick().await;

    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 3);
    assert_eq!(clock.metrics().total_overruns, 1);
}

#[tokio::test(start_paused = true)]
async fn test_catchup_policy_normal_tick() {
    let mut clock = FrameClock::new(TickConfig {
        policy: TickPolicy::CatchUp { max_catchup: 3 },
        ..config_20hz()
    });

    let info = clock.wait_for_tick().await;
    assert!(!info.overrun);
    assert_eq!(info.ticks_skipped, 0);
}

// =========================================================================
// Step clock
// =========================================================================

#[test]
fn test_step_clock_is_deterministic() {
    let mut a = StepClock::new(50);
    let mut b = StepClock::new(50);
    for _ in 0..100 {
        assert_eq!(a.step(), b.step());
    }
    assert_eq!(a.tick_count(), 100);
}

#[test]
fn test_step_clock_drives_timers() {
    let mut clock = StepClock::new(10);
    let mut timer = Timer::new().with_interval(1.0).started();

    let mut fired_at = None;
    for _ in 0..20 {
        let info = clock.step();
        if timer.advance_frame(info.delta) {
            fired_at = Some(info.tick);
            break;
        }
    }
    assert_eq!(fired_at, Some(10));
}

#[test]
fn test_unscaled_timer_runs_while_frozen() {
    let mut clock = StepClock::new(10);
    clock.set_time_scale(0.0);
    let mut game = Timer::new().with_interval(0.5).started();
    let mut menu = Timer::new().with_interval(0.5).unscaled().started();

    let mut menu_fired = false;
    for _ in 0..10 {
        let delta = clock.step().delta;
        assert!(!game.advance_frame(delta));
        menu_fired |= menu.advance_frame(delta);
    }
    assert!(menu_fired);
    assert_eq!(game.elapsed(), 0.0);
    assert_eq!(clock.scaled_seconds(), 0.0);
}
