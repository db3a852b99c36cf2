//! End-to-end scenarios for the hysteresis/debounce controller,
//! driven through the event queue vocabulary the wake loop uses.

use dripgate::app::events::AppEvent;
use dripgate::app::service::AppService;
use dripgate::config::SystemConfig;
use dripgate::control::evaluator::ArmedEdge;
use dripgate::control::ValveState;
use dripgate::events::Event;

use crate::mock_hw::{MockHardware, RecordingSink};

/// Short dwell so scenarios stay readable: 24 s at 8 s ticks = 3 ticks.
fn test_config() -> SystemConfig {
    let mut config = SystemConfig::default();
    config.debounce_delay_secs = 24;
    config.wake_period_secs = 8;
    config
}

/// Boot the service against the mock: seeds thresholds from the mock's
/// reference reading, then runs the startup probe.
fn boot(hw: &mut MockHardware, sink: &mut RecordingSink) -> AppService {
    let first_reference = {
        use dripgate::app::ports::SensorPort;
        hw.read_reference()
    };
    let mut service = AppService::new(test_config(), first_reference);
    service.start(hw, sink);
    service
}

// ── Startup probe ─────────────────────────────────────────────

#[test]
fn boot_dry_opens_and_watches_wet_edge() {
    let mut hw = MockHardware::new(250, 300);
    let mut sink = RecordingSink::new();
    let service = boot(&mut hw, &mut sink);

    assert_eq!(service.valve_state(), ValveState::Open);
    assert_eq!(service.armed(), ArmedEdge::Rising);
    assert_eq!(hw.writes, vec![true]);
    assert!(matches!(
        sink.events.first(),
        Some(AppEvent::Started {
            state: ValveState::Open,
            armed: ArmedEdge::Rising,
            ..
        })
    ));
}

#[test]
fn boot_wet_stays_closed_and_watches_dry_edge() {
    let mut hw = MockHardware::new(700, 300);
    let mut sink = RecordingSink::new();
    let service = boot(&mut hw, &mut sink);

    assert_eq!(service.valve_state(), ValveState::Closed);
    assert_eq!(service.armed(), ArmedEdge::Falling);
    // The pin already sits low from init: zero writes at boot.
    assert_eq!(hw.write_count(), 0);
}

#[test]
fn thresholds_seeded_from_first_reference_reading() {
    let mut hw = MockHardware::new(250, 300);
    let mut sink = RecordingSink::new();
    let service = boot(&mut hw, &mut sink);

    let pair = service.thresholds();
    assert_eq!(pair.low, 300);
    assert_eq!(pair.high, 303); // 300 inflated by 1 %
}

// ── Edge-triggered steady state ───────────────────────────────

#[test]
fn edge_events_toggle_valve_and_alternate_armed_direction() {
    let mut hw = MockHardware::new(250, 300);
    let mut sink = RecordingSink::new();
    let mut service = boot(&mut hw, &mut sink);

    // Soil wets up past the band: close, watch for drying.
    service.handle_event(Event::EdgeRising, &mut hw, &mut sink);
    assert_eq!(service.valve_state(), ValveState::Closed);
    assert_eq!(service.armed(), ArmedEdge::Falling);
    assert_eq!(sink.closed_count(), 1);

    // Let the dwell fully elapse before the next dry spell.
    for _ in 0..3 {
        service.handle_event(Event::WakeTick, &mut hw, &mut sink);
    }

    // The recheck on gate release already reopened (moisture still 250).
    assert_eq!(service.valve_state(), ValveState::Open);
    assert_eq!(hw.writes, vec![true, false, true]);
}

#[test]
fn dry_edge_during_dwell_is_suppressed_then_recovered() {
    let mut hw = MockHardware::new(250, 300);
    let mut sink = RecordingSink::new();
    let mut service = boot(&mut hw, &mut sink);

    hw.moisture = 400;
    service.handle_event(Event::EdgeRising, &mut hw, &mut sink); // close, dwell = 3

    // Dry again immediately: the edge fires but the gate holds it.
    hw.moisture = 250;
    service.handle_event(Event::EdgeFalling, &mut hw, &mut sink);
    assert_eq!(service.valve_state(), ValveState::Closed);
    assert_eq!(sink.suppressed_count(), 1);

    // Two ticks: gate still up, nothing moves.
    service.handle_event(Event::WakeTick, &mut hw, &mut sink);
    service.handle_event(Event::WakeTick, &mut hw, &mut sink);
    assert_eq!(service.valve_state(), ValveState::Closed);

    // Third tick releases the gate; the recheck sees 250 < 300 → open.
    service.handle_event(Event::WakeTick, &mut hw, &mut sink);
    assert_eq!(service.valve_state(), ValveState::Open);
    // The boot probe announces itself via Started, so this is the only
    // ValveOpened in the run.
    assert_eq!(sink.opened_count(), 1);
}

#[test]
fn gate_release_leaves_valve_closed_when_soil_rewetted() {
    let mut hw = MockHardware::new(250, 300);
    let mut sink = RecordingSink::new();
    let mut service = boot(&mut hw, &mut sink);

    hw.moisture = 400;
    service.handle_event(Event::EdgeRising, &mut hw, &mut sink); // close

    hw.moisture = 250;
    service.handle_event(Event::EdgeFalling, &mut hw, &mut sink); // suppressed

    // Rain during the dwell.
    hw.moisture = 500;
    for _ in 0..3 {
        service.handle_event(Event::WakeTick, &mut hw, &mut sink);
    }
    assert_eq!(service.valve_state(), ValveState::Closed);
    assert_eq!(hw.writes, vec![true, false]); // no third write
}

#[test]
fn duplicate_edge_events_produce_one_write() {
    let mut hw = MockHardware::new(700, 300);
    let mut sink = RecordingSink::new();
    let mut service = boot(&mut hw, &mut sink); // closed

    hw.moisture = 250;
    service.handle_event(Event::EdgeFalling, &mut hw, &mut sink);
    service.handle_event(Event::EdgeFalling, &mut hw, &mut sink); // replayed
    assert_eq!(service.valve_state(), ValveState::Open);
    assert_eq!(hw.write_count(), 1);
    assert_eq!(sink.opened_count(), 1);
}

// ── Sample-triggered steady state ─────────────────────────────

#[test]
fn sample_sequence_matches_reference_scenario() {
    // low=300, high=303; moisture 250 → 310 → 200(gated) → 200.
    // Exactly two hardware writes across the post-probe sequence.
    let mut hw = MockHardware::new(250, 300);
    let mut sink = RecordingSink::new();
    let mut service = boot(&mut hw, &mut sink); // probe opens
    let writes_at_probe = hw.write_count();

    hw.moisture = 310; // >= high: close
    service.handle_event(Event::MoistureChanged, &mut hw, &mut sink);
    assert_eq!(service.valve_state(), ValveState::Closed);

    hw.moisture = 200; // dry, but the gate is up
    service.handle_event(Event::MoistureChanged, &mut hw, &mut sink);
    assert_eq!(service.valve_state(), ValveState::Closed);

    for _ in 0..3 {
        service.handle_event(Event::WakeTick, &mut hw, &mut sink);
    }

    assert_eq!(service.valve_state(), ValveState::Open);
    assert_eq!(hw.write_count() - writes_at_probe, 2);
}

#[test]
fn sample_changes_inside_band_are_noops() {
    let mut hw = MockHardware::new(250, 300);
    let mut sink = RecordingSink::new();
    let mut service = boot(&mut hw, &mut sink); // open

    for m in [301, 302, 300] {
        hw.moisture = m;
        service.handle_event(Event::MoistureChanged, &mut hw, &mut sink);
    }
    assert_eq!(service.valve_state(), ValveState::Open);
    assert_eq!(hw.write_count(), 1); // just the probe's open
}

// ── Reference updates ─────────────────────────────────────────

#[test]
fn reference_change_applies_to_next_event_only() {
    let mut hw = MockHardware::new(400, 300);
    let mut sink = RecordingSink::new();
    let mut service = boot(&mut hw, &mut sink); // wet vs 300 → closed
    let armed_before = service.armed();

    // Pot turned up to 500: new pair in effect, armed direction kept.
    hw.reference = 500;
    service.handle_event(Event::ReferenceChanged, &mut hw, &mut sink);
    assert_eq!(service.thresholds().low, 500);
    assert_eq!(service.armed(), armed_before);
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::ThresholdsChanged { low: 500, high: 505 })
    ));

    // The same 400 now reads as dry on the next event.
    service.handle_event(Event::MoistureChanged, &mut hw, &mut sink);
    assert_eq!(service.valve_state(), ValveState::Open);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_emitted_at_configured_cadence() {
    let mut hw = MockHardware::new(700, 300);
    let mut sink = RecordingSink::new();
    let mut config = test_config();
    config.telemetry_interval_ticks = 4;

    let mut service = AppService::new(config, 300);
    service.start(&mut hw, &mut sink);

    for _ in 0..8 {
        service.handle_event(Event::WakeTick, &mut hw, &mut sink);
    }
    assert_eq!(sink.telemetry_count(), 2);

    let Some(AppEvent::Telemetry(t)) = sink
        .events
        .iter()
        .find(|e| matches!(e, AppEvent::Telemetry(_)))
    else {
        panic!("telemetry event missing");
    };
    assert_eq!(t.state, ValveState::Closed);
    assert_eq!(t.low, 300);
    assert_eq!(t.high, 303);
}
