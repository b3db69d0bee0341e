// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace instrumentation across a full scan timeline.
//!
//! These tests require `scanwave_core`'s `trace` feature, which this crate's
//! dev-dependencies enable.

use glam::DVec3;

use scanwave_core::config::ScanConfig;
use scanwave_core::manager::ScanManager;
use scanwave_core::provider::EquippedModule;
use scanwave_core::time::{Duration, HostTime};
use scanwave_harness::{PointResult, RecordingSink, ScriptedProvider};

fn test_config() -> ScanConfig {
    ScanConfig {
        chunk_size: 16,
        reference_view_distance: 8,
        view_distance: 8,
        initial_radius: 2.0,
        time_offset: Duration(200),
        collection_ticks: 4,
        growth_duration: Duration(2000),
        stay_duration: Duration(10_000),
        base_scan_radius: 64.0,
    }
}

#[test]
fn full_timeline_emits_one_event_per_stage() {
    let provider = ScriptedProvider::new();
    provider.queue_tick(vec![
        PointResult::at(5.0, 0.0, 0.0),
        PointResult::at(50.0, 0.0, 0.0),
        PointResult::at(120.0, 0.0, 0.0),
    ]);
    provider.mark_invalid(DVec3::new(5.0, 0.0, 0.0));

    let sink = RecordingSink::new();
    let mut manager = ScanManager::new(test_config());
    manager.set_trace_sink(Box::new(sink.clone()));

    manager.begin_scan(DVec3::ZERO, &[EquippedModule::scanner(provider.clone())]);
    assert_eq!(sink.counts().scan_begins, 1);

    // Two ticked rounds, then a finish that drains the rest silently.
    manager.update_scan(DVec3::ZERO, false, HostTime(0));
    manager.update_scan(DVec3::ZERO, false, HostTime(0));
    manager.update_scan(DVec3::ZERO, true, HostTime(0));

    let counts = sink.counts();
    assert_eq!(counts.collect_ticks, 2, "only ticked rounds trace");
    assert_eq!(counts.scan_completes, 1);
    assert_eq!(counts.clears, 1, "finish tears down the previous timeline");

    // Full radius in one jump: two reveal, one dropped by the re-check.
    manager.tick(HostTime(2000));
    let counts = sink.counts();
    assert_eq!(counts.reveals, 1);
    assert_eq!(counts.revealed_total, 2);
    assert_eq!(counts.dropped_total, 1);

    // Decay: 2 → 1 → 0, then the timeline clears.
    manager.tick(HostTime(10_100));
    manager.tick(HostTime(10_200));
    let counts = sink.counts();
    assert_eq!(counts.decays, 2);
    assert_eq!(counts.clears, 2, "idle transition traces a clear");
}

#[test]
fn reveal_ticks_with_empty_pending_emit_nothing() {
    let provider = ScriptedProvider::new();
    provider.queue_tick(vec![PointResult::at(5.0, 0.0, 0.0)]);

    let sink = RecordingSink::new();
    let mut manager = ScanManager::new(test_config());
    manager.set_trace_sink(Box::new(sink.clone()));

    manager.begin_scan(DVec3::ZERO, &[EquippedModule::scanner(provider.clone())]);
    manager.update_scan(DVec3::ZERO, true, HostTime(0));

    manager.tick(HostTime(2000));
    assert_eq!(sink.counts().reveals, 1);

    // Pending is drained; further in-window ticks are silent.
    manager.tick(HostTime(3000));
    manager.tick(HostTime(4000));
    assert_eq!(sink.counts().reveals, 1);
    assert_eq!(sink.counts().decays, 0);
}
