// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable scripted providers and recording doubles for scan tests.
//!
//! Everything here is deterministic and clock-free: [`ScriptedProvider`]
//! emits pre-queued results tick by tick, [`StepClock`] advances only when
//! told to, and the recording types capture what the core called so tests
//! can assert on it.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::DVec3;
use parking_lot::Mutex;

use scanwave_core::bounds::Aabb;
use scanwave_core::manager::ScanListener;
use scanwave_core::provider::{EmitFn, ScanResultProvider};
use scanwave_core::result::ScanResult;
use scanwave_core::time::{Duration, HostTime};
use scanwave_core::trace::{
    CollectTickEvent, CullEvent, DecayEvent, RevealEvent, ScanBeginEvent, ScanCompleteEvent,
    TraceSink,
};

/// A plain position-plus-bounds scan result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointResult {
    /// World-space position.
    pub position: DVec3,
    /// Optional render bounds.
    pub bounds: Option<Aabb>,
}

impl PointResult {
    /// A boundless result at the given coordinates.
    #[must_use]
    pub const fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: DVec3::new(x, y, z),
            bounds: None,
        }
    }

    /// Attaches a cubic render bounds of the given half extent.
    #[must_use]
    pub fn with_bounds(mut self, half_extent: f64) -> Self {
        self.bounds = Some(Aabb::from_center_half_extent(self.position, half_extent));
        self
    }
}

impl ScanResult for PointResult {
    fn position(&self) -> DVec3 {
        self.position
    }

    fn render_bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }
}

/// What a provider was initialized with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitRecord {
    /// Scan origin.
    pub origin: DVec3,
    /// Scan radius, module bonuses included.
    pub radius: f64,
    /// Collection tick budget.
    pub duration_ticks: u32,
}

/// One recorded `render` call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRecord {
    /// Interpolated viewer position the batch was submitted with.
    pub viewer: DVec3,
    /// Partial-tick fraction of the frame.
    pub partial_ticks: f32,
    /// Positions of the results in the batch, in submission order.
    pub batch: Vec<DVec3>,
}

/// A provider that emits pre-queued results, one queued batch per
/// collection tick, and records every lifecycle call.
///
/// Positions registered via [`mark_invalid`](Self::mark_invalid) fail the
/// reveal-time validity re-check.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Vec<PointResult>>>,
    invalid: Mutex<Vec<DVec3>>,
    init: Mutex<Option<InitRecord>>,
    resets: AtomicU32,
    compute_calls: AtomicU32,
    renders: Mutex<Vec<RenderRecord>>,
}

impl ScriptedProvider {
    /// Creates a provider with an empty script.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a batch of results to emit on the next unconsumed tick.
    pub fn queue_tick(&self, results: Vec<PointResult>) {
        self.script.lock().push_back(results);
    }

    /// Marks a position as stale: results there fail `is_valid`.
    pub fn mark_invalid(&self, position: DVec3) {
        self.invalid.lock().push(position);
    }

    /// The most recent `initialize` call, if any.
    #[must_use]
    pub fn last_init(&self) -> Option<InitRecord> {
        *self.init.lock()
    }

    /// Number of `reset` calls so far.
    #[must_use]
    pub fn reset_count(&self) -> u32 {
        self.resets.load(Ordering::Relaxed)
    }

    /// Number of `compute_scan_results` calls so far.
    #[must_use]
    pub fn compute_call_count(&self) -> u32 {
        self.compute_calls.load(Ordering::Relaxed)
    }

    /// All recorded `render` calls so far.
    #[must_use]
    pub fn render_records(&self) -> Vec<RenderRecord> {
        self.renders.lock().clone()
    }
}

impl ScanResultProvider for ScriptedProvider {
    fn initialize(&self, origin: DVec3, radius: f64, duration_ticks: u32) {
        *self.init.lock() = Some(InitRecord {
            origin,
            radius,
            duration_ticks,
        });
    }

    fn compute_scan_results(&self, emit: &mut EmitFn<'_>) {
        self.compute_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(batch) = self.script.lock().pop_front() {
            for result in batch {
                emit(Box::new(result));
            }
        }
    }

    fn is_valid(&self, result: &dyn ScanResult) -> bool {
        let position = result.position();
        !self
            .invalid
            .lock()
            .iter()
            .any(|p| p.abs_diff_eq(position, 1e-9))
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    fn render(&self, viewer: DVec3, partial_ticks: f32, batch: &[&dyn ScanResult]) {
        self.renders.lock().push(RenderRecord {
            viewer,
            partial_ticks,
            batch: batch.iter().map(|r| r.position()).collect(),
        });
    }
}

impl core::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("queued_ticks", &self.script.lock().len())
            .field("compute_calls", &self.compute_call_count())
            .field("resets", &self.reset_count())
            .finish_non_exhaustive()
    }
}

/// A [`ScanListener`] that records completion centers behind a shared handle.
#[derive(Clone, Debug, Default)]
pub struct RecordingListener {
    completions: Arc<Mutex<Vec<DVec3>>>,
}

impl RecordingListener {
    /// Creates an empty listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded completion centers, oldest first.
    #[must_use]
    pub fn completions(&self) -> Vec<DVec3> {
        self.completions.lock().clone()
    }
}

impl ScanListener for RecordingListener {
    fn on_scan_completed(&mut self, center: DVec3) {
        self.completions.lock().push(center);
    }
}

/// Event counters accumulated by [`RecordingSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceCounts {
    /// `on_scan_begin` calls.
    pub scan_begins: u32,
    /// `on_collect_tick` calls.
    pub collect_ticks: u32,
    /// `on_scan_complete` calls.
    pub scan_completes: u32,
    /// `on_reveal` calls.
    pub reveals: u32,
    /// Sum of revealed results across reveal events.
    pub revealed_total: usize,
    /// Sum of dropped results across reveal events.
    pub dropped_total: usize,
    /// `on_decay` calls.
    pub decays: u32,
    /// `on_clear` calls.
    pub clears: u32,
    /// `on_frame_cull` calls.
    pub frame_culls: u32,
    /// Sum of visible results across cull events.
    pub visible_total: usize,
    /// Sum of culled results across cull events.
    pub culled_total: usize,
}

/// A [`TraceSink`] that counts events behind a shared handle.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    counts: Arc<Mutex<TraceCounts>>,
}

impl RecordingSink {
    /// Creates a sink with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn counts(&self) -> TraceCounts {
        *self.counts.lock()
    }
}

impl TraceSink for RecordingSink {
    fn on_scan_begin(&mut self, _e: &ScanBeginEvent) {
        self.counts.lock().scan_begins += 1;
    }

    fn on_collect_tick(&mut self, _e: &CollectTickEvent) {
        self.counts.lock().collect_ticks += 1;
    }

    fn on_scan_complete(&mut self, _e: &ScanCompleteEvent) {
        self.counts.lock().scan_completes += 1;
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        let mut counts = self.counts.lock();
        counts.reveals += 1;
        counts.revealed_total += e.revealed;
        counts.dropped_total += e.dropped;
    }

    fn on_decay(&mut self, _e: &DecayEvent) {
        self.counts.lock().decays += 1;
    }

    fn on_clear(&mut self) {
        self.counts.lock().clears += 1;
    }

    fn on_frame_cull(&mut self, e: &CullEvent) {
        let mut counts = self.counts.lock();
        counts.frame_culls += 1;
        counts.visible_total += e.visible;
        counts.culled_total += e.culled;
    }
}

/// A manually advanced clock for driving reveal timelines in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepClock {
    now: HostTime,
}

impl StepClock {
    /// Creates a clock starting at `t = 0`.
    #[must_use]
    pub const fn new() -> Self {
        Self { now: HostTime(0) }
    }

    /// The current time.
    #[must_use]
    pub const fn now(&self) -> HostTime {
        self.now
    }

    /// Advances the clock and returns the new time.
    pub fn advance(&mut self, by: Duration) -> HostTime {
        self.now = self.now + by;
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_provider_emits_queued_batches_in_order() {
        let provider = ScriptedProvider::new();
        provider.queue_tick(vec![PointResult::at(1.0, 0.0, 0.0)]);
        provider.queue_tick(vec![
            PointResult::at(2.0, 0.0, 0.0),
            PointResult::at(3.0, 0.0, 0.0),
        ]);

        let mut seen = Vec::new();
        provider.compute_scan_results(&mut |r| seen.push(r.position().x));
        provider.compute_scan_results(&mut |r| seen.push(r.position().x));
        // Script exhausted: further ticks emit nothing.
        provider.compute_scan_results(&mut |r| seen.push(r.position().x));

        assert_eq!(seen, vec![1.0, 2.0, 3.0]);
        assert_eq!(provider.compute_call_count(), 3);
    }

    #[test]
    fn marked_positions_fail_validity() {
        let provider = ScriptedProvider::new();
        provider.mark_invalid(DVec3::new(5.0, 0.0, 0.0));

        assert!(!provider.is_valid(&PointResult::at(5.0, 0.0, 0.0)));
        assert!(provider.is_valid(&PointResult::at(6.0, 0.0, 0.0)));
    }

    #[test]
    fn step_clock_advances() {
        let mut clock = StepClock::new();
        assert_eq!(clock.now(), HostTime(0));
        assert_eq!(clock.advance(Duration(50)), HostTime(50));
        assert_eq!(clock.advance(Duration(50)), HostTime(100));
    }
}
