// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scan lifecycle controller.
//!
//! [`ScanManager`] owns the timeline of exactly one scan per observer and is
//! the only component that moves results between stages:
//!
//! ```text
//!   begin_scan ──► collecting ──(update_scan, one round per tick)──┐
//!                                                                  ▼
//!   update_scan(finish) ──► pending (sorted farthest-first from center)
//!                                                                  │
//!   tick(now) ──► reveal: radius overtakes distance ──► SharedResults
//!                                                                  │
//!   tick(now) after stay_duration ──► decay (ceil(n/2) per step) ──► Idle
//! ```
//!
//! The manager lives on the simulation schedule. The render schedule only
//! ever sees the [`SharedResults`] handle returned by
//! [`shared_results`](ScanManager::shared_results); everything else here is
//! single-threaded state.
//!
//! Starting a new scan never clears an active reveal — results survive until
//! the *next* scan completes or the stay window elapses. That is why
//! collecting and pending are separate stages.

use glam::DVec3;

use crate::config::ScanConfig;
use crate::provider::{EquippedModule, ProviderHandle, provider_eq};
use crate::radius::compute_radius;
use crate::result::ScanResult;
use crate::shared::SharedResults;
use crate::time::HostTime;
use crate::trace::{
    CollectTickEvent, DecayEvent, RevealEvent, ScanBeginEvent, ScanCompleteEvent, TraceSink,
    Tracer,
};

/// Observes scan completions, e.g. to drive a screen-space feedback cue.
pub trait ScanListener: Send {
    /// Called when collection finishes and the reveal wave starts expanding
    /// from `center`.
    fn on_scan_completed(&mut self, center: DVec3) {
        _ = center;
    }
}

/// A provider's in-progress or staged results.
struct Bucket {
    provider: ProviderHandle,
    results: Vec<Box<dyn ScanResult>>,
}

/// Orchestrates collection, reveal, and decay for one observer.
pub struct ScanManager {
    config: ScanConfig,
    /// Providers collecting this scan, with their accumulated raw results.
    collecting: Vec<Bucket>,
    /// Finalized results awaiting reveal, each list sorted by descending
    /// distance from `last_scan_center` so only the tail needs checking.
    pending: Vec<Bucket>,
    /// Currently visible results, shared with the render schedule.
    rendering: SharedResults,
    /// Ticks elapsed during the collection phase.
    scanning_ticks: u32,
    /// When the active reveal began; `None` while no reveal is active.
    current_start: Option<HostTime>,
    /// Point the active reveal radius expands from.
    last_scan_center: Option<DVec3>,
    listener: Option<Box<dyn ScanListener>>,
    tracer: Tracer,
}

impl ScanManager {
    /// Creates a manager with the given configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            collecting: Vec::new(),
            pending: Vec::new(),
            rendering: SharedResults::new(),
            scanning_ticks: 0,
            current_start: None,
            last_scan_center: None,
            listener: None,
            tracer: Tracer::none(),
        }
    }

    /// Installs a completion listener.
    pub fn set_listener(&mut self, listener: Box<dyn ScanListener>) {
        self.listener = Some(listener);
    }

    /// Installs a trace sink (no-op unless the `trace` feature is enabled).
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Returns a handle to the rendering bucket for the render schedule.
    #[must_use]
    pub fn shared_results(&self) -> SharedResults {
        self.rendering.clone()
    }

    /// The configuration this manager was built with.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Returns `true` while a collection phase is in progress.
    #[must_use]
    pub fn is_collecting(&self) -> bool {
        !self.collecting.is_empty()
    }

    /// Ticks elapsed in the current collection phase.
    #[must_use]
    pub const fn scanning_ticks(&self) -> u32 {
        self.scanning_ticks
    }

    /// Returns `true` while a reveal timeline (revealing or decaying) is
    /// active.
    #[must_use]
    pub const fn reveal_active(&self) -> bool {
        self.current_start.is_some() && self.last_scan_center.is_some()
    }

    /// Results staged in the pending buckets.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.iter().map(|b| b.results.len()).sum()
    }

    /// Begins a new scan at `origin` with the given equipped modules.
    ///
    /// Any in-progress collection is cancelled first. Providers are resolved
    /// from the modules (deduplicated by instance), the scan radius is the
    /// configured base plus one bonus per range-extending module, and every
    /// resolved provider is initialized. With no resolvable providers this is
    /// a no-op.
    pub fn begin_scan(&mut self, origin: DVec3, modules: &[EquippedModule]) {
        self.cancel_scan();

        let mut scan_radius = self.config.base_scan_radius;
        for module in modules {
            if let Some(provider) = &module.provider
                && !self
                    .collecting
                    .iter()
                    .any(|b| provider_eq(&b.provider, provider))
            {
                self.collecting.push(Bucket {
                    provider: provider.clone(),
                    results: Vec::new(),
                });
            }
            if module.extends_range {
                scan_radius += self.config.range_module_bonus();
            }
        }

        if self.collecting.is_empty() {
            return;
        }

        for bucket in &self.collecting {
            bucket
                .provider
                .initialize(origin, scan_radius, self.config.collection_ticks);
        }

        self.tracer.scan_begin(&ScanBeginEvent {
            provider_count: self.collecting.len(),
            scan_radius,
        });
    }

    /// Advances the collection phase by one tick, or finishes it.
    ///
    /// With `finish = false`, runs one `compute_scan_results` round per
    /// collecting provider (a no-op once the tick budget is spent). With
    /// `finish = true`, synchronously drains every remaining tick — a
    /// deliberate burst so a scan can be forced to completion — then stages
    /// the collected results for reveal: sorted farthest-first from `origin`,
    /// with `origin` as the new reveal center and `now` as its start time.
    pub fn update_scan(&mut self, origin: DVec3, finish: bool, now: HostTime) {
        let remaining = self
            .config
            .collection_ticks
            .saturating_sub(self.scanning_ticks);

        if !finish {
            if remaining == 0 {
                return;
            }
            let new_results = self.collect_one_tick();
            self.scanning_ticks += 1;
            self.tracer.collect_tick(&CollectTickEvent {
                tick: self.scanning_ticks,
                new_results,
            });
            return;
        }

        if self.collecting.is_empty() {
            return;
        }

        for _ in 0..remaining {
            self.collect_one_tick();
        }

        for bucket in &self.collecting {
            bucket.provider.reset();
        }

        // Tearing down the previous reveal only now is what lets a new scan
        // be collected while the old one is still on screen.
        self.clear_reveal_state();
        self.last_scan_center = Some(origin);
        self.current_start = Some(now);

        let collected = core::mem::take(&mut self.collecting);
        for mut bucket in collected {
            if bucket.results.is_empty() {
                continue;
            }
            bucket.results.sort_by(|a, b| {
                let da = origin.distance_squared(a.position());
                let db = origin.distance_squared(b.position());
                db.total_cmp(&da)
            });
            self.pending.push(bucket);
        }

        self.tracer.scan_complete(&ScanCompleteEvent {
            center: origin,
            pending: self.pending_count(),
        });

        if let Some(listener) = &mut self.listener {
            listener.on_scan_completed(origin);
        }

        self.cancel_scan();
    }

    /// Cancels an in-progress collection.
    ///
    /// Clears the collecting providers and results and resets the tick
    /// counter. Pending and rendering state are untouched. Idempotent.
    pub fn cancel_scan(&mut self) {
        self.collecting.clear();
        self.scanning_ticks = 0;
    }

    /// Drops everything: collection, pending, and rendered results.
    ///
    /// For host-side world transitions, where stale results would point at
    /// places that no longer exist. Providers still holding rendered results
    /// are reset.
    pub fn clear(&mut self) {
        self.cancel_scan();
        self.clear_reveal_state();
    }

    /// Advances the reveal timeline; call once per simulation tick.
    ///
    /// While within the stay window, moves pending results whose distance the
    /// growth radius has overtaken into the rendering bucket (nearest first,
    /// re-validated at the moment of the move). Once the stay window elapses,
    /// decays the visible set by `ceil(n/2)` per provider per call until
    /// everything is gone, then resets the timeline to idle.
    pub fn tick(&mut self, now: HostTime) {
        let (Some(center), Some(start)) = (self.last_scan_center, self.current_start) else {
            return;
        };

        if now.saturating_duration_since(start) > self.config.stay_duration {
            self.pending.clear();
            if !self.rendering.is_empty() {
                self.rendering.decay_step();
                self.tracer.decay(&DecayEvent {
                    remaining: self.rendering.result_count(),
                });
            }
            if self.rendering.is_empty() {
                self.clear_reveal_state();
            }
            return;
        }

        if self.pending.is_empty() {
            return;
        }

        let radius = compute_radius(&self.config, now.saturating_duration_since(start));
        let sq_radius = radius * radius;
        let mut revealed = 0_usize;
        let mut dropped = 0_usize;

        for bucket in &mut self.pending {
            // Sorted farthest-first, so the tail is the nearest remaining
            // result and the first out-of-range tail ends the provider.
            while bucket
                .results
                .last()
                .is_some_and(|r| center.distance_squared(r.position()) <= sq_radius)
            {
                if let Some(result) = bucket.results.pop() {
                    if bucket.provider.is_valid(&*result) {
                        self.rendering.insert(&bucket.provider, result);
                        revealed += 1;
                    } else {
                        dropped += 1;
                    }
                }
            }
        }
        self.pending.retain(|b| !b.results.is_empty());

        self.tracer.reveal(&RevealEvent {
            radius,
            revealed,
            dropped,
        });
    }

    /// Runs one collection round across all collecting providers, returning
    /// the number of results emitted.
    fn collect_one_tick(&mut self) -> usize {
        let mut emitted = 0;
        for bucket in &mut self.collecting {
            let Bucket { provider, results } = bucket;
            let before = results.len();
            provider.compute_scan_results(&mut |result| results.push(result));
            emitted += results.len() - before;
        }
        emitted
    }

    /// Drops pending and rendering state and deactivates the timeline.
    fn clear_reveal_state(&mut self) {
        self.pending.clear();
        self.rendering.clear_and_reset();
        self.last_scan_center = None;
        self.current_start = None;
        self.tracer.clear();
    }
}

impl core::fmt::Debug for ScanManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScanManager")
            .field("collecting", &self.collecting.len())
            .field("pending", &self.pending_count())
            .field("rendering", &self.rendering)
            .field("scanning_ticks", &self.scanning_ticks)
            .field("current_start", &self.current_start)
            .field("last_scan_center", &self.last_scan_center)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use core::any::Any;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::provider::{EmitFn, ScanResultProvider};
    use crate::time::Duration;

    struct Dot(DVec3);

    impl ScanResult for Dot {
        fn position(&self) -> DVec3 {
            self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Emits one result per tick at increasing x, records lifecycle calls.
    #[derive(Default)]
    struct TickProvider {
        emitted: AtomicU32,
        resets: AtomicU32,
        init: Mutex<Option<(DVec3, f64, u32)>>,
    }

    impl ScanResultProvider for TickProvider {
        fn initialize(&self, origin: DVec3, radius: f64, duration_ticks: u32) {
            *self.init.lock() = Some((origin, radius, duration_ticks));
            self.emitted.store(0, Ordering::Relaxed);
        }

        fn compute_scan_results(&self, emit: &mut EmitFn<'_>) {
            let i = self.emitted.fetch_add(1, Ordering::Relaxed);
            emit(Box::new(Dot(DVec3::new(f64::from(i), 0.0, 0.0))));
        }

        fn is_valid(&self, _result: &dyn ScanResult) -> bool {
            true
        }

        fn reset(&self) {
            self.resets.fetch_add(1, Ordering::Relaxed);
        }

        fn render(&self, _viewer: DVec3, _partial_ticks: f32, _batch: &[&dyn ScanResult]) {}
    }

    fn scanner_modules(provider: &Arc<TickProvider>) -> Vec<EquippedModule> {
        vec![EquippedModule::scanner(provider.clone())]
    }

    #[test]
    fn begin_scan_without_providers_is_noop() {
        let mut manager = ScanManager::new(ScanConfig::reference());
        manager.begin_scan(DVec3::ZERO, &[EquippedModule::range_extender()]);
        assert!(!manager.is_collecting());
    }

    #[test]
    fn begin_scan_deduplicates_provider_instances() {
        let provider = Arc::new(TickProvider::default());
        let mut manager = ScanManager::new(ScanConfig::reference());
        manager.begin_scan(
            DVec3::ZERO,
            &[
                EquippedModule::scanner(provider.clone()),
                EquippedModule::scanner(provider.clone()),
            ],
        );
        manager.update_scan(DVec3::ZERO, false, HostTime(0));
        // One provider, one compute round → one result.
        assert_eq!(provider.emitted.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn range_modules_extend_initialize_radius() {
        let provider = Arc::new(TickProvider::default());
        let config = ScanConfig::reference();
        let mut manager = ScanManager::new(config);
        manager.begin_scan(
            DVec3::ZERO,
            &[
                EquippedModule::scanner(provider.clone()),
                EquippedModule::range_extender(),
                EquippedModule::range_extender(),
            ],
        );

        let init = *provider.init.lock();
        let (_, radius, ticks) = init.expect("initialize was called");
        assert!(
            (radius - (config.base_scan_radius + 2.0 * config.range_module_bonus())).abs() < 1e-9,
            "two range modules add two bonuses"
        );
        assert_eq!(ticks, config.collection_ticks);
    }

    #[test]
    fn collection_stops_at_tick_budget() {
        let provider = Arc::new(TickProvider::default());
        let mut manager = ScanManager::new(ScanConfig {
            collection_ticks: 3,
            ..ScanConfig::reference()
        });
        manager.begin_scan(DVec3::ZERO, &scanner_modules(&provider));

        for _ in 0..10 {
            manager.update_scan(DVec3::ZERO, false, HostTime(0));
        }
        assert_eq!(
            provider.emitted.load(Ordering::Relaxed),
            3,
            "rounds past the budget are no-ops"
        );
        assert_eq!(manager.scanning_ticks(), 3);
    }

    #[test]
    fn finish_drains_remaining_ticks_synchronously() {
        let provider = Arc::new(TickProvider::default());
        let mut manager = ScanManager::new(ScanConfig {
            collection_ticks: 40,
            ..ScanConfig::reference()
        });
        manager.begin_scan(DVec3::ZERO, &scanner_modules(&provider));
        manager.update_scan(DVec3::ZERO, false, HostTime(0));
        manager.update_scan(DVec3::ZERO, false, HostTime(0));

        manager.update_scan(DVec3::ZERO, true, HostTime(100));
        assert_eq!(provider.emitted.load(Ordering::Relaxed), 40);
        assert_eq!(provider.resets.load(Ordering::Relaxed), 1);
        assert!(!manager.is_collecting(), "collection state is released");
        assert!(manager.reveal_active());
        assert_eq!(manager.pending_count(), 40);
    }

    #[test]
    fn finish_without_collection_preserves_active_reveal() {
        let provider = Arc::new(TickProvider::default());
        let mut manager = ScanManager::new(ScanConfig {
            collection_ticks: 1,
            ..ScanConfig::reference()
        });
        manager.begin_scan(DVec3::ZERO, &scanner_modules(&provider));
        manager.update_scan(DVec3::ZERO, true, HostTime(0));
        assert!(manager.reveal_active());

        // A stray finish with nothing collecting must not wipe the timeline.
        manager.update_scan(DVec3::ZERO, true, HostTime(50));
        assert!(manager.reveal_active());
        assert_eq!(manager.pending_count(), 1);
    }

    #[test]
    fn cancel_scan_is_idempotent_and_keeps_pending() {
        let provider = Arc::new(TickProvider::default());
        let mut manager = ScanManager::new(ScanConfig {
            collection_ticks: 2,
            ..ScanConfig::reference()
        });
        manager.begin_scan(DVec3::ZERO, &scanner_modules(&provider));
        manager.update_scan(DVec3::ZERO, true, HostTime(0));
        assert_eq!(manager.pending_count(), 2);

        manager.begin_scan(DVec3::ZERO, &scanner_modules(&provider));
        manager.update_scan(DVec3::ZERO, false, HostTime(0));
        manager.cancel_scan();
        manager.cancel_scan();
        assert!(!manager.is_collecting());
        assert_eq!(manager.scanning_ticks(), 0);
        assert_eq!(manager.pending_count(), 2, "pending survives cancel");
    }

    #[test]
    fn tick_without_active_reveal_is_noop() {
        let mut manager = ScanManager::new(ScanConfig::reference());
        manager.tick(HostTime(1_000_000));
        assert!(!manager.reveal_active());
        assert!(manager.shared_results().is_empty());
    }

    #[test]
    fn decay_runs_even_with_nothing_revealed() {
        let provider = Arc::new(TickProvider::default());
        let config = ScanConfig {
            collection_ticks: 1,
            stay_duration: Duration(100),
            ..ScanConfig::reference()
        };
        let mut manager = ScanManager::new(config);
        // Result at x=0 emitted from an origin far away: never revealed.
        manager.begin_scan(DVec3::ZERO, &scanner_modules(&provider));
        manager.update_scan(DVec3::new(100_000.0, 0.0, 0.0), true, HostTime(0));

        manager.tick(HostTime(101));
        assert!(!manager.reveal_active(), "empty bucket clears immediately");
        assert_eq!(manager.pending_count(), 0);
    }
}
