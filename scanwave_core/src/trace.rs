// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the scan lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! manager and render pipeline call at each stage. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional boxed sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use glam::DVec3;

/// Emitted when a scan begins collecting.
#[derive(Clone, Copy, Debug)]
pub struct ScanBeginEvent {
    /// Number of providers resolved from the equipped modules.
    pub provider_count: usize,
    /// Scan radius passed to `initialize`, bonuses included.
    pub scan_radius: f64,
}

/// Emitted after each collection tick.
#[derive(Clone, Copy, Debug)]
pub struct CollectTickEvent {
    /// Ticks elapsed in the collection phase, this one included.
    pub tick: u32,
    /// Results emitted across all providers during this tick.
    pub new_results: usize,
}

/// Emitted when collection finishes and the reveal timeline starts.
#[derive(Clone, Copy, Debug)]
pub struct ScanCompleteEvent {
    /// World point the reveal radius expands from.
    pub center: DVec3,
    /// Total results staged in the pending buckets.
    pub pending: usize,
}

/// Emitted after each reveal tick.
#[derive(Clone, Copy, Debug)]
pub struct RevealEvent {
    /// Current reveal radius.
    pub radius: f64,
    /// Results moved into the rendering bucket this tick.
    pub revealed: usize,
    /// Results dropped by the validity re-check this tick.
    pub dropped: usize,
}

/// Emitted after each decay step.
#[derive(Clone, Copy, Debug)]
pub struct DecayEvent {
    /// Results still visible after the step.
    pub remaining: usize,
}

/// Emitted with per-frame culling statistics.
#[derive(Clone, Copy, Debug)]
pub struct CullEvent {
    /// Results submitted to providers this frame.
    pub visible: usize,
    /// Results rejected by the frustum test this frame.
    pub culled: usize,
}

/// Receives trace events from the scan lifecycle.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink: Send {
    /// Called when a scan begins collecting.
    fn on_scan_begin(&mut self, e: &ScanBeginEvent) {
        _ = e;
    }

    /// Called after each collection tick.
    fn on_collect_tick(&mut self, e: &CollectTickEvent) {
        _ = e;
    }

    /// Called when collection finishes and the reveal begins.
    fn on_scan_complete(&mut self, e: &ScanCompleteEvent) {
        _ = e;
    }

    /// Called after each reveal tick.
    fn on_reveal(&mut self, e: &RevealEvent) {
        _ = e;
    }

    /// Called after each decay step.
    fn on_decay(&mut self, e: &DecayEvent) {
        _ = e;
    }

    /// Called when the reveal timeline fully clears.
    fn on_clear(&mut self) {}

    /// Called with per-frame culling statistics.
    fn on_frame_cull(&mut self, e: &CullEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional boxed [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Emits a [`ScanBeginEvent`].
    #[inline]
    pub fn scan_begin(&mut self, e: &ScanBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scan_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CollectTickEvent`].
    #[inline]
    pub fn collect_tick(&mut self, e: &CollectTickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_collect_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ScanCompleteEvent`].
    #[inline]
    pub fn scan_complete(&mut self, e: &ScanCompleteEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scan_complete(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RevealEvent`].
    #[inline]
    pub fn reveal(&mut self, e: &RevealEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reveal(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DecayEvent`].
    #[inline]
    pub fn decay(&mut self, e: &DecayEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_decay(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a clear event.
    #[inline]
    pub fn clear(&mut self) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_clear();
        }
    }

    /// Emits a [`CullEvent`].
    #[inline]
    pub fn frame_cull(&mut self, e: &CullEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_cull(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
