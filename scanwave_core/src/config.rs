// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable constants for the scan lifecycle.
//!
//! [`ScanConfig`] gathers every knob the scan core reads: the world's chunk
//! geometry, the observer's view distance, and the collection/growth/stay
//! timings. The core does not load configuration from anywhere — hosts build
//! a `ScanConfig` from their own settings layer and pass it in.

use crate::time::Duration;

/// Tunable constants for scan timing and radius growth.
#[derive(Clone, Copy, Debug)]
pub struct ScanConfig {
    /// Edge length of one chunk of loaded space, in world units.
    pub chunk_size: u32,
    /// View distance (in chunks) the baseline growth duration was tuned for.
    pub reference_view_distance: u32,
    /// The observer's configured view distance, in chunks.
    pub view_distance: u32,
    /// Radius the wave starts from at `t = 0`.
    pub initial_radius: f64,
    /// Time offset applied to the growth curve so the wave never starts at
    /// zero velocity.
    pub time_offset: Duration,
    /// Number of simulation ticks a scan spends collecting results.
    pub collection_ticks: u32,
    /// Growth duration at `reference_view_distance`; scaled proportionally
    /// with the actual view distance so perceived wave speed stays constant.
    pub growth_duration: Duration,
    /// How long a fully revealed scan stays visible before decaying.
    pub stay_duration: Duration,
    /// Scan radius providers are initialized with, before module bonuses.
    pub base_scan_radius: f64,
}

impl ScanConfig {
    /// Reference tuning: 16-unit chunks at a view distance of 12, a two
    /// second growth window, and a ten second stay window.
    #[must_use]
    pub const fn reference() -> Self {
        Self {
            chunk_size: 16,
            reference_view_distance: 12,
            view_distance: 12,
            initial_radius: 10.0,
            time_offset: Duration(200),
            collection_ticks: 40,
            growth_duration: Duration(2000),
            stay_duration: Duration(10_000),
            base_scan_radius: 64.0,
        }
    }

    /// Radius the wave reaches at the end of the growth window: just short of
    /// the edge of loaded space.
    #[inline]
    #[must_use]
    pub fn target_radius(&self) -> f64 {
        f64::from(self.view_distance * self.chunk_size) - self.initial_radius
    }

    /// Growth duration scaled by the actual view distance relative to the
    /// reference view distance.
    #[inline]
    #[must_use]
    pub const fn scaled_growth_duration(&self) -> Duration {
        Duration(
            self.growth_duration.millis() * self.view_distance as u64
                / self.reference_view_distance as u64,
        )
    }

    /// Extra scan radius granted per equipped range-extending module.
    #[inline]
    #[must_use]
    pub fn range_module_bonus(&self) -> f64 {
        (self.base_scan_radius / 2.0).ceil()
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::reference()
    }
}
