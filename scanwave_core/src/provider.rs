// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The provider contract.
//!
//! A [`ScanResultProvider`] is a pluggable source of scan results, one per
//! equipped scanning module. Providers are long-lived: the manager calls
//! [`initialize`](ScanResultProvider::initialize) at scan start,
//! [`compute_scan_results`](ScanResultProvider::compute_scan_results) once
//! per collection tick, and [`reset`](ScanResultProvider::reset) when the
//! scan completes or its results are cleared — the provider object itself
//! survives across scans.
//!
//! # Why `&self`?
//!
//! Provider handles are shared between the simulation schedule (which drives
//! collection) and the render schedule (which submits draw batches), so the
//! trait takes `&self` throughout and implementations own whatever interior
//! mutability their tick state needs. A provider whose `compute_scan_results`
//! walks the world incrementally typically keeps its cursor in a `Mutex`;
//! the two schedules never call into the same provider concurrently with
//! conflicting intent (collection has finished before the first render).

use std::sync::Arc;

use glam::DVec3;

use crate::result::ScanResult;

/// Sink for results produced during one collection tick.
///
/// Emission is synchronous: the closure is invoked once per produced result
/// within the same `compute_scan_results` call.
pub type EmitFn<'a> = dyn FnMut(Box<dyn ScanResult>) + 'a;

/// A pluggable source of scan results.
pub trait ScanResultProvider: Send + Sync {
    /// Resets tick state for a new scan originating at `origin`, covering
    /// `radius`, with `duration_ticks` collection ticks to spread work over.
    fn initialize(&self, origin: DVec3, radius: f64, duration_ticks: u32);

    /// Produces zero or more results for one collection tick.
    fn compute_scan_results(&self, emit: &mut EmitFn<'_>);

    /// Re-validates a result at the moment it becomes visible.
    ///
    /// Results may go stale between computation and reveal; returning `false`
    /// drops the result permanently.
    fn is_valid(&self, result: &dyn ScanResult) -> bool;

    /// Releases any resources retained for the current scan.
    fn reset(&self);

    /// Draws one batch of this provider's currently visible results.
    ///
    /// The batch has already been frustum-culled and is never empty, so the
    /// provider can set up render state once per call.
    fn render(&self, viewer: DVec3, partial_ticks: f32, batch: &[&dyn ScanResult]);
}

/// Shared handle to a provider.
///
/// Buckets key providers by `Arc` pointer identity (see [`provider_eq`]).
pub type ProviderHandle = Arc<dyn ScanResultProvider>;

/// Returns `true` if two handles refer to the same provider instance.
#[inline]
#[must_use]
pub fn provider_eq(a: &ProviderHandle, b: &ProviderHandle) -> bool {
    Arc::ptr_eq(a, b)
}

/// One equipped module, as resolved by the host's inventory layer.
///
/// The core does not inspect items; hosts translate whatever their equipment
/// system holds into a list of these descriptors when starting a scan.
#[derive(Clone)]
pub struct EquippedModule {
    /// The module's result provider, if it is a scanning module.
    pub provider: Option<ProviderHandle>,
    /// Whether the module extends scan range
    /// (see [`ScanConfig::range_module_bonus`](crate::config::ScanConfig::range_module_bonus)).
    pub extends_range: bool,
}

impl EquippedModule {
    /// A scanning module backed by `provider`.
    #[must_use]
    pub fn scanner(provider: ProviderHandle) -> Self {
        Self {
            provider: Some(provider),
            extends_range: false,
        }
    }

    /// A range-extending module with no provider of its own.
    #[must_use]
    pub const fn range_extender() -> Self {
        Self {
            provider: None,
            extends_range: true,
        }
    }
}

impl core::fmt::Debug for EquippedModule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EquippedModule")
            .field("provider", &self.provider.as_ref().map(Arc::as_ptr))
            .field("extends_range", &self.extends_range)
            .finish()
    }
}
