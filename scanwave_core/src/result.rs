// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The unit of discovery.
//!
//! A [`ScanResult`] is one point of interest produced by a provider during
//! collection. The core treats results as opaque: it reads the world-space
//! [`position`](ScanResult::position) for distance gating and the optional
//! [`render_bounds`](ScanResult::render_bounds) for frustum culling, and
//! otherwise just moves boxed results between buckets. Everything else a
//! provider attaches (colors, labels, block identity) stays private to the
//! provider, reachable again through [`as_any`](ScanResult::as_any) when the
//! result comes back in a render batch or an
//! [`is_valid`](crate::provider::ScanResultProvider::is_valid) check.

use core::any::Any;

use glam::DVec3;

use crate::bounds::Aabb;

/// One discovered point of interest.
///
/// Results cross from the simulation schedule to the render schedule inside
/// the shared rendering bucket, hence the `Send + Sync` bounds.
pub trait ScanResult: Send + Sync {
    /// World-space position used for reveal distance gating.
    fn position(&self) -> DVec3;

    /// Axis-aligned render bounds for frustum culling.
    ///
    /// `None` means the result is always treated as visible.
    fn render_bounds(&self) -> Option<Aabb> {
        None
    }

    /// Upcast for provider-side downcasting of its own result type.
    fn as_any(&self) -> &dyn Any;
}
