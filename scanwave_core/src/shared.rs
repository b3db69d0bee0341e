// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared rendering bucket.
//!
//! [`SharedResults`] holds the currently visible results, grouped by the
//! provider that produced them. It is the only structure touched by both
//! schedules: the simulation schedule inserts newly revealed results and
//! removes decayed ones, while the render schedule iterates it once per
//! displayed frame.
//!
//! Every access — read or write — goes through a method that acquires the
//! single internal mutex for the duration of the call; the guard is never
//! exposed. Cloning a `SharedResults` clones the handle, not the contents,
//! so the manager keeps one clone and the render pipeline another.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::provider::{ProviderHandle, ScanResultProvider, provider_eq};
use crate::result::ScanResult;

/// One provider's visible results.
struct RenderBucket {
    provider: ProviderHandle,
    results: Vec<Box<dyn ScanResult>>,
}

/// Mutex-guarded map from provider to its currently visible results.
#[derive(Clone, Default)]
pub struct SharedResults {
    inner: Arc<Mutex<Vec<RenderBucket>>>,
}

impl SharedResults {
    /// Creates an empty bucket.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no provider has visible results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Total number of visible results across all providers.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.inner.lock().iter().map(|b| b.results.len()).sum()
    }

    /// Appends a revealed result to `provider`'s bucket, creating the bucket
    /// on first insert.
    pub fn insert(&self, provider: &ProviderHandle, result: Box<dyn ScanResult>) {
        let mut buckets = self.inner.lock();
        match buckets.iter_mut().find(|b| provider_eq(&b.provider, provider)) {
            Some(bucket) => bucket.results.push(result),
            None => buckets.push(RenderBucket {
                provider: Arc::clone(provider),
                results: vec![result],
            }),
        }
    }

    /// Runs one decay step: removes `ceil(n/2)` of each provider's remaining
    /// `n` results from the tail of its list, dropping providers whose lists
    /// empty. Returns `true` if the bucket is empty afterwards.
    pub fn decay_step(&self) -> bool {
        let mut buckets = self.inner.lock();
        buckets.retain_mut(|bucket| {
            let n = bucket.results.len();
            bucket.results.truncate(n - n.div_ceil(2));
            !bucket.results.is_empty()
        });
        buckets.is_empty()
    }

    /// Drops all visible results, calling
    /// [`reset`](ScanResultProvider::reset) on every provider that still had
    /// some.
    pub fn clear_and_reset(&self) {
        let mut buckets = self.inner.lock();
        for bucket in buckets.iter() {
            bucket.provider.reset();
        }
        buckets.clear();
    }

    /// Iterates provider batches under the lock.
    ///
    /// The callback receives each provider together with the full slice of
    /// its visible results; the render pipeline culls and submits inside the
    /// callback so the whole frame sees one consistent snapshot.
    pub fn for_each_provider(
        &self,
        mut f: impl FnMut(&dyn ScanResultProvider, &[Box<dyn ScanResult>]),
    ) {
        let buckets = self.inner.lock();
        for bucket in buckets.iter() {
            f(&*bucket.provider, &bucket.results);
        }
    }
}

impl core::fmt::Debug for SharedResults {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let buckets = self.inner.lock();
        f.debug_struct("SharedResults")
            .field("providers", &buckets.len())
            .field(
                "results",
                &buckets.iter().map(|b| b.results.len()).sum::<usize>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use core::any::Any;
    use core::sync::atomic::{AtomicU32, Ordering};

    use glam::DVec3;

    use super::*;
    use crate::provider::EmitFn;

    struct Dot(DVec3);

    impl ScanResult for Dot {
        fn position(&self) -> DVec3 {
            self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct NullProvider {
        resets: AtomicU32,
    }

    impl ScanResultProvider for NullProvider {
        fn initialize(&self, _origin: DVec3, _radius: f64, _duration_ticks: u32) {}

        fn compute_scan_results(&self, _emit: &mut EmitFn<'_>) {}

        fn is_valid(&self, _result: &dyn ScanResult) -> bool {
            true
        }

        fn reset(&self) {
            self.resets.fetch_add(1, Ordering::Relaxed);
        }

        fn render(&self, _viewer: DVec3, _partial_ticks: f32, _batch: &[&dyn ScanResult]) {}
    }

    fn fill(shared: &SharedResults, provider: &ProviderHandle, n: usize) {
        for i in 0..n {
            shared.insert(provider, Box::new(Dot(DVec3::splat(i as f64))));
        }
    }

    #[test]
    fn insert_groups_by_provider_identity() {
        let shared = SharedResults::new();
        let a: ProviderHandle = Arc::new(NullProvider::default());
        let b: ProviderHandle = Arc::new(NullProvider::default());

        fill(&shared, &a, 2);
        fill(&shared, &b, 3);

        let mut sizes = Vec::new();
        shared.for_each_provider(|_, results| sizes.push(results.len()));
        assert_eq!(sizes, vec![2, 3]);
        assert_eq!(shared.result_count(), 5);
    }

    #[test]
    fn decay_removes_ceil_half_until_empty() {
        let shared = SharedResults::new();
        let provider: ProviderHandle = Arc::new(NullProvider::default());
        fill(&shared, &provider, 5);

        assert!(!shared.decay_step(), "5 → 2");
        assert_eq!(shared.result_count(), 2);
        assert!(!shared.decay_step(), "2 → 1");
        assert_eq!(shared.result_count(), 1);
        assert!(shared.decay_step(), "1 → 0, bucket empty");
        assert!(shared.is_empty());
    }

    #[test]
    fn decay_keeps_head_of_list() {
        let shared = SharedResults::new();
        let provider: ProviderHandle = Arc::new(NullProvider::default());
        fill(&shared, &provider, 4);

        shared.decay_step();
        let mut kept = Vec::new();
        shared.for_each_provider(|_, results| {
            kept.extend(results.iter().map(|r| r.position().x));
        });
        // Decay trims from the tail, so the earliest-revealed results linger.
        assert_eq!(kept, vec![0.0, 1.0]);
    }

    #[test]
    fn clear_resets_providers_still_holding_results() {
        let shared = SharedResults::new();
        let inner = Arc::new(NullProvider::default());
        let provider: ProviderHandle = inner.clone();
        fill(&shared, &provider, 3);

        shared.clear_and_reset();
        assert!(shared.is_empty());
        assert_eq!(inner.resets.load(Ordering::Relaxed), 1);

        // Empty bucket: nothing left to reset.
        shared.clear_and_reset();
        assert_eq!(inner.resets.load(Ordering::Relaxed), 1);
    }
}
