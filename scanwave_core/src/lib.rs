// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scan lifecycle, reveal scheduling, and shared result buckets.
//!
//! `scanwave_core` animates a radially-expanding scan wave that progressively
//! reveals points of interest around an observer and lets them decay away
//! after a dwell period. Providers compute candidate results over a fixed
//! number of simulation ticks; a time-driven growth radius then gates which
//! results become visible, nearest first; the visible set is shared with the
//! render schedule through a mutex-guarded bucket.
//!
//! # Architecture
//!
//! One scan flows one-directionally through three staged buckets:
//!
//! ```text
//!   ScanManager::begin_scan ──► providers initialize
//!       │
//!       ▼  (once per simulation tick)
//!   ScanManager::update_scan ──► collecting buckets
//!       │  (finish)
//!       ▼
//!   pending buckets (sorted farthest-first from the scan center)
//!       │
//!       ▼  (ScanManager::tick, radius overtakes distance)
//!   SharedResults ──► render schedule culls & submits per provider
//! ```
//!
//! **[`config`]** — [`ScanConfig`](config::ScanConfig): every tunable the
//! core reads, supplied by the host.
//!
//! **[`radius`]** — The pure quadratic growth curve mapping elapsed time to
//! the reveal radius.
//!
//! **[`result`]** / **[`provider`]** — The plug-in contract: opaque
//! [`ScanResult`](result::ScanResult)s produced by
//! [`ScanResultProvider`](provider::ScanResultProvider)s resolved from
//! equipped modules.
//!
//! **[`manager`]** — [`ScanManager`](manager::ScanManager), the lifecycle
//! controller: collection, reveal scheduling, and decay.
//!
//! **[`shared`]** — [`SharedResults`](shared::SharedResults), the
//! mutex-guarded rendering bucket shared between the two schedules.
//!
//! **[`time`]** — Millisecond [`HostTime`](time::HostTime) /
//! [`Duration`](time::Duration) newtypes; callers supply `now`.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bounds;
pub mod config;
pub mod manager;
pub mod provider;
pub mod radius;
pub mod result;
pub mod shared;
pub mod time;
pub mod trace;
