// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The radius growth curve.
//!
//! The scan wave accelerates quadratically so it starts slow and sweeps
//! outward with increasing speed, hitting the target radius exactly at the
//! end of the growth window. The base equation is
//!
//! ```text
//! r(t) = a + (t + b)^2 * c
//! ```
//!
//! Solving with `r(0) = 0` and `r(t1) = r1` gives
//!
//! ```text
//! n = 1 / ((t1 + b)^2 - b^2)
//! a = -r1 * b^2 * n
//! c = r1 * n
//! ```
//!
//! The time offset `b` keeps the initial velocity away from zero. The curve
//! is not clamped past `t1`; the reveal scheduler keeps running it until the
//! stay window elapses, at which point everything within reach has long been
//! revealed.

use crate::config::ScanConfig;
use crate::time::Duration;

/// Computes the reveal radius `elapsed` after the reveal began.
///
/// Equals `config.initial_radius` at `elapsed = 0` and
/// `initial_radius + target_radius` at `elapsed = scaled_growth_duration`.
#[must_use]
pub fn compute_radius(config: &ScanConfig, elapsed: Duration) -> f64 {
    growth_curve(
        elapsed.millis() as f64,
        config.initial_radius,
        config.target_radius(),
        config.scaled_growth_duration().millis() as f64,
        config.time_offset.millis() as f64,
    )
}

/// The raw curve: initial radius `r0`, target radius `r1`, growth duration
/// `t1`, and time offset `b`, all in milliseconds / world units.
#[must_use]
pub fn growth_curve(t: f64, r0: f64, r1: f64, t1: f64, b: f64) -> f64 {
    let n = 1.0 / ((t1 + b) * (t1 + b) - b * b);
    let a = -r1 * b * b * n;
    let c = r1 * n;
    r0 + a + (t + b) * (t + b) * c
}
