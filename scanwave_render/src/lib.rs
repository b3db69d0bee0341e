// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-side culling and provider-batched submission for scan results.
//!
//! `scanwave_render` is the render-schedule half of the scan wave: it reads
//! the [`SharedResults`](scanwave_core::shared::SharedResults) bucket that
//! [`ScanManager`](scanwave_core::manager::ScanManager) fills on the
//! simulation schedule, frustum-culls the visible set each displayed frame,
//! and submits one draw batch per provider.
//!
//! **[`frustum`]** — Plane extraction from a view-projection matrix and
//! point/AABB intersection tests.
//!
//! **[`pipeline`]** — [`RenderPipeline`](pipeline::RenderPipeline) with the
//! direct world pass and the saved-matrix overlay pass used when an external
//! post-processing effect owns the camera setup.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod frustum;
pub mod pipeline;
