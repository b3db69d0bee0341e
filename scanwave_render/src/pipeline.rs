// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame culling and provider-batched submission.
//!
//! [`RenderPipeline`] consumes the [`SharedResults`] bucket the simulation
//! side fills. Each displayed frame it interpolates the viewer position by
//! the frame's partial-tick fraction, builds a [`Frustum`] from the camera,
//! culls every visible result by its bounds, and hands each provider its
//! surviving results in one [`render`](ScanResultProvider::render) call so
//! providers can set up draw state once per batch.
//!
//! # Post-processing compatibility
//!
//! An external post-processing effect replaces the normal camera matrix setup
//! during the world pass. When the host reports the effect active, the
//! pipeline captures the frame's camera during
//! [`render_world`](RenderPipeline::render_world) *without drawing*, and
//! draws during [`render_overlay`](RenderPipeline::render_overlay) instead:
//! the saved matrices are pushed onto the host's [`MatrixStack`], the batch
//! is submitted in the correct camera space, and the stack is popped again.

use glam::{DMat4, DVec3};

use scanwave_core::result::ScanResult;
use scanwave_core::shared::SharedResults;
use scanwave_core::trace::{CullEvent, TraceSink, Tracer};

use crate::frustum::Frustum;

/// The observer's position at the previous and current simulation tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewer {
    /// Position at the previous tick.
    pub prev_position: DVec3,
    /// Position at the current tick.
    pub position: DVec3,
}

impl Viewer {
    /// A viewer that has not moved since the previous tick.
    #[must_use]
    pub const fn stationary(position: DVec3) -> Self {
        Self {
            prev_position: position,
            position,
        }
    }

    /// Position interpolated by the frame's partial-tick fraction.
    #[must_use]
    pub fn interpolated(&self, partial_ticks: f32) -> DVec3 {
        self.prev_position + (self.position - self.prev_position) * f64::from(partial_ticks)
    }
}

/// Projection and model-view matrices for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Projection matrix.
    pub projection: DMat4,
    /// Model-view (world-to-eye) matrix.
    pub model_view: DMat4,
}

impl CameraState {
    /// Combined world-to-clip matrix, used for frustum extraction.
    #[must_use]
    pub fn view_projection(&self) -> DMat4 {
        self.projection * self.model_view
    }
}

/// Everything the pipeline needs about the current displayed frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    /// The observer, for partial-tick interpolation.
    pub viewer: Viewer,
    /// Camera matrices for this frame's world pass.
    pub camera: CameraState,
    /// Fraction of the current simulation tick already elapsed, `0.0..=1.0`.
    pub partial_ticks: f32,
}

/// Host-implemented matrix stack for the overlay compatibility path.
///
/// The concrete graphics calls are the host's business; the pipeline only
/// dictates the order: saved matrices pushed and loaded before the batch is
/// drawn, popped afterwards.
pub trait MatrixStack {
    /// Pushes the current matrices and loads `camera`'s in their place.
    fn push_saved(&mut self, camera: &CameraState);

    /// Restores the matrices that were current before
    /// [`push_saved`](Self::push_saved).
    fn pop_saved(&mut self);
}

/// Frame-side consumer of the shared rendering bucket.
pub struct RenderPipeline {
    results: SharedResults,
    saved_camera: Option<CameraState>,
    tracer: Tracer,
}

impl RenderPipeline {
    /// Creates a pipeline reading from `results`.
    #[must_use]
    pub fn new(results: SharedResults) -> Self {
        Self {
            results,
            saved_camera: None,
            tracer: Tracer::none(),
        }
    }

    /// Installs a trace sink (no-op unless `scanwave_core`'s `trace` feature
    /// is enabled).
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// World-pass hook; call once per displayed frame.
    ///
    /// With `post_effect_active`, only captures the camera for the later
    /// overlay pass. Otherwise submits batches immediately.
    pub fn render_world(&mut self, frame: &FrameParams, post_effect_active: bool) {
        if post_effect_active {
            self.saved_camera = Some(frame.camera);
            return;
        }
        self.saved_camera = None;

        if self.results.is_empty() {
            return;
        }
        self.submit(frame, &frame.camera);
    }

    /// Overlay-pass hook; call once per displayed frame, after the external
    /// post-processing effect has run.
    ///
    /// Draws only if the world pass captured a camera this frame, re-applying
    /// the saved matrices around submission via `matrices`.
    pub fn render_overlay(&mut self, frame: &FrameParams, matrices: &mut dyn MatrixStack) {
        let Some(saved) = self.saved_camera else {
            return;
        };

        if self.results.is_empty() {
            return;
        }

        matrices.push_saved(&saved);
        self.submit(frame, &saved);
        matrices.pop_saved();
    }

    /// Culls the bucket against `camera`'s frustum and submits one batch per
    /// provider, all under the bucket's lock.
    fn submit(&mut self, frame: &FrameParams, camera: &CameraState) {
        let eye = frame.viewer.interpolated(frame.partial_ticks);
        let frustum = Frustum::from_view_projection(&camera.view_projection());

        let mut visible = 0_usize;
        let mut culled = 0_usize;

        self.results.for_each_provider(|provider, results| {
            let batch: Vec<&dyn ScanResult> = results
                .iter()
                .filter(|result| match result.render_bounds() {
                    Some(bounds) => frustum.intersects_aabb(&bounds),
                    // No bounds means always visible.
                    None => true,
                })
                .map(|result| result.as_ref())
                .collect();

            visible += batch.len();
            culled += results.len() - batch.len();

            if !batch.is_empty() {
                provider.render(eye, frame.partial_ticks, &batch);
            }
        });

        self.tracer.frame_cull(&CullEvent { visible, culled });
    }
}

impl core::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("results", &self.results)
            .field("saved_camera", &self.saved_camera.is_some())
            .finish_non_exhaustive()
    }
}
