//! Sequencing shim over the external "render element to bitmap" capability.
//! Captures run strictly one at a time, in block order, behind fixed settle
//! delays — the external renderer's ready state is not observable, so
//! latency is traded for correctness here.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::model::{Bitmap, CaptureHandle, DocConfig};

/// Options forwarded to the external capture capability.
#[derive(Clone, Copy, Debug)]
pub struct CaptureOptions {
    pub scale: f32,
    pub background: [u8; 3],
}

#[derive(Debug)]
pub enum CaptureError {
    /// The handle does not resolve to a mounted renderable.
    NotMounted,
    /// The external renderer failed outright.
    Failed(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NotMounted => write!(f, "capture handle not mounted"),
            CaptureError::Failed(msg) => write!(f, "capture failed: {msg}"),
        }
    }
}

impl std::error::Error for CaptureError {}

/// External chart-capture capability. Implementations resolve handles against
/// whatever renderable set belongs to the current run — a fresh value is
/// handed to each export invocation, so identical handle ids in two runs can
/// never observe each other.
pub trait ChartCapture {
    fn render_to_bitmap(
        &mut self,
        handle: &CaptureHandle,
        options: &CaptureOptions,
    ) -> impl Future<Output = Result<Bitmap, CaptureError>> + Send;
}

/// One-at-a-time capture driver for a single run. Lives on the export call's
/// stack; `&mut self` plus the sequencer's awaited loop make concurrent or
/// reordered captures unrepresentable.
pub(crate) struct CaptureShim<'a, C: ChartCapture> {
    capture: &'a mut C,
    options: CaptureOptions,
    initial_delay: Duration,
    per_chart_delay: Duration,
    settled: bool,
}

impl<'a, C: ChartCapture> CaptureShim<'a, C> {
    pub(crate) fn new(capture: &'a mut C, cfg: &DocConfig) -> Self {
        Self {
            capture,
            options: CaptureOptions {
                scale: cfg.capture_scale,
                background: cfg.capture_background,
            },
            initial_delay: Duration::from_millis(cfg.settle_initial_ms),
            per_chart_delay: Duration::from_millis(cfg.settle_per_chart_ms),
            settled: false,
        }
    }

    /// Capture a single handle, waiting out the settle delays first: one
    /// initial wait per run for mounting, one short wait per chart for
    /// animations and labels.
    pub(crate) async fn capture_one(
        &mut self,
        handle: &CaptureHandle,
    ) -> Result<Bitmap, CaptureError> {
        if !self.settled {
            tokio::time::sleep(self.initial_delay).await;
            self.settled = true;
        }
        tokio::time::sleep(self.per_chart_delay).await;
        self.capture.render_to_bitmap(handle, &self.options).await
    }
}
