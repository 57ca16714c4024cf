//! Export chat-style content blocks — styled text, data tables, chart
//! snapshots — into a paginated PDF report.
//!
//! The pipeline is a single ordered pass: text bodies are lexed into styled
//! runs, the layout engine wraps and indents them against the page frame,
//! and the sequencer threads one cursor through every block, breaking pages
//! as needed and awaiting each chart capture before moving on. External
//! collaborators (the capture capability, the table renderer, the output
//! surface) plug in through the `ChartCapture`, `TableRenderer` and
//! `OutputSink` traits; `PdfSink` and `GridTableRenderer` are the built-in
//! implementations.

pub mod capture;
mod compose;
mod error;
pub mod glyph;
pub mod layout;
pub mod markdown;
pub mod model;
pub mod pdf;
pub mod sink;
pub mod table;

pub use capture::{CaptureError, CaptureOptions, ChartCapture};
pub use error::Error;
pub use model::{
    Bitmap, BitmapFormat, CaptureHandle, ChartBlock, ContentBlock, Cursor, DocConfig, TableBlock,
    TextBlock,
};
pub use pdf::PdfSink;
pub use sink::{FontFace, OutputSink, TextStyle};
pub use table::{GridTableRenderer, TableRenderer, TableStyle};

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use capture::CaptureShim;

/// Resets the in-flight flag on every exit path, error or success, so a
/// failed run never wedges the exporter.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One exporter, one document at a time. A second `export` while one is in
/// flight is rejected immediately — never queued — because the cursor and
/// the physical page stack admit exactly one writer.
pub struct Exporter {
    config: DocConfig,
    table_style: TableStyle,
    in_flight: AtomicBool,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DocConfig::default())
    }
}

impl Exporter {
    pub fn new(config: DocConfig) -> Self {
        Self {
            config,
            table_style: TableStyle::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_table_style(mut self, table_style: TableStyle) -> Self {
        self.table_style = table_style;
        self
    }

    pub fn config(&self) -> &DocConfig {
        &self.config
    }

    /// Run one generation pass over `blocks` and return the finished
    /// document bytes. All run state — cursor, capture pacing, the sink's
    /// page stack — is created here and dropped on return.
    pub async fn export<S, C, T>(
        &self,
        blocks: &[ContentBlock],
        sink: &mut S,
        capture: &mut C,
        tables: &mut T,
    ) -> Result<Vec<u8>, Error>
    where
        S: OutputSink,
        C: ChartCapture,
        T: TableRenderer<S>,
    {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(Error::ExportInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let mut seen = HashSet::new();
        for block in blocks {
            if !seen.insert(block.id()) {
                return Err(Error::DuplicateBlockId(block.id().to_string()));
            }
        }

        let t0 = Instant::now();
        let mut shim = CaptureShim::new(capture, &self.config);
        let cursor =
            compose::render_blocks(sink, blocks, &mut shim, tables, &self.table_style, &self.config)
                .await?;
        let t_layout = t0.elapsed();

        let bytes = sink.finish()?;
        let t_total = t0.elapsed();

        log::info!(
            "Timing: layout={:.1}ms, finish={:.1}ms, total={:.1}ms ({} blocks, {} pages, {} bytes)",
            t_layout.as_secs_f64() * 1000.0,
            (t_total - t_layout).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            blocks.len(),
            cursor.page,
            bytes.len(),
        );

        Ok(bytes)
    }

    /// Convenience wrapper: built-in PDF sink and grid table renderer.
    pub async fn export_pdf<C: ChartCapture>(
        &self,
        blocks: &[ContentBlock],
        capture: &mut C,
    ) -> Result<Vec<u8>, Error> {
        let mut sink = PdfSink::new(self.config.page_width, self.config.page_height)?;
        let mut tables = GridTableRenderer;
        self.export(blocks, &mut sink, capture, &mut tables).await
    }
}
