//! Block sequencer and cursor owner. One strictly ordered pass over the
//! content blocks: each block is dispatched to its renderer with the current
//! cursor, and the next block never starts before every side effect of the
//! previous one — including awaited chart captures — has completed.

use crate::capture::{CaptureShim, ChartCapture};
use crate::error::Error;
use crate::layout::{self, Frame, LayoutStyle};
use crate::markdown;
use crate::model::{ChartBlock, ContentBlock, Cursor, DocConfig, TableBlock, TextBlock};
use crate::sink::{FontFace, OutputSink, TextStyle};
use crate::table::{TableArgs, TableRenderer, TableStyle};

fn content_frame(cfg: &DocConfig) -> Frame {
    Frame {
        x: cfg.margin_left,
        width: cfg.content_width(),
        top: cfg.margin_top,
        bottom: cfg.page_bottom(),
    }
}

fn at_page_top(cursor: Cursor, cfg: &DocConfig) -> bool {
    (cursor.y - cfg.margin_top).abs() < 0.5
}

fn break_page<S: OutputSink>(sink: &mut S, cursor: &mut Cursor, cfg: &DocConfig) {
    sink.add_page();
    cursor.page += 1;
    cursor.y = cfg.margin_top;
}

/// Break before a block that should not start inside the reserved bottom
/// band. Never breaks on an already-fresh page, so an oversized reserve
/// cannot loop.
fn reserve_room<S: OutputSink>(sink: &mut S, cursor: &mut Cursor, cfg: &DocConfig, reserve: f32) {
    if !at_page_top(*cursor, cfg) && cursor.y > cfg.page_bottom() - reserve {
        break_page(sink, cursor, cfg);
    }
}

/// Heading line plus separator rule; advances by the fixed heading gap.
fn draw_heading<S: OutputSink>(sink: &mut S, cursor: &mut Cursor, cfg: &DocConfig, heading: &str) {
    let style = TextStyle {
        face: FontFace::Bold,
        size: cfg.heading_font_size,
        color: cfg.heading_color,
    };
    sink.draw_text(heading, cfg.margin_left, cursor.y, style);
    sink.draw_rule(
        cfg.margin_left,
        cfg.margin_left + cfg.content_width(),
        cursor.y + 2.0,
        0.3,
        cfg.rule_color,
    );
    cursor.y += cfg.heading_gap;
}

fn render_text<S: OutputSink>(
    sink: &mut S,
    cursor: &mut Cursor,
    cfg: &DocConfig,
    block: &TextBlock,
) {
    reserve_room(sink, cursor, cfg, cfg.text_reserve);
    if let Some(heading) = &block.heading {
        draw_heading(sink, cursor, cfg, heading);
    }
    let tokens = if block.styled {
        markdown::parse(&block.body)
    } else {
        markdown::plain(&block.body)
    };
    let style = LayoutStyle {
        size: cfg.body_font_size,
        line_height: cfg.line_height,
        color: cfg.text_color,
    };
    *cursor = layout::layout_tokens(sink, &tokens, &content_frame(cfg), &style, cfg, *cursor);
}

fn render_table<S: OutputSink, T: TableRenderer<S>>(
    sink: &mut S,
    cursor: &mut Cursor,
    cfg: &DocConfig,
    tables: &mut T,
    table_style: &TableStyle,
    block: &TableBlock,
) {
    if block.rows.is_empty() {
        log::warn!("table block {:?} has no rows; skipped", block.id);
        return;
    }
    // Tables cannot split mid-element without the renderer's own pagination,
    // so never start one inside the larger reserved band.
    reserve_room(sink, cursor, cfg, cfg.table_reserve);
    if let Some(heading) = &block.heading {
        draw_heading(sink, cursor, cfg, heading);
    }
    let args = TableArgs {
        start_y: cursor.y,
        columns: &block.columns,
        rows: &block.rows,
        style: table_style,
        frame: content_frame(cfg),
    };
    match tables.draw_table(sink, &args) {
        Ok(outcome) => {
            cursor.y = outcome.final_y + cfg.block_gap;
        }
        Err(e) => {
            log::error!("table block {:?} failed: {e}; continuing", block.id);
            cursor.y += cfg.fallback_block_height;
        }
    }
    // The renderer paginates internally; re-read the physical page.
    cursor.page = sink.current_page();
}

async fn render_chart<S: OutputSink, C: ChartCapture>(
    sink: &mut S,
    cursor: &mut Cursor,
    cfg: &DocConfig,
    capture: &mut CaptureShim<'_, C>,
    block: &ChartBlock,
) {
    // Resolve before drawing anything: a chart that never mounts leaves a
    // fixed-height gap, never a dangling heading or an aborted document.
    let bitmap = match capture.capture_one(&block.handle).await {
        Ok(bitmap) => bitmap,
        Err(e) => {
            log::warn!("chart block {:?} skipped: {e}", block.id);
            cursor.y += cfg.fallback_block_height;
            return;
        }
    };

    let draw_w = cfg.content_width();
    let draw_h = bitmap.scaled_height(draw_w);
    let heading_h = if block.heading.is_some() {
        cfg.heading_gap
    } else {
        0.0
    };
    // Bitmaps cannot split across pages: if heading + image do not fit in
    // the remaining band, the whole block (heading included) moves to a
    // fresh page.
    if !at_page_top(*cursor, cfg) && cursor.y + heading_h + draw_h > cfg.page_bottom() {
        break_page(sink, cursor, cfg);
    }
    if let Some(heading) = &block.heading {
        draw_heading(sink, cursor, cfg, heading);
    }
    sink.draw_image(&bitmap, cfg.margin_left, cursor.y, draw_w, draw_h);
    cursor.y += draw_h + cfg.block_gap;
}

/// Drive the ordered pass. The cursor lives here and nowhere else; every
/// renderer receives it by value (or via this function's exclusive borrow)
/// and hands back the advanced position.
pub(crate) async fn render_blocks<S, C, T>(
    sink: &mut S,
    blocks: &[ContentBlock],
    capture: &mut CaptureShim<'_, C>,
    tables: &mut T,
    table_style: &TableStyle,
    cfg: &DocConfig,
) -> Result<Cursor, Error>
where
    S: OutputSink,
    C: ChartCapture,
    T: TableRenderer<S>,
{
    let mut cursor = Cursor {
        y: cfg.margin_top,
        page: 1,
    };

    for block in blocks {
        log::debug!(
            "block {:?} page={} y={:.1}",
            block.id(),
            cursor.page,
            cursor.y
        );
        match block {
            ContentBlock::Text(b) => render_text(sink, &mut cursor, cfg, b),
            ContentBlock::Table(b) => render_table(sink, &mut cursor, cfg, tables, table_style, b),
            ContentBlock::Chart(b) => render_chart(sink, &mut cursor, cfg, capture, b).await,
        }
    }

    Ok(cursor)
}
