//! Table seam and the built-in grid renderer. The sequencer hands the whole
//! table to a `TableRenderer` with the current cursor position; the renderer
//! owns column sizing, row drawing and its own internal pagination, and
//! reports the y it stopped at.

use crate::error::Error;
use crate::layout::Frame;
use crate::sink::{FontFace, OutputSink, TextStyle};

#[derive(Clone, Debug)]
pub struct TableStyle {
    pub font_size: f32,
    pub line_height: f32,
    pub cell_pad_x: f32,
    pub cell_pad_y: f32,
    pub header_fill: [u8; 3],
    pub header_text: [u8; 3],
    pub body_text: [u8; 3],
    /// Fill behind every other body row; None disables striping.
    pub stripe_fill: Option<[u8; 3]>,
    pub rule_color: [u8; 3],
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 9.5,
            line_height: 5.5,
            cell_pad_x: 2.0,
            cell_pad_y: 1.6,
            header_fill: [52, 73, 94],
            header_text: [255, 255, 255],
            body_text: [33, 33, 33],
            stripe_fill: Some([240, 242, 245]),
            rule_color: [200, 204, 210],
        }
    }
}

pub struct TableArgs<'a> {
    pub start_y: f32,
    pub columns: &'a [String],
    pub rows: &'a [Vec<String>],
    pub style: &'a TableStyle,
    /// Column band and page band the table may use; breaks reset to
    /// `frame.top`.
    pub frame: Frame,
}

#[derive(Debug)]
pub struct TableOutcome {
    /// Where the renderer stopped, on whatever page the sink is now on.
    pub final_y: f32,
}

pub trait TableRenderer<S: OutputSink> {
    fn draw_table(&mut self, sink: &mut S, args: &TableArgs<'_>) -> Result<TableOutcome, Error>;
}

/// Built-in renderer: even columns widened per-column to fit the longest
/// unbreakable word, filled header row repeated after page breaks, striped
/// body rows, light rules.
#[derive(Default)]
pub struct GridTableRenderer;

impl GridTableRenderer {
    fn body_style(style: &TableStyle) -> TextStyle {
        TextStyle {
            face: FontFace::Regular,
            size: style.font_size,
            color: style.body_text,
        }
    }

    fn header_style(style: &TableStyle) -> TextStyle {
        TextStyle {
            face: FontFace::Bold,
            size: style.font_size,
            color: style.header_text,
        }
    }
}

/// Even split, then grow columns whose longest word does not fit and shrink
/// the others proportionally, preserving the total width.
fn fit_columns<S: OutputSink>(
    sink: &S,
    args: &TableArgs<'_>,
    ncols: usize,
    text: TextStyle,
    header: TextStyle,
) -> Vec<f32> {
    let pad = 2.0 * args.style.cell_pad_x;
    let total = args.frame.width;
    let mut widths = vec![total / ncols as f32; ncols];

    let mut min_widths = vec![0.0f32; ncols];
    for (ci, col) in args.columns.iter().enumerate().take(ncols) {
        for word in col.split_whitespace() {
            min_widths[ci] = min_widths[ci].max(sink.text_width(word, header) + pad);
        }
    }
    for row in args.rows {
        for (ci, cell) in row.iter().enumerate().take(ncols) {
            for word in cell.split_whitespace() {
                min_widths[ci] = min_widths[ci].max(sink.text_width(word, text) + pad);
            }
        }
    }

    let mut extra_needed: f32 = 0.0;
    let mut shrinkable: f32 = 0.0;
    for i in 0..ncols {
        if min_widths[i] > widths[i] {
            extra_needed += min_widths[i] - widths[i];
            widths[i] = min_widths[i];
        } else {
            shrinkable += widths[i] - min_widths[i];
        }
    }
    if extra_needed > 0.0 && shrinkable > 0.0 {
        let factor = extra_needed.min(shrinkable) / shrinkable;
        for i in 0..ncols {
            if widths[i] > min_widths[i] {
                widths[i] -= (widths[i] - min_widths[i]) * factor;
            }
        }
        let new_total: f32 = widths.iter().sum();
        if (new_total - total).abs() > 0.01 {
            let scale = total / new_total;
            for w in &mut widths {
                *w *= scale;
            }
        }
    }

    widths
}

/// Greedy wrap of one cell's text to `width` units, one String per line.
fn wrap_cell<S: OutputSink>(sink: &S, text: &str, style: TextStyle, width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && sink.text_width(&candidate, style) > width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

impl<S: OutputSink> TableRenderer<S> for GridTableRenderer {
    fn draw_table(&mut self, sink: &mut S, args: &TableArgs<'_>) -> Result<TableOutcome, Error> {
        let style = args.style;
        let ncols = args
            .columns
            .len()
            .max(args.rows.iter().map(Vec::len).max().unwrap_or(0));
        if ncols == 0 {
            return Err(Error::Table("table has no columns".into()));
        }

        let body = Self::body_style(style);
        let header = Self::header_style(style);
        let widths = fit_columns(sink, args, ncols, body, header);
        let frame = &args.frame;
        let pad_x = style.cell_pad_x;
        let pad_y = style.cell_pad_y;

        let cell_width = |ci: usize| (widths[ci] - 2.0 * pad_x).max(0.0);

        // Pre-wrap every cell once; heights fall out of the line counts.
        let header_lines: Vec<Vec<String>> = (0..ncols)
            .map(|ci| {
                let text = args.columns.get(ci).map(String::as_str).unwrap_or("");
                wrap_cell(sink, text, header, cell_width(ci))
            })
            .collect();
        let header_h = header_lines.iter().map(Vec::len).max().unwrap_or(1) as f32
            * style.line_height
            + 2.0 * pad_y;

        let row_layouts: Vec<(Vec<Vec<String>>, f32)> = args
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<Vec<String>> = (0..ncols)
                    .map(|ci| {
                        let text = row.get(ci).map(String::as_str).unwrap_or("");
                        wrap_cell(sink, text, body, cell_width(ci))
                    })
                    .collect();
                let h = cells.iter().map(Vec::len).max().unwrap_or(1) as f32
                    * style.line_height
                    + 2.0 * pad_y;
                (cells, h)
            })
            .collect();

        let draw_cells = |sink: &mut S, cells: &[Vec<String>], top: f32, text: TextStyle| {
            let mut cx = frame.x;
            for (ci, lines) in cells.iter().enumerate() {
                // Baseline of the first line sits pad + ~one line below the
                // row top; subsequent lines step by line height.
                let mut ly = top + pad_y + style.line_height * 0.8;
                for line in lines {
                    sink.draw_text(line, cx + pad_x, ly, text);
                    ly += style.line_height;
                }
                cx += widths[ci];
            }
        };

        let draw_header = |sink: &mut S, top: f32| {
            sink.draw_rect(frame.x, top, frame.width, header_h, style.header_fill);
            draw_cells(sink, &header_lines, top, header);
        };

        let mut y = args.start_y;
        draw_header(sink, y);
        y += header_h;

        for (ri, (cells, row_h)) in row_layouts.iter().enumerate() {
            let at_page_top = (y - frame.top).abs() < 1.0;
            if !at_page_top && y + row_h > frame.bottom {
                sink.add_page();
                y = frame.top;
                draw_header(sink, y);
                y += header_h;
            }
            log::debug!("table row={ri} h={row_h:.2} y={y:.2} page={}", sink.current_page());

            if ri % 2 == 1
                && let Some(fill) = style.stripe_fill
            {
                sink.draw_rect(frame.x, y, frame.width, *row_h, fill);
            }
            draw_cells(sink, cells, y, body);
            y += row_h;
            sink.draw_rule(frame.x, frame.x + frame.width, y, 0.2, style.rule_color);
        }

        Ok(TableOutcome { final_y: y })
    }
}
