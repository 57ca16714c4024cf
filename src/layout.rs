//! Line-breaking and indentation engine. Consumes the parser's token stream,
//! wraps greedily against the frame width, draws through the sink, and
//! returns the advanced cursor. Page breaks happen here whenever an advance
//! would pass the frame bottom.

use crate::model::{Cursor, DocConfig, Indent, LineToken};
use crate::sink::{FontFace, OutputSink, TextStyle};

/// The column text flows in, plus the vertical band a page offers.
/// `top` is where y lands after a page break; `bottom` is the last usable
/// baseline.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub x: f32,
    pub width: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Type, size and color applied to a whole token stream. Emphasis varies per
/// run; everything else is uniform across one text block.
#[derive(Clone, Copy, Debug)]
pub struct LayoutStyle {
    pub size: f32,
    pub line_height: f32,
    pub color: [u8; 3],
}

fn break_page<S: OutputSink>(sink: &mut S, cursor: &mut Cursor, frame: &Frame) {
    sink.add_page();
    cursor.page += 1;
    cursor.y = frame.top;
    log::debug!("page break -> page {} y {:.2}", cursor.page, cursor.y);
}

/// Byte length of the longest prefix of `word` that fits in `avail` units.
/// Always at least one character, so progress is guaranteed even on absurdly
/// narrow frames.
fn fit_prefix<S: OutputSink>(sink: &S, word: &str, style: TextStyle, avail: f32) -> usize {
    let mut end = 0;
    for (idx, c) in word.char_indices() {
        let next = idx + c.len_utf8();
        if end > 0 && sink.text_width(&word[..next], style) > avail {
            break;
        }
        end = next;
    }
    end
}

/// Lay out `tokens` inside `frame`, starting at `cursor`. Side effects are
/// limited to draw calls and page insertion on the sink; the returned cursor
/// is the baseline the caller continues from.
pub fn layout_tokens<S: OutputSink>(
    sink: &mut S,
    tokens: &[LineToken],
    frame: &Frame,
    style: &LayoutStyle,
    cfg: &DocConfig,
    mut cursor: Cursor,
) -> Cursor {
    let mut indent = Indent::None;
    let mut x = frame.x;
    let mut line_has_content = false;
    let mut prev_ended_ws = false;
    let mut prev_space_w = 0.0f32;

    for token in tokens {
        match token {
            LineToken::BulletStart(level) => {
                indent = *level;
                if cursor.y > frame.bottom {
                    break_page(sink, &mut cursor, frame);
                }
                // The glyph sits left of the indented text edge; sub-bullets
                // nest visibly because both offsets grow together.
                let glyph_style = TextStyle {
                    face: FontFace::Regular,
                    size: style.size,
                    color: style.color,
                };
                sink.draw_text(
                    "\u{2022}",
                    frame.x + cfg.glyph_offset_for(indent),
                    cursor.y,
                    glyph_style,
                );
                x = frame.x + cfg.indent_for(indent);
                line_has_content = false;
                prev_ended_ws = false;
            }

            LineToken::Run(run) => {
                let text_style = TextStyle {
                    face: FontFace::from_flags(run.bold, run.italic),
                    size: style.size,
                    color: style.color,
                };
                let space_w = sink.text_width(" ", text_style);
                let starts_ws = run.text.starts_with(char::is_whitespace);
                let left_edge = frame.x + cfg.indent_for(indent);
                let max_right = frame.x + frame.width;

                for (i, word) in run.text.split_whitespace().enumerate() {
                    let ww = sink.text_width(word, text_style);
                    let need_space = line_has_content && (i > 0 || starts_ws || prev_ended_ws);
                    // The space belongs to whichever run owns the whitespace:
                    // this one (internal or leading), else the previous one.
                    let eff_space = if i > 0 || starts_ws {
                        space_w
                    } else {
                        prev_space_w
                    };
                    let mut wx = if need_space { x + eff_space } else { x };

                    if line_has_content && wx + ww > max_right {
                        cursor.y += style.line_height;
                        wx = left_edge;
                        line_has_content = false;
                    }
                    if cursor.y > frame.bottom {
                        break_page(sink, &mut cursor, frame);
                    }

                    // Words wider than the whole column are split at char
                    // granularity so no draw extends past the frame edge.
                    let mut rest = word;
                    while sink.text_width(rest, text_style) > max_right - wx {
                        let split = fit_prefix(sink, rest, text_style, max_right - wx);
                        if split == 0 || split >= rest.len() {
                            break;
                        }
                        sink.draw_text(&rest[..split], wx, cursor.y, text_style);
                        rest = &rest[split..];
                        cursor.y += style.line_height;
                        wx = left_edge;
                        if cursor.y > frame.bottom {
                            break_page(sink, &mut cursor, frame);
                        }
                    }
                    sink.draw_text(rest, wx, cursor.y, text_style);
                    x = wx + sink.text_width(rest, text_style);
                    line_has_content = true;
                }

                prev_ended_ws = run.text.ends_with(char::is_whitespace);
                prev_space_w = space_w;
            }

            LineToken::LineEnd => {
                // Flush the pending line even if it never wrapped, and drop
                // the indent — it never leaks onto the following line.
                cursor.y += style.line_height;
                indent = Indent::None;
                x = frame.x;
                line_has_content = false;
                prev_ended_ws = false;
            }

            LineToken::ParagraphBreak => {
                // Pure spacing: one line height, nothing drawn.
                cursor.y += style.line_height;
                indent = Indent::None;
                x = frame.x;
                line_has_content = false;
                prev_ended_ws = false;
            }
        }
    }

    cursor
}
