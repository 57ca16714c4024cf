//! Data model for one document-generation run. Everything here is created
//! fresh per export invocation and dropped when it returns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque reference to an external renderable element. Resolved to a bitmap
/// only at export time, by whatever `ChartCapture` the caller supplies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureHandle(pub String);

impl CaptureHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextBlock {
    pub id: String,
    pub heading: Option<String>,
    pub body: String,
    /// When false the body is wrapped as-is, with no emphasis or bullet parsing.
    pub styled: bool,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableBlock {
    pub id: String,
    pub heading: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartBlock {
    pub id: String,
    pub heading: Option<String>,
    pub handle: CaptureHandle,
}

/// One unit of document content. Sequence order in the input slice is the
/// authoritative render order; no block kind is segregated or reordered.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ContentBlock {
    Text(TextBlock),
    Table(TableBlock),
    Chart(ChartBlock),
}

impl ContentBlock {
    pub fn id(&self) -> &str {
        match self {
            ContentBlock::Text(b) => &b.id,
            ContentBlock::Table(b) => &b.id,
            ContentBlock::Chart(b) => &b.id,
        }
    }

    pub fn heading(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(b) => b.heading.as_deref(),
            ContentBlock::Table(b) => b.heading.as_deref(),
            ContentBlock::Chart(b) => b.heading.as_deref(),
        }
    }
}

/// A maximal span of text sharing one emphasis combination. Never spans a
/// line break or bullet boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

/// Bullet nesting level, recorded per line rather than per run — a single
/// bulleted line may contain several styled runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indent {
    None,
    Main,
    Sub,
}

/// Parser output. One non-empty line produces an optional `BulletStart`, its
/// runs, then `LineEnd`; a blank input line produces a lone `ParagraphBreak`.
#[derive(Clone, Debug, PartialEq)]
pub enum LineToken {
    Run(StyledRun),
    BulletStart(Indent),
    LineEnd,
    ParagraphBreak,
}

/// The single shared write position: vertical offset from the page top plus
/// the current physical page, in document units. Owned exclusively by the
/// sequencer and threaded by value through every render call. `y` is
/// non-decreasing within a page; a page break sets `y` to the top margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub y: f32,
    pub page: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitmapFormat {
    Jpeg,
    Png,
}

/// A captured chart snapshot, as delivered by the external capture capability.
#[derive(Clone)]
pub struct Bitmap {
    pub data: Vec<u8>,
    pub format: BitmapFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Bitmap {
    /// Height the bitmap occupies when scaled to `width` document units,
    /// preserving the intrinsic aspect ratio.
    pub fn scaled_height(&self, width: f32) -> f32 {
        if self.pixel_width == 0 {
            return 0.0;
        }
        width * self.pixel_height as f32 / self.pixel_width as f32
    }
}

/// Document geometry and pacing knobs. Lengths are in document units (the
/// defaults describe an A4 page in millimetres); font sizes are in points.
#[derive(Clone, Debug)]
pub struct DocConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub line_height: f32,
    pub body_font_size: f32,
    pub heading_font_size: f32,
    /// Advance consumed by a heading line plus its separator rule.
    pub heading_gap: f32,
    /// Gap inserted after a table or chart before the next block.
    pub block_gap: f32,
    /// Text indent for first-level and nested bullet lines.
    pub bullet_indent_main: f32,
    pub bullet_indent_sub: f32,
    /// Where the bullet glyph itself sits, left of the indented text.
    pub bullet_glyph_main: f32,
    pub bullet_glyph_sub: f32,
    /// Reserved bottom space before starting a block. Text can always
    /// continue naturally on overflow and keeps a small margin; tables and
    /// charts cannot split mid-element and reserve more.
    pub text_reserve: f32,
    pub table_reserve: f32,
    /// Blank space left where a chart failed to capture or a table renderer
    /// gave up, so following content cannot overlap whatever the sink
    /// already holds there.
    pub fallback_block_height: f32,
    pub text_color: [u8; 3],
    pub heading_color: [u8; 3],
    pub rule_color: [u8; 3],
    /// One-time wait before the first capture of a run, letting external
    /// visual content finish mounting.
    pub settle_initial_ms: u64,
    /// Additional wait before each individual chart capture.
    pub settle_per_chart_ms: u64,
    pub capture_scale: f32,
    pub capture_background: [u8; 3],
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_left: 15.0,
            margin_right: 15.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            line_height: 7.0,
            body_font_size: 11.0,
            heading_font_size: 14.0,
            heading_gap: 11.0,
            block_gap: 8.0,
            bullet_indent_main: 8.0,
            bullet_indent_sub: 20.0,
            bullet_glyph_main: 3.0,
            bullet_glyph_sub: 14.0,
            text_reserve: 10.0,
            table_reserve: 40.0,
            fallback_block_height: 60.0,
            text_color: [33, 33, 33],
            heading_color: [0, 0, 0],
            rule_color: [180, 180, 180],
            settle_initial_ms: 800,
            settle_per_chart_ms: 150,
            capture_scale: 2.0,
            capture_background: [255, 255, 255],
        }
    }
}

impl DocConfig {
    /// Usable column width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Lowest y a baseline may occupy.
    pub fn page_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    pub(crate) fn indent_for(&self, indent: Indent) -> f32 {
        match indent {
            Indent::None => 0.0,
            Indent::Main => self.bullet_indent_main,
            Indent::Sub => self.bullet_indent_sub,
        }
    }

    pub(crate) fn glyph_offset_for(&self, indent: Indent) -> f32 {
        match indent {
            Indent::Sub => self.bullet_glyph_sub,
            _ => self.bullet_glyph_main,
        }
    }
}
