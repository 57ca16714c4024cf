//! The output seam: an opaque document-writing surface. The layout engine and
//! sequencer only ever talk to this trait; the pdf module provides the real
//! implementation and the integration tests substitute a recording mock.

use crate::error::Error;
use crate::model::Bitmap;

/// Font emphasis combinations the layout engine resolves runs into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontFace {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => FontFace::BoldItalic,
            (true, false) => FontFace::Bold,
            (false, true) => FontFace::Italic,
            (false, false) => FontFace::Regular,
        }
    }
}

/// Complete style for one draw call. Every call carries the full style; the
/// sink must not depend on state left behind by earlier calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    /// Point size.
    pub size: f32,
    pub color: [u8; 3],
}

/// Document-writing surface. Coordinates are top-down document units: x from
/// the left page edge, y from the top page edge down to the text baseline.
/// The sink owns the physical page stack; nothing else may create pages.
pub trait OutputSink {
    fn page_width(&self) -> f32;
    fn page_height(&self) -> f32;

    /// 1-based index of the page currently being written.
    fn current_page(&self) -> usize;

    /// Draw one text span at (x, y) with its complete style.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);

    /// Horizontal rule of the given stroke width.
    fn draw_rule(&mut self, x1: f32, x2: f32, y: f32, width: f32, color: [u8; 3]);

    /// Filled rectangle; (x, y) is the top-left corner.
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 3]);

    /// Draw a bitmap scaled into the (w, h) box whose top-left corner is (x, y).
    fn draw_image(&mut self, bitmap: &Bitmap, x: f32, y: f32, w: f32, h: f32);

    /// Rendered width of `text` in document units, for the given style.
    fn text_width(&self, text: &str, style: TextStyle) -> f32;

    /// Close the current page and start a new blank one.
    fn add_page(&mut self);

    /// Finalize and return the serialized document.
    fn finish(&mut self) -> Result<Vec<u8>, Error>;
}
