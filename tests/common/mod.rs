#![allow(dead_code)]

use std::collections::HashMap;

use transcript_pdf::{
    Bitmap, BitmapFormat, CaptureError, CaptureHandle, CaptureOptions, ChartCapture, Error,
    FontFace, OutputSink, TextStyle,
};

/// Everything a sink was asked to draw, tagged with the page it landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        page: usize,
        face: FontFace,
        size: f32,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        page: usize,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        page: usize,
    },
    Image {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        page: usize,
    },
}

/// Recording sink with deterministic metrics: every character is
/// `char_width` units wide regardless of face or size.
pub struct MockSink {
    pub page_width: f32,
    pub page_height: f32,
    pub char_width: f32,
    pub page: usize,
    pub ops: Vec<DrawOp>,
}

impl Default for MockSink {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            char_width: 2.0,
            page: 1,
            ops: Vec::new(),
        }
    }
}

impl MockSink {
    pub fn texts(&self) -> Vec<(String, f32, f32, usize)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, x, y, page, .. } => {
                    Some((text.clone(), *x, *y, *page))
                }
                _ => None,
            })
            .collect()
    }

    pub fn text_joined(&self) -> String {
        self.texts()
            .into_iter()
            .map(|(t, ..)| t)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn images(&self) -> Vec<(f32, f32, f32, f32, usize)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { x, y, w, h, page } => Some((*x, *y, *w, *h, *page)),
                _ => None,
            })
            .collect()
    }

    pub fn find_text(&self, needle: &str) -> Option<(String, f32, f32, usize)> {
        self.texts().into_iter().find(|(t, ..)| t.contains(needle))
    }
}

impl OutputSink for MockSink {
    fn page_width(&self) -> f32 {
        self.page_width
    }

    fn page_height(&self) -> f32 {
        self.page_height
    }

    fn current_page(&self) -> usize {
        self.page
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            page: self.page,
            face: style.face,
            size: style.size,
        });
    }

    fn draw_rule(&mut self, x1: f32, x2: f32, y: f32, _width: f32, _color: [u8; 3]) {
        self.ops.push(DrawOp::Rule {
            x1,
            x2,
            y,
            page: self.page,
        });
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, _color: [u8; 3]) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            w,
            h,
            page: self.page,
        });
    }

    fn draw_image(&mut self, _bitmap: &Bitmap, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::Image {
            x,
            y,
            w,
            h,
            page: self.page,
        });
    }

    fn text_width(&self, text: &str, _style: TextStyle) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn add_page(&mut self) {
        self.page += 1;
    }

    fn finish(&mut self) -> Result<Vec<u8>, Error> {
        Ok(Vec::new())
    }
}

/// Scripted capture: handles listed in `bitmaps` resolve to a bitmap of the
/// given pixel size; everything else reports not-mounted. Records every
/// resolution attempt in order.
pub struct MockCapture {
    pub bitmaps: HashMap<String, (u32, u32)>,
    pub calls: Vec<String>,
}

impl MockCapture {
    pub fn empty() -> Self {
        Self {
            bitmaps: HashMap::new(),
            calls: Vec::new(),
        }
    }

    pub fn with(handles: &[(&str, u32, u32)]) -> Self {
        Self {
            bitmaps: handles
                .iter()
                .map(|&(h, w, px_h)| (h.to_string(), (w, px_h)))
                .collect(),
            calls: Vec::new(),
        }
    }
}

impl ChartCapture for MockCapture {
    async fn render_to_bitmap(
        &mut self,
        handle: &CaptureHandle,
        _options: &CaptureOptions,
    ) -> Result<Bitmap, CaptureError> {
        self.calls.push(handle.0.clone());
        match self.bitmaps.get(&handle.0) {
            Some(&(w, h)) => Ok(Bitmap {
                data: vec![0u8; 8],
                format: BitmapFormat::Png,
                pixel_width: w,
                pixel_height: h,
            }),
            None => Err(CaptureError::NotMounted),
        }
    }
}

/// Minimal real PNG for tests that drive the pdf-writer sink.
pub fn tiny_png(width: u32, height: u32) -> Bitmap {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([90, 120, 200]));
    let mut data = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut data),
        image::ImageFormat::Png,
    )
    .expect("encode png");
    Bitmap {
        data,
        format: BitmapFormat::Png,
        pixel_width: width,
        pixel_height: height,
    }
}
