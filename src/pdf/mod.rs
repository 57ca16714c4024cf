//! `OutputSink` backed by pdf-writer. Pages are built as content streams and
//! assembled into the document tree on `finish`; user-space coordinates are
//! top-down millimetre units and only become PDF points in here.

mod metrics;

use std::mem;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::model::{Bitmap, BitmapFormat};
use crate::sink::{FontFace, OutputSink, TextStyle};
use metrics::{base_font_name, face_widths, text_width_pts, to_winansi_bytes};

/// Millimetre user units → PDF points.
const PT_PER_UNIT: f32 = 72.0 / 25.4;

const FACES: [FontFace; 4] = [
    FontFace::Regular,
    FontFace::Bold,
    FontFace::Italic,
    FontFace::BoldItalic,
];

struct FontSlot {
    pdf_name: &'static str,
    font_ref: Ref,
    widths_1000: Vec<f32>,
}

pub struct PdfSink {
    pdf: Pdf,
    next_id: i32,
    page_width: f32,
    page_height: f32,
    fonts: Vec<FontSlot>,
    /// (resource name, xobject ref) for every embedded image.
    images: Vec<(String, Ref)>,
    /// Closed pages, in order. The open page is `current`.
    pages: Vec<Content>,
    current: Content,
    finished: bool,
}

impl PdfSink {
    /// A4 portrait with the default millimetre geometry.
    pub fn a4() -> Result<Self, Error> {
        Self::new(210.0, 297.0)
    }

    pub fn new(page_width: f32, page_height: f32) -> Result<Self, Error> {
        if !(page_width > 0.0 && page_height > 0.0) {
            return Err(Error::Sink(format!(
                "invalid page geometry {page_width}x{page_height}"
            )));
        }

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        // The four base-14 Helvetica faces cover every emphasis combination
        // the layout engine produces; nothing is read from disk.
        let fonts: Vec<FontSlot> = FACES
            .iter()
            .enumerate()
            .map(|(i, &face)| {
                let font_ref = alloc();
                pdf.type1_font(font_ref)
                    .base_font(Name(base_font_name(face).as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                FontSlot {
                    pdf_name: ["F1", "F2", "F3", "F4"][i],
                    font_ref,
                    widths_1000: face_widths(face),
                }
            })
            .collect();

        Ok(Self {
            pdf,
            next_id,
            page_width,
            page_height,
            fonts,
            images: Vec::new(),
            pages: Vec::new(),
            current: Content::new(),
            finished: false,
        })
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    fn face_index(face: FontFace) -> usize {
        match face {
            FontFace::Regular => 0,
            FontFace::Bold => 1,
            FontFace::Italic => 2,
            FontFace::BoldItalic => 3,
        }
    }

    /// Embed a bitmap as an image XObject, returning its resource name.
    /// JPEG passes through with DctDecode; PNG is decoded to raw RGB plus an
    /// SMask when any pixel carries alpha.
    fn embed_image(&mut self, bitmap: &Bitmap) -> Option<String> {
        let xobj_ref = self.alloc();
        let pdf_name = format!("Im{}", self.images.len() + 1);

        match bitmap.format {
            BitmapFormat::Jpeg => {
                let mut xobj = self.pdf.image_xobject(xobj_ref, &bitmap.data);
                xobj.filter(Filter::DctDecode);
                xobj.width(bitmap.pixel_width as i32);
                xobj.height(bitmap.pixel_height as i32);
                xobj.color_space().device_rgb();
                xobj.bits_per_component(8);
            }
            BitmapFormat::Png => {
                let cursor = std::io::Cursor::new(&bitmap.data);
                let reader = image::ImageReader::with_format(
                    std::io::BufReader::new(cursor),
                    image::ImageFormat::Png,
                );
                let decoded = match reader.decode() {
                    Ok(d) => d,
                    Err(e) => {
                        log::warn!("dropping undecodable PNG bitmap: {e}");
                        return None;
                    }
                };
                let rgba: image::RgbaImage = decoded.to_rgba8();
                let (w, h) = (rgba.width(), rgba.height());
                let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

                let rgb_data: Vec<u8> = rgba
                    .pixels()
                    .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                    .collect();
                let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

                let smask_ref = if has_alpha {
                    let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                    let compressed_alpha =
                        miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                    let mask_ref = self.alloc();
                    let mut mask = self.pdf.image_xobject(mask_ref, &compressed_alpha);
                    mask.filter(Filter::FlateDecode);
                    mask.width(w as i32);
                    mask.height(h as i32);
                    mask.color_space().device_gray();
                    mask.bits_per_component(8);
                    Some(mask_ref)
                } else {
                    None
                };

                let mut xobj = self.pdf.image_xobject(xobj_ref, &compressed_rgb);
                xobj.filter(Filter::FlateDecode);
                xobj.width(w as i32);
                xobj.height(h as i32);
                xobj.color_space().device_rgb();
                xobj.bits_per_component(8);
                if let Some(mask_ref) = smask_ref {
                    xobj.s_mask(mask_ref);
                }
            }
        }

        self.images.push((pdf_name.clone(), xobj_ref));
        Some(pdf_name)
    }
}

impl OutputSink for PdfSink {
    fn page_width(&self) -> f32 {
        self.page_width
    }

    fn page_height(&self) -> f32 {
        self.page_height
    }

    fn current_page(&self) -> usize {
        self.pages.len() + 1
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let bytes = to_winansi_bytes(text);
        if bytes.is_empty() {
            return;
        }
        let slot = &self.fonts[Self::face_index(style.face)];
        let [r, g, b] = style.color;
        let c = &mut self.current;
        c.begin_text();
        c.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        c.set_font(Name(slot.pdf_name.as_bytes()), style.size);
        c.next_line(x * PT_PER_UNIT, (self.page_height - y) * PT_PER_UNIT);
        c.show(Str(&bytes));
        c.end_text();
    }

    fn draw_rule(&mut self, x1: f32, x2: f32, y: f32, width: f32, color: [u8; 3]) {
        let [r, g, b] = color;
        let py = (self.page_height - y) * PT_PER_UNIT;
        let c = &mut self.current;
        c.save_state();
        c.set_line_width(width * PT_PER_UNIT);
        c.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        c.move_to(x1 * PT_PER_UNIT, py);
        c.line_to(x2 * PT_PER_UNIT, py);
        c.stroke();
        c.restore_state();
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 3]) {
        let [r, g, b] = color;
        let c = &mut self.current;
        c.save_state();
        c.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        c.rect(
            x * PT_PER_UNIT,
            (self.page_height - y - h) * PT_PER_UNIT,
            w * PT_PER_UNIT,
            h * PT_PER_UNIT,
        );
        c.fill_nonzero();
        c.restore_state();
    }

    fn draw_image(&mut self, bitmap: &Bitmap, x: f32, y: f32, w: f32, h: f32) {
        let Some(pdf_name) = self.embed_image(bitmap) else {
            return;
        };
        let c = &mut self.current;
        c.save_state();
        c.transform([
            w * PT_PER_UNIT,
            0.0,
            0.0,
            h * PT_PER_UNIT,
            x * PT_PER_UNIT,
            (self.page_height - y - h) * PT_PER_UNIT,
        ]);
        c.x_object(Name(pdf_name.as_bytes()));
        c.restore_state();
    }

    fn text_width(&self, text: &str, style: TextStyle) -> f32 {
        let slot = &self.fonts[Self::face_index(style.face)];
        text_width_pts(&slot.widths_1000, text, style.size) / PT_PER_UNIT
    }

    fn add_page(&mut self) {
        let closed = mem::replace(&mut self.current, Content::new());
        self.pages.push(closed);
    }

    fn finish(&mut self) -> Result<Vec<u8>, Error> {
        if self.finished {
            return Err(Error::Sink("document already finalized".into()));
        }
        self.finished = true;
        self.add_page();

        let n = self.pages.len();
        let catalog_id = self.alloc();
        let pages_id = self.alloc();
        let page_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();

        let mut pdf = mem::replace(&mut self.pdf, Pdf::new());

        for (i, content) in mem::take(&mut self.pages).into_iter().enumerate() {
            let raw = content.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let media_box = Rect::new(
            0.0,
            0.0,
            self.page_width * PT_PER_UNIT,
            self.page_height * PT_PER_UNIT,
        );
        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(media_box)
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                for slot in &self.fonts {
                    fonts.pair(Name(slot.pdf_name.as_bytes()), slot.font_ref);
                }
            }
            if !self.images.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &self.images {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        Ok(pdf.finish())
    }
}
