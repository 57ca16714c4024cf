mod common;

use transcript_pdf::{
    Bitmap, CaptureError, CaptureHandle, CaptureOptions, ChartBlock, ChartCapture, ContentBlock,
    DocConfig, Error, Exporter, FontFace, OutputSink, PdfSink, TableBlock, TextBlock, TextStyle,
};

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn style(face: FontFace) -> TextStyle {
    TextStyle {
        face,
        size: 11.0,
        color: [0, 0, 0],
    }
}

/// Capture that always answers with a small real PNG.
struct PngCapture;

impl ChartCapture for PngCapture {
    async fn render_to_bitmap(
        &mut self,
        _handle: &CaptureHandle,
        _options: &CaptureOptions,
    ) -> Result<Bitmap, CaptureError> {
        Ok(common::tiny_png(64, 32))
    }
}

#[test]
fn geometry_and_page_counting() {
    let mut sink = PdfSink::new(210.0, 297.0).unwrap();
    assert_eq!(sink.page_width(), 210.0);
    assert_eq!(sink.page_height(), 297.0);
    assert_eq!(sink.current_page(), 1);
    sink.add_page();
    sink.add_page();
    assert_eq!(sink.current_page(), 3);
}

#[test]
fn invalid_geometry_is_a_sink_error() {
    assert!(matches!(PdfSink::new(0.0, 297.0), Err(Error::Sink(_))));
    assert!(matches!(PdfSink::new(210.0, -1.0), Err(Error::Sink(_))));
}

#[test]
fn text_width_tracks_length_and_weight() {
    let sink = PdfSink::a4().unwrap();
    let regular = style(FontFace::Regular);
    assert!(sink.text_width("ab", regular) > sink.text_width("a", regular));
    assert!(sink.text_width(" ", regular) > 0.0);
    assert!(
        sink.text_width("word", style(FontFace::Bold)) >= sink.text_width("word", regular),
        "bold metrics must not be narrower than regular"
    );
    // Oblique shares upright metrics.
    assert_eq!(
        sink.text_width("word", style(FontFace::Italic)),
        sink.text_width("word", regular)
    );
}

#[test]
fn finish_emits_a_pdf_with_every_page() {
    let mut sink = PdfSink::a4().unwrap();
    sink.draw_text("page one", 15.0, 20.0, style(FontFace::Regular));
    sink.add_page();
    sink.draw_text("page two", 15.0, 20.0, style(FontFace::Bold));

    let bytes = sink.finish().unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, b"/Count 2"), "expected two pages");

    // A second finalize is refused instead of emitting a second document.
    assert!(matches!(sink.finish(), Err(Error::Sink(_))));
}

#[test]
fn drawing_survives_exotic_input_text() {
    let mut sink = PdfSink::a4().unwrap();
    // Unmappable characters are dropped at encoding; nothing panics.
    sink.draw_text("naïve — café \u{1F600}", 15.0, 20.0, style(FontFace::Regular));
    sink.draw_text("", 15.0, 30.0, style(FontFace::Regular));
    let bytes = sink.finish().unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn full_export_embeds_text_table_and_chart() {
    let cfg = DocConfig {
        settle_initial_ms: 0,
        settle_per_chart_ms: 0,
        ..DocConfig::default()
    };
    let exporter = Exporter::new(cfg);
    let blocks = vec![
        ContentBlock::Text(TextBlock {
            id: "intro".to_string(),
            heading: Some("Overview".to_string()),
            body: "Revenue was **up** this quarter.\n\n• Item one\n\t• Nested".to_string(),
            styled: true,
        }),
        ContentBlock::Table(TableBlock {
            id: "figures".to_string(),
            heading: Some("Figures".to_string()),
            columns: vec!["Quarter".to_string(), "Revenue".to_string()],
            rows: vec![
                vec!["Q1".to_string(), "1.2M".to_string()],
                vec!["Q2".to_string(), "1.4M".to_string()],
            ],
        }),
        ContentBlock::Chart(ChartBlock {
            id: "trend".to_string(),
            heading: Some("Trend".to_string()),
            handle: CaptureHandle::new("trend-chart"),
        }),
    ];

    let mut capture = PngCapture;
    let bytes = exporter.export_pdf(&blocks, &mut capture).await.unwrap();

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, b"/XObject"), "chart bitmap was not embedded");
    assert!(contains(&bytes, b"/Image"));
    // All four faces are registered as page resources.
    for font in [b"/F1", b"/F2", b"/F3", b"/F4"] {
        assert!(contains(&bytes, font));
    }
}
