mod common;

use common::{DrawOp, MockSink};
use transcript_pdf::layout::{layout_tokens, Frame, LayoutStyle};
use transcript_pdf::markdown::parse;
use transcript_pdf::model::{Cursor, DocConfig};
use transcript_pdf::sink::OutputSink;

fn style() -> LayoutStyle {
    LayoutStyle {
        size: 11.0,
        line_height: 7.0,
        color: [0, 0, 0],
    }
}

fn frame(cfg: &DocConfig) -> Frame {
    Frame {
        x: cfg.margin_left,
        width: cfg.content_width(),
        top: cfg.margin_top,
        bottom: cfg.page_bottom(),
    }
}

fn start(cfg: &DocConfig) -> Cursor {
    Cursor {
        y: cfg.margin_top,
        page: 1,
    }
}

#[test]
fn wrapped_text_never_passes_the_right_edge() {
    let cfg = DocConfig::default();
    let mut sink = MockSink::default();
    // 40-unit column, 2 units/char: 20 characters per line.
    let narrow = Frame {
        width: 40.0,
        ..frame(&cfg)
    };
    let tokens = parse("the quick brown fox jumps over the lazy dog again and again and again");
    layout_tokens(&mut sink, &tokens, &narrow, &style(), &cfg, start(&cfg));

    assert!(sink.texts().len() > 1, "expected the text to wrap");
    for (text, x, ..) in sink.texts() {
        let w = text.chars().count() as f32 * sink.char_width;
        assert!(
            x + w <= narrow.x + narrow.width + 0.01,
            "{text:?} at x={x} width={w} passes the frame edge"
        );
    }
}

#[test]
fn overlong_single_word_is_split_not_overflowed() {
    let cfg = DocConfig::default();
    let mut sink = MockSink::default();
    let narrow = Frame {
        width: 20.0,
        ..frame(&cfg)
    };
    // 30 chars = 60 units, three times the column width.
    let tokens = parse("abcdefghijklmnopqrstuvwxyzabcd");
    layout_tokens(&mut sink, &tokens, &narrow, &style(), &cfg, start(&cfg));

    assert!(sink.texts().len() >= 3);
    for (text, x, ..) in sink.texts() {
        let w = text.chars().count() as f32 * sink.char_width;
        assert!(x + w <= narrow.x + narrow.width + 0.01, "{text:?} overflows");
    }
    let rejoined: String = sink.texts().into_iter().map(|(t, ..)| t).collect();
    assert_eq!(rejoined, "abcdefghijklmnopqrstuvwxyzabcd");
}

#[test]
fn sub_bullets_indent_deeper_and_indent_never_leaks() {
    let cfg = DocConfig::default();
    let mut sink = MockSink::default();
    let tokens = parse("• main item\n\t• sub item\nfollow-up line");
    layout_tokens(&mut sink, &tokens, &frame(&cfg), &style(), &cfg, start(&cfg));

    let (_, main_x, ..) = sink.find_text("main").expect("main item drawn");
    let (_, sub_x, ..) = sink.find_text("sub").expect("sub item drawn");
    let (_, follow_x, ..) = sink.find_text("follow-up").expect("follow-up drawn");

    assert!(
        sub_x > main_x,
        "sub-bullet text ({sub_x}) must sit right of main-bullet text ({main_x})"
    );
    assert_eq!(
        follow_x, cfg.margin_left,
        "indentation leaked onto the following plain line"
    );
    assert_eq!(main_x, cfg.margin_left + cfg.bullet_indent_main);
    assert_eq!(sub_x, cfg.margin_left + cfg.bullet_indent_sub);
}

#[test]
fn bullet_glyphs_nest_visibly() {
    let cfg = DocConfig::default();
    let mut sink = MockSink::default();
    let tokens = parse("• a\n\t• b");
    layout_tokens(&mut sink, &tokens, &frame(&cfg), &style(), &cfg, start(&cfg));

    let glyphs: Vec<f32> = sink
        .texts()
        .into_iter()
        .filter(|(t, ..)| t == "\u{2022}")
        .map(|(_, x, ..)| x)
        .collect();
    assert_eq!(glyphs.len(), 2);
    assert!(glyphs[1] > glyphs[0], "sub glyph must sit right of main glyph");
}

#[test]
fn paragraph_break_is_pure_spacing() {
    let cfg = DocConfig::default();
    let mut sink = MockSink::default();
    let tokens = parse("first\n\nsecond");
    layout_tokens(&mut sink, &tokens, &frame(&cfg), &style(), &cfg, start(&cfg));

    let (_, _, first_y, _) = sink.find_text("first").unwrap();
    let (_, _, second_y, _) = sink.find_text("second").unwrap();
    // line end + blank line = two line heights, and nothing drawn between.
    assert_eq!(second_y, first_y + 2.0 * cfg.line_height);
    assert_eq!(sink.texts().len(), 2);
}

#[test]
fn page_break_resets_y_to_top_margin() {
    let cfg = DocConfig::default();
    let mut sink = MockSink::default();
    let body: String = (0..60).map(|i| format!("line {i}\n")).collect();
    let tokens = parse(&body);
    let end = layout_tokens(&mut sink, &tokens, &frame(&cfg), &style(), &cfg, start(&cfg));

    assert!(end.page > 1, "60 lines at 7 units must overflow one page");
    let first_on_page2 = sink
        .texts()
        .into_iter()
        .find(|&(_, _, _, page)| page == 2)
        .expect("content on page 2");
    assert_eq!(first_on_page2.2, cfg.margin_top);
}

#[test]
fn cursor_is_monotonic_within_each_page() {
    let cfg = DocConfig::default();
    let mut sink = MockSink::default();
    let body: String = (0..80)
        .map(|i| format!("• bullet {i}\n\t• nested {i}\n\nparagraph {i}\n"))
        .collect();
    let tokens = parse(&body);
    let end = layout_tokens(&mut sink, &tokens, &frame(&cfg), &style(), &cfg, start(&cfg));

    let mut last: Option<(usize, f32)> = None;
    for op in &sink.ops {
        if let DrawOp::Text { y, page, .. } = op {
            if let Some((lp, ly)) = last {
                assert!(*page >= lp, "page went backwards");
                if *page == lp {
                    assert!(*y >= ly, "y decreased within page {lp}: {ly} -> {y}");
                }
            }
            last = Some((*page, *y));
        }
    }
    assert_eq!(end.page, sink.current_page());
}

#[test]
fn returned_cursor_continues_below_the_last_line() {
    let cfg = DocConfig::default();
    let mut sink = MockSink::default();
    let tokens = parse("only line");
    let end = layout_tokens(&mut sink, &tokens, &frame(&cfg), &style(), &cfg, start(&cfg));
    assert_eq!(end.y, cfg.margin_top + cfg.line_height);
    assert_eq!(end.page, 1);
}
