#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use rs_page_reader::{read_bytes, read_bytes_with_options, PageType, ReadOptions};

fn body_text(bytes: &[u8]) -> String {
    let result = read_bytes(bytes);
    let doc = result.document();
    doc.inner_text(doc.body())
}

/// UTF-8 content is handled correctly
#[test]
fn utf8_content_handled_correctly() {
    let html = "\
        <html>\
        <head><meta charset=\"utf-8\"></head>\
        <body>\
            <article>\
                <h1>Test Article</h1>\
                <p>This is UTF-8 content with special characters: é, ñ, ü, 中文</p>\
            </article>\
        </body>\
        </html>\
    "
    .as_bytes();

    let text = body_text(html);
    assert!(text.contains("Test Article"));
    for expected in ["é", "ñ", "ü", "中文"] {
        assert!(text.contains(expected), "missing {expected}");
    }
}

/// ISO-8859-1 encoding is converted to UTF-8
#[test]
fn iso88591_converted_to_utf8() {
    // é = 0xE9, ñ = 0xF1, ü = 0xFC in ISO-8859-1
    let html = b"<html>\
        <head><meta charset=\"ISO-8859-1\"><title>Caf\xE9</title></head>\
        <body><article>\
            <h1>Caf\xE9 espa\xF1ol</h1>\
            <p>M\xFCnchen</p>\
        </article></body></html>";

    let result = read_bytes(html);
    assert_eq!(result.metadata.title, "Café");
    let text = result.document().inner_text(result.document().body());
    assert!(text.contains("Café español"));
    assert!(text.contains("München"));
    assert!(result.warnings.is_empty());
}

/// Content-Type http-equiv declarations are honoured
#[test]
fn http_equiv_charset_is_detected() {
    let html = b"<html><head>\
        <meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\">\
        </head><body><p>\x93Quoted\x94 \x80 price</p></body></html>";

    let text = body_text(html);
    assert!(text.contains("\u{201c}Quoted\u{201d}"));
    assert!(text.contains('€'));
}

/// Pages without a declaration are read as UTF-8
#[test]
fn missing_declaration_defaults_to_utf8() {
    let html = "<html><body><p>naïve café</p></body></html>".as_bytes();
    assert_eq!(body_text(html), "naïve café");
}

/// Invalid sequences are replaced and reported, never fatal
#[test]
fn invalid_bytes_are_replaced_with_warning() {
    let html = b"<html><body><p>before \xFF\xFE\xFD after</p></body></html>";
    let result = read_bytes(html);

    assert_eq!(result.warnings.len(), 1);
    let text = result.document().inner_text(result.document().body());
    assert!(text.contains("before"));
    assert!(text.contains("after"));
    assert!(text.contains('\u{FFFD}'));
}

/// Byte input goes through the same pipeline as string input
#[test]
fn bytes_with_options_use_the_url() {
    let html = b"<html><head><meta charset=\"windows-1252\"></head><body>\
        <main><h1>R\xE9sum\xE9</h1>\
        <p>A long enough paragraph of text, so that the page reads like an article page.</p>\
        <p>Another paragraph follows with more words, commas, and a few closing thoughts.</p>\
        <p>A third paragraph pushes the text well past the length the classifier expects.</p>\
        <p>And a fourth, for good measure, since short pages are judged more strictly.</p>\
        <p><a href=\"/docs/next\">Next page</a></p>\
        </main></body></html>";
    let options = ReadOptions {
        url: Some("https://example.com/docs/resume".to_string()),
        ..ReadOptions::default()
    };

    let result = read_bytes_with_options(html, &options).expect("valid options");
    assert_eq!(result.page_type, PageType::Article);
    assert_eq!(result.link_hierarchy.sibling.len(), 1);
    assert!(result.aria_tree.to_string().contains("Résumé"));
}
