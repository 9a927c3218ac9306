use confluence_export::contract::PdfRender;
use confluence_export::html_to_pdf::HtmlToPdf;

const BASE_URL: &str = "https://example.atlassian.net";

#[test]
fn wrap_document_embeds_fragment_and_stylesheet() {
    let renderer = HtmlToPdf::new(BASE_URL).unwrap();
    let document = renderer.wrap_document("<p>hello</p>");

    assert!(document.contains("<meta charset=\"UTF-8\">"));
    assert!(document.contains(".page-title"));
    assert!(document.contains("table-wrapper"));
    assert!(document.contains("<p>hello</p>"));
}

#[test]
fn absolutize_resolves_relative_references_against_base() {
    let renderer = HtmlToPdf::new(BASE_URL).unwrap();

    let rewritten = renderer.absolutize(r#"<img src="/download/attachments/1/pic.png">"#);
    assert_eq!(
        rewritten,
        r#"<img src="https://example.atlassian.net/download/attachments/1/pic.png">"#
    );

    let rewritten = renderer.absolutize(r#"<a href="pages/42">link</a>"#);
    assert_eq!(rewritten, r#"<a href="https://example.atlassian.net/pages/42">link</a>"#);
}

#[test]
fn absolutize_leaves_absolute_and_fragment_references_alone() {
    let renderer = HtmlToPdf::new(BASE_URL).unwrap();

    let input = r##"<a href="https://other.example.com/x">a</a><a href="#anchor">b</a><img src="data:image/png;base64,AAAA">"##;
    assert_eq!(renderer.absolutize(input), input);
}

/// Same input must yield the same wrapped document; the renderer keeps no
/// hidden state between calls.
#[test]
fn wrap_document_is_deterministic() {
    let renderer = HtmlToPdf::new(BASE_URL).unwrap();
    let first = renderer.wrap_document("<p>same</p>");
    let second = renderer.wrap_document("<p>same</p>");
    assert_eq!(first, second);
}

#[cfg(feature = "pdf-render")]
#[test]
fn render_produces_pdf_bytes() {
    let renderer = HtmlToPdf::new(BASE_URL).unwrap();

    let bytes = renderer.render("<p>hello world</p>").expect("PDF conversion failed");

    assert!(bytes.len() > 100, "Output PDF is too small");
    assert_eq!(&bytes[0..4], b"%PDF", "PDF output missing magic header");
}

#[cfg(not(feature = "pdf-render"))]
#[test]
fn render_reports_unavailable_without_the_engine() {
    use confluence_export::html_to_pdf::RenderError;

    let renderer = HtmlToPdf::new(BASE_URL).unwrap();
    match renderer.render("<p>hello</p>") {
        Err(RenderError::Unavailable) => {}
        other => panic!("expected RenderError::Unavailable, got {other:?}"),
    }
}
