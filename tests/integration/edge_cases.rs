//! Edge cases that cut across scoring, the tree builder and link analysis.

#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use rs_page_reader::{
    build_aria_tree, read, read_with_options, AriaNode, AriaType, Document, PageType, ReadOptions,
};

fn find(node: &AriaNode, node_type: AriaType) -> Option<&AriaNode> {
    if node.node_type == node_type {
        return Some(node);
    }
    node.children.iter().find_map(|c| find(c, node_type))
}

#[test]
fn hidden_content_stays_out_of_the_tree() {
    let html = r#"<body><main>
        <p>Visible paragraph</p>
        <p hidden>Hidden by attribute</p>
        <p style="display: none">Hidden by style</p>
        <div aria-hidden="true"><p>Hidden from assistive tech</p></div>
    </main></body>"#;

    let outline = read(html).aria_tree.to_string();
    assert!(outline.contains("Visible paragraph"));
    assert!(!outline.contains("Hidden"));
}

#[test]
fn form_controls_carry_their_states() {
    let html = r#"<body><form aria-label="Sign in">
        <input type="email" aria-label="Email" required>
        <input type="checkbox" aria-label="Remember me" checked>
        <input type="range" aria-label="Volume" min="0" max="10" value="4">
        <button disabled>Go</button>
    </form></body>"#;
    let doc = Document::parse(html);
    let tree = build_aria_tree(&doc, doc.body());

    let form = find(&tree, AriaType::Form).expect("form node");
    assert_eq!(form.name.as_deref(), Some("Sign in"));

    let email = find(&tree, AriaType::TextBox).expect("textbox node");
    assert!(email.required);

    let checkbox = find(&tree, AriaType::Checkbox).expect("checkbox node");
    assert_eq!(checkbox.checked, Some(true));

    let slider = find(&tree, AriaType::Slider).expect("slider node");
    let value = slider.value.as_ref().expect("slider value");
    assert_eq!((value.min, value.max, value.now), (Some(0.0), Some(10.0), Some(4.0)));

    let button = find(&tree, AriaType::Button).expect("button node");
    assert_eq!(button.name.as_deref(), Some("Go"));
    assert!(button.disabled);
}

#[test]
fn explicit_roles_override_tags() {
    let html = r#"<body><div role="navigation banner" aria-label="Site"><span role="none">x</span></div></body>"#;
    let doc = Document::parse(html);
    let tree = build_aria_tree(&doc, doc.body());

    let nav = find(&tree, AriaType::Navigation).expect("first role token wins");
    assert_eq!(nav.name.as_deref(), Some("Site"));
    assert!(find(&tree, AriaType::Banner).is_none());
}

#[test]
fn two_mains_are_scored_instead_of_trusted() {
    let prose = "A sentence of real prose, with commas, that keeps going for a while. ";
    let html = format!(
        "<body><main><p>{}</p></main><main><p>{}</p></main></body>",
        prose.repeat(2),
        prose.repeat(10)
    );
    let result = read(&html);

    assert!(result.candidates.len() >= 2);
    assert!(result.candidates[0].score > 0.0);
    let top = result.candidates[0].element;
    assert!(result.document().inner_text(top).len() > prose.len() * 5);
}

#[test]
fn links_without_a_page_url_are_listed_but_not_placed() {
    let html = r#"<body><a href="/a">A</a><a href="https://elsewhere.example/">B</a></body>"#;
    let result = read(html);

    assert_eq!(result.links.len(), 2);
    assert!(result.link_hierarchy.parent.is_empty());
    assert!(result.link_hierarchy.external.is_empty());
}

#[test]
fn base_element_sets_the_document_base() {
    let html = r#"<html><head><base href="/static/"></head><body>
        <main><p>Short page.</p><a href="img/logo.png">Logo</a></main>
    </body></html>"#;
    let options = ReadOptions {
        url: Some("https://site.example/docs/guide".to_string()),
        ..ReadOptions::default()
    };
    let result = read_with_options(html, &options).expect("valid options");
    let doc = result.document();

    assert_eq!(
        doc.base_uri().map(ToString::to_string).as_deref(),
        Some("https://site.example/static/")
    );
    assert_eq!(
        doc.resolve_url("img/logo.png").map(|u| u.to_string()).as_deref(),
        Some("https://site.example/static/img/logo.png")
    );
    // Link placement still follows the page URL.
    assert_eq!(result.link_hierarchy.parent.len(), 1);
}

#[test]
fn articles_url_without_content_is_still_other() {
    let options = ReadOptions {
        url: Some("https://site.example/articles/2024/launch".to_string()),
        ..ReadOptions::default()
    };
    let result = read_with_options("<body></body>", &options).expect("valid options");
    assert_eq!(result.page_type, PageType::Other);
}
