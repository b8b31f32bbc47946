//! Realistic page layouts read end to end.

#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use rs_page_reader::classifier::{classify_with_rule, Rule};
use rs_page_reader::{read, read_with_options, score_candidates, Document, PageType, ReadOptions};

const PARAGRAPH: &str = "Officials confirmed on Tuesday that the coastal road will stay closed, \
    while crews clear debris, inspect the sea wall, and restore power to nearby homes.";

fn news_page() -> String {
    let paragraphs = format!("<p>{PARAGRAPH}</p>").repeat(5);
    format!(
        r#"<html><head><title>Storm closes coastal road | Example News</title>
        <meta property="og:site_name" content="Example News"></head><body>
        <header><nav><a href="/">Home</a><a href="/world">World</a><a href="/sport">Sport</a></nav></header>
        <div class="container">
            <div class="article-body" id="story">
                <h1>Storm closes coastal road</h1>
                <p class="byline">By Staff</p>
                {paragraphs}
            </div>
            <aside class="sidebar"><h3>Related</h3><ul>
                <li><a href="/world/floods">Floods</a></li>
                <li><a href="/world/tides">Tides</a></li>
                <li><a href="/world/wind">Wind</a></li>
            </ul></aside>
        </div>
        <footer><p>Copyright Example News, all rights reserved worldwide.</p></footer>
        </body></html>"#
    )
}

#[test]
fn news_article_selects_the_story_body() {
    let result = read(&news_page());

    assert_eq!(result.page_type, PageType::Article);
    let root = result.selected_root.expect("article has a root");
    assert_eq!(result.document().element_id(root), Some("story"));

    let text = result.content_text().expect("root has text");
    assert!(text.contains("Storm closes coastal road"));
    assert!(!text.contains("Related"));
    assert!(!text.contains("Copyright"));

    assert_eq!(result.metadata.title, "Storm closes coastal road | Example News");
    assert_eq!(result.metadata.site_name.as_deref(), Some("Example News"));
}

#[test]
fn news_article_tree_describes_only_the_story() {
    let result = read(&news_page());
    let outline = result.aria_tree.to_string();

    assert!(outline.contains("heading \"Storm closes coastal road\" [level=1]"));
    assert!(!outline.contains("navigation"));
    assert!(!outline.contains("Floods"));
}

#[test]
fn news_page_candidates_rank_the_story_first() {
    let doc = Document::parse(&news_page());
    let candidates = score_candidates(&doc, 5);

    assert!(candidates.len() > 1);
    assert_eq!(doc.element_id(candidates[0].element), Some("story"));
}

const DOCS_PAGE: &str = r##"<html><head><title>Installing</title></head><body>
    <header><a href="/">Docs home</a></header>
    <nav class="sidebar"><ul>
        <li><a href="/guide">Guide</a></li>
        <li><a href="/guide/intro">Introduction</a></li>
        <li><a href="/guide/install/linux">Linux</a></li>
        <li><a href="/api">API reference</a></li>
        <li><a href="https://github.com/example/tool">Source</a></li>
    </ul></nav>
    <main>
        <h1>Installing</h1>
        <p>The tool ships as a single binary, so installing it takes one command on most systems.</p>
        <p>Make sure a recent toolchain is on your path, then run the command below from any directory.</p>
        <pre><code>cargo install tool</code></pre>
        <p>When the command finishes, the binary is ready, and the next chapter walks through first use.</p>
        <p><a href="#troubleshooting">Troubleshooting</a></p>
    </main>
</body></html>"##;

fn docs_options() -> ReadOptions {
    ReadOptions {
        url: Some("https://docs.example/guide/install".to_string()),
        ..ReadOptions::default()
    }
}

#[test]
fn documentation_page_is_an_article() {
    let result = read_with_options(DOCS_PAGE, &docs_options()).expect("valid options");

    assert_eq!(result.page_type, PageType::Article);
    let root = result.selected_root.expect("main is the root");
    assert_eq!(result.document().tag_name(root), Some("main"));
    assert!(result.aria_tree.to_string().contains("code"));
}

#[test]
fn documentation_sidebar_links_are_placed_by_path() {
    let result = read_with_options(DOCS_PAGE, &docs_options()).expect("valid options");
    let hierarchy = &result.link_hierarchy;

    let hrefs = |bucket: &[rs_page_reader::LinkRecord]| -> Vec<String> {
        bucket.iter().filter_map(|l| l.href.clone()).collect()
    };

    assert_eq!(hrefs(&hierarchy.parent), ["/", "/guide", "/api", "#troubleshooting"]);
    assert_eq!(hrefs(&hierarchy.sibling), ["/guide/intro"]);
    assert_eq!(hrefs(&hierarchy.child), ["/guide/install/linux"]);
    assert_eq!(hrefs(&hierarchy.external), ["https://github.com/example/tool"]);
}

#[test]
fn blog_index_is_other() {
    let posts: String = (1..=12)
        .map(|i| {
            format!(
                r#"<li class="post"><h2><a href="/blog/post-{i}">Post number {i}</a></h2>
                <p>A teaser for post {i}, long enough to be scored as text.</p></li>"#
            )
        })
        .collect();
    let html = format!("<body><main><h1>Blog</h1><ul>{posts}</ul></main></body>");

    let result = read(&html);
    assert_eq!(result.page_type, PageType::Other);
    assert!(result.selected_root.is_none());
    assert_eq!(result.links.len(), 12);
}

#[test]
fn home_page_with_a_long_essay_is_an_article() {
    let essay = format!("<p>{PARAGRAPH}</p>").repeat(10);
    let html = format!("<body><nav><a href=\"/about\">About</a></nav><article>{essay}</article></body>");
    let options = ReadOptions {
        url: Some("https://portal.example/".to_string()),
        ..ReadOptions::default()
    };

    let result = read_with_options(&html, &options).expect("valid options");
    assert_eq!(result.page_type, PageType::Article);
}

#[test]
fn home_page_with_short_blurbs_is_other() {
    let html = format!("<body><article><h1>Welcome</h1><p>{PARAGRAPH}</p></article></body>");
    let options = ReadOptions {
        url: Some("https://portal.example/".to_string()),
        ..ReadOptions::default()
    };

    let result = read_with_options(&html, &options).expect("valid options");
    assert_eq!(result.page_type, PageType::Other);
}

#[test]
fn tag_cloud_is_a_link_heavy_short_page() {
    let tags: String = (0..35)
        .map(|i| format!(r#"<a href="/tag/{i}">tag{i}</a> "#))
        .collect();
    let html = format!(
        r#"<body><h2>Tags</h2><p>Browse every topic on the site by its tag.</p>
        <div class="cloud">{tags}</div></body>"#
    );
    let doc = Document::parse(&html);
    let candidates = score_candidates(&doc, 5);
    assert!(candidates[0].score > 0.0);

    let (verdict, rule) = classify_with_rule(&doc, &candidates, 500, None);
    assert_eq!(verdict, PageType::Other);
    assert_eq!(rule, Rule::LinkHeavyShortPage);
    assert_eq!(read(&html).page_type, PageType::Other);
}
