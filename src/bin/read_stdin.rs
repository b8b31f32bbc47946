//! Simple CLI that reads HTML from stdin and writes a JSON summary to stdout.
//!
//! An optional first argument is the page URL. Logs go to stderr and are
//! filtered with `RUST_LOG` (default `warn`).

use std::io::{self, Read};

use rs_page_reader::{
    read_bytes_with_options, AriaNode, LinkHierarchy, PageMetadata, PageType, ReadOptions,
};
use serde::Serialize;

#[derive(Serialize)]
struct Output {
    page_type: PageType,
    metadata: PageMetadata,
    main_content: Option<String>,
    candidates: usize,
    aria_tree: AriaNode,
    outline: String,
    link_hierarchy: LinkHierarchy,
    warnings: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut html = Vec::new();
    if io::stdin().read_to_end(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let options = ReadOptions {
        url: std::env::args().nth(1),
        ..ReadOptions::default()
    };

    let result = match read_bytes_with_options(&html, &options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let output = Output {
        page_type: result.page_type,
        main_content: result.content_text(),
        candidates: result.candidates.len(),
        outline: result.aria_tree.to_string(),
        metadata: result.metadata,
        aria_tree: result.aria_tree,
        link_hierarchy: result.link_hierarchy,
        warnings: result.warnings,
    };

    println!("{}", serde_json::to_string(&output).unwrap_or_default());
}
