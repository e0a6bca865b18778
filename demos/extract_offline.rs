//! Offline extraction example: runs the pipeline on in-memory responses
//!
//! ```text
//! cargo run --example extract_offline
//! cargo run --example extract_offline -- page.html "text/html; charset=euc-jp"
//! ```

use site_meta::SiteMeta;
use site_meta::etag::ETagGenerator;

fn main() {
    let mut args = std::env::args().skip(1);
    if let Some(path) = args.next() {
        let content_type = args.next().unwrap_or_else(|| "text/html".to_string());
        let body = std::fs::read(&path).expect("Failed to read input file");
        show(&content_type, &body);
        return;
    }

    println!("=== Site Meta - Offline Examples ===\n");

    // Example 1: Open Graph and Twitter Card tags together
    example_1();

    // Example 2: Legacy Japanese encoding declared in the document
    example_2();

    // Example 3: No social metadata at all
    example_3();

    // Example 4: Non-HTML content
    example_4();
}

fn show(content_type: &str, body: &[u8]) {
    println!("Content-Type: {content_type}");
    match SiteMeta::default().extract(Some(content_type), body) {
        Ok(meta) if meta.is_empty() => println!("(no social metadata)"),
        Ok(meta) => {
            println!("{meta}");
            println!("ETag: {}", ETagGenerator::new().generate(&meta));
        }
        Err(err) => println!("error [{}]: {err}", err.kind()),
    }
    println!("---\n");
}

fn example_1() {
    println!("Example 1: Open Graph and Twitter Card");
    show(
        "text/html",
        br#"<html><head>
            <meta property="og:title" content="The Rock">
            <meta property="og:type" content="video.movie">
            <meta name="twitter:card" content="summary_large_image">
            <meta name="viewport" content="width=device-width">
        </head></html>"#,
    );
}

fn example_2() {
    println!("Example 2: EUC-JP declared with <meta charset>");
    let html = r#"<html><head><meta charset="euc-jp"><meta property="og:title" content="日本の映画"></head></html>"#;
    let (body, _, _) = encoding_rs::EUC_JP.encode(html);
    show("text/html", &body);
}

fn example_3() {
    println!("Example 3: Page without social metadata");
    show("text/html", b"<html><head><title>Plain</title></head></html>");
}

fn example_4() {
    println!("Example 4: Non-HTML content");
    show("application/pdf", b"%PDF-1.7");
}
