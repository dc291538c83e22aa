//! Fetch -> extract -> package -> write, against a local stub server.

mod common;

use common::stub_server::{self, StubResponse};
use std::fs::File;
use std::io::Read;
use url2epub::epub::{part_path, Package};
use url2epub::{extract, fetch_page, write_epub, ExtractionMode, FetchError, HttpClient, Layout};
use zip::read::ZipArchive;

const ARTICLE: &str = "<html><head><title>Test</title></head><body><article><p>This is a long enough paragraph for inclusion.</p><p>Hi</p></article></body></html>";

fn read_entry(path: &std::path::Path, name: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut zip = ZipArchive::new(File::open(path)?)?;
    let mut s = String::new();
    zip.by_name(name)?.read_to_string(&mut s)?;
    Ok(s)
}

#[test]
fn article_page_becomes_single_chapter_epub() -> Result<(), Box<dyn std::error::Error>> {
    let server = stub_server::start(vec![("/article", StubResponse::html(ARTICLE))]);
    let client = HttpClient::new()?;
    let url = server.url("/article");

    let html = fetch_page(&client, &url)?;
    let doc = extract(&html, &url, ExtractionMode::Auto);
    assert_eq!(doc.title, "Test");
    assert_eq!(doc.blocks, vec!["This is a long enough paragraph for inclusion."]);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join(doc.default_file_name());
    assert!(path.ends_with("Test.epub"));
    write_epub(&Package::from_document(&doc), &path)?;
    assert!(!part_path(&path).exists());

    let chapter = read_entry(&path, "OEBPS/chapter1.xhtml")?;
    assert_eq!(chapter.matches("<p>").count(), 1);
    assert!(chapter.contains("<h1>Test</h1>"));
    assert!(chapter.contains("<p>This is a long enough paragraph for inclusion.</p>"));
    assert!(chapter.contains(&format!(r#"<a href="{}">"#, url)));
    assert!(!chapter.contains("<p>Hi</p>"));

    let opf = read_entry(&path, "OEBPS/content.opf")?;
    assert!(opf.contains(&url2epub::epub::identifier_for(&url)));
    let nav = read_entry(&path, "OEBPS/nav.xhtml")?;
    assert_eq!(nav.matches("chapter1.xhtml").count(), 1);
    Ok(())
}

#[test]
fn page_without_blocks_packages_as_preformatted() -> Result<(), Box<dyn std::error::Error>> {
    let page = "<html><head><title>Loose: text?</title></head><body><div>第一句。第二句！ last bit</div><script>track()</script></body></html>";
    let server = stub_server::start(vec![("/loose", StubResponse::html(page))]);
    let client = HttpClient::new()?;
    let url = server.url("/loose");

    let doc = extract(&fetch_page(&client, &url)?, &url, ExtractionMode::Auto);
    assert_eq!(doc.title, "Loose text");
    assert_eq!(doc.layout, Layout::Preformatted);
    assert_eq!(doc.blocks, vec!["第一句。", "第二句！", "last bit"]);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("loose.epub");
    write_epub(&Package::from_document(&doc), &path)?;
    let chapter = read_entry(&path, "OEBPS/chapter1.xhtml")?;
    assert!(chapter.contains("<pre>第一句。\n第二句！\nlast bit</pre>"));
    assert!(!chapter.contains("track()"));
    let css = read_entry(&path, "OEBPS/style/book.css")?;
    assert!(css.contains("pre-wrap"));
    Ok(())
}

#[test]
fn empty_page_still_writes_epub() -> Result<(), Box<dyn std::error::Error>> {
    let server = stub_server::start(vec![("/empty", StubResponse::html(""))]);
    let client = HttpClient::new()?;
    let url = server.url("/empty");

    let doc = extract(&fetch_page(&client, &url)?, &url, ExtractionMode::Structured);
    assert_eq!(doc.title, "Untitled");
    assert!(doc.blocks.is_empty());

    let dir = tempfile::tempdir()?;
    let path = dir.path().join(doc.default_file_name());
    write_epub(&Package::from_document(&doc), &path)?;
    assert!(path.ends_with("Untitled.epub"));
    assert!(path.exists());
    Ok(())
}

#[test]
fn not_found_is_http_status_error() -> Result<(), Box<dyn std::error::Error>> {
    let server = stub_server::start(vec![]);
    let client = HttpClient::new()?;
    let result = fetch_page(&client, &server.url("/missing"));
    assert!(matches!(result, Err(FetchError::HttpStatus { status: 404, .. })));
    Ok(())
}

#[test]
fn unreachable_host_is_network_error() -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::builder().timeout_secs(5).build()?;
    let result = fetch_page(&client, &format!("{}/x", stub_server::closed_port_url()));
    assert!(matches!(result, Err(FetchError::Network { .. })));
    Ok(())
}

#[test]
fn sends_browser_like_user_agent() -> Result<(), Box<dyn std::error::Error>> {
    let server = stub_server::start(vec![("/ua", StubResponse::html(ARTICLE))]);
    let client = HttpClient::new()?;
    fetch_page(&client, &server.url("/ua"))?;
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let head = requests[0].to_lowercase();
    assert!(
        head.contains("user-agent: mozilla/5.0 (macintosh"),
        "{}",
        requests[0]
    );
    Ok(())
}
