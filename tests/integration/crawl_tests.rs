//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, writing into temporary directories.

use site_harvest::config::Config;
use site_harvest::crawler::crawl;
use site_harvest::output::FileOutput;
use site_harvest::runner::JobRunner;
use site_harvest::state::{PageOutcome, StopReason};
use site_harvest::url::{url_hash, CrawlJob};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing under `dir`
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.request_timeout = 5;
    config.output.data_dir = dir.path().display().to_string();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        ),
        "text/html; charset=utf-8",
    )
}

fn domain_of(seed: &str) -> String {
    CrawlJob::from_seed(seed).expect("valid seed").domain
}

fn page_files(output: &FileOutput, domain: &str) -> HashSet<String> {
    match std::fs::read_dir(output.domain_text_dir(domain)) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => HashSet::new(),
    }
}

fn external_lines(output: &FileOutput, domain: &str) -> Vec<String> {
    std::fs::read_to_string(output.external_links_path(domain))
        .expect("external-link file should exist")
        .lines()
        .map(String::from)
        .collect()
}

fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Builds a PDF with one Helvetica text line per page
fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        let content = format!("BT /F1 24 Tf 20 100 Td ({}) Tj ET", text);
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 300 200] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
    }

    let xref_start = pdf.len();
    let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        tail.push_str(&format!("{:010} 00000 n \n", offset));
    }
    tail.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_start
    ));
    pdf.extend_from_slice(tail.as_bytes());
    pdf
}

#[tokio::test]
async fn test_scope_scenario() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(html_page(&format!(
            r#"<a href="{0}/docs/a">A</a>
               <a href="{0}/docs/a#intro">A intro</a>
               <a href="https://other.org">Other</a>
               <a href="{0}/images/pic.png">Picture</a>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/a"))
        .respond_with(html_page("Page A"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/images/pic.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&dir);
    let output = FileOutput::new(dir.path());
    let seed = format!("{}/docs", base_url);

    let stats = crawl(&config, &seed, Arc::new(output.clone()))
        .await
        .expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.urls_seen, 2);
    assert_eq!(stats.count(PageOutcome::Saved), 2);

    let domain = domain_of(&seed);
    let files = page_files(&output, &domain);
    assert_eq!(files.len(), 2);
    assert!(files.contains(&format!("{}.txt", url_hash(&seed))));
    assert!(files.contains(&format!("{}.txt", url_hash(&format!("{}/docs/a", base_url)))));

    assert_eq!(external_lines(&output, &domain), vec!["https://other.org"]);
}

#[tokio::test]
async fn test_page_text_is_written() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "<h1>Welcome</h1><script>track()</script><p>Plain words</p>",
        ))
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/", mock_server.uri());
    crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    let text = std::fs::read_to_string(output.page_path(&domain_of(&seed), &seed)).unwrap();
    assert_eq!(text, "TestWelcomePlain words");
}

#[tokio::test]
async fn test_zero_links_writes_one_page_and_empty_external_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(html_page("Nothing to follow here"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/lonely", mock_server.uri());
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    let domain = domain_of(&seed);
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(page_files(&output, &domain).len(), 1);
    assert!(external_lines(&output, &domain).is_empty());
}

#[tokio::test]
async fn test_cycle_terminates_and_fetches_each_page_once() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a">A</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(r#"<a href="/b">B</a><a href="/a/">Self</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(r#"<a href="/a">A</a><a href="/">Home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/", mock_server.uri());
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.urls_seen, 3);
    assert_eq!(stats.stop_reason, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_external_origins_recorded_once() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="https://other.org/one">1</a>
               <a href="https://other.org/two">2</a>
               <a href="/next">Next</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page(
            r#"<a href="https://other.org/">3</a><a href="http://third.net/x">4</a>"#,
        ))
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/", mock_server.uri());
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    let mut lines = external_lines(&output, &domain_of(&seed));
    lines.sort();
    assert_eq!(lines, vec!["http://third.net", "https://other.org"]);
    assert_eq!(stats.external_links, 2);
}

#[tokio::test]
async fn test_failed_pdf_does_not_stop_job() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(html_page(
            r#"<a href="/docs/next">Next</a><a href="/docs/report.pdf">Report</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/report.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/next"))
        .respond_with(html_page("Still crawled"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/docs", base_url);
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    let domain = domain_of(&seed);
    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.count(PageOutcome::NetworkError), 1);
    assert_eq!(stats.count(PageOutcome::Saved), 2);

    assert!(!output
        .page_path(&domain, &format!("{}/docs/report.pdf", base_url))
        .exists());
    assert!(output
        .page_path(&domain, &format!("{}/docs/next", base_url))
        .exists());
}

#[tokio::test]
async fn test_corrupt_pdf_is_parse_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/broken.pdf">Broken</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"this is not a pdf document".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/", base_url);
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.count(PageOutcome::ParseError), 1);
    assert!(!output
        .page_path(&domain_of(&seed), &format!("{}/broken.pdf", base_url))
        .exists());
}

#[tokio::test]
async fn test_docx_paragraphs_extracted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/files/Notes.DOCX">Notes</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/Notes.DOCX"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(build_docx(&["First paragraph", "Second paragraph"]))
                .insert_header(
                    "content-type",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                ),
        )
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/", base_url);
    crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    let text = std::fs::read_to_string(
        output.page_path(&domain_of(&seed), &format!("{}/files/Notes.DOCX", base_url)),
    )
    .unwrap();
    assert_eq!(text, "First paragraph\nSecond paragraph");
}

#[tokio::test]
async fn test_pdf_pages_extracted_in_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/papers/guide.pdf">Guide</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/papers/guide.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(build_pdf(&["Alpha", "Bravo", "Charlie"]))
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/", base_url);
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    assert_eq!(stats.count(PageOutcome::Saved), 2);

    let text = std::fs::read_to_string(
        output.page_path(&domain_of(&seed), &format!("{}/papers/guide.pdf", base_url)),
    )
    .unwrap();
    let alpha = text.find("Alpha").expect("first page text");
    let bravo = text.find("Bravo").expect("second page text");
    let charlie = text.find("Charlie").expect("third page text");
    assert!(alpha < bravo && bravo < charlie);
}

#[tokio::test]
async fn test_seed_with_trailing_slash_is_stored_under_its_own_hash() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html_page(r#"<a href="/docs/">Index</a><a href="/docs/page">Page</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/page"))
        .respond_with(html_page(r#"<a href="/docs">Back</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/docs/", base_url);
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.count(PageOutcome::Saved), 2);
    assert!(output.page_path(&domain_of(&seed), &seed).exists());
}

#[tokio::test]
async fn test_latin1_page_decoded_with_declared_charset() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/menu"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<html><body><p>caf\xE9 cr\xE8me</p></body></html>".to_vec(),
            "text/html; charset=iso-8859-1",
        ))
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/menu", mock_server.uri());
    crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    let text = std::fs::read_to_string(output.page_path(&domain_of(&seed), &seed)).unwrap();
    assert_eq!(text, "caf\u{e9} cr\u{e8}me");
}

#[tokio::test]
async fn test_non_html_response_saved_without_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/data.json">Data</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"href": "/hidden"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/", base_url);
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.count(PageOutcome::Unsupported), 1);

    let text = std::fs::read_to_string(
        output.page_path(&domain_of(&seed), &format!("{}/data.json", base_url)),
    )
    .unwrap();
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_every_page_failing_still_writes_external_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/missing", mock_server.uri());
    let stats = crawl(&create_test_config(&dir), &seed, Arc::new(output.clone()))
        .await
        .unwrap();

    let domain = domain_of(&seed);
    assert_eq!(stats.pages_failed(), 1);
    assert!(page_files(&output, &domain).is_empty());
    assert!(output.external_links_path(&domain).exists());
}

#[tokio::test]
async fn test_recrawl_overwrites_same_files() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/about">About</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("About us"))
        .mount(&mock_server)
        .await;

    let output = FileOutput::new(dir.path());
    let seed = format!("{}/", mock_server.uri());
    let config = create_test_config(&dir);

    crawl(&config, &seed, Arc::new(output.clone())).await.unwrap();
    let first = page_files(&output, &domain_of(&seed));

    crawl(&config, &seed, Arc::new(output.clone())).await.unwrap();
    let second = page_files(&output, &domain_of(&seed));

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_runner_runs_jobs_for_several_sites() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for server in [&first, &second] {
        Mock::given(method("GET"))
            .respond_with(html_page("Site"))
            .expect(1)
            .mount(server)
            .await;
    }

    let output = FileOutput::new(dir.path());
    let runner = JobRunner::new(create_test_config(&dir), Arc::new(output.clone())).unwrap();
    runner.submit(&first.uri()).unwrap();
    runner.submit(&second.uri()).unwrap();

    let reports = runner.wait().await;
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.ran()));

    for server in [&first, &second] {
        let domain = domain_of(&server.uri());
        assert_eq!(page_files(&output, &domain).len(), 1);
        assert!(output.external_links_path(&domain).exists());
    }
}
