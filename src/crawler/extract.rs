//! Format extraction: turns one fetched URL into plain text
//!
//! Dispatch is by URL suffix, case-insensitive:
//! - `.pdf` → every page's text, in page order
//! - `.docx` → paragraph texts joined with `\n`, in document order
//! - anything else → HTML, if the server says it is HTML
//!
//! PDF and DOCX parsing run on the blocking pool. A panic inside a parser
//! surfaces as `PageError::Unexpected` instead of taking the job down.

use crate::crawler::fetcher::{fetch_bytes, fetch_url, is_html_content_type, FetchResult};
use crate::crawler::parser::parse_html;
use crate::PageError;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::io::{Cursor, Read};
use thiserror::Error;

/// Document formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Pdf,
    Docx,
    Html,
}

impl FormatKind {
    /// Picks the extraction strategy from the URL suffix
    ///
    /// # Examples
    ///
    /// ```
    /// use site_harvest::crawler::FormatKind;
    ///
    /// assert_eq!(FormatKind::from_url("https://a.com/Report.PDF"), FormatKind::Pdf);
    /// assert_eq!(FormatKind::from_url("https://a.com/notes.docx"), FormatKind::Docx);
    /// assert_eq!(FormatKind::from_url("https://a.com/about"), FormatKind::Html);
    /// ```
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        if lower.ends_with(".pdf") {
            Self::Pdf
        } else if lower.ends_with(".docx") {
            Self::Docx
        } else {
            Self::Html
        }
    }
}

/// Text and links extracted from one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Plain text content
    pub text: String,

    /// Raw hrefs discovered (HTML only)
    pub links: Vec<String>,

    /// Set when an HTML fetch returned some other Content-Type
    pub unsupported_content_type: Option<String>,
}

impl ExtractedDocument {
    fn with_text(text: String) -> Self {
        Self {
            text,
            links: Vec::new(),
            unsupported_content_type: None,
        }
    }

    /// A non-HTML response: no text, no links, not an error
    pub fn unsupported(content_type: String) -> Self {
        Self {
            text: String::new(),
            links: Vec::new(),
            unsupported_content_type: Some(content_type),
        }
    }

    /// Returns true if the response was not HTML
    pub fn is_unsupported(&self) -> bool {
        self.unsupported_content_type.is_some()
    }
}

/// Errors raised while parsing binary document formats
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetches a URL and extracts its text
///
/// # Returns
///
/// * `Ok(ExtractedDocument)` - Text (possibly empty) and any discovered links
/// * `Err(PageError::Network)` - Connection failure, timeout, or non-2xx status
/// * `Err(PageError::FormatParse)` - Corrupt PDF or DOCX payload
/// * `Err(PageError::Unexpected)` - A parser task panicked
pub async fn extract_document(client: &Client, url: &str) -> Result<ExtractedDocument, PageError> {
    match FormatKind::from_url(url) {
        FormatKind::Pdf => {
            let body = fetch_body(fetch_bytes(client, url).await, url)?.1;
            let text = parse_blocking(url, move || parse_pdf(&body)).await?;
            Ok(ExtractedDocument::with_text(text))
        }
        FormatKind::Docx => {
            let body = fetch_body(fetch_bytes(client, url).await, url)?.1;
            let text = parse_blocking(url, move || parse_docx(&body)).await?;
            Ok(ExtractedDocument::with_text(text))
        }
        FormatKind::Html => {
            let (content_type, html) = fetch_body(fetch_url(client, url).await, url)?;
            if !is_html_content_type(&content_type) {
                tracing::debug!("{} is {}, not HTML", url, content_type);
                return Ok(ExtractedDocument::unsupported(content_type));
            }

            let parsed = parse_html(&html);
            Ok(ExtractedDocument {
                text: parsed.text,
                links: parsed.links,
                unsupported_content_type: None,
            })
        }
    }
}

/// Splits a fetch into `(content_type, body)` or a network failure
fn fetch_body<B>(result: FetchResult<B>, url: &str) -> Result<(String, B), PageError> {
    match result {
        FetchResult::Success { content_type, body } => Ok((content_type, body)),
        failed => Err(PageError::Network {
            url: url.to_string(),
            reason: failed.failure_reason().unwrap_or_default(),
        }),
    }
}

async fn parse_blocking<F>(url: &str, parse: F) -> Result<String, PageError>
where
    F: FnOnce() -> Result<String, DocumentError> + Send + 'static,
{
    match tokio::task::spawn_blocking(parse).await {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(PageError::FormatParse {
            url: url.to_string(),
            reason: e.to_string(),
        }),
        Err(e) => Err(PageError::Unexpected {
            url: url.to_string(),
            reason: format!("parser task failed: {}", e),
        }),
    }
}

/// Extracts the text of every page of a PDF, in page order
pub fn parse_pdf(bytes: &[u8]) -> Result<String, DocumentError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Pdf(e.to_string()))
}

/// Extracts paragraph text from a DOCX package
///
/// Paragraphs (`w:p`) are joined with `\n`. Inside a paragraph, `w:t` runs
/// are concatenated, `w:tab` becomes `\t`, and `w:br`/`w:cr` become `\n`.
pub fn parse_docx(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    let paragraphs = docx_paragraphs(&xml)?;
    Ok(paragraphs.join("\n"))
}

fn docx_paragraphs(xml: &str) -> Result<Vec<String>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Xml(e.to_string()))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_to(&mut current, "\t"),
                b"w:br" | b"w:cr" => push_to(&mut current, "\n"),
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| DocumentError::Xml(e.to_string()))?;
                push_to(&mut current, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_to(paragraph: &mut Option<String>, text: &str) {
    if let Some(p) = paragraph.as_mut() {
        p.push_str(text);
    }
}
