/// Outcome definitions for tracking crawl progress
///
/// This module defines how each fetched URL ended and why a job stopped.
use crate::PageError;
use std::fmt;

/// How processing of a single frontier entry ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    // ===== Success States =====
    /// Text was extracted and written
    Saved,

    /// Response was not HTML; recorded as a page with no text and no links
    Unsupported,

    // ===== Error States =====
    /// Connection failure, timeout, or non-2xx status
    NetworkError,

    /// A PDF or DOCX payload could not be parsed
    ParseError,

    /// Anything else, including failures to write the page file
    Failed,
}

impl PageOutcome {
    /// Maps a page-level error onto its outcome
    pub fn from_error(error: &PageError) -> Self {
        match error {
            PageError::Network { .. } => Self::NetworkError,
            PageError::FormatParse { .. } => Self::ParseError,
            PageError::Unexpected { .. } => Self::Failed,
        }
    }

    /// Returns true if the page produced an output file
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved | Self::Unsupported)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Short label used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Unsupported => "unsupported",
            Self::NetworkError => "network_error",
            Self::ParseError => "parse_error",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a crawl job stopped popping from its frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StopReason {
    /// Every reachable in-scope URL was processed
    #[default]
    FrontierExhausted,

    /// The configured page cap was reached
    PageLimit,

    /// The configured wall-clock budget ran out
    Deadline,

    /// The runner asked all jobs to stop
    Cancelled,
}

impl StopReason {
    /// Returns true if the frontier may still hold unprocessed URLs
    pub fn is_early(&self) -> bool {
        !matches!(self, Self::FrontierExhausted)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FrontierExhausted => "frontier exhausted",
            Self::PageLimit => "page limit reached",
            Self::Deadline => "deadline reached",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}
