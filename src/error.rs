//! Parse failures for hpacucli reports.

use std::fmt;
use thiserror::Error;

/// Which grammar a line was matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Controller,
    Sep,
    Array,
    LogicalDrive,
    PhysicalDrive,
    Drive,
}

impl LineKind {
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::Controller    => "controller",
            LineKind::Sep           => "SEP",
            LineKind::Array         => "array",
            LineKind::LogicalDrive  => "logical drive",
            LineKind::PhysicalDrive => "physical drive",
            LineKind::Drive         => "drive",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed {kind} line: {text:?}")]
    MalformedLine { kind: LineKind, text: String },

    #[error("unexpected indentation of {depth} spaces: {text:?}")]
    UnexpectedIndentation { depth: usize, text: String },

    #[error("invalid size {text:?}")]
    InvalidSize { text: String },

    /// A capture group the grammar needs came back empty. The current
    /// grammars make every group mandatory, so this guards future optional ones.
    #[error("missing field '{field}' in {text:?}")]
    MissingField { field: &'static str, text: String },

    #[error("no controller header before {text:?}")]
    OrphanLine { text: String },
}

impl ParseError {
    pub fn malformed(kind: LineKind, text: &str) -> Self {
        Self::MalformedLine { kind, text: text.to_string() }
    }

    pub fn invalid_size(text: &str) -> Self {
        Self::InvalidSize { text: text.to_string() }
    }

    /// Attach the 1-based report line this error came from.
    pub fn at_line(self, line: usize) -> ReportError {
        ReportError { line, kind: self }
    }
}

/// A [`ParseError`] located in the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ReportError {
    pub line: usize,
    pub kind: ParseError,
}
