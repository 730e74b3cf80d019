use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::*;

pub type MResult<T> = miette::Result<T>;
pub type Result<T> = std::result::Result<T, CfgError>;

#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Error in configuration file")]
#[diagnostic()]
pub struct CfgError {
    #[label("Error here")]
    pub err_span: Option<SourceSpan>,
    #[help]
    pub help_msg: String,
    pub file_name: Option<String>,
    pub file_content: Option<String>,
}

pub(super) fn help(err_msg: impl AsRef<str>) -> String {
    format!(
        r"{}

Each configuration line has the form `[modifier] <chord> = <value>`, for example:
    Shift 0x03 = A
    0b00000110 = Console(2)",
        err_msg.as_ref(),
    )
}

/// Error covering `range` of the line described by `line`. The range is relative to the start of
/// the line.
pub(super) fn error_in_line(
    line: &LineCtx,
    range: std::ops::Range<usize>,
    err_msg: impl AsRef<str>,
) -> CfgError {
    CfgError {
        err_span: Some(span_start_len(line.start + range.start, range.len())),
        help_msg: help(format!("line {}: {}", line.number, err_msg.as_ref())),
        file_name: Some(line.file_name.to_string()),
        file_content: Some(line.file_content.to_string()),
    }
}

pub(super) fn span_start_len(start: usize, len: usize) -> SourceSpan {
    SourceSpan::new(start.into(), len.into())
}

pub(super) fn error_with_source(e: CfgError) -> miette::Error {
    let filename = e.file_name.clone();
    let source = e.file_content.clone();
    let e2: miette::Error = e.into();
    if let (Some(f), Some(s)) = (filename, source) {
        e2.with_source_code(NamedSource::new(f, s))
    } else {
        e2
    }
}

impl From<anyhow::Error> for CfgError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            err_span: None,
            help_msg: help(value.to_string()),
            file_name: None,
            file_content: None,
        }
    }
}
