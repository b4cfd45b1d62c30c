use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};

use crate::lenient;
use crate::report::{Metadata, Report, CRASH_BUG_TYPE};

/// The step of decoding that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Splitting the input into a metadata line and a payload.
    Container,
    Metadata,
    Report,
    BugType,
}

/// Errors encountered while decoding an `.ips` file.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Expected a metadata line followed by a report payload")]
    MissingPayload,
    #[error("invalid metadata JSON: {0}")]
    InvalidMetadata(#[source] serde_json::Error),
    #[error("invalid report JSON: {0}")]
    InvalidReport(#[source] serde_json::Error),
    #[error(
        "unexpected bug_type {:?} (expected \"309\", a crash report)",
        .found.as_deref().unwrap_or("<missing>")
    )]
    UnexpectedBugType { found: Option<String> },
}

impl FormatError {
    /// Returns just the name of the error, as a more human-friendly version of
    /// an error-code for error logging.
    pub fn name(&self) -> &'static str {
        match self {
            FormatError::MissingPayload => "MissingPayload",
            FormatError::InvalidMetadata(_) => "InvalidMetadata",
            FormatError::InvalidReport(_) => "InvalidReport",
            FormatError::UnexpectedBugType { .. } => "UnexpectedBugType",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            FormatError::MissingPayload => Phase::Container,
            FormatError::InvalidMetadata(_) => Phase::Metadata,
            FormatError::InvalidReport(_) => Phase::Report,
            FormatError::UnexpectedBugType { .. } => Phase::BugType,
        }
    }
}

/// Decode the contents of an `.ips` file.
///
/// The first line is the [`Metadata`], everything after it is the
/// [`Report`]. Only crash reports (`bug_type` 309) are accepted. Once both
/// lines are valid JSON and the header is a crash report's, decoding can't
/// fail: missing fields are left empty, and fields of an unexpected type are
/// kept untyped in the record's `extra` map.
///
/// # Examples
///
/// ```
/// let raw = "{\"bug_type\":\"309\"}\n{\"procName\":\"Finder\",\"pid\":421}";
/// let (metadata, report) = ips::decode(raw).unwrap();
/// assert!(metadata.is_crash_report());
/// assert_eq!(report.proc_name.as_deref(), Some("Finder"));
/// assert_eq!(report.pid, Some(421));
/// ```
pub fn decode(raw: &str) -> Result<(Metadata, Report), FormatError> {
    let (header, payload) = raw
        .trim()
        .split_once('\n')
        .ok_or(FormatError::MissingPayload)?;
    trace!(
        "ips: {} byte header, {} byte payload",
        header.len(),
        payload.len()
    );

    let metadata: Value = serde_json::from_str(header).map_err(FormatError::InvalidMetadata)?;
    let report: Value = serde_json::from_str(payload).map_err(FormatError::InvalidReport)?;

    let fields = match metadata {
        Value::Object(fields)
            if fields.get("bug_type").and_then(Value::as_str) == Some(CRASH_BUG_TYPE) =>
        {
            fields
        }
        other => {
            let found = other.get("bug_type").map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            debug!("ips: rejecting report with bug_type {found:?}");
            return Err(FormatError::UnexpectedBugType { found });
        }
    };

    let metadata: Metadata = lenient::from_map(fields);
    let report = Report::from_json(report);
    Ok((metadata, report))
}
