/// Errors that can occur while reconciling module descriptors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A line does not match the grammar it was parsed with.
    #[error("malformed dependency on line {line_number}: [{line}]. Expected format {expected}")]
    MalformedLine {
        line_number: usize,
        line: String,
        expected: &'static str,
    },

    /// A block was opened with a keyword other than `require` or `replace`.
    #[error("unknown section on line {line_number}: [{line}]. Expected one of 'module | go | require | replace'")]
    UnknownSection { line_number: usize, line: String },

    /// A `require (` or `replace (` block was never closed.
    #[error("'{section}' section is not closed with ')'")]
    UnterminatedSection { section: String },

    /// The comparator reached a combination it cannot classify.
    #[error("internal error classifying module [{module}]")]
    InternalMismatchClassification { module: String },

    /// Failed to serialize a report.
    #[error("failed to serialize report: {0}")]
    ReportSerialize(String),

    /// Missing file, directory instead of file, or other I/O failure.
    #[error(transparent)]
    Fs(#[from] modsync_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
