use thiserror::Error;

/// Result type alias using the canonical error facility
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure a reconciliation run can hit maps to one of these kinds,
/// and each kind has a stable code for tests and for scripted callers that
/// wrap the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input files
    InvalidInput,
    /// Study config, token file or CLI wiring is unusable
    InvalidConfig,
    /// A configured column (key column, join column) is absent from a header row
    MissingColumn,
    /// A data row does not have the same number of fields as its header row
    MalformedRow,
    /// A flat file ends before its header block is complete
    TruncatedFile,
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    ExternalService,
    Timeout,
    Unauthorised,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::MissingColumn => "ERR_MISSING_COLUMN",
            ExErrorKind::MalformedRow => "ERR_MALFORMED_ROW",
            ExErrorKind::TruncatedFile => "ERR_TRUNCATED_FILE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    line: Option<usize>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            line: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the file the error refers to
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a 1-based line number within `path`
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add a record, study or column identifier
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            match self.line {
                Some(line) => write!(f, " ({}:{})", path, line)?,
                None => write!(f, " ({})", path)?,
            }
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

/// Wrap an I/O failure, keeping `NotFound` distinguishable
pub fn io_error(op: &str, path: &std::path::Path, err: std::io::Error) -> ExError {
    let kind = if err.kind() == std::io::ErrorKind::NotFound {
        ExErrorKind::NotFound
    } else {
        ExErrorKind::Io
    };
    ExError::new(kind)
        .with_op(op)
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

// ========== End Error Facility ==========

/// Data and configuration faults raised while reading clinical inputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClinicalError {
    /// A configured column is not present in the header row
    #[error("Column {column} not found in header of {path}")]
    ColumnMissing { column: String, path: String },

    /// Field count of a data row disagrees with the header row
    #[error("Row at line {line} of {path} has {found} fields, header has {expected}")]
    MalformedRow {
        path: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// File ended inside (or before) the header block
    #[error("{path} ended before its column header row")]
    TruncatedFile { path: String },

    /// A sample-level remote record did not carry a sample id
    #[error("Remote {domain} record for patient {patient_id} has no {field}")]
    RemoteRecordWithoutId {
        domain: String,
        patient_id: String,
        field: String,
    },

    /// Study config could not be used
    #[error("Invalid study config: {reason}")]
    InvalidConfig { reason: String },
}

impl From<ClinicalError> for ExError {
    fn from(err: ClinicalError) -> Self {
        let message = err.to_string();
        match err {
            ClinicalError::ColumnMissing { column, path } => {
                ExError::new(ExErrorKind::MissingColumn)
                    .with_op("locate_column")
                    .with_path(path)
                    .with_entity_id(column)
                    .with_message(message)
            }
            ClinicalError::MalformedRow { path, line, .. } => {
                ExError::new(ExErrorKind::MalformedRow)
                    .with_op("parse_row")
                    .with_path(path)
                    .with_line(line)
                    .with_message(message)
            }
            ClinicalError::TruncatedFile { path } => ExError::new(ExErrorKind::TruncatedFile)
                .with_op("sectionize")
                .with_path(path)
                .with_message(message),
            ClinicalError::RemoteRecordWithoutId { patient_id, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("collection_from_remote")
                    .with_entity_id(patient_id)
                    .with_message(message)
            }
            ClinicalError::InvalidConfig { .. } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_study_config")
                .with_message(message),
        }
    }
}
