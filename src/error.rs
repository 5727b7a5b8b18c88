use std::path::PathBuf;

/// Every way loading a table can fail. Displayed as user-facing messages.
#[derive(Debug)]
pub enum LoadError {
    NotFound {
        path: PathBuf,
    },
    WrongType {
        path: PathBuf,
    },
    Unparseable {
        path: PathBuf,
    },
    /// Header recovered, but the file has no data lines at all.
    EmptyTable {
        path: PathBuf,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "input file not found: {}", path.display())
            }
            Self::WrongType { path } => {
                write!(f, "not a CSV file: {} [expected .csv]", path.display())
            }
            Self::Unparseable { path } => write!(
                f,
                "could not parse {}: no encoding/delimiter combination produced a usable table",
                path.display()
            ),
            Self::EmptyTable { path } => {
                write!(f, "{} has a header but no data rows", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl LoadError {
    /// Short machine-friendly name of the failure kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not-found",
            Self::WrongType { .. } => "wrong-type",
            Self::Unparseable { .. } => "unparseable",
            Self::EmptyTable { .. } => "empty-table",
            Self::Io { .. } => "io",
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::Io { .. } => 2,
            Self::WrongType { .. } => 3,
            Self::Unparseable { .. } | Self::EmptyTable { .. } => 4,
        }
    }

    /// Failures that happen after the input was accepted as a CSV file.
    /// Only these get an error page written in place of the data page.
    #[must_use]
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::Unparseable { .. } | Self::EmptyTable { .. })
    }
}

/// Failure of a whole conversion: loading, or writing the page.
#[derive(Debug)]
pub enum ConvertError {
    Load(LoadError),
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(e) => e.fmt(f),
            Self::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<LoadError> for ConvertError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl ConvertError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Load(e) => e.exit_code(),
            Self::Write { .. } => 2,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load(e) => e.kind(),
            Self::Write { .. } => "write",
        }
    }
}
