//! Error type shared by the parsers, the renderer and the batch driver.

use std::fmt;
use std::path::{Path, PathBuf};

/// What kind of entity a route referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Depot,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Customer => write!(f, "customer"),
            EntityKind::Depot => write!(f, "depot"),
        }
    }
}

/// Errors raised while reading, checking or rendering MDVRP data.
#[derive(Debug)]
pub enum MdvrpError {
    /// The file could not be opened or read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The content does not follow the expected layout.
    /// `line` is 1-based, `None` when the problem is not tied to a single line.
    Format {
        path: Option<PathBuf>,
        line: Option<usize>,
        message: String,
    },
    /// A route references an id missing from the instance.
    Referential { kind: EntityKind, id: u32 },
    /// Invalid or unreadable configuration.
    Config(String),
}

pub type Result<T> = std::result::Result<T, MdvrpError>;

impl MdvrpError {
    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        MdvrpError::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub fn format(line: Option<usize>, message: impl Into<String>) -> Self {
        MdvrpError::Format { path: None, line, message: message.into() }
    }

    /// Attach the source file to a format error produced from in-memory content.
    pub fn with_path<P: AsRef<Path>>(self, file: P) -> Self {
        match self {
            MdvrpError::Format { path: None, line, message } => MdvrpError::Format {
                path: Some(file.as_ref().to_path_buf()),
                line,
                message,
            },
            other => other,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, MdvrpError::Format { .. })
    }

    pub fn is_referential(&self) -> bool {
        matches!(self, MdvrpError::Referential { .. })
    }
}

impl fmt::Display for MdvrpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MdvrpError::Io { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            MdvrpError::Format { path, line, message } => {
                write!(f, "Format error")?;
                if let Some(path) = path {
                    write!(f, " in {}", path.display())?;
                }
                if let Some(line) = line {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", message)
            }
            MdvrpError::Referential { kind, id } => {
                write!(f, "Route references unknown {} {}", kind, id)
            }
            MdvrpError::Config(message) => write!(f, "Invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for MdvrpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MdvrpError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
