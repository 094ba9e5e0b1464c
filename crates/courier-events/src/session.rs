//! Session Identity
//!
//! A session spans every attempt made from one install. The id is created
//! once and persisted to a small text file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use uuid::Uuid;

/// Error loading or persisting a session id.
#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Malformed(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "session file I/O error: {}", e),
            SessionError::Malformed(s) => write!(f, "malformed session id: {:?}", s),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(e) => Some(e),
            SessionError::Malformed(_) => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}

/// Identifier shared by every attempt in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a fresh random session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reads the id stored at `path`, creating and writing a new one if the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, SessionError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                Uuid::parse_str(trimmed)
                    .map(SessionId)
                    .map_err(|_| SessionError::Malformed(trimmed.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let id = Self::new();
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(path, format!("{}\n", id))?;
                Ok(id)
            }
            Err(e) => Err(SessionError::Io(e)),
        }
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
