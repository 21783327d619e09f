use std::fmt;

/// Startup failures.  Nothing that happens during play is an error.
#[derive(Debug)]
pub enum GameError {
    /// No usable drawing surface (not a terminal, or its size is unknown).
    Surface(String),
    Io(std::io::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Surface(msg) => write!(f, "no drawing surface: {}", msg),
            GameError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            GameError::Surface(_) => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Io(e)
    }
}
