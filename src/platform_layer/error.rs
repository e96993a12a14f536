use std::io;

// Represents errors that can occur within the platform layer.
//
// Import failures are not platform errors; they travel back to the application
// logic inside `AppEvent::ImportCompleted`.
#[derive(Debug)]
pub enum PlatformError {
    /// An I/O error from the console or from spawning a thread.
    Io(io::Error),
    /// No engine executable was given on the command line or in the configuration.
    EngineNotConfigured,
    /// The engine executable could not be started.
    EngineLaunchFailed(String),
    /// The import worker ended without delivering a result.
    WorkerPanicked,
}

impl From<io::Error> for PlatformError {
    fn from(err: io::Error) -> Self {
        PlatformError::Io(err)
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::Io(e) => write!(f, "I/O Error: {e}"),
            PlatformError::EngineNotConfigured => {
                write!(f, "No engine executable configured (use --engine)")
            }
            PlatformError::EngineLaunchFailed(s) => write!(f, "Engine Launch Failed: {s}"),
            PlatformError::WorkerPanicked => {
                write!(f, "Import worker stopped without reporting a result")
            }
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlatformError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized `Result` type for platform layer operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
