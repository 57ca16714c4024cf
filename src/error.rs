use std::fmt;

/// Fatal export failures. Missing content and external-capability hiccups are
/// logged and skipped instead of surfacing here; anything that does reach the
/// caller aborts the run as a whole.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The output sink could not be initialized or finalized.
    Sink(String),
    /// Two blocks in one run share an id.
    DuplicateBlockId(String),
    /// A second export was attempted while one was still in flight.
    ExportInFlight,
    /// The table renderer failed in a way it reported as unrecoverable.
    Table(String),
    /// Input description could not be decoded (CLI block-list file).
    #[cfg(feature = "serde_json")]
    Input(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Sink(msg) => write!(f, "output sink error: {msg}"),
            Error::DuplicateBlockId(id) => {
                write!(f, "duplicate block id within one run: {id:?}")
            }
            Error::ExportInFlight => {
                write!(f, "an export is already in flight; not queued")
            }
            Error::Table(msg) => write!(f, "table renderer error: {msg}"),
            #[cfg(feature = "serde_json")]
            Error::Input(e) => write!(f, "invalid block list: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            #[cfg(feature = "serde_json")]
            Error::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
