use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Whether retrying the failed operation can succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    /// The input may be readable later, e.g. bytes still being copied in.
    Temporary,
    /// Corrupt or unresolvable input; the same bytes fail the same way again.
    Permanent,
}

impl ErrorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorStatus::Temporary => "temporary",
            ErrorStatus::Permanent => "permanent",
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by every error variant in the workspace.
///
/// `location` is the call site that built the error, captured through
/// `#[track_caller]` on the constructors and on the `From` conversions of the
/// enums that embed this struct.
#[derive(Clone, Debug)]
pub struct ErrorStruct {
    pub message: String,
    pub status: ErrorStatus,
    pub source: Option<Arc<anyhow::Error>>,
    pub location: Option<&'static Location<'static>>,
}

impl ErrorStruct {
    #[track_caller]
    pub fn new(message: String, status: ErrorStatus) -> Self {
        Self {
            message,
            status,
            source: None,
            location: Some(Location::caller()),
        }
    }

    #[track_caller]
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::new(message.into(), ErrorStatus::Permanent)
    }

    #[track_caller]
    pub fn temporary(message: impl Into<String>) -> Self {
        Self::new(message.into(), ErrorStatus::Temporary)
    }

    /// Attaches the underlying cause. A cause set earlier is replaced.
    pub fn with_source(self, source: impl Into<anyhow::Error>) -> Self {
        Self {
            source: Some(Arc::new(source.into())),
            ..self
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.status == ErrorStatus::Temporary
    }
}

impl fmt::Display for ErrorStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.status)?;
        if let Some(location) = self.location {
            write!(f, " @ {location}")?;
        }
        match &self.source {
            Some(source) => write!(f, ": {source}"),
            None => Ok(()),
        }
    }
}

impl error::Error for ErrorStruct {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        let source: &anyhow::Error = self.source.as_deref()?;
        Some(source.as_ref())
    }
}
