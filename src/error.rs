use std::fmt;
use std::process::ExitStatus;

/// Errors surfaced by discovery, selection and launch
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Can't authenticate.\n{0}")]
    Auth(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Incorrect Usage. Wrong tag definition in flag -t: {0}")]
    TagFilter(String),

    /// Operator left the picker, or the run was interrupted
    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Wrong IP address '{0}'. Switch to private IP if VM doesn't have public IP")]
    Validation(String),

    #[error("{0}")]
    NoTargets(String),

    #[error("Command finished with an error, ssh: {0}")]
    Ssh(ExitStatus),

    #[error("Failed to execute ssh. Is an SSH client installed?\n{0}")]
    Launch(#[source] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Discovery worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A failed Azure Resource Manager call. The upstream message is kept verbatim.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub operation: String,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed", self.operation)?;
        match (self.status, &self.code) {
            (Some(status), Some(code)) => write!(f, " (HTTP {}, {})", status, code)?,
            (Some(status), None) => write!(f, " (HTTP {})", status)?,
            (None, Some(code)) => write!(f, " ({})", code)?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ApiError {}
