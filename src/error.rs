use thiserror::Error;

/// Format an optional context message as an indented trailing line.
fn fmt_msg(msg: &Option<String>) -> String {
    match msg {
        Some(m) => format!("\n  {}", m),
        None => String::new(),
    }
}

/// Error types for the partim-rs library.
#[derive(Error, Debug)]
pub enum TimingModelError {
    /// A required model parameter was not supplied in the parfile.
    #[error("Missing parameter: {component}.{param}{}", fmt_msg(.msg))]
    MissingParameter {
        /// Name of the component that requires the parameter.
        component: String,
        /// Name of the missing parameter.
        param: String,
        /// Optional additional context.
        msg: Option<String>,
    },

    /// A parameter was registered more than once on the same model.
    #[error("Duplicate parameter: {param}{}", fmt_msg(.msg))]
    DuplicateParameter {
        /// Name of the colliding parameter.
        param: String,
        /// Optional additional context.
        msg: Option<String>,
    },

    /// A parameter's configured parser rejected its input.
    #[error("Parse error for parameter '{param}': {kind} value '{input}' is invalid")]
    ParseError {
        /// Name of the parameter whose parser rejected the input.
        param: String,
        /// The raw string that failed to parse.
        input: String,
        /// The value kind the parser expected.
        kind: String,
    },

    /// Error during a component delay or phase evaluation.
    #[error("Component evaluation error: {0}")]
    EvaluationError(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for partim-rs operations.
pub type Result<T> = std::result::Result<T, TimingModelError>;

/// Extensions for converting from other error types.
impl From<String> for TimingModelError {
    fn from(s: String) -> Self {
        TimingModelError::Other(s)
    }
}

impl From<&str> for TimingModelError {
    fn from(s: &str) -> Self {
        TimingModelError::Other(s.to_string())
    }
}
