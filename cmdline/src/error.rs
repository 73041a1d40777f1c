#[derive(Debug, thiserror::Error)]
pub enum CmdlineError {
    #[error("out of memory: {0}")]
    Allocation(String),

    #[error("{program}: unknown option or missing mandatory argument `{option}'")]
    UnknownOption { program: String, option: String },

    #[error("option --{name} is deprecated. Use --{replacement} instead.")]
    DeprecatedOption { name: String, replacement: String },

    #[error(transparent)]
    ShortSpec(#[from] getopt::Error),

    #[error("option not found: {0}")]
    NotFound(String),

    #[error("type mismatch for {name}: expected {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

impl CmdlineError {
    /// Status code reported to callers that speak in integers.
    pub fn status(&self) -> i32 {
        -1
    }
}

pub type Result<T> = std::result::Result<T, CmdlineError>;
