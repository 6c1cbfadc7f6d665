use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickersift_core::ValidationError),

    #[error(transparent)]
    Checkpoint(#[from] tickersift_core::CheckpointError),

    #[error("command error: {0}")]
    Command(String),

    #[error("report serialization error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Checkpoint(_) => 4,
            Self::Csv(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
