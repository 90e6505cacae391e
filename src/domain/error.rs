//! Domain error types.

use crate::domain::category::Category;

/// Failure to derive a summary record for a single container.
///
/// These never abort a batch; the pipeline collects them as
/// [`ContainerWarning`]s and moves on to the next container. Row positions
/// count from 1 within the container group.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("no guide charge row to anchor the placement date")]
    NoGuideCharge,

    #[error("guide charge at group row {row} has no parseable arrival timestamp")]
    MissingArrival { row: usize },

    #[error("group row {row} has a malformed amount")]
    InvalidAmount { row: usize },
}

/// A per-container failure, keyed for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerWarning {
    pub category: Category,
    pub container: String,
    pub error: ContainerError,
}

impl std::fmt::Display for ContainerWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}]: {}",
            self.container,
            self.category.label(),
            self.error
        )
    }
}

/// Top-level error type for the converter.
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("cannot read input {source_name}: {reason}")]
    InputUnreadable { source_name: String, reason: String },

    #[error("input is missing required column \"{column}\"")]
    MissingColumn { column: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("cannot write output {name}: {reason}")]
    Output { name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ConverterError> for std::process::ExitCode {
    fn from(err: &ConverterError) -> Self {
        let code: u8 = match err {
            ConverterError::Io(_) => 1,
            ConverterError::ConfigParse { .. } | ConverterError::ConfigInvalid { .. } => 2,
            ConverterError::InputUnreadable { .. } | ConverterError::MissingColumn { .. } => 3,
            ConverterError::Output { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
