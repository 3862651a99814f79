use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimError {
    /// The three metric input sequences must be the same length. This is
    /// a caller contract violation, not a business outcome, and is the
    /// only error the core raises.
    #[error("Length mismatch: {predictions} predictions, {actuals} actuals, {confidences} confidences")]
    LengthMismatch {
        predictions: usize,
        actuals: usize,
        confidences: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Export error: {0}")]
    ExportError(String),
}
