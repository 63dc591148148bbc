use thiserror::Error;

/// Everything that can go wrong while building a rule set.
///
/// Lookups into a built [`crate::Rules`] are total, so there is no runtime
/// error path once construction succeeds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown payout name '{0}'")]
    UnknownPayout(String),
    #[error("Payout matrix must be 8x8, got {rows}x{cols}")]
    PayoutShape { rows: usize, cols: usize },
    #[error("Payout matrix entry ({row}, {col}) is not a finite number")]
    NonFinitePayout { row: usize, col: usize },
    #[error("{table} table has no entry for {cell}")]
    IncompleteTable { table: &'static str, cell: String },
}
