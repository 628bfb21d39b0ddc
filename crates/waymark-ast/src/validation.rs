use thiserror::Error;

/// Error returned when a model constructor rejects its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A field value does not match its required pattern.
    #[error("{field} does not match the required pattern: {value:?}")]
    PatternMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A fence marker is too short to wrap its content.
    #[error(
        "fence marker of length {marker_len} cannot wrap content containing a \
         {run_len}-backtick run; use a marker of at least {} backticks",
        .run_len + 1
    )]
    FenceUnwrappable {
        /// Length of the rejected marker.
        marker_len: usize,
        /// Longest line-leading backtick run found in the content.
        run_len: usize,
    },
}
