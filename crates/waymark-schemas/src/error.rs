use thiserror::Error;

/// Rejections raised while assembling a schema. A schema that constructs
/// is internally coherent; validation never re-checks these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A `matches` pattern failed to compile.
    #[error("field {path:?}: pattern {pattern:?} does not compile: {reason}")]
    InvalidPattern {
        /// Field the pattern was declared for.
        path: String,
        /// The rejected pattern source.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
    /// Two rules name the same field path.
    #[error("field {path:?} is declared twice; merge the rules into one spec")]
    DuplicateField {
        /// The duplicated path.
        path: String,
    },
    /// A `one_of` constraint with no variants can never pass.
    #[error("field {path:?}: one_of lists no variants; add at least one")]
    EmptyEnum {
        /// Field carrying the empty list.
        path: String,
    },
    /// The absent sentinel cannot serve as a default.
    #[error(
        "field {path:?}: a default cannot be the absent sentinel; leave the \
         field optional with no default instead"
    )]
    AbsentDefault {
        /// Field carrying the bad default.
        path: String,
    },
}
