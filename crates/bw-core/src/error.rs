use crate::character::{AttributeName, RelationshipId, SkillId, StatName};

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when reading or updating a character record.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The character has no entry for the requested stat.
    #[error("stat not found: {0}")]
    StatNotFound(StatName),

    /// The character has no entry for the requested attribute.
    #[error("attribute not found: {0}")]
    AttributeNotFound(AttributeName),

    /// The requested skill ID does not exist on the character.
    #[error("skill not found: {0}")]
    SkillNotFound(SkillId),

    /// No skill matches the given name.
    #[error("no skill named \"{0}\"")]
    SkillNameNotFound(String),

    /// The requested relationship ID does not exist on the character.
    #[error("relationship not found: {0}")]
    RelationshipNotFound(RelationshipId),

    /// A string could not be parsed into a known name or tag.
    #[error("unknown {kind}: \"{value}\"")]
    Unknown {
        /// What was being parsed (e.g. "stat", "shade").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The character document could not be (de)serialized.
    #[error("invalid character document: {0}")]
    Json(#[from] serde_json::Error),
}
