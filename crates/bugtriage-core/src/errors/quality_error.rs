/// Quality-checker errors (should never surface in practice: the check is
/// a pure function, but the type exists so callers have a uniform error
/// boundary per subsystem).
#[derive(Debug, thiserror::Error)]
pub enum QualityError {
    #[error("invalid quality configuration: {reason}")]
    InvalidConfig { reason: String },
}
