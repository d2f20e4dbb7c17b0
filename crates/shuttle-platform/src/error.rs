//! Platform error types.

/// Errors produced while configuring a platform or transferring velocity to riders.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlatformError {
    /// A motion setting is outside its valid range.
    #[error("invalid motion settings: {0}")]
    InvalidSettings(String),

    /// A cycle policy name did not match any known policy.
    #[error("unknown cycle policy `{0}` (expected play_once, loop, ping_pong or start_to_end)")]
    UnknownCyclePolicy(String),

    /// An interpolation mode name did not match any known mode.
    #[error("unknown interpolation mode `{0}` (expected linear or eased)")]
    UnknownInterpolation(String),

    /// A body classified as a rider exposed no linear velocity to correct.
    #[error("rider body has no linear velocity; contact was misclassified")]
    RiderWithoutVelocity,
}
