use thiserror::Error;

/// Faults that cross the core boundary.
///
/// Expected "no match" conditions (unknown building types, unknown
/// structure names, out-of-bounds samples, empty result lists) are not
/// errors; they flow through as skipped rules or empty lists.
#[derive(Debug, Error)]
pub enum PlanError {
    /// No ground-cover source is bound, so terrain analysis cannot run.
    /// Callers should degrade to empty suggestions and retry after
    /// reconfiguration rather than abort.
    #[error("no ground cover source is bound")]
    GroundCoverMissing,

    /// An authored rule violates its invariants.
    #[error("rule validation failed: {0}")]
    Rule(String),

    /// Re-reading the rule repository failed.
    #[error("failed to load rules")]
    RuleLoad(#[source] anyhow::Error),
}
