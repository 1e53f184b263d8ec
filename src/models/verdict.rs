use serde::Serialize;

/// Outcome of a claim, as seen by the player who submitted it.
///
/// Reset to `Pending` by the player once it has served the freeze that
/// follows a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Verdict {
    #[default]
    Pending,
    Accepted,
    Rejected,
}
