/// A player's full selection waiting in the dealer's queue.
///
/// The ticket identifies which submission of that player this is, so an
/// entry left behind by an earlier, abandoned claim is never judged against
/// a newer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub player: usize,
    pub ticket: u64,
}
