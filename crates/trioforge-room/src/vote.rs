//! The replay vote: a post-game unanimity poll among present seats.
//!
//! The voter set is frozen at the instant the vote opens — seats that
//! connect or disconnect during the window neither gain nor lose a
//! ballot. The room actor owns the 30 s window timer; this type only
//! tracks ballots and decides outcomes.

use trioforge_protocol::{ReplayVotes, SeatId};

use crate::RoomError;

/// How a completed vote ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Every voter said yes: the room restarts a match.
    Accepted,
    /// Every voter spoke, at least one said no.
    Rejected,
    /// The window closed with ballots missing. Treated like a
    /// rejection, but reported distinctly to clients.
    Expired,
}

/// One open replay vote.
#[derive(Debug, Clone)]
pub struct ReplayVote {
    /// The frozen voter set: seats connected when the match finished.
    voters: Vec<SeatId>,
    ballots: ReplayVotes,
    /// Epoch ms at which the window closes; broadcast to clients.
    deadline_ms: u64,
}

impl ReplayVote {
    /// Opens a vote for the given voter set. `deadline_ms` is the
    /// wall-clock close, used for the client-facing countdown; the
    /// authoritative expiry is the room's vote timer.
    pub fn open(voters: Vec<SeatId>, deadline_ms: u64) -> Self {
        Self { voters, ballots: ReplayVotes::new(), deadline_ms }
    }

    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    /// The ballots cast so far (for `replay-vote-updated` payloads).
    pub fn ballots(&self) -> ReplayVotes {
        self.ballots.clone()
    }

    /// Whether `seat` belongs to the frozen voter set.
    pub fn is_voter(&self, seat: SeatId) -> bool {
        self.voters.contains(&seat)
    }

    /// Records a ballot. Re-casting the same value is a silent no-op;
    /// changing a ballot is allowed while the window is open.
    ///
    /// Returns `Some(outcome)` once every voter has spoken: `Accepted`
    /// on unanimity, `Rejected` otherwise — immediately, regardless of
    /// time left in the window.
    pub fn cast(&mut self, seat: SeatId, vote: bool) -> Result<Option<VoteOutcome>, RoomError> {
        if !self.is_voter(seat) {
            return Err(RoomError::NotAVoter(seat));
        }
        self.ballots.insert(seat, vote);

        if self.ballots.len() == self.voters.len() {
            if self.ballots.values().all(|&v| v) {
                Ok(Some(VoteOutcome::Accepted))
            } else {
                Ok(Some(VoteOutcome::Rejected))
            }
        } else {
            Ok(None)
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn voters(ids: &[u64]) -> Vec<SeatId> {
        ids.iter().map(|&id| SeatId(id)).collect()
    }

    #[test]
    fn test_unanimous_yes_is_accepted_on_last_ballot() {
        let mut vote = ReplayVote::open(voters(&[1, 2, 3]), 0);

        assert_eq!(vote.cast(SeatId(1), true).unwrap(), None);
        assert_eq!(vote.cast(SeatId(2), true).unwrap(), None);
        assert_eq!(vote.cast(SeatId(3), true).unwrap(), Some(VoteOutcome::Accepted));
    }

    #[test]
    fn test_single_no_is_rejected_once_all_voted() {
        let mut vote = ReplayVote::open(voters(&[1, 2, 3]), 0);

        assert_eq!(vote.cast(SeatId(1), false).unwrap(), None);
        assert_eq!(vote.cast(SeatId(2), true).unwrap(), None);
        // Completion is immediate on the final ballot, not at expiry.
        assert_eq!(vote.cast(SeatId(3), true).unwrap(), Some(VoteOutcome::Rejected));
    }

    #[test]
    fn test_non_voter_is_rejected() {
        let mut vote = ReplayVote::open(voters(&[1, 2]), 0);
        let result = vote.cast(SeatId(9), true);
        assert!(matches!(result, Err(RoomError::NotAVoter(s)) if s == SeatId(9)));
        assert!(vote.ballots().is_empty());
    }

    #[test]
    fn test_recast_same_value_is_idempotent() {
        let mut vote = ReplayVote::open(voters(&[1, 2]), 0);
        vote.cast(SeatId(1), true).unwrap();
        let before = vote.ballots();

        assert_eq!(vote.cast(SeatId(1), true).unwrap(), None);
        assert_eq!(vote.ballots(), before);
    }

    #[test]
    fn test_changing_a_ballot_is_allowed_until_completion() {
        let mut vote = ReplayVote::open(voters(&[1, 2]), 0);
        vote.cast(SeatId(1), false).unwrap();
        vote.cast(SeatId(1), true).unwrap();

        assert_eq!(vote.cast(SeatId(2), true).unwrap(), Some(VoteOutcome::Accepted));
    }

    #[test]
    fn test_two_voter_unanimity() {
        let mut vote = ReplayVote::open(voters(&[1, 2]), 0);
        vote.cast(SeatId(2), true).unwrap();
        assert_eq!(vote.cast(SeatId(1), true).unwrap(), Some(VoteOutcome::Accepted));
    }

    #[test]
    fn test_ballots_snapshot_tracks_casts() {
        let mut vote = ReplayVote::open(voters(&[1, 2, 3]), 0);
        vote.cast(SeatId(2), false).unwrap();

        let ballots = vote.ballots();
        assert_eq!(ballots.len(), 1);
        assert_eq!(ballots.get(&SeatId(2)), Some(&false));
    }
}
