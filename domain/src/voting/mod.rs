//! Vote records, ballots and tallies.
//!
//! A [`Ballot`] holds the votes cast on one proposition while its agenda
//! item is in vote. Casting is idempotent per member: a second cast for the
//! same member replaces the prior record instead of duplicating it. The
//! [`Tally`] is a pure aggregation over the ballot with the pass/fail rule
//! `approved == yes > no + abstain`.

use crate::core::ids::MemberId;
use serde::{Deserialize, Serialize};

/// One member's choice on an open vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
    Abstain,
    Absent,
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VoteChoice::Yes => "yes",
            VoteChoice::No => "no",
            VoteChoice::Abstain => "abstain",
            VoteChoice::Absent => "absent",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "y" | "sim" => Ok(VoteChoice::Yes),
            "no" | "n" | "nao" => Ok(VoteChoice::No),
            "abstain" | "abstention" => Ok(VoteChoice::Abstain),
            "absent" => Ok(VoteChoice::Absent),
            _ => Err(format!(
                "Unknown vote choice: {s}. Valid: yes, no, abstain, absent"
            )),
        }
    }
}

/// A single cast vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub member_id: MemberId,
    pub choice: VoteChoice,
}

/// The set of votes cast on one open vote, one record per member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    records: Vec<VoteRecord>,
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast or replace this member's vote. Returns `true` when a prior
    /// record was replaced.
    pub fn cast(&mut self, member_id: MemberId, choice: VoteChoice) -> bool {
        if let Some(existing) = self.records.iter_mut().find(|r| r.member_id == member_id) {
            existing.choice = choice;
            true
        } else {
            self.records.push(VoteRecord { member_id, choice });
            false
        }
    }

    /// Drop all records. Used when a vote is re-opened on the same item.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tally(&self) -> Tally {
        Tally::from_records(&self.records)
    }
}

/// Aggregated vote counts and the derived outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: usize,
    pub no: usize,
    pub abstain: usize,
    pub absent: usize,
    pub total: usize,
    /// `yes > no + abstain`
    pub approved: bool,
}

impl Tally {
    pub fn from_records(records: &[VoteRecord]) -> Self {
        let mut yes = 0;
        let mut no = 0;
        let mut abstain = 0;
        let mut absent = 0;
        for record in records {
            match record.choice {
                VoteChoice::Yes => yes += 1,
                VoteChoice::No => no += 1,
                VoteChoice::Abstain => abstain += 1,
                VoteChoice::Absent => absent += 1,
            }
        }
        Self {
            yes,
            no,
            abstain,
            absent,
            total: records.len(),
            approved: yes > no + abstain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast_all(ballot: &mut Ballot, votes: &[(&str, VoteChoice)]) {
        for (member, choice) in votes {
            ballot.cast(MemberId::new(*member), *choice);
        }
    }

    #[test]
    fn test_tally_counts_and_outcome() {
        let mut ballot = Ballot::new();
        cast_all(
            &mut ballot,
            &[
                ("m1", VoteChoice::Yes),
                ("m2", VoteChoice::Yes),
                ("m3", VoteChoice::Yes),
                ("m4", VoteChoice::Yes),
                ("m5", VoteChoice::Yes),
                ("m6", VoteChoice::No),
                ("m7", VoteChoice::No),
                ("m8", VoteChoice::Abstain),
            ],
        );
        let tally = ballot.tally();
        assert_eq!(
            (tally.yes, tally.no, tally.abstain, tally.absent, tally.total),
            (5, 2, 1, 0, 8)
        );
        // 5 > 2 + 1
        assert!(tally.approved);
    }

    #[test]
    fn test_abstentions_count_against() {
        let mut ballot = Ballot::new();
        cast_all(
            &mut ballot,
            &[
                ("m1", VoteChoice::Yes),
                ("m2", VoteChoice::Yes),
                ("m3", VoteChoice::No),
                ("m4", VoteChoice::Abstain),
            ],
        );
        // 2 > 1 + 1 is false.
        assert!(!ballot.tally().approved);
    }

    #[test]
    fn test_cast_is_idempotent_per_member() {
        let mut ballot = Ballot::new();
        assert!(!ballot.cast(MemberId::new("m1"), VoteChoice::Yes));
        let before = ballot.tally();

        // Same vote again: tally unchanged.
        assert!(ballot.cast(MemberId::new("m1"), VoteChoice::Yes));
        assert_eq!(ballot.tally(), before);

        // Different vote: replaced exactly once.
        assert!(ballot.cast(MemberId::new("m1"), VoteChoice::No));
        let tally = ballot.tally();
        assert_eq!((tally.yes, tally.no, tally.total), (0, 1, 1));
    }

    #[test]
    fn test_clear() {
        let mut ballot = Ballot::new();
        ballot.cast(MemberId::new("m1"), VoteChoice::Yes);
        ballot.clear();
        assert!(ballot.is_empty());
        assert_eq!(ballot.tally().total, 0);
    }

    #[test]
    fn test_total_is_sum_of_counts() {
        let mut ballot = Ballot::new();
        cast_all(
            &mut ballot,
            &[
                ("m1", VoteChoice::Yes),
                ("m2", VoteChoice::No),
                ("m3", VoteChoice::Abstain),
                ("m4", VoteChoice::Absent),
            ],
        );
        let t = ballot.tally();
        assert_eq!(t.total, t.yes + t.no + t.abstain + t.absent);
    }

    #[test]
    fn test_empty_ballot_not_approved() {
        assert!(!Ballot::new().tally().approved);
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!("yes".parse::<VoteChoice>().ok(), Some(VoteChoice::Yes));
        assert_eq!("No".parse::<VoteChoice>().ok(), Some(VoteChoice::No));
        assert_eq!(
            "abstain".parse::<VoteChoice>().ok(),
            Some(VoteChoice::Abstain)
        );
        assert!("maybe".parse::<VoteChoice>().is_err());
    }
}
