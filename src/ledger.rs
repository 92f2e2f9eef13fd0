use std::collections::BTreeSet;

use crate::{
  types::RosterId,
  week_index::{pair_key, WeekPairing},
};

/// Pairings already attributed to a bracket game.
///
/// Threaded by `&mut` through both bracket sides and the placement pass so a
/// scored pairing is never credited to two games.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimLedger {
  pairings: BTreeSet<(u32, u32)>,
  pairs: BTreeSet<(u32, RosterId, RosterId)>,
}

impl ClaimLedger {
  pub fn new() -> Self {
    ClaimLedger::default()
  }

  pub fn is_available(&self, week: u32, pairing: &WeekPairing) -> bool {
    let (a, b) = pair_key(pairing.roster_ids[0], pairing.roster_ids[1]);
    !self.pairings.contains(&(week, pairing.matchup_id)) && !self.pairs.contains(&(week, a, b))
  }

  pub fn claim_pairing(&mut self, week: u32, matchup_id: u32) {
    self.pairings.insert((week, matchup_id));
  }

  pub fn claim_pair(&mut self, week: u32, a: RosterId, b: RosterId) {
    let (a, b) = pair_key(a, b);
    self.pairs.insert((week, a, b));
  }

  /// Claim everything a resolved game owns: the pairings it matched, and its
  /// team pair in every week of its window when both teams are known.
  pub fn claim_game(&mut self, weeks: &[u32], matched: &[(u32, u32)], team1: Option<RosterId>, team2: Option<RosterId>) {
    for (week, matchup_id) in matched {
      self.claim_pairing(*week, *matchup_id);
    }
    if let (Some(a), Some(b)) = (team1, team2) {
      for week in weeks {
        self.claim_pair(*week, a, b);
      }
    }
  }

  pub fn claimed_pairings(&self) -> usize {
    self.pairings.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::BTreeMap;

  fn pairing(matchup_id: u32, a: RosterId, b: RosterId) -> WeekPairing {
    WeekPairing {
      matchup_id,
      roster_ids: [a, b],
      points_by_roster: BTreeMap::new(),
    }
  }

  #[test]
  fn test_claimed_pairing_is_unavailable_only_in_its_week() {
    let mut ledger = ClaimLedger::new();
    ledger.claim_pairing(16, 2);

    assert!(!ledger.is_available(16, &pairing(2, 5, 6)));
    assert!(ledger.is_available(17, &pairing(2, 5, 6)));
    assert!(ledger.is_available(16, &pairing(3, 5, 6)));
  }

  #[test]
  fn test_claimed_pair_blocks_either_order() {
    let mut ledger = ClaimLedger::new();
    ledger.claim_game(&[16, 17], &[], Some(8), Some(3));

    assert!(!ledger.is_available(16, &pairing(4, 3, 8)));
    assert!(!ledger.is_available(17, &pairing(1, 8, 3)));
    assert!(ledger.is_available(18, &pairing(1, 8, 3)));
    assert_eq!(ledger.claimed_pairings(), 0);
  }

  #[test]
  fn test_game_without_both_teams_claims_only_matches() {
    let mut ledger = ClaimLedger::new();
    ledger.claim_game(&[15], &[(15, 1)], Some(1), None);

    assert!(!ledger.is_available(15, &pairing(1, 2, 3)));
    assert!(ledger.is_available(15, &pairing(2, 1, 4)));
    assert_eq!(ledger.claimed_pairings(), 1);
  }
}
