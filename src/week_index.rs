use std::collections::BTreeMap;

use crate::types::{RosterId, ScoreRecord};

/// One scored head-to-head pairing inside a single week.
#[derive(Clone, Debug, PartialEq)]
pub struct WeekPairing {
  pub matchup_id: u32,
  pub roster_ids: [RosterId; 2],
  pub points_by_roster: BTreeMap<RosterId, f64>,
}

impl WeekPairing {
  pub fn has_rosters(&self, a: RosterId, b: RosterId) -> bool {
    let [x, y] = self.roster_ids;
    (x == a && y == b) || (x == b && y == a)
  }

  pub fn points_for(&self, roster_id: RosterId) -> Option<f64> {
    self.points_by_roster.get(&roster_id).copied()
  }
}

/// Order-independent key for a pair of teams.
pub fn pair_key(a: RosterId, b: RosterId) -> (RosterId, RosterId) {
  if a <= b { (a, b) } else { (b, a) }
}

/// Week number to the pairings played that week, ordered by pairing id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeekIndex {
  weeks: BTreeMap<u32, Vec<WeekPairing>>,
}

impl WeekIndex {
  pub fn build(matchups: &BTreeMap<u32, Vec<ScoreRecord>>) -> Self {
    let weeks = matchups
      .iter()
      .map(|(week, records)| (*week, group_week(records)))
      .collect();
    WeekIndex { weeks }
  }

  pub fn week(&self, week: u32) -> &[WeekPairing] {
    self.weeks.get(&week).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn weeks(&self) -> impl Iterator<Item = (u32, &[WeekPairing])> + '_ {
    self.weeks.iter().map(|(week, pairings)| (*week, pairings.as_slice()))
  }
}

fn group_week(records: &[ScoreRecord]) -> Vec<WeekPairing> {
  let mut groups: BTreeMap<u32, WeekPairing> = BTreeMap::new();
  for record in records {
    // No matchup id means the team sat out the week.
    let Some(matchup_id) = record.matchup_id else {
      continue;
    };
    let group = groups.entry(matchup_id).or_insert_with(|| WeekPairing {
      matchup_id,
      roster_ids: [record.roster_id, record.roster_id],
      points_by_roster: BTreeMap::new(),
    });
    let [first, second] = group.roster_ids;
    if first != record.roster_id && second != record.roster_id {
      group.roster_ids = [first, record.roster_id];
    }
    group.points_by_roster.insert(record.roster_id, record.points);
  }
  groups
    .into_values()
    .filter(|group| group.roster_ids[0] != group.roster_ids[1])
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(roster_id: RosterId, matchup_id: Option<u32>, points: f64) -> ScoreRecord {
    ScoreRecord { roster_id, matchup_id, points }
  }

  #[test]
  fn test_groups_records_by_matchup() {
    let mut matchups = BTreeMap::new();
    matchups.insert(
      15,
      vec![
        record(4, Some(2), 88.0),
        record(1, Some(1), 120.0),
        record(3, Some(2), 91.5),
        record(2, Some(1), 100.0),
      ],
    );
    let index = WeekIndex::build(&matchups);
    let week = index.week(15);

    assert_eq!(week.len(), 2);
    assert_eq!(week[0].matchup_id, 1);
    assert_eq!(week[0].roster_ids, [1, 2]);
    assert_eq!(week[1].points_for(3), Some(91.5));
    assert!(week[1].has_rosters(3, 4));
    assert!(week[1].has_rosters(4, 3));
  }

  #[test]
  fn test_drops_self_pairs_and_unpaired_records() {
    let mut matchups = BTreeMap::new();
    matchups.insert(
      16,
      vec![
        record(5, Some(9), 77.0),
        record(6, None, 64.0),
        record(1, Some(1), 110.0),
        record(2, Some(1), 99.0),
      ],
    );
    let index = WeekIndex::build(&matchups);

    assert_eq!(index.week(16).len(), 1);
    assert_eq!(index.week(16)[0].matchup_id, 1);
    assert!(index.week(17).is_empty());
  }

  #[test]
  fn test_pair_key_is_order_independent() {
    assert_eq!(pair_key(7, 2), (2, 7));
    assert_eq!(pair_key(2, 7), (2, 7));
  }
}
