use std::collections::BTreeMap;

use crate::{
  types::{LeagueSnapshot, RosterId},
  week_index::WeekIndex,
};

/// Regular-season record for one team as of a cutoff week.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamStats {
  pub roster_id: RosterId,
  pub wins: u32,
  pub losses: u32,
  pub ties: u32,
  pub points_for: f64,
  pub points_against: f64,
  pub avg_points: f64,
  pub weekly_scores: Vec<f64>,
  pub weekly_opponent_scores: Vec<f64>,
  /// 1-based rank, 1 = best record
  pub standing: u32,
}

impl TeamStats {
  fn empty(roster_id: RosterId) -> Self {
    TeamStats {
      roster_id,
      wins: 0,
      losses: 0,
      ties: 0,
      points_for: 0.0,
      points_against: 0.0,
      avg_points: 0.0,
      weekly_scores: Vec::new(),
      weekly_opponent_scores: Vec::new(),
      standing: 0,
    }
  }

  fn record_week(&mut self, scored: f64, allowed: f64) {
    self.weekly_scores.push(scored);
    self.weekly_opponent_scores.push(allowed);
    self.points_for += scored;
    self.points_against += allowed;
    if scored > allowed {
      self.wins += 1;
    } else if scored < allowed {
      self.losses += 1;
    } else {
      self.ties += 1;
    }
  }
}

/// Standings through `cutoff_week`, best team first.
///
/// Records come from the week index; a roster with no scored weeks in range
/// keeps the record its roster settings report.
pub fn calculate_team_stats(snapshot: &LeagueSnapshot, index: &WeekIndex, cutoff_week: u32) -> Vec<TeamStats> {
  let mut stats: BTreeMap<RosterId, TeamStats> = snapshot
    .rosters
    .iter()
    .map(|roster| (roster.roster_id, TeamStats::empty(roster.roster_id)))
    .collect();

  for (_, pairings) in index.weeks().filter(|(week, _)| *week <= cutoff_week) {
    for pairing in pairings {
      let [a, b] = pairing.roster_ids;
      let (Some(points_a), Some(points_b)) = (pairing.points_for(a), pairing.points_for(b)) else {
        continue;
      };
      if let Some(team) = stats.get_mut(&a) {
        team.record_week(points_a, points_b);
      }
      if let Some(team) = stats.get_mut(&b) {
        team.record_week(points_b, points_a);
      }
    }
  }

  for roster in &snapshot.rosters {
    if let Some(team) = stats.get_mut(&roster.roster_id) {
      if team.weekly_scores.is_empty() {
        team.wins = roster.settings.wins;
        team.losses = roster.settings.losses;
        team.ties = roster.settings.ties;
        team.points_for = roster.settings.points_for();
        team.points_against = roster.settings.points_against();
      }
    }
  }

  let mut ranked: Vec<TeamStats> = stats.into_values().collect();
  for team in ranked.iter_mut() {
    if !team.weekly_scores.is_empty() {
      team.avg_points = team.points_for / team.weekly_scores.len() as f64;
    }
  }
  ranked.sort_by(|a, b| {
    b.wins
      .cmp(&a.wins)
      .then_with(|| b.points_for.total_cmp(&a.points_for))
      .then_with(|| a.roster_id.cmp(&b.roster_id))
  });
  for (position, team) in ranked.iter_mut().enumerate() {
    team.standing = position as u32 + 1;
  }
  ranked
}

/// Team key to playoff seed. Display only; resolution never reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedMap {
  seeds: BTreeMap<RosterId, u32>,
}

impl SeedMap {
  pub fn from_stats(stats: &[TeamStats]) -> Self {
    SeedMap {
      seeds: stats.iter().map(|team| (team.roster_id, team.standing)).collect(),
    }
  }

  pub fn seed(&self, roster_id: RosterId) -> Option<u32> {
    self.seeds.get(&roster_id).copied()
  }

  pub fn len(&self) -> usize {
    self.seeds.len()
  }

  pub fn is_empty(&self) -> bool {
    self.seeds.is_empty()
  }
}
