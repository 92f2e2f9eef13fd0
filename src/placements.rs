use tracing::warn;

use crate::{
  engine::BracketContext,
  ledger::ClaimLedger,
  resolver::{ResolvedMatch, SlotOutcome},
  rounds::{display_placement, ordinal_label, SideBrackets},
  scores::{match_scores, outcome_from_scores},
  types::{BracketGameView, BracketSide, RosterId},
  views::GameFrame,
};

/// Consolation games for a side that defines none of its own.
///
/// Candidates come from the side's resolved rounds; every synthesized game
/// scores against pairings nothing else has claimed and claims what it uses.
pub fn derive_placements(
  ctx: &BracketContext<'_>,
  side: BracketSide,
  brackets: &SideBrackets,
  ledger: &mut ClaimLedger,
) -> Vec<BracketGameView> {
  let games: Vec<&BracketGameView> = brackets.games().collect();
  let Some(max_round) = games.iter().map(|game| game.round).max() else {
    return Vec::new();
  };
  let semifinal = max_round.saturating_sub(1).max(1);

  let mut placements = Vec::new();
  match side {
    BracketSide::Winners => {
      let semifinal_losers = teams_of(&games, semifinal, |game| game.loser_roster_id);
      if let [a, b, ..] = semifinal_losers[..] {
        placements.push(build_placement_game(ctx, side, ledger, 3, a, b, max_round));
      }
      // With a one-round semifinal the round-1 losers already met for 3rd.
      if semifinal > 1 {
        let first_round_losers = teams_of(&games, 1, |game| game.loser_roster_id);
        if let [a, b, ..] = first_round_losers[..] {
          placements.push(build_placement_game(ctx, side, ledger, 5, a, b, 2));
        }
      }
    }
    BracketSide::Losers => {
      let semifinal_winners = teams_of(&games, semifinal, |game| game.winner_roster_id);
      if let [a, b, ..] = semifinal_winners[..] {
        placements.push(build_placement_game(ctx, side, ledger, 3, a, b, max_round));
      }
      let semifinal_losers = teams_of(&games, semifinal, |game| game.loser_roster_id);
      if let [a, b, ..] = semifinal_losers[..] {
        placements.push(build_placement_game(ctx, side, ledger, 5, a, b, max_round));
      }
    }
  }
  placements
}

fn teams_of(
  games: &[&BracketGameView],
  round: u32,
  pick: impl Fn(&BracketGameView) -> Option<RosterId>,
) -> Vec<RosterId> {
  games
    .iter()
    .filter(|game| game.round == round)
    .filter_map(|game| pick(*game))
    .collect()
}

/// One synthesized placement game between `team1` and `team2` in the window
/// of `round`. Emitted with empty scores when no unclaimed pairing exists.
pub fn build_placement_game(
  ctx: &BracketContext<'_>,
  side: BracketSide,
  ledger: &mut ClaimLedger,
  rank: u32,
  team1: RosterId,
  team2: RosterId,
  round: u32,
) -> BracketGameView {
  let shown = display_placement(side, rank, ctx.settings.playoff_teams);
  let (week_start, weeks) = ctx.settings.round_weeks(round);
  let scores = match_scores(ctx.index, ledger, &weeks, None, Some(team1), Some(team2));
  if scores.matched.is_empty() {
    warn!("{side} {}: no unclaimed pairing for {team1} vs {team2} in weeks {weeks:?}", ordinal_label(shown));
  }
  let outcome = outcome_from_scores(Some(team1), Some(team2), scores.team1_score, scores.team2_score);
  ledger.claim_game(&weeks, &scores.matched, Some(team1), Some(team2));

  let resolved = ResolvedMatch {
    team1: SlotOutcome::Team(team1),
    team2: SlotOutcome::Team(team2),
    matchup_id: scores.matchup_id,
    matched: scores.matched,
    team1_score: scores.team1_score,
    team2_score: scores.team2_score,
    winner: outcome.winner,
    loser: outcome.loser,
  };
  let frame = GameFrame {
    id: format!("{side}-placement-{shown}"),
    round,
    week_start,
    weeks,
    label: Some(ordinal_label(shown)),
    placement: Some(shown),
  };
  ctx.views.game_view(frame, &resolved, outcome.winner)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    identity::TeamDirectory,
    rounds::assemble_side,
    settings::LeagueSettings,
    standings::SeedMap,
    types::{BracketFrom, BracketMatch, LeagueSnapshot, ScoreRecord, SlotValue},
    views::ViewContext,
    week_index::WeekIndex,
  };

  fn record(roster_id: RosterId, matchup_id: u32, points: f64) -> ScoreRecord {
    ScoreRecord { roster_id, matchup_id: Some(matchup_id), points }
  }

  fn team(m: u32, r: u32, t1: RosterId, t2: RosterId) -> BracketMatch {
    BracketMatch {
      m,
      r,
      t1: Some(SlotValue::Team(t1)),
      t2: Some(SlotValue::Team(t2)),
      ..BracketMatch::default()
    }
  }

  fn fed(m: u32, r: u32, from1: BracketFrom, from2: BracketFrom) -> BracketMatch {
    BracketMatch { m, r, t1_from: Some(from1), t2_from: Some(from2), ..BracketMatch::default() }
  }

  /// Six-team field: 1 and 2 have byes, 3v6 and 4v5 in week 15.
  fn make_snapshot() -> LeagueSnapshot {
    let mut snapshot = LeagueSnapshot::default();
    snapshot.matchups.insert(
      15,
      vec![record(3, 1, 100.0), record(6, 1, 90.0), record(4, 2, 80.0), record(5, 2, 85.0)],
    );
    snapshot.matchups.insert(
      16,
      vec![
        record(1, 1, 120.0),
        record(3, 1, 110.0),
        record(2, 2, 99.0),
        record(5, 2, 101.0),
        record(6, 3, 77.0),
        record(4, 3, 88.0),
      ],
    );
    snapshot.matchups.insert(
      17,
      vec![record(1, 1, 130.0), record(5, 1, 125.0), record(3, 2, 95.0), record(2, 2, 96.0)],
    );
    snapshot
  }

  fn six_team_bracket() -> Vec<BracketMatch> {
    vec![
      team(1, 1, 3, 6),
      team(2, 1, 4, 5),
      BracketMatch { m: 3, r: 2, t1: Some(SlotValue::Team(1)), t2_from: Some(BracketFrom::winner_of(1)), ..BracketMatch::default() },
      BracketMatch { m: 4, r: 2, t1: Some(SlotValue::Team(2)), t2_from: Some(BracketFrom::winner_of(2)), ..BracketMatch::default() },
      fed(5, 3, BracketFrom::winner_of(3), BracketFrom::winner_of(4)),
    ]
  }

  fn derive(side: BracketSide, bracket: &[BracketMatch]) -> Vec<BracketGameView> {
    let snapshot = make_snapshot();
    let settings = LeagueSettings::default();
    let index = WeekIndex::build(&snapshot.matchups);
    let directory = TeamDirectory::from_snapshot(&snapshot);
    let seeds = SeedMap::default();
    let ctx = BracketContext {
      settings: &settings,
      index: &index,
      views: ViewContext { directory: &directory, seeds: &seeds },
    };
    let mut ledger = ClaimLedger::new();
    let brackets = assemble_side(&ctx, side, bracket, &mut ledger).unwrap();
    derive_placements(&ctx, side, &brackets, &mut ledger)
  }

  #[test]
  fn test_winners_side_gets_third_and_fifth() {
    let placements = derive(BracketSide::Winners, &six_team_bracket());

    assert_eq!(placements.len(), 2);
    let third = &placements[0];
    assert_eq!(third.id, "winners-placement-3");
    assert_eq!(third.label.as_deref(), Some("3rd Place"));
    assert_eq!((third.team1.roster_id, third.team2.roster_id), (Some(3), Some(2)));
    assert_eq!(third.weeks, vec![17]);
    assert_eq!(third.matchup_id, Some(2));
    assert_eq!(third.winner_roster_id, Some(2));

    let fifth = &placements[1];
    assert_eq!(fifth.placement, Some(5));
    assert_eq!((fifth.team1.roster_id, fifth.team2.roster_id), (Some(6), Some(4)));
    assert_eq!(fifth.weeks, vec![16]);
    assert_eq!(fifth.team2.score, Some(88.0));
    assert!(fifth.team2.is_winner);
  }

  #[test]
  fn test_losers_side_ranks_are_offset() {
    let placements = derive(BracketSide::Losers, &six_team_bracket());
    let ids: Vec<&str> = placements.iter().map(|game| game.id.as_str()).collect();

    assert_eq!(ids, vec!["losers-placement-8", "losers-placement-10"]);
    assert_eq!(placements[0].label.as_deref(), Some("8th Place"));
    // Semifinal winners 1 and 5 already played each other in the final.
    assert_eq!(placements[0].matchup_id, None);
    assert_eq!(placements[0].team1.score, None);
    assert_eq!(placements[0].winner_roster_id, None);
    assert_eq!(placements[1].matchup_id, Some(2));
  }

  #[test]
  fn test_four_team_bracket_skips_fifth_place() {
    let bracket = vec![
      team(1, 1, 3, 6),
      team(2, 1, 4, 5),
      fed(3, 2, BracketFrom::winner_of(1), BracketFrom::winner_of(2)),
    ];
    let placements = derive(BracketSide::Winners, &bracket);

    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].placement, Some(3));
    assert_eq!((placements[0].team1.roster_id, placements[0].team2.roster_id), (Some(6), Some(4)));
    assert_eq!(placements[0].matchup_id, Some(3));
  }

  #[test]
  fn test_single_known_candidate_emits_nothing() {
    let bracket = vec![team(1, 1, 3, 6), fed(2, 2, BracketFrom::winner_of(1), BracketFrom::winner_of(9))];
    let placements = derive(BracketSide::Winners, &bracket);

    assert!(placements.is_empty());
  }
}
