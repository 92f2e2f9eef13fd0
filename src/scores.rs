use crate::{
  ledger::ClaimLedger,
  types::RosterId,
  week_index::{WeekIndex, WeekPairing},
};

/// Aggregate result of looking a pairing up across a round's weeks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchScores {
  /// Pairing id of the last week a pairing was found in
  pub matchup_id: Option<u32>,
  pub team1_score: Option<f64>,
  pub team2_score: Option<f64>,
  /// Every (week, pairing id) this lookup consumed
  pub matched: Vec<(u32, u32)>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
  pub winner: Option<RosterId>,
  pub loser: Option<RosterId>,
}

/// Sum both teams' points over `weeks`, preferring the pairing whose id equals
/// `hint` and skipping pairings the ledger has already handed out.
pub fn match_scores(
  index: &WeekIndex,
  ledger: &ClaimLedger,
  weeks: &[u32],
  hint: Option<u32>,
  team1: Option<RosterId>,
  team2: Option<RosterId>,
) -> MatchScores {
  let (Some(a), Some(b)) = (team1, team2) else {
    return MatchScores::default();
  };

  let mut totals = [0.0_f64; 2];
  let mut found = false;
  let mut result = MatchScores::default();
  for &week in weeks {
    let Some(pairing) = find_pairing(index.week(week), ledger, week, hint, a, b) else {
      continue;
    };
    result.matchup_id = Some(pairing.matchup_id);
    result.matched.push((week, pairing.matchup_id));
    if let (Some(points_a), Some(points_b)) = (pairing.points_for(a), pairing.points_for(b)) {
      totals[0] += points_a;
      totals[1] += points_b;
      found = true;
    }
  }

  if found {
    result.team1_score = Some(totals[0]);
    result.team2_score = Some(totals[1]);
  }
  result
}

fn find_pairing<'a>(
  pairings: &'a [WeekPairing],
  ledger: &ClaimLedger,
  week: u32,
  hint: Option<u32>,
  a: RosterId,
  b: RosterId,
) -> Option<&'a WeekPairing> {
  let usable = |pairing: &&WeekPairing| pairing.has_rosters(a, b) && ledger.is_available(week, pairing);
  hint
    .and_then(|id| pairings.iter().filter(usable).find(|pairing| pairing.matchup_id == id))
    .or_else(|| pairings.iter().find(usable))
}

/// Strictly higher aggregate wins. Ties and missing data decide nothing.
pub fn outcome_from_scores(
  team1: Option<RosterId>,
  team2: Option<RosterId>,
  team1_score: Option<f64>,
  team2_score: Option<f64>,
) -> Outcome {
  let (Some(a), Some(b), Some(score_a), Some(score_b)) = (team1, team2, team1_score, team2_score) else {
    return Outcome::default();
  };
  if score_a > score_b {
    Outcome { winner: Some(a), loser: Some(b) }
  } else if score_b > score_a {
    Outcome { winner: Some(b), loser: Some(a) }
  } else {
    Outcome::default()
  }
}

/// Explicit upstream winner/loser always beat the score-derived outcome. When
/// only one side is explicit, the other is the opposite slot team if the
/// explicit one is in the game.
pub fn apply_overrides(
  explicit_winner: Option<RosterId>,
  explicit_loser: Option<RosterId>,
  team1: Option<RosterId>,
  team2: Option<RosterId>,
  derived: Outcome,
) -> Outcome {
  let opponent_of = |id: RosterId| -> Option<RosterId> {
    match (team1, team2) {
      (Some(a), Some(b)) if a == id => Some(b),
      (Some(a), Some(b)) if b == id => Some(a),
      _ => None,
    }
  };
  match (explicit_winner, explicit_loser) {
    (Some(winner), Some(loser)) => Outcome { winner: Some(winner), loser: Some(loser) },
    (Some(winner), None) => Outcome {
      winner: Some(winner),
      loser: opponent_of(winner).or(derived.loser.filter(|loser| *loser != winner)),
    },
    (None, Some(loser)) => Outcome {
      winner: opponent_of(loser).or(derived.winner.filter(|winner| *winner != loser)),
      loser: Some(loser),
    },
    (None, None) => derived,
  }
}
