use std::collections::BTreeMap;

use tracing::debug;

use crate::{
  engine::BracketContext,
  error::Result,
  ledger::ClaimLedger,
  resolver::{processing_order, slot_sources, unique_matches, ResolvedMatch, ResolvedTable},
  scores::{apply_overrides, match_scores, outcome_from_scores},
  types::{BracketGameView, BracketMatch, BracketRoundView, BracketSide, RosterId},
  views::GameFrame,
};

/// Rounds and explicit placement games of one bracket side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideBrackets {
  pub rounds: Vec<BracketRoundView>,
  pub placements: Vec<BracketGameView>,
}

impl SideBrackets {
  pub fn games(&self) -> impl Iterator<Item = &BracketGameView> + '_ {
    self.rounds.iter().flat_map(|round| round.games.iter())
  }
}

pub fn round_title(side: BracketSide, round: u32, max_round: u32) -> String {
  if round == max_round {
    return match side {
      BracketSide::Winners => "Finals".to_string(),
      BracketSide::Losers => "Ultimate Loser".to_string(),
    };
  }
  format!("Round {round}")
}

pub fn final_game_label(side: BracketSide) -> &'static str {
  match side {
    BracketSide::Winners => "Championship",
    BracketSide::Losers => "Ultimate Loser",
  }
}

pub fn week_label(weeks: &[u32]) -> String {
  match weeks {
    [] => String::new(),
    [week] => format!("Week {week}"),
    [first, .., last] => format!("Weeks {first}-{last}"),
  }
}

/// "3rd Place", "11th Place", "21st Place".
pub fn ordinal_label(placement: u32) -> String {
  let suffix = match (placement % 10, placement % 100) {
    (1, rem) if rem != 11 => "st",
    (2, rem) if rem != 12 => "nd",
    (3, rem) if rem != 13 => "rd",
    _ => "th",
  };
  format!("{placement}{suffix} Place")
}

/// Placement rank as shown to readers. Losers-side ranks continue below the
/// playoff field.
pub fn display_placement(side: BracketSide, rank: u32, playoff_teams: u32) -> u32 {
  match side {
    BracketSide::Winners => rank,
    BracketSide::Losers => rank.saturating_add(playoff_teams).saturating_sub(1),
  }
}

/// The winner a reader should see highlighted. Losers-side upstream winners
/// may mean "eliminated", so that side always goes by the scores.
pub fn display_winner(side: BracketSide, resolved: &ResolvedMatch) -> Option<RosterId> {
  match side {
    BracketSide::Winners => resolved.winner,
    BracketSide::Losers => {
      outcome_from_scores(
        resolved.team1.team(),
        resolved.team2.team(),
        resolved.team1_score,
        resolved.team2_score,
      )
      .winner
    }
  }
}

/// Resolve every match of one side, claiming matched pairings in `ledger`,
/// and lay the results out as rounds plus explicit placement games.
pub fn assemble_side(
  ctx: &BracketContext<'_>,
  side: BracketSide,
  bracket: &[BracketMatch],
  ledger: &mut ClaimLedger,
) -> Result<SideBrackets> {
  let matches = unique_matches(side, bracket);
  if matches.is_empty() {
    return Ok(SideBrackets::default());
  }

  let order = processing_order(side, &matches)?;
  let mut table = ResolvedTable::default();
  for idx in order {
    let item = matches[idx];
    let resolved = resolve_match(ctx, &table, ledger, item);
    table.insert(item.m, resolved);
  }

  let mut by_round: BTreeMap<u32, Vec<&BracketMatch>> = BTreeMap::new();
  let mut explicit_placements = Vec::new();
  for item in &matches {
    if item.placement_tag().is_some() {
      explicit_placements.push(*item);
    } else {
      by_round.entry(item.r).or_default().push(*item);
    }
  }
  let max_round = by_round.keys().next_back().copied().unwrap_or(1);

  let mut rounds = Vec::with_capacity(by_round.len());
  for (round, mut items) in by_round {
    items.sort_by_key(|item| item.m);
    let (week_start, weeks) = ctx.settings.round_weeks(round);
    let games = items
      .into_iter()
      .filter_map(|item| {
        let resolved = table.get(item.m)?;
        let frame = GameFrame {
          id: format!("{side}-r{round}-m{}", item.m),
          round,
          week_start,
          weeks: weeks.clone(),
          label: (round == max_round).then(|| final_game_label(side).to_string()),
          placement: None,
        };
        Some(ctx.views.game_view(frame, resolved, display_winner(side, resolved)))
      })
      .collect();
    rounds.push(BracketRoundView {
      round,
      title: round_title(side, round, max_round),
      week_label: week_label(&weeks),
      games,
    });
  }

  let placements = explicit_placements
    .into_iter()
    .filter_map(|item| {
      let resolved = table.get(item.m)?;
      let rank = item.placement_tag()?;
      let shown = display_placement(side, rank, ctx.settings.playoff_teams);
      let (week_start, weeks) = ctx.settings.round_weeks(item.r);
      let frame = GameFrame {
        id: format!("{side}-placement-{}", item.m),
        round: item.r,
        week_start,
        weeks,
        label: Some(ordinal_label(shown)),
        placement: Some(shown),
      };
      Some(ctx.views.game_view(frame, resolved, display_winner(side, resolved)))
    })
    .collect::<Vec<_>>();

  debug!(
    "{side} bracket: {} rounds, {} explicit placement games",
    rounds.len(),
    placements.len()
  );
  Ok(SideBrackets { rounds, placements })
}

fn resolve_match(
  ctx: &BracketContext<'_>,
  table: &ResolvedTable,
  ledger: &mut ClaimLedger,
  item: &BracketMatch,
) -> ResolvedMatch {
  let [source1, source2] = slot_sources(item);
  let team1 = table.resolve(source1);
  let team2 = table.resolve(source2);
  let (_, weeks) = ctx.settings.round_weeks(item.r);

  let scores = match_scores(ctx.index, ledger, &weeks, Some(item.m), team1.team(), team2.team());
  let derived = outcome_from_scores(team1.team(), team2.team(), scores.team1_score, scores.team2_score);
  let outcome = apply_overrides(item.w, item.l, team1.team(), team2.team(), derived);
  ledger.claim_game(&weeks, &scores.matched, team1.team(), team2.team());

  ResolvedMatch {
    team1,
    team2,
    matchup_id: scores.matchup_id,
    matched: scores.matched,
    team1_score: scores.team1_score,
    team2_score: scores.team2_score,
    winner: outcome.winner,
    loser: outcome.loser,
  }
}
