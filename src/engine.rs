use tracing::debug;

use crate::{
  error::Result,
  identity::TeamDirectory,
  ledger::ClaimLedger,
  placements::derive_placements,
  rounds::{assemble_side, SideBrackets},
  settings::LeagueSettings,
  standings::{calculate_team_stats, SeedMap},
  types::{BracketGameView, BracketReport, BracketSide, LeagueSnapshot, PostseasonBrackets},
  views::ViewContext,
  week_index::WeekIndex,
};

/// Read-only inputs shared by every stage of one engine run.
#[derive(Clone, Copy)]
pub struct BracketContext<'a> {
  pub settings: &'a LeagueSettings,
  pub index: &'a WeekIndex,
  pub views: ViewContext<'a>,
}

/// Resolve both bracket sides of `snapshot` into display-ready rounds and
/// placement games.
///
/// Winners are resolved before losers and synthesized placements come last,
/// all sharing one claim ledger so no scored pairing lands in two games.
pub fn build_postseason_brackets(snapshot: &LeagueSnapshot, settings: &LeagueSettings) -> Result<PostseasonBrackets> {
  let index = WeekIndex::build(&snapshot.matchups);
  let cutoff = settings.standings_cutoff(snapshot.last_scored_week);
  let seeds = SeedMap::from_stats(&calculate_team_stats(snapshot, &index, cutoff));
  let directory = TeamDirectory::from_snapshot(snapshot);
  debug!("seeded {} teams through week {cutoff}", seeds.len());

  let ctx = BracketContext {
    settings,
    index: &index,
    views: ViewContext { directory: &directory, seeds: &seeds },
  };
  let mut ledger = ClaimLedger::new();
  let winners = assemble_side(&ctx, BracketSide::Winners, &snapshot.winners_bracket, &mut ledger)?;
  let losers = assemble_side(&ctx, BracketSide::Losers, &snapshot.losers_bracket, &mut ledger)?;

  let winners_placements = placements_for(&ctx, BracketSide::Winners, &winners, &mut ledger);
  let losers_placements = placements_for(&ctx, BracketSide::Losers, &losers, &mut ledger);
  debug!("claimed {} scored pairings", ledger.claimed_pairings());

  Ok(PostseasonBrackets {
    winners_rounds: winners.rounds,
    losers_rounds: losers.rounds,
    winners_placements,
    losers_placements,
  })
}

fn placements_for(
  ctx: &BracketContext<'_>,
  side: BracketSide,
  brackets: &SideBrackets,
  ledger: &mut ClaimLedger,
) -> Vec<BracketGameView> {
  if !brackets.placements.is_empty() {
    return brackets.placements.clone();
  }
  derive_placements(ctx, side, brackets, ledger)
}

/// Brackets plus the league context a reader needs to make sense of them.
pub fn build_report(snapshot: &LeagueSnapshot) -> Result<BracketReport> {
  let settings = LeagueSettings::from_league(&snapshot.league);
  let brackets = build_postseason_brackets(snapshot, &settings)?;
  Ok(BracketReport {
    league_name: snapshot.league.name.clone(),
    season: snapshot.league.season.clone(),
    playoff_description: settings.playoff_description,
    losers_bracket_description: settings.losers_bracket_description,
    brackets,
  })
}
