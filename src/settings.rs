use crate::types::League;

pub const DEFAULT_START_WEEK: u32 = 1;
pub const DEFAULT_PLAYOFF_WEEK_START: u32 = 15;
pub const DEFAULT_PLAYOFF_TEAMS: u32 = 6;
pub const DEFAULT_TOTAL_TEAMS: u32 = 12;

/// League format as the bracket engine needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueSettings {
  pub regular_season_start: u32,
  pub regular_season_end: u32,
  pub playoff_start: u32,
  pub total_teams: u32,
  pub playoff_teams: u32,
  pub divisions: u32,
  /// Scoring weeks per playoff round (1 or 2).
  pub legs_per_round: u32,
  pub has_losers_bracket: bool,
  pub playoff_description: String,
  pub losers_bracket_description: String,
}

impl Default for LeagueSettings {
  fn default() -> Self {
    LeagueSettings::from_league(&League::default())
  }
}

impl LeagueSettings {
  pub fn from_league(league: &League) -> Self {
    let raw = league.settings.clone().unwrap_or_default();
    let regular_season_start = raw.start_week.filter(|w| *w > 0).unwrap_or(DEFAULT_START_WEEK);
    let playoff_start = raw
      .playoff_week_start
      .filter(|w| *w > 0)
      .unwrap_or(DEFAULT_PLAYOFF_WEEK_START);
    let playoff_teams = raw.playoff_teams.filter(|n| *n > 0).unwrap_or(DEFAULT_PLAYOFF_TEAMS);
    let total_teams = raw.num_teams.filter(|n| *n > 0).unwrap_or(DEFAULT_TOTAL_TEAMS);
    let divisions = raw.divisions.unwrap_or(0);
    let has_losers_bracket = league.loser_bracket_id.is_some();
    let legs_per_round = if raw.playoff_round_type == Some(2) { 2 } else { 1 };

    LeagueSettings {
      regular_season_start,
      regular_season_end: playoff_start.saturating_sub(1),
      playoff_start,
      total_teams,
      playoff_teams,
      divisions,
      legs_per_round,
      has_losers_bracket,
      playoff_description: playoff_description(playoff_teams, divisions, raw.playoff_type.unwrap_or(0)),
      losers_bracket_description: losers_bracket_description(total_teams, playoff_teams, has_losers_bracket),
    }
  }

  /// Last week whose results count toward seeding.
  pub fn standings_cutoff(&self, last_scored_week: u32) -> u32 {
    last_scored_week.min(self.regular_season_end)
  }

  /// First week and all weeks covered by a playoff round.
  pub fn round_weeks(&self, round: u32) -> (u32, Vec<u32>) {
    let legs = self.legs_per_round.max(1);
    let offset = round.saturating_sub(1).saturating_mul(legs);
    let week_start = self.playoff_start.saturating_add(offset);
    let weeks = (0..legs).filter_map(|leg| week_start.checked_add(leg)).collect();
    (week_start, weeks)
  }
}

fn playoff_description(playoff_teams: u32, divisions: u32, playoff_type: u32) -> String {
  if playoff_type != 0 {
    return format!("{playoff_teams}-team playoff bracket.");
  }
  if divisions > 0 && playoff_teams >= divisions {
    let wild_cards = playoff_teams - divisions;
    if playoff_teams > 4 {
      return format!(
        "{playoff_teams}-team single elimination bracket. Top {divisions} division winners get first-round byes, {wild_cards} wild card teams compete."
      );
    }
    return format!(
      "{playoff_teams}-team single elimination bracket. {divisions} division winners and {wild_cards} wild card teams."
    );
  }
  format!("{playoff_teams}-team single elimination bracket.")
}

fn losers_bracket_description(total_teams: u32, playoff_teams: u32, has_losers_bracket: bool) -> String {
  if !has_losers_bracket {
    return "No toilet bowl bracket.".to_string();
  }
  let teams = total_teams.saturating_sub(playoff_teams);
  if teams > 4 {
    format!("{teams}-team toilet bowl bracket. Bottom 2 teams get first-round byes.")
  } else {
    format!("{teams}-team toilet bowl bracket for non-playoff teams.")
  }
}
