use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt};

// ── Constants ──────────────────────────────────────────────────────────

pub const BYE_LABEL: &str = "BYE";
pub const PLACEHOLDER_LABEL: &str = "TBD";
pub const AVATAR_THUMB_URL: &str = "https://sleepercdn.com/avatars/thumbs";

/// Placement tags that mark a bracket match as a consolation game.
pub const PLACEMENT_TAGS: [u32; 4] = [3, 5, 8, 10];

pub type RosterId = u32;

// ── Bracket side ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketSide {
    Winners,
    Losers,
}

impl BracketSide {
    pub fn as_str(self) -> &'static str {
        match self {
            BracketSide::Winners => "winners",
            BracketSide::Losers => "losers",
        }
    }
}

impl fmt::Display for BracketSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Upstream league snapshot ───────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueUser {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub fpts: f64,
    pub fpts_decimal: Option<f64>,
    pub fpts_against: Option<f64>,
    pub fpts_against_decimal: Option<f64>,
    pub division: Option<u32>,
}

impl RosterSettings {
    /// Season points as reported by the roster record (decimal part is in hundredths).
    pub fn points_for(&self) -> f64 {
        self.fpts + self.fpts_decimal.unwrap_or(0.0) / 100.0
    }

    pub fn points_against(&self) -> f64 {
        self.fpts_against.unwrap_or(0.0) + self.fpts_against_decimal.unwrap_or(0.0) / 100.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueRoster {
    pub roster_id: RosterId,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub settings: RosterSettings,
}

/// One team's raw score line for a single week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub roster_id: RosterId,
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLeagueSettings {
    pub start_week: Option<u32>,
    pub playoff_week_start: Option<u32>,
    pub playoff_teams: Option<u32>,
    pub num_teams: Option<u32>,
    pub divisions: Option<u32>,
    pub playoff_type: Option<u32>,
    pub playoff_round_type: Option<u32>,
    pub last_scored_leg: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub league_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub loser_bracket_id: Option<Value>,
    #[serde(default)]
    pub settings: Option<RawLeagueSettings>,
}

/// Reference to another match's outcome, as the upstream bracket encodes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketFrom {
    pub w: Option<u32>,
    pub l: Option<u32>,
    pub m: Option<u32>,
    pub r: Option<u32>,
}

impl BracketFrom {
    pub fn winner_of(match_id: u32) -> Self {
        BracketFrom { w: Some(match_id), ..BracketFrom::default() }
    }

    pub fn loser_of(match_id: u32) -> Self {
        BracketFrom { l: Some(match_id), ..BracketFrom::default() }
    }
}

/// A `t1`/`t2` value: either a team key or an inline reference object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Team(RosterId),
    From(BracketFrom),
}

/// One node of the sparse upstream bracket definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub m: u32,
    pub r: u32,
    #[serde(default)]
    pub t1: Option<SlotValue>,
    #[serde(default)]
    pub t2: Option<SlotValue>,
    #[serde(default)]
    pub t1_from: Option<BracketFrom>,
    #[serde(default)]
    pub t2_from: Option<BracketFrom>,
    #[serde(default)]
    pub w: Option<RosterId>,
    #[serde(default)]
    pub l: Option<RosterId>,
    #[serde(default)]
    pub p: Option<u32>,
}

impl BracketMatch {
    /// The placement tag, when it is one of the recognised consolation ranks.
    pub fn placement_tag(&self) -> Option<u32> {
        self.p.filter(|p| PLACEMENT_TAGS.contains(p))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSnapshot {
    pub league: League,
    #[serde(default)]
    pub users: Vec<LeagueUser>,
    #[serde(default)]
    pub rosters: Vec<LeagueRoster>,
    #[serde(default)]
    pub matchups: BTreeMap<u32, Vec<ScoreRecord>>,
    #[serde(default, alias = "winners_bracket")]
    pub winners_bracket: Vec<BracketMatch>,
    #[serde(default, alias = "losers_bracket")]
    pub losers_bracket: Vec<BracketMatch>,
    #[serde(default, alias = "last_scored_week")]
    pub last_scored_week: u32,
}

// ── Bracket views ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketTeamView {
    pub roster_id: Option<RosterId>,
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bye_label: Option<String>,
    pub is_bye: bool,
    pub is_placeholder: bool,
    pub score: Option<f64>,
    pub is_winner: bool,
}

/// A weekly pairing whose points were credited to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPairing {
    pub week: u32,
    pub matchup_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketGameView {
    pub id: String,
    pub round: u32,
    pub week_start: u32,
    pub weeks: Vec<u32>,
    pub matchup_id: Option<u32>,
    /// One entry per leg that found a scored pairing.
    pub matched_pairings: Vec<MatchedPairing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<u32>,
    pub team1: BracketTeamView,
    pub team2: BracketTeamView,
    pub winner_roster_id: Option<RosterId>,
    pub loser_roster_id: Option<RosterId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketRoundView {
    pub round: u32,
    pub title: String,
    pub week_label: String,
    pub games: Vec<BracketGameView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostseasonBrackets {
    pub winners_rounds: Vec<BracketRoundView>,
    pub losers_rounds: Vec<BracketRoundView>,
    pub winners_placements: Vec<BracketGameView>,
    pub losers_placements: Vec<BracketGameView>,
}

/// What the runner writes out: the brackets plus league context for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketReport {
    pub league_name: String,
    pub season: String,
    pub playoff_description: String,
    pub losers_bracket_description: String,
    pub brackets: PostseasonBrackets,
}
