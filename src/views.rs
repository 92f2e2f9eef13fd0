use crate::{
    identity::TeamDirectory,
    resolver::{ResolvedMatch, SlotOutcome},
    standings::SeedMap,
    types::{BracketGameView, BracketTeamView, MatchedPairing, RosterId, BYE_LABEL, PLACEHOLDER_LABEL},
};

/// Lookups needed to decorate resolved games for display.
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub directory: &'a TeamDirectory,
    pub seeds: &'a SeedMap,
}

/// Where a game sits in the bracket, independent of who played it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameFrame {
    pub id: String,
    pub round: u32,
    pub week_start: u32,
    pub weeks: Vec<u32>,
    pub label: Option<String>,
    pub placement: Option<u32>,
}

impl<'a> ViewContext<'a> {
    pub fn team_view(
        &self,
        slot: SlotOutcome,
        opponent: SlotOutcome,
        score: Option<f64>,
        display_winner: Option<RosterId>,
    ) -> BracketTeamView {
        match slot {
            SlotOutcome::Team(roster_id) => {
                let identity = self.directory.identity(roster_id);
                let bye_label = opponent.team().is_none().then(|| BYE_LABEL.to_string());
                BracketTeamView {
                    roster_id: Some(roster_id),
                    name: identity.name,
                    username: identity.username,
                    avatar_url: identity.avatar_url,
                    seed: self.seeds.seed(roster_id),
                    bye_label,
                    is_bye: false,
                    is_placeholder: false,
                    score,
                    is_winner: display_winner == Some(roster_id),
                }
            }
            // An empty slot facing a real team is a bye; with nobody on
            // either side the game is still waiting on upstream results.
            SlotOutcome::Bye | SlotOutcome::Unresolved if opponent.team().is_some() => {
                empty_view(BYE_LABEL, true)
            }
            SlotOutcome::Bye | SlotOutcome::Unresolved => empty_view(PLACEHOLDER_LABEL, false),
        }
    }

    pub fn game_view(
        &self,
        frame: GameFrame,
        resolved: &ResolvedMatch,
        display_winner: Option<RosterId>,
    ) -> BracketGameView {
        BracketGameView {
            id: frame.id,
            round: frame.round,
            week_start: frame.week_start,
            weeks: frame.weeks,
            matchup_id: resolved.matchup_id,
            matched_pairings: resolved
                .matched
                .iter()
                .map(|&(week, matchup_id)| MatchedPairing { week, matchup_id })
                .collect(),
            label: frame.label,
            placement: frame.placement,
            team1: self.team_view(resolved.team1, resolved.team2, resolved.team1_score, display_winner),
            team2: self.team_view(resolved.team2, resolved.team1, resolved.team2_score, display_winner),
            winner_roster_id: resolved.winner,
            loser_roster_id: resolved.loser,
        }
    }
}

fn empty_view(label: &str, is_bye: bool) -> BracketTeamView {
    BracketTeamView {
        roster_id: None,
        name: label.to_string(),
        username: String::new(),
        avatar_url: None,
        seed: None,
        bye_label: None,
        is_bye,
        is_placeholder: !is_bye,
        score: None,
        is_winner: false,
    }
}
