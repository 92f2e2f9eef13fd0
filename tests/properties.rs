use std::collections::{BTreeMap, BTreeSet, HashSet};

use postseason_brackets::{
    build_postseason_brackets,
    types::{BracketFrom, BracketGameView, BracketMatch, LeagueSnapshot, LeagueRoster, ScoreRecord, SlotValue},
    LeagueSettings, PostseasonBrackets,
};
use proptest::prelude::*;

/// One week of play: the eight teams in random pairs with random points.
fn week_strategy() -> impl Strategy<Value = Vec<ScoreRecord>> {
    (
        Just((1..=8u32).collect::<Vec<_>>()).prop_shuffle(),
        prop::collection::vec(60u32..140, 8),
    )
        .prop_map(|(order, points)| {
            order
                .iter()
                .enumerate()
                .map(|(idx, roster_id)| ScoreRecord {
                    roster_id: *roster_id,
                    matchup_id: Some(idx as u32 / 2 + 1),
                    points: points[idx] as f64,
                })
                .collect()
        })
}

fn team(m: u32, r: u32, t1: u32, t2: u32) -> BracketMatch {
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

fn make_snapshot(weeks: Vec<Vec<ScoreRecord>>, forced_winner: Option<bool>) -> LeagueSnapshot {
    let mut matchups = BTreeMap::new();
    for (offset, records) in weeks.into_iter().enumerate() {
        matchups.insert(15 + offset as u32, records);
    }
    let mut opener = team(1, 1, 1, 4);
    opener.w = forced_winner.map(|first| if first { 1 } else { 4 });
    LeagueSnapshot {
        rosters: (1..=8).map(|roster_id| LeagueRoster { roster_id, ..LeagueRoster::default() }).collect(),
        matchups,
        winners_bracket: vec![
            opener,
            team(2, 1, 2, 3),
            fed(3, 2, BracketFrom::winner_of(1), BracketFrom::winner_of(2)),
        ],
        losers_bracket: vec![
            team(1, 1, 5, 8),
            team(2, 1, 6, 7),
            fed(3, 2, BracketFrom::loser_of(1), BracketFrom::loser_of(2)),
        ],
        last_scored_week: 16,
        ..LeagueSnapshot::default()
    }
}

fn settings_with_legs(legs: u32) -> LeagueSettings {
    LeagueSettings { legs_per_round: legs, ..LeagueSettings::default() }
}

/// Rosters that scored under `matchup_id` in `week`.
fn pairing_rosters(snapshot: &LeagueSnapshot, week: u32, matchup_id: u32) -> BTreeSet<u32> {
    snapshot
        .matchups
        .get(&week)
        .into_iter()
        .flatten()
        .filter(|record| record.matchup_id == Some(matchup_id))
        .map(|record| record.roster_id)
        .collect()
}

fn all_games(brackets: &PostseasonBrackets) -> Vec<&BracketGameView> {
    brackets
        .winners_rounds
        .iter()
        .chain(brackets.losers_rounds.iter())
        .flat_map(|round| round.games.iter())
        .chain(brackets.winners_placements.iter())
        .chain(brackets.losers_placements.iter())
        .collect()
}

proptest! {
    #[test]
    fn prop_identical_input_gives_identical_output(
        weeks in prop::collection::vec(week_strategy(), 2),
        forced in prop::option::of(any::<bool>()),
    ) {
        let snapshot = make_snapshot(weeks, forced);
        let settings = LeagueSettings::default();
        let first = build_postseason_brackets(&snapshot, &settings).unwrap();
        let second = build_postseason_brackets(&snapshot, &settings).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_no_pairing_is_credited_twice(
        legs in 1u32..=2,
        weeks in prop::collection::vec(week_strategy(), 4),
        forced in prop::option::of(any::<bool>()),
    ) {
        let snapshot = make_snapshot(weeks, forced);
        let brackets = build_postseason_brackets(&snapshot, &settings_with_legs(legs)).unwrap();

        let mut seen = HashSet::new();
        for game in all_games(&brackets) {
            prop_assert!(game.matched_pairings.len() <= game.weeks.len());
            prop_assert_eq!(game.matchup_id, game.matched_pairings.last().map(|pairing| pairing.matchup_id));
            for pairing in &game.matched_pairings {
                prop_assert!(game.weeks.contains(&pairing.week));
                prop_assert!(
                    seen.insert((pairing.week, pairing.matchup_id)),
                    "pairing {} in week {} credited to more than one game",
                    pairing.matchup_id,
                    pairing.week
                );
                let teams: BTreeSet<u32> = [game.team1.roster_id, game.team2.roster_id].into_iter().flatten().collect();
                prop_assert_eq!(pairing_rosters(&snapshot, pairing.week, pairing.matchup_id), teams);
            }
        }
    }

    #[test]
    fn prop_final_slots_follow_round_one_winners(
        weeks in prop::collection::vec(week_strategy(), 2),
        forced in prop::option::of(any::<bool>()),
    ) {
        let snapshot = make_snapshot(weeks, forced);
        let brackets = build_postseason_brackets(&snapshot, &LeagueSettings::default()).unwrap();

        let round1 = &brackets.winners_rounds[0].games;
        let final_game = &brackets.winners_rounds[1].games[0];
        prop_assert_eq!(final_game.team1.roster_id, round1[0].winner_roster_id);
        prop_assert_eq!(final_game.team2.roster_id, round1[1].winner_roster_id);

        let losers_round1 = &brackets.losers_rounds[0].games;
        let losers_final = &brackets.losers_rounds[1].games[0];
        prop_assert_eq!(losers_final.team1.roster_id, losers_round1[0].loser_roster_id);
        prop_assert_eq!(losers_final.team2.roster_id, losers_round1[1].loser_roster_id);
    }

    #[test]
    fn prop_scored_games_carry_a_strict_winner(
        weeks in prop::collection::vec(week_strategy(), 2),
    ) {
        let snapshot = make_snapshot(weeks, None);
        let brackets = build_postseason_brackets(&snapshot, &LeagueSettings::default()).unwrap();

        for game in all_games(&brackets) {
            if let (Some(a), Some(b)) = (game.team1.score, game.team2.score) {
                let expected = if a > b {
                    game.team1.roster_id
                } else if b > a {
                    game.team2.roster_id
                } else {
                    None
                };
                prop_assert_eq!(game.winner_roster_id, expected);
            }
        }
    }
}
