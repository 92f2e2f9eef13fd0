use std::{
  cmp::Reverse,
  collections::{BTreeMap, BTreeSet, BinaryHeap, HashSet},
};

use tracing::warn;

use crate::{
  error::{BracketError, Result},
  types::{BracketFrom, BracketMatch, BracketSide, RosterId, SlotValue},
};

/// Where a bracket slot gets its team from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotSource {
  Team(RosterId),
  Winner(u32),
  Loser(u32),
  /// No team and no reference
  Empty,
  /// A reference object that names no usable match
  Unknown,
}

impl SlotSource {
  pub fn from_slot(value: Option<&SlotValue>, from: Option<&BracketFrom>) -> Self {
    match value {
      Some(SlotValue::Team(id)) => SlotSource::Team(*id),
      Some(SlotValue::From(reference)) => reference_source(reference),
      None => from.map(reference_source).unwrap_or(SlotSource::Empty),
    }
  }

  pub fn referenced_match(self) -> Option<u32> {
    match self {
      SlotSource::Winner(id) | SlotSource::Loser(id) => Some(id),
      _ => None,
    }
  }
}

fn reference_source(from: &BracketFrom) -> SlotSource {
  if let Some(id) = from.w {
    return SlotSource::Winner(id);
  }
  if let Some(id) = from.l {
    return SlotSource::Loser(id);
  }
  // Legacy {m, r} form points at the winner.
  if let (Some(id), Some(_)) = (from.m, from.r) {
    return SlotSource::Winner(id);
  }
  SlotSource::Unknown
}

/// A resolved slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotOutcome {
  Team(RosterId),
  Bye,
  Unresolved,
}

impl SlotOutcome {
  pub fn team(self) -> Option<RosterId> {
    match self {
      SlotOutcome::Team(id) => Some(id),
      _ => None,
    }
  }
}

/// Computed outcome of one bracket match.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMatch {
  pub team1: SlotOutcome,
  pub team2: SlotOutcome,
  pub matchup_id: Option<u32>,
  /// `(week, matchup_id)` of every pairing credited to this match.
  pub matched: Vec<(u32, u32)>,
  pub team1_score: Option<f64>,
  pub team2_score: Option<f64>,
  pub winner: Option<RosterId>,
  pub loser: Option<RosterId>,
}

/// Matches resolved so far in one pass over a bracket side.
#[derive(Clone, Debug, Default)]
pub struct ResolvedTable {
  matches: BTreeMap<u32, ResolvedMatch>,
}

impl ResolvedTable {
  pub fn resolve(&self, source: SlotSource) -> SlotOutcome {
    match source {
      SlotSource::Team(id) => SlotOutcome::Team(id),
      SlotSource::Empty => SlotOutcome::Bye,
      SlotSource::Unknown => SlotOutcome::Unresolved,
      SlotSource::Winner(match_id) => self
        .matches
        .get(&match_id)
        .and_then(|resolved| resolved.winner)
        .map(SlotOutcome::Team)
        .unwrap_or(SlotOutcome::Unresolved),
      SlotSource::Loser(match_id) => self
        .matches
        .get(&match_id)
        .and_then(|resolved| resolved.loser)
        .map(SlotOutcome::Team)
        .unwrap_or(SlotOutcome::Unresolved),
    }
  }

  pub fn insert(&mut self, match_id: u32, resolved: ResolvedMatch) {
    self.matches.insert(match_id, resolved);
  }

  pub fn get(&self, match_id: u32) -> Option<&ResolvedMatch> {
    self.matches.get(&match_id)
  }
}

/// Drop repeated match ids, keeping the first definition.
pub fn unique_matches(side: BracketSide, bracket: &[BracketMatch]) -> Vec<&BracketMatch> {
  let mut seen = HashSet::new();
  bracket
    .iter()
    .filter(|item| {
      let fresh = seen.insert(item.m);
      if !fresh {
        warn!("{side} bracket repeats match {}; keeping the first definition", item.m);
      }
      fresh
    })
    .collect()
}

/// Processing order for `matches` (indices into the slice).
///
/// Every match comes after the matches its slots reference. Among matches
/// that are ready at the same time, lower (round, match id) goes first, so a
/// well-formed bracket is processed in plain (round, match id) order.
pub fn processing_order(side: BracketSide, matches: &[&BracketMatch]) -> Result<Vec<usize>> {
  let position: BTreeMap<u32, usize> = matches
    .iter()
    .enumerate()
    .map(|(idx, item)| (item.m, idx))
    .collect();

  let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); matches.len()];
  let mut pending: Vec<usize> = vec![0; matches.len()];
  for (idx, item) in matches.iter().enumerate() {
    let mut upstream = BTreeSet::new();
    for source in slot_sources(item) {
      let Some(referenced) = source.referenced_match() else {
        continue;
      };
      match position.get(&referenced) {
        Some(&dep) => {
          upstream.insert(dep);
        }
        None => warn!(
          "{side} bracket match {} references missing match {referenced}; slot stays unresolved",
          item.m
        ),
      }
    }
    pending[idx] = upstream.len();
    for dep in upstream {
      dependents[dep].push(idx);
    }
  }

  let mut ready: BinaryHeap<Reverse<(u32, u32, usize)>> = matches
    .iter()
    .enumerate()
    .filter(|(idx, _)| pending[*idx] == 0)
    .map(|(idx, item)| Reverse((item.r, item.m, idx)))
    .collect();
  let mut order = Vec::with_capacity(matches.len());
  while let Some(Reverse((_, _, idx))) = ready.pop() {
    order.push(idx);
    for &next in &dependents[idx] {
      pending[next] -= 1;
      if pending[next] == 0 {
        let item = matches[next];
        ready.push(Reverse((item.r, item.m, next)));
      }
    }
  }

  if order.len() < matches.len() {
    let mut stuck: Vec<u32> = matches
      .iter()
      .enumerate()
      .filter(|(idx, _)| pending[*idx] > 0)
      .map(|(_, item)| item.m)
      .collect();
    stuck.sort_unstable();
    return Err(BracketError::CyclicReference { side, matches: stuck });
  }
  Ok(order)
}

pub fn slot_sources(item: &BracketMatch) -> [SlotSource; 2] {
  [
    SlotSource::from_slot(item.t1.as_ref(), item.t1_from.as_ref()),
    SlotSource::from_slot(item.t2.as_ref(), item.t2_from.as_ref()),
  ]
}
