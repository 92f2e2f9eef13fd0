use std::collections::HashMap;

use crate::types::{LeagueSnapshot, LeagueUser, RosterId, AVATAR_THUMB_URL};

/// Display identity for one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamIdentity {
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// TeamDirectory answers "who is roster N" from the snapshot's users and rosters.
/// Lookups never fail; unknown rosters get a generated `Team N` identity.
#[derive(Debug, Default, Clone)]
pub struct TeamDirectory {
    /// Users indexed by their upstream user id
    users: HashMap<String, LeagueUser>,
    /// Owning user id per roster
    owners: HashMap<RosterId, String>,
}

impl TeamDirectory {
    pub fn from_snapshot(snapshot: &LeagueSnapshot) -> Self {
        let users = snapshot
            .users
            .iter()
            .map(|user| (user.user_id.clone(), user.clone()))
            .collect();
        let owners = snapshot
            .rosters
            .iter()
            .filter_map(|roster| {
                roster
                    .owner_id
                    .as_ref()
                    .filter(|owner| !owner.is_empty())
                    .map(|owner| (roster.roster_id, owner.clone()))
            })
            .collect();
        TeamDirectory { users, owners }
    }

    pub fn user_for(&self, roster_id: RosterId) -> Option<&LeagueUser> {
        self.owners
            .get(&roster_id)
            .and_then(|owner| self.users.get(owner))
    }

    pub fn identity(&self, roster_id: RosterId) -> TeamIdentity {
        let fallback = format!("Team {roster_id}");
        if !self.owners.contains_key(&roster_id) {
            return TeamIdentity {
                name: fallback.clone(),
                username: fallback,
                avatar_url: None,
            };
        }

        let user = self.user_for(roster_id);
        let username = user
            .and_then(|u| non_empty(u.username.as_deref()).or_else(|| non_empty(u.display_name.as_deref())))
            .unwrap_or(fallback);
        let display = user
            .and_then(|u| non_empty(u.display_name.as_deref()))
            .unwrap_or_else(|| username.clone());
        TeamIdentity {
            name: custom_team_name(user, &display),
            username,
            avatar_url: avatar_url(user),
        }
    }
}

/// Custom team name from user metadata, then display name, then the fallback.
pub fn custom_team_name(user: Option<&LeagueUser>, fallback: &str) -> String {
    let Some(user) = user else {
        return fallback.to_string();
    };
    user.metadata
        .as_ref()
        .and_then(|meta| non_empty(meta.team_name.as_deref()))
        .or_else(|| non_empty(user.display_name.as_deref()))
        .unwrap_or_else(|| fallback.to_string())
}

/// Metadata avatar (already a full URL) wins over the avatar id.
pub fn avatar_url(user: Option<&LeagueUser>) -> Option<String> {
    let user = user?;
    if let Some(url) = user.metadata.as_ref().and_then(|meta| non_empty(meta.avatar.as_deref())) {
        return Some(url);
    }
    non_empty(user.avatar.as_deref()).map(|id| format!("{AVATAR_THUMB_URL}/{id}"))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}
