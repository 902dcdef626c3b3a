//! Merged player lookup result.
//!
//! The upstream returns a loose profile object plus a separate lifetime
//! stats document. This module assembles the two into one typed value
//! with the optional pieces made explicit, so "not found" and "found but
//! incomplete" stay distinguishable.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Merged view of a player: profile fields plus the normalized elo and
/// the lifetime stats sub-object.
///
/// `player_id` is always present - a profile without one never produces a
/// `PlayerStats` at all. `faceit_elo` is absent when the player has no
/// rated games; `cs2_stats` is empty when the secondary stats call failed
/// or returned nothing. Remaining raw profile fields (country, avatar,
/// the `games` section, ...) are kept as-is in the flattened map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faceit_elo: Option<i64>,
    #[serde(default)]
    pub cs2_stats: Map<String, Value>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// Assemble the merged result from the two upstream documents.
///
/// Returns `None` when the profile carries no `player_id` - the upstream's
/// "not found" signal, a negative result rather than an error.
pub fn merge_player_stats(profile: Value, lifetime_stats: Option<Value>) -> Option<PlayerStats> {
    let mut profile = match profile {
        Value::Object(map) => map,
        _ => return None,
    };

    let player_id = profile
        .get("player_id")
        .and_then(Value::as_str)?
        .to_string();
    profile.remove("player_id");

    let faceit_elo = extract_elo(&profile);
    let nickname = match profile.remove("nickname") {
        Some(Value::String(s)) => Some(s),
        _ => None,
    };

    let cs2_stats = lifetime_stats
        .and_then(|stats| stats.get("lifetime").cloned())
        .and_then(|lifetime| match lifetime {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();

    Some(PlayerStats {
        player_id,
        nickname,
        faceit_elo,
        cs2_stats,
        profile,
    })
}

/// Pull the elo rating out of the per-game profile section.
///
/// The current game section wins; the legacy section is consulted only
/// when the current one is absent entirely.
fn extract_elo(profile: &Map<String, Value>) -> Option<i64> {
    let games = profile.get("games")?;
    if let Some(cs2) = games.get("cs2") {
        cs2.get("faceit_elo").and_then(Value::as_i64)
    } else if let Some(csgo) = games.get("csgo") {
        csgo.get("faceit_elo").and_then(Value::as_i64)
    } else {
        None
    }
}
