//! Output formatting helpers for CLI commands

use crate::gateway::GatewayStats;
use crate::player::PlayerStats;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Format the gateway stats view for humans: a summary block plus a
/// per-key table.
pub fn format_stats_table(stats: &GatewayStats) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}\n  total requests:     {}\n  errors:             {}\n  requests last hour: {}\n  avg response time:  {:.3}s\n",
        "Requests".bold(),
        stats.total_requests,
        if stats.error_count > 0 {
            stats.error_count.to_string().red().to_string()
        } else {
            stats.error_count.to_string().green().to_string()
        },
        stats.requests_last_hour,
        stats.avg_response_time,
    ));
    out.push_str(&format!(
        "{}\n  entries: {}\n  hits:    {}\n  misses:  {}\n  hit rate: {:.1}%\n",
        "Cache".bold(),
        stats.cache_size,
        stats.cache_hits,
        stats.cache_misses,
        stats.cache_hit_rate * 100.0,
    ));
    if let Some(last_error) = &stats.last_error {
        out.push_str(&format!("{} {}\n", "Last error:".bold(), last_error.red()));
    }
    out.push_str(&format!(
        "{} ({} configured)\n",
        "Keys".bold(),
        stats.api_keys
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Requests", "Errors", "Last used"]);

    for key in &stats.key_stats {
        let last_used = key
            .last_used
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        let errors = if key.errors > 0 {
            key.errors.to_string().red().to_string()
        } else {
            key.errors.to_string()
        };

        table.add_row(vec![
            Cell::new(&key.identifier),
            Cell::new(key.requests),
            Cell::new(errors),
            Cell::new(last_used),
        ]);
    }

    out.push_str(&table.to_string());
    out
}

/// Format the gateway stats view as JSON
pub fn format_stats_json(stats: &GatewayStats) -> String {
    serde_json::to_string_pretty(&json!({ "stats": stats })).unwrap()
}

/// Format a merged player lookup for humans
pub fn format_player(player: &PlayerStats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        "Player:".bold(),
        player.nickname.as_deref().unwrap_or(&player.player_id)
    ));
    out.push_str(&format!("  player id: {}\n", player.player_id));
    match player.faceit_elo {
        Some(elo) => out.push_str(&format!("  elo:       {}\n", elo.to_string().cyan())),
        None => out.push_str(&format!("  elo:       {}\n", "unrated".dimmed())),
    }

    if player.cs2_stats.is_empty() {
        out.push_str("  lifetime stats: unavailable\n");
    } else {
        out.push_str("  lifetime stats:\n");
        for (name, value) in &player.cs2_stats {
            out.push_str(&format!("    {}: {}\n", name, value));
        }
    }
    out
}

/// Format a merged player lookup as JSON
pub fn format_player_json(player: &PlayerStats) -> String {
    serde_json::to_string_pretty(player).unwrap()
}
