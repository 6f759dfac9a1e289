//! Engine configuration: reward amounts and the level curve.
//!
//! Serialized to/from TOML by the embedding layer; every field has a default
//! so a partial or absent file still yields a working engine.

use serde::{Deserialize, Serialize};

/// Reward amounts and display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Points needed per level; `level = points / xp_per_level + 1`.
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u64,
    #[serde(default = "default_section_points")]
    pub section_points: u64,
    #[serde(default = "default_cta_points")]
    pub cta_points: u64,
    #[serde(default = "default_form_points")]
    pub form_points: u64,
    /// One-time bonus for completing all three quest steps.
    #[serde(default = "default_quest_bonus")]
    pub quest_bonus_points: u64,
    /// Display name reported while no account is active.
    #[serde(default = "default_guest_label")]
    pub guest_label: String,
}

// Default functions
fn default_xp_per_level() -> u64 {
    100
}
fn default_section_points() -> u64 {
    5
}
fn default_cta_points() -> u64 {
    10
}
fn default_form_points() -> u64 {
    25
}
fn default_quest_bonus() -> u64 {
    20
}
fn default_guest_label() -> String {
    "Guest".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            xp_per_level: default_xp_per_level(),
            section_points: default_section_points(),
            cta_points: default_cta_points(),
            form_points: default_form_points(),
            quest_bonus_points: default_quest_bonus(),
            guest_label: default_guest_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site_rewards() {
        let config = EngineConfig::default();
        assert_eq!(config.xp_per_level, 100);
        assert_eq!(config.section_points, 5);
        assert_eq!(config.cta_points, 10);
        assert_eq!(config.form_points, 25);
        assert_eq!(config.quest_bonus_points, 20);
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"cta_points": 15}"#).unwrap();
        assert_eq!(config.cta_points, 15);
        assert_eq!(config.xp_per_level, 100);
        assert_eq!(config.guest_label, "Guest");
    }
}
