use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// One-shot modifier that negates an out when used ("Free Refill").
pub const COFFEE_RALLY: &str = "COFFEE_RALLY";
/// Modifier granting partial run credit on stolen bases.
pub const BLASERUNNING: &str = "BLASERUNNING";

/// Display slot a player occupies in a snapshot.
///
/// Each slot shows at most one modifier: the first one from its priority list
/// that the player currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModSlot {
    /// The `{side}PitcherMod` field.
    Pitcher,
    /// The `{side}BatterMod` field.
    Batter,
    /// An entry of `baseRunnerMods`.
    Runner,
}

impl ModSlot {
    /// Modifiers shown in this slot, highest priority first.
    pub fn priority(self) -> &'static [&'static str] {
        match self {
            ModSlot::Pitcher | ModSlot::Batter => &[COFFEE_RALLY],
            ModSlot::Runner => &[BLASERUNNING, COFFEE_RALLY],
        }
    }
}

/// A player as of some point in time.
///
/// Replaced wholesale on substitutions; the only in-place change is removing a
/// consumed modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// The player's identifier.
    pub id: PlayerId,
    /// Display name, as it appears in narration.
    pub name: String,
    /// Active modifiers.
    #[serde(default)]
    pub mods: BTreeSet<String>,
    /// Name of the held legacy item, if any.
    #[serde(default)]
    pub legacy_item: Option<String>,
}

impl PlayerState {
    /// Create a player with no modifiers and no item.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            mods: BTreeSet::new(),
            legacy_item: None,
        }
    }

    /// Add a modifier.
    pub fn with_mod(mut self, modifier: impl Into<String>) -> Self {
        self.mods.insert(modifier.into());
        self
    }

    /// Give the player a legacy item.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.legacy_item = Some(item.into());
        self
    }

    /// Whether the player currently holds a modifier.
    pub fn has_mod(&self, modifier: &str) -> bool {
        self.mods.contains(modifier)
    }

    /// Remove a modifier, returning whether it was held.
    pub fn remove_mod(&mut self, modifier: &str) -> bool {
        self.mods.remove(modifier)
    }

    /// The modifier shown for this player in a display slot, or `""`.
    pub fn mod_summary(&self, slot: ModSlot) -> String {
        slot.priority()
            .iter()
            .find(|m| self.has_mod(m))
            .map(|m| (*m).to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_slot_prefers_blaserunning() {
        let player = PlayerState::new(PlayerId::new(), "Jaylen Hotdogfingers")
            .with_mod(COFFEE_RALLY)
            .with_mod(BLASERUNNING);
        assert_eq!(player.mod_summary(ModSlot::Runner), BLASERUNNING);
        assert_eq!(player.mod_summary(ModSlot::Batter), COFFEE_RALLY);
    }

    #[test]
    fn summary_is_empty_without_displayed_mods() {
        let player = PlayerState::new(PlayerId::new(), "Nagomi Mcdaniel").with_mod("FIREPROOF");
        assert_eq!(player.mod_summary(ModSlot::Pitcher), "");
    }

    #[test]
    fn remove_mod_reports_presence() {
        let mut player = PlayerState::new(PlayerId::new(), "Wyatt Mason").with_mod(COFFEE_RALLY);
        assert!(player.remove_mod(COFFEE_RALLY));
        assert!(!player.remove_mod(COFFEE_RALLY));
        assert_eq!(player.mod_summary(ModSlot::Batter), "");
    }
}
