//! Team-based match rules.

use std::collections::HashMap;

use arena_core::{ArenaState, CharacterId, Element, MatchRules};
use tracing::info;

/// Standard team rules: no friendly fire unless enabled, timed respawns
/// unless disabled, simple kill/death tallies for the scoreboard.
pub struct TeamRules {
    friendly_fire: bool,
    instant_respawn: bool,
    kills: HashMap<CharacterId, u32>,
    deaths: HashMap<CharacterId, u32>,
}

impl TeamRules {
    pub fn new(friendly_fire: bool, instant_respawn: bool) -> Self {
        Self {
            friendly_fire,
            instant_respawn,
            kills: HashMap::new(),
            deaths: HashMap::new(),
        }
    }

    pub fn kills(&self, id: CharacterId) -> u32 {
        self.kills.get(&id).copied().unwrap_or(0)
    }

    pub fn deaths(&self, id: CharacterId) -> u32 {
        self.deaths.get(&id).copied().unwrap_or(0)
    }
}

impl Default for TeamRules {
    fn default() -> Self {
        Self::new(false, true)
    }
}

impl MatchRules for TeamRules {
    fn can_deal_damage(
        &self,
        state: &ArenaState,
        instigator: Option<CharacterId>,
        target: CharacterId,
    ) -> bool {
        if self.friendly_fire {
            return true;
        }
        // Environmental damage carries no instigator and always lands.
        let Some(instigator) = instigator else {
            return true;
        };
        if instigator == target {
            return false;
        }
        match (state.character(instigator), state.character(target)) {
            (Some(a), Some(b)) => a.team() != b.team(),
            // The instigator may have left between cast and resolution.
            _ => true,
        }
    }

    fn on_killed(&mut self, killer: Option<CharacterId>, victim: CharacterId, element: Element) {
        if let Some(killer) = killer {
            *self.kills.entry(killer).or_default() += 1;
        }
        *self.deaths.entry(victim).or_default() += 1;
        info!(target: "arena::rules", ?killer, %victim, ?element, "kill recorded");
    }

    fn can_respawn_instantly(&self, _victim: CharacterId) -> bool {
        self.instant_respawn
    }
}
