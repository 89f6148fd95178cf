//! Angler loadout: rod, bait, tackle and the player stats the minigame reads
//!
//! Serialized as JSON so a host can hand a loadout to the headless runner.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Rod family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RodKind {
    /// Beginner rod: wider bar at low levels, gentler penalty, basic quality only
    Training,
    #[default]
    Bamboo,
    Fiberglass,
    Iridium,
}

impl RodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RodKind::Training => "Training",
            RodKind::Bamboo => "Bamboo",
            RodKind::Fiberglass => "Fiberglass",
            RodKind::Iridium => "Iridium",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "training" | "beginner" => Some(RodKind::Training),
            "bamboo" => Some(RodKind::Bamboo),
            "fiberglass" => Some(RodKind::Fiberglass),
            "iridium" => Some(RodKind::Iridium),
            _ => None,
        }
    }

    pub fn is_beginner(&self) -> bool {
        *self == RodKind::Training
    }
}

/// Tackle that changes the minigame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tackle {
    /// Pulls the bar toward the fish while it is in the bar
    BarbedHook,
    /// Kills the bounce off the floor rail
    LeadBobber,
    /// Treasure does not slip away as fast; progress holds while on the treasure
    TreasureHunter,
    /// Progress drains slower on a miss
    TrapBobber,
    /// Wider bar
    CorkBobber,
    /// One quality tier better
    QualityBobber,
}

impl Tackle {
    pub fn id(&self) -> &'static str {
        match self {
            Tackle::BarbedHook => "(O)691",
            Tackle::LeadBobber => "(O)692",
            Tackle::TreasureHunter => "(O)693",
            Tackle::TrapBobber => "(O)694",
            Tackle::CorkBobber => "(O)695",
            Tackle::QualityBobber => "(O)877",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "(O)691" => Some(Tackle::BarbedHook),
            "(O)692" => Some(Tackle::LeadBobber),
            "(O)693" => Some(Tackle::TreasureHunter),
            "(O)694" => Some(Tackle::TrapBobber),
            "(O)695" => Some(Tackle::CorkBobber),
            "(O)877" => Some(Tackle::QualityBobber),
            _ => None,
        }
    }
}

/// Bait that changes the minigame outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Bait {
    #[default]
    None,
    /// Other baits: no minigame effect
    Plain,
    /// Chance of a double catch
    Wild,
    /// Up to three fish, one lost every time the fish slips out
    Challenge,
}

impl Bait {
    pub fn from_id(id: &str) -> Self {
        match id {
            "" => Bait::None,
            "(O)774" => Bait::Wild,
            "(O)ChallengeBait" => Bait::Challenge,
            _ => Bait::Plain,
        }
    }
}

/// Everything the angler brings to one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loadout {
    pub rod: RodKind,
    /// Fishing skill level (0-10, buffs may push it higher)
    pub fishing_level: i32,
    /// Daily luck, roughly -0.1..0.1
    #[serde(default)]
    pub luck: f32,
    /// Whether the player has ever caught a fish (no penalty before the first)
    #[serde(default = "default_true")]
    pub has_caught_before: bool,
    /// Bait item id, empty for none
    #[serde(default)]
    pub bait: String,
    /// Tackle item ids, repeats stack
    #[serde(default)]
    pub tackle: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            rod: RodKind::Bamboo,
            fishing_level: 0,
            luck: 0.0,
            has_caught_before: true,
            bait: String::new(),
            tackle: Vec::new(),
        }
    }
}

impl Loadout {
    /// Resolve tackle ids, failing on the first unknown one
    pub fn resolve_tackle(&self) -> Result<Vec<Tackle>, ConfigError> {
        self.tackle
            .iter()
            .map(|id| Tackle::from_id(id).ok_or_else(|| ConfigError::UnknownTackle { id: id.clone() }))
            .collect()
    }

    pub fn bait_kind(&self) -> Bait {
        Bait::from_id(&self.bait)
    }

    /// Bar height for this loadout
    pub fn bar_height(&self) -> Result<i32, ConfigError> {
        let level = self.fishing_level.max(0);
        let mut height = BASE_BAR_HEIGHT + level * BAR_HEIGHT_PER_LEVEL;
        if self.rod.is_beginner() && level < TRAINING_ROD_LEVEL_CAP {
            height += TRAINING_ROD_BONUS - level * BAR_HEIGHT_PER_LEVEL;
        }
        let corks = count(&self.resolve_tackle()?, Tackle::CorkBobber) as i32;
        Ok(height + corks * CORK_BAR_BONUS)
    }
}

/// Number of stacks of one tackle kind
pub fn count(tackle: &[Tackle], kind: Tackle) -> u32 {
    tackle.iter().filter(|t| **t == kind).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_height_by_level() {
        let mut loadout = Loadout::default();
        assert_eq!(loadout.bar_height().unwrap(), 96);
        loadout.fishing_level = 10;
        assert_eq!(loadout.bar_height().unwrap(), 176);
    }

    #[test]
    fn test_training_rod_bonus_fades_at_level_five() {
        let mut loadout = Loadout {
            rod: RodKind::Training,
            ..Default::default()
        };
        assert_eq!(loadout.bar_height().unwrap(), 136);
        loadout.fishing_level = 3;
        assert_eq!(loadout.bar_height().unwrap(), 136);
        loadout.fishing_level = 5;
        assert_eq!(loadout.bar_height().unwrap(), 136);
        loadout.fishing_level = 6;
        assert_eq!(loadout.bar_height().unwrap(), 144);
    }

    #[test]
    fn test_cork_bobbers_stack() {
        let loadout = Loadout {
            tackle: vec!["(O)695".into(), "(O)695".into()],
            ..Default::default()
        };
        assert_eq!(loadout.bar_height().unwrap(), 96 + 48);
    }

    #[test]
    fn test_unknown_tackle_rejected() {
        let loadout = Loadout {
            tackle: vec!["(O)691".into(), "(O)9999".into()],
            ..Default::default()
        };
        assert_eq!(
            loadout.resolve_tackle(),
            Err(ConfigError::UnknownTackle { id: "(O)9999".into() })
        );
    }

    #[test]
    fn test_bait_ids() {
        assert_eq!(Bait::from_id(""), Bait::None);
        assert_eq!(Bait::from_id("(O)774"), Bait::Wild);
        assert_eq!(Bait::from_id("(O)ChallengeBait"), Bait::Challenge);
        assert_eq!(Bait::from_id("(O)685"), Bait::Plain);
    }

    #[test]
    fn test_loadout_json_defaults() {
        let loadout: Loadout =
            serde_json::from_str(r#"{ "rod": "Iridium", "fishing_level": 8 }"#).unwrap();
        assert!(loadout.has_caught_before);
        assert!(loadout.tackle.is_empty());
        assert_eq!(RodKind::from_str("IRIDIUM"), Some(loadout.rod));
    }
}
