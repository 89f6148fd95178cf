//! Fish data registry
//!
//! Fish are stored as classic slash-delimited records keyed by id:
//!
//! ```text
//! "136": "Largemouth Bass/50/mixed/11/30/600 1900/spring summer/both/685 .35/3/.4/.2/0"
//! ```
//!
//! Only the first five fields (name, difficulty, motion, min size, max size)
//! matter to the minigame; the rest are ignored. Records carry no legendary
//! marker, so boss fish are recognised by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::MotionType;

/// Ids of the legendary fish, including their second-generation variants
pub const LEGENDARY_FISH: &[&str] = &[
    "159", "160", "163", "682", "775", "898", "899", "900", "901", "902",
];

/// Minigame-relevant data for one fish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishData {
    pub id: String,
    pub name: String,
    /// Resistance, 0-100
    pub difficulty: f32,
    pub motion: MotionType,
    pub min_size: i32,
    pub max_size: i32,
    /// Legendary fish
    #[serde(default)]
    pub boss: bool,
}

impl FishData {
    /// Parse a slash-delimited fish record
    pub fn parse(id: &str, raw: &str) -> Result<Self, ConfigError> {
        let malformed = |reason: String| ConfigError::MalformedFish {
            id: id.to_string(),
            reason,
        };

        let fields: Vec<&str> = raw.split('/').collect();
        if fields.len() < 5 {
            return Err(malformed(format!("expected at least 5 fields, got {}", fields.len())));
        }

        let name = fields[0].trim();
        if name.is_empty() {
            return Err(malformed("empty name".into()));
        }
        let difficulty: f32 = fields[1]
            .trim()
            .parse()
            .map_err(|_| malformed(format!("bad difficulty '{}'", fields[1])))?;
        let motion = MotionType::from_str(fields[2])
            .ok_or_else(|| malformed(format!("unknown motion type '{}'", fields[2])))?;
        let min_size: i32 = fields[3]
            .trim()
            .parse()
            .map_err(|_| malformed(format!("bad min size '{}'", fields[3])))?;
        let max_size: i32 = fields[4]
            .trim()
            .parse()
            .map_err(|_| malformed(format!("bad max size '{}'", fields[4])))?;

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            difficulty,
            motion,
            min_size,
            max_size,
            boss: LEGENDARY_FISH.iter().any(|legendary| *legendary == id),
        })
    }
}

/// Lookup table from fish id to fish data
#[derive(Debug, Clone, Default)]
pub struct FishRegistry {
    fish: BTreeMap<String, FishData>,
}

impl FishRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON object of `id -> record`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for (id, record) in &raw {
            registry.insert(FishData::parse(id, record)?);
        }
        log::debug!("Loaded {} fish", registry.len());
        Ok(registry)
    }

    /// A handful of well-known fish, one per motion type
    pub fn sample() -> Self {
        let mut registry = Self::new();
        for (id, record) in SAMPLE_FISH {
            if let Ok(fish) = FishData::parse(id, record) {
                registry.insert(fish);
            }
        }
        registry
    }

    pub fn insert(&mut self, fish: FishData) {
        self.fish.insert(fish.id.clone(), fish);
    }

    /// Resolve a fish id
    pub fn get(&self, id: &str) -> Result<&FishData, ConfigError> {
        self.fish.get(id).ok_or_else(|| ConfigError::UnknownFish { id: id.to_string() })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fish.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }
}

const SAMPLE_FISH: &[(&str, &str)] = &[
    ("128", "Pufferfish/80/floater/1/37"),
    ("131", "Sardine/30/dart/1/13"),
    ("136", "Largemouth Bass/50/mixed/11/30"),
    ("143", "Catfish/75/mixed/12/73"),
    ("145", "Sunfish/30/mixed/5/16"),
    ("149", "Octopus/95/sinker/12/49"),
    ("151", "Squid/75/sinker/12/49"),
    ("154", "Sea Cucumber/40/sinker/3/21"),
    ("699", "Tiger Trout/60/dart/10/21"),
    ("702", "Chub/35/dart/12/25"),
    ("706", "Shad/45/smooth/20/49"),
    ("159", "Crimsonfish/95/mixed/20/21"),
    ("160", "Angler/85/smooth/18/19"),
];
