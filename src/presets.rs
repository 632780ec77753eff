use std::collections::HashMap;

use log::error;
use metrohash::MetroBuildHasher;

use crate::{Error, Population, Result};

const BLOCK: &[[u8; 4]] = &[[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]];

const BOAT: &[[u8; 5]] = &[
    [0, 0, 0, 0, 0],
    [0, 1, 1, 0, 0],
    [0, 1, 0, 1, 0],
    [0, 0, 1, 0, 0],
    [0, 0, 0, 0, 0],
];

const BEEHIVE: &[[u8; 6]] = &[
    [0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 0, 0],
    [0, 1, 0, 0, 1, 0],
    [0, 0, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0],
];

const LOAF: &[[u8; 6]] = &[
    [0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 0, 0],
    [0, 1, 0, 0, 1, 0],
    [0, 0, 1, 0, 1, 0],
    [0, 0, 0, 1, 0, 0],
    [0, 0, 0, 0, 0, 0],
];

const BLINKER: &[[u8; 5]] = &[
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 1, 1, 1, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
];

const TOAD: &[[u8; 6]] = &[
    [0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 1, 0],
    [0, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0],
];

const BEACON: &[[u8; 6]] = &[
    [0, 0, 0, 0, 0, 0],
    [0, 1, 1, 0, 0, 0],
    [0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0],
    [0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0],
];

const PENTADECATHLON: &[[u8; 11]] = &[
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const GLIDER: &[[u8; 5]] = &[
    [0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0],
    [0, 0, 0, 1, 0],
    [0, 1, 1, 1, 0],
    [0, 0, 0, 0, 0],
];

/// Named starting populations, looked up case-insensitively.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: HashMap<String, (String, Population), MetroBuildHasher>,
}

impl PresetCatalog {
    pub fn empty() -> Self {
        Self {
            presets: HashMap::default(),
        }
    }

    pub fn insert(&mut self, name: &str, population: Population) {
        self.presets
            .insert(name.to_lowercase(), (name.to_string(), population));
    }

    pub fn get(&self, name: &str) -> Result<Population> {
        self.presets
            .get(&name.trim().to_lowercase())
            .map(|(_, population)| population.clone())
            .ok_or_else(|| Error::UnknownPreset(name.to_string()))
    }

    /// Display names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.values().map(|(name, _)| name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

fn builtins() -> [(&'static str, Result<Population>); 9] {
    [
        ("Block", Population::from_rows(BLOCK)),
        ("Boat", Population::from_rows(BOAT)),
        ("Beehive", Population::from_rows(BEEHIVE)),
        ("Loaf", Population::from_rows(LOAF)),
        ("Blinker", Population::from_rows(BLINKER)),
        ("Toad", Population::from_rows(TOAD)),
        ("Beacon", Population::from_rows(BEACON)),
        ("Pentadecathlon", Population::from_rows(PENTADECATHLON)),
        ("Glider", Population::from_rows(GLIDER)),
    ]
}

impl Default for PresetCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        for (name, population) in builtins() {
            // the tables are const arrays, so this only fires if one is edited to be empty
            match population {
                Ok(population) => catalog.insert(name, population),
                Err(err) => error!("built-in preset `{name}` is malformed: {err}"),
            }
        }
        catalog
    }
}
