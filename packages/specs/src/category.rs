// ABOUTME: Component category tag
// ABOUTME: Closed set of categories that carry a specification schema

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentCategory {
    Cpu,
    Gpu,
    Mainboard,
    Ram,
    Storage,
    Psu,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 6] = [
        ComponentCategory::Cpu,
        ComponentCategory::Gpu,
        ComponentCategory::Mainboard,
        ComponentCategory::Ram,
        ComponentCategory::Storage,
        ComponentCategory::Psu,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentCategory::Cpu => "CPU",
            ComponentCategory::Gpu => "GPU",
            ComponentCategory::Mainboard => "MAINBOARD",
            ComponentCategory::Ram => "RAM",
            ComponentCategory::Storage => "STORAGE",
            ComponentCategory::Psu => "PSU",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a tag outside the known category set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for ComponentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_uppercase();
        ComponentCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == tag)
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}
