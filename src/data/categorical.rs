use serde::{Deserialize, Serialize};

/// Fixed ordinal encoding for one categorical column. Levels are listed
/// worst to best; level `i` encodes as `i + 1` and anything unlisted as `0`.
#[derive(Debug, PartialEq, Eq)]
pub struct OrdinalTable {
    pub name: &'static str,
    pub levels: &'static [&'static str],
}

/// Code given to values missing from a table.
pub const UNKNOWN_CODE: f64 = 0.0;

pub static CUT: OrdinalTable = OrdinalTable {
    name: "cut",
    levels: &["Fair", "Good", "Very Good", "Premium", "Ideal"],
};

pub static COLOR: OrdinalTable = OrdinalTable {
    name: "color",
    levels: &["J", "I", "H", "G", "F", "E", "D"],
};

pub static CLARITY: OrdinalTable = OrdinalTable {
    name: "clarity",
    levels: &["I1", "SI2", "SI1", "VS2", "VS1", "VVS2", "VVS1", "IF"],
};

impl OrdinalTable {
    pub fn code(&self, value: &str) -> f64 {
        let value = value.trim();
        self.levels
            .iter()
            .position(|&level| level == value)
            .map_or(UNKNOWN_CODE, |i| (i + 1) as f64)
    }
}

/// Names a built-in table so column schemas can be written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Cut,
    Color,
    Clarity,
}

impl Grade {
    pub fn table(&self) -> &'static OrdinalTable {
        match self {
            Grade::Cut => &CUT,
            Grade::Color => &COLOR,
            Grade::Clarity => &CLARITY,
        }
    }
}
