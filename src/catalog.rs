//! Static game data: level titles, difficulty ranges, legendary numbers, the
//! skill tree and the background themes. Everything here is immutable and
//! shared by the engine and the web adapter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseIdError;

// -----------------------------------------------------------------------------
// Levels
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRequirement {
    pub xp: u32,
    pub title: &'static str,
}

/// Ascending xp thresholds; index + 1 is the level.
pub const LEVELS: &[LevelRequirement] = &[
    LevelRequirement { xp: 0, title: "Number Novice" },
    LevelRequirement { xp: 100, title: "Math Apprentice" },
    LevelRequirement { xp: 300, title: "Numerical Scholar" },
    LevelRequirement { xp: 600, title: "Cosmic Explorer" },
    LevelRequirement { xp: 1000, title: "Math Mystic" },
    LevelRequirement { xp: 1500, title: "Number Sage" },
    LevelRequirement { xp: 2100, title: "Mathematical Master" },
    LevelRequirement { xp: 2800, title: "Cosmic Numerologist" },
    LevelRequirement { xp: 3600, title: "Infinity Walker" },
    LevelRequirement { xp: 4500, title: "Number Deity" },
];

/// Highest level whose threshold `xp` has reached.
pub fn level_for_xp(xp: u32) -> u32 {
    LEVELS.iter().take_while(|req| xp >= req.xp).count().max(1) as u32
}

/// Requirement for a 1-based level, clamped to the table.
pub fn level_requirement(level: u32) -> &'static LevelRequirement {
    let idx = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
    &LEVELS[idx]
}

// -----------------------------------------------------------------------------
// Difficulty
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyId {
    Novice,
    #[default]
    Explorer,
    Master,
    Cosmic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    pub min: u32,
    pub max: u32,
    pub xp_multiplier: f64,
}

impl DifficultyId {
    pub const ALL: [DifficultyId; 4] = [Self::Novice, Self::Explorer, Self::Master, Self::Cosmic];

    pub fn settings(self) -> DifficultySettings {
        match self {
            Self::Novice => DifficultySettings { min: 1, max: 50, xp_multiplier: 0.8 },
            Self::Explorer => DifficultySettings { min: 1, max: 100, xp_multiplier: 1.0 },
            Self::Master => DifficultySettings { min: 1, max: 200, xp_multiplier: 1.3 },
            Self::Cosmic => DifficultySettings { min: 1, max: 500, xp_multiplier: 1.7 },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Novice => "novice",
            Self::Explorer => "explorer",
            Self::Master => "master",
            Self::Cosmic => "cosmic",
        }
    }
}

impl FromStr for DifficultyId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseIdError::new("difficulty", s))
    }
}

impl fmt::Display for DifficultyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// Legendary numbers
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialNumber {
    pub value: u32,
    pub name: &'static str,
    pub description: &'static str,
}

pub const SPECIAL_NUMBERS: &[SpecialNumber] = &[
    SpecialNumber {
        value: 7,
        name: "Lucky Seven",
        description: "Considered lucky across cultures and mathematics",
    },
    SpecialNumber {
        value: 42,
        name: "Answer to Everything",
        description: "The answer to life, the universe, and everything",
    },
    SpecialNumber {
        value: 137,
        name: "Fine Structure",
        description: "Fine-structure constant approximation",
    },
    SpecialNumber {
        value: 1729,
        name: "Taxicab Number",
        description: "Smallest number expressible as sum of two cubes in two different ways",
    },
    SpecialNumber {
        value: 6174,
        name: "Kaprekar's Constant",
        description: "Magic constant in Kaprekar's routine",
    },
    SpecialNumber {
        value: 8128,
        name: "Perfect Number",
        description: "Fourth perfect number in mathematics",
    },
];

pub fn special_number(n: u32) -> Option<&'static SpecialNumber> {
    SPECIAL_NUMBERS.iter().find(|s| s.value == n)
}

// -----------------------------------------------------------------------------
// Skills
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillId {
    RangeBoost,
    PrimeVision,
    TimeWarp,
    CosmicInsight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
    pub id: SkillId,
    pub name: &'static str,
    pub cost: u32,
    pub description: &'static str,
    pub effect: &'static str,
}

pub const SKILLS: &[Skill] = &[
    Skill {
        id: SkillId::RangeBoost,
        name: "Range Sense",
        cost: 5,
        description: "Get more accurate range hints",
        effect: "range_accuracy",
    },
    Skill {
        id: SkillId::PrimeVision,
        name: "Prime Vision",
        cost: 10,
        description: "Identify prime numbers in hints",
        effect: "prime_detection",
    },
    Skill {
        id: SkillId::TimeWarp,
        name: "Time Warp",
        cost: 15,
        description: "Slow down cosmic energy depletion",
        effect: "power_conservation",
    },
    Skill {
        id: SkillId::CosmicInsight,
        name: "Cosmic Insight",
        cost: 20,
        description: "Receive deeper mathematical insights",
        effect: "enhanced_hints",
    },
];

impl SkillId {
    pub fn skill(self) -> &'static Skill {
        // SKILLS lists every variant in declaration order.
        &SKILLS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RangeBoost => "range-boost",
            Self::PrimeVision => "prime-vision",
            Self::TimeWarp => "time-warp",
            Self::CosmicInsight => "cosmic-insight",
        }
    }
}

impl FromStr for SkillId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SKILLS
            .iter()
            .map(|skill| skill.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseIdError::new("skill", s))
    }
}

// -----------------------------------------------------------------------------
// Themes
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Galaxy,
    Nebula,
    Sunset,
    Forest,
    Ocean,
    Lava,
}

impl ThemeId {
    pub const ALL: [ThemeId; 6] = [
        Self::Galaxy,
        Self::Nebula,
        Self::Sunset,
        Self::Forest,
        Self::Ocean,
        Self::Lava,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Galaxy => "galaxy",
            Self::Nebula => "nebula",
            Self::Sunset => "sunset",
            Self::Forest => "forest",
            Self::Ocean => "ocean",
            Self::Lava => "lava",
        }
    }
}

impl FromStr for ThemeId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseIdError::new("theme", s))
    }
}
