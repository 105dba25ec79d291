//! Intake form value types: ranks, divisions, prior experience.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Youngest accepted age.
pub const MIN_AGE: u32 = 13;
/// Oldest accepted age.
pub const MAX_AGE: u32 = 100;

/// Ranked ladder, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankTier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Ascendant,
    Immortal,
    Radiant,
}

/// The only rank without divisions.
pub const TOP_TIER: RankTier = RankTier::Radiant;

/// Ranks below this cannot claim prior competitive experience.
pub const EXPERIENCE_ELIGIBILITY_THRESHOLD: RankTier = RankTier::Ascendant;

impl RankTier {
    pub const ALL: [RankTier; 9] = [
        RankTier::Iron,
        RankTier::Bronze,
        RankTier::Silver,
        RankTier::Gold,
        RankTier::Platinum,
        RankTier::Diamond,
        RankTier::Ascendant,
        RankTier::Immortal,
        RankTier::Radiant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iron => "Iron",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
            Self::Ascendant => "Ascendant",
            Self::Immortal => "Immortal",
            Self::Radiant => "Radiant",
        }
    }

    pub fn is_top(&self) -> bool {
        *self == TOP_TIER
    }

    /// Whether this rank requires a division pick.
    pub fn has_divisions(&self) -> bool {
        !self.is_top()
    }

    pub fn is_experience_eligible(&self) -> bool {
        *self >= EXPERIENCE_ELIGIBILITY_THRESHOLD
    }
}

impl std::fmt::Display for RankTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|rank| rank.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown rank: {wanted}"))
    }
}

/// Division within a rank (e.g. Gold 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Division {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
}

impl Division {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
        }
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "i" | "one" => Ok(Self::One),
            "2" | "ii" | "two" => Ok(Self::Two),
            "3" | "iii" | "three" => Ok(Self::Three),
            other => Err(format!("unknown division: {other}")),
        }
    }
}

/// Highest competitive tier the player has played in before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExperienceTier {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Tier 3")]
    Tier3,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 1")]
    Tier1,
}

impl ExperienceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Tier3 => "Tier 3",
            Self::Tier2 => "Tier 2",
            Self::Tier1 => "Tier 1",
        }
    }
}

impl std::fmt::Display for ExperienceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "none" => Ok(Self::None),
            "tier3" | "t3" => Ok(Self::Tier3),
            "tier2" | "t2" => Ok(Self::Tier2),
            "tier1" | "t1" => Ok(Self::Tier1),
            _ => Err(format!("unknown experience tier: {}", s.trim())),
        }
    }
}
