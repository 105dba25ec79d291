//! The fixed milestone progression shown by the stepper.

use serde::Serialize;

/// One named stage of the career journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub title: String,
    pub blurb: String,
}

impl Milestone {
    pub fn new(title: impl Into<String>, blurb: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blurb: blurb.into(),
        }
    }
}

/// Ordered, non-empty, immutable list of milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneSequence {
    stages: Vec<Milestone>,
}

impl MilestoneSequence {
    /// Build a sequence. Returns `None` for an empty list.
    pub fn new(stages: Vec<Milestone>) -> Option<Self> {
        if stages.is_empty() {
            None
        } else {
            Some(Self { stages })
        }
    }

    /// The path from ranked play to the world stage.
    pub fn career_path() -> Self {
        Self {
            stages: vec![
                Milestone::new("Ranked Play", "Grind the ladder and get noticed."),
                Milestone::new("Tier 3", "Premier and college circuits."),
                Milestone::new("Tier 2", "Challengers: one step from the big stage."),
                Milestone::new("Tier 1", "Partnered VCT league play."),
                Milestone::new("Masters", "International LAN against the best."),
                Milestone::new("Champions", "Lift the trophy."),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.stages.len() - 1
    }

    /// Milestone at `index`, clamped to the last stage.
    pub fn at(&self, index: usize) -> &Milestone {
        &self.stages[index.min(self.last_index())]
    }
}

impl Default for MilestoneSequence {
    fn default() -> Self {
        Self::career_path()
    }
}
