use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tech {
    ImprovedDrivetrain,
    ImprovedMining,
    SuperiorDrivetrain,
    SuperiorMining,
    OverdriveDrivetrain,
    OverdriveMining,
}

impl Tech {
    /// Earliest tier first, drivetrain before mining within a tier.
    pub const PURCHASE_ORDER: [Tech; 6] = [
        Tech::ImprovedDrivetrain,
        Tech::ImprovedMining,
        Tech::SuperiorDrivetrain,
        Tech::SuperiorMining,
        Tech::OverdriveDrivetrain,
        Tech::OverdriveMining,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tech::ImprovedDrivetrain => "Improved Drivetrain",
            Tech::ImprovedMining => "Improved Mining",
            Tech::SuperiorDrivetrain => "Superior Drivetrain",
            Tech::SuperiorMining => "Superior Mining",
            Tech::OverdriveDrivetrain => "Overdrive Drivetrain",
            Tech::OverdriveMining => "Overdrive Mining",
        }
    }

    pub fn is_drivetrain(&self) -> bool {
        matches!(
            self,
            Tech::ImprovedDrivetrain | Tech::SuperiorDrivetrain | Tech::OverdriveDrivetrain
        )
    }
}

impl fmt::Display for Tech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Research state as exposed by the game engine.
pub trait TechCatalog {
    /// Cost in science points, `None` if the engine does not know the tech.
    fn cost(&self, tech: Tech) -> Option<u32>;

    fn is_researched(&self, tech: Tech) -> bool;
}

/// In-memory catalog used by the local simulation and tests.
#[derive(Debug, Clone)]
pub struct TechTree {
    costs: HashMap<Tech, u32>,
    researched: HashSet<Tech>,
}

impl TechTree {
    pub fn new(costs: impl IntoIterator<Item = (Tech, u32)>) -> Self {
        Self {
            costs: costs.into_iter().collect(),
            researched: HashSet::new(),
        }
    }

    pub fn research(&mut self, tech: Tech) -> bool {
        self.researched.insert(tech)
    }

    pub fn researched(&self) -> impl Iterator<Item = &Tech> {
        self.researched.iter()
    }
}

impl Default for TechTree {
    fn default() -> Self {
        Self::new([
            (Tech::ImprovedDrivetrain, 10),
            (Tech::ImprovedMining, 10),
            (Tech::SuperiorDrivetrain, 25),
            (Tech::SuperiorMining, 25),
            (Tech::OverdriveDrivetrain, 50),
            (Tech::OverdriveMining, 50),
        ])
    }
}

impl TechCatalog for TechTree {
    fn cost(&self, tech: Tech) -> Option<u32> {
        self.costs.get(&tech).copied()
    }

    fn is_researched(&self, tech: Tech) -> bool {
        self.researched.contains(&tech)
    }
}
