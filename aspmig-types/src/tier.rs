use serde::{Deserialize, Serialize};
use std::fmt;

/// App Service pricing tier family used for every plan in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    PremiumV2,
    PremiumV3,
    Isolated,
    IsolatedV2,
}

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::PremiumV2,
        Tier::PremiumV3,
        Tier::Isolated,
        Tier::IsolatedV2,
    ];

    /// Name as Azure spells it in SKU and plan payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::PremiumV2 => "PremiumV2",
            Tier::PremiumV3 => "PremiumV3",
            Tier::Isolated => "Isolated",
            Tier::IsolatedV2 => "IsolatedV2",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier plus the number of sites each plan of that tier may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDecision {
    pub tier: Tier,
    pub sites_per_plan: usize,
}

impl TierDecision {
    pub const fn new(tier: Tier, sites_per_plan: usize) -> Self {
        Self {
            tier,
            sites_per_plan,
        }
    }
}

impl fmt::Display for TierDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} sites per plan)", self.tier, self.sites_per_plan)
    }
}
