//! Tier decision table for the `aspmig tiers` command.

use aspmig_domain::resolve_tier;
use aspmig_types::tier::TierDecision;

/// One row of the decision table.
#[derive(Debug, Clone)]
pub struct TierRule {
    /// Human-readable condition.
    pub condition: &'static str,
    pub has_environment: bool,
    pub environment_kind: Option<&'static str>,
    pub premium_v3_available: bool,
    pub note: &'static str,
}

impl TierRule {
    /// The decision the resolver makes for this row.
    pub fn decision(&self) -> TierDecision {
        resolve_tier(
            self.has_environment,
            self.environment_kind,
            self.premium_v3_available,
        )
    }
}

/// Rows in evaluation order.
pub static TIER_RULES: &[TierRule] = &[
    TierRule {
        condition: "App Service Environment of kind ASEV2",
        has_environment: true,
        environment_kind: Some("ASEV2"),
        premium_v3_available: false,
        note: "Kind is compared case-insensitively.",
    },
    TierRule {
        condition: "App Service Environment of any other kind",
        has_environment: true,
        environment_kind: Some("ASEV3"),
        premium_v3_available: false,
        note: "An environment that reports no kind is treated the same way, with a warning.",
    },
    TierRule {
        condition: "No environment, region offers PremiumV3",
        has_environment: false,
        environment_kind: None,
        premium_v3_available: true,
        note: "Region names are compared lowercase with whitespace removed.",
    },
    TierRule {
        condition: "No environment, PremiumV3 unavailable or probe failed",
        has_environment: false,
        environment_kind: None,
        premium_v3_available: false,
        note: "A failed availability probe is logged as a warning; the run continues.",
    },
];
