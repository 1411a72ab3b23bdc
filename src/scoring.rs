//! Rule-based conversion scoring and buyer segmentation.
//!
//! Both functions are pure: the same profile always yields the same
//! `(score, segment)` pair and no input can make them fail. Unknown values for
//! any enumerated attribute simply match no rule.

use crate::models::{BuyerSegment, LeadProfile, LeadScore, LeadStatus};

const BASE_SCORE: f64 = 0.5;
const CONVERTED_SCORE: f64 = 1.0;
const REJECTED_PENALTY: f64 = 0.4;
const REJECTED_FLOOR: f64 = 0.1;

const FLEXIBLE_BUDGET_RANGE: f64 = 200_000.0;
const HIGH_BUDGET: f64 = 500_000.0;
const LUXURY_BUDGET: f64 = 750_000.0;
const LOW_BUDGET: f64 = 300_000.0;

const PER_INTERACTION: f64 = 0.02;
const MAX_INTERACTION_BONUS: f64 = 0.10;

/// Effect of the pipeline status on the running score.
///
/// Matched once per lead. `Converted` is terminal: whatever the other rules
/// add, the final score is pinned to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StatusAdjustment {
    Bonus(f64),
    RejectionPenalty,
    Converted,
}

impl StatusAdjustment {
    fn for_status(status: &LeadStatus) -> Self {
        match status {
            LeadStatus::Hot => StatusAdjustment::Bonus(0.3),
            LeadStatus::SiteVisit => StatusAdjustment::Bonus(0.2),
            LeadStatus::Contacted => StatusAdjustment::Bonus(0.1),
            LeadStatus::Converted => StatusAdjustment::Converted,
            LeadStatus::Rejected => StatusAdjustment::RejectionPenalty,
            LeadStatus::New | LeadStatus::Other(_) => StatusAdjustment::Bonus(0.0),
        }
    }

    fn apply(self, score: f64) -> f64 {
        match self {
            StatusAdjustment::Bonus(delta) => score + delta,
            StatusAdjustment::RejectionPenalty => (score - REJECTED_PENALTY).max(REJECTED_FLOOR),
            StatusAdjustment::Converted => CONVERTED_SCORE,
        }
    }
}

fn income_bonus(income_bracket: &str) -> f64 {
    match income_bracket {
        "$100,000+" => 0.15,
        "$75,000-$100,000" => 0.10,
        "$50,000-$75,000" => 0.05,
        _ => 0.0,
    }
}

fn budget_bonus(budget_min: f64, budget_max: f64) -> f64 {
    let mut bonus = 0.0;
    if budget_max - budget_min > FLEXIBLE_BUDGET_RANGE {
        bonus += 0.10;
    }
    if budget_max > HIGH_BUDGET {
        bonus += 0.05;
    }
    bonus
}

fn education_bonus(education_level: &str) -> f64 {
    match education_level {
        "MBA" | "Master's Degree" => 0.08,
        "Bachelor's Degree" => 0.05,
        _ => 0.0,
    }
}

/// Number of comma-separated segments in the history. An empty history is
/// still one segment.
pub fn interaction_count(interaction_history: &str) -> usize {
    interaction_history.split(',').count()
}

fn interaction_bonus(interaction_history: &str) -> f64 {
    (interaction_count(interaction_history) as f64 * PER_INTERACTION).min(MAX_INTERACTION_BONUS)
}

fn investor_bonus(profile: &LeadProfile) -> f64 {
    if profile.property_type == "Investment"
        && profile.occupation.to_lowercase().contains("investor")
    {
        0.10
    } else {
        0.0
    }
}

/// Rounds to the nearest hundredth.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Conversion likelihood in [0, 1], rounded to two decimals.
pub fn conversion_likelihood(profile: &LeadProfile) -> f64 {
    let status = StatusAdjustment::for_status(&profile.status);

    let mut score = status.apply(BASE_SCORE);
    score += income_bonus(&profile.income_bracket);
    score += budget_bonus(profile.budget_min, profile.budget_max);
    score += education_bonus(&profile.education_level);
    score += interaction_bonus(&profile.interaction_history);
    score += investor_bonus(profile);

    let score = match status {
        StatusAdjustment::Converted => CONVERTED_SCORE,
        _ => score.clamp(0.0, 1.0),
    };

    round_to_cents(score)
}

/// Buyer segment. First matching rule wins, in this order:
/// Investor, Luxury Buyer, Downsizer, Budget Conscious, Upgrader, First-time Buyer.
pub fn buyer_segment(profile: &LeadProfile) -> BuyerSegment {
    let age = profile.age_range.as_str();

    if profile.property_type == "Investment" {
        BuyerSegment::Investor
    } else if profile.budget_max > LUXURY_BUDGET {
        BuyerSegment::LuxuryBuyer
    } else if matches!(age, "55-64" | "65+") {
        BuyerSegment::Downsizer
    } else if profile.budget_max < LOW_BUDGET {
        BuyerSegment::BudgetConscious
    } else if profile.family_size > 2 && matches!(age, "35-44" | "45-54") {
        BuyerSegment::Upgrader
    } else {
        BuyerSegment::FirstTimeBuyer
    }
}

/// Scores a lead profile.
pub fn score_lead(profile: &LeadProfile) -> LeadScore {
    let score = LeadScore {
        score: conversion_likelihood(profile),
        segment: buyer_segment(profile),
    };

    tracing::debug!(
        "Scored lead (campaign {}, status {}): {:.2} / {}",
        profile.campaign_id,
        profile.status,
        score.score,
        score.segment
    );

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_adjustments() {
        let hot = StatusAdjustment::for_status(&LeadStatus::Hot).apply(0.5);
        assert!((hot - 0.8).abs() < 1e-9);
        assert_eq!(StatusAdjustment::for_status(&LeadStatus::New).apply(0.5), 0.5);
        assert_eq!(
            StatusAdjustment::for_status(&LeadStatus::Other("Lost".into())).apply(0.5),
            0.5
        );
        assert_eq!(
            StatusAdjustment::for_status(&LeadStatus::Rejected).apply(0.5),
            REJECTED_FLOOR
        );
        assert_eq!(
            StatusAdjustment::for_status(&LeadStatus::Converted).apply(0.2),
            CONVERTED_SCORE
        );
    }

    #[test]
    fn test_budget_bonus_terms_stack() {
        assert_eq!(budget_bonus(100_000.0, 700_000.0), 0.10 + 0.05);
        assert_eq!(budget_bonus(450_000.0, 600_000.0), 0.05);
        assert_eq!(budget_bonus(0.0, 250_000.0), 0.10);
        assert_eq!(budget_bonus(300_000.0, 400_000.0), 0.0);
        // Exactly 200k range is not "flexible"
        assert_eq!(budget_bonus(300_000.0, 500_000.0), 0.0);
    }

    #[test]
    fn test_interaction_count() {
        assert_eq!(interaction_count(""), 1);
        assert_eq!(interaction_count("   "), 1);
        assert_eq!(interaction_count("called"), 1);
        assert_eq!(interaction_count(","), 2);
        assert_eq!(interaction_count("a,b,c"), 3);
        assert_eq!(interaction_count("a,,b"), 3);
    }

    #[test]
    fn test_blank_history_earns_one_interaction() {
        assert_eq!(interaction_bonus(""), PER_INTERACTION);
        assert_eq!(interaction_bonus("   "), PER_INTERACTION);
        assert!(interaction_bonus(",") > interaction_bonus(""));
    }

    #[test]
    fn test_interaction_bonus_saturates() {
        assert_eq!(interaction_bonus("a,b"), 0.04);
        assert_eq!(interaction_bonus("a,b,c,d,e"), MAX_INTERACTION_BONUS);
        assert_eq!(interaction_bonus("a,b,c,d,e,f,g,h"), MAX_INTERACTION_BONUS);
    }

    #[test]
    fn test_investor_bonus_is_case_insensitive() {
        let profile = LeadProfile {
            property_type: "Investment".to_string(),
            occupation: "Property INVESTOR".to_string(),
            ..Default::default()
        };
        assert_eq!(investor_bonus(&profile), 0.10);

        let profile = LeadProfile {
            property_type: "Condo".to_string(),
            occupation: "Investor".to_string(),
            ..Default::default()
        };
        assert_eq!(investor_bonus(&profile), 0.0);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(0.9400000000000001), 0.94);
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(0.0), 0.0);
    }
}
