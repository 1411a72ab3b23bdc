//! Campaign analytics built on top of scored leads.
//!
//! Everything here is a fold over the persisted score and segment of each
//! lead; nothing is re-scored.

use crate::models::{BuyerSegment, Campaign, Lead, LeadStatus};
use crate::recommendations::{generate_recommendations, HIGH_VALUE_THRESHOLD};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline counts for a set of leads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStats {
    pub total_leads: usize,
    /// Mean conversion likelihood, two decimals. Zero when there are no leads.
    pub avg_conversion_score: f64,
    pub high_value_leads: usize,
    pub hot_leads: usize,
}

/// Revenue projections weighted by conversion likelihood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predictions {
    /// Sum of every lead's `budget_max`.
    pub total_potential_value: f64,
    /// Sum of `budget_max × score`, rounded to whole currency units.
    pub predicted_revenue: f64,
    /// Projected return on the campaign budget, whole percent.
    pub roi: f64,
}

/// Conversion counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionStats {
    pub total_conversions: usize,
    /// Percentage of leads converted, one decimal.
    pub conversion_rate: f64,
}

/// Share of leads in one buyer segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentShare {
    pub segment: BuyerSegment,
    pub count: usize,
    /// Whole percent of all leads.
    pub percentage: f64,
}

/// Demand for one property type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyPreference {
    pub property_type: String,
    pub count: usize,
    /// Mean budget midpoint, whole currency units.
    pub avg_budget: f64,
}

/// Leads and conversions within one age bracket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroup {
    pub age_range: String,
    pub count: usize,
    /// Whole percent of the bracket converted.
    pub conversion_rate: f64,
}

/// Full analytics report for a campaign (or all campaigns).
#[derive(Debug, Clone, Serialize)]
pub struct CampaignInsights {
    /// Campaign name, when the report is scoped to a known campaign.
    pub campaign: Option<String>,
    pub basic_stats: BasicStats,
    pub predictions: Predictions,
    pub conversions: ConversionStats,
    pub segments: Vec<SegmentShare>,
    pub property_preferences: Vec<PropertyPreference>,
    pub age_groups: Vec<AgeGroup>,
    pub ml_recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Rounds half up, so that -2.5 becomes -2 rather than -3.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

pub fn basic_stats(leads: &[Lead]) -> BasicStats {
    let avg_conversion_score = if leads.is_empty() {
        0.0
    } else {
        let total: f64 = leads.iter().map(|l| l.predicted_conversion_likelihood).sum();
        round_to(total / leads.len() as f64, 2)
    };

    BasicStats {
        total_leads: leads.len(),
        avg_conversion_score,
        high_value_leads: leads
            .iter()
            .filter(|l| l.predicted_conversion_likelihood > HIGH_VALUE_THRESHOLD)
            .count(),
        hot_leads: leads
            .iter()
            .filter(|l| l.profile.status == LeadStatus::Hot)
            .count(),
    }
}

/// Revenue projections. ROI is only meaningful against a campaign with a
/// positive budget and is zero otherwise.
pub fn predictions(campaign: Option<&Campaign>, leads: &[Lead]) -> Predictions {
    let total_potential_value: f64 = leads.iter().map(|l| l.profile.budget_max).sum();
    let weighted_revenue: f64 = leads
        .iter()
        .map(|l| l.profile.budget_max * l.predicted_conversion_likelihood)
        .sum();

    let roi = match campaign {
        Some(c) if c.budget > 0.0 => round_half_up((weighted_revenue - c.budget) / c.budget * 100.0),
        _ => 0.0,
    };

    Predictions {
        total_potential_value,
        predicted_revenue: round_half_up(weighted_revenue),
        roi,
    }
}

pub fn conversion_stats(leads: &[Lead]) -> ConversionStats {
    let total_conversions = leads
        .iter()
        .filter(|l| l.profile.status == LeadStatus::Converted)
        .count();

    ConversionStats {
        total_conversions,
        conversion_rate: round_to(percent(total_conversions, leads.len()), 1),
    }
}

/// Segments present among `leads`, in segmentation priority order.
pub fn segment_distribution(leads: &[Lead]) -> Vec<SegmentShare> {
    BuyerSegment::ALL
        .iter()
        .filter_map(|&segment| {
            let count = leads.iter().filter(|l| l.buyer_segment == segment).count();
            (count > 0).then(|| SegmentShare {
                segment,
                count,
                percentage: round_half_up(percent(count, leads.len())),
            })
        })
        .collect()
}

/// Property types sought, sorted by name.
pub fn property_preferences(leads: &[Lead]) -> Vec<PropertyPreference> {
    let mut by_type: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for lead in leads {
        let entry = by_type.entry(lead.profile.property_type.as_str()).or_default();
        entry.0 += 1;
        entry.1 += (lead.profile.budget_min + lead.profile.budget_max) / 2.0;
    }

    by_type
        .into_iter()
        .map(|(property_type, (count, total_budget))| PropertyPreference {
            property_type: property_type.to_string(),
            count,
            avg_budget: round_half_up(total_budget / count as f64),
        })
        .collect()
}

/// Age brackets, sorted by label.
pub fn age_groups(leads: &[Lead]) -> Vec<AgeGroup> {
    let mut by_age: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for lead in leads {
        let entry = by_age.entry(lead.profile.age_range.as_str()).or_default();
        entry.0 += 1;
        if lead.profile.status == LeadStatus::Converted {
            entry.1 += 1;
        }
    }

    by_age
        .into_iter()
        .map(|(age_range, (count, conversions))| AgeGroup {
            age_range: age_range.to_string(),
            count,
            conversion_rate: round_half_up(percent(conversions, count)),
        })
        .collect()
}

/// Builds the full report for `leads`.
///
/// # Arguments
///
/// * `campaign` - The campaign the leads belong to, if the report is scoped to one.
/// * `leads` - Scored leads.
pub fn campaign_insights(campaign: Option<&Campaign>, leads: &[Lead]) -> CampaignInsights {
    CampaignInsights {
        campaign: campaign.map(|c| c.name.clone()),
        basic_stats: basic_stats(leads),
        predictions: predictions(campaign, leads),
        conversions: conversion_stats(leads),
        segments: segment_distribution(leads),
        property_preferences: property_preferences(leads),
        age_groups: age_groups(leads),
        ml_recommendations: generate_recommendations(leads),
        generated_at: Utc::now(),
    }
}
