//! Action recommendations derived from a set of scored leads.

use crate::models::{BuyerSegment, Lead, LeadStatus};

/// Leads scoring above this are considered high value.
pub const HIGH_VALUE_THRESHOLD: f64 = 0.7;

/// Hot leads only warrant an escalation once there are more than this many.
const HOT_LEAD_ESCALATION: usize = 2;

fn count_where(leads: &[Lead], predicate: impl Fn(&Lead) -> bool) -> usize {
    leads.iter().filter(|lead| predicate(lead)).count()
}

/// Builds up to five recommendations, in fixed rule order.
///
/// Reads the persisted score and segment of each lead; never re-scores and
/// never mutates its input. An empty slice yields no recommendations.
pub fn generate_recommendations(leads: &[Lead]) -> Vec<String> {
    let mut recommendations = Vec::new();

    let high_value = count_where(leads, |l| {
        l.predicted_conversion_likelihood > HIGH_VALUE_THRESHOLD
    });
    if high_value > 0 {
        recommendations.push(format!(
            "Focus on {} high-value leads with 70%+ conversion probability",
            high_value
        ));
    }

    let hot = count_where(leads, |l| l.profile.status == LeadStatus::Hot);
    if hot > HOT_LEAD_ESCALATION {
        recommendations.push(format!("Immediate follow-up needed for {} hot leads", hot));
    }

    let site_visit = count_where(leads, |l| l.profile.status == LeadStatus::SiteVisit);
    if site_visit > 0 {
        recommendations.push(format!(
            "Schedule follow-up calls with {} leads who visited the site",
            site_visit
        ));
    }

    // Strictly more than 30% of all leads, compared in integers
    let budget_conscious = count_where(leads, |l| {
        l.buyer_segment == BuyerSegment::BudgetConscious
    });
    if budget_conscious * 10 > leads.len() * 3 {
        recommendations
            .push("Consider offering financing incentives for budget-conscious segment".to_string());
    }

    let luxury = count_where(leads, |l| l.buyer_segment == BuyerSegment::LuxuryBuyer);
    if luxury > 0 {
        recommendations.push(format!(
            "Highlight premium features and amenities for {} luxury buyers",
            luxury
        ));
    }

    tracing::debug!(
        "Generated {} recommendations from {} leads",
        recommendations.len(),
        leads.len()
    );

    recommendations
}
