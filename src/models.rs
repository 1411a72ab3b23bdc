use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Treats an explicit JSON `null` the same as a missing field.
///
/// Stored lead rows and client payloads both carry `null` for numeric and text
/// attributes that were never filled in; scoring needs those as zero / empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============ Enumerations ============

/// Pipeline state of a lead.
///
/// Values outside the known pipeline are kept verbatim in `Other` so that
/// records round-trip unchanged; they receive no status adjustment when scored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    SiteVisit,
    Hot,
    Converted,
    Rejected,
    /// Any status string the pipeline does not recognise.
    Other(String),
}

impl LeadStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::SiteVisit => "Site Visit",
            LeadStatus::Hot => "Hot",
            LeadStatus::Converted => "Converted",
            LeadStatus::Rejected => "Rejected",
            LeadStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for LeadStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "New" => LeadStatus::New,
            "Contacted" => LeadStatus::Contacted,
            "Site Visit" => LeadStatus::SiteVisit,
            "Hot" => LeadStatus::Hot,
            "Converted" => LeadStatus::Converted,
            "Rejected" => LeadStatus::Rejected,
            _ => LeadStatus::Other(raw),
        }
    }
}

impl From<&str> for LeadStatus {
    fn from(raw: &str) -> Self {
        LeadStatus::from(raw.to_string())
    }
}

impl From<LeadStatus> for String {
    fn from(status: LeadStatus) -> Self {
        match status {
            LeadStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a lead dropped out of the pipeline. Only meaningful for `Rejected` leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    Price,
    Location,
    Layout,
    #[serde(rename = "Not Responsive")]
    NotResponsive,
}

/// Categorical purchasing profile assigned by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BuyerSegment {
    Investor,
    #[serde(rename = "Luxury Buyer")]
    LuxuryBuyer,
    Downsizer,
    #[serde(rename = "Budget Conscious")]
    BudgetConscious,
    Upgrader,
    #[default]
    #[serde(rename = "First-time Buyer")]
    FirstTimeBuyer,
}

impl BuyerSegment {
    /// Every segment, in segmentation priority order.
    pub const ALL: [BuyerSegment; 6] = [
        BuyerSegment::Investor,
        BuyerSegment::LuxuryBuyer,
        BuyerSegment::Downsizer,
        BuyerSegment::BudgetConscious,
        BuyerSegment::Upgrader,
        BuyerSegment::FirstTimeBuyer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuyerSegment::Investor => "Investor",
            BuyerSegment::LuxuryBuyer => "Luxury Buyer",
            BuyerSegment::Downsizer => "Downsizer",
            BuyerSegment::BudgetConscious => "Budget Conscious",
            BuyerSegment::Upgrader => "Upgrader",
            BuyerSegment::FirstTimeBuyer => "First-time Buyer",
        }
    }
}

impl fmt::Display for BuyerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a marketing campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Completed,
}

// ============ Lead Models ============

/// Every caller-supplied attribute of a lead.
///
/// This is the scorer's whole input. Derived values (score, segment) and
/// bookkeeping fields (id, timestamps) live on [`Lead`] and cannot be set
/// through this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadProfile {
    /// Campaign the lead was captured for.
    pub campaign_id: String,
    /// Marketing persona the lead was matched to, if any.
    #[serde(default)]
    pub persona_id: Option<String>,

    /// First name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    /// Last name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    /// Email address.
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Phone number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,

    /// Pipeline state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LeadStatus,
    /// Reason for rejection (status `Rejected` only).
    #[serde(default)]
    pub rejection_reason: Option<RejectionReason>,

    /// Age bracket (e.g. "25-34", "65+").
    #[serde(default, deserialize_with = "null_as_default")]
    pub age_range: String,
    /// Income bracket (e.g. "$100,000+").
    #[serde(default, deserialize_with = "null_as_default")]
    pub income_bracket: String,
    /// Number of people in the household.
    #[serde(default, deserialize_with = "null_as_default")]
    pub family_size: u32,
    /// Occupation, free text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub occupation: String,
    /// Highest education level (e.g. "MBA", "Bachelor's Degree").
    #[serde(default, deserialize_with = "null_as_default")]
    pub education_level: String,

    /// Desired bedrooms.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bedrooms: f64,
    /// Desired bathrooms.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bathrooms: f64,
    /// Preferred area, free text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub location_area: String,
    /// Lower end of the purchase budget.
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget_min: f64,
    /// Upper end of the purchase budget.
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget_max: f64,
    /// Property type sought (e.g. "Condo", "Investment").
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_type: String,
    /// Required features, free text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub must_have_features: String,
    /// Comma-delimited log of interaction events.
    #[serde(default, deserialize_with = "null_as_default")]
    pub interaction_history: String,
}

/// Payload for creating a lead. Identical to the profile: the service assigns
/// everything else.
pub type NewLead = LeadProfile;

/// A stored, scored lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier.
    pub id: String,
    /// Caller-supplied attributes.
    #[serde(flatten)]
    pub profile: LeadProfile,
    /// Conversion likelihood in [0, 1], two decimals. Written only by the scorer.
    pub predicted_conversion_likelihood: f64,
    /// Buyer segment. Written only by the scorer.
    pub buyer_segment: BuyerSegment,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Overwrites the derived attributes with a fresh scoring result.
    pub fn apply_score(&mut self, score: LeadScore) {
        self.predicted_conversion_likelihood = score.score;
        self.buyer_segment = score.segment;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
            .trim()
            .to_string()
    }
}

/// Partial update for an existing lead. Absent fields keep their stored value.
///
/// `persona_id` and `rejection_reason` use a nested option so that an explicit
/// `null` clears the stored value while an absent key leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadUpdate {
    pub campaign_id: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub persona_id: Option<Option<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub rejection_reason: Option<Option<RejectionReason>>,
    pub age_range: Option<String>,
    pub income_bracket: Option<String>,
    pub family_size: Option<u32>,
    pub occupation: Option<String>,
    pub education_level: Option<String>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub location_area: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub property_type: Option<String>,
    pub must_have_features: Option<String>,
    pub interaction_history: Option<String>,
}

fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

impl LeadUpdate {
    /// Overlays every present field onto `profile`.
    pub fn apply_to(self, profile: &mut LeadProfile) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    profile.$field = value;
                })*
            };
        }

        overlay!(
            campaign_id,
            persona_id,
            first_name,
            last_name,
            email,
            phone,
            status,
            rejection_reason,
            age_range,
            income_bracket,
            family_size,
            occupation,
            education_level,
            bedrooms,
            bathrooms,
            location_area,
            budget_min,
            budget_max,
            property_type,
            must_have_features,
            interaction_history,
        );
    }
}

// ============ Campaign Models ============

/// A marketing campaign leads are captured for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Real-estate project being marketed.
    #[serde(default)]
    pub project: String,
    /// Campaign objective (e.g. "Lead Generation").
    #[serde(default)]
    pub objective: String,
    /// Total spend, used for ROI projections.
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: f64,
    /// First day of the campaign.
    pub start_date: Option<NaiveDate>,
    /// Last day of the campaign.
    pub end_date: Option<NaiveDate>,
    /// Lifecycle state.
    #[serde(default)]
    pub status: CampaignStatus,
}

// ============ Scoring Output ============

/// Result of scoring a single lead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    /// Conversion likelihood in [0, 1], two decimals.
    pub score: f64,
    /// Buyer segment.
    pub segment: BuyerSegment,
}

/// Payload returned for a recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_round_trips_unknown_values() {
        let status: LeadStatus = serde_json::from_value(json!("Nurturing")).unwrap();
        assert_eq!(status, LeadStatus::Other("Nurturing".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Nurturing"));

        let status: LeadStatus = serde_json::from_value(json!("Site Visit")).unwrap();
        assert_eq!(status, LeadStatus::SiteVisit);
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Site Visit"));
    }

    #[test]
    fn test_profile_coerces_missing_and_null_fields() {
        let profile: LeadProfile = serde_json::from_value(json!({
            "campaign_id": "1",
            "budget_max": null,
            "family_size": null,
            "occupation": null
        }))
        .unwrap();

        assert_eq!(profile.budget_max, 0.0);
        assert_eq!(profile.budget_min, 0.0);
        assert_eq!(profile.family_size, 0);
        assert_eq!(profile.occupation, "");
        assert_eq!(profile.status, LeadStatus::New);
    }

    #[test]
    fn test_lead_flattens_profile() {
        let lead: Lead = serde_json::from_value(json!({
            "id": "7",
            "campaign_id": "2",
            "status": "Hot",
            "budget_max": 450000,
            "predicted_conversion_likelihood": 0.8,
            "buyer_segment": "Luxury Buyer",
            "created_at": "2024-01-20T14:15:00Z",
            "updated_at": "2024-01-22T16:30:00Z"
        }))
        .unwrap();

        assert_eq!(lead.profile.status, LeadStatus::Hot);
        assert_eq!(lead.profile.budget_max, 450_000.0);
        assert_eq!(lead.buyer_segment, BuyerSegment::LuxuryBuyer);

        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(value["campaign_id"], json!("2"));
        assert_eq!(value["buyer_segment"], json!("Luxury Buyer"));
    }

    #[test]
    fn test_update_overlays_only_present_fields() {
        let mut profile = LeadProfile {
            campaign_id: "1".to_string(),
            persona_id: Some("p1".to_string()),
            first_name: "Sarah".to_string(),
            status: LeadStatus::New,
            budget_max: 600_000.0,
            ..Default::default()
        };

        let update: LeadUpdate = serde_json::from_value(json!({
            "status": "Converted",
            "persona_id": null
        }))
        .unwrap();
        update.apply_to(&mut profile);

        assert_eq!(profile.status, LeadStatus::Converted);
        assert_eq!(profile.persona_id, None);
        assert_eq!(profile.first_name, "Sarah");
        assert_eq!(profile.budget_max, 600_000.0);
    }
}
