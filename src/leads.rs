//! Lead lifecycle: every write goes through the scorer before it is stored.
//!
//! Callers never set `predicted_conversion_likelihood` or `buyer_segment`
//! themselves. Creation scores the incoming profile; an update overlays the
//! changed fields onto the stored profile and re-scores the merged record.

use crate::errors::{AppError, ResultExt};
use crate::insights::{campaign_insights, CampaignInsights};
use crate::models::{Campaign, Lead, LeadProfile, LeadScore, LeadUpdate, NewLead, RecommendationsResponse};
use crate::recommendations::generate_recommendations;
use crate::repository::LeadRepository;
use crate::scoring::score_lead;
use crate::validation::validate_profile;
use chrono::Utc;
use uuid::Uuid;

/// Lead operations over an injected repository.
pub struct LeadService<R: LeadRepository> {
    repo: R,
}

impl<R: LeadRepository> LeadService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Leads for one campaign, or for all campaigns when `campaign_id` is `None`.
    pub fn list(&self, campaign_id: Option<&str>) -> Result<Vec<Lead>, AppError> {
        self.repo.list(campaign_id)
    }

    pub fn get(&self, id: &str) -> Result<Lead, AppError> {
        self.repo
            .get(id)?
            .ok_or_else(|| AppError::NotFound(format!("Lead with id {} not found", id)))
    }

    /// Scores a profile without storing anything.
    pub fn score_preview(&self, profile: &LeadProfile) -> LeadScore {
        score_lead(profile)
    }

    fn build_lead(profile: NewLead) -> Lead {
        let now = Utc::now();
        let score = score_lead(&profile);

        Lead {
            id: Uuid::new_v4().to_string(),
            profile,
            predicted_conversion_likelihood: score.score,
            buyer_segment: score.segment,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates, scores and stores a new lead.
    pub fn create(&self, profile: NewLead) -> Result<Lead, AppError> {
        validate_profile(&profile)?;

        let lead = Self::build_lead(profile);
        self.repo.insert(lead.clone())?;

        tracing::info!(
            "Created lead {} (campaign {}) - score {:.2}, segment {}",
            lead.id,
            lead.profile.campaign_id,
            lead.predicted_conversion_likelihood,
            lead.buyer_segment
        );

        Ok(lead)
    }

    /// Merges `update` onto the stored lead and re-scores the result.
    pub fn update(&self, id: &str, update: LeadUpdate) -> Result<Lead, AppError> {
        let mut lead = self
            .get(id)
            .with_context(|| format!("Updating lead {}", id))?;

        let previous = (lead.predicted_conversion_likelihood, lead.buyer_segment);

        update.apply_to(&mut lead.profile);
        validate_profile(&lead.profile)?;

        lead.apply_score(score_lead(&lead.profile));
        lead.updated_at = Utc::now();
        self.repo.replace(lead.clone())?;

        tracing::info!(
            "Updated lead {} - score {:.2} -> {:.2}, segment {} -> {}",
            lead.id,
            previous.0,
            lead.predicted_conversion_likelihood,
            previous.1,
            lead.buyer_segment
        );

        Ok(lead)
    }

    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        if !self.repo.remove(id)? {
            return Err(AppError::NotFound(format!("Lead with id {} not found", id)));
        }
        tracing::info!("Deleted lead {}", id);
        Ok(())
    }

    /// Imports many leads at once.
    ///
    /// Every profile is validated before anything is stored, so a single bad
    /// record rejects the whole batch. If the store fails partway through,
    /// the leads already inserted by this call are removed again.
    pub fn bulk_import(&self, profiles: Vec<NewLead>) -> Result<Vec<Lead>, AppError> {
        for (idx, profile) in profiles.iter().enumerate() {
            validate_profile(profile).with_context(|| format!("Lead #{} in batch", idx + 1))?;
        }

        let total = profiles.len();
        let mut imported: Vec<Lead> = Vec::with_capacity(total);
        for (idx, profile) in profiles.into_iter().enumerate() {
            let lead = Self::build_lead(profile);
            if let Err(err) = self.repo.insert(lead.clone()) {
                tracing::warn!(
                    "Bulk import failed at lead #{}, rolling back {} stored leads",
                    idx + 1,
                    imported.len()
                );
                for stored in &imported {
                    self.repo
                        .remove(&stored.id)
                        .with_context(|| format!("Rolling back lead {}", stored.id))?;
                }
                return Err(AppError::WithContext {
                    source: Box::new(err),
                    context: format!("Lead #{} in batch", idx + 1),
                });
            }
            imported.push(lead);
        }

        tracing::info!("Bulk imported {} leads", total);
        Ok(imported)
    }

    /// Recommendations over the current leads of one campaign (or all).
    pub fn recommendations(
        &self,
        campaign_id: Option<&str>,
    ) -> Result<RecommendationsResponse, AppError> {
        let leads = self.repo.list(campaign_id)?;
        Ok(RecommendationsResponse {
            recommendations: generate_recommendations(&leads),
        })
    }

    /// Analytics report for one campaign (or all).
    ///
    /// `campaigns` supplies names and budgets; a campaign id without a matching
    /// entry still scopes the leads but reports no ROI.
    pub fn insights(
        &self,
        campaign_id: Option<&str>,
        campaigns: &[Campaign],
    ) -> Result<CampaignInsights, AppError> {
        let campaign = campaign_id.and_then(|id| campaigns.iter().find(|c| c.id == id));
        if let (Some(id), None) = (campaign_id, campaign) {
            tracing::warn!("Campaign {} has no campaign record, ROI unavailable", id);
        }

        let leads = self.repo.list(campaign_id)?;
        Ok(campaign_insights(campaign, &leads))
    }
}
