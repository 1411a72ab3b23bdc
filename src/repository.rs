use crate::errors::AppError;
use crate::models::Lead;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage for scored leads.
///
/// The service layer owns scoring; implementations only persist what they are
/// handed and must not alter `predicted_conversion_likelihood` or
/// `buyer_segment`.
pub trait LeadRepository: Send + Sync {
    /// All leads, optionally restricted to one campaign, in insertion order.
    fn list(&self, campaign_id: Option<&str>) -> Result<Vec<Lead>, AppError>;

    /// A single lead by id.
    fn get(&self, id: &str) -> Result<Option<Lead>, AppError>;

    /// Stores a new lead.
    fn insert(&self, lead: Lead) -> Result<(), AppError>;

    /// Overwrites an existing lead with the same id.
    fn replace(&self, lead: Lead) -> Result<(), AppError>;

    /// Removes a lead. Returns `false` if no lead had that id.
    fn remove(&self, id: &str) -> Result<bool, AppError>;
}

/// Process-local lead store, used by the batch runner and in tests.
#[derive(Debug, Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<Vec<Lead>>,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with already-scored leads.
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self {
            leads: RwLock::new(leads),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Lead>>, AppError> {
        self.leads
            .read()
            .map_err(|_| AppError::InternalError("Lead store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Lead>>, AppError> {
        self.leads
            .write()
            .map_err(|_| AppError::InternalError("Lead store lock poisoned".to_string()))
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn list(&self, campaign_id: Option<&str>) -> Result<Vec<Lead>, AppError> {
        let leads = self.read()?;
        Ok(leads
            .iter()
            .filter(|lead| campaign_id.map_or(true, |id| lead.profile.campaign_id == id))
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> Result<Option<Lead>, AppError> {
        Ok(self.read()?.iter().find(|lead| lead.id == id).cloned())
    }

    fn insert(&self, lead: Lead) -> Result<(), AppError> {
        let mut leads = self.write()?;
        if leads.iter().any(|existing| existing.id == lead.id) {
            return Err(AppError::BadRequest(format!(
                "Lead with id {} already exists",
                lead.id
            )));
        }
        leads.push(lead);
        Ok(())
    }

    fn replace(&self, lead: Lead) -> Result<(), AppError> {
        let mut leads = self.write()?;
        let slot = leads
            .iter_mut()
            .find(|existing| existing.id == lead.id)
            .ok_or_else(|| AppError::NotFound(format!("Lead with id {} not found", lead.id)))?;
        *slot = lead;
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<bool, AppError> {
        let mut leads = self.write()?;
        let before = leads.len();
        leads.retain(|lead| lead.id != id);
        Ok(leads.len() != before)
    }
}
