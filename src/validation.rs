//! Structural checks applied to lead payloads before they are scored and stored.
//!
//! The scorer itself accepts any profile; these rules guard the stored data:
//! budgets and room counts are non-negative and emails are well formed.
use crate::errors::AppError;
use crate::models::{LeadProfile, LeadStatus};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    // RFC 5322 simplified: local@domain.tld
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("email pattern compiles")
    })
}

/// Validate email address
///
/// Checks for:
/// - Minimum length
/// - A local part, an `@` and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    email_regex().is_match(email)
}

fn check_amount(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::BadRequest(format!(
            "{} must be a non-negative number (got {})",
            field, value
        )));
    }
    Ok(())
}

/// Validates a lead profile.
///
/// # Returns
///
/// * `Ok(())` when the profile can be stored, `AppError::BadRequest` naming the
///   first offending field otherwise.
pub fn validate_profile(profile: &LeadProfile) -> Result<(), AppError> {
    if profile.campaign_id.trim().is_empty() {
        return Err(AppError::BadRequest("campaign_id is required".to_string()));
    }

    check_amount("budget_min", profile.budget_min)?;
    check_amount("budget_max", profile.budget_max)?;
    check_amount("bedrooms", profile.bedrooms)?;
    check_amount("bathrooms", profile.bathrooms)?;

    if profile.budget_max < profile.budget_min {
        return Err(AppError::BadRequest(format!(
            "budget_max ({}) must not be lower than budget_min ({})",
            profile.budget_max, profile.budget_min
        )));
    }

    if !profile.email.is_empty() && !is_valid_email(&profile.email) {
        tracing::warn!("❌ Invalid email format: {}", profile.email);
        return Err(AppError::BadRequest(format!(
            "Invalid email address: {}",
            profile.email
        )));
    }

    if profile.rejection_reason.is_some() && profile.status != LeadStatus::Rejected {
        return Err(AppError::BadRequest(format!(
            "rejection_reason is only allowed for Rejected leads (status is {})",
            profile.status
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RejectionReason;

    fn valid_profile() -> LeadProfile {
        LeadProfile {
            campaign_id: "1".to_string(),
            email: "sarah.johnson@email.com".to_string(),
            budget_min: 450_000.0,
            budget_max: 600_000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user+tag@example.co.uk"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("user@examplecom"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(validate_profile(&valid_profile()).is_ok());

        // Email is optional
        let profile = LeadProfile {
            email: String::new(),
            ..valid_profile()
        };
        assert!(validate_profile(&profile).is_ok());
    }

    #[test]
    fn test_missing_campaign_rejected() {
        let profile = LeadProfile {
            campaign_id: "  ".to_string(),
            ..valid_profile()
        };
        assert!(validate_profile(&profile).unwrap_err().is_bad_request());
    }

    #[test]
    fn test_inverted_budget_rejected() {
        let profile = LeadProfile {
            budget_min: 700_000.0,
            budget_max: 500_000.0,
            ..valid_profile()
        };
        let err = validate_profile(&profile).unwrap_err();
        assert!(err.to_string().contains("budget_max"));
    }

    #[test]
    fn test_negative_and_non_finite_amounts_rejected() {
        let profile = LeadProfile {
            bedrooms: -1.0,
            ..valid_profile()
        };
        assert!(validate_profile(&profile).is_err());

        let profile = LeadProfile {
            budget_max: f64::NAN,
            ..valid_profile()
        };
        assert!(validate_profile(&profile).is_err());
    }

    #[test]
    fn test_rejection_reason_requires_rejected_status() {
        let profile = LeadProfile {
            rejection_reason: Some(RejectionReason::Price),
            status: LeadStatus::Hot,
            ..valid_profile()
        };
        assert!(validate_profile(&profile).is_err());

        let profile = LeadProfile {
            rejection_reason: Some(RejectionReason::Price),
            status: LeadStatus::Rejected,
            ..valid_profile()
        };
        assert!(validate_profile(&profile).is_ok());
    }
}
