use anyhow::Context;
use lead_insights::config::Config;
use lead_insights::leads::LeadService;
use lead_insights::loader::{load_records, render_report};
use lead_insights::models::{Campaign, NewLead};
use lead_insights::repository::InMemoryLeadRepository;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the batch scoring run.
///
/// Loads lead records, scores every one of them (any score or segment already
/// present in the file is discarded), then prints a JSON report with the
/// scored leads, campaign insights and recommendations.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the report was produced, or an error if loading fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_insights=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    let profiles: Vec<NewLead> = load_records(&config.leads_file).await?;
    tracing::info!(
        "Loaded {} lead records from {}",
        profiles.len(),
        config.leads_file.display()
    );

    let campaigns: Vec<Campaign> = match config.campaigns_file {
        Some(ref path) => load_records(path).await?,
        None => Vec::new(),
    };

    let service = LeadService::new(InMemoryLeadRepository::new());
    service
        .bulk_import(profiles)
        .context("Failed to import leads")?;

    let leads = service.list(config.campaign_id.as_deref())?;
    let insights = service.insights(config.campaign_id.as_deref(), &campaigns)?;
    let recommendations = service.recommendations(config.campaign_id.as_deref())?;

    let scored: Vec<_> = leads
        .iter()
        .map(|lead| {
            json!({
                "id": lead.id,
                "name": lead.full_name(),
                "campaign_id": lead.profile.campaign_id,
                "status": lead.profile.status,
                "predicted_conversion_likelihood": lead.predicted_conversion_likelihood,
                "buyer_segment": lead.buyer_segment,
            })
        })
        .collect();

    let report = json!({
        "leads": scored,
        "insights": insights,
        "recommendations": recommendations.recommendations,
    });

    println!("{}", render_report(&report, config.report_pretty)?);

    tracing::info!(
        "Report complete: {} leads, {} recommendations",
        leads.len(),
        recommendations.recommendations.len()
    );

    Ok(())
}
