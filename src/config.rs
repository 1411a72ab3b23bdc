use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON array of lead records to score.
    pub leads_file: PathBuf,
    /// Optional JSON array of campaigns, used for report names and ROI.
    pub campaigns_file: Option<PathBuf>,
    /// Restrict the report to one campaign.
    pub campaign_id: Option<String>,
    /// Pretty-print the JSON report.
    pub report_pretty: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            leads_file: std::env::var("LEADS_FILE")
                .map_err(|_| anyhow::anyhow!("LEADS_FILE environment variable required"))
                .and_then(|path| {
                    if path.trim().is_empty() {
                        anyhow::bail!("LEADS_FILE cannot be empty");
                    }
                    Ok(PathBuf::from(path))
                })?,
            campaigns_file: std::env::var("CAMPAIGNS_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            campaign_id: std::env::var("CAMPAIGN_ID")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            report_pretty: std::env::var("REPORT_PRETTY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REPORT_PRETTY must be true or false"))?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Leads file: {}", config.leads_file.display());
        if let Some(ref campaigns) = config.campaigns_file {
            tracing::debug!("Campaigns file: {}", campaigns.display());
        }
        if let Some(ref campaign_id) = config.campaign_id {
            tracing::info!("Report scoped to campaign {}", campaign_id);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns these variables so parallel tests never race on them
    #[test]
    fn test_from_env() {
        std::env::set_var("LEADS_FILE", "data/sample_leads.json");
        std::env::set_var("CAMPAIGN_ID", "  1 ");
        std::env::remove_var("CAMPAIGNS_FILE");
        std::env::remove_var("REPORT_PRETTY");

        let config = Config::from_env().unwrap();
        assert_eq!(config.leads_file, PathBuf::from("data/sample_leads.json"));
        assert_eq!(config.campaign_id.as_deref(), Some("1"));
        assert!(config.campaigns_file.is_none());
        assert!(config.report_pretty);

        std::env::set_var("REPORT_PRETTY", "sometimes");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("REPORT_PRETTY"));

        std::env::set_var("REPORT_PRETTY", "false");
        std::env::set_var("LEADS_FILE", "  ");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("LEADS_FILE cannot be empty"));

        std::env::remove_var("LEADS_FILE");
        std::env::remove_var("CAMPAIGN_ID");
        std::env::remove_var("REPORT_PRETTY");
    }
}
