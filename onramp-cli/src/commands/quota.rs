use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use crate::QuotaCommands;
use anyhow::Result;
use onramp_common::{QuotaRequest, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
struct QuotaEnvelope {
    #[serde(skip_serializing)]
    #[allow(dead_code)]
    error: bool,
    quotas: Vec<Value>,
    limits: Vec<Value>,
}

pub async fn handle_quota_command(
    command: QuotaCommands,
    api: &ApiClient,
    output_format: &str,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format);

    match command {
        QuotaCommands::Show { project } => {
            let envelope: QuotaEnvelope =
                api.get(&format!("/projects/{}/quotas", project)).await?;
            output::print_single(&envelope, format)?;
        }
        QuotaCommands::Set {
            project,
            multiplier,
        } => {
            let request = QuotaRequest { multiplier };
            let envelope: QuotaEnvelope = api
                .put(&format!("/projects/{}/quotas", project), &request)
                .await?;
            output::print_success(&format!(
                "Applied quotas to project '{}' at multiplier {}",
                project, multiplier
            ));
            output::print_single(&envelope, format)?;
        }
        QuotaCommands::Clear { project } => {
            let response: Response = api
                .delete(&format!("/projects/{}/quotas", project))
                .await?;
            output::print_success(response.message.as_deref().unwrap_or("quotas cleared"));
        }
    }
    Ok(())
}
