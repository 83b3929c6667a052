use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use crate::ProjectCommands;
use anyhow::Result;
use onramp_common::{ProjectRequest, Response};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ProjectEnvelope {
    #[allow(dead_code)]
    error: bool,
    project: Value,
}

pub async fn handle_project_command(
    command: ProjectCommands,
    api: &ApiClient,
    output_format: &str,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format);

    match command {
        ProjectCommands::Create {
            name,
            requester,
            display_name,
            description,
        } => {
            let request = ProjectRequest {
                name: name.clone(),
                requester,
                display_name,
                description,
            };

            let envelope: ProjectEnvelope = api.post("/projects", &request).await?;
            output::print_success(&format!("Project '{}' created", name));
            output::print_single(&envelope.project, format)?;
        }
        ProjectCommands::Show { name } => {
            let envelope: ProjectEnvelope = api.get(&format!("/projects/{}", name)).await?;
            output::print_single(&envelope.project, format)?;
        }
        ProjectCommands::Delete { name } => {
            let response: Response = api.delete(&format!("/projects/{}", name)).await?;
            output::print_success(response.message.as_deref().unwrap_or("project deleted"));
        }
    }
    Ok(())
}
