use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use crate::UserCommands;
use anyhow::Result;
use onramp_common::{Response, UserRequest};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    #[allow(dead_code)]
    error: bool,
    user: Value,
}

pub async fn handle_user_command(
    command: UserCommands,
    api: &ApiClient,
    output_format: &str,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format);

    match command {
        UserCommands::Create { name, full_name } => {
            let request = UserRequest {
                name: name.clone(),
                full_name,
            };

            let envelope: UserEnvelope = api.post("/users", &request).await?;
            output::print_success(&format!("User '{}' created", name));
            output::print_single(&envelope.user, format)?;
        }
        UserCommands::Show { name } => {
            let envelope: UserEnvelope = api.get(&format!("/users/{}", name)).await?;
            output::print_single(&envelope.user, format)?;
        }
        UserCommands::Delete { name } => {
            let response: Response = api.delete(&format!("/users/{}", name)).await?;
            output::print_success(response.message.as_deref().unwrap_or("user deleted"));
        }
    }
    Ok(())
}
