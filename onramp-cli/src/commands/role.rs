use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use crate::RoleCommands;
use anyhow::Result;
use onramp_common::RoleResponse;

fn role_path(user: &str, project: &str, role: &str) -> String {
    format!("/users/{}/projects/{}/roles/{}", user, project, role)
}

pub async fn handle_role_command(
    command: RoleCommands,
    api: &ApiClient,
    output_format: &str,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format);

    match command {
        RoleCommands::Grant {
            user,
            project,
            role,
        } => {
            let response: RoleResponse = api.put_empty(&role_path(&user, &project, &role)).await?;
            output::print_success(&format!(
                "Granted role '{}' on project '{}' to user '{}'",
                role, project, user
            ));
            output::print_single(&response.role, format)?;
        }
        RoleCommands::Check {
            user,
            project,
            role,
        } => {
            let response: RoleResponse = api.get(&role_path(&user, &project, &role)).await?;
            output::print_single(&response.role, format)?;
        }
        RoleCommands::Revoke {
            user,
            project,
            role,
        } => {
            let response: RoleResponse = api.delete(&role_path(&user, &project, &role)).await?;
            output::print_success(&format!(
                "Revoked role '{}' on project '{}' from user '{}'",
                role, project, user
            ));
            output::print_single(&response.role, format)?;
        }
    }
    Ok(())
}
