//! Group operations
//!
//! Role membership is group membership: granting a role adds the user to
//! the `{project}-{role}` group, revoking removes them.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use tracing::{debug, info};

use super::client::OpenShiftClient;
use super::error::{ClusterError, ClusterResult};
use super::types::Group;
use super::{ensure_managed, managed_labels, not_found_or, MANAGED_BY_LABEL};
use onramp_common::roles;

/// Look up a group without the management-label check
pub async fn get_group_any(client: &OpenShiftClient, name: &str) -> ClusterResult<Group> {
    let groups: Api<Group> = Api::all(client.inner().clone());
    groups
        .get(name)
        .await
        .map_err(|e| not_found_or(e, "group", name))
}

/// Look up a group, refusing groups this service did not create
pub async fn get_group(client: &OpenShiftClient, name: &str) -> ClusterResult<Group> {
    let group = get_group_any(client, name).await?;
    ensure_managed(&group.metadata, "group", name)?;
    Ok(group)
}

/// Return true if the named group exists, managed or not
pub async fn group_exists(client: &OpenShiftClient, name: &str) -> ClusterResult<bool> {
    match get_group_any(client, name).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create a new group belonging to a project
pub async fn create_group(
    client: &OpenShiftClient,
    name: &str,
    project: &str,
) -> ClusterResult<Group> {
    info!("create group {}", name);

    if group_exists(client, name).await? {
        return Err(ClusterError::AlreadyExists {
            kind: "group",
            name: name.to_string(),
        });
    }

    let group = Group::new(ObjectMeta {
        name: Some(name.to_string()),
        labels: Some(managed_labels(project)),
        ..Default::default()
    });

    let groups: Api<Group> = Api::all(client.inner().clone());
    groups.create(&PostParams::default(), &group).await?;

    Ok(group)
}

/// Delete a group, tolerating absence.
///
/// Refuses groups this service did not create.
pub async fn delete_group(client: &OpenShiftClient, name: &str) -> ClusterResult<()> {
    info!("delete group {}", name);

    match get_group(client, name).await {
        Ok(_) => {
            let groups: Api<Group> = Api::all(client.inner().clone());
            groups.delete(name, &DeleteParams::default()).await?;
            Ok(())
        }
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Return true if the user holds the given role in a project
pub async fn user_has_role(
    client: &OpenShiftClient,
    user: &str,
    project: &str,
    role: &str,
) -> ClusterResult<bool> {
    let group = get_group_any(client, &roles::group_name(project, role)).await?;
    Ok(group.users.iter().any(|u| u == user))
}

/// Grant a user the named role in a project.
///
/// Idempotent when the user is already a member.
pub async fn add_user_to_role(
    client: &OpenShiftClient,
    user: &str,
    project: &str,
    role: &str,
) -> ClusterResult<Group> {
    info!("add user {} to role {} in project {}", user, role, project);

    let group_name = roles::group_name(project, role);
    let mut group = get_group_any(client, &group_name).await?;

    if !group.users.iter().any(|u| u == user) {
        group.users.push(user.to_string());
        let groups: Api<Group> = Api::all(client.inner().clone());
        group = groups
            .replace(&group_name, &PostParams::default(), &group)
            .await?;
    }

    Ok(group)
}

/// Revoke the named role for a user in a project.
///
/// Tolerates the user not being a member.
pub async fn remove_user_from_role(
    client: &OpenShiftClient,
    user: &str,
    project: &str,
    role: &str,
) -> ClusterResult<Group> {
    info!(
        "remove user {} from role {} in project {}",
        user, role, project
    );

    let group_name = roles::group_name(project, role);
    let mut group = get_group_any(client, &group_name).await?;

    if let Some(pos) = group.users.iter().position(|u| u == user) {
        group.users.remove(pos);
        let groups: Api<Group> = Api::all(client.inner().clone());
        group = groups
            .replace(&group_name, &PostParams::default(), &group)
            .await?;
    }

    Ok(group)
}

/// Remove a user from every managed group
pub async fn remove_user_from_all_groups(
    client: &OpenShiftClient,
    user: &str,
) -> ClusterResult<()> {
    info!("removing user {} from all groups", user);

    let groups: Api<Group> = Api::all(client.inner().clone());
    let managed = groups
        .list(&ListParams::default().labels(MANAGED_BY_LABEL))
        .await?;

    for mut group in managed.items {
        let Some(pos) = group.users.iter().position(|u| u == user) else {
            continue;
        };
        let name = group.metadata.name.clone().unwrap_or_default();
        debug!("removing user {} from group {}", user, name);
        group.users.remove(pos);
        groups
            .replace(&name, &PostParams::default(), &group)
            .await?;
    }

    Ok(())
}
