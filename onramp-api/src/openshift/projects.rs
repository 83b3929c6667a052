//! Project operations
//!
//! A project bundle is the Project itself plus one Group and one
//! RoleBinding per role. Partial creation is rolled back.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, PostParams};
use std::collections::BTreeMap;
use tracing::{error, info};

use super::client::OpenShiftClient;
use super::error::{ClusterError, ClusterResult};
use super::types::Project;
use super::{ensure_managed, groups, managed_labels, not_found_or, rolebindings};
use onramp_common::{roles, ProjectRequest};

/// Look up a project without the management-label check
pub async fn get_project_any(client: &OpenShiftClient, name: &str) -> ClusterResult<Project> {
    let projects: Api<Project> = Api::all(client.inner().clone());
    projects
        .get(name)
        .await
        .map_err(|e| not_found_or(e, "project", name))
}

/// Look up a project, refusing projects this service did not create
pub async fn get_project(client: &OpenShiftClient, name: &str) -> ClusterResult<Project> {
    let project = get_project_any(client, name).await?;
    ensure_managed(&project.metadata, "project", name)?;
    Ok(project)
}

/// Return true if the named project exists, managed or not
pub async fn project_exists(client: &OpenShiftClient, name: &str) -> ClusterResult<bool> {
    match get_project_any(client, name).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create a new project
pub async fn create_project(
    client: &OpenShiftClient,
    request: &ProjectRequest,
) -> ClusterResult<Project> {
    info!("create project {}", request.name);

    if project_exists(client, &request.name).await? {
        return Err(ClusterError::AlreadyExists {
            kind: "project",
            name: request.name.clone(),
        });
    }

    let mut annotations = BTreeMap::from([(
        "openshift.io/requester".to_string(),
        request.requester.clone(),
    )]);
    if let Some(display_name) = &request.display_name {
        annotations.insert(
            "openshift.io/display-name".to_string(),
            display_name.clone(),
        );
    }
    if let Some(description) = &request.description {
        annotations.insert("openshift.io/description".to_string(), description.clone());
    }

    let project = Project::new(ObjectMeta {
        name: Some(request.name.clone()),
        labels: Some(managed_labels(&request.name)),
        annotations: Some(annotations),
        ..Default::default()
    });

    let projects: Api<Project> = Api::all(client.inner().clone());
    projects.create(&PostParams::default(), &project).await?;

    Ok(project)
}

/// Delete a project, refusing projects this service did not create
pub async fn delete_project(client: &OpenShiftClient, name: &str) -> ClusterResult<()> {
    info!("delete project {}", name);
    get_project(client, name).await?;

    let projects: Api<Project> = Api::all(client.inner().clone());
    projects.delete(name, &DeleteParams::default()).await?;

    Ok(())
}

/// Create a project and its associated resources.
///
/// This creates the project itself, a group for each role, and a
/// rolebinding granting each group the matching ClusterRole. Failure
/// part-way through tears the bundle down and reports the original error.
pub async fn create_project_bundle(
    client: &OpenShiftClient,
    request: &ProjectRequest,
) -> ClusterResult<Project> {
    info!("create project bundle for {}", request.name);
    let project = create_project(client, request).await?;

    if let Err(e) = create_project_roles(client, &request.name).await {
        error!(
            "deleting project {} due to failure creating groups or rolebindings",
            request.name
        );
        if let Err(cleanup) = delete_project_bundle(client, &request.name).await {
            error!("rollback of project {} failed: {}", request.name, cleanup);
        }
        return Err(e);
    }

    Ok(project)
}

async fn create_project_roles(client: &OpenShiftClient, project: &str) -> ClusterResult<()> {
    for (role, cluster_role) in roles::ROLE_MAP {
        let group_name = roles::group_name(project, role);
        groups::create_group(client, &group_name, project).await?;
        rolebindings::create_rolebinding(client, project, &group_name, cluster_role).await?;
    }
    Ok(())
}

/// Delete a project and its associated resources.
///
/// Groups are cluster-scoped and deleted explicitly; rolebindings die
/// with the namespace.
pub async fn delete_project_bundle(client: &OpenShiftClient, name: &str) -> ClusterResult<()> {
    info!("delete project bundle for {}", name);
    get_project(client, name).await?;

    for role in roles::role_names() {
        groups::delete_group(client, &roles::group_name(name, role)).await?;
    }

    delete_project(client, name).await
}
