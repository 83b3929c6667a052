//! RoleBinding operations

use k8s_openapi::api::rbac::v1::{RoleBinding, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, PostParams};
use tracing::info;

use super::client::OpenShiftClient;
use super::error::ClusterResult;
use super::managed_labels;

/// Create a rolebinding in a project granting a ClusterRole to a group.
///
/// The binding shares its name with the group.
pub async fn create_rolebinding(
    client: &OpenShiftClient,
    project: &str,
    group: &str,
    cluster_role: &str,
) -> ClusterResult<RoleBinding> {
    info!(
        "create rolebinding {} for project {} granting {}",
        group, project, cluster_role
    );

    let binding = RoleBinding {
        metadata: ObjectMeta {
            name: Some(group.to_string()),
            namespace: Some(project.to_string()),
            labels: Some(managed_labels(project)),
            ..Default::default()
        },
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "ClusterRole".to_string(),
            name: cluster_role.to_string(),
        },
        subjects: Some(vec![Subject {
            api_group: Some("rbac.authorization.k8s.io".to_string()),
            kind: "Group".to_string(),
            name: group.to_string(),
            namespace: Some(project.to_string()),
        }]),
    };

    let bindings: Api<RoleBinding> = Api::namespaced(client.inner().clone(), project);
    bindings.create(&PostParams::default(), &binding).await?;

    Ok(binding)
}
