//! ResourceQuota and LimitRange operations
//!
//! The cluster owns these objects; this service only lists, creates, and
//! deletes the ones carrying the management label.

use k8s_openapi::api::core::v1::{LimitRange, ResourceQuota};
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use tracing::{debug, info};

use super::client::OpenShiftClient;
use super::error::ClusterResult;
use super::MANAGED_BY_LABEL;
use crate::quota::{build_limit_range, build_resource_quotas};
use onramp_common::quota::QuotaFile;

/// List the managed quota objects in a project's namespace
pub async fn get_quotas(
    client: &OpenShiftClient,
    project: &str,
) -> ClusterResult<(Vec<ResourceQuota>, Vec<LimitRange>)> {
    info!("get resourcequotas in project {}", project);

    let lp = ListParams::default().labels(MANAGED_BY_LABEL);

    let quotas: Api<ResourceQuota> = Api::namespaced(client.inner().clone(), project);
    let quota_list = quotas.list(&lp).await?;

    let limits: Api<LimitRange> = Api::namespaced(client.inner().clone(), project);
    let limit_list = limits.list(&lp).await?;

    Ok((quota_list.items, limit_list.items))
}

/// Delete every managed quota object in a project's namespace
pub async fn delete_quotas(client: &OpenShiftClient, project: &str) -> ClusterResult<()> {
    info!("deleting resourcequotas in project {}", project);

    let (quota_items, limit_items) = get_quotas(client, project).await?;

    let quotas: Api<ResourceQuota> = Api::namespaced(client.inner().clone(), project);
    for quota in quota_items {
        if let Some(name) = quota.metadata.name {
            debug!("deleting resourcequota {} from project {}", name, project);
            quotas.delete(&name, &DeleteParams::default()).await?;
        }
    }

    let limits: Api<LimitRange> = Api::namespaced(client.inner().clone(), project);
    for limit in limit_items {
        if let Some(name) = limit.metadata.name {
            debug!("deleting limitrange {} from project {}", name, project);
            limits.delete(&name, &DeleteParams::default()).await?;
        }
    }

    Ok(())
}

/// Regenerate the managed quota objects for a project.
///
/// Existing managed objects are deleted, then the builder's output for the
/// given multiplier is created.
pub async fn apply_quotas(
    client: &OpenShiftClient,
    file: &QuotaFile,
    project: &str,
    multiplier: i64,
) -> ClusterResult<(Vec<ResourceQuota>, Vec<LimitRange>)> {
    info!(
        "creating resourcequotas for project {} with multiplier {}",
        project, multiplier
    );

    delete_quotas(client, project).await?;

    let quota_objects = build_resource_quotas(file, project, multiplier);
    let limit_object = build_limit_range(file, project, multiplier);

    let quotas: Api<ResourceQuota> = Api::namespaced(client.inner().clone(), project);
    for quota in &quota_objects {
        debug!(
            "creating resourcequota {} for project {}",
            quota.metadata.name.as_deref().unwrap_or_default(),
            project
        );
        quotas.create(&PostParams::default(), quota).await?;
    }

    let limits: Api<LimitRange> = Api::namespaced(client.inner().clone(), project);
    if let Some(limit) = &limit_object {
        limits.create(&PostParams::default(), limit).await?;
    }

    Ok((quota_objects, limit_object.into_iter().collect()))
}
