//! Quota builder
//!
//! Turns the declarative quota file into concrete ResourceQuota and
//! LimitRange objects for a project's namespace. Output order follows the
//! quota file's declaration order and map iteration is sorted, so repeated
//! calls produce identical manifests.

use k8s_openapi::api::core::v1::{
    LimitRange, LimitRangeItem, LimitRangeSpec, ResourceQuota, ResourceQuotaSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

use crate::openshift::managed_labels;
use onramp_common::quota::{QuotaFile, QuotaScope, ScaledValue};

/// Build one ResourceQuota per quota spec in the file.
///
/// The multiplier must already be validated as positive.
pub fn build_resource_quotas(
    file: &QuotaFile,
    project: &str,
    multiplier: i64,
) -> Vec<ResourceQuota> {
    file.quotas
        .iter()
        .map(|spec| {
            let hard = resolve_values(&spec.values, multiplier);
            // The Project scope is the unscoped marker and contributes no
            // Kubernetes scope entry
            let scopes: Vec<String> = spec
                .scopes
                .iter()
                .filter(|s| **s != QuotaScope::Project)
                .map(|s| s.as_str().to_string())
                .collect();

            ResourceQuota {
                metadata: ObjectMeta {
                    name: Some(quota_name(project, &spec.scopes)),
                    namespace: Some(project.to_string()),
                    labels: Some(managed_labels(project)),
                    ..Default::default()
                },
                spec: Some(ResourceQuotaSpec {
                    hard: Some(hard),
                    scopes: if scopes.is_empty() { None } else { Some(scopes) },
                    scope_selector: None,
                }),
                status: None,
            }
        })
        .collect()
}

/// Build the project's LimitRange, one item per limit spec in the file.
///
/// Returns None when the file declares no limits.
pub fn build_limit_range(file: &QuotaFile, project: &str, multiplier: i64) -> Option<LimitRange> {
    if file.limits.is_empty() {
        return None;
    }

    let items: Vec<LimitRangeItem> = file
        .limits
        .iter()
        .map(|spec| LimitRangeItem {
            type_: spec.limit_type.clone(),
            max: resolve_bucket(spec.max.as_ref(), multiplier),
            min: resolve_bucket(spec.min.as_ref(), multiplier),
            default: resolve_bucket(spec.default.as_ref(), multiplier),
            default_request: resolve_bucket(spec.default_request.as_ref(), multiplier),
            max_limit_request_ratio: resolve_bucket(
                spec.max_limit_request_ratio.as_ref(),
                multiplier,
            ),
        })
        .collect();

    Some(LimitRange {
        metadata: ObjectMeta {
            name: Some(format!("{project}-limits")),
            namespace: Some(project.to_string()),
            labels: Some(managed_labels(project)),
            ..Default::default()
        },
        spec: Some(LimitRangeSpec { limits: items }),
    })
}

/// ResourceQuota name for a scope set: the project name followed by each
/// scope, lowercased. A quota scoped only by the Project marker keeps the
/// bare project name.
fn quota_name(project: &str, scopes: &[QuotaScope]) -> String {
    if scopes == [QuotaScope::Project] {
        return project.to_string();
    }

    let mut name = project.to_string();
    for scope in scopes {
        name.push('-');
        name.push_str(&scope.as_str().to_lowercase());
    }
    name
}

fn resolve_values(
    values: &BTreeMap<String, ScaledValue>,
    multiplier: i64,
) -> BTreeMap<String, Quantity> {
    values
        .iter()
        .map(|(name, value)| (name.clone(), Quantity(value.resolve(multiplier))))
        .collect()
}

fn resolve_bucket(
    bucket: Option<&BTreeMap<String, ScaledValue>>,
    multiplier: i64,
) -> Option<BTreeMap<String, Quantity>> {
    bucket.map(|values| resolve_values(values, multiplier))
}
