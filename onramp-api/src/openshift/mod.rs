//! OpenShift integration for onramp
//!
//! Provides a kube-rs client wrapper plus typed resource modules for the
//! objects this service manages:
//! - Projects (project.openshift.io/v1)
//! - Users, Identities, UserIdentityMappings, Groups (user.openshift.io/v1)
//! - RoleBindings (rbac.authorization.k8s.io/v1)
//! - ResourceQuotas and LimitRanges (v1)

pub mod client;
pub mod error;
pub mod types;

// Resource modules
pub mod groups;
pub mod projects;
pub mod quotas;
pub mod rolebindings;
pub mod users;

use error::{ClusterError, ClusterResult};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Label stamped on every project-owned object this service creates.
///
/// Objects without it are off-limits for get and delete.
pub const MANAGED_BY_LABEL: &str = "onboarding.openshift.io/project";

/// Labels attached to objects created for a project
pub fn managed_labels(project: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(MANAGED_BY_LABEL.to_string(), project.to_string())])
}

/// Return true if the object carries the management label
pub fn is_managed(metadata: &ObjectMeta) -> bool {
    metadata
        .labels
        .as_ref()
        .is_some_and(|labels| labels.contains_key(MANAGED_BY_LABEL))
}

/// Turn a kube 404 into a typed not-found error for nicer messages
pub(crate) fn not_found_or(e: kube::Error, kind: &'static str, name: &str) -> ClusterError {
    match e {
        kube::Error::Api(ae) if ae.code == 404 => ClusterError::NotFound {
            kind,
            name: name.to_string(),
        },
        other => ClusterError::Kube(other),
    }
}

/// Refuse to operate on objects this service did not create
pub fn ensure_managed(
    metadata: &ObjectMeta,
    kind: &'static str,
    name: &str,
) -> ClusterResult<()> {
    if !is_managed(metadata) {
        return Err(ClusterError::Unmanaged {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_labels() {
        let labels = managed_labels("physics");
        assert_eq!(labels.get(MANAGED_BY_LABEL).unwrap(), "physics");
    }

    #[test]
    fn test_is_managed() {
        let managed = ObjectMeta {
            labels: Some(managed_labels("physics")),
            ..Default::default()
        };
        assert!(is_managed(&managed));

        let unmanaged = ObjectMeta::default();
        assert!(!is_managed(&unmanaged));
    }

    #[test]
    fn test_ensure_managed_rejects_foreign_objects() {
        let meta = ObjectMeta {
            name: Some("kube-system".to_string()),
            ..Default::default()
        };
        let err = ensure_managed(&meta, "project", "kube-system").unwrap_err();
        assert!(matches!(err, ClusterError::Unmanaged { .. }));
    }
}
