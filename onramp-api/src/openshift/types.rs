//! Hand-modeled OpenShift API types
//!
//! The user.openshift.io and project.openshift.io kinds are absent from
//! k8s-openapi, so they are modeled here with manual `kube::Resource`
//! implementations. All of them are cluster-scoped.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::core::{ClusterResourceScope, TypeMeta};
use kube::Resource;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A project.openshift.io/v1 Project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub types: TypeMeta,
    pub metadata: ObjectMeta,
}

impl Project {
    pub fn new(metadata: ObjectMeta) -> Self {
        Self {
            types: TypeMeta::resource::<Project>(),
            metadata,
        }
    }
}

impl Resource for Project {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        "Project".into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        "project.openshift.io".into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        "v1".into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        "projects".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// A user.openshift.io/v1 User
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub types: TypeMeta,
    pub metadata: ObjectMeta,
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identities: Option<Vec<String>>,
}

impl User {
    pub fn new(name: &str, full_name: &str) -> Self {
        Self {
            types: TypeMeta::resource::<User>(),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            full_name: Some(full_name.to_string()),
            groups: None,
            identities: None,
        }
    }
}

impl Resource for User {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        "User".into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        "user.openshift.io".into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        "v1".into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        "users".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// A user.openshift.io/v1 Group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(flatten)]
    pub types: TypeMeta,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub users: Vec<String>,
}

impl Group {
    pub fn new(metadata: ObjectMeta) -> Self {
        Self {
            types: TypeMeta::resource::<Group>(),
            metadata,
            users: Vec::new(),
        }
    }
}

impl Resource for Group {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        "Group".into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        "user.openshift.io".into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        "v1".into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        "groups".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// User reference inside identities and identity mappings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// A user.openshift.io/v1 Identity
///
/// The object name must be `{providerName}:{providerUserName}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    #[serde(flatten)]
    pub types: TypeMeta,
    pub metadata: ObjectMeta,
    #[serde(rename = "providerName")]
    pub provider_name: String,
    #[serde(rename = "providerUserName")]
    pub provider_user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<IdentityUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<BTreeMap<String, String>>,
}

impl Identity {
    pub fn new(provider: &str, username: &str) -> Self {
        Self {
            types: TypeMeta::resource::<Identity>(),
            metadata: ObjectMeta {
                name: Some(qualified_name(provider, username)),
                ..Default::default()
            },
            provider_name: provider.to_string(),
            provider_user_name: username.to_string(),
            user: None,
            extra: None,
        }
    }
}

impl Resource for Identity {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        "Identity".into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        "user.openshift.io".into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        "v1".into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        "identities".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// A user.openshift.io/v1 UserIdentityMapping linking a User to an Identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentityMapping {
    #[serde(flatten)]
    pub types: TypeMeta,
    pub metadata: ObjectMeta,
    pub user: IdentityUser,
    pub identity: IdentityUser,
}

impl UserIdentityMapping {
    pub fn new(provider: &str, username: &str) -> Self {
        let identity_name = qualified_name(provider, username);
        Self {
            types: TypeMeta::resource::<UserIdentityMapping>(),
            metadata: ObjectMeta {
                name: Some(identity_name.clone()),
                ..Default::default()
            },
            user: IdentityUser {
                name: Some(username.to_string()),
                uid: None,
            },
            identity: IdentityUser {
                name: Some(identity_name),
                uid: None,
            },
        }
    }
}

impl Resource for UserIdentityMapping {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        "UserIdentityMapping".into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        "user.openshift.io".into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        "v1".into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        "useridentitymappings".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// Identity name for a user at the configured identity provider
pub fn qualified_name(provider: &str, username: &str) -> String {
    format!("{provider}:{username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_meta() {
        let project = Project::new(ObjectMeta {
            name: Some("physics".to_string()),
            ..Default::default()
        });
        assert_eq!(project.types.api_version, "project.openshift.io/v1");
        assert_eq!(project.types.kind, "Project");

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["apiVersion"], "project.openshift.io/v1");
        assert_eq!(json["kind"], "Project");
        assert_eq!(json["metadata"]["name"], "physics");
    }

    #[test]
    fn test_user_serialization() {
        let user = User::new("alice", "Alice Liddell");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["apiVersion"], "user.openshift.io/v1");
        assert_eq!(json["fullName"], "Alice Liddell");
        assert!(json.get("groups").is_none());
    }

    #[test]
    fn test_identity_name_is_qualified() {
        let ident = Identity::new("sso", "alice");
        assert_eq!(ident.metadata.name.as_deref(), Some("sso:alice"));
        assert!(ident.metadata.name.unwrap().contains(':'));
    }

    #[test]
    fn test_identity_mapping_links_user_and_identity() {
        let mapping = UserIdentityMapping::new("sso", "alice");
        assert_eq!(mapping.user.name.as_deref(), Some("alice"));
        assert_eq!(mapping.identity.name.as_deref(), Some("sso:alice"));
    }

    #[test]
    fn test_group_deserializes_without_users() {
        let group: Group = serde_json::from_value(serde_json::json!({
            "apiVersion": "user.openshift.io/v1",
            "kind": "Group",
            "metadata": {"name": "physics-admin"}
        }))
        .unwrap();
        assert!(group.users.is_empty());
    }
}
