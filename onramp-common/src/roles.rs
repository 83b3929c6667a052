//! Project role names and their cluster role mapping
//!
//! Each project role is backed by a cluster-scoped Group named
//! `{project}-{role}` and a RoleBinding granting the mapped ClusterRole
//! to that group.

use crate::Error;

/// Role names accepted by the API, paired with the ClusterRole they grant
pub const ROLE_MAP: [(&str, &str); 3] = [
    ("admin", "admin"),
    ("member", "edit"),
    ("reader", "view"),
];

/// Look up the ClusterRole granted by a role name
pub fn cluster_role(role: &str) -> Option<&'static str> {
    ROLE_MAP
        .iter()
        .find(|(name, _)| *name == role)
        .map(|(_, cluster_role)| *cluster_role)
}

/// All valid role names
pub fn role_names() -> impl Iterator<Item = &'static str> {
    ROLE_MAP.iter().map(|(name, _)| *name)
}

/// Check that the given role name is valid
pub fn check_role_name(role: &str) -> Result<(), Error> {
    if cluster_role(role).is_none() {
        return Err(Error::InvalidRoleName(role.to_string()));
    }
    Ok(())
}

/// Group name for the given project and role
pub fn group_name(project: &str, role: &str) -> String {
    format!("{project}-{role}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_map() {
        assert_eq!(cluster_role("admin"), Some("admin"));
        assert_eq!(cluster_role("member"), Some("edit"));
        assert_eq!(cluster_role("reader"), Some("view"));
        assert_eq!(cluster_role("owner"), None);
    }

    #[test]
    fn test_check_role_name() {
        assert!(check_role_name("admin").is_ok());
        assert!(matches!(
            check_role_name("root"),
            Err(Error::InvalidRoleName(name)) if name == "root"
        ));
    }

    #[test]
    fn test_group_name() {
        assert_eq!(group_name("physics", "admin"), "physics-admin");
    }
}
