//! User operations
//!
//! A user bundle is the User itself, an Identity named
//! `{provider}:{username}`, and a UserIdentityMapping linking the two.
//! Partial creation is rolled back.

use kube::api::{Api, DeleteParams, PostParams};
use tracing::{error, info};

use super::client::OpenShiftClient;
use super::error::{ClusterError, ClusterResult};
use super::groups;
use super::not_found_or;
use super::types::{qualified_name, Identity, User, UserIdentityMapping};

/// Look up a user
pub async fn get_user(client: &OpenShiftClient, name: &str) -> ClusterResult<User> {
    let users: Api<User> = Api::all(client.inner().clone());
    users
        .get(name)
        .await
        .map_err(|e| not_found_or(e, "user", name))
}

/// Return true if the named user exists
pub async fn user_exists(client: &OpenShiftClient, name: &str) -> ClusterResult<bool> {
    match get_user(client, name).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create a new user. The full name defaults to the user name.
pub async fn create_user(
    client: &OpenShiftClient,
    name: &str,
    full_name: Option<&str>,
) -> ClusterResult<User> {
    info!("create user {}", name);

    let user = User::new(name, full_name.unwrap_or(name));
    let users: Api<User> = Api::all(client.inner().clone());
    users.create(&PostParams::default(), &user).await?;

    Ok(user)
}

/// Delete a user; absent users are a not-found error
pub async fn delete_user(client: &OpenShiftClient, name: &str) -> ClusterResult<()> {
    info!("delete user {}", name);
    get_user(client, name).await?;

    let users: Api<User> = Api::all(client.inner().clone());
    users.delete(name, &DeleteParams::default()).await?;

    Ok(())
}

/// Look up the identity for a user at the configured provider
pub async fn get_identity(
    client: &OpenShiftClient,
    provider: &str,
    username: &str,
) -> ClusterResult<Identity> {
    let name = qualified_name(provider, username);
    let identities: Api<Identity> = Api::all(client.inner().clone());
    identities
        .get(&name)
        .await
        .map_err(|e| not_found_or(e, "identity", username))
}

/// Return true if the identity for the user exists
pub async fn identity_exists(
    client: &OpenShiftClient,
    provider: &str,
    username: &str,
) -> ClusterResult<bool> {
    match get_identity(client, provider, username).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create the identity for a user at the configured provider
pub async fn create_identity(
    client: &OpenShiftClient,
    provider: &str,
    username: &str,
) -> ClusterResult<Identity> {
    info!("create identity for {}", username);

    let identity = Identity::new(provider, username);
    let identities: Api<Identity> = Api::all(client.inner().clone());
    identities.create(&PostParams::default(), &identity).await?;

    Ok(identity)
}

/// Delete the identity for a user, tolerating absence
pub async fn delete_identity(
    client: &OpenShiftClient,
    provider: &str,
    username: &str,
) -> ClusterResult<()> {
    info!("delete identity for {}", username);

    if identity_exists(client, provider, username).await? {
        let name = qualified_name(provider, username);
        let identities: Api<Identity> = Api::all(client.inner().clone());
        identities.delete(&name, &DeleteParams::default()).await?;
    }

    Ok(())
}

/// Create the mapping linking a user to their identity
pub async fn create_user_identity_mapping(
    client: &OpenShiftClient,
    provider: &str,
    username: &str,
) -> ClusterResult<UserIdentityMapping> {
    info!("create identity mapping for {}", username);

    let mapping = UserIdentityMapping::new(provider, username);
    let mappings: Api<UserIdentityMapping> = Api::all(client.inner().clone());
    mappings.create(&PostParams::default(), &mapping).await?;

    Ok(mapping)
}

/// Create a user and associated resources.
///
/// Creates the User, an Identity, and a UserIdentityMapping. Failure
/// part-way through tears the bundle down and reports the original error.
pub async fn create_user_bundle(
    client: &OpenShiftClient,
    provider: &str,
    name: &str,
    full_name: Option<&str>,
) -> ClusterResult<User> {
    info!("create user bundle for {}", name);

    if user_exists(client, name).await? {
        return Err(ClusterError::AlreadyExists {
            kind: "user",
            name: name.to_string(),
        });
    }

    let user = create_user(client, name, full_name).await?;

    let identity_result = async {
        create_identity(client, provider, name).await?;
        create_user_identity_mapping(client, provider, name).await?;
        Ok::<_, ClusterError>(())
    }
    .await;

    if let Err(e) = identity_result {
        error!(
            "deleting user {} due to failure creating identity or mapping",
            name
        );
        if let Err(cleanup) = delete_user_bundle(client, provider, name).await {
            error!("rollback of user {} failed: {}", name, cleanup);
        }
        return Err(e);
    }

    Ok(user)
}

/// Delete a user and associated resources.
///
/// The identity mapping is removed implicitly with the Identity; absent
/// identities are tolerated, absent users are not.
pub async fn delete_user_bundle(
    client: &OpenShiftClient,
    provider: &str,
    name: &str,
) -> ClusterResult<()> {
    info!("delete user bundle for {}", name);

    delete_identity(client, provider, name).await?;
    groups::remove_user_from_all_groups(client, name).await?;
    delete_user(client, name).await?;

    Ok(())
}
