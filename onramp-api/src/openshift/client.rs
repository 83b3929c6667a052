//! OpenShift client wrapper
//!
//! Wraps the kube-rs Client with the connection logic this service needs:
//! an explicit kubeconfig when configured, otherwise in-cluster
//! configuration with a kubeconfig fallback.

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;
use tracing::info;

use super::error::{ClusterError, ClusterResult};
use crate::config::OpenShiftConfig;

/// Wrapper around the kube-rs Client
#[derive(Clone)]
pub struct OpenShiftClient {
    inner: Client,
}

impl OpenShiftClient {
    /// Connect using the service configuration.
    ///
    /// An explicit kubeconfig path wins; otherwise in-cluster configuration
    /// is tried first, then the default kubeconfig.
    pub async fn connect(config: &OpenShiftConfig) -> ClusterResult<Self> {
        match &config.kubeconfig {
            Some(path) => Self::from_kubeconfig(path, config.context.as_deref()).await,
            None => Self::infer().await,
        }
    }

    /// Create a client from a kubeconfig file with an optional context
    pub async fn from_kubeconfig(path: &Path, context: Option<&str>) -> ClusterResult<Self> {
        let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
            ClusterError::InvalidConfig(format!("failed to read kubeconfig: {e}"))
        })?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| ClusterError::InvalidConfig(format!("failed to create config: {e}")))?;

        info!("connecting to cluster at {}", config.cluster_url);
        let client = Client::try_from(config)?;

        Ok(Self { inner: client })
    }

    /// Create a client from the ambient environment (in-cluster first,
    /// then the default kubeconfig)
    pub async fn infer() -> ClusterResult<Self> {
        let config = Config::infer().await.map_err(|e| {
            ClusterError::InvalidConfig(format!("failed to infer cluster config: {e}"))
        })?;

        info!("connecting to cluster at {}", config.cluster_url);
        let client = Client::try_from(config)?;

        Ok(Self { inner: client })
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Check that the cluster API answers at all
    pub async fn health_check(&self) -> ClusterResult<()> {
        self.inner.apiserver_version().await?;
        Ok(())
    }
}

impl std::fmt::Debug for OpenShiftClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenShiftClient").finish()
    }
}
