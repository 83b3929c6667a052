//! Application State
//!
//! Shared state for the onramp API server. Everything here is read-only
//! after startup; the kube client is internally pooled and cheap to clone.

use std::sync::Arc;

use crate::config::OnrampConfig;
use crate::openshift::client::OpenShiftClient;
use onramp_common::quota::QuotaFile;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OnrampConfig>,
    pub quota_file: Arc<QuotaFile>,
    pub openshift: OpenShiftClient,
}
