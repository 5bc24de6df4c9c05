use loan_origination::auth::{AuthService, InMemoryUserRepository};
use loan_origination::config::AuthConfig;
use loan_origination::records::{RecordService, RecordStores};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Domain services shared by every request handler.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) auth: Arc<AuthService>,
    pub(crate) records: Arc<RecordService>,
}

impl Services {
    /// Wire the in-memory user and record stores behind the domain services.
    pub(crate) fn in_memory(auth: &AuthConfig) -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        Self {
            auth: Arc::new(AuthService::from_config(auth, users)),
            records: Arc::new(RecordService::new(RecordStores::in_memory())),
        }
    }
}
