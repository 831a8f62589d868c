use grant_flow::config::GrantPolicyConfig;
use grant_flow::workflows::grants::InMemoryGrantFacade;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local facade; every store lives only as long as the process.
pub(crate) fn in_memory_facade(policy: GrantPolicyConfig) -> Arc<InMemoryGrantFacade> {
    Arc::new(InMemoryGrantFacade::in_memory(policy))
}
