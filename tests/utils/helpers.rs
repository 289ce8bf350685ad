//! Test doubles for the import pipeline's remote collaborators
use async_trait::async_trait;
use propdesk_lib::modules::data_import::{
    EntityGateway, EntitySpec, ImportService, InvalidationNotifier,
};
use propdesk_lib::shared::{AppError, AppResult, ImportConfig};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

type FailureRule = Box<dyn Fn(&Value) -> Option<AppError> + Send + Sync>;

/// Records every create call and fails the ones matching `fail_when`
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<(String, Value)>>,
    fail_when: Option<FailureRule>,
}

impl RecordingGateway {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_when<F>(rule: F) -> Arc<Self>
    where
        F: Fn(&Value) -> Option<AppError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_when: Some(Box::new(rule)),
        })
    }

    /// Backend that is down for every request
    pub fn unreachable() -> Arc<Self> {
        Self::failing_when(|_| {
            Some(AppError::ExternalServiceError(
                "Failed to connect to external service".to_string(),
            ))
        })
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EntityGateway for RecordingGateway {
    async fn create(&self, endpoint_path: &str, payload: &Value) -> AppResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint_path.to_string(), payload.clone()));

        if let Some(rule) = &self.fail_when {
            if let Some(err) = rule(payload) {
                return Err(err);
            }
        }
        Ok(json!({ "id": format!("created-{}", self.call_count()) }))
    }
}

/// Records every invalidation signal; can be told to fail
#[derive(Default)]
pub struct RecordingNotifier {
    signals: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            signals: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn signals(&self) -> Vec<(String, String)> {
        self.signals.lock().unwrap().clone()
    }
}

#[async_trait]
impl InvalidationNotifier for RecordingNotifier {
    async fn notify(&self, organization_id: &str, spec: &EntitySpec) -> AppResult<()> {
        self.signals
            .lock()
            .unwrap()
            .push((organization_id.to_string(), spec.listing_path().to_string()));
        if self.fail {
            Err(AppError::ExternalServiceError("revalidate unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

pub struct TestServices {
    pub import_service: ImportService,
    pub gateway: Arc<RecordingGateway>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Build an import service over recording fakes with default (sequential) config
pub fn build_test_services(gateway: Arc<RecordingGateway>) -> TestServices {
    build_test_services_with(gateway, RecordingNotifier::new(), ImportConfig::default())
}

pub fn build_test_services_with(
    gateway: Arc<RecordingGateway>,
    notifier: Arc<RecordingNotifier>,
    config: ImportConfig,
) -> TestServices {
    let import_service = ImportService::new(gateway.clone(), notifier.clone(), &config);

    TestServices {
        import_service,
        gateway,
        notifier,
    }
}
