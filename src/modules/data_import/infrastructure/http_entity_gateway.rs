use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::http_client::ApiClient;
use crate::modules::data_import::application::ports::EntityGateway;
use crate::shared::errors::AppResult;

/// Creates entities through the backend's REST endpoints
pub struct HttpEntityGateway {
    client: Arc<ApiClient>,
}

impl HttpEntityGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityGateway for HttpEntityGateway {
    async fn create(&self, endpoint_path: &str, payload: &Value) -> AppResult<Value> {
        self.client.post_json(endpoint_path, payload).await
    }
}
