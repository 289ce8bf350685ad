pub mod api_client;
pub mod retry_policy;

pub use api_client::ApiClient;
pub use retry_policy::RetryPolicy;
