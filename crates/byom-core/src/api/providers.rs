//! Model provider administration endpoints (`/admin/providers`).

use crate::models::{NewProvider, Provider, ProviderTest, ProviderUpdate};

use super::{ApiClient, ApiError};

const PROVIDERS_PATH: &str = "/admin/providers";

impl ApiClient {
    /// List providers in the workspace the current token belongs to
    pub async fn list_providers(&self) -> Result<Vec<Provider>, ApiError> {
        self.get_json(&format!("{}/", PROVIDERS_PATH)).await
    }

    pub async fn get_provider(&self, provider_id: i64) -> Result<Provider, ApiError> {
        self.get_json(&format!("{}/{}", PROVIDERS_PATH, provider_id)).await
    }

    pub async fn create_provider(&self, provider: &NewProvider) -> Result<Provider, ApiError> {
        self.post_json(&format!("{}/", PROVIDERS_PATH), provider).await
    }

    pub async fn update_provider(
        &self,
        provider_id: i64,
        update: &ProviderUpdate,
    ) -> Result<Provider, ApiError> {
        self.put_json(&format!("{}/{}", PROVIDERS_PATH, provider_id), update).await
    }

    /// Admin-only on the backend; other roles get `AccessDenied`
    pub async fn delete_provider(&self, provider_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", PROVIDERS_PATH, provider_id)).await
    }

    /// Ask the backend to check connectivity to the provider's upstream API
    pub async fn test_provider(&self, provider_id: i64) -> Result<ProviderTest, ApiError> {
        self.post_json(&format!("{}/{}/test", PROVIDERS_PATH, provider_id), &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::ProviderType;

    fn provider_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id, "name": name, "type": "openai", "base_url": "https://api.openai.com/v1",
            "headers": null, "config": null, "is_active": true, "workspace_id": 1,
            "created_at": "2024-05-01T12:00:00", "updated_at": "2024-05-01T12:00:00"
        })
    }

    async fn client(server: &MockServer) -> ApiClient {
        ApiClient::builder(format!("{}/api", server.uri())).build().unwrap()
    }

    #[tokio::test]
    async fn test_list_providers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/providers/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                provider_json(1, "primary"),
                provider_json(2, "backup"),
            ])))
            .mount(&server)
            .await;

        let providers = client(&server).await.list_providers().await.unwrap();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[1].name, "backup");
    }

    #[tokio::test]
    async fn test_create_provider_sends_type_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/providers/"))
            .and(body_partial_json(serde_json::json!({"name": "primary", "type": "openai", "api_key": "sk-test"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(provider_json(5, "primary")))
            .expect(1)
            .mount(&server)
            .await;

        let new = NewProvider {
            name: "primary".to_string(),
            provider_type: ProviderType::OpenAi,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: Some("sk-test".to_string()),
            headers: None,
            config: None,
        };
        let created = client(&server).await.create_provider(&new).await.unwrap();
        assert_eq!(created.id, 5);
    }

    #[tokio::test]
    async fn test_update_provider_sends_partial_body() {
        let server = MockServer::start().await;
        let mut updated = provider_json(4, "primary");
        updated["is_active"] = serde_json::json!(false);
        Mock::given(method("PUT"))
            .and(path("/api/admin/providers/4"))
            .and(body_json(serde_json::json!({"is_active": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .expect(1)
            .mount(&server)
            .await;

        let provider = client(&server)
            .await
            .update_provider(4, &ProviderUpdate::active(false))
            .await
            .unwrap();
        assert!(!provider.is_active);
    }

    #[tokio::test]
    async fn test_delete_provider_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/providers/9"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({"detail": "Only admins can delete providers"})))
            .mount(&server)
            .await;

        let err = client(&server).await.delete_provider(9).await.unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied(_)));
        assert_eq!(err.detail().as_deref(), Some("Only admins can delete providers"));
    }

    #[tokio::test]
    async fn test_test_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/providers/3/test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false, "message": "Connection failed", "latency_ms": null, "error": "timeout"
            })))
            .mount(&server)
            .await;

        let result = client(&server).await.test_provider(3).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("timeout"));
    }
}
