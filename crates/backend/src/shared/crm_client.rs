use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a001_customer::{Customer, CustomerDraft};
use contracts::domain::a002_work_order::{WorkOrder, WorkOrderDraft};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::config::CrmConfig;

/// Абстракция над внешним CRM API: авторизованный request/response.
/// Retry-политика и refresh токена — зона ответственности самого CRM,
/// здесь только вызовы. В тестах заменяется mock-реализацией.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Проверка живости сессии; вызывается один раз перед импортом
    async fn check_session(&self) -> Result<()>;

    /// POST create-customer; возвращает созданную запись,
    /// ошибка трактуется как провал одной строки
    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer>;

    /// POST create-work-order; возвращает созданный наряд,
    /// ошибка трактуется как провал одной даты
    async fn create_work_order(&self, draft: &WorkOrderDraft) -> Result<WorkOrder>;
}

/// HTTP-клиент внешнего CRM API (bearer-токен, JSON body)
pub struct HttpCrmClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpCrmClient {
    pub fn new(config: &CrmConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("CRM API request failed: POST {} -> {}: {}", url, status, body);
            anyhow::bail!("CRM API request failed with status {}: {}", status, body);
        }

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl CrmApi for HttpCrmClient {
    async fn check_session(&self) -> Result<()> {
        let url = format!("{}/api/auth/session", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Session check failed: {}", status);
            anyhow::bail!("Session check failed with status {}", status);
        }

        Ok(())
    }

    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer> {
        self.post_json("/api/customers", draft).await
    }

    async fn create_work_order(&self, draft: &WorkOrderDraft) -> Result<WorkOrder> {
        self.post_json("/api/work-orders", draft).await
    }
}
