use super::schedule;
use crate::shared::crm_client::CrmApi;
use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a002_work_order::{WorkOrderDraft, WorkOrderStatus};
use contracts::usecases::common::MAX_REPORTED_ERRORS;
use contracts::usecases::u502_recurring_orders::{
    GenerateRequest, GenerateResponse, WorkOrderTemplate,
};
use std::sync::Arc;

/// Executor генерации повторяющихся нарядов: разворачивает правило в
/// даты и создает по одному наряду на дату через внешний API.
pub struct GenerateExecutor {
    crm: Arc<dyn CrmApi>,
}

impl GenerateExecutor {
    pub fn new(crm: Arc<dyn CrmApi>) -> Self {
        Self { crm }
    }

    /// Выполнить генерацию. Вызовы идут последовательно и независимо:
    /// провал даты фиксируется и не откатывает уже созданные наряды.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let dates = schedule::generate_dates(&request.rule)?;

        tracing::info!(
            "Generating recurring work orders: customer={}, dates={}",
            request.template.customer_id,
            dates.len()
        );

        if request.template.auto_approve {
            // Автоапрув действует только на одиночные наряды;
            // развертывание правила всегда создает черновики
            tracing::debug!("auto_approve ignored for recurring expansion");
        }

        let mut created_count = 0;
        let mut failed_count = 0;
        let mut errors = Vec::new();

        for date in dates {
            let draft = draft_for_date(&request.template, date);

            match self.crm.create_work_order(&draft).await {
                Ok(order) => {
                    tracing::debug!("Work order created: {} on {}", order.base.code, order.date);
                    created_count += 1;
                }
                Err(e) => {
                    failed_count += 1;
                    tracing::warn!("Work order for {} failed: {}", date, e);
                    if errors.len() < MAX_REPORTED_ERRORS {
                        errors.push(format!("{}: {}", date, e));
                    }
                }
            }
        }

        tracing::info!(
            "Recurring generation completed: created={}, failed={}",
            created_count,
            failed_count
        );

        Ok(GenerateResponse {
            created_count,
            failed_count,
            errors,
        })
    }
}

/// Наряд из шаблона на конкретную дату: статус всегда draft,
/// независимо от auto_approve в шаблоне
fn draft_for_date(template: &WorkOrderTemplate, date: NaiveDate) -> WorkOrderDraft {
    WorkOrderDraft {
        customer_id: template.customer_id.clone(),
        personnel_ids: template.personnel_ids.clone(),
        date,
        description: template.description.clone(),
        total_amount: template.total_amount,
        paid_amount: template.paid_amount,
        status: WorkOrderStatus::Draft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contracts::domain::a001_customer::{Customer, CustomerDraft};
    use contracts::domain::a002_work_order::{WorkOrder, WorkOrderId};
    use contracts::domain::common::BaseAggregate;
    use contracts::usecases::u502_recurring_orders::{RecurrenceKind, RecurrenceRule};
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockCrm {
        fail_dates: Vec<NaiveDate>,
        orders: Mutex<Vec<WorkOrderDraft>>,
    }

    /// Наряд, который внешний CRM вернул бы на create-work-order
    fn created_order(draft: &WorkOrderDraft) -> WorkOrder {
        WorkOrder {
            base: BaseAggregate::new(
                WorkOrderId::new_v4(),
                format!("WRK-{}", draft.date),
                draft.description.clone(),
            ),
            customer_id: draft.customer_id.clone(),
            personnel_ids: draft.personnel_ids.clone(),
            date: draft.date,
            status: draft.status,
            total_amount: draft.total_amount,
            paid_amount: draft.paid_amount,
        }
    }

    #[async_trait]
    impl CrmApi for MockCrm {
        async fn check_session(&self) -> Result<()> {
            Ok(())
        }

        async fn create_customer(&self, _draft: &CustomerDraft) -> Result<Customer> {
            unreachable!("generator never creates customers")
        }

        async fn create_work_order(&self, draft: &WorkOrderDraft) -> Result<WorkOrder> {
            if self.fail_dates.contains(&draft.date) {
                anyhow::bail!("personnel conflict");
            }
            self.orders.lock().unwrap().push(draft.clone());
            Ok(created_order(draft))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_request(auto_approve: bool) -> GenerateRequest {
        GenerateRequest {
            rule: RecurrenceRule {
                kind: RecurrenceKind::Weekly,
                start_date: date(2026, 3, 2),
                end_date: date(2026, 3, 23),
                anchor_weekday: Some(3),
                anchor_day_of_month: None,
                anchor_week_of_month: None,
            },
            template: WorkOrderTemplate {
                customer_id: "c-42".to_string(),
                personnel_ids: BTreeSet::from(["p-1".to_string(), "p-2".to_string()]),
                description: "Haftalık ofis temizliği".to_string(),
                total_amount: 1500.0,
                paid_amount: 0.0,
                auto_approve,
            },
        }
    }

    #[tokio::test]
    async fn creates_one_order_per_date() {
        let crm = Arc::new(MockCrm::default());
        let executor = GenerateExecutor::new(Arc::clone(&crm) as Arc<dyn CrmApi>);

        let response = executor.generate(weekly_request(false)).await.unwrap();

        assert_eq!(response.created_count, 3);
        assert_eq!(response.failed_count, 0);

        let orders = crm.orders.lock().unwrap();
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].date, date(2026, 3, 4));
        assert_eq!(orders[0].customer_id, "c-42");
        assert_eq!(orders[0].personnel_ids.len(), 2);
    }

    #[tokio::test]
    async fn recurring_orders_stay_draft_despite_auto_approve() {
        let crm = Arc::new(MockCrm::default());
        let executor = GenerateExecutor::new(Arc::clone(&crm) as Arc<dyn CrmApi>);

        executor.generate(weekly_request(true)).await.unwrap();

        for order in crm.orders.lock().unwrap().iter() {
            assert_eq!(order.status, WorkOrderStatus::Draft);
        }
    }

    #[tokio::test]
    async fn failed_date_does_not_roll_back_created_orders() {
        let crm = Arc::new(MockCrm {
            fail_dates: vec![date(2026, 3, 11)],
            ..Default::default()
        });
        let executor = GenerateExecutor::new(Arc::clone(&crm) as Arc<dyn CrmApi>);

        let response = executor.generate(weekly_request(false)).await.unwrap();

        assert_eq!(response.created_count, 2);
        assert_eq!(response.failed_count, 1);
        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].starts_with("2026-03-11"));

        // Первая и третья даты созданы
        let orders = crm.orders.lock().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].date, date(2026, 3, 18));
    }

    #[tokio::test]
    async fn invalid_rule_creates_nothing() {
        let crm = Arc::new(MockCrm::default());
        let executor = GenerateExecutor::new(Arc::clone(&crm) as Arc<dyn CrmApi>);

        let mut request = weekly_request(false);
        request.rule.end_date = date(2026, 2, 1); // раньше start_date

        assert!(executor.generate(request).await.is_err());
        assert!(crm.orders.lock().unwrap().is_empty());
    }
}
