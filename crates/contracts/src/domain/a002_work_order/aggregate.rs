use crate::domain::common::{AggregateId, BaseAggregate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkOrderId(pub Uuid);

impl WorkOrderId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for WorkOrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(WorkOrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Статусы
// ============================================================================

/// Жизненный цикл наряда: draft -> approved -> completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkOrderStatus {
    #[default]
    Draft,
    Approved,
    Completed,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Наряд на уборку: запланированная работа для клиента
/// с назначенным персоналом и суммами (начислено/получено)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    #[serde(flatten)]
    pub base: BaseAggregate<WorkOrderId>,

    #[serde(rename = "customerId")]
    pub customer_id: String,

    #[serde(rename = "personnelIds", default)]
    pub personnel_ids: BTreeSet<String>,

    pub date: NaiveDate,
    pub status: WorkOrderStatus,

    #[serde(rename = "totalAmount", default)]
    pub total_amount: f64,
    #[serde(rename = "paidAmount", default)]
    pub paid_amount: f64,
}

// ============================================================================
// Draft для внешнего endpoint'а create-work-order
// ============================================================================

/// Payload наряда для внешнего API. Один draft на каждую
/// сгенерированную дату; отправляется независимо от остальных.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderDraft {
    pub customer_id: String,
    pub personnel_ids: BTreeSet<String>,
    pub date: NaiveDate,
    pub description: String,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub status: WorkOrderStatus,
}
