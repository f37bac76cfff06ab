use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
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

impl AggregateId for CustomerId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CustomerId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Типы
// ============================================================================

/// Тип клиента в CRM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    /// Обычный (частный) клиент
    #[default]
    Normal,
    /// Корпоративный клиент
    Corporate,
}

// ============================================================================
// Aggregate Root
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomerId>,

    pub phone: String,
    pub address: String,

    #[serde(rename = "customerType", default)]
    pub customer_type: CustomerType,

    /// Текущий баланс клиента (долг/переплата)
    #[serde(default)]
    pub balance: f64,

    #[serde(default)]
    pub notes: String,
}

// ============================================================================
// Draft для внешнего endpoint'а create-customer
// ============================================================================

/// Нормализованная запись клиента из одной строки CSV.
/// Отправляется во внешний CRM API как есть; локально не сохраняется.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub notes: String,
    pub balance: f64,
}

impl CustomerDraft {
    /// Создать draft с дефолтами импортера: тип всегда "normal", баланс 0
    pub fn new(name: String, phone: String, address: String, notes: String) -> Self {
        Self {
            name,
            phone,
            address,
            customer_type: CustomerType::Normal,
            notes,
            balance: 0.0,
        }
    }
}
