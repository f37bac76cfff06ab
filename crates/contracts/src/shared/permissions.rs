use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Роль пользователя back-office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Полный доступ
    Admin,
    /// Операционный менеджер: клиенты, наряды, персонал
    Manager,
    /// Бухгалтерия: деньги и отчеты
    Accountant,
    /// Выездной персонал: только свои наряды
    Field,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "accountant" => Ok(Role::Accountant),
            "field" => Ok(Role::Field),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Функциональные возможности, видимые в UI (пункты меню, кнопки)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Customers,
    WorkOrders,
    Personnel,
    Payroll,
    CashFlow,
    Invoices,
    Reports,
    CsvImport,
    RecurringOrders,
}

// Явная карта роль -> allow-set. Видимость меню определяется только
// этой таблицей; никакого глобального состояния.

const ADMIN_FEATURES: &[Feature] = &[
    Feature::Customers,
    Feature::WorkOrders,
    Feature::Personnel,
    Feature::Payroll,
    Feature::CashFlow,
    Feature::Invoices,
    Feature::Reports,
    Feature::CsvImport,
    Feature::RecurringOrders,
];

const MANAGER_FEATURES: &[Feature] = &[
    Feature::Customers,
    Feature::WorkOrders,
    Feature::Personnel,
    Feature::Reports,
    Feature::CsvImport,
    Feature::RecurringOrders,
];

const ACCOUNTANT_FEATURES: &[Feature] = &[
    Feature::Customers,
    Feature::Payroll,
    Feature::CashFlow,
    Feature::Invoices,
    Feature::Reports,
];

const FIELD_FEATURES: &[Feature] = &[Feature::WorkOrders];

/// Allow-set возможностей для роли
pub fn allowed_features(role: Role) -> &'static [Feature] {
    match role {
        Role::Admin => ADMIN_FEATURES,
        Role::Manager => MANAGER_FEATURES,
        Role::Accountant => ACCOUNTANT_FEATURES,
        Role::Field => FIELD_FEATURES,
    }
}

/// Доступна ли возможность роли
pub fn is_allowed(role: Role, feature: Feature) -> bool {
    allowed_features(role).contains(&feature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_sees_everything() {
        for feature in [
            Feature::Customers,
            Feature::Payroll,
            Feature::CsvImport,
            Feature::RecurringOrders,
        ] {
            assert!(is_allowed(Role::Admin, feature));
        }
    }

    #[test]
    fn field_staff_sees_only_work_orders() {
        assert!(is_allowed(Role::Field, Feature::WorkOrders));
        assert!(!is_allowed(Role::Field, Feature::Customers));
        assert!(!is_allowed(Role::Field, Feature::Payroll));
        assert!(!is_allowed(Role::Field, Feature::CsvImport));
    }

    #[test]
    fn accountant_has_money_but_not_scheduling() {
        assert!(is_allowed(Role::Accountant, Feature::CashFlow));
        assert!(is_allowed(Role::Accountant, Feature::Invoices));
        assert!(!is_allowed(Role::Accountant, Feature::Personnel));
        assert!(!is_allowed(Role::Accountant, Feature::RecurringOrders));
    }

    #[test]
    fn role_parses_from_path_segment() {
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert!("ceo".parse::<Role>().is_err());
    }
}
