use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Вид правила повторения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    /// Каждую неделю в заданный день недели
    Weekly,
    /// Раз в две недели в заданный день недели
    Biweekly,
    /// Каждый месяц в заданное число
    MonthlyDate,
    /// Каждый месяц в N-е вхождение дня недели ("3-я среда")
    MonthlyWeekday,
}

/// Правило повторения. Инвариант: end_date >= start_date, обе границы
/// включительно. Дни недели нумеруются 0-6, где 0 = воскресенье
/// (как в исходном UI-слое).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub kind: RecurrenceKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Для weekly/biweekly/monthly_weekday: день недели 0-6
    #[serde(default)]
    pub anchor_weekday: Option<u8>,

    /// Для monthly_date: число месяца 1-31
    #[serde(default)]
    pub anchor_day_of_month: Option<u32>,

    /// Для monthly_weekday: номер вхождения 1-4
    #[serde(default)]
    pub anchor_week_of_month: Option<u32>,
}

/// Шаблон наряда, из которого создается каждая повторяющаяся запись
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrderTemplate {
    pub customer_id: String,
    #[serde(default)]
    pub personnel_ids: BTreeSet<String>,
    pub description: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub paid_amount: f64,

    /// Игнорируется при развертывании правила: повторяющиеся наряды
    /// всегда создаются в статусе draft
    #[serde(default)]
    pub auto_approve: bool,
}

/// Запрос на генерацию серии нарядов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub rule: RecurrenceRule,
    pub template: WorkOrderTemplate,
}
