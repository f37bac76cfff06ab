use serde::{Deserialize, Serialize};

/// Итог генерации серии нарядов. Атомарности по серии нет:
/// провал одной даты не откатывает уже созданные наряды.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Сколько нарядов создано во внешнем API
    pub created_count: u32,

    /// Сколько дат провалилось при создании
    pub failed_count: u32,

    /// Ошибки по датам, в порядке календаря
    pub errors: Vec<String>,
}
