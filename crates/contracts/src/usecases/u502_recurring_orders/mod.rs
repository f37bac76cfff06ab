pub mod request;
pub mod response;

pub use request::{GenerateRequest, RecurrenceKind, RecurrenceRule, WorkOrderTemplate};
pub use response::GenerateResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct RecurringOrders;

impl UseCaseMetadata for RecurringOrders {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "recurring_orders"
    }

    fn display_name() -> &'static str {
        "Генерация повторяющихся нарядов"
    }

    fn description() -> &'static str {
        "Разворачивает правило повторения в серию нарядов через внешний API"
    }
}
