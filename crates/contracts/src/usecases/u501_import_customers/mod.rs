pub mod progress;
pub mod request;
pub mod response;

pub use progress::{ImportProgress, ImportStatus};
pub use request::ImportRequest;
pub use response::{ImportReport, ImportResponse, ImportStartStatus};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportCustomers;

impl UseCaseMetadata for ImportCustomers {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_customers"
    }

    fn display_name() -> &'static str {
        "Импорт клиентов из CSV"
    }

    fn description() -> &'static str {
        "Загрузка клиентов из CSV-файла с передачей во внешний CRM API"
    }
}
