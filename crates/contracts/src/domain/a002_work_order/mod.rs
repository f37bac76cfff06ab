pub mod aggregate;

pub use aggregate::{WorkOrder, WorkOrderDraft, WorkOrderId, WorkOrderStatus};
