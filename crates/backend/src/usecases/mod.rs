pub mod u501_import_customers;
pub mod u502_recurring_orders;
