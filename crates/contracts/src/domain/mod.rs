pub mod common;

pub mod a001_customer;
pub mod a002_work_order;
