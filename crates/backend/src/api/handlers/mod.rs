pub mod permissions;
pub mod usecases;
