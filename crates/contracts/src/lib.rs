//! Общие контракты данных: доменные агрегаты, типы usecases,
//! карта прав доступа. Используются backend'ом и любым UI-слоем.

pub mod domain;
pub mod shared;
pub mod usecases;
