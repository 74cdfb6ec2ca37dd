//! SQL for each table, as free functions over a connection.
//!
//! Callers pass the transaction (it derefs to `Connection`) so every
//! statement of one engine operation shares the same write lock.

pub mod answer;
pub mod component;
pub mod questionnaire;
