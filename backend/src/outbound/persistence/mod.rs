//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows
//!   and domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leak to the domain layer.
//! - **Parameterized queries**: domain filters compile to Diesel
//!   expressions; caller-controlled values are always bind parameters.
//! - **Strongly typed errors**: database failures map to the port error
//!   enums.

pub(crate) mod diesel_helpers;
mod diesel_article_repository;
mod diesel_category_repository;
mod diesel_history_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_history_repository::DieselHistoryRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
