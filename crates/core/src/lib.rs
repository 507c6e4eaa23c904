//! `primapos-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog, staff,
//! pricing and transaction crates (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod page;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, TransactionId, UserId};
pub use money::Money;
pub use page::{DEFAULT_PAGE_SIZE, Page, PageRequest};
pub use value_object::ValueObject;
