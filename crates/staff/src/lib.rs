//! Staff users: administrators, mechanics and cashiers.
//!
//! There is no authentication here; the directory only answers "who exists"
//! for the settings screen and for assigning mechanics to sales.

pub mod directory;
pub mod user;

pub use directory::{InMemoryUserDirectory, UserDirectory, UserQuery};
pub use user::{Role, User, UserDraft, UserStatus, initials};
