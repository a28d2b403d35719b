//! Account management: registration, role-scoped login and profile upkeep.

mod service;
mod types;


pub use service::AccountService;
pub use types::{ProfileUpdate, Registration};
