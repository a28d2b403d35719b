//! Request and response bodies

pub mod auth;
pub mod loan;
pub mod profile;

pub use auth::*;
pub use loan::*;
pub use profile::*;
