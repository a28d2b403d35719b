//! Business services containing domain logic and use cases.

pub mod account;
pub mod clock;
pub mod loan;
pub mod password;
pub mod rate_limit;
pub mod recovery;
pub mod token;

// Re-export commonly used types
pub use account::{AccountService, ProfileUpdate, Registration};
pub use clock::{Clock, ManualClock, SystemClock};
pub use loan::LoanService;
pub use password::{BcryptPasswordHasher, PasswordHasher};
pub use rate_limit::{InMemoryRateLimiter, RateLimiterTrait};
pub use recovery::{CodeIssued, CredentialRecoveryService, NotifierTrait, RecoveryServiceConfig};
pub use token::{AuthVerifier, TokenService, TokenServiceConfig};
