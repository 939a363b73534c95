//! Account lifecycle: registration, approval, login gating, password
//! policy, and reset tokens. Hashing and mail delivery stay behind seams.

pub mod domain;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;
pub mod tokens;

pub use domain::{
    AccountStatus, LoginOutcome, NewAccount, PasswordChangeReason, Role, UserAccount,
};
pub use password::{
    is_password_expired, validate_policy, PasswordCheck, PasswordHasher, PolicyViolation,
    Sha256PasswordHasher, PASSWORD_MIN_LEN,
};
pub use repository::{AccountRepositoryError, UserRepository};
pub use router::account_router;
pub use service::{AccountService, AccountServiceError, SuperadminSeed};
pub use tokens::ResetToken;
