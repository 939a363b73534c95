use super::domain::UserAccount;

/// Storage abstraction for account rows, keyed by username.
pub trait UserRepository: Send + Sync {
    fn insert(&self, account: UserAccount) -> Result<UserAccount, AccountRepositoryError>;
    fn update(&self, account: UserAccount) -> Result<(), AccountRepositoryError>;
    fn fetch(&self, username: &str) -> Result<Option<UserAccount>, AccountRepositoryError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountRepositoryError>;
    fn list(&self) -> Result<Vec<UserAccount>, AccountRepositoryError>;
}

/// Error enumeration for account storage failures.
#[derive(Debug, thiserror::Error)]
pub enum AccountRepositoryError {
    #[error("account already exists")]
    Conflict,
    #[error("account not found")]
    NotFound,
    #[error("account repository unavailable: {0}")]
    Unavailable(String),
}
