use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::config::AccountPolicyConfig;
use crate::notify::{
    account_approved_email, password_reset_email, set_password_invite_email, EmailNotifier,
    NotifyError,
};

use super::domain::{
    AccountStatus, LoginOutcome, NewAccount, PasswordChangeReason, Role, UserAccount,
};
use super::password::{is_password_expired, validate_policy, PasswordHasher, PolicyViolation};
use super::repository::{AccountRepositoryError, UserRepository};
use super::tokens::ResetToken;

/// Seed data for the bootstrap superadmin account.
#[derive(Debug, Clone)]
pub struct SuperadminSeed {
    pub username: String,
    pub full_name: String,
    pub employee_id: String,
    pub email: String,
    /// When absent the account is created without a password and flagged for
    /// a forced reset through the invite flow.
    pub initial_password: Option<String>,
}

/// Service composing the user repository, hashing seam, and mail notifier.
pub struct AccountService<U, H, N> {
    users: Arc<U>,
    hasher: Arc<H>,
    notifier: Arc<N>,
    policy: AccountPolicyConfig,
}

impl<U, H, N> AccountService<U, H, N>
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    N: EmailNotifier + 'static,
{
    pub fn new(users: Arc<U>, hasher: Arc<H>, notifier: Arc<N>, policy: AccountPolicyConfig) -> Self {
        Self {
            users,
            hasher,
            notifier,
            policy,
        }
    }

    /// Guarantees the superadmin account exists so the review workflows are
    /// never locked out.
    pub fn bootstrap_superadmin(
        &self,
        seed: SuperadminSeed,
        now: NaiveDateTime,
    ) -> Result<(), AccountServiceError> {
        if self.users.fetch(&seed.username)?.is_some() {
            return Ok(());
        }

        warn!(username = %seed.username, "no superadmin found, creating the default account");
        let (password_hash, last_password_change, force_password_reset) =
            match seed.initial_password.as_deref() {
                Some(password) => (self.hasher.hash(password), Some(now), false),
                None => (String::new(), None, true),
            };

        self.users.insert(UserAccount {
            username: seed.username,
            password_hash,
            role: Role::SuperAdmin,
            full_name: seed.full_name,
            employee_id: seed.employee_id,
            email: seed.email,
            status: AccountStatus::Approved,
            accepted_terms_on: None,
            reset_token: None,
            last_password_change,
            force_password_reset,
        })?;
        Ok(())
    }

    /// Registers a new account in pending status, awaiting admin approval.
    /// The chosen password starts its expiry clock at registration.
    pub fn register(
        &self,
        form: NewAccount,
        now: NaiveDateTime,
    ) -> Result<UserAccount, AccountServiceError> {
        validate_policy(&form.password, &form.username, &form.email)
            .map_err(AccountServiceError::PolicyViolations)?;

        if self.users.fetch(&form.username)?.is_some() {
            return Err(AccountRepositoryError::Conflict.into());
        }

        let account = UserAccount {
            username: form.username,
            password_hash: self.hasher.hash(&form.password),
            role: Role::User,
            full_name: form.full_name,
            employee_id: form.employee_id,
            email: form.email,
            status: AccountStatus::Pending,
            accepted_terms_on: None,
            reset_token: None,
            last_password_change: Some(now),
            force_password_reset: false,
        };

        let stored = self.users.insert(account)?;
        info!(username = %stored.username, "registration recorded, pending approval");
        Ok(stored)
    }

    /// Checks credentials and reports which screen the caller must show
    /// next. Wrong credentials and unknown usernames produce the same
    /// outcome.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        now: NaiveDateTime,
    ) -> Result<LoginOutcome, AccountServiceError> {
        let Some(mut account) = self.users.fetch(username)? else {
            return Ok(LoginOutcome::InvalidCredentials);
        };

        let check = self.hasher.verify(&account.password_hash, password);
        if !check.valid {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        if check.needs_rehash {
            account.password_hash = self.hasher.hash(password);
            self.users.update(account.clone())?;
            info!(username = %account.username, "stored password hash upgraded on login");
        }

        match account.status {
            AccountStatus::Pending => return Ok(LoginOutcome::PendingApproval),
            AccountStatus::Rejected => return Ok(LoginOutcome::Rejected),
            AccountStatus::Approved => {}
        }

        if account.accepted_terms_on.is_none() {
            return Ok(LoginOutcome::TermsAcceptanceRequired);
        }

        if account.force_password_reset {
            return Ok(LoginOutcome::PasswordChangeRequired {
                reason: PasswordChangeReason::Forced,
            });
        }
        if is_password_expired(
            account.last_password_change,
            self.policy.password_expiry_days,
            now,
        ) {
            return Ok(LoginOutcome::PasswordChangeRequired {
                reason: PasswordChangeReason::Expired,
            });
        }

        Ok(LoginOutcome::Success { role: account.role })
    }

    /// Approves a pending account. Accounts without a password receive a
    /// set-password invite; the rest a plain approval notice.
    pub fn approve(
        &self,
        username: &str,
        base_url: &str,
        now: NaiveDateTime,
    ) -> Result<UserAccount, AccountServiceError> {
        let mut account = self
            .users
            .fetch(username)?
            .ok_or(AccountRepositoryError::NotFound)?;

        account.status = AccountStatus::Approved;

        if account.password_hash.is_empty() {
            let token = ResetToken::issue(now, self.policy.reset_token_ttl_minutes);
            let link = reset_link(base_url, &token);
            account.reset_token = Some(token);
            account.force_password_reset = true;
            self.notifier.send(set_password_invite_email(&account.email, &link))?;
        } else {
            self.notifier.send(account_approved_email(&account.email, base_url))?;
        }

        self.users.update(account.clone())?;
        info!(username = %account.username, "account approved");
        Ok(account)
    }

    /// Rejects a pending account.
    pub fn reject(&self, username: &str) -> Result<UserAccount, AccountServiceError> {
        let mut account = self
            .users
            .fetch(username)?
            .ok_or(AccountRepositoryError::NotFound)?;
        account.status = AccountStatus::Rejected;
        self.users.update(account.clone())?;
        Ok(account)
    }

    /// Issues a reset token and mails the link. Unknown identifiers succeed
    /// silently so the endpoint does not leak which accounts exist.
    pub fn forgot_password(
        &self,
        username_or_email: &str,
        base_url: &str,
        now: NaiveDateTime,
    ) -> Result<(), AccountServiceError> {
        let account = match self.users.fetch(username_or_email)? {
            Some(account) => Some(account),
            None => self.users.fetch_by_email(username_or_email)?,
        };

        let Some(mut account) = account else {
            info!("password reset requested for unknown identifier");
            return Ok(());
        };

        let token = ResetToken::issue(now, self.policy.reset_token_ttl_minutes);
        let link = reset_link(base_url, &token);
        account.reset_token = Some(token);
        self.users.update(account.clone())?;
        self.notifier.send(password_reset_email(&account.email, &link))?;
        Ok(())
    }

    /// Consumes a reset token and installs the new password.
    pub fn reset_password(
        &self,
        raw_token: &str,
        new_password: &str,
        now: NaiveDateTime,
    ) -> Result<UserAccount, AccountServiceError> {
        let account = self
            .users
            .list()?
            .into_iter()
            .find(|account| {
                account
                    .reset_token
                    .as_ref()
                    .is_some_and(|token| token.matches(raw_token))
            })
            .ok_or(AccountServiceError::TokenInvalid)?;

        let token = account.reset_token.as_ref().expect("matched accounts carry a token");
        if token.is_expired(now) {
            return Err(AccountServiceError::TokenExpired);
        }

        validate_policy(new_password, &account.username, &account.email)
            .map_err(AccountServiceError::PolicyViolations)?;

        let mut account = account;
        account.password_hash = self.hasher.hash(new_password);
        account.reset_token = None;
        account.last_password_change = Some(now);
        account.force_password_reset = false;
        self.users.update(account.clone())?;
        info!(username = %account.username, "password reset completed");
        Ok(account)
    }

    /// Changes a password for a logged-in user, re-checking the current one.
    pub fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
        now: NaiveDateTime,
    ) -> Result<(), AccountServiceError> {
        let mut account = self
            .users
            .fetch(username)?
            .ok_or(AccountRepositoryError::NotFound)?;

        if !self.hasher.verify(&account.password_hash, current_password).valid {
            return Err(AccountServiceError::InvalidCurrentPassword);
        }

        validate_policy(new_password, &account.username, &account.email)
            .map_err(AccountServiceError::PolicyViolations)?;

        account.password_hash = self.hasher.hash(new_password);
        account.last_password_change = Some(now);
        account.force_password_reset = false;
        self.users.update(account)?;
        Ok(())
    }

    /// Records the terms-of-use consent timestamp.
    pub fn accept_terms(
        &self,
        username: &str,
        now: NaiveDateTime,
    ) -> Result<(), AccountServiceError> {
        let mut account = self
            .users
            .fetch(username)?
            .ok_or(AccountRepositoryError::NotFound)?;
        account.accepted_terms_on = Some(now);
        self.users.update(account)?;
        Ok(())
    }

    pub fn fetch(&self, username: &str) -> Result<Option<UserAccount>, AccountServiceError> {
        Ok(self.users.fetch(username)?)
    }

    pub fn list(&self) -> Result<Vec<UserAccount>, AccountServiceError> {
        Ok(self.users.list()?)
    }

    /// Pending registrations awaiting review.
    pub fn pending(&self) -> Result<Vec<UserAccount>, AccountServiceError> {
        Ok(self
            .users
            .list()?
            .into_iter()
            .filter(|account| account.status == AccountStatus::Pending)
            .collect())
    }
}

fn reset_link(base_url: &str, token: &ResetToken) -> String {
    format!(
        "{}/reset-password?token={}",
        base_url.trim_end_matches('/'),
        token.token
    )
}

fn join_violations(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("password does not meet the policy: {}", join_violations(.0))]
    PolicyViolations(Vec<PolicyViolation>),
    #[error("current password does not match")]
    InvalidCurrentPassword,
    #[error("reset token is not valid")]
    TokenInvalid,
    #[error("reset token has expired")]
    TokenExpired,
    #[error(transparent)]
    Repository(#[from] AccountRepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
