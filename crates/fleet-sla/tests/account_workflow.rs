//! Integration specifications for the account lifecycle: registration,
//! approval, login gating, and the password reset token flow.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use fleet_sla::config::AccountPolicyConfig;
    use fleet_sla::notify::{EmailMessage, EmailNotifier, NotifyError};
    use fleet_sla::workflows::accounts::{
        AccountRepositoryError, AccountService, Sha256PasswordHasher, UserAccount, UserRepository,
    };

    #[derive(Default, Clone)]
    pub(super) struct MemoryUsers {
        accounts: Arc<Mutex<HashMap<String, UserAccount>>>,
    }

    impl UserRepository for MemoryUsers {
        fn insert(&self, account: UserAccount) -> Result<UserAccount, AccountRepositoryError> {
            let mut guard = self.accounts.lock().expect("mutex poisoned");
            if guard.contains_key(&account.username) {
                return Err(AccountRepositoryError::Conflict);
            }
            guard.insert(account.username.clone(), account.clone());
            Ok(account)
        }

        fn update(&self, account: UserAccount) -> Result<(), AccountRepositoryError> {
            let mut guard = self.accounts.lock().expect("mutex poisoned");
            if guard.contains_key(&account.username) {
                guard.insert(account.username.clone(), account);
                Ok(())
            } else {
                Err(AccountRepositoryError::NotFound)
            }
        }

        fn fetch(&self, username: &str) -> Result<Option<UserAccount>, AccountRepositoryError> {
            let guard = self.accounts.lock().expect("mutex poisoned");
            Ok(guard.get(username).cloned())
        }

        fn fetch_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountRepositoryError> {
            let guard = self.accounts.lock().expect("mutex poisoned");
            Ok(guard
                .values()
                .find(|account| account.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        fn list(&self) -> Result<Vec<UserAccount>, AccountRepositoryError> {
            let guard = self.accounts.lock().expect("mutex poisoned");
            Ok(guard.values().cloned().collect())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryMailbox {
        messages: Arc<Mutex<Vec<EmailMessage>>>,
    }

    impl MemoryMailbox {
        pub(super) fn messages(&self) -> Vec<EmailMessage> {
            self.messages.lock().expect("mutex poisoned").clone()
        }
    }

    impl EmailNotifier for MemoryMailbox {
        fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
            self.messages.lock().expect("mutex poisoned").push(message);
            Ok(())
        }
    }

    pub(super) type Service = AccountService<MemoryUsers, Sha256PasswordHasher, MemoryMailbox>;

    pub(super) fn service() -> (Arc<Service>, MemoryMailbox) {
        let mailbox = MemoryMailbox::default();
        let service = Arc::new(AccountService::new(
            Arc::new(MemoryUsers::default()),
            Arc::new(Sha256PasswordHasher),
            Arc::new(mailbox.clone()),
            AccountPolicyConfig {
                password_expiry_days: 90,
                reset_token_ttl_minutes: 30,
            },
        ));
        (service, mailbox)
    }
}

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fleet_sla::workflows::accounts::{
    AccountServiceError, AccountStatus, LoginOutcome, NewAccount, PasswordChangeReason, Role,
    SuperadminSeed,
};

const PASSWORD: &str = "Fr0ta#Segura24";

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
}

fn registration() -> NewAccount {
    NewAccount {
        username: "maria.souza".to_string(),
        password: PASSWORD.to_string(),
        full_name: "Maria Souza".to_string(),
        employee_id: "30102040".to_string(),
        email: "maria.souza@frota.example".to_string(),
    }
}

#[test]
fn registration_waits_for_approval_before_login_succeeds() {
    let (service, mailbox) = common::service();

    let account = service
        .register(registration(), at(2024, 5, 1))
        .expect("registration succeeds");
    assert_eq!(account.status, AccountStatus::Pending);
    assert_eq!(account.role, Role::User);

    let outcome = service
        .login("maria.souza", PASSWORD, at(2024, 5, 2))
        .expect("login runs");
    assert_eq!(outcome, LoginOutcome::PendingApproval);

    service
        .approve("maria.souza", "https://sla.frota.example", at(2024, 5, 3))
        .expect("approval succeeds");
    let mail = mailbox.messages();
    assert_eq!(mail.len(), 1);
    assert!(mail[0].subject.contains("Account approved"));

    // Terms come first, then the login succeeds.
    let outcome = service
        .login("maria.souza", PASSWORD, at(2024, 5, 4))
        .expect("login runs");
    assert_eq!(outcome, LoginOutcome::TermsAcceptanceRequired);

    service
        .accept_terms("maria.souza", at(2024, 5, 4))
        .expect("terms accepted");
    let outcome = service
        .login("maria.souza", PASSWORD, at(2024, 5, 4))
        .expect("login runs");
    assert_eq!(outcome, LoginOutcome::Success { role: Role::User });
}

#[test]
fn wrong_credentials_and_unknown_users_are_indistinguishable() {
    let (service, _) = common::service();
    service
        .register(registration(), at(2024, 5, 1))
        .expect("registration succeeds");

    let unknown = service
        .login("nobody", PASSWORD, at(2024, 5, 2))
        .expect("login runs");
    let wrong = service
        .login("maria.souza", "Wrong#Pass99", at(2024, 5, 2))
        .expect("login runs");
    assert_eq!(unknown, LoginOutcome::InvalidCredentials);
    assert_eq!(wrong, LoginOutcome::InvalidCredentials);
}

#[test]
fn expired_passwords_force_a_change() {
    let (service, _) = common::service();
    service
        .register(registration(), at(2024, 1, 1))
        .expect("registration succeeds");
    service
        .approve("maria.souza", "https://sla.frota.example", at(2024, 1, 2))
        .expect("approval succeeds");
    service
        .accept_terms("maria.souza", at(2024, 1, 2))
        .expect("terms accepted");

    // The expiry clock started at registration on Jan 1; 90 days are long
    // gone by early May.
    let outcome = service
        .login("maria.souza", PASSWORD, at(2024, 5, 4))
        .expect("login runs");
    assert_eq!(
        outcome,
        LoginOutcome::PasswordChangeRequired {
            reason: PasswordChangeReason::Expired
        }
    );

    service
        .change_password("maria.souza", PASSWORD, "N0va#SenhaForte", at(2024, 5, 4))
        .expect("change succeeds");
    let outcome = service
        .login("maria.souza", "N0va#SenhaForte", at(2024, 5, 5))
        .expect("login runs");
    assert_eq!(outcome, LoginOutcome::Success { role: Role::User });

    // 91 days later the new password has expired too.
    let outcome = service
        .login(
            "maria.souza",
            "N0va#SenhaForte",
            at(2024, 5, 4) + Duration::days(91),
        )
        .expect("login runs");
    assert_eq!(
        outcome,
        LoginOutcome::PasswordChangeRequired {
            reason: PasswordChangeReason::Expired
        }
    );
}

#[test]
fn reset_token_flow_round_trips_and_expires() {
    let (service, mailbox) = common::service();
    service
        .register(registration(), at(2024, 5, 1))
        .expect("registration succeeds");

    service
        .forgot_password("maria.souza", "https://sla.frota.example", at(2024, 5, 10))
        .expect("reset issued");
    let mail = mailbox.messages();
    let body = &mail.last().expect("reset mail sent").body;
    let token = body
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("reset link carries a token");

    // Expired tokens are refused.
    let err = service
        .reset_password(token, "N0va#SenhaForte", at(2024, 5, 10) + Duration::minutes(31))
        .expect_err("token expired");
    assert!(matches!(err, AccountServiceError::TokenExpired));

    // Re-issue and consume within the window.
    service
        .forgot_password(
            "maria.souza@frota.example",
            "https://sla.frota.example",
            at(2024, 5, 11),
        )
        .expect("reset issued by e-mail lookup");
    let mail = mailbox.messages();
    let body = &mail.last().expect("second reset mail").body;
    let token = body
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("reset link carries a token");

    let account = service
        .reset_password(token, "N0va#SenhaForte", at(2024, 5, 11))
        .expect("reset succeeds");
    assert!(account.reset_token.is_none());
    assert_eq!(account.last_password_change, Some(at(2024, 5, 11)));

    // The token is single-use.
    let err = service
        .reset_password(token, "Outr4#SenhaBoa", at(2024, 5, 11))
        .expect_err("token consumed");
    assert!(matches!(err, AccountServiceError::TokenInvalid));
}

#[test]
fn unknown_identifiers_do_not_leak_from_forgot_password() {
    let (service, mailbox) = common::service();
    service
        .forgot_password("ghost", "https://sla.frota.example", at(2024, 5, 10))
        .expect("silently succeeds");
    assert!(mailbox.messages().is_empty());
}

#[test]
fn bootstrap_superadmin_is_idempotent_and_passwordless_by_default() {
    let (service, _) = common::service();

    let seed = SuperadminSeed {
        username: "fleet.admin".to_string(),
        full_name: "Fleet SLA Superadmin".to_string(),
        employee_id: "00000000".to_string(),
        email: "fleet.admin@frota.example".to_string(),
        initial_password: None,
    };
    service
        .bootstrap_superadmin(seed.clone(), at(2024, 5, 1))
        .expect("bootstrap succeeds");
    service
        .bootstrap_superadmin(seed, at(2024, 5, 2))
        .expect("second bootstrap is a no-op");

    let account = service
        .fetch("fleet.admin")
        .expect("fetch runs")
        .expect("account exists");
    assert_eq!(account.role, Role::SuperAdmin);
    assert_eq!(account.status, AccountStatus::Approved);
    assert!(account.password_hash.is_empty());
    assert!(account.force_password_reset);

    // An empty hash never verifies.
    let outcome = service
        .login("fleet.admin", "", at(2024, 5, 3))
        .expect("login runs");
    assert_eq!(outcome, LoginOutcome::InvalidCredentials);
}
