use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::tokens::ResetToken;

/// Authorization tiers. Admins see the dashboard and the full report;
/// superadmins additionally manage tickets and deletion reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub const fn is_superadmin(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

/// Registration review state. New accounts start pending and cannot log in
/// until approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
}

impl AccountStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Approved => "approved",
            AccountStatus::Rejected => "rejected",
        }
    }
}

/// Stored account row. `password_hash` is empty until the user sets an
/// initial password through the invite flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub employee_id: String,
    pub email: String,
    pub status: AccountStatus,
    pub accepted_terms_on: Option<NaiveDateTime>,
    pub reset_token: Option<ResetToken>,
    pub last_password_change: Option<NaiveDateTime>,
    pub force_password_reset: bool,
}

/// Why a successful credential check still demands a password change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordChangeReason {
    Expired,
    Forced,
}

/// Outcome of a login attempt, driving which screen the caller shows next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    InvalidCredentials,
    PendingApproval,
    Rejected,
    TermsAcceptanceRequired,
    PasswordChangeRequired { reason: PasswordChangeReason },
    Success { role: Role },
}

/// Registration form payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub employee_id: String,
    pub email: String,
}
