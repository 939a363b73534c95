//! Support tickets: users file questions, superadmins answer them.

pub mod router;

pub use router::ticket_router;

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review state of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    Answered,
}

impl TicketStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Answered => "answered",
        }
    }
}

/// A support request with the requester snapshot captured at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub response: Option<String>,
    pub created_at: NaiveDateTime,
    pub responded_at: Option<NaiveDateTime>,
    pub attachment_path: Option<String>,
}

/// Fields collected by the ticket form.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketSubmission {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub attachment_path: Option<String>,
}

/// Storage abstraction for tickets. Listings are newest-first.
pub trait TicketRepository: Send + Sync {
    fn insert(&self, ticket: Ticket) -> Result<Ticket, TicketRepositoryError>;
    fn update(&self, ticket: Ticket) -> Result<(), TicketRepositoryError>;
    fn fetch(&self, id: &Uuid) -> Result<Option<Ticket>, TicketRepositoryError>;
    fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError>;
}

/// Error enumeration for ticket storage failures.
#[derive(Debug, thiserror::Error)]
pub enum TicketRepositoryError {
    #[error("ticket already exists")]
    Conflict,
    #[error("ticket not found")]
    NotFound,
    #[error("ticket repository unavailable: {0}")]
    Unavailable(String),
}

/// Service over the ticket queue.
pub struct TicketService<T> {
    tickets: Arc<T>,
}

impl<T> TicketService<T>
where
    T: TicketRepository + 'static,
{
    pub fn new(tickets: Arc<T>) -> Self {
        Self { tickets }
    }

    pub fn open(
        &self,
        submission: TicketSubmission,
        now: NaiveDateTime,
    ) -> Result<Ticket, TicketServiceError> {
        let ticket = Ticket {
            id: Uuid::new_v4(),
            username: submission.username,
            full_name: submission.full_name,
            email: submission.email,
            subject: submission.subject,
            description: submission.description,
            status: TicketStatus::Open,
            response: None,
            created_at: now,
            responded_at: None,
            attachment_path: submission.attachment_path,
        };
        Ok(self.tickets.insert(ticket)?)
    }

    /// Records the answer; answering twice overwrites the previous response
    /// and refreshes the timestamp.
    pub fn respond(
        &self,
        id: &Uuid,
        response: &str,
        now: NaiveDateTime,
    ) -> Result<Ticket, TicketServiceError> {
        let mut ticket = self
            .tickets
            .fetch(id)?
            .ok_or(TicketRepositoryError::NotFound)?;

        ticket.status = TicketStatus::Answered;
        ticket.response = Some(response.to_string());
        ticket.responded_at = Some(now);
        self.tickets.update(ticket.clone())?;
        Ok(ticket)
    }

    pub fn list(&self) -> Result<Vec<Ticket>, TicketServiceError> {
        Ok(self.tickets.list()?)
    }

    pub fn list_for(&self, username: &str) -> Result<Vec<Ticket>, TicketServiceError> {
        Ok(self
            .tickets
            .list()?
            .into_iter()
            .filter(|ticket| ticket.username == username)
            .collect())
    }

    pub fn open_queue(&self) -> Result<Vec<Ticket>, TicketServiceError> {
        Ok(self
            .tickets
            .list()?
            .into_iter()
            .filter(|ticket| ticket.status == TicketStatus::Open)
            .collect())
    }
}

/// Error raised by the ticket service.
#[derive(Debug, thiserror::Error)]
pub enum TicketServiceError {
    #[error(transparent)]
    Repository(#[from] TicketRepositoryError),
}
