use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use fleet_sla::notify::{EmailMessage, EmailNotifier, NotifyError};
use fleet_sla::workflows::accounts::{AccountRepositoryError, UserAccount, UserRepository};
use fleet_sla::workflows::analysis::{
    AnalysisId, AnalysisRecord, AnalysisRepository, DeletionRequest, DeletionRequestRepository,
    DocumentStore, DocumentStoreError, RepositoryError,
};
use fleet_sla::workflows::support::{Ticket, TicketRepository, TicketRepositoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalysisRepository {
    records: Arc<Mutex<Vec<AnalysisRecord>>>,
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|stored| stored.protocol == record.protocol) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn attach_document(&self, id: &AnalysisId, path: &str) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|stored| stored.protocol == *id)
            .ok_or(RepositoryError::NotFound)?;
        record.document_path = Some(path.to_string());
        Ok(())
    }

    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|stored| stored.protocol == *id).cloned())
    }

    fn list(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records = guard.clone();
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(records)
    }

    fn list_for(&self, username: &str) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.recorded_by == username)
            .collect())
    }

    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|stored| stored.protocol != *id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDeletionQueue {
    requests: Arc<Mutex<Vec<DeletionRequest>>>,
}

impl DeletionRequestRepository for InMemoryDeletionQueue {
    fn insert(&self, request: DeletionRequest) -> Result<DeletionRequest, RepositoryError> {
        let mut guard = self.requests.lock().expect("deletion mutex poisoned");
        if guard.iter().any(|stored| stored.id == request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(request.clone());
        Ok(request)
    }

    fn fetch(&self, id: &Uuid) -> Result<Option<DeletionRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("deletion mutex poisoned");
        Ok(guard.iter().find(|stored| stored.id == *id).cloned())
    }

    fn update(&self, request: DeletionRequest) -> Result<(), RepositoryError> {
        let mut guard = self.requests.lock().expect("deletion mutex poisoned");
        let stored = guard
            .iter_mut()
            .find(|stored| stored.id == request.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = request;
        Ok(())
    }

    fn remove(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let mut guard = self.requests.lock().expect("deletion mutex poisoned");
        let before = guard.len();
        guard.retain(|stored| stored.id != *id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<DeletionRequest>, RepositoryError> {
        let guard = self.requests.lock().expect("deletion mutex poisoned");
        let mut requests = guard.clone();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentStore {
    documents: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl DocumentStore for InMemoryDocumentStore {
    fn put(&self, name: &str, bytes: Vec<u8>) -> Result<(), DocumentStoreError> {
        let mut guard = self.documents.lock().expect("document mutex poisoned");
        guard.insert(name.to_string(), bytes);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), DocumentStoreError> {
        let mut guard = self.documents.lock().expect("document mutex poisoned");
        guard.remove(name);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryUserRepository {
    accounts: Arc<Mutex<HashMap<String, UserAccount>>>,
}

impl UserRepository for InMemoryUserRepository {
    fn insert(&self, account: UserAccount) -> Result<UserAccount, AccountRepositoryError> {
        let mut guard = self.accounts.lock().expect("account mutex poisoned");
        if guard.contains_key(&account.username) {
            return Err(AccountRepositoryError::Conflict);
        }
        guard.insert(account.username.clone(), account.clone());
        Ok(account)
    }

    fn update(&self, account: UserAccount) -> Result<(), AccountRepositoryError> {
        let mut guard = self.accounts.lock().expect("account mutex poisoned");
        if guard.contains_key(&account.username) {
            guard.insert(account.username.clone(), account);
            Ok(())
        } else {
            Err(AccountRepositoryError::NotFound)
        }
    }

    fn fetch(&self, username: &str) -> Result<Option<UserAccount>, AccountRepositoryError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard.get(username).cloned())
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountRepositoryError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn list(&self) -> Result<Vec<UserAccount>, AccountRepositoryError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        let mut accounts: Vec<UserAccount> = guard.values().cloned().collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTicketRepository {
    tickets: Arc<Mutex<Vec<Ticket>>>,
}

impl TicketRepository for InMemoryTicketRepository {
    fn insert(&self, ticket: Ticket) -> Result<Ticket, TicketRepositoryError> {
        let mut guard = self.tickets.lock().expect("ticket mutex poisoned");
        if guard.iter().any(|stored| stored.id == ticket.id) {
            return Err(TicketRepositoryError::Conflict);
        }
        guard.push(ticket.clone());
        Ok(ticket)
    }

    fn update(&self, ticket: Ticket) -> Result<(), TicketRepositoryError> {
        let mut guard = self.tickets.lock().expect("ticket mutex poisoned");
        let stored = guard
            .iter_mut()
            .find(|stored| stored.id == ticket.id)
            .ok_or(TicketRepositoryError::NotFound)?;
        *stored = ticket;
        Ok(())
    }

    fn fetch(&self, id: &Uuid) -> Result<Option<Ticket>, TicketRepositoryError> {
        let guard = self.tickets.lock().expect("ticket mutex poisoned");
        Ok(guard.iter().find(|stored| stored.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let guard = self.tickets.lock().expect("ticket mutex poisoned");
        let mut tickets = guard.clone();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }
}

/// Records outbound mail instead of delivering it; the SMTP transport is an
/// external collaborator.
#[derive(Default, Clone)]
pub(crate) struct RecordingEmailNotifier {
    messages: Arc<Mutex<Vec<EmailMessage>>>,
}

impl EmailNotifier for RecordingEmailNotifier {
    fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(to = %message.to, subject = %message.subject, "outbound e-mail recorded");
        let mut guard = self.messages.lock().expect("mail mutex poisoned");
        guard.push(message);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
