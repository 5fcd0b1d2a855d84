//! Data gateway
//!
//! Domain-level access to properties, expenses, documents and the user
//! summary. Every accessor needs a logged-in session and checks for it
//! before touching the backend.

pub mod backend;
pub mod memory;
pub mod rest;

use std::sync::Arc;

use crate::error::{RubikError, RubikResult};
use crate::models::{
    Document, DocumentId, Expense, ExpenseDraft, ExpenseId, Property, PropertyDraft, UserSummary,
};
use crate::storage::{Session, SessionStore};

pub use backend::{Backend, LoginOutcome};
pub use memory::InMemoryBackend;
pub use rest::RestBackend;

/// Session-aware front of a [`Backend`]
#[derive(Clone)]
pub struct DataGateway {
    backend: Arc<dyn Backend>,
    sessions: SessionStore,
}

impl DataGateway {
    pub fn new(backend: Arc<dyn Backend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The active session, or a session error when nobody is logged in
    pub fn session(&self) -> RubikResult<Session> {
        self.sessions.get_session()?.ok_or_else(RubikError::no_session)
    }

    pub async fn user_summary(&self) -> RubikResult<UserSummary> {
        let session = self.session()?;
        self.backend
            .user_summary(&session.user.email, &session.token)
            .await
    }

    pub async fn properties(&self) -> RubikResult<Vec<Property>> {
        let session = self.session()?;
        let properties = self
            .backend
            .list_properties(&session.user.email, &session.token)
            .await?;
        tracing::debug!(count = properties.len(), "fetched properties");
        Ok(properties)
    }

    /// Look a property up by postal code (or id, where the backend keys by it)
    pub async fn get_property(&self, key: &str) -> RubikResult<Property> {
        let session = self.session()?;
        self.backend
            .get_property(key, &session.token)
            .await?
            .ok_or_else(|| RubikError::property_not_found(key))
    }

    pub async fn create_property(&self, draft: &PropertyDraft) -> RubikResult<Property> {
        let session = self.session()?;
        let property = self
            .backend
            .create_property(draft, &session.user.email, &session.token)
            .await?;
        tracing::info!(cep = %property.cep, "created property");
        Ok(property)
    }

    pub async fn update_property(&self, key: &str, draft: &PropertyDraft) -> RubikResult<Property> {
        let session = self.session()?;
        let property = self
            .backend
            .update_property(key, draft, &session.token)
            .await?;
        tracing::info!(cep = %property.cep, "updated property");
        Ok(property)
    }

    pub async fn create_expense(&self, draft: &ExpenseDraft) -> RubikResult<Expense> {
        let session = self.session()?;
        let expense = self.backend.create_expense(draft, &session.token).await?;
        tracing::info!(cep = %draft.cep, expense = %expense.id, "created expense");
        Ok(expense)
    }

    /// Every expense across the user's properties
    pub async fn expenses(&self) -> RubikResult<Vec<Expense>> {
        let session = self.session()?;
        let expenses = self
            .backend
            .list_expenses(&session.user.email, &session.token)
            .await?;
        tracing::debug!(count = expenses.len(), "fetched expenses");
        Ok(expenses)
    }

    pub async fn property_expenses(&self, key: &str) -> RubikResult<Vec<Expense>> {
        let session = self.session()?;
        self.backend.property_expenses(key, &session.token).await
    }

    pub async fn mark_expense_paid(&self, id: &ExpenseId) -> RubikResult<()> {
        let session = self.session()?;
        self.backend.mark_expense_paid(id, &session.token).await?;
        tracing::info!(expense = %id, "marked expense paid");
        Ok(())
    }

    pub async fn documents(&self, key: &str) -> RubikResult<Vec<Document>> {
        let session = self.session()?;
        self.backend.list_documents(key, &session.token).await
    }

    pub async fn add_document(&self, key: &str, document: &Document) -> RubikResult<Document> {
        let session = self.session()?;
        self.backend
            .add_document(key, document, &session.token)
            .await
    }

    pub async fn delete_document(&self, id: &DocumentId) -> RubikResult<()> {
        let session = self.session()?;
        self.backend.delete_document(id, &session.token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::models::User;
    use std::time::Duration;

    fn signed_in(backend: Arc<dyn Backend>) -> DataGateway {
        let sessions = SessionStore::in_memory();
        sessions
            .set_session(&User::new("1", "Demo", memory::DEMO_EMAIL), "tok")
            .unwrap();
        DataGateway::new(backend, sessions)
    }

    #[tokio::test]
    async fn test_requires_session_before_any_request() {
        // An unreachable backend would answer with a network error, so a
        // session error proves no request was made
        let client = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let gateway = DataGateway::new(
            Arc::new(RestBackend::new(client)),
            SessionStore::in_memory(),
        );

        assert!(gateway.properties().await.unwrap_err().is_session());
        assert!(gateway.expenses().await.unwrap_err().is_session());
        assert!(gateway.user_summary().await.unwrap_err().is_session());
        assert!(gateway
            .get_property("71505-010")
            .await
            .unwrap_err()
            .is_session());
        assert!(gateway
            .mark_expense_paid(&ExpenseId::from("1"))
            .await
            .unwrap_err()
            .is_session());
        assert!(gateway.documents("1").await.unwrap_err().is_session());
    }

    #[tokio::test]
    async fn test_missing_property_is_not_found() {
        let gateway = signed_in(Arc::new(InMemoryBackend::seeded()));
        let err = gateway.get_property("00000-000").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_reads_through_backend() {
        let gateway = signed_in(Arc::new(InMemoryBackend::seeded()));

        assert_eq!(gateway.properties().await.unwrap().len(), 3);
        assert_eq!(gateway.expenses().await.unwrap().len(), 6);
        assert_eq!(gateway.property_expenses("71615-070").await.unwrap().len(), 2);
        assert_eq!(gateway.documents("71505-010").await.unwrap().len(), 1);
    }
}
