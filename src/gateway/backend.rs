//! The backend seam
//!
//! Everything the application asks of the server goes through [`Backend`].
//! The REST implementation talks HTTP; the in-memory one serves a seeded
//! portfolio for offline use and tests.

use async_trait::async_trait;

use crate::error::RubikResult;
use crate::models::{
    Document, DocumentId, Expense, ExpenseDraft, ExpenseId, Property, PropertyDraft, User,
    UserSummary,
};

/// Successful login: the profile and its bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

/// Remote operations. Properties are addressed by `key`, which is the
/// postal code the backend looks them up by.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> RubikResult<LoginOutcome>;

    async fn register(&self, name: &str, email: &str, password: &str) -> RubikResult<()>;

    async fn logout(&self, token: &str) -> RubikResult<()>;

    async fn user_summary(&self, email: &str, token: &str) -> RubikResult<UserSummary>;

    async fn list_properties(&self, owner_email: &str, token: &str) -> RubikResult<Vec<Property>>;

    /// `Ok(None)` when the backend has no such property
    async fn get_property(&self, key: &str, token: &str) -> RubikResult<Option<Property>>;

    async fn create_property(
        &self,
        draft: &PropertyDraft,
        owner_email: &str,
        token: &str,
    ) -> RubikResult<Property>;

    async fn update_property(
        &self,
        key: &str,
        draft: &PropertyDraft,
        token: &str,
    ) -> RubikResult<Property>;

    /// Create an expense for the property named by `draft.cep`
    async fn create_expense(&self, draft: &ExpenseDraft, token: &str) -> RubikResult<Expense>;

    async fn list_expenses(&self, owner_email: &str, token: &str) -> RubikResult<Vec<Expense>>;

    async fn property_expenses(&self, key: &str, token: &str) -> RubikResult<Vec<Expense>>;

    async fn mark_expense_paid(&self, id: &ExpenseId, token: &str) -> RubikResult<()>;

    async fn list_documents(&self, key: &str, token: &str) -> RubikResult<Vec<Document>>;

    async fn add_document(
        &self,
        key: &str,
        document: &Document,
        token: &str,
    ) -> RubikResult<Document>;

    async fn delete_document(&self, id: &DocumentId, token: &str) -> RubikResult<()>;
}
