//! REST implementation of [`Backend`]

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::wire::{
    DespesaDto, ImovelDto, LoginRequest, LoginResponse, RegisterRequest, UserDataDto,
};
use crate::api::{ApiClient, ApiError};
use crate::error::{RubikError, RubikResult};
use crate::models::{
    Document, DocumentId, Expense, ExpenseDraft, ExpenseId, Property, PropertyDraft, PropertyId,
    User, UserSummary,
};

use super::backend::{Backend, LoginOutcome};

/// Backend reached over HTTP
pub struct RestBackend {
    client: ApiClient,
}

impl RestBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

/// Some write endpoints echo the stored entity, others answer with a
/// message. Decode the entity when it is there.
fn echoed<T: DeserializeOwned>(body: Value) -> Option<T> {
    serde_json::from_value(body).ok()
}

#[async_trait]
impl Backend for RestBackend {
    async fn login(&self, email: &str, password: &str) -> RubikResult<LoginOutcome> {
        let body = LoginRequest {
            email,
            senha: password,
        };
        let response: LoginResponse = self
            .client
            .post(&["auth", "login"], &body, None)
            .await
            .map_err(|e| match e {
                // Any refusal here is a credentials problem
                ApiError::Status { message, .. } => RubikError::Session(message),
                other => other.into(),
            })?;

        if response.token.is_empty() {
            return Err(RubikError::Parse("login response carried no token".into()));
        }
        Ok(LoginOutcome {
            user: User::from(response.user),
            token: response.token,
        })
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> RubikResult<()> {
        let body = RegisterRequest {
            nome: name,
            email,
            senha: password,
        };
        let _: Value = self.client.post(&["auth", "register"], &body, None).await?;
        Ok(())
    }

    async fn logout(&self, token: &str) -> RubikResult<()> {
        let _: Value = self
            .client
            .post(&["auth", "logout"], &Value::Null, Some(token))
            .await?;
        Ok(())
    }

    async fn user_summary(&self, email: &str, token: &str) -> RubikResult<UserSummary> {
        let dto: UserDataDto = self
            .client
            .get(&["user", email, "data"], Some(token))
            .await?;
        Ok(dto.into())
    }

    async fn list_properties(&self, owner_email: &str, token: &str) -> RubikResult<Vec<Property>> {
        let dtos: Vec<ImovelDto> = self
            .client
            .get_with_query(
                &["imovel", "user", "email"],
                &[("email", owner_email)],
                Some(token),
            )
            .await?;
        dtos.into_iter().map(ImovelDto::into_property).collect()
    }

    async fn get_property(&self, key: &str, token: &str) -> RubikResult<Option<Property>> {
        match self
            .client
            .get::<Option<ImovelDto>>(&["imovel", key], Some(token))
            .await
        {
            Ok(Some(dto)) => dto.into_property().map(Some),
            Ok(None) => Ok(None),
            Err(e) if e.status() == Some(404) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_property(
        &self,
        draft: &PropertyDraft,
        owner_email: &str,
        token: &str,
    ) -> RubikResult<Property> {
        let dto = ImovelDto::from_draft(draft, Some(owner_email));
        let body: Value = self.client.post(&["imovel"], &dto, Some(token)).await?;
        echoed::<ImovelDto>(body).unwrap_or(dto).into_property()
    }

    async fn update_property(
        &self,
        key: &str,
        draft: &PropertyDraft,
        token: &str,
    ) -> RubikResult<Property> {
        let dto = ImovelDto::from_draft(draft, None);
        let body: Value = self
            .client
            .put(&["imovel", key], &dto, Some(token))
            .await?;
        echoed::<ImovelDto>(body).unwrap_or(dto).into_property()
    }

    async fn create_expense(&self, draft: &ExpenseDraft, token: &str) -> RubikResult<Expense> {
        let dto = DespesaDto::from_draft(draft);
        let body: Value = self
            .client
            .post(&["despesa", draft.cep.as_str()], &dto, Some(token))
            .await?;
        let owner = PropertyId::from(draft.cep.as_str());
        Ok(echoed::<DespesaDto>(body)
            .unwrap_or(dto)
            .into_expense(Some(&owner)))
    }

    async fn list_expenses(&self, owner_email: &str, token: &str) -> RubikResult<Vec<Expense>> {
        let dtos: Vec<DespesaDto> = self
            .client
            .get(&["despesa", "user", owner_email], Some(token))
            .await?;
        Ok(dtos.into_iter().map(|d| d.into_expense(None)).collect())
    }

    async fn property_expenses(&self, key: &str, token: &str) -> RubikResult<Vec<Expense>> {
        let dtos: Vec<DespesaDto> = self
            .client
            .get(&["despesa", key], Some(token))
            .await?;
        let owner = PropertyId::from(key);
        Ok(dtos
            .into_iter()
            .map(|d| d.into_expense(Some(&owner)))
            .collect())
    }

    async fn mark_expense_paid(&self, id: &ExpenseId, token: &str) -> RubikResult<()> {
        let _: Value = self
            .client
            .put(&["despesa", id.as_str(), "pagar"], &Value::Null, Some(token))
            .await
            .map_err(|e| match e.status() {
                Some(404) => RubikError::expense_not_found(id.as_str()),
                _ => e.into(),
            })?;
        Ok(())
    }

    async fn list_documents(&self, key: &str, token: &str) -> RubikResult<Vec<Document>> {
        // No document endpoint: documents arrive nested in the property
        self.get_property(key, token)
            .await?
            .map(|p| p.documents)
            .ok_or_else(|| RubikError::property_not_found(key))
    }

    async fn add_document(
        &self,
        _key: &str,
        _document: &Document,
        _token: &str,
    ) -> RubikResult<Document> {
        Err(RubikError::Unsupported(
            "the backend does not accept document uploads".into(),
        ))
    }

    async fn delete_document(&self, _id: &DocumentId, _token: &str) -> RubikResult<()> {
        Err(RubikError::Unsupported(
            "the backend does not delete documents".into(),
        ))
    }
}
