//! In-memory implementation of [`Backend`]
//!
//! Serves a seeded sample portfolio. State belongs to the instance, so two
//! backends never see each other's writes.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{RubikError, RubikResult};
use crate::models::{
    parse_due_date, Document, DocumentId, DocumentType, Expense, ExpenseDraft, ExpenseId,
    ExpenseType, Installments, Money, Property, PropertyDraft, PropertyId, PropertyType, User,
    UserSummary, Utilities, UtilityRegistration,
};

use super::backend::{Backend, LoginOutcome};

/// Account every fresh in-memory backend knows about
pub const DEMO_EMAIL: &str = "demo@rubik.app";
pub const DEMO_PASSWORD: &str = "rubik123";
pub const DEMO_NAME: &str = "Demo";

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    properties: Vec<Property>,
    /// Owner email (lowercased) by property id
    owners: HashMap<PropertyId, String>,
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl MemoryState {
    fn owned_by<'a>(&'a self, email: &str) -> impl Iterator<Item = &'a Property> + 'a {
        let owner = account_key(email);
        self.properties
            .iter()
            .filter(move |p| self.owners.get(&p.id) == Some(&owner))
    }

    fn property(&self, key: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.cep == key || p.id.as_str() == key)
    }

    fn property_mut(&mut self, key: &str) -> Option<&mut Property> {
        self.properties
            .iter_mut()
            .find(|p| p.cep == key || p.id.as_str() == key)
    }
}

fn lock_error(e: impl std::fmt::Display) -> RubikError {
    RubikError::Storage(format!("Failed to acquire backend lock: {}", e))
}

/// Backend that keeps everything in process memory
pub struct InMemoryBackend {
    state: RwLock<MemoryState>,
}

impl InMemoryBackend {
    /// An empty backend with only the demo account
    pub fn empty() -> Self {
        let mut state = MemoryState::default();
        state.accounts.insert(
            DEMO_EMAIL.to_string(),
            Account {
                user: User::new("1", DEMO_NAME, DEMO_EMAIL),
                password: DEMO_PASSWORD.to_string(),
            },
        );
        Self {
            state: RwLock::new(state),
        }
    }

    /// The demo account plus the sample portfolio
    pub fn seeded() -> Self {
        let backend = Self::empty();
        if let Ok(mut state) = backend.state.write() {
            let portfolio = sample_portfolio();
            state.owners = portfolio
                .iter()
                .map(|p| (p.id.clone(), DEMO_EMAIL.to_string()))
                .collect();
            state.properties = portfolio;
        }
        backend
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn login(&self, email: &str, password: &str) -> RubikResult<LoginOutcome> {
        let state = self.state.read().map_err(lock_error)?;
        match state.accounts.get(&account_key(email)) {
            Some(account) if account.password == password => Ok(LoginOutcome {
                user: account.user.clone(),
                token: format!("offline-{}", Uuid::new_v4()),
            }),
            _ => Err(RubikError::Session("Invalid email or password".into())),
        }
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> RubikResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let key = account_key(email);
        if state.accounts.contains_key(&key) {
            return Err(RubikError::Validation(format!(
                "Email already registered: {}",
                email
            )));
        }
        let id = (state.accounts.len() + 1).to_string();
        state.accounts.insert(
            key,
            Account {
                user: User::new(id, name, email.trim()),
                password: password.to_string(),
            },
        );
        Ok(())
    }

    async fn logout(&self, _token: &str) -> RubikResult<()> {
        Ok(())
    }

    async fn user_summary(&self, email: &str, _token: &str) -> RubikResult<UserSummary> {
        let state = self.state.read().map_err(lock_error)?;
        let name = state
            .accounts
            .get(&account_key(email))
            .map(|a| a.user.name.clone())
            .unwrap_or_default();

        let properties: Vec<&Property> = state.owned_by(email).collect();
        let expenses: Vec<&Expense> = properties.iter().flat_map(|p| &p.expenses).collect();
        let next_due_date = expenses
            .iter()
            .filter(|e| !e.is_paid)
            .filter_map(|e| parse_due_date(&e.due_date))
            .min()
            .map(|d| d.format("%Y-%m-%d").to_string());

        Ok(UserSummary {
            name,
            property_count: properties.len() as u32,
            total_expenses: expenses.iter().map(|e| e.value).sum(),
            pending_expense_count: expenses.iter().filter(|e| !e.is_paid).count() as u32,
            next_due_date,
        })
    }

    async fn list_properties(&self, owner_email: &str, _token: &str) -> RubikResult<Vec<Property>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.owned_by(owner_email).cloned().collect())
    }

    async fn get_property(&self, key: &str, _token: &str) -> RubikResult<Option<Property>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.property(key).cloned())
    }

    async fn create_property(
        &self,
        draft: &PropertyDraft,
        owner_email: &str,
        _token: &str,
    ) -> RubikResult<Property> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.property(&draft.cep).is_some() {
            return Err(RubikError::Validation(format!(
                "A property with CEP {} already exists",
                draft.cep
            )));
        }
        let property = Property::from_draft(draft.clone());
        state
            .owners
            .insert(property.id.clone(), account_key(owner_email));
        state.properties.push(property.clone());
        Ok(property)
    }

    async fn update_property(
        &self,
        key: &str,
        draft: &PropertyDraft,
        _token: &str,
    ) -> RubikResult<Property> {
        let mut state = self.state.write().map_err(lock_error)?;
        let property = state
            .property_mut(key)
            .ok_or_else(|| RubikError::property_not_found(key))?;
        property.apply(draft.clone());
        Ok(property.clone())
    }

    async fn create_expense(&self, draft: &ExpenseDraft, _token: &str) -> RubikResult<Expense> {
        let mut state = self.state.write().map_err(lock_error)?;
        let property = state
            .property_mut(&draft.cep)
            .ok_or_else(|| RubikError::property_not_found(&draft.cep))?;
        let expense = Expense::from_draft(property.id.clone(), draft.clone());
        property.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn list_expenses(&self, owner_email: &str, _token: &str) -> RubikResult<Vec<Expense>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .owned_by(owner_email)
            .flat_map(|p| p.expenses.iter().cloned())
            .collect())
    }

    async fn property_expenses(&self, key: &str, _token: &str) -> RubikResult<Vec<Expense>> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .property(key)
            .map(|p| p.expenses.clone())
            .ok_or_else(|| RubikError::property_not_found(key))
    }

    async fn mark_expense_paid(&self, id: &ExpenseId, _token: &str) -> RubikResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let expense = state
            .properties
            .iter_mut()
            .flat_map(|p| p.expenses.iter_mut())
            .find(|e| &e.id == id)
            .ok_or_else(|| RubikError::expense_not_found(id.as_str()))?;
        expense.mark_paid();
        Ok(())
    }

    async fn list_documents(&self, key: &str, _token: &str) -> RubikResult<Vec<Document>> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .property(key)
            .map(|p| p.documents.clone())
            .ok_or_else(|| RubikError::property_not_found(key))
    }

    async fn add_document(
        &self,
        key: &str,
        document: &Document,
        _token: &str,
    ) -> RubikResult<Document> {
        let mut state = self.state.write().map_err(lock_error)?;
        let property = state
            .property_mut(key)
            .ok_or_else(|| RubikError::property_not_found(key))?;
        let mut document = document.clone();
        document.property_id = Some(property.id.clone());
        property.documents.push(document.clone());
        Ok(document)
    }

    async fn delete_document(&self, id: &DocumentId, _token: &str) -> RubikResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        for property in state.properties.iter_mut() {
            if let Some(pos) = property.documents.iter().position(|d| &d.id == id) {
                property.documents.remove(pos);
                return Ok(());
            }
        }
        Err(RubikError::NotFound {
            entity_type: "Document",
            identifier: id.to_string(),
        })
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn utilities(energy: &str, water: &str) -> Utilities {
    Utilities {
        energy: Some(UtilityRegistration::new("Neoenergia", energy)),
        water: Some(UtilityRegistration::new("CAESB", water)),
    }
}

fn expense(
    id: &str,
    property_id: &PropertyId,
    expense_type: ExpenseType,
    description: &str,
    cents: i64,
    due_date: &str,
    is_paid: bool,
) -> Expense {
    Expense {
        id: ExpenseId::from(id),
        property_id: property_id.clone(),
        expense_type,
        description: description.to_string(),
        value: Money::from_cents(cents),
        due_date: due_date.to_string(),
        is_paid,
        installments: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn property(
    id: &str,
    cep: &str,
    address: &str,
    rooms: u32,
    bathrooms: u32,
    garage_spaces: u32,
    acquisition_date: NaiveDate,
    value: Money,
    utilities: Utilities,
) -> Property {
    Property {
        id: PropertyId::from(id),
        cep: cep.to_string(),
        address: address.to_string(),
        city: "Brasília".to_string(),
        state: "DF".to_string(),
        property_type: PropertyType::House,
        rooms,
        bathrooms,
        garage_spaces,
        acquisition_date,
        value,
        notary_registration: format!("CRI-{}", id),
        tax_registration: format!("IPTU-{}", id),
        utilities,
        documents: Vec::new(),
        expenses: Vec::new(),
    }
}

/// Three houses in Brasília with their bills and paperwork
pub fn sample_portfolio() -> Vec<Property> {
    let mut first = property(
        "1",
        "71505-010",
        "QNN 10, Conjunto 12, Casa 23",
        4,
        3,
        2,
        date(2023, 2, 15),
        Money::from_reais(950_000),
        utilities("11223344", "44556677"),
    );
    first.documents.push(Document {
        id: DocumentId::from("1"),
        property_id: Some(first.id.clone()),
        name: "Escritura.pdf".to_string(),
        document_type: DocumentType::Deed,
        upload_date: date(2023, 2, 20),
        file_url: "https://example.com/escritura.pdf".to_string(),
    });
    first.expenses.push(expense(
        "1",
        &first.id,
        ExpenseType::Energy,
        "Conta de luz - Fevereiro",
        22050,
        "2023-03-10",
        true,
    ));

    let mut second = property(
        "2",
        "71615-070",
        "QRS 6, Bloco G, Casa 9",
        5,
        4,
        3,
        date(2022, 9, 22),
        Money::from_reais(1_300_000),
        utilities("99887766", "11223355"),
    );
    second.expenses.push(expense(
        "2",
        &second.id,
        ExpenseType::Water,
        "Conta de água - Março",
        13040,
        "2023-04-05",
        false,
    ));
    let mut iptu = expense(
        "3",
        &second.id,
        ExpenseType::Tax,
        "IPTU 2023",
        420000,
        "2023-04-15",
        false,
    );
    iptu.installments = Some(Installments {
        current: 4,
        total: 10,
    });
    second.expenses.push(iptu);

    let mut third = property(
        "3",
        "70297-400",
        "SQWN 107 Bloco I, Casa 10, Asa Sul",
        7,
        6,
        4,
        date(2024, 3, 10),
        Money::from_reais(3_500_000),
        utilities("55667788", "88990011"),
    );
    third.documents.push(Document {
        id: DocumentId::from("3"),
        property_id: Some(third.id.clone()),
        name: "Contrato de Compra e Venda.pdf".to_string(),
        document_type: DocumentType::Contract,
        upload_date: date(2024, 3, 12),
        file_url: "https://example.com/contrato.pdf".to_string(),
    });
    third.expenses.push(expense(
        "7",
        &third.id,
        ExpenseType::Energy,
        "Conta de luz - Março",
        60000,
        "2024-04-01",
        false,
    ));
    third.expenses.push(expense(
        "8",
        &third.id,
        ExpenseType::Water,
        "Conta de água - Março",
        25000,
        "2024-04-05",
        false,
    ));
    let mut iptu = expense(
        "9",
        &third.id,
        ExpenseType::Tax,
        "IPTU 2024",
        1200000,
        "2024-04-10",
        false,
    );
    iptu.installments = Some(Installments {
        current: 1,
        total: 12,
    });
    third.expenses.push(iptu);

    vec![first, second, third]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "tok";

    #[tokio::test]
    async fn test_demo_login() {
        let backend = InMemoryBackend::seeded();
        let outcome = backend.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert_eq!(outcome.user.email, DEMO_EMAIL);
        assert!(!outcome.token.is_empty());

        let err = backend.login(DEMO_EMAIL, "wrong").await.unwrap_err();
        assert!(err.is_session());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let backend = InMemoryBackend::empty();
        backend
            .register("Ana", "ana@example.com", "secret1")
            .await
            .unwrap();
        let outcome = backend.login("ANA@example.com", "secret1").await.unwrap();
        assert_eq!(outcome.user.name, "Ana");

        let err = backend
            .register("Ana", "ana@example.com", "secret1")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_lookup_by_cep_or_id() {
        let backend = InMemoryBackend::seeded();
        let by_cep = backend.get_property("71615-070", TOKEN).await.unwrap().unwrap();
        let by_id = backend.get_property("2", TOKEN).await.unwrap().unwrap();
        assert_eq!(by_cep, by_id);
        assert!(backend.get_property("00000-000", TOKEN).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_expense_and_mark_paid() {
        let backend = InMemoryBackend::seeded();
        let draft = ExpenseDraft {
            cep: "71505-010".into(),
            expense_type: ExpenseType::Water,
            description: "Conta de água - Abril".into(),
            installments: 0,
            due_date: "2025-06-22".into(),
            is_paid: false,
            value: Money::from_reais(150),
        };
        let created = backend.create_expense(&draft, TOKEN).await.unwrap();
        assert_eq!(created.property_id.as_str(), "1");

        backend.mark_expense_paid(&created.id, TOKEN).await.unwrap();
        let expenses = backend.property_expenses("1", TOKEN).await.unwrap();
        assert!(expenses.iter().any(|e| e.id == created.id && e.is_paid));

        let err = backend
            .mark_expense_paid(&ExpenseId::from("missing"), TOKEN)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_expense_for_unknown_property() {
        let backend = InMemoryBackend::seeded();
        let draft = ExpenseDraft {
            cep: "00000-000".into(),
            expense_type: ExpenseType::Other,
            description: String::new(),
            installments: 0,
            due_date: "2025-06-22".into(),
            is_paid: false,
            value: Money::from_reais(10),
        };
        let err = backend.create_expense(&draft, TOKEN).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_instances_do_not_share_state() {
        let a = InMemoryBackend::seeded();
        let b = InMemoryBackend::seeded();
        a.mark_expense_paid(&ExpenseId::from("2"), TOKEN).await.unwrap();

        let b_expenses = b.list_expenses(DEMO_EMAIL, TOKEN).await.unwrap();
        let water = b_expenses.iter().find(|e| e.id.as_str() == "2").unwrap();
        assert!(!water.is_paid);
    }

    #[tokio::test]
    async fn test_user_summary() {
        let backend = InMemoryBackend::seeded();
        let summary = backend.user_summary(DEMO_EMAIL, TOKEN).await.unwrap();
        assert_eq!(summary.name, DEMO_NAME);
        assert_eq!(summary.property_count, 3);
        assert_eq!(summary.pending_expense_count, 5);
        assert_eq!(summary.next_due_date.as_deref(), Some("2023-04-05"));
    }

    #[tokio::test]
    async fn test_listings_are_scoped_to_owner() {
        let backend = InMemoryBackend::seeded();
        backend
            .register("Ana", "ana@example.com", "secret1")
            .await
            .unwrap();

        assert!(backend
            .list_properties("ana@example.com", TOKEN)
            .await
            .unwrap()
            .is_empty());
        assert!(backend
            .list_expenses("ana@example.com", TOKEN)
            .await
            .unwrap()
            .is_empty());
        let summary = backend.user_summary("ana@example.com", TOKEN).await.unwrap();
        assert_eq!(summary.property_count, 0);
        assert_eq!(summary.next_due_date, None);

        let mut draft = PropertyDraft::from_property(&sample_portfolio()[0]);
        draft.cep = "70000-000".into();
        let created = backend
            .create_property(&draft, "Ana@Example.com", TOKEN)
            .await
            .unwrap();

        let ana = backend.list_properties("ana@example.com", TOKEN).await.unwrap();
        assert_eq!(ana.len(), 1);
        assert_eq!(ana[0].id, created.id);
        assert_eq!(
            backend.list_properties(DEMO_EMAIL, TOKEN).await.unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn test_documents() {
        let backend = InMemoryBackend::seeded();
        let docs = backend.list_documents("3", TOKEN).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].document_type, DocumentType::Contract);

        let doc = Document::new(
            PropertyId::from("2"),
            "Seguro.pdf",
            DocumentType::Insurance,
            date(2024, 1, 5),
            "https://example.com/seguro.pdf",
        );
        backend.add_document("71615-070", &doc, TOKEN).await.unwrap();
        assert_eq!(backend.list_documents("2", TOKEN).await.unwrap().len(), 1);

        backend.delete_document(&doc.id, TOKEN).await.unwrap();
        assert!(backend.list_documents("2", TOKEN).await.unwrap().is_empty());
    }
}
