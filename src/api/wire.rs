//! Backend wire schema
//!
//! The backend speaks Portuguese field names (`endereco`, `tipo`, `valor`,
//! `vencimento`, `status`...). These DTOs mirror that shape and convert to
//! and from the English domain model, so nothing outside this module sees
//! the second schema.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RubikError, RubikResult};
use crate::models::{
    parse_due_date, Document, Expense, ExpenseDraft, ExpenseId, ExpenseType, Installments, Money,
    Property, PropertyDraft, PropertyId, PropertyType, User, UserId, UserSummary, Utilities,
    UtilityRegistration,
};

/// Water utility the backend keeps a registration for
pub const WATER_PROVIDER: &str = "CAESB";
/// Power utility the backend keeps a registration for
pub const ENERGY_PROVIDER: &str = "Neoenergia";

/// Expense status label for a paid expense
pub const STATUS_PAID: &str = "PAGO";
/// Expense status label for an unpaid expense
pub const STATUS_PENDING: &str = "PENDENTE";

/// Identifiers arrive as JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Str(String),
        Int(i64),
    }

    Ok(Option::<Repr>::deserialize(deserializer)?.map(|r| match r {
        Repr::Str(s) => s,
        Repr::Int(n) => n.to_string(),
    }))
}

fn wire_date(raw: &str, field: &str) -> RubikResult<NaiveDate> {
    parse_due_date(raw).ok_or_else(|| RubikError::Parse(format!("invalid {}: '{}'", field, raw)))
}

// ---- auth ----

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub senha: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub nome: &'a str,
    pub email: &'a str,
    pub senha: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(alias = "name")]
    pub nome: String,
    pub email: String,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        // Users are keyed by email on the backend when no id is sent
        let id = dto.id.unwrap_or_else(|| dto.email.clone());
        User {
            id: UserId::from(id),
            name: dto.nome,
            email: dto.email,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataDto {
    pub nome: String,
    #[serde(default)]
    pub qtd_imoveis: u32,
    #[serde(default)]
    pub valor_despesas: Money,
    #[serde(default)]
    pub qtd_despesas_pendentes: u32,
    #[serde(default)]
    pub proximo_vencimento: Option<String>,
}

impl From<UserDataDto> for UserSummary {
    fn from(dto: UserDataDto) -> Self {
        UserSummary {
            name: dto.nome,
            property_count: dto.qtd_imoveis,
            total_expenses: dto.valor_despesas,
            pending_expense_count: dto.qtd_despesas_pendentes,
            next_due_date: dto.proximo_vencimento.filter(|s| !s.trim().is_empty()),
        }
    }
}

// ---- properties ----

pub fn property_type_to_wire(t: PropertyType) -> &'static str {
    match t {
        PropertyType::House => "Casa",
        PropertyType::Apartment => "Apartamento",
        PropertyType::Commercial => "Comercial",
        PropertyType::Land => "Lote",
        PropertyType::Other => "Outro",
    }
}

pub fn property_type_from_wire(s: &str) -> PropertyType {
    if let Some(t) = PropertyType::parse(s) {
        return t;
    }
    match s.trim().to_lowercase().as_str() {
        "galpão" | "galpao" => PropertyType::Commercial,
        "chácara" | "chacara" => PropertyType::Land,
        _ => PropertyType::Other,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImovelDto {
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub endereco: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
    pub tipo: String,
    pub qtd_quartos: u32,
    pub qtd_banheiro: u32,
    pub qtd_vagas_garagem: u32,
    pub data_aquisicao: String,
    #[serde(default)]
    pub registro_cartorio: String,
    #[serde(default)]
    pub inscricao_iptu: String,
    #[serde(default)]
    pub inscricao_caesb: String,
    #[serde(default)]
    pub inscricao_neoenergia: String,
    pub valor_venal: Money,
    /// Owner; sent on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub despesas: Vec<DespesaDto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentos: Vec<Document>,
}

impl ImovelDto {
    pub fn from_draft(draft: &PropertyDraft, user_email: Option<&str>) -> Self {
        Self {
            id: None,
            endereco: draft.address.clone(),
            cidade: draft.city.clone(),
            estado: draft.state.clone(),
            cep: draft.cep.clone(),
            tipo: property_type_to_wire(draft.property_type).to_string(),
            qtd_quartos: draft.rooms,
            qtd_banheiro: draft.bathrooms,
            qtd_vagas_garagem: draft.garage_spaces,
            // Midnight UTC, as the original form submitted ISO timestamps
            data_aquisicao: format!("{}T00:00:00.000Z", draft.acquisition_date.format("%Y-%m-%d")),
            registro_cartorio: draft.notary_registration.clone(),
            inscricao_iptu: draft.tax_registration.clone(),
            inscricao_caesb: draft.water_registration.clone(),
            inscricao_neoenergia: draft.energy_registration.clone(),
            valor_venal: draft.value,
            user_email: user_email.map(String::from),
            despesas: Vec::new(),
            documentos: Vec::new(),
        }
    }

    pub fn into_property(self) -> RubikResult<Property> {
        let acquisition_date = wire_date(&self.data_aquisicao, "dataAquisicao")?;
        // The backend keys properties by postal code when it sends no id
        let id = PropertyId::from(self.id.unwrap_or_else(|| self.cep.clone()));

        let expenses = self
            .despesas
            .into_iter()
            .map(|d| d.into_expense(Some(&id)))
            .collect();
        let documents = self
            .documentos
            .into_iter()
            .map(|mut doc| {
                doc.property_id.get_or_insert_with(|| id.clone());
                doc
            })
            .collect();

        Ok(Property {
            property_type: property_type_from_wire(&self.tipo),
            cep: self.cep,
            address: self.endereco,
            city: self.cidade,
            state: self.estado,
            rooms: self.qtd_quartos,
            bathrooms: self.qtd_banheiro,
            garage_spaces: self.qtd_vagas_garagem,
            acquisition_date,
            value: self.valor_venal,
            notary_registration: self.registro_cartorio,
            tax_registration: self.inscricao_iptu,
            utilities: Utilities {
                energy: Some(UtilityRegistration::new(
                    ENERGY_PROVIDER,
                    self.inscricao_neoenergia,
                )),
                water: Some(UtilityRegistration::new(WATER_PROVIDER, self.inscricao_caesb)),
            },
            documents,
            expenses,
            id,
        })
    }
}

// ---- expenses ----

pub fn expense_type_to_wire(t: ExpenseType) -> &'static str {
    match t {
        ExpenseType::Energy => "Energia",
        ExpenseType::Water => "Agua",
        ExpenseType::Tax => "Imposto",
        ExpenseType::Maintenance => "Manutencao",
        ExpenseType::Insurance => "Seguro",
        ExpenseType::Other => "Outro",
    }
}

/// Paid indicator: a boolean in some payloads, a status label in others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaidIndicator {
    Flag(bool),
    Label(String),
}

impl PaidIndicator {
    pub fn is_paid(&self) -> bool {
        match self {
            Self::Flag(paid) => *paid,
            Self::Label(label) => label.trim().eq_ignore_ascii_case(STATUS_PAID),
        }
    }
}

impl Default for PaidIndicator {
    fn default() -> Self {
        Self::Label(STATUS_PENDING.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DespesaDto {
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub imovel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    pub tipo: String,
    #[serde(default)]
    pub descricao: String,
    pub valor: Money,
    pub vencimento: String,
    #[serde(default)]
    pub status: PaidIndicator,
    /// Total number of installments; zero for a single payment
    #[serde(default)]
    pub parcelas: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parcela_atual: Option<u32>,
}

impl DespesaDto {
    pub fn from_draft(draft: &ExpenseDraft) -> Self {
        Self {
            id: None,
            imovel_id: None,
            cep: None,
            tipo: expense_type_to_wire(draft.expense_type).to_string(),
            descricao: draft.description.clone(),
            valor: draft.value,
            vencimento: draft.due_date.clone(),
            status: PaidIndicator::Label(
                if draft.is_paid { STATUS_PAID } else { STATUS_PENDING }.to_string(),
            ),
            parcelas: draft.installments,
            parcela_atual: None,
        }
    }

    /// Convert to the domain model. `owner` is used when the payload does
    /// not name its property.
    pub fn into_expense(self, owner: Option<&PropertyId>) -> Expense {
        let property_id = self
            .imovel_id
            .or(self.cep)
            .map(PropertyId::from)
            .or_else(|| owner.cloned())
            .unwrap_or_else(|| PropertyId::from(""));

        let installments = (self.parcelas > 0).then(|| Installments {
            current: self.parcela_atual.unwrap_or(1),
            total: self.parcelas,
        });

        Expense {
            id: self.id.map(ExpenseId::from).unwrap_or_default(),
            property_id,
            expense_type: ExpenseType::parse(&self.tipo).unwrap_or(ExpenseType::Other),
            description: self.descricao,
            value: self.valor,
            due_date: self.vencimento,
            is_paid: self.status.is_paid(),
            installments,
        }
    }
}
