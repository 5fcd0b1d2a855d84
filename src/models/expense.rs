//! Expense model
//!
//! A recurring or one-off cost tied to a property: utility bills, property
//! tax, insurance, maintenance. The payment state shown to users is derived
//! at read time by [`super::status::classify`]; only the paid flag is stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, PropertyId};
use super::money::Money;

/// Category of expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum ExpenseType {
    #[default]
    Energy,
    Water,
    Tax,
    Maintenance,
    Insurance,
    Other,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 6] = [
        Self::Energy,
        Self::Water,
        Self::Tax,
        Self::Maintenance,
        Self::Insurance,
        Self::Other,
    ];

    /// Parse from English or Portuguese labels, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "energy" | "energia" | "luz" => Some(Self::Energy),
            "water" | "agua" | "água" => Some(Self::Water),
            "tax" | "imposto" | "iptu" => Some(Self::Tax),
            "maintenance" | "manutencao" | "manutenção" => Some(Self::Maintenance),
            "insurance" | "seguro" => Some(Self::Insurance),
            "other" | "outro" | "outros" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Energy => write!(f, "Energy"),
            Self::Water => write!(f, "Water"),
            Self::Tax => write!(f, "Tax"),
            Self::Maintenance => write!(f, "Maintenance"),
            Self::Insurance => write!(f, "Insurance"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Progress through a bill paid in parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installments {
    pub current: u32,
    pub total: u32,
}

impl fmt::Display for Installments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}

/// An expense attached to a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,

    /// Owning property; the expense does not own it
    pub property_id: PropertyId,

    #[serde(rename = "type")]
    pub expense_type: ExpenseType,

    #[serde(default)]
    pub description: String,

    pub value: Money,

    /// Due date exactly as received. Kept unparsed so a malformed date
    /// reaches the classifier instead of failing the whole list.
    pub due_date: String,

    #[serde(default)]
    pub is_paid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<Installments>,
}

impl Expense {
    pub fn new(
        property_id: PropertyId,
        expense_type: ExpenseType,
        value: Money,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            property_id,
            expense_type,
            description: String::new(),
            value,
            due_date: due_date.into(),
            is_paid: false,
            installments: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build the stored expense from a submitted form
    pub fn from_draft(property_id: PropertyId, draft: ExpenseDraft) -> Self {
        let installments = (draft.installments > 0).then_some(Installments {
            current: 1,
            total: draft.installments,
        });
        Self {
            id: ExpenseId::new(),
            property_id,
            expense_type: draft.expense_type,
            description: draft.description,
            value: draft.value,
            due_date: draft.due_date,
            is_paid: draft.is_paid,
            installments,
        }
    }

    pub fn mark_paid(&mut self) {
        self.is_paid = true;
    }
}

/// Data entered on the add-expense form
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// Postal code of the property the expense belongs to
    pub cep: String,
    pub expense_type: ExpenseType,
    pub description: String,
    /// Number of installments; zero means a single payment
    pub installments: u32,
    pub due_date: String,
    pub is_paid: bool,
    pub value: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_type_parse() {
        assert_eq!(ExpenseType::parse("Energia"), Some(ExpenseType::Energy));
        assert_eq!(ExpenseType::parse("água"), Some(ExpenseType::Water));
        assert_eq!(ExpenseType::parse("IPTU"), Some(ExpenseType::Tax));
        assert_eq!(ExpenseType::parse("insurance"), Some(ExpenseType::Insurance));
        assert_eq!(ExpenseType::parse("rent"), None);
    }

    #[test]
    fn test_from_draft_installments() {
        let draft = ExpenseDraft {
            cep: "70000-000".into(),
            expense_type: ExpenseType::Tax,
            description: "IPTU 2024".into(),
            installments: 12,
            due_date: "2024-04-10".into(),
            is_paid: false,
            value: Money::from_reais(12_000),
        };
        let expense = Expense::from_draft(PropertyId::from("3"), draft.clone());
        assert_eq!(expense.installments.unwrap().to_string(), "1/12");

        let single = Expense::from_draft(
            PropertyId::from("3"),
            ExpenseDraft {
                installments: 0,
                ..draft
            },
        );
        assert!(single.installments.is_none());
    }

    #[test]
    fn test_canonical_json_shape() {
        let json = r#"{
            "id": "3",
            "propertyId": "2",
            "type": "Tax",
            "description": "IPTU 2023",
            "value": 4200,
            "dueDate": "2023-04-15",
            "isPaid": false,
            "installments": { "current": 4, "total": 10 }
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.expense_type, ExpenseType::Tax);
        assert_eq!(expense.value, Money::from_reais(4200));
        assert_eq!(expense.installments.unwrap().total, 10);
    }
}
