//! Document model
//!
//! Files attached to a property (deeds, contracts, certificates).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{DocumentId, PropertyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum DocumentType {
    Contract,
    Deed,
    Certificate,
    Insurance,
    #[default]
    Other,
}

impl DocumentType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "contract" | "contrato" => Some(Self::Contract),
            "deed" | "escritura" => Some(Self::Deed),
            "certificate" | "certidao" | "certidão" => Some(Self::Certificate),
            "insurance" | "seguro" => Some(Self::Insurance),
            "other" | "outro" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contract => write!(f, "Contract"),
            Self::Deed => write!(f, "Deed"),
            Self::Certificate => write!(f, "Certificate"),
            Self::Insurance => write!(f, "Insurance"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A document attached to a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,

    /// Owning property. Older payloads nest documents under the property
    /// without repeating its id, so this may be filled in by the caller.
    #[serde(default)]
    pub property_id: Option<PropertyId>,

    pub name: String,

    #[serde(rename = "type")]
    pub document_type: DocumentType,

    pub upload_date: NaiveDate,

    /// Where the file can be fetched from
    pub file_url: String,
}

impl Document {
    pub fn new(
        property_id: PropertyId,
        name: impl Into<String>,
        document_type: DocumentType,
        upload_date: NaiveDate,
        file_url: impl Into<String>,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            property_id: Some(property_id),
            name: name.into(),
            document_type,
            upload_date,
            file_url: file_url.into(),
        }
    }
}
