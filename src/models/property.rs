//! Property model
//!
//! A real-estate property owned by the user, with its utility registrations
//! and the documents and expenses attached to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::document::Document;
use super::expense::Expense;
use super::ids::PropertyId;
use super::money::Money;

/// Kind of property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum PropertyType {
    #[default]
    House,
    Apartment,
    Commercial,
    Land,
    Other,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        Self::House,
        Self::Apartment,
        Self::Commercial,
        Self::Land,
        Self::Other,
    ];

    /// Parse from English or Portuguese labels, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "house" | "casa" => Some(Self::House),
            "apartment" | "apartamento" => Some(Self::Apartment),
            "commercial" | "comercial" => Some(Self::Commercial),
            "land" | "lote" => Some(Self::Land),
            "other" | "outro" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::House => write!(f, "House"),
            Self::Apartment => write!(f, "Apartment"),
            Self::Commercial => write!(f, "Commercial"),
            Self::Land => write!(f, "Land"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Registration with a utility provider (power company, water company)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityRegistration {
    pub provider: String,
    pub registration_number: String,
}

impl UtilityRegistration {
    pub fn new(provider: impl Into<String>, registration_number: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            registration_number: registration_number.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<UtilityRegistration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<UtilityRegistration>,
}

/// A property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,

    /// Postal code; the backend looks properties up by it
    pub cep: String,

    pub address: String,
    pub city: String,
    pub state: String,

    #[serde(rename = "type")]
    pub property_type: PropertyType,

    pub rooms: u32,
    pub bathrooms: u32,
    pub garage_spaces: u32,

    pub acquisition_date: NaiveDate,

    /// Assessed market value
    pub value: Money,

    /// Notary (land registry) registration
    #[serde(default)]
    pub notary_registration: String,

    /// Municipal property tax (IPTU) registration
    #[serde(default)]
    pub tax_registration: String,

    #[serde(default)]
    pub utilities: Utilities,

    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Property {
    /// Build a property from submitted form data, assigning a fresh id
    pub fn from_draft(draft: PropertyDraft) -> Self {
        let mut property = Self {
            id: PropertyId::new(),
            cep: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            property_type: PropertyType::default(),
            rooms: 0,
            bathrooms: 0,
            garage_spaces: 0,
            acquisition_date: draft.acquisition_date,
            value: Money::zero(),
            notary_registration: String::new(),
            tax_registration: String::new(),
            utilities: Utilities::default(),
            documents: Vec::new(),
            expenses: Vec::new(),
        };
        property.apply(draft);
        property
    }

    /// Overwrite the editable fields with submitted form data
    pub fn apply(&mut self, draft: PropertyDraft) {
        self.cep = draft.cep;
        self.address = draft.address;
        self.city = draft.city;
        self.state = draft.state;
        self.property_type = draft.property_type;
        self.rooms = draft.rooms;
        self.bathrooms = draft.bathrooms;
        self.garage_spaces = draft.garage_spaces;
        self.acquisition_date = draft.acquisition_date;
        self.value = draft.value;
        self.notary_registration = draft.notary_registration;
        self.tax_registration = draft.tax_registration;
        self.utilities = Utilities {
            energy: Some(UtilityRegistration::new(
                draft.energy_provider,
                draft.energy_registration,
            )),
            water: Some(UtilityRegistration::new(
                draft.water_provider,
                draft.water_registration,
            )),
        };
    }

    /// The part of the address before the first comma, used as a short label
    pub fn short_name(&self) -> &str {
        self.address
            .split(',')
            .next()
            .map(str::trim)
            .unwrap_or(&self.address)
    }
}

/// Data entered on the add/edit property form
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
    pub cep: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub property_type: PropertyType,
    pub rooms: u32,
    pub bathrooms: u32,
    pub garage_spaces: u32,
    pub acquisition_date: NaiveDate,
    pub value: Money,
    pub notary_registration: String,
    pub tax_registration: String,
    pub energy_provider: String,
    pub energy_registration: String,
    pub water_provider: String,
    pub water_registration: String,
}

impl PropertyDraft {
    /// Prefill a form from an existing property (edit flow)
    pub fn from_property(property: &Property) -> Self {
        let energy = property.utilities.energy.clone();
        let water = property.utilities.water.clone();
        Self {
            cep: property.cep.clone(),
            address: property.address.clone(),
            city: property.city.clone(),
            state: property.state.clone(),
            property_type: property.property_type,
            rooms: property.rooms,
            bathrooms: property.bathrooms,
            garage_spaces: property.garage_spaces,
            acquisition_date: property.acquisition_date,
            value: property.value,
            notary_registration: property.notary_registration.clone(),
            tax_registration: property.tax_registration.clone(),
            energy_provider: energy.as_ref().map(|u| u.provider.clone()).unwrap_or_default(),
            energy_registration: energy.map(|u| u.registration_number).unwrap_or_default(),
            water_provider: water.as_ref().map(|u| u.provider.clone()).unwrap_or_default(),
            water_registration: water.map(|u| u.registration_number).unwrap_or_default(),
        }
    }
}
