//! Property CLI commands

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::api::wire::{ENERGY_PROVIDER, WATER_PROVIDER};
use crate::config::settings::Settings;
use crate::display::{format_property_details, format_property_list};
use crate::error::{RubikError, RubikResult};
use crate::gateway::DataGateway;
use crate::models::{parse_due_date, Money, PropertyDraft, PropertyType};
use crate::services::filter::{filter, property_cities, PropertyFilters};
use crate::services::validation::validate_property;

/// Property subcommands
#[derive(Subcommand)]
pub enum PropertyCommands {
    /// List properties
    List {
        /// Search address, city and state
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only properties of this type (house, apartment, commercial, land, other)
        #[arg(short = 't', long = "type")]
        property_type: Option<String>,
        /// Only properties in this city
        #[arg(short, long)]
        city: Option<String>,
    },
    /// Show a property with its documents and expenses
    Show {
        /// Property CEP
        property: String,
    },
    /// Register a new property
    Add(PropertyArgs),
    /// Edit a property; only the given fields change
    Edit {
        /// Property CEP
        property: String,
        #[command(flatten)]
        fields: PropertyArgs,
    },
}

/// Property form fields
#[derive(Args, Default)]
pub struct PropertyArgs {
    /// Postal code
    #[arg(long)]
    pub cep: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    /// house, apartment, commercial, land or other
    #[arg(short = 't', long = "type")]
    pub property_type: Option<String>,
    #[arg(long)]
    pub rooms: Option<u32>,
    #[arg(long)]
    pub bathrooms: Option<u32>,
    #[arg(long)]
    pub garage: Option<u32>,
    /// Acquisition date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub acquired: Option<String>,
    /// Market value, e.g. "950000" or "950.000,00"
    #[arg(long)]
    pub value: Option<String>,
    /// Notary registration number
    #[arg(long)]
    pub notary: Option<String>,
    /// Property tax (IPTU) registration number
    #[arg(long)]
    pub iptu: Option<String>,
    /// Power utility registration number
    #[arg(long)]
    pub energy: Option<String>,
    /// Water utility registration number
    #[arg(long)]
    pub water: Option<String>,
}

pub(crate) fn parse_property_type(s: &str) -> RubikResult<PropertyType> {
    PropertyType::parse(s).ok_or_else(|| {
        RubikError::Validation(format!(
            "Invalid property type: '{}'. Valid types: house, apartment, commercial, land, other",
            s
        ))
    })
}

pub(crate) fn parse_date_arg(s: &str) -> RubikResult<NaiveDate> {
    parse_due_date(s).ok_or_else(|| {
        RubikError::Validation(format!(
            "Invalid date: '{}'. Use YYYY-MM-DD or DD/MM/YYYY",
            s
        ))
    })
}

pub(crate) fn parse_money_arg(s: &str) -> RubikResult<Money> {
    Money::parse(s).map_err(|e| {
        RubikError::Validation(format!("Invalid amount '{}': {}", s, e))
    })
}

impl PropertyArgs {
    /// Overlay the given fields onto `draft`
    fn apply_to(self, draft: &mut PropertyDraft) -> RubikResult<()> {
        if let Some(cep) = self.cep {
            draft.cep = cep;
        }
        if let Some(address) = self.address {
            draft.address = address;
        }
        if let Some(city) = self.city {
            draft.city = city;
        }
        if let Some(state) = self.state {
            draft.state = state;
        }
        if let Some(t) = self.property_type {
            draft.property_type = parse_property_type(&t)?;
        }
        if let Some(rooms) = self.rooms {
            draft.rooms = rooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            draft.bathrooms = bathrooms;
        }
        if let Some(garage) = self.garage {
            draft.garage_spaces = garage;
        }
        if let Some(acquired) = self.acquired {
            draft.acquisition_date = parse_date_arg(&acquired)?;
        }
        if let Some(value) = self.value {
            draft.value = parse_money_arg(&value)?;
        }
        if let Some(notary) = self.notary {
            draft.notary_registration = notary;
        }
        if let Some(iptu) = self.iptu {
            draft.tax_registration = iptu;
        }
        if let Some(energy) = self.energy {
            draft.energy_registration = energy;
        }
        if let Some(water) = self.water {
            draft.water_registration = water;
        }
        Ok(())
    }
}

fn blank_draft(today: NaiveDate) -> PropertyDraft {
    PropertyDraft {
        cep: String::new(),
        address: String::new(),
        city: String::new(),
        state: String::new(),
        property_type: PropertyType::House,
        rooms: 0,
        bathrooms: 0,
        garage_spaces: 0,
        acquisition_date: today,
        value: Money::zero(),
        notary_registration: String::new(),
        tax_registration: String::new(),
        energy_provider: ENERGY_PROVIDER.to_string(),
        energy_registration: String::new(),
        water_provider: WATER_PROVIDER.to_string(),
        water_registration: String::new(),
    }
}

/// Handle a property command
pub async fn handle_property_command(
    gateway: &DataGateway,
    settings: &Settings,
    today: NaiveDate,
    cmd: PropertyCommands,
) -> RubikResult<()> {
    match cmd {
        PropertyCommands::List {
            search,
            property_type,
            city,
        } => {
            let properties = gateway.properties().await?;

            let mut filters = PropertyFilters::new();
            if let Some(t) = property_type {
                filters.toggle_category(parse_property_type(&t)?);
            }
            if let Some(city) = city {
                filters.toggle_city(city);
            }

            let shown = filter(&properties, &search, &filters, today);
            print!("{}", format_property_list(&shown, today, settings));
            if shown.is_empty() && !properties.is_empty() {
                println!(
                    "Cities with properties: {}",
                    property_cities(&properties).join(", ")
                );
            }
        }

        PropertyCommands::Show { property } => {
            let property = gateway.get_property(&property).await?;
            print!("{}", format_property_details(&property, today, settings));
        }

        PropertyCommands::Add(fields) => {
            let mut draft = blank_draft(today);
            fields.apply_to(&mut draft)?;
            validate_property(&draft)?;

            let property = gateway.create_property(&draft).await?;
            println!("Created property: {}", property.address);
            println!("  CEP: {}", property.cep);
            println!("  ID:  {}", property.id);
        }

        PropertyCommands::Edit { property, fields } => {
            let existing = gateway.get_property(&property).await?;
            let mut draft = PropertyDraft::from_property(&existing);
            fields.apply_to(&mut draft)?;

            if draft == PropertyDraft::from_property(&existing) {
                println!("No changes specified. Use --help to see the editable fields.");
                return Ok(());
            }
            validate_property(&draft)?;

            let updated = gateway.update_property(&existing.cep, &draft).await?;
            println!("Updated property: {}", updated.address);
        }
    }

    Ok(())
}
