//! Property display formatting

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::settings::Settings;
use crate::models::{classify, PaymentStatus, Property, UtilityRegistration};

use super::document::format_document_list;
use super::expense::format_expense_list;

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "CEP")]
    cep: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Type")]
    property_type: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Pending")]
    pending: usize,
}

/// Format a list of properties as a table
pub fn format_property_list(
    properties: &[Property],
    today: NaiveDate,
    settings: &Settings,
) -> String {
    if properties.is_empty() {
        return "No properties found.".to_string();
    }

    let rows: Vec<PropertyRow> = properties
        .iter()
        .map(|p| PropertyRow {
            cep: p.cep.clone(),
            address: p.address.clone(),
            city: format!("{}/{}", p.city, p.state),
            property_type: p.property_type.to_string(),
            value: p.value.format_with_symbol(&settings.currency_symbol),
            pending: p
                .expenses
                .iter()
                .filter(|e| classify(e, today).is_unpaid())
                .count(),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}

fn utility_line(label: &str, registration: Option<&UtilityRegistration>) -> String {
    match registration {
        Some(r) => format!("  {:<16}{} ({})\n", label, r.registration_number, r.provider),
        None => format!("  {:<16}-\n", label),
    }
}

/// Format a single property with its documents and expenses
pub fn format_property_details(
    property: &Property,
    today: NaiveDate,
    settings: &Settings,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Property: {}\n", property.address));
    output.push_str(&format!("  ID:             {}\n", property.id));
    output.push_str(&format!("  CEP:            {}\n", property.cep));
    output.push_str(&format!(
        "  City:           {}/{}\n",
        property.city, property.state
    ));
    output.push_str(&format!("  Type:           {}\n", property.property_type));
    output.push_str(&format!(
        "  Rooms:          {} rooms, {} bathrooms, {} garage spaces\n",
        property.rooms, property.bathrooms, property.garage_spaces
    ));
    output.push_str(&format!(
        "  Acquired:       {}\n",
        property.acquisition_date.format(&settings.date_format)
    ));
    output.push_str(&format!(
        "  Value:          {}\n",
        property.value.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!(
        "  Notary reg.:    {}\n",
        property.notary_registration
    ));
    output.push_str(&format!("  IPTU reg.:      {}\n", property.tax_registration));
    output.push_str(&utility_line("Energy:", property.utilities.energy.as_ref()));
    output.push_str(&utility_line("Water:", property.utilities.water.as_ref()));

    let overdue = property
        .expenses
        .iter()
        .filter(|e| classify(e, today) == PaymentStatus::Overdue)
        .count();
    if overdue > 0 {
        output.push_str(&format!("  ! {} overdue expense(s)\n", overdue));
    }

    output.push_str("\nDocuments:\n");
    output.push_str(&format_document_list(&property.documents, settings));
    output.push_str("\n\nExpenses:\n");
    output.push_str(&format_expense_list(
        &property.expenses,
        std::slice::from_ref(property),
        today,
        settings,
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::sample_portfolio;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 3).unwrap()
    }

    #[test]
    fn test_property_list() {
        let output = format_property_list(&sample_portfolio(), today(), &Settings::default());
        assert!(output.contains("QRS 6, Bloco G, Casa 9"));
        assert!(output.contains("Brasília/DF"));
        assert!(output.contains("R$ 1.300.000,00"));
    }

    #[test]
    fn test_empty_property_list() {
        assert_eq!(
            format_property_list(&[], today(), &Settings::default()),
            "No properties found."
        );
    }

    #[test]
    fn test_property_details() {
        let property = &sample_portfolio()[2];
        let output = format_property_details(property, today(), &Settings::default());
        assert!(output.contains("CEP:            70297-400"));
        assert!(output.contains("55667788 (Neoenergia)"));
        assert!(output.contains("Acquired:       10/03/2024"));
        assert!(output.contains("! 1 overdue expense(s)"));
        assert!(output.contains("Contrato de Compra e Venda.pdf"));
        assert!(output.contains("IPTU 2024"));
    }
}
