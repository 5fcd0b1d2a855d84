//! Expense display formatting
//!
//! Formats expenses for terminal output. Status always comes from
//! [`classify`], so a row, a filter and the dashboard never disagree.

use std::collections::HashMap;

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::settings::Settings;
use crate::models::status::{days_until_due, format_due_date};
use crate::models::{classify, Expense, Money, PaymentStatus, Property, PropertyId};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Type")]
    expense_type: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Inst.")]
    installments: String,
}

/// Status label with how far the due date is, e.g. "Overdue (3d)"
pub fn status_label(expense: &Expense, today: NaiveDate) -> String {
    let status = classify(expense, today);
    match (status, days_until_due(expense, today)) {
        (PaymentStatus::Overdue, Some(days)) => format!("{} ({}d)", status, -days),
        (PaymentStatus::Pending, Some(0)) => format!("{} (today)", status),
        _ => status.to_string(),
    }
}

/// Format a list of expenses as a table
///
/// `properties` is only used to label each row with its property.
pub fn format_expense_list(
    expenses: &[Expense],
    properties: &[Property],
    today: NaiveDate,
    settings: &Settings,
) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let names: HashMap<&PropertyId, &str> = properties
        .iter()
        .map(|p| (&p.id, p.short_name()))
        .collect();

    let rows: Vec<ExpenseRow> = expenses
        .iter()
        .map(|e| ExpenseRow {
            id: e.id.to_string(),
            property: names
                .get(&e.property_id)
                .map(|s| s.to_string())
                .unwrap_or_else(|| e.property_id.to_string()),
            expense_type: e.expense_type.to_string(),
            description: e.description.clone(),
            value: e.value.format_with_symbol(&settings.currency_symbol),
            due: format_due_date(&e.due_date, &settings.date_format),
            status: status_label(e, today),
            installments: e.installments.map(|i| i.to_string()).unwrap_or_default(),
        })
        .collect();

    let total: Money = expenses.iter().map(|e| e.value).sum();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output.push_str(&format!(
        "{} expense(s), total {}\n",
        expenses.len(),
        total.format_with_symbol(&settings.currency_symbol)
    ));
    output
}

/// One-line description used in confirmations
pub fn format_expense_line(expense: &Expense, today: NaiveDate, settings: &Settings) -> String {
    let label = if expense.description.is_empty() {
        expense.expense_type.to_string()
    } else {
        format!("{} ({})", expense.description, expense.expense_type)
    };
    format!(
        "{} - {} due {} [{}]",
        label,
        expense.value.format_with_symbol(&settings.currency_symbol),
        format_due_date(&expense.due_date, &settings.date_format),
        status_label(expense, today)
    )
}
