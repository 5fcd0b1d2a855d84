//! Expense CLI commands

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_line, format_expense_list};
use crate::error::{RubikError, RubikResult};
use crate::gateway::DataGateway;
use crate::models::{ExpenseDraft, ExpenseId, ExpenseType, PaymentStatus};
use crate::services::filter::{expense_categories, filter, ExpenseFilters};
use crate::services::validation::validate_expense;

use super::property::parse_money_arg;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// List expenses
    List {
        /// Only expenses of this property (CEP)
        #[arg(short, long)]
        property: Option<String>,
        /// Search description and type
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only expenses of this type (energy, water, tax, maintenance, insurance, other)
        #[arg(short = 't', long = "type")]
        expense_type: Option<String>,
        /// Only expenses with this status (paid, pending, overdue)
        #[arg(long)]
        status: Option<String>,
    },
    /// Add an expense to a property
    Add {
        /// Property CEP
        #[arg(short, long)]
        property: String,
        /// energy, water, tax, maintenance, insurance or other
        #[arg(short = 't', long = "type")]
        expense_type: String,
        /// Amount, e.g. "150" or "130,40"
        #[arg(long)]
        value: String,
        /// Due date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(short, long)]
        due: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Number of installments (0 for a single payment)
        #[arg(short, long, default_value = "0")]
        installments: u32,
        /// Record as already paid
        #[arg(long)]
        paid: bool,
    },
    /// Mark an expense as paid
    Pay {
        /// Expense ID
        expense: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_expense_type(s: &str) -> RubikResult<ExpenseType> {
    ExpenseType::parse(s).ok_or_else(|| {
        RubikError::Validation(format!(
            "Invalid expense type: '{}'. Valid types: energy, water, tax, maintenance, insurance, other",
            s
        ))
    })
}

fn parse_status(s: &str) -> RubikResult<PaymentStatus> {
    PaymentStatus::parse(s).ok_or_else(|| {
        RubikError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: paid, pending, overdue",
            s
        ))
    })
}

fn confirm(prompt: &str) -> RubikResult<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim"))
}

/// Handle an expense command
pub async fn handle_expense_command(
    gateway: &DataGateway,
    settings: &Settings,
    today: NaiveDate,
    cmd: ExpenseCommands,
) -> RubikResult<()> {
    match cmd {
        ExpenseCommands::List {
            property,
            search,
            expense_type,
            status,
        } => {
            let (expenses, properties, mut filters) = match property {
                Some(key) => {
                    let property = gateway.get_property(&key).await?;
                    let expenses = gateway
                        .property_expenses(&key)
                        .await?
                        .into_iter()
                        // Everything fetched for a property belongs to it
                        .map(|mut e| {
                            e.property_id = property.id.clone();
                            e
                        })
                        .collect::<Vec<_>>();
                    let filters = ExpenseFilters::scoped(property.id.clone());
                    (expenses, vec![property], filters)
                }
                None => (
                    gateway.expenses().await?,
                    gateway.properties().await?,
                    ExpenseFilters::new(),
                ),
            };
            if let Some(t) = expense_type {
                filters.toggle_category(parse_expense_type(&t)?);
            }
            if let Some(s) = status {
                filters.toggle_status(parse_status(&s)?);
            }

            let shown = filter(&expenses, &search, &filters, today);
            print!("{}", format_expense_list(&shown, &properties, today, settings));
            if shown.is_empty() && (filters.category.is_some() || filters.status.is_some()) {
                let types: Vec<String> = expense_categories(&expenses)
                    .iter()
                    .map(|t| t.to_string())
                    .collect();
                println!("Types with expenses: {}", types.join(", "));
            }
        }

        ExpenseCommands::Add {
            property,
            expense_type,
            value,
            due,
            description,
            installments,
            paid,
        } => {
            let draft = ExpenseDraft {
                cep: property,
                expense_type: parse_expense_type(&expense_type)?,
                description,
                installments,
                due_date: due,
                is_paid: paid,
                value: parse_money_arg(&value)?,
            };
            validate_expense(&draft)?;

            let expense = gateway.create_expense(&draft).await?;
            println!("Created expense: {}", format_expense_line(&expense, today, settings));
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::Pay { expense, yes } => {
            let id = ExpenseId::from(expense);
            let found = gateway
                .expenses()
                .await?
                .into_iter()
                .find(|e| e.id == id)
                .ok_or_else(|| RubikError::expense_not_found(id.as_str()))?;

            if found.is_paid {
                println!("Already paid: {}", format_expense_line(&found, today, settings));
                return Ok(());
            }

            let line = format_expense_line(&found, today, settings);
            if !yes && !confirm(&format!("Mark as paid: {}?", line))? {
                println!("Cancelled.");
                return Ok(());
            }

            gateway.mark_expense_paid(&id).await?;
            println!("Marked as paid: {}", line);
        }
    }

    Ok(())
}
