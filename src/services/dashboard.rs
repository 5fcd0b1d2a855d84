//! Home screen summary

use chrono::NaiveDate;

use crate::error::RubikResult;
use crate::gateway::DataGateway;
use crate::models::{classify, parse_due_date, Expense, Money, PaymentStatus, User};

/// Figures shown on the home screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub user: User,
    pub property_count: usize,
    /// Unpaid expenses, overdue ones included
    pub pending_count: usize,
    pub pending_total: Money,
    pub overdue_count: usize,
    pub overdue_total: Money,
    /// Earliest due date among unpaid expenses with a readable date
    pub next_due_date: Option<NaiveDate>,
}

impl Dashboard {
    pub fn compute(
        user: User,
        property_count: usize,
        expenses: &[Expense],
        today: NaiveDate,
    ) -> Self {
        let mut dashboard = Self {
            user,
            property_count,
            pending_count: 0,
            pending_total: Money::zero(),
            overdue_count: 0,
            overdue_total: Money::zero(),
            next_due_date: None,
        };

        for expense in expenses {
            let status = classify(expense, today);
            if !status.is_unpaid() {
                continue;
            }
            dashboard.pending_count += 1;
            dashboard.pending_total += expense.value;

            if status == PaymentStatus::Overdue {
                dashboard.overdue_count += 1;
                dashboard.overdue_total += expense.value;
            }

            if let Some(due) = parse_due_date(&expense.due_date) {
                dashboard.next_due_date = Some(match dashboard.next_due_date {
                    Some(current) => current.min(due),
                    None => due,
                });
            }
        }

        dashboard
    }

    /// Whether the overdue banner should be shown
    pub fn has_overdue_alert(&self) -> bool {
        self.overdue_count > 0
    }
}

/// Service assembling the home screen
pub struct DashboardService<'a> {
    gateway: &'a DataGateway,
}

impl<'a> DashboardService<'a> {
    pub fn new(gateway: &'a DataGateway) -> Self {
        Self { gateway }
    }

    pub async fn load(&self, today: NaiveDate) -> RubikResult<Dashboard> {
        let session = self.gateway.session()?;
        let properties = self.gateway.properties().await?;
        let expenses = self.gateway.expenses().await?;
        Ok(Dashboard::compute(
            session.user,
            properties.len(),
            &expenses,
            today,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::DEMO_EMAIL;
    use crate::gateway::InMemoryBackend;
    use crate::models::{ExpenseType, PropertyId};
    use crate::storage::SessionStore;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 3).unwrap()
    }

    fn user() -> User {
        User::new("1", "Demo", DEMO_EMAIL)
    }

    fn expense(cents: i64, due: &str, paid: bool) -> Expense {
        let mut e = Expense::new(
            PropertyId::from("1"),
            ExpenseType::Water,
            Money::from_cents(cents),
            due,
        );
        e.is_paid = paid;
        e
    }

    #[test]
    fn test_compute() {
        let expenses = vec![
            expense(10000, "2024-04-01", true),
            expense(20000, "2024-04-02", false),
            expense(30000, "2024-04-03", false),
            expense(40000, "garbage", false),
        ];
        let dashboard = Dashboard::compute(user(), 2, &expenses, today());

        assert_eq!(dashboard.pending_count, 3);
        assert_eq!(dashboard.pending_total, Money::from_cents(90000));
        assert_eq!(dashboard.overdue_count, 1);
        assert_eq!(dashboard.overdue_total, Money::from_cents(20000));
        assert_eq!(
            dashboard.next_due_date,
            NaiveDate::from_ymd_opt(2024, 4, 2)
        );
        assert!(dashboard.has_overdue_alert());
    }

    #[test]
    fn test_no_alert_when_nothing_overdue() {
        let expenses = vec![expense(10000, "2030-01-01", false)];
        let dashboard = Dashboard::compute(user(), 1, &expenses, today());
        assert!(!dashboard.has_overdue_alert());
        assert_eq!(dashboard.overdue_total, Money::zero());
    }

    #[tokio::test]
    async fn test_load_from_gateway() {
        let sessions = SessionStore::in_memory();
        sessions.set_session(&user(), "tok").unwrap();
        let gateway = DataGateway::new(Arc::new(InMemoryBackend::seeded()), sessions);

        let dashboard = DashboardService::new(&gateway).load(today()).await.unwrap();

        assert_eq!(dashboard.property_count, 3);
        assert_eq!(dashboard.pending_count, 5);
        // Water (2023-04-05), IPTU (2023-04-15) and energy (2024-04-01)
        assert_eq!(dashboard.overdue_count, 3);
        assert_eq!(dashboard.overdue_total, Money::from_cents(13040 + 420000 + 60000));
    }
}
