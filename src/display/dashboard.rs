//! Home screen formatting

use crate::config::settings::Settings;
use crate::services::dashboard::Dashboard;

pub fn format_dashboard(dashboard: &Dashboard, settings: &Settings) -> String {
    let symbol = &settings.currency_symbol;
    let mut output = String::new();

    output.push_str(&format!("Welcome back, {}!\n\n", dashboard.user.name));
    output.push_str(&format!("  Properties:        {}\n", dashboard.property_count));
    output.push_str(&format!(
        "  Pending expenses:  {} ({})\n",
        dashboard.pending_count,
        dashboard.pending_total.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Next due date:     {}\n",
        dashboard
            .next_due_date
            .map(|d| d.format(&settings.date_format).to_string())
            .unwrap_or_else(|| "None".to_string())
    ));

    if dashboard.has_overdue_alert() {
        output.push_str(&format!(
            "\nWarning: you have {} overdue expense(s) totalling {}.\n",
            dashboard.overdue_count,
            dashboard.overdue_total.format_with_symbol(symbol)
        ));
        output.push_str("Run `rubik expense list --status overdue` to see them.\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, User};
    use chrono::NaiveDate;

    fn dashboard(overdue_count: usize) -> Dashboard {
        Dashboard {
            user: User::new("1", "Ana", "ana@example.com"),
            property_count: 3,
            pending_count: 2,
            pending_total: Money::from_cents(35040),
            overdue_count,
            overdue_total: Money::from_cents(13040),
            next_due_date: NaiveDate::from_ymd_opt(2023, 4, 5),
        }
    }

    #[test]
    fn test_alert_only_when_overdue() {
        let settings = Settings::default();
        let with_alert = format_dashboard(&dashboard(1), &settings);
        assert!(with_alert.contains("1 overdue expense(s) totalling R$ 130,40"));
        assert!(with_alert.contains("Next due date:     05/04/2023"));

        let without = format_dashboard(&dashboard(0), &settings);
        assert!(!without.contains("overdue"));
    }
}
