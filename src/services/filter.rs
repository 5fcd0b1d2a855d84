//! Search and filter engine for the list screens
//!
//! A list is narrowed by a free-text query and by typed filters, one
//! optional value per dimension, combined with AND. The input order is
//! kept. Every call re-scans the whole collection.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{
    classify, Expense, ExpenseType, PaymentStatus, Property, PropertyId, PropertyType,
};

/// Items that can be matched by the free-text query
pub trait Searchable {
    /// Text fields the query is matched against
    fn search_fields(&self) -> Vec<String>;
}

impl Searchable for Expense {
    fn search_fields(&self) -> Vec<String> {
        vec![self.description.clone(), self.expense_type.to_string()]
    }
}

impl Searchable for Property {
    fn search_fields(&self) -> Vec<String> {
        vec![self.address.clone(), self.city.clone(), self.state.clone()]
    }
}

/// A set of active filter values for items of type `T`
pub trait ItemFilter<T> {
    fn matches(&self, item: &T, today: NaiveDate) -> bool;
}

fn matches_query<T: Searchable>(item: &T, needle: &str) -> bool {
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Items matching `query` (case-insensitive substring) and every active
/// filter, in input order
pub fn filter<T, F>(items: &[T], query: &str, filters: &F, today: NaiveDate) -> Vec<T>
where
    T: Searchable + Clone,
    F: ItemFilter<T>,
{
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || matches_query(*item, &needle))
        .filter(|item| filters.matches(item, today))
        .cloned()
        .collect()
}

/// Select `value`, or clear the dimension when it is already selected
fn toggle<V: PartialEq>(slot: &mut Option<V>, value: V) {
    if slot.as_ref() == Some(&value) {
        *slot = None;
    } else {
        *slot = Some(value);
    }
}

/// Filters on the expense list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilters {
    pub category: Option<ExpenseType>,
    pub property: Option<PropertyId>,
    pub status: Option<PaymentStatus>,
    /// Property the list was opened for; survives a reset
    scope: Option<PropertyId>,
}

impl ExpenseFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters for a list opened from one property's page
    pub fn scoped(property: PropertyId) -> Self {
        Self {
            property: Some(property.clone()),
            scope: Some(property),
            ..Self::default()
        }
    }

    pub fn scope(&self) -> Option<&PropertyId> {
        self.scope.as_ref()
    }

    pub fn toggle_category(&mut self, category: ExpenseType) {
        toggle(&mut self.category, category);
    }

    pub fn toggle_property(&mut self, property: PropertyId) {
        toggle(&mut self.property, property);
    }

    pub fn toggle_status(&mut self, status: PaymentStatus) {
        toggle(&mut self.status, status);
    }

    /// Clear every dimension except the scoped property
    pub fn reset(&mut self) {
        self.category = None;
        self.status = None;
        self.property = self.scope.clone();
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.property.is_none() && self.status.is_none()
    }
}

impl ItemFilter<Expense> for ExpenseFilters {
    fn matches(&self, expense: &Expense, today: NaiveDate) -> bool {
        if self.category.is_some_and(|c| c != expense.expense_type) {
            return false;
        }
        if self
            .property
            .as_ref()
            .is_some_and(|p| p != &expense.property_id)
        {
            return false;
        }
        // An unparseable date only matches when no status is selected
        match self.status {
            Some(status) => classify(expense, today) == status,
            None => true,
        }
    }
}

/// Filters on the property list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilters {
    pub category: Option<PropertyType>,
    pub city: Option<String>,
}

impl PropertyFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_category(&mut self, category: PropertyType) {
        toggle(&mut self.category, category);
    }

    pub fn toggle_city(&mut self, city: impl Into<String>) {
        let city = city.into();
        let same = self
            .city
            .as_ref()
            .is_some_and(|c| c.to_lowercase() == city.to_lowercase());
        self.city = if same { None } else { Some(city) };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.city.is_none()
    }
}

impl ItemFilter<Property> for PropertyFilters {
    fn matches(&self, property: &Property, _today: NaiveDate) -> bool {
        if self.category.is_some_and(|c| c != property.property_type) {
            return false;
        }
        match &self.city {
            Some(city) => property.city.to_lowercase() == city.to_lowercase(),
            None => true,
        }
    }
}

/// Distinct expense categories present, sorted
pub fn expense_categories(expenses: &[Expense]) -> Vec<ExpenseType> {
    expenses
        .iter()
        .map(|e| e.expense_type)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct property categories present, sorted
pub fn property_categories(properties: &[Property]) -> Vec<PropertyType> {
    properties
        .iter()
        .map(|p| p.property_type)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct cities present, sorted
pub fn property_cities(properties: &[Property]) -> Vec<String> {
    properties
        .iter()
        .map(|p| p.city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::sample_portfolio;
    use crate::models::Money;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn expense(property: &str, due: &str, paid: bool) -> Expense {
        let mut e = Expense::new(
            PropertyId::from(property),
            ExpenseType::Energy,
            Money::from_reais(100),
            due,
        );
        e.is_paid = paid;
        e
    }

    fn sample_expenses() -> Vec<Expense> {
        sample_portfolio()
            .into_iter()
            .flat_map(|p| p.expenses)
            .collect()
    }

    #[test]
    fn test_empty_query_and_filters_return_input() {
        let expenses = sample_expenses();
        let result = filter(&expenses, "", &ExpenseFilters::new(), today());
        assert_eq!(result, expenses);

        let properties = sample_portfolio();
        let result = filter(&properties, "   ", &PropertyFilters::new(), today());
        assert_eq!(result, properties);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let result = filter::<Expense, _>(&[], "luz", &ExpenseFilters::new(), today());
        assert!(result.is_empty());
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let expenses = sample_expenses();
        let result = filter(&expenses, "IPTU", &ExpenseFilters::new(), today());
        assert_eq!(result.len(), 2);

        // Category label is searchable too
        let result = filter(&expenses, "water", &ExpenseFilters::new(), today());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_property_query_matches_address_city_state() {
        let properties = sample_portfolio();
        assert_eq!(
            filter(&properties, "asa sul", &PropertyFilters::new(), today()).len(),
            1
        );
        assert_eq!(
            filter(&properties, "brasília", &PropertyFilters::new(), today()).len(),
            3
        );
        assert_eq!(
            filter(&properties, "df", &PropertyFilters::new(), today()).len(),
            3
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let expenses = sample_expenses();
        let mut filters = ExpenseFilters::new();
        filters.toggle_status(PaymentStatus::Overdue);
        filters.toggle_category(ExpenseType::Water);

        let once = filter(&expenses, "conta", &filters, today());
        let twice = filter(&once, "conta", &filters, today());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_toggle_twice_clears() {
        let mut filters = ExpenseFilters::new();
        filters.toggle_category(ExpenseType::Tax);
        assert_eq!(filters.category, Some(ExpenseType::Tax));
        filters.toggle_category(ExpenseType::Tax);
        assert!(filters.category.is_none());

        filters.toggle_category(ExpenseType::Tax);
        filters.toggle_category(ExpenseType::Water);
        assert_eq!(filters.category, Some(ExpenseType::Water));

        let mut filters = PropertyFilters::new();
        filters.toggle_city("Brasília");
        filters.toggle_city("brasília");
        assert!(filters.is_empty());
    }

    #[test]
    fn test_status_filter_uses_classification() {
        let expenses = vec![
            expense("1", "2024-01-01", true),
            expense("1", "2024-01-01", false),
            expense("1", "2030-01-01", false),
        ];

        let mut filters = ExpenseFilters::new();
        filters.toggle_status(PaymentStatus::Overdue);
        let overdue = filter(&expenses, "", &filters, today());
        assert_eq!(overdue, vec![expenses[1].clone()]);

        filters.toggle_status(PaymentStatus::Pending);
        let pending = filter(&expenses, "", &filters, today());
        assert_eq!(pending, vec![expenses[2].clone()]);

        filters.toggle_status(PaymentStatus::Paid);
        let paid = filter(&expenses, "", &filters, today());
        assert_eq!(paid, vec![expenses[0].clone()]);
    }

    #[test]
    fn test_invalid_date_matches_no_status() {
        let expenses = vec![expense("1", "someday", false)];
        for status in [PaymentStatus::Paid, PaymentStatus::Pending, PaymentStatus::Overdue] {
            let mut filters = ExpenseFilters::new();
            filters.toggle_status(status);
            assert!(filter(&expenses, "", &filters, today()).is_empty());
        }
        assert_eq!(
            filter(&expenses, "", &ExpenseFilters::new(), today()).len(),
            1
        );
    }

    #[test]
    fn test_filter_matching_nothing_is_empty() {
        let expenses = sample_expenses();
        let mut filters = ExpenseFilters::new();
        filters.toggle_category(ExpenseType::Insurance);
        assert!(filter(&expenses, "", &filters, today()).is_empty());
    }

    #[test]
    fn test_reset_keeps_scope() {
        let mut filters = ExpenseFilters::scoped(PropertyId::from("2"));
        filters.toggle_category(ExpenseType::Tax);
        filters.toggle_status(PaymentStatus::Overdue);

        filters.reset();
        assert_eq!(filters.property, Some(PropertyId::from("2")));
        assert!(filters.category.is_none());
        assert!(filters.status.is_none());

        let scoped = filter(&sample_expenses(), "", &filters, today());
        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().all(|e| e.property_id.as_str() == "2"));
    }

    #[test]
    fn test_property_filters() {
        let mut properties = sample_portfolio();
        properties[0].city = "Goiânia".into();
        properties[1].property_type = PropertyType::Apartment;

        let mut filters = PropertyFilters::new();
        filters.toggle_city("brasília");
        assert_eq!(filter(&properties, "", &filters, today()).len(), 2);

        filters.toggle_category(PropertyType::Apartment);
        let result = filter(&properties, "", &filters, today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_str(), "2");

        filters.reset();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_option_helpers() {
        let mut properties = sample_portfolio();
        properties[0].city = "Goiânia".into();
        assert_eq!(property_cities(&properties), vec!["Brasília", "Goiânia"]);
        assert_eq!(property_categories(&properties), vec![PropertyType::House]);

        assert_eq!(
            expense_categories(&sample_expenses()),
            vec![ExpenseType::Energy, ExpenseType::Water, ExpenseType::Tax]
        );
    }
}
