//! Budget service
//!
//! CRUD for spending limits plus progress and alert queries against the
//! current transaction list.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{Budget, BudgetId, BudgetPeriod, BudgetScope, CategoryId, Money};
use crate::reports::{BudgetAlert, BudgetProgress};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Input for creating a budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub name: String,
    pub amount: Money,
    pub scope: BudgetScope,
    pub period: BudgetPeriod,
    pub description: Option<String>,
}

/// Fields to change on a budget
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub scope: Option<BudgetScope>,
    pub period: Option<BudgetPeriod>,
    pub description: Option<String>,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> BudgetbookResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    pub fn get(&self, id: &BudgetId) -> BudgetbookResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Find a budget by ID, unique ID prefix or name
    pub fn find(&self, identifier: &str) -> BudgetbookResult<Option<Budget>> {
        let identifier = identifier.trim();

        if let Some(budget) = self.storage.budgets.get(&BudgetId::from(identifier))? {
            return Ok(Some(budget));
        }

        if let Some(budget) = self.storage.budgets.get_by_name(identifier)? {
            return Ok(Some(budget));
        }

        if identifier.len() >= 4 {
            let mut matches: Vec<Budget> = self
                .storage
                .budgets
                .get_all()?
                .into_iter()
                .filter(|b| b.id.as_str().starts_with(identifier))
                .collect();
            if matches.len() == 1 {
                return Ok(matches.pop());
            }
        }

        Ok(None)
    }

    pub fn list_by_period(&self, period: BudgetPeriod) -> BudgetbookResult<Vec<Budget>> {
        self.storage.budgets.get_for_period(period)
    }

    /// Budgets scoped to one category (not the `all` budgets)
    pub fn list_by_category(&self, category_id: &CategoryId) -> BudgetbookResult<Vec<Budget>> {
        self.storage
            .budgets
            .get_for_scope(&BudgetScope::Category(category_id.clone()))
    }

    /// Create a new budget
    pub fn create(&self, input: CreateBudgetInput) -> BudgetbookResult<Budget> {
        let mut budget = Budget::new(input.name.trim(), input.amount, input.scope, input.period);
        budget.description = input.description.unwrap_or_default().trim().to_string();

        budget
            .validate()
            .map_err(|e| BudgetbookError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &budget,
        )?;

        Ok(budget)
    }

    /// Merge changes into an existing budget
    pub fn update(&self, id: &BudgetId, input: UpdateBudgetInput) -> BudgetbookResult<Budget> {
        let mut budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| BudgetbookError::budget_not_found(id.to_string()))?;

        let before = budget.clone();

        if let Some(name) = input.name {
            budget.name = name.trim().to_string();
        }
        if let Some(amount) = input.amount {
            budget.amount = amount;
        }
        if let Some(scope) = input.scope {
            budget.category_id = scope;
        }
        if let Some(period) = input.period {
            budget.period = period;
        }
        if let Some(description) = input.description {
            budget.description = description.trim().to_string();
        }

        budget
            .validate()
            .map_err(|e| BudgetbookError::Validation(e.to_string()))?;
        budget.updated_at = Utc::now();

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &before,
            &budget,
        )?;

        Ok(budget)
    }

    /// Delete a budget, returning whether one was removed
    pub fn delete(&self, id: &BudgetId) -> BudgetbookResult<bool> {
        let Some(budget) = self.storage.budgets.get(id)? else {
            return Ok(false);
        };

        self.storage.budgets.delete(id)?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &budget,
        )?;

        Ok(true)
    }

    /// Progress of every budget for the window containing `today`
    pub fn progress(&self, today: NaiveDate) -> BudgetbookResult<Vec<BudgetProgress>> {
        let transactions = self.storage.transactions.get_all()?;
        Ok(self
            .list()?
            .into_iter()
            .map(|budget| BudgetProgress::calculate(budget, &transactions, today))
            .collect())
    }

    /// Over-budget and warning alerts, in budget order
    pub fn alerts(&self, today: NaiveDate, threshold: f64) -> BudgetbookResult<Vec<BudgetAlert>> {
        Ok(self
            .progress(today)?
            .iter()
            .filter_map(|progress| BudgetAlert::for_progress(progress, threshold))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Transaction, TransactionType};
    use crate::reports::AlertLevel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(name: &str, cents: i64, scope: BudgetScope) -> CreateBudgetInput {
        CreateBudgetInput {
            name: name.into(),
            amount: Money::from_cents(cents),
            scope,
            period: BudgetPeriod::Monthly,
            description: None,
        }
    }

    fn spend(storage: &Storage, cents: i64, category: &str, when: NaiveDate) {
        storage
            .transactions
            .upsert(Transaction::new(
                Money::from_cents(cents),
                TransactionType::Expense,
                CategoryId::from(category),
                when,
                "",
            ))
            .unwrap();
    }

    #[test]
    fn test_create_and_find() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);

        let budget = service
            .create(input("Eating out", 50_000, BudgetScope::Category("food".into())))
            .unwrap();

        assert_eq!(service.find("eating OUT").unwrap().unwrap().id, budget.id);
        assert_eq!(service.find(budget.id.as_str()).unwrap().unwrap().name, "Eating out");
        assert_eq!(service.list_by_category(&"food".into()).unwrap().len(), 1);
        assert_eq!(service.list_by_period(BudgetPeriod::Weekly).unwrap().len(), 0);
    }

    #[test]
    fn test_create_validation() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);

        assert!(service.create(input(" ", 100, BudgetScope::All)).unwrap_err().is_validation());
        assert!(service.create(input("Zero", 0, BudgetScope::All)).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_and_delete() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let budget = service.create(input("All spending", 100_000, BudgetScope::All)).unwrap();

        let updated = service
            .update(
                &budget.id,
                UpdateBudgetInput {
                    period: Some(BudgetPeriod::Yearly),
                    amount: Some(Money::from_cents(1_200_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.period, BudgetPeriod::Yearly);
        assert_eq!(updated.amount.cents(), 1_200_000);
        assert_eq!(updated.name, "All spending");

        assert!(service.delete(&budget.id).unwrap());
        assert!(!service.delete(&budget.id).unwrap());
        assert!(service
            .update(&budget.id, UpdateBudgetInput::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_alerts() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let today = date(2025, 10, 18);

        service.create(input("Food", 10_000, BudgetScope::Category("food".into()))).unwrap();
        service.create(input("Transport", 10_000, BudgetScope::Category("transport".into()))).unwrap();
        service.create(input("Housing", 10_000, BudgetScope::Category("housing".into()))).unwrap();

        spend(&storage, 12_000, "food", date(2025, 10, 2));
        spend(&storage, 8_500, "transport", date(2025, 10, 3));
        spend(&storage, 1_000, "housing", date(2025, 10, 3));
        // Previous month does not count
        spend(&storage, 9_000, "housing", date(2025, 9, 30));

        let alerts = service.alerts(today, 80.0).unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].level, AlertLevel::OverBudget);
        assert_eq!(alerts[0].budget_name, "Food");
        assert_eq!(alerts[1].level, AlertLevel::Warning);
        assert_eq!(alerts[1].budget_name, "Transport");
    }
}
