//! JSON import service
//!
//! Merges an exported document into the current data. Categories are matched
//! by name and type and their ids remapped, then transactions and budgets are
//! added unless an equal record already exists.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::audit::EntityType;
use crate::error::{BudgetbookError, BudgetbookResult};
use crate::models::{
    parse_date, Budget, BudgetPeriod, BudgetScope, Category, CategoryId, Money, Transaction,
    TransactionType, ALL_CATEGORIES, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON,
};
use crate::storage::Storage;

/// Name given to imported categories that have none
pub const UNNAMED_CATEGORY: &str = "Unnamed category";

/// Name given to imported budgets that have none
pub const UNNAMED_BUDGET: &str = "Imported budget";

/// The document as found on disk; every field is optional and its shape is
/// checked per collection
#[derive(Debug, Deserialize)]
struct RawDocument {
    transactions: Option<Value>,
    categories: Option<Value>,
    budgets: Option<Value>,
}

/// Records of a collection. `None` marks an element that isn't a record.
fn records<T: DeserializeOwned>(items: Vec<Value>) -> Vec<Option<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Optional collections that are null or not arrays read as empty
fn optional_records<T: DeserializeOwned>(value: Option<Value>, label: &str) -> Vec<Option<T>> {
    match value {
        Some(Value::Array(items)) => records(items),
        None | Some(Value::Null) => Vec::new(),
        Some(_) => {
            log::warn!("Ignoring imported {}: not an array", label);
            Vec::new()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCategory {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    color: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTransaction {
    amount: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    category_id: Option<String>,
    description: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawBudget {
    name: Option<String>,
    amount: Option<Value>,
    category_id: Option<String>,
    period: Option<String>,
    description: Option<String>,
}

/// Counts for one collection of the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub total: usize,
    pub new: usize,
    pub duplicate: usize,
    pub invalid: usize,
}

/// Counts for the whole document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub transactions: CollectionSummary,
    pub categories: CollectionSummary,
    pub budgets: CollectionSummary,
}

impl ImportSummary {
    pub fn format_terminal(&self) -> String {
        let line = |label: &str, c: &CollectionSummary| {
            let mut line = format!(
                "  {:<13} {} total, {} new, {} duplicate",
                label, c.total, c.new, c.duplicate
            );
            if c.invalid > 0 {
                line.push_str(&format!(", {} invalid", c.invalid));
            }
            line.push('\n');
            line
        };

        let mut output = String::new();
        output.push_str(&line("Transactions:", &self.transactions));
        output.push_str(&line("Categories:", &self.categories));
        output.push_str(&line("Budgets:", &self.budgets));
        output
    }
}

/// Everything an import would write, computed without touching storage
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    /// Imported category id to the id it resolves to locally
    pub category_map: HashMap<String, CategoryId>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub summary: ImportSummary,
}

/// Identity used to detect duplicate transactions
type TransactionKey = (NaiveDate, Money, TransactionType, Option<CategoryId>, String);

fn transaction_key(txn: &Transaction) -> TransactionKey {
    (
        txn.date,
        txn.amount,
        txn.kind,
        txn.category_id.clone(),
        txn.description.clone(),
    )
}

/// Service for JSON import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Work out what importing `json` would do; nothing is written
    ///
    /// `today` is the date given to transactions that carry none.
    pub fn analyze(&self, json: &str, today: NaiveDate) -> BudgetbookResult<ImportPlan> {
        let document: RawDocument = serde_json::from_str(json)
            .map_err(|e| BudgetbookError::Import(format!("Invalid JSON document: {}", e)))?;

        let raw_transactions: Vec<Option<RawTransaction>> = match document.transactions {
            Some(Value::Array(items)) => records(items),
            _ => {
                return Err(BudgetbookError::Validation(
                    "Invalid data format: missing transactions".into(),
                ))
            }
        };
        let raw_categories: Vec<Option<RawCategory>> =
            optional_records(document.categories, "categories");
        let raw_budgets: Vec<Option<RawBudget>> = optional_records(document.budgets, "budgets");

        let mut plan = ImportPlan::default();
        self.plan_categories(&raw_categories, &mut plan)?;
        self.plan_transactions(&raw_transactions, today, &mut plan)?;
        self.plan_budgets(&raw_budgets, &mut plan)?;

        Ok(plan)
    }

    fn plan_categories(
        &self,
        raw: &[Option<RawCategory>],
        plan: &mut ImportPlan,
    ) -> BudgetbookResult<()> {
        let existing = self.storage.categories.get_all()?;
        plan.summary.categories.total = raw.len();

        for (index, record) in raw.iter().enumerate() {
            let Some(record) = record else {
                log::warn!("Skipping imported category #{}: not a record", index + 1);
                plan.summary.categories.invalid += 1;
                continue;
            };
            let name = record
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(UNNAMED_CATEGORY);
            let kind = match record.kind.as_deref() {
                None => TransactionType::Expense,
                Some(kind) => match kind.parse::<TransactionType>() {
                    Ok(kind) => kind,
                    Err(_) => {
                        log::warn!("Skipping imported category '{}' with type '{}'", name, kind);
                        plan.summary.categories.invalid += 1;
                        continue;
                    }
                },
            };

            let matched = existing
                .iter()
                .chain(plan.categories.iter())
                .find(|c| c.name == name && c.kind == kind)
                .map(|c| c.id.clone());

            let local_id = match matched {
                Some(id) => {
                    plan.summary.categories.duplicate += 1;
                    id
                }
                None => {
                    let mut category = Category::new(name, kind);
                    category.color = record
                        .color
                        .clone()
                        .filter(|c| !c.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());
                    category.icon = record
                        .icon
                        .clone()
                        .filter(|i| !i.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string());

                    if let Err(e) = category.validate() {
                        log::warn!("Skipping imported category '{}': {}", name, e);
                        plan.summary.categories.invalid += 1;
                        continue;
                    }

                    plan.summary.categories.new += 1;
                    let id = category.id.clone();
                    plan.categories.push(category);
                    id
                }
            };

            if let Some(old_id) = &record.id {
                plan.category_map.insert(old_id.clone(), local_id);
            }
        }

        Ok(())
    }

    fn map_category(&self, plan: &ImportPlan, old_id: Option<&str>) -> Option<CategoryId> {
        let old_id = old_id.map(str::trim).filter(|id| !id.is_empty())?;
        Some(
            plan.category_map
                .get(old_id)
                .cloned()
                .unwrap_or_else(|| CategoryId::from(old_id)),
        )
    }

    fn plan_transactions(
        &self,
        raw: &[Option<RawTransaction>],
        today: NaiveDate,
        plan: &mut ImportPlan,
    ) -> BudgetbookResult<()> {
        let mut seen: Vec<TransactionKey> = self
            .storage
            .transactions
            .get_all()?
            .iter()
            .map(transaction_key)
            .collect();
        plan.summary.transactions.total = raw.len();

        for (index, record) in raw.iter().enumerate() {
            let built = match record {
                Some(record) => self.build_transaction(plan, record, today),
                None => Err("not a record".to_string()),
            };
            let txn = match built {
                Ok(txn) => txn,
                Err(reason) => {
                    log::warn!("Skipping imported transaction #{}: {}", index + 1, reason);
                    plan.summary.transactions.invalid += 1;
                    continue;
                }
            };

            let key = transaction_key(&txn);
            if seen.contains(&key) {
                plan.summary.transactions.duplicate += 1;
                continue;
            }

            seen.push(key);
            plan.summary.transactions.new += 1;
            plan.transactions.push(txn);
        }

        Ok(())
    }

    fn build_transaction(
        &self,
        plan: &ImportPlan,
        record: &RawTransaction,
        today: NaiveDate,
    ) -> Result<Transaction, String> {
        let amount = parse_amount(record.amount.as_ref()).unwrap_or_default();
        let kind = match record.kind.as_deref() {
            Some(kind) => kind.parse::<TransactionType>()?,
            None => TransactionType::Expense,
        };
        let date = match record.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(date) => parse_date(date)?,
            None => today,
        };

        let mut txn = Transaction::new(
            amount,
            kind,
            CategoryId::from(""),
            date,
            record.description.clone().unwrap_or_default(),
        );
        txn.category_id = self.map_category(plan, record.category_id.as_deref());

        txn.validate().map_err(|e| e.to_string())?;
        Ok(txn)
    }

    fn plan_budgets(&self, raw: &[Option<RawBudget>], plan: &mut ImportPlan) -> BudgetbookResult<()> {
        let mut seen: Vec<(BudgetScope, BudgetPeriod)> = self
            .storage
            .budgets
            .get_all()?
            .into_iter()
            .map(|b| (b.category_id, b.period))
            .collect();
        plan.summary.budgets.total = raw.len();

        for (index, record) in raw.iter().enumerate() {
            let built = match record {
                Some(record) => self.build_budget(plan, record),
                None => Err("not a record".to_string()),
            };
            let budget = match built {
                Ok(budget) => budget,
                Err(reason) => {
                    log::warn!("Skipping imported budget #{}: {}", index + 1, reason);
                    plan.summary.budgets.invalid += 1;
                    continue;
                }
            };

            let key = (budget.category_id.clone(), budget.period);
            if seen.contains(&key) {
                plan.summary.budgets.duplicate += 1;
                continue;
            }

            seen.push(key);
            plan.summary.budgets.new += 1;
            plan.budgets.push(budget);
        }

        Ok(())
    }

    fn build_budget(&self, plan: &ImportPlan, record: &RawBudget) -> Result<Budget, String> {
        let scope = match self.map_category(plan, record.category_id.as_deref()) {
            Some(id) if id.as_str() != ALL_CATEGORIES => BudgetScope::Category(id),
            _ => BudgetScope::All,
        };
        let period = match record.period.as_deref() {
            Some(period) => period.parse::<BudgetPeriod>()?,
            None => BudgetPeriod::Monthly,
        };
        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_BUDGET);

        let mut budget = Budget::new(
            name,
            parse_amount(record.amount.as_ref()).unwrap_or_default(),
            scope,
            period,
        );
        budget.description = record.description.clone().unwrap_or_default();

        budget.validate().map_err(|e| e.to_string())?;
        Ok(budget)
    }

    /// Write a plan produced by [`analyze`](Self::analyze)
    ///
    /// Stops at the first storage failure; records already written stay.
    pub fn apply(&self, plan: ImportPlan) -> BudgetbookResult<ImportSummary> {
        for category in plan.categories {
            self.storage.categories.upsert(category.clone())?;
            self.storage.log_create(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                &category,
            )?;
        }
        self.storage.categories.save()?;

        for txn in plan.transactions {
            self.storage.transactions.upsert(txn.clone())?;
            self.storage.log_create(
                EntityType::Transaction,
                txn.id.to_string(),
                None,
                &txn,
            )?;
        }
        self.storage.transactions.save()?;

        for budget in plan.budgets {
            self.storage.budgets.upsert(budget.clone())?;
            self.storage.log_create(
                EntityType::Budget,
                budget.id.to_string(),
                Some(budget.name.clone()),
                &budget,
            )?;
        }
        self.storage.budgets.save()?;

        let summary = plan.summary;
        log::info!(
            "Imported {} transaction(s), {} categor(ies), {} budget(s); skipped {} duplicate transaction(s)",
            summary.transactions.new,
            summary.categories.new,
            summary.budgets.new,
            summary.transactions.duplicate
        );

        Ok(summary)
    }

    /// Analyze and apply in one step
    pub fn import_json(&self, json: &str, today: NaiveDate) -> BudgetbookResult<ImportSummary> {
        let plan = self.analyze(json, today)?;
        self.apply(plan)
    }
}

/// Amounts may be numbers or numeric strings
fn parse_amount(value: Option<&Value>) -> Option<Money> {
    match value? {
        Value::Number(n) => n.as_f64().and_then(Money::from_decimal),
        Value::String(s) => Money::parse(s).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()
    }

    fn sample_document() -> String {
        json!({
            "transactions": [
                {"amount": 35.5, "type": "expense", "categoryId": "old-food", "date": "2025-10-01", "description": "Lunch"},
                {"amount": "120", "type": "income", "categoryId": "old-tips", "date": "2025-10-02", "description": ""},
                {"amount": 35.5, "type": "expense", "categoryId": "old-food", "date": "2025-10-01", "description": "Lunch"},
                {"amount": 0, "type": "expense", "categoryId": "old-food", "date": "2025-10-03"},
                {"amount": 8, "categoryId": "transport"}
            ],
            "categories": [
                {"id": "old-food", "name": "Food", "type": "expense", "color": "#FF5722", "icon": "🍽️"},
                {"id": "old-tips", "name": "Tips", "type": "income"}
            ],
            "budgets": [
                {"name": "Food", "amount": 500, "categoryId": "old-food", "period": "monthly"},
                {"amount": 2000, "categoryId": "all", "period": "monthly"},
                {"amount": 900, "categoryId": "old-food", "period": "monthly"}
            ],
            "exportDate": "2025-10-18T08:00:00.000Z",
            "version": "1.0"
        })
        .to_string()
    }

    #[test]
    fn test_missing_transactions_is_validation_error() {
        let storage = Storage::in_memory().unwrap();
        let service = ImportService::new(&storage);

        let err = service.analyze(r#"{"categories": []}"#, today()).unwrap_err();
        assert!(err.is_validation());

        let err = service
            .analyze(r#"{"transactions": {"amount": 5}}"#, today())
            .unwrap_err();
        assert!(err.is_validation());

        let err = service.analyze("not json", today()).unwrap_err();
        assert!(matches!(err, BudgetbookError::Import(_)));
    }

    #[test]
    fn test_null_or_malformed_collections_are_tolerated() {
        let storage = Storage::in_memory().unwrap();
        let service = ImportService::new(&storage);

        let document = json!({
            "transactions": [
                {"amount": 12, "type": "expense", "categoryId": "food", "date": "2025-10-05"},
                "not a record",
                {"amount": 7, "type": ["expense"], "categoryId": "food"}
            ],
            "categories": null,
            "budgets": "none"
        })
        .to_string();

        let plan = service.analyze(&document, today()).unwrap();
        assert_eq!(plan.summary.categories.total, 0);
        assert_eq!(plan.summary.budgets.total, 0);
        assert_eq!(plan.summary.transactions.total, 3);
        assert_eq!(plan.summary.transactions.new, 1);
        assert_eq!(plan.summary.transactions.invalid, 2);
        assert_eq!(
            plan.transactions[0].category_id,
            Some(CategoryId::from("food"))
        );
    }

    #[test]
    fn test_analyze_does_not_write() {
        let storage = Storage::in_memory().unwrap();
        let service = ImportService::new(&storage);

        let plan = service.analyze(&sample_document(), today()).unwrap();

        assert_eq!(plan.summary.categories.total, 2);
        assert_eq!(plan.summary.categories.duplicate, 1);
        assert_eq!(plan.summary.categories.new, 1);
        assert_eq!(plan.summary.transactions.total, 5);
        assert_eq!(plan.summary.transactions.new, 3);
        assert_eq!(plan.summary.transactions.duplicate, 1);
        assert_eq!(plan.summary.transactions.invalid, 1);
        assert_eq!(plan.summary.budgets.new, 2);
        assert_eq!(plan.summary.budgets.duplicate, 1);

        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert_eq!(storage.categories.count().unwrap(), 12);
    }

    #[test]
    fn test_apply_remaps_category_ids() {
        let storage = Storage::in_memory().unwrap();
        let service = ImportService::new(&storage);

        let summary = service.import_json(&sample_document(), today()).unwrap();
        assert_eq!(summary.transactions.new, 3);

        let tips = storage.categories.get_by_name("Tips").unwrap().unwrap();
        assert_eq!(tips.color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(tips.icon, DEFAULT_CATEGORY_ICON);

        let all = storage.transactions.get_all().unwrap();
        let lunch = all.iter().find(|t| t.description == "Lunch").unwrap();
        assert_eq!(lunch.category_id, Some(CategoryId::from("food")));
        assert_eq!(lunch.amount.cents(), 3550);

        let tip = all.iter().find(|t| t.kind == TransactionType::Income).unwrap();
        assert_eq!(tip.category_id, Some(tips.id.clone()));
        assert_eq!(tip.amount.cents(), 12_000);

        // No date in the document: imported as today
        let undated = all.iter().find(|t| t.amount.cents() == 800).unwrap();
        assert_eq!(undated.date, today());
        assert_eq!(undated.kind, TransactionType::Expense);

        let budgets = storage.budgets.get_all().unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].category_id, BudgetScope::Category("food".into()));
        assert_eq!(budgets[1].name, UNNAMED_BUDGET);
        assert_eq!(budgets[1].category_id, BudgetScope::All);
    }

    #[test]
    fn test_reimport_is_all_duplicates() {
        let storage = Storage::in_memory().unwrap();
        let service = ImportService::new(&storage);
        service.import_json(&sample_document(), today()).unwrap();

        let plan = service.analyze(&sample_document(), today()).unwrap();
        assert_eq!(plan.summary.transactions.new, 0);
        assert_eq!(plan.summary.transactions.duplicate, 4);
        assert_eq!(plan.summary.categories.new, 0);
        assert_eq!(plan.summary.budgets.new, 0);
    }

    #[test]
    fn test_unmapped_category_id_is_kept() {
        let storage = Storage::in_memory().unwrap();
        let service = ImportService::new(&storage);
        let doc = json!({
            "transactions": [
                {"amount": 10, "type": "expense", "categoryId": "mystery", "date": "2025-10-01"}
            ]
        })
        .to_string();

        service.import_json(&doc, today()).unwrap();
        let txn = &storage.transactions.get_all().unwrap()[0];
        assert_eq!(txn.category_id, Some(CategoryId::from("mystery")));
    }

    #[test]
    fn test_invalid_rows_are_counted() {
        let storage = Storage::in_memory().unwrap();
        let service = ImportService::new(&storage);
        let doc = json!({
            "transactions": [
                {"amount": "abc", "categoryId": "food"},
                {"amount": 5, "type": "refund", "categoryId": "food"},
                {"amount": 5, "categoryId": "food", "date": "18/10/2025"},
                {"amount": 5}
            ]
        })
        .to_string();

        let plan = service.analyze(&doc, today()).unwrap();
        assert_eq!(plan.summary.transactions.invalid, 4);
        assert!(plan.transactions.is_empty());
    }
}
