//! budgetbook - personal income and expense tracker
//!
//! This library provides the core functionality for the budgetbook
//! application: transactions grouped into income and expense categories,
//! recurring spending budgets, statistics, JSON/CSV import and export, and
//! static HTML rendering of the app's pages.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, budgets)
//! - `storage`: Key/value store and in-memory repositories
//! - `services`: Business logic layer
//! - `reports`: Statistics, ranking, trend and comparison
//! - `audit`: Audit logging system
//! - `backup`: Backups of the key/value store
//! - `export`: JSON and CSV export
//! - `render`: Static HTML pages
//! - `theme`: Page themes
//! - `display`: Terminal tables
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetbook::config::{BudgetbookPaths, Settings};
//! use budgetbook::storage::Storage;
//!
//! let paths = BudgetbookPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod render;
pub mod reports;
pub mod services;
pub mod storage;
pub mod theme;

pub use error::{BudgetbookError, BudgetbookResult};
