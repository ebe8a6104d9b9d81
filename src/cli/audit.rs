//! Audit log CLI command

use crate::error::BudgetbookResult;
use crate::storage::Storage;

/// Print the most recent audit entries, newest last
pub fn handle_audit_command(storage: &Storage, count: usize) -> BudgetbookResult<()> {
    let Some(logger) = storage.audit_logger() else {
        println!("Audit logging is not enabled for this store.");
        return Ok(());
    };

    let entries = logger.read_recent(count)?;
    if entries.is_empty() {
        println!("No audit entries yet.");
        return Ok(());
    }

    println!("Audit Log ({})", logger.path().display());
    println!("{}", "=".repeat(40));
    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
