//! Board schema steps.
//!
//! # Responsibility
//! - Step 1 creates the `cells` board table and the `games` record.
//! - Step 2 adds the `users` and `tasks` account tables.
//!
//! # Invariants
//! - Steps are listed by strictly increasing `version`.
//! - Every pending step and the `PRAGMA user_version` bump share one
//!   transaction; a failed step leaves the file at its previous version.
//! - A database stamped with a version newer than the last step is refused.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "board",
        sql: include_str!("0001_board.sql"),
    },
    SchemaStep {
        version: 2,
        name: "accounts",
        sql: include_str!("0002_accounts.sql"),
    },
];

/// Schema version a fully migrated board database reports.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   build.
/// - `DbError::Sqlite` when a step fails; nothing from this call is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = stored_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|step| step.version > from).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        apply_step(&tx, step)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={latest}");
    Ok(())
}

fn apply_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    debug!(
        "event=db_migrate_step module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
