//! Schema registration.
//!
//! Each entity module owns its table definition as a [`TableSchema`]. The
//! registration list below fixes the order tables are created in (parents
//! before children), and [`apply`] creates them at startup.

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{
    campaign, donation, message, payout, profile, setting, user, w9_form,
};

/// DDL for one table and its indexes. Statements must be idempotent.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: &'static str,
    pub create: &'static str,
    pub indexes: &'static [&'static str],
}

/// All tables, in creation order.
pub fn registered() -> Vec<TableSchema> {
    vec![
        setting::SCHEMA,
        user::SCHEMA,
        profile::SCHEMA,
        campaign::SCHEMA,
        donation::SCHEMA,
        payout::SCHEMA,
        message::SCHEMA,
        w9_form::SCHEMA,
    ]
}

/// Create every registered table and index inside one transaction.
pub async fn apply(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schemas = registered();
    let mut tx = pool.begin().await?;

    for schema in &schemas {
        sqlx::query(schema.create).execute(&mut *tx).await?;
        for index in schema.indexes {
            sqlx::query(index).execute(&mut *tx).await?;
        }
    }

    tx.commit().await?;
    info!(tables = schemas.len(), "Database schema applied");
    Ok(())
}
