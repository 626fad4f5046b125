//! Audit-history repository. The table is written by a database trigger;
//! the application only ever reads it.

use super::DbError;
use crate::db::store::{QueryError, Store};
use crate::models::HistoryEntry;

pub struct HistoryRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> HistoryRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Full audit history, newest first.
    pub async fn list(&self) -> Result<Vec<HistoryEntry>, DbError> {
        let rows = self
            .store
            .query(
                "SELECT histno, chno, action, action_date \
                 FROM historique_chercheurs \
                 ORDER BY action_date DESC",
                &[],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(HistoryEntry {
                    histno: row.int("histno")?,
                    chno: row.opt_int("chno")?,
                    action: row.text("action")?,
                    action_date: row.timestamp("action_date")?,
                })
            })
            .collect::<Result<_, QueryError>>()
            .map_err(Into::into)
    }
}
