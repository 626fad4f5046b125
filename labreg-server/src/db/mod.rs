//! Database layer: pool, gateway, write classification, repositories, and
//! schema bootstrap.

pub mod classify;
pub mod pool;
pub mod repos;
pub mod schema;
pub mod store;

/// Fake stores for exercising repositories and handlers without PostgreSQL.
#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::classify::BUSINESS_HOURS_SQLSTATE;
    use super::store::{QueryError, Row, SqlValue, Store, WriteError};

    /// Records every statement and parameter list; returns no rows and
    /// accepts every write.
    #[derive(Default)]
    pub struct RecordingStore {
        calls: Mutex<Vec<(String, Vec<SqlValue>)>>,
    }

    impl RecordingStore {
        pub fn calls(&self) -> Vec<(String, Vec<SqlValue>)> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, statement: &str, params: &[SqlValue]) {
            self.calls
                .lock()
                .unwrap()
                .push((statement.to_owned(), params.to_vec()));
        }
    }

    #[async_trait]
    impl Store for RecordingStore {
        async fn query(
            &self,
            statement: &str,
            params: &[SqlValue],
        ) -> Result<Vec<Row>, QueryError> {
            self.record(statement, params);
            Ok(Vec::new())
        }

        async fn execute(&self, statement: &str, params: &[SqlValue]) -> Result<(), WriteError> {
            self.record(statement, params);
            Ok(())
        }
    }

    /// Returns zero rows for every read, accepts every write.
    pub struct EmptyStore;

    #[async_trait]
    impl Store for EmptyStore {
        async fn query(&self, _: &str, _: &[SqlValue]) -> Result<Vec<Row>, QueryError> {
            Ok(Vec::new())
        }

        async fn execute(&self, _: &str, _: &[SqlValue]) -> Result<(), WriteError> {
            Ok(())
        }
    }

    /// Behaves like a store whose business-hours trigger fires on every
    /// write: reads succeed, writes fail with the trigger's code and marker.
    pub struct OutsideHoursStore;

    #[async_trait]
    impl Store for OutsideHoursStore {
        async fn query(&self, _: &str, _: &[SqlValue]) -> Result<Vec<Row>, QueryError> {
            Ok(Vec::new())
        }

        async fn execute(&self, _: &str, _: &[SqlValue]) -> Result<(), WriteError> {
            Err(WriteError::new(
                "chercheur writes restricted to business hours (Mon-Fri 08:00-18:00)",
                Some(BUSINESS_HOURS_SQLSTATE.to_owned()),
            ))
        }
    }

    /// Every write fails for a reason unrelated to the time window.
    pub struct BrokenStore;

    #[async_trait]
    impl Store for BrokenStore {
        async fn query(&self, _: &str, _: &[SqlValue]) -> Result<Vec<Row>, QueryError> {
            Err(QueryError::new("connection closed unexpectedly"))
        }

        async fn execute(&self, _: &str, _: &[SqlValue]) -> Result<(), WriteError> {
            Err(WriteError::new("deadlock detected", Some("40P01".to_owned())))
        }
    }
}
