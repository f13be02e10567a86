//! Clock port - source of the current time

use chrono::{NaiveDate, NaiveDateTime};

/// Supplies "now" to the services
///
/// Transactions are stamped with this time, and the daily withdrawal quota
/// compares calendar dates derived from it.
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> NaiveDateTime;

    /// Current calendar date
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
