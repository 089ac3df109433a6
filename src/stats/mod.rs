// Stats entities: a snapshot store plus host-specific report fields

mod format;
mod global;
mod port;
mod store;

pub use format::{OVERFLOW, format_num, format_value, rate_unit};
pub use global::{GLOBAL_STATS_FIELDS, GlobalStats};
pub use port::PortStats;
pub use store::{Counter, DEFAULT_REFERENCE_WINDOW, Snapshot, StatsStore};

use crate::models::FieldValue;
use format::scaled;

/// Capability shared by global and per-port entities. Implementors only expose
/// their store; every accessor is derived from it.
pub trait CounterStats {
    fn store(&self) -> &StatsStore;
    fn store_mut(&mut self) -> &mut StatsStore;

    fn update(&mut self, snapshot: Snapshot) {
        self.store_mut().update(snapshot);
    }

    fn clear_stats(&mut self) {
        self.store_mut().clear_stats();
    }

    fn invalidate(&mut self) {
        self.store_mut().invalidate();
    }

    /// Absolute value, raw.
    fn get(&self, field: &str) -> FieldValue {
        self.store().get_absolute(field).into()
    }

    /// Absolute value, scaled with `suffix`.
    fn get_fmt(&self, field: &str, suffix: &str) -> FieldValue {
        scaled(self.store().get_absolute(field), suffix)
    }

    /// Change since baseline, raw.
    fn get_rel(&self, field: &str) -> FieldValue {
        self.store().get_relative(field).into()
    }

    /// Change since baseline, scaled with `suffix`.
    fn get_rel_fmt(&self, field: &str, suffix: &str) -> FieldValue {
        scaled(self.store().get_relative(field), suffix)
    }

    /// Generic lookup driven by the field name: rate fields render scaled with
    /// their unit; anything else is unavailable here.
    fn lookup(&self, field: &str) -> FieldValue {
        if !self.store().contains(field) {
            return FieldValue::Unavailable;
        }
        match rate_unit(field) {
            Some(unit) => self.get_fmt(field, &unit),
            None => FieldValue::Unavailable,
        }
    }
}
