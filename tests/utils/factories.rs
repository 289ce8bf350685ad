//! Test row factories using builder pattern
//!
//! Provides convenient methods to create import rows with sensible defaults
use propdesk_lib::modules::data_import::{FieldValue, ImportRow};

pub struct PropertyRowFactory {
    row: ImportRow,
}

impl PropertyRowFactory {
    pub fn named(name: &str) -> Self {
        Self {
            row: ImportRow::new().with("name", name),
        }
    }

    pub fn code(mut self, code: &str) -> Self {
        self.row.insert("code", code);
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.row.insert("city", city);
        self
    }

    pub fn build(self) -> ImportRow {
        self.row
    }
}

pub struct UnitRowFactory {
    row: ImportRow,
}

impl UnitRowFactory {
    /// A unit row with every required field present
    pub fn complete(code: &str) -> Self {
        Self {
            row: ImportRow::new()
                .with("property_id", "p1")
                .with("code", code)
                .with("name", format!("Unit {}", code)),
        }
    }

    pub fn without_property() -> Self {
        Self {
            row: ImportRow::new().with("code", "U1").with("name", "Unit 1"),
        }
    }

    pub fn set(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.row.insert(key, value);
        self
    }

    pub fn build(self) -> ImportRow {
        self.row
    }
}
