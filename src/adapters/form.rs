use crate::domain::ports::FormSource;
use std::collections::HashMap;

/// In-memory form: field identifier → raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    fields: HashMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field_id: &str, value: &str) -> Self {
        self.set(field_id, value);
        self
    }

    pub fn set(&mut self, field_id: &str, value: &str) {
        self.fields.insert(field_id.to_string(), value.to_string());
    }
}

impl FormSource for FormValues {
    fn value(&self, field_id: &str) -> Option<String> {
        self.fields.get(field_id).cloned()
    }
}
