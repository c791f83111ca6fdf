use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    coerce::{coerce_decimal, coerce_uint},
    domain::LaptopRecord,
    error::ValidationError,
};

/// Text inputs of the laptop form, one per editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Brand,
    Model,
    Price,
    Processor,
    Ram,
    Storage,
    Gpu,
    OperatingSystem,
    ScreenSize,
    Description,
    StockQuantity,
}

/// Editing buffer of the laptop form.
///
/// Every field is kept as the user typed it; numbers are only parsed when the
/// draft is turned into a [`LaptopRecord`] at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct LaptopDraft {
    pub brand: String,
    pub model: String,
    pub price: String,
    pub processor: String,
    pub ram: String,
    pub storage: String,
    pub gpu: String,
    pub operating_system: String,
    pub screen_size: String,
    pub description: String,
    pub is_available: bool,
    pub stock_quantity: String,
    /// Unknown fields of the record being edited, passed through untouched.
    pub extra: BTreeMap<String, Value>,
}

impl Default for LaptopDraft {
    fn default() -> Self {
        Self {
            brand: String::new(),
            model: String::new(),
            price: String::new(),
            processor: String::new(),
            ram: String::new(),
            storage: String::new(),
            gpu: String::new(),
            operating_system: String::new(),
            screen_size: String::new(),
            description: String::new(),
            is_available: true,
            stock_quantity: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl LaptopDraft {
    /// Canned values for trying the create flow against a fresh backend.
    pub fn sample() -> Self {
        Self {
            brand: "Test Brand".into(),
            model: "Test Model".into(),
            price: "999.99".into(),
            processor: "Test Processor".into(),
            ram: "8".into(),
            storage: "256".into(),
            gpu: "Test GPU".into(),
            operating_system: "Windows 11".into(),
            screen_size: "15.6".into(),
            description: "Test description".into(),
            is_available: true,
            stock_quantity: "10".into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Brand => &mut self.brand,
            DraftField::Model => &mut self.model,
            DraftField::Price => &mut self.price,
            DraftField::Processor => &mut self.processor,
            DraftField::Ram => &mut self.ram,
            DraftField::Storage => &mut self.storage,
            DraftField::Gpu => &mut self.gpu,
            DraftField::OperatingSystem => &mut self.operating_system,
            DraftField::ScreenSize => &mut self.screen_size,
            DraftField::Description => &mut self.description,
            DraftField::StockQuantity => &mut self.stock_quantity,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// True when both required fields hold something other than whitespace.
    pub fn has_required_fields(&self) -> bool {
        !self.brand.trim().is_empty() && !self.model.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.has_required_fields() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequired)
        }
    }

    /// Coerces the draft into a record: strings trimmed, numbers parsed with
    /// empty or unreadable text becoming `0`.
    pub fn to_record(&self) -> LaptopRecord {
        LaptopRecord {
            id: None,
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            price: coerce_decimal(&self.price),
            processor: self.processor.trim().to_string(),
            ram: coerce_uint(&self.ram),
            storage: coerce_uint(&self.storage),
            gpu: self.gpu.trim().to_string(),
            operating_system: self.operating_system.trim().to_string(),
            screen_size: coerce_decimal(&self.screen_size),
            description: self.description.trim().to_string(),
            is_available: self.is_available,
            stock_quantity: coerce_uint(&self.stock_quantity),
            extra: self.extra.clone(),
        }
    }
}

impl From<&LaptopRecord> for LaptopDraft {
    fn from(record: &LaptopRecord) -> Self {
        let mut extra = record.extra.clone();
        extra.remove("_id");
        Self {
            brand: record.brand.clone(),
            model: record.model.clone(),
            price: decimal_text(record.price),
            processor: record.processor.clone(),
            ram: uint_text(record.ram),
            storage: uint_text(record.storage),
            gpu: record.gpu.clone(),
            operating_system: record.operating_system.clone(),
            screen_size: decimal_text(record.screen_size),
            description: record.description.clone(),
            is_available: record.is_available,
            stock_quantity: uint_text(record.stock_quantity),
            extra,
        }
    }
}

impl From<LaptopRecord> for LaptopDraft {
    fn from(record: LaptopRecord) -> Self {
        Self::from(&record)
    }
}

fn uint_text(value: u64) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

fn decimal_text(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}
