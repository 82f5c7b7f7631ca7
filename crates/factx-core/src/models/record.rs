//! The extraction record: one string per invoice field.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::invoice::rules::amounts::parse_amount;
use crate::invoice::rules::dates::OUTPUT_DATE_FORMAT;

/// Names of the record fields, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Client,
    ClientTaxId,
    Beneficiary,
    BeneficiaryTaxId,
    DocumentNumber,
    Date,
    PaymentMethod,
    VehiclePlate,
    ItemDescription,
    Quantity,
    UnitPrice,
    Subtotal,
    TaxAmount,
    Total,
    SuggestedFilename,
}

impl Field {
    /// Every field, in output order.
    pub const ALL: [Field; 15] = [
        Field::Client,
        Field::ClientTaxId,
        Field::Beneficiary,
        Field::BeneficiaryTaxId,
        Field::DocumentNumber,
        Field::Date,
        Field::PaymentMethod,
        Field::VehiclePlate,
        Field::ItemDescription,
        Field::Quantity,
        Field::UnitPrice,
        Field::Subtotal,
        Field::TaxAmount,
        Field::Total,
        Field::SuggestedFilename,
    ];

    /// Snake-case key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::ClientTaxId => "client_tax_id",
            Self::Beneficiary => "beneficiary",
            Self::BeneficiaryTaxId => "beneficiary_tax_id",
            Self::DocumentNumber => "document_number",
            Self::Date => "date",
            Self::PaymentMethod => "payment_method",
            Self::VehiclePlate => "vehicle_plate",
            Self::ItemDescription => "item_description",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
            Self::Subtotal => "subtotal",
            Self::TaxAmount => "tax_amount",
            Self::Total => "total",
            Self::SuggestedFilename => "suggested_filename",
        }
    }

    /// Key used by the original OCR web service responses.
    pub fn legacy_key(&self) -> &'static str {
        match self {
            Self::Client => "cliente",
            Self::ClientTaxId => "ruc_cliente",
            Self::Beneficiary => "beneficiario",
            Self::BeneficiaryTaxId => "ruc_beneficiario",
            Self::DocumentNumber => "nro_documento",
            Self::Date => "fecha",
            Self::PaymentMethod => "forma_pago",
            Self::VehiclePlate => "placa",
            Self::ItemDescription => "item",
            Self::Quantity => "cantidad",
            Self::UnitPrice => "precio_unitario",
            Self::Subtotal => "subtotal",
            Self::TaxAmount => "igv_iva",
            Self::Total => "total",
            Self::SuggestedFilename => "nombre_archivo_sugerido",
        }
    }

    /// Key under the given style.
    pub fn key_for(&self, style: KeyStyle) -> &'static str {
        match style {
            KeyStyle::Snake => self.key(),
            KeyStyle::Legacy => self.legacy_key(),
        }
    }

    /// Look up a field by either of its keys.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key || f.legacy_key() == key)
    }

    /// Whether the field holds a number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Quantity | Self::UnitPrice | Self::Subtotal | Self::TaxAmount | Self::Total
        )
    }
}

/// Key naming used when serializing a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStyle {
    /// `client`, `client_tax_id`, ...
    #[default]
    Snake,
    /// `cliente`, `ruc_cliente`, ...
    Legacy,
}

/// Fully populated result of one extraction. Unmatched fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRecord {
    pub client: String,
    pub client_tax_id: String,
    pub beneficiary: String,
    pub beneficiary_tax_id: String,
    pub document_number: String,
    pub date: String,
    pub payment_method: String,
    pub vehicle_plate: String,
    pub item_description: String,
    pub quantity: String,
    pub unit_price: String,
    pub subtotal: String,
    pub tax_amount: String,
    pub total: String,
    pub suggested_filename: String,
}

impl ExtractionRecord {
    /// Value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Client => &self.client,
            Field::ClientTaxId => &self.client_tax_id,
            Field::Beneficiary => &self.beneficiary,
            Field::BeneficiaryTaxId => &self.beneficiary_tax_id,
            Field::DocumentNumber => &self.document_number,
            Field::Date => &self.date,
            Field::PaymentMethod => &self.payment_method,
            Field::VehiclePlate => &self.vehicle_plate,
            Field::ItemDescription => &self.item_description,
            Field::Quantity => &self.quantity,
            Field::UnitPrice => &self.unit_price,
            Field::Subtotal => &self.subtotal,
            Field::TaxAmount => &self.tax_amount,
            Field::Total => &self.total,
            Field::SuggestedFilename => &self.suggested_filename,
        }
    }

    /// Replace the value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Client => &mut self.client,
            Field::ClientTaxId => &mut self.client_tax_id,
            Field::Beneficiary => &mut self.beneficiary,
            Field::BeneficiaryTaxId => &mut self.beneficiary_tax_id,
            Field::DocumentNumber => &mut self.document_number,
            Field::Date => &mut self.date,
            Field::PaymentMethod => &mut self.payment_method,
            Field::VehiclePlate => &mut self.vehicle_plate,
            Field::ItemDescription => &mut self.item_description,
            Field::Quantity => &mut self.quantity,
            Field::UnitPrice => &mut self.unit_price,
            Field::Subtotal => &mut self.subtotal,
            Field::TaxAmount => &mut self.tax_amount,
            Field::Total => &mut self.total,
            Field::SuggestedFilename => &mut self.suggested_filename,
        };
        *slot = value.into();
    }

    /// All `(field, value)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Whether no field was extracted. The suggested filename is always
    /// synthesized and does not count.
    pub fn is_empty(&self) -> bool {
        self.iter()
            .filter(|(f, _)| *f != Field::SuggestedFilename)
            .all(|(_, v)| v.is_empty())
    }

    /// Numeric value of an amount-like field.
    pub fn amount(&self, field: Field) -> Option<Decimal> {
        parse_amount(self.get(field))
    }

    /// View of the record that serializes under the given key style.
    pub fn keyed(&self, style: KeyStyle) -> KeyedRecord<'_> {
        KeyedRecord { record: self, style }
    }

    /// Check the record for missing and inconsistent values.
    ///
    /// Issues are informational; the record is never altered.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let tolerance = Decimal::new(1, 2);

        if self.client.is_empty() {
            issues.push("Missing client".to_string());
        }

        if self.client_tax_id.is_empty() {
            issues.push("Missing client tax ID".to_string());
        } else if self.beneficiary_tax_id == self.client_tax_id {
            issues.push(format!(
                "Beneficiary tax ID is the same as the client tax ID ({})",
                self.client_tax_id
            ));
        }

        if self.date.is_empty() {
            issues.push("Missing date".to_string());
        } else if NaiveDate::parse_from_str(&self.date, OUTPUT_DATE_FORMAT).is_err() {
            issues.push(format!("Date is not a valid calendar date: {}", self.date));
        }

        if self.total.is_empty() {
            issues.push("Missing total".to_string());
        }

        if let (Some(subtotal), Some(tax), Some(total)) = (
            self.amount(Field::Subtotal),
            self.amount(Field::TaxAmount),
            self.amount(Field::Total),
        ) {
            if (subtotal + tax - total).abs() > tolerance {
                issues.push(format!(
                    "Subtotal ({}) plus tax ({}) differs from total ({})",
                    subtotal, tax, total
                ));
            }
        }

        if let (Some(quantity), Some(unit_price), Some(subtotal)) = (
            self.amount(Field::Quantity),
            self.amount(Field::UnitPrice),
            self.amount(Field::Subtotal),
        ) {
            if (quantity * unit_price - subtotal).abs() > tolerance {
                issues.push(format!(
                    "Quantity ({}) times unit price ({}) differs from subtotal ({})",
                    quantity, unit_price, subtotal
                ));
            }
        }

        issues
    }
}

/// Serialization view of a record with a chosen key style.
#[derive(Debug, Clone, Copy)]
pub struct KeyedRecord<'a> {
    record: &'a ExtractionRecord,
    style: KeyStyle,
}

impl Serialize for KeyedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::ALL.len()))?;
        for (field, value) in self.record.iter() {
            map.serialize_entry(field.key_for(self.style), value)?;
        }
        map.end()
    }
}
