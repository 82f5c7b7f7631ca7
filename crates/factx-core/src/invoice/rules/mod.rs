//! Declarative field rules for invoice extraction.
//!
//! A rule table is an ordered list of [`FieldRule`]s. Rules are evaluated
//! front to back against the flattened text, and a rule whose pattern is
//! [`Pattern::DependsOn`] reads a value produced by an earlier rule.

pub mod amounts;
pub mod dates;
pub mod filename;
pub mod patterns;

pub use amounts::parse_amount;
pub use dates::reformat_date;
pub use filename::FilenameTemplate;
pub use patterns::*;

use regex::Regex;
use tracing::{debug, warn};

use crate::models::record::{ExtractionRecord, Field};

/// How a rule finds its value.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// A pattern compiled once, when the rule table is built.
    Fixed(Regex),
    /// A pattern built per extraction from a previously extracted field.
    DependsOn {
        field: Field,
        build: fn(&str) -> String,
    },
}

/// A single named extraction step with a default fallback.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field the rule fills.
    pub field: Field,
    /// Search pattern.
    pub pattern: Pattern,
    /// Capture group carrying the value.
    pub group: usize,
    /// Value used when nothing matches.
    pub default: String,
}

impl FieldRule {
    /// Create a rule over a fixed pattern, capturing group 1 with an empty default.
    pub fn fixed(field: Field, regex: Regex) -> Self {
        Self {
            field,
            pattern: Pattern::Fixed(regex),
            group: 1,
            default: String::new(),
        }
    }

    /// Create a rule whose pattern is derived from another field's value.
    pub fn depends_on(field: Field, on: Field, build: fn(&str) -> String) -> Self {
        Self {
            field,
            pattern: Pattern::DependsOn { field: on, build },
            group: 1,
            default: String::new(),
        }
    }

    /// Set the capture group to extract.
    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Set the value used when the pattern does not match.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Field this rule depends on, if any.
    pub fn dependency(&self) -> Option<Field> {
        match self.pattern {
            Pattern::Fixed(_) => None,
            Pattern::DependsOn { field, .. } => Some(field),
        }
    }

    /// Apply the rule to `text`, reading dependencies from `record`.
    ///
    /// Never fails: every miss degrades to the rule's default.
    pub fn apply(&self, text: &str, record: &ExtractionRecord) -> String {
        match &self.pattern {
            Pattern::Fixed(regex) => self.capture(regex, text),
            Pattern::DependsOn { field, build } => {
                let value = record.get(*field);
                if value.is_empty() {
                    debug!(
                        "Skipping {}: {} was not extracted",
                        self.field.key(),
                        field.key()
                    );
                    return self.default.clone();
                }

                match Regex::new(&build(value)) {
                    Ok(regex) => self.capture(&regex, text),
                    Err(e) => {
                        warn!("Could not build pattern for {}: {}", self.field.key(), e);
                        self.default.clone()
                    }
                }
            }
        }
    }

    fn capture(&self, regex: &Regex, text: &str) -> String {
        regex
            .captures(text)
            .and_then(|caps| caps.get(self.group))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| self.default.clone())
    }
}

/// Build the rule table in evaluation order.
///
/// `item_description` is the compiled vocabulary pattern; `quantity` is
/// derived from its result and therefore must come after it.
pub fn rule_table(item_description: Regex) -> Vec<FieldRule> {
    vec![
        FieldRule::fixed(Field::ClientTaxId, CLIENT_TAX_ID.clone()),
        FieldRule::fixed(Field::Client, CLIENT.clone()),
        FieldRule::fixed(Field::Beneficiary, BENEFICIARY.clone()),
        FieldRule::fixed(Field::BeneficiaryTaxId, BENEFICIARY_TAX_ID.clone()),
        FieldRule::fixed(Field::DocumentNumber, DOCUMENT_NUMBER.clone()),
        FieldRule::fixed(Field::Date, DATE_DMY.clone()),
        FieldRule::fixed(Field::PaymentMethod, PAYMENT_METHOD.clone()),
        FieldRule::fixed(Field::VehiclePlate, VEHICLE_PLATE.clone()),
        FieldRule::fixed(Field::ItemDescription, item_description),
        FieldRule::depends_on(Field::Quantity, Field::ItemDescription, quantity_pattern),
        FieldRule::fixed(Field::UnitPrice, UNIT_PRICE.clone()),
        FieldRule::fixed(Field::Subtotal, SUBTOTAL.clone()),
        FieldRule::fixed(Field::TaxAmount, TAX_AMOUNT.clone()),
        FieldRule::fixed(Field::Total, TOTAL.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_order() {
        let fields: Vec<Field> = rule_table(DEFAULT_ITEM_DESCRIPTION.clone())
            .iter()
            .map(|r| r.field)
            .collect();

        assert_eq!(
            fields,
            vec![
                Field::ClientTaxId,
                Field::Client,
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
            ]
        );
    }

    #[test]
    fn test_dependencies_point_backwards() {
        let rules = rule_table(DEFAULT_ITEM_DESCRIPTION.clone());

        for (i, rule) in rules.iter().enumerate() {
            if let Some(dep) = rule.dependency() {
                let pos = rules.iter().position(|r| r.field == dep).unwrap();
                assert!(pos < i, "{:?} depends on later rule {:?}", rule.field, dep);
            }
        }

        let quantity = rules.iter().find(|r| r.field == Field::Quantity).unwrap();
        assert_eq!(quantity.dependency(), Some(Field::ItemDescription));
    }

    #[test]
    fn test_apply_trims_and_defaults() {
        let rule = FieldRule::fixed(Field::VehiclePlate, VEHICLE_PLATE.clone())
            .with_default("N/A");
        let record = ExtractionRecord::default();

        assert_eq!(rule.apply("PLACA:  XYZ789 ", &record), "XYZ789");
        assert_eq!(rule.apply("sin placa", &record), "N/A");
    }

    #[test]
    fn test_apply_selected_group() {
        let regex = Regex::new(r"(\d{2})/(\d{2})/(\d{4})").unwrap();
        let rule = FieldRule::fixed(Field::Date, regex).with_group(3);
        assert_eq!(rule.apply("05/03/2024", &ExtractionRecord::default()), "2024");

        // A group that did not participate falls back to the default.
        let rule = FieldRule::fixed(Field::Date, Regex::new(r"(a)|(b)").unwrap())
            .with_group(2)
            .with_default("-");
        assert_eq!(rule.apply("a", &ExtractionRecord::default()), "-");
    }

    #[test]
    fn test_dependent_rule_skips_without_dependency() {
        let rule = FieldRule::depends_on(Field::Quantity, Field::ItemDescription, quantity_pattern);
        let record = ExtractionRecord::default();

        // A bare number would match an empty description; the rule must not.
        assert_eq!(rule.apply("12 GALONES", &record), "");
    }

    #[test]
    fn test_dependent_rule_uses_earlier_value() {
        let rule = FieldRule::depends_on(Field::Quantity, Field::ItemDescription, quantity_pattern);
        let mut record = ExtractionRecord::default();
        record.set(Field::ItemDescription, "MONTAJE");

        assert_eq!(rule.apply("ITEM 2,5 MONTAJE 80.00", &record), "2,5");
    }
}
