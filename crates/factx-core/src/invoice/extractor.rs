//! Rule-table driven invoice field extractor.

use regex::Regex;
use tracing::{debug, info};

use crate::error::{FactxError, Result};
use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractionRecord, Field};

use super::rules::{
    item_description_pattern, reformat_date, rule_table, FieldRule, FilenameTemplate,
    DEFAULT_ITEM_DESCRIPTION,
};
use super::InvoiceExtractor;

/// Extractor evaluating an immutable rule table, then deriving the
/// reformatted date and the suggested filename.
#[derive(Debug, Clone)]
pub struct InvoiceFieldExtractor {
    rules: Vec<FieldRule>,
    filename: FilenameTemplate,
}

impl InvoiceFieldExtractor {
    /// Create an extractor with the built-in vocabulary and filename template.
    pub fn new() -> Self {
        Self {
            rules: rule_table(DEFAULT_ITEM_DESCRIPTION.clone()),
            filename: FilenameTemplate::new(),
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        config.validate()?;

        let item_description = Regex::new(&item_description_pattern(&config.item_vocabulary))
            .map_err(|source| FactxError::Rule {
                field: Field::ItemDescription.key(),
                source,
            })?;

        debug!(
            "Built extractor with {} item prefixes",
            config.item_vocabulary.len()
        );

        Ok(Self {
            rules: rule_table(item_description),
            filename: FilenameTemplate::from_config(config),
        })
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Filename template used for the suggested filename.
    pub fn filename_template(&self) -> &FilenameTemplate {
        &self.filename
    }

    /// Flatten raw recognized text and extract every field.
    pub fn extract_fields(&self, raw_text: &str) -> ExtractionRecord {
        self.extract_from_text(raw_text)
    }
}

impl Default for InvoiceFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for InvoiceFieldExtractor {
    fn extract(&self, flattened_text: &str) -> ExtractionRecord {
        let mut record = ExtractionRecord::default();
        let mut missing = Vec::new();

        for rule in &self.rules {
            let value = rule.apply(flattened_text, &record);
            if value.is_empty() {
                missing.push(rule.field.key());
            }
            record.set(rule.field, value);
        }

        let date = reformat_date(&record.date);
        record.date = date;
        record.suggested_filename =
            self.filename
                .render(&record.client, &record.beneficiary, &record.date);

        if !missing.is_empty() {
            debug!("No match for: {}", missing.join(", "));
        }
        info!(
            "Extracted {} of {} fields from {} characters",
            self.rules.len() - missing.len(),
            self.rules.len(),
            flattened_text.len()
        );

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
        GRIFO EL SOL
        FACTURA ELECTRONICA

        N° de documento: F001-004512
        FECHA: 05/03/2024
        CLIENTE: ACME CORP
        RUC: 20123456789
        DIRECCIÓN: AV. ARGENTINA 1200, LIMA
        Beneficiario: JOHN SMITH LTD
        RUC BENEFICIARIO: 20987654321
        Forma de pago: CONTADO
        PLACA: ABC123

        CANT. DESCRIPCION          VALOR UNIT  IMPORTE
        12    DIESEL PREMIUM 500   15.00       180.00

        VALOR UNITARIO: 15.00
        SUBTOTAL: 180.00
        IGV S/ 32.40
        TOTAL: 212.40
    "#;

    #[test]
    fn test_extract_sample_invoice() {
        let record = InvoiceFieldExtractor::new().extract_fields(SAMPLE);

        assert_eq!(record.client, "ACME CORP");
        assert_eq!(record.client_tax_id, "20123456789");
        assert_eq!(record.beneficiary, "JOHN SMITH LTD");
        assert_eq!(record.document_number, "F001-004512");
        assert_eq!(record.date, "2024-03-05");
        assert_eq!(record.payment_method, "CONTADO");
        assert_eq!(record.vehicle_plate, "ABC123");
        assert_eq!(record.item_description, "DIESEL PREMIUM");
        assert_eq!(record.quantity, "12");
        assert_eq!(record.unit_price, "15.00");
        assert_eq!(record.subtotal, "180.00");
        assert_eq!(record.tax_amount, "32.40");
        assert_eq!(record.total, "212.40");
        assert_eq!(record.suggested_filename, "FC-ACMEC-JOHNSMITHL-2024-03-05.pdf");
    }

    #[test]
    fn test_beneficiary_tax_id_repeats_first_tax_id() {
        // Known limitation: the beneficiary rule is not positioned relative
        // to the beneficiary block and finds the first tax ID in the text.
        let record = InvoiceFieldExtractor::new().extract_fields(SAMPLE);
        assert_eq!(record.beneficiary_tax_id, "20123456789");
        assert_eq!(record.beneficiary_tax_id, record.client_tax_id);
    }

    #[test]
    fn test_extract_english_labels() {
        let record = InvoiceFieldExtractor::new().extract_fields(
            "CLIENT: ACME CORP TAX ID: 20123456789\n\
             Beneficiary: JOHN SMITH LTD TAX ID: 1\n\
             FECHA: 05/03/2024",
        );

        assert_eq!(record.client, "ACME CORP");
        assert_eq!(record.client_tax_id, "20123456789");
        assert_eq!(record.beneficiary, "JOHN SMITH LTD");
        assert_eq!(record.suggested_filename, "FC-ACMEC-JOHNSMITHL-2024-03-05.pdf");
    }

    #[test]
    fn test_parties_stop_at_glued_tax_id() {
        let record = InvoiceFieldExtractor::new().extract(
            "CLIENTE: ACME CORP RUC20123456789 FECHA: 05/03/2024 \
             Beneficiario: JOHN SMITH RUC20987654321 TOTAL: 10.00",
        );

        assert_eq!(record.client_tax_id, "20123456789");
        assert_eq!(record.client, "ACME CORP");
        assert_eq!(record.beneficiary, "JOHN SMITH");
        assert_eq!(record.total, "10.00");
        assert_eq!(record.suggested_filename, "FC-ACMEC-JOHNSMITH-2024-03-05.pdf");
    }

    #[test]
    fn test_empty_text() {
        let record = InvoiceFieldExtractor::new().extract("");

        assert!(record.is_empty());
        assert_eq!(record.suggested_filename, "FC---.pdf");
    }

    #[test]
    fn test_unparseable_date_is_kept() {
        let record = InvoiceFieldExtractor::new().extract("FECHA: 31/02/2024 TOTAL: 10.00");
        assert_eq!(record.date, "31/02/2024");
        assert_eq!(record.suggested_filename, "FC---31/02/2024.pdf");
    }

    #[test]
    fn test_from_config_vocabulary() {
        let config = ExtractionConfig {
            item_vocabulary: vec!["GASOHOL".to_string()],
            filename_prefix: "INV".to_string(),
            client_prefix_len: 3,
            beneficiary_prefix_len: 4,
        };
        let extractor = InvoiceFieldExtractor::from_config(&config).unwrap();
        let record = extractor.extract("CLIENTE: ACME CORP 3,5 GASOHOL90 22.00 FECHA 01/02/2024");

        assert_eq!(record.item_description, "GASOHOL90");
        assert_eq!(record.quantity, "3,5");
        assert_eq!(record.suggested_filename, "INV-ACM--2024-02-01.pdf");

        // The built-in vocabulary is replaced, not extended.
        let record = extractor.extract("12 DIESEL PREMIUM 500");
        assert_eq!(record.item_description, "");
        assert_eq!(record.quantity, "");
    }

    #[test]
    fn test_from_config_rejects_empty_vocabulary() {
        let config = ExtractionConfig {
            item_vocabulary: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            InvoiceFieldExtractor::from_config(&config),
            Err(FactxError::Config(_))
        ));
    }

    #[test]
    fn test_default_config_matches_new() {
        let from_config = InvoiceFieldExtractor::from_config(&ExtractionConfig::default()).unwrap();
        let default = InvoiceFieldExtractor::new();

        assert_eq!(from_config.filename_template(), default.filename_template());
        assert_eq!(
            from_config.extract_fields(SAMPLE),
            default.extract_fields(SAMPLE)
        );
    }
}
