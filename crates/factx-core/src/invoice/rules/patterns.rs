//! Regex patterns for invoice field labels.
//!
//! Labels are matched in both the Spanish wording found on the scanned
//! documents and the English equivalent. Every pattern is case-insensitive
//! and unanchored; group 1 carries the value.

use lazy_static::lazy_static;
use regex::Regex;

/// Product description prefixes recognized out of the box.
pub const DEFAULT_ITEM_VOCABULARY: &[&str] = &["DIESEL PREMIUM", "SONDEO", "PLÁSTICO", "MONTAJE"];

lazy_static! {
    // Tax ID (RUC), optionally qualified with the party it belongs to
    pub static ref CLIENT_TAX_ID: Regex = Regex::new(
        r"(?i)\b(?:RUC|TAX\s+ID)(?:\s+CLIENTE?)?:?\s*(\d+)"
    ).unwrap();

    pub static ref BENEFICIARY_TAX_ID: Regex = Regex::new(
        r"(?i)\b(?:RUC|TAX\s+ID)(?:\s+BENEFICIAR(?:IO|Y))?:?\s*(\d+)"
    ).unwrap();

    // Parties, up to the next tax ID / address label. A tax ID label may be
    // glued to its digits (`RUC20123456789`), as rules above accept.
    pub static ref CLIENT: Regex = Regex::new(
        r"(?i)\bCLIENTE?:?\s*(.*?)\s*(?:\bRUC(?:\b|\d)|\bTAX\s+ID(?:\b|\d)|\bDIRECCI[ÓO]N\b|\bADDRESS\b|$)"
    ).unwrap();

    pub static ref BENEFICIARY: Regex = Regex::new(
        r"(?i)\bBENEFICIAR(?:IO|Y):?\s*(.*?)\s*(?:\bRUC(?:\b|\d)|\bTAX\s+ID(?:\b|\d)|$)"
    ).unwrap();

    // Document header
    pub static ref DOCUMENT_NUMBER: Regex = Regex::new(
        r"(?i)(?:(?:N°|\bNro\.?|\bN[úu]mero)\s+de\s+documento|\bdocument\s+(?:number|no\.?)):?\s*([A-Z0-9-]+)"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref PAYMENT_METHOD: Regex = Regex::new(
        r"(?i)(?:\bforma\s+de\s+pago|\bcondici[óo]n\s+de\s+pago|\bpayment\s+(?:method|terms)):?\s*(\w+)"
    ).unwrap();

    pub static ref VEHICLE_PLATE: Regex = Regex::new(
        r"(?i)\b(?:PLACA|PLATE):?\s*(\w+)"
    ).unwrap();

    // Amounts (comma or dot decimal separator)
    pub static ref UNIT_PRICE: Regex = Regex::new(
        r"(?i)(?:\bVALOR\s+UNIT(?:ARIO)?|\bUNIT\s+(?:VALUE|PRICE))[:\s]*(\d+[.,]\d+)"
    ).unwrap();

    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?i)\bSUB\s?TOTAL[:\s]*(\d+[.,]\d+)"
    ).unwrap();

    pub static ref TAX_AMOUNT: Regex = Regex::new(
        r"(?i)\b(?:IGV|IVA)[^\d]*(\d+[.,]\d+)"
    ).unwrap();

    pub static ref TOTAL: Regex = Regex::new(
        r"(?i)\bTOTAL[:\s]*(\d+[.,]\d+)"
    ).unwrap();

    pub static ref DEFAULT_ITEM_DESCRIPTION: Regex = Regex::new(
        &item_description_pattern(DEFAULT_ITEM_VOCABULARY)
    ).unwrap();
}

/// Build the item description pattern for a closed vocabulary.
///
/// Each prefix is extended lazily up to the next whitespace character.
pub fn item_description_pattern<S: AsRef<str>>(vocabulary: &[S]) -> String {
    let alternatives: Vec<String> = vocabulary
        .iter()
        .map(|prefix| format!("{}.*?", regex::escape(prefix.as_ref().trim())))
        .collect();

    format!(r"(?i)({})\s", alternatives.join("|"))
}

/// Build the quantity pattern: a number followed by the already extracted
/// item description.
pub fn quantity_pattern(item_description: &str) -> String {
    format!(
        r"(?i)(\d{{1,4}}[.,]?\d{{0,3}})\s+{}",
        regex::escape(item_description)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_stops_at_tax_id() {
        let caps = CLIENT.captures("CLIENTE: ACME CORP RUC: 20123456789").unwrap();
        assert_eq!(&caps[1], "ACME CORP");
    }

    #[test]
    fn test_client_stops_at_address() {
        let caps = CLIENT
            .captures("CLIENTE: MINERA ANDINA SAC DIRECCIÓN: AV. LIMA 123")
            .unwrap();
        assert_eq!(&caps[1], "MINERA ANDINA SAC");

        let caps = CLIENT.captures("Client: ACME CORP Address: 1 Main St").unwrap();
        assert_eq!(&caps[1], "ACME CORP");
    }

    #[test]
    fn test_client_ignores_ruc_inside_words() {
        let caps = CLIENT.captures("CLIENTE: CONSTRUCCIONES DEL SUR").unwrap();
        assert_eq!(&caps[1], "CONSTRUCCIONES DEL SUR");
    }

    #[test]
    fn test_parties_stop_at_glued_tax_id() {
        let caps = CLIENT.captures("CLIENTE: ACME CORP RUC20123456789").unwrap();
        assert_eq!(&caps[1], "ACME CORP");

        let caps = BENEFICIARY
            .captures("Beneficiario: JOHN SMITH RUC20987654321")
            .unwrap();
        assert_eq!(&caps[1], "JOHN SMITH");

        let caps = CLIENT.captures("Client: ACME CORP TAX ID20123456789").unwrap();
        assert_eq!(&caps[1], "ACME CORP");

        // A word that merely starts with RUC is part of the name.
        let caps = CLIENT.captures("CLIENTE: RUCKER SAC RUC: 20123456789").unwrap();
        assert_eq!(&caps[1], "RUCKER SAC");
    }

    #[test]
    fn test_beneficiary_labels() {
        for text in [
            "Beneficiario: JOHN SMITH LTD RUC: 1",
            "Beneficiary: JOHN SMITH LTD TAX ID: 1",
            "BENEFICIARY JOHN SMITH LTD",
        ] {
            let caps = BENEFICIARY.captures(text).unwrap();
            assert_eq!(&caps[1], "JOHN SMITH LTD", "{text}");
        }
    }

    #[test]
    fn test_tax_id_labels() {
        for text in [
            "RUC: 20123456789",
            "RUC20123456789",
            "RUC CLIENTE: 20123456789",
            "TAX ID: 20123456789",
            "TAX ID CLIENT: 20123456789",
        ] {
            let caps = CLIENT_TAX_ID.captures(text).unwrap();
            assert_eq!(&caps[1], "20123456789", "{text}");
        }

        for text in [
            "RUC BENEFICIARIO: 20987654321",
            "TAX ID BENEFICIARY: 20987654321",
            "Tax Id Beneficiary 20987654321",
        ] {
            let caps = BENEFICIARY_TAX_ID.captures(text).unwrap();
            assert_eq!(&caps[1], "20987654321", "{text}");
        }
    }

    #[test]
    fn test_plate_labels() {
        assert_eq!(&VEHICLE_PLATE.captures("PLACA: ABC123").unwrap()[1], "ABC123");
        assert_eq!(&VEHICLE_PLATE.captures("Plate XYZ789").unwrap()[1], "XYZ789");
    }

    #[test]
    fn test_payment_method_labels() {
        for (text, expected) in [
            ("Forma de pago: CONTADO", "CONTADO"),
            ("Condición de pago: CREDITO", "CREDITO"),
            ("Payment method: CASH", "CASH"),
            ("Payment terms: NET30", "NET30"),
        ] {
            let caps = PAYMENT_METHOD.captures(text).unwrap();
            assert_eq!(&caps[1], expected, "{text}");
        }
    }

    #[test]
    fn test_unit_price_labels() {
        for (text, expected) in [
            ("VALOR UNITARIO: 15.00", "15.00"),
            ("VALOR UNIT 15,00", "15,00"),
            ("UNIT VALUE: 15.00", "15.00"),
            ("Unit price 15,50", "15,50"),
        ] {
            let caps = UNIT_PRICE.captures(text).unwrap();
            assert_eq!(&caps[1], expected, "{text}");
        }
    }

    #[test]
    fn test_total_skips_subtotal_label() {
        let caps = TOTAL.captures("SUBTOTAL: 100.00 TOTAL: 118.00").unwrap();
        assert_eq!(&caps[1], "118.00");
    }

    #[test]
    fn test_total_matches_two_word_subtotal() {
        // Known limitation: only the joined SUBTOTAL label is excluded.
        let text = "SUB TOTAL: 7.00 TOTAL: 8.26";
        assert_eq!(&SUBTOTAL.captures(text).unwrap()[1], "7.00");
        assert_eq!(&TOTAL.captures(text).unwrap()[1], "7.00");
    }

    #[test]
    fn test_tax_amount_skips_non_digits() {
        let caps = TAX_AMOUNT.captures("IGV (S/.) : 18,00").unwrap();
        assert_eq!(&caps[1], "18,00");

        let caps = TAX_AMOUNT.captures("IVA: 42.00").unwrap();
        assert_eq!(&caps[1], "42.00");
    }

    #[test]
    fn test_document_number_variants() {
        for text in [
            "N° de documento: F001-000123",
            "Nro de documento F001-000123",
            "Número de documento: F001-000123",
            "Document number: F001-000123",
        ] {
            let caps = DOCUMENT_NUMBER.captures(text).unwrap();
            assert_eq!(&caps[1], "F001-000123", "{text}");
        }
    }

    #[test]
    fn test_item_description_stops_at_whitespace() {
        let caps = DEFAULT_ITEM_DESCRIPTION
            .captures("12 DIESEL PREMIUM 500")
            .unwrap();
        assert_eq!(&caps[1], "DIESEL PREMIUM");

        let caps = DEFAULT_ITEM_DESCRIPTION
            .captures("1 SONDEOS ELECTRICOS 350.00")
            .unwrap();
        assert_eq!(&caps[1], "SONDEOS");
    }

    #[test]
    fn test_quantity_pattern_escapes_description() {
        let re = Regex::new(&quantity_pattern("TUBO (1/2)")).unwrap();
        let caps = re.captures("3 TUBO (1/2) 45.00").unwrap();
        assert_eq!(&caps[1], "3");
    }
}
