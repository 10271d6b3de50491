// ==========================================
// Link Marketplace - Upload Template
// ==========================================
// Static CSV: header row + ten sample rows.
// Two header orders: current and legacy.
// ==========================================

use crate::domain::types::{CanonicalField, TemplateVariant};
use crate::importer::error::{ImportError, ImportResult};
use csv::WriterBuilder;

const CURRENT_COLUMNS: [(&str, CanonicalField); 12] = [
    ("Site URL", CanonicalField::Url),
    ("DA", CanonicalField::DomainAuthority),
    ("DR", CanonicalField::DomainRating),
    ("Spam Score", CanonicalField::SpamScore),
    ("Traffic", CanonicalField::Traffic),
    ("Category", CanonicalField::Category),
    ("Turnaround Time", CanonicalField::TurnaroundTime),
    ("Base Price", CanonicalField::BasePrice),
    ("Country", CanonicalField::Country),
    ("Language", CanonicalField::Language),
    ("Publisher", CanonicalField::Publisher),
    ("Status", CanonicalField::Status),
];

const LEGACY_COLUMNS: [(&str, CanonicalField); 11] = [
    ("Site URL", CanonicalField::Url),
    ("Base Price", CanonicalField::BasePrice),
    ("Publisher", CanonicalField::Publisher),
    ("Category", CanonicalField::Category),
    ("DA", CanonicalField::DomainAuthority),
    ("DR", CanonicalField::DomainRating),
    ("Traffic", CanonicalField::Traffic),
    ("Spam Score", CanonicalField::SpamScore),
    ("Country", CanonicalField::Country),
    ("Language", CanonicalField::Language),
    ("Turnaround Time", CanonicalField::TurnaroundTime),
];

/// Sample values in CanonicalField::ALL order:
/// url, DA, DR, spam, traffic, category, turnaround, price, country, language, publisher, status
const SAMPLE_ROWS: [[&str; 12]; 10] = [
    ["techcrunch-sample.com", "92", "93", "1", "12000000", "Technology", "3 days", "450", "US", "English", "Acme Media", "ACTIVE"],
    ["https://www.healthline-sample.org", "88", "90", "2", "8500000", "Health & Fitness", "5 days", "380", "US", "English", "deals@acme.test", "ACTIVE"],
    ["financeweekly-sample.net", "65", "70", "3", "240000", "Finance", "2 days", "150", "UK", "English", "Blue Ocean", "ACTIVE"],
    ["http://travel-notes-sample.com", "48", "52", "4", "56000", "Travel", "1 week", "90", "CA", "English", "Blue Ocean", "ACTIVE"],
    ["recetas-sample.es", "41", "38", "2", "31000", "Food & Drink", "4 days", "70", "ES", "Spanish", "Acme Media", "ACTIVE"],
    ["autozeitung-sample.de", "57", "61", "1", "120000", "Automotive", "3 days", "130", "DE", "German", "hello@blueocean.test", "ACTIVE"],
    ["modeparis-sample.fr", "39", "44", "6", "22000", "Fashion & Beauty", "5 days", "60", "FR", "French", "Blue Ocean", "INACTIVE"],
    ["homefinder-sample.com.au", "53", "49", "3", "87000", "Real Estate", "2 days", "110", "AU", "English", "Acme Media", "ACTIVE"],
    ["edu-portal-sample.in", "45", "47", "5", "150000", "Education", "1 week", "55", "IN", "English", "Acme Media", "ACTIVE"],
    ["sportsdaily-sample.co.uk", "71", "74", "2", "640000", "Sports", "24 hours", "210", "UK", "English", "Blue Ocean", "ACTIVE"],
];

fn columns(variant: TemplateVariant) -> &'static [(&'static str, CanonicalField)] {
    match variant {
        TemplateVariant::Current => &CURRENT_COLUMNS,
        TemplateVariant::Legacy => &LEGACY_COLUMNS,
    }
}

/// Header labels of a template variant, in file order
pub fn template_headers(variant: TemplateVariant) -> Vec<&'static str> {
    columns(variant).iter().map(|(label, _)| *label).collect()
}

/// Renders the template CSV for a variant
pub fn generate_template(variant: TemplateVariant) -> ImportResult<String> {
    let cols = columns(variant);
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(cols.iter().map(|(label, _)| *label))?;
    for sample in SAMPLE_ROWS.iter() {
        writer.write_record(cols.iter().map(|(_, field)| sample[field.index()]))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::InternalError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::column_mapper::detect_column_mapping;
    use crate::importer::file_parser::CsvParser;
    use crate::importer::site_importer_trait::FileParser;

    #[test]
    fn test_header_lines_are_verbatim() {
        let current = generate_template(TemplateVariant::Current).unwrap();
        assert_eq!(
            current.lines().next().unwrap(),
            "Site URL,DA,DR,Spam Score,Traffic,Category,Turnaround Time,Base Price,Country,Language,Publisher,Status"
        );

        let legacy = generate_template(TemplateVariant::Legacy).unwrap();
        assert_eq!(
            legacy.lines().next().unwrap(),
            "Site URL,Base Price,Publisher,Category,DA,DR,Traffic,Spam Score,Country,Language,Turnaround Time"
        );
    }

    #[test]
    fn test_template_has_ten_rows_and_maps_fully() {
        for variant in [TemplateVariant::Current, TemplateVariant::Legacy] {
            let csv_text = generate_template(variant).unwrap();
            let sheet = CsvParser.parse_bytes(csv_text.as_bytes()).unwrap();
            assert_eq!(sheet.total_rows(), 10);

            let mapping = detect_column_mapping(&sheet.headers);
            assert_eq!(mapping.len(), sheet.headers.len(), "{:?}", variant);
        }
    }

    #[test]
    fn test_sample_values_follow_headers() {
        let csv_text = generate_template(TemplateVariant::Legacy).unwrap();
        let sheet = CsvParser.parse_bytes(csv_text.as_bytes()).unwrap();
        assert_eq!(sheet.rows[0].get("Base Price"), Some(&"450".to_string()));
        assert_eq!(sheet.rows[0].get("Publisher"), Some(&"Acme Media".to_string()));
        assert_eq!(sheet.rows[1].get("Category"), Some(&"Health & Fitness".to_string()));
    }

    #[test]
    fn test_every_legacy_column_carries_its_own_sample() {
        let csv_text = generate_template(TemplateVariant::Legacy).unwrap();
        let sheet = CsvParser.parse_bytes(csv_text.as_bytes()).unwrap();
        let expected = [
            ("Site URL", "techcrunch-sample.com"),
            ("Base Price", "450"),
            ("Publisher", "Acme Media"),
            ("Category", "Technology"),
            ("DA", "92"),
            ("DR", "93"),
            ("Traffic", "12000000"),
            ("Spam Score", "1"),
            ("Country", "US"),
            ("Language", "English"),
            ("Turnaround Time", "3 days"),
        ];
        for (header, value) in expected {
            assert_eq!(sheet.rows[0].get(header).map(String::as_str), Some(value), "{}", header);
        }
        // the first column never leaks into other columns
        let urls = sheet.rows[0].values().filter(|v| v.ends_with("-sample.com")).count();
        assert_eq!(urls, 1);
    }
}
