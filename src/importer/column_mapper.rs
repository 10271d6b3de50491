// ==========================================
// Link Marketplace - Column Mapper
// ==========================================
// Header auto-detection, explicit mapping payload validation and
// projection of header-keyed rows onto canonical fields.
// ==========================================

use crate::domain::site::{ColumnMapping, SiteRow};
use crate::domain::types::CanonicalField;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::{HashMap, HashSet};

/// Lower-cased, trimmed header text -> canonical field.
/// Exact lookup only.
const HEADER_DICTIONARY: &[(&str, CanonicalField)] = &[
    ("url", CanonicalField::Url),
    ("site url", CanonicalField::Url),
    ("site", CanonicalField::Url),
    ("website", CanonicalField::Url),
    ("website url", CanonicalField::Url),
    ("domain", CanonicalField::Url),
    ("da", CanonicalField::DomainAuthority),
    ("domain authority", CanonicalField::DomainAuthority),
    ("dr", CanonicalField::DomainRating),
    ("domain rating", CanonicalField::DomainRating),
    ("spam score", CanonicalField::SpamScore),
    ("spam", CanonicalField::SpamScore),
    ("ss", CanonicalField::SpamScore),
    ("traffic", CanonicalField::Traffic),
    ("monthly traffic", CanonicalField::Traffic),
    ("organic traffic", CanonicalField::Traffic),
    ("category", CanonicalField::Category),
    ("niche", CanonicalField::Category),
    ("turnaround", CanonicalField::TurnaroundTime),
    ("turnaround time", CanonicalField::TurnaroundTime),
    ("tat", CanonicalField::TurnaroundTime),
    ("delivery time", CanonicalField::TurnaroundTime),
    ("price", CanonicalField::BasePrice),
    ("base price", CanonicalField::BasePrice),
    ("cost", CanonicalField::BasePrice),
    ("country", CanonicalField::Country),
    ("geo", CanonicalField::Country),
    ("language", CanonicalField::Language),
    ("lang", CanonicalField::Language),
    ("publisher", CanonicalField::Publisher),
    ("publisher name", CanonicalField::Publisher),
    ("publisher email", CanonicalField::Publisher),
    ("status", CanonicalField::Status),
];

/// Looks a single header up in the dictionary
pub fn lookup_header(header: &str) -> Option<CanonicalField> {
    let key = header.trim().to_lowercase();
    HEADER_DICTIONARY
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, field)| *field)
}

/// Auto-detects the column mapping from headers in file order.
///
/// Each canonical field is claimed by the first matching header; later
/// headers resolving to an already-claimed field are dropped. Unknown
/// headers are left out.
pub fn detect_column_mapping(headers: &[String]) -> Vec<ColumnMapping> {
    let mut claimed: HashSet<CanonicalField> = HashSet::new();
    let mut mappings = Vec::new();

    for header in headers {
        if let Some(field) = lookup_header(header) {
            if claimed.insert(field) {
                mappings.push(ColumnMapping {
                    source_header: header.clone(),
                    canonical_field: field,
                });
            }
        }
    }

    mappings
}

/// Parses and checks an operator-supplied mapping payload.
///
/// # Arguments
/// - payload: JSON array of `{"source_header", "canonical_field"}`
/// - headers: headers present in the uploaded file
///
/// # Returns
/// - Err(ImportError::MalformedMapping) when the JSON is malformed, a field is
///   unknown, the mapping is not injective, or a header is not in the file
pub fn parse_mapping_payload(payload: &str, headers: &[String]) -> ImportResult<Vec<ColumnMapping>> {
    let mappings = decode_mapping_payload(payload)?;
    check_mapping(&mappings, headers)?;
    Ok(mappings)
}

/// Decodes the JSON payload without checking it against a file
pub fn decode_mapping_payload(payload: &str) -> ImportResult<Vec<ColumnMapping>> {
    serde_json::from_str(payload).map_err(|e| ImportError::MalformedMapping(e.to_string()))
}

/// Enforces injectivity in both directions and that every source header exists.
pub fn check_mapping(mappings: &[ColumnMapping], headers: &[String]) -> ImportResult<()> {
    let known: HashSet<&str> = headers.iter().map(|h| h.as_str()).collect();
    let mut seen_headers: HashSet<&str> = HashSet::new();
    let mut seen_fields: HashSet<CanonicalField> = HashSet::new();

    for mapping in mappings {
        let header = mapping.source_header.as_str();
        if !known.contains(header) {
            return Err(ImportError::MalformedMapping(format!(
                "column \"{}\" is not in the uploaded file",
                header
            )));
        }
        if !seen_headers.insert(header) {
            return Err(ImportError::MalformedMapping(format!(
                "column \"{}\" is mapped more than once",
                header
            )));
        }
        if !seen_fields.insert(mapping.canonical_field) {
            return Err(ImportError::MalformedMapping(format!(
                "field \"{}\" is claimed by more than one column",
                mapping.canonical_field
            )));
        }
    }

    Ok(())
}

/// Projects a header-keyed row onto canonical fields.
///
/// # Arguments
/// - row: raw row (header -> cell)
/// - mappings: validated mapping
/// - row_index: 1-based position among data rows
pub fn project_row(
    row: &HashMap<String, String>,
    mappings: &[ColumnMapping],
    row_index: usize,
) -> SiteRow {
    let mut projected = SiteRow::new(row_index);
    for mapping in mappings {
        if let Some(value) = row.get(&mapping.source_header) {
            projected.set(mapping.canonical_field, value.trim().to_string());
        }
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_basic_headers() {
        let mapping = detect_column_mapping(&headers(&["Site URL", " Base Price ", "DA", "Notes"]));
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping[0].source_header, "Site URL");
        assert_eq!(mapping[0].canonical_field, CanonicalField::Url);
        assert_eq!(mapping[1].source_header, " Base Price ");
        assert_eq!(mapping[1].canonical_field, CanonicalField::BasePrice);
        assert_eq!(mapping[2].canonical_field, CanonicalField::DomainAuthority);
    }

    #[test]
    fn test_detect_first_header_claims_field() {
        let mapping = detect_column_mapping(&headers(&["Site URL", "Base Price", "Base Price"]));
        assert_eq!(mapping.len(), 2);
        let price_columns: Vec<_> = mapping
            .iter()
            .filter(|m| m.canonical_field == CanonicalField::BasePrice)
            .collect();
        assert_eq!(price_columns.len(), 1);

        let mapping = detect_column_mapping(&headers(&["Price", "Cost", "Website", "URL"]));
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping[0].source_header, "Price");
        assert_eq!(mapping[1].source_header, "Website");
    }

    #[test]
    fn test_detect_has_no_fuzzy_matching() {
        let mapping = detect_column_mapping(&headers(&["Site-URL", "Prices", "Domain Auth"]));
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_parse_mapping_payload_ok() {
        let file_headers = headers(&["Website", "Cost"]);
        let payload = r#"[
            {"source_header": "Website", "canonical_field": "url"},
            {"source_header": "Cost", "canonical_field": "base_price"}
        ]"#;
        let mapping = parse_mapping_payload(payload, &file_headers).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping[1].canonical_field, CanonicalField::BasePrice);
    }

    #[test]
    fn test_parse_mapping_payload_rejects_bad_input() {
        let file_headers = headers(&["Website", "Cost"]);

        let not_json = parse_mapping_payload("{oops", &file_headers);
        assert!(matches!(not_json, Err(ImportError::MalformedMapping(_))));

        let unknown_field = parse_mapping_payload(
            r#"[{"source_header": "Website", "canonical_field": "homepage"}]"#,
            &file_headers,
        );
        assert!(matches!(unknown_field, Err(ImportError::MalformedMapping(_))));

        let field_twice = parse_mapping_payload(
            r#"[{"source_header": "Website", "canonical_field": "url"},
                {"source_header": "Cost", "canonical_field": "url"}]"#,
            &file_headers,
        );
        assert!(matches!(field_twice, Err(ImportError::MalformedMapping(_))));

        let header_twice = parse_mapping_payload(
            r#"[{"source_header": "Cost", "canonical_field": "base_price"},
                {"source_header": "Cost", "canonical_field": "traffic"}]"#,
            &file_headers,
        );
        assert!(matches!(header_twice, Err(ImportError::MalformedMapping(_))));

        let missing_header = parse_mapping_payload(
            r#"[{"source_header": "Price", "canonical_field": "base_price"}]"#,
            &file_headers,
        );
        assert!(matches!(missing_header, Err(ImportError::MalformedMapping(_))));
    }

    #[test]
    fn test_project_row() {
        let mapping = detect_column_mapping(&headers(&["Website", "Cost", "Extra"]));
        let mut raw = HashMap::new();
        raw.insert("Website".to_string(), " example.com ".to_string());
        raw.insert("Cost".to_string(), "150".to_string());
        raw.insert("Extra".to_string(), "ignored".to_string());

        let row = project_row(&raw, &mapping, 4);
        assert_eq!(row.row_index, 4);
        assert_eq!(row.url, "example.com");
        assert_eq!(row.base_price, "150");
        assert_eq!(row.language, "");
    }
}
