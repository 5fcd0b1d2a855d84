//! Document display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::settings::Settings;
use crate::models::Document;

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    document_type: String,
    #[tabled(rename = "Uploaded")]
    uploaded: String,
    #[tabled(rename = "URL")]
    url: String,
}

pub fn format_document_list(documents: &[Document], settings: &Settings) -> String {
    if documents.is_empty() {
        return "No documents found.".to_string();
    }

    let rows: Vec<DocumentRow> = documents
        .iter()
        .map(|d| DocumentRow {
            name: d.name.clone(),
            document_type: d.document_type.to_string(),
            uploaded: d.upload_date.format(&settings.date_format).to_string(),
            url: d.file_url.clone(),
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentType, PropertyId};
    use chrono::NaiveDate;

    #[test]
    fn test_document_list() {
        let docs = vec![Document::new(
            PropertyId::from("1"),
            "Escritura.pdf",
            DocumentType::Deed,
            NaiveDate::from_ymd_opt(2023, 2, 20).unwrap(),
            "https://example.com/escritura.pdf",
        )];
        let output = format_document_list(&docs, &Settings::default());
        assert!(output.contains("Escritura.pdf"));
        assert!(output.contains("Deed"));
        assert!(output.contains("20/02/2023"));
    }

    #[test]
    fn test_empty_document_list() {
        assert_eq!(
            format_document_list(&[], &Settings::default()),
            "No documents found."
        );
    }
}
