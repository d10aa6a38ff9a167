use crate::domain::model::{
    BillionaireRecord, Extraction, Field, RowOutcome, RowSelectors, RowSkip, SkipReason,
};
use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};

/// Reads billionaire rows out of listing markup.
///
/// Row nodes are taken in document order and truncated to the limit *before*
/// any field is inspected, so a limit of 25 means "the first 25 row nodes",
/// not "the first 25 valid records".
pub struct Extractor {
    row: Selector,
    name: Selector,
    net_worth: Selector,
    image: Selector,
}

impl Extractor {
    pub fn new(selectors: &RowSelectors) -> Result<Self> {
        Ok(Self {
            row: parse_selector(&selectors.row)?,
            name: parse_selector(&selectors.name)?,
            net_worth: parse_selector(&selectors.net_worth)?,
            image: parse_selector(&selectors.image)?,
        })
    }

    pub fn extract(&self, html: &str, limit: Option<usize>) -> Extraction {
        let document = Html::parse_document(html);
        document
            .select(&self.row)
            .take(limit.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(index, row)| self.read_row(index, row))
            .collect()
    }

    fn read_row(&self, index: usize, row: ElementRef<'_>) -> RowOutcome {
        let skip = |reason| RowSkip { index, reason };

        let name = first_text(row, &self.name)
            .ok_or_else(|| skip(SkipReason::MissingElement(Field::Name)))?;
        if name.is_empty() {
            return Err(skip(SkipReason::EmptyValue(Field::Name)));
        }

        let net_worth = first_text(row, &self.net_worth)
            .ok_or_else(|| skip(SkipReason::MissingElement(Field::NetWorth)))?;

        // No image element is tolerated; an image element without a source is not.
        let image_reference = match row.select(&self.image).next() {
            None => String::new(),
            Some(img) => img
                .value()
                .attr("src")
                .map(|src| src.trim().to_string())
                .ok_or_else(|| {
                    skip(SkipReason::MissingAttribute {
                        field: Field::Image,
                        attribute: "src".to_string(),
                    })
                })?,
        };

        Ok(BillionaireRecord {
            name,
            net_worth,
            image_reference,
        })
    }
}

/// Extracts with the default Forbes selectors.
pub fn extract(html: &str, limit: Option<usize>) -> Result<Extraction> {
    Ok(Extractor::new(&RowSelectors::default())?.extract(html, limit))
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn first_text(row: ElementRef<'_>, selector: &Selector) -> Option<String> {
    row.select(selector).next().map(|el| {
        el.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: Option<&str>, net_worth: Option<&str>, img: Option<&str>) -> String {
        let mut html = String::from(r#"<div class="table-row">"#);
        if let Some(n) = name {
            html.push_str(&format!(r#"<div class="personName">{}</div>"#, n));
        }
        if let Some(w) = net_worth {
            html.push_str(&format!(r#"<div class="netWorth">{}</div>"#, w));
        }
        if let Some(src) = img {
            html.push_str(&format!(r#"<img src="{}">"#, src));
        }
        html.push_str("</div>");
        html
    }

    fn page(rows: &[String]) -> String {
        format!("<html><body><div class=\"table\">{}</div></body></html>", rows.concat())
    }

    #[test]
    fn test_extracts_fields_in_document_order() {
        let html = page(&[
            row(Some("Elon Musk"), Some("$204.6 B"), Some("https://img/elon.jpg")),
            row(Some("Jeff Bezos"), Some("$190.1 B"), Some("https://img/jeff.jpg")),
        ]);

        let extraction = extract(&html, None).unwrap();

        assert_eq!(extraction.rows_seen, 2);
        assert_eq!(
            extraction.records,
            vec![
                BillionaireRecord::new("Elon Musk", "$204.6 B", "https://img/elon.jpg"),
                BillionaireRecord::new("Jeff Bezos", "$190.1 B", "https://img/jeff.jpg"),
            ]
        );
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn test_row_missing_field_is_skipped_others_kept() {
        let html = page(&[
            row(Some("A"), Some("$1 B"), Some("a.jpg")),
            row(None, Some("$2 B"), Some("b.jpg")),
            row(Some("C"), None, Some("c.jpg")),
            row(Some("D"), Some("$4 B"), Some("d.jpg")),
        ]);

        let extraction = extract(&html, None).unwrap();

        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);
        assert_eq!(
            extraction.skipped,
            vec![
                RowSkip {
                    index: 1,
                    reason: SkipReason::MissingElement(Field::Name)
                },
                RowSkip {
                    index: 2,
                    reason: SkipReason::MissingElement(Field::NetWorth)
                },
            ]
        );
    }

    #[test]
    fn test_limit_truncates_row_nodes() {
        let rows: Vec<String> = (1..=30)
            .map(|i| row(Some(&format!("Person {}", i)), Some("$1 B"), Some("x.jpg")))
            .collect();
        let html = page(&rows);

        let extraction = extract(&html, Some(25)).unwrap();

        assert_eq!(extraction.records.len(), 25);
        assert_eq!(extraction.records[0].name, "Person 1");
        assert_eq!(extraction.records[24].name, "Person 25");
    }

    #[test]
    fn test_missing_image_element_keeps_record_with_empty_reference() {
        let html = page(&[
            row(Some("A"), Some("$1 B"), Some("a.jpg")),
            row(Some("B"), Some("$2 B"), None),
            row(Some("C"), Some("$3 B"), Some("c.jpg")),
        ]);

        let extraction = extract(&html, None).unwrap();

        assert_eq!(extraction.records.len(), 3);
        assert_eq!(extraction.records[0].image_reference, "a.jpg");
        assert_eq!(extraction.records[1].image_reference, "");
        assert_eq!(extraction.records[2].image_reference, "c.jpg");
    }

    #[test]
    fn test_image_without_src_skips_row() {
        let html = page(&[r#"<div class="table-row"><div class="personName">A</div><div class="netWorth">$1 B</div><img alt="A"></div>"#.to_string()]);

        let extraction = extract(&html, None).unwrap();

        assert!(extraction.records.is_empty());
        assert_eq!(
            extraction.skipped[0].reason,
            SkipReason::MissingAttribute {
                field: Field::Image,
                attribute: "src".to_string()
            }
        );
    }

    #[test]
    fn test_whitespace_is_normalized_and_blank_names_skipped() {
        let html = page(&[
            row(Some("\n   Bernard <b>Arnault</b>  \n"), Some("  $180 B "), None),
            row(Some("   "), Some("$1 B"), None),
        ]);

        let extraction = extract(&html, None).unwrap();

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "Bernard Arnault");
        assert_eq!(extraction.records[0].net_worth, "$180 B");
        assert_eq!(
            extraction.skipped[0].reason,
            SkipReason::EmptyValue(Field::Name)
        );
    }

    #[test]
    fn test_custom_selectors_for_rtb_layout() {
        let html = r#"
            <div class="rtb-table">
              <div class="rtb-row">
                <div class="personName">O'Brien</div>
                <div class="netWorth">$1,234</div>
                <img class="flag" src="flag.png">
                <img class="profile-image" src="obrien.jpg">
              </div>
            </div>
            <div class="rtb-row"><div class="personName">Outside</div><div class="netWorth">$1</div></div>
        "#;
        let selectors = RowSelectors {
            row: "div.rtb-table div.rtb-row".to_string(),
            image: "img.profile-image".to_string(),
            ..RowSelectors::default()
        };

        let extraction = Extractor::new(&selectors).unwrap().extract(html, Some(100));

        assert_eq!(
            extraction.records,
            vec![BillionaireRecord::new("O'Brien", "$1,234", "obrien.jpg")]
        );
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let selectors = RowSelectors {
            row: "div[".to_string(),
            ..RowSelectors::default()
        };
        assert!(matches!(
            Extractor::new(&selectors),
            Err(EtlError::SelectorError { .. })
        ));
    }
}
