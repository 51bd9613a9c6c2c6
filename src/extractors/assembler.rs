// src/extractors/assembler.rs

use std::collections::HashMap;
use scraper::{ElementRef, Html};

use crate::utils::error::FetchError;
use crate::wiktionary::DocumentFetcher;
use super::fields::{FieldSpec, Multiplicity, Scope, SectionQuery, FIELD_SPECS};
use super::label::find_labels;
use super::proximity::resolve_value;
use super::record::{CharacterRecord, Readings};
use super::section::{self, Section};

/// Fetches the entry page for `character` and extracts its record with the default field table.
/// Only a failed fetch is an error; missing data leaves fields absent.
pub async fn lookup_character<F: DocumentFetcher>(fetcher: &F, character: &str) -> Result<CharacterRecord, FetchError> {
    let markup = fetcher.fetch(character).await?;
    tracing::info!("Fetched {} bytes for '{}'", markup.len(), character);

    let document = Html::parse_document(&markup);
    Ok(assemble(&document, character, &FIELD_SPECS))
}

/// Builds a record by running every spec against `document`, in order.
pub fn assemble(document: &Html, character: &str, specs: &[FieldSpec]) -> CharacterRecord {
    let mut record = CharacterRecord::empty(character);
    let mut sections: HashMap<SectionQuery, Option<Section>> = HashMap::new();

    for spec in specs {
        let roots: Vec<ElementRef> = match spec.scope {
            Scope::Document => vec![document.root_element()],
            Scope::Section(query) => {
                let located = sections.entry(query).or_insert_with(|| {
                    section::locate(document, |text| text.contains(query.heading), query.level)
                });
                match located {
                    Some(section) => section.nodes.clone(),
                    None => {
                        tracing::debug!("Section '{}' absent, {:?} left empty", query.heading, spec.field);
                        continue;
                    }
                }
            }
        };

        if let Some(readings) = extract_field(&roots, spec) {
            *record.slot_mut(spec.field) = Some(readings);
        }
    }

    record
}

/// Runs label search and value resolution for one field over `roots`.
pub fn extract_field(roots: &[ElementRef], spec: &FieldSpec) -> Option<Readings> {
    let mut readings = Readings::default();

    for label in find_labels(roots, &spec.label) {
        let Some(value) = resolve_value(&label, spec.strategies) else { continue };
        readings.push_distinct(value);
        if spec.multiplicity == Multiplicity::FirstMatch {
            break;
        }
    }

    if readings.is_empty() {
        tracing::debug!("No value found for {:?}", spec.field);
        None
    } else {
        Some(readings)
    }
}
