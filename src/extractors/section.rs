// src/extractors/section.rs

use scraper::{ElementRef, Html};
use super::dom;

/// A titled section: the sibling elements between a heading and the next
/// heading of equal or higher rank. Borrowed view over the parsed document.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub title: String,
    pub nodes: Vec<ElementRef<'a>>,
}

/// Finds the first `<h{level}>` whose text satisfies `heading_matches` and returns its section.
/// `None` means the section is absent from the page, which callers treat as "field unavailable".
pub fn locate<'a, P>(document: &'a Html, heading_matches: P, level: u8) -> Option<Section<'a>>
where
    P: Fn(&str) -> bool,
{
    let heading = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| dom::heading_level(*el) == Some(level) && heading_matches(&dom::element_text(*el)));

    let Some(heading) = heading else {
        tracing::debug!("No level-{} heading matched", level);
        return None;
    };
    let title = dom::element_text(heading);

    // A wrapped heading starts its section after the wrapper, not inside it
    let start = match dom::parent_element(heading) {
        Some(parent) if dom::is_heading_wrapper(parent) => parent,
        _ => heading,
    };

    let nodes: Vec<ElementRef<'a>> = dom::next_sibling_elements(start)
        .take_while(|el| !is_section_boundary(*el, level))
        .collect();

    tracing::debug!("Located section '{}' (h{}) spanning {} nodes", title, level, nodes.len());
    Some(Section { title, nodes })
}

/// True for a heading of rank `level` or higher, or a wrapper directly holding one.
fn is_section_boundary(el: ElementRef, level: u8) -> bool {
    let closes = |candidate: ElementRef| dom::heading_level(candidate).is_some_and(|l| l <= level);

    if closes(el) {
        return true;
    }
    dom::is_heading_wrapper(el)
        && el.children().filter_map(ElementRef::wrap).any(closes)
}
