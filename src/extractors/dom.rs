// src/extractors/dom.rs
//! Small traversal helpers over the scraper tree shared by every extraction routine.

use scraper::ElementRef;

// MediaWiki wraps section headings in <div class="mw-heading mw-heading2">.
const HEADING_WRAPPER_CLASS: &str = "mw-heading";

pub const LIST_TAGS: [&str; 2] = ["ul", "ol"];

/// Tag name of the element (always lowercase for HTML documents).
pub fn tag<'a>(el: ElementRef<'a>) -> &'a str {
    el.value().name()
}

pub fn has_class(el: ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Returns `Some(n)` for `<hN>` elements.
pub fn heading_level(el: ElementRef) -> Option<u8> {
    match tag(el) {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

pub fn is_heading_wrapper(el: ElementRef) -> bool {
    tag(el) == "div" && has_class(el, HEADING_WRAPPER_CLASS)
}

pub fn is_list(el: ElementRef) -> bool {
    LIST_TAGS.contains(&tag(el))
}

pub fn parent_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// The element followed by its element ancestors, nearest first.
pub fn ancestors_or_self<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    std::iter::once(el).chain(el.ancestors().filter_map(ElementRef::wrap))
}

/// Element descendants in document order, excluding `el` itself.
pub fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Following sibling elements, skipping text and comment nodes.
pub fn next_sibling_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}

/// Concatenated text of the subtree with whitespace runs collapsed.
pub fn element_text(el: ElementRef) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
