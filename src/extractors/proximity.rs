// src/extractors/proximity.rs
//! Resolves the value that belongs to a matched label.
//!
//! A label and its value are rarely co-located on the page, so each field declares an
//! ordered list of [`Strategy`] values; the first one producing a value wins. Strategies
//! only look in a bounded neighbourhood of the label (its container, the block right
//! after its list, the alternate-view group around it, or a few ancestor levels).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use super::dom;
use super::label::LabelMatch;

/// Leading markers of a reconstructed (starred) pronunciation.
pub const RECONSTRUCTION_MARKERS: [&str; 2] = ["/*", "*"];

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});

/// The expected form of a value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Any element carrying this class.
    Class(&'static str),
    /// Any element carrying at least one of these classes.
    AnyClass(&'static [&'static str]),
    /// A `<span>` with this exact `lang` attribute.
    Lang(&'static str),
}

impl ValueShape {
    pub fn matches(&self, el: ElementRef) -> bool {
        match self {
            ValueShape::Class(class) => dom::has_class(el, class),
            ValueShape::AnyClass(classes) => classes.iter().any(|class| dom::has_class(el, class)),
            ValueShape::Lang(code) => dom::tag(el) == "span" && el.value().attr("lang") == Some(*code),
        }
    }
}

/// One way of finding a label's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A shape match inside the label's own container.
    InContainer(ValueShape),
    /// The label's list is followed by a `companion` block (e.g. `<dl>`) holding the value.
    /// Headings and other lists in between stop the search.
    SiblingBlock {
        companion: &'static str,
        shape: ValueShape,
    },
    /// An enclosing alternate-view group holds a table; the row mentioning `row_label` has the value.
    Switcher {
        group_class: &'static str,
        row_label: &'static str,
        shape: ValueShape,
    },
    /// Walk up from the label node at most `levels` times looking for any of `shapes`.
    Ascend {
        levels: usize,
        shapes: &'static [ValueShape],
        require_marker: bool,
    },
    /// Text following the label inside its container. Used where no value node exists.
    TrailingText,
}

impl Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::InContainer(_) => "in-container",
            Strategy::SiblingBlock { .. } => "sibling-block",
            Strategy::Switcher { .. } => "switcher",
            Strategy::Ascend { .. } => "ascend",
            Strategy::TrailingText => "trailing-text",
        }
    }

    /// Tries this strategy for one label match.
    pub fn resolve(&self, label: &LabelMatch) -> Option<String> {
        match *self {
            Strategy::InContainer(shape) => find_value_in(label.container, shape),
            Strategy::SiblingBlock { companion, shape } => sibling_block(label.container, companion, shape),
            Strategy::Switcher { group_class, row_label, shape } => switcher(label.container, group_class, row_label, shape),
            Strategy::Ascend { levels, shapes, require_marker } => ascend(label.node, levels, shapes, require_marker),
            Strategy::TrailingText => trailing_text(label),
        }
    }
}

/// Runs `strategies` in order; the first success wins.
pub fn resolve_value(label: &LabelMatch, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| {
        let value = strategy.resolve(label)?;
        tracing::debug!("'{}' resolved to '{}' via {} lookup", label.variant, value, strategy.name());
        Some(value)
    })
}

pub fn has_reconstruction_marker(value: &str) -> bool {
    RECONSTRUCTION_MARKERS.iter().any(|marker| value.starts_with(marker))
}

/// Trimmed text of a value node; empty nodes are not values.
fn value_text(el: ElementRef) -> Option<String> {
    let text = dom::element_text(el);
    (!text.is_empty()).then_some(text)
}

fn shape_matches<'a>(root: ElementRef<'a>, shape: ValueShape) -> impl Iterator<Item = ElementRef<'a>> {
    dom::descendant_elements(root).filter(move |el| shape.matches(*el))
}

fn find_value_in(root: ElementRef, shape: ValueShape) -> Option<String> {
    shape_matches(root, shape).find_map(value_text)
}

fn is_barrier(el: ElementRef) -> bool {
    dom::heading_level(el).is_some() || dom::is_heading_wrapper(el) || dom::is_list(el)
}

fn sibling_block(container: ElementRef, companion: &str, shape: ValueShape) -> Option<String> {
    if dom::tag(container) != "li" {
        return None;
    }
    let list = dom::parent_element(container).filter(|el| dom::is_list(*el))?;

    // Stray nodes between this item and the next one still belong to it
    for sibling in dom::next_sibling_elements(container) {
        if dom::tag(sibling) == "li" {
            break;
        }
        if shape.matches(sibling) {
            return value_text(sibling);
        }
        if is_barrier(sibling) {
            return None;
        }
        if let Some(value) = find_value_in(sibling, shape) {
            return Some(value);
        }
    }

    for sibling in dom::next_sibling_elements(list) {
        if dom::tag(sibling) == companion {
            // The companion block decides the outcome either way
            return find_value_in(sibling, shape);
        }
        if shape.matches(sibling) {
            return value_text(sibling);
        }
        if is_barrier(sibling) {
            tracing::trace!("Sibling search stopped at <{}>", dom::tag(sibling));
            return None;
        }
    }
    None
}

/// The alternate-view group around `container`, inside it, or right after its list.
fn find_group<'a>(container: ElementRef<'a>, group_class: &str) -> Option<ElementRef<'a>> {
    dom::ancestors_or_self(container)
        .find(|el| dom::has_class(*el, group_class))
        .or_else(|| dom::descendant_elements(container).find(|el| dom::has_class(*el, group_class)))
        .or_else(|| {
            let list = dom::parent_element(container).filter(|el| dom::is_list(*el))?;
            dom::next_sibling_elements(list)
                .next()
                .filter(|el| dom::has_class(*el, group_class))
        })
}

fn switcher(container: ElementRef, group_class: &str, row_label: &str, shape: ValueShape) -> Option<String> {
    let group = find_group(container, group_class)?;

    for row in group.select(&ROW_SELECTOR) {
        // Concatenated text keeps names split by <br> or inline markup searchable
        if !dom::element_text(row).contains(row_label) {
            continue;
        }
        if let Some(value) = find_value_in(row, shape) {
            return Some(value);
        }

        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| matches!(dom::tag(*cell), "td" | "th"))
            .collect();
        if cells.len() < 2 {
            continue;
        }
        match cells.last().and_then(|cell| value_text(*cell)) {
            Some(value) if !value.contains(row_label) => return Some(value),
            Some(value) => tracing::trace!("Rejected fallback cell '{}': it is the label cell", value),
            None => {}
        }
    }
    None
}

fn ascend(node: ElementRef, levels: usize, shapes: &[ValueShape], require_marker: bool) -> Option<String> {
    let mut scope = dom::parent_element(node);

    for _ in 0..levels {
        let el = scope?;
        for shape in shapes {
            let accepted = shape_matches(el, *shape)
                .filter_map(value_text)
                .find(|value| !require_marker || has_reconstruction_marker(value));
            if accepted.is_some() {
                return accepted;
            }
        }
        scope = dom::parent_element(el);
    }
    None
}

/// Text after the label node up to the next `<br>` or the next element mentioning the
/// label again, with `:`/`：` trimmed. Labels that are their own container fall back to
/// splitting the container text.
fn trailing_text(label: &LabelMatch) -> Option<String> {
    let raw = if label.node.id() == label.container.id() {
        let text = dom::element_text(label.container);
        text.split_once(label.variant)?.1.to_string()
    } else {
        text_after(label)
    };

    let rest = match raw.find(label.variant) {
        Some(end) => &raw[..end],
        None => raw.as_str(),
    };
    let value = dom::normalize_whitespace(rest);
    let value = value.trim_matches(|c: char| c == ':' || c == '：' || c.is_whitespace());
    (!value.is_empty()).then(|| value.to_string())
}

/// Raw text following `label.node` inside its container, in document order.
fn text_after(label: &LabelMatch) -> String {
    let mut text = String::new();
    let mut cursor = label.node;

    'walk: loop {
        for sibling in cursor.next_siblings() {
            if let Some(fragment) = sibling.value().as_text() {
                text.push_str(fragment);
                continue;
            }
            let Some(el) = ElementRef::wrap(sibling) else { continue };
            if dom::tag(el) == "br" || is_barrier(el) || dom::element_text(el).contains(label.variant) {
                break 'walk;
            }
            text.extend(el.text());
        }
        match dom::parent_element(cursor) {
            Some(parent) if parent.id() != label.container.id() => cursor = parent,
            _ => break,
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::label::{find_labels, ContainerRule, LabelMatcher, LabelTarget, MatchMode};
    use scraper::Html;

    const MONO: ValueShape = ValueShape::Class("zhpron-monospace");

    fn text_label(variant: &'static [&'static str]) -> LabelMatcher {
        LabelMatcher {
            variants: variant,
            mode: MatchMode::Substring,
            target: LabelTarget::Text,
            container: ContainerRule::ListItem,
        }
    }

    fn first_match<'a>(doc: &'a Html, matcher: &LabelMatcher) -> LabelMatch<'a> {
        find_labels(&[doc.root_element()], matcher)
            .into_iter()
            .next()
            .expect("label should be present")
    }

    #[test]
    fn test_in_container_wins_over_sibling_block() {
        let doc = Html::parse_document(r#"<body>
            <ul><li>Mandarin <span class="zhpron-monospace">inside</span></li></ul>
            <dl><dd><span class="zhpron-monospace">outside</span></dd></dl>
        </body>"#);
        let label = first_match(&doc, &text_label(&["Mandarin"]));
        let strategies = [
            Strategy::InContainer(MONO),
            Strategy::SiblingBlock { companion: "dl", shape: MONO },
        ];

        assert_eq!(resolve_value(&label, &strategies).as_deref(), Some("inside"));
    }

    #[test]
    fn test_sibling_block_companion_list() {
        let doc = Html::parse_document(r#"<body>
            <ul><li>Mandarin</li></ul>
            <dl><dd>Pinyin: <span class="zhpron-monospace">xíng</span></dd></dl>
        </body>"#);
        let label = first_match(&doc, &text_label(&["Mandarin"]));
        let strategies = [
            Strategy::InContainer(MONO),
            Strategy::SiblingBlock { companion: "dl", shape: MONO },
        ];

        assert_eq!(resolve_value(&label, &strategies).as_deref(), Some("xíng"));
    }

    #[test]
    fn test_sibling_block_value_beside_item_in_same_list() {
        let doc = Html::parse_document(r#"<body>
            <ul><li>Mandarin</li><span class="zhpron-monospace">pɪn.jɪn</span><li>Cantonese</li></ul>
        </body>"#);
        let label = first_match(&doc, &text_label(&["Mandarin"]));
        let strategies = [
            Strategy::InContainer(MONO),
            Strategy::SiblingBlock { companion: "dl", shape: MONO },
        ];
        assert_eq!(resolve_value(&label, &strategies).as_deref(), Some("pɪn.jɪn"));

        // A value after the next item belongs to that item
        let doc = Html::parse_document(r#"<body>
            <ul><li>Mandarin</li><li>Cantonese</li><span class="zhpron-monospace">jyut</span></ul>
        </body>"#);
        let label = first_match(&doc, &text_label(&["Mandarin"]));
        assert_eq!(resolve_value(&label, &strategies), None);
    }

    #[test]
    fn test_sibling_block_stops_at_heading_or_list() {
        let strategy = [Strategy::SiblingBlock { companion: "dl", shape: MONO }];

        let doc = Html::parse_document(r#"<body>
            <ul><li>Mandarin</li></ul>
            <h4>Usage notes</h4>
            <dl><dd><span class="zhpron-monospace">too far</span></dd></dl>
        </body>"#);
        assert_eq!(resolve_value(&first_match(&doc, &text_label(&["Mandarin"])), &strategy), None);

        let doc = Html::parse_document(r#"<body>
            <ul><li>Mandarin</li></ul>
            <ul><li>Cantonese</li></ul>
            <dl><dd><span class="zhpron-monospace">too far</span></dd></dl>
        </body>"#);
        assert_eq!(resolve_value(&first_match(&doc, &text_label(&["Mandarin"])), &strategy), None);
    }

    #[test]
    fn test_sibling_block_skips_unrelated_inline_nodes() {
        let doc = Html::parse_document(r#"<body>
            <ul><li>Mandarin</li></ul>
            <link rel="mw-deduplicated-inline-style">
            <dl><dd><span class="zhpron-monospace">hàng</span></dd></dl>
        </body>"#);
        let strategy = [Strategy::SiblingBlock { companion: "dl", shape: MONO }];
        assert_eq!(resolve_value(&first_match(&doc, &text_label(&["Mandarin"])), &strategy).as_deref(), Some("hàng"));
    }

    const ZHENGZHANG_ROW: Strategy = Strategy::Switcher {
        group_class: "vsSwitcher",
        row_label: "Zhengzhang",
        shape: ValueShape::AnyClass(&["IPAchar", "zhpron-monospace", "IPA"]),
    };

    #[test]
    fn test_switcher_row_with_marker_class() {
        let doc = Html::parse_document(r#"<body><div class="vsSwitcher">
            <ul><li><a>Middle Chinese</a>: <span class="zhpron-monospace">haeng</span></li></ul>
            <div class="vsHide"><table>
                <tr><th>Baxter</th><td><span class="IPAchar">haeng</span></td></tr>
                <tr><th>Zhengzhang<br>Shangfang</th><td><span class="IPAchar">/ɦˠæŋ/</span></td></tr>
            </table></div>
        </div></body>"#);
        let label = first_match(&doc, &text_label(&["Middle Chinese"]));
        assert_eq!(resolve_value(&label, &[ZHENGZHANG_ROW]).as_deref(), Some("/ɦˠæŋ/"));
    }

    #[test]
    fn test_switcher_falls_back_to_last_cell() {
        let doc = Html::parse_document(r#"<body><div class="vsSwitcher">
            <ul><li>Middle Chinese</li></ul>
            <table><tr><th>Zheng<i>zhang</i></th><td>/ɦˠæŋ/</td></tr></table>
        </div></body>"#);
        let label = first_match(&doc, &text_label(&["Middle Chinese"]));
        assert_eq!(resolve_value(&label, &[ZHENGZHANG_ROW]).as_deref(), Some("/ɦˠæŋ/"));
    }

    #[test]
    fn test_switcher_rejects_label_cell_fallback() {
        let doc = Html::parse_document(r#"<body><div class="vsSwitcher">
            <ul><li>Middle Chinese</li></ul>
            <table><tr><td>notes</td><td>see Zhengzhang</td></tr></table>
        </div></body>"#);
        let label = first_match(&doc, &text_label(&["Middle Chinese"]));
        assert_eq!(resolve_value(&label, &[ZHENGZHANG_ROW]), None);
    }

    #[test]
    fn test_switcher_found_after_list() {
        let doc = Html::parse_document(r#"<body>
            <ul><li>Middle Chinese</li></ul>
            <div class="vsSwitcher"><table><tr><th>Zhengzhang</th><td><span class="IPA">/ɦˠæŋ/</span></td></tr></table></div>
        </body>"#);
        let label = first_match(&doc, &text_label(&["Middle Chinese"]));
        assert_eq!(resolve_value(&label, &[ZHENGZHANG_ROW]).as_deref(), Some("/ɦˠæŋ/"));
    }

    const OLD_CHINESE: Strategy = Strategy::Ascend {
        levels: 6,
        shapes: &[ValueShape::Class("IPAchar"), ValueShape::Lang("och-Latn-fonipa")],
        require_marker: true,
    };

    fn scholar_link() -> LabelMatcher {
        LabelMatcher {
            variants: &["Zhengzhang"],
            mode: MatchMode::Substring,
            target: LabelTarget::LinkTextOrTitle,
            container: ContainerRule::ListItem,
        }
    }

    #[test]
    fn test_ascend_requires_reconstruction_marker() {
        let doc = Html::parse_document(r#"<body><dl><dd>
            <a title="w:Zhengzhang Shangfang">Zhengzhang</a>:
            <span class="IPAchar">/ɦˠæŋ/</span>
            <span class="IPAchar">/*ɡraːŋ/</span>
        </dd></dl></body>"#);
        let label = first_match(&doc, &scholar_link());
        assert_eq!(resolve_value(&label, &[OLD_CHINESE]).as_deref(), Some("/*ɡraːŋ/"));
    }

    #[test]
    fn test_ascend_rejects_unmarked_values() {
        let doc = Html::parse_document(r#"<body><dl><dd>
            <a title="w:Zhengzhang Shangfang">ZS</a>:
            <span class="IPAchar">/ɦˠæŋ/</span>
            <span lang="och-Latn-fonipa">ɡraːŋ</span>
        </dd></dl></body>"#);
        let label = first_match(&doc, &scholar_link());
        assert_eq!(resolve_value(&label, &[OLD_CHINESE]), None);
    }

    #[test]
    fn test_ascend_is_bounded() {
        let doc = Html::parse_document(r#"<body><div><span class="IPAchar">*far</span>
            <div><div><div><div><div><div><div><a>Zhengzhang</a></div></div></div></div></div></div></div>
        </div></body>"#);
        let label = first_match(&doc, &scholar_link());
        assert_eq!(resolve_value(&label, &[OLD_CHINESE]), None);

        let deeper = Strategy::Ascend {
            levels: 8,
            shapes: &[ValueShape::Class("IPAchar"), ValueShape::Lang("och-Latn-fonipa")],
            require_marker: true,
        };
        assert_eq!(resolve_value(&label, &[deeper]).as_deref(), Some("*far"));
    }

    #[test]
    fn test_trailing_text_after_label() {
        let doc = Html::parse_document(r#"<body><ul>
            <li><a>Go-on</a>: <span lang="ja">ぎょう</span> (<i>gyō</i>)</li>
            <li><a>Kan-on</a>: こう (<i>kō</i>), later Kan-on reading</li>
        </ul></body>"#);
        let go = first_match(&doc, &text_label(&["Go-on"]));
        assert_eq!(resolve_value(&go, &[Strategy::TrailingText]).as_deref(), Some("ぎょう (gyō)"));

        let kan = first_match(&doc, &text_label(&["Kan-on"]));
        assert_eq!(resolve_value(&kan, &[Strategy::TrailingText]).as_deref(), Some("こう (kō), later"));
    }

    #[test]
    fn test_trailing_text_empty_is_none() {
        let doc = Html::parse_document(r#"<body><ul><li><a>To-on</a>:</li></ul></body>"#);
        let label = first_match(&doc, &text_label(&["To-on"]));
        assert_eq!(resolve_value(&label, &[Strategy::TrailingText]), None);
    }

    #[test]
    fn test_trailing_text_stops_at_line_break() {
        let doc = Html::parse_document(r#"<body><p>
            <a>Go-on</a>: ぎょう (gyō)<br><a>Kan-on</a>: こう (kō)<br><a>To-on</a>: あん (an)
        </p></body>"#);
        let link = |variant: &'static [&'static str]| LabelMatcher {
            variants: variant,
            mode: MatchMode::Substring,
            target: LabelTarget::LinkText,
            container: ContainerRule::ListItem,
        };

        let go = first_match(&doc, &link(&["Go-on"]));
        assert_eq!(dom::tag(go.container), "p");
        assert_eq!(resolve_value(&go, &[Strategy::TrailingText]).as_deref(), Some("ぎょう (gyō)"));
        let kan = first_match(&doc, &link(&["Kan-on"]));
        assert_eq!(resolve_value(&kan, &[Strategy::TrailingText]).as_deref(), Some("こう (kō)"));
        let to = first_match(&doc, &link(&["To-on"]));
        assert_eq!(resolve_value(&to, &[Strategy::TrailingText]).as_deref(), Some("あん (an)"));
    }

    #[test]
    fn test_trailing_text_climbs_out_of_wrapped_label() {
        let doc = Html::parse_document(r#"<body><p><b><a>Go-on</a></b>: ごう<br>other</p></body>"#);
        let label = first_match(&doc, &text_label(&["Go-on"]));
        assert_eq!(resolve_value(&label, &[Strategy::TrailingText]).as_deref(), Some("ごう"));
    }
}
