// src/extractors/label.rs

use scraper::ElementRef;
use super::dom;

// Block-level parents accepted as a label's container when it is not inside a list item.
const STRUCTURAL_TAGS: [&str; 7] = ["p", "dd", "dt", "div", "td", "th", "tr"];
// Text under these never counts as a label.
const IGNORED_TEXT_PARENTS: [&str; 3] = ["script", "style", "noscript"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Substring,
    Exact,
}

/// What text a label is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    /// Any text fragment in the section.
    Text,
    /// Visible text of an `<a>` element.
    LinkText,
    /// `title` attribute of an `<a>` element.
    LinkTitle,
    LinkTextOrTitle,
}

/// How the structural context around a label is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRule {
    /// Nearest enclosing `<li>`, else the nearest block-level element.
    ListItem,
    /// Nearest strict ancestor with one of these tag names.
    BlockAncestor(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatcher {
    pub variants: &'static [&'static str],
    pub mode: MatchMode,
    pub target: LabelTarget,
    pub container: ContainerRule,
}

/// A label occurrence and the context its value is searched from.
#[derive(Debug, Clone, Copy)]
pub struct LabelMatch<'a> {
    /// The element carrying the label text (the link, or the text's parent).
    pub node: ElementRef<'a>,
    pub container: ElementRef<'a>,
    /// Which of the matcher's variants was seen.
    pub variant: &'static str,
}

impl LabelMatcher {
    /// Returns the first variant that `text` satisfies.
    pub fn matching_variant(&self, text: &str) -> Option<&'static str> {
        let text = text.trim();
        self.variants.iter().copied().find(|variant| match self.mode {
            MatchMode::Substring => text.contains(variant),
            MatchMode::Exact => text == *variant,
        })
    }

    fn link_variant(&self, link: ElementRef) -> Option<&'static str> {
        let by_text = || self.matching_variant(&dom::element_text(link));
        let by_title = || link.value().attr("title").and_then(|t| self.matching_variant(t));

        match self.target {
            LabelTarget::LinkText => by_text(),
            LabelTarget::LinkTitle => by_title(),
            LabelTarget::LinkTextOrTitle => by_text().or_else(by_title),
            LabelTarget::Text => None,
        }
    }

    fn container_for<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match self.container {
            ContainerRule::ListItem => dom::ancestors_or_self(node)
                .find(|el| dom::tag(*el) == "li")
                .or_else(|| dom::ancestors_or_self(node).find(|el| STRUCTURAL_TAGS.contains(&dom::tag(*el))))
                .or(Some(node)),
            ContainerRule::BlockAncestor(tags) => node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| tags.contains(&dom::tag(*el))),
        }
    }
}

/// Collects every label occurrence under `nodes` in document order.
/// Several hits inside one container are reported once, at the first hit.
pub fn find_labels<'a>(nodes: &[ElementRef<'a>], matcher: &LabelMatcher) -> Vec<LabelMatch<'a>> {
    let mut matches: Vec<LabelMatch<'a>> = Vec::new();

    for root in nodes {
        for node in root.descendants() {
            let hit = match matcher.target {
                LabelTarget::Text => node.value().as_text().and_then(|text| {
                    let parent = node.parent().and_then(ElementRef::wrap)?;
                    if IGNORED_TEXT_PARENTS.contains(&dom::tag(parent)) {
                        return None;
                    }
                    matcher.matching_variant(text).map(|variant| (parent, variant))
                }),
                _ => ElementRef::wrap(node)
                    .filter(|el| dom::tag(*el) == "a")
                    .and_then(|link| matcher.link_variant(link).map(|variant| (link, variant))),
            };

            let Some((label_node, variant)) = hit else { continue };
            let Some(container) = matcher.container_for(label_node) else {
                tracing::trace!("Label '{}' has no acceptable container, skipping", variant);
                continue;
            };

            if matches.iter().any(|m| m.container.id() == container.id()) {
                continue;
            }
            tracing::trace!("Label '{}' matched in <{}>", variant, dom::tag(container));
            matches.push(LabelMatch { node: label_node, container, variant });
        }
    }

    tracing::debug!("Found {} label matches for {:?}", matches.len(), matcher.variants);
    matches
}
