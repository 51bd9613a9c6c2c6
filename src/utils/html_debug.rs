// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use regex::Regex;
use crate::utils::error::AppError;

/// Saves a HTML page to a file with debug highlights.
/// Highlights are `(start, end, kind)` byte ranges into `html`; overlapping ranges are dropped.
pub fn save_debug_html(html: &str, path: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), AppError> {
    let mut file = File::create(path)?;

    // Debug styling is injected ahead of the page body
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".highlight-heading { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-label { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos || end > html.len() {
            tracing::trace!("Skipping overlapping highlight {}-{} ({})", start, end, highlight_type);
            continue;
        }
        debug_html.push_str(&html[last_pos..start]);

        let css_class = match highlight_type {
            "heading" => "highlight-heading",
            "label" => "highlight-label",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!("<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
    }

    debug_html.push_str(&html[last_pos..]);
    debug_html.push_str("\n</body>\n</html>");

    file.write_all(debug_html.as_bytes())?;

    tracing::info!("Saved debug HTML to {}", path.display());
    Ok(())
}

/// Collects highlight ranges for every pattern match.
/// When a pattern has a capture group, only the first group is highlighted.
pub fn find_highlights<'k, P: AsRef<str>>(html: &str, patterns: &[(P, &'k str)]) -> Result<Vec<(usize, usize, &'k str)>, AppError> {
    let mut highlights = Vec::new();

    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern.as_ref()).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern.as_ref(), e))
        })?;

        for caps in re.captures_iter(html) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                highlights.push((m.start(), m.end(), *highlight_type));
            }
        }
    }

    Ok(highlights)
}

/// Creates a debug version of an HTML document with locations of specified regex patterns highlighted
pub fn create_debug_html<P: AsRef<str>>(html: &str, path: &Path, patterns: &[(P, &str)]) -> Result<(), AppError> {
    let highlights = find_highlights(html, patterns)?;
    save_debug_html(html, path, &highlights)
}
