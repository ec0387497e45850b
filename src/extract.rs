//! Script extraction from rendered markup.
//!
//! Finds every `<script>` element in a rendered page and classifies it:
//! `/_public`-rooted `src` values are local assets, absolute http(s) URLs
//! are remote assets, script bodies without `src` are inline code. Any
//! other `src` form is not sizeable and is skipped.

use crate::core::BudgetError;

/// One classified script reference, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptRef {
    /// Script served from the public asset tree (`/_public` prefix dropped).
    Local { path: String },
    /// Script loaded from an absolute http(s) URL.
    Remote { url: String },
    /// Script body embedded in the markup.
    Inline { code: String },
}

/// Extract script references from one route's rendered HTML.
///
/// Inline scripts with a declared `application/json` type are data islands,
/// not executable payload, and are excluded entirely.
pub fn extract_scripts(html: &str) -> Result<Vec<ScriptRef>, BudgetError> {
    scan_script_termination(html)?;

    let dom = tl::parse(html, tl::ParserOptions::default()).map_err(|e| BudgetError::Parse {
        detail: e.to_string(),
    })?;
    let parser = dom.parser();

    let mut refs = Vec::new();
    for node in dom.nodes() {
        let Some(tag) = node.as_tag() else { continue };
        if !tag.name().as_utf8_str().eq_ignore_ascii_case("script") {
            continue;
        }

        if let Some(src) = attr(tag, "src") {
            let src = src.unwrap_or_default();
            if let Some(path) = src.strip_prefix("/_public") {
                refs.push(ScriptRef::Local {
                    path: path.to_string(),
                });
            } else if src.starts_with("http:") || src.starts_with("https:") {
                refs.push(ScriptRef::Remote { url: src });
            }
            continue;
        }

        if let Some(Some(kind)) = attr(tag, "type") {
            if kind.trim().eq_ignore_ascii_case("application/json") {
                continue;
            }
        }

        refs.push(ScriptRef::Inline {
            code: tag.inner_text(parser).trim().to_string(),
        });
    }
    Ok(refs)
}

/// Look up an attribute by case-insensitive name.
///
/// `Some(None)` means the attribute is present without a value.
fn attr(tag: &tl::HTMLTag<'_>, name: &str) -> Option<Option<String>> {
    for (key, value) in tag.attributes().iter() {
        if key.as_ref().eq_ignore_ascii_case(name) {
            return Some(value.map(|v| v.to_string()));
        }
    }
    None
}

// ============================================================================
// Termination scan
// ============================================================================

/// Verify every `<script>` open tag is properly terminated.
///
/// `<script>` is a raw text element: its content runs to the first
/// `</script`, so a missing close tag swallows the rest of the document.
/// That is reported as a parse error scoped to the route rather than
/// silently measuring garbage. Comments are skipped; a self-describing
/// end tag (`<script src=... />`) counts as terminated.
fn scan_script_termination(html: &str) -> Result<(), BudgetError> {
    let lower = html.to_ascii_lowercase();
    let mut pos = 0;

    while pos < lower.len() {
        let next_script = lower[pos..].find("<script").map(|i| pos + i);
        let next_comment = lower[pos..].find("<!--").map(|i| pos + i);

        match (next_script, next_comment) {
            (None, _) => break,
            (Some(s), Some(c)) if c < s => {
                // Skip the comment; an unclosed comment consumes the rest.
                match lower[c + 4..].find("-->") {
                    Some(end) => pos = c + 4 + end + 3,
                    None => break,
                }
            }
            (Some(s), _) => pos = check_script_at(&lower, s)?,
        }
    }
    Ok(())
}

/// Check one `<script` occurrence; returns the position to resume from.
fn check_script_at(lower: &str, start: usize) -> Result<usize, BudgetError> {
    let after = start + "<script".len();

    // Not a script element if the name continues (`<scripting ...>`).
    if lower[after..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Ok(after);
    }

    let Some(tag_end) = lower[after..].find('>').map(|i| after + i) else {
        return Err(unterminated());
    };

    // Self-describing end tag
    if lower[..tag_end].ends_with('/') {
        return Ok(tag_end + 1);
    }

    match lower[tag_end + 1..].find("</script") {
        Some(close) => {
            let close = tag_end + 1 + close;
            Ok(lower[close..]
                .find('>')
                .map_or(lower.len(), |i| close + i + 1))
        }
        None => Err(unterminated()),
    }
}

fn unterminated() -> BudgetError {
    BudgetError::Parse {
        detail: "unterminated <script> element".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
