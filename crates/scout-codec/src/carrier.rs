//! # SVG Carrier Embedding
//!
//! A payload is stored in the carrier's `<desc>` element as a CDATA block:
//!
//! ```text
//! <svg ...><desc><![CDATA[payload]]></desc> ... </svg>
//! ```
//!
//! Embedding replaces the first existing `<desc>…</desc>` element, or inserts
//! one directly after the `<svg …>` opening tag. Nothing else in the
//! document changes, so re-embedding is idempotent and the image renders
//! exactly as before.
//!
//! A literal `]]>` inside the payload would end the CDATA block early. It is
//! split as `]]]]><![CDATA[>` on the way in and joined back on extraction.

use std::sync::OnceLock;

use regex::{NoExpand, Regex};

use crate::error::CodecError;

/// A minimal carrier for payloads that have no image of their own.
pub const BLANK_CARRIER: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1" viewBox="0 0 1 1"></svg>"#;

const CDATA_END: &str = "]]>";
const CDATA_END_SPLIT: &str = "]]]]><![CDATA[>";

static DESC_ELEMENT: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static SVG_OPEN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static DESC_CDATA: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn pattern(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    source: &str,
) -> Result<&'static Regex, CodecError> {
    cell.get_or_init(|| Regex::new(source))
        .as_ref()
        .map_err(|e| CodecError::Pattern(e.to_string()))
}

fn desc_block(payload: &str) -> String {
    format!(
        "<desc><![CDATA[{}]]></desc>",
        payload.replace(CDATA_END, CDATA_END_SPLIT)
    )
}

/// Embed a payload, reporting carriers without an `<svg` root.
///
/// # Errors
///
/// Returns `CodecError::MissingRoot` if there is no `<desc>` element to
/// replace and no `<svg` opening tag to insert after.
pub fn try_embed(carrier: &str, payload: &str) -> Result<String, CodecError> {
    let block = desc_block(payload);

    // CDATA sections are matched whole so a `</desc>` inside an earlier
    // payload does not end the element.
    let desc = pattern(
        &DESC_ELEMENT,
        r"(?s)<desc>(?:<!\[CDATA\[.*?\]\]>)+</desc>|<desc>.*?</desc>",
    )?;
    if desc.is_match(carrier) {
        return Ok(desc.replacen(carrier, 1, NoExpand(&block)).into_owned());
    }

    let open = pattern(&SVG_OPEN, r"<svg\b[^>]*>")?;
    let tag = open.find(carrier).ok_or(CodecError::MissingRoot)?;
    let tag_text = tag.as_str();
    let mut out = String::with_capacity(carrier.len() + block.len() + 8);
    out.push_str(&carrier[..tag.start()]);
    match tag_text.strip_suffix("/>") {
        // `<svg/>` has no body to hold the element.
        Some(head) => {
            out.push_str(head.trim_end());
            out.push('>');
            out.push_str(&block);
            out.push_str("</svg>");
        }
        None => {
            out.push_str(tag_text);
            out.push_str(&block);
        }
    }
    out.push_str(&carrier[tag.end()..]);
    Ok(out)
}

/// Embed a payload into a carrier.
///
/// A document without an `<svg` root is returned unchanged.
pub fn embed(carrier: &str, payload: &str) -> String {
    match try_embed(carrier, payload) {
        Ok(out) => out,
        Err(e) => {
            tracing::warn!(error = %e, "carrier left unchanged");
            carrier.to_string()
        }
    }
}

/// Extract the payload from the first `<desc><![CDATA[…]]></desc>` element.
///
/// Returns `None` when the carrier holds no payload.
pub fn extract(carrier: &str) -> Option<String> {
    let cdata = match pattern(&DESC_CDATA, r"(?s)<desc><!\[CDATA\[(.*?)\]\]></desc>") {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(error = %e, "payload extraction unavailable");
            return None;
        }
    };
    cdata
        .captures(carrier)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace(CDATA_END_SPLIT, CDATA_END))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 29 29"><path d="M0 0h7v7H0z"/></svg>"#;

    #[test]
    fn insert_after_open_tag() {
        let out = embed(QR, "abc");
        assert_eq!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 29 29"><desc><![CDATA[abc]]></desc><path d="M0 0h7v7H0z"/></svg>"#
        );
        assert_eq!(extract(&out).as_deref(), Some("abc"));
    }

    #[test]
    fn re_embed_over_payload_containing_desc_close() {
        let once = embed(QR, "x</desc>y");
        assert_eq!(extract(&once).as_deref(), Some("x</desc>y"));
        let twice = embed(&once, "p2");
        assert_eq!(
            twice,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 29 29"><desc><![CDATA[p2]]></desc><path d="M0 0h7v7H0z"/></svg>"#
        );
        assert_eq!(twice.matches("</desc>").count(), 1);
    }

    #[test]
    fn re_embed_over_split_terminator() {
        let once = embed(QR, "a]]></desc>b");
        let twice = embed(&once, "p2");
        assert_eq!(twice.matches("<desc>").count(), 1);
        assert_eq!(twice.matches("</desc>").count(), 1);
        assert_eq!(extract(&twice).as_deref(), Some("p2"));
    }

    #[test]
    fn re_embed_replaces_single_desc() {
        let once = embed(QR, "first");
        let twice = embed(&once, "second");
        assert_eq!(twice.matches("<desc>").count(), 1);
        assert_eq!(extract(&twice).as_deref(), Some("second"));
        assert!(twice.contains(r#"<path d="M0 0h7v7H0z"/>"#));
    }

    #[test]
    fn embedding_same_payload_is_stable() {
        let once = embed(QR, "p");
        assert_eq!(embed(&once, "p"), once);
    }

    #[test]
    fn replaces_multiline_desc() {
        let carrier = "<svg>\n<desc>\nplain\ntext\n</desc><rect/></svg>";
        let out = embed(carrier, "xyz");
        assert_eq!(out, "<svg>\n<desc><![CDATA[xyz]]></desc><rect/></svg>");
    }

    #[test]
    fn cdata_terminator_survives() {
        let payload = "a]]>b]]>";
        let out = embed(QR, payload);
        assert_eq!(out.matches("<desc>").count(), 1);
        assert_eq!(extract(&out).as_deref(), Some(payload));
    }

    #[test]
    fn dollar_in_payload_not_expanded() {
        let once = embed(QR, "old");
        let out = embed(&once, "$1${0}");
        assert_eq!(extract(&out).as_deref(), Some("$1${0}"));
    }

    #[test]
    fn self_closing_root_gains_body() {
        let out = embed(r#"<svg width="1"/>"#, "p");
        assert_eq!(out, r#"<svg width="1"><desc><![CDATA[p]]></desc></svg>"#);
        assert_eq!(extract(&out).as_deref(), Some("p"));
    }

    #[test]
    fn missing_root() {
        assert_eq!(try_embed("<html></html>", "p"), Err(CodecError::MissingRoot));
        assert_eq!(embed("<html></html>", "p"), "<html></html>");
    }

    #[test]
    fn extract_absent_is_none() {
        assert_eq!(extract(QR), None);
        assert_eq!(extract("<svg><desc>plain</desc></svg>"), None);
    }

    #[test]
    fn svgz_like_tag_not_matched() {
        assert_eq!(try_embed("<svgx></svgx>", "p"), Err(CodecError::MissingRoot));
    }

    #[test]
    fn blank_carrier_accepts_payload() {
        assert_eq!(extract(&embed(BLANK_CARRIER, "p")).as_deref(), Some("p"));
    }
}
