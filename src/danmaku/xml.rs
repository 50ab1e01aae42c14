/*!
 * Ingestion of the XML danmaku format.
 *
 * Every `<d p="...">text</d>` element of the document becomes one
 * `SourceComment`. Record level failures are returned per element so the
 * caller can decide whether to skip the record or abort the document.
 */

use log::debug;
use roxmltree::Document;

use super::model::SourceComment;
use crate::errors::{DanmakuError, RecordError};

/// Parse all comment elements in document order
pub fn parse_document(xml: &str) -> Result<Vec<Result<SourceComment, RecordError>>, DanmakuError> {
    let document = Document::parse(xml)
        .map_err(|e| DanmakuError::Markup(e.to_string()))?;

    let records: Vec<Result<SourceComment, RecordError>> = document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "d")
        .filter_map(|node| {
            let metadata = node.attribute("p")?;
            let content = escape_markup(node.text().unwrap_or_default());
            Some(SourceComment::from_metadata(metadata, &content))
        })
        .collect();

    debug!("Found {} comment elements", records.len());
    Ok(records)
}

/// Re-escape text the way it appears inside the element markup
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap serialized comments into a complete document
pub fn write_document(comments: &[SourceComment]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><i>");
    for comment in comments {
        xml.push_str(&comment.to_xml_element());
    }
    xml.push_str("</i>");
    xml
}
