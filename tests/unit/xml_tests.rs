/*!
 * Tests for XML ingestion
 */

use danmaku_converter::danmaku::xml::{parse_document, write_document};
use danmaku_converter::errors::{DanmakuError, RecordError};
use crate::common;

#[test]
fn test_parse_document_withSampleDocument_shouldKeepDocumentOrder() {
    let records = parse_document(&common::sample_document()).unwrap();
    let contents: Vec<String> = records
        .into_iter()
        .map(|r| r.unwrap().comment.content)
        .collect();
    assert_eq!(contents, vec!["hello", "hi", "bottom", "[advanced]"]);
}

#[test]
fn test_parse_document_withMalformedRecord_shouldReportPerRecord() {
    let xml = common::danmaku_document(&[
        common::danmaku_element(1.0, 1, 25, 16777215, "ok"),
        "<d p=\"1.0,1,25\">short</d>".to_string(),
        common::danmaku_element(2.0, 1, 25, 16777215, "also ok"),
    ]);
    let records = parse_document(&xml).unwrap();

    assert_eq!(records.len(), 3);
    assert!(records[0].is_ok());
    assert_eq!(records[1], Err(RecordError::FieldCount { found: 3 }));
    assert!(records[2].is_ok());
}

#[test]
fn test_parse_document_withEntities_shouldKeepEscapedForm() {
    let xml = common::danmaku_document(&[
        common::danmaku_element(1.0, 1, 25, 16777215, "a &amp; b &lt;3 &quot;q&quot;"),
    ]);
    let records = parse_document(&xml).unwrap();
    let comment = records[0].as_ref().unwrap();
    assert_eq!(comment.comment.content, "a &amp; b &lt;3 \"q\"");
}

#[test]
fn test_parse_document_withEmptyElement_shouldHaveEmptyContent() {
    let xml = common::danmaku_document(&["<d p=\"1,1,25,16777215,0,0,h,1\"></d>".to_string()]);
    let records = parse_document(&xml).unwrap();
    assert_eq!(records[0].as_ref().unwrap().comment.content, "");
}

#[test]
fn test_parse_document_withBrokenMarkup_shouldFail() {
    let result = parse_document("<i><d p=\"1,1,25,16777215,0,0,h,1\">unterminated</i>");
    assert!(matches!(result, Err(DanmakuError::Markup(_))));
}

#[test]
fn test_write_document_thenParse_shouldReproduceComments() {
    let original: Vec<_> = parse_document(&common::sample_document())
        .unwrap()
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let reparsed: Vec<_> = parse_document(&write_document(&original))
        .unwrap()
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(reparsed, original);
}
