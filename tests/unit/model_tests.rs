/*!
 * Tests for comment records and metadata parsing
 */

use danmaku_converter::danmaku::model::{Comment, CommentKind, FontSizeClass, PlacedComment, Placement, SourceComment};
use danmaku_converter::errors::RecordError;

#[test]
fn test_from_metadata_withValidFields_shouldParseAllFields() {
    let comment = SourceComment::from_metadata("12.345,1,25,16777215,1600000000,0,a1b2c3d4,987654321012", "text").unwrap();

    assert_eq!(comment.comment.content, "text");
    assert_eq!(comment.comment.start_time, 12.345);
    assert_eq!(comment.comment.type_code, 1);
    assert_eq!(comment.comment.font_size, 25);
    assert_eq!(comment.comment.color, 0xFFFFFF);
    assert_eq!(comment.timestamp, 1600000000);
    assert_eq!(comment.pool, 0);
    assert_eq!(comment.user_hash, "a1b2c3d4");
    assert_eq!(comment.row_id, 987654321012);
}

#[test]
fn test_from_metadata_withWrongFieldCount_shouldFail() {
    let result = SourceComment::from_metadata("1.0,1,25,16777215", "text");
    assert_eq!(result, Err(RecordError::FieldCount { found: 4 }));

    let result = SourceComment::from_metadata("1.0,1,25,16777215,0,0,hash,1,extra", "text");
    assert_eq!(result, Err(RecordError::FieldCount { found: 9 }));
}

#[test]
fn test_from_metadata_withInvalidNumber_shouldNameField() {
    let result = SourceComment::from_metadata("1.0,x,25,16777215,0,0,hash,1", "text");
    assert_eq!(
        result,
        Err(RecordError::InvalidField { field: "type", value: "x".to_string() })
    );

    let result = SourceComment::from_metadata("soon,1,25,16777215,0,0,hash,1", "text");
    assert!(matches!(result, Err(RecordError::InvalidField { field: "start time", .. })));

    let result = SourceComment::from_metadata("NaN,1,25,16777215,0,0,hash,1", "text");
    assert!(matches!(result, Err(RecordError::InvalidField { field: "start time", .. })));

    let result = SourceComment::from_metadata("1.0,1,25,-5,0,0,hash,1", "text");
    assert!(matches!(result, Err(RecordError::InvalidField { field: "color", .. })));
}

#[test]
fn test_from_metadata_withPaddedNumber_shouldFail() {
    let result = SourceComment::from_metadata("1.0,1, 25,16777215,0,0,hash,1", "text");
    assert_eq!(
        result,
        Err(RecordError::InvalidField { field: "font size", value: " 25".to_string() })
    );

    let result = SourceComment::from_metadata("1.0 ,1,25,16777215,0,0,hash,1", "text");
    assert!(matches!(result, Err(RecordError::InvalidField { field: "start time", .. })));
}

#[test]
fn test_metadata_roundTrip_shouldReproduceFields() {
    let original = SourceComment::from_metadata("83.12,5,18,65280,1500000000,1,ff00ff00,42", "&lt;3").unwrap();
    let encoded = original.to_metadata();
    assert_eq!(encoded, "83.12,5,18,65280,1500000000,1,ff00ff00,42");

    let decoded = SourceComment::from_metadata(&encoded, &original.comment.content).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_to_xml_element_shouldWrapContent() {
    let comment = SourceComment::from_metadata("1,1,25,16777215,0,0,h,1", "a &amp; b").unwrap();
    assert_eq!(comment.to_xml_element(), "<d p=\"1,1,25,16777215,0,0,h,1\">a &amp; b</d>");
}

#[test]
fn test_comment_kind_withAllTypes_shouldClassify() {
    let expected = [
        (1, CommentKind::Normal),
        (2, CommentKind::Normal),
        (3, CommentKind::Normal),
        (4, CommentKind::Bottom),
        (5, CommentKind::Top),
        (6, CommentKind::Reversed),
        (7, CommentKind::Special),
        (8, CommentKind::Special),
    ];
    for (code, kind) in expected {
        assert_eq!(Comment::new("x", 0.0, code, 25, 0).kind(), kind, "type {}", code);
    }
    assert!(CommentKind::Reversed.is_horizontal());
    assert!(CommentKind::Top.is_vertical());
    assert!(!CommentKind::Special.is_horizontal() && !CommentKind::Special.is_vertical());
}

#[test]
fn test_font_size_class_table() {
    assert_eq!(FontSizeClass::from_code(25), Some(FontSizeClass::Large));
    assert_eq!(FontSizeClass::from_code(18), Some(FontSizeClass::Small));
    assert_eq!(FontSizeClass::from_code(36), None);
    assert_eq!(FontSizeClass::Large.pixel_size(), 52);
    assert_eq!(FontSizeClass::Small.pixel_size(), 36);
    assert_eq!(FontSizeClass::Small.code(), 18);
    assert_eq!(FontSizeClass::Large.style_name(), "Medium");
}

#[test]
fn test_placed_comment_tags() {
    let placed = PlacedComment::new(
        Comment::new("hi", 1.0, 5, 25, 0x0000FF),
        5.0,
        Placement::Position { x: 960.0, y: 30.0 },
    );
    assert_eq!(placed.type_tag(), "\\pos(960,30)");
    assert_eq!(placed.color_tag(), "\\c&Hff0000&");

    let white = PlacedComment::new(Comment::new("hi", 1.0, 7, 25, 0xFFFFFF), 7.0, Placement::OffScreen);
    assert_eq!(white.type_tag(), "\\pos(0,-999)");
    assert_eq!(white.color_tag(), "");
}
