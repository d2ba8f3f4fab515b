use super::*;

#[test]
fn test_line_from_offset() {
    let table = LineOffsetTable::build("ab\ncd\n\nef");
    assert_eq!(table.line_from_offset(0), 1);
    assert_eq!(table.line_from_offset(2), 1);
    assert_eq!(table.line_from_offset(3), 2);
    assert_eq!(table.line_from_offset(6), 3);
    assert_eq!(table.line_from_offset(7), 4);
    assert_eq!(table.line_count(), 4);
}

#[test]
fn test_column_counts_chars() {
    let source = "s = \"héllo\" + x";
    let table = LineOffsetTable::build(source);
    let x_offset = u32::try_from(source.find('x').unwrap_or(0)).unwrap_or(0);
    // 'é' is two bytes but one column
    assert_eq!(table.offset_to_line_col(source, x_offset), (1, 15));
}

#[test]
fn test_line_text() {
    let source = "first\r\nsecond\n";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_text(source, 1), Some("first"));
    assert_eq!(table.line_text(source, 2), Some("second"));
    assert_eq!(table.line_text(source, 3), Some(""));
    assert_eq!(table.line_text(source, 4), None);
    assert_eq!(table.line_text(source, 0), None);
}

#[test]
fn test_span_bounds() {
    let source = "a = 1\nprint(b)";
    let table = LineOffsetTable::build(source);
    assert_eq!(
        table.span_bounds(source, Span::new(12, 13)),
        ((2, 7), (2, 8))
    );
}

#[test]
fn test_offset_past_end_is_clamped() {
    let source = "abc";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.offset_to_line_col(source, 100), (1, 4));
}
