//! Hessian 2 tag byte constants and range predicates.

// Strings
// COMPACT_STRING: 0x00..=0x1F, codepoint count embedded in the tag.
pub const COMPACT_STRING_MAX: u8 = 0x1F;
pub const MEDIUM_STRING_START: u8 = 0x30;
pub const MEDIUM_STRING_END: u8 = 0x33;
pub const STRING_CHUNK: u8 = 0x52; // 'R'
pub const STRING_CHUNK_FINAL: u8 = 0x53; // 'S'

// Binary
// COMPACT_BINARY: 0x20..=0x2F, byte count = tag - 0x20.
pub const COMPACT_BINARY_START: u8 = 0x20;
pub const COMPACT_BINARY_END: u8 = 0x2F;
pub const MEDIUM_BINARY_START: u8 = 0x34;
pub const MEDIUM_BINARY_END: u8 = 0x37;
pub const BINARY_CHUNK: u8 = 0x41; // 'A'
pub const BINARY_CHUNK_FINAL: u8 = 0x42; // 'B'

// Integers
// INT_1: 0x80..=0xBF, value = tag - 0x90 (-16..=47)
// INT_2: 0xC0..=0xCF, value = ((tag - 0xC8) << 8) | b1 (-2048..=2047)
// INT_3: 0xD0..=0xD7, value = ((tag - 0xD4) << 16) | b1 << 8 | b2 (-262144..=262143)
pub const INT_1_START: u8 = 0x80;
pub const INT_1_END: u8 = 0xBF;
pub const INT_1_BIAS: i32 = 0x90;
pub const INT_2_START: u8 = 0xC0;
pub const INT_2_END: u8 = 0xCF;
pub const INT_2_BIAS: i32 = 0xC8;
pub const INT_3_START: u8 = 0xD0;
pub const INT_3_END: u8 = 0xD7;
pub const INT_3_BIAS: i32 = 0xD4;
pub const INT_32: u8 = 0x49; // 'I'

// Longs
// LONG_1: 0xD8..=0xEF, value = tag - 0xE0 (-8..=15)
// LONG_2: 0xF0..=0xFF, value = ((tag - 0xF8) << 8) | b1 (-2048..=2047)
// LONG_3: 0x38..=0x3F, value = ((tag - 0x3C) << 16) | b1 << 8 | b2 (-262144..=262143)
pub const LONG_1_START: u8 = 0xD8;
pub const LONG_1_END: u8 = 0xEF;
pub const LONG_1_BIAS: i64 = 0xE0;
pub const LONG_2_START: u8 = 0xF0;
pub const LONG_2_BIAS: i64 = 0xF8;
pub const LONG_3_START: u8 = 0x38;
pub const LONG_3_END: u8 = 0x3F;
pub const LONG_3_BIAS: i64 = 0x3C;
pub const LONG_32: u8 = 0x59;
pub const LONG_64: u8 = 0x4C; // 'L'

// Doubles
pub const DOUBLE_ZERO: u8 = 0x5B;
pub const DOUBLE_ONE: u8 = 0x5C;
pub const DOUBLE_I8: u8 = 0x5D;
pub const DOUBLE_I16: u8 = 0x5E;
pub const DOUBLE_F32: u8 = 0x5F;
pub const DOUBLE_64: u8 = 0x44; // 'D'

// Dates
pub const DATE_MILLIS: u8 = 0x4A;
pub const DATE_MINUTES: u8 = 0x4B;

pub const FALSE: u8 = 0x46; // 'F'
pub const TRUE: u8 = 0x54; // 'T'
pub const NULL: u8 = 0x4E; // 'N'
pub const RESERVED: u8 = 0x40;
pub const REF: u8 = 0x51; // 'Q'

// Composites
pub const CLASS_DEF: u8 = 0x43; // 'C'
pub const OBJECT: u8 = 0x4F; // 'O'
// COMPACT_OBJECT: 0x60..=0x6F, class ref = tag - 0x60.
pub const COMPACT_OBJECT_START: u8 = 0x60;
pub const COMPACT_OBJECT_END: u8 = 0x6F;
pub const LIST_VARIABLE_TYPED: u8 = 0x55;
pub const LIST_FIXED_TYPED: u8 = 0x56;
pub const LIST_VARIABLE: u8 = 0x57;
pub const LIST_FIXED: u8 = 0x58;
// COMPACT_LIST: 0x70..=0x77 typed (len = tag - 0x70), 0x78..=0x7F untyped.
pub const COMPACT_LIST_TYPED_START: u8 = 0x70;
pub const COMPACT_LIST_TYPED_END: u8 = 0x77;
pub const COMPACT_LIST_START: u8 = 0x78;
pub const COMPACT_LIST_END: u8 = 0x7F;
pub const MAP_TYPED: u8 = 0x4D; // 'M'
pub const MAP: u8 = 0x48; // 'H'
pub const TERMINATOR: u8 = 0x5A; // 'Z'

#[inline]
pub fn is_string_tag(tag: u8) -> bool {
    tag <= COMPACT_STRING_MAX
        || (MEDIUM_STRING_START..=MEDIUM_STRING_END).contains(&tag)
        || tag == STRING_CHUNK
        || tag == STRING_CHUNK_FINAL
}

#[inline]
pub fn is_binary_tag(tag: u8) -> bool {
    (COMPACT_BINARY_START..=COMPACT_BINARY_END).contains(&tag)
        || (MEDIUM_BINARY_START..=MEDIUM_BINARY_END).contains(&tag)
        || tag == BINARY_CHUNK
        || tag == BINARY_CHUNK_FINAL
}

#[inline]
pub fn is_int_tag(tag: u8) -> bool {
    (INT_1_START..=INT_3_END).contains(&tag) || tag == INT_32
}

#[inline]
pub fn is_long_tag(tag: u8) -> bool {
    tag >= LONG_1_START
        || (LONG_3_START..=LONG_3_END).contains(&tag)
        || tag == LONG_32
        || tag == LONG_64
}

#[inline]
pub fn is_double_tag(tag: u8) -> bool {
    (DOUBLE_ZERO..=DOUBLE_F32).contains(&tag) || tag == DOUBLE_64
}

#[inline]
pub fn is_date_tag(tag: u8) -> bool {
    tag == DATE_MILLIS || tag == DATE_MINUTES
}

#[inline]
pub fn is_list_tag(tag: u8) -> bool {
    (LIST_VARIABLE_TYPED..=LIST_FIXED).contains(&tag)
        || (COMPACT_LIST_TYPED_START..=COMPACT_LIST_END).contains(&tag)
}
