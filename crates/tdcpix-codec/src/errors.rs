//! Error types for schema compilation, word encoding and word decoding.

use thiserror::Error;

/// Errors produced when compiling a [crate::field::Field] table into a [crate::schema::Schema].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Word width is 0 or greater than 64 bits.
    #[error("invalid word width: {0} bits")]
    InvalidWordWidth(u32),
    /// Field has zero width.
    #[error("field `{0}` has zero width")]
    InvalidFieldSize(&'static str),
    /// Field extends past the most significant bit of the word.
    #[error("field `{field}` ends at bit {end}, beyond the {width}-bit word")]
    FieldOutOfWord {
        field: &'static str,
        end: u32,
        width: u32,
    },
    /// Two fields claim the same bit.
    #[error("fields `{first}` and `{second}` overlap")]
    OverlappingFields {
        first: &'static str,
        second: &'static str,
    },
    /// Field name is invalid (empty or duplicate).
    #[error("invalid field name `{0}`")]
    InvalidFieldName(&'static str),
    /// A constant or maximum does not fit in the field's width.
    #[error("rule of field `{0}` does not fit its width")]
    InvalidFieldRule(&'static str),
}

/// Errors produced when packing field values into a word.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Value is larger than the field allows.
    #[error("field `{field}` value {value} exceeds maximum {max}")]
    FieldOutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
    /// A fixed field was given a value other than its constant.
    #[error("field `{field}` must be {expected:#x}, got {actual:#x}")]
    ConstantMismatch {
        field: &'static str,
        expected: u64,
        actual: u64,
    },
    /// A one-hot (or zero-or-one-hot) field has the wrong number of bits set.
    #[error("field `{field}` value {value:#b} is not one-hot")]
    NotOneHot { field: &'static str, value: u64 },
    /// A non-constant field was not supplied.
    #[error("missing value for field `{0}`")]
    MissingField(&'static str),
    /// A value supplied for a field name that is not in the schema.
    #[error("unknown field `{0}`")]
    UnknownField(String),
    /// A bit position selecting a one-hot bit is outside the field.
    #[error("field `{field}` has no bit {bit}")]
    InvalidBitPosition { field: &'static str, bit: u8 },
    /// Value does not fit in 48 bits.
    #[error("value {0:#x} does not fit in 48 bits")]
    ValueTooWide(u64),
}

/// Errors produced when reading a word back from text or from its raw value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Token contains characters other than hex digits.
    #[error("invalid hex token `{0}`")]
    InvalidToken(String),
    /// Token is not exactly 12 characters long.
    #[error("token `{token}` has {len} characters, expected 12")]
    InvalidLength { token: String, len: usize },
    /// Raw value has bits set above bit 47.
    #[error("value {0:#x} does not fit in 48 bits")]
    ValueTooWide(u64),
    /// A fixed field does not hold its constant.
    #[error("field `{field}` must be {expected:#x}, got {actual:#x}")]
    ConstantMismatch {
        field: &'static str,
        expected: u64,
        actual: u64,
    },
    /// A one-hot (or zero-or-one-hot) field has the wrong number of bits set.
    #[error("field `{field}` value {value:#b} is not one-hot")]
    NotOneHot { field: &'static str, value: u64 },
    /// Field holds a value above its allowed maximum.
    #[error("field `{field}` value {value} exceeds maximum {max}")]
    FieldOutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
    /// Chunk line has no tokens.
    #[error("empty chunk line")]
    EmptyLine,
    /// Last token of a chunk line is not a frame word.
    #[error("chunk line does not end with a frame word")]
    MissingFrameWord,
    /// A frame word appears before the end of a chunk line.
    #[error("frame word at position {0} before the end of the chunk")]
    UnexpectedFrameWord(usize),
}

/// Errors produced while streaming generated chunks into a sink.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced while reading a chunk file.
#[derive(Debug, Error)]
pub enum ReadChunksError {
    #[error("line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by [crate::config::GeneratorConfig::validate].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` must be positive")]
    NotPositive(&'static str),
}
