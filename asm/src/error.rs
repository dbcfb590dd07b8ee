use std::io;

use thiserror::Error;

/// Everything a source line or an output file can fail with. Per-line
/// errors are counted, never fatal; the passes keep going.
#[derive(Debug, Error)]
pub enum Error {
    #[error("illegal character `{0}`")]
    IllegalChar(char),

    #[error("invalid syntax")]
    InvalidSyntax,

    #[error("instruction not found: `{0}`")]
    InstructionNotFound(String),

    #[error("invalid addressing method: `{0}`")]
    InvalidAddrMethod(String),

    #[error("invalid number of operands")]
    InvalidOperandCount,

    #[error("symbol already exists: `{0}`")]
    SymbolAlreadyExists(String),

    #[error("leftover text after value: `{0}`")]
    Leftover(String),

    #[error("missing symbol: `{0}`")]
    MissingSymbol(String),

    #[error("empty value")]
    EmptyValue,

    #[error("invalid value: `{0}`")]
    InvalidValue(String),

    #[error("missing value")]
    MissingValue,

    #[error("invalid guide statement")]
    InvalidGuide,

    #[error("invalid register name: `{0}`")]
    InvalidRegName(String),

    #[error("integer value out of range: `{0}`")]
    ValueOutOfRange(String),

    #[error("label too long: `{0}`")]
    LabelTooLong(String),

    #[error("invalid label: `{0}`")]
    InvalidLabel(String),

    #[error("number too big for 21-bit integer")]
    Int21Overflow,

    #[error("number too big for 24-bit integer")]
    Int24Overflow,

    #[error("could not open file: {0}")]
    FileOpen(String, #[source] io::Error),

    #[error("failed to write file: {0}")]
    FileWrite(String, #[source] io::Error),
}
