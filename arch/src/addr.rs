use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

use crate::reg::Reg;

/// Addressing method codes as they appear in the 2-bit instruction-word
/// fields.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Display,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum AddrMode {
    Immediate = 0,
    Direct = 1,
    Relative = 2,
    RegisterDirect = 3,
}

impl AddrMode {
    /// Classify an operand by its leading character. A leading `r` that is
    /// not a valid register name (`r8`, `rx`) falls through to direct
    /// addressing like any other symbol.
    pub fn sniff(operand: &str) -> AddrMode {
        let s = operand.trim();
        match s.chars().next() {
            Some('#') => AddrMode::Immediate,
            Some('&') => AddrMode::Relative,
            Some('r') if Reg::parse(s).is_some() => AddrMode::RegisterDirect,
            _ => AddrMode::Direct,
        }
    }
}
