use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    Display,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    /// Exact match only: `r8` or `R0` is not a register name.
    pub fn parse(s: &str) -> Option<Reg> {
        s.parse::<Reg>().ok()
    }
}
