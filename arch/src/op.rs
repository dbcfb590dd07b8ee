use once_cell::sync::Lazy;
use strum::{Display, EnumString};

use crate::addr::AddrMode;

// ----------------------------------------------------------------------------
// Mnemonics

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OpKind {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Jsr,
    Red,
    Prn,
    Rts,
    Stop,
}

impl OpKind {
    /// Mnemonic lookup is case-sensitive: `MOV` is not an instruction.
    pub fn parse(s: &str) -> Option<OpKind> {
        s.parse::<OpKind>().ok()
    }

    pub fn descriptor(self) -> &'static Descriptor {
        // table rows follow the enum order
        &TABLE[self as usize]
    }

    /// An operand position exists iff its addressing bitmask is non-empty.
    pub fn operand_count(self) -> usize {
        let d = self.descriptor();
        usize::from(d.src.takes_operand()) + usize::from(d.dst.takes_operand())
    }
}

// ----------------------------------------------------------------------------
// Descriptor table

/// Which of the four addressing methods an operand position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Methods {
    pub immediate: bool,
    pub direct: bool,
    pub relative: bool,
    pub register_direct: bool,
}

impl Methods {
    pub fn supports(&self, mode: AddrMode) -> bool {
        match mode {
            AddrMode::Immediate => self.immediate,
            AddrMode::Direct => self.direct,
            AddrMode::Relative => self.relative,
            AddrMode::RegisterDirect => self.register_direct,
        }
    }

    pub fn takes_operand(&self) -> bool {
        self.immediate || self.direct || self.relative || self.register_direct
    }
}

#[derive(Debug)]
pub struct Descriptor {
    pub op: OpKind,
    pub opcode: u8,
    pub funct: u8,
    pub src: Methods,
    pub dst: Methods,
}

const fn m(immediate: bool, direct: bool, relative: bool, register_direct: bool) -> Methods {
    Methods {
        immediate,
        direct,
        relative,
        register_direct,
    }
}

const NONE: Methods = m(false, false, false, false);

const fn row(op: OpKind, opcode: u8, funct: u8, src: Methods, dst: Methods) -> Descriptor {
    Descriptor {
        op,
        opcode,
        funct,
        src,
        dst,
    }
}

static TABLE: Lazy<[Descriptor; 16]> = Lazy::new(|| {
    use OpKind::*;
    [
        row(Mov, 0, 0, m(true, true, false, true), m(false, true, false, true)),
        row(Cmp, 1, 0, m(true, true, false, true), m(true, true, false, true)),
        row(Add, 2, 1, m(true, true, false, true), m(false, true, false, true)),
        row(Sub, 2, 2, m(true, true, false, true), m(false, true, false, true)),
        row(Lea, 4, 0, m(false, true, false, false), m(false, true, false, true)),
        row(Clr, 5, 1, NONE, m(false, true, false, true)),
        row(Not, 5, 2, NONE, m(false, true, false, true)),
        row(Inc, 5, 3, NONE, m(false, true, false, true)),
        row(Dec, 5, 4, NONE, m(false, true, false, true)),
        row(Jmp, 9, 1, NONE, m(false, true, true, false)),
        row(Bne, 9, 2, NONE, m(false, true, true, false)),
        row(Jsr, 9, 3, NONE, m(false, true, true, false)),
        row(Red, 12, 0, NONE, m(false, true, false, true)),
        row(Prn, 13, 0, NONE, m(true, true, false, true)),
        row(Rts, 14, 0, NONE, NONE),
        row(Stop, 15, 0, NONE, NONE),
    ]
});
