use arch::addr::AddrMode;
use arch::op::OpKind;
use arch::reg::Reg;
use arch::word::{self, Are, InstWord};

use crate::error::Error;
use crate::msg::Msgs;
use crate::parser::{self, Guide, Line, Stmt};
use crate::segment::MemorySegment;
use crate::symbols::{SymbolKind, SymbolTable};

/// First walk over the parsed lines: encode everything that needs no
/// symbol address, reserve a zeroed slot for everything that does, and
/// register label definitions. Data symbols hold segment-relative values
/// until the post-pass fixup.
pub fn first_pass(
    lines: &[Line],
    code: &mut MemorySegment,
    data: &mut MemorySegment,
    symbols: &mut SymbolTable,
) -> Msgs {
    let mut msgs = Msgs::new();
    for line in lines {
        if let Err(err) = process_line(line, code, data, symbols) {
            msgs.error(line.no(), line.raw(), err);
        }
    }
    msgs
}

fn process_line(
    line: &Line,
    code: &mut MemorySegment,
    data: &mut MemorySegment,
    symbols: &mut SymbolTable,
) -> Result<(), Error> {
    let Some(stmt) = &line.stmt else {
        return Ok(());
    };

    let mut res = Ok(());
    let mut label_address = 0;
    let mut kind = SymbolKind::Data;

    match stmt {
        Stmt::Guide(guide) => match encode_guide(guide, symbols) {
            Ok(Some(words)) => label_address = data.push(words, line.no()),
            Ok(None) => {}
            Err(err) => res = Err(err),
        },
        Stmt::Inst { name, operands } => match encode_instruction(name, operands) {
            Ok(words) => {
                label_address = code.push(words, line.no());
                kind = SymbolKind::Code;
            }
            Err(err) => res = Err(err),
        },
    }

    // the label is registered even when the line itself failed, so later
    // re-declarations are still caught; a label error wins over a line error
    if let Some(label) = &line.label {
        if let Err(err) = symbols.insert(label, label_address, kind) {
            res = Err(err);
        }
    }
    res
}

// ----------------------------------------------------------------------------
// Guide lines

fn encode_guide(guide: &Guide, symbols: &mut SymbolTable) -> Result<Option<Vec<u32>>, Error> {
    match guide {
        Guide::Data(payload) => encode_data_items(payload).map(Some),
        Guide::Str(payload) => encode_string(payload).map(Some),
        Guide::Entry(_) => Ok(None), // handled on the second pass
        Guide::Extern(payload) => {
            register_extern(payload, symbols)?;
            Ok(None)
        }
        Guide::Invalid => Err(Error::InvalidGuide),
    }
}

fn encode_data_items(payload: &str) -> Result<Vec<u32>, Error> {
    let mut words = Vec::new();
    for item in payload.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(Error::EmptyValue);
        }
        words.push(word::plain_word(parser::parse_int24(item)?));
    }
    Ok(words)
}

/// Content sits strictly between the first two quote characters; nothing
/// but whitespace may follow the closing quote. One word per character
/// plus a terminating zero word.
fn encode_string(payload: &str) -> Result<Vec<u32>, Error> {
    let Some(start) = payload.find('"') else {
        return Err(Error::InvalidSyntax);
    };
    let inner = &payload[start + 1..];
    let Some(len) = inner.find('"') else {
        return Err(Error::InvalidSyntax);
    };
    if !inner[len + 1..].trim().is_empty() {
        return Err(Error::InvalidSyntax);
    }

    let mut words = Vec::with_capacity(len + 1);
    for c in inner[..len].chars() {
        if !c.is_ascii() {
            return Err(Error::IllegalChar(c));
        }
        words.push(c as u32);
    }
    words.push(0);
    Ok(words)
}

fn register_extern(payload: &str, symbols: &mut SymbolTable) -> Result<(), Error> {
    let mut tokens = payload.split_whitespace();
    let (Some(name), None) = (tokens.next(), tokens.next()) else {
        return Err(Error::InvalidSyntax);
    };
    // externals carry value 0 until link time
    symbols.insert(name, 0, SymbolKind::External)
}

// ----------------------------------------------------------------------------
// Instruction lines

fn encode_instruction(name: &str, operands: &str) -> Result<Vec<u32>, Error> {
    let op = OpKind::parse(name).ok_or_else(|| Error::InstructionNotFound(name.to_string()))?;
    let desc = op.descriptor();

    let fields = parser::split_operands(operands).ok_or(Error::InvalidOperandCount)?;
    if fields.len() != op.operand_count() {
        return Err(Error::InvalidOperandCount);
    }
    let (src, dst) = match fields.len() {
        2 => (Some(fields[0]), Some(fields[1])),
        1 => (None, Some(fields[0])),
        _ => (None, None),
    };

    let mut inst = InstWord {
        opcode: desc.opcode,
        funct: desc.funct,
        ..Default::default()
    };
    let mut words = vec![0u32];

    if let Some(opnd) = src {
        let mode = AddrMode::sniff(opnd);
        if !desc.src.supports(mode) {
            return Err(Error::InvalidAddrMethod(opnd.to_string()));
        }
        inst.src_mode = mode.into();
        match mode {
            AddrMode::RegisterDirect => {
                let reg =
                    Reg::parse(opnd).ok_or_else(|| Error::InvalidRegName(opnd.to_string()))?;
                inst.src_reg = reg.into();
            }
            AddrMode::Immediate => words.push(immediate_word(opnd)?),
            // resolved on the second pass
            AddrMode::Direct | AddrMode::Relative => words.push(0),
        }
    }

    if let Some(opnd) = dst {
        let mode = AddrMode::sniff(opnd);
        if !desc.dst.supports(mode) {
            return Err(Error::InvalidAddrMethod(opnd.to_string()));
        }
        inst.dst_mode = mode.into();
        match mode {
            AddrMode::RegisterDirect => {
                let reg =
                    Reg::parse(opnd).ok_or_else(|| Error::InvalidRegName(opnd.to_string()))?;
                inst.dst_reg = reg.into();
            }
            AddrMode::Immediate => words.push(immediate_word(opnd)?),
            AddrMode::Direct | AddrMode::Relative => words.push(0),
        }
    }

    words[0] = inst.encode();
    Ok(words)
}

/// Immediate operands are fully resolved here. Any parse failure surfaces
/// as a single out-of-range kind, like every other malformed immediate.
fn immediate_word(opnd: &str) -> Result<u32, Error> {
    let text = opnd.strip_prefix('#').unwrap_or(opnd);
    let value =
        parser::parse_int21(text).map_err(|_| Error::ValueOutOfRange(opnd.to_string()))?;
    Ok(word::data_word(value, Are::Absolute))
}
