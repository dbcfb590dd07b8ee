use arch::addr::AddrMode;
use arch::word::{self, Are};

use crate::error::Error;
use crate::externals::ExternalsTable;
use crate::msg::Msgs;
use crate::parser::{self, Guide, Line, Stmt};
use crate::segment::MemorySegment;
use crate::symbols::{Symbol, SymbolKind, SymbolTable};

/// Second walk over the same parsed lines: resolve the operand words that
/// needed symbol addresses, collect external use sites, and flag `.entry`
/// symbols. Runs after the data-base fixup.
pub fn second_pass(
    lines: &[Line],
    code: &mut MemorySegment,
    symbols: &mut SymbolTable,
    externals: &mut ExternalsTable,
) -> Msgs {
    let mut msgs = Msgs::new();
    for line in lines {
        if let Err(err) = process_line(line, code, symbols, externals) {
            msgs.error(line.no(), line.raw(), err);
        }
    }
    msgs
}

fn process_line(
    line: &Line,
    code: &mut MemorySegment,
    symbols: &mut SymbolTable,
    externals: &mut ExternalsTable,
) -> Result<(), Error> {
    let Some(stmt) = &line.stmt else {
        return Ok(());
    };
    match stmt {
        // fully handled on the first pass
        Stmt::Guide(Guide::Data(_) | Guide::Str(_) | Guide::Extern(_)) => Ok(()),
        Stmt::Guide(Guide::Entry(payload)) => mark_entry(payload, symbols),
        // an unknown guide keyword is counted once per pass
        Stmt::Guide(Guide::Invalid) => Err(Error::InvalidGuide),
        Stmt::Inst { operands, .. } => {
            complete_instruction(line.no(), operands, code, symbols, externals)
        }
    }
}

/// `.entry <label>`: one token, whitespace after it only. Resolution never
/// auto-creates, and nothing stops an external symbol from being flagged.
fn mark_entry(payload: &str, symbols: &mut SymbolTable) -> Result<(), Error> {
    let mut tokens = payload.split_whitespace();
    let (Some(name), None) = (tokens.next(), tokens.next()) else {
        return Err(Error::InvalidSyntax);
    };
    if symbols.mark_entry(name) {
        Ok(())
    } else {
        Err(Error::MissingSymbol(name.to_string()))
    }
}

fn complete_instruction(
    line_no: usize,
    operands: &str,
    code: &mut MemorySegment,
    symbols: &SymbolTable,
    externals: &mut ExternalsTable,
) -> Result<(), Error> {
    let base = code.base();
    // lines the first pass failed to encode have no item and were already
    // counted there
    let Some(item) = code.find_by_line_mut(line_no) else {
        return Ok(());
    };
    let inst_addr = base + item.relative_address;

    let Some(fields) = parser::split_operands(operands) else {
        return Ok(());
    };
    let (src, dst) = match fields.len() {
        2 => (Some(fields[0]), Some(fields[1])),
        1 => (None, Some(fields[0])),
        _ => (None, None),
    };

    // next operand word slot, counted from the instruction word
    let mut slot = 1u32;

    if let Some(opnd) = src {
        let mode = AddrMode::sniff(opnd);
        match mode {
            AddrMode::Direct | AddrMode::Relative => {
                let name = opnd.strip_prefix('&').unwrap_or(opnd);
                let Some(symbol) = symbols.resolve(name) else {
                    // an unresolved source skips the destination entirely
                    return Err(Error::MissingSymbol(name.to_string()));
                };
                item.words[slot as usize] = encode_operand(symbol, mode, inst_addr);
                if symbol.kind == SymbolKind::External {
                    externals.push(name, inst_addr + slot);
                }
                slot += 1;
            }
            AddrMode::Immediate => slot += 1,
            AddrMode::RegisterDirect => {}
        }
    }

    if let Some(opnd) = dst {
        let mode = AddrMode::sniff(opnd);
        if matches!(mode, AddrMode::Direct | AddrMode::Relative) {
            let name = opnd.strip_prefix('&').unwrap_or(opnd);
            let Some(symbol) = symbols.resolve(name) else {
                return Err(Error::MissingSymbol(name.to_string()));
            };
            item.words[slot as usize] = encode_operand(symbol, mode, inst_addr);
            if symbol.kind == SymbolKind::External {
                externals.push(name, inst_addr + slot);
            }
        }
    }
    Ok(())
}

fn encode_operand(symbol: &Symbol, mode: AddrMode, inst_addr: u32) -> u32 {
    match mode {
        AddrMode::Direct => {
            let are = match symbol.kind {
                SymbolKind::External => Are::External,
                _ => Are::Relocatable,
            };
            // external symbols keep zero value bits; the flag carries the linkage
            word::data_word(symbol.value as i32, are)
        }
        // the offset is measured from the instruction word, not the operand word
        _ => word::data_word(symbol.value as i32 - inst_addr as i32, Are::Absolute),
    }
}
