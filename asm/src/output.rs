use std::fmt::Write;

use arch::word::WORD_MASK;

use crate::assemble::Assembly;
use crate::error::Error;
use crate::externals::ExternalsTable;
use crate::segment::MemorySegment;
use crate::symbols::SymbolTable;

/// `.ob` text: the two segment sizes, then every word as
/// `address value` (7-digit decimal, 6-digit lowercase hex), code before
/// data, ascending addresses.
pub fn render_object(code: &MemorySegment, data: &MemorySegment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", code.size(), data.size());
    for (addr, word) in code.words().chain(data.words()) {
        let _ = writeln!(out, "{:07} {:06x}", addr, word & WORD_MASK);
    }
    out
}

/// `.ent` text: one line per entry-flagged symbol, in declaration order.
pub fn render_entries(symbols: &SymbolTable) -> String {
    let mut out = String::new();
    for (name, symbol) in symbols.iter() {
        if symbol.is_entry {
            let _ = writeln!(out, "{} {:07}", name, symbol.value);
        }
    }
    out
}

/// `.ext` text: one line per external use site, duplicates included.
pub fn render_externals(externals: &ExternalsTable) -> String {
    let mut out = String::new();
    for reference in externals.iter() {
        let _ = writeln!(out, "{} {:07}", reference.name, reference.address);
    }
    out
}

/// Writes `<stem>.ob` always, `<stem>.ent` when any entry symbol exists,
/// `<stem>.ext` when any external reference exists. Call only on an
/// error-free assembly.
pub fn write_artifacts(stem: &str, assembly: &Assembly) -> Result<(), Error> {
    write_file(
        &format!("{stem}.ob"),
        &render_object(&assembly.code, &assembly.data),
    )?;
    if assembly.symbols.iter().any(|(_, s)| s.is_entry) {
        write_file(&format!("{stem}.ent"), &render_entries(&assembly.symbols))?;
    }
    if !assembly.externals.is_empty() {
        write_file(&format!("{stem}.ext"), &render_externals(&assembly.externals))?;
    }
    Ok(())
}

fn write_file(path: &str, content: &str) -> Result<(), Error> {
    std::fs::write(path, content).map_err(|e| Error::FileWrite(path.to_string(), e))
}
