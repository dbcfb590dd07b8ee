use crate::externals::ExternalsTable;
use crate::first_pass::first_pass;
use crate::msg::Msgs;
use crate::parser::Line;
use crate::second_pass::second_pass;
use crate::segment::MemorySegment;
use crate::symbols::SymbolTable;

/// The code segment starts at address 100 by ISA convention.
pub const CODE_BASE: u32 = 100;

/// Everything one assembly run produces. Output emission is the caller's
/// job; nothing here touches the filesystem.
#[derive(Debug)]
pub struct Assembly {
    pub code: MemorySegment,
    pub data: MemorySegment,
    pub symbols: SymbolTable,
    pub externals: ExternalsTable,
    pub first: Msgs,
    pub second: Msgs,
}

impl Assembly {
    pub fn error_count(&self) -> usize {
        self.first.count() + self.second.count()
    }

    /// Artifacts may be emitted only when this holds.
    pub fn ok(&self) -> bool {
        self.error_count() == 0
    }
}

/// Run the whole pipeline over already-read source text. The source is
/// classified once into line records; both passes walk the same records.
pub fn assemble(src: &str) -> Assembly {
    let lines: Vec<Line> = src
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line::parse(idx + 1, raw))
        .collect();

    let mut code = MemorySegment::new(CODE_BASE);
    let mut data = MemorySegment::new(0);
    let mut symbols = SymbolTable::new();
    let mut externals = ExternalsTable::new();

    let first = first_pass(&lines, &mut code, &mut data, &mut symbols);

    // one-shot fixup: the data segment starts where the code segment ends,
    // and data symbols move from segment-relative to absolute
    let data_base = CODE_BASE + code.size();
    data.set_base(data_base);
    symbols.offset_data(data_base);

    let second = second_pass(&lines, &mut code, &mut symbols, &mut externals);

    Assembly {
        code,
        data,
        symbols,
        externals,
        first,
        second,
    }
}
