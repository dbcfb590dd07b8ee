mod assemble;
mod error;
mod externals;
mod first_pass;
mod msg;
mod output;
mod parser;
mod second_pass;
mod segment;
mod symbols;

pub use assemble::{assemble, Assembly, CODE_BASE};
pub use error::Error;
pub use externals::{ExternalRef, ExternalsTable};
pub use first_pass::first_pass;
pub use msg::{Msg, Msgs};
pub use output::{render_entries, render_externals, render_object, write_artifacts};
pub use parser::{Guide, Line, Stmt};
pub use second_pass::second_pass;
pub use segment::{MemoryItem, MemorySegment};
pub use symbols::{Symbol, SymbolKind, SymbolTable, MAX_LABEL_LEN};
