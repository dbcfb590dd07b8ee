use clap::Parser;
use color_print::cprintln;

use sm24asm::{assemble, write_artifacts, Assembly, Error, SymbolKind};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files, named without the `.as` extension
    input: Vec<String>,

    /// Dump the final segments and symbol table
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    let args = Args::parse();

    let mut failed = 0;
    for path in &args.input {
        if !assemble_file(path, args.dump) {
            failed += 1;
        }
    }
    if failed > 0 {
        std::process::exit(1);
    }
}

/// One full assembly run for one input file. A failure here never affects
/// the next file.
fn assemble_file(stem: &str, dump: bool) -> bool {
    let source_path = format!("{stem}.as");
    cprintln!("<green,bold>>></> assembling <underline>{}</>", source_path);

    let src = match std::fs::read_to_string(&source_path) {
        Ok(src) => src,
        Err(e) => {
            cprintln!("<red,bold>error</>: {}", Error::FileOpen(source_path, e));
            return false;
        }
    };

    let assembly = assemble(&src);
    assembly.first.dump(&source_path);
    assembly.second.dump(&source_path);

    if dump {
        print_dump(&assembly);
    }

    let errors = assembly.error_count();
    if errors > 0 {
        cprintln!(
            "<red,bold>>></> {} error{} found, no output written for `{}`",
            errors,
            if errors == 1 { "" } else { "s" },
            stem
        );
        return false;
    }

    match write_artifacts(stem, &assembly) {
        Ok(()) => {
            cprintln!("<green,bold>>></> wrote <underline>{}.ob</>", stem);
            true
        }
        Err(err) => {
            cprintln!("<red,bold>error</>: {}", err);
            false
        }
    }
}

fn print_dump(assembly: &Assembly) {
    cprintln!("<blue,bold>code segment</> ({} words)", assembly.code.size());
    for (addr, word) in assembly.code.words() {
        println!("  {:07} {:06x}", addr, word);
    }
    cprintln!("<blue,bold>data segment</> ({} words)", assembly.data.size());
    for (addr, word) in assembly.data.words() {
        println!("  {:07} {:06x}", addr, word);
    }
    cprintln!("<blue,bold>symbols</> ({})", assembly.symbols.len());
    for (name, symbol) in assembly.symbols.iter() {
        let kind = match symbol.kind {
            SymbolKind::Code => "code",
            SymbolKind::Data => "data",
            SymbolKind::External => "external",
        };
        println!(
            "  {:<31} {:07} {}{}",
            name,
            symbol.value,
            kind,
            if symbol.is_entry { " entry" } else { "" }
        );
    }
}
