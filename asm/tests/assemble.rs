use sm24asm::{
    assemble, render_entries, render_externals, render_object, Error, SymbolKind,
};

#[test]
fn immediate_instruction_needs_no_second_pass_work() {
    let assembly = assemble("MAIN: mov #5, r2\n");
    assert!(assembly.ok());
    assert_eq!(assembly.code.size(), 2);

    let main = assembly.symbols.resolve("MAIN").unwrap();
    assert_eq!(main.value, 100);
    assert_eq!(main.kind, SymbolKind::Code);

    let words: Vec<(u32, u32)> = assembly.code.words().collect();
    assert_eq!(words[0].0, 100);
    // the immediate word is already absolute after pass one
    assert_eq!(words[1], (101, 5 << 3 | 0b100));
}

#[test]
fn extern_use_site_is_recorded_once() {
    let assembly = assemble(".extern EXT\njmp EXT\n");
    assert!(assembly.ok());

    let refs: Vec<_> = assembly.externals.iter().collect();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].name, "EXT");
    assert_eq!(refs[0].address, 101);

    // the operand word carries only the E flag
    let words: Vec<(u32, u32)> = assembly.code.words().collect();
    assert_eq!(words[1], (101, 0b001));
}

#[test]
fn undefined_entry_is_the_only_error() {
    let assembly = assemble("stop\n.entry NOPE\n");
    assert_eq!(assembly.error_count(), 1);
    assert!(!assembly.ok());
    assert!(matches!(
        assembly.second.iter().next().unwrap().err,
        Error::MissingSymbol(_)
    ));
}

#[test]
fn duplicate_label_keeps_the_first_value() {
    let assembly = assemble("A: stop\nA: stop\n");
    assert_eq!(assembly.error_count(), 1);
    assert_eq!(assembly.symbols.resolve("A").unwrap().value, 100);
}

#[test]
fn data_base_follows_the_code_segment() {
    let src = "mov #1, r1\nstop\nLIST: .data 7, 8\nSTR: .string \"hi\"\n";
    let assembly = assemble(src);
    assert!(assembly.ok());
    assert_eq!(assembly.code.size(), 3);
    assert_eq!(assembly.data.size(), 5);
    assert_eq!(assembly.data.base(), 103);
    assert_eq!(assembly.symbols.resolve("LIST").unwrap().value, 103);
    assert_eq!(assembly.symbols.resolve("STR").unwrap().value, 105);

    let header = render_object(&assembly.code, &assembly.data);
    assert!(header.starts_with("3 5\n"));
}

#[test]
fn artifacts_are_deterministic() {
    let src = "\
MAIN: mov #5, r2
      lea LIST, r3
      jsr &SUB
      jmp EXT
SUB:  inc r3
      rts
      stop
LIST: .data 6, -9, 15
STR:  .string \"abcdef\"
      .extern EXT
      .entry MAIN
      .entry LIST
";
    let a = assemble(src);
    let b = assemble(src);
    assert!(a.ok(), "first: {:?}", a.first);
    assert_eq!(
        render_object(&a.code, &a.data),
        render_object(&b.code, &b.data)
    );
    assert_eq!(render_entries(&a.symbols), render_entries(&b.symbols));
    assert_eq!(render_externals(&a.externals), render_externals(&b.externals));
}

#[test]
fn garbage_leading_token_is_not_a_label() {
    // the malformed token falls through into the mnemonic lookup
    let assembly = assemble("1BAD: mov #1, r1\n");
    assert_eq!(assembly.error_count(), 1);
    assert!(matches!(
        assembly.first.iter().next().unwrap().err,
        Error::InstructionNotFound(ref name) if name == "1BAD:"
    ));
}

#[test]
fn entry_on_external_symbol_is_accepted_silently() {
    let assembly = assemble(".extern E\n.entry E\nstop\n");
    assert!(assembly.ok());
    let e = assembly.symbols.resolve("E").unwrap();
    assert_eq!(e.kind, SymbolKind::External);
    assert!(e.is_entry);
    assert_eq!(render_entries(&assembly.symbols), "E 0000000\n");
}

#[test]
fn every_line_is_attempted_despite_errors() {
    let src = "foo\nbar\nstop\n.entry NOPE\n";
    let assembly = assemble(src);
    // two unknown instructions in pass one, one missing symbol in pass two
    assert_eq!(assembly.first.count(), 2);
    assert_eq!(assembly.second.count(), 1);
    // the good line still produced code
    assert_eq!(assembly.code.size(), 1);
}

#[test]
fn mixed_program_end_to_end() {
    let src = "\
; copies between registers and memory
MAIN: mov r3, LENGTH
LOOP: jmp L1
      prn #-5
      bne &LOOP
      sub r1, r4
      bne L1
L1:   inc K
      jmp &MAIN
END:  stop
STR:  .string \"abcd\"
LENGTH: .data 6, -9, 15
K:    .data 22
      .entry MAIN
      .entry LENGTH
";
    let assembly = assemble(src);
    assert!(assembly.ok(), "{:?} {:?}", assembly.first, assembly.second);

    // mov 2 + jmp 2 + prn 2 + bne 2 + sub 1 + bne 2 + inc 2 + jmp 2 + stop 1
    assert_eq!(assembly.code.size(), 16);
    assert_eq!(assembly.data.size(), 9);
    assert_eq!(assembly.data.base(), 116);

    assert_eq!(assembly.symbols.resolve("MAIN").unwrap().value, 100);
    assert_eq!(assembly.symbols.resolve("END").unwrap().value, 115);
    assert_eq!(assembly.symbols.resolve("STR").unwrap().value, 116);
    assert_eq!(assembly.symbols.resolve("LENGTH").unwrap().value, 121);
    assert_eq!(assembly.symbols.resolve("K").unwrap().value, 124);

    let ent = render_entries(&assembly.symbols);
    assert_eq!(ent, "MAIN 0000100\nLENGTH 0000121\n");
    assert!(assembly.externals.is_empty());
}
