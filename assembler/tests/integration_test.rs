//! End-to-end translation tests driven by real `.asm` fixtures under
//! `tests/fixtures/`, each compared against its hand-verified `.hack`
//! counterpart.

use assembler::{code, CommandType, ParserLines, SymbolTable};
use std::fs;
use std::path::Path;

fn assemble(source: &str) -> Vec<String> {
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    let mut symbol_table = SymbolTable::new();

    let mut rom_address = 0u16;
    let mut first = ParserLines::from_lines(&lines);
    while first.advance() {
        if first.command_type().unwrap() == CommandType::LCommand {
            let symbol = first.symbol().unwrap();
            symbol_table.define_label(symbol, rom_address).unwrap();
        } else {
            rom_address += 1;
        }
    }

    let mut ram_address = 16u16;
    let mut output = Vec::new();
    let mut second = ParserLines::from_lines(&lines);
    while second.advance() {
        match second.command_type().unwrap() {
            CommandType::ACommand => {
                let symbol = second.symbol().unwrap();
                let address = if let Ok(n) = symbol.parse::<u32>() {
                    n
                } else {
                    u32::from(symbol_table.get_or_insert(symbol, &mut ram_address))
                };
                output.push(code::encode_a_instruction(address).unwrap());
            }
            CommandType::CCommand => {
                let dest = second.dest().unwrap().unwrap_or("");
                let comp = second.comp().unwrap().unwrap_or("");
                let jump = second.jump().unwrap().unwrap_or("");
                output.push(code::encode_c_instruction(dest, comp, jump).unwrap());
            }
            CommandType::LCommand => {}
        }
    }
    output
}

fn run_fixture(name: &str) {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let source = fs::read_to_string(fixtures.join(format!("{name}.asm")))
        .unwrap_or_else(|_| panic!("missing fixture {name}.asm"));
    let expected = fs::read_to_string(fixtures.join(format!("{name}.hack")))
        .unwrap_or_else(|_| panic!("missing fixture {name}.hack"));

    let generated = assemble(&source).join("\n") + "\n";
    assert_eq!(generated, expected, "mismatch assembling {name}.asm");

    for line in generated.lines() {
        assert_eq!(line.len(), 16, "instruction not 16 bits: {line}");
        assert!(
            line.chars().all(|c| c == '0' || c == '1'),
            "non-binary character in instruction: {line}"
        );
    }
}

#[test]
fn test_add_fixture() {
    run_fixture("Add");
}

#[test]
fn test_loop_fixture_with_label_and_variable() {
    run_fixture("Loop");
}
