//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language (`Nand2Tetris` Project 6).
//!
//! # Architecture
//! - **Pass 1**: Builds the symbol table by recording label positions
//! - **Pass 2**: Generates machine code, resolving all symbols
//!
//! # Usage
//! ```bash
//! cargo run <input.asm> [output.hack]
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process;

mod code;
mod error;
mod parser;
mod symbol_table;

use error::{AssemblerError, Result};
use parser::{CommandType, ParserLines};
use symbol_table::SymbolTable;

/// Reads assembly file into memory
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(reader.lines().collect::<std::io::Result<Vec<_>>>()?)
}

/// First pass: Build symbol table with label addresses
///
/// Scans through all lines and records the ROM address of each label.
/// Label definitions (L-commands) don't generate code, so they don't
/// increment the ROM address counter.
fn first_pass(lines: &[String], symbol_table: &mut SymbolTable) -> Result<()> {
    let mut rom_address = 0u16;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::LCommand => {
                // Labels mark the next instruction's address
                let symbol = parser.symbol()?;
                symbol_table.define_label(symbol, rom_address)?;
            }
            CommandType::ACommand | CommandType::CCommand => {
                // Actual instructions increment the address
                rom_address += 1;
            }
        }
    }

    Ok(())
}

/// Checks whether `s` is a legal assembly identifier: `[A-Za-z_.$][A-Za-z0-9_.$]*`.
///
/// A-instruction operands that are neither this nor a bare decimal number
/// (e.g. `@-1`, `@3x`) are not valid references at all and must be rejected
/// rather than silently registered as a fresh variable.
fn is_legal_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let is_symbol_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$';
    (first.is_ascii_alphabetic() || first == '_' || first == '.' || first == '$')
        && chars.all(is_symbol_char)
}

/// Second pass: Generate machine code
///
/// Translates each instruction to binary:
/// - A-commands: Resolve symbols to addresses
/// - C-commands: Encode dest, comp, and jump fields
/// - L-commands: Skip (already processed in pass 1)
fn second_pass(
    lines: &[String],
    symbol_table: &mut SymbolTable,
    writer: &mut BufWriter<File>,
) -> Result<()> {
    let mut ram_address = 16u16; // Variables start at RAM[16]
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::ACommand => {
                let symbol = parser.symbol()?;

                // A pure-digit operand is a numeric address; a legal identifier
                // is a symbol to resolve/insert. Anything else is malformed.
                let address = if symbol.bytes().all(|b| b.is_ascii_digit()) && !symbol.is_empty() {
                    symbol.parse::<u32>().map_err(|_| {
                        AssemblerError::Semantic(format!("invalid numeric address '{symbol}'"))
                    })?
                } else if is_legal_symbol(symbol) {
                    u32::from(symbol_table.get_or_insert(symbol, &mut ram_address))
                } else {
                    return Err(AssemblerError::Semantic(format!(
                        "invalid A-instruction operand '{symbol}'"
                    )));
                };

                let instruction = code::encode_a_instruction(address)?;
                writeln!(writer, "{instruction}")?;
            }
            CommandType::CCommand => {
                let dest = parser.dest()?.unwrap_or("");
                let comp = parser.comp()?.unwrap_or("");
                let jump = parser.jump()?.unwrap_or("");

                let instruction = code::encode_c_instruction(dest, comp, jump)?;
                writeln!(writer, "{instruction}")?;
            }
            CommandType::LCommand => {
                unreachable!("L command never reaches pass 2: filtered during parsing")
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Determines the output file path: same stem, `.hack` extension, same directory.
fn output_path(input: &Path) -> std::path::PathBuf {
    input.with_extension("hack")
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <input.asm>");
    eprintln!();
    eprintln!("Translates Hack assembly source into 16-bit Hack binary machine code.");
    eprintln!("Example:");
    eprintln!("  {program} Add.asm");
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("assembler", String::as_str);

    if args.len() == 2 && (args[1] == "-h" || args[1] == "--help") {
        print_usage(program);
        return Err(AssemblerError::Arg("help requested".to_string()));
    }

    if args.len() != 2 {
        print_usage(program);
        return Err(AssemblerError::Arg(format!(
            "expected exactly one input path, got {}",
            args.len().saturating_sub(1)
        )));
    }

    let input_path = Path::new(&args[1]);

    if input_path.extension().and_then(|e| e.to_str()) != Some("asm") {
        return Err(AssemblerError::Arg(format!(
            "input file must have a .asm extension: {}",
            input_path.display()
        )));
    }
    if !input_path.is_file() {
        return Err(AssemblerError::Arg(format!(
            "not a file: {}",
            input_path.display()
        )));
    }

    let lines = read_lines(input_path)?;

    let mut symbol_table = SymbolTable::new();
    first_pass(&lines, &mut symbol_table)?;

    let output = output_path(input_path);
    let output_file = File::create(&output)?;
    let mut writer = BufWriter::new(output_file);
    second_pass(&lines, &mut symbol_table, &mut writer)?;

    println!("Assembly completed. Output written to {}", output.display());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        process::exit(1);
    }
}
