//! Hack VM Translator - Main Entry Point
//!
//! Translates Hack VM commands into Hack assembly (`Nand2Tetris` Project 7/8).
//!
//! # Usage
//! ```bash
//! cargo run <input.vm | directory>
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::path::{Path, PathBuf};
use std::process;

mod code_writer;
mod error;
mod parser;

use code_writer::CodeWriter;
use error::{Result, TranslatorError};
use parser::{CommandType, Parser};

/// Translates a single `.vm` file's commands into the already-open writer.
fn translate_file(path: &Path, writer: &mut CodeWriter) -> Result<()> {
    writer.set_filename(
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown"),
    );

    let mut parser = Parser::new(path)?;

    while parser.has_more_commands() {
        parser.advance();

        match parser.command_type()? {
            CommandType::Arithmetic => writer.write_arithmetic(parser.arg1()?)?,
            CommandType::Push => writer.write_push_pop("push", parser.arg1()?, parser.arg2()?)?,
            CommandType::Pop => writer.write_push_pop("pop", parser.arg1()?, parser.arg2()?)?,
            CommandType::Label => writer.write_label(parser.arg1()?)?,
            CommandType::Goto => writer.write_goto(parser.arg1()?)?,
            CommandType::If => writer.write_if(parser.arg1()?)?,
            CommandType::Function => writer.write_function(parser.arg1()?, parser.arg2()?)?,
            CommandType::Call => writer.write_call(parser.arg1()?, parser.arg2()?)?,
            CommandType::Return => writer.write_return()?,
        }
    }

    Ok(())
}

/// Collects the `.vm` files to translate and the output path, for both
/// single-file and directory modes.
fn collect_inputs(input_path: &Path) -> Result<(Vec<PathBuf>, PathBuf, bool)> {
    if input_path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(input_path)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("vm"))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(TranslatorError::Arg(format!(
                "no .vm files found in directory: {}",
                input_path.display()
            )));
        }

        let dir_name = input_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                TranslatorError::Arg(format!("cannot name directory: {}", input_path.display()))
            })?;
        let output = input_path.join(format!("{dir_name}.asm"));

        Ok((files, output, true))
    } else {
        if input_path.extension().and_then(|e| e.to_str()) != Some("vm") {
            return Err(TranslatorError::Arg(format!(
                "input file must have a .vm extension: {}",
                input_path.display()
            )));
        }
        if !input_path.is_file() {
            return Err(TranslatorError::Arg(format!(
                "not a file: {}",
                input_path.display()
            )));
        }

        let output = input_path.with_extension("asm");
        Ok((vec![input_path.to_path_buf()], output, false))
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <input.vm | directory>");
    eprintln!();
    eprintln!("Translates Hack VM commands into Hack assembly.");
    eprintln!("Example:");
    eprintln!("  {program} Foo.vm");
    eprintln!("  {program} FooDir/");
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("vmtranslator", String::as_str);

    if args.len() == 2 && (args[1] == "-h" || args[1] == "--help") {
        print_usage(program);
        return Err(TranslatorError::Arg("help requested".to_string()));
    }

    if args.len() != 2 {
        print_usage(program);
        return Err(TranslatorError::Arg(format!(
            "expected exactly one input path, got {}",
            args.len().saturating_sub(1)
        )));
    }

    let input_path = Path::new(&args[1]);
    let (files, output, is_directory) = collect_inputs(input_path)?;

    let mut writer = CodeWriter::new(&output)?;

    if is_directory {
        writer.write_init()?;
    }

    for file in &files {
        translate_file(file, &mut writer)?;
    }

    writer.close()?;

    println!("Translation complete: {} -> {}", input_path.display(), output.display());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        process::exit(1);
    }
}
