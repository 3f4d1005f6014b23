//! Jack Compiler - Main Entry Point
//!
//! Compiles Jack source into stack-based VM commands (`Nand2Tetris` Project
//! 10/11).
//!
//! # Usage
//! ```bash
//! cargo run <input.jack | directory>
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

mod engine;
mod error;
mod lexer;
mod symbol_table;

use engine::Engine;
use error::{CompilerError, Result};
use lexer::Lexer;

fn compile_file(path: &Path) -> Result<PathBuf> {
    let source = fs::read_to_string(path)?;
    let tokens = Lexer::tokenize(&source)?;

    let output_path = path.with_extension("vm");
    let output_file = fs::File::create(&output_path)?;
    let mut writer = BufWriter::new(output_file);
    Engine::compile_class(&tokens, &mut writer)?;

    Ok(output_path)
}

fn collect_inputs(input_path: &Path) -> Result<Vec<PathBuf>> {
    if input_path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(input_path)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("jack"))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(CompilerError::Arg(format!(
                "no .jack files found in directory: {}",
                input_path.display()
            )));
        }

        Ok(files)
    } else {
        if input_path.extension().and_then(|e| e.to_str()) != Some("jack") {
            return Err(CompilerError::Arg(format!(
                "input file must have a .jack extension: {}",
                input_path.display()
            )));
        }
        if !input_path.is_file() {
            return Err(CompilerError::Arg(format!(
                "not a file: {}",
                input_path.display()
            )));
        }

        Ok(vec![input_path.to_path_buf()])
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <input.jack | directory>");
    eprintln!();
    eprintln!("Compiles Jack source into stack-based VM commands.");
    eprintln!("Example:");
    eprintln!("  {program} Main.jack");
    eprintln!("  {program} ProjectDir/");
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("compiler", String::as_str);

    if args.len() == 2 && (args[1] == "-h" || args[1] == "--help") {
        print_usage(program);
        return Err(CompilerError::Arg("help requested".to_string()));
    }

    if args.len() != 2 {
        print_usage(program);
        return Err(CompilerError::Arg(format!(
            "expected exactly one input path, got {}",
            args.len().saturating_sub(1)
        )));
    }

    let input_path = Path::new(&args[1]);
    let files = collect_inputs(input_path)?;

    for file in &files {
        let output = compile_file(file)?;
        println!("Compiled {} -> {}", file.display(), output.display());
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_inputs_rejects_wrong_extension() {
        let path = std::env::temp_dir().join("compiler_badext.txt");
        fs::write(&path, "").unwrap();
        assert!(collect_inputs(&path).is_err());
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_compile_file_writes_vm_output() {
        let path = std::env::temp_dir().join("compiler_main_test.jack");
        fs::write(&path, "class Main { function void main() { return; } }").unwrap();

        let output = compile_file(&path).unwrap();
        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.contains("function Main.main 0"));

        fs::remove_file(path).ok();
        fs::remove_file(output).ok();
    }
}
