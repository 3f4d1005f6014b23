//! Hack VM Translator for the `Nand2Tetris` course
//!
//! Translates stack-based VM commands (Project 7/8) into Hack assembly,
//! including the full calling-convention and control-flow command set:
//! labels, branches, function declarations, calls, and returns.
//!
//! # Architecture
//!
//! - [`parser`]: line-oriented tokenizer over one VM command per line
//! - [`code_writer`]: emits the Hack assembly template for each command,
//!   carrying per-op label counters and current file/function state on the
//!   instance rather than module-level globals
//! - [`error`]: fatal error taxonomy shared across parsing and emission
//!
//! # Example
//!
//! ```rust
//! use vmtranslator::parser::{CommandType, Parser};
//! use std::io::Write;
//!
//! let mut path = std::env::temp_dir();
//! path.push("vmtranslator_doctest.vm");
//! let mut f = std::fs::File::create(&path).unwrap();
//! write!(f, "push constant 7\nadd\n").unwrap();
//!
//! let mut parser = Parser::new(&path).unwrap();
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::Push);
//! std::fs::remove_file(&path).ok();
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code_writer;
pub mod error;
pub mod parser;

pub use code_writer::CodeWriter;
pub use error::{Result, TranslatorError};
pub use parser::{CommandType, Parser};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_full_translation_workflow_with_control_flow() {
        let mut path = std::env::temp_dir();
        path.push("vmtranslator_lib_workflow.vm");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            "function Foo.bar 1\n\
             push constant 1\n\
             pop local 0\n\
             label LOOP\n\
             push local 0\n\
             if-goto LOOP\n\
             push constant 0\n\
             return\n"
        )
        .unwrap();

        let output = path.with_extension("asm");
        let mut writer = CodeWriter::new(&output).unwrap();
        writer.set_filename("Foo.vm");

        let mut parser = Parser::new(&path).unwrap();
        while parser.has_more_commands() {
            parser.advance();
            match parser.command_type().unwrap() {
                CommandType::Arithmetic => {
                    writer.write_arithmetic(parser.arg1().unwrap()).unwrap();
                }
                CommandType::Push => writer
                    .write_push_pop("push", parser.arg1().unwrap(), parser.arg2().unwrap())
                    .unwrap(),
                CommandType::Pop => writer
                    .write_push_pop("pop", parser.arg1().unwrap(), parser.arg2().unwrap())
                    .unwrap(),
                CommandType::Label => writer.write_label(parser.arg1().unwrap()).unwrap(),
                CommandType::Goto => writer.write_goto(parser.arg1().unwrap()).unwrap(),
                CommandType::If => writer.write_if(parser.arg1().unwrap()).unwrap(),
                CommandType::Function => writer
                    .write_function(parser.arg1().unwrap(), parser.arg2().unwrap())
                    .unwrap(),
                CommandType::Call => writer
                    .write_call(parser.arg1().unwrap(), parser.arg2().unwrap())
                    .unwrap(),
                CommandType::Return => writer.write_return().unwrap(),
            }
        }
        writer.close().unwrap();

        let generated = std::fs::read_to_string(&output).unwrap();
        assert!(generated.contains("(Foo.bar)"));
        assert!(generated.contains("(Foo.bar$LOOP)"));

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(&output).ok();
    }
}
