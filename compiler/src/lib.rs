//! Jack compiler for the `Nand2Tetris` course
//!
//! Lowers Jack source (Project 10/11) directly to stack-based VM commands.
//! There is no intermediate parse tree: the recursive-descent parser and
//! the VM code generator are fused into one pass.
//!
//! # Architecture
//!
//! - [`lexer`]: byte-level tokenizer, keyword classification via a
//!   perfect hash map
//! - [`symbol_table`]: two-tier (class / subroutine) symbol bindings
//! - [`engine`]: syntax-directed parsing and VM emission
//! - [`error`]: fatal error taxonomy (`LexError`/`ParseError`/I/O)
//!
//! # Example
//!
//! ```rust
//! use compiler::lexer::Lexer;
//! use compiler::engine::Engine;
//!
//! let source = "class Main { function void main() { return; } }";
//! let tokens = Lexer::tokenize(source).unwrap();
//!
//! let mut output = Vec::new();
//! Engine::compile_class(&tokens, &mut output).unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), "function Main.main 0\npush constant 0\nreturn\n");
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod engine;
pub mod error;
pub mod lexer;
pub mod symbol_table;

pub use engine::Engine;
pub use error::{CompilerError, Result};
pub use lexer::{Keyword, Lexer, Token};
pub use symbol_table::{SymbolKind, SymbolTable};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_compilation_workflow() {
        let source = "class Main { \
            static int count; \
            function void main() { \
                let count = count + 1; \
                return; \
            } \
        }";

        let tokens = Lexer::tokenize(source).unwrap();
        let mut output = Vec::new();
        Engine::compile_class(&tokens, &mut output).unwrap();
        let vm = String::from_utf8(output).unwrap();

        assert!(vm.contains("function Main.main 0"));
        assert!(vm.contains("push static 0"));
        assert!(vm.contains("add"));
        assert!(vm.contains("pop static 0"));
    }
}
