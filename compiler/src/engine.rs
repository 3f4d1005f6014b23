//! Recursive-descent Jack parser fused with VM code generation.
//!
//! There is no intermediate AST: VM text is written the moment a grammar
//! construct is recognized. A method call's argument count, for instance,
//! flows back from `compile_expression_list` as a plain return value rather
//! than through any tree node.

use std::io::Write;

use crate::error::{CompilerError, Result};
use crate::lexer::{Keyword, Token};
use crate::symbol_table::{self, SymbolKind, SymbolTable};

#[derive(Clone, Copy, PartialEq, Eq)]
enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

pub struct Engine<'a, W: Write> {
    tokens: &'a [Token],
    pos: usize,
    class_table: SymbolTable,
    subroutine_table: SymbolTable,
    class_name: String,
    label_counter: u32,
    writer: W,
}

impl<'a, W: Write> Engine<'a, W> {
    pub fn compile_class(tokens: &'a [Token], writer: W) -> Result<()> {
        let mut engine = Engine {
            tokens,
            pos: 0,
            class_table: SymbolTable::new(),
            subroutine_table: SymbolTable::new(),
            class_name: String::new(),
            label_counter: 0,
            writer,
        };
        engine.run_class()
    }

    // --- token-stream primitives -----------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Result<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| CompilerError::Parse("unexpected end of input".to_string()))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect_symbol(&mut self, expected: char) -> Result<()> {
        match self.bump()? {
            Token::Symbol(c) if c == expected => Ok(()),
            other => Err(CompilerError::Parse(format!(
                "expected symbol '{expected}', found '{}'",
                other.describe()
            ))),
        }
    }

    fn expect_keyword(&mut self, expected: Keyword) -> Result<()> {
        match self.bump()? {
            Token::Keyword(k) if k == expected => Ok(()),
            other => Err(CompilerError::Parse(format!(
                "expected keyword '{}', found '{}'",
                expected.as_str(),
                other.describe()
            ))),
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.bump()? {
            Token::Identifier(name) => Ok(name),
            other => Err(CompilerError::Parse(format!(
                "expected identifier, found '{}'",
                other.describe()
            ))),
        }
    }

    fn peek_is_symbol(&self, c: char) -> bool {
        matches!(self.peek(), Some(Token::Symbol(s)) if *s == c)
    }

    fn peek_is_keyword(&self, k: Keyword) -> bool {
        matches!(self.peek(), Some(Token::Keyword(kw)) if *kw == k)
    }

    fn next_label(&mut self, prefix: &str) -> String {
        let label = format!("{prefix}{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    // --- emission helpers ---------------------------------------------

    fn emit(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn push_variable(&mut self, name: &str) -> Result<()> {
        let (kind, _, index) = symbol_table::resolve(&self.subroutine_table, &self.class_table, name)
            .ok_or_else(|| CompilerError::Parse(format!("undeclared identifier '{name}'")))?;
        self.emit(&format!("push {} {index}", kind.segment()))
    }

    fn pop_variable(&mut self, name: &str) -> Result<()> {
        let (kind, _, index) = symbol_table::resolve(&self.subroutine_table, &self.class_table, name)
            .ok_or_else(|| CompilerError::Parse(format!("undeclared identifier '{name}'")))?;
        self.emit(&format!("pop {} {index}", kind.segment()))
    }

    // --- grammar ---------------------------------------------------------

    fn run_class(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.peek_is_keyword(Keyword::Static) || self.peek_is_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }

        while self.peek_is_keyword(Keyword::Constructor)
            || self.peek_is_keyword(Keyword::Function)
            || self.peek_is_keyword(Keyword::Method)
        {
            self.compile_subroutine()?;
        }

        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_type(&mut self) -> Result<String> {
        match self.bump()? {
            Token::Keyword(Keyword::Int) => Ok("int".to_string()),
            Token::Keyword(Keyword::Char) => Ok("char".to_string()),
            Token::Keyword(Keyword::Boolean) => Ok("boolean".to_string()),
            Token::Identifier(name) => Ok(name),
            other => Err(CompilerError::Parse(format!(
                "expected a type, found '{}'",
                other.describe()
            ))),
        }
    }

    fn compile_class_var_dec(&mut self) -> Result<()> {
        let kind = match self.bump()? {
            Token::Keyword(Keyword::Static) => SymbolKind::Static,
            Token::Keyword(Keyword::Field) => SymbolKind::Field,
            other => {
                return Err(CompilerError::Parse(format!(
                    "expected 'static' or 'field', found '{}'",
                    other.describe()
                )));
            }
        };

        let type_name = self.compile_type()?;
        let name = self.expect_identifier()?;
        self.class_table.define(&name, &type_name, kind);

        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            let name = self.expect_identifier()?;
            self.class_table.define(&name, &type_name, kind);
        }

        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_subroutine(&mut self) -> Result<()> {
        self.subroutine_table.reset();

        let kind = match self.bump()? {
            Token::Keyword(Keyword::Constructor) => SubroutineKind::Constructor,
            Token::Keyword(Keyword::Function) => SubroutineKind::Function,
            Token::Keyword(Keyword::Method) => SubroutineKind::Method,
            other => {
                return Err(CompilerError::Parse(format!(
                    "expected a subroutine declaration, found '{}'",
                    other.describe()
                )));
            }
        };

        // Return type: 'void' or a type. Not needed for emission.
        if self.peek_is_keyword(Keyword::Void) {
            self.bump()?;
        } else {
            self.compile_type()?;
        }

        let name = self.expect_identifier()?;
        let full_name = format!("{}.{name}", self.class_name);

        if kind == SubroutineKind::Method {
            self.subroutine_table
                .define("this", &self.class_name.clone(), SymbolKind::Arg);
        }

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        while self.peek_is_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let n_locals = self.subroutine_table.var_count(SymbolKind::Var);
        self.emit(&format!("function {full_name} {n_locals}"))?;

        match kind {
            SubroutineKind::Constructor => {
                let n_fields = self.class_table.var_count(SymbolKind::Field);
                self.emit(&format!("push constant {n_fields}"))?;
                self.emit("call Memory.alloc 1")?;
                self.emit("pop pointer 0")?;
            }
            SubroutineKind::Method => {
                self.emit("push argument 0")?;
                self.emit("pop pointer 0")?;
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<()> {
        if self.peek_is_symbol(')') {
            return Ok(());
        }

        let type_name = self.compile_type()?;
        let name = self.expect_identifier()?;
        self.subroutine_table.define(&name, &type_name, SymbolKind::Arg);

        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            let type_name = self.compile_type()?;
            let name = self.expect_identifier()?;
            self.subroutine_table.define(&name, &type_name, SymbolKind::Arg);
        }

        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Var)?;
        let type_name = self.compile_type()?;
        let name = self.expect_identifier()?;
        self.subroutine_table.define(&name, &type_name, SymbolKind::Var);

        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            let name = self.expect_identifier()?;
            self.subroutine_table.define(&name, &type_name, SymbolKind::Var);
        }

        self.expect_symbol(';')?;
        Ok(())
    }

    fn is_statement_keyword(&self) -> bool {
        self.peek_is_keyword(Keyword::Let)
            || self.peek_is_keyword(Keyword::If)
            || self.peek_is_keyword(Keyword::While)
            || self.peek_is_keyword(Keyword::Do)
            || self.peek_is_keyword(Keyword::Return)
    }

    fn compile_statements(&mut self) -> Result<()> {
        while self.is_statement_keyword() {
            if self.peek_is_keyword(Keyword::Let) {
                self.compile_let()?;
            } else if self.peek_is_keyword(Keyword::If) {
                self.compile_if()?;
            } else if self.peek_is_keyword(Keyword::While) {
                self.compile_while()?;
            } else if self.peek_is_keyword(Keyword::Do) {
                self.compile_do()?;
            } else {
                self.compile_return()?;
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;

        let is_array = self.peek_is_symbol('[');
        if is_array {
            self.expect_symbol('[')?;
            self.push_variable(&name)?;
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.emit("add")?;
        }

        self.expect_symbol('=')?;
        self.compile_expression()?;
        self.expect_symbol(';')?;

        if is_array {
            self.emit("pop temp 0")?;
            self.emit("pop pointer 1")?;
            self.emit("push temp 0")?;
            self.emit("pop that 0")?;
        } else {
            self.pop_variable(&name)?;
        }

        Ok(())
    }

    fn compile_if(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::If)?;
        let label_false = self.next_label("IF_FALSE");
        let label_end = self.next_label("IF_END");

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.emit("not")?;
        self.emit(&format!("if-goto {label_false}"))?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.emit(&format!("goto {label_end}"))?;
        self.emit(&format!("label {label_false}"))?;

        if self.peek_is_keyword(Keyword::Else) {
            self.bump()?;
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
        }

        self.emit(&format!("label {label_end}"))?;
        Ok(())
    }

    fn compile_while(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::While)?;
        let label_exp = self.next_label("WHILE_EXP");
        let label_end = self.next_label("WHILE_END");

        self.emit(&format!("label {label_exp}"))?;

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.emit("not")?;
        self.emit(&format!("if-goto {label_end}"))?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.emit(&format!("goto {label_exp}"))?;
        self.emit(&format!("label {label_end}"))?;
        Ok(())
    }

    fn compile_do(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Do)?;
        let name = self.expect_identifier()?;
        self.compile_call(&name)?;
        self.expect_symbol(';')?;
        self.emit("pop temp 0")?;
        Ok(())
    }

    fn compile_return(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Return)?;
        if self.peek_is_symbol(';') {
            self.emit("push constant 0")?;
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.emit("return")?;
        Ok(())
    }

    fn compile_expression(&mut self) -> Result<()> {
        self.compile_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Symbol(c)) if "+-*/&|<>=".contains(*c) => *c,
                _ => break,
            };
            self.bump()?;
            self.compile_term()?;
            match op {
                '+' => self.emit("add")?,
                '-' => self.emit("sub")?,
                '*' => self.emit("call Math.multiply 2")?,
                '/' => self.emit("call Math.divide 2")?,
                '&' => self.emit("and")?,
                '|' => self.emit("or")?,
                '<' => self.emit("lt")?,
                '>' => self.emit("gt")?,
                '=' => self.emit("eq")?,
                _ => unreachable!("operator set is closed above"),
            }
        }
        Ok(())
    }

    fn compile_term(&mut self) -> Result<()> {
        match self.bump()? {
            Token::IntConst(n) => self.emit(&format!("push constant {n}")),
            Token::StringConst(s) => {
                self.emit(&format!("push constant {}", s.len()))?;
                self.emit("call String.new 1")?;
                for byte in s.bytes() {
                    self.emit(&format!("push constant {byte}"))?;
                    self.emit("call String.appendChar 2")?;
                }
                Ok(())
            }
            Token::Keyword(Keyword::True) => {
                self.emit("push constant 0")?;
                self.emit("not")
            }
            Token::Keyword(Keyword::False) | Token::Keyword(Keyword::Null) => {
                self.emit("push constant 0")
            }
            Token::Keyword(Keyword::This) => self.emit("push pointer 0"),
            Token::Symbol('(') => {
                self.compile_expression()?;
                self.expect_symbol(')')
            }
            Token::Symbol('-') => {
                self.compile_term()?;
                self.emit("neg")
            }
            Token::Symbol('~') => {
                self.compile_term()?;
                self.emit("not")
            }
            Token::Identifier(name) => {
                if self.peek_is_symbol('[') {
                    self.bump()?;
                    self.push_variable(&name)?;
                    self.compile_expression()?;
                    self.expect_symbol(']')?;
                    self.emit("add")?;
                    self.emit("pop pointer 1")?;
                    self.emit("push that 0")
                } else if self.peek_is_symbol('(') || self.peek_is_symbol('.') {
                    self.compile_call(&name)
                } else {
                    self.push_variable(&name)
                }
            }
            other => Err(CompilerError::Parse(format!(
                "unexpected token in expression: '{}'",
                other.describe()
            ))),
        }
    }

    /// Compiles a subroutine call whose leading identifier (`name`) has
    /// already been consumed. Covers all three call shapes from §4.2.
    fn compile_call(&mut self, name: &str) -> Result<()> {
        if self.peek_is_symbol('(') {
            // f(args) -- implicit method call on the current object.
            self.expect_symbol('(')?;
            self.emit("push pointer 0")?;
            let n = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.emit(&format!("call {}.{name} {}", self.class_name, n + 1))
        } else {
            self.expect_symbol('.')?;
            let method_name = self.expect_identifier()?;
            self.expect_symbol('(')?;

            let resolved =
                symbol_table::resolve(&self.subroutine_table, &self.class_table, name)
                    .map(|(_, type_name, _)| type_name.to_string());

            if let Some(type_name) = resolved {
                self.push_variable(name)?;
                let n = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.emit(&format!("call {type_name}.{method_name} {}", n + 1))
            } else {
                let n = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.emit(&format!("call {name}.{method_name} {n}"))
            }
        }
    }

    fn compile_expression_list(&mut self) -> Result<u16> {
        if self.peek_is_symbol(')') {
            return Ok(0);
        }

        self.compile_expression()?;
        let mut count: u16 = 1;

        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            self.compile_expression()?;
            count += 1;
        }

        Ok(count)
    }
}
