//! Translates parsed VM commands into Hack assembly.
//!
//! All emitter state (current file, current function, per-op label
//! counters) lives on the `CodeWriter` instance so the translator can be
//! invoked more than once in a process without cross-contamination.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::{Result, TranslatorError};

macro_rules! write_asm {
    ($writer:expr, $($line:literal)*) => {
        $writer.write_all(concat!($($line, "\n"),*).as_bytes())
    };
}

#[derive(Clone, Copy)]
enum SegmentSymbol {
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
    Constant,
}

impl SegmentSymbol {
    fn from_str(segment: &str) -> Option<Self> {
        match segment {
            "local" => Some(SegmentSymbol::Local),
            "argument" => Some(SegmentSymbol::Argument),
            "this" => Some(SegmentSymbol::This),
            "that" => Some(SegmentSymbol::That),
            "temp" => Some(SegmentSymbol::Temp),
            "pointer" => Some(SegmentSymbol::Pointer),
            "static" => Some(SegmentSymbol::Static),
            "constant" => Some(SegmentSymbol::Constant),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            SegmentSymbol::Local => "LCL",
            SegmentSymbol::Argument => "ARG",
            SegmentSymbol::This => "THIS",
            SegmentSymbol::That => "THAT",
            SegmentSymbol::Temp => "R5",
            SegmentSymbol::Pointer => "THIS",
            SegmentSymbol::Static => "STATIC",
            SegmentSymbol::Constant => "CONSTANT",
        }
    }
}

pub struct CodeWriter {
    output_file: BufWriter<File>,
    eq_counter: usize,
    gt_counter: usize,
    lt_counter: usize,
    return_counter: usize,
    current_file: String,
    current_function: String,
}

impl CodeWriter {
    pub fn new(output_filename: &std::path::Path) -> Result<Self> {
        let file = File::create(output_filename)?;
        let buffered = BufWriter::with_capacity(8192, file);
        Ok(CodeWriter {
            output_file: buffered,
            eq_counter: 0,
            gt_counter: 0,
            lt_counter: 0,
            return_counter: 0,
            current_file: String::new(),
            current_function: String::new(),
        })
    }

    #[inline]
    pub fn set_filename(&mut self, filename: &str) {
        let name = std::path::Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown");
        self.current_file.clear();
        self.current_file.push_str(name);
    }

    /// Scoped label for `label`/`goto`/`if-goto`: `FUNC$lbl`, or the bare
    /// label when emitted outside any function.
    fn scoped_label(&self, label: &str) -> String {
        if self.current_function.is_empty() {
            label.to_string()
        } else {
            format!("{}${}", self.current_function, label)
        }
    }

    /// Prepends bootstrap code: `SP=256` followed by `call Sys.init 0`.
    /// Only emitted for directory-mode translation (§4.5).
    pub fn write_init(&mut self) -> Result<()> {
        write_asm!(self.output_file,
            "// bootstrap"
            "@256"
            "D=A"
            "@SP"
            "M=D"
        )?;
        self.write_call("Sys.init", 0)
    }

    pub fn write_arithmetic(&mut self, command: &str) -> Result<()> {
        writeln!(self.output_file, "// vm command:{command}")?;

        match command {
            "add" => self.write_binary_op("D+M"),
            "sub" => self.write_binary_op("D-M"),
            "and" => self.write_binary_op("D&M"),
            "or" => self.write_binary_op("D|M"),
            "neg" => self.write_unary_op(true),
            "not" => self.write_unary_op(false),
            "eq" => self.write_comparison("JEQ"),
            "gt" => self.write_comparison("JGT"),
            "lt" => self.write_comparison("JLT"),
            other => Err(TranslatorError::Parse(format!(
                "unknown arithmetic command: {other}"
            ))),
        }
    }

    #[inline]
    fn write_binary_op(&mut self, operation: &str) -> Result<()> {
        write!(
            self.output_file,
            "// get the top element of stack\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             // store the result temporarily\n\
             @R14\n\
             M=D\n\
             // get the top element of stack\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             // store the result temporarily\n\
             @R13\n\
             M=D\n\
             @R13\n\
             D=M\n\
             @R14\n\
             D={operation}\n"
        )?;

        self.write_push_d()?;
        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    fn write_unary_op(&mut self, is_neg: bool) -> Result<()> {
        write_asm!(self.output_file,
            "// get the top element of stack"
            "@SP"
            "M=M-1"
            "A=M"
            "D=M"
        )?;

        if is_neg {
            write_asm!(self.output_file,
                "@0"
                "D=A-D"
            )?;
        } else {
            write_asm!(self.output_file, "D=!D")?;
        }

        self.write_push_d()?;
        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    fn write_comparison(&mut self, jump: &str) -> Result<()> {
        let (label_prefix, counter) = match jump {
            "JEQ" => {
                self.eq_counter += 1;
                ("EQ", self.eq_counter - 1)
            }
            "JGT" => {
                self.gt_counter += 1;
                ("GT", self.gt_counter - 1)
            }
            "JLT" => {
                self.lt_counter += 1;
                ("LT", self.lt_counter - 1)
            }
            other => {
                return Err(TranslatorError::Parse(format!(
                    "unknown comparison jump mnemonic: {other}"
                )));
            }
        };

        write!(
            self.output_file,
            "// get the top element of stack\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             // store the result temporarily\n\
             @R14\n\
             M=D\n\
             // get the top element of stack\n\
             @SP\n\
             M=M-1\n\
             A=M\n\
             D=M\n\
             // store the result temporarily\n\
             @R13\n\
             M=D\n\
             @R13\n\
             D=M\n\
             @R14\n\
             D=D-M\n\
             @{label_prefix}{counter}\n\
             D;{jump}\n\
             // push the value into stack\n\
             @SP\n\
             A=M\n\
             M=0\n\
             @SP\n\
             M=M+1\n\
             @END{label_prefix}{counter}\n\
             0;JMP\n\
             ({label_prefix}{counter})\n\
             // push the value into stack\n\
             @SP\n\
             A=M\n\
             M=-1\n\
             @SP\n\
             M=M+1\n\
             (END{label_prefix}{counter})\n\n"
        )?;
        Ok(())
    }

    pub fn write_push_pop(&mut self, command: &str, segment: &str, index: i32) -> Result<()> {
        writeln!(self.output_file, "// vm command:{command} {segment} {index}")?;

        if command == "push" {
            self.write_push(segment, index)?;
        } else {
            self.write_pop(segment, index)?;
        }

        self.output_file.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    fn write_push(&mut self, segment: &str, index: i32) -> Result<()> {
        match SegmentSymbol::from_str(segment) {
            Some(SegmentSymbol::Constant) => {
                write!(self.output_file, "@{index}\nD=A\n")?;
                self.write_push_d()
            }
            Some(seg)
                if matches!(
                    seg,
                    SegmentSymbol::Local
                        | SegmentSymbol::Argument
                        | SegmentSymbol::This
                        | SegmentSymbol::That
                ) =>
            {
                let segment_symbol = seg.symbol();
                write!(self.output_file, "@{segment_symbol}\nD=M\n@{index}\nA=D+A\nD=M\n")?;
                self.write_push_d()
            }
            Some(SegmentSymbol::Temp) => {
                write!(self.output_file, "@R5\nD=A\n@{index}\nA=D+A\nD=M\n")?;
                self.write_push_d()
            }
            Some(SegmentSymbol::Pointer) => {
                let target = if index == 0 { "THIS" } else { "THAT" };
                write!(self.output_file, "@{target}\nD=M\n")?;
                self.write_push_d()
            }
            Some(SegmentSymbol::Static) => {
                write!(self.output_file, "@{}.{}\nD=M\n", self.current_file, index)?;
                self.write_push_d()
            }
            None => Err(TranslatorError::Parse(format!(
                "unknown segment: {segment}"
            ))),
        }
    }

    #[inline]
    fn write_pop(&mut self, segment: &str, index: i32) -> Result<()> {
        match SegmentSymbol::from_str(segment) {
            Some(seg)
                if matches!(
                    seg,
                    SegmentSymbol::Local
                        | SegmentSymbol::Argument
                        | SegmentSymbol::This
                        | SegmentSymbol::That
                ) =>
            {
                let segment_symbol = seg.symbol();
                write!(
                    self.output_file,
                    "@{segment_symbol}\n\
                     D=M\n\
                     @{index}\n\
                     D=D+A\n\
                     // store the result temporarily\n\
                     @R13\n\
                     M=D\n"
                )?;

                self.write_pop_to_d()?;

                write_asm!(self.output_file,
                    "// store the top value"
                    "@R13"
                    "A=M"
                    "M=D"
                )?;
                Ok(())
            }
            Some(SegmentSymbol::Temp) => {
                write!(
                    self.output_file,
                    "@5\n\
                     D=A\n\
                     @{index}\n\
                     D=D+A\n\
                     // store the result temporarily\n\
                     @R13\n\
                     M=D\n"
                )?;

                self.write_pop_to_d()?;

                write_asm!(self.output_file,
                    "// store the top value"
                    "@R13"
                    "A=M"
                    "M=D"
                )?;
                Ok(())
            }
            Some(SegmentSymbol::Pointer) => {
                let target = if index == 0 { "THIS" } else { "THAT" };
                self.write_pop_to_d()?;
                write!(self.output_file, "@{target}\nM=D\n")?;
                Ok(())
            }
            Some(SegmentSymbol::Static) => {
                self.write_pop_to_d()?;
                write!(self.output_file, "@{}.{}\nM=D\n", self.current_file, index)?;
                Ok(())
            }
            Some(SegmentSymbol::Constant) | None => Err(TranslatorError::Parse(format!(
                "cannot pop to segment: {segment}"
            ))),
        }
    }

    #[inline]
    fn write_push_d(&mut self) -> Result<()> {
        write_asm!(self.output_file,
            "// push the value into stack"
            "@SP"
            "A=M"
            "M=D"
            "@SP"
            "M=M+1"
        )?;
        Ok(())
    }

    #[inline]
    fn write_pop_to_d(&mut self) -> Result<()> {
        write_asm!(self.output_file,
            "// get the top element of stack"
            "@SP"
            "M=M-1"
            "A=M"
            "D=M"
        )?;
        Ok(())
    }

    pub fn write_label(&mut self, label: &str) -> Result<()> {
        writeln!(self.output_file, "// vm command:label {label}")?;
        writeln!(self.output_file, "({})", self.scoped_label(label))?;
        Ok(())
    }

    pub fn write_goto(&mut self, label: &str) -> Result<()> {
        writeln!(self.output_file, "// vm command:goto {label}")?;
        writeln!(self.output_file, "@{}", self.scoped_label(label))?;
        write_asm!(self.output_file, "0;JMP")?;
        Ok(())
    }

    pub fn write_if(&mut self, label: &str) -> Result<()> {
        writeln!(self.output_file, "// vm command:if-goto {label}")?;
        self.write_pop_to_d()?;
        writeln!(self.output_file, "@{}", self.scoped_label(label))?;
        write_asm!(self.output_file, "D;JNE")?;
        Ok(())
    }

    pub fn write_function(&mut self, name: &str, n_locals: i32) -> Result<()> {
        writeln!(self.output_file, "// vm command:function {name} {n_locals}")?;
        self.current_function.clear();
        self.current_function.push_str(name);

        writeln!(self.output_file, "({name})")?;
        for _ in 0..n_locals {
            write!(self.output_file, "@0\nD=A\n")?;
            self.write_push_d()?;
        }
        Ok(())
    }

    pub fn write_call(&mut self, name: &str, n_args: i32) -> Result<()> {
        writeln!(self.output_file, "// vm command:call {name} {n_args}")?;
        let return_label = format!("RETURN_ADDRESS{}", self.return_counter);
        self.return_counter += 1;

        write!(self.output_file, "@{return_label}\nD=A\n")?;
        self.write_push_d()?;
        for segment in ["LCL", "ARG", "THIS", "THAT"] {
            write!(self.output_file, "@{segment}\nD=M\n")?;
            self.write_push_d()?;
        }

        write!(
            self.output_file,
            "// ARG = SP - n - 5\n\
             @SP\n\
             D=M\n\
             @{}\n\
             D=D-A\n\
             @ARG\n\
             M=D\n\
             // LCL = SP\n\
             @SP\n\
             D=M\n\
             @LCL\n\
             M=D\n\
             @{name}\n\
             0;JMP\n\
             ({return_label})\n",
            n_args + 5
        )?;
        Ok(())
    }

    pub fn write_return(&mut self) -> Result<()> {
        write_asm!(self.output_file, "// vm command:return")?;
        write!(
            self.output_file,
            "// FRAME = LCL\n\
             @LCL\n\
             D=M\n\
             @R13\n\
             M=D\n\
             // RET = *(FRAME-5)\n\
             @5\n\
             A=D-A\n\
             D=M\n\
             @R14\n\
             M=D\n"
        )?;

        self.write_pop_to_d()?;
        write_asm!(self.output_file,
            "// *ARG = pop()"
            "@ARG"
            "A=M"
            "M=D"
            "// SP = ARG + 1"
            "@ARG"
            "D=M+1"
            "@SP"
            "M=D"
        )?;

        for (offset, segment) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            write!(
                self.output_file,
                "@R13\n\
                 D=M\n\
                 @{offset}\n\
                 A=D-A\n\
                 D=M\n\
                 @{segment}\n\
                 M=D\n"
            )?;
        }

        write_asm!(self.output_file,
            "@R14"
            "A=M"
            "0;JMP"
        )?;
        Ok(())
    }

    #[inline]
    pub fn close(&mut self) -> Result<()> {
        self.output_file.flush()?;
        Ok(())
    }
}
