//! Parser module for the Hack Virtual Machine language
//!
//! Line-oriented: strips `//` comments and surrounding whitespace, skips
//! blank lines, then tokenizes the remainder by whitespace. Each line is
//! parsed independently — no lookahead across lines.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, TranslatorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

pub struct Parser {
    lines: Vec<String>,
    current_line: usize,
    current_command: String,
    /// Cached whitespace-split parts of the current command.
    cached_parts: Vec<String>,
}

impl Parser {
    pub fn new(filename: &Path) -> Result<Self> {
        let file = File::open(filename)?;
        let reader = BufReader::new(file);

        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = if let Some(pos) = line.find("//") {
                &line[..pos]
            } else {
                &line
            };

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }

        Ok(Parser {
            lines,
            current_line: 0,
            current_command: String::new(),
            cached_parts: Vec::new(),
        })
    }

    #[inline]
    #[must_use]
    pub fn has_more_commands(&self) -> bool {
        self.current_line < self.lines.len()
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.has_more_commands() {
            std::mem::swap(
                &mut self.current_command,
                &mut self.lines[self.current_line],
            );

            self.cached_parts.clear();
            self.cached_parts.extend(
                self.current_command
                    .split_whitespace()
                    .map(ToString::to_string),
            );

            self.current_line += 1;
        }
    }

    #[inline]
    pub fn command_type(&self) -> Result<CommandType> {
        let first = self.cached_parts.first().ok_or_else(|| {
            TranslatorError::Parse("empty command: advance() was never called".to_string())
        })?;

        Ok(match first.as_str() {
            "push" => CommandType::Push,
            "pop" => CommandType::Pop,
            "label" => CommandType::Label,
            "goto" => CommandType::Goto,
            "if-goto" => CommandType::If,
            "function" => CommandType::Function,
            "return" => CommandType::Return,
            "call" => CommandType::Call,
            "add" | "sub" | "neg" | "eq" | "gt" | "lt" | "and" | "or" | "not" => {
                CommandType::Arithmetic
            }
            other => {
                return Err(TranslatorError::Parse(format!(
                    "unknown command '{other}'"
                )));
            }
        })
    }

    #[inline]
    pub fn arg1(&self) -> Result<&str> {
        match self.command_type()? {
            CommandType::Arithmetic => Ok(&self.cached_parts[0]),
            CommandType::Return => Err(TranslatorError::Parse(
                "arg1 is not defined for return".to_string(),
            )),
            _ => self.cached_parts.get(1).map(String::as_str).ok_or_else(|| {
                TranslatorError::Parse(format!(
                    "missing first argument in '{}'",
                    self.current_command
                ))
            }),
        }
    }

    #[inline]
    pub fn arg2(&self) -> Result<i32> {
        match self.command_type()? {
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call => {
                let raw = self.cached_parts.get(2).ok_or_else(|| {
                    TranslatorError::Parse(format!(
                        "missing second argument in '{}'",
                        self.current_command
                    ))
                })?;
                raw.parse::<i32>().map_err(|_| {
                    TranslatorError::Parse(format!("invalid integer argument '{raw}'"))
                })
            }
            other => Err(TranslatorError::Parse(format!(
                "arg2 is not defined for {other:?}"
            ))),
        }
    }
}
