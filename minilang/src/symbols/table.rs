//! Symbol table: one entry per declared variable

use crate::config::constants::compile_time::symbols::*;
use crate::symbols::error::{SymbolError, SymbolResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Double,
}

impl DataType {
    /// Parse a declaration's type word
    pub fn from_type_word(word: &str) -> Option<Self> {
        match word {
            crate::tokens::token::KEYWORD_INT => Some(DataType::Integer),
            crate::tokens::token::KEYWORD_DOUBLE => Some(DataType::Double),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Double => "double",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum SymbolValue {
    #[default]
    Null,
    Integer(i64),
    Double(f64),
    /// Non-literal right-hand side, stored as the concatenated atom text
    Expression(String),
}

impl fmt::Display for SymbolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolValue::Null => f.write_str("null"),
            SymbolValue::Integer(value) => write!(f, "{}", value),
            SymbolValue::Double(value) => write!(f, "{}", value),
            SymbolValue::Expression(text) => f.write_str(text),
        }
    }
}

/// Lines are 1-based
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub data_type: Option<DataType>,
    pub value: SymbolValue,
    pub first_line: Option<usize>,
    pub last_line: Option<usize>,
}

impl SymbolEntry {
    pub fn is_typed(&self) -> bool {
        self.data_type.is_some()
    }

    /// Record a sighting on `line`
    pub fn touch(&mut self, line: usize) {
        self.last_line = Some(line);
        if self.first_line.is_none() {
            self.first_line = Some(line);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    entries: BTreeMap<String, SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entry for `name` unless one exists
    pub fn ensure_entry(&mut self, name: &str) -> SymbolResult<()> {
        if self.entries.contains_key(name) {
            return Ok(());
        }
        if name.len() > MAX_SYMBOL_IDENTIFIER_LENGTH {
            return Err(SymbolError::IdentifierTooLong {
                name: name.to_string(),
                length: name.len(),
            });
        }
        if self.entries.len() >= MAX_SYMBOLS {
            return Err(SymbolError::SymbolLimitExceeded {
                count: self.entries.len() + 1,
            });
        }
        self.entries.insert(name.to_string(), SymbolEntry::default());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SymbolEntry> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Drop every entry without a type, returning the removed names in order
    pub fn remove_untyped(&mut self) -> Vec<String> {
        let untyped: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_typed())
            .map(|(name, _)| name.clone())
            .collect();
        for name in &untyped {
            self.entries.remove(name);
        }
        untyped
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SymbolEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aligned text table: name, type, value, first and last line
    pub fn render(&self) -> String {
        let mut output = format!(
            "{:<16} {:<8} {:<16} {:>5} {:>5}\n",
            "NAME", "TYPE", "VALUE", "FIRST", "LAST"
        );
        let line = |l: Option<usize>| l.map(|l| l.to_string()).unwrap_or_else(|| "-".into());
        for (name, entry) in &self.entries {
            output.push_str(&format!(
                "{:<16} {:<8} {:<16} {:>5} {:>5}\n",
                name,
                entry.data_type.map(|t| t.as_str()).unwrap_or("-"),
                entry.value.to_string(),
                line(entry.first_line),
                line(entry.last_line),
            ));
        }
        output
    }
}
