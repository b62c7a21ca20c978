//! Character classes driving atom boundaries

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharClass {
    /// Alphabetic or `_`
    Letter,
    /// ASCII digit or `.`
    DigitOrDot,
    Apostrophe,
    DoubleQuote,
    LeftParen,
    RightParen,
    Whitespace,
    /// `;`
    EndMarker,
    /// Any other ASCII punctuation
    ArithmeticSymbol,
    Other,
}

impl CharClass {
    pub fn of(ch: char) -> Self {
        match ch {
            '_' => CharClass::Letter,
            '.' => CharClass::DigitOrDot,
            '\'' => CharClass::Apostrophe,
            '"' => CharClass::DoubleQuote,
            '(' => CharClass::LeftParen,
            ')' => CharClass::RightParen,
            ';' => CharClass::EndMarker,
            c if c.is_ascii_digit() => CharClass::DigitOrDot,
            c if c.is_alphabetic() => CharClass::Letter,
            c if c.is_whitespace() => CharClass::Whitespace,
            c if c.is_ascii_punctuation() => CharClass::ArithmeticSymbol,
            _ => CharClass::Other,
        }
    }

    pub fn is_quote(&self) -> bool {
        matches!(self, CharClass::Apostrophe | CharClass::DoubleQuote)
    }
}
