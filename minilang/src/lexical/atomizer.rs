//! Splits source lines into atoms
//!
//! Each line is folded character by character through a [`LineState`].
//! Outside a quoted span an atom is a maximal run of one character class;
//! inside a span every character belongs to the string atom until the
//! opening quote character appears again.

use super::chars::CharClass;
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub text: String,
    pub span: Span,
}

impl Atom {
    fn start(ch: char, pos: Position) -> Self {
        Self {
            text: ch.to_string(),
            span: Span::new(pos, pos.advance(ch)),
        }
    }

    fn push(&mut self, ch: char) {
        self.text.push(ch);
        self.span.end = self.span.end.advance(ch);
    }

    pub fn column(&self) -> u32 {
        self.span.start.column
    }
}

/// The atoms of one source line. `line_index` is 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomLine {
    pub line_index: usize,
    pub text: String,
    pub atoms: Vec<Atom>,
}

impl AtomLine {
    /// 1-based line number
    pub fn line_number(&self) -> usize {
        self.line_index + 1
    }

    pub fn is_blank(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[derive(Debug, Default)]
struct LineState {
    previous_class: Option<CharClass>,
    in_string: bool,
    string_delimiter: Option<char>,
    atoms: Vec<Atom>,
}

impl LineState {
    fn step(mut self, ch: char, pos: Position) -> Self {
        let class = CharClass::of(ch);

        if self.in_string {
            if let Some(atom) = self.atoms.last_mut() {
                atom.push(ch);
            }
            if self.string_delimiter == Some(ch) {
                self.in_string = false;
                self.string_delimiter = None;
                self.previous_class = Some(class);
            }
            return self;
        }

        if class.is_quote() {
            self.atoms.push(Atom::start(ch, pos));
            self.in_string = true;
            self.string_delimiter = Some(ch);
        } else if class == CharClass::Whitespace {
            // dropped, but still separates atoms
        } else {
            match self.atoms.last_mut() {
                Some(atom) if self.previous_class == Some(class) => atom.push(ch),
                _ => self.atoms.push(Atom::start(ch, pos)),
            }
        }

        self.previous_class = Some(class);
        self
    }
}

/// Atomize one line starting at `start`
pub fn atomize_line(line_index: usize, text: &str, start: Position) -> AtomLine {
    let (state, _) = text
        .chars()
        .fold((LineState::default(), start), |(state, pos), ch| {
            (state.step(ch, pos), pos.advance(ch))
        });

    AtomLine {
        line_index,
        text: text.trim_end_matches('\r').to_string(),
        atoms: state.atoms,
    }
}

/// Atomize a whole source text. Every line yields an entry, blank lines
/// included; a final newline does not start an extra line.
pub fn atomize(source: &str) -> Vec<AtomLine> {
    if source.is_empty() {
        return Vec::new();
    }
    let body = source.strip_suffix('\n').unwrap_or(source);

    let mut offset = 0;
    body.split('\n')
        .enumerate()
        .map(|(index, text)| {
            let start = Position::line_start(index as u32 + 1, offset);
            offset += text.len() + 1;
            atomize_line(index, text, start)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &AtomLine) -> Vec<&str> {
        line.atoms.iter().map(|a| a.text.as_str()).collect()
    }

    #[test]
    fn test_statement_atoms() {
        let lines = atomize("x := 5 ;");
        assert_eq!(lines.len(), 1);
        assert_eq!(texts(&lines[0]), vec!["x", ":=", "5", ";"]);
        assert_eq!(lines[0].atoms[1].column(), 3);
    }

    #[test]
    fn test_whitespace_separates_same_class() {
        let lines = atomize("a b");
        assert_eq!(texts(&lines[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_same_class_runs_merge() {
        let lines = atomize("((x));;");
        assert_eq!(texts(&lines[0]), vec!["((", "x", "))", ";;"]);

        let lines = atomize("x1");
        assert_eq!(texts(&lines[0]), vec!["x", "1"]);
    }

    #[test]
    fn test_string_span_keeps_whitespace() {
        let lines = atomize("output << \"Hello, world\" ;");
        assert_eq!(
            texts(&lines[0]),
            vec!["output", "<<", "\"Hello, world\"", ";"]
        );
    }

    #[test]
    fn test_string_closes_on_same_delimiter_only() {
        let lines = atomize("'it\"s' x");
        assert_eq!(texts(&lines[0]), vec!["'it\"s'", "x"]);

        let lines = atomize("\"a\"\"b\"");
        assert_eq!(texts(&lines[0]), vec!["\"a\"", "\"b\""]);
    }

    #[test]
    fn test_unterminated_string_runs_to_line_end() {
        let lines = atomize("output << \"oops ;\nx");
        assert_eq!(texts(&lines[0]), vec!["output", "<<", "\"oops ;"]);
        assert_eq!(texts(&lines[1]), vec!["x"]);
    }

    #[test]
    fn test_blank_lines_kept() {
        let lines = atomize("a\n\n  \nb\n");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].is_blank());
        assert!(lines[2].is_blank());
        assert_eq!(lines[3].line_number(), 4);
        assert_eq!(lines[3].atoms[0].span.start.offset, 6);
    }

    #[test]
    fn test_empty_source() {
        assert!(atomize("").is_empty());
        assert_eq!(atomize("\n").len(), 1);
    }

    #[test]
    fn test_atomize_is_idempotent_on_concatenation() {
        for line in ["x:=5;", "output<<(a+b)*2;", "if(x>=5)output<<x;", "y:=3.5/x-1;"] {
            let first = atomize(line);
            let joined: String = first[0].atoms.iter().map(|a| a.text.as_str()).collect();
            let second = atomize(&joined);
            assert_eq!(texts(&first[0]), texts(&second[0]));
        }
    }

    #[test]
    fn test_crlf_line_text() {
        let lines = atomize("x ;\r\ny ;\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "x ;");
        assert_eq!(texts(&lines[1]), vec!["y", ";"]);
    }
}
