//! Symbol table construction
//!
//! Three steps over the provisional tokens and the atom lines:
//!
//! 1. seed an entry for every identifier token
//! 2. resolve each `;`-terminated segment of each line as a declaration,
//!    an assignment or a plain reference
//! 3. remove entries that never received a type
//!
//! [`finalize_tokens`] then retags identifiers missing from the table.

use super::error::SymbolResult;
use super::table::{DataType, SymbolTable, SymbolValue};
use crate::config::runtime::SymbolPreferences;
use crate::diagnostics::{Diagnostic, DiagnosticSink, ErrorKind};
use crate::lexical::{classify_token, Atom, AtomLine};
use crate::logging::codes;
use crate::tokens::{Token, TokenKind};
use crate::{log_debug, log_success};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Declaration,
    Assignment,
    Reference,
}

/// One `;`-terminated run of atoms and its operator position
struct Segment<'a> {
    atoms: &'a [Atom],
    operation: Operation,
    operator_index: Option<usize>,
}

impl<'a> Segment<'a> {
    fn new(atoms: &'a [Atom]) -> Self {
        let assignment = atoms.iter().position(|a| a.text == ":=");
        let declaration = atoms.iter().position(|a| a.text == ":");
        let (operation, operator_index) = match (assignment, declaration) {
            (Some(index), _) => (Operation::Assignment, Some(index)),
            (None, Some(index)) => (Operation::Declaration, Some(index)),
            (None, None) => (Operation::Reference, None),
        };
        Self {
            atoms,
            operation,
            operator_index,
        }
    }

    fn target_index(&self) -> Option<usize> {
        self.operator_index.and_then(|index| index.checked_sub(1))
    }

    /// Concatenated text of every atom after the operator
    fn residual(&self) -> String {
        match self.operator_index {
            Some(index) => self.atoms[index + 1..]
                .iter()
                .map(|a| a.text.as_str())
                .collect(),
            None => String::new(),
        }
    }
}

fn is_end_marker(atom: &Atom) -> bool {
    !atom.text.is_empty() && atom.text.chars().all(|c| c == ';')
}

fn split_segments(atoms: &[Atom]) -> Vec<Segment<'_>> {
    atoms
        .split(is_end_marker)
        .filter(|segment| !segment.is_empty())
        .map(Segment::new)
        .collect()
}

/// Output of one table build
#[derive(Debug, Clone)]
pub struct SymbolOutput {
    pub table: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct SymbolTableBuilder<'s> {
    preferences: SymbolPreferences,
    sink: &'s mut dyn DiagnosticSink,
    table: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    first_sightings: BTreeMap<String, usize>,
    reported: BTreeSet<String>,
}

impl<'s> SymbolTableBuilder<'s> {
    pub fn new(sink: &'s mut dyn DiagnosticSink) -> Self {
        Self::with_preferences(SymbolPreferences::default(), sink)
    }

    pub fn with_preferences(preferences: SymbolPreferences, sink: &'s mut dyn DiagnosticSink) -> Self {
        Self {
            preferences,
            sink,
            table: SymbolTable::new(),
            diagnostics: Vec::new(),
            first_sightings: BTreeMap::new(),
            reported: BTreeSet::new(),
        }
    }

    pub fn build(mut self, tokens: &[Token], atom_lines: &[AtomLine]) -> SymbolResult<SymbolOutput> {
        self.seed(tokens)?;
        log_debug!("Symbol table seeded", "entries" => self.table.len());

        for line in atom_lines {
            for segment in split_segments(&line.atoms) {
                self.resolve_segment(line, &segment);
            }
        }

        self.cleanup(atom_lines);

        if self.preferences.log_symbol_table {
            for (name, entry) in self.table.iter() {
                log_debug!("Symbol",
                    "name" => name,
                    "type" => entry.data_type.map(|t| t.as_str()).unwrap_or("-"),
                    "value" => &entry.value,
                    "first_line" => entry.first_line.unwrap_or(0),
                    "last_line" => entry.last_line.unwrap_or(0)
                );
            }
        }

        log_success!(codes::success::SYMBOL_TABLE_COMPLETE, "Symbol table completed",
            "symbols" => self.table.len(),
            "diagnostics" => self.diagnostics.len()
        );

        Ok(SymbolOutput {
            table: self.table,
            diagnostics: self.diagnostics,
        })
    }

    fn seed(&mut self, tokens: &[Token]) -> SymbolResult<()> {
        for token in tokens.iter().filter(|t| t.kind == TokenKind::Identifier) {
            self.table.ensure_entry(&token.lexeme)?;
            self.first_sightings
                .entry(token.lexeme.clone())
                .or_insert(token.line);
        }
        Ok(())
    }

    fn resolve_segment(&mut self, line: &AtomLine, segment: &Segment<'_>) {
        let line_number = line.line_number();
        let target = segment
            .target_index()
            .map(|index| &segment.atoms[index])
            .filter(|atom| self.table.contains(&atom.text));

        match (segment.operation, target) {
            (Operation::Declaration, Some(target)) => {
                self.declare(line, &target.text, &segment.residual())
            }
            (Operation::Assignment, Some(target)) => {
                self.assign(line, &target.text, &segment.residual())
            }
            _ => {}
        }

        if self.preferences.track_reference_lines {
            let target_index = target.and(segment.target_index());
            for (index, atom) in segment.atoms.iter().enumerate() {
                if Some(index) != target_index {
                    self.reference(&atom.text, line_number);
                }
            }
        }
    }

    fn declare(&mut self, line: &AtomLine, name: &str, type_word: &str) {
        let line_number = line.line_number();
        let Some(entry) = self.table.get_mut(name) else {
            return;
        };

        if entry.is_typed() {
            let original = entry.first_line.unwrap_or(line_number);
            self.report(
                line,
                name,
                ErrorKind::RedeclarationError,
                format!(
                    "Variable '{}' redeclared; originally declared on line {}",
                    name, original
                ),
            );
            return;
        }

        match DataType::from_type_word(type_word) {
            Some(data_type) => {
                entry.data_type = Some(data_type);
                entry.first_line = Some(line_number);
                entry.last_line = Some(line_number);
            }
            None => {
                // The entry stays untyped and is purged; cleanup must not
                // report the name or the type word again.
                self.reported.insert(name.to_string());
                let text = if type_word.is_empty() { name } else { type_word };
                self.report(
                    line,
                    text,
                    ErrorKind::UndeclaredVariableError,
                    format!(
                        "Variable '{}' declared with '{}', which is not a valid type",
                        name, type_word
                    ),
                );
            }
        }
    }

    fn assign(&mut self, line: &AtomLine, name: &str, residual: &str) {
        let line_number = line.line_number();
        let Some(entry) = self.table.get_mut(name) else {
            return;
        };

        let Some(data_type) = entry.data_type else {
            self.report(
                line,
                name,
                ErrorKind::UndeclaredVariableError,
                format!("Variable '{}' assigned before declaration", name),
            );
            return;
        };

        match classify_token(residual) {
            kind @ (TokenKind::LiteralInteger | TokenKind::LiteralDouble) => {
                match numeric_value(residual, kind, data_type) {
                    Some(value) => entry.value = value,
                    None => {
                        entry.touch(line_number);
                        self.report(
                            line,
                            residual,
                            ErrorKind::InvalidLiteralForType,
                            format!(
                                "Literal {} is out of range for {} variable '{}'",
                                residual, data_type, name
                            ),
                        );
                        return;
                    }
                }
            }
            TokenKind::LiteralString => {
                entry.touch(line_number);
                self.report(
                    line,
                    residual,
                    ErrorKind::InvalidLiteralForType,
                    format!(
                        "String literal {} cannot be assigned to {} variable '{}'",
                        residual, data_type, name
                    ),
                );
                return;
            }
            _ if residual.is_empty() => {}
            _ => entry.value = SymbolValue::Expression(residual.to_string()),
        }

        entry.touch(line_number);
    }

    fn reference(&mut self, text: &str, line_number: usize) {
        if let Some(entry) = self.table.get_mut(text) {
            if entry.is_typed() {
                entry.last_line = Some(line_number);
            }
        }
    }

    fn cleanup(&mut self, atom_lines: &[AtomLine]) {
        let removed = self.table.remove_untyped();
        if removed.is_empty() || !self.preferences.report_unresolved_references {
            return;
        }

        for name in removed {
            if self.reported.contains(&name) {
                continue;
            }
            let Some(&line_number) = self.first_sightings.get(&name) else {
                continue;
            };
            let Some(line) = atom_lines.iter().find(|l| l.line_number() == line_number) else {
                continue;
            };
            self.report(
                line,
                &name,
                ErrorKind::UndeclaredVariableError,
                format!("Variable '{}' is used but never declared", name),
            );
        }
    }

    fn report(&mut self, line: &AtomLine, text: &str, kind: ErrorKind, message: String) {
        if kind == ErrorKind::UndeclaredVariableError {
            self.reported.insert(text.to_string());
        }
        let diagnostic = Diagnostic::locate(line.line_number(), &line.text, text, kind, message);
        self.sink.report(&diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Literal value for an entry of `data_type`; integers truncate.
/// `None` when the literal does not fit an `i64` entry.
fn numeric_value(text: &str, kind: TokenKind, data_type: DataType) -> Option<SymbolValue> {
    match (data_type, kind) {
        (DataType::Integer, TokenKind::LiteralInteger) => {
            text.parse::<i64>().ok().map(SymbolValue::Integer)
        }
        (DataType::Integer, _) => {
            let truncated = parse_f64(text).trunc();
            // i64::MAX as f64 rounds up to 2^63, which is itself out of range
            (truncated >= i64::MIN as f64 && truncated < i64::MAX as f64)
                .then(|| SymbolValue::Integer(truncated as i64))
        }
        (DataType::Double, _) => Some(SymbolValue::Double(parse_f64(text))),
    }
}

fn parse_f64(text: &str) -> f64 {
    text.parse::<f64>().unwrap_or(0.0)
}

/// Build a table, sending diagnostics to `sink`
pub fn build_symbol_table(
    tokens: &[Token],
    atom_lines: &[AtomLine],
    sink: &mut dyn DiagnosticSink,
) -> SymbolResult<SymbolTable> {
    SymbolTableBuilder::new(sink)
        .build(tokens, atom_lines)
        .map(|output| output.table)
}

/// New token vector in which identifiers absent from `table` are
/// downgraded to `Error`
pub fn finalize_tokens(tokens: &[Token], table: &SymbolTable) -> Vec<Token> {
    tokens
        .iter()
        .map(|token| {
            if token.kind == TokenKind::Identifier && !table.contains(&token.lexeme) {
                token.downgrade()
            } else {
                token.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::lexical::analyze;
    use assert_matches::assert_matches;

    fn build(source: &str) -> (SymbolOutput, Vec<Token>) {
        let lexical = analyze(source, &mut NullSink).unwrap();
        let mut sink = NullSink;
        let output = SymbolTableBuilder::new(&mut sink)
            .build(&lexical.tokens, &lexical.atom_lines)
            .unwrap();
        (output, lexical.tokens)
    }

    fn kinds(diagnostics: &[Diagnostic]) -> Vec<ErrorKind> {
        diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_declare_and_assign_on_one_line() {
        let (output, _) = build("x : integer ; x := 5 ; output << x ;");
        assert!(output.diagnostics.is_empty());

        let entry = output.table.get("x").unwrap();
        assert_eq!(entry.data_type, Some(DataType::Integer));
        assert_eq!(entry.value, SymbolValue::Integer(5));
        assert_eq!(entry.first_line, Some(1));
        assert_eq!(entry.last_line, Some(1));
    }

    #[test]
    fn test_last_literal_wins_and_integers_truncate() {
        let (output, _) = build("n : integer ;\nn := 3 ;\nn := 7.9 ;\nd : double ;\nd := 7.9 ;");
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.table.get("n").unwrap().value, SymbolValue::Integer(7));
        assert_eq!(output.table.get("n").unwrap().last_line, Some(3));
        assert_eq!(output.table.get("d").unwrap().value, SymbolValue::Double(7.9));
    }

    #[test]
    fn test_expression_residual() {
        let (output, _) = build("a : integer ;\nb : double ;\nb := a * 2.5 + ( 1 ) ;");
        assert_eq!(
            output.table.get("b").unwrap().value,
            SymbolValue::Expression("a*2.5+(1)".to_string())
        );
        assert_eq!(output.table.get("a").unwrap().last_line, Some(3));
    }

    #[test]
    fn test_undeclared_assignment() {
        let (output, tokens) = build("x := 5 ; output << \"Hello\" ;");
        assert_eq!(kinds(&output.diagnostics), vec![ErrorKind::UndeclaredVariableError]);
        assert_eq!(output.diagnostics[0].line, 1);
        assert_eq!(output.diagnostics[0].column, 1);
        assert!(!output.table.contains("x"));

        let finalized = finalize_tokens(&tokens, &output.table);
        assert!(finalized[0].is_error());
        assert!(finalized[0].downgraded);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_unresolved_reference_reported_once() {
        let (output, tokens) = build("output << y ;\ny := y + 1 ;\noutput << y ;");
        assert_eq!(
            kinds(&output.diagnostics),
            vec![ErrorKind::UndeclaredVariableError]
        );
        assert_eq!(output.diagnostics[0].line, 2);

        let finalized = finalize_tokens(&tokens, &output.table);
        assert!(finalized
            .iter()
            .filter(|t| t.lexeme == "y")
            .all(|t| t.kind == TokenKind::Error && t.downgraded));
    }

    #[test]
    fn test_reference_only_identifier_reported_at_first_sighting() {
        let (output, _) = build("\noutput << z ;");
        assert_eq!(kinds(&output.diagnostics), vec![ErrorKind::UndeclaredVariableError]);
        assert_eq!(output.diagnostics[0].line, 2);
        assert_eq!(output.diagnostics[0].column, 11);
    }

    #[test]
    fn test_unresolved_reporting_follows_preferences() {
        let lexical = analyze("output << z ;", &mut NullSink).unwrap();
        let mut sink = NullSink;
        let preferences = SymbolPreferences {
            report_unresolved_references: false,
            ..Default::default()
        };
        let output = SymbolTableBuilder::with_preferences(preferences, &mut sink)
            .build(&lexical.tokens, &lexical.atom_lines)
            .unwrap();
        assert!(output.diagnostics.is_empty());
        assert!(output.table.is_empty());
    }

    #[test]
    fn test_redeclaration_cites_original_line() {
        let (output, _) = build("x : integer ;\nx : double ;");
        assert_eq!(kinds(&output.diagnostics), vec![ErrorKind::RedeclarationError]);
        assert_eq!(output.diagnostics[0].line, 2);
        assert!(output.diagnostics[0].message.contains("line 1"));
        assert_eq!(output.table.get("x").unwrap().data_type, Some(DataType::Integer));
    }

    #[test]
    fn test_string_literal_for_numeric_type() {
        let (output, _) = build("x : integer ;\nx := \"five\" ;");
        assert_eq!(kinds(&output.diagnostics), vec![ErrorKind::InvalidLiteralForType]);
        assert_eq!(output.diagnostics[0].text, "\"five\"");
        assert_eq!(output.diagnostics[0].column, 6);
        assert_eq!(output.table.get("x").unwrap().value, SymbolValue::Null);
    }

    #[test]
    fn test_bad_type_word_reported_once_at_type_word() {
        let (output, tokens) = build("x : string ;\noutput << x ;");
        assert!(!output.table.contains("x"));
        assert!(!output.table.contains("string"));

        assert_eq!(kinds(&output.diagnostics), vec![ErrorKind::UndeclaredVariableError]);
        let diagnostic = &output.diagnostics[0];
        assert_eq!(diagnostic.line, 1);
        assert_eq!(diagnostic.text, "string");
        assert_eq!(diagnostic.column, 5);
        assert!(diagnostic.message.contains("not a valid type"));

        let finalized = finalize_tokens(&tokens, &output.table);
        assert!(finalized
            .iter()
            .filter(|t| t.lexeme == "x" || t.lexeme == "string")
            .all(|t| t.kind == TokenKind::Error && t.downgraded));
    }

    #[test]
    fn test_missing_type_word_reported_at_name() {
        let (output, _) = build("x : ;");
        assert_eq!(kinds(&output.diagnostics), vec![ErrorKind::UndeclaredVariableError]);
        assert_eq!(output.diagnostics[0].text, "x");
        assert_eq!(output.diagnostics[0].column, 1);
    }

    #[test]
    fn test_out_of_range_integer_literal() {
        let (output, _) = build("n : integer ;\nn := 4 ;\nn := 99999999999999999999 ;");
        assert_eq!(kinds(&output.diagnostics), vec![ErrorKind::InvalidLiteralForType]);
        assert_eq!(output.diagnostics[0].line, 3);
        assert_eq!(output.diagnostics[0].column, 6);

        let entry = output.table.get("n").unwrap();
        assert_eq!(entry.value, SymbolValue::Integer(4));
        assert_eq!(entry.last_line, Some(3));
    }

    #[test]
    fn test_large_literal_fits_double_entry() {
        let (output, _) = build("d : double ;\nd := 99999999999999999999 ;");
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.table.get("d").unwrap().value, SymbolValue::Double(1e20));
    }

    #[test]
    fn test_reference_lines_not_tracked_when_disabled() {
        let source = "x : integer ;\nx := 5 ;\noutput << x ;\nif ( x >= 1 ) output << x ;";
        let lexical = analyze(source, &mut NullSink).unwrap();
        let mut sink = NullSink;
        let preferences = SymbolPreferences {
            track_reference_lines: false,
            ..Default::default()
        };
        let output = SymbolTableBuilder::with_preferences(preferences, &mut sink)
            .build(&lexical.tokens, &lexical.atom_lines)
            .unwrap();

        assert!(output.diagnostics.is_empty());
        let entry = output.table.get("x").unwrap();
        assert_eq!(entry.first_line, Some(1));
        assert_eq!(entry.last_line, Some(2));

        let (tracked, _) = build(source);
        assert_eq!(tracked.table.get("x").unwrap().last_line, Some(4));
    }

    #[test]
    fn test_if_statement_references() {
        let (output, _) = build("x : integer ;\nx := 5 ;\n\nif ( x >= 5 ) output << x ;");
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.table.get("x").unwrap().last_line, Some(4));
    }

    #[test]
    fn test_free_function_reports_to_sink() {
        let lexical = analyze("q := 1 ;", &mut NullSink).unwrap();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let table = build_symbol_table(&lexical.tokens, &lexical.atom_lines, &mut sink).unwrap();
        assert!(table.is_empty());
        assert_matches!(sink.as_slice(), [d] if d.kind == ErrorKind::UndeclaredVariableError);
    }
}
