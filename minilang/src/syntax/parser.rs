//! LL(1) recursive-descent parser over finalized tokens
//!
//! One token of lookahead decides every branch except the start of a
//! declaration, which also peeks for the `:` after the identifier.
//! Identifiers downgraded for being undeclared are accepted wherever an
//! identifier is expected.

use crate::config::constants::compile_time::syntax::*;
use crate::config::runtime::ParserPreferences;
use crate::syntax::ast::{NodeLabel, ParseNode};
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenKind, TokenStream};
use crate::{log_debug, log_error, log_success};

pub struct Parser {
    tokens: TokenStream,
    preferences: ParserPreferences,
    context_stack: Vec<&'static str>,
    parse_depth: usize,
    max_depth_reached: usize,
}

impl Parser {
    pub fn new(tokens: TokenStream) -> Self {
        Self::with_preferences(tokens, ParserPreferences::default())
    }

    pub fn with_preferences(tokens: TokenStream, preferences: ParserPreferences) -> Self {
        log_debug!("Creating parser", "tokens" => tokens.len());

        Self {
            tokens,
            preferences,
            context_stack: Vec::new(),
            parse_depth: 0,
            max_depth_reached: 0,
        }
    }

    /// Parse the whole stream as a program. Stops at the first mismatch.
    pub fn parse_program(&mut self) -> SyntaxResult<ParseNode> {
        let result = self.rule("program", |parser| {
            let mut program = ParseNode::new(NodeLabel::Program);
            program.push_node(parser.parse_declarations()?);
            program.push_node(parser.parse_statements()?);

            if !parser.tokens.is_at_end() {
                return Err(parser.unexpected("statement or EOF"));
            }
            Ok(program)
        });

        match &result {
            Ok(program) => {
                log_success!(
                    crate::logging::codes::success::PARSE_TREE_COMPLETE,
                    "Parse tree complete",
                    "declarations" => program.count_label(NodeLabel::Declaration),
                    "statements" => program.count_label(NodeLabel::Statement),
                    "max_depth" => self.max_depth_reached
                );
                if self.preferences.log_parse_tree {
                    log_debug!("Parse tree", "tree" => program.render());
                }
            }
            Err(error) => {
                log_error!(error.error_code(), "Parsing failed",
                    span = error.span(),
                    "error" => error.to_string(),
                    "context" => self.context_path()
                );
            }
        }

        result
    }

    /// Rule names active at the point of the last failure, outermost first
    pub fn context_path(&self) -> String {
        self.context_stack.join(" > ")
    }

    pub fn max_depth_reached(&self) -> usize {
        self.max_depth_reached
    }

    pub fn position(&self) -> usize {
        self.tokens.position()
    }

    /// Run `body` one level deeper. The context stack is left in place on
    /// failure so `context_path` can report where parsing stopped.
    fn rule<F>(&mut self, name: &'static str, body: F) -> SyntaxResult<ParseNode>
    where
        F: FnOnce(&mut Self) -> SyntaxResult<ParseNode>,
    {
        if self.parse_depth >= MAX_PARSE_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth {
                depth: self.parse_depth + 1,
                span: self.tokens.current().span,
            });
        }

        self.parse_depth += 1;
        self.max_depth_reached = self.max_depth_reached.max(self.parse_depth);
        let tracked =
            self.preferences.track_rule_context && self.context_stack.len() < MAX_CONTEXT_STACK_DEPTH;
        if tracked {
            self.context_stack.push(name);
        }

        let result = body(self);

        if result.is_ok() && tracked {
            self.context_stack.pop();
        }
        self.parse_depth -= 1;
        result
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        self.tokens.unexpected(expected).into()
    }

    fn expect(&mut self, kind: TokenKind) -> SyntaxResult<Token> {
        Ok(self.tokens.expect(kind)?)
    }

    fn starts_declaration(&self) -> bool {
        self.tokens.check_identifier() && self.tokens.peek().kind == TokenKind::OpColon
    }

    fn starts_statement(&self) -> bool {
        self.tokens.check_identifier()
            || self.tokens.check(TokenKind::KeywordOutput)
            || self.tokens.check(TokenKind::KeywordIf)
    }

    fn parse_declarations(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("declarations", |parser| {
            let mut node = ParseNode::new(NodeLabel::Declarations);
            while parser.starts_declaration() {
                node.push_node(parser.parse_declaration()?);
            }
            Ok(node)
        })
    }

    fn parse_declaration(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("declaration", |parser| {
            let mut node = ParseNode::new(NodeLabel::Declaration);
            node.push_token(parser.tokens.expect_identifier()?);
            node.push_token(parser.expect(TokenKind::OpColon)?);
            node.push_node(parser.parse_type()?);
            node.push_token(parser.expect(TokenKind::Endline)?);
            Ok(node)
        })
    }

    fn parse_type(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("type", |parser| {
            if !parser.tokens.current_kind().is_type_keyword() {
                return Err(parser.unexpected("KEYWORD_INT or KEYWORD_DOUBLE"));
            }
            let mut node = ParseNode::new(NodeLabel::Type);
            node.push_token(parser.tokens.advance());
            Ok(node)
        })
    }

    fn parse_statements(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("statements", |parser| {
            let mut node = ParseNode::new(NodeLabel::Statements);
            while parser.starts_statement() {
                node.push_node(parser.parse_statement()?);
            }
            Ok(node)
        })
    }

    fn parse_statement(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("statement", |parser| {
            let inner = if parser.tokens.check_identifier() {
                parser.parse_assignment()?
            } else if parser.tokens.check(TokenKind::KeywordOutput) {
                parser.parse_output()?
            } else if parser.tokens.check(TokenKind::KeywordIf) {
                parser.parse_if()?
            } else {
                return Err(parser.unexpected("statement"));
            };

            let mut node = ParseNode::new(NodeLabel::Statement);
            node.push_node(inner);
            Ok(node)
        })
    }

    fn parse_assignment(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("assignment", |parser| {
            let mut node = ParseNode::new(NodeLabel::AssignmentStatement);
            node.push_token(parser.tokens.expect_identifier()?);
            node.push_token(parser.expect(TokenKind::OpAssignment)?);
            node.push_node(parser.parse_expression()?);
            node.push_token(parser.expect(TokenKind::Endline)?);
            Ok(node)
        })
    }

    fn parse_output(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("output", |parser| {
            let mut node = ParseNode::new(NodeLabel::OutputStatement);
            node.push_token(parser.expect(TokenKind::KeywordOutput)?);
            node.push_token(parser.expect(TokenKind::OpLeftShift)?);

            let mut params = ParseNode::new(NodeLabel::OutputParams);
            match parser.tokens.advance_if(TokenKind::LiteralString) {
                Some(string) => params.push_token(string),
                None => params.push_node(parser.parse_expression()?),
            }
            node.push_node(params);

            node.push_token(parser.expect(TokenKind::Endline)?);
            Ok(node)
        })
    }

    fn parse_if(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("if", |parser| {
            let mut node = ParseNode::new(NodeLabel::IfStatement);
            node.push_token(parser.expect(TokenKind::KeywordIf)?);
            node.push_token(parser.expect(TokenKind::DelimiterLeftP)?);
            node.push_node(parser.parse_condition()?);
            node.push_token(parser.expect(TokenKind::DelimiterRightP)?);
            node.push_node(parser.parse_statement()?);
            Ok(node)
        })
    }

    fn parse_condition(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("condition", |parser| {
            let mut node = ParseNode::new(NodeLabel::Condition);
            node.push_node(parser.parse_expression()?);

            if !parser.tokens.current_kind().is_relational_operator() {
                return Err(parser.unexpected("relational operator"));
            }
            let mut op = ParseNode::new(NodeLabel::RelationalOp);
            op.push_token(parser.tokens.advance());
            node.push_node(op);

            node.push_node(parser.parse_expression()?);
            Ok(node)
        })
    }

    fn parse_expression(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("expression", |parser| {
            let mut node = ParseNode::new(NodeLabel::Expression);
            node.push_node(parser.parse_term()?);
            while parser.tokens.current_kind().is_additive_operator() {
                node.push_token(parser.tokens.advance());
                node.push_node(parser.parse_term()?);
            }
            Ok(node)
        })
    }

    fn parse_term(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("term", |parser| {
            let mut node = ParseNode::new(NodeLabel::Term);
            node.push_node(parser.parse_factor()?);
            while parser.tokens.current_kind().is_multiplicative_operator() {
                node.push_token(parser.tokens.advance());
                node.push_node(parser.parse_factor()?);
            }
            Ok(node)
        })
    }

    fn parse_factor(&mut self) -> SyntaxResult<ParseNode> {
        self.rule("factor", |parser| {
            let mut node = ParseNode::new(NodeLabel::Factor);
            let current = parser.tokens.current();
            let (operand, kind) = (current.is_identifier_like(), current.kind);

            if operand || kind.is_numeric_literal() {
                node.push_token(parser.tokens.advance());
            } else if kind == TokenKind::DelimiterLeftP {
                node.push_token(parser.tokens.advance());
                node.push_node(parser.parse_expression()?);
                node.push_token(parser.expect(TokenKind::DelimiterRightP)?);
            } else {
                return Err(parser.unexpected("IDENTIFIER, number or '('"));
            }
            Ok(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::syntax::ast::ParseElement;
    use crate::utils::Span;
    use assert_matches::assert_matches;

    fn finalized(source: &str) -> Vec<Token> {
        let lexical = crate::lexical::analyze(source, &mut NullSink).unwrap();
        let table =
            crate::symbols::build_symbol_table(&lexical.tokens, &lexical.atom_lines, &mut NullSink)
                .unwrap();
        crate::symbols::finalize_tokens(&lexical.tokens, &table)
    }

    fn parse(source: &str) -> SyntaxResult<ParseNode> {
        Parser::new(TokenStream::new(finalized(source))).parse_program()
    }

    #[test]
    fn test_declarations_and_statements() {
        let program = parse("x : integer ; x := 1 + 2 ; output << x ;").unwrap();

        assert_eq!(program.label, NodeLabel::Program);
        assert_eq!(program.count_label(NodeLabel::Declaration), 1);
        assert_eq!(program.count_label(NodeLabel::Statement), 2);
        assert_eq!(program.count_label(NodeLabel::AssignmentStatement), 1);
        assert_eq!(program.count_label(NodeLabel::OutputStatement), 1);
    }

    #[test]
    fn test_if_statement_nests_output() {
        let program = parse("x : integer ; if ( x > 0 ) output << \"pos\" ;").unwrap();

        let statements = program.child(NodeLabel::Statements).unwrap();
        let statement = statements.child(NodeLabel::Statement).unwrap();
        let if_node = statement.child(NodeLabel::IfStatement).unwrap();
        assert!(if_node.child(NodeLabel::Condition).is_some());

        let nested = if_node.child(NodeLabel::Statement).unwrap();
        let output = nested.child(NodeLabel::OutputStatement).unwrap();
        let params = output.child(NodeLabel::OutputParams).unwrap();
        assert_matches!(
            &params.children[0],
            ParseElement::Token(token) if token.kind == TokenKind::LiteralString
        );
    }

    #[test]
    fn test_double_endline_is_syntax_error() {
        let error = parse("x : integer ;;").unwrap_err();
        assert_matches!(
            error,
            SyntaxError::UnexpectedToken { found: TokenKind::Error, ref lexeme, .. } if lexeme == ";;"
        );
    }

    #[test]
    fn test_empty_stream() {
        let program = Parser::new(TokenStream::new(Vec::new()))
            .parse_program()
            .unwrap();
        assert!(program.is_empty_program());
        assert_eq!(program.count_label(NodeLabel::Statement), 0);
    }

    #[test]
    fn test_downgraded_identifier_accepted() {
        let tokens = finalized("y := 3 ;");
        assert!(tokens[0].is_error() && tokens[0].downgraded);

        let program = Parser::new(TokenStream::new(tokens)).parse_program().unwrap();
        assert_eq!(program.count_label(NodeLabel::AssignmentStatement), 1);
    }

    #[test]
    fn test_unary_minus_rejected() {
        let error = parse("x : integer ; x := -5 ;").unwrap_err();
        assert_matches!(
            error,
            SyntaxError::UnexpectedToken { found: TokenKind::OpMinus, .. }
        );
    }

    #[test]
    fn test_condition_requires_relational_operator() {
        let error = parse("x : integer ; if ( x ) output << x ;").unwrap_err();
        assert_matches!(
            error,
            SyntaxError::UnexpectedToken { found: TokenKind::DelimiterRightP, ref expected, .. }
                if expected == "relational operator"
        );
    }

    #[test]
    fn test_declaration_after_statement_rejected() {
        let error = parse("x : integer ; x := 1 ; y : double ;").unwrap_err();
        assert_matches!(error, SyntaxError::UnexpectedToken { found: TokenKind::OpColon, .. });
    }

    #[test]
    fn test_nested_parentheses() {
        let program = parse("x : double ; x := ( ( 1.5 + x ) * 2 ) / 3 ;").unwrap();
        assert_eq!(program.count_label(NodeLabel::Expression), 3);
        assert_eq!(program.count_label(NodeLabel::Factor), 6);
    }

    #[test]
    fn test_depth_limit() {
        let nesting = MAX_PARSE_DEPTH + 5;
        let mut tokens = vec![
            Token::new("x", TokenKind::Identifier, 1, Span::default()),
            Token::new(":=", TokenKind::OpAssignment, 1, Span::default()),
        ];
        for _ in 0..nesting {
            tokens.push(Token::new("(", TokenKind::DelimiterLeftP, 1, Span::default()));
        }
        tokens.push(Token::new("1", TokenKind::LiteralInteger, 1, Span::default()));
        for _ in 0..nesting {
            tokens.push(Token::new(")", TokenKind::DelimiterRightP, 1, Span::default()));
        }
        tokens.push(Token::new(";", TokenKind::Endline, 1, Span::default()));

        let mut parser = Parser::new(TokenStream::new(tokens));
        assert_matches!(
            parser.parse_program(),
            Err(SyntaxError::MaxRecursionDepth { .. })
        );
        assert_eq!(parser.max_depth_reached(), MAX_PARSE_DEPTH);
    }

    #[test]
    fn test_context_path_on_failure() {
        let tokens = finalized("x : integer ; output << ;");
        let mut parser = Parser::with_preferences(
            TokenStream::new(tokens),
            ParserPreferences {
                track_rule_context: true,
                log_parse_tree: false,
            },
        );
        assert!(parser.parse_program().is_err());
        assert!(parser.context_path().starts_with("program > statements > statement > output"));
        assert!(parser.context_path().ends_with("factor"));
    }
}
