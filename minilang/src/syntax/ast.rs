//! Labeled parse tree

use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    Program,
    Declarations,
    Declaration,
    Type,
    Statements,
    Statement,
    AssignmentStatement,
    OutputStatement,
    OutputParams,
    IfStatement,
    Condition,
    RelationalOp,
    Expression,
    Term,
    Factor,
}

impl NodeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Program => "Program",
            NodeLabel::Declarations => "Declarations",
            NodeLabel::Declaration => "Declaration",
            NodeLabel::Type => "Type",
            NodeLabel::Statements => "Statements",
            NodeLabel::Statement => "Statement",
            NodeLabel::AssignmentStatement => "AssignmentStatement",
            NodeLabel::OutputStatement => "OutputStatement",
            NodeLabel::OutputParams => "OutputParams",
            NodeLabel::IfStatement => "IfStatement",
            NodeLabel::Condition => "Condition",
            NodeLabel::RelationalOp => "RelationalOp",
            NodeLabel::Expression => "Expression",
            NodeLabel::Term => "Term",
            NodeLabel::Factor => "Factor",
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParseElement {
    Token(Token),
    Node(ParseNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseNode {
    pub label: NodeLabel,
    pub children: Vec<ParseElement>,
}

impl ParseNode {
    pub fn new(label: NodeLabel) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }

    pub fn push_token(&mut self, token: Token) {
        self.children.push(ParseElement::Token(token));
    }

    pub fn push_node(&mut self, node: ParseNode) {
        self.children.push(ParseElement::Node(node));
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &ParseNode> {
        self.children.iter().filter_map(|child| match child {
            ParseElement::Node(node) => Some(node),
            ParseElement::Token(_) => None,
        })
    }

    /// First direct child node with `label`
    pub fn child(&self, label: NodeLabel) -> Option<&ParseNode> {
        self.child_nodes().find(|node| node.label == label)
    }

    /// Nodes with `label` anywhere below and including this one
    pub fn count_label(&self, label: NodeLabel) -> usize {
        let own = usize::from(self.label == label);
        own + self
            .child_nodes()
            .map(|node| node.count_label(label))
            .sum::<usize>()
    }

    /// A program whose declaration and statement lists are both empty
    pub fn is_empty_program(&self) -> bool {
        self.label == NodeLabel::Program
            && self.child_nodes().all(|node| node.children.is_empty())
    }

    /// Leaf tokens in source order
    pub fn leaves(&self) -> Vec<&Token> {
        let mut leaves = Vec::new();
        let mut stack: Vec<&ParseElement> = self.children.iter().rev().collect();
        while let Some(element) = stack.pop() {
            match element {
                ParseElement::Token(token) => leaves.push(token),
                ParseElement::Node(node) => stack.extend(node.children.iter().rev()),
            }
        }
        leaves
    }

    /// Indented rendering, two spaces per level
    pub fn render(&self) -> String {
        let mut output = String::new();
        self.render_into(&mut output, 0);
        output
    }

    fn render_into(&self, output: &mut String, depth: usize) {
        output.push_str(&format!("{}{}\n", "  ".repeat(depth), self.label));
        for child in &self.children {
            match child {
                ParseElement::Node(node) => node.render_into(output, depth + 1),
                ParseElement::Token(token) => output.push_str(&format!(
                    "{}{} '{}'\n",
                    "  ".repeat(depth + 1),
                    token.kind,
                    token.lexeme
                )),
            }
        }
    }
}
