//! Tao syntax: tokens, the typed syntax tree, and the parser.
//!
//! Parsing is total. [`parse`] always yields a [`SyntaxTree`] rooted at a
//! `File` node together with every lexical and syntactic problem it found.

mod lexer;
mod parser;
mod tree;

pub use lexer::{LexError, Token, TokenKind, tokenize};
pub use parser::{Parse, ParseError, ParseErrorKind, parse};
pub use tree::{
    Argument, DeclKind, Declaration, Ident, Injection, LiteralKind, NodeData, NodeId, Parameter,
    ReferenceRef, ReferenceSite, SyntaxNode, SyntaxTree, TaoFile, TopLevelStatement, UiStatement,
    UseStatement, ViewBody, ViewRender, Visibility, VisibilityMarked,
};
