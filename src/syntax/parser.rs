//! Recursive-descent parser producing a [`SyntaxTree`].
//!
//! The parser never gives up: every problem is recorded as a [`ParseError`]
//! and parsing resumes at the next statement boundary. Declarations with a
//! missing name still produce a node (with `name: None`) so later phases see
//! the shape of the file.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::lexer::{Token, TokenKind, tokenize};
use super::tree::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    Lexical,
    Syntax,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub range: TextRange,
    pub message: String,
}

/// Result of parsing one document.
#[derive(Clone, Debug)]
pub struct Parse {
    pub tree: SyntaxTree,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse Tao source text.
pub fn parse(text: &str) -> Parse {
    let (tokens, lex_errors) = tokenize(text);
    let errors = lex_errors
        .into_iter()
        .map(|e| ParseError {
            kind: ParseErrorKind::Lexical,
            range: e.range,
            message: format!(
                "unexpected character: ->{}<- at offset: {}",
                e.text,
                u32::from(e.range.start())
            ),
        })
        .collect();

    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
        prev_end: TextSize::from(0),
        tree: SyntaxTree::empty(),
        errors,
    };
    parser.file();

    Parse {
        tree: parser.tree,
        errors: parser.errors,
    }
}

struct Parser<'t> {
    text: &'t str,
    tokens: Vec<Token>,
    pos: usize,
    prev_end: TextSize,
    tree: SyntaxTree,
    errors: Vec<ParseError>,
}

impl Parser<'_> {
    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.nth_kind(0) == Some(kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        self.prev_end = token.range.end();
        Some(token)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) { self.bump() } else { None }
    }

    fn slice(&self, range: TextRange) -> &str {
        &self.text[range]
    }

    fn found(&self) -> &'static str {
        self.nth_kind(0).map_or("end of file", TokenKind::describe)
    }

    fn error(&mut self, message: String) {
        let range = self
            .peek()
            .map_or(TextRange::empty(self.prev_end), |t| t.range);
        self.errors.push(ParseError {
            kind: ParseErrorKind::Syntax,
            range,
            message,
        });
    }

    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind).is_some() {
            return true;
        }
        let message = format!("expected {}, found {}", kind.describe(), self.found());
        self.error(message);
        false
    }

    fn ident(&mut self) -> Option<Ident> {
        let token = self.eat(TokenKind::Ident)?;
        Some(Ident {
            text: SmolStr::new(self.slice(token.range)),
            range: token.range,
        })
    }

    fn expect_ident(&mut self, what: &str) -> Option<Ident> {
        let ident = self.ident();
        if ident.is_none() {
            let message = format!("expected {what}, found {}", self.found());
            self.error(message);
        }
        ident
    }

    fn span_from(&self, start: TextSize) -> TextRange {
        TextRange::new(start, self.prev_end.max(start))
    }

    fn recover_to_top_level(&mut self) {
        while let Some(token) = self.peek() {
            if token.kind.starts_top_level() {
                break;
            }
            self.bump();
        }
    }

    // ------------------------------------------------------------------
    // Grammar
    // ------------------------------------------------------------------

    fn file(&mut self) {
        let full = TextRange::up_to(TextSize::of(self.text));
        let root = self.tree.alloc(None, SyntaxNode::File(TaoFile { statements: Vec::new() }), full);
        self.tree.set_root(root);

        let mut statements = Vec::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::KwUse => statements.push(self.use_statement(root)),
                TokenKind::KwShare | TokenKind::KwFile => statements.push(self.visibility_marked(root, token)),
                TokenKind::KwApp | TokenKind::KwView => statements.push(self.declaration(root, token)),
                TokenKind::KwInject => statements.push(self.injection(root, token)),
                _ => {
                    let message = format!("expected a top-level statement, found {}", self.found());
                    self.error(message);
                    self.bump();
                    self.recover_to_top_level();
                }
            }
        }

        self.tree.finish(root, SyntaxNode::File(TaoFile { statements }), full);
    }

    fn use_statement(&mut self, parent: NodeId) -> NodeId {
        let start = self.bump().map_or(self.prev_end, |t| t.range.start());
        let placeholder = SyntaxNode::Use(UseStatement {
            module_path: None,
            imported_names: Vec::new(),
        });
        let id = self.tree.alloc(Some(parent), placeholder, TextRange::empty(start));

        let module_path = match self.eat(TokenKind::ModulePath) {
            Some(token) => Some(Ident {
                text: SmolStr::new(self.slice(token.range)),
                range: token.range,
            }),
            None => {
                let message = format!(
                    "expected a module path starting with './' or '../', found {}",
                    self.found()
                );
                self.error(message);
                None
            }
        };

        let mut imported_names = Vec::new();
        if module_path.is_some() {
            if let Some(first) = self.expect_ident("an imported name") {
                imported_names.push(first);
                while self.eat(TokenKind::Comma).is_some() {
                    match self.expect_ident("an imported name after ','") {
                        Some(name) => imported_names.push(name),
                        None => break,
                    }
                }
            }
        }

        let stmt = UseStatement {
            module_path,
            imported_names,
        };
        self.tree.finish(id, SyntaxNode::Use(stmt), self.span_from(start));
        id
    }

    /// `keyword` is the current token.
    fn visibility_marked(&mut self, parent: NodeId, keyword: Token) -> NodeId {
        self.bump();
        let visibility = match keyword.kind {
            TokenKind::KwShare => Visibility::Share,
            _ => Visibility::File,
        };
        let start = keyword.range.start();
        let placeholder = SyntaxNode::VisibilityMarked(VisibilityMarked {
            visibility,
            declaration: None,
        });
        let id = self.tree.alloc(Some(parent), placeholder, keyword.range);

        let declaration = match self.peek() {
            Some(token) if matches!(token.kind, TokenKind::KwApp | TokenKind::KwView) => {
                Some(self.declaration(id, token))
            }
            _ => {
                let message = format!(
                    "expected 'app' or 'view' after '{}', found {}",
                    self.slice(keyword.range),
                    self.found()
                );
                self.error(message);
                None
            }
        };

        let marked = VisibilityMarked {
            visibility,
            declaration,
        };
        self.tree
            .finish(id, SyntaxNode::VisibilityMarked(marked), self.span_from(start));
        id
    }

    fn declaration(&mut self, parent: NodeId, keyword: Token) -> NodeId {
        self.bump();
        let kind = match keyword.kind {
            TokenKind::KwApp => DeclKind::App,
            _ => DeclKind::View,
        };
        let start = keyword.range.start();
        let placeholder = SyntaxNode::Declaration(Declaration {
            kind,
            name: None,
            parameters: Vec::new(),
            statements: Vec::new(),
        });
        let id = self.tree.alloc(Some(parent), placeholder, keyword.range);

        let name = self.expect_ident(&format!("a name after '{}'", kind.keyword()));
        let parameters = match kind {
            DeclKind::View => self.parameters(),
            DeclKind::App => Vec::new(),
        };

        let mut statements = Vec::new();
        if self.expect(TokenKind::LBrace) {
            statements = match kind {
                DeclKind::App => self.app_statements(id),
                DeclKind::View => self.view_statements(id),
            };
            self.expect(TokenKind::RBrace);
        }

        let decl = Declaration {
            kind,
            name,
            parameters,
            statements,
        };
        self.tree
            .finish(id, SyntaxNode::Declaration(decl), self.span_from(start));
        id
    }

    fn parameters(&mut self) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        while let Some(key) = self.ident() {
            match self.expect_ident("a parameter type") {
                Some(ty) => parameters.push(Parameter { key, ty }),
                None => break,
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        parameters
    }

    fn app_statements(&mut self, parent: NodeId) -> Vec<NodeId> {
        let mut statements = Vec::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::RBrace => break,
                TokenKind::KwUi => {
                    self.bump();
                    let target = self.expect_ident("a view name after 'ui'");
                    let range = self.span_from(token.range.start());
                    let ui = SyntaxNode::Ui(UiStatement { target });
                    statements.push(self.tree.alloc(Some(parent), ui, range));
                }
                _ if token.kind.starts_top_level() => break,
                _ => {
                    let message = format!("expected 'ui' in app body, found {}", self.found());
                    self.error(message);
                    self.bump();
                }
            }
        }
        statements
    }

    fn view_statements(&mut self, parent: NodeId) -> Vec<NodeId> {
        let mut statements = Vec::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::RBrace => break,
                TokenKind::KwInject => statements.push(self.injection(parent, token)),
                TokenKind::KwView => statements.push(self.declaration(parent, token)),
                TokenKind::Ident => statements.push(self.render(parent, token)),
                TokenKind::KwUse | TokenKind::KwShare | TokenKind::KwFile | TokenKind::KwApp => break,
                _ => {
                    let message = format!("unexpected {} in view body", self.found());
                    self.error(message);
                    self.bump();
                }
            }
        }
        statements
    }

    fn render(&mut self, parent: NodeId, name: Token) -> NodeId {
        self.bump();
        let view = Ident {
            text: SmolStr::new(self.slice(name.range)),
            range: name.range,
        };
        let start = view.range.start();
        let placeholder = SyntaxNode::Render(ViewRender {
            view: view.clone(),
            args: Vec::new(),
            body: None,
        });
        let id = self.tree.alloc(Some(parent), placeholder, view.range);

        let mut args = Vec::new();
        while let (Some(key), Some(value)) = (self.peek(), self.tokens.get(self.pos + 1).copied()) {
            if key.kind != TokenKind::Ident || !matches!(value.kind, TokenKind::String | TokenKind::Number) {
                break;
            }
            self.bump();
            self.bump();
            let key = Ident {
                text: SmolStr::new(self.slice(key.range)),
                range: key.range,
            };
            let kind = match value.kind {
                TokenKind::Number => LiteralKind::Number,
                _ => LiteralKind::String,
            };
            args.push(Argument {
                key,
                kind,
                value: SmolStr::new(self.slice(value.range)),
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        let body = match self.peek() {
            Some(open) if open.kind == TokenKind::LBrace => Some(self.view_body(id, open)),
            _ => None,
        };

        let render = ViewRender { view, args, body };
        self.tree
            .finish(id, SyntaxNode::Render(render), self.span_from(start));
        id
    }

    fn view_body(&mut self, parent: NodeId, open: Token) -> NodeId {
        self.bump();
        let id = self
            .tree
            .alloc(Some(parent), SyntaxNode::Body(ViewBody::default()), open.range);
        let statements = self.view_statements(id);
        self.expect(TokenKind::RBrace);
        self.tree.finish(
            id,
            SyntaxNode::Body(ViewBody { statements }),
            self.span_from(open.range.start()),
        );
        id
    }

    fn injection(&mut self, parent: NodeId, keyword: Token) -> NodeId {
        self.bump();
        let code = match self.eat(TokenKind::CodeBlock) {
            Some(token) => SmolStr::new(self.slice(token.range)),
            None => {
                let message = format!("expected a code block after 'inject', found {}", self.found());
                self.error(message);
                SmolStr::default()
            }
        };
        let range = self.span_from(keyword.range.start());
        self.tree
            .alloc(Some(parent), SyntaxNode::Injection(Injection { code }), range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(text: &str) -> SyntaxTree {
        let parse = parse(text);
        assert!(parse.errors.is_empty(), "unexpected errors: {:?}", parse.errors);
        parse.tree
    }

    fn decl_names(tree: &SyntaxTree) -> Vec<Option<String>> {
        tree.top_level()
            .filter_map(|stmt| match stmt {
                TopLevelStatement::Declaration(_, decl) => Some(decl),
                TopLevelStatement::VisibilityWrapper { declaration, .. } => declaration.map(|(_, d)| d),
                _ => None,
            })
            .map(|d| d.name_text().map(str::to_owned))
            .collect()
    }

    #[test]
    fn test_basic_app() {
        let tree = parse_ok("app MyApp { ui MyView } view MyView { } view Text {}");
        assert_eq!(
            decl_names(&tree),
            vec![Some("MyApp".into()), Some("MyView".into()), Some("Text".into())]
        );
        let refs: Vec<_> = tree.references().map(|r| (r.name.text.to_string(), r.site)).collect();
        assert_eq!(refs, vec![("MyView".to_string(), ReferenceSite::AppUi)]);
    }

    #[test]
    fn test_use_statements() {
        let tree = parse_ok("use ./ui/views PublicView\nuse ./ui/components Button, Input\nview MyView { }");
        let uses: Vec<_> = tree.use_statements().map(|(_, u)| u.clone()).collect();
        assert_eq!(uses.len(), 2);
        assert_eq!(uses[0].module_path_text(), "./ui/views");
        assert_eq!(uses[1].module_path_text(), "./ui/components");
        let names: Vec<_> = uses[1].imported_names.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(names, vec!["Button", "Input"]);
    }

    #[test]
    fn test_view_with_parameters_args_and_injection() {
        let tree = parse_ok(
            r#"
            view RootView { Text value "hi", size 12 {} }
            view Text value string, size number {
                inject ```ts return <RN.Text>{props.value}</RN.Text> ```
            }
            "#,
        );
        let text_view = tree
            .top_level()
            .find_map(|s| match s {
                TopLevelStatement::Declaration(_, d) if d.name_text() == Some("Text") => Some(d),
                _ => None,
            })
            .unwrap();
        assert_eq!(text_view.parameters.len(), 2);
        assert_eq!(text_view.parameters[1].ty.text, "number");
        assert!(matches!(tree.node(text_view.statements[0]), SyntaxNode::Injection(_)));

        let render = tree
            .references()
            .find(|r| r.name.text == "Text")
            .map(|r| tree.node(r.container))
            .unwrap();
        match render {
            SyntaxNode::Render(render) => {
                assert_eq!(render.args.len(), 2);
                assert_eq!(render.args[0].value, "\"hi\"");
                assert_eq!(render.args[1].kind, LiteralKind::Number);
                assert!(render.body.is_some());
            }
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn test_consecutive_renders_are_separate_statements() {
        let tree = parse_ok("view Form {\n  Label\n  Input\n  Button { }\n}");
        let names: Vec<_> = tree.references().map(|r| r.name.text.to_string()).collect();
        assert_eq!(names, vec!["Label", "Input", "Button"]);
    }

    #[test]
    fn test_nested_declaration_in_body() {
        let tree = parse_ok("view Main { Wrapper { view Foo { } Foo } }");
        let nested = tree
            .references()
            .find(|r| r.name.text == "Foo")
            .and_then(|r| tree.parent(r.container))
            .unwrap();
        assert!(matches!(tree.node(nested), SyntaxNode::Body(_)));
    }

    #[test]
    fn test_missing_name_still_produces_declaration() {
        let parse = parse("view { } view Ok { }");
        assert_eq!(parse.errors.len(), 1);
        assert!(parse.errors[0].message.contains("expected a name after 'view'"));
        assert_eq!(decl_names(&parse.tree), vec![None, Some("Ok".into())]);
    }

    #[test]
    fn test_invalid_use_path_does_not_crash() {
        let parse = parse("use app/ui");
        assert!(parse.has_errors());
        assert!(parse.errors.iter().any(|e| e.kind == ParseErrorKind::Lexical));
        assert!(parse.errors.iter().any(|e| e.kind == ParseErrorKind::Syntax));
    }

    #[test]
    fn test_recovers_after_garbage() {
        let parse = parse("42 \"x\" share view A { } , view B { }");
        assert_eq!(decl_names(&parse.tree), vec![Some("A".into()), Some("B".into())]);
        assert_eq!(parse.errors.len(), 2);
    }

    #[test]
    fn test_truncated_input_inside_render() {
        for text in ["view A { Button", "view A { Button label", "view A { Button label 'x',", "share", "view A { Card {"] {
            let parse = parse(text);
            assert!(!parse.errors.is_empty(), "no error for {text:?}");
            assert!(parse.tree.root().is_some());
        }
    }

    #[test]
    fn test_unclosed_view_reports_error() {
        let parse = parse("view A { Child");
        assert_eq!(parse.errors.len(), 1);
        assert!(parse.errors[0].message.contains("expected '}'"));
        assert_eq!(parse.tree.references().count(), 1);
    }

    #[test]
    fn test_use_statement_roundtrip() {
        let original = "use ../../shared/components Button, Input, Button";
        let first = parse_ok(original);
        let (_, stmt) = first.use_statements().next().unwrap();
        let reparsed = parse_ok(&stmt.to_string());
        let (_, again) = reparsed.use_statements().next().unwrap();
        assert_eq!(again.module_path_text(), stmt.module_path_text());
        let a: Vec<_> = stmt.imported_names.iter().map(|n| &n.text).collect();
        let b: Vec<_> = again.imported_names.iter().map(|n| &n.text).collect();
        assert_eq!(a, b);
    }
}
