//! Tokenizer for Tao source text.

use logos::Logos;
use text_size::{TextRange, TextSize};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"([ \t\r\n\f]+|//[^\n]*|/\*([^*]|\*+[^*/])*\*+/)")]
pub enum TokenKind {
    #[token("app")]
    KwApp,
    #[token("view")]
    KwView,
    #[token("ui")]
    KwUi,
    #[token("use")]
    KwUse,
    #[token("share")]
    KwShare,
    #[token("file")]
    KwFile,
    #[token("inject")]
    KwInject,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    /// `./ui/views`, `../shared`, `..`
    #[regex(r"\.\.?(/[A-Za-z0-9_\-.]*)*")]
    ModulePath,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex(r"```[A-Za-z]*([^`]|`[^`]|``[^`])*```")]
    CodeBlock,
}

impl TokenKind {
    /// Keywords that can start a top-level statement; used for error recovery.
    pub fn starts_top_level(self) -> bool {
        matches!(
            self,
            TokenKind::KwApp
                | TokenKind::KwView
                | TokenKind::KwUse
                | TokenKind::KwShare
                | TokenKind::KwFile
                | TokenKind::KwInject
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::KwApp => "'app'",
            TokenKind::KwView => "'view'",
            TokenKind::KwUi => "'ui'",
            TokenKind::KwUse => "'use'",
            TokenKind::KwShare => "'share'",
            TokenKind::KwFile => "'file'",
            TokenKind::KwInject => "'inject'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Ident => "identifier",
            TokenKind::ModulePath => "module path",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::CodeBlock => "code block",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

/// A character sequence the lexer could not turn into a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub range: TextRange,
    pub text: String,
}

/// Tokenize `text`, collecting unrecognized input instead of stopping at it.
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = TokenKind::lexer(text);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        match result {
            Ok(kind) => tokens.push(Token { kind, range }),
            Err(()) => errors.push(LexError {
                range,
                text: lexer.slice().to_owned(),
            }),
        }
    }

    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let (tokens, errors) = tokenize(text);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("share view Button _foo bar123"),
            vec![
                TokenKind::KwShare,
                TokenKind::KwView,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("views filed"), vec![TokenKind::Ident, TokenKind::Ident]);
    }

    #[test]
    fn test_use_statement_tokens() {
        assert_eq!(
            kinds("use ../../shared/components Button, Input"),
            vec![
                TokenKind::KwUse,
                TokenKind::ModulePath,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
            ]
        );
        assert_eq!(kinds("use ../ A"), vec![TokenKind::KwUse, TokenKind::ModulePath, TokenKind::Ident]);
        assert_eq!(kinds("use .. A"), vec![TokenKind::KwUse, TokenKind::ModulePath, TokenKind::Ident]);
    }

    #[test]
    fn test_literals_and_comments() {
        assert_eq!(
            kinds("Text value \"hi \\\"there\\\"\" // trailing\n/* block\n comment */ 42 'x'"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::String,
                TokenKind::Number,
                TokenKind::String,
            ]
        );
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            kinds("inject ```ts\nreturn <RN.Text>{props.value}</RN.Text>\n```"),
            vec![TokenKind::KwInject, TokenKind::CodeBlock]
        );
    }

    #[test]
    fn test_unknown_characters_are_reported() {
        let (tokens, errors) = tokenize("view @ A");
        assert_eq!(tokens.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, "@");
        assert_eq!(errors[0].range, TextRange::new(5.into(), 6.into()));
    }
}
