//! Character-class dispatch tokenizer
//!
//! [`Lexer`] owns the source text and a single moving [`Position`]. Each turn
//! of the main loop looks the current character up in [`DISPATCH`] and hands
//! control to the matching scan function, which consumes one lexeme and
//! returns its token (or nothing, for skipped input).

use super::analyzer::LexerError;
use crate::config::compile_time::lexical::{
    MAX_COMMENT_LENGTH, MAX_IDENTIFIER_LENGTH, MAX_STRING_SIZE, MAX_TOKEN_COUNT,
};
use crate::tokens::{classify_operator_symbol, classify_word, is_operator_start, Token, TokenKind};
use crate::utils::{Position, SourceFile, Span};

type ScanFn = fn(&mut Lexer) -> Result<Option<Token>, LexerError>;

/// Character classes in priority order. The first predicate that accepts the
/// current character decides the scan function.
const DISPATCH: &[(fn(char) -> bool, ScanFn)] = &[
    (is_whitespace, Lexer::skip_whitespace),
    (is_comment_start, Lexer::skip_comment),
    (is_number_start, Lexer::scan_number),
    (is_string_start, Lexer::scan_string),
    (is_identifier_start, Lexer::scan_word),
    (is_operator_start, Lexer::scan_operator),
];

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_comment_start(ch: char) -> bool {
    ch == '#'
}

fn is_number_start(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.'
}

fn is_string_start(ch: char) -> bool {
    ch == '"'
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        other => other,
    }
}

pub struct Lexer {
    chars: Vec<char>,
    pos: Position,
    current: Option<char>,
    permissive_strings: bool,
}

impl Lexer {
    pub fn new(filename: &str, text: &str) -> Self {
        let source = SourceFile::new(filename, text);
        let mut lexer = Self {
            chars: text.chars().collect(),
            pos: Position::new(source),
            current: None,
            permissive_strings: false,
        };
        lexer.advance();
        lexer
    }

    /// Accept strings cut off by end of input instead of failing
    pub fn permissive_strings(mut self, permissive: bool) -> Self {
        self.permissive_strings = permissive;
        self
    }

    fn advance(&mut self) {
        self.pos.advance(self.current);
        self.current = usize::try_from(self.pos.index)
            .ok()
            .and_then(|i| self.chars.get(i).copied());
    }

    /// Tokenize the whole input.
    ///
    /// On success the sequence ends with exactly one `EndOfFile` token whose
    /// span is zero-width at the final position. On failure the tokens
    /// produced before the error are returned together with it, without an
    /// `EndOfFile` token.
    pub fn make_tokens(mut self) -> (Vec<Token>, Option<LexerError>) {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current {
            let Some(&(_, scan)) = DISPATCH.iter().find(|(accepts, _)| accepts(ch)) else {
                let error = LexerError::IllegalCharacter {
                    character: ch,
                    position: self.pos.snapshot(),
                };
                return (tokens, Some(error));
            };

            match scan(&mut self) {
                Ok(Some(token)) => {
                    if tokens.len() >= MAX_TOKEN_COUNT {
                        let error = LexerError::TooManyTokens {
                            count: tokens.len() + 1,
                            position: token.span.start,
                        };
                        return (tokens, Some(error));
                    }
                    tokens.push(token);
                }
                Ok(None) => {}
                Err(error) => return (tokens, Some(error)),
            }
        }

        tokens.push(Token::new(
            TokenKind::EndOfFile,
            Span::point(self.pos.snapshot()),
        ));
        (tokens, None)
    }

    fn token_from(&self, kind: TokenKind, start: Position) -> Token {
        Token::new(kind, Span::new(start, self.pos.snapshot()))
    }

    fn skip_whitespace(&mut self) -> Result<Option<Token>, LexerError> {
        while self.current.is_some_and(is_whitespace) {
            self.advance();
        }
        Ok(None)
    }

    fn skip_comment(&mut self) -> Result<Option<Token>, LexerError> {
        let start = self.pos.snapshot();
        let mut length = 0;

        while self.current.is_some_and(|c| c != '\n') {
            length += 1;
            if length > MAX_COMMENT_LENGTH {
                return Err(LexerError::CommentTooLong {
                    length,
                    position: start,
                });
            }
            self.advance();
        }
        Ok(None)
    }

    /// Digits with at most one `.`. A second `.` ends the number and starts
    /// the next one, so `1.2.3` scans as `1.2` then `.3`.
    fn scan_number(&mut self) -> Result<Option<Token>, LexerError> {
        let start = self.pos.snapshot();
        let mut text = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current {
            if ch == '.' {
                if seen_dot {
                    break;
                }
                seen_dot = true;
            } else if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.advance();
        }

        if text.starts_with('.') {
            text.insert(0, '0');
        }
        if text.ends_with('.') {
            text.push('0');
        }

        Ok(Some(self.token_from(TokenKind::Number(text), start)))
    }

    fn scan_string(&mut self) -> Result<Option<Token>, LexerError> {
        let start = self.pos.snapshot();
        let mut value = String::new();
        let mut escaped = false;
        self.advance();

        loop {
            let Some(ch) = self.current else {
                if self.permissive_strings {
                    break;
                }
                return Err(LexerError::UnterminatedString { start });
            };

            if escaped {
                value.push(unescape(ch));
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                self.advance();
                break;
            } else {
                value.push(ch);
            }

            if value.len() > MAX_STRING_SIZE {
                return Err(LexerError::StringTooLarge {
                    size: value.len(),
                    position: start,
                });
            }
            self.advance();
        }

        Ok(Some(self.token_from(TokenKind::Str(value), start)))
    }

    fn scan_word(&mut self) -> Result<Option<Token>, LexerError> {
        let start = self.pos.snapshot();
        let mut word = String::new();

        while let Some(ch) = self.current.filter(|&c| is_identifier_char(c)) {
            word.push(ch);
            self.advance();
        }

        if word.len() > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length: word.len(),
                position: start,
            });
        }

        Ok(Some(self.token_from(classify_word(&word), start)))
    }

    /// One or two character symbols, decided with a single character of
    /// lookahead after the first.
    fn scan_operator(&mut self) -> Result<Option<Token>, LexerError> {
        let start = self.pos.snapshot();
        let Some(first) = self.current else {
            return Ok(None);
        };
        self.advance();

        if let Some(second) = self.current {
            let pair: String = [first, second].iter().collect();
            if let Some(kind) = classify_operator_symbol(&pair) {
                self.advance();
                return Ok(Some(self.token_from(kind, start)));
            }
        }

        match classify_operator_symbol(first.encode_utf8(&mut [0; 4])) {
            Some(kind) => Ok(Some(self.token_from(kind, start))),
            // `!` is only valid as part of `!=`
            None => Err(LexerError::IllegalCharacter {
                character: first,
                position: start,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Keyword;
    use assert_matches::assert_matches;

    fn lex(text: &str) -> Vec<Token> {
        let (tokens, error) = Lexer::new("test.one", text).make_tokens();
        assert!(error.is_none(), "unexpected lexer error: {:?}", error);
        tokens
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        lex(text).into_iter().map(|t| t.kind).collect()
    }

    fn number(text: &str) -> TokenKind {
        TokenKind::Number(text.to_string())
    }

    #[test]
    fn test_number_normalization() {
        assert_eq!(kinds(".5"), vec![number("0.5"), TokenKind::EndOfFile]);
        assert_eq!(kinds("5."), vec![number("5.0"), TokenKind::EndOfFile]);
        assert_eq!(kinds("3.14"), vec![number("3.14"), TokenKind::EndOfFile]);
        assert_eq!(kinds("42"), vec![number("42"), TokenKind::EndOfFile]);
    }

    #[test]
    fn test_lone_dot_is_zero() {
        assert_eq!(kinds("."), vec![number("0.0"), TokenKind::EndOfFile]);
    }

    #[test]
    fn test_second_dot_starts_new_number() {
        assert_eq!(
            kinds("1.2.3"),
            vec![number("1.2"), number("0.3"), TokenKind::EndOfFile]
        );
    }

    #[test]
    fn test_digits_with_single_dot_yield_one_number() {
        for text in ["0", "007", "1.", ".25", "12.5", "100000.000001"] {
            let tokens = kinds(text);
            assert_eq!(tokens.len(), 2, "input {text:?}");
            assert_matches!(&tokens[0], TokenKind::Number(_));
        }
    }

    #[test]
    fn test_number_span() {
        let tokens = lex("  12.5 ");
        assert_eq!(tokens[0].span.start.index, 2);
        assert_eq!(tokens[0].span.end.index, 6);
        assert_eq!(tokens[0].span.text(), "12.5");
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""a\nb""#);
        assert_eq!(tokens[0].kind, TokenKind::Str("a\nb".to_string()));

        let tokens = lex(r#""tab\there \"quoted\"""#);
        assert_eq!(
            tokens[0].kind,
            TokenKind::Str("tab\there \"quoted\"".to_string())
        );
    }

    #[test]
    fn test_unknown_escape_passes_character_through() {
        let tokens = lex(r#""\q""#);
        assert_eq!(tokens[0].kind, TokenKind::Str("q".to_string()));

        let tokens = lex(r#""back\\slash""#);
        assert_eq!(tokens[0].kind, TokenKind::Str("back\\slash".to_string()));
    }

    #[test]
    fn test_string_span_includes_quotes() {
        let tokens = lex(r#"x = "hi""#);
        let string = &tokens[2];
        assert_eq!(string.span.start.index, 4);
        assert_eq!(string.span.end.index, 8);
        assert_eq!(string.span.text(), "\"hi\"");
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let (tokens, error) = Lexer::new("test.one", "x = \"abc").make_tokens();

        assert_matches!(error, Some(LexerError::UnterminatedString { ref start }) if start.index == 4);
        assert_eq!(tokens.len(), 2);
        assert!(!tokens.iter().any(|t| t.kind.is_eof()));
    }

    #[test]
    fn test_permissive_unterminated_string_keeps_partial_value() {
        let (tokens, error) = Lexer::new("test.one", "\"abc")
            .permissive_strings(true)
            .make_tokens();

        assert!(error.is_none());
        assert_eq!(tokens[0].kind, TokenKind::Str("abc".to_string()));
        assert_eq!(tokens[0].span.end.index, 4);
        assert_eq!(tokens[1].kind, TokenKind::EndOfFile);
    }

    #[test]
    fn test_plus_and_operators() {
        assert_eq!(
            kinds("1 + 2"),
            vec![number("1"), TokenKind::Plus, number("2"), TokenKind::EndOfFile]
        );
        assert_eq!(
            kinds("a := b -> c' == d != e <= f >= g < h > i ^ j"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::ColonEq,
                TokenKind::Identifier("b".into()),
                TokenKind::Arrow,
                TokenKind::Identifier("c".into()),
                TokenKind::Prime,
                TokenKind::EqEq,
                TokenKind::Identifier("d".into()),
                TokenKind::NotEq,
                TokenKind::Identifier("e".into()),
                TokenKind::LtEq,
                TokenKind::Identifier("f".into()),
                TokenKind::GtEq,
                TokenKind::Identifier("g".into()),
                TokenKind::Lt,
                TokenKind::Identifier("h".into()),
                TokenKind::Gt,
                TokenKind::Identifier("i".into()),
                TokenKind::Pow,
                TokenKind::Identifier("j".into()),
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_two_char_operator_span() {
        let tokens = lex("a:=1");
        assert_eq!(tokens[1].kind, TokenKind::ColonEq);
        assert_eq!(tokens[1].span.len(), 2);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("VAR x_1 END var"),
            vec![
                TokenKind::Keyword(Keyword::Var),
                TokenKind::Identifier("x_1".into()),
                TokenKind::Keyword(Keyword::End),
                TokenKind::Identifier("var".into()),
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_identifier_followed_by_number() {
        // Digits inside a word stay in the identifier
        assert_eq!(
            kinds("k1 2"),
            vec![TokenKind::Identifier("k1".into()), number("2"), TokenKind::EndOfFile]
        );
    }

    #[test]
    fn test_comments_and_whitespace_are_skipped() {
        assert_eq!(
            kinds("# header\n\tx # trailing\r\n"),
            vec![TokenKind::Identifier("x".into()), TokenKind::EndOfFile]
        );
    }

    #[test]
    fn test_illegal_character() {
        let (tokens, error) = Lexer::new("test.one", "1 + @").make_tokens();

        assert_eq!(tokens.len(), 2);
        assert_matches!(
            error,
            Some(LexerError::IllegalCharacter { character: '@', ref position }) if position.index == 4
        );
    }

    #[test]
    fn test_lone_bang_is_illegal() {
        let (_, error) = Lexer::new("test.one", "a ! b").make_tokens();
        assert_matches!(error, Some(LexerError::IllegalCharacter { character: '!', .. }));
    }

    #[test]
    fn test_exactly_one_eof_with_zero_width_span() {
        for text in ["", "   ", "1 + 2", "\"s\"", "x\n"] {
            let tokens = lex(text);
            let eofs: Vec<_> = tokens.iter().filter(|t| t.kind.is_eof()).collect();
            assert_eq!(eofs.len(), 1, "input {text:?}");
            assert!(tokens.last().is_some_and(|t| t.kind.is_eof()));
            assert!(eofs[0].span.is_empty());
            assert_eq!(eofs[0].span.start.index, text.chars().count() as isize);
        }
    }

    #[test]
    fn test_non_eof_spans_are_not_inverted() {
        for token in lex("VAR k = .5 + \"s\\n\" # c\nP' = k * S") {
            assert!(token.span.end.index >= token.span.start.index);
            if !token.kind.is_eof() {
                assert!(token.span.len() > 0);
            }
        }
    }

    #[test]
    fn test_positions_track_lines() {
        let tokens = lex("a\n  b");
        let b = &tokens[1];
        assert_eq!(b.span.start.line, 1);
        assert_eq!(b.span.start.column, 2);
        assert_eq!(b.span.start.index, 4);
    }

    #[test]
    fn test_identifier_too_long() {
        let word = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let (_, error) = Lexer::new("test.one", &word).make_tokens();
        assert_matches!(error, Some(LexerError::IdentifierTooLong { length, .. }) if length == MAX_IDENTIFIER_LENGTH + 1);
    }
}
