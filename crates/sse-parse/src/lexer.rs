//! Lexer for the SSE notation.

use tracing::trace;

use crate::event::{SyntaxError, SyntaxErrorKind};
use crate::{Location, Token, TokenKind};

/// A lexer producing tokens from SSE source text.
///
/// Whitespace and `#` comments are consumed silently; they never appear
/// as tokens.
#[derive(Clone)]
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: usize,
    /// Current line, 1-based.
    line: u32,
    /// Current column in characters, 1-based.
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// The location of the next character to be read.
    #[inline]
    fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the second character without consuming anything.
    #[inline]
    fn peek_second(&self) -> Option<char> {
        self.remaining.chars().nth(1)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.remaining = &self.remaining[c.len_utf8()..];
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Skip whitespace and `#` line comments.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize, location: Location) -> Token<'src> {
        let text = &self.source[start..self.pos];
        trace!("token {:?} at {}: {:?}", kind, location, text);
        Token::new(kind, text, location)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token<'src>, SyntaxError> {
        self.skip_trivia();

        let location = self.location();
        if self.is_eof() {
            return Ok(Token::new(TokenKind::Eof, "", location));
        }

        let c = self.peek().unwrap_or_default();
        match c {
            '(' => {
                self.advance();
                Ok(Token::new(TokenKind::LParen, "(", location))
            }
            ')' => {
                self.advance();
                Ok(Token::new(TokenKind::RParen, ")", location))
            }
            '[' => {
                self.advance();
                Ok(Token::new(TokenKind::LBracket, "[", location))
            }
            ']' => {
                self.advance();
                Ok(Token::new(TokenKind::RBracket, "]", location))
            }
            '<' => self.lex_angle(location),
            '>' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::Symbol, ">=", location))
                } else {
                    Ok(Token::new(TokenKind::Symbol, ">", location))
                }
            }
            '"' | '\'' => self.lex_string(c, location),
            '?' => self.lex_variable(location),
            '@' => self.lex_lang_tag(location),
            '^' if self.peek_second() == Some('^') => {
                self.advance();
                self.advance();
                Ok(Token::new(TokenKind::DatatypeMarker, "^^", location))
            }
            '_' if self.peek_second() == Some(':') => self.lex_blank_node(location),
            _ => self.lex_bareword(location),
        }
    }

    /// `<` is an IRI opener, the symbol `<`, or the symbol `<=`.
    fn lex_angle(&mut self, location: Location) -> Result<Token<'src>, SyntaxError> {
        self.advance(); // '<'
        match self.peek() {
            Some('=') => {
                self.advance();
                Ok(Token::new(TokenKind::Symbol, "<=", location))
            }
            // A lone '<' before whitespace or a delimiter is the less-than
            // symbol, as in `(< ?x 5)`.
            None => Ok(Token::new(TokenKind::Symbol, "<", location)),
            Some(c) if c.is_whitespace() || is_delimiter(c) => {
                Ok(Token::new(TokenKind::Symbol, "<", location))
            }
            Some(_) => {
                let start = self.pos;
                loop {
                    match self.peek() {
                        Some('>') => {
                            let end = self.pos;
                            self.advance();
                            let text = &self.source[start..end];
                            trace!("token Iri at {}: {:?}", location, text);
                            return Ok(Token::new(TokenKind::Iri, text, location));
                        }
                        Some('\n') | None => {
                            return Err(SyntaxError::new(
                                SyntaxErrorKind::UnterminatedIri,
                                location,
                            ));
                        }
                        Some(_) => {
                            self.advance();
                        }
                    }
                }
            }
        }
    }

    /// Quoted string. The token text is the raw body without the quotes;
    /// escapes are processed by the parser.
    fn lex_string(&mut self, quote: char, location: Location) -> Result<Token<'src>, SyntaxError> {
        self.advance(); // opening quote
        let start = self.pos;
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    let end = self.pos;
                    self.advance();
                    let text = &self.source[start..end];
                    trace!("token Str at {}: {:?}", location, text);
                    return Ok(Token::new(TokenKind::Str, text, location));
                }
                Some('\\') => {
                    self.advance();
                    // The escaped character is validated later; consume it
                    // so an escaped quote does not close the string.
                    self.advance();
                }
                Some('\n') | None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnterminatedString,
                        location,
                    ));
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// `?name`, `??name` (names of parser-allocated variables), or bare `?`.
    fn lex_variable(&mut self, location: Location) -> Result<Token<'src>, SyntaxError> {
        self.advance(); // '?'
        let start = self.pos;
        if self.peek() == Some('?') {
            self.advance();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(self.token(TokenKind::Variable, start, location))
    }

    /// `@lang` after a string literal.
    fn lex_lang_tag(&mut self, location: Location) -> Result<Token<'src>, SyntaxError> {
        self.advance(); // '@'
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '-' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedChar('@'),
                location,
            ));
        }
        Ok(self.token(TokenKind::LangTag, start, location))
    }

    /// `_:label`.
    fn lex_blank_node(&mut self, location: Location) -> Result<Token<'src>, SyntaxError> {
        self.advance(); // '_'
        self.advance(); // ':'
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(self.token(TokenKind::BlankNode, start, location))
    }

    /// A run of non-delimiter characters: a number, a prefixed name, or a
    /// symbol.
    fn lex_bareword(&mut self, location: Location) -> Result<Token<'src>, SyntaxError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || is_delimiter(c) {
                break;
            }
            self.advance();
        }
        if self.pos == start {
            // The first character is a delimiter that no rule claimed.
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedChar(self.peek().unwrap_or_default()),
                location,
            ));
        }
        let text = &self.source[start..self.pos];
        let kind = match classify_number(text) {
            Some(kind) => kind,
            None if text.contains(':') => TokenKind::PrefixedName,
            None => TokenKind::Symbol,
        };
        trace!("token {:?} at {}: {:?}", kind, location, text);
        Ok(Token::new(kind, text, location))
    }
}

/// Characters that terminate a bareword and start another token.
fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | '"' | '\'' | '<' | '>' | '#' | '@')
}

/// Classify a bareword as a number lexical form, if it is one.
///
/// Shared with the printer, which may only write a numeric literal
/// bare when its lexical form reads back as the same kind of number.
pub fn classify_number(text: &str) -> Option<TokenKind> {
    let rest = text.strip_prefix(['+', '-']).unwrap_or(text);
    let bytes = rest.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_digit() {
        return None;
    }

    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }

    let mut has_dot = false;
    if i < bytes.len() && bytes[i] == b'.' {
        has_dot = true;
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }

    let mut has_exp = false;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        has_exp = true;
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start {
            return None;
        }
    }

    if i != bytes.len() {
        return None;
    }
    Some(if has_exp {
        TokenKind::Double
    } else if has_dot {
        TokenKind::Decimal
    } else {
        TokenKind::Integer
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                break;
            }
            out.push((token.kind, token.text.to_string()));
        }
        out
    }

    #[test]
    fn test_structural() {
        assert_eq!(
            lex("( ) [ ]"),
            vec![
                (TokenKind::LParen, "(".to_string()),
                (TokenKind::RParen, ")".to_string()),
                (TokenKind::LBracket, "[".to_string()),
                (TokenKind::RBracket, "]".to_string()),
            ]
        );
    }

    #[test]
    fn test_symbols_and_pnames() {
        assert_eq!(
            lex("bgp ex:thing :a nil"),
            vec![
                (TokenKind::Symbol, "bgp".to_string()),
                (TokenKind::PrefixedName, "ex:thing".to_string()),
                (TokenKind::PrefixedName, ":a".to_string()),
                (TokenKind::Symbol, "nil".to_string()),
            ]
        );
    }

    #[test]
    fn test_comparison_symbols() {
        assert_eq!(
            lex("(< ?x 5)"),
            vec![
                (TokenKind::LParen, "(".to_string()),
                (TokenKind::Symbol, "<".to_string()),
                (TokenKind::Variable, "x".to_string()),
                (TokenKind::Integer, "5".to_string()),
                (TokenKind::RParen, ")".to_string()),
            ]
        );
        assert_eq!(lex("<=")[0], (TokenKind::Symbol, "<=".to_string()));
        assert_eq!(lex(">=")[0], (TokenKind::Symbol, ">=".to_string()));
        assert_eq!(lex(">")[0], (TokenKind::Symbol, ">".to_string()));
    }

    #[test]
    fn test_iri() {
        assert_eq!(
            lex("<http://example.org/a>"),
            vec![(TokenKind::Iri, "http://example.org/a".to_string())]
        );
    }

    #[test]
    fn test_unterminated_iri() {
        let mut lexer = Lexer::new("<http://example");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedIri);
    }

    #[test]
    fn test_string_with_escapes() {
        assert_eq!(
            lex(r#""with \"escapes\"""#),
            vec![(TokenKind::Str, r#"with \"escapes\""#.to_string())]
        );
        assert_eq!(
            lex("'single'"),
            vec![(TokenKind::Str, "single".to_string())]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"oops");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedString);
    }

    #[test]
    fn test_variables() {
        assert_eq!(lex("?x"), vec![(TokenKind::Variable, "x".to_string())]);
        assert_eq!(lex("?"), vec![(TokenKind::Variable, "".to_string())]);
        assert_eq!(lex("??0"), vec![(TokenKind::Variable, "?0".to_string())]);
    }

    #[test]
    fn test_blank_node() {
        assert_eq!(lex("_:b0"), vec![(TokenKind::BlankNode, "b0".to_string())]);
    }

    #[test]
    fn test_lang_and_datatype_tokens() {
        assert_eq!(
            lex("\"chat\"@fr"),
            vec![
                (TokenKind::Str, "chat".to_string()),
                (TokenKind::LangTag, "fr".to_string()),
            ]
        );
        assert_eq!(
            lex("\"1\"^^xsd:integer"),
            vec![
                (TokenKind::Str, "1".to_string()),
                (TokenKind::DatatypeMarker, "^^".to_string()),
                (TokenKind::PrefixedName, "xsd:integer".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("42"), vec![(TokenKind::Integer, "42".to_string())]);
        assert_eq!(lex("-7"), vec![(TokenKind::Integer, "-7".to_string())]);
        assert_eq!(lex("3.14"), vec![(TokenKind::Decimal, "3.14".to_string())]);
        assert_eq!(lex("1e6"), vec![(TokenKind::Double, "1e6".to_string())]);
        assert_eq!(
            lex("-2.5E-3"),
            vec![(TokenKind::Double, "-2.5E-3".to_string())]
        );
        // Not numbers.
        assert_eq!(lex("+")[0].0, TokenKind::Symbol);
        assert_eq!(lex("1.2.3")[0].0, TokenKind::Symbol);
    }

    #[test]
    fn test_comments_and_locations() {
        let mut lexer = Lexer::new("# comment\n  foo");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Symbol);
        assert_eq!(token.text, "foo");
        assert_eq!(token.location, Location::new(2, 3));
    }
}
