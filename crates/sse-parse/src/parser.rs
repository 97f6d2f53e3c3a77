//! Event-emitting parser for SSE.

use std::borrow::Cow;

use sse_term::xsd;

use crate::event::{DatatypeRef, Event, ParseError, ParseSink, SyntaxError, SyntaxErrorKind};
use crate::lexer::Lexer;
use crate::{Location, Token, TokenKind};

/// Parses SSE source text and drives a [`ParseSink`] with events.
///
/// The emitted event sequence is well-nested and describes exactly one
/// top-level term; anything after it (other than comments) is an error.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    peeked: Option<Token<'src>>,
}

impl<'src> Parser<'src> {
    /// Create a parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            peeked: None,
        }
    }

    fn next(&mut self) -> Result<Token<'src>, SyntaxError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<&Token<'src>, SyntaxError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(self.peeked.as_ref().expect("just filled"))
    }

    /// Parse the whole input, emitting events to `sink`.
    pub fn parse<S: ParseSink>(mut self, sink: &mut S) -> Result<(), ParseError<S::Error>> {
        let mut depth: usize = 0;
        let mut root_done = false;

        loop {
            let token = self.next()?;
            let location = token.location;

            // Anything after the completed root term is an error.
            if root_done && token.kind != TokenKind::Eof {
                return Err(SyntaxError::new(SyntaxErrorKind::TrailingContent, location).into());
            }

            match token.kind {
                TokenKind::Eof => {
                    if depth > 0 {
                        return Err(
                            SyntaxError::new(SyntaxErrorKind::UnclosedList, location).into()
                        );
                    }
                    if !root_done {
                        return Err(
                            SyntaxError::new(SyntaxErrorKind::UnexpectedEof, location).into()
                        );
                    }
                    return Ok(());
                }
                TokenKind::LParen | TokenKind::LBracket => {
                    sink.event(Event::ListStart { location })
                        .map_err(ParseError::Sink)?;
                    depth += 1;
                }
                TokenKind::RParen | TokenKind::RBracket => {
                    if depth == 0 {
                        return Err(
                            SyntaxError::new(SyntaxErrorKind::UnbalancedClose, location).into()
                        );
                    }
                    sink.event(Event::ListEnd { location })
                        .map_err(ParseError::Sink)?;
                    depth -= 1;
                    if depth == 0 {
                        root_done = true;
                    }
                }
                TokenKind::Symbol => {
                    sink.event(Event::Symbol {
                        text: token.text,
                        location,
                    })
                    .map_err(ParseError::Sink)?;
                    root_done = depth == 0;
                }
                TokenKind::PrefixedName => {
                    sink.event(Event::PrefixedName {
                        text: token.text,
                        location,
                    })
                    .map_err(ParseError::Sink)?;
                    root_done = depth == 0;
                }
                TokenKind::Iri => {
                    sink.event(Event::Iri {
                        text: token.text,
                        location,
                    })
                    .map_err(ParseError::Sink)?;
                    root_done = depth == 0;
                }
                TokenKind::Variable => {
                    sink.event(Event::Variable {
                        name: token.text,
                        location,
                    })
                    .map_err(ParseError::Sink)?;
                    root_done = depth == 0;
                }
                TokenKind::BlankNode => {
                    sink.event(Event::BlankNode {
                        label: token.text,
                        location,
                    })
                    .map_err(ParseError::Sink)?;
                    root_done = depth == 0;
                }
                TokenKind::Str => {
                    let event = self.string_literal(token)?;
                    sink.event(event).map_err(ParseError::Sink)?;
                    root_done = depth == 0;
                }
                TokenKind::Integer | TokenKind::Decimal | TokenKind::Double => {
                    let datatype = match token.kind {
                        TokenKind::Integer => xsd::INTEGER,
                        TokenKind::Decimal => xsd::DECIMAL,
                        _ => xsd::DOUBLE,
                    };
                    sink.event(Event::Literal {
                        lexical: Cow::Borrowed(token.text),
                        lang: None,
                        datatype: Some(DatatypeRef::Iri(Cow::Borrowed(datatype))),
                        location,
                    })
                    .map_err(ParseError::Sink)?;
                    root_done = depth == 0;
                }
                TokenKind::LangTag | TokenKind::DatatypeMarker => {
                    return Err(
                        SyntaxError::new(SyntaxErrorKind::DanglingAnnotation, location).into()
                    );
                }
            }
        }
    }

    /// Assemble a string token plus optional `@lang` / `^^datatype` into
    /// one literal event.
    fn string_literal(&mut self, token: Token<'src>) -> Result<Event<'src>, SyntaxError> {
        let location = token.location;
        let lexical = unescape(token.text, location)?;

        match self.peek()?.kind {
            TokenKind::LangTag => {
                let tag = self.next()?;
                Ok(Event::Literal {
                    lexical,
                    lang: Some(tag.text),
                    datatype: None,
                    location,
                })
            }
            TokenKind::DatatypeMarker => {
                let marker = self.next()?;
                let dt = self.next()?;
                let datatype = match dt.kind {
                    TokenKind::Iri => DatatypeRef::Iri(Cow::Borrowed(dt.text)),
                    TokenKind::PrefixedName => DatatypeRef::PrefixedName(dt.text),
                    _ => {
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::ExpectedDatatype,
                            marker.location,
                        ));
                    }
                };
                Ok(Event::Literal {
                    lexical,
                    lang: None,
                    datatype: Some(datatype),
                    location,
                })
            }
            _ => Ok(Event::Literal {
                lexical,
                lang: None,
                datatype: None,
                location,
            }),
        }
    }
}

/// Process escape sequences in a raw string body.
fn unescape<'src>(raw: &'src str, location: Location) -> Result<Cow<'src, str>, SyntaxError> {
    if !raw.contains('\\') {
        return Ok(Cow::Borrowed(raw));
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('u') => out.push(unescape_unicode(&mut chars, 4, location)?),
            Some('U') => out.push(unescape_unicode(&mut chars, 8, location)?),
            other => {
                let seq = match other {
                    Some(c) => format!("\\{}", c),
                    None => "\\".to_string(),
                };
                return Err(SyntaxError::new(
                    SyntaxErrorKind::InvalidEscape(seq),
                    location,
                ));
            }
        }
    }
    Ok(Cow::Owned(out))
}

fn unescape_unicode(
    chars: &mut std::str::Chars<'_>,
    len: usize,
    location: Location,
) -> Result<char, SyntaxError> {
    let mut hex = String::with_capacity(len);
    for _ in 0..len {
        match chars.next() {
            Some(c) if c.is_ascii_hexdigit() => hex.push(c),
            _ => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::InvalidEscape(format!("\\u{}", hex)),
                    location,
                ));
            }
        }
    }
    let code = u32::from_str_radix(&hex, 16).expect("hex digits only");
    char::from_u32(code).ok_or_else(|| {
        SyntaxError::new(SyntaxErrorKind::InvalidEscape(format!("\\u{}", hex)), location)
    })
}
