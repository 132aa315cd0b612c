use crate::diagnostic::Span;
use crate::interpreter::error::SyntaxError;
use crate::token::{Keyword, SpannedToken, Token};
use chumsky::prelude::*;

/// A lexeme is either a recognized token or a character no pattern accepts.
/// Keeping stray characters in the stream lets `tokenize` report the exact
/// position of the first one.
pub type Lexeme = Result<Token, char>;

/// Token patterns in matching priority order: strings, reals before
/// integers, keywords/identifiers, assignment, comparisons longest-first,
/// arithmetic and concatenation operators, punctuation.
pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<(Lexeme, SimpleSpan)>, extra::Err<Simple<'a, char>>>
{
    let line_comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .ignored();
    let block_comment = just("/*")
        .then(any().and_is(just("*/").not()).repeated())
        .then(just("*/"))
        .ignored();
    let whitespace = any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .at_least(1)
        .ignored();
    let trivia = choice((whitespace, line_comment, block_comment)).repeated();

    let string = choice((
        just('"')
            .ignore_then(none_of("\"").repeated().to_slice())
            .then_ignore(just('"')),
        just('\'')
            .ignore_then(none_of("'").repeated().to_slice())
            .then_ignore(just('\'')),
    ))
    .map(|s: &str| Token::String(s.to_string()));

    let real = text::digits(10)
        .then(just('.'))
        .then(text::digits(10))
        .to_slice()
        .map(|s: &str| Token::Number(s.parse().unwrap_or(f64::NAN), true));

    let integer = text::digits(10)
        .to_slice()
        .map(|s: &str| Token::Number(s.parse().unwrap_or(f64::NAN), false));

    let word = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
        .map(|s: &str| match Keyword::from_word(&s.to_ascii_uppercase()) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Ident(s.to_string()),
        });

    let assign = choice((just("←"), just("<-"))).to(Token::Assign);

    let comparison = choice((
        just("<>").to(Token::NotEq),
        just("<=").to(Token::LessEq),
        just(">=").to(Token::GreaterEq),
        just('<').to(Token::Less),
        just('>').to(Token::Greater),
        just('=').to(Token::Eq),
    ));

    let operator = choice((
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('&').to(Token::Ampersand),
        just('^').to(Token::Caret),
    ));

    let punctuation = choice((
        just(':').to(Token::Colon),
        just(',').to(Token::Comma),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('[').to(Token::LBracket),
        just(']').to(Token::RBracket),
        just('.').to(Token::Dot),
    ));

    let token = choice((string, real, integer, word, assign, comparison, operator, punctuation));

    let lexeme = token.map(Lexeme::Ok).or(any().map(Lexeme::Err));

    trivia
        .clone()
        .ignore_then(
            lexeme
                .map_with(|lexeme, e| (lexeme, e.span()))
                .then_ignore(trivia)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
}

/// Converts source text into positioned tokens, discarding whitespace and
/// comments. Fails on the first character no token pattern accepts.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, SyntaxError> {
    let lexemes = match lexer().parse(source).into_result() {
        Ok(lexemes) => lexemes,
        Err(errors) => {
            let offset = errors.first().map(|e| e.span().start).unwrap_or(0);
            return Err(syntax_error_at(source, offset));
        }
    };

    let mut tokens = Vec::with_capacity(lexemes.len());
    let mut cursor = Cursor::default();
    for (lexeme, span) in lexemes {
        let (line, column) = cursor.advance_to(source, span.start);
        match lexeme {
            Ok(token) => tokens.push(SpannedToken {
                token,
                span: Span::new(span.start, span.end),
                line,
                column,
            }),
            Err(symbol) => {
                return Err(SyntaxError::new(symbol, line, column, Span::new(span.start, span.end)))
            }
        }
    }
    Ok(tokens)
}

fn syntax_error_at(source: &str, offset: usize) -> SyntaxError {
    let mut cursor = Cursor::default();
    let (line, column) = cursor.advance_to(source, offset);
    let symbol = source[offset.min(source.len())..].chars().next().unwrap_or(' ');
    SyntaxError::new(symbol, line, column, Span::new(offset, offset + symbol.len_utf8()))
}

/// Incremental line/column tracking over monotonically increasing offsets.
struct Cursor {
    offset: usize,
    line: usize,
    column: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Cursor {
    fn advance_to(&mut self, source: &str, offset: usize) -> (usize, usize) {
        let end = offset.min(source.len());
        if end > self.offset {
            for ch in source[self.offset..end].chars() {
                if ch == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
            }
            self.offset = end;
        }
        (self.line, self.column)
    }
}
