use chumsky::{prelude::*, Stream};

use crate::{
    error::{ParseError, Span},
    term::{Name, Term},
};

/// Parentheses nested deeper than this are rejected before parsing.
pub const MAX_DEPTH: usize = 100;

pub trait LineParser<O>: Parser<char, O, Error = ParseError> + Clone {}
impl<O, T: Parser<char, O, Error = ParseError> + Clone> LineParser<O> for T {}

/// What ends a parenthesized term.
#[derive(Clone, Debug)]
enum Close {
    Paren(Span),
    Eof,
    Other(char, Span),
}

fn is_name_char(c: &char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')')
}

fn close() -> impl LineParser<Close> {
    choice((
        just(')').map_with_span(|_, span| Close::Paren(span)),
        end().to(Close::Eof),
        any().map_with_span(Close::Other),
    ))
    .padded()
}

/// ```text
/// term := var | (\x y ... . term) | (term term ...)
/// ```
///
/// Past the opening `(` nothing fails: malformed pieces are reported through
/// `validate` and parsing goes on, so the first error is the innermost one.
pub fn term_parser() -> impl LineParser<Term> {
    recursive(|term: Recursive<char, Term, ParseError>| {
        let variable = filter(|c: &char| is_name_char(c) && *c != '\\')
            .chain(filter(is_name_char).repeated())
            .map(|cs| Term::var(cs.into_iter().collect::<String>()));

        let param = filter(|c: &char| is_name_char(c) && *c != '.')
            .repeated()
            .at_least(1)
            .map(|cs| Name::new(cs.into_iter().collect::<String>()))
            .padded();

        let abstraction = just('(')
            .then(just('\\'))
            .ignore_then(param.repeated())
            .map_with_span(|params, span: Span| (params, span))
            .then(just('.').padded().or_not())
            .then(term.clone().or_not())
            .then(close())
            .validate(|((((params, head), dot), body), close), _, emit| {
                let open = head.start..head.start + 1;
                let body = match (dot, body, close) {
                    (None, _, _) => {
                        emit(ParseError::MissingDot(head));
                        None
                    }
                    _ if params.is_empty() => {
                        emit(ParseError::NoParameters(head));
                        None
                    }
                    (_, None, Close::Paren(span)) => {
                        emit(ParseError::MissingTerm(span));
                        None
                    }
                    (_, _, Close::Eof) => {
                        emit(ParseError::Unclosed(open));
                        None
                    }
                    (_, _, Close::Other(c, span)) => {
                        emit(ParseError::unexpected(c, span));
                        None
                    }
                    (_, Some(body), Close::Paren(_)) => Some(body),
                };
                params
                    .into_iter()
                    .rev()
                    .fold(body.unwrap_or_default(), |body, x| Term::abs(x, body))
            });

        let application = just('(')
            .map_with_span(|_, span: Span| span)
            .then(term.repeated())
            .then(close())
            .validate(|((open, terms), close), span, emit| {
                match close {
                    Close::Eof => emit(ParseError::Unclosed(open)),
                    Close::Other(c, at) => emit(ParseError::unexpected(c, at)),
                    Close::Paren(_) if terms.len() < 2 => emit(ParseError::TooFewTerms(span)),
                    Close::Paren(_) => {}
                }
                let mut terms = terms.into_iter();
                match (terms.next(), terms.next()) {
                    (Some(lhs), Some(rhs)) => terms.fold(Term::apply(lhs, rhs), Term::apply),
                    _ => Term::default(),
                }
            });

        choice((abstraction, application, variable)).padded()
    })
}

/// A whole line holding exactly one term.
pub fn line_parser() -> impl LineParser<Term> {
    term_parser()
        .or_not()
        .then(any().repeated().map_with_span(|rest: Vec<char>, span: Span| (rest, span)))
        .validate(|(term, (rest, span)), _, emit| {
            let skip = rest.iter().take_while(|c| c.is_whitespace()).count();
            let at = span.start + skip;
            let error = match (term, rest.get(skip)) {
                (Some(term), None) => return term,
                (_, Some(&')')) => ParseError::UnexpectedClose(at..at + 1),
                (Some(_), Some(_)) => ParseError::Trailing(at..span.end),
                (None, Some(&c)) => ParseError::unexpected(c, at..at + 1),
                (None, None) => ParseError::Empty(at..at + 1),
            };
            emit(error);
            Term::default()
        })
}

fn check_depth(line: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for (i, c) in line.chars().enumerate() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(ParseError::TooDeep(i..i + 1));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Runs `parser` over `line`; spans count characters from the start of the line.
pub fn parse_line<O>(parser: impl LineParser<O>, line: &str) -> Result<O, ParseError> {
    check_depth(line)?;
    let len = line.chars().count();
    let stream = Stream::from_iter(
        len..len + 1,
        line.chars().enumerate().map(|(i, c)| (c, i..i + 1)),
    );
    parser.parse(stream).map_err(|errors| {
        errors
            .into_iter()
            .next()
            .expect("a failed parse reports an error")
    })
}

pub fn parse(input: &str) -> Result<Term, ParseError> {
    parse_line(line_parser(), input)
}
