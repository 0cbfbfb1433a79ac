use std::path::PathBuf;

use chumsky::prelude::*;

use crate::{
    error::{ParseError, Span},
    parser::{line_parser, parse_line, LineParser},
    term::Term,
};

/// One line of input. `br`, `ex`, `con` and `def` wrap another command.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Command {
    /// `br [N] inner`
    Reduce(Option<usize>, Box<Command>),
    /// `ex [N] inner`
    Expand(Option<usize>, Box<Command>),
    /// `con [N] inner`
    Contract(Option<usize>, Box<Command>),
    /// `def NAME = inner`
    Define(String, Box<Command>),
    /// `show`
    Show,
    /// `load FILE`
    Load(PathBuf),
    /// anything else
    Term(Term),
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn bounded(
            f: &mut std::fmt::Formatter<'_>,
            keyword: &str,
            bound: Option<usize>,
            inner: &Command,
        ) -> std::fmt::Result {
            match bound {
                Some(n) => write!(f, "{keyword} {n} {inner}"),
                None => write!(f, "{keyword} {inner}"),
            }
        }
        match self {
            Command::Reduce(bound, inner) => bounded(f, "br", *bound, inner),
            Command::Expand(bound, inner) => bounded(f, "ex", *bound, inner),
            Command::Contract(bound, inner) => bounded(f, "con", *bound, inner),
            Command::Define(name, inner) => write!(f, "def {name} = {inner}"),
            Command::Show => f.write_str("show"),
            Command::Load(path) => write!(f, "load {}", path.display()),
            Command::Term(term) => write!(f, "{term}"),
        }
    }
}

/// `k` followed by whitespace, `=` or the end of the line.
fn keyword(k: &'static str) -> impl LineParser<()> {
    just(k)
        .then_ignore(
            filter(|c: &char| c.is_whitespace() || *c == '=')
                .ignored()
                .or(end())
                .rewind(),
        )
        .ignored()
}

pub fn command_parser() -> impl LineParser<Command> {
    recursive(|command: Recursive<char, Command, ParseError>| {
        // Missing or unrepresentable digits mean "use the default".
        let bound = filter(|c: &char| c.is_ascii_digit())
            .repeated()
            .at_least(1)
            .map(|ds| ds.into_iter().collect::<String>().parse::<usize>().ok())
            .or_not()
            .map(Option::flatten)
            .padded();
        let bounded = |k| keyword(k).ignore_then(bound.clone()).then(command.clone());
        let reduce = bounded("br").map(|(n, inner)| Command::Reduce(n, Box::new(inner)));
        let expand = bounded("ex").map(|(n, inner)| Command::Expand(n, Box::new(inner)));
        let contract = bounded("con").map(|(n, inner)| Command::Contract(n, Box::new(inner)));

        let name = filter(|c: &char| !c.is_whitespace() && *c != '=')
            .repeated()
            .at_least(1)
            .map(|cs| cs.into_iter().collect::<String>())
            .padded();
        let define = keyword("def")
            .map_with_span(|_, span: Span| span)
            .then(name.or_not())
            .then_ignore(just('=').padded().or_not())
            .then(command)
            .validate(|((head, name), inner), _, emit| {
                let name = match name {
                    Some(name) => name,
                    None => {
                        emit(ParseError::MissingName(head));
                        String::new()
                    }
                };
                Command::Define(name, Box::new(inner))
            });

        let show = keyword("show")
            .ignore_then(text::whitespace())
            .ignore_then(
                any()
                    .repeated()
                    .at_least(1)
                    .map_with_span(|_, span: Span| span)
                    .or_not(),
            )
            .validate(|rest, _, emit| {
                if let Some(span) = rest {
                    emit(ParseError::Trailing(span));
                }
                Command::Show
            });

        let load = keyword("load")
            .ignore_then(any().repeated())
            .validate(|rest, span, emit| {
                let path = rest.into_iter().collect::<String>();
                let path = path.trim();
                if path.is_empty() {
                    emit(ParseError::MissingPath(span));
                }
                Command::Load(path.into())
            });

        let term = line_parser().map(Command::Term);

        text::whitespace().ignore_then(choice((reduce, expand, contract, define, show, load, term)))
    })
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        parse_line(command_parser(), line)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse;

    fn term(s: &str) -> Box<Command> {
        Command::Term(parse(s).unwrap()).into()
    }

    #[test]
    fn test_bare_term() {
        assert_eq!(
            Command::parse("(f a b)").unwrap(),
            Command::Term(parse("((f a) b)").unwrap())
        );
        assert_eq!(Command::parse("brx").unwrap(), *term("brx"));
        assert_eq!(Command::parse("  x ").unwrap(), *term("x"));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(
            Command::parse("br ((\\x.x) y)").unwrap(),
            Command::Reduce(None, term("((\\x.x) y)"))
        );
        assert_eq!(
            Command::parse("br 0 ((\\x.x) y)").unwrap(),
            Command::Reduce(Some(0), term("((\\x.x) y)"))
        );
        assert_eq!(
            Command::parse("ex 12 x").unwrap(),
            Command::Expand(Some(12), term("x"))
        );
        assert!(matches!(Command::parse("con3 x"), Err(ParseError::Trailing(_))));
        assert_eq!(
            Command::parse("br 99999999999999999999999 x").unwrap(),
            Command::Reduce(None, term("x"))
        );
    }

    #[test]
    fn test_nested() {
        assert_eq!(
            Command::parse("br 5 ex con 2 (ID y)").unwrap(),
            Command::Reduce(
                Some(5),
                Command::Expand(None, Command::Contract(Some(2), term("(ID y)")).into()).into()
            )
        );
        assert_eq!(
            Command::parse("def TWO = br ex (SUCC ONE)").unwrap(),
            Command::Define(
                "TWO".into(),
                Command::Reduce(None, Command::Expand(None, term("(SUCC ONE)")).into()).into()
            )
        );
    }

    #[test]
    fn test_def() {
        let expected = Command::Define("ID".into(), term("(\\x.x)"));
        assert_eq!(Command::parse("def ID = (\\x.x)").unwrap(), expected);
        assert_eq!(Command::parse("def ID=(\\x.x)").unwrap(), expected);
        assert_eq!(Command::parse("def ID (\\x.x)").unwrap(), expected);
        assert_eq!(
            Command::parse("def = x"),
            Err(ParseError::MissingName(0..3))
        );
        assert!(matches!(
            Command::parse("def ID ="),
            Err(ParseError::Empty(_))
        ));
    }

    #[test]
    fn test_show_load() {
        assert_eq!(Command::parse("show").unwrap(), Command::Show);
        assert_eq!(Command::parse("show  ").unwrap(), Command::Show);
        assert_eq!(Command::parse("show x"), Err(ParseError::Trailing(5..6)));
        assert_eq!(
            Command::parse("load  lib/church.lc ").unwrap(),
            Command::Load("lib/church.lc".into())
        );
        assert!(matches!(
            Command::parse("load"),
            Err(ParseError::MissingPath(_))
        ));
    }

    #[test]
    fn test_error_spans_are_line_relative() {
        assert_eq!(
            Command::parse("br 3 (f x"),
            Err(ParseError::Unclosed(5..6))
        );
    }

    #[test]
    fn test_errors_inside_commands() {
        assert_eq!(
            Command::parse("br (\\x.x y)"),
            Err(ParseError::Unexpected {
                found: 'y',
                span: 9..10
            })
        );
        assert_eq!(
            Command::parse("def F = ( \\x y)"),
            Err(ParseError::StrayLambda(10..11))
        );
        let deep = format!("br {}x{}", "(".repeat(50_000), ")".repeat(50_000));
        assert!(matches!(
            Command::parse(&deep),
            Err(ParseError::TooDeep(_))
        ));
    }

    #[test]
    fn test_display() {
        let line = "br 5 ex def X = (f a b)";
        assert_eq!(
            Command::parse(line).unwrap().to_string(),
            "br 5 ex def X = ((f a)b)"
        );
    }
}
