use std::{io, path::PathBuf};

use thiserror::Error;

pub type Span = std::ops::Range<usize>;

#[derive(PartialEq, Eq, Clone, Debug, Error)]
pub enum ParseError {
    #[error("Expected a term, found the end of the input")]
    Empty(Span),
    #[error("Unclosed delimiter `(`")]
    Unclosed(Span),
    #[error("Unmatched `)`")]
    UnexpectedClose(Span),
    #[error("Abstraction without parameters")]
    NoParameters(Span),
    #[error("Expected `.` after the parameters")]
    MissingDot(Span),
    #[error("Expected a term, found `)`")]
    MissingTerm(Span),
    #[error("Application needs at least two terms")]
    TooFewTerms(Span),
    #[error("Expected `)`, found `{found}`")]
    Unexpected { found: char, span: Span },
    #[error("Unexpected input after the term")]
    Trailing(Span),
    #[error("`def` needs a name")]
    MissingName(Span),
    #[error("`load` needs a file name")]
    MissingPath(Span),
    #[error("`\\` only starts an abstraction, right after `(`")]
    StrayLambda(Span),
    #[error("Parentheses nested deeper than {} levels", crate::parser::MAX_DEPTH)]
    TooDeep(Span),
}

impl ParseError {
    pub fn span(&self) -> Span {
        use ParseError::*;
        match self {
            Empty(span) | Unclosed(span) | UnexpectedClose(span) | NoParameters(span)
            | MissingDot(span) | MissingTerm(span) | TooFewTerms(span) | Trailing(span)
            | MissingName(span) | MissingPath(span) | StrayLambda(span) | TooDeep(span)
            | Unexpected { span, .. } => span.clone(),
        }
    }

    pub(crate) fn unexpected(found: char, span: Span) -> Self {
        match found {
            '\\' => ParseError::StrayLambda(span),
            found => ParseError::Unexpected { found, span },
        }
    }
}

impl chumsky::error::Error<char> for ParseError {
    type Span = Span;
    type Label = &'static str;

    fn expected_input_found<Iter: IntoIterator<Item = Option<char>>>(
        span: Span,
        _: Iter,
        found: Option<char>,
    ) -> Self {
        match found {
            None => ParseError::Empty(span),
            Some(')') => ParseError::UnexpectedClose(span),
            Some(c) => ParseError::unexpected(c, span),
        }
    }

    fn with_label(self, _: Self::Label) -> Self {
        self
    }

    fn merge(self, _: Self) -> Self {
        self
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Cannot load `{}`: {source}", .path.display())]
    Load { path: PathBuf, source: io::Error },
    #[error("{}:{line}: {source}", .path.display())]
    Script {
        path: PathBuf,
        line: usize,
        text: String,
        source: Box<Error>,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
