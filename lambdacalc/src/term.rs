/// A variable or parameter name, possibly carrying a hygiene suffix: `base:suffix`.
#[derive(
    PartialEq,
    Eq,
    Hash,
    Clone,
    Default,
    Debug,
    derive_more::Display,
    derive_more::Deref,
    derive_more::From,
)]
#[deref(forward)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Text before the first `:`. Used for display, lookup and comparison.
    pub fn base(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(base, _)| base)
    }

    pub fn suffix(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, suffix)| suffix)
    }

    /// Appends `:suffix`. Suffixes stack, the base never changes.
    pub fn add_suffix(&mut self, suffix: &str) {
        self.0.push(':');
        self.0.push_str(suffix);
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

#[derive(Clone, Debug)]
pub enum Term {
    /// `x`
    Var(Name),
    /// `(\x.t)`
    Abs(Name, Box<Term>),
    /// `(t t)`
    Apply(Box<Term>, Box<Term>),
}

impl Term {
    pub fn var(name: impl Into<Name>) -> Self {
        Term::Var(name.into())
    }

    pub fn abs(name: impl Into<Name>, body: Term) -> Self {
        Term::Abs(name.into(), body.into())
    }

    pub fn apply(lhs: Term, rhs: Term) -> Self {
        Term::Apply(lhs.into(), rhs.into())
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    pub fn is_abs(&self) -> bool {
        matches!(self, Term::Abs(_, _))
    }

    /// Appends the same suffix to every variable and parameter name in the tree.
    pub fn add_suffix(&mut self, suffix: &str) {
        match self {
            Term::Var(x) => x.add_suffix(suffix),
            Term::Abs(x, body) => {
                x.add_suffix(suffix);
                body.add_suffix(suffix);
            }
            Term::Apply(lhs, rhs) => {
                lhs.add_suffix(suffix);
                rhs.add_suffix(suffix);
            }
        }
    }
}

impl Default for Term {
    fn default() -> Self {
        Term::Var(Name::default())
    }
}

/// Structural equality on base names; hygiene suffixes are ignored.
///
/// This is not alpha-equivalence: `(\x.x)` and `(\y.y)` are different terms.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        use Term::*;
        match (self, other) {
            (Var(x), Var(y)) => x.base() == y.base(),
            (Abs(x, lhs), Abs(y, rhs)) => x.base() == y.base() && lhs == rhs,
            (Apply(f, a), Apply(g, b)) => f == g && a == b,
            _ => false,
        }
    }
}
impl Eq for Term {}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Var(x) => f.write_str(x.base()),
            Term::Abs(x, body) => write!(f, "(\\{}.{body})", x.base()),
            Term::Apply(lhs, rhs) => {
                let sep = if lhs.is_var() && rhs.is_var() { " " } else { "" };
                write!(f, "({lhs}{sep}{rhs})")
            }
        }
    }
}
