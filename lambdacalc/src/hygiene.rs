use rand::{distributions::Alphanumeric, Rng};
use tracing::trace;

use crate::{env::Env, term::Term};

/// Source of random hygiene suffixes.
pub struct Suffixes<R> {
    rng: R,
    len: usize,
}

impl<R: Rng> Suffixes<R> {
    pub fn new(rng: R, len: usize) -> Self {
        Self { rng, len }
    }

    pub fn fresh(&mut self) -> String {
        let rng = &mut self.rng;
        (0..self.len)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    }
}

/// Replaces every variable bound in `env` by a copy of its definition, with one
/// fresh suffix appended to all names of that copy.
///
/// Inserted copies are not expanded again in the same pass.
pub fn expand<R: Rng>(term: &mut Term, env: &Env, suffixes: &mut Suffixes<R>) -> bool {
    match term {
        Term::Var(x) => {
            let Some(definition) = env.get(x.base()) else {
                return false;
            };
            let suffix = suffixes.fresh();
            trace!("expand: {x} as :{suffix}");
            let mut copy = definition.clone();
            copy.add_suffix(&suffix);
            *term = copy;
            true
        }
        Term::Abs(_, body) => expand(body, env, suffixes),
        Term::Apply(lhs, rhs) => {
            let lhs = expand(lhs, env, suffixes);
            let rhs = expand(rhs, env, suffixes);
            lhs || rhs
        }
    }
}

/// Replaces the outermost subterms equal to some definition by the definition's name.
///
/// Definitions are tried in [`Env::iter`] order; the first match wins.
pub fn contract(term: &mut Term, env: &Env) -> bool {
    if let Some((name, _)) = env.iter().find(|&(_, definition)| definition == &*term) {
        trace!("contract: {term} as {name}");
        *term = Term::var(name);
        return true;
    }
    match term {
        Term::Var(_) => false,
        Term::Abs(_, body) => contract(body, env),
        Term::Apply(lhs, rhs) => {
            let lhs = contract(lhs, env);
            let rhs = contract(rhs, env);
            lhs || rhs
        }
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{parser::parse, reduce::step};

    fn suffixes() -> Suffixes<StdRng> {
        Suffixes::new(StdRng::seed_from_u64(0), 16)
    }

    fn env(defs: &[(&str, &str)]) -> Env {
        let mut env = Env::new();
        for (name, value) in defs {
            env.insert(*name, parse(value).unwrap());
        }
        env
    }

    #[test]
    fn test_fresh() {
        let mut suffixes = suffixes();
        let a = suffixes.fresh();
        let b = suffixes.fresh();
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_expand_identity() {
        let env = env(&[("ID", "(\\x.x)")]);
        let mut term = parse("(ID y)").unwrap();
        assert!(expand(&mut term, &env, &mut suffixes()));

        let Term::Apply(lhs, rhs) = &term else {
            panic!("not an application: {term:?}");
        };
        let Term::Abs(x, body) = &**lhs else {
            panic!("not an abstraction: {lhs:?}");
        };
        assert_eq!(x.base(), "x");
        assert_eq!(x.suffix().map(str::len), Some(16));
        assert!(matches!(&**body, Term::Var(y) if y == x));
        assert!(matches!(&**rhs, Term::Var(y) if y.suffix().is_none()));

        while step(&mut term) {}
        assert_eq!(term, Term::var("y"));
    }

    #[test]
    fn test_expansions_are_distinct() {
        let env = env(&[("ID", "(\\x.x)")]);
        let mut term = parse("(ID ID)").unwrap();
        assert!(expand(&mut term, &env, &mut suffixes()));
        match &term {
            Term::Apply(lhs, rhs) => match (&**lhs, &**rhs) {
                (Term::Abs(x, _), Term::Abs(y, _)) => {
                    assert_eq!(x.base(), y.base());
                    assert_ne!(x, y);
                }
                _ => panic!("{term:?}"),
            },
            _ => panic!("{term:?}"),
        }
    }

    #[test]
    fn test_expand_one_level_per_pass() {
        let env = env(&[("A", "(B c)"), ("B", "(\\x.x)")]);
        let mut suffixes = suffixes();
        let mut term = parse("A").unwrap();
        assert!(expand(&mut term, &env, &mut suffixes));
        assert_eq!(term, parse("(B c)").unwrap());
        assert!(expand(&mut term, &env, &mut suffixes));
        assert_eq!(term, parse("((\\x.x) c)").unwrap());
        assert!(!expand(&mut term, &env, &mut suffixes));
    }

    #[test]
    fn test_expand_unknown() {
        let env = env(&[("ID", "(\\x.x)")]);
        let mut term = parse("(\\ID.(f y))").unwrap();
        assert!(!expand(&mut term, &env, &mut suffixes()));
        assert_eq!(term, parse("(\\ID.(f y))").unwrap());
    }

    #[test]
    fn test_contract() {
        let env = env(&[("K", "(\\x.x)")]);
        let mut term = parse("(\\x.x)").unwrap();
        assert!(contract(&mut term, &env));
        assert_eq!(term, Term::var("K"));
        assert!(!contract(&mut term, &env));

        let mut term = parse("((\\x.x) (f (\\x.x)))").unwrap();
        assert!(contract(&mut term, &env));
        assert_eq!(term, parse("(K (f K))").unwrap());

        let mut term = parse("(\\y.y)").unwrap();
        assert!(!contract(&mut term, &env));
    }

    #[test]
    fn test_contract_outermost_first() {
        let env = env(&[("I", "(\\x.x)"), ("II", "((\\x.x) (\\x.x))")]);
        let mut term = parse("((\\x.x) (\\x.x))").unwrap();
        assert!(contract(&mut term, &env));
        assert_eq!(term, Term::var("II"));
    }

    #[test]
    fn test_contract_first_definition_wins() {
        let env = env(&[("b", "(\\x.x)"), ("a", "(\\x.x)")]);
        let mut term = parse("(\\x.x)").unwrap();
        assert!(contract(&mut term, &env));
        assert_eq!(term, Term::var("a"));
    }

    #[test]
    fn test_contract_inverts_expand() {
        let env = env(&[("ID", "(\\x.x)"), ("K", "(\\x y.x)")]);
        let original = parse("(K ID z)").unwrap();
        let mut term = original.clone();
        assert!(expand(&mut term, &env, &mut suffixes()));
        assert_ne!(term, original);
        assert!(contract(&mut term, &env));
        assert_eq!(term, original);
    }
}
