use tracing::trace;

use crate::term::{Name, Term};

fn is_redex(term: &Term) -> bool {
    matches!(term, Term::Apply(lhs, _) if lhs.is_abs())
}

/// Replaces every `Var` whose full name is `target` with its own copy of `value`.
///
/// Abstractions binding the same name are not skipped and nothing is renamed,
/// so free variables of `value` may be captured.
fn substitute(base: &mut Term, target: &Name, value: &Term) {
    match base {
        Term::Var(x) if x == target => *base = value.clone(),
        Term::Var(_) => {}
        Term::Abs(_, body) => substitute(body, target, value),
        Term::Apply(lhs, rhs) => {
            substitute(lhs, target, value);
            substitute(rhs, target, value);
        }
    }
}

/// Contracts the redex `term` in place.
fn apply(term: &mut Term) {
    let redex = std::mem::take(term);
    if let Term::Apply(lhs, arg) = redex {
        if let Term::Abs(x, mut body) = *lhs {
            trace!("reduce: {x} := {arg}");
            substitute(&mut body, &x, &arg);
            *term = *body;
        }
    }
}

/// Reduces the leftmost-outermost redex. Returns false if there is none.
pub fn step(term: &mut Term) -> bool {
    if is_redex(term) {
        apply(term);
        return true;
    }
    match term {
        Term::Apply(lhs, rhs) => step(lhs) || step(rhs),
        Term::Abs(_, body) => step(body),
        Term::Var(_) => false,
    }
}
