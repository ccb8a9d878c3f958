use crate::variable::{VarId, Variable};

/// A rule premise or consequence over the terms `T`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr<T> {
    Is(VarId, T),
    And(Box<Expr<T>>, Box<Expr<T>>),
    Or(Box<Expr<T>>, Box<Expr<T>>),
    Not(Box<Expr<T>>),
}

impl<T> Expr<T> {
    pub fn or(self, rhs: Expr<T>) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    pub fn and(self, rhs: Expr<T>) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn and2(self, rhs: Expr<T>, rhs2: Expr<T>) -> Self {
        self.and(rhs).and(rhs2)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Folds a non-empty list with `or`. Returns `None` for an empty list.
    pub fn any(exprs: impl IntoIterator<Item = Expr<T>>) -> Option<Self> {
        exprs.into_iter().reduce(Expr::or)
    }

    /// Folds a non-empty list with `and`. Returns `None` for an empty list.
    pub fn all(exprs: impl IntoIterator<Item = Expr<T>>) -> Option<Self> {
        exprs.into_iter().reduce(Expr::and)
    }
}

impl<I> Variable<I> {
    pub fn is<T>(self, rhs: I) -> Expr<T>
    where
        I: Into<T>,
    {
        Expr::Is(self.0, rhs.into())
    }

    /// Shorthand for `var.is(a).or(var.is(b))`
    pub fn is_either<T>(self, a: I, b: I) -> Expr<T>
    where
        I: Into<T>,
    {
        self.is(a).or(self.is(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::MembershipFunction;
    use crate::terms::{Key, Terms};
    use crate::variable::Variables;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Level {
        Low,
        High,
    }

    fn level() -> Variable<Level> {
        let terms = Terms::new()
            .with(Level::Low, MembershipFunction::Triangular(0., 0., 1.))
            .and_then(|t| t.with(Level::High, MembershipFunction::Triangular(0., 1., 1.)))
            .unwrap();

        Variables::<Level>::new().add("level", 0. ..=1., terms, None).unwrap()
    }

    #[test]
    fn test_builders_nest_left_to_right() {
        let var = level();
        let expr: Expr<Level> = var.is(Level::Low).and(var.is(Level::High).not()).or(var.is(Level::High));

        let Expr::Or(lhs, rhs) = expr else {
            panic!("expected an or at the root");
        };

        assert_eq!(*rhs, Expr::Is(var.0, Level::High));
        assert!(matches!(*lhs, Expr::And(_, ref r) if matches!(**r, Expr::Not(_))));
        assert_eq!(
            var.is_either(Level::Low, Level::High),
            Expr::Is(var.0, Level::Low).or(Expr::Is(var.0, Level::High))
        );
    }

    #[test]
    fn test_any_and_all() {
        let var = level();

        assert_eq!(Expr::<Level>::any(None), None);
        assert_eq!(
            Expr::all([var.is(Level::Low), var.is(Level::High)]),
            Some(Expr::And(
                Box::new(Expr::Is(var.0, Level::Low)),
                Box::new(Expr::Is(var.0, Level::High))
            ))
        );
    }
}
