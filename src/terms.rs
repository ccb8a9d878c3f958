use std::fmt::Debug;

pub use fixed_map::Key as Term;
pub use fixed_map::Key;
use fixed_map::Map as FixedMap;

use crate::error::{ConfigError, Result};
use crate::membership::MembershipFunction;

/// The fuzzy sets of one variable, keyed by that variable's term enum.
///
/// Iteration follows the enum's declaration order regardless of insertion
/// order, which is also the order ties are broken in.
pub struct Terms<K: Term>(pub(crate) FixedMap<K, MembershipFunction>);

impl<K: Term> Default for Terms<K> {
    fn default() -> Self {
        Self(FixedMap::new())
    }
}

impl<K: Term + Copy + Debug> Terms<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a term. Declaring the same term twice is a configuration error.
    pub fn insert(&mut self, key: K, membership: MembershipFunction) -> Result<()> {
        if self.0.contains_key(key) {
            return Err(ConfigError::DuplicateTerm {
                term: format!("{key:?}"),
            });
        }

        self.0.insert(key, membership);

        Ok(())
    }

    /// Builder flavour of [`Terms::insert`]
    pub fn with(mut self, key: K, membership: MembershipFunction) -> Result<Self> {
        self.insert(key, membership)?;

        Ok(self)
    }

    pub fn get(&self, key: K) -> Option<&MembershipFunction> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &MembershipFunction)> + '_ {
        self.0.iter()
    }
}

/// Declares the union of several term enums, the `T` a [`Variables`] table
/// is keyed by, along with `From` conversions from each member and a
/// `Display` that defers to the member.
///
/// ```
/// use fuzzy_commute::term_union;
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// enum Rain { Dry, Wet }
///
/// impl std::fmt::Display for Rain {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str(if *self == Rain::Dry { "dry" } else { "wet" })
///     }
/// }
///
/// term_union! {
///     #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
///     enum Weather {
///         Rain(Rain),
///     }
/// }
///
/// assert_eq!(Weather::from(Rain::Wet).to_string(), "wet");
/// ```
///
/// [`Variables`]: crate::Variables
#[macro_export]
macro_rules! term_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident($inner:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($variant($inner)),+
        }

        $(
            impl From<$inner> for $name {
                fn from(term: $inner) -> Self {
                    Self::$variant(term)
                }
            }
        )+

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant(term) => ::std::fmt::Display::fmt(term, f)),+
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Level {
        Low,
        Mid,
        High,
    }

    #[test]
    fn test_duplicate_term_is_rejected() {
        let mut terms = Terms::new();

        terms.insert(Level::Low, MembershipFunction::Triangular(0., 0., 1.)).unwrap();

        let err = terms
            .insert(Level::Low, MembershipFunction::Triangular(0., 1., 2.))
            .unwrap_err();

        assert_eq!(err, ConfigError::DuplicateTerm { term: "Low".into() });
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn test_iteration_follows_declaration_order() {
        let terms = Terms::new()
            .with(Level::High, MembershipFunction::Triangular(1., 2., 2.))
            .and_then(|t| t.with(Level::Low, MembershipFunction::Triangular(0., 0., 1.)))
            .and_then(|t| t.with(Level::Mid, MembershipFunction::Triangular(0., 1., 2.)))
            .unwrap();

        let order: Vec<_> = terms.iter().map(|(k, _)| k).collect();

        assert_eq!(order, vec![Level::Low, Level::Mid, Level::High]);
    }
}
