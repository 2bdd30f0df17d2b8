//! Binding Type Classification
//!
//! Decides how a bound expression is wired to its target from the requested
//! sigil, whether the expression is a bare identifier, and how many of its
//! free variables are observable.

use crate::ml_parser::Sigil;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// One-time write of the expression value.
    Value,
    /// `expression.subscribe(observer)`.
    Subscribe,
    /// First emitted value of a bare observable.
    First,
    /// Projection of a single observable.
    Map,
    /// Projection of a single observable, first value only.
    MapFirst,
    /// Projection over several observables.
    Combine,
    /// Projection over several observables, first value only.
    CombineFirst,
}

impl BindingType {
    /// Whether the binding keeps a subscription that must be released.
    pub fn is_subscription(self) -> bool {
        !matches!(self, BindingType::Value)
    }

    /// Whether the derivation helper takes the trailing `once` flag.
    pub fn is_first_only(self) -> bool {
        matches!(self, BindingType::MapFirst | BindingType::CombineFirst)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindingType::Value => "value",
            BindingType::Subscribe => "subscribe",
            BindingType::First => "first",
            BindingType::Map => "map",
            BindingType::MapFirst => "map-first",
            BindingType::Combine => "combine",
            BindingType::CombineFirst => "combine-first",
        }
    }
}

/// Classify a binding. Rows are checked top to bottom, first match wins.
pub fn classify(sigil: Sigil, is_identifier: bool, observable_count: usize) -> BindingType {
    match sigil {
        Sigil::Subscribe => BindingType::Subscribe,
        Sigil::Once => match (is_identifier, observable_count) {
            (true, _) => BindingType::First,
            (false, 0) => BindingType::Value,
            (false, 1) => BindingType::MapFirst,
            (false, _) => BindingType::CombineFirst,
        },
        // An unmarked expression over observables is mapped like `*`.
        Sigil::Map | Sigil::None => match (is_identifier, observable_count) {
            (_, 0) => BindingType::Value,
            (true, _) => BindingType::Subscribe,
            (false, 1) => BindingType::Map,
            (false, _) => BindingType::Combine,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_always_wins() {
        assert_eq!(classify(Sigil::Subscribe, false, 0), BindingType::Subscribe);
        assert_eq!(classify(Sigil::Subscribe, true, 3), BindingType::Subscribe);
    }

    #[test]
    fn none_without_observables_is_value() {
        assert_eq!(classify(Sigil::None, false, 0), BindingType::Value);
        assert_eq!(classify(Sigil::None, true, 0), BindingType::Value);
    }

    #[test]
    fn once_rows() {
        assert_eq!(classify(Sigil::Once, true, 0), BindingType::First);
        assert_eq!(classify(Sigil::Once, true, 1), BindingType::First);
        assert_eq!(classify(Sigil::Once, false, 1), BindingType::MapFirst);
        assert_eq!(classify(Sigil::Once, false, 2), BindingType::CombineFirst);
        assert_eq!(classify(Sigil::Once, false, 0), BindingType::Value);
    }

    #[test]
    fn map_rows() {
        assert_eq!(classify(Sigil::Map, false, 0), BindingType::Value);
        assert_eq!(classify(Sigil::Map, true, 0), BindingType::Value);
        assert_eq!(classify(Sigil::Map, true, 1), BindingType::Subscribe);
        assert_eq!(classify(Sigil::Map, false, 1), BindingType::Map);
        assert_eq!(classify(Sigil::Map, false, 4), BindingType::Combine);
    }

    #[test]
    fn unmarked_observables_map() {
        assert_eq!(classify(Sigil::None, true, 1), BindingType::Subscribe);
        assert_eq!(classify(Sigil::None, false, 1), BindingType::Map);
        assert_eq!(classify(Sigil::None, false, 2), BindingType::Combine);
    }

    #[test]
    fn subscription_flags() {
        assert!(!BindingType::Value.is_subscription());
        assert!(BindingType::First.is_subscription());
        assert!(BindingType::MapFirst.is_first_only());
        assert!(!BindingType::Map.is_first_only());
    }
}
