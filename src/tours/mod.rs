//! The guided tours, one per data type. Each tour is a fixed script along with the transcript a
//! fresh database is expected to produce.

pub mod hash;
pub mod integer;
pub mod list;
pub mod set;
pub mod sorted_set;
pub mod string;

use glob_match::glob_match;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::script::Script;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Tour {
    Hash,
    Integer,
    List,
    Set,
    SortedSet,
    String,
}

impl Tour {
    pub fn script(self) -> Script {
        match self {
            Tour::Hash => hash::script(),
            Tour::Integer => integer::script(),
            Tour::List => list::script(),
            Tour::Set => set::script(),
            Tour::SortedSet => sorted_set::script(),
            Tour::String => string::script(),
        }
    }

    /// Whether two runs against a fresh database print the same entries. The set tour pops and
    /// samples random members.
    pub fn is_deterministic(self) -> bool {
        !matches!(self, Tour::Set)
    }

    pub fn all() -> Vec<Tour> {
        Tour::iter().collect()
    }
}

/// Tours whose name matches any of the glob patterns, in declaration order.
pub fn select<S: AsRef<str>>(patterns: &[S]) -> Vec<Tour> {
    Tour::iter()
        .filter(|tour| {
            patterns
                .iter()
                .any(|pattern| glob_match(pattern.as_ref(), tour.as_ref()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn every_tour_is_well_formed() {
        for tour in Tour::all() {
            let script = tour.script();

            assert_eq!(script.name, tour.as_ref());
            assert_eq!(script.validate(), Ok(()), "{}", tour);
            assert!(!script.steps.is_empty(), "{}", tour);
            assert!(script.expected.len() >= script.steps.len(), "{}", tour);
        }
    }

    #[test]
    fn tour_names() {
        assert_eq!(Tour::SortedSet.to_string(), "sorted_set");
        assert_eq!(Tour::from_str("integer").unwrap(), Tour::Integer);
        assert!(Tour::from_str("stream").is_err());
    }

    #[test]
    fn select_by_glob() {
        assert_eq!(
            select(&["s*"]),
            vec![Tour::Set, Tour::SortedSet, Tour::String]
        );
        assert_eq!(select(&["hash", "list"]), vec![Tour::Hash, Tour::List]);
        assert_eq!(select(&["*"]), Tour::all());
        assert!(select(&["nothing"]).is_empty());
    }

    #[test]
    fn only_some_tours_need_a_single_node() {
        let multi_key: Vec<Tour> = Tour::all()
            .into_iter()
            .filter(|tour| tour.script().uses_multi_key_commands())
            .collect();

        assert_eq!(
            multi_key,
            vec![
                Tour::Integer,
                Tour::List,
                Tour::Set,
                Tour::SortedSet,
                Tour::String
            ]
        );
    }
}
