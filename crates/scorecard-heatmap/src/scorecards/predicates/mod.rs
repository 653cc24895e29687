//! Ad-hoc filter dialogs built from named categories of predicates.
//!
//! Every category holds a set of options. Checked options inside a category
//! combine with OR (the default) or AND; categories always combine with AND,
//! and a category with nothing checked does not constrain the result.

mod rules;

pub use rules::{
    exempt_rule, failing_rule, group_filter_definition, level_filter_definition,
    not_evaluated_rule, passing_rule, rule_filter_definition, rule_filter_definitions,
    team_filter_definition, RuleFilterKind,
};

use std::collections::HashMap;
use std::fmt;

pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Raw option handed to [`FilterDefinition::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterValue<V> {
    pub id: String,
    pub label: String,
    pub value: V,
}

pub struct FilterOption<T> {
    pub id: String,
    pub label: String,
    predicate: Predicate<T>,
}

impl<T> FilterOption<T> {
    pub fn matches(&self, item: &T) -> bool {
        (self.predicate)(item)
    }
}

impl<T> fmt::Debug for FilterOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterOption")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Named category of options, each turned into a predicate up front.
#[derive(Debug)]
pub struct FilterDefinition<T> {
    pub name: String,
    options: Vec<FilterOption<T>>,
}

impl<T> FilterDefinition<T> {
    pub fn new<V, I, G>(name: impl Into<String>, values: I, generate_predicate: G) -> Self
    where
        I: IntoIterator<Item = FilterValue<V>>,
        G: Fn(&V) -> Predicate<T>,
    {
        let options = values
            .into_iter()
            .map(|value| FilterOption {
                predicate: generate_predicate(&value.value),
                id: value.id,
                label: value.label,
            })
            .collect();

        Self {
            name: name.into(),
            options,
        }
    }

    pub fn options(&self) -> &[FilterOption<T>] {
        &self.options
    }

    pub fn option(&self, id: &str) -> Option<&FilterOption<T>> {
        self.options.iter().find(|option| option.id == id)
    }
}

/// How checked options inside one category combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Any,
    All,
}

/// Dialog state: which options are checked, and whether each category is
/// "one of" (OR) or "all of" (AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    checked: HashMap<(String, String), bool>,
    one_of: HashMap<String, bool>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, category: &str, option_id: &str) -> &mut Self {
        self.set_checked(category, option_id, true)
    }

    pub fn set_checked(&mut self, category: &str, option_id: &str, checked: bool) -> &mut Self {
        self.checked
            .insert((category.to_string(), option_id.to_string()), checked);
        self
    }

    pub fn set_one_of(&mut self, category: &str, one_of: bool) -> &mut Self {
        self.one_of.insert(category.to_string(), one_of);
        self
    }

    pub fn is_checked(&self, category: &str, option_id: &str) -> bool {
        self.checked
            .get(&(category.to_string(), option_id.to_string()))
            .copied()
            .unwrap_or(false)
    }

    /// Categories default to "one of".
    pub fn one_of(&self, category: &str) -> bool {
        self.one_of.get(category).copied().unwrap_or(true)
    }

    pub fn combinator(&self, category: &str) -> Combinator {
        if self.one_of(category) {
            Combinator::Any
        } else {
            Combinator::All
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.checked.values().any(|checked| *checked)
    }
}

#[derive(Debug)]
struct CategoryPredicate<'a, T> {
    combinator: Combinator,
    options: Vec<&'a FilterOption<T>>,
}

impl<T> CategoryPredicate<'_, T> {
    fn matches(&self, item: &T) -> bool {
        match self.combinator {
            Combinator::Any => self.options.iter().any(|option| option.matches(item)),
            Combinator::All => self.options.iter().all(|option| option.matches(item)),
        }
    }
}

/// AND of every constrained category.
#[derive(Debug)]
pub struct CombinedFilter<'a, T> {
    categories: Vec<CategoryPredicate<'a, T>>,
}

impl<'a, T> CombinedFilter<'a, T> {
    pub fn matches(&self, item: &T) -> bool {
        self.categories.iter().all(|category| category.matches(item))
    }

    /// True when nothing is checked, so every item matches.
    pub fn is_vacuous(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn apply<'s>(&self, items: &'s [T]) -> Vec<&'s T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    pub fn into_predicate(self) -> impl Fn(&T) -> bool + 'a {
        move |item: &T| self.matches(item)
    }
}

/// Builds the single predicate described by `selection` over `definitions`.
pub fn combine_filters<'a, T>(
    definitions: &'a [FilterDefinition<T>],
    selection: &FilterSelection,
) -> CombinedFilter<'a, T> {
    let categories = definitions
        .iter()
        .filter_map(|definition| {
            let options: Vec<&FilterOption<T>> = definition
                .options
                .iter()
                .filter(|option| selection.is_checked(&definition.name, &option.id))
                .collect();

            if options.is_empty() {
                return None;
            }

            Some(CategoryPredicate {
                combinator: selection.combinator(&definition.name),
                options,
            })
        })
        .collect();

    CombinedFilter { categories }
}
