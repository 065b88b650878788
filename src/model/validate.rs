use std::fmt;

use itertools::Itertools;

/// A structural problem detected in a container.
///
/// Issues are data, recomputed on demand. They never block editing and are
/// surfaced to the user; only code export refuses to run while any remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// An FSM with no entry state.
    NoEntryState { element: String },
    /// A behaviour tree with more than one root node.
    MoreThanOneRoot { element: String },
    /// A utility action node with no contributing factor connected.
    NoFactors { element: String, node: String },
    /// Two siblings sharing the same display name.
    RepeatedName { element: String, name: String },
}

impl Issue {
    /// Presentation priority; lower is surfaced first.
    pub fn priority(&self) -> u8 {
        match self {
            Issue::NoEntryState { .. } => 0,
            Issue::MoreThanOneRoot { .. } => 0,
            Issue::NoFactors { .. } => 1,
            Issue::RepeatedName { .. } => 2,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::NoEntryState { element } => {
                write!(f, "FSM '{element}' needs an entry state")
            }
            Issue::MoreThanOneRoot { element } => {
                write!(f, "behaviour tree '{element}' has more than one root node")
            }
            Issue::NoFactors { element, node } => {
                write!(
                    f,
                    "action node '{node}' in '{element}' has no factor connected to it"
                )
            }
            Issue::RepeatedName { element, name } => {
                write!(f, "the name '{name}' is repeated inside '{element}'")
            }
        }
    }
}

/// Sorts so the most severe issues come first, like the editor's
/// error-by-priority display.
pub(crate) fn sort_by_priority(issues: &mut [Issue]) {
    issues.sort_by_key(Issue::priority);
}

/// Flags every display name used by more than one sibling.
pub(crate) fn repeated_names<'a>(
    element: &str,
    names: impl Iterator<Item = &'a str>,
) -> Vec<Issue> {
    names
        .duplicates()
        .map(|name| Issue::RepeatedName {
            element: element.to_string(),
            name: name.to_string(),
        })
        .collect()
}
