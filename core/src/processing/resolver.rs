//! Dependency declarations and the enumeration of operational combinations.

use std::collections::HashSet;

/// Dependency names a node can run from, in declaration order.
pub type Combination = Vec<&'static str>;

/// One group of a node's declared dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyGroup {
    /// Must be present in every combination.
    Required(&'static str),
    /// Any subset of at least `min_count` names; empty when `min_count` is 0.
    OptionalGroup {
        names: &'static [&'static str],
        min_count: usize,
    },
    /// Exactly one of the listed sets, each taken whole.
    Alternatives(&'static [&'static [&'static str]]),
}

impl DependencyGroup {
    fn names(&self) -> Vec<&'static str> {
        match self {
            DependencyGroup::Required(name) => vec![*name],
            DependencyGroup::OptionalGroup { names, .. } => names.to_vec(),
            DependencyGroup::Alternatives(sets) => sets.iter().flat_map(|s| s.iter().copied()).collect(),
        }
    }

    /// Candidate selections from this group, each paired with how many optional
    /// names it contributes.
    fn choices(&self) -> Vec<(Vec<&'static str>, usize)> {
        match self {
            DependencyGroup::Required(name) => vec![(vec![*name], 0)],
            DependencyGroup::OptionalGroup { names, min_count } => subsets_by_size(names)
                .into_iter()
                .filter(|subset| subset.len() >= *min_count)
                .map(|subset| {
                    let optional = subset.len();
                    (subset, optional)
                })
                .collect(),
            DependencyGroup::Alternatives(sets) => sets.iter().map(|set| (set.to_vec(), 0)).collect(),
        }
    }

    fn is_optional(&self) -> bool {
        matches!(self, DependencyGroup::OptionalGroup { .. })
    }
}

/// Every declared name once, in first-declaration order.
pub fn dependency_names(groups: &[DependencyGroup]) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(DependencyGroup::names)
        .filter(|name| seen.insert(*name))
        .collect()
}

/// All legal dependency subsets for a node, deterministic and duplicate free.
///
/// Groups are combined as a cartesian product in declaration order, the first
/// group varying slowest. When any optional group is declared, a selection
/// that uses none of the optional names is not operational.
pub fn operational_combinations(groups: &[DependencyGroup]) -> Vec<Combination> {
    let order = dependency_names(groups);
    let has_optional = groups.iter().any(DependencyGroup::is_optional);

    let mut partial: Vec<(Vec<&'static str>, usize)> = vec![(Vec::new(), 0)];
    for group in groups {
        let choices = group.choices();
        partial = partial
            .iter()
            .flat_map(|(names, optional)| {
                choices.iter().map(move |(choice, extra)| {
                    let mut merged = names.clone();
                    merged.extend(choice.iter().copied());
                    (merged, optional + extra)
                })
            })
            .collect();
    }

    let mut seen: HashSet<Combination> = HashSet::new();
    let mut combinations = Vec::new();
    for (names, optional) in partial {
        if has_optional && optional == 0 {
            continue;
        }
        let combination: Combination = order
            .iter()
            .copied()
            .filter(|name| names.contains(name))
            .collect();
        if combination.is_empty() || !seen.insert(combination.clone()) {
            continue;
        }
        combinations.push(combination);
    }
    combinations
}

/// Picks the combination using the most available names; ties go to the
/// earliest. `None` when nothing is satisfiable.
pub fn select_combination<'a, F>(combinations: &'a [Combination], is_available: F) -> Option<&'a Combination>
where
    F: Fn(&str) -> bool,
{
    combinations
        .iter()
        .filter(|combination| combination.iter().all(|name| is_available(name)))
        .fold(None, |best: Option<&Combination>, candidate| match best {
            Some(current) if current.len() >= candidate.len() => Some(current),
            _ => Some(candidate),
        })
}

/// Every subset, smallest first, then by declaration position.
fn subsets_by_size(names: &[&'static str]) -> Vec<Vec<&'static str>> {
    let mut subsets = vec![Vec::new()];
    for size in 1..=names.len() {
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            subsets.push(indices.iter().map(|i| names[*i]).collect());
            let Some(position) = (0..size).rev().find(|&p| indices[p] != p + names.len() - size) else {
                break;
            };
            indices[position] += 1;
            for next in position + 1..size {
                indices[next] = indices[next - 1] + 1;
            }
        }
    }
    subsets
}
