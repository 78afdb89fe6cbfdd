use std::{cmp::Reverse, collections::BinaryHeap, collections::HashMap};

use super::{Descriptor, DescriptorKind};
use crate::error::ConfigError;

/// Orders descriptors so every `before`/`after` constraint holds.
///
/// Kahn's algorithm with a min-heap on registration index: among descriptors
/// whose constraints are satisfied, the earliest registered goes first, so
/// unconstrained descriptors keep registration order. Constraints naming an
/// unknown identity are ignored.
pub fn resolve<T: ?Sized>(
    kind: DescriptorKind,
    descriptors: Vec<Descriptor<T>>,
) -> Result<Vec<Descriptor<T>>, ConfigError> {
    let n = descriptors.len();
    let mut index = HashMap::with_capacity(n);
    for (i, d) in descriptors.iter().enumerate() {
        if index.insert(d.id(), i).is_some() {
            return Err(ConfigError::DuplicateIdentity {
                kind,
                id: d.id().to_string(),
            });
        }
    }

    let mut successors = vec![Vec::new(); n];
    let mut predecessors = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    let mut edge = |from: usize, to: usize| {
        successors[from].push(to);
        predecessors[to].push(from);
        in_degree[to] += 1;
    };
    for (i, d) in descriptors.iter().enumerate() {
        for target in d.before_ids() {
            match index.get(target) {
                Some(&j) => edge(i, j),
                None => log::debug!("{kind} `{}`: ignoring `before` on unknown `{target}`", d.id()),
            }
        }
        for target in d.after_ids() {
            match index.get(target) {
                Some(&j) => edge(j, i),
                None => log::debug!("{kind} `{}`: ignoring `after` on unknown `{target}`", d.id()),
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);
    let mut done = vec![false; n];
    while let Some(Reverse(i)) = ready.pop() {
        order.push(i);
        done[i] = true;
        for &j in &successors[i] {
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                ready.push(Reverse(j));
            }
        }
    }

    if order.len() < n {
        let cycle = find_cycle(&predecessors, &done)
            .into_iter()
            .map(|i| descriptors[i].id().to_string())
            .collect();
        return Err(ConfigError::CyclicDependency { kind, cycle });
    }

    let mut slots: Vec<Option<Descriptor<T>>> = descriptors.into_iter().map(Some).collect();
    let resolved: Vec<_> = order.into_iter().filter_map(|i| slots[i].take()).collect();
    log::debug!(
        "resolved {kind} order: {}",
        resolved
            .iter()
            .map(|d| d.id())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(resolved)
}

/// Every unresolved node still has an unresolved predecessor, so walking
/// predecessors from any of them must revisit a node. The revisited stretch
/// is one cycle; it is returned in edge direction starting from its lowest
/// registration index.
fn find_cycle(predecessors: &[Vec<usize>], done: &[bool]) -> Vec<usize> {
    let Some(start) = done.iter().position(|d| !d) else {
        return Vec::new();
    };
    let mut seen_at = HashMap::new();
    let mut path = Vec::new();
    let mut current = start;
    while !seen_at.contains_key(&current) {
        seen_at.insert(current, path.len());
        path.push(current);
        match predecessors[current].iter().copied().filter(|&p| !done[p]).min() {
            Some(p) => current = p,
            None => return path,
        }
    }
    let mut cycle = path.split_off(seen_at[&current]);
    cycle.reverse();
    if let Some(lowest) = cycle.iter().enumerate().min_by_key(|(_, i)| **i).map(|(pos, _)| pos) {
        cycle.rotate_left(lowest);
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn d(id: &'static str) -> Descriptor<str> {
        Descriptor::new(id, Arc::from(id))
    }

    fn ids(resolved: &[Descriptor<str>]) -> Vec<&str> {
        resolved.iter().map(|d| d.id()).collect()
    }

    #[test]
    fn unconstrained_keeps_registration_order() {
        let out = resolve(DescriptorKind::BlockFactory, vec![d("a"), d("b"), d("c")]).unwrap();
        assert_eq!(ids(&out), ["a", "b", "c"]);
    }

    #[test]
    fn before_moves_later_registration_forward() {
        let mut c = d("c");
        c.before("a");
        let out = resolve(DescriptorKind::BlockFactory, vec![d("a"), d("b"), c]).unwrap();
        assert_eq!(ids(&out), ["b", "c", "a"]);
    }

    #[test]
    fn after_moves_earlier_registration_back() {
        let mut a = d("a");
        a.after("c");
        let out = resolve(DescriptorKind::InlineParser, vec![a, d("b"), d("c")]).unwrap();
        assert_eq!(ids(&out), ["b", "c", "a"]);
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut a = d("a");
        a.before("missing").after("also.missing");
        let out = resolve(DescriptorKind::PostProcessor, vec![a, d("b")]).unwrap();
        assert_eq!(ids(&out), ["a", "b"]);
    }

    #[test]
    fn two_node_cycle_is_named() {
        let mut a = d("a");
        a.before("b");
        let mut b = d("b");
        b.before("a");
        let err = resolve(DescriptorKind::BlockFactory, vec![d("x"), a, b]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::CyclicDependency {
                kind: DescriptorKind::BlockFactory,
                cycle: vec!["a".into(), "b".into()],
            }
        );
    }

    #[test]
    fn cycle_excludes_nodes_only_downstream_of_it() {
        // a -> b -> c -> b, with d after c
        let mut a = d("a");
        a.before("b");
        let mut b = d("b");
        b.before("c");
        let mut c = d("c");
        c.before("b");
        let mut dd = d("d");
        dd.after("c");
        let err = resolve(DescriptorKind::BlockFactory, vec![a, b, c, dd]).unwrap_err();
        let ConfigError::CyclicDependency { cycle, .. } = err else {
            panic!("expected a cycle, got {err:?}");
        };
        assert_eq!(cycle, ["b", "c"]);
    }

    #[test]
    fn self_constraint_is_a_cycle() {
        let mut a = d("a");
        a.after("a");
        let err = resolve(DescriptorKind::DelimiterProcessor, vec![a]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cyclic ordering constraints among delimiter processor descriptors: a"
        );
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let err = resolve(DescriptorKind::InlineParser, vec![d("a"), d("a")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateIdentity {
                kind: DescriptorKind::InlineParser,
                id: "a".into()
            }
        );
    }
}
