use std::collections::HashSet;

use covergen_explore::{
    audit_covering, CaseSpace, CoveringOptions, CoveringSubset, DontCareFill, EnumerationError,
    Identifiers,
};
use covergen_factory::{
    BigUint, BoxedFactory, ChoicePoint, Factory, Interleaved, Layout, Level, Permuted, Singleton,
    Synthesized, SynthesizedList,
};

const FILLS: [DontCareFill; 2] = [DontCareFill::FirstLevel, DontCareFill::Seeded { seed: 17 }];

/// Least item, then a list of deltas shuffled by a permutation over one more item.
fn sequence_space() -> CaseSpace<Vec<i32>> {
    let least = Level::new(-2..3).unwrap();
    let deltas: Vec<BoxedFactory<Vec<i32>>> = (0..3)
        .map(|count| {
            let children: Vec<BoxedFactory<i32>> = (0..count)
                .map(|_| Level::new(0..3).unwrap().boxed())
                .collect();
            Permuted::with_permutation(children, |deltas: Vec<i32>, perm| {
                let mut items = vec![0];
                for delta in deltas {
                    items.push(items[items.len() - 1] + delta);
                }
                perm.apply(items).unwrap()
            })
            .boxed()
        })
        .collect();
    let shaped = Synthesized::new(
        (least, Interleaved::new(deltas).unwrap()),
        |(least, items): (i32, Vec<i32>)| items.into_iter().map(|i| i + least).collect::<Vec<i32>>(),
    );
    CaseSpace::new(Interleaved::new(vec![Singleton::new(Vec::new()).boxed(), shaped.boxed()]).unwrap())
        .unwrap()
}

/// Flat product of level factors; each case is the vector of chosen levels.
fn levels_space(levels: &[usize]) -> CaseSpace<Vec<usize>> {
    let children: Vec<BoxedFactory<usize>> = levels
        .iter()
        .map(|&count| Level::new(0..count).unwrap().boxed())
        .collect();
    CaseSpace::new(SynthesizedList::new(children, |values: Vec<usize>| values)).unwrap()
}

/// Every `k`-element subset of `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn extend(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for next in start..n {
            current.push(next);
            extend(next + 1, n, k, current, out);
            current.pop();
        }
    }
    let mut out = Vec::new();
    extend(0, n, k, &mut Vec::new(), &mut out);
    out
}

/// Factor sets a covering must realize, found by checking every subset:
/// compatible sets of exactly `strength` factors, and smaller compatible
/// sets no further factor can join.
fn compatible_sets_by_search(layout: &Layout, strength: usize) -> Vec<Vec<usize>> {
    let count = layout.factors().len();
    let compatible = |a: usize, b: usize| layout.compatible(layout.factors()[a].id, layout.factors()[b].id);
    let mut sets = Vec::new();
    for size in 1..=strength.min(count) {
        for set in combinations(count, size) {
            let pairwise = set
                .iter()
                .enumerate()
                .all(|(i, &a)| set[i + 1..].iter().all(|&b| compatible(a, b)));
            if !pairwise {
                continue;
            }
            let maximal = (0..count)
                .filter(|other| !set.contains(other))
                .all(|other| !set.iter().all(|&member| compatible(member, other)));
            if size == strength || maximal {
                sets.push(set);
            }
        }
    }
    sets
}

fn identifiers(space: &CaseSpace<Vec<i32>>, options: &CoveringOptions) -> Vec<BigUint> {
    Identifiers::new(space.covering(options).unwrap()).collect()
}

#[test]
fn test_two_factor_pairs_are_exhaustive() {
    let a = Level::new([0, 1, 2]).unwrap();
    let b = Level::new([10, 20]).unwrap();
    let space = CaseSpace::new(Synthesized::new((a, b), |(a, b)| (a, b))).unwrap();

    let pairs: HashSet<(i32, i32)> = space
        .enumerate_covering(2)
        .unwrap()
        .map(|result| result.unwrap().1)
        .collect();
    let expected: HashSet<(i32, i32)> = [0, 1, 2]
        .into_iter()
        .flat_map(|a| [10, 20].into_iter().map(move |b| (a, b)))
        .collect();

    assert_eq!(pairs, expected);
    assert_eq!(
        space.covering(&CoveringOptions::with_strength(2)).unwrap().len(),
        BigUint::from(6u32)
    );
}

#[test]
fn test_singleton_tree_has_one_case() {
    let space = CaseSpace::new(Singleton::new("only")).unwrap();
    for strength in [1, 2, 7] {
        let cases: Vec<_> = space
            .enumerate_covering(strength)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(cases, vec![(BigUint::from(0u32), "only")]);
    }
}

#[test]
fn test_zero_strength_is_rejected() {
    let space = sequence_space();
    assert!(matches!(
        space.enumerate_covering(0),
        Err(EnumerationError::InvalidStrength(0))
    ));
}

#[test]
fn test_covering_is_complete_at_each_strength() {
    let space = sequence_space();
    for strength in 1..=4 {
        let options = CoveringOptions::with_strength(strength);
        let subset = space.covering(&options).unwrap();
        assert!(!subset.is_exhaustive(), "strength {strength}");
        if strength <= 2 {
            assert!(subset.len() < *space.size(), "strength {strength}");
        }

        let ids = identifiers(&space, &options);
        let report = audit_covering(space.layout(), strength, &ids).unwrap();
        assert!(
            report.is_complete(),
            "strength {strength} missing {:?}",
            report.missing
        );
    }
}

#[test]
fn test_flat_coverings_realize_every_column_combination() {
    for levels in [vec![3, 3, 3, 3], vec![2, 5, 3, 4, 2, 3], vec![2; 10]] {
        let space = levels_space(&levels);
        for strength in 1..=3 {
            for fill in FILLS {
                let options = CoveringOptions { strength, fill };
                let cases: Vec<Vec<usize>> = space
                    .enumerate_covering_with(&options)
                    .unwrap()
                    .map(|result| result.unwrap().1)
                    .collect();

                for columns in combinations(levels.len(), strength) {
                    let seen: HashSet<Vec<usize>> = cases
                        .iter()
                        .map(|case| columns.iter().map(|&column| case[column]).collect())
                        .collect();
                    let expected: usize = columns.iter().map(|&column| levels[column]).product();
                    assert_eq!(
                        seen.len(),
                        expected,
                        "levels {levels:?} strength {strength} {fill:?} columns {columns:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_tree_coverings_realize_every_compatible_combination() {
    let space = sequence_space();
    let layout = space.layout();
    for strength in 1..=3 {
        let sets = compatible_sets_by_search(layout, strength);
        assert!(!sets.is_empty());
        for fill in FILLS {
            let options = CoveringOptions { strength, fill };
            let rows: Vec<Vec<Option<usize>>> = identifiers(&space, &options)
                .iter()
                .map(|identifier| {
                    let mut levels = vec![None; layout.factors().len()];
                    for choice in layout.decode(identifier).unwrap() {
                        if let ChoicePoint::Level { factor, level } = choice {
                            levels[factor.0] = Some(level);
                        }
                    }
                    levels
                })
                .collect();

            for set in &sets {
                let seen: HashSet<Vec<usize>> = rows
                    .iter()
                    .filter_map(|levels| {
                        set.iter()
                            .map(|&factor| levels[factor])
                            .collect::<Option<Vec<_>>>()
                    })
                    .collect();
                let expected: usize = set
                    .iter()
                    .map(|&factor| layout.factors()[factor].levels)
                    .product();
                assert_eq!(
                    seen.len(),
                    expected,
                    "strength {strength} {fill:?} factors {set:?}"
                );
            }
        }
    }
}

#[test]
fn test_strength_beyond_widest_set_walks_whole_domain() {
    let space = sequence_space();
    let subset = space.covering(&CoveringOptions::with_strength(5)).unwrap();
    assert_eq!(
        *subset,
        CoveringSubset::Exhaustive {
            size: space.size().clone()
        }
    );
    assert_eq!(space.enumerate_covering(5).unwrap().count(), 306);
}

#[test]
fn test_larger_strength_selects_more_cases() {
    let space = sequence_space();
    let pairs = space.covering(&CoveringOptions::with_strength(2)).unwrap();
    let triples = space.covering(&CoveringOptions::with_strength(3)).unwrap();
    assert!(pairs.len() <= triples.len());
}

#[test]
fn test_independent_spaces_emit_identical_sequences() {
    let options = CoveringOptions::with_strength(3);
    let first = identifiers(&sequence_space(), &options);
    let second = identifiers(&sequence_space(), &options);
    assert_eq!(first, second);

    let seeded = CoveringOptions {
        strength: 3,
        fill: DontCareFill::Seeded { seed: 2024 },
    };
    assert_eq!(
        identifiers(&sequence_space(), &seeded),
        identifiers(&sequence_space(), &seeded)
    );
}

#[test]
fn test_seeded_fill_keeps_completeness() {
    let space = sequence_space();
    let options = CoveringOptions {
        strength: 2,
        fill: DontCareFill::Seeded { seed: 7 },
    };
    assert!(space.audit(&options).unwrap().is_complete());
}

#[test]
fn test_every_branch_appears() {
    let space = sequence_space();
    let lengths: HashSet<usize> = space
        .enumerate_covering(1)
        .unwrap()
        .map(|result| result.unwrap().1.len())
        .collect();
    assert_eq!(lengths, HashSet::from([0, 1, 2, 3]));
}

#[test]
fn test_options_load_from_json() {
    let options: CoveringOptions =
        serde_json::from_str(r#"{"strength": 3, "fill": {"mode": "seeded", "seed": 5}}"#).unwrap();
    assert_eq!(options.strength, 3);
    assert_eq!(options.fill, DontCareFill::Seeded { seed: 5 });

    let defaults: CoveringOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, CoveringOptions::default());
}
