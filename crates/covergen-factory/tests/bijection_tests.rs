use covergen_factory::identifier::{deserialize, serialize};
use covergen_factory::layout::FirstChoice;
use covergen_factory::{
    case_from_token, BigUint, BoxedFactory, ChoicePoint, Factory, FactoryError, Interleaved,
    Layout, Level, Permuted, Singleton, Synthesized,
};
use num_traits::ToPrimitive;
use proptest::prelude::*;

/// Least item, then a list of deltas shuffled by a permutation over one more item.
fn sequence_factory() -> BoxedFactory<Vec<i32>> {
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
    Interleaved::new(vec![Singleton::new(Vec::new()).boxed(), shaped.boxed()])
        .unwrap()
        .boxed()
}

#[test]
fn test_size_composition() {
    let factory = sequence_factory();
    // 1 + 5 * (1 + 3 * 2! + 9 * 3!)
    assert_eq!(factory.size(), BigUint::from(1u32 + 5 * (1 + 6 + 54)));
    assert_eq!(Layout::compile(&factory.shape()).unwrap().size(), &factory.size());
}

#[test]
fn test_every_case_reproduces_from_its_token() {
    let factory = sequence_factory();
    let size = factory.size().to_u64().unwrap();
    for id in 0..size {
        let id = BigUint::from(id);
        let direct = factory.case_at(&id).unwrap();
        let token = serialize(&id);
        assert_eq!(deserialize(&token).unwrap(), id);
        assert_eq!(case_from_token(&factory, &token).unwrap(), direct);
    }
}

#[test]
fn test_token_outside_domain_is_malformed() {
    let factory = sequence_factory();
    let token = serialize(&factory.size());
    assert!(matches!(
        case_from_token(&factory, &token),
        Err(FactoryError::MalformedToken { .. })
    ));
    assert!(matches!(
        case_from_token(&factory, "twelve"),
        Err(FactoryError::MalformedToken { .. })
    ));
}

#[test]
fn test_layout_choices_match_decoded_values() {
    let a = Level::new(vec![0usize, 1, 2]).unwrap();
    let b = Level::new(vec![0usize, 1]).unwrap();
    let pairs = Synthesized::new((a, b), |(x, y)| (x, y));
    let layout = Layout::compile(&pairs.shape()).unwrap();
    for id in 0..6u32 {
        let id = BigUint::from(id);
        let (x, y) = pairs.case_at(&id).unwrap();
        let choices = layout.decode(&id).unwrap();
        assert_eq!(
            choices,
            vec![
                ChoicePoint::Level {
                    factor: covergen_factory::FactorId(0),
                    level: x
                },
                ChoicePoint::Level {
                    factor: covergen_factory::FactorId(1),
                    level: y
                },
            ]
        );
    }
}

proptest! {
    #[test]
    fn prop_layout_roundtrip(id in 0u64..306) {
        let factory = sequence_factory();
        let layout = Layout::compile(&factory.shape()).unwrap();
        let id = BigUint::from(id);
        let mut assignment = vec![None; layout.factors().len()];
        for choice in layout.decode(&id).unwrap() {
            if let ChoicePoint::Level { factor, level } = choice {
                assignment[factor.0] = Some(level);
            }
        }
        prop_assert_eq!(layout.encode(&assignment, &mut FirstChoice).unwrap(), id);
    }

    #[test]
    fn prop_token_roundtrip(digits in "[1-9][0-9]{0,60}") {
        let id = deserialize(&digits).unwrap();
        prop_assert_eq!(serialize(&id), digits);
    }
}
