//! Composable test-case factories.
//!
//! A factory describes a finite domain of test cases and maps every
//! identifier in `[0, size)` to exactly one case. Factories compose
//! bottom-up into a tree:
//! - **Level**: one factor, a finite list of values.
//! - **Singleton**: one fixed value.
//! - **Synthesized**: Cartesian product of children, combined by a typed closure.
//! - **Permuted**: a homogeneous product that also draws a permutation rank.
//! - **Interleaved**: disjoint union of same-typed branches.
//!
//! The tree's type-erased [`Shape`] compiles into a [`Layout`], which the
//! covering enumerator uses to reason about choice-points without touching
//! case values.

pub mod error;
pub mod factory;
pub mod identifier;
pub mod layout;
pub mod permutation;
pub mod shape;

pub use error::FactoryError;
pub use factory::interleaved::Interleaved;
pub use factory::level::Level;
pub use factory::permuted::Permuted;
pub use factory::singleton::Singleton;
pub use factory::synthesized::{FactoryTuple, Synthesized, SynthesizedList};
pub use factory::{BoxedFactory, Factory};
pub use identifier::{case_from_token, deserialize, serialize};
pub use layout::{ChoicePoint, DontCare, FactorId, FactorKind, FirstChoice, Layout, LayoutNode};
pub use num_bigint::BigUint;
pub use permutation::Permutation;
pub use shape::Shape;
