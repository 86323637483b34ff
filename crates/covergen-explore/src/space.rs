//! A factory tree paired with its compiled layout and covering cache.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use covergen_factory::{case_from_token, BigUint, BoxedFactory, Factory, FactoryError, Layout};
use tracing::debug;

use crate::error::EnumerationError;
use crate::options::CoveringOptions;
use crate::solver::coverage::{audit_covering, covering_subset, CoverageReport};
use crate::subset::{CoveringSubset, Identifiers};

/// Owns a factory tree and serves its covering and exhaustive sequences.
///
/// Covering subsets are computed on first request and cached per
/// [`CoveringOptions`]. The cache lock is held while computing, so
/// concurrent first callers wait for a single computation.
pub struct CaseSpace<T> {
    root: BoxedFactory<T>,
    layout: Layout,
    cache: Mutex<BTreeMap<CoveringOptions, Arc<CoveringSubset>>>,
}

impl<T: 'static> CaseSpace<T> {
    /// Compile `root`'s shape; fails if a hand-written factory reports a
    /// shape with an empty union or a level leaf without levels.
    pub fn new<F>(root: F) -> Result<Self, FactoryError>
    where
        F: Factory<Case = T> + 'static,
    {
        let layout = Layout::compile(&root.shape())?;
        debug!(
            size = %layout.size(),
            factors = layout.factors().len(),
            nodes = layout.node_count(),
            "compiled case space"
        );
        Ok(Self {
            root: root.boxed(),
            layout,
            cache: Mutex::new(BTreeMap::new()),
        })
    }
}

impl<T> CaseSpace<T> {
    pub fn root(&self) -> &dyn Factory<Case = T> {
        self.root.as_ref()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn size(&self) -> &BigUint {
        self.layout.size()
    }

    pub fn case_at(&self, identifier: &BigUint) -> Result<T, FactoryError> {
        self.root.case_at(identifier)
    }

    /// Decode a reproduction token back into its case.
    pub fn case_from_token(&self, token: &str) -> Result<T, FactoryError> {
        case_from_token(self.root.as_ref(), token)
    }

    /// The cached covering subset for `options`, computing it on first use.
    pub fn covering(
        &self,
        options: &CoveringOptions,
    ) -> Result<Arc<CoveringSubset>, EnumerationError> {
        options.validate()?;
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(subset) = cache.get(options) {
            return Ok(Arc::clone(subset));
        }
        let subset = Arc::new(covering_subset(&self.layout, options)?);
        cache.insert(*options, Arc::clone(&subset));
        Ok(subset)
    }

    /// Lazy strength-`strength` covering sequence with default options.
    pub fn enumerate_covering(&self, strength: usize) -> Result<Cases<'_, T>, EnumerationError> {
        self.enumerate_covering_with(&CoveringOptions::with_strength(strength))
    }

    pub fn enumerate_covering_with(
        &self,
        options: &CoveringOptions,
    ) -> Result<Cases<'_, T>, EnumerationError> {
        let subset = self.covering(options)?;
        Ok(Cases::new(self, Identifiers::new(subset)))
    }

    /// Lazy walk over every identifier in `[0, size)`.
    pub fn enumerate_exhaustive(&self) -> Cases<'_, T> {
        let subset = Arc::new(CoveringSubset::Exhaustive {
            size: self.size().clone(),
        });
        Cases::new(self, Identifiers::new(subset))
    }

    /// Audit the cached covering subset for `options` at its own strength.
    pub fn audit(&self, options: &CoveringOptions) -> Result<CoverageReport, EnumerationError> {
        let identifiers: Vec<BigUint> = Identifiers::new(self.covering(options)?).collect();
        audit_covering(&self.layout, options.strength, &identifiers)
    }
}

/// Lazy `(identifier, case)` sequence over a [`CaseSpace`].
///
/// Cases are decoded one at a time as the iterator advances.
pub struct Cases<'a, T> {
    space: &'a CaseSpace<T>,
    identifiers: Identifiers,
}

impl<'a, T> Cases<'a, T> {
    fn new(space: &'a CaseSpace<T>, identifiers: Identifiers) -> Self {
        Self { space, identifiers }
    }

    /// The remaining identifiers, without decoding cases.
    pub fn identifiers(&self) -> &Identifiers {
        &self.identifiers
    }

    /// Restart from the first identifier.
    pub fn rewind(&mut self) {
        self.identifiers.rewind();
    }
}

impl<T> Clone for Cases<'_, T> {
    fn clone(&self) -> Self {
        Self {
            space: self.space,
            identifiers: self.identifiers.clone(),
        }
    }
}

impl<T> Iterator for Cases<'_, T> {
    type Item = Result<(BigUint, T), FactoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        let identifier = self.identifiers.next()?;
        Some(
            self.space
                .case_at(&identifier)
                .map(|case| (identifier, case)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.identifiers.size_hint()
    }
}
