//! Layout of curve parameters in a simultaneously built block of curves.
//!
//! When several curves are calibrated together their parameters are stacked
//! into a single vector. A [`CurveBuildingBlock`] records where each curve's
//! slice starts and how long it is. A [`CurveBuildingBlockBundle`] keeps, for
//! every calibrated curve, the block it belongs to together with the matrix of
//! derivatives of that curve's parameters with respect to the market quotes of
//! the block's instruments.

use std::collections::{BTreeMap, HashMap};

use nalgebra::DMatrix;

use crate::error::{CurveError, CurveResult};

/// Curve name to `(start, number of parameters)` mapping.
///
/// Names keep their insertion order. Equality and hashing only look at the
/// mapping itself.
#[derive(Debug, Clone, Default)]
pub struct CurveBuildingBlock {
    order: Vec<String>,
    slices: BTreeMap<String, (usize, usize)>,
}

impl CurveBuildingBlock {
    /// Creates a block from `(name, (start, number of parameters))` entries.
    ///
    /// Fails if a name is repeated or two slices overlap, and when the end of a
    /// slice overflows `usize`.
    pub fn new<I, S>(entries: I) -> CurveResult<Self>
    where
        I: IntoIterator<Item = (S, (usize, usize))>,
        S: Into<String>,
    {
        let mut block = Self::default();
        for (name, (start, length)) in entries {
            let name = name.into();
            if block.slices.contains_key(&name) {
                return Err(CurveError::invalid_value(format!(
                    "curve {name} appears twice in the building block"
                )));
            }
            let end = start.checked_add(length).ok_or_else(|| {
                CurveError::invalid_value(format!(
                    "slice of curve {name} at {start} with {length} parameters overflows"
                ))
            })?;
            let overlapping = block.slices.iter().find(|(_, slice)| {
                let (s, l) = **slice;
                length > 0 && l > 0 && start < s + l && s < end
            });
            if let Some((other, _)) = overlapping {
                return Err(CurveError::invalid_value(format!(
                    "curves {other} and {name} overlap in the building block"
                )));
            }
            block.order.push(name.clone());
            block.slices.insert(name, (start, length));
        }
        Ok(block)
    }

    /// Start of the named curve's slice.
    pub fn start(&self, name: &str) -> CurveResult<usize> {
        self.slice(name).map(|(start, _)| start)
    }

    /// Length of the named curve's slice.
    pub fn number_of_parameters(&self, name: &str) -> CurveResult<usize> {
        self.slice(name).map(|(_, length)| length)
    }

    /// `(start, length)` of the named curve's slice.
    pub fn slice(&self, name: &str) -> CurveResult<(usize, usize)> {
        self.slices
            .get(name)
            .copied()
            .ok_or_else(|| CurveError::curve_not_found(name))
    }

    /// Returns true if the curve belongs to the block.
    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    /// Curve names in insertion order.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Length of the stacked parameter vector.
    pub fn total_parameters(&self) -> usize {
        self.slices
            .values()
            .map(|(start, length)| start + length)
            .max()
            .unwrap_or(0)
    }
}

impl PartialEq for CurveBuildingBlock {
    fn eq(&self, other: &Self) -> bool {
        self.slices == other.slices
    }
}

impl Eq for CurveBuildingBlock {}

impl std::hash::Hash for CurveBuildingBlock {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.slices.hash(state);
    }
}

/// Building blocks and parameter/market-quote Jacobians by curve name.
#[derive(Debug, Clone, Default)]
pub struct CurveBuildingBlockBundle {
    order: Vec<String>,
    blocks: HashMap<String, (CurveBuildingBlock, DMatrix<f64>)>,
}

impl CurveBuildingBlockBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bundle from `(name, (block, matrix))` entries.
    pub fn from_map<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, (CurveBuildingBlock, DMatrix<f64>))>,
        S: Into<String>,
    {
        let mut bundle = Self::new();
        for (name, entry) in entries {
            bundle.add(name, entry.0, entry.1);
        }
        bundle
    }

    /// Adds or replaces the entry for a curve.
    pub fn add(&mut self, name: impl Into<String>, block: CurveBuildingBlock, matrix: DMatrix<f64>) {
        let name = name.into();
        if !self.blocks.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.blocks.insert(name, (block, matrix));
    }

    /// Adds every entry of `other`, replacing entries with the same name.
    pub fn add_all(&mut self, other: &CurveBuildingBlockBundle) {
        for name in &other.order {
            if let Some((block, matrix)) = other.blocks.get(name) {
                self.add(name.clone(), block.clone(), matrix.clone());
            }
        }
    }

    /// Block and Jacobian of the named curve.
    pub fn block(&self, name: &str) -> Option<&(CurveBuildingBlock, DMatrix<f64>)> {
        self.blocks.get(name)
    }

    /// Curve names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of curves.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl PartialEq for CurveBuildingBlockBundle {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}
