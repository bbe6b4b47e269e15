//! Test items, attribute weighting, and the attribute vectors clustered over
//!
//! An item is one sentence of a test suite together with the attributes
//! (grammar rules, lexical types, ...) found in each of its results. Every
//! attribute seen in a comparison gets a *cluster weight* derived from how
//! much its frequency changed between the two grammar versions; an item's
//! vector holds that weight in every dimension whose attribute it carries.

use crate::point::Point;
use ndarray::Array1;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Identifier of a test item, unique within one comparison
pub type ItemId = u64;

/// A test item and the attributes found in each of its results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    results: Vec<BTreeSet<String>>,
    attributes: BTreeSet<String>,
}

impl Item {
    /// Create an item from the attribute sets of its results
    pub fn new<R, A, S>(id: ItemId, results: R) -> Self
    where
        R: IntoIterator<Item = A>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let results: Vec<BTreeSet<String>> = results
            .into_iter()
            .map(|result| result.into_iter().map(Into::into).collect())
            .collect();
        let attributes = results.iter().flatten().cloned().collect();

        Self {
            id,
            results,
            attributes,
        }
    }

    /// Item identifier
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Per-result attribute sets
    pub fn results(&self) -> &[BTreeSet<String>] {
        &self.results
    }

    /// Union of the attributes over all results
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    /// Whether any result of this item carries `name`
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }
}

/// How an attribute's cluster weight is derived from its frequency change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeightingMode {
    /// Absolute difference of the idf scores in both grammars
    #[default]
    DeltaIdf,
    /// Square of the idf difference, sharpening large changes
    DeltaIdf2,
    /// Absolute change in the number of items carrying the attribute
    Count,
}

impl std::str::FromStr for WeightingMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "delta_idf" => Ok(Self::DeltaIdf),
            "delta_idf2" => Ok(Self::DeltaIdf2),
            "count" => Ok(Self::Count),
            other => Err(crate::Error::invalid_parameter(format!(
                "weighting must be one of \"delta_idf\", \"delta_idf2\" or \"count\", got {other:?}"
            ))),
        }
    }
}

/// An attribute of the comparison with its frequency change and weight
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name as it appears in item results
    pub name: String,
    /// Items carrying it under the previous grammar
    pub prev_count: usize,
    /// Items carrying it under the new grammar
    pub new_count: usize,
    /// `new_count - prev_count`
    pub change: i64,
    /// Difference of idf scores between the grammars
    pub weight: f64,
    /// Value placed in an item's vector when it carries this attribute
    pub cluster_weight: f64,
}

impl Attribute {
    /// Compute the weights of an attribute.
    ///
    /// `prev_parses` and `new_parses` are the numbers of parsing items under
    /// each grammar; both enter each idf so the scores are comparable.
    pub fn new(
        name: impl Into<String>,
        prev_count: usize,
        new_count: usize,
        prev_parses: usize,
        new_parses: usize,
        mode: WeightingMode,
    ) -> Self {
        let parses = (prev_parses + new_parses) as f64;
        let prev_idf = (parses / (1.0 + prev_count as f64) + 1.0).ln();
        let new_idf = (parses / (1.0 + new_count as f64) + 1.0).ln();
        let weight = (new_idf - prev_idf).abs();
        let change = new_count as i64 - prev_count as i64;

        let cluster_weight = match mode {
            WeightingMode::Count => change.unsigned_abs() as f64,
            WeightingMode::DeltaIdf2 => weight.powi(2),
            WeightingMode::DeltaIdf => weight,
        };

        Self {
            name: name.into(),
            prev_count,
            new_count,
            change,
            weight,
            cluster_weight,
        }
    }
}

/// Build one point per item that produced at least one result.
///
/// Dimension `i` of a point is `attributes[i].cluster_weight` when any result
/// of the item carries that attribute, and zero otherwise.
pub fn build_points(attributes: &[Attribute], items: &[Arc<Item>]) -> Vec<Point> {
    items
        .iter()
        .filter(|item| !item.results().is_empty())
        .map(|item| {
            let coords = Array1::from_iter(attributes.iter().map(|attribute| {
                let carried = item
                    .results()
                    .iter()
                    .any(|result| result.contains(&attribute.name));
                if carried {
                    attribute.cluster_weight
                } else {
                    0.0
                }
            }));
            Point::with_item(coords, Arc::clone(item))
        })
        .collect()
}
