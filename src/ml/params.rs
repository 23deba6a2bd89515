// ============================================================
// Layer 5 - Parameter Listing
// ============================================================
// A flat, ordered view of a model's learnable parameters:
//
//   ("blocks.0.conv.weight", [32, 1, 4])
//   ("blocks.0.conv.bias",   [32])
//   ("blocks.0.norm.gamma",  [32])
//   ...
//
// Names follow the module field paths, which are also the keys
// the named recorder writes. Comparing two listings tells us
// whether a checkpoint fits the model in memory.

use burn::{
    nn::{
        conv::{Conv1d, ConvTranspose1d},
        BatchNorm,
    },
    prelude::*,
};

pub trait ParameterShapes {
    /// Every learnable parameter as (dotted name, shape), in module order.
    fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)>;
}

/// Prepend `prefix.` to every name in `shapes`.
pub fn prefixed(
    prefix: &str,
    shapes: Vec<(String, Vec<usize>)>,
) -> impl Iterator<Item = (String, Vec<usize>)> + '_ {
    shapes
        .into_iter()
        .map(move |(name, dims)| (format!("{prefix}.{name}"), dims))
}

/// Describe the first difference between two listings, for error messages.
pub fn first_difference(
    expected: &[(String, Vec<usize>)],
    found:    &[(String, Vec<usize>)],
) -> Option<String> {
    for (e, f) in expected.iter().zip(found) {
        if e != f {
            return Some(format!("expected {} {:?}, found {} {:?}", e.0, e.1, f.0, f.1));
        }
    }
    match expected.len().cmp(&found.len()) {
        std::cmp::Ordering::Equal   => None,
        std::cmp::Ordering::Greater => Some(format!("missing {}", expected[found.len()].0)),
        std::cmp::Ordering::Less    => Some(format!("unexpected {}", found[expected.len()].0)),
    }
}

impl<B: Backend> ParameterShapes for Conv1d<B> {
    fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let mut shapes = vec![("weight".to_string(), self.weight.dims().to_vec())];
        if let Some(bias) = &self.bias {
            shapes.push(("bias".to_string(), bias.dims().to_vec()));
        }
        shapes
    }
}

impl<B: Backend> ParameterShapes for ConvTranspose1d<B> {
    fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let mut shapes = vec![("weight".to_string(), self.weight.dims().to_vec())];
        if let Some(bias) = &self.bias {
            shapes.push(("bias".to_string(), bias.dims().to_vec()));
        }
        shapes
    }
}

impl<B: Backend, const D: usize> ParameterShapes for BatchNorm<B, D> {
    fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        vec![
            ("gamma".to_string(), self.gamma.dims().to_vec()),
            ("beta".to_string(),  self.beta.dims().to_vec()),
        ]
    }
}
