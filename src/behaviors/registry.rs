/*!
# Operation Catalogue

A compile-time registry of `Behavior` implementations, standing in for dynamic plugin
discovery (§9): every behavior is known and linked in at build time, selected at model
assembly time by arity and noise class. Component E of the pipeline.
*/

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

/// Draws a fresh `StdRng` from `rng`, for a behavior that needs its own private random
/// source to draw from inside `calculate` (which takes `&self`, not `&mut self`).
/// Keeping this seeding on the one threaded-through `StdRng` (§5's determinism
/// requirement) instead of reaching for `rand::rng()`'s thread-local source is what
/// makes a `--seed`'d run fully reproducible end to end.
pub(crate) fn child_rng(rng: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(rng.random())
}

/// Something a `ModelNode` can be bound to: takes its parents' values, produces one of
/// its own, and can describe itself for DOT rendering.
pub trait Behavior: std::fmt::Debug {
    /// Computes this behavior's output given its parents' already-evaluated values, in
    /// the order they were bound.
    fn calculate(&self, args: &[f64]) -> f64;

    /// Builds the display name for this node, given its parents' display names in the
    /// same order.
    fn generate_name(&self, names: &[String]) -> String;
}

/// Inclusive arity range a behavior accepts.
#[derive(Debug, Clone, Copy)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const fn fixed(n: usize) -> Self {
        Arity { min: n, max: n }
    }

    pub const fn at_least(n: usize) -> Self {
        Arity { min: n, max: usize::MAX }
    }

    pub fn contains(&self, n: usize) -> bool {
        n >= self.min && n <= self.max
    }
}

/// A catalogue entry: enough to list, filter, and freshly instantiate a behavior.
pub struct BehaviorSpec {
    pub name: &'static str,
    pub arity: Arity,
    pub is_noise: bool,
    pub make: fn(&mut StdRng) -> Box<dyn Behavior>,
}

/// The full compile-time catalogue, in no particular order. Callers filter by arity and
/// noise class rather than relying on registration order.
pub fn catalogue() -> Vec<BehaviorSpec> {
    let mut specs = Vec::new();
    specs.extend(super::generators::specs());
    specs.extend(super::unary::specs());
    specs.extend(super::binary::specs());
    specs.extend(super::nary::specs());
    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_contains() {
        let a = Arity::fixed(2);
        assert!(a.contains(2));
        assert!(!a.contains(1));
        assert!(!a.contains(3));

        let b = Arity::at_least(2);
        assert!(b.contains(2));
        assert!(b.contains(100));
        assert!(!b.contains(1));
    }

    #[test]
    fn test_catalogue_covers_every_named_operator() {
        let names: Vec<&str> = catalogue().iter().map(|s| s.name).collect();
        for expected in [
            "uniformGenerator",
            "gaussianGenerator",
            "coinFlipGenerator",
            "negate",
            "oneMinus",
            "reciprocal",
            "baseConversion",
            "intTruncate",
            "modOne",
            "scale",
            "translate",
            "logarithm",
            "blockyScatter",
            "multiplex",
            "gaussianFuzz",
            "discretize",
            "sieve",
            "identity",
            "multiply",
            "compareNormalized",
            "absDiff",
            "smallRatio",
            "sum",
            "mean",
            "min",
            "max",
            "bitAnd",
            "bitOr",
            "bitXor",
            "downregulate",
            "not",
        ] {
            assert!(names.contains(&expected), "catalogue missing {}", expected);
        }
    }
}
