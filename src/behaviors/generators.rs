/*!
Zero-arity behaviors: the source-node generators that terminate recursive evaluation.
*/

use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::cell::RefCell;

use super::registry::{Arity, Behavior, BehaviorSpec, child_rng};

#[derive(Debug)]
struct UniformGenerator {
    rng: RefCell<StdRng>,
}

impl Behavior for UniformGenerator {
    fn calculate(&self, _args: &[f64]) -> f64 {
        // A fresh draw per call is the point: memoization in `evaluate` is what gives a
        // node a stable value within one row.
        self.rng.borrow_mut().random_range(0.0..1.0)
    }

    fn generate_name(&self, _names: &[String]) -> String {
        "rand()".to_string()
    }
}

#[derive(Debug)]
struct GaussianGenerator {
    mean: f64,
    stddev: f64,
    rng: RefCell<StdRng>,
}

impl Behavior for GaussianGenerator {
    fn calculate(&self, _args: &[f64]) -> f64 {
        let dist = Normal::new(self.mean, self.stddev.max(1e-12)).expect("valid stddev");
        dist.sample(&mut *self.rng.borrow_mut())
    }

    fn generate_name(&self, _names: &[String]) -> String {
        format!("gaussian_random(mean={}, stddev={})", self.mean, self.stddev)
    }
}

#[derive(Debug)]
struct CoinFlipGenerator {
    rng: RefCell<StdRng>,
}

impl Behavior for CoinFlipGenerator {
    fn calculate(&self, _args: &[f64]) -> f64 {
        if self.rng.borrow_mut().random_bool(0.5) { 1.0 } else { 0.0 }
    }

    fn generate_name(&self, _names: &[String]) -> String {
        "<50.0% coin flip>".to_string()
    }
}

pub fn specs() -> Vec<BehaviorSpec> {
    vec![
        BehaviorSpec {
            name: "uniformGenerator",
            arity: Arity::fixed(0),
            is_noise: false,
            make: |rng| Box::new(UniformGenerator { rng: RefCell::new(child_rng(rng)) }),
        },
        BehaviorSpec {
            name: "gaussianGenerator",
            arity: Arity::fixed(0),
            is_noise: false,
            make: |rng: &mut StdRng| {
                let mean = Normal::new(0.0, 0.5).expect("valid").sample(rng);
                let stddev = Normal::new(0.2, 0.4).expect("valid").sample(rng).abs();
                Box::new(GaussianGenerator { mean, stddev, rng: RefCell::new(child_rng(rng)) })
            },
        },
        BehaviorSpec {
            name: "coinFlipGenerator",
            arity: Arity::fixed(0),
            is_noise: false,
            make: |rng| Box::new(CoinFlipGenerator { rng: RefCell::new(child_rng(rng)) }),
        },
    ]
}
