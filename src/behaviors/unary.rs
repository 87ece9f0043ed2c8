/*!
1-ary behaviors: pure transforms and noise injectors that take exactly one parent value.
*/

use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::cell::RefCell;

use super::registry::{Arity, Behavior, BehaviorSpec, child_rng};

fn pick_sign(rng: &mut impl Rng) -> f64 {
    match rng.random_range(0..3) {
        0 => -1.0,
        1 => 0.0,
        _ => 1.0,
    }
}

#[derive(Debug)]
struct Negate;
impl Behavior for Negate {
    fn calculate(&self, args: &[f64]) -> f64 {
        -args[0]
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("-{}", names[0])
    }
}

#[derive(Debug)]
struct OneMinus;
impl Behavior for OneMinus {
    fn calculate(&self, args: &[f64]) -> f64 {
        1.0 - args[0]
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("1-{}", names[0])
    }
}

#[derive(Debug)]
struct Reciprocal;
impl Behavior for Reciprocal {
    fn calculate(&self, args: &[f64]) -> f64 {
        if args[0] == 0.0 { 0.0 } else { 1.0 / args[0] }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("1/{}", names[0])
    }
}

#[derive(Debug)]
struct BaseConversion {
    base: i64,
}
impl Behavior for BaseConversion {
    fn calculate(&self, args: &[f64]) -> f64 {
        let x = args[0];
        if x == 0.0 || x.is_nan() || x.is_infinite() {
            return x;
        }
        let sign = x.signum();
        let mut mag = (x.abs() * 1e5).trunc() as i64;
        if mag == 0 {
            return 0.0;
        }
        let mut digits = Vec::new();
        while mag > 0 {
            digits.push((mag % self.base) as u8);
            mag /= self.base;
        }
        digits.reverse();
        let digit_string: String = digits.iter().map(|d| (b'0' + d) as char).collect();
        let reinterpreted: i64 = digit_string.parse().unwrap_or(0);
        sign * (reinterpreted as f64) / 1e5
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("convertToBase({},{})", names[0], self.base)
    }
}

#[derive(Debug)]
struct IntTruncate;
impl Behavior for IntTruncate {
    fn calculate(&self, args: &[f64]) -> f64 {
        let x = args[0];
        if x.is_nan() || x.is_infinite() { x } else { x.trunc() }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("int({})", names[0])
    }
}

#[derive(Debug)]
struct ModOne;
impl Behavior for ModOne {
    fn calculate(&self, args: &[f64]) -> f64 {
        let x = args[0];
        if x.is_nan() || x.is_infinite() { x } else { x.abs().fract() }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("{} ~%~ 1.0", names[0])
    }
}

#[derive(Debug)]
struct Scale {
    factor: f64,
}
impl Behavior for Scale {
    fn calculate(&self, args: &[f64]) -> f64 {
        self.factor * args[0]
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("{} + {:.6}", names[0], self.factor)
    }
}

#[derive(Debug)]
struct Translate {
    offset: f64,
}
impl Behavior for Translate {
    fn calculate(&self, args: &[f64]) -> f64 {
        self.offset + args[0]
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("translate({},{:.6})", names[0], self.offset)
    }
}

#[derive(Debug)]
struct Logarithm;
impl Behavior for Logarithm {
    fn calculate(&self, args: &[f64]) -> f64 {
        let x = args[0];
        if x <= 0.0 { f64::NAN } else { x.ln() }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("ln {}", names[0])
    }
}

#[derive(Debug)]
struct BlockyScatter {
    unit: i64,
    rng: RefCell<StdRng>,
}
impl Behavior for BlockyScatter {
    fn calculate(&self, args: &[f64]) -> f64 {
        args[0] + (self.unit as f64) * pick_sign(&mut *self.rng.borrow_mut())
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("{} +/-/0 {}", names[0], self.unit)
    }
}

#[derive(Debug)]
struct Multiplex {
    rng: RefCell<StdRng>,
}
impl Behavior for Multiplex {
    fn calculate(&self, args: &[f64]) -> f64 {
        args[0] + 10.0 * pick_sign(&mut *self.rng.borrow_mut())
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("multiplex({})", names[0])
    }
}

#[derive(Debug)]
struct GaussianFuzz {
    mean: f64,
    stddev: f64,
    rng: RefCell<StdRng>,
}
impl Behavior for GaussianFuzz {
    fn calculate(&self, args: &[f64]) -> f64 {
        let dist = Normal::new(self.mean, self.stddev.max(1e-12)).expect("valid stddev");
        args[0] + dist.sample(&mut *self.rng.borrow_mut())
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("gaussian_random(mean={}, stddev={})+{}", self.mean, self.stddev, names[0])
    }
}

#[derive(Debug)]
struct Discretize;
impl Behavior for Discretize {
    fn calculate(&self, args: &[f64]) -> f64 {
        if args[0] > 0.5 { 1.0 } else { 0.0 }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("[{} -> 0|1 @0.5]", names[0])
    }
}

#[derive(Debug)]
struct Sieve {
    drop_prob: f64,
    rng: RefCell<StdRng>,
}
impl Behavior for Sieve {
    fn calculate(&self, args: &[f64]) -> f64 {
        if self.rng.borrow_mut().random_bool(self.drop_prob) { f64::NAN } else { args[0] }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("sieveValues({}, drop_prob={})", names[0], self.drop_prob)
    }
}

#[derive(Debug)]
struct Identity;
impl Behavior for Identity {
    fn calculate(&self, args: &[f64]) -> f64 {
        args[0]
    }
    fn generate_name(&self, names: &[String]) -> String {
        names[0].clone()
    }
}

pub fn specs() -> Vec<BehaviorSpec> {
    vec![
        BehaviorSpec { name: "negate", arity: Arity::fixed(1), is_noise: true, make: |_rng| Box::new(Negate) },
        BehaviorSpec { name: "oneMinus", arity: Arity::fixed(1), is_noise: true, make: |_rng| Box::new(OneMinus) },
        BehaviorSpec {
            name: "reciprocal",
            arity: Arity::fixed(1),
            is_noise: true,
            make: |_rng| Box::new(Reciprocal),
        },
        BehaviorSpec {
            name: "baseConversion",
            arity: Arity::fixed(1),
            is_noise: false,
            make: |rng: &mut StdRng| Box::new(BaseConversion { base: rng.random_range(2..=9) }),
        },
        BehaviorSpec {
            name: "intTruncate",
            arity: Arity::fixed(1),
            is_noise: false,
            make: |_rng| Box::new(IntTruncate),
        },
        BehaviorSpec { name: "modOne", arity: Arity::fixed(1), is_noise: true, make: |_rng| Box::new(ModOne) },
        BehaviorSpec {
            name: "scale",
            arity: Arity::fixed(1),
            is_noise: false,
            make: |rng: &mut StdRng| Box::new(Scale { factor: rng.random_range(0.0..10.0) }),
        },
        BehaviorSpec {
            name: "translate",
            arity: Arity::fixed(1),
            is_noise: false,
            make: |rng: &mut StdRng| Box::new(Translate { offset: rng.random_range(-10.0..10.0) }),
        },
        BehaviorSpec {
            name: "logarithm",
            arity: Arity::fixed(1),
            is_noise: true,
            make: |_rng| Box::new(Logarithm),
        },
        BehaviorSpec {
            name: "blockyScatter",
            arity: Arity::fixed(1),
            is_noise: true,
            make: |rng: &mut StdRng| {
                let unit = rng.random_range(1..=20);
                Box::new(BlockyScatter { unit, rng: RefCell::new(child_rng(rng)) })
            },
        },
        BehaviorSpec {
            name: "multiplex",
            arity: Arity::fixed(1),
            is_noise: true,
            make: |rng| Box::new(Multiplex { rng: RefCell::new(child_rng(rng)) }),
        },
        BehaviorSpec {
            name: "gaussianFuzz",
            arity: Arity::fixed(1),
            is_noise: true,
            make: |rng: &mut StdRng| {
                let mean = Normal::new(0.0, 1.0).expect("valid").sample(rng);
                let stddev = Normal::new(0.25, 0.75).expect("valid").sample(rng).abs();
                Box::new(GaussianFuzz { mean, stddev, rng: RefCell::new(child_rng(rng)) })
            },
        },
        BehaviorSpec {
            name: "discretize",
            arity: Arity::fixed(1),
            is_noise: true,
            make: |_rng| Box::new(Discretize),
        },
        BehaviorSpec {
            name: "sieve",
            arity: Arity::fixed(1),
            is_noise: true,
            make: |rng: &mut StdRng| {
                let denom = 10.0 * rng.random_range(1..=25) as f64;
                Box::new(Sieve { drop_prob: 1.0 / denom, rng: RefCell::new(child_rng(rng)) })
            },
        },
        BehaviorSpec {
            name: "identity",
            arity: Arity::fixed(1),
            is_noise: true,
            make: |_rng| Box::new(Identity),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn find(name: &str, rng: &mut StdRng) -> Box<dyn Behavior> {
        (specs().into_iter().find(|s| s.name == name).unwrap().make)(rng)
    }

    #[test]
    fn test_negate() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(find("negate", &mut rng).calculate(&[3.0]), -3.0);
    }

    #[test]
    fn test_reciprocal_zero_guard() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(find("reciprocal", &mut rng).calculate(&[0.0]), 0.0);
        assert_eq!(find("reciprocal", &mut rng).calculate(&[2.0]), 0.5);
    }

    #[test]
    fn test_logarithm_nonpositive_is_nan() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(find("logarithm", &mut rng).calculate(&[0.0]).is_nan());
        assert!(find("logarithm", &mut rng).calculate(&[-5.0]).is_nan());
        assert!((find("logarithm", &mut rng).calculate(&[1.0]) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_mod_one_is_fractional_of_abs() {
        let mut rng = StdRng::seed_from_u64(1);
        let v = find("modOne", &mut rng).calculate(&[-3.25]);
        assert!((v - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_int_truncate_passes_through_nan_and_inf() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(find("intTruncate", &mut rng).calculate(&[f64::NAN]).is_nan());
        assert_eq!(find("intTruncate", &mut rng).calculate(&[f64::INFINITY]), f64::INFINITY);
        assert_eq!(find("intTruncate", &mut rng).calculate(&[3.9]), 3.0);
    }

    #[test]
    fn test_base_conversion_zero_passthrough() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(find("baseConversion", &mut rng).calculate(&[0.0]), 0.0);
    }

    #[test]
    fn test_identity_passes_value_and_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = find("identity", &mut rng);
        assert_eq!(b.calculate(&[7.5]), 7.5);
        assert_eq!(b.generate_name(&["x".to_string()]), "x");
    }

    #[test]
    fn test_discretize_threshold() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(find("discretize", &mut rng).calculate(&[0.5]), 0.0);
        assert_eq!(find("discretize", &mut rng).calculate(&[0.51]), 1.0);
    }
}
