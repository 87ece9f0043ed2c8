/*!
N-ary behaviors: two or more parents, arity unbounded above.
*/

use super::registry::{Arity, Behavior, BehaviorSpec};

const BIT_SCALE: f64 = 131072.0;

fn encode_bits(x: f64) -> i64 {
    if x.is_nan() {
        0
    } else if x.is_infinite() {
        if x > 0.0 { i32::MAX as i64 } else { -(i32::MAX as i64) }
    } else {
        (x * BIT_SCALE).round() as i64
    }
}

#[derive(Debug)]
struct Sum;
impl Behavior for Sum {
    fn calculate(&self, args: &[f64]) -> f64 {
        args.iter().sum()
    }
    fn generate_name(&self, names: &[String]) -> String {
        names.join("+")
    }
}

#[derive(Debug)]
struct Mean;
impl Behavior for Mean {
    fn calculate(&self, args: &[f64]) -> f64 {
        args.iter().sum::<f64>() / (args.len() as f64)
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("({})/{}", names.join("+"), names.len())
    }
}

#[derive(Debug)]
struct Min;
impl Behavior for Min {
    fn calculate(&self, args: &[f64]) -> f64 {
        args.iter().copied().fold(f64::INFINITY, f64::min)
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("min({})", names.join(","))
    }
}

#[derive(Debug)]
struct Max;
impl Behavior for Max {
    fn calculate(&self, args: &[f64]) -> f64 {
        args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("max({})", names.join(","))
    }
}

#[derive(Debug)]
enum BitOp {
    And,
    Or,
    Xor,
}

#[derive(Debug)]
struct Bitwise(BitOp);
impl Behavior for Bitwise {
    fn calculate(&self, args: &[f64]) -> f64 {
        if matches!(self.0, BitOp::Xor) && args.iter().any(|a| a.is_nan() || a.is_infinite()) {
            return f64::NAN;
        }
        let mut encoded = args.iter().map(|&a| encode_bits(a));
        let first = encoded.next().unwrap_or(0);
        let folded = encoded.fold(first, |acc, v| match self.0 {
            BitOp::And => acc & v,
            BitOp::Or => acc | v,
            BitOp::Xor => acc ^ v,
        });
        (folded as f64) / BIT_SCALE
    }
    fn generate_name(&self, names: &[String]) -> String {
        let op = match self.0 {
            BitOp::And => "AND",
            BitOp::Or => "OR",
            BitOp::Xor => "XOR",
        };
        format!("{}({})", op, names.join(","))
    }
}

#[derive(Debug)]
struct Downregulate;
impl Behavior for Downregulate {
    fn calculate(&self, args: &[f64]) -> f64 {
        let mut neg = args[0] < 0.0;
        let mut acc = args[0].abs();
        for &s in &args[1..] {
            if s < 0.0 {
                neg = false;
            }
            acc -= s.abs();
        }
        if neg { -acc } else { acc }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("{} downregulated by: {}", names[0], names[1..].join(", "))
    }
}

#[derive(Debug)]
struct Not;
impl Behavior for Not {
    fn calculate(&self, args: &[f64]) -> f64 {
        Downregulate.calculate(args)
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("NOT({})", names.join(","))
    }
}

pub fn specs() -> Vec<BehaviorSpec> {
    vec![
        BehaviorSpec { name: "sum", arity: Arity::at_least(2), is_noise: false, make: |_rng| Box::new(Sum) },
        BehaviorSpec { name: "mean", arity: Arity::at_least(2), is_noise: false, make: |_rng| Box::new(Mean) },
        BehaviorSpec { name: "min", arity: Arity::at_least(2), is_noise: false, make: |_rng| Box::new(Min) },
        BehaviorSpec { name: "max", arity: Arity::at_least(2), is_noise: false, make: |_rng| Box::new(Max) },
        BehaviorSpec {
            name: "bitAnd",
            arity: Arity::at_least(2),
            is_noise: false,
            make: |_rng| Box::new(Bitwise(BitOp::And)),
        },
        BehaviorSpec {
            name: "bitOr",
            arity: Arity::at_least(2),
            is_noise: false,
            make: |_rng| Box::new(Bitwise(BitOp::Or)),
        },
        BehaviorSpec {
            name: "bitXor",
            arity: Arity::at_least(2),
            is_noise: false,
            make: |_rng| Box::new(Bitwise(BitOp::Xor)),
        },
        BehaviorSpec {
            name: "downregulate",
            arity: Arity::at_least(2),
            is_noise: false,
            make: |_rng| Box::new(Downregulate),
        },
        BehaviorSpec { name: "not", arity: Arity::at_least(2), is_noise: false, make: |_rng| Box::new(Not) },
    ]
}
