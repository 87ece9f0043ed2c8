/*!
2-ary behaviors: exactly two parents.
*/

use super::registry::{Arity, Behavior, BehaviorSpec};

#[derive(Debug)]
struct Multiply;
impl Behavior for Multiply {
    fn calculate(&self, args: &[f64]) -> f64 {
        args[0] * args[1]
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("{} * {}", names[0], names[1])
    }
}

#[derive(Debug)]
struct CompareNormalized;
impl Behavior for CompareNormalized {
    fn calculate(&self, args: &[f64]) -> f64 {
        let (a, b) = (args[0], args[1]);
        if a > b {
            0.0
        } else if b > a {
            1.0
        } else {
            0.5
        }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("(({} cmp {}) + 1)/2", names[0], names[1])
    }
}

#[derive(Debug)]
struct AbsDiff;
impl Behavior for AbsDiff {
    fn calculate(&self, args: &[f64]) -> f64 {
        (args[0] - args[1]).abs()
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!(" |{}-{}| ", names[0], names[1])
    }
}

#[derive(Debug)]
struct SmallRatio;
impl Behavior for SmallRatio {
    fn calculate(&self, args: &[f64]) -> f64 {
        let (mut a, mut b) = (args[0].abs(), args[1].abs());
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        if b == 0.0 { 0.0 } else { a / b }
    }
    fn generate_name(&self, names: &[String]) -> String {
        format!("|{}:{} ratio|", names[0], names[1])
    }
}

pub fn specs() -> Vec<BehaviorSpec> {
    vec![
        BehaviorSpec { name: "multiply", arity: Arity::fixed(2), is_noise: false, make: |_rng| Box::new(Multiply) },
        BehaviorSpec {
            name: "compareNormalized",
            arity: Arity::fixed(2),
            is_noise: false,
            make: |_rng| Box::new(CompareNormalized),
        },
        BehaviorSpec { name: "absDiff", arity: Arity::fixed(2), is_noise: false, make: |_rng| Box::new(AbsDiff) },
        BehaviorSpec {
            name: "smallRatio",
            arity: Arity::fixed(2),
            is_noise: false,
            make: |_rng| Box::new(SmallRatio),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn find(name: &str) -> Box<dyn Behavior> {
        let mut rng = StdRng::seed_from_u64(1);
        (specs().into_iter().find(|s| s.name == name).unwrap().make)(&mut rng)
    }

    #[test]
    fn test_compare_normalized() {
        let b = find("compareNormalized");
        assert_eq!(b.calculate(&[1.0, 2.0]), 0.0);
        assert_eq!(b.calculate(&[2.0, 1.0]), 1.0);
        assert_eq!(b.calculate(&[2.0, 2.0]), 0.5);
    }

    #[test]
    fn test_small_ratio_orders_operands() {
        let b = find("smallRatio");
        assert_eq!(b.calculate(&[4.0, 2.0]), 0.5);
        assert_eq!(b.calculate(&[-2.0, 4.0]), 0.5);
        assert_eq!(b.calculate(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_abs_diff() {
        let b = find("absDiff");
        assert_eq!(b.calculate(&[3.0, 7.0]), 4.0);
    }
}
