/*!
# Operation Catalogue (E)

One file per operator family; `registry` ties them together into the compile-time
catalogue the model assembler draws from.
*/

pub mod binary;
pub mod generators;
pub mod nary;
pub mod registry;
pub mod unary;

pub use registry::{Arity, Behavior, BehaviorSpec, catalogue};
