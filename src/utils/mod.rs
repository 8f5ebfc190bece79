//! Various unsorted geometrical and logical operators.

pub use self::sorted_pair::SortedPair;
pub(crate) use self::weighted_value::WeightedValue;

mod sorted_pair;
mod weighted_value;
