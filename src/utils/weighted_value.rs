use core::cmp::Ordering;

/// A value packed with an integer cost, ordered by cost only.
#[derive(Copy, Clone, Debug)]
pub struct WeightedValue<T> {
    pub value: T,
    pub cost: u64,
}

impl<T> WeightedValue<T> {
    /// Creates a new value packed with a cost.
    #[inline]
    pub fn new(value: T, cost: u64) -> WeightedValue<T> {
        WeightedValue { value, cost }
    }
}

impl<T> PartialEq for WeightedValue<T> {
    #[inline]
    fn eq(&self, other: &WeightedValue<T>) -> bool {
        self.cost.eq(&other.cost)
    }
}

impl<T> Eq for WeightedValue<T> {}

impl<T> PartialOrd for WeightedValue<T> {
    #[inline]
    fn partial_cmp(&self, other: &WeightedValue<T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for WeightedValue<T> {
    #[inline]
    fn cmp(&self, other: &WeightedValue<T>) -> Ordering {
        self.cost.cmp(&other.cost)
    }
}
