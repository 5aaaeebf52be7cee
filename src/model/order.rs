use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of work flowing through the fulfillment pipeline.
///
/// Orders carry nothing but their identifier. They are created once per run
/// and never mutated; every stage reads the id for logging only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Order {
    id: u64,
}

impl Order {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Builds a batch of `count` orders with sequential ids starting at 1.
    ///
    /// ```
    /// use order_processor::model::Order;
    ///
    /// let ids: Vec<u64> = Order::batch(3).iter().map(Order::id).collect();
    /// assert_eq!(ids, vec![1, 2, 3]);
    /// ```
    pub fn batch(count: u64) -> Vec<Order> {
        (1..=count).map(Order::new).collect()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order #{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_batch_ids_are_sequential_and_unique() {
        let orders = Order::batch(20);
        assert_eq!(orders.len(), 20);

        let ids: HashSet<u64> = orders.iter().map(Order::id).collect();
        assert_eq!(ids.len(), 20);
        for (index, order) in orders.iter().enumerate() {
            assert_eq!(order.id(), index as u64 + 1);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(Order::batch(0).is_empty());
    }
}
