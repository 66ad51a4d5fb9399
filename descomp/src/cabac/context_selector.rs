use crate::config::CodingOrder;

const MAGNITUDE_BUCKETS: u64 = 4;

/// Selects the context set for the current symbol from the coding order and
/// the magnitudes of up to two preceding conditioning symbols, each clamped
/// to a small bucket count. With an external dependency stream the
/// conditioning symbols come from the dependency instead of decode history;
/// the selection logic is identical either way.
#[derive(Debug, Clone)]
pub(crate) struct ContextSelector {
    order: CodingOrder,
    prev: [u64; 2],
}

impl ContextSelector {
    #[must_use]
    pub fn new(order: CodingOrder) -> Self {
        Self {
            order,
            prev: [0, 0],
        }
    }

    /// Base context index of the set selected for the next symbol.
    #[must_use]
    pub fn context_base(&self, set_size: usize) -> usize {
        match self.order {
            CodingOrder::Order0 => 0,
            CodingOrder::Order1 => bucket(self.prev[0]) * set_size,
            CodingOrder::Order2 => {
                (bucket(self.prev[1]) * MAGNITUDE_BUCKETS as usize + bucket(self.prev[0]))
                    * set_size
            }
        }
    }

    /// Feeds the conditioning symbol for subsequent context selection.
    pub fn push(&mut self, symbol: u64) {
        self.prev[1] = self.prev[0];
        self.prev[0] = symbol;
    }

    /// Clears the conditioning history.
    pub fn reset(&mut self) {
        self.prev = [0, 0];
    }
}

#[inline]
fn bucket(symbol: u64) -> usize {
    symbol.min(MAGNITUDE_BUCKETS - 1) as usize
}

#[cfg(test)]
mod tests {
    use crate::cabac::context_selector::ContextSelector;
    use crate::config::CodingOrder;

    #[test]
    fn test_order0_ignores_history() {
        let mut selector = ContextSelector::new(CodingOrder::Order0);
        assert_eq!(selector.context_base(8), 0);
        selector.push(100);
        assert_eq!(selector.context_base(8), 0);
    }

    #[test]
    fn test_order1_buckets_previous_symbol() {
        let mut selector = ContextSelector::new(CodingOrder::Order1);
        assert_eq!(selector.context_base(8), 0);

        selector.push(2);
        assert_eq!(selector.context_base(8), 16);

        // magnitudes clamp to bucket 3
        selector.push(1000);
        assert_eq!(selector.context_base(8), 24);
    }

    #[test]
    fn test_order2_combines_two_symbols() {
        let mut selector = ContextSelector::new(CodingOrder::Order2);
        selector.push(1);
        selector.push(2);

        // prev = [2, 1]: (1 * 4 + 2) * set_size
        assert_eq!(selector.context_base(8), 48);

        selector.reset();
        assert_eq!(selector.context_base(8), 0);
    }
}
