//! Ordered working set of loaded items.

use selection_commerce::prelude::*;

/// Items loaded for the current session, in feed order.
///
/// Only [`replace`](Self::replace) and [`append`](Self::append) mutate it.
/// Items are never de-duplicated: the cursor contract rules duplicates out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccumulationBuffer {
    items: Vec<ProductItem>,
}

impl AccumulationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in the first page of a session.
    pub fn replace(&mut self, items: Vec<ProductItem>) {
        self.items = items;
    }

    /// Extend with a later page.
    pub fn append(&mut self, items: Vec<ProductItem>) {
        self.items.extend(items);
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[ProductItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_id(&self) -> Option<ProductId> {
        self.items.last().map(|item| item.id)
    }

    /// Whether ids strictly ascend, which also means no id repeats.
    pub fn is_strictly_ascending(&self) -> bool {
        self.items.windows(2).all(|pair| pair[0].id < pair[1].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64) -> ProductItem {
        ProductItem::new(ProductId::new(id), format!("item {}", id), Money::new(1_000, Currency::CNY))
    }

    #[test]
    fn test_replace_then_append() {
        let mut buffer = AccumulationBuffer::new();
        buffer.append(vec![item(1)]);
        buffer.replace(vec![item(10), item(11)]);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.items()[0].id, ProductId::new(10));

        buffer.append(vec![item(12), item(15)]);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.last_id(), Some(ProductId::new(15)));
        assert!(buffer.is_strictly_ascending());
    }

    #[test]
    fn test_append_keeps_everything() {
        let mut buffer = AccumulationBuffer::new();
        buffer.append(vec![item(3), item(3)]);
        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_strictly_ascending());
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = AccumulationBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.last_id(), None);
        assert!(buffer.is_strictly_ascending());
    }
}
