//! Simple LIFO stack
//!
//! Backs the navigation coordinator's flow and presentable stacks.

/// Vec-backed stack. Index 0 is the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    storage: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn push(&mut self, element: T) {
        self.storage.push(element);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.storage.pop()
    }

    /// Top element, without removing it
    pub fn peek(&self) -> Option<&T> {
        self.storage.last()
    }

    pub fn remove_all(&mut self) {
        self.storage.clear();
    }

    /// Iterate from bottom to top
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_items() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_pop_returns_last_pushed() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);

        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_pop_empty() {
        let mut stack: Stack<i32> = Stack::new();
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_remove_all() {
        let mut stack = Stack::new();
        for i in 0..=10 {
            stack.push(i);
        }
        stack.remove_all();

        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut stack = Stack::new();
        stack.push(1);

        assert_eq!(stack.peek(), Some(&1));
        assert!(!stack.is_empty());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_iter_bottom_to_top() {
        let mut stack = Stack::new();
        stack.push("root");
        stack.push("detail");

        let items: Vec<_> = stack.iter().copied().collect();
        assert_eq!(items, vec!["root", "detail"]);
    }
}
