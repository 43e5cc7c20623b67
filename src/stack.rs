use crate::errors::StackError;

/// Plain LIFO used to save and restore drawing state at branch points.
/// Unlike `Vec::pop`, popping an empty stack here is an error: in this crate
/// an empty pop always means a malformed symbol word, never a quiet default.
#[derive(Clone, Debug)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    /// Push a new item; it becomes the next item returned by [`Stack::pop`].
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove and return the most recently pushed item.
    pub fn pop(&mut self) -> Result<T, StackError> {
        self.items.pop().ok_or(StackError::PoppedEmptyStack)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> Stack<T> {
    /// Snapshot of the contents, most recently pushed first. The snapshot is
    /// cloned, so mutating it cannot reach back into the stack.
    pub fn items(&self) -> Vec<T> {
        self.items.iter().rev().cloned().collect()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Stack::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::StackError;

    #[test]
    fn test_lifo_order() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.pop().unwrap(), 3);
        assert_eq!(stack.pop().unwrap(), 2);
        stack.push(4);
        assert_eq!(stack.pop().unwrap(), 4);
        assert_eq!(stack.pop().unwrap(), 1);
    }

    #[test]
    fn test_pop_empty_is_an_error() {
        let mut stack: Stack<i32> = Stack::new();
        assert_eq!(stack.pop(), Err(StackError::PoppedEmptyStack));
        stack.push(9);
        assert!(stack.pop().is_ok());
        assert_eq!(stack.pop(), Err(StackError::PoppedEmptyStack));
    }

    #[test]
    fn test_len_tracks_pushes() {
        let mut stack = Stack::new();
        assert_eq!(stack.len(), 0);
        assert!(stack.is_empty());
        stack.push("a");
        stack.push("b");
        assert_eq!(stack.len(), 2);
        stack.pop().unwrap();
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut stack = Stack::new();
        stack.push(10);
        stack.push(20);
        let mut snapshot = stack.items();
        assert_eq!(snapshot, vec![20, 10]);
        snapshot[0] = 999;
        // The stack itself is untouched by edits to the snapshot.
        assert_eq!(stack.pop().unwrap(), 20);
    }
}
