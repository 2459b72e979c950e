use std::iter::FusedIterator;

const MIN_CAPACITY: usize = 4;

/// Double-ended queue backed by a ring buffer.
///
/// Both ends are amortized O(1). Removing from one end leaves a free slot
/// that a later insert at that end reuses, so stored elements never shift.
/// Growth doubles the buffer and unrolls the ring once.
#[derive(Clone)]
pub struct Deque<T> {
    slots: Vec<Option<T>>,
    // Index of the front element inside `slots`.
    head: usize,
    len: usize,
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deque<T> {
    pub fn new() -> Self {
        Deque {
            slots: Vec::new(),
            head: 0,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Deque {
            slots,
            head: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn insert_front(&mut self, item: T) {
        self.grow_if_full();
        self.head = self.wrap_sub(self.head, 1);
        self.slots[self.head] = Some(item);
        self.len += 1;
    }

    pub fn insert_back(&mut self, item: T) {
        self.grow_if_full();
        let tail = self.physical(self.len);
        self.slots[tail] = Some(item);
        self.len += 1;
    }

    /// Takes the front element, or `None` when the deque is empty.
    pub fn remove_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = self.physical(1);
        self.len -= 1;
        item
    }

    /// Takes the back element, or `None` when the deque is empty.
    pub fn remove_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let tail = self.physical(self.len - 1);
        self.len -= 1;
        self.slots[tail].take()
    }

    pub fn peek_front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn peek_back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Element at `index` counted from the front.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[self.physical(index)].as_ref()
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            deque: self,
            front: 0,
            back: self.len,
        }
    }

    /// Snapshot of the elements, front to back. Later mutation of the deque
    /// does not affect the returned vector.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    fn physical(&self, offset: usize) -> usize {
        (self.head + offset) % self.slots.len()
    }

    fn wrap_sub(&self, index: usize, by: usize) -> usize {
        (index + self.slots.len() - by) % self.slots.len()
    }

    fn grow_if_full(&mut self) {
        if self.len < self.slots.len() {
            return;
        }
        let new_capacity = (self.slots.len() * 2).max(MIN_CAPACITY);
        let mut slots: Vec<Option<T>> = Vec::with_capacity(new_capacity);
        for offset in 0..self.len {
            let index = self.physical(offset);
            slots.push(self.slots[index].take());
        }
        slots.resize_with(new_capacity, || None);
        self.slots = slots;
        self.head = 0;
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Deque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Deque::new();
        deque.extend(iter);
        deque
    }
}

impl<T> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert_back(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Front-to-back iterator over a [`Deque`].
pub struct Iter<'a, T> {
    deque: &'a Deque<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.deque.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.deque.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
