use tracing::debug;

/// Identifier handed to a customer. Identifiers are dense: after `n` fresh
/// allocations exactly `0..n` have been issued.
pub type Buzzer = usize;

/// Returned by [`ServiceQueue::kick_out`] and [`ServiceQueue::take_bribe`]
/// when the buzzer is not waiting in line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotInQueue(pub Buzzer);

impl std::fmt::Display for NotInQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "buzzer {} is not in the queue", self.0)
    }
}

impl std::error::Error for NotInQueue {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    prev: Option<Buzzer>,
    next: Option<Buzzer>,
}

/// FIFO line of buzzers with O(1) kick out and bribe.
///
/// `slots[b]` holds the links of buzzer `b` while it waits and `None` once
/// it was served or kicked out, so the slot vector is both the arena of the
/// linked line and the buzzer index. Retired buzzers are handed out again
/// last-retired-first.
#[derive(Debug, Default)]
pub struct ServiceQueue {
    slots: Vec<Option<Link>>,
    retired: Vec<Buzzer>,
    front: Option<Buzzer>,
    back: Option<Buzzer>,
    len: usize,
}

impl ServiceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct buzzers ever handed out.
    pub fn issued(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, buzzer: Buzzer) -> bool {
        self.link(buzzer).is_some()
    }

    pub fn front(&self) -> Option<Buzzer> {
        self.front
    }

    /// Walks the line front to back.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            queue: self,
            cursor: self.front,
            remaining: self.len,
        }
    }

    pub fn snapshot(&self) -> Vec<Buzzer> {
        self.iter().collect()
    }

    /// Enqueues a new customer and returns their buzzer.
    pub fn give_buzzer(&mut self) -> Buzzer {
        let buzzer = match self.retired.pop() {
            Some(b) => b,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };

        self.slots[buzzer] = Some(Link {
            prev: self.back,
            next: None,
        });
        match self.back {
            Some(last) => self.link_mut(last).next = Some(buzzer),
            None => self.front = Some(buzzer),
        }
        self.back = Some(buzzer);
        self.len += 1;

        debug!(buzzer, len = self.len, "issued");
        buzzer
    }

    /// Dequeues the customer at the front, `None` when nobody is waiting.
    pub fn seat(&mut self) -> Option<Buzzer> {
        let buzzer = self.front?;
        self.unlink(buzzer);
        self.retired.push(buzzer);

        debug!(buzzer, len = self.len, "seated");
        Some(buzzer)
    }

    /// Removes `buzzer` from wherever it stands in line.
    pub fn kick_out(&mut self, buzzer: Buzzer) -> Result<(), NotInQueue> {
        if !self.contains(buzzer) {
            return Err(NotInQueue(buzzer));
        }
        self.unlink(buzzer);
        self.retired.push(buzzer);

        debug!(buzzer, len = self.len, "kicked out");
        Ok(())
    }

    /// Moves `buzzer` to the front keeping everyone else in order.
    pub fn take_bribe(&mut self, buzzer: Buzzer) -> Result<(), NotInQueue> {
        if !self.contains(buzzer) {
            return Err(NotInQueue(buzzer));
        }
        if self.front == Some(buzzer) {
            return Ok(());
        }
        self.unlink(buzzer);

        let old_front = self.front;
        self.slots[buzzer] = Some(Link {
            prev: None,
            next: old_front,
        });
        match old_front {
            Some(first) => self.link_mut(first).prev = Some(buzzer),
            None => self.back = Some(buzzer),
        }
        self.front = Some(buzzer);
        self.len += 1;

        debug!(buzzer, "moved to front");
        Ok(())
    }

    fn link(&self, buzzer: Buzzer) -> Option<&Link> {
        self.slots.get(buzzer).and_then(Option::as_ref)
    }

    // Only called with buzzers known to be in line.
    fn link_mut(&mut self, buzzer: Buzzer) -> &mut Link {
        match self.slots[buzzer].as_mut() {
            Some(link) => link,
            None => unreachable!("buzzer {} is linked but not in line", buzzer),
        }
    }

    /// Splices a waiting buzzer out of the line and releases its slot. The
    /// caller decides whether the buzzer is retired or re-inserted.
    fn unlink(&mut self, buzzer: Buzzer) {
        let link = match self.slots[buzzer].take() {
            Some(link) => link,
            None => return,
        };

        match link.prev {
            Some(prev) => self.link_mut(prev).next = link.next,
            None => self.front = link.next,
        }
        match link.next {
            Some(next) => self.link_mut(next).prev = link.prev,
            None => self.back = link.prev,
        }
        self.len -= 1;
    }

    /// Panics if any structural invariant of the line is broken.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let forward = self.snapshot();
        assert_eq!(forward.len(), self.len, "forward walk disagrees with len");

        let mut backward = Vec::new();
        let mut cursor = self.back;
        while let Some(b) = cursor {
            backward.push(b);
            cursor = self.link(b).expect("dangling prev link").prev;
        }
        backward.reverse();
        assert_eq!(forward, backward, "prev links disagree with next links");

        let mut seen = vec![false; self.slots.len()];
        for &b in forward.iter().chain(self.retired.iter()) {
            assert!(!seen[b], "buzzer {} is both waiting and retired", b);
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s), "issued buzzer lost track of");
        for &b in &self.retired {
            assert!(self.slots[b].is_none(), "retired buzzer {} still linked", b);
        }
    }
}

pub struct Iter<'a> {
    queue: &'a ServiceQueue,
    cursor: Option<Buzzer>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Buzzer;

    fn next(&mut self) -> Option<Buzzer> {
        let buzzer = self.cursor?;
        self.cursor = self.queue.link(buzzer).and_then(|link| link.next);
        self.remaining = self.remaining.saturating_sub(1);
        Some(buzzer)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> IntoIterator for &'a ServiceQueue {
    type Item = Buzzer;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
