/// One-shot deferred work, polled against a millisecond clock.
///
/// Items become due once `now >= deadline` and are handed out in deadline
/// order; ties keep scheduling order.
#[derive(Debug)]
pub struct Deferred<T> {
    pending: Vec<(u64, u64, T)>,
    seq: u64,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Deferred {
            pending: Vec::new(),
            seq: 0,
        }
    }
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, item: T) {
        self.pending.push((due_ms, self.seq, item));
        self.seq += 1;
    }

    pub fn take_due(&mut self, now_ms: u64) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(at, _, _)| *at <= now_ms);
        self.pending = rest;
        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, item)| item).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
