use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread;

/// Streaming sliding window over any iterator.
///
/// Holds at most `size` items at a time and yields `len - size + 1` windows
/// for inputs of at least `size` items, nothing otherwise.
pub struct SlidingWindow<I: Iterator> {
    iter: I,
    size: usize,
    last_items: VecDeque<I::Item>,
}

impl<I> Iterator for SlidingWindow<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.size == 0 {
            return None;
        }
        if self.last_items.len() == self.size {
            self.last_items.pop_front();
        }
        while self.last_items.len() < self.size {
            self.last_items.push_back(self.iter.next()?);
        }
        Some(self.last_items.iter().cloned().collect())
    }
}

pub fn window<I>(iterable: I, size: usize) -> SlidingWindow<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Clone,
{
    SlidingWindow {
        iter: iterable.into_iter(),
        size,
        last_items: VecDeque::with_capacity(size),
    }
}

/// Splits `list` into `num_threads` contiguous chunks and runs `f_thread` on
/// each chunk in its own scoped thread, sharing `context` by reference.
/// Chunk results come back in chunk order.
pub fn multi_thread_process_list<T1, T2, C, F>(
    list: &[T1],
    context: &C,
    num_threads: usize,
    f_thread: F,
) -> Vec<T2>
where
    T1: Sync,
    T2: Send,
    C: Sync + ?Sized,
    F: Fn(&C, &[T1]) -> T2 + Sync,
{
    if list.is_empty() {
        return Vec::new();
    }
    let num_threads = num_threads.clamp(1, list.len());
    let num_in_chunk = list.len().div_ceil(num_threads);

    let (tx, rx) = mpsc::channel::<(usize, T2)>();
    thread::scope(|scope| {
        for (i, list_chunk) in list.chunks(num_in_chunk).enumerate() {
            let ctx = tx.clone();
            let f = &f_thread;
            scope.spawn(move || {
                ctx.send((i, f(context, list_chunk)))
                    .expect("Error sending data from thread");
            });
        }
    });
    drop(tx);

    let mut ret_val: Vec<(usize, T2)> = rx.into_iter().collect();
    ret_val.sort_by_key(|(i, _)| *i);
    ret_val.into_iter().map(|(_, r)| r).collect()
}

pub fn get_percent(prob: f64) -> f64 {
    (prob * 10000.0).round() / 100.0
}

/// Base-2 log that maps every non-positive probability to an unreachable score.
pub fn log2_prob(prob: f64) -> f64 {
    if prob > 0.0 {
        prob.log2()
    } else {
        f64::NEG_INFINITY
    }
}
