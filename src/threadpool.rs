//! Fixed-size, bounded-queue thread pool used by the optional parallel I/O
//! driver ([`crate::io::parallel`]).
//!
//! Backed by a `rayon::ThreadPool` for execution and a
//! `crossbeam_channel::bounded` channel used purely as a counting semaphore,
//! so `submit_job` blocks once `queue_size + nb_threads` jobs are in flight
//! instead of growing an unbounded queue.

use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::ThreadPool as RayonPool;
use std::sync::{Arc, Condvar, Mutex};

type JobFn = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    pending: usize,
}

/// A bounded-queue thread pool handle.
pub struct TPool {
    pool: Arc<RayonPool>,
    /// Counting-semaphore channel: one token per free queue slot. Acquiring
    /// a token before spawning bounds how many jobs can be in flight at once.
    slot_tx: Sender<()>,
    slot_rx: Receiver<()>,
    state: Arc<(Mutex<PoolState>, Condvar)>,
}

impl TPool {
    /// Build a pool with `nb_threads` workers and room for `queue_size`
    /// extra jobs beyond one-per-worker in flight. Both must be at least 1.
    pub fn new(nb_threads: usize, queue_size: usize) -> Option<Self> {
        if nb_threads < 1 || queue_size < 1 {
            return None;
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(nb_threads)
            .build()
            .ok()?;

        let capacity = queue_size + nb_threads;
        let (slot_tx, slot_rx) = bounded(capacity);
        for _ in 0..capacity {
            slot_tx.send(()).ok()?;
        }

        let state = Arc::new((Mutex::new(PoolState { pending: 0 }), Condvar::new()));

        Some(TPool {
            pool: Arc::new(pool),
            slot_tx,
            slot_rx,
            state,
        })
    }

    /// Submit a job, blocking until a queue slot is free.
    pub fn submit_job(&self, job: JobFn) {
        self.slot_rx.recv().expect("threadpool slot channel closed");

        {
            let (lock, _cvar) = &*self.state;
            let mut s = lock.lock().unwrap();
            s.pending += 1;
        }

        let state = Arc::clone(&self.state);
        let slot_tx = self.slot_tx.clone();
        self.pool.spawn(move || {
            job();

            let (lock, cvar) = &*state;
            let mut s = lock.lock().unwrap();
            s.pending -= 1;
            if s.pending == 0 {
                cvar.notify_all();
            }
            let _ = slot_tx.send(());
        });
    }

    /// Block until every submitted job has finished. The pool remains usable
    /// for further submissions afterwards.
    pub fn jobs_completed(&self) {
        let (lock, cvar) = &*self.state;
        let mut s = lock.lock().unwrap();
        while s.pending > 0 {
            s = cvar.wait(s).unwrap();
        }
    }
}

impl Drop for TPool {
    fn drop(&mut self) {
        self.jobs_completed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_every_submitted_job() {
        let pool = TPool::new(4, 4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..50 {
            let c = Arc::clone(&counter);
            pool.submit_job(Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }));
        }
        pool.jobs_completed();
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert!(TPool::new(0, 4).is_none());
        assert!(TPool::new(4, 0).is_none());
    }
}
