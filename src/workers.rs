// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A small scoped worker pool.  Each pass hands it an iterator of work
//! items; the workers take items off the shared iterator one at a time
//! until it runs dry, so there is no up-front partitioning and a slow
//! region of the plane does not leave the other threads idle.  All
//! workers are joined before `drain` returns, which is the barrier
//! between passes.

use crossbeam;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use error::RenderError;

/// Cooperative cancellation for a run.  Clones share the flag; any of
/// them may cancel, and workers check it before each work item.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    /// Asks every pass using this token to stop at the next pixel.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether `cancel` has been called on this token or a clone of it.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn next_item<I: Iterator>(queue: &Mutex<I>) -> Option<I::Item> {
    // A poisoned queue means a worker panicked; that surfaces at join.
    match queue.lock() {
        Ok(mut items) => items.next(),
        Err(poisoned) => poisoned.into_inner().next(),
    }
}

/// Runs `work` over every item of `items` on `threads` workers.  Returns
/// `Cancelled` if the token was triggered before the queue ran dry, and
/// `WorkerPanicked` if any worker died.
pub fn drain<I, F>(threads: usize, items: I, cancel: &CancelToken, work: F) -> Result<(), RenderError>
where
    I: Iterator + Send,
    F: Fn(I::Item) + Sync,
{
    let queue = Mutex::new(items);
    let queue = &queue;
    let work = &work;

    let joined = crossbeam::scope(|spawner| {
        let handles: Vec<_> = (0..threads.max(1))
            .map(|_| {
                spawner.spawn(move |_| loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    match next_item(queue) {
                        Some(item) => work(item),
                        None => break,
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().is_ok())
            .fold(true, |all, ok| all && ok)
    });

    match joined {
        Ok(true) => {}
        _ => return Err(RenderError::WorkerPanicked),
    }

    if cancel.is_cancelled() {
        return Err(RenderError::Cancelled);
    }
    Ok(())
}
