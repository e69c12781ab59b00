//! Thread-backed communicator for deterministic multi-rank tests.
//!
//! Each rank runs on its own thread and shares a single collective slot.
//! Because the coordinator is SPMD, all ranks issue the same collectives in
//! the same order, so one generation-counted slot is sufficient: the last
//! rank to arrive completes the operation, publishes the result, and bumps
//! the generation; earlier arrivals block on the condvar until then.
//!
//! Completion of operation `k + 1` requires every rank to have returned
//! from operation `k`, so the published result cannot be overwritten while
//! a rank is still reading it.

use crate::Communicator;
use std::sync::{Arc, Condvar, Mutex};
use tracing::trace;

#[derive(Debug, Default)]
struct Slot {
    /// Completed-operation counter.
    generation: u64,
    /// Ranks that have arrived at the current operation.
    arrived: u32,
    /// Accumulators, written while ranks arrive at the current operation.
    acc_pair: [f64; 2],
    acc_u64: u64,
    acc_f64: f64,
    acc_i32: i32,
    /// Published results of the last completed operation. Kept separate
    /// from the accumulators: a fast rank may already be contributing to
    /// the next operation while others are still reading these.
    result_pair: [f64; 2],
    result_u64: u64,
    result_f64: f64,
    result_i32: i32,
}

#[derive(Debug)]
struct Shared {
    n_ranks: u32,
    slot: Mutex<Slot>,
    done: Condvar,
}

/// Factory for a group of [`LocalCommunicator`]s sharing one collective slot.
#[derive(Debug)]
pub struct LocalGroup;

impl LocalGroup {
    /// Create communicators for a group of `n_ranks` ranks.
    ///
    /// The returned vector is indexed by rank; hand one communicator to
    /// each worker thread.
    pub fn new(n_ranks: u32) -> Vec<LocalCommunicator> {
        assert!(n_ranks > 0, "a group needs at least one rank");
        let shared = Arc::new(Shared {
            n_ranks,
            slot: Mutex::new(Slot::default()),
            done: Condvar::new(),
        });
        (0..n_ranks)
            .map(|rank| LocalCommunicator {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

/// One rank's handle onto a [`LocalGroup`].
#[derive(Debug)]
pub struct LocalCommunicator {
    rank: u32,
    shared: Arc<Shared>,
}

impl LocalCommunicator {
    /// Run one collective: `contribute` mutates the slot on arrival,
    /// `publish` runs on the last arrival, `extract` reads the result.
    fn collective<T>(
        &self,
        contribute: impl FnOnce(&mut Slot, bool),
        publish: impl FnOnce(&mut Slot),
        extract: impl FnOnce(&Slot) -> T,
    ) -> T {
        let shared = &self.shared;
        let mut slot = shared.slot.lock().unwrap();
        let my_generation = slot.generation;

        let first = slot.arrived == 0;
        contribute(&mut slot, first);
        slot.arrived += 1;

        if slot.arrived == shared.n_ranks {
            slot.arrived = 0;
            publish(&mut slot);
            slot.generation += 1;
            shared.done.notify_all();
        } else {
            while slot.generation == my_generation {
                slot = shared.done.wait(slot).unwrap();
            }
        }
        extract(&slot)
    }
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> u32 {
        self.rank
    }

    fn n_ranks(&self) -> u32 {
        self.shared.n_ranks
    }

    fn broadcast_f64(&self, value: &mut f64) {
        let is_root = self.is_coordinator();
        let sent = *value;
        *value = self.collective(
            |slot, _first| {
                if is_root {
                    slot.acc_f64 = sent;
                }
            },
            |slot| slot.result_f64 = slot.acc_f64,
            |slot| slot.result_f64,
        );
        trace!(rank = self.rank, value = *value, "group broadcast f64");
    }

    fn broadcast_i32(&self, value: &mut i32) {
        let is_root = self.is_coordinator();
        let sent = *value;
        *value = self.collective(
            |slot, _first| {
                if is_root {
                    slot.acc_i32 = sent;
                }
            },
            |slot| slot.result_i32 = slot.acc_i32,
            |slot| slot.result_i32,
        );
        trace!(rank = self.rank, value = *value, "group broadcast i32");
    }

    fn allreduce_sum_pair(&self, values: [f64; 2]) -> [f64; 2] {
        let result = self.collective(
            |slot, first| {
                if first {
                    slot.acc_pair = [0.0; 2];
                }
                slot.acc_pair[0] += values[0];
                slot.acc_pair[1] += values[1];
            },
            |slot| slot.result_pair = slot.acc_pair,
            |slot| slot.result_pair,
        );
        trace!(rank = self.rank, ?result, "group sum all-reduce");
        result
    }

    fn allreduce_sum_u64(&self, value: u64) -> u64 {
        let result = self.collective(
            |slot, first| {
                if first {
                    slot.acc_u64 = 0;
                }
                slot.acc_u64 += value;
            },
            |slot| slot.result_u64 = slot.acc_u64,
            |slot| slot.result_u64,
        );
        trace!(rank = self.rank, result, "group count all-reduce");
        result
    }
}
