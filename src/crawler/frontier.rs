//! Frontier for managing the URLs one crawl job has left to fetch
//!
//! The frontier owns both the pending queue and the visited set. A URL is
//! marked visited at the moment it is accepted, not when it is fetched, so a
//! link discovered twice before its first fetch is still queued only once.

use crate::config::FrontierOrder;
use std::collections::{HashSet, VecDeque};

/// Pending URLs plus the set of every URL ever accepted
#[derive(Debug, Clone)]
pub struct Frontier {
    /// URLs waiting to be fetched; new entries go to the back
    pending: VecDeque<String>,

    /// Every URL ever accepted into `pending`, plus aliases marked seen
    visited: HashSet<String>,

    /// Number of URLs ever accepted into `pending`
    accepted: usize,

    /// Which end `pop` takes from
    order: FrontierOrder,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    ///
    /// # Arguments
    ///
    /// * `seed` - The job's first URL, fetched exactly as given
    /// * `order` - LIFO (depth-leaning) or FIFO (breadth-first)
    pub fn new(seed: String, order: FrontierOrder) -> Self {
        let mut frontier = Self {
            pending: VecDeque::new(),
            visited: HashSet::new(),
            accepted: 0,
            order,
        };
        frontier.push(seed);
        frontier
    }

    /// Accepts a URL unless it was seen before
    ///
    /// # Returns
    ///
    /// `true` if the URL was new and is now queued
    pub fn push(&mut self, url: String) -> bool {
        if self.visited.contains(&url) {
            return false;
        }
        self.visited.insert(url.clone());
        self.pending.push_back(url);
        self.accepted += 1;
        true
    }

    /// Marks a URL as already covered without queueing it
    ///
    /// Used for the normalized form of the seed, so a later link to it is
    /// not fetched a second time.
    pub fn mark_seen(&mut self, url: String) {
        self.visited.insert(url);
    }

    /// Takes the next URL to fetch
    ///
    /// LIFO pops the most recently accepted URL; FIFO the oldest.
    pub fn pop(&mut self) -> Option<String> {
        match self.order {
            FrontierOrder::Lifo => self.pending.pop_back(),
            FrontierOrder::Fifo => self.pending.pop_front(),
        }
    }

    /// Number of URLs waiting to be fetched
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of distinct URLs ever accepted
    pub fn accepted_len(&self) -> usize {
        self.accepted
    }
}
