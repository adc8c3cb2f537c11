//! Serves recorded interactions back in order.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Replays a cassette, keeping one cursor per `(port, method)` pair so that
/// unrelated streams do not affect each other.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), Vec<Interaction>>,
    cursors: HashMap<(String, String), usize>,
}

impl CassetteReplayer {
    /// Indexes every interaction of `cassette` by port and method.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push(interaction.clone());
        }
        Self { queues, cursors: HashMap::new() }
    }

    /// Returns the next unconsumed interaction for `port`/`method`, or
    /// `None` once that stream is exhausted (or was never recorded).
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Option<&Interaction> {
        let key = (port.to_string(), method.to_string());
        let queue = self.queues.get(&key)?;
        let cursor = self.cursors.entry(key).or_insert(0);
        let interaction = queue.get(*cursor)?;
        *cursor += 1;
        Some(interaction)
    }

    /// Interactions still waiting to be served for `port`/`method`.
    #[must_use]
    pub fn remaining(&self, port: &str, method: &str) -> usize {
        let key = (port.to_string(), method.to_string());
        let total = self.queues.get(&key).map_or(0, Vec::len);
        total.saturating_sub(self.cursors.get(&key).copied().unwrap_or(0))
    }
}
