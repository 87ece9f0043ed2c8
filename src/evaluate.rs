/*!
# Row Evaluator

Computes a node's canonical value for a given row, memoized per row, and its noisy
column value (never memoized — noise is drawn fresh on every call). Component G of the
pipeline.
*/

use crate::model::{Model, RowKey};

impl Model {
    /// Returns `node`'s canonical value for `row_key`, recursing into its parents and
    /// memoizing the result. Calling this twice with the same `(node, row_key)` in the
    /// same run returns the same value, even if `node`'s behavior is stochastic.
    pub fn calculate(&self, node: usize, row_key: RowKey) -> f64 {
        if let Some(&cached) = self.nodes[node].cache.borrow().get(&row_key) {
            return cached;
        }
        let args: Vec<f64> =
            self.nodes[node].parents.iter().map(|&p| self.calculate(p, row_key)).collect();
        let value = self.nodes[node].behavior.calculate(&args);
        self.nodes[node].cache.borrow_mut().insert(row_key, value);
        value
    }

    /// Returns the noisy value written to the output table for `node` at `row_key`.
    /// Unlike `calculate`, this is never cached: two calls in the same row draw fresh
    /// noise, by design.
    pub fn column_value(&self, node: usize, row_key: RowKey) -> f64 {
        let base = self.calculate(node, row_key);
        self.nodes[node].noise.calculate(&[base])
    }

    /// Drops every node's per-row cache. Call between rows to bound memory to one row's
    /// worth of state rather than growing for the whole run.
    pub fn clear_caches(&self) {
        for node in &self.nodes {
            node.cache.borrow_mut().clear();
        }
    }
}
