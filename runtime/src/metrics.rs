//! Metric names and descriptions for the Store runtime.
//!
//! The runtime records through the `metrics` facade only. Nothing is exported
//! unless the host binary installs a recorder, in which case
//! [`register_metrics`] attaches human-readable descriptions.

use metrics::describe_counter;

/// Actions processed by `Store::send`, including fed-back actions
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// `Effect::Run` computations that completed successfully
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// `Effect::Run` computations that returned an error
pub const EFFECTS_FAILED: &str = "store.effects.failed";

/// Register descriptions for all Store metrics.
///
/// Safe to call more than once; descriptions are idempotent.
pub fn register_metrics() {
    describe_counter!(
        ACTIONS_TOTAL,
        "Total number of actions reduced by the store"
    );
    describe_counter!(
        EFFECTS_EXECUTED,
        "Total number of effects that completed successfully"
    );
    describe_counter!(
        EFFECTS_FAILED,
        "Total number of effects that failed"
    );
}
