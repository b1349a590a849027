//! Progress notification port
//!
//! Callbacks for observing a debate run. Implementations live in the cli
//! layer (console, progress bars); all methods default to no-ops so
//! observers only implement what they care about.

use madnet_domain::Choice;

/// Callback for progress updates during network execution
pub trait DebateObserver: Send + Sync {
    /// Called when a batch question begins
    fn on_question_start(&self, _index: usize, _total: usize) {}

    /// Called when a community becomes ready and starts debating
    fn on_community_start(&self, _community: &str) {}

    /// Called at the top of each debate round within a community
    fn on_round(&self, _community: &str, _round: usize) {}

    /// Called when a community judge settles on a verdict
    fn on_verdict(&self, _community: &str, _choice: Choice) {}

    /// Called when the network judge produces the final answer
    fn on_final_verdict(&self, _choice: Choice) {}

    /// Called when a batch question finishes (`answered` is false for skips)
    fn on_question_complete(&self, _index: usize, _answered: bool) {}
}

/// No-op observer for when progress reporting is not needed
pub struct NoObserver;

impl DebateObserver for NoObserver {}
