//! Progress bar for batch runs

use indicatif::{ProgressBar, ProgressStyle};
use madnet_application::DebateObserver;
use madnet_domain::Choice;

/// Reports batch progress with an indicatif bar
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(Self::bar_style());
        bar.set_prefix("Questions");
        Self { bar }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl DebateObserver for BatchProgress {
    fn on_question_start(&self, index: usize, total: usize) {
        self.bar
            .set_message(format!("question {}/{}", index + 1, total));
    }

    fn on_community_start(&self, community: &str) {
        self.bar.set_message(community.to_string());
    }

    fn on_verdict(&self, community: &str, choice: Choice) {
        self.bar
            .set_message(format!("{community} -> Option {choice}"));
    }

    fn on_question_complete(&self, _index: usize, answered: bool) {
        if !answered {
            self.bar.set_message("skipped");
        }
        self.bar.inc(1);
    }
}
