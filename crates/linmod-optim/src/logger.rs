use linmod_core::Parameters;
use serde::{Deserialize, Serialize};

/// How much a training run reports on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Verbosity {
    #[default]
    Silent,
    /// Cost before and after every update.
    Info,
    /// Also the weights and bias after every update.
    Debug,
}

/// Progress reporter for the optimizer loops.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    method: &'static str,
    n_epochs: usize,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        TrainingLogger {
            verbosity,
            method: "",
            n_epochs: 0,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn start_training(&mut self, method: &'static str, n_epochs: usize) {
        self.method = method;
        self.n_epochs = n_epochs;
        if self.enabled(Verbosity::Info) {
            eprintln!("[{}] training for {} epochs", method, n_epochs);
        }
    }

    pub fn log_epoch(&self, epoch: usize, cost_prev: f64, cost: f64) {
        if self.enabled(Verbosity::Info) {
            eprintln!(
                "[{}] epoch {}/{}: cost {:.6} -> {:.6}",
                self.method, epoch, self.n_epochs, cost_prev, cost
            );
        }
    }

    pub fn log_parameters(&self, params: &Parameters) {
        if self.enabled(Verbosity::Debug) {
            eprintln!("[{}]   weights: {:?}", self.method, params.weights);
            eprintln!("[{}]   bias: {}", self.method, params.bias);
        }
    }

    pub fn finish_training(&self, final_cost: Option<f64>) {
        if self.enabled(Verbosity::Info) {
            match final_cost {
                Some(c) => eprintln!("[{}] done, last recorded cost {:.6}", self.method, c),
                None => eprintln!("[{}] done, no updates performed", self.method),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let silent = TrainingLogger::new(Verbosity::Silent);
        assert!(!silent.enabled(Verbosity::Info));
        assert!(!silent.enabled(Verbosity::Silent));

        let info = TrainingLogger::new(Verbosity::Info);
        assert!(info.enabled(Verbosity::Info));
        assert!(!info.enabled(Verbosity::Debug));

        let mut debug = TrainingLogger::new(Verbosity::Silent);
        debug.set_verbosity(Verbosity::Debug);
        assert!(debug.enabled(Verbosity::Info));
        assert!(debug.enabled(Verbosity::Debug));
    }
}
