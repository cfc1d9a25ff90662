//! Batch progress reporting on stderr

use std::io::{self, Write};

/// Single-line progress reporter for long-running commands
pub struct ProgressReporter {
    label: String,
    done: usize,
    total: usize,
}

impl ProgressReporter {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            done: 0,
            total: 0,
        }
    }

    pub fn update(&mut self, done: usize, total: usize) {
        self.done = done;
        self.total = total;
        eprint!("\r{:<50}", format!("{} {}/{}", self.label, done, total));
        io::stderr().flush().ok();
    }

    pub fn finish(&self) {
        eprintln!("\rDone ({}/{})                    ", self.done, self.total);
    }
}
