//! Scrollback buffer for lines pushed off the top of the grid

use std::collections::VecDeque;

/// Bounded history of lines, oldest first
#[derive(Debug, Clone, Default)]
pub struct Scrollback {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl Scrollback {
    /// Create a new scrollback buffer holding at most `max_lines`
    pub fn new(max_lines: usize) -> Self {
        Self {
            // Don't pre-allocate too much
            lines: VecDeque::with_capacity(max_lines.min(1000)),
            max_lines,
        }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Push a line, dropping the oldest when full
    pub fn push(&mut self, line: String) {
        if self.max_lines == 0 {
            return;
        }
        if self.lines.len() == self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Take back the most recent line
    pub fn pop(&mut self) -> Option<String> {
        self.lines.pop_back()
    }

    /// Get a line by age (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
