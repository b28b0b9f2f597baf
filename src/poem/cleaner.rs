// file: src/poem/cleaner.rs
// description: line-level cleanup of candidate poem blocks
// reference: filters pdf chart noise such as footers and links

pub const MAX_LINE_CHARS: usize = 120;
const URL_MARKER: &str = "http";

pub struct PoemCleaner {
    max_line_chars: usize,
}

impl PoemCleaner {
    pub fn new() -> Self {
        Self {
            max_line_chars: MAX_LINE_CHARS,
        }
    }

    /// Trims every line and drops blank, overlong and link-bearing lines.
    pub fn clean(&self, raw_block: &str) -> String {
        raw_block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| self.keep_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn keep_line(&self, line: &str) -> bool {
        line.chars().count() < self.max_line_chars && !line.to_lowercase().contains(URL_MARKER)
    }
}

impl Default for PoemCleaner {
    fn default() -> Self {
        Self::new()
    }
}
