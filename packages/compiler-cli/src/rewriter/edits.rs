//! Source Edits
//!
//! Text replacements recorded against byte offsets of the original source and
//! applied in one pass. Edits never overlap: anything recorded inside a
//! template site is folded into that site's own replacement text first.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub end: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct SourceEdits {
    edits: Vec<Edit>,
}

impl SourceEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn replace(&mut self, start: u32, end: u32, text: impl Into<String>) {
        self.edits.push(Edit {
            start,
            end,
            text: text.into(),
        });
    }

    pub fn insert(&mut self, at: u32, text: impl Into<String>) {
        self.replace(at, at, text);
    }

    pub fn remove(&mut self, start: u32, end: u32) {
        self.replace(start, end, String::new());
    }

    /// Take every edit recorded since `mark`.
    pub fn split_off(&mut self, mark: usize) -> SourceEdits {
        SourceEdits {
            edits: self.edits.split_off(mark.min(self.edits.len())),
        }
    }

    /// Apply all edits to `source`.
    pub fn apply(&self, source: &str) -> String {
        self.apply_range(source, 0, source.len() as u32)
    }

    /// Text of `source[start..end]` with the edits inside that range applied.
    pub fn apply_range(&self, source: &str, start: u32, end: u32) -> String {
        let mut edits: Vec<&Edit> = self
            .edits
            .iter()
            .filter(|e| e.start >= start && e.end <= end)
            .collect();
        // Sort by start descending so earlier offsets stay valid.
        edits.sort_by(|a, b| b.start.cmp(&a.start));

        let mut result = source[start as usize..end as usize].to_string();
        for edit in edits {
            let from = (edit.start - start) as usize;
            let to = (edit.end - start) as usize;
            result.replace_range(from..to, &edit.text);
        }
        result
    }
}
