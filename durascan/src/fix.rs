//! Byte-range source rewriting used by auto-fixes.
//!
//! Edits are planned against byte offsets from the parsed AST and applied
//! back-to-front so earlier offsets stay valid. A fixed file is only written
//! after it re-parses cleanly.

use anyhow::{bail, Result};
use ruff_text_size::{TextRange, TextSize};
use serde::Serialize;

/// A single replacement of a byte range with new text.
///
/// `start_byte == end_byte` represents a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    /// Start of the replaced range (inclusive).
    pub start_byte: usize,
    /// End of the replaced range (exclusive).
    pub end_byte: usize,
    /// Replacement text.
    pub replacement: String,
}

impl Edit {
    /// Creates an edit replacing an AST node's range.
    #[must_use]
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            start_byte: range.start().to_usize(),
            end_byte: range.end().to_usize(),
            replacement: replacement.into(),
        }
    }

    /// Creates an insertion at a byte offset.
    #[must_use]
    pub fn insert(at: TextSize, text: impl Into<String>) -> Self {
        let at = at.to_usize();
        Self {
            start_byte: at,
            end_byte: at,
            replacement: text.into(),
        }
    }

    /// Returns whether this edit inserts without removing anything.
    #[must_use]
    pub fn is_insertion(&self) -> bool {
        self.start_byte == self.end_byte
    }
}

/// Applies a batch of byte-range edits to an owned source buffer.
pub struct ByteRangeRewriter {
    source: String,
    edits: Vec<Edit>,
}

impl ByteRangeRewriter {
    /// Creates a rewriter over the given source.
    #[must_use]
    pub fn new(source: String) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// Queues a single edit.
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Queues a batch of edits.
    pub fn add_edits(&mut self, edits: Vec<Edit>) {
        self.edits.extend(edits);
    }

    /// Applies all queued edits and returns the rewritten source.
    ///
    /// # Errors
    ///
    /// Returns an error if an edit is out of bounds, splits a UTF-8
    /// character, or overlaps another queued edit.
    pub fn apply(mut self) -> Result<String> {
        self.edits.sort_by(|a, b| {
            a.start_byte
                .cmp(&b.start_byte)
                .then(a.end_byte.cmp(&b.end_byte))
        });

        let mut last_end = 0usize;
        for edit in &self.edits {
            if edit.start_byte < last_end {
                bail!(
                    "Overlapping edits at byte {} (previous edit ends at {})",
                    edit.start_byte,
                    last_end
                );
            }
            if edit.end_byte > self.source.len() || edit.start_byte > edit.end_byte {
                bail!(
                    "Edit range {}..{} out of bounds for source of {} bytes",
                    edit.start_byte,
                    edit.end_byte,
                    self.source.len()
                );
            }
            if !self.source.is_char_boundary(edit.start_byte)
                || !self.source.is_char_boundary(edit.end_byte)
            {
                bail!(
                    "Edit range {}..{} does not fall on a character boundary",
                    edit.start_byte,
                    edit.end_byte
                );
            }
            last_end = edit.end_byte.max(edit.start_byte + 1);
        }

        // Apply back-to-front so byte offsets stay valid.
        for edit in self.edits.iter().rev() {
            self.source
                .replace_range(edit.start_byte..edit.end_byte, &edit.replacement);
        }
        Ok(self.source)
    }
}

/// Drops edits that overlap an earlier (larger-first on ties) edit.
///
/// Identical duplicate edits collapse to one, which keeps repeated import
/// insertions from stacking up when several findings in one file share a fix.
#[must_use]
pub fn filter_overlapping_edits(mut edits: Vec<Edit>) -> Vec<Edit> {
    edits.sort_by(|a, b| match a.start_byte.cmp(&b.start_byte) {
        std::cmp::Ordering::Equal => b.end_byte.cmp(&a.end_byte),
        other => other,
    });
    edits.dedup();

    let mut filtered: Vec<Edit> = Vec::new();
    let mut last_end = 0usize;
    let mut last_insert_at = usize::MAX;

    for edit in edits {
        if edit.is_insertion() {
            // Keep at most one insertion per offset.
            if edit.start_byte != last_insert_at {
                last_insert_at = edit.start_byte;
                filtered.push(edit);
            }
            continue;
        }
        if edit.start_byte >= last_end {
            last_end = edit.end_byte;
            filtered.push(edit);
        }
        // Contained or partially overlapping edits are skipped to avoid
        // conflicting rewrites; the next run can pick them up again.
    }

    filtered
}

/// Returns whether rewritten source still parses as Python.
#[must_use]
pub fn validate_fixed_source(fixed: &str) -> bool {
    ruff_python_parser::parse_module(fixed).is_ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_apply_replaces_back_to_front() {
        let source = "a = now()\nb = now()\n".to_owned();
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit {
            start_byte: 4,
            end_byte: 9,
            replacement: "ctx.t".to_owned(),
        });
        rewriter.add_edit(Edit {
            start_byte: 14,
            end_byte: 19,
            replacement: "ctx.t".to_owned(),
        });
        assert_eq!(rewriter.apply().unwrap(), "a = ctx.t\nb = ctx.t\n");
    }

    #[test]
    fn test_apply_rejects_overlap_and_out_of_bounds() {
        let mut rewriter = ByteRangeRewriter::new("abcdef".to_owned());
        rewriter.add_edit(Edit {
            start_byte: 0,
            end_byte: 4,
            replacement: "x".to_owned(),
        });
        rewriter.add_edit(Edit {
            start_byte: 2,
            end_byte: 5,
            replacement: "y".to_owned(),
        });
        assert!(rewriter.apply().is_err());

        let mut rewriter = ByteRangeRewriter::new("ab".to_owned());
        rewriter.add_edit(Edit {
            start_byte: 1,
            end_byte: 9,
            replacement: "x".to_owned(),
        });
        assert!(rewriter.apply().is_err());
    }

    #[test]
    fn test_insertion_applies_without_removal() {
        let mut rewriter = ByteRangeRewriter::new("import os\nx = 1\n".to_owned());
        rewriter.add_edit(Edit::insert(
            TextSize::new(10),
            "from datetime import timedelta\n",
        ));
        assert_eq!(
            rewriter.apply().unwrap(),
            "import os\nfrom datetime import timedelta\nx = 1\n"
        );
    }

    #[test]
    fn test_filter_drops_contained_and_duplicate_edits() {
        let outer = Edit {
            start_byte: 0,
            end_byte: 10,
            replacement: String::new(),
        };
        let inner = Edit {
            start_byte: 2,
            end_byte: 5,
            replacement: "x".to_owned(),
        };
        let insert = Edit::insert(TextSize::new(20), "i");
        let filtered = filter_overlapping_edits(vec![
            inner,
            outer.clone(),
            insert.clone(),
            insert.clone(),
        ]);
        assert_eq!(filtered, vec![outer, insert]);
    }

    #[test]
    fn test_validate_fixed_source() {
        assert!(validate_fixed_source("x = 1\n"));
        assert!(!validate_fixed_source("def broken(:\n"));
    }
}
