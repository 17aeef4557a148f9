use crate::operation::Operation;
use crate::render::{DisplayData, RegularStyle, Renderer, print_title};
use anyhow::Result;
use console::{Style, Term};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// A summary of how much changed between the two documents.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct Stats {
    /// Whether to print the file names before the summary
    pub show_title: bool,
}

impl Default for Stats {
    fn default() -> Self {
        Stats { show_title: true }
    }
}

/// Token counts for an edit script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    copied: usize,
    added: usize,
    removed: usize,
    operations: usize,
}

impl<'a, V: 'a> FromIterator<&'a Operation<V>> for Counts {
    fn from_iter<I: IntoIterator<Item = &'a Operation<V>>>(iter: I) -> Self {
        iter.into_iter().fold(Counts::default(), |mut counts, op| {
            match op {
                Operation::Add { .. } => counts.added += 1,
                Operation::Remove { .. } => counts.removed += 1,
                Operation::Copy { count, .. } => counts.copied += count,
            }
            counts.operations += 1;
            counts
        })
    }
}

impl Renderer for Stats {
    fn render(
        &self,
        writer: &mut dyn Write,
        data: &DisplayData,
        term_info: Option<&Term>,
    ) -> Result<()> {
        if self.show_title {
            let plain = RegularStyle(Style::new());
            print_title(
                writer,
                data.old.filename,
                data.new.filename,
                &plain,
                &plain,
                term_info,
            )?;
        }
        let counts: Counts = data.ops.iter().collect();
        writeln!(writer, "copied: {}", counts.copied)?;
        writeln!(writer, "added: {}", counts.added)?;
        writeln!(writer, "removed: {}", counts.removed)?;
        writeln!(writer, "operations: {}", counts.operations)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DocumentDiffData;
    use crate::test_utils::StringWriter;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(true, "a -> b\n======\ncopied: 3\nadded: 1\nremoved: 2\noperations: 5\n")]
    #[case(false, "copied: 3\nadded: 1\nremoved: 2\noperations: 5\n")]
    fn test_render(#[case] show_title: bool, #[case] expected: &str) {
        let ops = vec![
            Operation::remove("x", 0, 0),
            Operation::copy(2, 1, 0),
            Operation::remove("y", 3, 2),
            Operation::add("z", 4, 2),
            Operation::copy(1, 4, 3),
        ];
        let data = DisplayData {
            ops: &ops,
            old: DocumentDiffData {
                filename: "a",
                tokens: &["x", "p", "q", "y", "r"],
            },
            new: DocumentDiffData {
                filename: "b",
                tokens: &["p", "q", "z", "r"],
            },
        };
        let mut writer = StringWriter::new();
        Stats { show_title }.render(&mut writer, &data, None).unwrap();
        assert_eq!(console::strip_ansi_codes(&writer.consume()), expected);
    }

    #[test]
    fn test_empty_script() {
        let ops: Vec<Operation<&str>> = Vec::new();
        let counts: Counts = ops.iter().collect();
        assert_eq!(counts, Counts::default());
    }
}
