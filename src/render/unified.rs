use crate::operation::Operation;
use crate::patch::copy_run;
use crate::render::{
    ColorDef, DisplayData, EmphasizedStyle, RegularStyle, Renderer, default_option, escape_token,
    opt_color_def, print_title,
};
use anyhow::Result;
use console::{Color, Style, Term};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// A token-per-line listing of the edit script.
///
/// Every token of both documents is printed once, in diff order: unchanged tokens with the
/// context prefix, removed tokens with the deletion style and added tokens with the addition
/// style.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct Unified {
    pub addition: TextStyle,
    pub deletion: TextStyle,
    /// The prefix to use with unchanged tokens
    pub context_prefix: String,
}

/// Text style options for additions or deletions.
///
/// This allows users to define text options like foreground, background colors, etc.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct TextStyle {
    /// The highlight/background color to use with changed tokens
    #[serde(with = "opt_color_def", default = "default_option")]
    pub highlight: Option<Color>,
    /// The foreground color for the title and changed tokens
    #[serde(with = "ColorDef")]
    pub foreground: Color,
    /// Whether to bold changed tokens
    pub bold: bool,
    /// The prefix to use with the token
    pub prefix: String,
}

impl Default for Unified {
    fn default() -> Self {
        Unified {
            addition: TextStyle {
                foreground: Color::Green,
                highlight: None,
                bold: true,
                prefix: "+ ".into(),
            },
            deletion: TextStyle {
                foreground: Color::Red,
                highlight: None,
                bold: true,
                prefix: "- ".into(),
            },
            context_prefix: "  ".into(),
        }
    }
}

/// The formatting directives to use with one side of a diff
struct FormattingDirectives<'a> {
    /// The formatting to use with the file name in the title
    pub regular: RegularStyle,
    /// The formatting to use with changed tokens
    pub emphasis: EmphasizedStyle,
    /// The prefix to use with changed tokens
    pub prefix: &'a str,
}

impl<'a> From<&'a TextStyle> for FormattingDirectives<'a> {
    fn from(fmt_opts: &'a TextStyle) -> Self {
        Self {
            regular: fmt_opts.into(),
            emphasis: fmt_opts.into(),
            prefix: &fmt_opts.prefix,
        }
    }
}

impl Renderer for Unified {
    fn render(
        &self,
        writer: &mut dyn Write,
        data: &DisplayData,
        term_info: Option<&Term>,
    ) -> Result<()> {
        let DisplayData { ops, old, new } = data;
        let old_fmt = FormattingDirectives::from(&self.deletion);
        let new_fmt = FormattingDirectives::from(&self.addition);

        print_title(
            writer,
            old.filename,
            new.filename,
            &old_fmt.regular,
            &new_fmt.regular,
            term_info,
        )?;

        for op in ops.iter() {
            match op {
                Operation::Add { value, .. } => self.print_token(writer, value, &new_fmt)?,
                Operation::Remove { value, .. } => self.print_token(writer, value, &old_fmt)?,
                Operation::Copy {
                    count, old_index, ..
                } => self.print_context(writer, old.tokens, *old_index, *count)?,
            }
        }
        Ok(())
    }
}

impl Unified {
    /// Print a single added or removed token
    fn print_token(
        &self,
        term: &mut dyn Write,
        token: &str,
        fmt: &FormattingDirectives,
    ) -> Result<()> {
        let text = format!("{}{}", fmt.prefix, escape_token(token));
        writeln!(term, "{}", fmt.emphasis.0.apply_to(text))?;
        Ok(())
    }

    /// Print a run of unchanged tokens, taken from the old document
    fn print_context(
        &self,
        term: &mut dyn Write,
        tokens: &[&str],
        start: usize,
        count: usize,
    ) -> Result<()> {
        debug!("Printing {count} unchanged tokens starting at {start}");
        for token in copy_run(tokens, start, count) {
            writeln!(term, "{}{}", self.context_prefix, escape_token(token))?;
        }
        Ok(())
    }
}

impl From<&TextStyle> for RegularStyle {
    fn from(fmt: &TextStyle) -> Self {
        RegularStyle(Style::new().fg(fmt.foreground))
    }
}

impl From<&TextStyle> for EmphasizedStyle {
    fn from(fmt: &TextStyle) -> Self {
        let mut style = Style::new().fg(fmt.foreground);

        if fmt.bold {
            style = style.bold();
        }

        if let Some(color) = fmt.highlight {
            style = style.bg(color);
        }
        EmphasizedStyle(style)
    }
}
