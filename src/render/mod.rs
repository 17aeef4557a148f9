//! Utilities and modules related to rendering diff outputs.
//!
//! We have a modular system for displaying diff data to the terminal. Using this system makes it
//! much easier to extend with new formats that people may request.
//!
//! This library defines a fairly minimal interface for renderers: a single trait called
//! `Renderer`. From there implementers are free to do whatever they want with the diff data.
//!
//! This module also defines utilities that may be useful for `Renderer` implementations.

mod stats;
mod unified;

use crate::operation::Operation;
use anyhow::anyhow;
use console::{Color, Style, Term};
use enum_dispatch::enum_dispatch;
use log::info;
use serde::{Deserialize, Serialize};
use std::{cmp::max, io::Write};
use strum::{self, Display, EnumIter, EnumString};

pub use stats::Stats;
pub use unified::{TextStyle, Unified};

/// The ascii separator used after the diff title
const TITLE_SEPARATOR: &str = "=";

/// The parameters required to display a diff for a particular document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentDiffData<'a> {
    /// The filename of the document
    pub filename: &'a str,
    /// The tokens the document was split into
    pub tokens: &'a [&'a str],
}

/// The parameters a [Renderer] instance receives to render a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayData<'a> {
    /// The edit script between the two documents
    pub ops: &'a [Operation<&'a str>],
    /// The parameters that correspond to the old document
    pub old: DocumentDiffData<'a>,
    /// The parameters that correspond to the new document
    pub new: DocumentDiffData<'a>,
}

#[enum_dispatch]
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Renderers {
    Unified,
    Stats,
}

impl Default for Renderers {
    fn default() -> Self {
        Renderers::Unified(Unified::default())
    }
}

/// An interface that renders given diff data.
#[enum_dispatch(Renderers)]
pub trait Renderer {
    /// Render a diff.
    ///
    /// We use anyhow for errors so errors are free form for implementors, as they are not
    /// recoverable.
    ///
    /// `writer` can be any generic writer - it's not guaranteed that we're writing to a particular sink (could be a
    /// pager, stdout, etc). `data` is the data that the renderer needs to display, this has information about the
    /// documents being compared. `term_info` is an optional reference to a term object that can be used by the
    /// renderer to access information about the terminal if the current process is a TTY output.
    fn render(
        &self,
        writer: &mut dyn Write,
        data: &DisplayData,
        term_info: Option<&Term>,
    ) -> anyhow::Result<()>;
}

/// A copy of the [Color](console::Color) enum so we can serialize using serde, and get around the
/// orphan rule.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(remote = "Color", rename_all = "snake_case")]
enum ColorDef {
    Color256(u8),
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    TrueColor(u8, u8, u8),
}

impl From<ColorDef> for Color {
    fn from(c: ColorDef) -> Self {
        match c {
            ColorDef::Black => Color::Black,
            ColorDef::White => Color::White,
            ColorDef::Red => Color::Red,
            ColorDef::Green => Color::Green,
            ColorDef::Yellow => Color::Yellow,
            ColorDef::Blue => Color::Blue,
            ColorDef::Magenta => Color::Magenta,
            ColorDef::Cyan => Color::Cyan,
            ColorDef::Color256(c) => Color::Color256(c),
            ColorDef::TrueColor(r, g, b) => Color::TrueColor(r, g, b),
        }
    }
}

/// Workaround so we can use the `ColorDef` remote serialization mechanism with optional types
mod opt_color_def {
    use super::{Color, ColorDef};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &Option<Color>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Helper<'a>(#[serde(with = "ColorDef")] &'a Color);

        value.as_ref().map(Helper).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper(#[serde(with = "ColorDef")] Color);

        let helper = Option::deserialize(deserializer)?;
        Ok(helper.map(|Helper(external)| external))
    }
}

/// A helper function for the serde serializer
///
/// Due to the shenanigans we're using to serialize the optional color, we need to supply this
/// method so serde can infer a default value for an option when its key is missing.
fn default_option<T>() -> Option<T> {
    None
}

/// The style that applies to titles and unchanged tokens
#[derive(Clone, Debug, PartialEq, Eq)]
struct RegularStyle(Style);

/// The style that applies to added and removed tokens
#[derive(Clone, Debug, PartialEq, Eq)]
struct EmphasizedStyle(Style);

/// Print the title for the diff
///
/// This will print the two files being compared. This will also attempt to modify the layout
/// (stacking horizontally or vertically) based on the terminal width.
fn print_title(
    term: &mut dyn Write,
    old_fname: &str,
    new_fname: &str,
    old_style: &RegularStyle,
    new_style: &RegularStyle,
    term_info: Option<&Term>,
) -> std::io::Result<()> {
    // The different ways we can stack the title
    #[derive(Debug, Eq, PartialEq, PartialOrd, Ord, strum_macros::Display)]
    #[strum(serialize_all = "snake_case")]
    enum TitleStack {
        Vertical,
        Horizontal,
    }
    let divider = " -> ";

    // If the horizontal title is wider than the terminal we stack the file names vertically
    let title_len = old_fname.len() + divider.len() + new_fname.len();
    // Without terminal info the title is stacked horizontally
    let term_width = term_info
        .and_then(Term::size_checked)
        .map_or(title_len, |(_height, width)| width.into());
    let stack_style = if title_len <= term_width {
        TitleStack::Horizontal
    } else {
        TitleStack::Vertical
    };

    info!("Using stack style {} for title", stack_style);

    let (styled_title_str, title_sep) = match stack_style {
        TitleStack::Horizontal => {
            let styled_title_str = format!(
                "{}{}{}",
                old_style.0.apply_to(old_fname),
                divider,
                new_style.0.apply_to(new_fname)
            );
            (styled_title_str, TITLE_SEPARATOR.repeat(title_len))
        }
        TitleStack::Vertical => {
            let title_len = max(old_fname.len(), new_fname.len());
            let styled_title_str = format!(
                "{}\n{}",
                old_style.0.apply_to(old_fname),
                new_style.0.apply_to(new_fname)
            );
            (styled_title_str, TITLE_SEPARATOR.repeat(title_len))
        }
    };
    writeln!(term, "{styled_title_str}")?;
    writeln!(term, "{title_sep}")?;
    Ok(())
}

/// Configurations and templates for different configuration aliases
///
/// The user can define settings for each renderer as well as custom tags for different renderer
/// configurations.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(rename_all = "snake_case", default)]
pub struct RenderConfig {
    /// The default diff renderer to use.
    ///
    /// This is used if no renderer is specified at the command line.
    default: String,

    unified: Unified,
    stats: Stats,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let default_renderer = Renderers::default();
        RenderConfig {
            default: default_renderer.to_string(),
            unified: Unified::default(),
            stats: Stats::default(),
        }
    }
}

impl RenderConfig {
    /// Get the renderer specified by the given tag.
    ///
    /// If the tag is not specified this will fall back to the default renderer.
    pub fn get_renderer(self, tag: Option<String>) -> anyhow::Result<Renderers> {
        let tag = tag.unwrap_or_else(|| self.default.clone());

        // Match the tag to the configured renderer, using the config values
        match tag.as_str() {
            "unified" => Ok(Renderers::Unified(self.unified)),
            "stats" => Ok(Renderers::Stats(self.stats)),
            _ => Err(anyhow!("'{}' is not a valid renderer", &tag)),
        }
    }
}

/// Make a token printable on a single output line.
fn escape_token(token: &str) -> String {
    token.replace('\r', "\\r").replace('\n', "\\n")
}
