//! Helper functions for dealing with the terminal

use console::{set_colors_enabled, set_colors_enabled_stderr};
use log::debug;
use strum::{Display, EnumIter, EnumString};

/// Whether the output to the terminal should be colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ColorOutputPolicy {
    /// Automatically enable color if printing to a TTY, otherwise disable color
    #[default]
    Auto,
    /// Force plaintext output
    Off,
    /// Force color output
    On,
}

impl ColorOutputPolicy {
    /// The color setting this policy forces, if any.
    pub fn forced(self) -> Option<bool> {
        match self {
            ColorOutputPolicy::Auto => None,
            ColorOutputPolicy::On => Some(true),
            ColorOutputPolicy::Off => Some(false),
        }
    }
}

/// Set terminal color settings based on the output policy.
///
/// `Auto` leaves the detection done by `console` untouched.
pub fn set_term_colors(setting: ColorOutputPolicy) {
    if let Some(colors_enabled) = setting.forced() {
        debug!("Forcing terminal colors to {colors_enabled}");
        set_colors_enabled(colors_enabled);
        set_colors_enabled_stderr(colors_enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use test_case::test_case;

    #[test_case("auto", ColorOutputPolicy::Auto, None)]
    #[test_case("on", ColorOutputPolicy::On, Some(true))]
    #[test_case("off", ColorOutputPolicy::Off, Some(false))]
    fn test_policy(name: &str, policy: ColorOutputPolicy, forced: Option<bool>) {
        assert_eq!(ColorOutputPolicy::from_str(name).unwrap(), policy);
        assert_eq!(policy.to_string(), name);
        assert_eq!(policy.forced(), forced);
    }

    #[test]
    fn test_default_is_auto() {
        assert_eq!(ColorOutputPolicy::default(), ColorOutputPolicy::Auto);
    }
}
