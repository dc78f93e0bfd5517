//! Screens that can be composed from sections.

use crate::error::SectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display surface being customized.
///
/// The set is closed: adding a screen means adding a row for it to the
/// section table as well.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    LockScreen,
    HomeScreen,
}

impl Screen {
    /// All screens in declared order (lock before home).
    pub fn all() -> [Screen; 2] {
        [Screen::LockScreen, Screen::HomeScreen]
    }

    /// Stable identifier used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::LockScreen => "lock_screen",
            Screen::HomeScreen => "home_screen",
        }
    }

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Screen::LockScreen => "Lock screen",
            Screen::HomeScreen => "Home screen",
        }
    }

    /// The screen the host switches to when toggling.
    pub fn other(&self) -> Screen {
        match self {
            Screen::LockScreen => Screen::HomeScreen,
            Screen::HomeScreen => Screen::LockScreen,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = SectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lock_screen" | "lock" => Ok(Screen::LockScreen),
            "home_screen" | "home" => Ok(Screen::HomeScreen),
            _ => Err(SectionError::InvalidScreen(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order() {
        assert_eq!(Screen::all(), [Screen::LockScreen, Screen::HomeScreen]);
    }

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("lock_screen".parse::<Screen>(), Ok(Screen::LockScreen));
        assert_eq!("home".parse::<Screen>(), Ok(Screen::HomeScreen));
        assert_eq!(" HOME_SCREEN ".parse::<Screen>(), Ok(Screen::HomeScreen));
    }

    #[test]
    fn test_parse_unknown_screen() {
        let err = "notification_shade".parse::<Screen>().unwrap_err();
        assert_eq!(
            err,
            SectionError::InvalidScreen("notification_shade".to_string())
        );
    }

    #[test]
    fn test_display_matches_serde_name() {
        for screen in Screen::all() {
            let json = serde_json::to_string(&screen).unwrap();
            assert_eq!(json, format!("\"{}\"", screen));
        }
    }

    #[test]
    fn test_other_toggles() {
        assert_eq!(Screen::LockScreen.other(), Screen::HomeScreen);
        assert_eq!(Screen::HomeScreen.other(), Screen::LockScreen);
    }
}
