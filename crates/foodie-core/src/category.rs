use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The search categories offered by the UI. The discovery session itself is
/// category-agnostic and takes any query string; these are just the canned
/// queries behind the category buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Burgers,
    Pizza,
    Tacos,
    /// The "surprise me" wildcard — matches any food place.
    Anything,
    Bars,
    Sushi,
    Pasta,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Burgers,
        Category::Pizza,
        Category::Tacos,
        Category::Anything,
        Category::Bars,
        Category::Sushi,
        Category::Pasta,
    ];

    /// The literal query string passed to the place search capability.
    pub fn query(&self) -> &'static str {
        match self {
            Category::Burgers => "burgers",
            Category::Pizza => "pizza",
            Category::Tacos => "tacos",
            Category::Anything => "food",
            Category::Bars => "bars",
            Category::Sushi => "sushi",
            Category::Pasta => "pasta",
        }
    }

    /// Emoji label for buttons / menus.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Burgers => "🍔",
            Category::Pizza => "🍕",
            Category::Tacos => "🌮",
            Category::Anything => "❓",
            Category::Bars => "🍻",
            Category::Sushi => "🍣",
            Category::Pasta => "🍝",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.query().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}
