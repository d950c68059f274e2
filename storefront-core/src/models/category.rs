use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storefront categories offered by the admin form.
///
/// Product documents keep the category as a plain string, so this enum is
/// only used to offer and parse the known choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "all")]
    All,
    Ethinic,
    Tops,
    Kurti,
    Ambrella,
    Nayra,
    Pant,
    Dupatta,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::All,
        Category::Ethinic,
        Category::Tops,
        Category::Kurti,
        Category::Ambrella,
        Category::Nayra,
        Category::Pant,
        Category::Dupatta,
    ];

    /// Value stored in the product document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Ethinic => "Ethinic",
            Category::Tops => "Tops",
            Category::Kurti => "Kurti",
            Category::Ambrella => "Ambrella",
            Category::Nayra => "Nayra",
            Category::Pant => "Pant",
            Category::Dupatta => "Dupatta",
        }
    }

    /// Label shown to admins.
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Ethinic => "Ethinic Set",
            Category::Tops => "Tops",
            Category::Kurti => "Kurti Set",
            Category::Ambrella => "Ambrella Set",
            Category::Nayra => "Nayra Set",
            Category::Pant => "Pant",
            Category::Dupatta => "Dupatta",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "Invalid category '{}'. Valid options: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}
