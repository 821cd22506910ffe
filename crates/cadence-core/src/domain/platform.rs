use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Social network a post can be published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Facebook,
    Instagram,
    #[serde(alias = "TWITTER")]
    X,
    Linkedin,
    Tiktok,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::X,
        Platform::Linkedin,
        Platform::Tiktok,
    ];

    /// Wire identifier, e.g. `"INSTAGRAM"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "FACEBOOK",
            Platform::Instagram => "INSTAGRAM",
            Platform::X => "X",
            Platform::Linkedin => "LINKEDIN",
            Platform::Tiktok => "TIKTOK",
        }
    }

    /// Human-facing name used in validation messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::X => "X",
            Platform::Linkedin => "LinkedIn",
            Platform::Tiktok => "TikTok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FACEBOOK" => Ok(Platform::Facebook),
            "INSTAGRAM" => Ok(Platform::Instagram),
            "X" | "TWITTER" => Ok(Platform::X),
            "LINKEDIN" => Ok(Platform::Linkedin),
            "TIKTOK" => Ok(Platform::Tiktok),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}
