use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset groups reported by a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetCategory {
    All,
    Js,
    Css,
    Html,
    Images,
    Media,
    Fonts,
    Other,
}

impl AssetCategory {
    /// Every category, `All` first.
    pub const ALL: [Self; 8] = [
        Self::All,
        Self::Js,
        Self::Css,
        Self::Html,
        Self::Images,
        Self::Media,
        Self::Fonts,
        Self::Other,
    ];

    /// Category of a lowercase extension without the dot.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension.unwrap_or_default() {
            "js" | "mjs" | "cjs" | "jsx" => Self::Js,
            "css" => Self::Css,
            "html" | "htm" => Self::Html,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" | "ico" | "bmp" => {
                Self::Images
            }
            "mp4" | "webm" | "ogg" | "mp3" | "wav" | "flac" | "aac" | "mov" => Self::Media,
            "woff" | "woff2" | "ttf" | "otf" | "eot" => Self::Fonts,
            _ => Self::Other,
        }
    }

    pub fn contains(self, category: Self) -> bool {
        self == Self::All || self == category
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Js => "js",
            Self::Css => "css",
            Self::Html => "html",
            Self::Images => "images",
            Self::Media => "media",
            Self::Fonts => "fonts",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}
