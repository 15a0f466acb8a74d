//! # Gurubook Theme
//!
//! Design tokens shared by every Gurubook surface: one font family, a
//! three-step title and body-text scale, an 11-color palette and the title
//! scale used on narrow viewports.
//!
//! Everything is a `const` of `&'static str` tokens in CSS notation. Nothing
//! here is mutable at runtime.
//!
//! ```
//! use gurubook_theme::{Size, THEME, Viewport};
//!
//! assert_eq!(THEME.title(Size::Big, Viewport::Regular).size, "48px");
//! assert_eq!(THEME.title(Size::Big, Viewport::Narrow).size, "32px");
//! assert_eq!(THEME.colors.get("redPallet1"), Some("#fbeced"));
//! ```
//!
//! With `serde_json`, `THEME` serializes to the same nested object the web
//! client consumes (camelCase keys such as `lineHeight` and `blackPallet1`).

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use serde::Serialize;

/// The Gurubook theme.
pub const THEME: Theme = Theme {
    typography: Typography {
        family: "Montserrat, sans-serif",
        title: Scale {
            default: TextStyle::new("36px", "48px"),
            big: TextStyle::new("48px", "72px"),
            small: TextStyle::new("28px", "36px"),
        },
        text: Scale {
            default: TextStyle::new("16px", "24px"),
            big: TextStyle::new("24px", "32px"),
            small: TextStyle::new("12px", "16px"),
        },
    },
    colors: Palette {
        white: "#FFFFFF",
        black: "#000000",
        black_pallet1: "rgba(0, 0, 0, 0.35)",
        gray: "#abaaaa",
        gray_pallet1: "#f3f2ef",
        red: "#d83e4b",
        red_pallet1: "#fbeced",
        green: "#87c87b",
        green_pallet1: "#dff1dc",
        blue: "#2F4858",
        blue_pallet1: "#183241",
    },
    media: Media {
        typography: MediaTypography {
            title: Scale {
                default: TextStyle::new("28px", "36px"),
                big: TextStyle::new("32px", "48px"),
                small: TextStyle::new("20px", "30px"),
            },
        },
    },
};

/// Step on a type scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Size {
    /// Regular size.
    #[default]
    Default,
    /// Larger step.
    Big,
    /// Smaller step.
    Small,
}

/// Viewport class used to pick the title scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Viewport {
    /// Desktop and tablet widths.
    #[default]
    Regular,
    /// Phone widths; titles use the `media` scale.
    Narrow,
}

/// Font size and line height, as CSS lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size (e.g. `"16px"`).
    pub size: &'static str,
    /// Line height (e.g. `"24px"`).
    pub line_height: &'static str,
}

impl TextStyle {
    /// Create a style from two CSS lengths.
    #[must_use]
    pub const fn new(size: &'static str, line_height: &'static str) -> Self {
        Self { size, line_height }
    }

    /// Font size in pixels, if the token is a `px` length.
    #[must_use]
    pub fn size_px(&self) -> Option<u16> {
        px(self.size)
    }

    /// Line height in pixels, if the token is a `px` length.
    #[must_use]
    pub fn line_height_px(&self) -> Option<u16> {
        px(self.line_height)
    }
}

fn px(token: &str) -> Option<u16> {
    token.strip_suffix("px")?.trim().parse().ok()
}

/// A three-step type scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scale {
    /// Regular step.
    pub default: TextStyle,
    /// Larger step.
    pub big: TextStyle,
    /// Smaller step.
    pub small: TextStyle,
}

impl Scale {
    /// The style for `size`.
    #[must_use]
    pub const fn get(&self, size: Size) -> TextStyle {
        match size {
            Size::Default => self.default,
            Size::Big => self.big,
            Size::Small => self.small,
        }
    }
}

/// Font family and scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Typography {
    /// CSS font-family list.
    pub family: &'static str,
    /// Title scale.
    pub title: Scale,
    /// Body-text scale.
    pub text: Scale,
}

/// Named colors. `*_pallet1` entries are the tint paired with the base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    /// White.
    pub white: &'static str,
    /// Black.
    pub black: &'static str,
    /// Tint paired with `black`.
    pub black_pallet1: &'static str,
    /// Gray.
    pub gray: &'static str,
    /// Tint paired with `gray`.
    pub gray_pallet1: &'static str,
    /// Red.
    pub red: &'static str,
    /// Tint paired with `red`.
    pub red_pallet1: &'static str,
    /// Green.
    pub green: &'static str,
    /// Tint paired with `green`.
    pub green_pallet1: &'static str,
    /// Blue.
    pub blue: &'static str,
    /// Tint paired with `blue`.
    pub blue_pallet1: &'static str,
}

impl Palette {
    /// Every `(name, color)` pair, keyed by the camelCase names the web client uses.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, &'static str); 11] {
        [
            ("white", self.white),
            ("black", self.black),
            ("blackPallet1", self.black_pallet1),
            ("gray", self.gray),
            ("grayPallet1", self.gray_pallet1),
            ("red", self.red),
            ("redPallet1", self.red_pallet1),
            ("green", self.green),
            ("greenPallet1", self.green_pallet1),
            ("blue", self.blue),
            ("bluePallet1", self.blue_pallet1),
        ]
    }

    /// Look a color up by its camelCase name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find_map(|(key, color)| (key == name).then_some(color))
    }
}

/// Typography overrides for narrow viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaTypography {
    /// Title scale for narrow viewports.
    pub title: Scale,
}

/// Viewport-specific overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Media {
    /// Typography overrides.
    pub typography: MediaTypography,
}

/// Complete theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Fonts.
    pub typography: Typography,
    /// Palette.
    pub colors: Palette,
    /// Narrow-viewport overrides.
    pub media: Media,
}

impl Theme {
    /// Title style for `size` on `viewport`.
    #[must_use]
    pub const fn title(&self, size: Size, viewport: Viewport) -> TextStyle {
        match viewport {
            Viewport::Regular => self.typography.title.get(size),
            Viewport::Narrow => self.media.typography.title.get(size),
        }
    }

    /// Body-text style for `size`. The text scale has no narrow override.
    #[must_use]
    pub const fn text(&self, size: Size) -> TextStyle {
        self.typography.text.get(size)
    }
}

impl Default for Theme {
    fn default() -> Self {
        THEME
    }
}
