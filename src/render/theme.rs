//! Document themes: a fixed catalog of named palettes over the invoice
//! template's color roles

use serde::{Deserialize, Serialize};

use crate::types::{BillingError, BillingResult};

/// Color roles the invoice template styles from, as `#rrggbb` hex strings.
/// Switching palettes changes only these values; document fields are
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub header_bg: &'static str,
    pub header_text: &'static str,
    pub table_header_bg: &'static str,
    pub table_header_text: &'static str,
    pub table_border: &'static str,
    pub totals_bg: &'static str,
    pub totals_text: &'static str,
    pub body_bg: &'static str,
    pub body_text: &'static str,
    pub accent: &'static str,
}

/// The sixteen selectable themes. Reset restores [`ThemeKey::Classic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeKey {
    #[default]
    Classic,
    Slate,
    Ocean,
    Forest,
    Ruby,
    Amber,
    Plum,
    Teal,
    Midnight,
    Sand,
    Rose,
    Steel,
    Olive,
    Copper,
    Indigo,
    Mono,
}

impl ThemeKey {
    /// Every theme, in selector order
    pub const ALL: [ThemeKey; 16] = [
        ThemeKey::Classic,
        ThemeKey::Slate,
        ThemeKey::Ocean,
        ThemeKey::Forest,
        ThemeKey::Ruby,
        ThemeKey::Amber,
        ThemeKey::Plum,
        ThemeKey::Teal,
        ThemeKey::Midnight,
        ThemeKey::Sand,
        ThemeKey::Rose,
        ThemeKey::Steel,
        ThemeKey::Olive,
        ThemeKey::Copper,
        ThemeKey::Indigo,
        ThemeKey::Mono,
    ];

    /// Display name shown in the theme selector
    pub fn label(&self) -> &'static str {
        match self {
            ThemeKey::Classic => "Classic",
            ThemeKey::Slate => "Slate",
            ThemeKey::Ocean => "Ocean",
            ThemeKey::Forest => "Forest",
            ThemeKey::Ruby => "Ruby",
            ThemeKey::Amber => "Amber",
            ThemeKey::Plum => "Plum",
            ThemeKey::Teal => "Teal",
            ThemeKey::Midnight => "Midnight",
            ThemeKey::Sand => "Sand",
            ThemeKey::Rose => "Rose",
            ThemeKey::Steel => "Steel",
            ThemeKey::Olive => "Olive",
            ThemeKey::Copper => "Copper",
            ThemeKey::Indigo => "Indigo",
            ThemeKey::Mono => "Mono",
        }
    }

    /// The palette for this theme
    pub fn palette(&self) -> Palette {
        match self {
            ThemeKey::Classic => Palette {
                header_bg: "#1e3a5f",
                header_text: "#ffffff",
                table_header_bg: "#2d5186",
                table_header_text: "#ffffff",
                table_border: "#c3cfdd",
                totals_bg: "#eef2f7",
                totals_text: "#1e3a5f",
                body_bg: "#ffffff",
                body_text: "#222222",
                accent: "#2d5186",
            },
            ThemeKey::Slate => Palette {
                header_bg: "#37474f",
                header_text: "#eceff1",
                table_header_bg: "#546e7a",
                table_header_text: "#ffffff",
                table_border: "#b0bec5",
                totals_bg: "#eceff1",
                totals_text: "#263238",
                body_bg: "#ffffff",
                body_text: "#263238",
                accent: "#546e7a",
            },
            ThemeKey::Ocean => Palette {
                header_bg: "#01579b",
                header_text: "#e1f5fe",
                table_header_bg: "#0277bd",
                table_header_text: "#ffffff",
                table_border: "#81d4fa",
                totals_bg: "#e1f5fe",
                totals_text: "#01579b",
                body_bg: "#ffffff",
                body_text: "#102a43",
                accent: "#0288d1",
            },
            ThemeKey::Forest => Palette {
                header_bg: "#1b5e20",
                header_text: "#e8f5e9",
                table_header_bg: "#2e7d32",
                table_header_text: "#ffffff",
                table_border: "#a5d6a7",
                totals_bg: "#e8f5e9",
                totals_text: "#1b5e20",
                body_bg: "#ffffff",
                body_text: "#1c2b1c",
                accent: "#388e3c",
            },
            ThemeKey::Ruby => Palette {
                header_bg: "#7f1d1d",
                header_text: "#fef2f2",
                table_header_bg: "#991b1b",
                table_header_text: "#ffffff",
                table_border: "#fecaca",
                totals_bg: "#fef2f2",
                totals_text: "#7f1d1d",
                body_bg: "#ffffff",
                body_text: "#27272a",
                accent: "#b91c1c",
            },
            ThemeKey::Amber => Palette {
                header_bg: "#92400e",
                header_text: "#fffbeb",
                table_header_bg: "#b45309",
                table_header_text: "#ffffff",
                table_border: "#fde68a",
                totals_bg: "#fffbeb",
                totals_text: "#92400e",
                body_bg: "#ffffff",
                body_text: "#292524",
                accent: "#d97706",
            },
            ThemeKey::Plum => Palette {
                header_bg: "#4a148c",
                header_text: "#f3e5f5",
                table_header_bg: "#6a1b9a",
                table_header_text: "#ffffff",
                table_border: "#ce93d8",
                totals_bg: "#f3e5f5",
                totals_text: "#4a148c",
                body_bg: "#ffffff",
                body_text: "#2a1a33",
                accent: "#8e24aa",
            },
            ThemeKey::Teal => Palette {
                header_bg: "#004d40",
                header_text: "#e0f2f1",
                table_header_bg: "#00695c",
                table_header_text: "#ffffff",
                table_border: "#80cbc4",
                totals_bg: "#e0f2f1",
                totals_text: "#004d40",
                body_bg: "#ffffff",
                body_text: "#10302b",
                accent: "#00897b",
            },
            ThemeKey::Midnight => Palette {
                header_bg: "#0f172a",
                header_text: "#e2e8f0",
                table_header_bg: "#1e293b",
                table_header_text: "#e2e8f0",
                table_border: "#475569",
                totals_bg: "#1e293b",
                totals_text: "#e2e8f0",
                body_bg: "#0f172a",
                body_text: "#cbd5e1",
                accent: "#38bdf8",
            },
            ThemeKey::Sand => Palette {
                header_bg: "#6d4c41",
                header_text: "#efebe9",
                table_header_bg: "#8d6e63",
                table_header_text: "#ffffff",
                table_border: "#d7ccc8",
                totals_bg: "#efebe9",
                totals_text: "#4e342e",
                body_bg: "#fffaf5",
                body_text: "#3e2723",
                accent: "#a1887f",
            },
            ThemeKey::Rose => Palette {
                header_bg: "#881337",
                header_text: "#fff1f2",
                table_header_bg: "#9f1239",
                table_header_text: "#ffffff",
                table_border: "#fecdd3",
                totals_bg: "#fff1f2",
                totals_text: "#881337",
                body_bg: "#ffffff",
                body_text: "#1f2937",
                accent: "#e11d48",
            },
            ThemeKey::Steel => Palette {
                header_bg: "#334155",
                header_text: "#f1f5f9",
                table_header_bg: "#475569",
                table_header_text: "#f8fafc",
                table_border: "#94a3b8",
                totals_bg: "#f1f5f9",
                totals_text: "#0f172a",
                body_bg: "#ffffff",
                body_text: "#1e293b",
                accent: "#64748b",
            },
            ThemeKey::Olive => Palette {
                header_bg: "#3f4d1e",
                header_text: "#f7fee7",
                table_header_bg: "#4d7c0f",
                table_header_text: "#ffffff",
                table_border: "#d9f99d",
                totals_bg: "#f7fee7",
                totals_text: "#365314",
                body_bg: "#ffffff",
                body_text: "#1a2e05",
                accent: "#65a30d",
            },
            ThemeKey::Copper => Palette {
                header_bg: "#7c2d12",
                header_text: "#fff7ed",
                table_header_bg: "#9a3412",
                table_header_text: "#ffffff",
                table_border: "#fed7aa",
                totals_bg: "#fff7ed",
                totals_text: "#7c2d12",
                body_bg: "#ffffff",
                body_text: "#292524",
                accent: "#c2410c",
            },
            ThemeKey::Indigo => Palette {
                header_bg: "#312e81",
                header_text: "#eef2ff",
                table_header_bg: "#3730a3",
                table_header_text: "#ffffff",
                table_border: "#c7d2fe",
                totals_bg: "#eef2ff",
                totals_text: "#312e81",
                body_bg: "#ffffff",
                body_text: "#1e1b4b",
                accent: "#4f46e5",
            },
            ThemeKey::Mono => Palette {
                header_bg: "#111111",
                header_text: "#fafafa",
                table_header_bg: "#2b2b2b",
                table_header_text: "#fafafa",
                table_border: "#9e9e9e",
                totals_bg: "#f5f5f5",
                totals_text: "#111111",
                body_bg: "#ffffff",
                body_text: "#1a1a1a",
                accent: "#616161",
            },
        }
    }
}

/// Parse a `#rrggbb` hex color into 0..=1 channel values for the PDF layer
pub fn hex_to_rgb(hex: &str) -> BillingResult<(f32, f32, f32)> {
    let raw = hex.strip_prefix('#').unwrap_or(hex);
    if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BillingError::Render(format!("Invalid hex color '{hex}'")));
    }
    let channel = |range: std::ops::Range<usize>| -> BillingResult<f32> {
        u8::from_str_radix(&raw[range], 16)
            .map(|value| f32::from(value) / 255.0)
            .map_err(|_| BillingError::Render(format!("Invalid hex color '{hex}'")))
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_sixteen_themes() {
        assert_eq!(ThemeKey::ALL.len(), 16);
    }

    #[test]
    fn test_default_is_first_theme() {
        assert_eq!(ThemeKey::default(), ThemeKey::ALL[0]);
        assert_eq!(ThemeKey::default(), ThemeKey::Classic);
    }

    #[test]
    fn test_palettes_are_distinct() {
        for (i, a) in ThemeKey::ALL.iter().enumerate() {
            for b in &ThemeKey::ALL[i + 1..] {
                assert_ne!(a.palette(), b.palette(), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_all_palette_colors_parse() {
        for key in ThemeKey::ALL {
            let p = key.palette();
            for hex in [
                p.header_bg,
                p.header_text,
                p.table_header_bg,
                p.table_header_text,
                p.table_border,
                p.totals_bg,
                p.totals_text,
                p.body_bg,
                p.body_text,
                p.accent,
            ] {
                assert!(hex_to_rgb(hex).is_ok(), "{:?}: {}", key, hex);
            }
        }
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ffffff").unwrap(), (1.0, 1.0, 1.0));
        assert_eq!(hex_to_rgb("#000000").unwrap(), (0.0, 0.0, 0.0));
        assert!(hex_to_rgb("#12345").is_err());
        assert!(hex_to_rgb("zzzzzz").is_err());
    }

    #[test]
    fn test_hex_to_rgb_rejects_non_ascii() {
        // six bytes but not six hex digits
        assert!(hex_to_rgb("1\u{fc}234").is_err());
        assert!(hex_to_rgb("#ffff\u{e9}").is_err());
    }
}
