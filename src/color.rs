//! Hex color helpers. Colors are stored as sRGB components in `[0, 1]`.

use glam::Vec3;

use crate::error::PanelError;

/// Builds a color from a `0xRRGGBB` literal.
pub fn from_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(text: &str) -> Result<Vec3, PanelError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(PanelError::InvalidColor(text.to_string()));
    }
    u32::from_str_radix(digits, 16)
        .map(from_hex)
        .map_err(|_| PanelError::InvalidColor(text.to_string()))
}

/// Formats a color as lowercase `#rrggbb`.
pub fn to_hex(color: Vec3) -> String {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.x),
        channel(color.y),
        channel(color.z)
    )
}

/// sRGB transfer function, applied per channel before lighting.
pub fn srgb_to_linear(color: Vec3) -> Vec3 {
    let convert = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(convert(color.x), convert(color.y), convert(color.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hex_literal_and_string_agree() {
        let parsed = parse_hex("#4e00ff").unwrap();
        assert_eq!(parsed, from_hex(0x4e00ff));
        assert_eq!(parse_hex("4E00FF").unwrap(), parsed);
    }

    #[test]
    fn formatting_survives_a_parse() {
        assert_eq!(to_hex(from_hex(0x78ff00)), "#78ff00");
        assert_eq!(to_hex(parse_hex("#ffddaa").unwrap()), "#ffddaa");
    }

    #[test]
    fn malformed_colors_are_rejected() {
        for bad in ["", "#fff", "#12345g", "0x123456", "#1234567"] {
            assert_eq!(
                parse_hex(bad),
                Err(PanelError::InvalidColor(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_relative_eq!(srgb_to_linear(Vec3::ONE).x, 1.0, epsilon = 1e-6);
        assert_eq!(srgb_to_linear(Vec3::ZERO), Vec3::ZERO);
        assert!(srgb_to_linear(Vec3::splat(0.5)).x < 0.5);
    }
}
