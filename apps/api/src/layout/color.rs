use serde::{Deserialize, Serialize};

/// An RGB color with components in 0.0..=1.0, as PDF content streams expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    #[cfg(test)]
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parses `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn parse(value: &str) -> Option<Rgb> {
        let hex = value.trim().trim_start_matches('#');
        let digits: Vec<u8> = match hex.len() {
            3 => hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
                .collect::<Option<_>>()?,
            6 => (0..3)
                .map(|i| hex.get(i * 2..i * 2 + 2).and_then(|h| u8::from_str_radix(h, 16).ok()))
                .collect::<Option<_>>()?,
            _ => return None,
        };
        Some(Rgb {
            r: digits[0] as f32 / 255.0,
            g: digits[1] as f32 / 255.0,
            b: digits[2] as f32 / 255.0,
        })
    }

    /// Parses `value`, falling back to `fallback` (which must itself be valid hex).
    pub fn parse_or(value: &str, fallback: &str) -> Rgb {
        Rgb::parse(value)
            .or_else(|| Rgb::parse(fallback))
            .unwrap_or(Rgb {
                r: 0.0,
                g: 0.0,
                b: 0.0,
            })
    }

    /// This color laid over white paper at `opacity`.
    pub fn over_white(self, opacity: f32) -> Rgb {
        let a = opacity.clamp(0.0, 1.0);
        Rgb {
            r: self.r * a + (1.0 - a),
            g: self.g * a + (1.0 - a),
            b: self.b * a + (1.0 - a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_parse_long_hex() {
        let c = Rgb::parse("#4f46e5").unwrap();
        assert!(close(c.r, 79.0 / 255.0));
        assert!(close(c.g, 70.0 / 255.0));
        assert!(close(c.b, 229.0 / 255.0));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Rgb::parse("#fff"), Some(Rgb::WHITE));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Rgb::parse("rebeccapurple"), None);
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#zzzzzz"), None);
        assert_eq!(Rgb::parse("#ééé"), None);
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(Rgb::parse_or("nope", "#ffffff"), Rgb::WHITE);
    }

    #[test]
    fn test_over_white_blends() {
        let black = Rgb { r: 0.0, g: 0.0, b: 0.0 };
        assert_eq!(black.over_white(0.0), Rgb::WHITE);
        assert!(close(black.over_white(0.25).r, 0.75));
    }
}
