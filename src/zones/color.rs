use std::fmt;

/// An opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	pub const fn from_u32(value: u32) -> Self {
		Self {
			r: ((value >> 16) & 0xFF) as u8,
			g: ((value >> 8) & 0xFF) as u8,
			b: (value & 0xFF) as u8,
		}
	}

	/// Parses `#RRGGBB` (the leading `#` is optional).
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.trim().trim_start_matches('#');
		if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
			return None;
		}
		u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
	}

	/// Multiplicative darken: every channel becomes `channel * (1 - percent)`, floored at 0.
	pub fn darken(self, percent: f64) -> Self {
		let scale = |c: u8| (c as f64 * (1.0 - percent)).clamp(0.0, 255.0) as u8;
		Self::new(scale(self.r), scale(self.g), scale(self.b))
	}

	pub fn rgba(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}
