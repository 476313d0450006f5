//! RGBA color type and the palette used by the paint canvas.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use doodlepad::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// let semi_transparent_blue = Color::new(0.0, 0.0, 1.0, 0.5);
/// assert_eq!(red.to_argb32(), 0xFFFF_0000);
/// assert!(semi_transparent_blue.a < 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components in the 0.0 - 1.0 range.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Returns true if the color contributes nothing when painted.
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Packs the color into a premultiplied ARGB32 word, matching the pixel
    /// layout of the canvas raster.
    pub fn to_argb32(&self) -> u32 {
        let a = self.a.clamp(0.0, 1.0);
        let channel = |v: f64| ((v.clamp(0.0, 1.0) * a * 255.0).round() as u32) & 0xFF;
        let alpha = ((a * 255.0).round() as u32) & 0xFF;
        (alpha << 24) | (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub(crate) fn apply(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

/// Predefined red color
pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Predefined green color
pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);

/// Predefined blue color
pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

/// Predefined yellow color
pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);

/// Predefined orange color
pub const ORANGE: Color = Color::new(1.0, 0.5, 0.0, 1.0);

/// Predefined pink/magenta color
pub const PINK: Color = Color::new(1.0, 0.0, 1.0, 1.0);

/// Predefined white color
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Predefined black color
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// Fully transparent color, used as the blank state of the recognition grid
pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
