#[derive(Clone, Copy, PartialEq, Debug)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color {
            r,
            g,
            b,
            a,
        }
    }

    #[inline]
    pub fn opaque(r: f32, g: f32, b: f32) -> Color {
        Color::new(r, g, b, 1.)
    }

    #[inline]
    pub fn grey() -> Color {
        Color::opaque(0.5, 0.5, 0.5)
    }

    #[inline]
    pub fn red() -> Color {
        Color::opaque(1., 0., 0.)
    }

    #[inline]
    pub fn green() -> Color {
        Color::opaque(0., 1., 0.)
    }

    #[inline]
    pub fn blue() -> Color {
        Color::opaque(0., 0., 1.)
    }
}

impl Default for Color {
    fn default() -> Color {
        Color::grey()
    }
}

/// Vertex color set used for a render pass
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Palette {
    /// Shown on the device
    Local,
    /// Mirrored to the cast display
    Remote,
}
