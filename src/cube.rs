//! Static mesh data for the spinning cube

use crate::graphics::{Color, Palette};

pub const COORDS_PER_VERTEX: usize = 3;
pub const VERTEX_STRIDE: usize = COORDS_PER_VERTEX * 4; // Bytes

pub const COORDS_PER_COLOR: usize = 4;
pub const COLOR_STRIDE: usize = COORDS_PER_COLOR * 4; // Bytes

pub const VERTEX_COUNT: usize = 8;
pub const INDEX_COUNT: usize = 36;

#[rustfmt::skip]
pub const VERTICES: [f32; VERTEX_COUNT * COORDS_PER_VERTEX] = [
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,
    -1.0,  1.0,  1.0,
];

// Counter-clockwise, facing outward
#[rustfmt::skip]
pub const INDICES: [u16; INDEX_COUNT] = [
    4, 5, 6,  4, 6, 7, // +z
    1, 0, 3,  1, 3, 2, // -z
    5, 1, 2,  5, 2, 6, // +x
    0, 4, 7,  0, 7, 3, // -x
    7, 6, 2,  7, 2, 3, // +y
    0, 1, 5,  0, 5, 4, // -y
];

const LOCAL_COLORS: [Color; VERTEX_COUNT] = [
    Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 },
    Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 },
    Color { r: 1.0, g: 1.0, b: 0.0, a: 1.0 },
    Color { r: 0.0, g: 1.0, b: 0.0, a: 1.0 },
    Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 },
    Color { r: 1.0, g: 0.0, b: 1.0, a: 1.0 },
    Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 },
    Color { r: 0.0, g: 1.0, b: 1.0, a: 1.0 },
];

const REMOTE_COLORS: [Color; VERTEX_COUNT] = [
    Color { r: 1.0, g: 0.5, b: 0.0, a: 1.0 },
    Color { r: 1.0, g: 0.5, b: 0.0, a: 1.0 },
    Color { r: 0.2, g: 0.6, b: 1.0, a: 1.0 },
    Color { r: 0.2, g: 0.6, b: 1.0, a: 1.0 },
    Color { r: 1.0, g: 0.5, b: 0.0, a: 1.0 },
    Color { r: 1.0, g: 0.5, b: 0.0, a: 1.0 },
    Color { r: 0.2, g: 0.6, b: 1.0, a: 1.0 },
    Color { r: 0.2, g: 0.6, b: 1.0, a: 1.0 },
];

impl Palette {
    pub fn colors(self) -> &'static [Color; VERTEX_COUNT] {
        match self {
            Palette::Local => &LOCAL_COLORS,
            Palette::Remote => &REMOTE_COLORS,
        }
    }
}

/// Coordinates of the corner at `index`, or None past the last corner
pub fn position(index: u16) -> Option<[f32; COORDS_PER_VERTEX]> {
    let i = index as usize * COORDS_PER_VERTEX;

    match VERTICES.get(i..i + COORDS_PER_VERTEX)? {
        &[x, y, z] => Some([x, y, z]),
        _ => None,
    }
}
