use crate::error::MathError;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    #[inline]
    pub fn right() -> Vec3 {
        Vec3::new(1., 0., 0.)
    }

    #[inline]
    pub fn up() -> Vec3 {
        Vec3::new(0., 1., 0.)
    }

    #[inline]
    pub fn fwd() -> Vec3 {
        Vec3::new(0., 0., 1.)
    }

    #[inline]
    pub fn zero() -> Vec3 {
        Vec3::new(0., 0., 0.)
    }

    #[inline]
    pub fn one() -> Vec3 {
        Vec3::new(1., 1., 1.)
    }

    /// Scale to unit length. A zero-length or non-finite vector has no
    /// direction and is rejected rather than divided through.
    pub fn norm(self) -> Result<Vec3, MathError> {
        // Divide by the largest component first so the squares can't overflow
        let largest = self.x.abs().max(self.y.abs()).max(self.z.abs());
        let finite = self.x.is_finite() && self.y.is_finite() && self.z.is_finite();

        if largest == 0.0 || !finite {
            return Err(MathError::DegenerateVector);
        }

        let scaled = self / largest;
        Ok(scaled / scaled.mag())
    }

    pub fn mag_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn mag(self) -> f32 {
        self.mag_squared().sqrt()
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }
}

// Drops w; no perspective divide
impl From<Vec4> for Vec3 {
    fn from(vec: Vec4) -> Vec3 {
        Vec3::new(vec.x, vec.y, vec.z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
        )
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
        )
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, scalar: f32) -> Vec3 {
        Vec3::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
        )
    }
}

impl std::ops::Div<f32> for Vec3 {
    type Output = Vec3;

    fn div(self, scalar: f32) -> Vec3 {
        Vec3::new(
            self.x / scalar,
            self.y / scalar,
            self.z / scalar,
        )
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, out: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            out,
            "( {}, {}, {} )",
            self.x, self.y, self.z,
        )
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[repr(C)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
        Vec4 { x, y, z, w }
    }

    #[inline]
    pub fn point(position: Vec3) -> Vec4 {
        position.extend(1.)
    }

    fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    fn from_array(array: [f32; 4]) -> Vec4 {
        Vec4::new(array[0], array[1], array[2], array[3])
    }
}

// Row vector: v * M
impl std::ops::Mul<Mat4> for Vec4 {
    type Output = Vec4;

    fn mul(self, m: Mat4) -> Vec4 {
        let v = self.to_array();
        let mut out = [0f32; 4];

        for (i, entry) in out.iter_mut().enumerate() {
            *entry = v[0] * m.f[4 * i]
                + v[1] * m.f[4 * i + 1]
                + v[2] * m.f[4 * i + 2]
                + v[3] * m.f[4 * i + 3];
        }

        Vec4::from_array(out)
    }
}

impl std::fmt::Display for Vec4 {
    fn fmt(&self, out: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            out,
            "( {}, {}, {}, {} )",
            self.x, self.y, self.z, self.w,
        )
    }
}

/// 4x4 matrix of 16 floats, column-major: `f[4 * col + row]`.
///
/// The default matrix is all zeros, not the identity.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[repr(C)]
pub struct Mat4 {
    f: [f32; 16],
}

impl Mat4 {
    /// Wrap 16 floats already in column-major order
    pub fn new(f: [f32; 16]) -> Mat4 {
        Mat4 { f }
    }

    pub fn from_slice(values: &[f32]) -> Option<Mat4> {
        if values.len() != 16 {
            return None;
        }

        let mut f = [0f32; 16];
        f.copy_from_slice(values);

        Some(Mat4 { f })
    }

    /*
     * GLSL expects matrices in column-major order
     * Arguments below are formatted in row-major order
     */

    pub fn from_rows(
        x0: f32, x1: f32, x2: f32, x3: f32,
        y0: f32, y1: f32, y2: f32, y3: f32,
        z0: f32, z1: f32, z2: f32, z3: f32,
        w0: f32, w1: f32, w2: f32, w3: f32,
    ) -> Mat4 {
        Mat4::new([
            x0, y0, z0, w0,
            x1, y1, z1, w1,
            x2, y2, z2, w2,
            x3, y3, z3, w3,
        ])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.f[4 * col + row]
    }

    /// Contiguous column-major data, ready for uniform upload
    #[inline]
    pub fn as_slice(&self) -> &[f32; 16] {
        &self.f
    }

    #[inline]
    pub fn as_ptr(&self) -> *const f32 {
        self.f.as_ptr()
    }

    #[inline]
    pub fn identity() -> Mat4 {
        Mat4::from_rows(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_rows(
            1.0, 0.0, 0.0,   x,
            0.0, 1.0, 0.0,   y,
            0.0, 0.0, 1.0,   z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn translation_vec(translation: Vec3) -> Mat4 {
        Mat4::translation(translation.x, translation.y, translation.z)
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_rows(
              x, 0.0, 0.0, 0.0,
            0.0,   y, 0.0, 0.0,
            0.0, 0.0,   z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn scale_vec(scale: Vec3) -> Mat4 {
        Mat4::scale(scale.x, scale.y, scale.z)
    }

    /// Rotation of `deg` degrees about an arbitrary axis.
    ///
    /// Exact unit x, y and z axes take dedicated branches; any other axis
    /// is normalized (unless already of length exactly one) and fed to the
    /// Rodrigues form. A zero axis yields the identity.
    pub fn rotation(deg: f32, x: f32, y: f32, z: f32) -> Mat4 {
        let mut ret = Mat4::default();
        ret.f[15] = 1.0;

        let rad = deg.to_radians();
        let (c, s) = (rad.cos(), rad.sin());

        if x == 1.0 && y == 0.0 && z == 0.0 {
            ret.f[0] = 1.0;
            ret.f[5] = c;
            ret.f[10] = c;
            ret.f[6] = s;
            ret.f[9] = -s;
        } else if x == 0.0 && y == 1.0 && z == 0.0 {
            ret.f[5] = 1.0;
            ret.f[0] = c;
            ret.f[10] = c;
            ret.f[8] = s;
            ret.f[2] = -s;
        } else if x == 0.0 && y == 0.0 && z == 1.0 {
            ret.f[10] = 1.0;
            ret.f[0] = c;
            ret.f[5] = c;
            ret.f[1] = s;
            ret.f[4] = -s;
        } else {
            let len = (x * x + y * y + z * z).sqrt();

            if len == 0.0 {
                return Mat4::identity();
            }

            let (x, y, z) = if len != 1.0 {
                let inverse_len = 1.0 / len;
                (x * inverse_len, y * inverse_len, z * inverse_len)
            } else {
                (x, y, z)
            };

            let nc = 1.0 - c;
            let (xy, yz, zx) = (x * y, y * z, z * x);
            let (xs, ys, zs) = (x * s, y * s, z * s);

            ret.f[0] = x * x * nc + c;
            ret.f[4] = xy * nc - zs;
            ret.f[8] = zx * nc + ys;

            ret.f[1] = xy * nc + zs;
            ret.f[5] = y * y * nc + c;
            ret.f[9] = yz * nc - xs;

            ret.f[2] = zx * nc - ys;
            ret.f[6] = yz * nc + xs;
            ret.f[10] = z * z * nc + c;
        }

        ret
    }

    // Note: the axis-aligned constructors take radians, unlike rotation()

    pub fn rotation_x(rad: f32) -> Mat4 {
        let (c, s) = (rad.cos(), rad.sin());

        Mat4::from_rows(
            1.0, 0.0, 0.0, 0.0,
            0.0,   c,   s, 0.0,
            0.0,  -s,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_y(rad: f32) -> Mat4 {
        let (c, s) = (rad.cos(), rad.sin());

        Mat4::from_rows(
              c, 0.0,  -s, 0.0,
            0.0, 1.0, 0.0, 0.0,
              s, 0.0,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_z(rad: f32) -> Mat4 {
        let (c, s) = (rad.cos(), rad.sin());

        Mat4::from_rows(
              c,   s, 0.0, 0.0,
             -s,   c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Projection for an asymmetric frustum
    pub fn perspective_frustum(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Mat4 {
        let width = 1.0 / (right - left);
        let height = 1.0 / (top - bottom);
        let depth = 1.0 / (near - far);

        let x = 2.0 * (near * width);
        let y = 2.0 * (near * height);
        let a = 2.0 * ((right + left) * width);
        let b = (top + bottom) * height;
        let c = (far + near) * depth;
        let d = 2.0 * (far * near * depth);

        Mat4::from_rows(
              x, 0.0,    a, 0.0,
            0.0,   y,    b, 0.0,
            0.0, 0.0,    c,   d,
            0.0, 0.0, -1.0, 0.0,
        )
    }

    /// Symmetric projection from near-plane extents
    pub fn perspective(width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        let n2 = 2.0 * near;
        let rcpnmf = 1.0 / (near - far);

        Mat4::from_rows(
            n2 / width,          0.0,                    0.0,                 0.0,
                   0.0, n2 / height,                    0.0,                 0.0,
                   0.0,          0.0, (far + near) * rcpnmf, far * rcpnmf * n2,
                   0.0,          0.0,                   -1.0,                 0.0,
        )
    }

    /// View matrix looking from `eye` toward `at`
    pub fn look_at(eye: Vec3, at: Vec3, up: Vec3) -> Result<Mat4, MathError> {
        let forward = (eye - at).norm()?;
        let side = up.norm()?.cross(forward);
        let up = forward.cross(side);

        let mut result = Mat4::from_rows(
               side.x,    side.y,    side.z, 0.0,
                 up.x,      up.y,      up.z, 0.0,
            forward.x, forward.y, forward.z, 0.0,
                  0.0,       0.0,       0.0, 1.0,
        );

        result.post_translate(-eye.x, -eye.y, -eye.z);
        Ok(result)
    }

    /// Right-multiply by a translation, in place
    pub fn post_translate(&mut self, x: f32, y: f32, z: f32) -> &mut Mat4 {
        for row in 0..4 {
            self.f[12 + row] += x * self.f[row]
                + y * self.f[4 + row]
                + z * self.f[8 + row];
        }

        self
    }

    pub fn transpose(self) -> Mat4 {
        let mut ret = Mat4::default();

        for col in 0..4 {
            for row in 0..4 {
                ret.f[4 * row + col] = self.f[4 * col + row];
            }
        }

        ret
    }

    /// Inverse of an affine transform (bottom row 0, 0, 0, 1).
    ///
    /// Only the upper 3x3 block is inverted; the translation is carried
    /// through as `-C * inverse(A)`. The result is meaningless for
    /// projective matrices.
    pub fn inverse(&self) -> Result<Mat4, MathError> {
        let f = &self.f;

        // Accumulate signed triple products separately
        let mut pos = 0f32;
        let mut neg = 0f32;

        for term in [
             f[0] * f[5] * f[10],
             f[4] * f[9] * f[2],
             f[8] * f[1] * f[6],
            -f[8] * f[5] * f[2],
            -f[4] * f[1] * f[10],
            -f[0] * f[9] * f[6],
        ] {
            if term >= 0.0 {
                pos += term;
            } else {
                neg += term;
            }
        }

        let det = pos + neg;

        if det == 0.0 {
            return Err(MathError::SingularMatrix);
        }

        let det_1 = 1.0 / det;
        let mut ret = Mat4::default();

        ret.f[0] =  (f[5] * f[10] - f[9] * f[6]) * det_1;
        ret.f[1] = -(f[1] * f[10] - f[9] * f[2]) * det_1;
        ret.f[2] =  (f[1] * f[6]  - f[5] * f[2]) * det_1;
        ret.f[4] = -(f[4] * f[10] - f[8] * f[6]) * det_1;
        ret.f[5] =  (f[0] * f[10] - f[8] * f[2]) * det_1;
        ret.f[6] = -(f[0] * f[6]  - f[4] * f[2]) * det_1;
        ret.f[8] =  (f[4] * f[9]  - f[8] * f[5]) * det_1;
        ret.f[9] = -(f[0] * f[9]  - f[8] * f[1]) * det_1;
        ret.f[10] = (f[0] * f[5]  - f[4] * f[1]) * det_1;

        ret.f[12] = -(f[12] * ret.f[0] + f[13] * ret.f[4] + f[14] * ret.f[8]);
        ret.f[13] = -(f[12] * ret.f[1] + f[13] * ret.f[5] + f[14] * ret.f[9]);
        ret.f[14] = -(f[12] * ret.f[2] + f[13] * ret.f[6] + f[14] * ret.f[10]);

        ret.f[15] = 1.0;

        Ok(ret)
    }

    /// In-place form of `inverse()`; leaves the matrix untouched on failure
    pub fn invert(&mut self) -> Result<(), MathError> {
        *self = self.inverse()?;
        Ok(())
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Mat4;

    // Naive matrix multiply
    fn mul(self, m: Mat4) -> Mat4 {
        let mut ret = Mat4::default();

        for col in 0..4 {
            for row in 0..4 {
                ret.f[4 * col + row] = self.f[row] * m.f[4 * col]
                    + self.f[4 + row] * m.f[4 * col + 1]
                    + self.f[8 + row] * m.f[4 * col + 2]
                    + self.f[12 + row] * m.f[4 * col + 3];
            }
        }

        ret
    }
}

impl std::ops::MulAssign for Mat4 {
    fn mul_assign(&mut self, m: Mat4) {
        *self = *self * m;
    }
}

impl std::ops::Add for Mat4 {
    type Output = Mat4;

    fn add(self, m: Mat4) -> Mat4 {
        let mut ret = self;

        for (entry, other) in ret.f.iter_mut().zip(m.f.iter()) {
            *entry += other;
        }

        ret
    }
}

// Column vector: M * v
impl std::ops::Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, vec: Vec4) -> Vec4 {
        let v = vec.to_array();
        let mut out = [0f32; 4];

        for (row, entry) in out.iter_mut().enumerate() {
            *entry = v[0] * self.f[row]
                + v[1] * self.f[4 + row]
                + v[2] * self.f[8 + row]
                + v[3] * self.f[12 + row];
        }

        Vec4::from_array(out)
    }
}

impl std::fmt::Display for Mat4 {
    fn fmt(&self, out: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in 0..4 {
            if row > 0 {
                writeln!(out)?;
            }

            write!(
                out,
                "[ {}, {}, {}, {} ]",
                self.get(row, 0),
                self.get(row, 1),
                self.get(row, 2),
                self.get(row, 3),
            )?;
        }

        Ok(())
    }
}
