// Value-owning RGBA texture with wrap-around addressing.
// The renderer only ever goes through `texel`/`sample`, never raw indices.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::Filter;

/// One RGBA pixel.
pub type Texel = [u8; 4];

/// CPU-side storage: 4 bytes per pixel (**RGBA**) in row-major order,
/// top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u8>,
}

/// Things that can go wrong when building a texture.
#[derive(Debug, Error)]
pub enum TextureError {
    /// File could not be opened or decoded.
    #[error("cannot load texture: {0}")]
    Image(#[from] image::ImageError),

    #[error("texture has zero size ({w}x{h})")]
    ZeroSize { w: usize, h: usize },

    /// Pixel buffer does not match `w * h * 4`.
    #[error("texture buffer holds {found} bytes, expected {expected}")]
    BadLength { expected: usize, found: usize },
}

/// Convenience checkerboard 64×64 (8-texel squares).
impl Default for Texture {
    fn default() -> Self {
        Self::checker(64, 8)
    }
}

impl Texture {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    pub fn from_rgba(w: usize, h: usize, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if w == 0 || h == 0 {
            return Err(TextureError::ZeroSize { w, h });
        }
        if pixels.len() != w * h * 4 {
            return Err(TextureError::BadLength {
                expected: w * h * 4,
                found: pixels.len(),
            });
        }
        Ok(Self { w, h, pixels })
    }

    /// Decode any image the `image` crate understands into RGBA8.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.to_rgba8();
        let (w, h) = (img.width() as usize, img.height() as usize);
        info!(path = %path.as_ref().display(), w, h, "loaded texture");
        Self::from_rgba(w, h, img.into_raw())
    }

    /// `size`×`size` two-tone checkerboard with `square`-texel squares.
    pub fn checker(size: usize, square: usize) -> Self {
        let size = size.max(1);
        let square = square.max(1);
        let mut pixels = Vec::with_capacity(size * size * 4);
        for y in 0..size {
            for x in 0..size {
                let px: Texel = if (x / square + y / square) & 1 == 0 {
                    [0x7F, 0x7F, 0xFF, 0xFF]
                } else {
                    [0xFF, 0x7F, 0x7F, 0xFF]
                };
                pixels.extend_from_slice(&px);
            }
        }
        Self {
            w: size,
            h: size,
            pixels,
        }
    }

    // ---------------------------------------------------------------------
    // Addressing
    // ---------------------------------------------------------------------

    /// Texel at integer coordinates; both axes wrap modulo the texture size,
    /// negative indices included.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> Texel {
        let tx = x.rem_euclid(self.w as i32) as usize;
        let ty = y.rem_euclid(self.h as i32) as usize;
        let i = (ty * self.w + tx) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Nearest texel to texel-space coordinates `(fx, fy)`.
    #[inline]
    pub fn sample_nearest(&self, fx: f32, fy: f32) -> Texel {
        self.texel(fx.floor() as i32, fy.floor() as i32)
    }

    /// Blend the four texels around `(fx, fy)` by their fractional offsets.
    /// On integer coordinates the weights collapse to 0/1 and the result is
    /// the nearest texel.
    pub fn sample_bilinear(&self, fx: f32, fy: f32) -> Texel {
        let x0 = fx.floor();
        let y0 = fy.floor();
        let ax = fx - x0;
        let ay = fy - y0;
        let (ix, iy) = (x0 as i32, y0 as i32);

        let t00 = self.texel(ix, iy);
        let t10 = self.texel(ix + 1, iy);
        let t01 = self.texel(ix, iy + 1);
        let t11 = self.texel(ix + 1, iy + 1);

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = t00[c] as f32 * (1.0 - ax) + t10[c] as f32 * ax;
            let bot = t01[c] as f32 * (1.0 - ax) + t11[c] as f32 * ax;
            out[c] = (top * (1.0 - ay) + bot * ay).round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// Sample at normalised `(u, v)`.
    ///
    /// Nearest maps `u * w` straight to a texel; bilinear shifts by half a
    /// texel so blend weights are measured from texel centres.
    #[inline]
    pub fn sample(&self, u: f32, v: f32, filter: Filter) -> Texel {
        let fx = u * self.w as f32;
        let fy = v * self.h as f32;
        match filter {
            Filter::Nearest => self.sample_nearest(fx, fy),
            Filter::Bilinear => self.sample_bilinear(fx - 0.5, fy - 0.5),
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    /// 2×2: red, green / blue, white.
    fn quad() -> Texture {
        Texture::from_rgba(
            2,
            2,
            vec![
                255, 0, 0, 255, 0, 255, 0, 255, //
                0, 0, 255, 255, 255, 255, 255, 255,
            ],
        )
        .unwrap()
    }

    fn gradient(w: usize, h: usize) -> Texture {
        let mut px = Vec::new();
        for y in 0..h {
            for x in 0..w {
                px.extend_from_slice(&[(x * 17) as u8, (y * 29) as u8, (x * y) as u8, 255]);
            }
        }
        Texture::from_rgba(w, h, px).unwrap()
    }

    #[test]
    fn wrap_addressing_is_periodic() {
        let tex = gradient(5, 3);
        for y in -4..4 {
            for x in -6..6 {
                for k in -3..=3 {
                    assert_eq!(tex.texel(x + k * 5, y), tex.texel(x, y));
                    assert_eq!(tex.texel(x, y + k * 3), tex.texel(x, y));
                }
            }
        }
    }

    #[test]
    fn negative_indices_wrap_not_clamp() {
        let tex = quad();
        assert_eq!(tex.texel(-1, 0), tex.texel(1, 0));
        assert_eq!(tex.texel(0, -1), tex.texel(0, 1));
        assert_eq!(tex.texel(2, 2), tex.texel(0, 0));
    }

    #[test]
    fn bilinear_on_integer_coords_is_nearest() {
        let tex = gradient(7, 4);
        for y in -2..6 {
            for x in -2..9 {
                let (fx, fy) = (x as f32, y as f32);
                let a = tex.sample_bilinear(fx, fy);
                let b = tex.sample_nearest(fx, fy);
                for c in 0..4 {
                    assert!((a[c] as i32 - b[c] as i32).abs() <= 1);
                }
            }
        }
    }

    #[test]
    fn bilinear_blends_halfway() {
        let tex = quad();
        // midway between red and green on the top row
        let px = tex.sample_bilinear(0.5, 0.0);
        assert_eq!(px, [128, 128, 0, 255]);
        // centre of the quad: average of all four
        let px = tex.sample_bilinear(0.5, 0.5);
        assert_eq!(px, [128, 128, 128, 255]);
    }

    #[test]
    fn bilinear_wraps_at_edges() {
        let tex = quad();
        // halfway between the last column and the wrapped first one
        assert_eq!(tex.sample_bilinear(1.5, 0.0), [128, 128, 0, 255]);
        assert_eq!(tex.sample_bilinear(-0.5, 0.0), [128, 128, 0, 255]);
    }

    #[test]
    fn normalised_nearest_sample() {
        let tex = quad();
        assert_eq!(tex.sample(0.0, 0.0, Filter::Nearest), [255, 0, 0, 255]);
        assert_eq!(tex.sample(0.75, 0.25, Filter::Nearest), [0, 255, 0, 255]);
        assert_eq!(tex.sample(0.25, 0.75, Filter::Nearest), [0, 0, 255, 255]);
    }

    #[test]
    fn normalised_bilinear_hits_texel_centres() {
        let tex = quad();
        // (0.25, 0.25) is the centre of texel (0,0)
        assert_eq!(tex.sample(0.25, 0.25, Filter::Bilinear), [255, 0, 0, 255]);
    }

    #[test]
    fn bad_buffers_rejected() {
        assert!(matches!(
            Texture::from_rgba(0, 4, vec![]),
            Err(TextureError::ZeroSize { w: 0, h: 4 })
        ));
        assert!(matches!(
            Texture::from_rgba(2, 2, vec![0; 15]),
            Err(TextureError::BadLength {
                expected: 16,
                found: 15
            })
        ));
    }

    #[test]
    fn default_is_checker() {
        let tex = Texture::default();
        assert_eq!((tex.w, tex.h), (64, 64));
        assert_ne!(tex.texel(0, 0), tex.texel(8, 0));
        assert_eq!(tex.texel(0, 0), tex.texel(8, 8));
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Texture::from_file(dir.path().join("none.png")).is_err());
    }
}
