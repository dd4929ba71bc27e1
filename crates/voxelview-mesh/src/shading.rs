//! Flat per-direction face shading.
//!
//! Faces are not lit. Each direction gets a constant HSL lightness instead,
//! brightest on top and darkest underneath, which reads as a fixed overhead
//! light.

use voxelview_voxel::Direction;

/// Colour parameters for the six face directions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceShading {
    /// Hue in turns, `[0, 1)`.
    pub hue: f32,
    /// Saturation, `[0, 1]`.
    pub saturation: f32,
    /// HSL lightness per direction, indexed by [`Direction::index`].
    pub shades: [f32; 6],
}

impl Default for FaceShading {
    fn default() -> Self {
        Self {
            hue: 0.35,
            saturation: 0.5,
            //       -X    +X   -Y   +Y   -Z   +Z
            shades: [0.45, 0.5, 0.35, 0.7, 0.4, 0.55],
        }
    }
}

impl FaceShading {
    /// Lightness applied to faces pointing in `direction`.
    #[inline]
    pub const fn shade(&self, direction: Direction) -> f32 {
        self.shades[direction.index()]
    }

    /// RGB colour for faces pointing in `direction`.
    pub fn color(&self, direction: Direction) -> [f32; 3] {
        hsl_to_rgb(self.hue, self.saturation, self.shade(direction))
    }

    /// Colours for all directions, indexed by [`Direction::index`].
    pub fn palette(&self) -> [[f32; 3]; 6] {
        Direction::ALL.map(|direction| self.color(direction))
    }
}

/// Convert HSL (all components in `[0, 1]`) to linear RGB.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l; 3];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn luminance([r, g, b]: [f32; 3]) -> f32 {
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    #[test]
    fn grey_without_saturation() {
        assert_eq!(hsl_to_rgb(0.7, 0.0, 0.25), [0.25; 3]);
    }

    #[test]
    fn primary_hues() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert_relative_eq!(red[0], 1.0);
        assert_relative_eq!(red[1], 0.0);
        assert_relative_eq!(red[2], 0.0);

        let green = hsl_to_rgb(1.0 / 3.0, 1.0, 0.5);
        assert_relative_eq!(green[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(green[1], 1.0);
        assert_relative_eq!(green[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn default_top_is_brightest_bottom_darkest() {
        let shading = FaceShading::default();
        let top = shading.shade(Direction::PosY);
        let bottom = shading.shade(Direction::NegY);
        for direction in [Direction::NegX, Direction::PosX, Direction::NegZ, Direction::PosZ] {
            assert!(shading.shade(direction) < top);
            assert!(shading.shade(direction) > bottom);
        }
        assert!(luminance(shading.color(Direction::PosY)) > luminance(shading.color(Direction::NegY)));
    }

    #[test]
    fn default_palette_is_green() {
        let [r, g, b] = FaceShading::default().color(Direction::PosY);
        assert!(g > r && g > b);
    }
}
