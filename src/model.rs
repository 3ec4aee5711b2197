//! Blur model
//!
//! Pure functions mapping per-eye refractive error (in diopters) to a blur
//! radius in pixels. The power law and the interocular weighting were tuned
//! by eye; no physical lens model is involved.

/// Base scale of the diopter-to-pixel power law.
const BLUR_BASE: f32 = 1.4;
/// Exponent of the power law. Superlinear, so stronger prescriptions blur
/// disproportionately more.
const BLUR_EXPONENT: f32 = 1.1;

/// Weight of the dominant eye when combining the two defocus magnitudes.
const DOMINANT_WEIGHT: f32 = 0.65;
/// Weight of the partially suppressed non-dominant eye.
const NON_DOMINANT_WEIGHT: f32 = 0.35;

/// Which eye the viewer sights with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Default for Eye {
    fn default() -> Self {
        Self::Left
    }
}

/// Refractive error magnitudes for one eye, in diopters (always >= 0; the
/// sliders are bounded and the sign convention lives in the display layer).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EyePrescription {
    /// Spherical error (myopia/hyperopia).
    pub sphere: f32,
    /// Cylindrical error (astigmatism).
    pub cylinder: f32,
}

/// Everything the render step needs to compute a blur radius. One value of
/// this struct fully determines the output - there is no hidden state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimParams {
    pub left: EyePrescription,
    pub right: EyePrescription,
    pub dominant: Eye,
}

/// Blur radius in pixels for a single eye's defocus magnitude.
pub fn monocular_blur(diopters: f32) -> f32 {
    if diopters == 0.0 {
        0.0
    } else {
        BLUR_BASE * diopters.powf(BLUR_EXPONENT)
    }
}

/// Combined blur radius for both eyes.
///
/// The non-dominant eye's defocus is partially suppressed by the visual
/// system, so the two magnitudes are mixed 65/35 in favor of the dominant
/// eye before the power law is applied.
pub fn binocular_blur(left: f32, right: f32, dominant: Eye) -> f32 {
    let (dominant_d, other_d) = match dominant {
        Eye::Left => (left, right),
        Eye::Right => (right, left),
    };
    monocular_blur(dominant_d * DOMINANT_WEIGHT + other_d * NON_DOMINANT_WEIGHT)
}

impl SimParams {
    /// Blur radius in pixels for the current prescription pair.
    ///
    /// Astigmatism is folded in as `sphere_blur + cylinder_blur * 0.5`.
    /// That blend is a visual approximation, not optics: a
    /// uniform filter cannot reproduce directional defocus, so the cylinder
    /// component only contributes extra overall softness.
    pub fn blur_radius(&self) -> f32 {
        let sphere = binocular_blur(self.left.sphere, self.right.sphere, self.dominant);
        let cylinder = binocular_blur(self.left.cylinder, self.right.cylinder, self.dominant);
        sphere + cylinder * 0.5
    }
}

/// Prescription readout. The sliders store magnitudes; optometry convention
/// shows myopic corrections as negative, so `3.0` renders as `-3.00` and
/// zero stays `0.00`.
pub fn format_diopters(magnitude: f32) -> String {
    if magnitude == 0.0 {
        "0.00".to_string()
    } else {
        format!("-{magnitude:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-2;

    #[test]
    fn test_monocular_zero() {
        assert_eq!(monocular_blur(0.0), 0.0);
    }

    #[test]
    fn test_monocular_strictly_increasing() {
        let samples = [0.1, 0.5, 1.0, 2.0, 3.5, 5.0, 7.5, 10.0];
        let mut prev = 0.0;
        for d in samples {
            let blur = monocular_blur(d);
            assert!(blur > prev, "blur({d}) = {blur} should exceed {prev}");
            prev = blur;
        }
    }

    #[test]
    fn test_binocular_zero_any_dominance() {
        assert_eq!(binocular_blur(0.0, 0.0, Eye::Left), 0.0);
        assert_eq!(binocular_blur(0.0, 0.0, Eye::Right), 0.0);
    }

    #[test]
    fn test_binocular_dominance_swap_symmetry() {
        let pairs = [(0.0, 0.0), (1.0, 2.5), (3.0, 0.0), (4.2, 4.2), (10.0, 0.5)];
        for (l, r) in pairs {
            assert_eq!(
                binocular_blur(l, r, Eye::Left),
                binocular_blur(r, l, Eye::Right),
            );
        }
    }

    #[test]
    fn test_dominant_eye_weighted_heavier() {
        // left=3.0, right=0, dominant left: weighted = 3.0 * 0.65 = 1.95
        let blur = binocular_blur(3.0, 0.0, Eye::Left);
        assert!((blur - monocular_blur(1.95)).abs() < 1e-6);
        // 1.4 * 1.95^1.1 ~= 2.92 px
        assert!((blur - 2.92).abs() < EPS, "got {blur}");
    }

    #[test]
    fn test_non_dominant_eye_suppressed() {
        // left=0, right=3.0, dominant left: weighted = 3.0 * 0.35 = 1.05
        let blur = binocular_blur(0.0, 3.0, Eye::Left);
        assert!((blur - monocular_blur(1.05)).abs() < 1e-6);
        // 1.4 * 1.05^1.1 ~= 1.48 px
        assert!((blur - 1.48).abs() < EPS, "got {blur}");
    }

    #[test]
    fn test_blur_radius_idempotent() {
        let params = SimParams {
            left: EyePrescription { sphere: 2.25, cylinder: 0.0 },
            right: EyePrescription { sphere: 1.75, cylinder: 0.5 },
            dominant: Eye::Right,
        };
        let first = params.blur_radius();
        for _ in 0..100 {
            assert_eq!(params.blur_radius(), first);
        }
    }

    #[test]
    fn test_zero_cylinder_matches_plain_binocular() {
        let params = SimParams {
            left: EyePrescription { sphere: 3.0, cylinder: 0.0 },
            right: EyePrescription { sphere: 1.0, cylinder: 0.0 },
            dominant: Eye::Left,
        };
        assert_eq!(
            params.blur_radius(),
            binocular_blur(3.0, 1.0, Eye::Left),
        );
    }

    #[test]
    fn test_cylinder_adds_half_blur() {
        let base = SimParams {
            left: EyePrescription { sphere: 2.0, cylinder: 0.0 },
            right: EyePrescription { sphere: 2.0, cylinder: 0.0 },
            dominant: Eye::Left,
        };
        let mut astig = base;
        astig.left.cylinder = 1.5;
        astig.right.cylinder = 1.5;

        let expected = base.blur_radius() + binocular_blur(1.5, 1.5, Eye::Left) * 0.5;
        assert!((astig.blur_radius() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_format_diopters() {
        assert_eq!(format_diopters(0.0), "0.00");
        assert_eq!(format_diopters(3.0), "-3.00");
        assert_eq!(format_diopters(0.25), "-0.25");
        assert_eq!(format_diopters(10.0), "-10.00");
    }
}
