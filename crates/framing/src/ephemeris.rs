use foundation::math::{LatLng, wrap_lng};
use foundation::time::Time;

/// Source of the sun's position for lighting the preview.
pub trait SunEphemeris {
    /// Point on Earth where the sun is at the zenith at `at`.
    fn subsolar_point(&self, at: Time) -> LatLng;
}

/// Low-cost solar position model (about 0.01 degree accuracy over 1950–2050),
/// plenty for a lighting cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionSun;

impl SunEphemeris for LowPrecisionSun {
    fn subsolar_point(&self, at: Time) -> LatLng {
        let jd = at.julian_day();
        let n = jd - 2_451_545.0; // days since J2000

        // Mean longitude and anomaly (degrees)
        let l = wrap_360(280.46 + 0.985_647_4 * n);
        let g = wrap_360(357.528 + 0.985_600_3 * n);

        // Ecliptic longitude and obliquity (degrees)
        let lambda =
            wrap_360(l + 1.915 * g.to_radians().sin() + 0.020 * (2.0 * g).to_radians().sin());
        let epsilon = 23.439 - 0.000_000_4 * n;

        let lambda_rad = lambda.to_radians();
        let eps_rad = epsilon.to_radians();
        let alpha = (eps_rad.cos() * lambda_rad.sin())
            .atan2(lambda_rad.cos())
            .to_degrees();
        let delta = (eps_rad.sin() * lambda_rad.sin()).asin().to_degrees();

        // Greenwich mean sidereal time (degrees)
        let t = n / 36_525.0;
        let gmst = wrap_360(
            280.460_618_37 + 360.985_647_366_29 * n + 0.000_387_933 * t * t
                - (t * t * t) / 38_710_000.0,
        );

        LatLng::new(delta, wrap_lng(alpha - gmst))
    }
}

fn wrap_360(d: f64) -> f64 {
    d.rem_euclid(360.0)
}
