use rand::Rng;
use serde::{Deserialize, Serialize};

/// Degrees of latitude per meter. Holds for longitude only at the equator; elsewhere it
/// has to be divided by the cosine of the latitude.
pub const DEGREES_PER_METER: f64 = 1.0 / 111_111.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_meters: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64, altitude_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_meters,
        }
    }

    /// `GPSLatitudeRef`: zero counts as north.
    pub fn latitude_ref(&self) -> &'static str {
        if self.latitude < 0.0 { "S" } else { "N" }
    }

    /// `GPSLongitudeRef`: zero counts as east.
    pub fn longitude_ref(&self) -> &'static str {
        if self.longitude < 0.0 { "W" } else { "E" }
    }

    /// `GPSAltitudeRef`: 0 above sea level, 1 below.
    pub fn altitude_ref(&self) -> u8 {
        u8::from(self.altitude_meters < 0.0)
    }
}

/// Degrees of longitude per meter for a given `cos(latitude)`. At a pole, where the
/// meridians meet, the latitude scale is used instead of dividing by zero.
pub fn longitude_degrees_per_meter(cos_latitude: f64) -> f64 {
    if cos_latitude == 0.0 {
        DEGREES_PER_METER
    } else {
        DEGREES_PER_METER / cos_latitude
    }
}

/// A uniform draw from [-1, 1).
fn unit_offset<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.random::<f64>() - 0.5) * 2.0
}

/// Moves `origin` by up to `radius_meters` along each axis.
///
/// The latitude offset is drawn first and the longitude scale is taken at the *new*
/// latitude, so the east-west distance stays metrically correct there. The two offsets
/// are independent draws, which makes the reachable area a box rather than a disc.
/// The result is not clamped, so origins within `radius_meters` of a pole or of the
/// antimeridian can leave the [-90, 90] / [-180, 180] ranges.
pub fn fuzz_coordinate<R: Rng + ?Sized>(
    origin: &GeoCoordinate,
    radius_meters: f64,
    rng: &mut R,
) -> GeoCoordinate {
    let latitude = origin.latitude + unit_offset(rng) * radius_meters * DEGREES_PER_METER;
    let cos_latitude = latitude.to_radians().cos();
    let longitude = origin.longitude
        + unit_offset(rng) * radius_meters * longitude_degrees_per_meter(cos_latitude);

    GeoCoordinate {
        latitude,
        longitude,
        altitude_meters: origin.altitude_meters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Always yields the same word, pinning `unit_offset` to one end of its range.
    struct ConstRng(u64);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (i, byte) in dst.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 8];
            }
        }
    }

    #[test]
    fn test_zero_radius_returns_origin_exactly() {
        let origin = GeoCoordinate::new(16.8, 96.15, 20.0);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(fuzz_coordinate(&origin, 0.0, &mut rng), origin);
    }

    #[test]
    fn test_offsets_stay_inside_radius_box() {
        let origins = [
            GeoCoordinate::new(16.8, 96.15, 20.0),
            GeoCoordinate::new(-33.86, 151.21, 58.0),
            GeoCoordinate::new(64.13, -21.9, -3.5),
            GeoCoordinate::new(0.0, 0.0, 0.0),
        ];
        let radius = 250.0;

        for (i, origin) in origins.iter().enumerate() {
            for seed in 0..200u64 {
                let mut rng = StdRng::seed_from_u64(seed * 31 + i as u64);
                let fuzzed = fuzz_coordinate(origin, radius, &mut rng);

                let max_lat = radius * DEGREES_PER_METER;
                let max_lon =
                    radius * longitude_degrees_per_meter(fuzzed.latitude.to_radians().cos()).abs();
                assert!((fuzzed.latitude - origin.latitude).abs() <= max_lat + 1e-12);
                assert!((fuzzed.longitude - origin.longitude).abs() <= max_lon + 1e-12);
                assert_eq!(fuzzed.altitude_meters, origin.altitude_meters);
            }
        }
    }

    #[test]
    fn test_longitude_offset_grows_with_latitude() {
        // Both draws pinned to the top of the range.
        let mut rng = ConstRng(u64::MAX);
        let equator = fuzz_coordinate(&GeoCoordinate::new(0.0, 10.0, 0.0), 1000.0, &mut rng);
        let mut rng = ConstRng(u64::MAX);
        let north = fuzz_coordinate(&GeoCoordinate::new(60.0, 10.0, 0.0), 1000.0, &mut rng);

        let equator_shift = equator.longitude - 10.0;
        let north_shift = north.longitude - 10.0;
        // cos(60°) = 0.5, so roughly twice the degrees for the same distance.
        assert!((north_shift / equator_shift - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_pole_falls_back_to_latitude_scale() {
        assert_eq!(longitude_degrees_per_meter(0.0), DEGREES_PER_METER);
        assert_eq!(longitude_degrees_per_meter(0.5), DEGREES_PER_METER * 2.0);
    }

    #[test]
    fn test_result_is_not_clamped_near_pole() {
        let origin = GeoCoordinate::new(89.9999, 0.0, 0.0);
        let mut rng = ConstRng(u64::MAX);
        let fuzzed = fuzz_coordinate(&origin, 1000.0, &mut rng);
        assert!(fuzzed.latitude > 90.0, "latitude {} was clamped", fuzzed.latitude);
    }

    #[test]
    fn test_result_is_not_wrapped_at_antimeridian() {
        let origin = GeoCoordinate::new(0.0, 179.9999, 0.0);
        let mut rng = ConstRng(u64::MAX);
        let fuzzed = fuzz_coordinate(&origin, 1000.0, &mut rng);
        assert!(fuzzed.longitude > 180.0, "longitude {} was wrapped", fuzzed.longitude);

        let origin = GeoCoordinate::new(0.0, -179.9999, 0.0);
        let mut rng = ConstRng(0);
        let fuzzed = fuzz_coordinate(&origin, 1000.0, &mut rng);
        assert!(fuzzed.longitude < -180.0);
    }

    #[test]
    fn test_hemisphere_refs() {
        let ne = GeoCoordinate::new(16.8, 96.15, 20.0);
        assert_eq!((ne.latitude_ref(), ne.longitude_ref(), ne.altitude_ref()), ("N", "E", 0));

        let sw = GeoCoordinate::new(-33.0, -70.6, -12.0);
        assert_eq!((sw.latitude_ref(), sw.longitude_ref(), sw.altitude_ref()), ("S", "W", 1));

        let zero = GeoCoordinate::new(0.0, 0.0, 0.0);
        assert_eq!(
            (zero.latitude_ref(), zero.longitude_ref(), zero.altitude_ref()),
            ("N", "E", 0)
        );
    }
}
