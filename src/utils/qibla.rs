/// Coordinates of the Kaaba in Makkah.
pub const KAABA_LATITUDE: f64 = 21.4225;
pub const KAABA_LONGITUDE: f64 = 39.8262;

/// Initial great-circle bearing from (latitude, longitude) to the
/// Kaaba, in degrees clockwise from true north, normalized to [0, 360).
pub fn qibla_bearing(latitude: f64, longitude: f64) -> f64 {
    let lat1 = latitude.to_radians();
    let lat2 = KAABA_LATITUDE.to_radians();
    let delta_lng = (KAABA_LONGITUDE - longitude).to_radians();

    let y = delta_lng.sin();
    let x = lat1.cos() * lat2.tan() - lat1.sin() * delta_lng.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Nearest eight-wind compass point for a bearing.
pub fn compass_point(bearing: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let normalized = bearing.rem_euclid(360.0);
    POINTS[((normalized + 22.5) / 45.0) as usize % 8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_city_bearings() {
        // Kolkata
        assert!((qibla_bearing(22.5726, 88.3639) - 278.6).abs() < 1.0);
        // Islamabad
        assert!((qibla_bearing(33.6938, 73.0651) - 255.9).abs() < 1.0);
        // Jakarta points west-northwest
        let jakarta = qibla_bearing(-6.2088, 106.8456);
        assert!((290.0..300.0).contains(&jakarta));
    }

    #[test]
    fn bearing_is_normalized() {
        for (lat, lng) in [(0.0, 0.0), (51.5, -0.1), (-33.9, 151.2), (64.1, -21.9)] {
            let b = qibla_bearing(lat, lng);
            assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
        }
    }

    #[test]
    fn compass_points_cover_the_circle() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(96.0), "E");
        assert_eq!(compass_point(278.6), "W");
        assert_eq!(compass_point(255.9), "W");
        assert_eq!(compass_point(225.0), "SW");
    }
}
