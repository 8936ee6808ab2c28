use crate::database::models::GeoPoint;

/// Earth radius in metres used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Great-circle distance between two points, rounded to whole metres.
pub fn distance_m(from: GeoPoint, to: GeoPoint) -> f64 {
    let (lat1, lon1) = (from.latitude.to_radians(), from.longitude.to_radians());
    let (lat2, lon2) = (to.latitude.to_radians(), to.longitude.to_radians());

    // Rounding error can push the cosine just outside [-1, 1] for equal points.
    let cos_angle = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos())
        .clamp(-1.0, 1.0);

    (cos_angle.acos() * EARTH_RADIUS_M).round()
}

/// Distance in kilometres, as shown in the nearby cinemas list.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    distance_m(from, to) / 1000.0
}
