pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in km between two points given in decimal degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(lat2 - lat1);
    let dlon = to_rad(lon2 - lon1);
    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Lat/lon box that contains every point within `radius_km` of the centre.
/// Returns `None` when the circle reaches a pole or the box would wrap the
/// antimeridian; callers then skip the pre-filter and rely on the exact distance
/// check alone.
pub fn bounding_box(lat: f64, lon: f64, radius_km: f64) -> Option<(f64, f64, f64, f64)> {
    let lat_change = radius_km / 111.0;
    let (min_lat, max_lat) = (lat - lat_change, lat + lat_change);
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return None;
    }

    // Widest longitude reached by the circle, not r/cos(lat), which falls short
    // at high latitudes.
    let ratio = (radius_km / EARTH_RADIUS_KM).sin() / lat.to_radians().cos();
    if !ratio.is_finite() || ratio >= 1.0 {
        return None;
    }
    let lon_change = ratio.asin().to_degrees();

    let (min_lon, max_lon) = (lon - lon_change, lon + lon_change);
    if min_lon < -180.0 || max_lon > 180.0 {
        return None;
    }

    Some((min_lat, max_lat, min_lon, max_lon))
}

/// One decimal place, the precision distances are shown with.
pub fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}
