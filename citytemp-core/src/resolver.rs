use crate::geo::haversine_km;
use crate::model::{Candidate, Coordinates};

/// Closest candidate to `target` that carries a usable measurement.
///
/// Candidates without a measurement are skipped whatever their distance.
/// On equal distances the earlier candidate wins.
pub fn nearest_valid(target: Coordinates, candidates: &[Candidate]) -> Option<&Candidate> {
    nearest_valid_with_distance(target, candidates).map(|(candidate, _)| candidate)
}

/// [`nearest_valid`] together with the winning distance in kilometers.
pub fn nearest_valid_with_distance(
    target: Coordinates,
    candidates: &[Candidate],
) -> Option<(&Candidate, f64)> {
    let mut closest = None;
    let mut min_distance = f64::INFINITY;

    for candidate in candidates {
        if !candidate.is_valid() {
            continue;
        }

        let distance = haversine_km(target, candidate.coordinates);
        if distance < min_distance {
            closest = Some(candidate);
            min_distance = distance;
        }
    }

    closest.map(|c| (c, min_distance))
}
