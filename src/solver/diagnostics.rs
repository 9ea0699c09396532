use super::core::compute_divergence;
use super::params::PolarGeometry;
use crate::state::GridField;

/// Plain sum of interior cells.
pub fn total_density(field: &GridField) -> f64 {
    field.interior().map(|(i, j)| field.get(i, j) as f64).sum()
}

/// L2 norm of the polar divergence over interior cells, using the same
/// operator as the projection.
pub fn divergence_l2(ur: &GridField, utheta: &GridField, geometry: &PolarGeometry) -> f64 {
    let mut div = GridField::for_geometry(geometry);
    compute_divergence(&mut div, ur, utheta, geometry);
    div.interior()
        .map(|(i, j)| {
            let d = div.get(i, j) as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Volume-averaged kinetic energy: KE = 0.5 * <ur² + utheta²>.
pub fn kinetic_energy(ur: &GridField, utheta: &GridField) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, j) in ur.interior() {
        let (a, b) = (ur.get(i, j) as f64, utheta.get(i, j) as f64);
        sum += a * a + b * b;
        count += 1;
    }
    if count > 0 { 0.5 * sum / count as f64 } else { 0.0 }
}

/// First interior cell holding NaN or infinity, if any.
pub fn first_non_finite(field: &GridField) -> Option<(usize, usize)> {
    field.interior().find(|&(i, j)| !field.get(i, j).is_finite())
}
