use super::boundary::{set_bnd, FieldKind};
use super::params::PolarGeometry;
use crate::state::GridField;

/// Per-row weights of a 5-point relaxation stencil.
/// Update: x[i,j] = (rhs * b[i,j] + inner * x[i-1,j] + outer * x[i+1,j]
///                   + angular * (x[i,j-1] + x[i,j+1])) * inv_diag
#[derive(Debug, Clone, Copy)]
struct RowStencil {
    inner: f32,
    outer: f32,
    angular: f32,
    rhs: f32,
    inv_diag: f32,
}

/// Implicit diffusion weights: a_r = dt*k/dr², a_θ = dt*k/(r²dθ²).
fn diffusion_stencil(geometry: &PolarGeometry, coefficient: f32, dt: f32) -> Vec<RowStencil> {
    let dr = geometry.dr();
    let dth = geometry.dtheta();
    let a_r = dt * coefficient / (dr * dr);
    (1..=geometry.nr)
        .map(|i| {
            let r = geometry.radius(i);
            let a_t = dt * coefficient / (r * r * dth * dth);
            RowStencil {
                inner: a_r,
                outer: a_r,
                angular: a_t,
                rhs: 1.0,
                inv_diag: 1.0 / (1.0 + 2.0 * a_r + 2.0 * a_t),
            }
        })
        .collect()
}

/// Conservative polar Laplacian for ∇²p = div. Radial faces sit at r ± dr/2.
/// With dr == r*dθ this is the plain 4-neighbour average.
fn poisson_stencil(geometry: &PolarGeometry) -> Vec<RowStencil> {
    let dr = geometry.dr();
    let dth = geometry.dtheta();
    (1..=geometry.nr)
        .map(|i| {
            let r = geometry.radius(i);
            let a_t = 1.0 / (r * r * dth * dth);
            RowStencil {
                inner: (r - 0.5 * dr) / (r * dr * dr),
                outer: (r + 0.5 * dr) / (r * dr * dr),
                angular: a_t,
                rhs: -1.0,
                inv_diag: 1.0 / (2.0 / (dr * dr) + 2.0 * a_t),
            }
        })
        .collect()
}

/// Gauss-Seidel relaxation with a fixed sweep count, sweeping `j` outer and
/// `i` inner. Ghosts are refreshed after every sweep.
fn lin_solve(kind: FieldKind, x: &mut GridField, b: &GridField, rows: &[RowStencil], iter: usize) {
    let nr = x.nr();
    let nt = x.ntheta();
    for _ in 0..iter {
        for j in 1..=nt {
            for i in 1..=nr {
                let w = rows[i - 1];
                let value = (w.rhs * b.get(i, j)
                    + w.inner * x.get(i - 1, j)
                    + w.outer * x.get(i + 1, j)
                    + w.angular * (x.get(i, j - 1) + x.get(i, j + 1)))
                    * w.inv_diag;
                x.set(i, j, value);
            }
        }
        set_bnd(kind, x);
    }
}

/// Implicit diffusion: solves x = x0 + dt * coefficient * ∇²x, starting from x0.
pub fn diffuse(
    kind: FieldKind,
    x: &mut GridField,
    x0: &GridField,
    coefficient: f32,
    dt: f32,
    iter: usize,
    geometry: &PolarGeometry,
) {
    x.copy_from(x0);
    set_bnd(kind, x);
    let rows = diffusion_stencil(geometry, coefficient, dt);
    lin_solve(kind, x, x0, &rows, iter);
}

/// Semi-Lagrangian advection: traces each cell centre backwards through
/// (ur, utheta) and bilinearly samples `d0` at the departure point.
///
/// `utheta` is a linear velocity, so the angular displacement is
/// dt * utheta / r. Departure radii clamp to [r_min, r_max]; angles wrap.
/// Samples may land on ghost cells, which must already be valid in `d0`.
pub fn advect(
    kind: FieldKind,
    d: &mut GridField,
    d0: &GridField,
    ur: &GridField,
    utheta: &GridField,
    dt: f32,
    geometry: &PolarGeometry,
) {
    let nr = geometry.nr;
    let nt = geometry.ntheta;
    let nr_f = nr as f32;
    let nt_f = nt as f32;
    let dr = geometry.dr();
    let dth = geometry.dtheta();

    for j in 1..=nt {
        for i in 1..=nr {
            let r = geometry.radius(i);

            // In cell units: x = (r0 - r_min)/dr + 0.5, y = θ0/dθ + 0.5,
            // with r0 = r - dt*ur and θ0 = θ - dt*utheta/r.
            let x = (i as f32 - dt * ur.get(i, j) / dr).clamp(0.5, nr_f + 0.5);
            let y = (j as f32 - 0.5 - dt * utheta.get(i, j) / (r * dth)).rem_euclid(nt_f) + 0.5;

            // rem_euclid can round up to nt_f exactly; min keeps j1 a ghost at worst.
            let i0 = (x.floor() as usize).min(nr);
            let j0 = (y.floor() as usize).min(nt);
            let i1 = i0 + 1;
            let j1 = j0 + 1;
            let s1 = x - i0 as f32;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f32;
            let t0 = 1.0 - t1;

            let value = s0 * (t0 * d0.get(i0, j0) + t1 * d0.get(i0, j1))
                + s1 * (t0 * d0.get(i1, j0) + t1 * d0.get(i1, j1));
            d.set(i, j, value);
        }
    }
    set_bnd(kind, d);
}

/// Polar divergence (1/r)·∂(r·ur)/∂r + (1/r)·∂utheta/∂θ by central differences.
/// Writes interior cells of `div` only.
pub fn compute_divergence(div: &mut GridField, ur: &GridField, utheta: &GridField, geometry: &PolarGeometry) {
    let dr = geometry.dr();
    let dth = geometry.dtheta();
    for j in 1..=geometry.ntheta {
        for i in 1..=geometry.nr {
            let r = geometry.radius(i);
            let term_r = ((r + dr) * ur.get(i + 1, j) - (r - dr) * ur.get(i - 1, j)) / (2.0 * dr);
            let term_t = (utheta.get(i, j + 1) - utheta.get(i, j - 1)) / (2.0 * dth);
            div.set(i, j, (term_r + term_t) / r);
        }
    }
}

/// Pressure projection: removes the divergent part of (ur, utheta).
pub fn project(
    ur: &mut GridField,
    utheta: &mut GridField,
    p: &mut GridField,
    div: &mut GridField,
    iter: usize,
    geometry: &PolarGeometry,
) {
    compute_divergence(div, ur, utheta, geometry);
    p.fill(0.0);
    set_bnd(FieldKind::Scalar, div);
    set_bnd(FieldKind::Scalar, p);

    let rows = poisson_stencil(geometry);
    lin_solve(FieldKind::Scalar, p, div, &rows, iter);

    let dr = geometry.dr();
    let dth = geometry.dtheta();
    for j in 1..=geometry.ntheta {
        for i in 1..=geometry.nr {
            let r = geometry.radius(i);
            ur.add(i, j, -(p.get(i + 1, j) - p.get(i - 1, j)) / (2.0 * dr));
            utheta.add(i, j, -(p.get(i, j + 1) - p.get(i, j - 1)) / (2.0 * r * dth));
        }
    }
    set_bnd(FieldKind::RadialVelocity, ur);
    set_bnd(FieldKind::AngularVelocity, utheta);
}
