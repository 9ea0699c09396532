use crate::state::GridField;

/// Field kind for boundary condition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Passive scalars (density, pressure, divergence).
    Scalar,
    /// Velocity component along r.
    RadialVelocity,
    /// Linear velocity component along θ (not an angular rate).
    AngularVelocity,
}

/// Refresh the ghost ring of `x` from its interior.
///
///   - angle: periodic for every kind (`j = 0` copies `j = ntheta`,
///     `j = ntheta + 1` copies `j = 1`)
///   - radius: `RadialVelocity` negates the adjacent interior value so the
///     wall carries no flux; other kinds copy it (Neumann)
///   - corners: mean of the two ghost cells next to them
///
/// Interior values are never written. The angular seam equalities hold on
/// interior rows only; the four corners take the averaged value instead.
pub fn set_bnd(kind: FieldKind, x: &mut GridField) {
    let nr = x.nr();
    let nt = x.ntheta();

    for i in 1..=nr {
        x.set(i, 0, x.get(i, nt));
        x.set(i, nt + 1, x.get(i, 1));
    }

    let sign = match kind {
        FieldKind::RadialVelocity => -1.0,
        FieldKind::Scalar | FieldKind::AngularVelocity => 1.0,
    };
    for j in 1..=nt {
        x.set(0, j, sign * x.get(1, j));
        x.set(nr + 1, j, sign * x.get(nr, j));
    }

    x.set(0, 0, 0.5 * (x.get(1, 0) + x.get(0, 1)));
    x.set(nr + 1, 0, 0.5 * (x.get(nr, 0) + x.get(nr + 1, 1)));
    x.set(0, nt + 1, 0.5 * (x.get(1, nt + 1) + x.get(0, nt)));
    x.set(nr + 1, nt + 1, 0.5 * (x.get(nr, nt + 1) + x.get(nr + 1, nt)));
}
