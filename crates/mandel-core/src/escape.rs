use crate::geometry::{Point, Real, World};

/// Squared escape radius. Comparing squared magnitudes avoids a square root.
pub const ESCAPE_RADIUS_SQUARED: Real = 4.0;

/// Escape-time of `c = x0 + i·y0` under `z → z² + c`, starting from `z = 0`.
///
/// Returns how many steps the orbit stayed within the escape radius. An
/// orbit that leaves on step `k` returns `k - 1`, so escaped points fall in
/// `0..max_iterations`; `max_iterations` itself means the point is treated
/// as interior.
///
/// Any `c` with `|c|² > 4` leaves on the first step and returns 0, which the
/// colour ramp paints black. Far from the set the picture is therefore as
/// dark as the interior, with the bright bands only along the boundary.
pub fn escape_iterations(x0: Real, y0: Real, max_iterations: u32) -> u32 {
    let mut x: Real = 0.0;
    let mut y: Real = 0.0;
    let mut x2: Real = 0.0;
    let mut y2: Real = 0.0;

    for iteration in 0..max_iterations {
        y = 2.0 * x * y + y0;
        x = x2 - y2 + x0;
        x2 = x * x;
        y2 = y * y;
        if x2 + y2 > ESCAPE_RADIUS_SQUARED {
            return iteration;
        }
    }
    max_iterations
}

/// [`escape_iterations`] for a world-space point.
pub fn escape_iterations_at(c: Point<World>, max_iterations: u32) -> u32 {
    escape_iterations(c.x, c.y, max_iterations)
}
