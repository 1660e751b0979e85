//! Easing curves. Input and output are both [`Ratio`]s.

use crate::Ratio;

pub fn linear(t: Ratio) -> Ratio {
    t
}

pub fn quad_in(t: Ratio) -> Ratio {
    let t = t.to_fraction();
    Ratio::new(t * t)
}

/// Fast start, soft landing. Used by slide-in UI and item drops.
pub fn quad_out(t: Ratio) -> Ratio {
    let t = t.to_fraction();
    Ratio::new(t * (2.0 - t))
}

pub fn quad_in_out(t: Ratio) -> Ratio {
    let t = t.to_fraction();
    if t < 0.5 {
        Ratio::new(2.0 * t * t)
    } else {
        Ratio::new(-1.0 + (4.0 - 2.0 * t) * t)
    }
}
