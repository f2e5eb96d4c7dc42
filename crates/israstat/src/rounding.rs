/// Rounds to the nearest whole unit, ties toward positive infinity.
///
/// `f64::round` sends ties away from zero, which disagrees for negative
/// halves; every currency figure in this crate goes through here instead.
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
