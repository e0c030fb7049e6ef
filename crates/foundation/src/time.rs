/// Seconds since the Unix epoch (UTC).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    /// Julian Day number; the Unix epoch is JD 2440587.5.
    pub fn julian_day(self) -> f64 {
        2_440_587.5 + self.0 / 86_400.0
    }
}
