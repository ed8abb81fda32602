// File: crates/tsgraph-core/src/scale.rs
// Summary: Time (X) and value (Y) to pixel transforms with cached scale factors.

/// Horizontal time scale. The pixels-per-second factor is cached and only
/// refreshed by `reset`, so callers must reset after changing the span.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeScale {
    pub origin: f64,
    pub size: f64,
    pub start: i64,
    pub end: i64,
    pixie: f64,
}

impl TimeScale {
    pub fn new(origin: f64, size: f64, start: i64, end: i64) -> Self {
        let mut s = Self { origin, size, start, end, pixie: 0.0 };
        s.reset();
        s
    }

    /// Recompute the cached factor from the current fields.
    pub fn reset(&mut self) {
        let span = (self.end - self.start) as f64;
        self.pixie = if span != 0.0 { self.size / span } else { 0.0 };
    }

    pub fn pixie(&self) -> f64 { self.pixie }

    /// Pixel column of time `t`, truncated toward zero.
    #[inline]
    pub fn to_px(&self, t: i64) -> f64 {
        (self.origin + self.pixie * (t - self.start) as f64).trunc()
    }

    #[inline]
    pub fn from_px(&self, px: f64) -> f64 {
        self.start as f64 + (px - self.origin) / self.pixie
    }
}

/// Vertical value scale mapping `[min, max]` onto `origin .. origin - size`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValueScale {
    pub origin: f64,
    pub size: f64,
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pixie: f64,
}

impl ValueScale {
    pub fn new(origin: f64, size: f64, min: f64, max: f64, log: bool) -> Self {
        let mut s = Self { origin, size, min, max, log, pixie: 0.0 };
        s.reset();
        s
    }

    /// Recompute the cached factor from the current bounds.
    pub fn reset(&mut self) {
        self.pixie = if self.log {
            self.size / (self.max.log10() - self.min.log10())
        } else {
            self.size / (self.max - self.min)
        };
    }

    /// Move to new bounds and refresh the cache.
    pub fn set_bounds(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
        self.reset();
    }

    pub fn pixie(&self) -> f64 { self.pixie }

    /// Pixel row of `v`. In log mode values below the minimum sit on the origin.
    #[inline]
    pub fn to_px(&self, v: f64) -> f64 {
        if !self.log {
            self.origin - self.pixie * (v - self.min)
        } else if v < self.min {
            self.origin
        } else {
            self.origin - self.pixie * (v.log10() - self.min.log10())
        }
    }

    #[inline]
    pub fn from_px(&self, py: f64) -> f64 {
        let d = (self.origin - py) / self.pixie;
        if self.log { 10f64.powf(self.min.log10() + d) } else { self.min + d }
    }
}
