// File: crates/tsgraph-core/src/numeric.rs
// Summary: SI prefix scaling, base-10 mantissa split and ULP float comparison.

/// Prefixes for `auto_scale`, from atto to exa.
const AUTO_SYMBOLS: [char; 13] = ['a', 'f', 'p', 'n', 'u', 'm', ' ', 'k', 'M', 'G', 'T', 'P', 'E'];
const AUTO_CENTER: i32 = 6;

/// Prefixes for axis units, from yocto to yotta.
const SI_SYMBOLS: [char; 17] = [
    'y', 'z', 'a', 'f', 'p', 'n', 'u', 'm', ' ', 'k', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y',
];
const SI_CENTER: i32 = 8;

/// Result of picking an SI prefix for a single value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scaled {
    pub value: f64,
    pub magfact: f64,
    pub symbol: char,
}

/// Scale `value` into [1, base) and report the prefix used.
/// Zero and NaN keep factor 1 and a blank prefix; out of table prefixes are `?`.
pub fn auto_scale(base: f64, value: f64) -> Scaled {
    if value == 0.0 || value.is_nan() {
        return Scaled { value, magfact: 1.0, symbol: ' ' };
    }
    let sindex = (value.abs().ln() / base.ln()).floor();
    let magfact = base.powf(sindex);
    Scaled { value: value / magfact, magfact, symbol: lookup(&AUTO_SYMBOLS, AUTO_CENTER, sindex) }
}

/// Axis-wide unit scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiUnit {
    pub magfact: f64,
    pub viewfactor: f64,
    pub symbol: char,
}

/// Choose the axis magnitude from the larger bound; `units_exponent` pins the
/// displayed exponent (a multiple of three) independently of the data.
pub fn si_unit(base: f64, min: f64, max: f64, units_exponent: Option<i32>) -> SiUnit {
    let digits = (min.abs().max(max.abs()).ln() / base.ln()).floor();
    let viewdigits = match units_exponent {
        Some(e) => f64::from(e / 3),
        None => digits,
    };
    let magfact = base.powf(digits);
    SiUnit {
        magfact,
        viewfactor: magfact / base.powf(viewdigits),
        symbol: lookup(&SI_SYMBOLS, SI_CENTER, viewdigits),
    }
}

fn lookup(table: &[char], center: i32, index: f64) -> char {
    if !index.is_finite() { return '?'; }
    let i = index as i64 + i64::from(center);
    if i >= 0 && (i as usize) < table.len() { table[i as usize] } else { '?' }
}

/// Split `x` into a mantissa in [1, 10) and a base-10 exponent.
pub fn frexp10(x: f64) -> (f64, i32) {
    let mut iexp = x.abs().log10().floor() as i32;
    let mut mnt = x / 10f64.powi(iexp);
    if mnt >= 10.0 {
        iexp += 1;
        mnt = x / 10f64.powi(iexp);
    }
    (mnt, iexp)
}

/// Compare two values as single-precision floats that differ by at most
/// `max_ulps` units in the last place.
pub fn almost_equal_ulps(a: f64, b: f64, max_ulps: i64) -> bool {
    fn ordered(v: f64) -> i64 {
        let bits = (v as f32).to_bits() as i32;
        let bits = if bits < 0 { (0x8000_0000i64 - i64::from(bits)) as i32 } else { bits };
        i64::from(bits)
    }
    (ordered(a) - ordered(b)).abs() <= max_ulps
}

/// The comparison used throughout the layout code: four single-precision ULPs.
#[inline]
pub fn almost_equal(a: f64, b: f64) -> bool {
    almost_equal_ulps(a, b, 4)
}
