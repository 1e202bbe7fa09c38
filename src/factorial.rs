//! Exact factorials for the Poisson mass function.

/// The largest `n` for which `n!` fits in a `u128`.
pub const MAX_EXACT: u8 = 34;

pub trait Factorial {
    fn get(&self, n: u8) -> u128;

    #[inline]
    fn get_f64(&self, n: u8) -> f64 {
        self.get(n) as f64
    }
}

/// Computes `n!` on demand by iterative product.
#[derive(Default, Debug, Clone, Copy)]
pub struct Calculator;

impl Factorial for Calculator {
    #[inline]
    fn get(&self, n: u8) -> u128 {
        assert!(n <= MAX_EXACT, "{n}! overflows");
        (2..=n as u128).product()
    }
}

const ENTRIES: usize = MAX_EXACT as usize + 1;

/// A precomputed table of `0!` through `34!`.
#[derive(Debug, Clone)]
pub struct Lookup {
    entries: [u128; ENTRIES],
}

impl Factorial for Lookup {
    #[inline]
    fn get(&self, n: u8) -> u128 {
        assert!(n <= MAX_EXACT, "{n}! overflows");
        self.entries[n as usize]
    }
}

impl Default for Lookup {
    fn default() -> Self {
        let mut entries = [1u128; ENTRIES];
        for (n, entry) in entries.iter_mut().enumerate() {
            *entry = Calculator.get(n as u8);
        }
        Self { entries }
    }
}
