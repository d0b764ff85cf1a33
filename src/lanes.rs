#![allow(unused_unsafe)]

use super::bits::Mask;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    __m128i, _mm_add_epi16, _mm_and_si128, _mm_andnot_si128, _mm_cmpeq_epi16, _mm_movemask_epi8,
    _mm_or_si128, _mm_packs_epi16, _mm_setzero_si128, _mm_sub_epi16,
};

/// Number of puzzles processed in lockstep.
pub const LANES: usize = 16;

/// One candidate mask per lane. On x86_64 the two halves are SSE2 registers.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Lanes([Mask; LANES]);

macro_rules! lanewise {
    ($(#[$attr:meta])* $vis:vis fn $name:ident,
     |$a:ident, $b:ident| $sse:expr,
     |$sa:ident, $sb:ident| $scalar:expr) => {
        $(#[$attr])*
        #[inline(always)]
        $vis fn $name(self, rhs: Self) -> Self {
            #[cfg(target_arch = "x86_64")]
            {
                let [a0, a1] = self.halves();
                let [b0, b1] = rhs.halves();
                let lo = {
                    let ($a, $b) = (a0, b0);
                    unsafe { $sse }
                };
                let hi = {
                    let ($a, $b) = (a1, b1);
                    unsafe { $sse }
                };
                Self::from_halves([lo, hi])
            }
            #[cfg(not(target_arch = "x86_64"))]
            {
                let mut out = self.0;
                for (x, &$sb) in out.iter_mut().zip(rhs.0.iter()) {
                    let $sa = *x;
                    *x = $scalar;
                }
                Lanes(out)
            }
        }
    };
}

impl Lanes {
    pub const fn splat(value: Mask) -> Self {
        Lanes([value; LANES])
    }

    pub const fn zero() -> Self {
        Self::splat(0)
    }

    pub fn get(self, lane: usize) -> Mask {
        self.0[lane]
    }

    #[cfg(target_arch = "x86_64")]
    #[inline(always)]
    fn halves(self) -> [__m128i; 2] {
        unsafe { std::mem::transmute(self) }
    }

    #[cfg(target_arch = "x86_64")]
    #[inline(always)]
    fn from_halves(halves: [__m128i; 2]) -> Self {
        unsafe { std::mem::transmute(halves) }
    }

    lanewise!(pub fn and, |a, b| _mm_and_si128(a, b), |a, b| a & b);
    lanewise!(pub fn or, |a, b| _mm_or_si128(a, b), |a, b| a | b);
    lanewise!(
        /// `self & !rhs`
        pub fn and_not, |a, b| _mm_andnot_si128(b, a), |a, b| a & !b
    );
    lanewise!(pub fn wrapping_add, |a, b| _mm_add_epi16(a, b), |a, b| a.wrapping_add(b));
    lanewise!(pub fn wrapping_sub, |a, b| _mm_sub_epi16(a, b), |a, b| a.wrapping_sub(b));
    lanewise!(
        /// All ones in lanes where the operands are equal, zero elsewhere.
        pub fn lanes_eq, |a, b| _mm_cmpeq_epi16(a, b), |a, b| if a == b { !0 } else { 0 }
    );

    /// Bit `i` of the result is set iff lane `i` is zero.
    #[inline(always)]
    pub fn zero_lanes(self) -> u16 {
        #[cfg(target_arch = "x86_64")]
        {
            let [lo, hi] = self.halves();
            unsafe {
                let zero = _mm_setzero_si128();
                let packed = _mm_packs_epi16(_mm_cmpeq_epi16(lo, zero), _mm_cmpeq_epi16(hi, zero));
                _mm_movemask_epi8(packed) as u16
            }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            self.0
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v == 0)
                .fold(0, |acc, (i, _)| acc | 1 << i)
        }
    }

    pub fn any_zero(self) -> bool {
        self.zero_lanes() != 0
    }
}

impl From<[Mask; LANES]> for Lanes {
    fn from(value: [Mask; LANES]) -> Self {
        Lanes(value)
    }
}

impl From<Lanes> for [Mask; LANES] {
    fn from(value: Lanes) -> Self {
        value.0
    }
}

impl std::ops::BitAnd for Lanes {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}
impl std::ops::BitAndAssign for Lanes {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}
impl std::ops::BitOr for Lanes {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}
impl std::ops::BitOrAssign for Lanes {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}
