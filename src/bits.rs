use super::DIM2;

/// Candidate mask: bit `k` set means digit `k + 1` is still possible.
pub type Mask = u16;

pub const MASK_NONE: Mask = 0;
pub const MASK_ALL: Mask = (1 << DIM2) - 1;

#[inline(always)]
pub const fn clear_lowest_bit(mask: Mask) -> Mask {
    mask & mask.wrapping_sub(1)
}

#[inline(always)]
pub const fn is_single(mask: Mask) -> bool {
    mask != 0 && clear_lowest_bit(mask) == 0
}

#[inline(always)]
pub const fn is_pair(mask: Mask) -> bool {
    mask != 0 && is_single(clear_lowest_bit(mask))
}

#[inline(always)]
pub const fn lowest_bit(mask: Mask) -> Mask {
    mask & mask.wrapping_neg()
}

/// Digit of a single-bit mask. Any other mask gives a meaningless value.
#[inline(always)]
pub fn mask_to_digit(mask: Mask) -> u8 {
    debug_assert!(is_single(mask), "not a single digit: {:#011b}", mask);
    mask.trailing_zeros() as u8 + 1
}

/// `0` is the blank digit and maps to the unconstrained mask.
#[inline(always)]
pub const fn digit_to_mask(digit: u8) -> Mask {
    if digit == 0 {
        MASK_ALL
    } else {
        1 << (digit - 1)
    }
}

#[inline(always)]
pub const fn ascii_to_mask(c: u8) -> Mask {
    digit_to_mask(c.wrapping_sub(b'0'))
}

/// `b'0'` for the empty mask, the digit character for a single-bit mask.
#[inline(always)]
pub fn mask_to_ascii(mask: Mask) -> u8 {
    if mask == MASK_NONE {
        b'0'
    } else {
        b'0' + mask_to_digit(mask)
    }
}

/// Iterates the single-bit masks of `mask`, lowest first.
pub struct BitIter(Mask);

pub fn iter_bits(mask: Mask) -> BitIter {
    BitIter(mask)
}

impl Iterator for BitIter {
    type Item = Mask;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let bit = lowest_bit(self.0);
            self.0 = clear_lowest_bit(self.0);
            Some(bit)
        }
    }
}
