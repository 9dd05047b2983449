use std::ops::Deref;

use log::trace;
use rayon::prelude::*;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = QRError;
    fn try_from(pattern: u8) -> QRResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QRError::InvalidMaskingPattern(pattern))
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        debug_assert!(*self < 8, "Invalid pattern");

        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!(),
        }
    }
}

// Best mask selection
//------------------------------------------------------------------------------

/// Applies every mask to a copy of `qr`, then applies the one with the lowest
/// penalty to `qr` itself. Ties go to the lowest pattern index.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let (penalty, best_mask) = (0..8u8)
        .into_par_iter()
        .map(|m| {
            let mut candidate = qr.clone();
            candidate.apply_mask(MaskPattern(m));
            let penalty = compute_total_penalty(&candidate);
            trace!("Mask {m} penalty {penalty}");
            (penalty, m)
        })
        .min()
        .expect("Should return atleast 1 mask");
    trace!("Best mask {best_mask} with penalty {penalty}");
    let best_mask = MaskPattern(best_mask);
    qr.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// Run lengths of a row (is_hor) or a column
fn runs(qr: &QR, i: i16, is_hor: bool) -> Vec<(Color, u32)> {
    let w = qr.width() as i16;
    let mut res: Vec<(Color, u32)> = Vec::new();
    for j in 0..w {
        let clr = if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        match res.last_mut() {
            Some((last, len)) if *last == clr => *len += 1,
            _ => res.push((clr, 1)),
        }
    }
    res
}

// N1: 3 points for a run of 5 same colored modules, 1 more per extra module
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        for is_hor in [true, false] {
            pen += runs(qr, i, is_hor)
                .iter()
                .filter(|(_, len)| *len >= 5)
                .map(|(_, len)| len - 2)
                .sum::<u32>();
        }
    }
    pen
}

// N2: 3 points for every 2x2 block of one color, overlaps counted
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// N3: 40 points for each dark-light-dark-dark-dark-light-dark sequence, runs
// scaled by any n, with at least 4n light modules on either side. A sequence
// counts once even when both sides qualify, as in qirust's run history port of
// Nayuki's scorer. Area outside the symbol counts as light.
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    let w = qr.width() as u32;
    let mut pen = 0;
    for i in 0..w as i16 {
        let mut line = runs(qr, i, is_hor);
        match line.first_mut() {
            Some((Color::Light, len)) => *len += w,
            _ => line.insert(0, (Color::Light, w)),
        }
        match line.last_mut() {
            Some((Color::Light, len)) => *len += w,
            _ => line.push((Color::Light, w)),
        }

        for win in line.windows(7) {
            if win[0].0 != Color::Light {
                continue;
            }
            let n = win[1].1;
            let is_finder_like =
                win[2].1 == n && win[3].1 == n * 3 && win[4].1 == n && win[5].1 == n;
            if is_finder_like && (win[0].1 >= n * 4 || win[6].1 >= n * 4) {
                pen += 40;
            }
        }
    }
    pen
}

// N4: 10 points per full 5% step the dark ratio strays from 50%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark = qr.count_dark_modules() as i64;
    let w = qr.width() as i64;
    let total = w * w;
    let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    (k * 10) as u32
}

#[cfg(test)]
mod mask_tests {
    use test_case::test_case;

    use super::{
        apply_best_mask, compute_adjacent_penalty, compute_balance_penalty,
        compute_block_penalty, compute_finder_pattern_penalty, compute_total_penalty, MaskPattern,
    };
    use crate::builder::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    fn filled(clr: Color) -> QR {
        let mut qr = QR::new(Version::new(1), ECLevel::M);
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                qr.set(r, c, Module::Data(clr));
            }
        }
        qr
    }

    #[test_case(0, 0, 0, true)]
    #[test_case(0, 1, 1, true)]
    #[test_case(1, 1, 0, false)]
    #[test_case(2, 4, 3, true)]
    #[test_case(4, 2, 3, true)]
    #[test_case(4, 0, 3, false)]
    #[test_case(5, 2, 3, true)]
    #[test_case(7, 1, 1, false)]
    fn test_mask_functions(pattern: u8, r: i16, c: i16, exp: bool) {
        assert_eq!(MaskPattern::new(pattern).mask_functions()(r, c), exp);
    }

    #[test]
    fn test_try_from() {
        assert!(MaskPattern::try_from(7).is_ok());
        assert!(MaskPattern::try_from(8).is_err());
    }

    #[test]
    fn test_uniform_symbol_penalties() {
        let qr = filled(Color::Light);
        // 21 runs of 21 in each direction: 19 points each
        assert_eq!(compute_adjacent_penalty(&qr), 2 * 21 * 19);
        assert_eq!(compute_block_penalty(&qr), 20 * 20 * 3);
        assert_eq!(compute_finder_pattern_penalty(&qr, true), 0);
        // 0% dark leaves 9 full 5% steps beyond the first
        assert_eq!(compute_balance_penalty(&qr), 90);
    }

    #[test]
    fn test_finder_like_pattern() {
        let mut qr = filled(Color::Light);
        for (c, clr) in [1, 0, 1, 1, 1, 0, 1].into_iter().enumerate() {
            let clr = if clr == 1 { Color::Dark } else { Color::Light };
            qr.set(10, 7 + c as i16, Module::Data(clr));
        }
        // Both sides have a light margin, still a single count
        assert_eq!(compute_finder_pattern_penalty(&qr, true), 40);
        assert_eq!(compute_finder_pattern_penalty(&qr, false), 0);
    }

    #[test]
    fn test_scaled_finder_like_pattern() {
        let mut qr = filled(Color::Light);
        // 1:1:3:1:1 at n = 2, light margin only on the left
        let row = [1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 0, 1];
        for (c, clr) in row.into_iter().enumerate() {
            let clr = if clr == 1 { Color::Dark } else { Color::Light };
            qr.set(3, 5 + c as i16, Module::Data(clr));
        }
        assert_eq!(compute_finder_pattern_penalty(&qr, true), 40);
    }

    #[test]
    fn test_finder_like_pattern_without_margin() {
        let mut qr = filled(Color::Light);
        // Dark modules 3 away on both sides break the light margin
        for (c, clr) in [1, 0, 0, 1, 0, 1, 1, 1, 0, 1, 0, 0, 1].into_iter().enumerate() {
            let clr = if clr == 1 { Color::Dark } else { Color::Light };
            qr.set(10, 4 + c as i16, Module::Data(clr));
        }
        assert_eq!(compute_finder_pattern_penalty(&qr, true), 0);
    }

    #[test]
    fn test_best_mask_is_minimum() {
        let mut qr = QR::new(Version::new(1), ECLevel::M);
        qr.draw_all_function_patterns();
        qr.reserve_format_area();
        let base = qr.clone();
        let best = apply_best_mask(&mut qr);
        let best_pen = compute_total_penalty(&qr);
        for m in 0..8 {
            let mut candidate = base.clone();
            candidate.apply_mask(MaskPattern::new(m));
            let pen = compute_total_penalty(&candidate);
            assert!(best_pen < pen || (best_pen == pen && *best <= m), "mask {m}");
        }
    }
}
