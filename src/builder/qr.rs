use std::ops::Deref;

use crate::common::bit_utils::BitStream;
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    format_info, Color, ECLevel, Role, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_QR_MAIN,
    FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFO_BIT_LEN,
};

/// A grid cell tagged with its structural role.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Finder(Color),
    Separator(Color),
    Timing(Color),
    Alignment(Color),
    Format(Color),
    Version(Color),
    Data(Color),
}

impl Module {
    pub fn role(self) -> Role {
        match self {
            Module::Empty => Role::Unused,
            Module::Finder(_) => Role::Finder,
            Module::Separator(_) => Role::Separator,
            Module::Timing(_) => Role::Timing,
            Module::Alignment(_) => Role::Alignment,
            Module::Format(_) => Role::Format,
            Module::Version(_) => Role::Version,
            Module::Data(_) => Role::Data,
        }
    }
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Finder(c)
            | Module::Separator(c)
            | Module::Timing(c)
            | Module::Alignment(c)
            | Module::Format(c)
            | Module::Version(c)
            | Module::Data(c) => c,
        }
    }
}

/// Module grid of a QR symbol, addressed by row and column. Negative indices
/// count from the far edge.
#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let m = self.get(i, j);
                let c = match m {
                    Module::Empty => '.',
                    Module::Finder(_) => 'f',
                    Module::Separator(_) => 's',
                    Module::Timing(_) => 't',
                    Module::Alignment(_) => 'a',
                    Module::Format(_) => 'm',
                    Module::Version(_) => 'v',
                    Module::Data(_) => 'd',
                };
                // Light modules are uppercase
                let c = if *m == Color::Light && m != Module::Empty { c.to_ascii_uppercase() } else { c };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub(crate) fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub(crate) fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 finder centred at (r, c) along with its light separator
    // on the sides facing the symbol interior
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Separator(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Finder(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Finder(Color::Light),
                        _ => Module::Finder(Color::Dark),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod finder_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_finder_pattern_qr() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.draw_finder_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffS.....Sfffffff\n\
             fFFFFFfS.....SfFFFFFf\n\
             fFfffFfS.....SfFfffFf\n\
             fFfffFfS.....SfFfffFf\n\
             fFfffFfS.....SfFfffFf\n\
             fFFFFFfS.....SfFFFFFf\n\
             fffffffS.....Sfffffff\n\
             SSSSSSSS.....SSSSSSSS\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             SSSSSSSS.............\n\
             fffffffS.............\n\
             fFFFFFfS.............\n\
             fFfffFfS.............\n\
             fFfffFfS.............\n\
             fFfffFfS.............\n\
             fFFFFFfS.............\n\
             fffffffS.............\n"
        );
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        let timing = |i: i16| Module::Timing(Color::from(i & 1 == 0));
        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, timing(j));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, timing(i));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Positions overlapping a finder pattern
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Alignment(Color::Dark),
                        _ => Module::Alignment(Color::Light),
                    },
                )
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, Module::Format, &FORMAT_INFO_COORDS_QR_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, Module::Format, &FORMAT_INFO_COORDS_QR_SIDE);
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    // Two 6x3 blocks, one above the bottom left finder and its transpose left
    // of the top right finder. Least significant bit first.
    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let info = self.ver.info();
        let w = self.w as i16;
        for i in 0..VERSION_INFO_BIT_LEN as i16 {
            let module = Module::Version(Color::from((info >> i) & 1 == 1));
            let (a, b) = (w - 11 + i % 3, i / 3);
            self.set(b, a, module);
            self.set(a, b, module);
        }
    }

    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        module: fn(Color) -> Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set(r, c, module(Color::from(number & mask != 0)));
            mask >>= 1;
        }
    }
}

#[cfg(test)]
mod qr_information_tests {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_version_info_1() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.draw_version_info();
        assert!(qr.grid().iter().all(|m| *m == Module::Empty));
    }

    #[test]
    fn test_version_info_7() {
        // 0x07C94 = 000111 110010 010100
        let mut qr = QR::new(Version::new(7), ECLevel::L);
        qr.draw_version_info();
        let w = qr.width() as i16;
        let exp = [
            [false, false, true],
            [false, true, false],
            [false, true, false],
            [false, true, true],
            [true, true, true],
            [false, false, false],
        ];
        for (r, row) in exp.iter().enumerate() {
            for (j, &dark) in row.iter().enumerate() {
                let m = Module::Version(Color::from(dark));
                assert_eq!(qr.get(r as i16, w - 11 + j as i16), m, "top right {r} {j}");
                assert_eq!(qr.get(w - 11 + j as i16, r as i16), m, "bottom left {r} {j}");
            }
        }
        let count = qr.grid().iter().filter(|m| matches!(m, Module::Version(_))).count();
        assert_eq!(count, 36);
    }

    #[test]
    fn test_reserve_format_info_qr() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.reserve_format_area();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             .....................\n\
             ........m............\n\
             mmmmmm.mm....mmmmmmmm\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n"
        );
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);

        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module found in debug");
    }

    fn draw_payload(&mut self, payload: BitStream) {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let module = Module::Data(Color::from(bit));
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, module);
                    break;
                }
            }
        }
        self.fill_remainder_bits(coords);
    }

    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i16, i16)>) {
        let mut filled = 0;
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
                filled += 1;
            }
        }
        debug_assert_eq!(filled, self.ver.remainder_bits(), "Remainder bit count mismatch");
    }

    /// Flips data modules where the mask function holds, then writes the
    /// format information for the mask.
    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_functions();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use crate::builder::{Module, QR};
    use crate::common::bit_utils::BitStream;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, ECLevel, Version};

    fn with_payload(ver: Version, ecl: ECLevel, bits: &[bool]) -> QR {
        let cap = ver.total_codewords() << 3;
        let mut bs = BitStream::new(cap);
        for i in 0..cap {
            bs.push(bits[i % bits.len()]);
        }
        let mut qr = QR::new(ver, ecl);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(bs);
        qr
    }

    #[test]
    fn test_payload_placement_start() {
        let qr = with_payload(Version::new(1), ECLevel::L, &[true, false, false]);
        assert_eq!(qr.get(20, 20), Module::Data(Color::Dark));
        assert_eq!(qr.get(20, 19), Module::Data(Color::Light));
        assert_eq!(qr.get(19, 20), Module::Data(Color::Light));
        assert_eq!(qr.get(19, 19), Module::Data(Color::Dark));
    }

    #[test]
    fn test_roles_match_positions() {
        for v in [1, 2, 6, 7, 14, 21, 32, 40] {
            let ver = Version::new(v);
            let qr = with_payload(ver, ECLevel::M, &[true, false]);
            let w = qr.width() as i16;
            for r in 0..w {
                for c in 0..w {
                    assert_eq!(qr.get(r, c).role(), ver.role_at(r, c), "version {v} at {r} {c}");
                }
            }
        }
    }

    #[test]
    fn test_remainder_bits_are_light() {
        // Version 2 has 7 remainder bits ending the placement walk
        let qr = with_payload(Version::new(2), ECLevel::L, &[true]);
        let light_data =
            qr.grid().iter().filter(|m| matches!(m, Module::Data(Color::Light))).count();
        assert_eq!(light_data, Version::new(2).remainder_bits());
    }

    #[test]
    fn test_apply_mask_only_flips_data() {
        let ver = Version::new(7);
        let base = with_payload(ver, ECLevel::Q, &[false]);
        let mut masked = base.clone();
        masked.apply_mask(MaskPattern::new(0));
        assert_eq!(masked.mask(), Some(MaskPattern::new(0)));
        let w = base.width() as i16;
        for r in 0..w {
            for c in 0..w {
                match (base.get(r, c), masked.get(r, c)) {
                    (Module::Data(a), Module::Data(b)) => assert_eq!(a != b, (r + c) % 2 == 0),
                    (Module::Format(_), Module::Format(_)) => {}
                    (a, b) => assert_eq!(a, b),
                }
            }
        }
    }

    #[test]
    fn test_format_info_copies_agree() {
        let mut qr = with_payload(Version::new(3), ECLevel::H, &[true, true, false]);
        qr.apply_mask(MaskPattern::new(5));
        let read = |coords: &[(i16, i16)]| {
            coords.iter().fold(0u32, |acc, &(r, c)| (acc << 1) | (*qr.get(r, c) == Color::Dark) as u32)
        };
        let main = read(&crate::common::metadata::FORMAT_INFO_COORDS_QR_MAIN);
        let side = read(&crate::common::metadata::FORMAT_INFO_COORDS_QR_SIDE);
        assert_eq!(main, side);
        assert_eq!(main, crate::common::metadata::format_info(ECLevel::H, MaskPattern::new(5)));
        assert_eq!(qr.get(-8, 8), Module::Format(Color::Dark));
    }
}
