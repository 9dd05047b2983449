use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};

use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Color {
    Dark,
    Light,
}

impl Color {
    pub fn select<T>(&self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Module role
//------------------------------------------------------------------------------

/// Structural class of a module, fixed by its position in the symbol.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Role {
    Finder,
    Separator,
    Timing,
    Alignment,
    Format,
    Version,
    Data,
    Unused,
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash, Default)]
pub enum ECLevel {
    L = 0,
    #[default]
    M = 1,
    Q = 2,
    H = 3,
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for Version {
    type Error = QRError;
    fn try_from(v: usize) -> QRResult<Self> {
        if (1..=40).contains(&v) {
            Ok(Self(v))
        } else {
            Err(QRError::InvalidVersion(v))
        }
    }
}

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    /// Panics in debug builds if `v` is outside 1..=40. Use `Version::try_from`
    /// for values coming from callers.
    pub const fn new(v: usize) -> Self {
        debug_assert!(1 <= v && v <= 40, "Invalid version");
        Self(v)
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    // Number of modules left for data & ec codewords, remainder bits included
    pub fn raw_data_modules(self) -> usize {
        let v = self.0;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align_cnt = v / 7 + 2;
            res -= (25 * align_cnt - 10) * align_cnt - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() & 7
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0 - 1]
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][self.0 - 1]
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    /// Returns (block1 size, block1 count, block2 size, block2 count). Group 2
    /// blocks hold one more data codeword than group 1 blocks.
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let total = self.total_codewords();
        let blocks = self.block_count(ecl);
        let ecc = self.ecc_per_block(ecl);
        let block1_count = blocks - total % blocks;
        let block1_size = total / blocks - ecc;
        let block2_count = blocks - block1_count;
        let block2_size = if block2_count > 0 { block1_size + 1 } else { 0 };
        (block1_size, block1_count, block2_size, block2_count)
    }

    // Bit width of the character count indicator in byte mode
    pub fn char_cnt_bits(self) -> usize {
        match self.0 {
            1..=9 => 8,
            _ => 16,
        }
    }

    /// Largest payload in bytes that fits this version at `ecl`.
    pub fn byte_capacity(self, ecl: ECLevel) -> usize {
        let bits = self.data_bit_capacity(ecl) - MODE_INDICATOR_BITS - self.char_cnt_bits();
        bits >> 3
    }

    /// 18 bit version information: 6 bit version followed by a BCH(18, 6)
    /// remainder.
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info is only present from version 7");
        let v = self.0 as u32;
        let mut rem = v;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * VERSION_INFO_GENERATOR);
        }
        v << 12 | rem
    }

    /// Role of the module at row `r`, column `c`. Coordinates must be inside
    /// the symbol.
    pub fn role_at(self, r: i16, c: i16) -> Role {
        let w = self.width() as i16;
        debug_assert!((0..w).contains(&r) && (0..w).contains(&c), "Coordinate out of bounds");

        let in_corner = |size: i16| {
            (r < size && c < size) || (r < size && c >= w - size) || (r >= w - size && c < size)
        };
        if in_corner(7) {
            return Role::Finder;
        }
        if in_corner(8) {
            return Role::Separator;
        }

        // Format strips, including the dark module above the bottom left finder
        if (r == 8 && c != 6 && (c <= 8 || c >= w - 8))
            || (c == 8 && r != 6 && (r <= 8 || r >= w - 8))
        {
            return Role::Format;
        }

        if self.0 >= 7 {
            let band = w - 11..=w - 9;
            if (r < 6 && band.contains(&c)) || (c < 6 && band.contains(&r)) {
                return Role::Version;
            }
        }

        let ap = self.alignment_pattern();
        let last = ap.len().saturating_sub(1);
        for (i, &ar) in ap.iter().enumerate() {
            for (j, &ac) in ap.iter().enumerate() {
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                if (ar - 2..=ar + 2).contains(&r) && (ac - 2..=ac + 2).contains(&c) {
                    return Role::Alignment;
                }
            }
        }

        if r == 6 || c == 6 {
            return Role::Timing;
        }

        Role::Data
    }
}

#[cfg(test)]
mod version_tests {
    use test_case::test_case;

    use super::{ECLevel, Role, Version};

    #[test]
    fn test_width() {
        assert_eq!(Version::new(1).width(), 21);
        assert_eq!(Version::new(40).width(), 177);
        assert!(Version::all().all(|v| v.width() % 2 == 1));
    }

    #[test]
    fn test_try_from() {
        assert!(Version::try_from(0).is_err());
        assert!(Version::try_from(41).is_err());
        assert_eq!(Version::try_from(7).unwrap(), Version::new(7));
    }

    #[test_case(1, ECLevel::L, 19, 7, (19, 1, 0, 0))]
    #[test_case(1, ECLevel::M, 16, 10, (16, 1, 0, 0))]
    #[test_case(5, ECLevel::Q, 62, 18, (15, 2, 16, 2))]
    #[test_case(10, ECLevel::H, 122, 28, (15, 6, 16, 2))]
    #[test_case(40, ECLevel::L, 2956, 30, (118, 19, 119, 6))]
    #[test_case(40, ECLevel::H, 1276, 30, (15, 20, 16, 61))]
    fn test_block_structure(
        v: usize,
        ecl: ECLevel,
        data_cw: usize,
        ecc: usize,
        blocks: (usize, usize, usize, usize),
    ) {
        let ver = Version::new(v);
        assert_eq!(ver.data_codewords(ecl), data_cw);
        assert_eq!(ver.ecc_per_block(ecl), ecc);
        assert_eq!(ver.data_codewords_per_block(ecl), blocks);
    }

    #[test]
    fn test_block_sizes_cover_data_codewords() {
        for ver in Version::all() {
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let (s1, c1, s2, c2) = ver.data_codewords_per_block(ecl);
                assert_eq!(s1 * c1 + s2 * c2, ver.data_codewords(ecl), "v{ver} {ecl}");
            }
        }
    }

    #[test_case(ECLevel::L, 2953)]
    #[test_case(ECLevel::M, 2331)]
    #[test_case(ECLevel::Q, 1663)]
    #[test_case(ECLevel::H, 1273)]
    fn test_max_byte_capacity(ecl: ECLevel, cap: usize) {
        assert_eq!(Version::MAX.byte_capacity(ecl), cap);
    }

    #[test]
    fn test_remainder_bits() {
        let exp = [0, 7, 7, 7, 7, 7, 0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 3, 3, 3, 3];
        for (v, &r) in (1..=20).zip(exp.iter()) {
            assert_eq!(Version::new(v).remainder_bits(), r, "v{v}");
        }
    }

    #[test]
    fn test_version_info() {
        assert_eq!(Version::new(7).info(), 0x07C94);
        assert_eq!(Version::new(20).info(), 0x149A6);
        assert_eq!(Version::new(40).info(), 0x28C69);
    }

    // Alignment table must agree with the closed form spacing rule
    #[test]
    fn test_alignment_pattern_table() {
        for ver in Version::all() {
            let v = *ver as i16;
            let exp: Vec<i16> = if v == 1 {
                vec![]
            } else {
                let cnt = v / 7 + 2;
                let step = if v == 32 { 26 } else { (v * 4 + cnt * 2 + 1) / (cnt * 2 - 2) * 2 };
                let w = ver.width() as i16;
                let mut res: Vec<i16> = (0..cnt - 1).map(|i| w - 7 - i * step).collect();
                res.push(6);
                res.reverse();
                res
            };
            assert_eq!(ver.alignment_pattern(), &exp[..], "v{v}");
        }
    }

    #[test]
    fn test_role_data_module_count() {
        for ver in Version::all() {
            let w = ver.width() as i16;
            let data = (0..w)
                .flat_map(|r| (0..w).map(move |c| (r, c)))
                .filter(|&(r, c)| ver.role_at(r, c) == Role::Data)
                .count();
            assert_eq!(data, ver.raw_data_modules(), "v{ver}");
        }
    }

    #[test]
    fn test_role_at_landmarks() {
        let ver = Version::new(7);
        let w = ver.width() as i16;
        assert_eq!(ver.role_at(0, 0), Role::Finder);
        assert_eq!(ver.role_at(7, 7), Role::Separator);
        assert_eq!(ver.role_at(8, 0), Role::Format);
        assert_eq!(ver.role_at(w - 8, 8), Role::Format);
        assert_eq!(ver.role_at(6, 10), Role::Timing);
        assert_eq!(ver.role_at(6, 22), Role::Alignment);
        assert_eq!(ver.role_at(0, w - 11), Role::Version);
        assert_eq!(ver.role_at(w - 11, 5), Role::Version);
        assert_eq!(ver.role_at(w - 1, w - 1), Role::Data);
    }
}

// Format information
//------------------------------------------------------------------------------

/// 15 bit format information: 2 bit level and 3 bit mask, BCH(15, 5)
/// protected and XORed with the fixed format mask.
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    // Level indicators are L=01, M=00, Q=11, H=10
    let data = ((ecl as u32) ^ 1) << 3 | *mask as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_INFO_GENERATOR);
    }
    ((data << 10) | rem) ^ FORMAT_MASK
}


// Global constants
//------------------------------------------------------------------------------

pub static MODE_INDICATOR_BITS: usize = 4;

pub static BYTE_MODE_INDICATOR: u8 = 0b0100;

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static VERSION_INFO_BIT_LEN: usize = 18;

static FORMAT_INFO_GENERATOR: u32 = 0x537;

static VERSION_INFO_GENERATOR: u32 = 0x1F25;

static FORMAT_MASK: u32 = 0x5412;

// Most significant bit first
pub static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

// Most significant bit first
pub static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

// Indexed by [ec level][version - 1]
static ECC_PER_BLOCK: [[usize; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

// Indexed by [ec level][version - 1]
static BLOCK_COUNT: [[usize; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];
