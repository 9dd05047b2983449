pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use crate::common::bit_utils::BitStream;
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version, MODE_INDICATOR_BITS};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    /// Encodes `data` in byte mode into the smallest version that holds it.
    pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(BitStream, Version)> {
        let ver = find_min_version(data.len(), ecl)?;
        Ok((encode_with_version(data, ecl, ver)?, ver))
    }

    pub fn encode_with_version(data: &[u8], ecl: ECLevel, ver: Version) -> QRResult<BitStream> {
        let bcap = ver.data_bit_capacity(ecl);
        if encoded_bit_len(data.len(), ver) > bcap {
            return Err(QRError::CapacityExceeded { len: data.len(), ec_level: ecl });
        }
        let mut bs = BitStream::new(bcap);
        push_segment(data, ver, &mut bs);
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        Ok(bs)
    }

    /// Smallest version whose byte mode capacity at `ecl` holds `len` bytes.
    pub fn find_min_version(len: usize, ecl: ECLevel) -> QRResult<Version> {
        Version::all()
            .find(|&ver| encoded_bit_len(len, ver) <= ver.data_bit_capacity(ecl))
            .ok_or(QRError::CapacityExceeded { len, ec_level: ecl })
    }

    // Mode indicator + character count + payload
    pub fn encoded_bit_len(len: usize, ver: Version) -> usize {
        MODE_INDICATOR_BITS + ver.char_cnt_bits() + (len << 3)
    }

    #[cfg(test)]
    mod encode_tests {
        use test_case::test_case;

        use super::{encode, encode_with_version, find_min_version};
        use crate::common::error::QRError;
        use crate::common::metadata::{ECLevel, Version};

        #[test_case("a".to_string(), ECLevel::L, 1)]
        #[test_case("a".repeat(17), ECLevel::L, 1)]
        #[test_case("a".repeat(18), ECLevel::L, 2)]
        #[test_case("a".repeat(14), ECLevel::M, 1)]
        #[test_case("https://google.com".to_string(), ECLevel::M, 2)]
        #[test_case("a".repeat(7), ECLevel::H, 1)]
        #[test_case("a".repeat(8), ECLevel::H, 2)]
        #[test_case("a".repeat(230), ECLevel::L, 9)]
        #[test_case("a".repeat(231), ECLevel::L, 10)]
        #[test_case("a".repeat(2953), ECLevel::L, 40)]
        #[test_case("a".repeat(1273), ECLevel::H, 40)]
        fn test_find_min_version(data: String, ecl: ECLevel, exp: usize) {
            let ver = find_min_version(data.len(), ecl).unwrap();
            assert_eq!(ver, Version::new(exp));
        }

        #[test_case(2954, ECLevel::L)]
        #[test_case(2332, ECLevel::M)]
        #[test_case(1664, ECLevel::Q)]
        #[test_case(1274, ECLevel::H)]
        fn test_capacity_exceeded(len: usize, ecl: ECLevel) {
            let res = find_min_version(len, ecl);
            assert!(matches!(res, Err(QRError::CapacityExceeded { len: l, ec_level }) if l == len && ec_level == ecl));
        }

        #[test]
        fn test_encode_byte_mode() {
            let (bs, ver) = encode(b"HELLO WORLD", ECLevel::M).unwrap();
            assert_eq!(ver, Version::new(1));
            assert_eq!(bs.len(), 128);
            let exp = [
                0x40, 0xB4, 0x84, 0x54, 0xC4, 0xC4, 0xF2, 0x05, 0x74, 0xF5, 0x24, 0xC4, 0x40, 0xEC,
                0x11, 0xEC,
            ];
            assert_eq!(bs.data(), &exp);
        }

        #[test]
        fn test_encode_with_small_version() {
            let res = encode_with_version(&[b'a'; 20], ECLevel::L, Version::new(1));
            assert!(matches!(res, Err(QRError::CapacityExceeded { .. })));
        }

        #[test]
        fn test_sixteen_bit_char_count() {
            let data = vec![0xAB; 300];
            let bs = encode_with_version(&data, ECLevel::L, Version::new(11)).unwrap();
            // 0100, then 300 as 16 bits: 0000 0001 0010 1100
            assert_eq!(&bs.data()[..3], &[0x40, 0x12, 0xCA]);
        }
    }
}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::metadata::{Version, BYTE_MODE_INDICATOR, MODE_INDICATOR_BITS};

    pub fn push_segment(data: &[u8], ver: Version, out: &mut BitStream) {
        push_header(data.len(), ver, out);
        for &b in data {
            out.push_bits(b, 8);
        }
    }

    fn push_header(char_cnt: usize, ver: Version, out: &mut BitStream) {
        out.push_bits(BYTE_MODE_INDICATOR, MODE_INDICATOR_BITS);
        let len_bits = ver.char_cnt_bits();
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u16, len_bits);
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

    #[cfg(test)]
    mod writer_tests {
        use super::{pad_remaining_capacity, push_segment, push_terminator, PADDING_CODEWORDS};
        use crate::common::bit_utils::BitStream;
        use crate::common::metadata::{ECLevel, Version};

        #[test]
        fn test_terminator_is_cut_at_capacity() {
            let mut bs = BitStream::new(10);
            bs.push_bits(0b11111111u8, 8);
            push_terminator(&mut bs);
            assert_eq!(bs.len(), 10);
        }

        #[test]
        fn test_padding_alternates() {
            let ver = Version::new(1);
            let mut bs = BitStream::new(ver.data_bit_capacity(ECLevel::L));
            push_segment(b"a", ver, &mut bs);
            push_terminator(&mut bs);
            pad_remaining_capacity(&mut bs);
            assert_eq!(bs.len(), bs.capacity());
            // 4 + 8 + 8 + 4 bits of header, payload and terminator fill 3 bytes
            let pads = &bs.data()[3..];
            assert_eq!(pads.len(), 16);
            for (i, &p) in pads.iter().enumerate() {
                assert_eq!(p, PADDING_CODEWORDS[i & 1]);
            }
        }
    }

    // Global constants
    //--------------------------------------------------------------------------

    pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
}
