mod galois;

pub(crate) use galois::G;

// Error correction codewords
//------------------------------------------------------------------------------

/// Largest supported number of error correction codewords per block.
pub static MAX_EC_SIZE: usize = 68;

// Generator polynomial (x - a^0)(x - a^1)...(x - a^(n-1)), coefficients from
// the highest degree down. The leading coefficient is always 1.
pub fn generator_polynomial(ec_count: usize) -> Vec<G> {
    debug_assert!(
        (1..=MAX_EC_SIZE).contains(&ec_count),
        "Error correction codeword count out of range: {ec_count}"
    );

    let mut poly = Vec::with_capacity(ec_count + 1);
    poly.push(G(1));
    for i in 0..ec_count {
        let root = G::gen_pow(i);
        poly.push(G(0));
        for j in (1..poly.len()).rev() {
            let prev = poly[j - 1];
            poly[j] += prev * root;
        }
    }
    poly
}

/// Computes `ec_count` error correction codewords for a data block.
///
/// The codewords are the remainder of the data polynomial, shifted up by
/// `ec_count` degrees, divided by the generator polynomial.
pub fn ecc(data: &[u8], ec_count: usize) -> Vec<u8> {
    let gen_poly = generator_polynomial(ec_count);
    let len = data.len();

    let mut res: Vec<G> = data.iter().map(|&b| G(b)).collect();
    res.resize(len + ec_count, G(0));

    for i in 0..len {
        let lead = res[i];
        if lead.0 == 0 {
            continue;
        }
        for (u, &v) in res[i + 1..].iter_mut().zip(gen_poly[1..].iter()) {
            *u += v * lead;
        }
    }

    let ecc: Vec<u8> = res.split_off(len).into_iter().map(u8::from).collect();
    debug_assert_eq!(ecc.len(), ec_count, "Remainder length mismatch");
    ecc
}
