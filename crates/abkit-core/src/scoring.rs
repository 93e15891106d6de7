//! BLOSUM90 substitution scores.

// Row and column order of `BLOSUM90`.
const ALPHABET: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

#[rustfmt::skip]
const BLOSUM90: [[i32; 24]; 24] = [
//     A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
    [  5, -2, -2, -3, -1, -1, -1,  0, -2, -2, -2, -1, -2, -3, -1,  1,  0, -4, -3, -1, -2, -1, -1, -6], // A
    [ -2,  6, -1, -3, -5,  1, -1, -3,  0, -4, -3,  2, -2, -4, -3, -1, -2, -4, -3, -3, -2,  0, -2, -6], // R
    [ -2, -1,  7,  1, -4,  0, -1, -1,  0, -4, -4,  0, -3, -4, -3,  0,  0, -5, -3, -4,  4, -1, -2, -6], // N
    [ -3, -3,  1,  7, -5, -1,  1, -2, -2, -5, -5, -1, -4, -5, -3, -1, -2, -6, -4, -5,  4,  0, -2, -6], // D
    [ -1, -5, -4, -5,  9, -4, -6, -4, -5, -2, -2, -4, -2, -3, -4, -2, -2, -4, -4, -2, -4, -5, -3, -6], // C
    [ -1,  1,  0, -1, -4,  7,  2, -3,  1, -4, -3,  1,  0, -4, -2, -1, -1, -3, -3, -3, -1,  4, -1, -6], // Q
    [ -1, -1, -1,  1, -6,  2,  6, -3, -1, -4, -4,  0, -3, -5, -2, -1, -1, -5, -4, -3,  0,  4, -2, -6], // E
    [  0, -3, -1, -2, -4, -3, -3,  6, -3, -5, -5, -2, -4, -5, -3, -1, -3, -4, -5, -5, -2, -3, -2, -6], // G
    [ -2,  0,  0, -2, -5,  1, -1, -3,  8, -4, -4, -1, -3, -2, -3, -2, -2, -3,  1, -4, -1,  0, -2, -6], // H
    [ -2, -4, -4, -5, -2, -4, -4, -5, -4,  5,  1, -4,  1, -1, -4, -3, -1, -4, -2,  3, -5, -4, -2, -6], // I
    [ -2, -3, -4, -5, -2, -3, -4, -5, -4,  1,  5, -3,  2,  0, -4, -3, -2, -3, -2,  0, -5, -4, -2, -6], // L
    [ -1,  2,  0, -1, -4,  1,  0, -2, -1, -4, -3,  6, -2, -4, -2, -1, -1, -5, -3, -3, -1,  1, -1, -6], // K
    [ -2, -2, -3, -4, -2,  0, -3, -4, -3,  1,  2, -2,  7, -1, -3, -2, -1, -2, -2,  0, -4, -2, -1, -6], // M
    [ -3, -4, -4, -5, -3, -4, -5, -5, -2, -1,  0, -4, -1,  7, -4, -3, -3,  0,  3, -2, -4, -4, -2, -6], // F
    [ -1, -3, -3, -3, -4, -2, -2, -3, -3, -4, -4, -2, -3, -4,  8, -2, -2, -5, -4, -3, -3, -2, -2, -6], // P
    [  1, -1,  0, -1, -2, -1, -1, -1, -2, -3, -3, -1, -2, -3, -2,  5,  1, -4, -3, -2,  0, -1, -1, -6], // S
    [  0, -2,  0, -2, -2, -1, -1, -3, -2, -1, -2, -1, -1, -3, -2,  1,  6, -4, -2, -1, -1, -1, -1, -6], // T
    [ -4, -4, -5, -6, -4, -3, -5, -4, -3, -4, -3, -5, -2,  0, -5, -4, -4, 11,  2, -3, -6, -4, -3, -6], // W
    [ -3, -3, -3, -4, -4, -3, -4, -5,  1, -2, -2, -3, -2,  3, -4, -3, -2,  2,  8, -3, -4, -3, -2, -6], // Y
    [ -1, -3, -4, -5, -2, -3, -3, -5, -4,  3,  0, -3,  0, -2, -3, -2, -1, -3, -3,  5, -4, -3, -2, -6], // V
    [ -2, -2,  4,  4, -4, -1,  0, -2, -1, -5, -5, -1, -4, -4, -3,  0, -1, -6, -4, -4,  4,  0, -2, -6], // B
    [ -1,  0, -1,  0, -5,  4,  4, -3,  0, -4, -4,  1, -2, -4, -2, -1, -1, -4, -3, -3,  0,  4, -1, -6], // Z
    [ -1, -2, -2, -2, -3, -1, -2, -2, -2, -2, -2, -1, -1, -2, -2, -1, -1, -3, -2, -2, -2, -1, -2, -6], // X
    [ -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6, -6,  1], // *
];

fn index(aa: u8) -> usize {
    let aa = aa.to_ascii_uppercase();
    ALPHABET
        .iter()
        .position(|&symbol| symbol == aa)
        // anything unrecognised scores as X
        .unwrap_or(22)
}

/// BLOSUM90 score for a pair of residues.
///
/// Lowercase input is accepted. Symbols outside the matrix alphabet score as `X`.
pub fn blosum90(a: u8, b: u8) -> i32 {
    BLOSUM90[index(a)][index(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        for &a in ALPHABET.iter() {
            for &b in ALPHABET.iter() {
                assert_eq!(blosum90(a, b), blosum90(b, a));
            }
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(blosum90(b'A', b'A'), 5);
        assert_eq!(blosum90(b'W', b'W'), 11);
        assert_eq!(blosum90(b'C', b'C'), 9);
        assert_eq!(blosum90(b'D', b'E'), 1);
        assert_eq!(blosum90(b'W', b'D'), -6);
        assert_eq!(blosum90(b'*', b'*'), 1);
        assert_eq!(blosum90(b'a', b'R'), blosum90(b'A', b'R'));
        assert_eq!(blosum90(b'J', b'A'), blosum90(b'X', b'A'));
    }
}
