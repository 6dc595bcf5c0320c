/// Sum of all bytes modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn wraps_modulo_256() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
        assert_eq!(checksum(&[0x03; 15]), 45);
    }

    proptest! {
        #[test]
        fn permutation_does_not_change_checksum(
            bytes in prop::collection::vec(any::<u8>(), 0..64),
            seed in any::<u64>(),
        ) {
            let mut shuffled = bytes.clone();
            // Deterministic Fisher-Yates driven by the seed.
            let mut state = seed;
            for i in (1..shuffled.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }
            prop_assert_eq!(checksum(&bytes), checksum(&shuffled));
        }

        #[test]
        fn single_bit_flip_is_detected(
            bytes in prop::collection::vec(any::<u8>(), 1..64),
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut flipped = bytes.clone();
            let i = index.index(flipped.len());
            flipped[i] ^= 1 << bit;
            prop_assert_ne!(checksum(&bytes), checksum(&flipped));
        }
    }
}
