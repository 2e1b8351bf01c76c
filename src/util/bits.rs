//! Bit set helpers on top of `bit-vec`.

use bit_vec::BitVec;

const BLOCK_BITS: usize = u32::BITS as usize;

/// Return the index of the first set bit at or after `from`.
pub fn next_set_bit(bits: &BitVec, from: usize) -> Option<usize> {
    if from >= bits.len() {
        return None;
    }

    let storage = bits.storage();
    let mut block = from / BLOCK_BITS;
    let mut word = storage[block] & (u32::MAX << (from % BLOCK_BITS));

    loop {
        if word != 0 {
            let index = block * BLOCK_BITS + word.trailing_zeros() as usize;
            return (index < bits.len()).then_some(index);
        }
        block += 1;
        if block >= storage.len() {
            return None;
        }
        word = storage[block];
    }
}

/// Count the set bits.
pub fn cardinality(bits: &BitVec) -> usize {
    bits.storage()
        .iter()
        .map(|block| block.count_ones() as usize)
        .sum()
}
