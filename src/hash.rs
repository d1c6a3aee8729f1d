//! Name to variable-id hashing shared with the runtime.
//!
//! The runtime looks late-bound variables up by `CRC-32(name)` (IEEE polynomial, reflected),
//! the same value Go's `hash/crc32.ChecksumIEEE` computes.

use once_cell::sync::Lazy;

static CRC_TABLE: Lazy<[u32; 256]> = Lazy::new(|| {
    let mut table = [0u32; 256];
    for (n, entry) in table.iter_mut().enumerate() {
        let mut c = n as u32;
        for _ in 0..8 {
            c = if c & 1 != 0 {
                0xEDB8_8320 ^ (c >> 1)
            } else {
                c >> 1
            };
        }
        *entry = c;
    }
    table
});

pub fn make_variable_id(name: &str) -> u32 {
    !name.bytes().fold(!0u32, |crc, byte| {
        CRC_TABLE[((crc ^ byte as u32) & 0xff) as usize] ^ (crc >> 8)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_known_ids() {
        assert_eq!(make_variable_id(""), 0);
        assert_eq!(make_variable_id("hp"), 3170402924);
        assert_eq!(make_variable_id("count"), 2245608546);
    }
}
