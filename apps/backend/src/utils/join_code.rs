//! Join code generation for rooms.
//!
//! Join codes are 6-character strings using Crockford's Base32 alphabet,
//! short enough to read out loud and free of look-alike characters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const JOIN_CODE_LEN: usize = 6;

/// Generate a join code from OS randomness.
///
/// Uniqueness is enforced by the rooms.code unique index; creation retries on
/// a conflict.
pub fn generate_join_code() -> String {
    let mut rng = StdRng::from_os_rng();

    let mut s = String::with_capacity(JOIN_CODE_LEN);
    for _ in 0..JOIN_CODE_LEN {
        let idx = rng.random_range(0..CROCKFORD.len());
        s.push(CROCKFORD[idx] as char);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_code_has_expected_length() {
        assert_eq!(generate_join_code().len(), JOIN_CODE_LEN);
    }

    #[test]
    fn join_code_uses_crockford_alphabet() {
        let code = generate_join_code();
        assert!(code.bytes().all(|b| CROCKFORD.contains(&b)));
    }

    #[test]
    fn join_codes_vary() {
        // 32^6 codes; a hundred draws colliding would mean a broken rng
        let codes: std::collections::HashSet<String> =
            (0..100).map(|_| generate_join_code()).collect();
        assert!(codes.len() > 90);
    }
}
