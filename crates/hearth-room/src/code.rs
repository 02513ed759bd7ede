//! Room code generation.

use hearth_protocol::RoomCode;
use rand::Rng;

/// The characters room codes are drawn from: uppercase letters and
/// digits, per the wire contract. Codes are read aloud between humans,
/// so a future refinement could drop confusable glyphs (O/0, I/1) —
/// that changes the alphabet only, nothing else.
pub(crate) const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws one candidate code of the given length, uniformly at random.
///
/// Uniqueness is not this function's job: the store retries under its
/// lock until the candidate is absent.
pub(crate) fn random_code(length: usize) -> RoomCode {
    let mut rng = rand::rng();
    let code: String = (0..length)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    RoomCode::new(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_code_has_requested_length() {
        assert_eq!(random_code(6).as_str().len(), 6);
        assert_eq!(random_code(1).as_str().len(), 1);
        assert_eq!(random_code(12).as_str().len(), 12);
    }

    #[test]
    fn test_random_code_stays_within_alphabet() {
        for _ in 0..100 {
            let code = random_code(6);
            assert!(
                code.as_str()
                    .bytes()
                    .all(|b| CODE_ALPHABET.contains(&b)),
                "code {code} contains a character outside [A-Z0-9]"
            );
        }
    }
}
