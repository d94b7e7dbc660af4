//! Quiz code generation.

use std::collections::HashSet;

use quizmaster_core::error::DomainError;
use quizmaster_core::rng::DeterministicRng;

/// Characters a generated code is drawn from.
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default length of a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Candidates tried before giving up with `CodeSpaceExhausted`.
pub const MAX_CODE_ATTEMPTS: u32 = 64;

/// Draws a code of `length` characters that is not in `taken`.
///
/// `taken` must hold normalized (upper-case) codes.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a zero length and
/// `DomainError::CodeSpaceExhausted` when every candidate collided.
pub fn create_code(
    taken: &HashSet<String>,
    length: usize,
    rng: &mut dyn DeterministicRng,
) -> Result<String, DomainError> {
    if length == 0 {
        return Err(DomainError::validation("code length must be positive"));
    }

    #[allow(clippy::cast_possible_truncation)]
    let max_index = (CODE_ALPHABET.len() - 1) as u32;

    for _ in 0..MAX_CODE_ATTEMPTS {
        let candidate: String = (0..length)
            .map(|_| char::from(CODE_ALPHABET[rng.next_u32_range(0, max_index) as usize]))
            .collect();
        if !taken.contains(&candidate) {
            return Ok(candidate);
        }
    }

    Err(DomainError::CodeSpaceExhausted {
        attempts: MAX_CODE_ATTEMPTS,
    })
}
