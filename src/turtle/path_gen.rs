use fastrand::Rng;

// we need more movements than turns
const TOKENS: [char; 6] = ['M', 'R', 'M', 'L', 'M', 'M'];
const MAX_LENGTH: usize = 32768;

/// Random command string of `length` symbols, at least one and at most 32768.
pub fn generate_path(rng: &mut Rng, length: usize) -> String {
    let length = length.clamp(1, MAX_LENGTH);
    (0..length)
        .map(|_| TOKENS[rng.usize(..TOKENS.len())])
        .collect()
}
