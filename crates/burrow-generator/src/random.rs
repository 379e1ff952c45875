use crate::Generator;
use burrow_core::shortcode::{ALPHABET, DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH};
use burrow_core::ShortCode;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Draws fixed-length codes uniformly from the 62-symbol alphabet.
///
/// The default source is [`StdRng`] seeded from the operating system, a
/// cryptographically secure generator, so codes are not guessable from one
/// another. Tests can inject any [`RngCore`] with [`RandomGenerator::with_rng`].
#[derive(Debug)]
pub struct RandomGenerator<R = StdRng> {
    rng: Mutex<R>,
    length: usize,
}

impl RandomGenerator<StdRng> {
    /// Creates a generator producing codes of `length` characters.
    ///
    /// `length` is clamped into the range a [`ShortCode`] accepts.
    pub fn new(length: usize) -> Self {
        Self::with_rng(StdRng::from_os_rng(), length)
    }
}

impl Default for RandomGenerator<StdRng> {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl<R: RngCore> RandomGenerator<R> {
    pub fn with_rng(rng: R, length: usize) -> Self {
        Self {
            rng: Mutex::new(rng),
            length: length.clamp(MIN_LENGTH, MAX_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn next_code(&self) -> String {
        let mut rng = self.rng.lock();
        (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl<R: RngCore + Send + 'static> Generator for RandomGenerator<R> {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        ShortCode::new_unchecked(self.next_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_codes_of_requested_length() {
        let generator = RandomGenerator::new(8);
        for _ in 0..100 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 8);
            assert!(ShortCode::parse(code.as_str(), 8).is_ok());
        }
    }

    #[test]
    fn default_length_is_six() {
        let generator: RandomGenerator = RandomGenerator::default();
        assert_eq!(generator.length(), 6);
        assert_eq!(generator.generate().as_str().len(), 6);
    }

    #[test]
    fn length_is_clamped() {
        assert_eq!(RandomGenerator::new(1).length(), MIN_LENGTH);
        assert_eq!(RandomGenerator::new(64).length(), MAX_LENGTH);
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let a = RandomGenerator::with_rng(StdRng::seed_from_u64(42), 6);
        let b = RandomGenerator::with_rng(StdRng::seed_from_u64(42), 6);

        let first: Vec<_> = (0..5).map(|_| a.generate()).collect();
        let second: Vec<_> = (0..5).map(|_| b.generate()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn codes_do_not_repeat_in_practice() {
        let generator = RandomGenerator::new(8);
        let codes: HashSet<_> = (0..10_000).map(|_| generator.generate()).collect();
        assert_eq!(codes.len(), 10_000);
    }

    #[test]
    fn uses_the_whole_alphabet() {
        let generator = RandomGenerator::with_rng(StdRng::seed_from_u64(7), 16);
        let seen: HashSet<char> = (0..500)
            .flat_map(|_| generator.generate().as_str().chars().collect::<Vec<_>>())
            .collect();
        assert_eq!(seen.len(), ALPHABET.len());
    }
}
