pub mod random;

pub use random::RandomGenerator;

use burrow_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// A candidate may already be taken; the allocator detects that through the
/// repository and asks for another one.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Produces the next candidate code.
    fn generate(&self) -> Self::Output;
}

impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    type Output = G::Output;

    fn generate(&self) -> Self::Output {
        (**self).generate()
    }
}
