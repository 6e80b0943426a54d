//! CardRepository trait definition.

use arcana_types::card::Card;
use arcana_types::error::RepositoryError;

pub trait CardRepository: Send + Sync {
    /// Add a card. A name already in the deck (ignoring case) yields
    /// `RepositoryError::Conflict`.
    fn create(
        &self,
        card: &Card,
    ) -> impl std::future::Future<Output = Result<Card, RepositoryError>> + Send;

    /// One page of the deck ordered by name, plus the deck size.
    fn page(
        &self,
        limit: u32,
        offset: u64,
    ) -> impl std::future::Future<Output = Result<(Vec<Card>, u64), RepositoryError>> + Send;

    /// The whole deck, in no particular order.
    fn all(&self) -> impl std::future::Future<Output = Result<Vec<Card>, RepositoryError>> + Send;

    /// The cards whose names match any of `names`, ignoring case.
    fn find_by_names(
        &self,
        names: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Card>, RepositoryError>> + Send;
}
