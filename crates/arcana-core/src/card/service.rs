use arcana_types::card::{Card, CardPage};
use arcana_types::chat::Paging;
use arcana_types::error::{CardError, RepositoryError};
use rand::seq::SliceRandom;
use tracing::info;

use super::repository::CardRepository;

pub const MAX_PAGE_SIZE: u32 = 100;

pub struct CardService<K: CardRepository> {
    repo: K,
}

impl<K: CardRepository> CardService<K> {
    pub fn new(repo: K) -> Self {
        Self { repo }
    }

    pub async fn create(&self, name: &str, image: Option<String>) -> Result<Card, CardError> {
        let card = Card::new(name, image)?;
        let card = self.repo.create(&card).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => CardError::NameConflict(card.name.clone()),
            other => other.into(),
        })?;
        info!(card_id = %card.id, name = %card.name, "card added to deck");
        Ok(card)
    }

    /// One page of the deck, ordered by name. `page` is 1-based; the size is
    /// clamped to `1..=MAX_PAGE_SIZE`.
    pub async fn page(&self, page: u32, page_size: u32) -> Result<CardPage, CardError> {
        let limit = page_size.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);
        let offset = u64::from(page - 1) * u64::from(limit);
        let (cards, total) = self.repo.page(limit, offset).await?;
        Ok(CardPage {
            cards,
            paging: Paging::new(page, limit, total),
        })
    }

    /// The whole deck in a fresh random order, ready to draw from.
    pub async fn shuffled(&self) -> Result<Vec<Card>, CardError> {
        let mut deck = self.repo.all().await?;
        deck.shuffle(&mut rand::thread_rng());
        Ok(deck)
    }
}
