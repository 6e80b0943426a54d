//! HoroscopeRepository trait definition.
//!
//! Translations are an explicit cache keyed by `(horoscope_id, language)`;
//! the canonical Vietnamese reading is stored on the horoscope itself.

use arcana_types::error::RepositoryError;
use arcana_types::horoscope::{Horoscope, HoroscopeReading, Language};
use chrono::NaiveDate;
use uuid::Uuid;

pub trait HoroscopeRepository: Send + Sync {
    fn get(
        &self,
        user_id: &Uuid,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Option<Horoscope>, RepositoryError>> + Send;

    /// Insert a horoscope. An existing `(user_id, date)` pair yields
    /// `RepositoryError::Conflict`.
    fn insert(
        &self,
        horoscope: &Horoscope,
    ) -> impl std::future::Future<Output = Result<Horoscope, RepositoryError>> + Send;

    fn get_translation(
        &self,
        horoscope_id: &Uuid,
        language: Language,
    ) -> impl std::future::Future<Output = Result<Option<HoroscopeReading>, RepositoryError>> + Send;

    /// Store (or replace) a cached translation.
    fn put_translation(
        &self,
        horoscope_id: &Uuid,
        language: Language,
        reading: &HoroscopeReading,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete horoscopes dated on or before `date`, translations included.
    fn delete_through(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
