//! Daily horoscope generation, lookup, and translation.
//!
//! A user's horoscope for a day is generated on first request and stored;
//! later requests for the same day reuse it. "Today" is evaluated at the
//! configured UTC offset. Requests in a non-canonical language are served
//! from the translation cache, filled on miss. A daily run can generate
//! today's reading ahead of time for every user.

use arcana_types::error::{HoroscopeError, RepositoryError};
use arcana_types::horoscope::{Horoscope, HoroscopeReading, Language, LocalizedHoroscope};
use arcana_types::user::User;
use chrono::{DateTime, Days, FixedOffset, NaiveDate, Offset, Utc};
use tracing::{debug, info, warn};

use super::repository::HoroscopeRepository;
use crate::oracle::Oracle;

/// Outcome of a [`HoroscopeService::pregenerate`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PregenerationReport {
    /// Users who have today's reading after the run.
    pub ready: u64,
    pub failed: u64,
}

pub struct HoroscopeService<H: HoroscopeRepository, O: Oracle> {
    repo: H,
    oracle: O,
    offset: FixedOffset,
    /// Days served and kept, today included.
    window_days: u32,
}

impl<H: HoroscopeRepository, O: Oracle> HoroscopeService<H, O> {
    pub fn new(repo: H, oracle: O, utc_offset_hours: i32, window_days: u32) -> Self {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(utc_offset_hours, "invalid UTC offset, falling back to UTC");
                Utc.fix()
            });
        Self {
            repo,
            oracle,
            offset,
            window_days: window_days.max(1),
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The calendar date at `now` in the configured offset.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    fn window(&self, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
        let today = self.today(now);
        let first = today
            .checked_sub_days(Days::new(u64::from(self.window_days - 1)))
            .unwrap_or(NaiveDate::MIN);
        (first, today)
    }

    /// The user's horoscope for `date`, generating it if needed.
    pub async fn for_date(
        &self,
        user: &User,
        date: NaiveDate,
        language: Language,
        now: DateTime<Utc>,
    ) -> Result<LocalizedHoroscope, HoroscopeError> {
        let (first, last) = self.window(now);
        if date < first || date > last {
            return Err(HoroscopeError::DateOutOfRange(date.to_string()));
        }
        let horoscope = self.get_or_generate(user, date).await?;
        self.localize(horoscope, language).await
    }

    /// Today's and the previous days' horoscopes, newest first.
    pub async fn recent(
        &self,
        user: &User,
        language: Language,
        now: DateTime<Utc>,
    ) -> Result<Vec<LocalizedHoroscope>, HoroscopeError> {
        let today = self.today(now);
        let mut horoscopes = Vec::with_capacity(self.window_days as usize);
        for back in 0..self.window_days {
            let Some(date) = today.checked_sub_days(Days::new(u64::from(back))) else {
                break;
            };
            let horoscope = self.get_or_generate(user, date).await?;
            horoscopes.push(self.localize(horoscope, language).await?);
        }
        Ok(horoscopes)
    }

    /// Delete horoscopes that fell out of the window.
    pub async fn cleanup(&self, now: DateTime<Utc>) -> Result<u64, HoroscopeError> {
        let cutoff = self
            .today(now)
            .checked_sub_days(Days::new(u64::from(self.window_days)))
            .unwrap_or(NaiveDate::MIN);
        let deleted = self.repo.delete_through(cutoff).await?;
        info!(deleted, %cutoff, "horoscope cleanup finished");
        Ok(deleted)
    }

    /// Make sure each user has today's reading in the canonical language.
    ///
    /// Readings that already exist are left alone. A failure for one user is
    /// logged and the run moves on.
    pub async fn pregenerate(&self, users: &[User], now: DateTime<Utc>) -> PregenerationReport {
        let today = self.today(now);
        let mut report = PregenerationReport::default();
        for user in users {
            match self.get_or_generate(user, today).await {
                Ok(_) => report.ready += 1,
                Err(e) => {
                    warn!(user_id = %user.id, date = %today, error = %e, "horoscope pre-generation failed");
                    report.failed += 1;
                }
            }
        }
        info!(ready = report.ready, failed = report.failed, date = %today, "horoscope pre-generation finished");
        report
    }

    async fn get_or_generate(&self, user: &User, date: NaiveDate) -> Result<Horoscope, HoroscopeError> {
        if let Some(existing) = self.repo.get(&user.id, date).await? {
            return Ok(existing);
        }
        let profile = user.reader_profile().ok_or(HoroscopeError::NoProfile)?;

        let reading = self.oracle.generate_horoscope(&profile, date).await?;
        let horoscope = Horoscope::new(user.id, date, reading);
        match self.repo.insert(&horoscope).await {
            Ok(stored) => {
                info!(user_id = %user.id, %date, "horoscope generated");
                Ok(stored)
            }
            // A concurrent request generated the same day first.
            Err(RepositoryError::Conflict(_)) => self
                .repo
                .get(&user.id, date)
                .await?
                .ok_or(HoroscopeError::Repository(RepositoryError::NotFound)),
            Err(e) => Err(e.into()),
        }
    }

    async fn localize(
        &self,
        horoscope: Horoscope,
        language: Language,
    ) -> Result<LocalizedHoroscope, HoroscopeError> {
        let reading = if language.is_canonical() {
            horoscope.reading
        } else {
            self.translated(&horoscope, language).await?
        };
        Ok(LocalizedHoroscope {
            id: horoscope.id,
            date: horoscope.date,
            language,
            reading,
        })
    }

    async fn translated(
        &self,
        horoscope: &Horoscope,
        language: Language,
    ) -> Result<HoroscopeReading, HoroscopeError> {
        if let Some(cached) = self.repo.get_translation(&horoscope.id, language).await? {
            debug!(horoscope_id = %horoscope.id, %language, "translation cache hit");
            return Ok(cached);
        }
        let reading = self
            .oracle
            .translate_reading(&horoscope.reading, Language::CANONICAL, language)
            .await?;
        self.repo
            .put_translation(&horoscope.id, language, &reading)
            .await?;
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockHoroscopeRepository, ScriptedOracle, admin_user, app_user};
    use std::sync::atomic::Ordering;

    fn service(repo: MockHoroscopeRepository) -> HoroscopeService<MockHoroscopeRepository, ScriptedOracle> {
        HoroscopeService::new(repo, ScriptedOracle::default(), 7, 3)
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_uses_configured_offset() {
        let service = service(MockHoroscopeRepository::default());
        assert_eq!(service.today(at("2025-03-01T16:59:00Z")), date(2025, 3, 1));
        assert_eq!(service.today(at("2025-03-01T17:00:00Z")), date(2025, 3, 2));
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        for hours in [i32::MAX, -30] {
            let service = HoroscopeService::new(
                MockHoroscopeRepository::default(),
                ScriptedOracle::default(),
                hours,
                3,
            );
            assert_eq!(service.today(at("2025-03-01T23:30:00Z")), date(2025, 3, 1));
        }
    }

    #[tokio::test]
    async fn generated_once_per_day() {
        let repo = MockHoroscopeRepository::default();
        let service = service(repo.clone());
        let user = app_user(0);
        let now = at("2025-03-01T03:00:00Z");

        let first = service.for_date(&user, date(2025, 3, 1), Language::Vi, now).await.unwrap();
        let second = service.for_date(&user, date(2025, 3, 1), Language::Vi, now).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.reading.summary, "vi 2025-03-01");
        assert_eq!(service.oracle().horoscopes_generated.load(Ordering::SeqCst), 1);
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn translations_are_cached_but_canonical_is_not() {
        let repo = MockHoroscopeRepository::default();
        let service = service(repo.clone());
        let user = app_user(0);
        let now = at("2025-03-01T03:00:00Z");
        let day = date(2025, 3, 1);

        service.for_date(&user, day, Language::Vi, now).await.unwrap();
        assert_eq!(repo.cached_translations(), 0);

        let en = service.for_date(&user, day, Language::En, now).await.unwrap();
        let again = service.for_date(&user, day, Language::En, now).await.unwrap();
        assert_eq!(en.language, Language::En);
        assert_eq!(en.reading.summary, "en: vi 2025-03-01");
        assert_eq!(again.reading, en.reading);
        assert_eq!(service.oracle().translations.load(Ordering::SeqCst), 1);
        assert_eq!(repo.cached_translations(), 1);
    }

    #[tokio::test]
    async fn dates_outside_window_are_refused() {
        let service = service(MockHoroscopeRepository::default());
        let user = app_user(0);
        let now = at("2025-03-05T03:00:00Z");

        for day in [date(2025, 3, 2), date(2025, 3, 6)] {
            let err = service.for_date(&user, day, Language::Vi, now).await.unwrap_err();
            assert!(matches!(err, HoroscopeError::DateOutOfRange(_)));
        }
        assert!(service.for_date(&user, date(2025, 3, 3), Language::Vi, now).await.is_ok());
    }

    #[tokio::test]
    async fn admins_have_no_horoscope() {
        let service = service(MockHoroscopeRepository::default());
        let err = service
            .recent(&admin_user(), Language::Vi, at("2025-03-05T03:00:00Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, HoroscopeError::NoProfile));
    }

    #[tokio::test]
    async fn recent_covers_window_newest_first() {
        let service = service(MockHoroscopeRepository::default());
        let recent = service
            .recent(&app_user(0), Language::Vi, at("2025-03-05T03:00:00Z"))
            .await
            .unwrap();
        let dates: Vec<_> = recent.iter().map(|h| h.date).collect();
        assert_eq!(dates, vec![date(2025, 3, 5), date(2025, 3, 4), date(2025, 3, 3)]);
    }

    #[tokio::test]
    async fn cleanup_drops_days_outside_window() {
        let repo = MockHoroscopeRepository::default();
        let service = service(repo.clone());
        let user = app_user(0);
        service
            .recent(&user, Language::En, at("2025-03-05T03:00:00Z"))
            .await
            .unwrap();
        assert_eq!(repo.count(), 3);

        // Two days later only the 5th is still inside the window.
        let deleted = service.cleanup(at("2025-03-07T03:00:00Z")).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(repo.count(), 1);
        assert_eq!(repo.cached_translations(), 1);
    }

    #[tokio::test]
    async fn pregenerate_fills_today_once_and_skips_failures() {
        let repo = MockHoroscopeRepository::default();
        let service = service(repo.clone());
        let (lan, minh) = (app_user(0), app_user(0));
        let now = at("2025-03-01T17:10:00Z");

        service.for_date(&minh, date(2025, 3, 2), Language::Vi, now).await.unwrap();
        assert_eq!(service.oracle().horoscopes_generated.load(Ordering::SeqCst), 1);

        let report = service.pregenerate(&[lan.clone(), minh, admin_user()], now).await;
        assert_eq!(report, PregenerationReport { ready: 2, failed: 1 });
        assert_eq!(service.oracle().horoscopes_generated.load(Ordering::SeqCst), 2);
        assert!(repo.get(&lan.id, date(2025, 3, 2)).await.unwrap().is_some());

        let again = service.pregenerate(&[lan], now).await;
        assert_eq!(again, PregenerationReport { ready: 1, failed: 0 });
        assert_eq!(service.oracle().horoscopes_generated.load(Ordering::SeqCst), 2);
    }
}
