use sqlx::SqlitePool;
use time::Date;
use tracing::debug;
use uuid::Uuid;

use super::repo_types::PrayerRecord;
use super::services::{DayFlags, MergePolicy, PrayerSet};

const COLUMNS: &str = "id, user_id, day, fajr, dhuhr, asr, maghrib, isha";

/// `ON CONFLICT` update clause for each policy. The merge happens inside
/// the single upsert statement, so concurrent writers only queue on
/// SQLite's write lock.
fn merge_clause(policy: MergePolicy) -> &'static str {
    match policy {
        MergePolicy::Union => {
            r#"
                fajr = prayers.fajr OR excluded.fajr,
                dhuhr = prayers.dhuhr OR excluded.dhuhr,
                asr = prayers.asr OR excluded.asr,
                maghrib = prayers.maghrib OR excluded.maghrib,
                isha = prayers.isha OR excluded.isha
            "#
        }
        MergePolicy::Replace => {
            r#"
                fajr = excluded.fajr,
                dhuhr = excluded.dhuhr,
                asr = excluded.asr,
                maghrib = excluded.maghrib,
                isha = excluded.isha
            "#
        }
    }
}

impl PrayerRecord {
    /// The record for one day, if anything was marked on it.
    pub async fn get_for_date(
        db: &SqlitePool,
        user_id: Uuid,
        day: Date,
    ) -> sqlx::Result<Option<PrayerRecord>> {
        sqlx::query_as::<_, PrayerRecord>(&format!(
            "SELECT {COLUMNS} FROM prayers WHERE user_id = ?1 AND day = ?2"
        ))
        .bind(user_id)
        .bind(day)
        .fetch_optional(db)
        .await
    }

    /// Records with `start <= day <= end`, oldest first.
    pub async fn get_range(
        db: &SqlitePool,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> sqlx::Result<Vec<PrayerRecord>> {
        if start > end {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, PrayerRecord>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM prayers
            WHERE user_id = ?1 AND day >= ?2 AND day <= ?3
            ORDER BY day ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
    }

    /// Merges `asserted` into the day's record, creating it if needed.
    ///
    /// One statement: a new day gets exactly the asserted flags, an existing
    /// day is merged per `policy`. The `(user_id, day)` constraint keeps a
    /// single row per day and the row keeps its original id.
    pub async fn upsert_day(
        db: &SqlitePool,
        user_id: Uuid,
        day: Date,
        asserted: PrayerSet,
        policy: MergePolicy,
    ) -> sqlx::Result<PrayerRecord> {
        let flags = DayFlags::from_set(asserted);
        let record = sqlx::query_as::<_, PrayerRecord>(&format!(
            r#"
            INSERT INTO prayers ({COLUMNS})
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (user_id, day) DO UPDATE SET {merge}
            RETURNING {COLUMNS}
            "#,
            merge = merge_clause(policy),
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(day)
        .bind(flags.fajr)
        .bind(flags.dhuhr)
        .bind(flags.asr)
        .bind(flags.maghrib)
        .bind(flags.isha)
        .fetch_one(db)
        .await?;

        debug!(%user_id, %day, ?policy, marked = record.flags().count(), "prayer day upserted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::db;
    use crate::prayers::services::{reconcile, PrayerName};
    use time::macros::date;

    async fn setup() -> (SqlitePool, Uuid) {
        let pool = db::connect_in_memory().await.expect("in-memory db");
        let user = User::create(&pool, "ali", "ali@x.com", "hash", Some("Toshkent"))
            .await
            .expect("user");
        (pool, user.id)
    }

    fn set(ps: &[PrayerName]) -> PrayerSet {
        ps.iter().copied().collect()
    }

    async fn mark(pool: &SqlitePool, uid: Uuid, day: Date, ps: &[PrayerName]) -> PrayerRecord {
        PrayerRecord::upsert_day(pool, uid, day, set(ps), MergePolicy::Union)
            .await
            .expect("upsert")
    }

    async fn save(pool: &SqlitePool, uid: Uuid, day: Date, ps: &[PrayerName]) -> PrayerRecord {
        PrayerRecord::upsert_day(pool, uid, day, set(ps), MergePolicy::Replace)
            .await
            .expect("upsert")
    }

    #[tokio::test]
    async fn union_policy_accumulates_flags() {
        let (pool, uid) = setup().await;
        let day = date!(2025 - 03 - 01);

        mark(&pool, uid, day, &[PrayerName::Fajr]).await;
        let rec = mark(&pool, uid, day, &[PrayerName::Asr, PrayerName::Isha]).await;

        assert!(rec.fajr && rec.asr && rec.isha);
        assert!(!rec.dhuhr && !rec.maghrib);
    }

    #[tokio::test]
    async fn union_with_nothing_asserted_keeps_the_day() {
        let (pool, uid) = setup().await;
        let day = date!(2025 - 03 - 01);

        mark(&pool, uid, day, &[PrayerName::Maghrib]).await;
        let rec = mark(&pool, uid, day, &[]).await;
        assert!(rec.maghrib);
        assert_eq!(rec.flags().count(), 1);
    }

    #[tokio::test]
    async fn replace_policy_overwrites_flags() {
        let (pool, uid) = setup().await;
        let day = date!(2025 - 03 - 01);

        save(&pool, uid, day, &[PrayerName::Fajr, PrayerName::Dhuhr]).await;
        let rec = save(&pool, uid, day, &[PrayerName::Asr]).await;

        assert_eq!(rec.flags().count(), 1);
        assert!(rec.asr);
    }

    #[tokio::test]
    async fn repeated_upserts_keep_one_row_per_day() {
        let (pool, uid) = setup().await;
        let day = date!(2025 - 03 - 01);
        let first = mark(&pool, uid, day, &[PrayerName::Fajr]).await;
        let second = save(&pool, uid, day, &[PrayerName::Isha]).await;
        assert_eq!(first.id, second.id);

        let rows = PrayerRecord::get_range(&pool, uid, day, day).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn get_for_date_returns_none_for_untouched_day() {
        let (pool, uid) = setup().await;
        let got = PrayerRecord::get_for_date(&pool, uid, date!(2025 - 03 - 02))
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn range_is_inclusive_and_ordered() {
        let (pool, uid) = setup().await;
        for d in [
            date!(2025 - 03 - 05),
            date!(2025 - 03 - 01),
            date!(2025 - 03 - 03),
            date!(2025 - 02 - 28),
        ] {
            mark(&pool, uid, d, &[PrayerName::Fajr]).await;
        }

        let rows = PrayerRecord::get_range(&pool, uid, date!(2025 - 03 - 01), date!(2025 - 03 - 05))
            .await
            .unwrap();
        let days: Vec<_> = rows.iter().map(|r| r.day).collect();
        assert_eq!(
            days,
            vec![date!(2025 - 03 - 01), date!(2025 - 03 - 03), date!(2025 - 03 - 05)]
        );
    }

    #[tokio::test]
    async fn inverted_range_is_empty() {
        let (pool, uid) = setup().await;
        mark(&pool, uid, date!(2025 - 03 - 02), &[PrayerName::Fajr]).await;
        let rows = PrayerRecord::get_range(&pool, uid, date!(2025 - 03 - 05), date!(2025 - 03 - 01))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn range_only_sees_own_records() {
        let (pool, uid) = setup().await;
        let other = User::create(&pool, "vali", "vali@x.com", "hash", None)
            .await
            .unwrap();
        let day = date!(2025 - 03 - 01);
        mark(&pool, other.id, day, &[PrayerName::Fajr]).await;

        let rows = PrayerRecord::get_range(&pool, uid, day, day).await.unwrap();
        assert!(rows.is_empty());
    }

    /// File-backed pool with several connections, so writers really race.
    async fn file_pool(dir: &tempfile::TempDir) -> SqlitePool {
        let url = format!("sqlite://{}", dir.path().join("namoz.db").display());
        let pool = db::connect(&url).await.expect("file db");
        db::migrate(&pool).await.expect("migrate");
        pool
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_marks_on_one_day_all_land() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = file_pool(&dir).await;
        let uid = User::create(&pool, "ali", "ali@x.com", "hash", None)
            .await
            .unwrap()
            .id;

        for round in 0..10u8 {
            let day = date!(2025 - 03 - 01) + time::Duration::days(i64::from(round));
            let mut tasks = tokio::task::JoinSet::new();
            for p in PrayerName::ALL {
                let pool = pool.clone();
                tasks.spawn(async move {
                    PrayerRecord::upsert_day(&pool, uid, day, set(&[p]), MergePolicy::Union).await
                });
            }
            while let Some(joined) = tasks.join_next().await {
                joined.expect("task").expect("concurrent upsert succeeds");
            }

            let expected = PrayerName::ALL
                .into_iter()
                .fold(None, |acc, p| Some(reconcile(acc, set(&[p]), MergePolicy::Union)));
            let stored = PrayerRecord::get_for_date(&pool, uid, day)
                .await
                .unwrap()
                .expect("row");
            assert_eq!(Some(stored.flags()), expected);
            assert_eq!(stored.flags().count(), 5);
        }

        let all = PrayerRecord::get_range(&pool, uid, date!(2025 - 03 - 01), date!(2025 - 03 - 10))
            .await
            .unwrap();
        assert_eq!(all.len(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_leave_one_submitted_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = file_pool(&dir).await;
        let uid = User::create(&pool, "ali", "ali@x.com", "hash", None)
            .await
            .unwrap()
            .id;
        let day = date!(2025 - 03 - 01);

        let mut tasks = tokio::task::JoinSet::new();
        for p in PrayerName::ALL {
            let pool = pool.clone();
            tasks.spawn(async move {
                PrayerRecord::upsert_day(&pool, uid, day, set(&[p]), MergePolicy::Replace).await
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.expect("task").expect("concurrent upsert succeeds");
        }

        let rows = PrayerRecord::get_range(&pool, uid, day, day).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].flags().count(), 1);
    }
}
