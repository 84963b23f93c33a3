// src/services/dashboard_service.rs

use chrono::{Datelike, Local, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{
        AggregateSummary, AmountWindow, CountWindow, DueBuckets, DueEntry, DueRow, DueTransaction,
        OutstandingWindow,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    /// Month-bucketed financial summary: loan totals, contract counts and
    /// collected totals for the reporting month (default: the current
    /// one), the month before it and all time, plus the outstanding
    /// balance across active contracts.
    pub async fn aggregate<'e, A>(
        &self,
        conn: A,
        as_of: Option<NaiveDate>,
    ) -> Result<AggregateSummary, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let anchor = as_of.unwrap_or_else(|| Local::now().date_naive());
        let (previous_start, current_start, next_start) = month_windows(anchor);

        let (contracts, collected, outstanding) = self
            .repo
            .fetch_totals(conn, previous_start, current_start, next_start)
            .await?;

        Ok(AggregateSummary {
            total_loans: AmountWindow {
                current: contracts.current_amount,
                previous: contracts.previous_amount,
                all: contracts.all_amount,
                change: percentage_change(contracts.current_amount, contracts.previous_amount),
            },
            total_contracts: CountWindow {
                current: contracts.current_count,
                previous: contracts.previous_count,
                all: contracts.all_count,
                change: percentage_change(
                    Decimal::from(contracts.current_count),
                    Decimal::from(contracts.previous_count),
                ),
            },
            total_collected: AmountWindow {
                current: collected.current_collected,
                previous: collected.previous_collected,
                all: collected.all_collected,
                change: percentage_change(
                    collected.current_collected,
                    collected.previous_collected,
                ),
            },
            currently_loaned: OutstandingWindow {
                current: outstanding,
                all: outstanding,
            },
        })
    }

    /// Buckets unpaid installments into overdue / due today / upcoming
    /// tomorrow for the operational dashboard. Installments due later
    /// than tomorrow are simply not surfaced.
    pub async fn due_schedule<'e, E>(&self, executor: E) -> Result<DueBuckets, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self.repo.fetch_due_rows(executor).await?;
        let today = Local::now().date_naive();
        Ok(classify_rows(rows, today))
    }
}

/// Month-over-month delta in percent. A zero previous period reads as a
/// 100% jump when the current one is non-zero, and 0 otherwise.
pub fn percentage_change(current: Decimal, previous: Decimal) -> f64 {
    if previous > Decimal::ZERO {
        ((current - previous) / previous * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0)
    } else if current > Decimal::ZERO {
        100.0
    } else {
        0.0
    }
}

/// Calendar-month boundaries around `today`:
/// (start of previous month, start of this month, start of next month).
pub fn month_windows(today: NaiveDate) -> (NaiveDate, NaiveDate, NaiveDate) {
    let current_start = today.with_day0(0).unwrap_or(today);
    let previous_start = current_start
        .checked_sub_months(Months::new(1))
        .unwrap_or(current_start);
    let next_start = current_start
        .checked_add_months(Months::new(1))
        .unwrap_or(current_start);
    (previous_start, current_start, next_start)
}

fn classify_rows(rows: Vec<DueRow>, today: NaiveDate) -> DueBuckets {
    let tomorrow = today.succ_opt().unwrap_or(today);
    let mut buckets = DueBuckets::default();

    for row in rows {
        let due_date = row.due_date;
        let entry = DueEntry {
            id: row.contract_id,
            contract_code: row.contract_code,
            contract_date: row.contract_date,
            customer_name: row.customer_name,
            customer_phone: row
                .phones
                .first()
                .map(|p| p.number.clone())
                .unwrap_or_default(),
            transaction: DueTransaction {
                id: row.transaction_id,
                amount: row.amount,
                partial_amount: row.partial_amount,
                due_date,
                status: row.paid_status,
            },
        };

        if due_date < today {
            buckets.overdue.push(entry);
        } else if due_date == today {
            buckets.due.push(entry);
        } else if due_date == tomorrow {
            buckets.upcoming.push(entry);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::PaidStatus;
    use crate::models::user::Phone;
    use chrono::Duration;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(dec!(120), dec!(100), 20.0)]
    #[case(dec!(0), dec!(0), 0.0)]
    #[case(dec!(50), dec!(0), 100.0)]
    #[case(dec!(100), dec!(100), 0.0)]
    #[case(dec!(50), dec!(100), -50.0)]
    fn percentage_change_policy(
        #[case] current: Decimal,
        #[case] previous: Decimal,
        #[case] expected: f64,
    ) {
        assert_eq!(percentage_change(current, previous), expected);
    }

    #[test]
    fn month_windows_are_calendar_boundaries() {
        let (prev, curr, next) = month_windows(date(2025, 8, 17));
        assert_eq!(prev, date(2025, 7, 1));
        assert_eq!(curr, date(2025, 8, 1));
        assert_eq!(next, date(2025, 9, 1));
    }

    #[test]
    fn month_windows_cross_the_year_boundary() {
        let (prev, curr, next) = month_windows(date(2025, 1, 5));
        assert_eq!(prev, date(2024, 12, 1));
        assert_eq!(curr, date(2025, 1, 1));
        assert_eq!(next, date(2025, 2, 1));
    }

    fn due_row(due_date: NaiveDate, phones: Vec<Phone>) -> DueRow {
        DueRow {
            transaction_id: Uuid::new_v4(),
            amount: dec!(270_000),
            partial_amount: dec!(0),
            due_date,
            paid_status: PaidStatus::NotPaid,
            contract_id: Uuid::new_v4(),
            contract_code: "HD-001".to_string(),
            contract_date: due_date - Duration::days(7),
            customer_name: "Nguyen Van A".to_string(),
            phones: Json(phones),
        }
    }

    #[test]
    fn buckets_split_on_midnight_boundaries() {
        let today = date(2025, 8, 17);
        let rows = vec![
            due_row(today - Duration::days(1), vec![]), // yesterday
            due_row(today, vec![]),                     // today
            due_row(today + Duration::days(1), vec![]), // tomorrow
            due_row(today + Duration::days(2), vec![]), // not surfaced
            due_row(today - Duration::days(30), vec![]), // long overdue
        ];

        let buckets = classify_rows(rows, today);

        assert_eq!(buckets.overdue.len(), 2);
        assert_eq!(buckets.due.len(), 1);
        assert_eq!(buckets.upcoming.len(), 1);
        assert_eq!(buckets.due[0].transaction.due_date, today);
    }

    #[test]
    fn entry_carries_first_phone_or_empty_string() {
        let today = date(2025, 8, 17);
        let with_phones = due_row(
            today,
            vec![
                Phone {
                    number: "0901234567".to_string(),
                    is_zalo: true,
                },
                Phone {
                    number: "0907654321".to_string(),
                    is_zalo: false,
                },
            ],
        );
        let without_phones = due_row(today, vec![]);

        let buckets = classify_rows(vec![with_phones, without_phones], today);

        assert_eq!(buckets.due[0].customer_phone, "0901234567");
        assert_eq!(buckets.due[1].customer_phone, "");
    }
}
