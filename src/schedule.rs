// src/schedule.rs
//
// Pure installment-schedule math. Everything here is deterministic from
// the contract parameters; persistence happens in the service layer.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::contract::ContractType;

/// One-time contract fee rate over the total amount.
pub const FEE_RATE: Decimal = dec!(0.10);

/// Floor for the contract fee, in VND.
pub const MIN_FEE: Decimal = dec!(200_000);

/// Surcharge applied to every installment, over the total amount.
/// Intentionally per installment, not split across them.
pub const INSTALLMENT_SURCHARGE_RATE: Decimal = dec!(0.02);

/// Days between consecutive installments.
pub const INSTALLMENT_STEP_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Installment {
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// Number of weekly installments for a contract type: 4 for loans,
/// 8 for leases.
pub fn installment_count(contract_type: ContractType) -> u32 {
    match contract_type {
        ContractType::Loan => 4,
        ContractType::Lease => 8,
    }
}

/// `fee = max(total_amount * fee_rate, MIN_FEE)`.
pub fn calculate_fee(total_amount: Decimal, fee_rate: Decimal) -> Decimal {
    (total_amount * fee_rate).max(MIN_FEE)
}

/// Builds the installment schedule for a contract. Each installment is
/// worth `total * 2% + total / count`, and the first one falls a week
/// after the contract date; none falls on the contract date itself.
pub fn calculate_installments(
    contract_date: NaiveDate,
    contract_type: ContractType,
    total_amount: Decimal,
) -> Vec<Installment> {
    let count = installment_count(contract_type);
    let amount =
        total_amount * INSTALLMENT_SURCHARGE_RATE + total_amount / Decimal::from(count);

    (1..=count)
        .map(|i| Installment {
            amount,
            due_date: contract_date + Duration::days(INSTALLMENT_STEP_DAYS * i64::from(i)),
        })
        .collect()
}

/// Overall contract due date: the date of the final installment
/// (contract date + 28 days for loans, + 56 for leases).
pub fn calculate_due_date(contract_type: ContractType, contract_date: NaiveDate) -> NaiveDate {
    contract_date
        + Duration::days(INSTALLMENT_STEP_DAYS * i64::from(installment_count(contract_type)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(dec!(5_000_000), dec!(500_000))] // 10% above the floor
    #[case(dec!(2_000_000), dec!(200_000))] // exactly at the floor
    #[case(dec!(1_000_000), dec!(200_000))] // floor applies
    #[case(dec!(1), dec!(200_000))]
    fn fee_has_a_floor_of_200k(#[case] total: Decimal, #[case] expected: Decimal) {
        assert_eq!(calculate_fee(total, FEE_RATE), expected);
    }

    #[test]
    fn loan_schedule_is_four_weekly_installments() {
        let schedule =
            calculate_installments(date(2025, 3, 1), ContractType::Loan, dec!(1_000_000));

        assert_eq!(schedule.len(), 4);
        let dates: Vec<NaiveDate> = schedule.iter().map(|i| i.due_date).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 3, 8),
                date(2025, 3, 15),
                date(2025, 3, 22),
                date(2025, 3, 29),
            ]
        );
    }

    #[test]
    fn lease_schedule_is_eight_weekly_installments() {
        let start = date(2025, 1, 31);
        let schedule = calculate_installments(start, ContractType::Lease, dec!(800_000));

        assert_eq!(schedule.len(), 8);
        for (i, inst) in schedule.iter().enumerate() {
            assert_eq!(inst.due_date, start + Duration::days(7 * (i as i64 + 1)));
        }
        // no installment on the contract date itself
        assert!(schedule.iter().all(|i| i.due_date > start));
    }

    #[test]
    fn loan_installments_repeat_the_two_percent_surcharge() {
        let schedule =
            calculate_installments(date(2025, 3, 1), ContractType::Loan, dec!(1_000_000));

        // each: 1_000_000 * 0.02 + 1_000_000 / 4 = 270_000
        assert!(schedule.iter().all(|i| i.amount == dec!(270_000)));
        let total: Decimal = schedule.iter().map(|i| i.amount).sum();
        assert_eq!(total, dec!(1_080_000));
    }

    #[rstest]
    #[case(ContractType::Loan, 28)]
    #[case(ContractType::Lease, 56)]
    fn due_date_is_the_final_installment_date(#[case] kind: ContractType, #[case] days: i64) {
        let start = date(2025, 6, 10);
        assert_eq!(calculate_due_date(kind, start), start + Duration::days(days));

        let schedule = calculate_installments(start, kind, dec!(3_000_000));
        assert_eq!(schedule.last().unwrap().due_date, calculate_due_date(kind, start));
    }

    #[test]
    fn schedule_crosses_month_and_year_boundaries() {
        let schedule =
            calculate_installments(date(2024, 12, 20), ContractType::Loan, dec!(400_000));
        assert_eq!(schedule[0].due_date, date(2024, 12, 27));
        assert_eq!(schedule[1].due_date, date(2025, 1, 3));
        assert_eq!(schedule[3].due_date, date(2025, 1, 17));
    }
}
