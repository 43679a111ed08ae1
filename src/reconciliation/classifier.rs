//! Accounting decision table
//!
//! | Case                  | Debit          | Credit         | History | Complement        |
//! |-----------------------|----------------|----------------|---------|-------------------|
//! | Matched payment       | supplier       | bank           | 34      | invoice supplier  |
//! | Cash payment          | supplier       | cash           | 1       | invoice supplier  |
//! | Fine/interest         | fine/interest  |                | 34      | parent complement |
//! | Discount              |                | discount       | 34      | parent complement |
//! | Bank fee              | fee            |                | 34      | parent complement |
//! | Deposit               | bank           | customer       | 9       |                   |
//! | Withdrawal            | cash           | bank           | 34      |                   |

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::reconciliation::matcher::MatchResult;
use crate::traits::ChartOfAccounts;
use crate::types::*;

/// Draft lines produced for one source transaction, principal line first
pub type LineGroup = Vec<LineDraft>;

/// Fixed codes resolved once per run
#[derive(Debug, Clone, Copy)]
struct FixedCodes {
    cash: AccountCode,
    bank: AccountCode,
    discount: AccountCode,
    fine_interest: AccountCode,
    fee: AccountCode,
    history_reconciled: AccountCode,
    history_cash: AccountCode,
    history_deposit: AccountCode,
}

impl FixedCodes {
    fn resolve<C: ChartOfAccounts + ?Sized>(chart: &C) -> ReconcileResult<Self> {
        Ok(Self {
            cash: chart.fixed_code(FixedCode::Cash)?,
            bank: chart.fixed_code(FixedCode::BankPayment)?,
            discount: chart.fixed_code(FixedCode::Discount)?,
            fine_interest: chart.fixed_code(FixedCode::FineInterest)?,
            fee: chart.fixed_code(FixedCode::Fee)?,
            history_reconciled: chart.fixed_code(FixedCode::HistoryReconciled)?,
            history_cash: chart.fixed_code(FixedCode::HistoryCash)?,
            history_deposit: chart.fixed_code(FixedCode::HistoryDeposit)?,
        })
    }
}

/// Turn match results into line groups, one group per result, in input order
///
/// Any account that cannot be resolved aborts the whole run.
pub fn classify<C: ChartOfAccounts + ?Sized>(
    results: &[MatchResult<'_>],
    chart: &C,
) -> ReconcileResult<Vec<LineGroup>> {
    let codes = FixedCodes::resolve(chart)?;
    results
        .iter()
        .map(|result| classify_one(result, chart, &codes))
        .collect()
}

fn classify_one<C: ChartOfAccounts + ?Sized>(
    result: &MatchResult<'_>,
    chart: &C,
    codes: &FixedCodes,
) -> ReconcileResult<LineGroup> {
    let group = match *result {
        MatchResult::Matched { bank, ledger } => {
            let principal = LineDraft {
                date: bank.date,
                debit_account: Some(chart.resolve_supplier(&ledger.supplier_name)?),
                credit_account: Some(codes.bank),
                value: bank.amount.clone(),
                history_code: codes.history_reconciled,
                complement: ledger.complement(),
            };
            with_ancillary_lines(principal, ledger, codes)
        }
        MatchResult::CashPaid(ledger) => {
            let principal = LineDraft {
                date: ledger.payment_date,
                debit_account: Some(chart.resolve_supplier(&ledger.supplier_name)?),
                credit_account: Some(codes.cash),
                value: ledger.net_amount_to_pay.clone(),
                history_code: codes.history_cash,
                complement: ledger.complement(),
            };
            with_ancillary_lines(principal, ledger, codes)
        }
        MatchResult::Deposit(bank) => vec![LineDraft {
            date: bank.date,
            debit_account: Some(codes.bank),
            credit_account: Some(chart.resolve_customer(&bank.description)?),
            value: bank.amount.clone(),
            history_code: codes.history_deposit,
            complement: String::new(),
        }],
        MatchResult::Withdrawal(bank) => vec![LineDraft {
            date: bank.date,
            debit_account: Some(codes.cash),
            credit_account: Some(codes.bank),
            value: bank.amount.clone(),
            history_code: codes.history_reconciled,
            complement: String::new(),
        }],
    };

    Ok(group)
}

/// Principal line followed by fine, discount and fee lines, skipping zeros
fn with_ancillary_lines(
    principal: LineDraft,
    ledger: &LedgerEntry,
    codes: &FixedCodes,
) -> LineGroup {
    let date = principal.date;
    let complement = principal.complement.clone();
    let zero = BigDecimal::from(0);

    let ancillary = [
        (&ledger.late_fee_and_interest, Some(codes.fine_interest), None),
        (&ledger.discount, None, Some(codes.discount)),
        (&ledger.bank_fee, Some(codes.fee), None),
    ];

    let mut group = vec![principal];
    group.extend(
        ancillary
            .into_iter()
            .filter(|(value, _, _)| **value > zero)
            .map(|(value, debit_account, credit_account)| {
                ancillary_line(
                    date,
                    debit_account,
                    credit_account,
                    value.clone(),
                    codes.history_reconciled,
                    &complement,
                )
            }),
    );
    group
}

fn ancillary_line(
    date: NaiveDate,
    debit_account: Option<AccountCode>,
    credit_account: Option<AccountCode>,
    value: BigDecimal,
    history_code: AccountCode,
    complement: &str,
) -> LineDraft {
    LineDraft {
        date,
        debit_account,
        credit_account,
        value,
        history_code,
        complement: complement.to_string(),
    }
}
