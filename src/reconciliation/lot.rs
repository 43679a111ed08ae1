//! Grouping of accounting lines into lots

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::reconciliation::classifier::LineGroup;
use crate::types::*;

/// Lines of one originating transaction; only the first one opens the lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lot {
    lines: Vec<AccountingLine>,
}

impl Lot {
    /// Open a lot with its principal line
    pub fn open(principal: LineDraft) -> Self {
        Self {
            lines: vec![principal.into_line(LotMarker::Start)],
        }
    }

    /// Append a continuation line
    pub fn push(&mut self, draft: LineDraft) {
        self.lines.push(draft.into_line(LotMarker::Continuation));
    }

    pub fn lines(&self) -> &[AccountingLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<AccountingLine> {
        self.lines
    }

    /// The line that opened the lot
    pub fn principal(&self) -> &AccountingLine {
        &self.lines[0]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; a lot holds at least its principal line
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of values on lines with a debit account
    pub fn debit_total(&self) -> BigDecimal {
        self.lines
            .iter()
            .filter(|line| line.debit_account.is_some())
            .map(|line| &line.value)
            .sum()
    }

    /// Sum of values on lines with a credit account
    pub fn credit_total(&self) -> BigDecimal {
        self.lines
            .iter()
            .filter(|line| line.credit_account.is_some())
            .map(|line| &line.value)
            .sum()
    }

    /// Check that exactly the first line is marked as the lot start
    pub fn is_well_formed(&self) -> bool {
        self.lines
            .iter()
            .enumerate()
            .all(|(index, line)| line.starts_lot() == (index == 0))
    }
}

/// Fold line groups into lots, one lot per non-empty group, in group order
pub fn build_lots(groups: Vec<LineGroup>) -> Vec<Lot> {
    groups
        .into_iter()
        .filter_map(|group| {
            let mut drafts = group.into_iter();
            let first = drafts.next()?;
            Some(drafts.fold(Lot::open(first), |mut lot, draft| {
                lot.push(draft);
                lot
            }))
        })
        .collect()
}

/// Flatten lots into the final line sequence
pub fn flatten_lots(lots: &[Lot]) -> Vec<AccountingLine> {
    lots.iter().flat_map(|lot| lot.lines().iter().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(value: i64, debit: Option<AccountCode>, credit: Option<AccountCode>) -> LineDraft {
        LineDraft {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            debit_account: debit,
            credit_account: credit,
            value: BigDecimal::from(value),
            history_code: 34,
            complement: "123 ACME".to_string(),
        }
    }

    #[test]
    fn test_single_line_group_opens_lot() {
        let lots = build_lots(vec![vec![draft(1000, Some(10), Some(7))]]);
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].len(), 1);
        assert!(lots[0].principal().starts_lot());
        assert!(lots[0].is_well_formed());
    }

    #[test]
    fn test_continuations_never_open_lots() {
        let lots = build_lots(vec![
            vec![
                draft(1000, Some(10), Some(7)),
                draft(10, Some(50), None),
                draft(5, None, Some(60)),
            ],
            vec![draft(200, Some(5), Some(7))],
        ]);

        assert_eq!(lots.len(), 2);
        let markers: Vec<LotMarker> = flatten_lots(&lots).iter().map(|l| l.lot).collect();
        assert_eq!(
            markers,
            vec![
                LotMarker::Start,
                LotMarker::Continuation,
                LotMarker::Continuation,
                LotMarker::Start,
            ]
        );
        assert!(lots.iter().all(Lot::is_well_formed));
    }

    #[test]
    fn test_lot_totals() {
        let lots = build_lots(vec![vec![
            draft(1000, Some(10), Some(7)),
            draft(10, Some(50), None),
            draft(5, None, Some(60)),
        ]]);

        assert_eq!(lots[0].debit_total(), BigDecimal::from(1010));
        assert_eq!(lots[0].credit_total(), BigDecimal::from(1005));

        let balanced = build_lots(vec![vec![draft(1000, Some(10), Some(7))]]);
        assert_eq!(balanced[0].debit_total(), balanced[0].credit_total());
    }

    #[test]
    fn test_empty_groups_produce_no_lot() {
        let lots = build_lots(vec![vec![], vec![draft(1, Some(1), Some(2))]]);
        assert_eq!(lots.len(), 1);
    }
}
