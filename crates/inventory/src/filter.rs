//! Live + history read model.
//!
//! The filter view is a join of two sources: live records and audit entries.
//! Each source is filtered by the same conjunctive criteria, then the union is
//! de-duplicated by [`ViewKey`].

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, OwnerId, RecordId};
use stockledger_events::OwnerScoped;

use crate::audit::{AuditAction, AuditEntry, RecordSnapshot};

/// Filter criteria. Every field is optional; an absent field does not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Exact match against the record category.
    pub category: Option<String>,
    /// Inclusive lower bound on the relevant timestamp.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the relevant timestamp.
    pub to: Option<DateTime<Utc>>,
    /// Restricts results to audit entries of this action.
    pub action: Option<AuditAction>,
    pub min_used: Option<u64>,
    pub max_used: Option<u64>,
}

impl FilterCriteria {
    /// `true` when no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.action.is_none()
            && self.min_used.is_none()
            && self.max_used.is_none()
    }

    /// Reject inverted ranges.
    pub fn validate(&self) -> DomainResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(DomainError::validation("'from' must not be after 'to'"));
            }
        }
        if let (Some(min), Some(max)) = (self.min_used, self.max_used) {
            if min > max {
                return Err(DomainError::validation("'minUsed' must not exceed 'maxUsed'"));
            }
        }
        Ok(())
    }

    fn in_range(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
    }

    fn matches_snapshot(&self, snapshot: &RecordSnapshot) -> bool {
        let category_ok = match &self.category {
            Some(category) => snapshot.category.as_deref() == Some(category.as_str()),
            None => true,
        };
        category_ok
            && self.min_used.is_none_or(|min| snapshot.used >= min)
            && self.max_used.is_none_or(|max| snapshot.used <= max)
    }

    /// A live record matches when it was created or last updated inside the date range.
    pub fn matches_live(&self, record: &RecordSnapshot) -> bool {
        self.action.is_none()
            && self.matches_snapshot(record)
            && (self.in_range(record.created_at) || self.in_range(record.updated_at))
    }

    /// An audit entry is dated by its action timestamp (`consumedAt` / `deletedAt`).
    pub fn matches_entry(&self, entry: &AuditEntry) -> bool {
        self.action.is_none_or(|action| entry.action() == action)
            && self.matches_snapshot(entry.snapshot())
            && self.in_range(entry.occurred_at())
    }
}

/// Identity of a row in the filter view: `(id, deleted)`.
///
/// A live record is `(id, false)` and every audit entry is `(id, true)`, so a
/// record shows at most once live and once from its history, whatever mix of
/// actions that history holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub record_id: RecordId,
    pub deleted: bool,
}

/// One row of the filter view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewItem {
    Live(RecordSnapshot),
    Audit(AuditEntry),
}

impl ViewItem {
    pub fn key(&self) -> ViewKey {
        ViewKey {
            record_id: self.snapshot().id,
            deleted: self.deleted(),
        }
    }

    /// `false` for live records, `true` for audit entries.
    pub fn deleted(&self) -> bool {
        matches!(self, ViewItem::Audit(_))
    }

    pub fn snapshot(&self) -> &RecordSnapshot {
        match self {
            ViewItem::Live(record) => record,
            ViewItem::Audit(entry) => entry.snapshot(),
        }
    }
}

/// Join live records and audit entries for `owner` under `criteria`.
///
/// - Empty criteria yield an empty view.
/// - Rows of other owners are dropped.
/// - Duplicates by [`ViewKey`] keep the position of the first occurrence and
///   the contents of the latest one.
/// - Live rows come first, then audit rows, each in source order.
pub fn join_view<R, A>(owner: OwnerId, records: R, entries: A, criteria: &FilterCriteria) -> Vec<ViewItem>
where
    R: IntoIterator<Item = RecordSnapshot>,
    A: IntoIterator<Item = AuditEntry>,
{
    if criteria.is_empty() {
        return Vec::new();
    }

    let live = records
        .into_iter()
        .filter(|r| r.owner == owner && criteria.matches_live(r))
        .map(ViewItem::Live);
    let history = entries
        .into_iter()
        .filter(|e| e.owner() == owner && criteria.matches_entry(e))
        .map(ViewItem::Audit);

    let mut rows: Vec<ViewItem> = Vec::new();
    let mut positions: HashMap<ViewKey, usize> = HashMap::new();
    for item in live.chain(history) {
        let key = item.key();
        match positions.get(&key).copied() {
            Some(idx) => rows[idx] = item,
            None => {
                positions.insert(key, rows.len());
                rows.push(item);
            }
        }
    }
    rows
}

/// Which end of a date range a bound belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoundEdge {
    Start,
    End,
}

/// Parse a date bound as RFC 3339 or as a bare `YYYY-MM-DD` day.
///
/// A bare day expands to its first instant for [`BoundEdge::Start`] and its
/// last instant for [`BoundEdge::End`], so `from=to=<day>` covers the whole day.
pub fn parse_bound(raw: &str, edge: BoundEdge) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("invalid date '{raw}'")))?;
    let naive = match edge {
        BoundEdge::Start => day.and_hms_opt(0, 0, 0),
        BoundEdge::End => day.and_hms_nano_opt(23, 59, 59, 999_999_999),
    }
    .ok_or_else(|| DomainError::validation(format!("invalid date '{raw}'")))?;
    Ok(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use stockledger_core::Money;

    fn snapshot(owner: OwnerId, category: &str, used: u64, at: DateTime<Utc>) -> RecordSnapshot {
        RecordSnapshot {
            id: RecordId::new(),
            owner,
            name: "Item".to_string(),
            category: Some(category.to_string()),
            quantity: 100,
            used,
            capital_price: Money::new(10),
            selling_price: Money::new(15),
            image: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn criteria_used(min: Option<u64>, max: Option<u64>) -> FilterCriteria {
        FilterCriteria {
            min_used: min,
            max_used: max,
            ..Default::default()
        }
    }

    #[test]
    fn empty_criteria_return_nothing() {
        let owner = OwnerId::new();
        let rec = snapshot(owner, "coffee", 30, Utc::now());
        let view = join_view(owner, vec![rec], Vec::new(), &FilterCriteria::default());
        assert!(view.is_empty());
    }

    #[test]
    fn used_bounds_are_inclusive() {
        let owner = OwnerId::new();
        let rec = snapshot(owner, "coffee", 30, Utc::now());

        let hit = join_view(owner, vec![rec.clone()], Vec::new(), &criteria_used(Some(20), Some(40)));
        assert_eq!(hit.len(), 1);
        assert!(!hit[0].deleted());

        let edge = join_view(owner, vec![rec.clone()], Vec::new(), &criteria_used(Some(30), Some(30)));
        assert_eq!(edge.len(), 1);

        let miss = join_view(owner, vec![rec], Vec::new(), &criteria_used(Some(50), None));
        assert!(miss.is_empty());
    }

    #[test]
    fn action_restricts_to_audit_entries() {
        let owner = OwnerId::new();
        let now = Utc::now();
        let live = snapshot(owner, "coffee", 5, now);
        let consumed = AuditEntry::new(AuditAction::Consume, live.clone(), now);
        let gone = snapshot(owner, "tea", 0, now);
        let deleted = AuditEntry::new(AuditAction::Delete, gone.clone(), now);

        let criteria = FilterCriteria {
            action: Some(AuditAction::Delete),
            ..Default::default()
        };
        let view = join_view(owner, vec![live.clone()], vec![consumed.clone(), deleted], &criteria);
        assert_eq!(view.len(), 1);
        assert!(view[0].deleted());
        assert_eq!(view[0].key().record_id, gone.id);

        let by_category = FilterCriteria {
            category: Some("coffee".to_string()),
            ..Default::default()
        };
        let view = join_view(owner, vec![live], vec![consumed], &by_category);
        assert_eq!(view.len(), 2, "live row and its consume entry are distinct rows");
        assert!(!view[0].deleted());
        assert!(view[1].deleted());
    }

    #[test]
    fn repeated_consume_entries_collapse_to_latest_snapshot() {
        let owner = OwnerId::new();
        let now = Utc::now();
        let mut rec = snapshot(owner, "coffee", 10, now);
        let first = AuditEntry::new(AuditAction::Consume, rec.clone(), now);
        rec.used = 25;
        let second = AuditEntry::new(AuditAction::Consume, rec.clone(), now + Duration::seconds(1));

        let criteria = FilterCriteria {
            action: Some(AuditAction::Consume),
            ..Default::default()
        };
        let view = join_view(owner, Vec::new(), vec![first, second], &criteria);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].snapshot().used, 25);
    }

    #[test]
    fn consume_then_delete_history_is_one_row_with_delete_contents() {
        let owner = OwnerId::new();
        let now = Utc::now();
        let first = snapshot(owner, "coffee", 0, now);
        let other = snapshot(owner, "coffee", 0, now);
        let mut rec = first.clone();
        rec.used = 30;
        let consumed = AuditEntry::new(AuditAction::Consume, rec.clone(), now);
        let other_gone = AuditEntry::new(AuditAction::Delete, other.clone(), now + Duration::seconds(1));
        let deleted = AuditEntry::new(AuditAction::Delete, rec.clone(), now + Duration::seconds(2));

        let criteria = FilterCriteria {
            category: Some("coffee".to_string()),
            ..Default::default()
        };
        let view = join_view(owner, Vec::new(), vec![consumed, other_gone, deleted], &criteria);
        assert_eq!(view.len(), 2);

        let rows: Vec<&ViewItem> = view.iter().filter(|row| row.key().record_id == rec.id).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].deleted());
        assert!(matches!(rows[0], ViewItem::Audit(entry) if entry.action() == AuditAction::Delete));
        assert_eq!(rows[0].snapshot().used, 30);
        assert_eq!(view[0].key().record_id, rec.id, "keeps the first history position");
        assert_eq!(view[1].key().record_id, other.id);
    }

    #[test]
    fn other_owners_are_invisible() {
        let me = OwnerId::new();
        let someone_else = OwnerId::new();
        let rec = snapshot(someone_else, "coffee", 30, Utc::now());
        let entry = AuditEntry::new(AuditAction::Delete, rec.clone(), Utc::now());

        let criteria = FilterCriteria {
            category: Some("coffee".to_string()),
            ..Default::default()
        };
        assert!(join_view(me, vec![rec], vec![entry], &criteria).is_empty());
    }

    #[test]
    fn date_range_uses_created_or_updated_for_live_rows() {
        let owner = OwnerId::new();
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut rec = snapshot(owner, "coffee", 0, created);
        rec.updated_at = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();

        let window = |from: &str, to: &str| FilterCriteria {
            from: Some(parse_bound(from, BoundEdge::Start).unwrap()),
            to: Some(parse_bound(to, BoundEdge::End).unwrap()),
            ..Default::default()
        };

        assert_eq!(join_view(owner, vec![rec.clone()], Vec::new(), &window("2025-03-01", "2025-03-01")).len(), 1);
        assert_eq!(join_view(owner, vec![rec.clone()], Vec::new(), &window("2025-03-10", "2025-03-12")).len(), 1);
        assert!(join_view(owner, vec![rec], Vec::new(), &window("2025-03-02", "2025-03-09")).is_empty());
    }

    #[test]
    fn audit_rows_are_dated_by_action_time() {
        let owner = OwnerId::new();
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let rec = snapshot(owner, "coffee", 0, created);
        let deleted_at = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let entry = AuditEntry::new(AuditAction::Delete, rec, deleted_at);

        let criteria = FilterCriteria {
            from: Some(parse_bound("2025-06-15", BoundEdge::Start).unwrap()),
            ..Default::default()
        };
        let view = join_view(owner, Vec::new(), vec![entry], &criteria);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn parse_bound_accepts_days_and_timestamps() {
        let start = parse_bound("2025-02-03", BoundEdge::Start).unwrap();
        let end = parse_bound("2025-02-03", BoundEdge::End).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap());
        assert!(end > start + Duration::hours(23));

        let exact = parse_bound("2025-02-03T10:30:00+01:00", BoundEdge::End).unwrap();
        assert_eq!(exact, Utc.with_ymd_and_hms(2025, 2, 3, 9, 30, 0).unwrap());

        assert!(matches!(parse_bound("yesterday", BoundEdge::Start), Err(DomainError::Validation(_))));
    }

    #[test]
    fn inverted_ranges_fail_validation() {
        let now = Utc::now();
        let dates = FilterCriteria {
            from: Some(now),
            to: Some(now - Duration::days(1)),
            ..Default::default()
        };
        assert!(dates.validate().is_err());
        assert!(criteria_used(Some(5), Some(1)).validate().is_err());
        assert!(criteria_used(Some(1), Some(5)).validate().is_ok());
    }
}
