use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::BlobRef;
use stockledger_infra::{LedgerError, NewRecord};
use stockledger_inventory::{
    AuditAction, AuditEntry, BoundEdge, FilterCriteria, InventorySummary, Receipt, RecordChanges,
    RecordSnapshot, ViewItem, parse_bound,
};

// -------------------------
// Request DTOs
// -------------------------

/// Missing numeric fields default to zero and are rejected by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateItemRequest {
    pub name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub capital_price: i64,
    pub selling_price: i64,
    pub image: Option<String>,
}

impl From<CreateItemRequest> for NewRecord {
    fn from(body: CreateItemRequest) -> Self {
        NewRecord {
            name: body.name,
            category: body.category,
            quantity: body.quantity,
            capital_price: body.capital_price,
            selling_price: body.selling_price,
            image: body.image.filter(|s| !s.trim().is_empty()).map(BlobRef::new),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsumeRequest {
    pub amount_used: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditItemRequest {
    pub name: Option<String>,
    /// Blank clears the category.
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub capital_price: Option<i64>,
    pub selling_price: Option<i64>,
    pub image: Option<String>,
}

impl From<EditItemRequest> for RecordChanges {
    fn from(body: EditItemRequest) -> Self {
        RecordChanges {
            name: body.name,
            category: body.category,
            quantity: body.quantity,
            capital_price: body.capital_price,
            selling_price: body.selling_price,
            image: body.image.filter(|s| !s.trim().is_empty()).map(BlobRef::new),
        }
    }
}

/// Raw filter query string; every parameter is optional and blank means absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub action: Option<String>,
    pub min_used: Option<String>,
    pub max_used: Option<String>,
}

impl FilterQuery {
    pub fn into_criteria(self) -> Result<FilterCriteria, LedgerError> {
        let from = present(self.from)
            .map(|raw| parse_bound(&raw, BoundEdge::Start))
            .transpose()?;
        let to = present(self.to)
            .map(|raw| parse_bound(&raw, BoundEdge::End))
            .transpose()?;
        let action = present(self.action)
            .map(|raw| raw.parse::<AuditAction>())
            .transpose()?;
        let min_used = present(self.min_used)
            .map(|raw| parse_count("minUsed", &raw))
            .transpose()?;
        let max_used = present(self.max_used)
            .map(|raw| parse_count("maxUsed", &raw))
            .transpose()?;

        Ok(FilterCriteria {
            category: present(self.category),
            from,
            to,
            action,
            min_used,
            max_used,
        })
    }
}

fn present(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_count(field: &str, raw: &str) -> Result<u64, LedgerError> {
    raw.parse::<u64>().map_err(|_| {
        LedgerError::Validation(format!("{field} must be a non-negative integer, got '{raw}'"))
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ReceiptUploadQuery {
    pub title: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

/// `{ "data": ... }` wrapper used by every item endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

pub fn envelope<T>(data: T) -> Envelope<T> {
    Envelope { data }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub capital_price: u64,
    pub selling_price: u64,
    pub quantity: u64,
    pub used: u64,
    pub remaining: u64,
    pub image: Option<String>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RecordSnapshot> for ItemResponse {
    fn from(s: &RecordSnapshot) -> Self {
        ItemResponse {
            id: s.id.to_string(),
            name: s.name.clone(),
            category: s.category.clone(),
            capital_price: s.capital_price.minor_units(),
            selling_price: s.selling_price.minor_units(),
            quantity: s.quantity,
            used: s.used,
            remaining: s.remaining(),
            image: s.image.as_ref().map(|i| i.as_str().to_string()),
            owner: s.owner.to_string(),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Row of the filter view or of a record's history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItemResponse {
    #[serde(flatten)]
    pub item: ItemResponse,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<AuditAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&AuditEntry> for ViewItemResponse {
    fn from(entry: &AuditEntry) -> Self {
        ViewItemResponse {
            item: ItemResponse::from(entry.snapshot()),
            deleted: true,
            entry_id: Some(entry.entry_id().to_string()),
            action: Some(entry.action()),
            consumed_at: entry.consumed_at(),
            deleted_at: entry.deleted_at(),
        }
    }
}

impl From<&ViewItem> for ViewItemResponse {
    fn from(row: &ViewItem) -> Self {
        match row {
            ViewItem::Live(snapshot) => ViewItemResponse {
                item: ItemResponse::from(snapshot),
                deleted: false,
                entry_id: None,
                action: None,
                consumed_at: None,
                deleted_at: None,
            },
            ViewItem::Audit(entry) => ViewItemResponse::from(entry),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub items: usize,
    pub total_quantity: u64,
    pub total_used: u64,
    pub total_remaining: u64,
    pub total_capital: u64,
    pub total_selling: u64,
    pub projected_profit: i64,
    pub sales_so_far: u64,
}

impl From<InventorySummary> for SummaryResponse {
    fn from(s: InventorySummary) -> Self {
        SummaryResponse {
            items: s.items,
            total_quantity: s.total_quantity,
            total_used: s.total_used,
            total_remaining: s.total_remaining,
            total_capital: s.total_capital.minor_units(),
            total_selling: s.total_selling.minor_units(),
            projected_profit: s.projected_profit,
            sales_so_far: s.sales_so_far.minor_units(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub receipt_id: String,
    pub receipt_url: String,
    pub title: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&Receipt> for ReceiptResponse {
    fn from(r: &Receipt) -> Self {
        ReceiptResponse {
            receipt_id: r.id.to_string(),
            receipt_url: r.url.as_str().to_string(),
            title: r.title.clone(),
            uploaded_at: r.uploaded_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceiptResponse {
    pub message: &'static str,
    pub receipt_id: String,
    pub title: String,
    pub receipt_url: String,
}

#[derive(Debug, Serialize)]
pub struct ReceiptListResponse {
    pub message: &'static str,
    pub count: usize,
    pub receipts: Vec<ReceiptResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filter_params_are_absent() {
        let query = FilterQuery {
            category: Some("  ".to_string()),
            from: Some(String::new()),
            ..FilterQuery::default()
        };
        assert!(query.into_criteria().unwrap().is_empty());
    }

    #[test]
    fn filter_params_are_parsed() {
        let query = FilterQuery {
            category: Some("dairy".to_string()),
            from: Some("2024-03-01".to_string()),
            to: Some("2024-03-31".to_string()),
            action: Some("consume".to_string()),
            min_used: Some("2".to_string()),
            max_used: Some("9".to_string()),
        };
        let criteria = query.into_criteria().unwrap();
        assert_eq!(criteria.category.as_deref(), Some("dairy"));
        assert_eq!(criteria.action, Some(AuditAction::Consume));
        assert_eq!(criteria.min_used, Some(2));
        assert_eq!(criteria.max_used, Some(9));
        assert!(criteria.from.unwrap() < criteria.to.unwrap());
    }

    #[test]
    fn malformed_filter_params_are_validation_errors() {
        for query in [
            FilterQuery {
                min_used: Some("-1".to_string()),
                ..FilterQuery::default()
            },
            FilterQuery {
                action: Some("VIEW".to_string()),
                ..FilterQuery::default()
            },
            FilterQuery {
                from: Some("yesterday".to_string()),
                ..FilterQuery::default()
            },
        ] {
            assert!(matches!(query.into_criteria(), Err(LedgerError::Validation(_))));
        }
    }

    #[test]
    fn item_json_uses_camel_case() {
        let item = ItemResponse {
            id: "id".to_string(),
            name: "Milk".to_string(),
            category: None,
            capital_price: 100,
            selling_price: 150,
            quantity: 3,
            used: 1,
            remaining: 2,
            image: None,
            owner: "o".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["_id"], "id");
        assert_eq!(json["capitalPrice"], 100);
        assert!(json.get("createdAt").is_some());
    }
}
