use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Aggregate, AggregateRoot, BlobRef, DomainError, Money, OwnerId, RecordId};
use stockledger_events::{Event, OwnerScoped};

use crate::audit::RecordSnapshot;

/// Aggregate root: InventoryRecord.
///
/// # Invariants
/// - `0 <= used <= quantity` after every applied event.
/// - `owner`, `id` and `created_at` never change after creation.
/// - A deleted record accepts no further commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    id: RecordId,
    owner: OwnerId,
    name: String,
    category: Option<String>,
    quantity: u64,
    used: u64,
    capital_price: Money,
    selling_price: Money,
    image: Option<BlobRef>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
    created: bool,
    deleted: bool,
}

impl InventoryRecord {
    /// Create an empty, not-yet-created record for `owner`, ready to handle `CreateRecord`.
    pub fn empty(id: RecordId, owner: OwnerId) -> Self {
        Self {
            id,
            owner,
            name: String::new(),
            category: None,
            quantity: 0,
            used: 0,
            capital_price: Money::ZERO,
            selling_price: Money::ZERO,
            image: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
            version: 0,
            created: false,
            deleted: false,
        }
    }

    pub fn record_id(&self) -> RecordId {
        self.id
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    /// Units still in stock. Derived, never stored.
    pub fn remaining(&self) -> u64 {
        self.quantity - self.used
    }

    pub fn capital_price(&self) -> Money {
        self.capital_price
    }

    pub fn selling_price(&self) -> Money {
        self.selling_price
    }

    pub fn image(&self) -> Option<&BlobRef> {
        self.image.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_live(&self) -> bool {
        self.created && !self.deleted
    }

    /// Value copy of the record's fields, detached from any later mutation.
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            id: self.id,
            owner: self.owner,
            name: self.name.clone(),
            category: self.category.clone(),
            quantity: self.quantity,
            used: self.used,
            capital_price: self.capital_price,
            selling_price: self.selling_price,
            image: self.image.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl AggregateRoot for InventoryRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl OwnerScoped for InventoryRecord {
    fn owner(&self) -> OwnerId {
        self.owner
    }
}

/// Command: CreateRecord ("add" intent).
///
/// Quantities and prices are signed; non-positive values fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRecord {
    pub owner: OwnerId,
    pub record_id: RecordId,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub capital_price: i64,
    pub selling_price: i64,
    pub image: Option<BlobRef>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConsumeStock (a sale or other usage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeStock {
    pub owner: OwnerId,
    pub record_id: RecordId,
    pub amount_used: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Requested changes for a non-destructive edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChanges {
    pub name: Option<String>,
    /// A blank category clears it.
    pub category: Option<String>,
    /// New total stocked quantity (restock). Must stay `>= used`.
    pub quantity: Option<i64>,
    pub capital_price: Option<i64>,
    pub selling_price: Option<i64>,
    pub image: Option<BlobRef>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.quantity.is_none()
            && self.capital_price.is_none()
            && self.selling_price.is_none()
            && self.image.is_none()
    }
}

/// Command: EditRecord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub owner: OwnerId,
    pub record_id: RecordId,
    pub changes: RecordChanges,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteRecord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRecord {
    pub owner: OwnerId,
    pub record_id: RecordId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordCommand {
    Create(CreateRecord),
    Consume(ConsumeStock),
    Edit(EditRecord),
    Delete(DeleteRecord),
}

/// Event: RecordCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCreated {
    pub owner: OwnerId,
    pub record_id: RecordId,
    pub name: String,
    pub category: Option<String>,
    pub quantity: u64,
    pub capital_price: Money,
    pub selling_price: Money,
    pub image: Option<BlobRef>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockConsumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockConsumed {
    pub owner: OwnerId,
    pub record_id: RecordId,
    pub amount_used: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RecordEdited. Fields hold validated, normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEdited {
    pub owner: OwnerId,
    pub record_id: RecordId,
    pub name: Option<String>,
    pub category: Option<Option<String>>,
    pub quantity: Option<u64>,
    pub capital_price: Option<Money>,
    pub selling_price: Option<Money>,
    pub image: Option<BlobRef>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RecordDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDeleted {
    pub owner: OwnerId,
    pub record_id: RecordId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordEvent {
    Created(RecordCreated),
    Consumed(StockConsumed),
    Edited(RecordEdited),
    Deleted(RecordDeleted),
}

impl Event for RecordEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RecordEvent::Created(_) => "inventory.record.created",
            RecordEvent::Consumed(_) => "inventory.record.consumed",
            RecordEvent::Edited(_) => "inventory.record.edited",
            RecordEvent::Deleted(_) => "inventory.record.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RecordEvent::Created(e) => e.occurred_at,
            RecordEvent::Consumed(e) => e.occurred_at,
            RecordEvent::Edited(e) => e.occurred_at,
            RecordEvent::Deleted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for InventoryRecord {
    type Command = RecordCommand;
    type Event = RecordEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RecordEvent::Created(e) => {
                self.id = e.record_id;
                self.owner = e.owner;
                self.name = e.name.clone();
                self.category = e.category.clone();
                self.quantity = e.quantity;
                self.used = 0;
                self.capital_price = e.capital_price;
                self.selling_price = e.selling_price;
                self.image = e.image.clone();
                self.created_at = e.occurred_at;
                self.updated_at = e.occurred_at;
                self.created = true;
            }
            RecordEvent::Consumed(e) => {
                self.used += e.amount_used;
                self.updated_at = e.occurred_at;
            }
            RecordEvent::Edited(e) => {
                if let Some(name) = &e.name {
                    self.name = name.clone();
                }
                if let Some(category) = &e.category {
                    self.category = category.clone();
                }
                if let Some(quantity) = e.quantity {
                    self.quantity = quantity;
                }
                if let Some(price) = e.capital_price {
                    self.capital_price = price;
                }
                if let Some(price) = e.selling_price {
                    self.selling_price = price;
                }
                if let Some(image) = &e.image {
                    self.image = Some(image.clone());
                }
                self.updated_at = e.occurred_at;
            }
            RecordEvent::Deleted(_) => {
                // Leaves the live set; `updated_at` keeps its last mutation time.
                self.deleted = true;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RecordCommand::Create(cmd) => self.handle_create(cmd),
            RecordCommand::Consume(cmd) => self.handle_consume(cmd),
            RecordCommand::Edit(cmd) => self.handle_edit(cmd),
            RecordCommand::Delete(cmd) => self.handle_delete(cmd),
        }
    }
}

fn positive_units(value: i64, field: &str) -> Result<u64, DomainError> {
    if value <= 0 {
        return Err(DomainError::validation(format!("{field} must be positive")));
    }
    Ok(value as u64)
}

fn positive_price(value: i64, field: &str) -> Result<Money, DomainError> {
    positive_units(value, field).map(Money::new)
}

fn required_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(name.to_string())
}

fn normalize_category(category: &str) -> Option<String> {
    let category = category.trim();
    (!category.is_empty()).then(|| category.to_string())
}

impl InventoryRecord {
    /// Missing, deleted and foreign records are indistinguishable to the caller.
    fn ensure_live_for(&self, owner: OwnerId, record_id: RecordId) -> Result<(), DomainError> {
        if !self.is_live() || self.owner != owner || self.id != record_id {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateRecord) -> Result<Vec<RecordEvent>, DomainError> {
        if self.created {
            return Err(DomainError::invariant("record already exists"));
        }
        if cmd.record_id != self.id || cmd.owner != self.owner {
            return Err(DomainError::invariant("record identity mismatch"));
        }

        let name = required_name(&cmd.name)?;
        let quantity = positive_units(cmd.quantity, "quantity")?;
        let capital_price = positive_price(cmd.capital_price, "capitalPrice")?;
        let selling_price = positive_price(cmd.selling_price, "sellingPrice")?;

        Ok(vec![RecordEvent::Created(RecordCreated {
            owner: cmd.owner,
            record_id: cmd.record_id,
            name,
            category: cmd.category.as_deref().and_then(normalize_category),
            quantity,
            capital_price,
            selling_price,
            image: cmd.image.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_consume(&self, cmd: &ConsumeStock) -> Result<Vec<RecordEvent>, DomainError> {
        self.ensure_live_for(cmd.owner, cmd.record_id)?;

        let amount_used = positive_units(cmd.amount_used, "amountUsed")?;
        let remaining = self.remaining();
        if amount_used > remaining {
            return Err(DomainError::overconsumption(amount_used, remaining));
        }

        Ok(vec![RecordEvent::Consumed(StockConsumed {
            owner: cmd.owner,
            record_id: cmd.record_id,
            amount_used,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, cmd: &EditRecord) -> Result<Vec<RecordEvent>, DomainError> {
        self.ensure_live_for(cmd.owner, cmd.record_id)?;

        let changes = &cmd.changes;
        if changes.is_empty() {
            return Err(DomainError::validation("no changes requested"));
        }

        let name = changes.name.as_deref().map(required_name).transpose()?;
        let quantity = changes
            .quantity
            .map(|q| positive_units(q, "quantity"))
            .transpose()?;
        if let Some(quantity) = quantity {
            if quantity < self.used {
                return Err(DomainError::validation(format!(
                    "quantity cannot drop below the {} units already used",
                    self.used
                )));
            }
        }
        let capital_price = changes
            .capital_price
            .map(|p| positive_price(p, "capitalPrice"))
            .transpose()?;
        let selling_price = changes
            .selling_price
            .map(|p| positive_price(p, "sellingPrice"))
            .transpose()?;

        Ok(vec![RecordEvent::Edited(RecordEdited {
            owner: cmd.owner,
            record_id: cmd.record_id,
            name,
            category: changes.category.as_deref().map(normalize_category),
            quantity,
            capital_price,
            selling_price,
            image: changes.image.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteRecord) -> Result<Vec<RecordEvent>, DomainError> {
        self.ensure_live_for(cmd.owner, cmd.record_id)?;

        Ok(vec![RecordEvent::Deleted(RecordDeleted {
            owner: cmd.owner,
            record_id: cmd.record_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
