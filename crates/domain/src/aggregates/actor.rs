//! Actor aggregate - Characters, NPCs and starships
//!
//! An actor owns its attribute values, resource pools and embedded items. Ships
//! additionally carry a [`ShipState`]. Stored values are never rewritten by
//! derived views: talents change what the sheet *shows*, not what it stores.
//!
//! All writes go through [`Actor::apply_patch`], which validates every field
//! and guard before touching anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::Item;
use crate::error::DomainError;
use crate::ids::{ActorId, ItemId, UserId};
use crate::value_objects::{
    aggregate_bonus, effective_rating, ActorPatch, AttributeKey, Attributes, DamageLevel,
    FieldGuard, FieldUpdate, HealthPool, ModifierKind, ShipPool, ShipStats, Subsystem,
    SubsystemDamage, TalentModifier,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Character,
    Npc,
    Ship,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub fate: u32,
    pub wounds: u32,
    pub armor: i32,
}

/// Ship-only state: stats, subsystem damage and health pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipState {
    pub stats: ShipStats,
    pub subsystems: SubsystemDamage,
    pub structure: HealthPool,
    /// Stored as a percentage (max 100).
    pub shields: HealthPool,
    pub power: HealthPool,
    pub shields_up: bool,
}

impl Default for ShipState {
    fn default() -> Self {
        Self {
            stats: ShipStats::default(),
            subsystems: SubsystemDamage::default(),
            structure: HealthPool::full(20),
            shields: HealthPool::full(100),
            power: HealthPool::full(20),
            shields_up: true,
        }
    }
}

impl ShipState {
    pub fn pool(&self, pool: ShipPool) -> HealthPool {
        match pool {
            ShipPool::Structure => self.structure,
            ShipPool::Shields => self.shields,
            ShipPool::Power => self.power,
        }
    }

    fn pool_mut(&mut self, pool: ShipPool) -> &mut HealthPool {
        match pool {
            ShipPool::Structure => &mut self.structure,
            ShipPool::Shields => &mut self.shields,
            ShipPool::Power => &mut self.power,
        }
    }

    /// Raised, and generators not knocked offline.
    pub fn shields_active(&self) -> bool {
        self.shields_up && !self.subsystems.shields.is_offline()
    }

    pub fn effective_rating(&self) -> i32 {
        effective_rating(
            self.stats.helm,
            self.shields.percent(),
            self.subsystems.impulse,
        )
    }

    pub fn level(&self, subsystem: Subsystem) -> DamageLevel {
        self.subsystems.level(subsystem)
    }
}

/// Why a patch was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// A guarded field no longer holds the expected value.
    #[error("Guard failed on {path}: expected {expected}, found {actual}")]
    GuardFailed {
        path: String,
        expected: String,
        actual: String,
    },
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Serialized shape of an actor. Validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActorRecord {
    id: ActorId,
    name: String,
    #[serde(rename = "type")]
    kind: ActorKind,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    resources: Resources,
    #[serde(default)]
    owners: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ship: Option<ShipState>,
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActorRecord", into = "ActorRecord")]
pub struct Actor {
    id: ActorId,
    name: String,
    kind: ActorKind,
    attributes: Attributes,
    resources: Resources,
    owners: Vec<UserId>,
    ship: Option<ShipState>,
    items: Vec<Item>,
}

impl TryFrom<ActorRecord> for Actor {
    type Error = DomainError;

    fn try_from(record: ActorRecord) -> Result<Self, Self::Error> {
        let mut actor = Actor::new(record.name, record.kind)?;
        actor.id = record.id;
        actor.attributes = record.attributes;
        actor.resources = record.resources;
        actor.owners = record.owners;
        if record.kind == ActorKind::Ship {
            actor.ship = Some(record.ship.unwrap_or_default());
        } else if record.ship.is_some() {
            return Err(DomainError::validation(format!(
                "{:?} actor cannot carry ship state",
                record.kind
            )));
        }
        if let Some(ship) = &actor.ship {
            for pool in [ShipPool::Structure, ShipPool::Shields, ShipPool::Power] {
                let p = ship.pool(pool);
                HealthPool::new(p.value, p.max)?;
            }
        }
        for item in record.items {
            actor.add_item(item)?;
        }
        Ok(actor)
    }
}

impl From<Actor> for ActorRecord {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            kind: actor.kind,
            attributes: actor.attributes,
            resources: actor.resources,
            owners: actor.owners,
            ship: actor.ship,
            items: actor.items,
        }
    }
}

impl Actor {
    /// Create an actor. Ships start with default ship state.
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("actor name cannot be empty"));
        }
        Ok(Self {
            id: ActorId::new(),
            name,
            kind,
            attributes: Attributes::default(),
            resources: Resources::default(),
            owners: Vec::new(),
            ship: (kind == ActorKind::Ship).then(ShipState::default),
            items: Vec::new(),
        })
    }

    pub fn with_id(mut self, id: ActorId) -> Self {
        self.id = id;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_owner(mut self, user: UserId) -> Self {
        if !self.owners.contains(&user) {
            self.owners.push(user);
        }
        self
    }

    /// Replace the ship state. Fails on non-ship actors.
    pub fn with_ship(mut self, ship: ShipState) -> Result<Self, DomainError> {
        if self.kind != ActorKind::Ship {
            return Err(DomainError::constraint("only ships carry ship state"));
        }
        self.ship = Some(ship);
        Ok(self)
    }

    pub fn with_item(mut self, item: Item) -> Result<Self, DomainError> {
        self.add_item(item)?;
        Ok(self)
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), DomainError> {
        item.validate()?;
        if self.items.iter().any(|i| i.id == item.id) {
            return Err(DomainError::constraint(format!(
                "duplicate item id {}",
                item.id
            )));
        }
        self.items.push(item);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Stored attribute values, without talent adjustments.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn owners(&self) -> &[UserId] {
        &self.owners
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owners.contains(&user)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn ship(&self) -> Option<&ShipState> {
        self.ship.as_ref()
    }

    pub fn is_ship(&self) -> bool {
        self.ship.is_some()
    }

    /// Ship state, or a constraint error for non-ships.
    pub fn require_ship(&self) -> Result<&ShipState, DomainError> {
        self.ship
            .as_ref()
            .ok_or_else(|| DomainError::constraint(format!("{} is not a ship", self.name)))
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    pub fn talents(&self) -> impl Iterator<Item = &TalentModifier> {
        self.items.iter().filter_map(Item::as_talent)
    }

    pub fn talent_bonus(&self, kind: ModifierKind, target: Option<&str>) -> i32 {
        aggregate_bonus(self.talents(), kind, target)
    }

    /// Attribute value as displayed: stored value plus attribute talents.
    pub fn effective_attribute(&self, key: AttributeKey) -> i32 {
        self.attributes.get(key) + self.talent_bonus(ModifierKind::Attribute, Some(key.key()))
    }

    pub fn effective_attributes(&self) -> Attributes {
        self.attributes
            .adjusted(|key| self.talent_bonus(ModifierKind::Attribute, Some(key.key())))
    }

    /// First skill item whose name matches case-insensitively.
    pub fn skill_by_name(&self, name: &str) -> Option<&Item> {
        self.items
            .iter()
            .find(|i| i.as_skill().is_some() && i.name.eq_ignore_ascii_case(name))
    }

    /// Rank of the named skill, 0 when the actor lacks it.
    pub fn skill_rank(&self, name: &str) -> i32 {
        self.skill_by_name(name)
            .and_then(Item::as_skill)
            .map(|s| s.rank as i32)
            .unwrap_or(0)
    }

    pub fn effective_rating(&self) -> Option<i32> {
        self.ship.as_ref().map(ShipState::effective_rating)
    }

    pub fn can_spend_fate(&self) -> bool {
        self.resources.fate > 0
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Apply every update in `patch`, or none of them.
    pub fn apply_patch(&mut self, patch: &ActorPatch) -> Result<(), PatchError> {
        for guard in &patch.guards {
            self.check_guard(guard)?;
        }
        let mut next = self.clone();
        for update in &patch.updates {
            next.write(update)?;
        }
        *self = next;
        Ok(())
    }

    fn check_guard(&self, guard: &FieldGuard) -> Result<(), PatchError> {
        let (expected, actual) = match guard {
            FieldGuard::FatePoints { expected } => {
                (expected.to_string(), self.resources.fate.to_string())
            }
            FieldGuard::Wounds { expected } => {
                (expected.to_string(), self.resources.wounds.to_string())
            }
            FieldGuard::SubsystemLevel {
                subsystem,
                expected,
            } => {
                let ship = self.require_ship()?;
                (
                    expected.value().to_string(),
                    ship.level(*subsystem).value().to_string(),
                )
            }
            FieldGuard::PoolValue { pool, expected } => {
                let ship = self.require_ship()?;
                (expected.to_string(), ship.pool(*pool).value.to_string())
            }
            FieldGuard::WeaponMode { item_id, expected } => {
                let item = self
                    .item(*item_id)
                    .ok_or_else(|| DomainError::not_found("Item", item_id.to_string()))?;
                let actual = item
                    .as_weapon()
                    .and_then(|weapon| weapon.mode())
                    .map_or_else(|| "none".to_string(), |mode| mode.to_string());
                (expected.to_string(), actual)
            }
        };
        if expected != actual {
            return Err(PatchError::GuardFailed {
                path: guard.path(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn write(&mut self, update: &FieldUpdate) -> Result<(), DomainError> {
        match *update {
            FieldUpdate::Wounds { value } => self.resources.wounds = value,
            FieldUpdate::FatePoints { value } => self.resources.fate = value,
            FieldUpdate::SubsystemLevel { subsystem, level } => {
                self.ship_mut()?.subsystems.set(subsystem, level);
            }
            FieldUpdate::PoolValue { pool, value } => {
                let slot = self.ship_mut()?.pool_mut(pool);
                *slot = HealthPool::new(value, slot.max)?;
            }
            FieldUpdate::WeaponMode { item_id, mode } => {
                let item = self
                    .items
                    .iter_mut()
                    .find(|i| i.id == item_id)
                    .ok_or_else(|| DomainError::not_found("Item", item_id.to_string()))?;
                let name = item.name.clone();
                item.as_weapon_mut()
                    .ok_or_else(|| DomainError::constraint(format!("{} is not a weapon", name)))?
                    .set_mode(mode)?;
            }
        }
        Ok(())
    }

    fn ship_mut(&mut self) -> Result<&mut ShipState, DomainError> {
        let name = &self.name;
        self.ship
            .as_mut()
            .ok_or_else(|| DomainError::constraint(format!("{} is not a ship", name)))
    }
}
