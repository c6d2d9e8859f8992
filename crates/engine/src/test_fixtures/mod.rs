//! Test fixtures: JSON fixture loading and ready-made actors.

use std::path::PathBuf;
use std::sync::Arc;

use fartrek_domain::{
    Actor, ActorKind, AttributeKey, Attributes, Item, ModifierKind, Resources, ShipState,
    ShipStats, TalentModifier, UserId, WeaponData,
};

use crate::entities;
use crate::infrastructure::memory::InMemoryActorRepo;
use crate::infrastructure::ports::ActorRepo;

/// Load a JSON fixture from the `test_data/` directory.
///
/// # Panics
///
/// Panics if the fixture file cannot be read or parsed.
pub fn load_fixture<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let fixture_path = fixture_path(path);
    let content = std::fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!("Failed to read fixture '{}': {}", fixture_path.display(), e)
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        panic!("Failed to parse fixture '{}': {}", fixture_path.display(), e)
    })
}

pub fn fixture_path(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(path)
}

/// An actor entity over an in-memory store holding `actors`.
pub fn actor_store(actors: impl IntoIterator<Item = Actor>) -> (Arc<InMemoryActorRepo>, Arc<entities::Actor>) {
    let repo = Arc::new(InMemoryActorRepo::with_actors(actors));
    let entity = Arc::new(entities::Actor::new(repo.clone() as Arc<dyn ActorRepo>));
    (repo, entity)
}

// =============================================================================
// Actors
// =============================================================================

pub mod actors {
    use super::*;

    /// Dexterity 3, Marksmanship 2, a +1 ranged talent and a stun phaser.
    pub fn officer(fate: u32, wounds: u32) -> Actor {
        Actor::new("Lt. Sorel", ActorKind::Character)
            .unwrap()
            .with_attributes(Attributes::new(2, 3, 1, 0))
            .with_resources(Resources {
                fate,
                wounds,
                armor: 1,
            })
            .with_item(Item::skill("Marksmanship", AttributeKey::Dx, 2))
            .unwrap()
            .with_item(Item::skill("Engineering", AttributeKey::Iq, 3))
            .unwrap()
            .with_item(Item::talent(
                "Sharpshooter",
                TalentModifier::new(ModifierKind::Attack, "ranged", 1),
            ))
            .unwrap()
            .with_item(Item::talent(
                "Quick Reflexes",
                TalentModifier::new(ModifierKind::Initiative, "all", 2),
            ))
            .unwrap()
            .with_item(phaser())
            .unwrap()
    }

    pub fn phaser() -> Item {
        Item::weapon(
            "Type II Phaser",
            WeaponData {
                weapon_tn: 14,
                has_stun: true,
                range: "Far".to_string(),
                ..WeaponData::default()
            },
        )
    }

    pub fn item_named(actor: &Actor, name: &str) -> fartrek_domain::ItemId {
        actor
            .items()
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.id)
            .unwrap_or_else(|| panic!("{} has no item named {}", actor.name(), name))
    }

    /// Tactical 3, engineering 2, helm 4, weapon rating 5, everything nominal.
    pub fn starship(name: &str, owner: UserId) -> Actor {
        starship_with(name, owner, |_| {})
    }

    pub fn starship_with(name: &str, owner: UserId, configure: impl FnOnce(&mut ShipState)) -> Actor {
        let mut state = ShipState {
            stats: ShipStats {
                tactical: 3,
                engineering: 2,
                helm: 4,
                sensors: 1,
                weapon_rating: 5,
            },
            ..ShipState::default()
        };
        configure(&mut state);
        Actor::new(name, ActorKind::Ship)
            .unwrap()
            .with_owner(owner)
            .with_ship(state)
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_fixture_parses() {
        let actors: Vec<Actor> = load_fixture("actors.json");
        assert_eq!(actors.len(), 2);
        assert_eq!(actors[0].kind(), ActorKind::Character);
        assert!(actors[1].is_ship());
        assert_eq!(actors[1].effective_rating(), Some(4));
    }
}
