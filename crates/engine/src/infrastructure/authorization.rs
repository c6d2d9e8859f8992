//! Update rights: an actor's owners, plus game masters on everything.

use std::collections::HashSet;

use async_trait::async_trait;
use fartrek_domain::{Actor, UserId};

use crate::infrastructure::ports::AuthorizationPort;

#[derive(Debug, Default)]
pub struct OwnershipAuthorization {
    game_masters: HashSet<UserId>,
}

impl OwnershipAuthorization {
    pub fn new(game_masters: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            game_masters: game_masters.into_iter().collect(),
        }
    }

    pub fn is_game_master(&self, user: UserId) -> bool {
        self.game_masters.contains(&user)
    }
}

#[async_trait]
impl AuthorizationPort for OwnershipAuthorization {
    async fn can_update(&self, user: UserId, actor: &Actor) -> bool {
        self.is_game_master(user) || actor.is_owned_by(user)
    }
}
