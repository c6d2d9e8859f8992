//! HTTP routes.
//!
//! JSON in, JSON out, wrapped in the shared `ResponseResult` envelope. The
//! invoking user comes from the `X-User-Id` header on routes that act across
//! actors.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use fartrek_domain::{
    Actor, ActorId, DomainError, ItemId, Severity, Subsystem, SubsystemHitOutcome, UserId,
};
use fartrek_shared::{
    ActorSheetResponse, AnnouncementData, AttributeTestRequest, ErrorCode, FateRerollRequest,
    FateRerollResponse, IncomingHitRequest, IncomingHitResponse, InitiativeRequest,
    ItemRollRequest, ItemRollResponse, RemoteDamageData, RepairRequest, RepairResponse,
    ResponseResult, RollResponse, SetTargetRequest, ShipAttackRequest, ShipAttackResponse,
    SubsystemCycleResponse, SubsystemHitRequest, SubsystemHitResponse, SurvivalRequest,
    SurvivalResponse, WeaponAttackResponse, WeaponModeResponse,
};

use crate::app::App;
use crate::infrastructure::ports::{Announcement, RepoError};
use crate::use_cases::actors::ActorError;
use crate::use_cases::checks::{CheckError, CheckRoll, ItemRoll};
use crate::use_cases::fate::FateError;
use crate::use_cases::ship_combat::{RemoteDamage, ShipAttackInput, ShipCombatError};
use crate::use_cases::subsystems::{SubsystemError, SubsystemHitReport};
use crate::use_cases::weapons::WeaponModeError;

/// Header carrying the invoking user's id.
pub const USER_HEADER: &str = "x-user-id";

const DEFAULT_ANNOUNCEMENT_LIMIT: usize = 50;

type ApiResult = Result<Json<ResponseResult>, ApiError>;

fn ok<T: serde::Serialize>(data: T) -> ApiResult {
    Ok(Json(ResponseResult::success(data)))
}

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/actors", get(list_actors).post(save_actor))
        .route("/api/actors/{id}", get(get_actor))
        // Character checks
        .route("/api/actors/{id}/checks/attribute", post(roll_attribute))
        .route("/api/actors/{id}/checks/initiative", post(roll_initiative))
        .route("/api/actors/{id}/checks/survival", post(roll_survival))
        .route("/api/actors/{id}/items/{item_id}/roll", post(roll_item))
        .route("/api/actors/{id}/items/{item_id}/mode", post(toggle_weapon_mode))
        // Ship subsystems and combat
        .route(
            "/api/actors/{id}/subsystems/{subsystem}/cycle",
            post(cycle_subsystem),
        )
        .route("/api/actors/{id}/subsystems/hit", post(subsystem_hit))
        .route("/api/actors/{id}/ship/attack", post(ship_attack))
        .route("/api/actors/{id}/ship/incoming", post(incoming_hit))
        .route("/api/actors/{id}/ship/repair", post(repair))
        .route("/api/actors/{id}/fate/reroll", post(fate_reroll))
        // Targeting
        .route(
            "/api/users/{user}/target",
            put(set_target).get(get_target).delete(clear_target),
        )
        .route("/api/announcements", get(announcements))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Invoker
// =============================================================================

/// The user a request acts for, from the `X-User-Id` header.
#[derive(Debug, Clone, Copy)]
pub struct Invoker(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Invoker {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("missing X-User-Id header".to_string()))?;
        let raw = value
            .to_str()
            .map_err(|_| ApiError::Unauthorized("X-User-Id is not valid text".to_string()))?;
        let uuid = Uuid::parse_str(raw.trim())
            .map_err(|_| ApiError::Unauthorized(format!("X-User-Id is not a UUID: {raw}")))?;
        Ok(Invoker(UserId::from_uuid(uuid)))
    }
}

// =============================================================================
// Actors
// =============================================================================

fn sheet(actor: &Actor) -> Result<ActorSheetResponse, ApiError> {
    let ship = actor.ship();
    Ok(ActorSheetResponse {
        actor: serde_json::to_value(actor).map_err(|e| ApiError::Internal(e.to_string()))?,
        effective_attributes: actor.effective_attributes(),
        fate_available: actor.can_spend_fate(),
        effective_rating: actor.effective_rating(),
        shield_percent: ship.map(|s| s.shields.percent()),
        shields_active: ship.map(|s| s.shields_active()),
    })
}

async fn list_actors(State(app): State<Arc<App>>) -> ApiResult {
    let actors = app.use_cases.actors.list().await?;
    let sheets = actors.iter().map(sheet).collect::<Result<Vec<_>, _>>()?;
    ok(sheets)
}

async fn save_actor(State(app): State<Arc<App>>, Json(actor): Json<Actor>) -> ApiResult {
    let actor = app.use_cases.actors.save(actor).await?;
    ok(sheet(&actor)?)
}

async fn get_actor(State(app): State<Arc<App>>, Path(id): Path<Uuid>) -> ApiResult {
    let actor = app.use_cases.actors.get(ActorId::from_uuid(id)).await?;
    ok(sheet(&actor)?)
}

// =============================================================================
// Character checks
// =============================================================================

fn roll_response(roll: CheckRoll) -> RollResponse {
    RollResponse {
        actor_id: roll.actor_id.to_uuid(),
        check: roll.result,
        fate_available: roll.fate_available,
    }
}

async fn roll_attribute(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AttributeTestRequest>,
) -> ApiResult {
    let roll = app
        .use_cases
        .checks
        .attribute
        .execute(ActorId::from_uuid(id), req.attribute, req.modifier)
        .await?;
    ok(roll_response(roll))
}

async fn roll_initiative(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<InitiativeRequest>,
) -> ApiResult {
    let roll = app
        .use_cases
        .checks
        .initiative
        .execute(ActorId::from_uuid(id), req.modifier)
        .await?;
    ok(roll_response(roll))
}

async fn roll_survival(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SurvivalRequest>,
) -> ApiResult {
    let weapon_tn = req
        .base_tn()
        .ok_or_else(|| ApiError::BadRequest("weaponClass or weaponTN is required".to_string()))?;
    let survival = app
        .use_cases
        .checks
        .survival
        .execute(ActorId::from_uuid(id), weapon_tn, req.modifier)
        .await?;
    ok(SurvivalResponse {
        roll: roll_response(survival.roll),
        wounds_before: survival.wounds_before,
        wounds_after: survival.wounds_after,
    })
}

async fn roll_item(
    State(app): State<Arc<App>>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ItemRollRequest>,
) -> ApiResult {
    let roll = app
        .use_cases
        .checks
        .item
        .execute(ActorId::from_uuid(id), ItemId::from_uuid(item_id), req.modifier)
        .await?;
    let response = match roll {
        ItemRoll::Skill(roll) => ItemRollResponse::Skill(roll_response(roll)),
        ItemRoll::Weapon {
            roll,
            item_id,
            defense_stat,
            weapon_tn,
            mode,
        } => ItemRollResponse::Weapon(WeaponAttackResponse {
            roll: roll_response(roll),
            item_id: item_id.to_uuid(),
            defense_stat: defense_stat.label().to_string(),
            weapon_tn,
            mode,
        }),
    };
    ok(response)
}

async fn toggle_weapon_mode(
    State(app): State<Arc<App>>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult {
    let change = app
        .use_cases
        .weapons
        .toggle_mode
        .execute(ActorId::from_uuid(id), ItemId::from_uuid(item_id))
        .await?;
    ok(WeaponModeResponse {
        item_id: change.item_id.to_uuid(),
        weapon: change.weapon,
        previous: change.previous,
        mode: change.mode,
        weapon_tn: change.weapon_tn,
    })
}

async fn fate_reroll(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<FateRerollRequest>,
) -> ApiResult {
    let result = app
        .use_cases
        .fate
        .reroll
        .execute(ActorId::from_uuid(id), req.label, &req.formula)
        .await?;
    ok(FateRerollResponse {
        actor_id: result.actor_id.to_uuid(),
        label: result.label,
        roll: result.roll,
        remaining_fate: result.remaining_fate,
    })
}

// =============================================================================
// Ship subsystems and combat
// =============================================================================

async fn cycle_subsystem(
    State(app): State<Arc<App>>,
    Path((id, subsystem)): Path<(Uuid, Subsystem)>,
) -> ApiResult {
    let cycle = app
        .use_cases
        .subsystems
        .cycle
        .execute(ActorId::from_uuid(id), subsystem)
        .await?;
    ok(SubsystemCycleResponse {
        subsystem: cycle.subsystem,
        previous: cycle.previous.value(),
        level: cycle.level.value(),
        status: cycle.level.status().to_string(),
    })
}

fn hit_response(report: &SubsystemHitReport) -> SubsystemHitResponse {
    let (subsystem, previous, level) = match report.outcome {
        SubsystemHitOutcome::Applied {
            subsystem,
            previous,
            level,
        } => (subsystem, previous, level),
        SubsystemHitOutcome::NoChange {
            subsystem, current, ..
        } => (subsystem, current, current),
    };
    SubsystemHitResponse {
        die: report.die,
        subsystem,
        severity: report.severity.value(),
        applied: report.outcome.is_applied(),
        previous: previous.value(),
        level: level.value(),
    }
}

async fn subsystem_hit(
    State(app): State<Arc<App>>,
    Invoker(user): Invoker,
    Path(id): Path<Uuid>,
    Json(req): Json<SubsystemHitRequest>,
) -> ApiResult {
    let severity = Severity::new(req.severity)?;
    let report = app
        .use_cases
        .subsystems
        .hit
        .execute(user, ActorId::from_uuid(id), severity)
        .await?;
    ok(hit_response(&report))
}

fn remote_data(remote: RemoteDamage) -> RemoteDamageData {
    match remote {
        RemoteDamage::Missed => RemoteDamageData::Missed,
        RemoteDamage::NoTarget => RemoteDamageData::NoTarget,
        RemoteDamage::Refused { target_id, reason } => RemoteDamageData::Refused {
            target_id: target_id.to_uuid(),
            reason,
        },
        RemoteDamage::ShieldsDrained {
            target_id, change, ..
        } => RemoteDamageData::ShieldsDrained {
            target_id: target_id.to_uuid(),
            change,
        },
        RemoteDamage::SubsystemHit { target_id, hit } => RemoteDamageData::SubsystemHit {
            target_id: target_id.to_uuid(),
            hit: hit_response(&hit),
        },
        RemoteDamage::Failed { target_id, reason } => RemoteDamageData::Failed {
            target_id: target_id.to_uuid(),
            reason,
        },
    }
}

async fn ship_attack(
    State(app): State<Arc<App>>,
    Invoker(user): Invoker,
    Path(id): Path<Uuid>,
    Json(req): Json<ShipAttackRequest>,
) -> ApiResult {
    let input = ShipAttackInput {
        weapon: req.weapon,
        skill: req.skill,
        to_hit: req.to_hit,
        target_id: req.target_id.map(ActorId::from_uuid),
        target_rating: req.target_rating,
        modifier: req.modifier,
    };
    let report = app
        .use_cases
        .ship_combat
        .attack
        .execute(user, ActorId::from_uuid(id), input)
        .await?;
    ok(ShipAttackResponse {
        actor_id: report.actor_id.to_uuid(),
        attack: report.attack,
        hit: report.hit,
        target_rating: report.target_rating,
        effect: report.effect,
        remote: remote_data(report.remote),
    })
}

async fn incoming_hit(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<IncomingHitRequest>,
) -> ApiResult {
    let report = app
        .use_cases
        .ship_combat
        .incoming
        .execute(ActorId::from_uuid(id), req.structure_damage)
        .await?;
    ok(IncomingHitResponse {
        actor_id: report.actor_id.to_uuid(),
        pool: report.pool,
        drain_roll: report.drain_roll,
        change: report.change,
    })
}

async fn repair(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RepairRequest>,
) -> ApiResult {
    let report = app
        .use_cases
        .ship_combat
        .repair
        .execute(ActorId::from_uuid(id), req.pool, req.skill)
        .await?;
    ok(RepairResponse {
        actor_id: report.actor_id.to_uuid(),
        roll: report.roll,
        shield_roll: report.shield_roll,
        change: report.change,
    })
}

// =============================================================================
// Targeting
// =============================================================================

async fn set_target(
    State(app): State<Arc<App>>,
    Path(user): Path<Uuid>,
    Json(req): Json<SetTargetRequest>,
) -> ApiResult {
    app.use_cases
        .actors
        .set_target(UserId::from_uuid(user), ActorId::from_uuid(req.target_id))
        .await?;
    Ok(Json(ResponseResult::success_empty()))
}

async fn get_target(State(app): State<Arc<App>>, Path(user): Path<Uuid>) -> ApiResult {
    let target = app
        .use_cases
        .actors
        .target_of(UserId::from_uuid(user))
        .await?;
    ok(target.map(ActorId::to_uuid))
}

async fn clear_target(State(app): State<Arc<App>>, Path(user): Path<Uuid>) -> ApiResult {
    app.use_cases
        .actors
        .clear_target(UserId::from_uuid(user))
        .await?;
    Ok(Json(ResponseResult::success_empty()))
}

// =============================================================================
// Announcements
// =============================================================================

#[derive(Debug, Deserialize)]
struct AnnouncementQuery {
    limit: Option<usize>,
}

fn announcement_data(announcement: Announcement) -> Result<AnnouncementData, ApiError> {
    Ok(AnnouncementData {
        sequence: announcement.sequence,
        event_type: announcement.event.event_type().to_string(),
        actor_id: announcement.event.actor_id().to_uuid(),
        published_at: announcement.published_at.to_rfc3339(),
        event: serde_json::to_value(&announcement.event)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    })
}

async fn announcements(
    State(app): State<Arc<App>>,
    Query(query): Query<AnnouncementQuery>,
) -> ApiResult {
    let limit = query.limit.unwrap_or(DEFAULT_ANNOUNCEMENT_LIMIT);
    let data = app
        .announcer
        .recent(limit)
        .await
        .into_iter()
        .map(announcement_data)
        .collect::<Result<Vec<_>, _>>()?;
    ok(data)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    /// A rule precondition does not hold; nothing was changed.
    PreconditionFailed(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Conflict, msg),
            ApiError::PreconditionFailed(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::PreconditionFailed,
                msg,
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    "Internal error".to_string(),
                )
            }
        };
        (status, Json(ResponseResult::error(code, message))).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            RepoError::Conflict(_) => ApiError::Conflict(e.to_string()),
            RepoError::ConstraintViolation(_) => ApiError::PreconditionFailed(e.to_string()),
            RepoError::Database { .. } | RepoError::Serialization(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(_) | DomainError::Parse(_) => ApiError::BadRequest(e.to_string()),
            DomainError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            DomainError::Constraint(_) | DomainError::InvalidStateTransition(_) => {
                ApiError::PreconditionFailed(e.to_string())
            }
        }
    }
}

impl From<ActorError> for ApiError {
    fn from(e: ActorError) -> Self {
        match e {
            ActorError::Repo(e) => e.into(),
        }
    }
}

impl From<CheckError> for ApiError {
    fn from(e: CheckError) -> Self {
        match e {
            CheckError::Domain(e) => e.into(),
            CheckError::Repo(e) => e.into(),
        }
    }
}

impl From<WeaponModeError> for ApiError {
    fn from(e: WeaponModeError) -> Self {
        match e {
            WeaponModeError::Domain(e) => e.into(),
            WeaponModeError::Repo(e) => e.into(),
        }
    }
}

impl From<SubsystemError> for ApiError {
    fn from(e: SubsystemError) -> Self {
        match e {
            SubsystemError::Forbidden { .. } => ApiError::Forbidden(e.to_string()),
            SubsystemError::Domain(e) => e.into(),
            SubsystemError::Repo(e) => e.into(),
        }
    }
}

impl From<ShipCombatError> for ApiError {
    fn from(e: ShipCombatError) -> Self {
        match e {
            ShipCombatError::TargetNotShip(_) | ShipCombatError::MissingStructureDamage => {
                ApiError::PreconditionFailed(e.to_string())
            }
            ShipCombatError::Domain(e) => e.into(),
            ShipCombatError::Repo(e) => e.into(),
        }
    }
}

impl From<FateError> for ApiError {
    fn from(e: FateError) -> Self {
        match e {
            FateError::NoFatePoints => ApiError::PreconditionFailed(e.to_string()),
            FateError::Contended => ApiError::Conflict(e.to_string()),
            FateError::Formula(_) => ApiError::BadRequest(e.to_string()),
            FateError::Repo(e) => e.into(),
        }
    }
}
