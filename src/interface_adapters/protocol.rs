// Wire protocol DTOs and conversions for public game messages. The
// transport layer attaches the authenticated player id before converting a
// client message into a simulation intent.

use serde::{Deserialize, Serialize};

use crate::domain::map::MapGraph;
use crate::domain::math::Vec2;
use crate::domain::state::{MoveInput, PlayerId, Weapon};
use crate::use_cases::types::{GameIntent, InstanceState, WorldUpdate};

/// Messages the server sends to connected clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    /// Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdate),
    /// High-level instance state transitions.
    GameState(InstanceStateDto),
}

/// Serializes the one-time static map export. This payload is large (every
/// generated entity) and is sent exactly once per game instance.
pub fn serialize_map_export(map: &MapGraph) -> serde_json::Result<String> {
    serde_json::to_string(&serde_json::json!({
        "type": "map",
        "data": map,
    }))
}

/// Messages a client sends to the server. Identity comes from the
/// connection, not the payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Input(MoveInputDto),
    Fire(FireDto),
    Melee(MeleeDto),
    DamageSelf(DamageSelfDto),
    Revive(ReviveDto),
    CollectPickup(CollectPickupDto),
    LootContainer(LootContainerDto),
    CollectObjective(CollectObjectiveDto),
    AttemptEscape,
    BreakGlass(BreakGlassDto),
    Chat(ChatDto),
    Ping(PingDto),
}

impl ClientMessage {
    /// Binds the connection's player id and produces a simulation intent.
    pub fn into_intent(self, player_id: PlayerId) -> GameIntent {
        match self {
            ClientMessage::Input(dto) => GameIntent::Input {
                player_id,
                input: MoveInput {
                    dx: dto.dx,
                    dz: dto.dz,
                    yaw: dto.yaw,
                    pitch: dto.pitch,
                },
            },
            ClientMessage::Fire(dto) => GameIntent::Fire {
                player_id,
                origin: dto.origin,
                height: dto.height,
                direction: dto.direction,
                weapon: dto.weapon,
                damage: dto.damage,
            },
            ClientMessage::Melee(dto) => GameIntent::Melee {
                player_id,
                origin: dto.origin,
                direction: dto.direction,
                weapon: dto.weapon,
                damage: dto.damage,
                range: dto.range,
            },
            ClientMessage::DamageSelf(dto) => GameIntent::DamageSelf {
                player_id,
                damage: dto.damage,
                source: dto.source,
            },
            ClientMessage::Revive(dto) => GameIntent::Revive {
                player_id,
                target_id: dto.target_id,
            },
            ClientMessage::CollectPickup(dto) => GameIntent::CollectPickup {
                player_id,
                pickup_id: dto.pickup_id,
            },
            ClientMessage::LootContainer(dto) => GameIntent::LootContainer {
                player_id,
                container_id: dto.container_id,
            },
            ClientMessage::CollectObjective(dto) => GameIntent::CollectObjective {
                player_id,
                objective_id: dto.objective_id,
            },
            ClientMessage::AttemptEscape => GameIntent::AttemptEscape { player_id },
            ClientMessage::BreakGlass(dto) => GameIntent::BreakGlass {
                player_id,
                glass_id: dto.glass_id,
            },
            ClientMessage::Chat(dto) => GameIntent::Chat {
                player_id,
                text: dto.text,
            },
            ClientMessage::Ping(dto) => GameIntent::Ping {
                player_id,
                position: dto.position,
            },
        }
    }
}

/// Per-tick movement payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveInputDto {
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dz: f32,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FireDto {
    pub origin: Vec2,
    #[serde(default = "default_fire_height")]
    pub height: f32,
    pub direction: Vec2,
    pub weapon: Weapon,
    pub damage: f32,
}

fn default_fire_height() -> f32 {
    crate::domain::tuning::combat::BULLET_HEIGHT_DEFAULT
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeleeDto {
    pub origin: Vec2,
    pub direction: Vec2,
    pub weapon: Weapon,
    pub damage: f32,
    pub range: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DamageSelfDto {
    pub damage: f32,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviveDto {
    pub target_id: PlayerId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectPickupDto {
    pub pickup_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LootContainerDto {
    pub container_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectObjectiveDto {
    pub objective_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakGlassDto {
    pub glass_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatDto {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PingDto {
    pub position: Vec2,
}

/// Instance lifecycle state sent to clients for UI flow.
#[derive(Debug, Clone, Serialize)]
pub enum InstanceStateDto {
    Preparing,
    Running,
    Ended { victory: bool },
}

impl From<InstanceState> for InstanceStateDto {
    fn from(state: InstanceState) -> Self {
        match state {
            InstanceState::Preparing => InstanceStateDto::Preparing,
            InstanceState::Running => InstanceStateDto::Running,
            InstanceState::Ended { victory } => InstanceStateDto::Ended { victory },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_fire_message_parses_and_binds_identity() {
        let json = r#"{
            "type": "Fire",
            "data": {
                "origin": { "x": 1.0, "z": 2.0 },
                "direction": { "x": 0.0, "z": 1.0 },
                "weapon": "pistol",
                "damage": 25.0
            }
        }"#;
        let message: ClientMessage = serde_json::from_str(json).expect("fire should parse");
        let intent = message.into_intent("p1".to_string());
        match intent {
            GameIntent::Fire {
                player_id,
                height,
                damage,
                ..
            } => {
                assert_eq!(player_id, "p1");
                assert_eq!(damage, 25.0);
                // Default muzzle height fills in when omitted.
                assert!(height > 0.0);
            }
            other => panic!("unexpected intent {other:?}"),
        }
    }

    #[test]
    fn map_export_serializes_with_type_tag() {
        let area = crate::domain::area::AreaDefinition::default();
        let generated = crate::domain::map::MapGenerator::generate(42, &area);
        let payload =
            serialize_map_export(&generated.graph).expect("map export should serialize");
        assert!(payload.starts_with("{\"data\""));
        assert!(payload.contains("\"type\":\"map\""));
    }
}
