use crate::domain::model::{Kda, PlayerPerformance, PlayerPerformanceResult};
use crate::domain::ports::GraphqlTransport;
use crate::utils::error::Result;
use serde::Deserialize;
use serde_json::{json, Value};

pub const PLAYER_MATCHES_QUERY: &str = r#"
query GetPlayerMatches($playerId: String!) {
  player(id: $playerId) {
    id
    matches(first: 10) {
      nodes {
        id
        startTime
        duration
        participants {
          player { id }
          champion { id name }
          stats {
            kills
            deaths
            assists
            totalMinionsKilled
            goldEarned
            totalDamageDealtToChampions
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct PlayerMatchesData {
    player: Option<PlayerNode>,
}

#[derive(Debug, Deserialize)]
struct PlayerNode {
    id: String,
    matches: Option<MatchConnection>,
}

#[derive(Debug, Deserialize)]
struct MatchConnection {
    #[serde(default)]
    nodes: Vec<MatchNode>,
}

/// `duration` is whole seconds. Any other encoding (an ISO-8601 string such
/// as `PT30M`) fails to decode and the whole response takes the fallback path.
#[derive(Debug, Deserialize)]
struct MatchNode {
    #[serde(default)]
    duration: u32,
    #[serde(default)]
    participants: Vec<Participant>,
}

#[derive(Debug, Deserialize)]
struct Participant {
    player: Option<PlayerRef>,
    champion: Option<Champion>,
    #[serde(default)]
    stats: ParticipantStats,
}

#[derive(Debug, Deserialize)]
struct PlayerRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Champion {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParticipantStats {
    kills: u32,
    deaths: u32,
    assists: u32,
    total_minions_killed: u32,
    gold_earned: u32,
    total_damage_dealt_to_champions: u32,
}

/// Canned rows served when live data is unavailable.
pub fn fallback_rows() -> Vec<PlayerPerformance> {
    vec![
        PlayerPerformance {
            player_id: "player1".to_string(),
            champion_id: "Jinx".to_string(),
            kda: Kda {
                kills: 8,
                deaths: 2,
                assists: 5,
            },
            cs: 245,
            gold: 15420,
            damage: 28500,
            game_time_seconds: 1860,
        },
        PlayerPerformance {
            player_id: "player2".to_string(),
            champion_id: "Thresh".to_string(),
            kda: Kda {
                kills: 1,
                deaths: 4,
                assists: 12,
            },
            cs: 45,
            gold: 9200,
            damage: 8900,
            game_time_seconds: 1860,
        },
    ]
}

/// Flattens `data.player.matches.nodes[].participants[]` into one row per
/// match, keeping only the participant whose id equals the player id echoed
/// back in the response.
pub fn flatten_player_matches(data: &Value) -> Result<Vec<PlayerPerformance>> {
    let parsed = PlayerMatchesData::deserialize(data)?;
    let Some(player) = parsed.player else {
        return Ok(Vec::new());
    };
    let nodes = player.matches.map(|m| m.nodes).unwrap_or_default();

    Ok(nodes
        .into_iter()
        .flat_map(|node| {
            let game_time_seconds = node.duration;
            let own_id = player.id.clone();
            node.participants
                .into_iter()
                .filter(move |p| p.player.as_ref().is_some_and(|r| r.id == own_id))
                .map(move |p| PlayerPerformance {
                    player_id: p.player.map(|r| r.id).unwrap_or_default(),
                    champion_id: p.champion.map(|c| c.name).unwrap_or_default(),
                    kda: Kda {
                        kills: p.stats.kills,
                        deaths: p.stats.deaths,
                        assists: p.stats.assists,
                    },
                    cs: p.stats.total_minions_killed,
                    gold: p.stats.gold_earned,
                    damage: p.stats.total_damage_dealt_to_champions,
                    game_time_seconds,
                })
        })
        .collect())
}

/// Reads a player's recent matches through the GraphQL relay.
pub struct PlayerDataTransformer<T: GraphqlTransport> {
    transport: T,
}

impl<T: GraphqlTransport> PlayerDataTransformer<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn fetch_live(&self, player_id: &str) -> Result<Vec<PlayerPerformance>> {
        let body = self
            .transport
            .call(PLAYER_MATCHES_QUERY, Some(json!({ "playerId": player_id })))
            .await?;
        flatten_player_matches(&body["data"])
    }

    /// Never fails: transport errors and empty results both resolve to the
    /// canned rows, tagged as `Fallback`.
    pub async fn fetch_player_performance(&self, player_id: &str) -> PlayerPerformanceResult {
        let reason = match self.fetch_live(player_id).await {
            Ok(rows) if !rows.is_empty() => {
                tracing::info!("Fetched {} live performance rows", rows.len());
                return PlayerPerformanceResult::Live { rows };
            }
            Ok(_) => "no matches returned for player".to_string(),
            Err(e) => e.to_string(),
        };

        tracing::warn!("Using fallback performance data: {}", reason);
        PlayerPerformanceResult::Fallback {
            rows: fallback_rows(),
            reason,
        }
    }
}
