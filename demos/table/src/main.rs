use intrigue::prelude::*;
use serde_json::{Value, json};

/// Why a table could not be played to the end.
#[derive(Debug, thiserror::Error)]
enum TableError {
    #[error(transparent)]
    Service(#[from] IntrigueError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The service answered with an `Error` reply.
    #[error("request rejected ({code}): {message}")]
    Rejected { code: u64, message: String },
}

// ---------------------------------------------------------------------------
// Wire helpers
// ---------------------------------------------------------------------------

/// Sends one JSON request through the service, as a transport would.
///
/// An `Error` reply comes back as [`TableError::Rejected`].
async fn send(service: &IntrigueService, request: Value) -> Result<Value, TableError> {
    let bytes = serde_json::to_vec(&request)?;
    let reply: Value = serde_json::from_slice(&service.handle_request(&bytes).await?)?;
    if reply["type"] == "Error" {
        tracing::warn!(reply = %reply, "request rejected");
        return Err(TableError::Rejected {
            code: reply["code"].as_u64().unwrap_or_default(),
            message: reply["message"].as_str().unwrap_or_default().to_string(),
        });
    }
    Ok(reply)
}

fn pid(name: &str) -> String {
    name.to_lowercase()
}

// ---------------------------------------------------------------------------
// Table bot
// ---------------------------------------------------------------------------

/// Plays a whole game with simple bots: take Income, Coup as soon as
/// possible, never contest anything, and give up the first card when
/// forced. Returns the winner's name.
async fn play(service: &IntrigueService, names: &[&str]) -> Result<String, TableError> {
    let created = send(service, json!({ "type": "CreateRoom" })).await?;
    let room_id = created["room_id"].clone();
    tracing::info!(room_id = %room_id, "table opened");

    for name in names {
        send(
            service,
            json!({ "type": "AddPlayer", "room_id": room_id, "player_id": pid(name), "player_name": name }),
        )
        .await?;
    }
    let mut view = send(
        service,
        json!({ "type": "StartGame", "room_id": room_id, "player_id": pid(names[0]) }),
    )
    .await?;

    let mut printed = 0;
    loop {
        let log = view["view"]["event_log"].as_array().cloned().unwrap_or_default();
        for line in log.iter().skip(printed) {
            println!("  {}", line.as_str().unwrap_or_default());
        }
        printed = log.len();

        if let Some(winner) = view["view"]["winner"].as_str() {
            return Ok(winner.to_string());
        }

        let owing = view["view"]["pending_influence_loss"]
            .as_object()
            .and_then(|owed| owed.keys().next().cloned());
        if let Some(owing) = owing {
            let own = send(
                service,
                json!({ "type": "GetView", "room_id": room_id, "player_id": pid(&owing) }),
            )
            .await?;
            let card = own["view"]["players"]
                .as_array()
                .and_then(|players| players.iter().find(|p| p["name"] == owing.as_str()))
                .and_then(|p| p["influences"][0].as_str())
                .unwrap_or_default()
                .to_string();
            view = send(
                service,
                json!({
                    "type": "ResolveInfluenceLoss",
                    "room_id": room_id,
                    "player_id": pid(&owing),
                    "influence": card,
                }),
            )
            .await?;
            continue;
        }

        let turn = view["view"]["turn_player"].as_str().unwrap_or_default().to_string();
        let players = view["view"]["players"].as_array().cloned().unwrap_or_default();
        let me = players.iter().find(|p| p["name"] == turn.as_str());
        let coins = me.and_then(|p| p["coins"].as_u64()).unwrap_or_default();
        let victim = players
            .iter()
            .find(|p| p["name"] != turn.as_str() && p["eliminated"] == false)
            .and_then(|p| p["name"].as_str())
            .map(str::to_string);

        let request = match victim {
            Some(victim) if coins >= 7 => json!({
                "type": "ProposeAction",
                "room_id": room_id,
                "player_id": pid(&turn),
                "action": "Coup",
                "target_player": victim,
            }),
            _ => json!({
                "type": "ProposeAction",
                "room_id": room_id,
                "player_id": pid(&turn),
                "action": "Income",
            }),
        };
        view = send(service, request).await?;
    }
}

#[tokio::main]
async fn main() -> Result<(), TableError> {
    init_tracing("info");

    let service = IntrigueService::builder().seed(2024).build();
    let winner = play(&service, &["Ann", "Bea", "Cal"]).await?;
    println!("{winner} wins");
    Ok(())
}
