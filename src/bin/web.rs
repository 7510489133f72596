//! Single binary web server: JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use doubles_tournament_web::{
    PairingMode, Tournament, TournamentConfig, TournamentError, TournamentId, Warning,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Tournament plus whatever warnings the last operation raised.
#[derive(Serialize)]
struct WithWarnings<'a> {
    tournament: &'a Tournament,
    warnings: Vec<Warning>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    config: TournamentConfig,
}

fn default_name() -> String {
    "Doubles tournament".to_string()
}

#[derive(Deserialize)]
struct PlayerBody {
    first_name: String,
    last_name: String,
    #[serde(default)]
    category: String,
}

#[derive(Deserialize)]
struct CoefficientBody {
    coefficient: f64,
}

#[derive(Deserialize)]
struct GenerateTeamsBody {
    #[serde(default)]
    mode: PairingMode,
}

#[derive(Deserialize)]
struct TeamNameBody {
    display_name: String,
}

#[derive(Deserialize)]
struct ScoreBody {
    round: u32,
    court: String,
    score_a: u32,
    score_b: u32,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct CategoryPath {
    id: TournamentId,
    name: String,
}

#[derive(Deserialize)]
struct TeamPath {
    id: TournamentId,
    team_id: String,
}

fn bad_request(e: TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Look up a tournament, refresh its activity time and run `f` on it.
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<HttpResponse, TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    f(&mut entry.tournament).unwrap_or_else(bad_request)
}

fn ok_with_warnings(t: &Tournament, warnings: Vec<Warning>) -> HttpResponse {
    HttpResponse::Ok().json(WithWarnings {
        tournament: t,
        warnings,
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "doubles-tournament-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Option<Json<CreateTournamentBody>>) -> HttpResponse {
    let (name, config) = match body {
        Some(b) => {
            let b = b.into_inner();
            (b.name, b.config)
        }
        None => (default_name(), TournamentConfig::default()),
    };
    if config.court_capacity == 0 {
        return bad_request(TournamentError::InvalidCourtCapacity);
    }
    let tournament = Tournament::with_config(name, config);
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!("Created tournament {}", id);
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(HttpResponse::Ok().json(t)))
}

/// Replace the administrative settings (mode, courts, ranking formulas...).
#[put("/api/tournaments/{id}/config")]
async fn api_set_config(state: AppState, path: Path<TournamentPath>, body: Json<TournamentConfig>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.set_config(body.into_inner())?;
        Ok(HttpResponse::Ok().json(t))
    })
}

/// Register a pending player.
#[post("/api/tournaments/{id}/players")]
async fn api_propose_player(state: AppState, path: Path<TournamentPath>, body: Json<PlayerBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.propose_player(&body.first_name, &body.last_name, &body.category)?;
        Ok(HttpResponse::Ok().json(t))
    })
}

#[post("/api/tournaments/{id}/players/validate")]
async fn api_validate_player(state: AppState, path: Path<TournamentPath>, body: Json<PlayerBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.validate_player(&body.first_name, &body.last_name)?;
        Ok(HttpResponse::Ok().json(t))
    })
}

#[post("/api/tournaments/{id}/players/validate-all")]
async fn api_validate_all(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let promoted = t.validate_pending_players();
        log::info!("Validated {} pending player(s)", promoted);
        Ok(HttpResponse::Ok().json(t))
    })
}

#[post("/api/tournaments/{id}/players/remove")]
async fn api_remove_player(state: AppState, path: Path<TournamentPath>, body: Json<PlayerBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.remove_player(&body.first_name, &body.last_name)?;
        Ok(HttpResponse::Ok().json(t))
    })
}

#[put("/api/tournaments/{id}/categories/{name}")]
async fn api_set_category(state: AppState, path: Path<CategoryPath>, body: Json<CoefficientBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.set_category(&path.name, body.coefficient)?;
        Ok(HttpResponse::Ok().json(t))
    })
}

#[delete("/api/tournaments/{id}/categories/{name}")]
async fn api_remove_category(state: AppState, path: Path<CategoryPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.remove_category(&path.name)?;
        Ok(HttpResponse::Ok().json(t))
    })
}

/// Generate fixed teams (fresh or append).
#[post("/api/tournaments/{id}/teams/generate")]
async fn api_generate_teams(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<GenerateTeamsBody>>,
) -> HttpResponse {
    let mode = body.map(|b| b.mode).unwrap_or_default();
    with_tournament(&state, path.id, |t| {
        let warnings = t.generate_teams(mode)?;
        Ok(ok_with_warnings(t, warnings))
    })
}

#[put("/api/tournaments/{id}/teams/{team_id}/name")]
async fn api_rename_team(state: AppState, path: Path<TeamPath>, body: Json<TeamNameBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.rename_team(&path.team_id, &body.display_name)?;
        Ok(HttpResponse::Ok().json(t))
    })
}

#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.remove_team(&path.team_id)?;
        Ok(HttpResponse::Ok().json(t))
    })
}

/// Generate the next round (fixed teams or balanced individual, per config).
#[post("/api/tournaments/{id}/rounds/generate")]
async fn api_generate_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let outcome = t.generate_round(&mut rand::thread_rng())?;
        Ok(ok_with_warnings(t, outcome.warnings))
    })
}

#[post("/api/tournaments/{id}/rounds/catch-up")]
async fn api_catchup_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let outcome = t.generate_catchup_round(&mut rand::thread_rng())?;
        Ok(ok_with_warnings(t, outcome.warnings))
    })
}

/// Close the tournament: catch-up rounds until every player is level.
#[post("/api/tournaments/{id}/rounds/final")]
async fn api_final_rounds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let closeout = t.generate_final_rounds(&mut rand::thread_rng())?;
        let warnings = closeout
            .rounds
            .into_iter()
            .flat_map(|r| r.warnings)
            .chain(closeout.warnings)
            .collect();
        Ok(ok_with_warnings(t, warnings))
    })
}

#[put("/api/tournaments/{id}/matches/score")]
async fn api_record_score(state: AppState, path: Path<TournamentPath>, body: Json<ScoreBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.record_score(body.round, &body.court, body.score_a, body.score_b)?;
        Ok(HttpResponse::Ok().json(t))
    })
}

#[post("/api/tournaments/{id}/matches/reset")]
async fn api_reset_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.reset_matches();
        Ok(HttpResponse::Ok().json(t))
    })
}

#[get("/api/tournaments/{id}/lag")]
async fn api_lag(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(HttpResponse::Ok().json(t.analyze_lag())))
}

#[get("/api/tournaments/{id}/balance")]
async fn api_balance(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(HttpResponse::Ok().json(t.play_balance())))
}

#[get("/api/tournaments/{id}/rankings/teams")]
async fn api_team_ranking(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(HttpResponse::Ok().json(t.team_ranking())))
}

#[get("/api/tournaments/{id}/rankings/players")]
async fn api_player_ranking(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(HttpResponse::Ok().json(t.player_ranking())))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_set_config)
            .service(api_propose_player)
            .service(api_validate_player)
            .service(api_validate_all)
            .service(api_remove_player)
            .service(api_set_category)
            .service(api_remove_category)
            .service(api_generate_teams)
            .service(api_rename_team)
            .service(api_remove_team)
            .service(api_generate_round)
            .service(api_catchup_round)
            .service(api_final_rounds)
            .service(api_record_score)
            .service(api_reset_matches)
            .service(api_lag)
            .service(api_balance)
            .service(api_team_ranking)
            .service(api_player_ranking)
    })
    .bind(bind)?
    .run()
    .await
}
