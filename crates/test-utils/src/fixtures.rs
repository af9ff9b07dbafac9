//! Common test fixtures: skin documents and player records.
//!
//! Fixtures are plain JSON values so every crate can use them without this
//! crate depending on the renderer.

use serde_json::{json, Value};

/// Canvas size of the sample skins.
pub const SKIN_WIDTH: u32 = 560;
pub const SKIN_HEIGHT: u32 = 70;

/// X position of each rating/rank slot in the sample skins.
pub const SLOT_X: [f32; 3] = [319.0, 406.0, 493.0];
/// Baselines of the slot rows in the sample skins.
pub const GAME_TYPE_Y: f32 = 24.0;
pub const ELO_Y: f32 = 40.0;
pub const RANK_Y: f32 = 55.0;

fn placement(size: f32, x: f32, y: f32, color: &str) -> Value {
    json!({
        "font_size": size,
        "pos": { "x": x, "y": y },
        "color": [color],
    })
}

fn slot_row(size: f32, y: f32, color: &str) -> Value {
    Value::Array(
        SLOT_X
            .iter()
            .map(|x| {
                let mut p = placement(size, *x, y, color);
                p["align"] = json!("center");
                p
            })
            .collect(),
    )
}

/// A complete three-slot skin in the current (snake_case) format.
///
/// `font` becomes the skin's default font; pass `None` for tests that use
/// the layout backend and never load a font.
pub fn three_slot_skin(font: Option<&str>) -> Value {
    let mut skin = json!({
        "width": SKIN_WIDTH,
        "height": SKIN_HEIGHT,
        "background_color": "#202020",
        "num_game_types": 3,
        "nick": {
            "font_size": 22,
            "pos": { "x": 53, "y": 20 },
            "max_width": 260,
            "color": ["#ffffff"],
        },
        "no_stats": {
            "font_size": 12,
            "pos": { "x": 406, "y": 40 },
            "align": "center",
            "color": ["#cccccc"],
        },
        "game_type": slot_row(10.0, GAME_TYPE_Y, "#eeeeee"),
        "elo": slot_row(12.0, ELO_Y, "#ffffff"),
        "rank": slot_row(8.0, RANK_Y, "#aaaaaa"),
        "kd_ratio_label": placement(10.0, 53.0, 40.0, "#cccccc"),
        "kd_ratio": {
            "font_size": 12,
            "pos": { "x": 120, "y": 40 },
            "align": "right",
            "color": ["#00ff00", "#ffff00", "#ff0000"],
        },
        "kills": placement(9.0, 53.0, 52.0, "#aaaaaa"),
        "deaths": placement(9.0, 53.0, 64.0, "#aaaaaa"),
        "win_pct_label": placement(10.0, 160.0, 40.0, "#cccccc"),
        "win_pct": {
            "font_size": 12,
            "pos": { "x": 260, "y": 40 },
            "align": "right",
            "color": ["#00ff00", "#ffff00", "#ff0000"],
        },
        "wins": placement(9.0, 160.0, 52.0, "#aaaaaa"),
        "losses": placement(9.0, 160.0, 64.0, "#aaaaaa"),
        "playing_time": placement(9.0, 319.0, 66.0, "#aaaaaa"),
    });

    if let Some(font) = font {
        skin["font"] = json!(font);
    }
    skin
}

/// A small skin in the older PascalCase format, with a tiled background.
pub fn legacy_skin(background: &str, font: Option<&str>) -> Value {
    json!({
        "Background": background,
        "BackgroundColor": { "R": 0.1, "G": 0.1, "B": 0.1 },
        "Overlay": "",
        "Font": font.unwrap_or(""),
        "Width": 200,
        "Height": 40,
        "NumGameTypes": 2,
        "NickConfig": {
            "Font": "",
            "FontSize": 16,
            "Pos": { "X": 4, "Y": 18 },
            "Color": [{ "R": 1.0, "G": 1.0, "B": 1.0 }],
            "MaxWidth": 120,
            "Align": ""
        },
        "EloConfig": [
            { "FontSize": 10, "Pos": { "X": 140, "Y": 14 }, "Align": "center" },
            { "FontSize": 10, "Pos": { "X": 180, "Y": 14 }, "Align": "center" }
        ],
        "GameTypeConfig": [
            { "FontSize": 8, "Pos": { "X": 140, "Y": 6 }, "Align": "center" },
            { "FontSize": 8, "Pos": { "X": 180, "Y": 6 }, "Align": "center" }
        ],
        "KDRatio": {
            "FontSize": 10,
            "Pos": { "X": 60, "Y": 34 },
            "Color": [
                { "R": 0.0, "G": 1.0, "B": 0.0 },
                { "R": 1.0, "G": 1.0, "B": 0.0 },
                { "R": 1.0, "G": 0.0, "B": 0.0 }
            ]
        },
        "PlayingTimeConfig": { "FontSize": 0, "Pos": { "X": 0, "Y": 0 } }
    })
}

/// One per-game-type stats row.
pub fn mode_row(game_type: &str, elo: Option<i64>, wins: u64, losses: u64, kills: u64, deaths: u64) -> Value {
    json!({
        "game_type": game_type,
        "elo": elo,
        "wins": wins,
        "losses": losses,
        "kills": kills,
        "deaths": deaths,
        "alivetime_minutes": 95,
    })
}

/// A player record as read by the file-backed stat source.
pub fn player_record(nick: &str, last_active: Option<&str>, modes: Vec<Value>) -> Value {
    let mut record = json!({
        "nick": nick,
        "modes": modes,
    });
    if let Some(ts) = last_active {
        record["last_active"] = json!(ts);
    }
    record
}

/// A typical active player with two rated game types.
pub fn sample_player(nick: &str) -> Value {
    player_record(
        nick,
        None,
        vec![
            mode_row("ctf", Some(1432), 40, 25, 900, 600),
            mode_row("duel", Some(1210), 10, 12, 300, 320),
        ],
    )
}
