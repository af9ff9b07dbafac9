//! End-to-end badge tests through the layout-recording backend.

use badge_common::{ColorScheme, ModeRow, PlayerStatSummary, RankEntry};
use renderer::recorder::{DrawOp, CHAR_WIDTH_FACTOR};
use renderer::{render, LayoutBackend, LayoutDump, SkinDefinition, NO_STATS_TEXT, PRELIMINARY_TEXT};
use test_utils::{three_slot_skin, ELO_Y, RANK_Y, SLOT_X};

fn skin() -> SkinDefinition {
    SkinDefinition::from_json("default", &three_slot_skin(None).to_string()).unwrap()
}

fn row(game_type: &str, elo: i64, kills: u64, deaths: u64, wins: u64, losses: u64) -> ModeRow {
    ModeRow {
        game_type: game_type.to_string(),
        elo: Some(elo),
        kills,
        deaths,
        wins,
        losses,
        alivetime_minutes: 95,
        ..ModeRow::default()
    }
}

fn player(nick: &str, rows: &[ModeRow]) -> PlayerStatSummary {
    PlayerStatSummary::from_mode_rows(nick, None, rows, ColorScheme::Xonotic)
}

fn two_mode_player() -> PlayerStatSummary {
    player(
        "^7Tester",
        &[row("ctf", 1432, 300, 200, 30, 10), row("duel", 1210, 50, 50, 5, 5)],
    )
}

fn draw(player: &PlayerStatSummary, skin: &SkinDefinition) -> LayoutDump {
    let bytes = render(&LayoutBackend::new(), player, skin).unwrap();
    LayoutDump::from_bytes(&bytes).unwrap()
}

/// X of the ink center of a centered op drawn by the layout backend.
fn center_x(op: &DrawOp) -> f32 {
    op.x + op.text.chars().count() as f32 * op.size * CHAR_WIDTH_FACTOR / 2.0
}

fn near(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ============================================================================
// Rating and rank slots
// ============================================================================

#[test]
fn test_two_ratings_in_three_slots() {
    let dump = draw(&two_mode_player(), &skin());

    let placeholders: Vec<&DrawOp> = dump.ops_with_text(PRELIMINARY_TEXT).collect();
    assert_eq!(placeholders.len(), 1);
    assert!(near(center_x(placeholders[0]), SLOT_X[2]));

    let elos: Vec<&DrawOp> = dump.ops.iter().filter(|op| op.text.starts_with("Elo ")).collect();
    assert_eq!(elos.len(), 2);
    assert_eq!(elos[0].text, "Elo 1432");
    assert_eq!(elos[1].text, "Elo 1210");
    assert!(near(center_x(elos[0]), SLOT_X[0]));
    assert!(near(center_x(elos[1]), SLOT_X[1]));

    let labels: Vec<&str> = dump
        .ops
        .iter()
        .filter(|op| op.text == "CTF" || op.text == "DUEL")
        .map(|op| op.text.as_str())
        .collect();
    assert_eq!(labels, vec!["CTF", "DUEL"]);

    // no rank data, so nothing at all in the rank row
    assert!(dump.ops.iter().all(|op| !op.text.starts_with("Rank ")));
    assert!(dump.ops.iter().all(|op| op.size != 8.0));
    assert_eq!(dump.ops_with_text(NO_STATS_TEXT).count(), 0);
}

#[test]
fn test_placeholder_sits_on_rating_row() {
    let dump = draw(&two_mode_player(), &skin());
    let op = dump.ops_with_text(PRELIMINARY_TEXT).next().unwrap();
    // centered text hangs from the anchor: baseline is one ascent below it
    assert!(op.y > ELO_Y);
    assert!(op.y < RANK_Y);
}

#[test]
fn test_ranks_are_positional() {
    let mut p = two_mode_player();
    p.ranks = Some(vec![RankEntry {
        game_type: "DUEL".into(),
        rank: 4,
        max_rank: 200,
    }]);

    let dump = draw(&p, &skin());

    let rank = dump.ops_with_text("Rank 4 of 200").next().unwrap();
    // first rank slot, whatever its game type
    assert!(near(center_x(rank), SLOT_X[0]));

    let rank_row_placeholders: Vec<&DrawOp> = dump
        .ops_with_text(PRELIMINARY_TEXT)
        .filter(|op| op.size == 8.0)
        .collect();
    assert_eq!(rank_row_placeholders.len(), 2);
    assert!(near(center_x(rank_row_placeholders[0]), SLOT_X[1]));
    assert!(near(center_x(rank_row_placeholders[1]), SLOT_X[2]));
}

#[test]
fn test_no_ratings_draws_no_stats_text() {
    let mut p = two_mode_player();
    p.elos.clear();

    let dump = draw(&p, &skin());

    assert_eq!(dump.ops_with_text(NO_STATS_TEXT).count(), 1);
    assert_eq!(dump.ops_with_text(PRELIMINARY_TEXT).count(), 0);
    assert!(dump.ops.iter().all(|op| !op.text.starts_with("Elo ")));
}

#[test]
fn test_extra_ratings_beyond_slots_are_dropped() {
    let p = player(
        "many",
        &[
            row("ctf", 1500, 1, 1, 1, 1),
            row("dm", 1400, 1, 1, 1, 1),
            row("tdm", 1300, 1, 1, 1, 1),
            row("duel", 1200, 1, 1, 1, 1),
        ],
    );
    let dump = draw(&p, &skin());
    let elos: Vec<&str> = dump
        .ops
        .iter()
        .filter(|op| op.text.starts_with("Elo "))
        .map(|op| op.text.as_str())
        .collect();
    assert_eq!(elos, vec!["Elo 1500", "Elo 1400", "Elo 1300"]);
}

// ============================================================================
// Metrics and labels
// ============================================================================

#[test]
fn test_metric_texts() {
    let dump = draw(&two_mode_player(), &skin());
    let texts: Vec<&str> = dump.ops.iter().map(|op| op.text.as_str()).collect();

    for expected in [
        "Kill Ratio",
        "1.400",
        "350 kills",
        "250 deaths",
        "Win Percentage",
        "70.00%",
        "35 wins",
        "15 losses",
        "Playing Time: 3 hrs, 10 mins",
    ] {
        assert!(texts.contains(&expected), "missing {:?} in {:?}", expected, texts);
    }
}

#[test]
fn test_boundary_metrics_use_mid_color() {
    let p = player("even", &[row("ctf", 1000, 100, 100, 10, 10)]);
    let dump = draw(&p, &skin());

    assert_eq!(dump.ops_with_text("1.000").next().unwrap().color, "#ffff00");
    assert_eq!(dump.ops_with_text("50.00%").next().unwrap().color, "#ffff00");
}

#[test]
fn test_zero_deaths_and_games_are_zero() {
    let p = player("fresh", &[row("ctf", 1000, 12, 0, 0, 0)]);
    let dump = draw(&p, &skin());

    assert_eq!(dump.ops_with_text("0.000").next().unwrap().color, "#ff0000");
    assert_eq!(dump.ops_with_text("0.00%").next().unwrap().color, "#ff0000");
}

#[test]
fn test_right_aligned_metric_ends_at_anchor() {
    let dump = draw(&two_mode_player(), &skin());
    let op = dump.ops_with_text("1.400").next().unwrap();
    let width = 5.0 * op.size * CHAR_WIDTH_FACTOR;
    assert!(near(op.x + width, 120.0));
}

// ============================================================================
// Nickname
// ============================================================================

#[test]
fn test_nick_parts_chain_and_cap_lightness() {
    let p = player("^1Red^x008Navy", &[row("ctf", 1000, 1, 1, 1, 1)]);
    let dump = draw(&p, &skin());

    let red = dump.ops_with_text("Red").next().unwrap();
    let navy = dump.ops_with_text("Navy").next().unwrap();

    assert_eq!(red.x, 53.0);
    assert_eq!(red.y, 20.0);
    assert!(near(navy.x, 53.0 + 3.0 * 22.0 * CHAR_WIDTH_FACTOR));
    assert_eq!(navy.y, 20.0);

    assert_eq!(red.color, "#ff0000");
    // dark blue is lifted to the 0.4 lightness floor
    assert_eq!(navy.color, "#0000cc");
}

#[test]
fn test_long_nick_shrinks_to_fit() {
    let long = "x".repeat(40);
    let p = player(&long, &[row("ctf", 1000, 1, 1, 1, 1)]);
    let dump = draw(&p, &skin());

    let op = dump.ops_with_text(&long).next().unwrap();
    assert_eq!(op.size, 10.0);
    assert!(40.0 * op.size * CHAR_WIDTH_FACTOR <= 260.0);
}

#[test]
fn test_nick_too_long_for_any_size_is_skipped() {
    let long = "W".repeat(2000);
    let p = player(&long, &[row("ctf", 1000, 1, 1, 1, 1)]);
    let dump = draw(&p, &skin());
    assert_eq!(dump.ops_with_text(&long).count(), 0);
    // the rest of the badge is still drawn
    assert_eq!(dump.ops_with_text("Kill Ratio").count(), 1);
}

// ============================================================================
// Shared skin
// ============================================================================

#[test]
fn test_rendering_never_mutates_skin() {
    let skin = skin();
    let before = skin.clone();

    draw(&two_mode_player(), &skin);
    draw(&player("loser", &[row("ctf", 900, 1, 9, 0, 9)]), &skin);

    assert_eq!(skin, before);
}

#[test]
fn test_dump_carries_skin_identity() {
    let dump = draw(&two_mode_player(), &skin());
    assert_eq!(dump.skin, "default");
    assert_eq!((dump.width, dump.height), (560, 70));
}
