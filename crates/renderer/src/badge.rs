//! The badge engine: places a player's stats on a canvas according to a skin.

use badge_common::{BadgeResult, ColoredString, PlayerStatSummary};
use tracing::trace;

use crate::backend::{BadgeBackend, TextCanvas};
use crate::gradient::{shade_kd_ratio, shade_win_pct};
use crate::layout::{shrink_to_fit, TextStyle};
use crate::skin::{SkinDefinition, TextPlacement};

/// Drawn in a rating or rank slot that has no data.
pub const PRELIMINARY_TEXT: &str = "(preliminary)";
/// Drawn instead of the slots when the player has no ratings at all.
pub const NO_STATS_TEXT: &str = "(no stats yet)";

/// Render one badge and return the encoded bytes.
pub fn render(
    backend: &dyn BadgeBackend,
    player: &PlayerStatSummary,
    skin: &SkinDefinition,
) -> BadgeResult<Vec<u8>> {
    let mut canvas = backend.begin(skin)?;
    render_badge(canvas.as_mut(), player, skin)?;
    canvas.finish()
}

/// Draw every text element of `skin` for `player`.
pub fn render_badge(
    canvas: &mut dyn TextCanvas,
    player: &PlayerStatSummary,
    skin: &SkinDefinition,
) -> BadgeResult<()> {
    place_nick(canvas, &player.nick, skin)?;
    place_ratings(canvas, player, skin)?;
    place_ranks(canvas, player, skin)?;

    // kill ratio
    place(canvas, "Kill Ratio", skin, &skin.kd_ratio_label)?;
    let kd_ratio = player.kd_ratio();
    let style = TextStyle::from_placement(skin, &skin.kd_ratio)
        .with_color(shade_kd_ratio(kd_ratio, &skin.kd_ratio));
    place_styled(canvas, &format!("{:.3}", kd_ratio), &style)?;
    place(canvas, &format!("{} kills", player.kills), skin, &skin.kills)?;
    place(canvas, &format!("{} deaths", player.deaths), skin, &skin.deaths)?;

    // win percentage
    place(canvas, "Win Percentage", skin, &skin.win_pct_label)?;
    let win_pct = player.win_pct();
    let style = TextStyle::from_placement(skin, &skin.win_pct)
        .with_color(shade_win_pct(win_pct, &skin.win_pct));
    place_styled(canvas, &format!("{:.2}%", win_pct), &style)?;
    place(canvas, &format!("{} wins", player.wins), skin, &skin.wins)?;
    place(canvas, &format!("{} losses", player.losses), skin, &skin.losses)?;

    place(
        canvas,
        &format!("Playing Time: {}", player.playing_time_string()),
        skin,
        &skin.playing_time,
    )?;

    Ok(())
}

/// Rating slots are positional: slot `i` shows the `i`-th best rating.
fn place_ratings(
    canvas: &mut dyn TextCanvas,
    player: &PlayerStatSummary,
    skin: &SkinDefinition,
) -> BadgeResult<()> {
    if player.elos.is_empty() {
        return place(canvas, NO_STATS_TEXT, skin, &skin.no_stats);
    }

    for (slot, elo_placement) in skin.elo.iter().take(skin.slot_count()).enumerate() {
        match player.elos.get(slot) {
            Some(entry) => {
                if let Some(label) = skin.game_type.get(slot) {
                    place(canvas, &entry.game_type, skin, label)?;
                }
                place(canvas, &format!("Elo {}", entry.elo), skin, elo_placement)?;
            }
            None => place(canvas, PRELIMINARY_TEXT, skin, elo_placement)?,
        }
    }
    Ok(())
}

/// Rank slots are drawn only when the player has rank data at all.
fn place_ranks(
    canvas: &mut dyn TextCanvas,
    player: &PlayerStatSummary,
    skin: &SkinDefinition,
) -> BadgeResult<()> {
    let Some(ranks) = &player.ranks else {
        return Ok(());
    };

    for (slot, placement) in skin.rank.iter().take(skin.slot_count()).enumerate() {
        match ranks.get(slot) {
            Some(r) => place(
                canvas,
                &format!("Rank {} of {}", r.rank, r.max_rank),
                skin,
                placement,
            )?,
            None => place(canvas, PRELIMINARY_TEXT, skin, placement)?,
        }
    }
    Ok(())
}

/// Draw a colored nickname, shrinking it to the placement's maximum width.
///
/// Each colored run starts where the previous one's advance ended and has
/// its color pulled into the skin's lightness band.
fn place_nick(
    canvas: &mut dyn TextCanvas,
    nick: &ColoredString,
    skin: &SkinDefinition,
) -> BadgeResult<()> {
    let mut style = TextStyle::from_placement(skin, &skin.nick);
    if !style.is_visible() || nick.is_empty() {
        return Ok(());
    }

    let stripped = nick.stripped();
    if let Some(max_width) = skin.nick.max_width() {
        let start = style.size;
        style.size = shrink_to_fit(start, max_width, |size| {
            canvas
                .measure(stripped, &style.with_size(size))
                .map(|e| e.width)
        })?;
        if style.size != start {
            trace!(nick = stripped, from = start, to = style.size, "Shrunk nickname");
        }
        if !style.is_visible() {
            return Ok(());
        }
    }

    let (mut x, mut y) = if style.needs_extents() {
        let extents = canvas.measure(stripped, &style)?;
        style.origin(&extents)
    } else {
        (style.anchor.x, style.anchor.y)
    };

    let (sin, cos) = style.angle.to_radians().sin_cos();
    for part in nick.color_parts() {
        if part.text.is_empty() {
            continue;
        }
        let color = if skin.caps_nick_lightness() {
            part.color
                .cap_lightness(skin.nick_lightness_floor, skin.nick_lightness_ceiling)
        } else {
            part.color
        };
        let part_style = style.clone().with_color(color);

        canvas.draw(&part.text, (x, y), &part_style)?;

        let advance = canvas.measure(&part.text, &part_style)?.x_advance;
        x += advance * cos;
        y += advance * sin;
    }
    Ok(())
}

fn place(
    canvas: &mut dyn TextCanvas,
    text: &str,
    skin: &SkinDefinition,
    placement: &TextPlacement,
) -> BadgeResult<()> {
    place_styled(canvas, text, &TextStyle::from_placement(skin, placement))
}

fn place_styled(canvas: &mut dyn TextCanvas, text: &str, style: &TextStyle) -> BadgeResult<()> {
    if !style.is_visible() || text.is_empty() {
        return Ok(());
    }

    let origin = if style.needs_extents() {
        let extents = canvas.measure(text, style)?;
        style.origin(&extents)
    } else {
        (style.anchor.x, style.anchor.y)
    };
    canvas.draw(text, origin, style)
}
