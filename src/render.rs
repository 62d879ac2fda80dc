//! Terminal rendering: an RGB pixel buffer presented with half-block
//! characters, a 3x5 bitmap font, and the scene painters. Everything here
//! reads game state and never mutates it.

use std::io::{self, Write};

use crossterm::{cursor, queue, style, style::Color as CColor};

use crate::constants::*;
use crate::game::{Game, State};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

const LETTERBOX: Rgb = Rgb(18, 18, 24);
const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const WHITE: Rgb = Rgb(255, 255, 255);
const GOLD: Rgb = Rgb(245, 200, 66);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    pub w: usize,
    pub h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, LETTERBOX);
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Write the buffer to the terminal as rows of U+2580 half blocks, two
    /// pixels per cell, batching color changes.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(
                            out,
                            style::SetForegroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: bot.0,
                                g: bot.1,
                                b: bot.2
                            })
                        )?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── Viewport: fixed 320x480 logical canvas, letterboxed ─────────────────────

pub struct Viewport {
    scale: f64,
    ox: i32,
    oy: i32,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize) -> Self {
        let scale = (pw as f64 / CANVAS_W).min(ph as f64 / CANVAS_H);
        Viewport {
            scale,
            ox: ((pw as f64 - CANVAS_W * scale) / 2.0) as i32,
            oy: ((ph as f64 - CANVAS_H * scale) / 2.0) as i32,
        }
    }

    pub fn px(&self, x: f64) -> i32 {
        self.ox + (x * self.scale).round() as i32
    }

    pub fn py(&self, y: f64) -> i32 {
        self.oy + (y * self.scale).round() as i32
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn glyph(ch: char) -> Option<[u8; 15]> {
    if let Some(d) = ch.to_digit(10) {
        return Some(DIGITS[d as usize]);
    }
    let g = match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'C' => [1,1,1, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'D' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0],
        'E' => [1,1,1, 1,0,0, 1,1,1, 1,0,0, 1,1,1],
        'G' => [1,1,1, 1,0,0, 1,0,1, 1,0,1, 1,1,1],
        'H' => [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'I' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,0,1, 1,0,1, 1,0,1],
        'O' => [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        'P' => [1,1,1, 1,0,1, 1,1,1, 1,0,0, 1,0,0],
        'R' => [1,1,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'Y' => [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0],
        _ => return None,
    };
    Some(g)
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, g: &[u8; 15], fg: Rgb) {
    for row in 0..5 {
        for col in 0..3 {
            if g[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Width in pixels of a string in the 3x5 font (4px advance, no trailing gap).
pub fn text_width(s: &str) -> i32 {
    s.chars().count() as i32 * 4 - 1
}

pub fn draw_text(buf: &mut PixelBuf, x: i32, y: i32, s: &str, fg: Rgb) {
    for (i, ch) in s.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            draw_glyph(buf, x + i as i32 * 4, y, &g, fg);
        }
    }
}

fn draw_text_centered(buf: &mut PixelBuf, cx: i32, y: i32, s: &str, fg: Rgb) {
    draw_text(buf, cx - text_width(s) / 2, y, s, fg);
}

// ── Scene ───────────────────────────────────────────────────────────────────

pub fn draw_frame(game: &Game, buf: &mut PixelBuf) {
    let vp = Viewport::fit(buf.w, buf.h);
    buf.clear(LETTERBOX);
    draw_sky(buf, &vp);
    draw_hills(buf, &vp);

    match game.state {
        State::Ready => draw_ready(game, buf, &vp),
        State::Playing => {
            draw_pipes(game, buf, &vp);
            draw_bird(game, buf, &vp);
            draw_hud_score(game, buf);
        }
        State::GameOver => draw_game_over(game, buf, &vp),
    }

    // ground band is drawn last, every tick, whatever the state
    draw_ground(buf, &vp);
}

fn draw_sky(buf: &mut PixelBuf, vp: &Viewport) {
    let top = vp.py(0.0);
    let bot = vp.py(GROUND_Y);
    let x0 = vp.px(0.0);
    let x1 = vp.px(CANVAS_W);
    for y in top..bot {
        let t = (((y - top) * 256) / (bot - top).max(1)) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in x0..x1 {
            buf.set(x, y, c);
        }
    }
}

fn draw_hills(buf: &mut PixelBuf, vp: &Viewport) {
    let base = vp.py(GROUND_Y);
    let x0 = vp.px(0.0);
    let x1 = vp.px(CANVAS_W);
    for x in x0..x1 {
        let fx = x as f64 * 0.04;
        let far = (fx.sin() * 3.0 + (fx * 1.7).sin() * 1.5 + 5.0) as i32;
        for y in (base - far)..base {
            buf.set(x, y, HILL_FAR);
        }
        let nx = x as f64 * 0.07 + 2.0;
        let near = (nx.sin() * 2.0 + (nx * 2.3).sin() * 1.0 + 3.0) as i32;
        for y in (base - near)..base {
            buf.set(x, y, HILL_NEAR);
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, vp: &Viewport) {
    let gy = vp.py(GROUND_Y);
    let gend = vp.py(CANVAS_H);
    let x0 = vp.px(0.0);
    let x1 = vp.px(CANVAS_W);
    for x in x0..x1 {
        let alt = (x / 3) % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
    }
    for y in (gy + 2)..gend {
        for x in x0..x1 {
            let stripe = (x + (y - gy) * 2) % 12 < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

fn draw_pipes(game: &Game, buf: &mut PixelBuf, vp: &Viewport) {
    let sky_top = vp.py(0.0);
    let ground = vp.py(GROUND_Y);
    let cx0 = vp.px(0.0);
    let cx1 = vp.px(CANVAS_W);
    let cap_h = ((8.0 * vp.scale) as i32).clamp(1, 3);

    for pipe in &game.pipes {
        let x0 = vp.px(pipe.x);
        let w = (vp.px(pipe.x + PIPE_W) - x0).max(2);
        let top_edge = vp.py(pipe.top); // bottom of the top segment
        let bot_edge = vp.py(pipe.bottom); // top of the bottom segment

        // bodies; columns are clipped to the canvas so a freshly spawned
        // pipe never bleeds into the letterbox band
        for dx in 0..w {
            let x = x0 + dx;
            if x < cx0 || x >= cx1 {
                continue;
            }
            let c = pipe_shade(dx, w);
            for y in sky_top..(top_edge - cap_h) {
                buf.set(x, y, c);
            }
            for y in (bot_edge + cap_h)..ground {
                buf.set(x, y, c);
            }
        }
        // cap flanges, one pixel proud of the body on each side
        for dx in -1..=w {
            let x = x0 + dx;
            if x < cx0 || x >= cx1 {
                continue;
            }
            let c = pipe_shade((dx + 1).clamp(0, w + 1), w + 2);
            for y in (top_edge - cap_h).max(sky_top)..top_edge {
                buf.set(x, y, c);
            }
            for y in bot_edge..(bot_edge + cap_h).min(ground) {
                buf.set(x, y, c);
            }
            buf.set(x, top_edge - 1, CAP_DARK);
            buf.set(x, bot_edge, CAP_DARK);
        }
    }
}

fn draw_bird(game: &Game, buf: &mut PixelBuf, vp: &Viewport) {
    let x0 = vp.px(BIRD_X);
    let y0 = vp.py(game.bird_y);
    let w = (vp.px(BIRD_X + BIRD_W) - x0).max(3);
    let h = (vp.py(game.bird_y + BIRD_H) - y0).max(2);
    let cy0 = vp.py(0.0);
    let cy1 = vp.py(CANVAS_H);

    // clip rows to the canvas; the bird may overshoot the top edge
    let mut put = |buf: &mut PixelBuf, x: i32, y: i32, c: Rgb| {
        if y >= cy0 && y < cy1 {
            buf.set(x, y, c);
        }
    };

    for dy in 0..h {
        for dx in 0..w {
            let c = if dy == 0 { BIRD_HI } else { BIRD_BODY };
            put(buf, x0 + dx, y0 + dy, c);
        }
    }

    // wing position cycles with the animation frame: up, mid, down
    let wing_y = y0 + (game.bird_frame as i32 * (h - 1).max(1)) / 2;
    for dy in 0..(h / 3).max(1) {
        for dx in 0..(w / 2).max(1) {
            put(buf, x0 + dx, wing_y + dy, BIRD_WING);
        }
    }

    put(buf, x0 + w - 2, y0 + 1, BIRD_EYE);
    put(buf, x0 + w - 1, y0 + 1, BIRD_PUPIL);
    for dy in 0..(h / 3).max(1) {
        put(buf, x0 + w - 1, y0 + h / 2 + dy, BIRD_BEAK);
    }
}

fn draw_hud_score(game: &Game, buf: &mut PixelBuf) {
    let s = format!("SCORE {}", game.score);
    draw_text(buf, buf.w as i32 - text_width(&s) - 3, 2, &s, WHITE);
}

fn tap_prompt_bounce(frame: u64) -> i32 {
    if (frame / TAP_PROMPT_PERIOD) % 2 == 0 { 0 } else { 2 }
}

fn draw_ready(game: &Game, buf: &mut PixelBuf, vp: &Viewport) {
    let cx = vp.px(CANVAS_W / 2.0);
    draw_text_centered(buf, cx, vp.py(120.0), "GET READY", WHITE);
    let bounce = tap_prompt_bounce(game.frame);
    draw_text_centered(buf, cx, vp.py(240.0) + bounce, "TAP", GOLD);
}

fn draw_game_over(game: &Game, buf: &mut PixelBuf, vp: &Viewport) {
    let cx = vp.px(CANVAS_W / 2.0);
    draw_text_centered(buf, cx, vp.py(170.0), "GAME OVER", WHITE);
    draw_text_centered(buf, cx, vp.py(230.0), &format!("SCORE {}", game.score), WHITE);
    draw_text_centered(buf, cx, vp.py(260.0), &format!("HIGH SCORE {}", game.best), GOLD);
    let bounce = tap_prompt_bounce(game.frame);
    draw_text_centered(buf, cx, vp.py(280.0) + bounce, "TAP", GOLD);
}
