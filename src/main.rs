use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseEventKind},
    execute, terminal,
};
use rand::{SeedableRng, rngs::SmallRng};

use tapwing::audio::Audio;
use tapwing::constants::FRAME_MS;
use tapwing::game::Game;
use tapwing::render::{PixelBuf, draw_frame};
use tapwing::store::HighScoreStore;

fn main() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);

    let store = HighScoreStore::open();
    let audio = Audio::new(); // None means we play silently
    let mut game = Game::new(store.load(), SmallRng::from_entropy());

    let frame_dur = Duration::from_millis(FRAME_MS); // ~60 fps, matches the physics tuning

    loop {
        let frame_start = Instant::now();

        // Input: taps are queued here and applied inside update
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        cleanup(&mut out)?;
                        return Ok(());
                    }
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => game.tap(),
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(_) = mouse.kind {
                        game.tap();
                    }
                }
                Event::Resize(c, r) => buf.resize(c as usize, r as usize * 2),
                _ => {}
            }
        }

        // Update, then drain the tick's side effects
        game.update();
        for clip in game.drain_sounds() {
            if let Some(audio) = &audio {
                audio.play(clip);
            }
        }
        if let Some(best) = game.take_new_record() {
            store.save(best);
        }

        // Render
        draw_frame(&game, &mut buf);
        buf.render(&mut out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
