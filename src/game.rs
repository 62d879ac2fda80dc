//! The game-state machine: bird physics, the pipe field, collision and
//! scoring rules. Pure logic; sounds and high-score writes are recorded as
//! events for the driver to drain, never performed here.

use rand::{Rng, rngs::SmallRng};

use crate::constants::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Ready,
    Playing,
    GameOver,
}

/// A sound effect requested by game logic, played fire-and-forget.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Clip {
    Start,
    Flap,
    Score,
    Hit,
    Die,
}

impl Clip {
    pub const ALL: [Clip; 5] = [Clip::Start, Clip::Flap, Clip::Score, Clip::Hit, Clip::Die];
}

#[derive(Clone, Debug)]
pub struct Pipe {
    pub x: f64,
    pub top: f64,
    pub bottom: f64,
    pub scored: bool,
}

/// Bird-vs-pipe overlap. The bird clears a pipe only when it is fully inside
/// the gap column or outside the pipe's horizontal span.
pub fn collides(bird_y: f64, pipe: &Pipe) -> bool {
    BIRD_X < pipe.x + PIPE_W
        && BIRD_X + BIRD_W > pipe.x
        && (bird_y < pipe.top || bird_y + BIRD_H > pipe.bottom)
}

pub struct Game {
    pub state: State,
    pub bird_y: f64,
    pub bird_vel: f64,
    pub bird_frame: usize,
    pub pipes: Vec<Pipe>,
    pub score: u32,
    pub best: u32,
    pub frame: u64,
    rng: SmallRng,
    queued_taps: u32,
    sounds: Vec<Clip>,
    new_record: Option<u32>,
}

impl Game {
    pub fn new(best: u32, rng: SmallRng) -> Self {
        Game {
            state: State::Ready,
            bird_y: BIRD_START_Y,
            bird_vel: 0.0,
            bird_frame: 0,
            pipes: Vec::new(),
            score: 0,
            best,
            frame: 0,
            rng,
            queued_taps: 0,
            sounds: Vec::new(),
            new_record: None,
        }
    }

    /// Enqueue a tap intent. Applied by the next `update`, one per tick, so
    /// transitions stay deterministic no matter when input arrives.
    pub fn tap(&mut self) {
        self.queued_taps += 1;
    }

    /// Advance the game by one tick.
    pub fn update(&mut self) {
        self.apply_tap();
        self.step_bird();
        if self.state == State::Playing {
            self.step_pipes();
        }
        self.frame += 1;
    }

    /// Sounds requested since the last drain, in emission order.
    pub fn drain_sounds(&mut self) -> Vec<Clip> {
        std::mem::take(&mut self.sounds)
    }

    /// A freshly raised high score awaiting write-through, if any.
    pub fn take_new_record(&mut self) -> Option<u32> {
        self.new_record.take()
    }

    fn apply_tap(&mut self) {
        if self.queued_taps == 0 {
            return;
        }
        self.queued_taps -= 1;
        match self.state {
            State::Ready => {
                self.state = State::Playing;
                self.sounds.push(Clip::Start);
            }
            State::Playing => {
                self.bird_vel = FLAP_VELOCITY;
                self.sounds.push(Clip::Flap);
            }
            State::GameOver => self.reset(),
        }
    }

    fn reset(&mut self) {
        self.state = State::Ready;
        self.pipes.clear();
        self.score = 0;
        self.bird_y = BIRD_START_Y;
        self.bird_vel = 0.0;
        self.bird_frame = 0;
        // frame counter and best intentionally survive the reset
    }

    fn step_bird(&mut self) {
        match self.state {
            State::Playing => {
                self.bird_vel += GRAVITY;
                self.bird_y += self.bird_vel;
                if self.frame % BIRD_ANIM_PERIOD == 0 {
                    self.bird_frame = (self.bird_frame + 1) % BIRD_FRAMES;
                }
                if self.bird_y + BIRD_H >= GROUND_Y {
                    self.state = State::GameOver;
                    self.sounds.push(Clip::Die);
                }
            }
            // Keeps falling past the ground with whatever velocity it had.
            State::GameOver => self.bird_y += self.bird_vel,
            State::Ready => {}
        }
    }

    fn step_pipes(&mut self) {
        if self.frame % PIPE_SPAWN_PERIOD == 0 {
            self.spawn_pipe();
        }
        self.advance_pipes();
        self.check_scoring();
        self.check_pipe_collision();
        self.prune_offscreen();
    }

    fn spawn_pipe(&mut self) {
        let top = self.rng.gen_range(PIPE_MIN_TOP..PIPE_MAX_TOP);
        self.pipes.push(Pipe {
            x: CANVAS_W,
            top,
            bottom: top + PIPE_GAP,
            scored: false,
        });
    }

    fn advance_pipes(&mut self) {
        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
        }
    }

    fn check_scoring(&mut self) {
        for pipe in &mut self.pipes {
            if !pipe.scored && BIRD_X > pipe.x + PIPE_W {
                pipe.scored = true;
                self.score += 1;
                self.sounds.push(Clip::Score);
            }
        }
    }

    fn check_pipe_collision(&mut self) {
        for pipe in &self.pipes {
            if collides(self.bird_y, pipe) {
                self.state = State::GameOver;
                self.sounds.push(Clip::Hit);
                self.sounds.push(Clip::Die);
                if self.score > self.best {
                    self.best = self.score;
                    self.new_record = Some(self.best);
                }
                // first hit ends the scan; a second overlapping pipe must
                // not fire the sounds or the record again
                break;
            }
        }
    }

    fn prune_offscreen(&mut self) {
        self.pipes.retain(|pipe| pipe.x + PIPE_W >= 0.0);
    }
}
