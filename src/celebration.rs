use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const CONFETTI: [char; 6] = ['*', '+', '•', '✦', '◆', 'o'];
const GRAVITY: f64 = 12.0;
const OFFSCREEN_MARGIN: f64 = 4.0;
/// Seconds the burst stays on screen
pub const CELEBRATION_SECS: f64 = 3.0;

/// How the finished session ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    /// Any finished session
    Confetti,
    /// Error-free finish; the confetti also spells a banner
    Perfect,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    age: f64,
    max_age: f64,
    /// Banner particles glide to a fixed slot instead of falling
    anchor: Option<(f64, f64)>,
}

impl Particle {
    fn confetti(x: f64, y: f64, rng: &mut StdRng) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-9.0..-3.0),
            symbol: *CONFETTI.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: rng.gen_range(1.5..CELEBRATION_SECS),
            anchor: None,
        }
    }

    fn banner(from: (f64, f64), to: (f64, f64), symbol: char, color_index: usize) -> Self {
        Self {
            x: from.0,
            y: from.1,
            vel_x: (to.0 - from.0) * 2.0,
            vel_y: (to.1 - from.1) * 2.0,
            symbol,
            color_index,
            age: 0.0,
            max_age: CELEBRATION_SECS,
            anchor: Some(to),
        }
    }

    pub fn is_banner(&self) -> bool {
        self.anchor.is_some()
    }

    /// Advance by `dt` seconds; false once the particle has expired
    fn update(&mut self, dt: f64) -> bool {
        match self.anchor {
            Some((tx, ty)) => {
                let dist = ((tx - self.x).powi(2) + (ty - self.y).powi(2)).sqrt();
                if dist > 0.5 {
                    self.x += self.vel_x * dt;
                    self.y += self.vel_y * dt;
                    self.vel_x *= 0.9;
                    self.vel_y *= 0.9;
                } else {
                    self.x = tx;
                    self.y = ty;
                    self.vel_x = 0.0;
                    self.vel_y = 0.0;
                }
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += GRAVITY * dt;
            }
        }
        self.age += dt;
        self.age < self.max_age
    }
}

/// Confetti shown over the results card. Stepped by the host tick, so it
/// holds no clock of its own.
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub burst: Option<Burst>,
    elapsed: f64,
    width: f64,
    height: f64,
    rng: StdRng,
}

impl Celebration {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            burst: None,
            elapsed: 0.0,
            width: 80.0,
            height: 24.0,
            rng,
        }
    }

    pub fn is_active(&self) -> bool {
        self.burst.is_some()
    }

    pub fn start(&mut self, burst: Burst, width: u16, height: u16) {
        self.particles.clear();
        self.burst = Some(burst);
        self.elapsed = 0.0;
        self.width = width as f64;
        self.height = height as f64;

        let cx = self.width / 2.0;
        let cy = self.height / 2.0;

        if burst == Burst::Perfect {
            self.spell("PERFECT", cx, cy - 2.0);
        }
        for _ in 0..40 {
            let x = cx + self.rng.gen_range(-self.width / 3.0..=self.width / 3.0);
            let y = cy + self.rng.gen_range(-2.0..=2.0);
            let particle = Particle::confetti(x, y, &mut self.rng);
            self.particles.push(particle);
        }
    }

    fn spell(&mut self, word: &str, cx: f64, cy: f64) {
        let spacing = 2.0;
        let left = cx - (word.chars().count() as f64 - 1.0) * spacing / 2.0;
        for (i, ch) in word.chars().enumerate() {
            let to = (left + i as f64 * spacing, cy);
            let from = (
                cx + self.rng.gen_range(-10.0..10.0),
                cy + self.rng.gen_range(-4.0..4.0),
            );
            self.particles.push(Particle::banner(from, to, ch, i % 6));
        }
    }

    /// Step the animation by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        if self.burst.is_none() {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= CELEBRATION_SECS {
            self.stop();
            return;
        }

        let (w, h) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(dt);
            let offscreen = !p.is_banner()
                && (p.y > h + OFFSCREEN_MARGIN
                    || p.x < -OFFSCREEN_MARGIN
                    || p.x > w + OFFSCREEN_MARGIN);
            alive && !offscreen
        });
    }

    pub fn stop(&mut self) {
        self.burst = None;
        self.particles.clear();
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
