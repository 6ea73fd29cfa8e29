//! Small entities: XP orbs, projectiles and visual effects

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use crate::consts::{MAX_PARTICLES, MAX_SHOCKWAVES, XP_ORB_SIZE};
use crate::normalize_angle;
use crate::renderer::{Canvas, colors};

/// Experience dropped by a killed enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpOrb {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
    pub value: f32,
}

impl XpOrb {
    pub fn new(pos: Vec2, value: f32) -> Self {
        Self {
            pos,
            radius: XP_ORB_SIZE,
            color: colors::XP_ORB,
            value,
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.fill_circle(self.pos, self.radius, self.color);
    }
}

/// Steering parameters for homing projectiles
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Homing {
    /// Maximum heading change per frame (radians)
    pub turn_rate: f32,
}

/// A weapon shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Pixels per frame
    pub speed: f32,
    pub radius: f32,
    pub color: [f32; 4],
    pub damage: f32,
    pub max_range: Option<f32>,
    pub distance_traveled: f32,
    pub homing: Option<Homing>,
}

impl Projectile {
    /// Create a projectile heading along `angle`
    pub fn new(id: u32, pos: Vec2, angle: f32, speed: f32, radius: f32, damage: f32, color: [f32; 4]) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            speed,
            radius,
            color,
            damage,
            max_range: None,
            distance_traveled: 0.0,
            homing: None,
        }
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.max_range = Some(range);
        self
    }

    pub fn with_homing(mut self, turn_rate: f32) -> Self {
        self.homing = Some(Homing { turn_rate });
        self
    }

    /// Current heading (radians)
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    /// Advance one frame. Returns true once the projectile has exhausted its range.
    pub fn update(&mut self, enemies: &[Enemy]) -> bool {
        if let Some(homing) = self.homing {
            let nearest = enemies.iter().min_by(|a, b| {
                a.pos
                    .distance_squared(self.pos)
                    .total_cmp(&b.pos.distance_squared(self.pos))
            });
            if let Some(target) = nearest {
                let desired = crate::bearing(self.pos, target.pos);
                let current = self.heading();
                let delta = normalize_angle(desired - current);
                let turn = delta.clamp(-homing.turn_rate, homing.turn_rate);
                let heading = current + turn;
                self.vel = Vec2::new(heading.cos(), heading.sin()) * self.speed;
            }
        }

        self.pos += self.vel;

        match self.max_range {
            Some(range) => {
                self.distance_traveled += self.vel.length();
                self.distance_traveled > range
            }
            None => false,
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.fill_circle(self.pos, self.radius, self.color);
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 4],
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Expanding ring, purely visual
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shockwave {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub color: [f32; 4],
    /// 0-1, decreases over time
    pub life: f32,
}

/// Visual-only entities (not gameplay-affecting)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub shockwaves: Vec<Shockwave>,
}

impl Effects {
    /// Radial particle burst (enemy death, blob split)
    pub fn burst(&mut self, rng: &mut impl Rng, pos: Vec2, color: [f32; 4], count: usize) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let theta = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(0.5..2.5);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(theta.cos(), theta.sin()) * speed,
                color,
                life: 1.0,
                size: rng.random_range(1.5..3.5),
            });
        }
    }

    pub fn shockwave(&mut self, pos: Vec2, max_radius: f32, color: [f32; 4]) {
        if self.shockwaves.len() >= MAX_SHOCKWAVES {
            return;
        }
        self.shockwaves.push(Shockwave {
            pos,
            radius: 0.0,
            max_radius,
            color,
            life: 1.0,
        });
    }

    /// Advance one frame and drop expired effects
    pub fn update(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.vel *= 0.95;
            particle.life -= 0.04;
        }
        self.particles.retain(|p| p.life > 0.0);

        for wave in self.shockwaves.iter_mut() {
            wave.life -= 0.05;
            wave.radius = wave.max_radius * (1.0 - wave.life.max(0.0));
        }
        self.shockwaves.retain(|w| w.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.shockwaves.clear();
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        for particle in &self.particles {
            let mut color = particle.color;
            color[3] *= particle.life;
            canvas.fill_circle(particle.pos, particle.size, color);
        }
        for wave in &self.shockwaves {
            let mut color = wave.color;
            color[3] *= wave.life;
            canvas.stroke_circle(wave.pos, wave.radius, 3.0, color);
        }
    }
}
