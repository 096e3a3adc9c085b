use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::constants::*;
use crate::entities::{Asteroid, Bullet, Ship, WrappingBody};
use crate::error::GameError;
use crate::registry::EntityRegistry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// Terminal: ticks and player actions no longer change anything.
    GameOver,
}

/// The five discrete things a player can ask the ship to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    RotateLeft,
    RotateRight,
    ThrustForward,
    ThrustBackward,
    Fire,
}

/// What happened during one call to [`Game::step`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub asteroids_destroyed: usize,
    pub fragments_spawned: usize,
    pub bullets_consumed: usize,
    pub bullets_expired: usize,
    pub points_awarded: u32,
    pub ship_hit: bool,
    pub level_advanced: bool,
    pub game_over: bool,
}

/// Borrowed snapshot handed to the render hook.
#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    pub width: i32,
    pub height: i32,
    pub ship: &'a Ship,
    pub asteroids: &'a [Asteroid],
    pub bullets: &'a [Bullet],
    pub score: u32,
    pub lives: u32,
    pub level: i32,
    pub state: SessionState,
}

impl RenderView<'_> {
    pub fn is_alive(&self) -> bool {
        self.state == SessionState::Active
    }
}

// Which asteroids a bullet destroyed this tick and which bullets were spent.
struct BulletHits {
    destroyed: Vec<bool>,
    consumed: Vec<bool>,
}

/// One play session: the ship, the live entities and the score/lives/level
/// bookkeeping. All state changes go through [`Game::apply`] and [`Game::step`].
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    ship: Ship,
    registry: EntityRegistry,
    score: u32,
    lives: u32,
    level: i32,
    state: SessionState,
    rng: StdRng,
    ticks: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut game = Game {
            ship: Ship::centered(config.width, config.height),
            registry: EntityRegistry::new(),
            score: 0,
            lives: STARTING_LIVES,
            level: STARTING_LEVEL,
            state: SessionState::Active,
            rng: StdRng::seed_from_u64(config.seed),
            ticks: 0,
            config,
        };
        game.spawn_wave();
        info!(
            "Session started: {}x{} field, seed {}",
            game.config.width, game.config.height, game.config.seed
        );
        Ok(game)
    }

    /// Starts a fresh session on the same field. The spawn generator keeps
    /// its stream rather than being reseeded.
    pub fn restart(&mut self) {
        self.ship = Ship::centered(self.config.width, self.config.height);
        self.registry.clear();
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = STARTING_LEVEL;
        self.state = SessionState::Active;
        self.ticks = 0;
        self.spawn_wave();
        info!("Session restarted");
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn view(&self) -> RenderView<'_> {
        RenderView {
            width: self.config.width,
            height: self.config.height,
            ship: &self.ship,
            asteroids: self.registry.asteroids(),
            bullets: self.registry.bullets(),
            score: self.score,
            lives: self.lives,
            level: self.level,
            state: self.state,
        }
    }

    /// Applies one player action. Returns false when the session is over and
    /// the action was ignored.
    pub fn apply(&mut self, action: PlayerAction) -> bool {
        if !self.is_alive() {
            return false;
        }
        let (width, height) = (self.config.width, self.config.height);
        match action {
            PlayerAction::RotateLeft => self.ship.rotate(-SHIP_ROTATION_STEP),
            PlayerAction::RotateRight => self.ship.rotate(SHIP_ROTATION_STEP),
            PlayerAction::ThrustForward => self.ship.thrust(SHIP_THRUST_STEP, width, height),
            PlayerAction::ThrustBackward => self.ship.thrust(-SHIP_THRUST_STEP, width, height),
            PlayerAction::Fire => self.fire_bullet(),
        }
        true
    }

    /// Spawns a bullet at the ship's muzzle travelling along its heading.
    /// There is no cooldown and no cap on live bullets.
    fn fire_bullet(&mut self) {
        let bullet = Bullet::new(self.ship.front(), self.ship.heading);
        debug!("Fired bullet at ({}, {}) heading {}", bullet.position.x, bullet.position.y, bullet.heading.units());
        self.registry.push_bullet(bullet);
    }

    /// Advances the session by one tick. A no-op once the game is over.
    pub fn step(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if !self.is_alive() {
            return report;
        }
        self.ticks += 1;

        self.move_asteroids();
        self.move_bullets();

        let hits = self.scan_bullet_hits();
        self.resolve_destroyed(&hits.destroyed, &mut report);
        self.purge_bullets(&hits.consumed, &mut report);

        self.check_ship_collision(&mut report);

        if !self.registry.has_asteroids() {
            self.level += 1;
            self.spawn_wave();
            report.level_advanced = true;
            info!("Advanced to level {} with {} asteroids", self.level, self.registry.asteroids().len());
        }

        if self.lives == 0 {
            self.state = SessionState::GameOver;
            report.game_over = true;
            info!("Game over after {} ticks, final score {}", self.ticks, self.score);
        }

        report
    }

    fn move_asteroids(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        for asteroid in self.registry.asteroids_mut() {
            asteroid.update_position(ASTEROID_SPEED, width, height);
        }
    }

    // Only bullets still on screen move; anything already outside waits for
    // the purge.
    fn move_bullets(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        for bullet in self.registry.bullets_mut() {
            if bullet.is_on_screen(width, height) {
                bullet.update_position(BULLET_SPEED);
            }
        }
    }

    // First unclaimed bullet in registration order wins each asteroid; a
    // bullet is credited to at most one asteroid.
    fn scan_bullet_hits(&self) -> BulletHits {
        let asteroids = self.registry.asteroids();
        let bullets = self.registry.bullets();
        let mut destroyed = vec![false; asteroids.len()];
        let mut consumed = vec![false; bullets.len()];

        for (i, asteroid) in asteroids.iter().enumerate() {
            let hit = (0..bullets.len()).find(|&j| !consumed[j] && asteroid.collides(&bullets[j]));
            if let Some(j) = hit {
                destroyed[i] = true;
                consumed[j] = true;
                debug!("Bullet {j} destroyed asteroid {i} (radius {})", asteroid.radius);
            }
        }

        BulletHits { destroyed, consumed }
    }

    fn resolve_destroyed(&mut self, destroyed: &[bool], report: &mut TickReport) {
        let mut fragments = Vec::new();
        for (i, asteroid) in self.registry.asteroids().iter().enumerate().rev() {
            if !destroyed[i] {
                continue;
            }
            let points = asteroid.score_value();
            self.score += points;
            report.points_awarded += points;
            fragments.extend(asteroid.fragments(&mut self.rng));
        }

        report.asteroids_destroyed = self.registry.remove_asteroids(destroyed);
        report.fragments_spawned = fragments.len();
        self.registry.extend_asteroids(fragments);
    }

    // Spent bullets and bullets that are now off screen go together, after the
    // hit scan, so a bullet that left the field this tick can still score.
    fn purge_bullets(&mut self, consumed: &[bool], report: &mut TickReport) {
        let (width, height) = (self.config.width, self.config.height);
        let doomed: Vec<bool> = self
            .registry
            .bullets()
            .iter()
            .zip(consumed)
            .map(|(bullet, &spent)| spent || !bullet.is_on_screen(width, height))
            .collect();

        report.bullets_consumed = consumed.iter().filter(|&&spent| spent).count();
        let removed = self.registry.remove_bullets(&doomed);
        report.bullets_expired = removed - report.bullets_consumed;
    }

    fn check_ship_collision(&mut self, report: &mut TickReport) {
        let ship = &self.ship;
        if !self.registry.asteroids().iter().any(|asteroid| ship.collides(asteroid)) {
            return;
        }
        self.registry.clear_asteroids();
        self.level -= 1;
        self.lives = self.lives.saturating_sub(1);
        report.ship_hit = true;
        info!("Ship destroyed: {} lives left", self.lives);
    }

    fn spawn_wave(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        for _ in 0..self.level.max(0) {
            let asteroid = Asteroid::spawn_random(&mut self.rng, width, height, LARGE_ASTEROID_RADIUS);
            self.registry.push_asteroid(asteroid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Heading, Point};

    // Ship sits at (320, 240); every asteroid placed here is far from it
    // unless a test says otherwise.
    fn game_with(asteroids: Vec<Asteroid>) -> Game {
        let mut game = Game::new(GameConfig::default().with_seed(11)).unwrap();
        game.registry.clear();
        game.registry.extend_asteroids(asteroids);
        game
    }

    fn east(x: i32, y: i32, radius: i32) -> Asteroid {
        Asteroid::new(Point::new(x, y), radius, Heading::new(0))
    }

    fn bullet_east(x: i32, y: i32) -> Bullet {
        Bullet::new(Point::new(x, y), Heading::new(0))
    }

    #[test]
    fn new_session_defaults() {
        let game = Game::new(GameConfig::default().with_seed(3)).unwrap();
        assert_eq!(game.lives(), 3);
        assert_eq!(game.level(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.state(), SessionState::Active);
        assert_eq!(game.ship().position, Point::new(320, 240));
        assert_eq!(game.registry().asteroids().len(), 1);
        assert_eq!(game.registry().asteroids()[0].radius, LARGE_ASTEROID_RADIUS);
        assert!(game.registry().bullets().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(Game::new(GameConfig::default().with_extent(640, 0)).is_err());
    }

    #[test]
    fn large_asteroid_fragments_into_three() {
        let mut game = game_with(vec![east(400, 100, 50)]);
        game.registry.push_bullet(bullet_east(402, 100));

        let report = game.step();

        assert_eq!(game.score(), 4);
        assert_eq!(report.points_awarded, 4);
        assert_eq!(report.asteroids_destroyed, 1);
        assert_eq!(report.fragments_spawned, 3);
        assert!(!report.level_advanced);
        assert_eq!(game.level(), 1);
        assert!(game.registry().bullets().is_empty());
        let children: Vec<(Point, i32)> = game.registry().asteroids().iter().map(|a| (a.position, a.radius)).collect();
        assert_eq!(
            children,
            vec![
                (Point::new(427, 100), 25),
                (Point::new(377, 100), 25),
                (Point::new(402, 75), 25),
            ]
        );
    }

    #[test]
    fn small_asteroid_scores_without_children() {
        let mut game = game_with(vec![east(400, 100, 20), east(100, 400, 50)]);
        game.registry.push_bullet(bullet_east(402, 100));

        let report = game.step();

        assert_eq!(game.score(), 10);
        assert_eq!(report.fragments_spawned, 0);
        assert_eq!(game.registry().asteroids().len(), 1);
        assert_eq!(game.registry().asteroids()[0].position, Point::new(102, 400));
    }

    #[test]
    fn clearing_the_field_advances_level() {
        let mut game = game_with(vec![east(400, 100, 20)]);
        game.registry.push_bullet(bullet_east(402, 100));

        let report = game.step();

        assert!(report.level_advanced);
        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 10);
        let asteroids = game.registry().asteroids();
        assert_eq!(asteroids.len(), 2);
        assert!(asteroids.iter().all(|a| a.radius == LARGE_ASTEROID_RADIUS));
    }

    #[test]
    fn bullet_is_credited_to_one_asteroid() {
        let mut game = game_with(vec![east(400, 100, 20), east(410, 100, 20)]);
        game.registry.push_bullet(bullet_east(398, 100));

        let report = game.step();

        assert_eq!(report.asteroids_destroyed, 1);
        assert_eq!(report.bullets_consumed, 1);
        assert_eq!(game.score(), 10);
        assert_eq!(game.registry().asteroids().len(), 1);
        assert_eq!(game.registry().asteroids()[0].position, Point::new(412, 100));
    }

    #[test]
    fn two_bullets_destroy_two_asteroids() {
        let mut game = game_with(vec![east(400, 100, 20), east(410, 100, 20), east(100, 400, 50)]);
        game.registry.push_bullet(bullet_east(398, 100));
        game.registry.push_bullet(bullet_east(400, 100));

        let report = game.step();

        assert_eq!(report.asteroids_destroyed, 2);
        assert_eq!(report.bullets_consumed, 2);
        assert_eq!(game.score(), 20);
        assert!(game.registry().bullets().is_empty());
    }

    #[test]
    fn survivors_precede_fragments() {
        let mut game = game_with(vec![east(100, 100, 50), east(100, 400, 20), east(500, 100, 50)]);
        game.registry.push_bullet(bullet_east(95, 100));
        game.registry.push_bullet(bullet_east(495, 100));

        let report = game.step();

        assert_eq!(report.fragments_spawned, 6);
        let asteroids = game.registry().asteroids();
        assert_eq!(asteroids.len(), 7);
        assert_eq!(asteroids[0].position, Point::new(102, 400));
        // The later parent fragments first.
        assert_eq!(asteroids[1].position, Point::new(527, 100));
        assert_eq!(asteroids[4].position, Point::new(127, 100));
        assert_eq!(game.score(), 8);
    }

    #[test]
    fn bullet_leaving_screen_still_hits_this_tick() {
        let mut game = game_with(vec![east(630, 100, 20), east(100, 400, 50)]);
        game.registry.push_bullet(bullet_east(636, 100));

        let report = game.step();

        assert_eq!(report.bullets_consumed, 1);
        assert_eq!(report.bullets_expired, 0);
        assert_eq!(game.score(), 10);
    }

    #[test]
    fn off_screen_bullets_are_purged() {
        let mut game = game_with(vec![east(100, 400, 50)]);
        game.registry.push_bullet(bullet_east(636, 20));
        game.registry.push_bullet(bullet_east(200, 20));

        let report = game.step();

        assert_eq!(report.bullets_expired, 1);
        let bullets = game.registry().bullets();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].position, Point::new(207, 20));
    }

    #[test]
    fn ship_collision_costs_one_life_and_resets_wave() {
        let mut game = game_with(vec![east(318, 240, 50), east(322, 250, 50), east(100, 400, 20)]);

        let report = game.step();

        assert!(report.ship_hit);
        assert!(report.level_advanced);
        assert_eq!(game.lives(), 2);
        // Dropped to 0 by the hit, then back to 1 when the empty field respawns.
        assert_eq!(game.level(), 1);
        assert_eq!(game.registry().asteroids().len(), 1);
        assert_eq!(game.state(), SessionState::Active);
    }

    #[test]
    fn last_life_ends_session_and_freezes_state() {
        let mut game = game_with(vec![east(318, 240, 50)]);
        game.lives = 1;
        game.registry.push_bullet(bullet_east(10, 10));

        let report = game.step();

        assert!(report.game_over);
        assert_eq!(game.lives(), 0);
        assert_eq!(game.state(), SessionState::GameOver);

        let asteroids = game.registry().asteroids().to_vec();
        let bullets = game.registry().bullets().to_vec();
        let ship = game.ship().clone();
        let (score, level, ticks) = (game.score(), game.level(), game.ticks());

        assert_eq!(game.step(), TickReport::default());
        assert!(!game.apply(PlayerAction::Fire));
        assert!(!game.apply(PlayerAction::ThrustForward));

        assert_eq!(game.registry().asteroids(), asteroids.as_slice());
        assert_eq!(game.registry().bullets(), bullets.as_slice());
        assert_eq!(game.ship(), &ship);
        assert_eq!((game.score(), game.level(), game.ticks()), (score, level, ticks));
    }

    #[test]
    fn final_wave_stays_in_spawn_band_and_is_not_drawn() {
        use crate::rendering::{GameGrid, paint};
        use crossterm::style::Color;

        let mut game = game_with(vec![east(318, 240, 50)]);
        game.lives = 1;

        let report = game.step();
        assert!(report.ship_hit && report.level_advanced && report.game_over);

        // Refilled after the hit but never moved, so it may sit past the extent.
        let wave = game.registry().asteroids().to_vec();
        assert_eq!(wave.len(), 1);
        assert!((50..690).contains(&wave[0].position.x));
        assert!((50..530).contains(&wave[0].position.y));

        for _ in 0..5 {
            game.step();
        }
        assert_eq!(game.registry().asteroids(), wave.as_slice());

        let mut grid = GameGrid::new(80, 24);
        paint(&mut grid, &game.view());
        let cells = grid.cells.iter().flatten();
        assert!(cells.clone().all(|cell| cell.color != Color::Green));
        let drawn: String = cells.map(|cell| cell.ch).filter(|ch| *ch != ' ').collect();
        assert_eq!(drawn, "GameOver,Score:0");
    }

    #[test]
    fn fire_spawns_bullet_at_muzzle() {
        let mut game = game_with(vec![east(100, 400, 50)]);
        assert!(game.apply(PlayerAction::Fire));
        assert!(game.apply(PlayerAction::Fire));
        let bullets = game.registry().bullets();
        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[0], Bullet::new(Point::new(325, 240), Heading::new(0)));
    }

    #[test]
    fn fired_bullet_inherits_heading() {
        let mut game = game_with(vec![east(100, 400, 50)]);
        game.apply(PlayerAction::RotateLeft);
        game.apply(PlayerAction::Fire);
        assert_eq!(game.registry().bullets()[0].heading.units(), 5);
    }

    #[test]
    fn thrust_moves_ship_both_ways() {
        let mut game = game_with(vec![east(100, 400, 50)]);
        game.apply(PlayerAction::ThrustForward);
        assert_eq!(game.ship().position, Point::new(330, 240));
        game.apply(PlayerAction::ThrustBackward);
        game.apply(PlayerAction::ThrustBackward);
        assert_eq!(game.ship().position, Point::new(310, 240));
        game.apply(PlayerAction::RotateRight);
        assert_eq!(game.ship().heading.units(), 1);
    }

    #[test]
    fn asteroids_stay_on_field_after_moving() {
        let mut game = game_with(vec![
            Asteroid::new(Point::new(639, 479), 20, Heading::new(1)),
            Asteroid::new(Point::new(0, 0), 20, Heading::new(4)),
            Asteroid::new(Point::new(1, 200), 20, Heading::new(3)),
        ]);
        for _ in 0..50 {
            // A fresh wave spawns past the edge and is only folded back by its first move.
            if game.step().level_advanced {
                break;
            }
            for asteroid in game.registry().asteroids() {
                assert!((0..640).contains(&asteroid.position.x));
                assert!((0..480).contains(&asteroid.position.y));
            }
        }
    }

    #[test]
    fn restart_resets_session() {
        let mut game = game_with(vec![east(318, 240, 50)]);
        game.lives = 1;
        game.score = 99;
        game.step();
        assert_eq!(game.state(), SessionState::GameOver);

        game.restart();

        assert_eq!(game.state(), SessionState::Active);
        assert_eq!((game.lives(), game.level(), game.score()), (3, 1, 0));
        assert_eq!(game.ship().position, Point::new(320, 240));
        assert_eq!(game.registry().asteroids().len(), 1);
        assert!(game.registry().bullets().is_empty());
    }

    #[test]
    fn view_exposes_hud_values() {
        let mut game = game_with(vec![east(100, 400, 50)]);
        game.apply(PlayerAction::Fire);
        let view = game.view();
        assert_eq!((view.width, view.height), (640, 480));
        assert_eq!(view.asteroids.len(), 1);
        assert_eq!(view.bullets.len(), 1);
        assert_eq!((view.score, view.lives, view.level), (0, 3, 1));
        assert!(view.is_alive());
    }
}
