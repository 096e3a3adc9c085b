use crate::collision::{asteroid_hit_by, ship_hits};
use crate::constants::*;
use crate::types::{Heading, Point, advance, rotate_about};
use log::debug;
use rand::Rng;

// --- Shared geometry ---

/// Anything with a centre and a facing.
pub trait Body {
    fn position(&self) -> Point;
    fn heading(&self) -> Heading;

    fn rotate_about_center(&self, point: Point, angle: Heading) -> Point {
        rotate_about(self.position(), point, angle)
    }

    /// Three-point wedge: the tip sits `reach` ahead along the heading and the
    /// other two corners are the tip turned by 2 and 4 units.
    fn wedge(&self, reach: i32) -> [Point; 3] {
        let tip = self.rotate_about_center(self.position().offset(reach, 0), self.heading());
        [
            tip,
            self.rotate_about_center(tip, Heading::new(2)),
            self.rotate_about_center(tip, Heading::new(4)),
        ]
    }
}

/// Bodies that reappear on the opposite edge when they leave the plane.
pub trait WrappingBody: Body {
    fn set_position(&mut self, position: Point);

    fn update_position(&mut self, speed: i32, width: i32, height: i32) {
        let moved = advance(self.position(), self.heading(), speed);
        self.set_position(moved.wrapped(width, height));
    }
}

// --- Ship ---

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub position: Point,
    pub heading: Heading,
    pub size: i32, // Centre to tip, doubles as collision radius
}

/// Ship outline split so the back edge can be tinted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipOutline {
    pub sides: [[Point; 2]; 2],
    pub back: [Point; 2],
}

impl Ship {
    pub fn new(position: Point, size: i32) -> Self {
        Ship { position, heading: Heading::default(), size }
    }

    pub fn centered(width: i32, height: i32) -> Self {
        Ship::new(Point::new(width / 2, height / 2), SHIP_SIZE)
    }

    pub fn rotate(&mut self, delta: i32) {
        self.heading = self.heading.rotated(delta);
    }

    pub fn thrust(&mut self, speed: i32, width: i32, height: i32) {
        self.update_position(speed, width, height);
        debug!("Thrusting: heading = {}, position = ({}, {})", self.heading.units(), self.position.x, self.position.y);
    }

    /// Muzzle point where fired bullets appear.
    pub fn front(&self) -> Point {
        self.rotate_about_center(self.position.offset(SHIP_MUZZLE_OFFSET, 0), self.heading)
    }

    pub fn collides(&self, asteroid: &Asteroid) -> bool {
        ship_hits(self, asteroid)
    }

    pub fn outline(&self) -> ShipOutline {
        let [tip, left, right] = self.wedge(self.size);
        ShipOutline {
            sides: [[tip, left], [right, tip]],
            back: [left, right],
        }
    }
}

impl Body for Ship {
    fn position(&self) -> Point {
        self.position
    }

    fn heading(&self) -> Heading {
        self.heading
    }
}

impl WrappingBody for Ship {
    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

// --- Asteroid ---

#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub position: Point,
    pub radius: i32,
    pub heading: Heading, // Fixed at spawn
}

impl Asteroid {
    pub fn new(position: Point, radius: i32, heading: Heading) -> Self {
        assert!(radius > 0, "asteroid radius must be positive, got {radius}");
        Asteroid { position, radius, heading }
    }

    /// Spawns somewhere in `[radius, extent + radius)` on each axis. Anything
    /// past the edge is folded back by the first wrap.
    pub fn spawn_random(rng: &mut impl Rng, width: i32, height: i32, radius: i32) -> Self {
        let x = rng.gen_range(0..width) + radius;
        let y = rng.gen_range(0..height) + radius;
        Asteroid::new(Point::new(x, y), radius, random_heading(rng))
    }

    pub fn score_value(&self) -> u32 {
        SCORE_NUMERATOR / self.radius.unsigned_abs()
    }

    pub fn can_fragment(&self) -> bool {
        self.radius / 2 > FRAGMENT_MIN_RADIUS
    }

    /// Children left behind when this asteroid is destroyed: three at half the
    /// radius, pushed out along +x, -x and -y, each with its own heading.
    pub fn fragments(&self, rng: &mut impl Rng) -> Vec<Asteroid> {
        if !self.can_fragment() {
            return Vec::new();
        }
        let half = self.radius / 2;
        let children: Vec<Asteroid> = [(half, 0), (-half, 0), (0, -half)]
            .into_iter()
            .map(|(dx, dy)| Asteroid::new(self.position.offset(dx, dy), half, random_heading(rng)))
            .collect();
        debug_assert_eq!(children.len(), FRAGMENT_COUNT);
        children
    }

    pub fn collides(&self, bullet: &Bullet) -> bool {
        asteroid_hit_by(self, bullet)
    }

    /// Closed outline: the wedge with its first corner repeated.
    pub fn outline(&self) -> [Point; 4] {
        let [a, b, c] = self.wedge(self.radius);
        [a, b, c, a]
    }
}

impl Body for Asteroid {
    fn position(&self) -> Point {
        self.position
    }

    fn heading(&self) -> Heading {
        self.heading
    }
}

impl WrappingBody for Asteroid {
    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

pub fn random_heading(rng: &mut impl Rng) -> Heading {
    Heading::new(rng.gen_range(0..HEADING_UNITS))
}

// --- Bullet struct ---

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub position: Point,
    pub heading: Heading, // Inherited from the ship when fired
}

impl Bullet {
    pub fn new(position: Point, heading: Heading) -> Self {
        Bullet { position, heading }
    }

    /// Bullets never wrap; once they leave the plane they are purged.
    pub fn update_position(&mut self, speed: i32) {
        self.position = advance(self.position, self.heading, speed);
    }

    pub fn is_on_screen(&self, width: i32, height: i32) -> bool {
        (0..=width).contains(&self.position.x) && (0..=height).contains(&self.position.y)
    }

    pub fn outline(&self) -> [Point; 2] {
        [self.position, advance(self.position, self.heading, BULLET_DRAW_LENGTH)]
    }
}
