use crate::constants::HEADING_UNITS;

/// Integer screen coordinate on the play field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance, widened so large coordinates cannot overflow.
    pub fn distance_squared(&self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    pub fn wrapped(&self, width: i32, height: i32) -> Self {
        Point::new(wrap_coordinate(self.x, width), wrap_coordinate(self.y, height))
    }
}

/// Direction of travel on the six-step heading wheel.
///
/// The raw unit is fed straight into `cos`/`sin`, so one step is one radian
/// and the wheel never lines up with the axes. That quantised motion is part
/// of the game's feel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Heading(u8);

impl Heading {
    pub fn new(units: i32) -> Self {
        Heading(units.rem_euclid(HEADING_UNITS) as u8)
    }

    pub fn units(&self) -> i32 {
        i32::from(self.0)
    }

    pub fn rotated(&self, delta: i32) -> Self {
        Heading::new(self.units() + delta)
    }

    pub fn cos(&self) -> f64 {
        f64::from(self.0).cos()
    }

    pub fn sin(&self) -> f64 {
        f64::from(self.0).sin()
    }
}

pub fn wrap_coordinate(value: i32, max: i32) -> i32 {
    value.rem_euclid(max)
}

/// Moves `position` by `speed` along `heading`, truncating each axis toward zero.
pub fn advance(position: Point, heading: Heading, speed: i32) -> Point {
    let speed = f64::from(speed);
    Point::new(
        (f64::from(position.x) + speed * heading.cos()) as i32,
        (f64::from(position.y) + speed * heading.sin()) as i32,
    )
}

/// Rotates `point` about `center` by `angle` heading units.
pub fn rotate_about(center: Point, point: Point, angle: Heading) -> Point {
    let (cos, sin) = (angle.cos(), angle.sin());
    let dx = f64::from(point.x - center.x);
    let dy = f64::from(point.y - center.y);
    Point::new(
        (cos * dx - sin * dy + f64::from(center.x)) as i32,
        (sin * dx + cos * dy + f64::from(center.y)) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_wraps_both_directions() {
        assert_eq!(Heading::new(0).rotated(-1).units(), 5);
        assert_eq!(Heading::new(5).rotated(1).units(), 0);
        assert_eq!(Heading::new(13).units(), 1);
    }

    #[test]
    fn wrap_coordinate_stays_in_extent() {
        assert_eq!(wrap_coordinate(-3, 640), 637);
        assert_eq!(wrap_coordinate(640, 640), 0);
        assert_eq!(wrap_coordinate(645, 640), 5);
        assert_eq!(wrap_coordinate(-700, 640), 580);
        for value in -2000..2000 {
            let wrapped = wrap_coordinate(value, 480);
            assert!((0..480).contains(&wrapped));
        }
    }

    #[test]
    fn advance_truncates_toward_zero() {
        // cos(0) = 1, sin(0) = 0
        assert_eq!(advance(Point::new(10, 10), Heading::new(0), 7), Point::new(17, 10));
        // cos(3) ~ -0.99, sin(3) ~ 0.14: 10 - 6.93 = 3.07 and 10 + 0.98 = 10.98
        assert_eq!(advance(Point::new(10, 10), Heading::new(3), 7), Point::new(3, 10));
        // backward thrust along heading 1: cos(1) ~ 0.54, sin(1) ~ 0.84
        assert_eq!(advance(Point::new(100, 100), Heading::new(1), -10), Point::new(94, 91));
    }

    #[test]
    fn rotate_about_zero_is_identity() {
        let center = Point::new(320, 240);
        let point = Point::new(330, 240);
        assert_eq!(rotate_about(center, point, Heading::new(0)), point);
    }

    #[test]
    fn rotate_about_quantised_step() {
        let center = Point::new(320, 240);
        // 10 units ahead rotated one radian: (5.40, 8.41) from the centre
        assert_eq!(rotate_about(center, center.offset(10, 0), Heading::new(1)), Point::new(325, 248));
    }

    #[test]
    fn distance_squared_is_widened() {
        let a = Point::new(i32::MAX, 0);
        let b = Point::new(0, i32::MAX);
        assert_eq!(a.distance_squared(b), 2 * i64::from(i32::MAX) * i64::from(i32::MAX));
    }
}
