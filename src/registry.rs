use crate::entities::{Asteroid, Bullet};

/// Live asteroids and bullets for the current tick.
///
/// Entities are held by value. Scans work on indices and record what to drop
/// in a mask; the mask is applied in one compaction pass once the scan is
/// over, so nothing is erased while indices are still in use.
#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    asteroids: Vec<Asteroid>,
    bullets: Vec<Bullet>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn asteroids_mut(&mut self) -> &mut [Asteroid] {
        &mut self.asteroids
    }

    pub fn bullets_mut(&mut self) -> &mut [Bullet] {
        &mut self.bullets
    }

    pub fn push_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    pub fn extend_asteroids(&mut self, asteroids: impl IntoIterator<Item = Asteroid>) {
        self.asteroids.extend(asteroids);
    }

    pub fn push_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    pub fn has_asteroids(&self) -> bool {
        !self.asteroids.is_empty()
    }

    pub fn clear_asteroids(&mut self) {
        self.asteroids.clear();
    }

    pub fn clear(&mut self) {
        self.asteroids.clear();
        self.bullets.clear();
    }

    /// Drops every asteroid whose mask entry is set. Returns how many went.
    pub fn remove_asteroids(&mut self, doomed: &[bool]) -> usize {
        compact(&mut self.asteroids, doomed)
    }

    /// Drops every bullet whose mask entry is set. Returns how many went.
    pub fn remove_bullets(&mut self, doomed: &[bool]) -> usize {
        compact(&mut self.bullets, doomed)
    }
}

fn compact<T>(items: &mut Vec<T>, doomed: &[bool]) -> usize {
    debug_assert_eq!(items.len(), doomed.len(), "removal mask must cover every entity");
    let before = items.len();
    let mut flags = doomed.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
    before - items.len()
}
