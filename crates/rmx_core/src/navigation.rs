//! Cursor state for the two lists on screen.
//!
//! The file list and the stream list each keep their own cursor. Only the
//! active list receives movement from the keyboard. Nothing here looks at
//! list contents; callers set the bound whenever a list is repopulated.
//!
//! All operations are total. Out-of-range requests clamp instead of failing.

/// Which list a cursor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListContext {
    /// Entries of the current directory.
    #[default]
    Files,
    /// Streams of the opened container.
    Streams,
}

/// Direction of a cursor or reorder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    index: usize,
    /// Exclusive upper bound.
    bound: usize,
}

impl Cursor {
    fn last(&self) -> Option<usize> {
        self.bound.checked_sub(1)
    }

    fn up(&mut self) {
        if let Some(last) = self.last() {
            self.index = self.index.saturating_sub(1).min(last);
        }
    }

    fn down(&mut self) {
        if let Some(last) = self.last() {
            self.index = (self.index + 1).min(last);
        }
    }
}

/// Bounded cursors for the file list and the stream list.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    files: Cursor,
    streams: Cursor,
    active: ListContext,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    fn cursor(&self, context: ListContext) -> &Cursor {
        match context {
            ListContext::Files => &self.files,
            ListContext::Streams => &self.streams,
        }
    }

    fn cursor_mut(&mut self, context: ListContext) -> &mut Cursor {
        match context {
            ListContext::Files => &mut self.files,
            ListContext::Streams => &mut self.streams,
        }
    }

    /// Set the exclusive upper bound of a list.
    ///
    /// The index is not clamped here; the next movement clamps it.
    pub fn set_bound(&mut self, context: ListContext, bound: usize) {
        self.cursor_mut(context).bound = bound;
    }

    pub fn bound(&self, context: ListContext) -> usize {
        self.cursor(context).bound
    }

    pub fn index(&self, context: ListContext) -> usize {
        self.cursor(context).index
    }

    /// Set the cursor directly, clamped into the current bound.
    pub fn set_index(&mut self, context: ListContext, index: usize) {
        let cursor = self.cursor_mut(context);
        cursor.index = cursor.last().map_or(0, |last| index.min(last));
    }

    pub fn move_up(&mut self, context: ListContext) {
        self.cursor_mut(context).up();
    }

    pub fn move_down(&mut self, context: ListContext) {
        self.cursor_mut(context).down();
    }

    pub fn step(&mut self, context: ListContext, direction: Direction) {
        match direction {
            Direction::Up => self.move_up(context),
            Direction::Down => self.move_down(context),
        }
    }

    /// Make `context` the list that receives keyboard movement.
    pub fn activate(&mut self, context: ListContext) {
        self.active = context;
    }

    pub fn active_context(&self) -> ListContext {
        self.active
    }

    pub fn active_index(&self) -> usize {
        self.index(self.active)
    }

    pub fn move_active_up(&mut self) {
        self.move_up(self.active);
    }

    pub fn move_active_down(&mut self) {
        self.move_down(self.active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_file_list_at_zero() {
        let nav = Navigation::new();
        assert_eq!(nav.active_context(), ListContext::Files);
        assert_eq!(nav.index(ListContext::Files), 0);
        assert_eq!(nav.index(ListContext::Streams), 0);
    }

    #[test]
    fn zero_bound_pins_index() {
        let mut nav = Navigation::new();
        nav.set_bound(ListContext::Streams, 0);

        nav.move_down(ListContext::Streams);
        assert_eq!(nav.index(ListContext::Streams), 0);
        nav.move_up(ListContext::Streams);
        assert_eq!(nav.index(ListContext::Streams), 0);
        nav.set_index(ListContext::Streams, 4);
        assert_eq!(nav.index(ListContext::Streams), 0);
    }

    #[test]
    fn movement_clamps_at_both_ends() {
        let mut nav = Navigation::new();
        nav.set_bound(ListContext::Files, 3);

        nav.move_up(ListContext::Files);
        assert_eq!(nav.index(ListContext::Files), 0);

        for _ in 0..10 {
            nav.move_down(ListContext::Files);
        }
        assert_eq!(nav.index(ListContext::Files), 2);
    }

    #[test]
    fn contexts_are_independent() {
        let mut nav = Navigation::new();
        nav.set_bound(ListContext::Files, 5);
        nav.set_bound(ListContext::Streams, 5);

        nav.move_down(ListContext::Files);
        nav.move_down(ListContext::Files);
        assert_eq!(nav.index(ListContext::Files), 2);
        assert_eq!(nav.index(ListContext::Streams), 0);
    }

    #[test]
    fn shrinking_bound_clamps_on_next_move() {
        let mut nav = Navigation::new();
        nav.set_bound(ListContext::Files, 10);
        nav.set_index(ListContext::Files, 8);

        nav.set_bound(ListContext::Files, 4);
        assert_eq!(nav.index(ListContext::Files), 8);

        nav.move_down(ListContext::Files);
        assert_eq!(nav.index(ListContext::Files), 3);

        nav.set_index(ListContext::Files, 3);
        nav.set_bound(ListContext::Files, 2);
        nav.move_up(ListContext::Files);
        assert_eq!(nav.index(ListContext::Files), 1);
    }

    #[test]
    fn active_context_routes_movement() {
        let mut nav = Navigation::new();
        nav.set_bound(ListContext::Files, 4);
        nav.set_bound(ListContext::Streams, 4);

        nav.activate(ListContext::Streams);
        nav.move_active_down();
        assert_eq!(nav.active_index(), 1);
        assert_eq!(nav.index(ListContext::Files), 0);

        nav.activate(ListContext::Files);
        assert_eq!(nav.active_context(), ListContext::Files);
        nav.move_active_up();
        assert_eq!(nav.index(ListContext::Streams), 1);
    }
}
