//! Session history stack.

/// Ordered list of visited pathnames with a cursor.
///
/// Pushing truncates any forward entries, like the browser's
/// `history.pushState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![initial.to_string()],
            index: 0,
        }
    }

    /// Pathname of the current entry.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index = self.entries.len() - 1;
    }

    pub fn replace(&mut self, path: &str) {
        self.entries[self.index] = path.to_string();
    }

    /// Moves the cursor by `delta`. Returns `false` (and stays put) when the
    /// target is out of range or `delta` is zero.
    pub fn go(&mut self, delta: isize) -> bool {
        if delta == 0 {
            return false;
        }
        match self.index.checked_add_signed(delta) {
            Some(target) if target < self.entries.len() => {
                self.index = target;
                true
            }
            _ => false,
        }
    }
}
