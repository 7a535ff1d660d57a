//! Temporary invalid-field highlighting.

use std::rc::Rc;
use std::time::Duration;

use crate::browser::{Scheduler, TimerId};
use crate::query::Query;

/// Class that marks a form label as invalid.
pub const INVALID_CLASS: &str = "invalid";

/// Flags form fields as invalid for a short time.
#[derive(Debug)]
pub struct ValidationService {
    scheduler: Rc<Scheduler>,
    default_duration: Duration,
}

impl ValidationService {
    #[must_use]
    pub fn new(scheduler: Rc<Scheduler>, default_duration: Duration) -> Self {
        Self {
            scheduler,
            default_duration,
        }
    }

    /// Adds the `invalid` class to `field` and removes it after `duration`
    /// (or the configured default).
    pub fn show_error(&self, field: &Query, duration: Option<Duration>) -> TimerId {
        field.add_class(INVALID_CLASS);
        let element = field.element().clone();
        self.scheduler
            .set_timeout(duration.unwrap_or(self.default_duration), move || {
                element.remove_class(INVALID_CLASS);
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[test]
    fn invalid_class_is_temporary() {
        let scheduler = Rc::new(Scheduler::new());
        let service = ValidationService::new(Rc::clone(&scheduler), Duration::from_millis(2000));
        let label = Query::new(Element::new("label"));

        service.show_error(&label, None);
        assert!(label.has_class(INVALID_CLASS));
        scheduler.advance(Duration::from_millis(1999));
        assert!(label.has_class(INVALID_CLASS));
        scheduler.advance(Duration::from_millis(1));
        assert!(!label.has_class(INVALID_CLASS));

        service.show_error(&label, Some(Duration::from_millis(10)));
        scheduler.advance(Duration::from_millis(10));
        assert!(!label.has_class(INVALID_CLASS));
    }
}
