//! Contact row showing a user's avatar and name.

use std::rc::Rc;

use crate::app::View;
use crate::dom::{Element, Event};
use crate::domain::error::Result;
use crate::domain::models::UserProfile;

/// Called with the user when the item is clicked.
pub type UserAction = Rc<dyn Fn(&UserProfile)>;

const DEFAULT_AVATAR: &str = "/avatars/default.png";

pub struct UserItem {
    user: UserProfile,
    is_gray: bool,
    on_click: Option<UserAction>,
}

impl UserItem {
    #[must_use]
    pub const fn new(user: UserProfile, is_gray: bool) -> Self {
        Self {
            user,
            is_gray,
            on_click: None,
        }
    }

    #[must_use]
    pub fn on_click(mut self, action: UserAction) -> Self {
        self.on_click = Some(action);
        self
    }
}

impl View for UserItem {
    fn render(&mut self) -> Result<Element> {
        let root = Element::new("button");
        root.add_class("user-item");
        if self.is_gray {
            root.add_class("user-item--gray");
        }
        root.set_attribute("data-user-id", &self.user.id.to_string());

        let avatar = Element::new("img");
        avatar.set_attribute(
            "src",
            self.user.avatar_path.as_deref().unwrap_or(DEFAULT_AVATAR),
        );
        avatar.set_attribute("alt", &self.user.name);
        root.append_child(&avatar)?;

        let name = Element::new("div");
        name.add_class("name");
        name.set_text_content(&self.user.name);
        root.append_child(&name)?;

        if let Some(action) = &self.on_click {
            let action = Rc::clone(action);
            let user = self.user.clone();
            root.add_event_listener(
                "click",
                Rc::new(move |_: &Event| action(&user)),
            );
        }
        Ok(root)
    }

    fn teardown(&mut self) {
        self.on_click = None;
    }
}
