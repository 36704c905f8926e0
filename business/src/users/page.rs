use std::any::Any;

use roster_states::{State, state_assign_impl};

use crate::model::{PageView, User};

/// Coarse state of the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPhase {
    /// Not mounted yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// The page currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    /// Zero-based.
    pub page_index: usize,
    pub total_pages: usize,
    pub users: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub mounted: bool,
    /// Index of the most recently issued fetch.
    pub requested_index: Option<usize>,
    /// Fetch the current page again even though it was already requested.
    pub reload_requested: bool,
}

impl PageState {
    pub fn can_go_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }

    /// No-op on the first page.
    pub fn go_to_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// No-op on the last page.
    pub fn go_to_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Whether the current index still has to be fetched.
    pub fn needs_fetch(&self) -> bool {
        self.mounted && (self.requested_index != Some(self.page_index) || self.reload_requested)
    }

    pub fn request_reload(&mut self) {
        self.reload_requested = true;
    }

    pub fn mark_fetch_started(&mut self) {
        self.requested_index = Some(self.page_index);
        self.reload_requested = false;
        self.loading = true;
    }

    pub fn apply_loaded(&mut self, view: PageView) {
        self.users = view.content;
        self.total_pages = view.total_pages;
        self.loading = false;
        self.error = None;
    }

    /// A response without a usable page clears what is shown.
    pub fn apply_malformed(&mut self, message: String) {
        self.users.clear();
        self.total_pages = 0;
        self.loading = false;
        self.error = Some(message);
    }

    /// The server could not be reached; rows already shown stay.
    pub fn apply_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn phase(&self) -> ViewPhase {
        if !self.mounted {
            ViewPhase::Idle
        } else if self.loading {
            ViewPhase::Loading
        } else if self.error.is_some() {
            ViewPhase::Error
        } else {
            ViewPhase::Loaded
        }
    }

    /// "Page 2 of 5", or "Page 1 of 1" when there is nothing to show.
    pub fn label(&self) -> String {
        format!(
            "Page {} of {}",
            self.page_index + 1,
            self.total_pages.max(1)
        )
    }
}

impl State for PageState {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Region, UserId};

    fn user(id: i64) -> User {
        User {
            id: UserId(id),
            name: format!("User {id}"),
            phone_number: String::new(),
            aadhar_number: "1234567890123456".to_owned(),
            region: Region::Region1,
            amount: 1,
        }
    }

    #[test]
    fn previous_is_noop_on_first_page() {
        let mut page = PageState {
            total_pages: 3,
            ..Default::default()
        };

        assert!(!page.go_to_previous());
        assert_eq!(page.page_index, 0);
    }

    #[test]
    fn next_is_noop_on_last_page() {
        let mut page = PageState {
            total_pages: 2,
            ..Default::default()
        };

        assert!(page.go_to_next());
        assert_eq!(page.page_index, 1);
        assert!(!page.go_to_next());
        assert_eq!(page.page_index, 1);
        assert!(page.go_to_previous());
        assert_eq!(page.page_index, 0);
    }

    #[test]
    fn no_navigation_without_pages() {
        let page = PageState::default();
        assert!(!page.can_go_previous());
        assert!(!page.can_go_next());
        assert_eq!(page.label(), "Page 1 of 1");
    }

    #[test]
    fn fetch_is_needed_on_index_change_or_reload() {
        let mut page = PageState {
            mounted: true,
            total_pages: 2,
            ..Default::default()
        };
        assert!(page.needs_fetch());

        page.mark_fetch_started();
        assert!(!page.needs_fetch());
        assert_eq!(page.phase(), ViewPhase::Loading);

        page.go_to_next();
        assert!(page.needs_fetch());
        page.mark_fetch_started();

        page.request_reload();
        assert!(page.needs_fetch());
    }

    #[test]
    fn malformed_clears_but_failure_keeps_rows() {
        let mut page = PageState {
            mounted: true,
            ..Default::default()
        };
        page.apply_loaded(PageView {
            content: vec![user(1), user(2)],
            total_pages: 4,
        });
        assert_eq!(page.phase(), ViewPhase::Loaded);

        page.apply_failed("connection refused".to_owned());
        assert_eq!(page.users.len(), 2);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.phase(), ViewPhase::Error);

        page.apply_malformed("missing field `content`".to_owned());
        assert!(page.users.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.error.as_deref(), Some("missing field `content`"));
    }
}
