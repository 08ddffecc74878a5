use crate::common::debounce::Debounce;
use eframe::egui::{Pos2, Rect};
use hashlink::LinkedHashMap;
use slab::Slab;
use std::time::{Duration, Instant};

/// Delay between a pointer entering a submenu trigger and the submenu opening.
pub const SUBMENU_OPEN_DELAY: Duration = Duration::from_millis(150);

/// Index of a mounted submenu inside a [`MenuBarGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopupId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuBarState {
    Inactive,
    Active(String),
}

#[derive(Debug, Clone)]
struct PopupNode {
    key: String,
    is_open: bool,
    /// Screen rectangle of the trigger the popup is placed next to.
    anchor: Option<Rect>,
    /// Screen rectangle the open popup covers.
    area: Option<Rect>,
    /// `None` for submenus hanging directly off the active root menu.
    parent: Option<PopupId>,
}

/// State of one menu bar: which root menu is open and which submenus hang
/// off it.
///
/// The group never draws anything. The UI layer reports clicks, pointer
/// positions and rectangles, calls [`MenuBarGroup::tick`] each frame and
/// renders whatever the queries return.
#[derive(Debug)]
pub struct MenuBarGroup {
    active_key: Option<String>,
    button_rects: LinkedHashMap<String, Rect>,
    root_area: Option<Rect>,
    popups: Slab<PopupNode>,
    pending_open: Debounce<PopupId>,
    hovered_trigger: Option<PopupId>,
    /// Latest pointer position not yet hit-tested. Only filled while active.
    pointer_sample: Option<Pos2>,
}

impl Default for MenuBarGroup {
    fn default() -> Self {
        Self::new(SUBMENU_OPEN_DELAY)
    }
}

impl MenuBarGroup {
    pub fn new(submenu_delay: Duration) -> Self {
        Self {
            active_key: None,
            button_rects: LinkedHashMap::new(),
            root_area: None,
            popups: Slab::new(),
            pending_open: Debounce::new(submenu_delay),
            hovered_trigger: None,
            pointer_sample: None,
        }
    }

    pub fn state(&self) -> MenuBarState {
        match &self.active_key {
            Some(key) => MenuBarState::Active(key.clone()),
            None => MenuBarState::Inactive,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_key.is_some()
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }

    pub fn is_root_open(&self, key: &str) -> bool {
        self.active_key.as_deref() == Some(key)
    }

    /// Record the screen rectangle of a root button. Called every frame.
    pub fn register_button(&mut self, key: &str, rect: Rect) {
        match self.button_rects.get_mut(key) {
            Some(existing) => *existing = rect,
            None => {
                self.button_rects.insert(key.to_owned(), rect);
            }
        }
    }

    pub fn button_rect(&self, key: &str) -> Option<Rect> {
        self.button_rects.get(key).copied()
    }

    /// Rectangle covered by the open root popup, used for outside clicks.
    pub fn set_root_area(&mut self, area: Option<Rect>) {
        self.root_area = area;
    }

    /// Register a submenu, or return the existing one with the same key and
    /// parent.
    pub fn mount_submenu(&mut self, key: &str, parent: Option<PopupId>) -> PopupId {
        if let Some((index, _)) = self
            .popups
            .iter()
            .find(|(_, node)| node.key == key && node.parent == parent)
        {
            return PopupId(index);
        }
        PopupId(self.popups.insert(PopupNode {
            key: key.to_owned(),
            is_open: false,
            anchor: None,
            area: None,
            parent,
        }))
    }

    /// Remove a submenu and everything below it.
    pub fn unmount(&mut self, id: PopupId) {
        for child in self.children_of(Some(id)) {
            self.unmount(child);
        }
        if self.popups.try_remove(id.0).is_some() {
            if self.pending_open.pending() == Some(&id) {
                self.pending_open.cancel();
            }
            if self.hovered_trigger == Some(id) {
                self.hovered_trigger = None;
            }
        }
    }

    pub fn set_anchor(&mut self, id: PopupId, anchor: Rect) {
        if let Some(node) = self.popups.get_mut(id.0) {
            node.anchor = Some(anchor);
        }
    }

    pub fn anchor(&self, id: PopupId) -> Option<Rect> {
        self.popups.get(id.0).and_then(|node| node.anchor)
    }

    pub fn set_popup_area(&mut self, id: PopupId, area: Option<Rect>) {
        if let Some(node) = self.popups.get_mut(id.0) {
            node.area = area;
        }
    }

    pub fn is_open(&self, id: PopupId) -> bool {
        self.popups.get(id.0).map_or(false, |node| node.is_open)
    }

    pub fn parent(&self, id: PopupId) -> Option<PopupId> {
        self.popups.get(id.0).and_then(|node| node.parent)
    }

    pub fn popup_key(&self, id: PopupId) -> Option<&str> {
        self.popups.get(id.0).map(|node| node.key.as_str())
    }

    pub fn activate(&mut self, key: &str) {
        if self.is_root_open(key) {
            return;
        }
        tracing::debug!(key, "menu activated");
        self.switch_root(key);
    }

    /// Open `key`, or close the bar when `key` is already the open root.
    pub fn toggle(&mut self, key: &str) {
        if self.is_root_open(key) {
            self.root_close();
        } else {
            self.activate(key);
        }
    }

    /// Move the open root to `key`. Does nothing while the bar is inactive.
    pub fn hover_navigate(&mut self, key: &str) -> bool {
        if !self.is_active() || self.is_root_open(key) {
            return false;
        }
        tracing::trace!(key, "menu hover navigation");
        self.switch_root(key);
        true
    }

    fn switch_root(&mut self, key: &str) {
        self.close_all_submenus();
        self.root_area = None;
        self.active_key = Some(key.to_owned());
    }

    /// Close the root and every submenu. Harmless when already inactive.
    pub fn root_close(&mut self) {
        if self.active_key.take().is_some() {
            tracing::debug!("menu closed");
        }
        self.close_all_submenus();
        self.root_area = None;
        self.cancel_timers();
    }

    /// Remember the pointer position for the next [`process_pointer_sample`].
    ///
    /// Positions arriving while the bar is inactive are dropped, and only the
    /// latest position of a frame is kept.
    ///
    /// [`process_pointer_sample`]: MenuBarGroup::process_pointer_sample
    pub fn pointer_moved(&mut self, pos: Pos2) {
        if self.is_active() {
            self.pointer_sample = Some(pos);
        }
    }

    /// Hit-test the pending pointer sample against the root buttons. Returns
    /// true when the open root changed.
    pub fn process_pointer_sample(&mut self) -> bool {
        let Some(pos) = self.pointer_sample.take() else {
            return false;
        };
        let hit = self
            .button_rects
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(key, _)| key.clone());
        match hit {
            Some(key) => self.hover_navigate(&key),
            None => false,
        }
    }

    /// Schedule `id` to open after the submenu delay.
    pub fn submenu_pointer_enter(&mut self, id: PopupId, now: Instant) {
        if !self.is_active() || !self.popups.contains(id.0) {
            return;
        }
        if self.is_open(id) {
            self.pending_open.cancel();
            return;
        }
        self.pending_open.schedule(id, now);
    }

    /// Cancel the scheduled open of `id`, if it is the one pending.
    pub fn submenu_pointer_leave(&mut self, id: PopupId) {
        if self.pending_open.pending() == Some(&id) {
            self.pending_open.cancel();
        }
    }

    /// Report which submenu trigger the pointer is over this frame, turning
    /// changes into enter/leave events.
    pub fn hover_trigger(&mut self, hovered: Option<PopupId>, now: Instant) {
        if hovered == self.hovered_trigger {
            return;
        }
        if let Some(previous) = self.hovered_trigger.take() {
            self.submenu_pointer_leave(previous);
        }
        if let Some(id) = hovered {
            self.submenu_pointer_enter(id, now);
        }
        self.hovered_trigger = hovered;
    }

    /// Fire a due submenu open. Returns true when something opened.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_open.poll(now) {
            Some(id) if self.is_active() => self.open_submenu(id),
            _ => false,
        }
    }

    /// Open `id` right away, closing its open siblings and their descendants.
    pub fn open_submenu(&mut self, id: PopupId) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(node) = self.popups.get(id.0) else {
            return false;
        };
        if node.is_open {
            return false;
        }
        let parent = node.parent;
        if let Some(parent) = parent {
            if !self.is_open(parent) {
                return false;
            }
        }
        for sibling in self.children_of(parent) {
            if sibling != id {
                self.close_popup(sibling);
            }
        }
        if self.pending_open.pending() == Some(&id) {
            self.pending_open.cancel();
        }
        if let Some(node) = self.popups.get_mut(id.0) {
            tracing::trace!(key = %node.key, "submenu opened");
            node.is_open = true;
        }
        true
    }

    /// Close `id` and everything open below it.
    pub fn close_popup(&mut self, id: PopupId) {
        for child in self.children_of(Some(id)) {
            self.close_popup(child);
        }
        if let Some(node) = self.popups.get_mut(id.0) {
            node.is_open = false;
            node.area = None;
        }
    }

    fn close_all_submenus(&mut self) {
        for (_, node) in self.popups.iter_mut() {
            node.is_open = false;
            node.area = None;
        }
        self.pending_open.cancel();
        self.hovered_trigger = None;
    }

    fn children_of(&self, parent: Option<PopupId>) -> Vec<PopupId> {
        self.popups
            .iter()
            .filter(|(_, node)| node.parent == parent)
            .map(|(index, _)| PopupId(index))
            .collect()
    }

    /// Close the whole bar, then run the action's `effect`.
    pub fn select_action<R>(&mut self, effect: impl FnOnce(&Self) -> R) -> R {
        self.root_close();
        effect(self)
    }

    /// Close the bar when `pos` is outside every button and open popup.
    /// Returns true when the click closed the bar.
    pub fn handle_outside_click(&mut self, pos: Pos2) -> bool {
        if !self.is_active() {
            return false;
        }
        let on_button = self.button_rects.values().any(|rect| rect.contains(pos));
        let in_root = self.root_area.map_or(false, |area| area.contains(pos));
        let in_submenu = self
            .popups
            .iter()
            .any(|(_, node)| node.is_open && node.area.map_or(false, |a| a.contains(pos)));
        if on_button || in_root || in_submenu {
            return false;
        }
        self.root_close();
        true
    }

    /// When the UI should wake up next for a scheduled submenu open.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_open.deadline()
    }

    /// Drop the hover-intent deadline and the pointer sample.
    pub fn cancel_timers(&mut self) {
        self.pending_open.cancel();
        self.pointer_sample = None;
        self.hovered_trigger = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn bar() -> MenuBarGroup {
        let mut group = MenuBarGroup::default();
        group.register_button("File", Rect::from_min_size(pos2(0.0, 0.0), vec2(40.0, 20.0)));
        group.register_button("Edit", Rect::from_min_size(pos2(40.0, 0.0), vec2(40.0, 20.0)));
        group.register_button("View", Rect::from_min_size(pos2(80.0, 0.0), vec2(40.0, 20.0)));
        group
    }

    #[test]
    fn hovering_another_root_switches_while_active() {
        let mut group = bar();
        group.activate("File");
        group.pointer_moved(pos2(50.0, 10.0));
        assert!(group.process_pointer_sample());
        assert_eq!(group.state(), MenuBarState::Active("Edit".into()));
    }

    #[test]
    fn hovering_does_not_open_an_inactive_bar() {
        let mut group = bar();
        group.pointer_moved(pos2(50.0, 10.0));
        assert!(!group.process_pointer_sample());
        assert!(!group.hover_navigate("Edit"));
        assert_eq!(group.state(), MenuBarState::Inactive);
    }

    #[test]
    fn only_the_latest_sample_of_a_frame_is_tested() {
        let mut group = bar();
        group.activate("File");
        group.pointer_moved(pos2(50.0, 10.0));
        group.pointer_moved(pos2(90.0, 10.0));
        group.process_pointer_sample();
        assert_eq!(group.active_key(), Some("View"));
        assert!(!group.process_pointer_sample());
    }

    #[test]
    fn toggle_and_redundant_close() {
        let mut group = bar();
        group.toggle("File");
        assert!(group.is_root_open("File"));
        group.toggle("File");
        assert!(!group.is_active());
        group.root_close();
        assert_eq!(group.state(), MenuBarState::Inactive);
    }

    #[test]
    fn submenu_opens_after_delay() {
        let start = Instant::now();
        let mut group = bar();
        group.activate("View");
        let theme = group.mount_submenu("Theme", None);
        group.submenu_pointer_enter(theme, start);
        assert!(!group.tick(start + Duration::from_millis(149)));
        assert!(group.tick(start + Duration::from_millis(150)));
        assert!(group.is_open(theme));
    }

    #[test]
    fn leaving_early_cancels_the_open() {
        let start = Instant::now();
        let mut group = bar();
        group.activate("View");
        let theme = group.mount_submenu("Theme", None);
        group.submenu_pointer_enter(theme, start);
        group.submenu_pointer_leave(theme);
        assert!(!group.tick(start + Duration::from_millis(50)));
        assert!(!group.tick(start + Duration::from_secs(1)));
        assert!(!group.is_open(theme));
        assert_eq!(group.next_deadline(), None);
    }

    #[test]
    fn opening_a_sibling_closes_the_other_branch() {
        let mut group = bar();
        group.activate("View");
        let a = group.mount_submenu("A", None);
        let b = group.mount_submenu("B", None);
        let nested = group.mount_submenu("A/1", Some(a));
        assert_eq!(group.mount_submenu("A", None), a);

        assert!(group.open_submenu(a));
        assert!(group.open_submenu(nested));
        assert!(group.open_submenu(b));
        assert!(!group.is_open(a));
        assert!(!group.is_open(nested));
        assert!(group.is_open(b));
    }

    #[test]
    fn nested_submenu_needs_open_parent() {
        let mut group = bar();
        group.activate("View");
        let a = group.mount_submenu("A", None);
        let nested = group.mount_submenu("A/1", Some(a));
        assert!(!group.open_submenu(nested));
        assert_eq!(group.parent(nested), Some(a));
    }

    #[test]
    fn root_close_collapses_submenus_and_timers() {
        let start = Instant::now();
        let mut group = bar();
        group.activate("View");
        let a = group.mount_submenu("A", None);
        let b = group.mount_submenu("B", None);
        group.open_submenu(a);
        group.submenu_pointer_enter(b, start);
        group.root_close();
        assert!(!group.is_open(a));
        assert!(!group.tick(start + Duration::from_secs(1)));
        assert!(!group.is_open(b));
    }

    #[test]
    fn action_runs_after_the_root_closed() {
        let mut group = bar();
        group.activate("File");
        let saw_active = group.select_action(|g| g.is_active());
        assert!(!saw_active);
    }

    #[test]
    fn outside_click_closes_but_inside_does_not() {
        let mut group = bar();
        group.activate("File");
        group.set_root_area(Some(Rect::from_min_size(pos2(0.0, 20.0), vec2(120.0, 100.0))));
        assert!(!group.handle_outside_click(pos2(10.0, 50.0)));
        assert!(!group.handle_outside_click(pos2(10.0, 10.0)));
        assert!(group.handle_outside_click(pos2(400.0, 400.0)));
        assert!(!group.is_active());
    }

    #[test]
    fn unmount_removes_descendants() {
        let mut group = bar();
        group.activate("View");
        let a = group.mount_submenu("A", None);
        let nested = group.mount_submenu("A/1", Some(a));
        group.unmount(a);
        assert_eq!(group.popup_key(a), None);
        assert_eq!(group.popup_key(nested), None);
    }

    #[test]
    fn hover_trigger_reports_enter_and_leave() {
        let start = Instant::now();
        let mut group = bar();
        group.activate("View");
        let a = group.mount_submenu("A", None);
        let b = group.mount_submenu("B", None);
        group.hover_trigger(Some(a), start);
        group.hover_trigger(Some(b), start + Duration::from_millis(40));
        assert!(group.tick(start + Duration::from_millis(200)));
        assert!(!group.is_open(a));
        assert!(group.is_open(b));
    }
}
