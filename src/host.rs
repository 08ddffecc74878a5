use eframe::egui;
use slab::Slab;

pub const ZOOM_MIN: f32 = 0.3;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.1;
pub const ZOOM_DEFAULT: f32 = 1.0;

/// The parts of the egui context the window controls need, so tests can
/// record viewport commands without a window.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);
    fn request_repaint(&self);
    fn set_zoom_factor(&self, zoom: f32);
    fn is_maximized(&self) -> bool;
    fn is_fullscreen(&self) -> bool;
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }

    fn set_zoom_factor(&self, zoom: f32) {
        egui::Context::set_zoom_factor(self, zoom);
    }

    fn is_maximized(&self) -> bool {
        self.input(|i| i.viewport().maximized.unwrap_or(false))
    }

    fn is_fullscreen(&self) -> bool {
        self.input(|i| i.viewport().fullscreen.unwrap_or(false))
    }
}

/// Clamp to the supported zoom range and round to one decimal.
pub fn clamp_zoom(zoom: f32) -> f32 {
    let clamped = if zoom.is_finite() {
        zoom.clamp(ZOOM_MIN, ZOOM_MAX)
    } else {
        ZOOM_DEFAULT
    };
    (clamped * 10.0).round() / 10.0
}

/// Handle returned by a subscription; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(usize);

/// Callbacks notified when a value changes.
pub struct Subscribers<T> {
    callbacks: Slab<Box<dyn FnMut(T)>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            callbacks: Slab::new(),
        }
    }
}

impl<T: Copy> Subscribers<T> {
    pub fn subscribe(&mut self, callback: impl FnMut(T) + 'static) -> Subscription {
        Subscription(self.callbacks.insert(Box::new(callback)))
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.callbacks.try_remove(subscription.0).is_some()
    }

    pub fn emit(&mut self, value: T) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

/// Window control surface: minimize/maximize/close, fullscreen, zoom and the
/// developer tools window.
pub struct WindowHost {
    zoom: f32,
    devtools_open: bool,
    zoom_listeners: Subscribers<f32>,
    devtools_listeners: Subscribers<bool>,
}

impl Default for WindowHost {
    fn default() -> Self {
        Self::new(ZOOM_DEFAULT)
    }
}

impl WindowHost {
    pub fn new(zoom: f32) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            devtools_open: false,
            zoom_listeners: Subscribers::default(),
            devtools_listeners: Subscribers::default(),
        }
    }

    pub fn minimize(&self, ctx: &dyn ViewportCtx) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
    }

    pub fn toggle_maximize(&self, ctx: &dyn ViewportCtx) {
        let maximized = ctx.is_maximized();
        ctx.send_viewport_cmd(egui::ViewportCommand::Maximized(!maximized));
    }

    pub fn close(&self, ctx: &dyn ViewportCtx) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    pub fn toggle_fullscreen(&self, ctx: &dyn ViewportCtx) {
        let fullscreen = ctx.is_fullscreen();
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
    }

    pub fn start_drag(&self, ctx: &dyn ViewportCtx) {
        ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
    }

    pub fn set_title(&self, ctx: &dyn ViewportCtx, title: impl Into<String>) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.into()));
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    /// Apply the stored zoom to `ctx` without notifying listeners.
    pub fn apply_zoom(&self, ctx: &dyn ViewportCtx) {
        ctx.set_zoom_factor(self.zoom);
    }

    pub fn zoom_in(&mut self, ctx: &dyn ViewportCtx) -> f32 {
        self.set_zoom(ctx, self.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self, ctx: &dyn ViewportCtx) -> f32 {
        self.set_zoom(ctx, self.zoom - ZOOM_STEP)
    }

    pub fn zoom_reset(&mut self, ctx: &dyn ViewportCtx) -> f32 {
        self.set_zoom(ctx, ZOOM_DEFAULT)
    }

    pub fn set_zoom(&mut self, ctx: &dyn ViewportCtx, zoom: f32) -> f32 {
        let next = clamp_zoom(zoom);
        if (next - self.zoom).abs() > f32::EPSILON {
            tracing::debug!(from = self.zoom, to = next, "zoom changed");
            self.zoom = next;
            ctx.set_zoom_factor(next);
            self.zoom_listeners.emit(next);
        }
        self.zoom
    }

    pub fn on_zoom_changed(&mut self, callback: impl FnMut(f32) + 'static) -> Subscription {
        self.zoom_listeners.subscribe(callback)
    }

    pub fn unsubscribe_zoom(&mut self, subscription: Subscription) -> bool {
        self.zoom_listeners.unsubscribe(subscription)
    }

    pub fn is_devtools_open(&self) -> bool {
        self.devtools_open
    }

    pub fn set_devtools_open(&mut self, open: bool) {
        if self.devtools_open != open {
            self.devtools_open = open;
            self.devtools_listeners.emit(open);
        }
    }

    pub fn toggle_devtools(&mut self) -> bool {
        self.set_devtools_open(!self.devtools_open);
        self.devtools_open
    }

    pub fn on_devtools_state_changed(
        &mut self,
        callback: impl FnMut(bool) + 'static,
    ) -> Subscription {
        self.devtools_listeners.subscribe(callback)
    }

    pub fn unsubscribe_devtools(&mut self, subscription: Subscription) -> bool {
        self.devtools_listeners.unsubscribe(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped_and_rounded() {
        assert_eq!(clamp_zoom(0.1), 0.3);
        assert_eq!(clamp_zoom(5.0), 3.0);
        assert_eq!(clamp_zoom(1.26), 1.3);
        assert_eq!(clamp_zoom(0.7000001), 0.7);
        assert_eq!(clamp_zoom(f32::NAN), 1.0);
    }

    #[test]
    fn unsubscribed_callbacks_are_not_called() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::<bool>::default();
        let seen_a = seen.clone();
        let a = subs.subscribe(move |v| seen_a.borrow_mut().push(("a", v)));
        let seen_b = seen.clone();
        subs.subscribe(move |v| seen_b.borrow_mut().push(("b", v)));

        subs.emit(true);
        assert!(subs.unsubscribe(a));
        assert!(!subs.unsubscribe(a));
        subs.emit(false);

        assert_eq!(*seen.borrow(), vec![("a", true), ("b", true), ("b", false)]);
    }
}
