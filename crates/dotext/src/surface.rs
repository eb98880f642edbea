//! The drawing surface element handed to the embedding layer.
//!
//! Wraps a [`Pixmap`] with the element-level state a host cares about:
//! mirrored attributes, the `touch-action` style, pointer subscriptions and
//! the on-screen rectangle used to map client coordinates.

use dotext_core::math::{Rect, Vec2};
use dotext_render::Pixmap;
use indexmap::IndexMap;

/// Pointer event categories a surface can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Move,
    Down,
    Leave,
}

/// A pointer event in host client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub client: Vec2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, client: Vec2) -> Self {
        Self { kind, client }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, Vec2::new(x, y))
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, Vec2::new(x, y))
    }

    pub fn leave() -> Self {
        Self::new(PointerKind::Leave, Vec2::ZERO)
    }
}

/// Identifies one pointer subscription on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Attributes that are computed from the surface size and never mirrored.
const COMPUTED_ATTRIBUTES: [&str; 2] = ["width", "height"];

fn is_computed(name: &str) -> bool {
    COMPUTED_ATTRIBUTES
        .iter()
        .any(|computed| computed.eq_ignore_ascii_case(name))
}

/// A drawing surface plus its element-level state.
#[derive(Debug, Clone)]
pub struct SurfaceElement {
    pixmap: Pixmap,
    attributes: IndexMap<String, String>,
    touch_action: Option<String>,
    listeners: IndexMap<ListenerId, PointerKind>,
    next_listener: u64,
    display_rect: Option<Rect>,
}

impl SurfaceElement {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
            attributes: IndexMap::new(),
            touch_action: None,
            listeners: IndexMap::new(),
            next_listener: 0,
            display_rect: None,
        }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Resize the backing pixmap; clears its pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixmap.resize(width, height);
    }

    // Attribute passthrough

    /// Set an attribute. `width` and `height` are computed and ignored.
    /// Returns whether the attribute was stored.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if is_computed(&name) {
            return false;
        }
        self.attributes.insert(name, value.into());
        true
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Attribute value. `width` and `height` report the surface size.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name.to_ascii_lowercase().as_str() {
            "width" => Some(self.width().to_string()),
            "height" => Some(self.height().to_string()),
            _ => self.attributes.get(name).cloned(),
        }
    }

    /// Mirrored attributes in insertion order (computed size excluded).
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Mirror the embedding element's attribute set: attributes the host no
    /// longer carries are removed, the rest are inserted or updated.
    pub fn sync_attributes<I, K, V>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let incoming: IndexMap<String, String> = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !is_computed(k))
            .collect();

        self.attributes.retain(|k, _| incoming.contains_key(k));
        for (k, v) in incoming {
            self.attributes.insert(k, v);
        }
    }

    // Style

    pub fn touch_action(&self) -> Option<&str> {
        self.touch_action.as_deref()
    }

    pub fn set_touch_action(&mut self, value: Option<String>) {
        self.touch_action = value;
    }

    // Pointer subscriptions

    pub fn add_listener(&mut self, kind: PointerKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, kind);
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.listeners.keys().copied()
    }

    pub fn has_listener(&self, kind: PointerKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    // Coordinate mapping

    /// Where the host displays the surface, in client coordinates.
    pub fn set_display_rect(&mut self, rect: Rect) {
        self.display_rect = Some(rect);
    }

    /// The display rect, defaulting to the surface at the origin, 1:1.
    pub fn display_rect(&self) -> Rect {
        self.display_rect
            .unwrap_or_else(|| Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32))
    }

    /// Map a client position to surface pixels. `None` when the surface is
    /// not displayed (zero-size rect).
    pub fn client_to_surface(&self, client: Vec2) -> Option<Vec2> {
        let rect = self.display_rect();
        if rect.is_degenerate() {
            return None;
        }
        let scale = Vec2::new(self.width() as f32, self.height() as f32) / rect.size();
        Some((client - rect.origin()) * scale)
    }
}
