//! The dropdown widget.
//!
//! Composes the text input, the search session and the overlay. Hosts feed it
//! input events with the current `Instant`, route search completions back
//! through [`Dropdown::apply`], and draw whatever [`Dropdown::view`] returns.

use crate::Error;
use crate::config::{Config, ContainerStyle, InputStyle};
use crate::input::TextInput;
use crate::overlay::{Overlay, OverlayMetrics, OverlayState, Phase, Transition};
use crate::render::{IndexChild, RenderOverrides, RenderedResultSet, ResultElement};
use crate::session::{Completion, SearchCompletion, SearchDispatch, SearchSession, Submission};
use std::time::Instant;
use tracing::debug;

/// Everything about the widget that isn't an index or an element.
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownOptions {
    pub placeholder: String,
    pub cancel_text: String,
    pub cancel_color: String,
    pub input_style: InputStyle,
    pub container_style: ContainerStyle,
    pub results_background: String,
    /// Trailing spacer under the rows
    pub footer_extent: Option<f32>,
    pub metrics: OverlayMetrics,
    /// Vertical space the widget may grow into, input bar included
    pub available_extent: f32,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), 0.0)
    }
}

impl DropdownOptions {
    #[must_use]
    pub fn from_config(config: &Config, available_extent: f32) -> Self {
        let appearance = &config.appearance;
        Self {
            placeholder: appearance.placeholder.clone(),
            cancel_text: appearance.cancel_text.clone(),
            cancel_color: appearance.cancel_button_color.clone(),
            input_style: appearance.input_style.clone(),
            container_style: appearance.container_style.clone(),
            results_background: appearance.results_background.clone(),
            footer_extent: appearance.footer_height,
            metrics: config.animation.to_metrics(),
            available_extent,
        }
    }
}

/// The cancel control as it should be drawn right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CancelView<'a> {
    pub label: &'a str,
    pub color: &'a str,
    pub extent: f32,
    pub opacity: f32,
}

/// The results surface. Only present while the overlay is open.
#[derive(Debug, PartialEq)]
pub struct SurfaceView<'a, E> {
    pub results: &'a RenderedResultSet<E>,
    pub extent: f32,
    pub footer_extent: Option<f32>,
    pub background: &'a str,
}

/// Render-ready snapshot of the widget at one instant.
#[derive(Debug, PartialEq)]
pub struct DropdownView<'a, E> {
    pub text: &'a str,
    pub cursor: usize,
    pub placeholder: &'a str,
    pub focused: bool,
    pub phase: Phase,
    pub side_component: Option<&'a E>,
    pub cancel: CancelView<'a>,
    pub surface: Option<SurfaceView<'a, E>>,
}

pub struct Dropdown<E> {
    options: DropdownOptions,
    children: Vec<Box<dyn IndexChild<E>>>,
    overrides: RenderOverrides<E>,
    side_component: Option<E>,
    dispatcher: Box<dyn SearchDispatch>,
    input: TextInput,
    session: SearchSession<E>,
    overlay: Overlay,
}

impl<E> std::fmt::Debug for Dropdown<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dropdown")
            .field("indices", &self.children.len())
            .field("input", &self.input)
            .field("overlay", &self.overlay.state())
            .finish_non_exhaustive()
    }
}

impl<E: ResultElement> Dropdown<E> {
    /// Build a widget over `children`, one per index, in display order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Descriptor`] for the first child whose descriptor is
    /// malformed. Nothing is rendered or dispatched in that case.
    pub fn new(
        options: DropdownOptions,
        children: Vec<Box<dyn IndexChild<E>>>,
        dispatcher: Box<dyn SearchDispatch>,
    ) -> crate::Result<Self> {
        for (position, child) in children.iter().enumerate() {
            let descriptor = child.descriptor();
            descriptor.validate().map_err(|source| {
                let label = if descriptor.index.is_empty() {
                    "unnamed"
                } else {
                    descriptor.index.as_str()
                };
                Error::descriptor(position, label, source)
            })?;
        }

        let overlay = Overlay::new(options.metrics.clone(), options.available_extent);
        Ok(Self {
            options,
            children,
            overrides: RenderOverrides::default(),
            side_component: None,
            dispatcher,
            input: TextInput::new(),
            session: SearchSession::new(),
            overlay,
        })
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: RenderOverrides<E>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Element shown beside the input while the overlay is closed.
    #[must_use]
    pub fn with_side_component(mut self, element: E) -> Self {
        self.side_component = Some(element);
        self
    }

    #[must_use]
    pub fn options(&self) -> &DropdownOptions {
        &self.options
    }

    #[must_use]
    pub fn children(&self) -> &[Box<dyn IndexChild<E>>] {
        &self.children
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.input.text()
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.input.is_focused()
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.overlay.state()
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn results(&self) -> &RenderedResultSet<E> {
        self.session.results()
    }

    /// The input gained focus. Opens the overlay if it was closed.
    pub fn focus(&mut self, now: Instant) -> bool {
        match self.overlay.focus_gained(now) {
            Some(Transition::Opened) => {
                self.input.focus();
                true
            }
            _ => false,
        }
    }

    /// The cancel control was activated. Blurs the input, clears the text and
    /// results, and closes the overlay. Ignored while closed.
    pub fn cancel(&mut self, now: Instant) -> bool {
        match self.overlay.cancel(now) {
            Some(Transition::Closed) => {
                self.input.blur();
                self.input.clear();
                self.session.clear();
                true
            }
            _ => false,
        }
    }

    /// Replace the whole text. Ignored unless focused.
    pub fn set_text(&mut self, text: &str) -> bool {
        if !self.input.is_focused() || !self.input.set_text(text) {
            return false;
        }
        self.text_changed();
        true
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.input.is_focused() {
            return false;
        }
        self.input.insert_char(c);
        self.text_changed();
        true
    }

    /// Backspace.
    pub fn delete_char(&mut self) -> bool {
        if !self.input.is_focused() || !self.input.delete_char() {
            return false;
        }
        self.text_changed();
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if !self.input.is_focused() || !self.input.delete_forward() {
            return false;
        }
        self.text_changed();
        true
    }

    pub fn move_cursor_left(&mut self) {
        self.input.move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.input.move_cursor_right();
    }

    pub fn move_cursor_home(&mut self) {
        self.input.move_cursor_home();
    }

    pub fn move_cursor_end(&mut self) {
        self.input.move_cursor_end();
    }

    fn text_changed(&mut self) {
        let text = self.input.text();
        let descriptors = self.children.iter().map(|child| child.descriptor());
        match self.session.submit(text, descriptors) {
            Submission::Cleared => debug!("Input cleared"),
            Submission::Issued { seq, batch } => self.dispatcher.dispatch(seq, text, batch),
        }
    }

    /// Route a search completion into the session.
    pub fn apply(&mut self, completion: SearchCompletion) -> Completion {
        self.session
            .complete(completion, &self.children, &self.overrides)
    }

    /// The host's available extent changed.
    pub fn resize(&mut self, available_extent: f32) {
        self.options.available_extent = available_extent;
        self.overlay.resize(available_extent);
    }

    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.overlay.is_animating(now)
    }

    #[must_use]
    pub fn view(&self, now: Instant) -> DropdownView<'_, E> {
        let mounted = self.overlay.is_open(now);

        let surface = mounted.then(|| SurfaceView {
            results: self.session.results(),
            extent: self.overlay.surface_extent(now),
            footer_extent: self.options.footer_extent,
            background: &self.options.results_background,
        });

        DropdownView {
            text: self.input.text(),
            cursor: self.input.cursor(),
            placeholder: &self.options.placeholder,
            focused: self.input.is_focused(),
            phase: self.overlay.phase(now),
            side_component: if mounted {
                None
            } else {
                self.side_component.as_ref()
            },
            cancel: CancelView {
                label: &self.options.cancel_text,
                color: &self.options.cancel_color,
                extent: self.overlay.cancel_extent(now),
                opacity: self.overlay.cancel_opacity(now),
            },
            surface,
        }
    }
}
