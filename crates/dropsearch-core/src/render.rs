//! Render contract between the widget and host-supplied index renderers.
//!
//! The core never draws. Hosts supply one [`IndexChild`] per index (each both
//! describes an index and renders its hits) plus an element type implementing
//! [`ResultElement`] for the built-in title and "no results" rows. The widget
//! projects each search response into a [`RenderedResultSet`] of keyed rows.

use dropsearch_types::{Hit, IndexDescriptor, SearchResponse};
use tracing::warn;

/// A host-supplied child: one searchable index plus the renderer for its hits.
pub trait IndexChild<E> {
    fn descriptor(&self) -> &IndexDescriptor;

    /// Render one hit. `position` is the hit's place in its index's hit order.
    fn render_hit(&self, hit: &Hit, position: usize) -> E;
}

/// Default elements the widget renders on its own.
pub trait ResultElement: Sized {
    /// Section heading carrying an index title.
    fn title(title: &str) -> Self;

    /// Placeholder shown when no index matched.
    fn no_results() -> Self;
}

pub type TitleFn<E> = Box<dyn Fn(&str) -> E>;
pub type NoResultsFn<E> = Box<dyn Fn() -> E>;

/// Optional replacements for the default title and no-results elements.
pub struct RenderOverrides<E> {
    title: Option<TitleFn<E>>,
    no_results: Option<NoResultsFn<E>>,
}

impl<E> Default for RenderOverrides<E> {
    fn default() -> Self {
        Self {
            title: None,
            no_results: None,
        }
    }
}

impl<E> std::fmt::Debug for RenderOverrides<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOverrides")
            .field("title", &self.title.is_some())
            .field("no_results", &self.no_results.is_some())
            .finish()
    }
}

impl<E: ResultElement> RenderOverrides<E> {
    #[must_use]
    pub fn with_title(mut self, render: impl Fn(&str) -> E + 'static) -> Self {
        self.title = Some(Box::new(render));
        self
    }

    #[must_use]
    pub fn with_no_results(mut self, render: impl Fn() -> E + 'static) -> Self {
        self.no_results = Some(Box::new(render));
        self
    }

    fn title(&self, title: &str) -> E {
        match &self.title {
            Some(render) => render(title),
            None => E::title(title),
        }
    }

    fn no_results(&self) -> E {
        match &self.no_results {
            Some(render) => render(),
            None => E::no_results(),
        }
    }
}

/// Stable identity of a rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    NoResults,
    Title { index: String },
    Hit { index: String, position: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<E> {
    pub key: RowKey,
    pub element: E,
}

/// One index's slice of the results: an optional heading, then its hits.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<E> {
    pub index: String,
    pub title: Option<Row<E>>,
    pub hits: Vec<Row<E>>,
}

impl<E> Section<E> {
    pub fn rows(&self) -> impl Iterator<Item = &Row<E>> {
        self.title.iter().chain(self.hits.iter())
    }
}

/// What the results surface shows.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedResultSet<E> {
    /// Nothing typed yet, or cleared
    Empty,

    /// Every index reported zero matches
    NoResults(Row<E>),

    /// Per-index sections in descriptor order
    Sections(Vec<Section<E>>),
}

impl<E> Default for RenderedResultSet<E> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<E> RenderedResultSet<E> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// All rows in display order.
    pub fn rows(&self) -> Box<dyn Iterator<Item = &Row<E>> + '_> {
        match self {
            Self::Empty => Box::new(std::iter::empty()),
            Self::NoResults(row) => Box::new(std::iter::once(row)),
            Self::Sections(sections) => Box::new(sections.iter().flat_map(Section::rows)),
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    #[must_use]
    pub fn sections(&self) -> &[Section<E>] {
        match self {
            Self::Sections(sections) => sections,
            _ => &[],
        }
    }
}

/// Project a response onto the children, entry `i` against child `i`.
///
/// Entries beyond the last child are ignored; children without an entry get an
/// empty section.
pub fn project<E: ResultElement>(
    response: &SearchResponse,
    children: &[Box<dyn IndexChild<E>>],
    overrides: &RenderOverrides<E>,
) -> RenderedResultSet<E> {
    if response.has_no_hits() {
        return RenderedResultSet::NoResults(Row {
            key: RowKey::NoResults,
            element: overrides.no_results(),
        });
    }

    if response.results.len() != children.len() {
        warn!(
            "Response has {} entries for {} indices",
            response.results.len(),
            children.len()
        );
    }

    let sections = children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let descriptor = child.descriptor();
            let index = descriptor.index.clone();

            let Some(result) = response.results.get(i) else {
                return Section {
                    index,
                    title: None,
                    hits: Vec::new(),
                };
            };

            let title = (result.hit_count > 0).then(|| Row {
                key: RowKey::Title {
                    index: index.clone(),
                },
                element: overrides.title(&descriptor.title),
            });

            let hits = result
                .hits
                .iter()
                .enumerate()
                .map(|(position, hit)| Row {
                    key: RowKey::Hit {
                        index: index.clone(),
                        position,
                    },
                    element: child.render_hit(hit, position),
                })
                .collect();

            Section { index, title, hits }
        })
        .collect();

    RenderedResultSet::Sections(sections)
}
