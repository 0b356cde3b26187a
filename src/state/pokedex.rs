// Pokédex tab state.
// A list view over the collection and one independently fetching item view per entry.

use ratatui::widgets::ListState;
use tokio_util::sync::CancellationToken;

use crate::api::{CollectionPage, CollectionReference, Pokemon};
use crate::error::Result;
use crate::fetch::{FetchHandle, FetchHook, FetchState};

use super::console::Console;

/// Resource path of both the collection and the detail records.
pub const POKEMON_PATH: &str = "pokemon";

pub const LOADING_MESSAGE: &str = "Loading...";
pub const FAILURE_MESSAGE: &str = "Something went wrong";

/// Summary card for one Pokémon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: u32,
    pub title: String,
    pub image: Option<String>,
    /// Type names in upstream order, joined with ", ".
    pub tags: String,
}

impl From<&Pokemon> for Card {
    fn from(pokemon: &Pokemon) -> Self {
        Self {
            id: pokemon.id,
            title: pokemon.name.clone(),
            image: pokemon.sprites.front_default.clone(),
            tags: pokemon.type_line(),
        }
    }
}

/// What an item view shows. Exactly one variant at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRender {
    Loading,
    Failed,
    Card(Card),
}

/// What the list view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRender {
    Loading,
    Failed,
    Items(Vec<ItemRender>),
}

/// Detail card for one collection entry. Fetches `pokemon/{name}` on mount.
pub struct ItemView {
    reference: CollectionReference,
    handle: FetchHandle<Pokemon>,
    console: Console,
    reported: bool,
}

impl ItemView {
    pub fn mount(
        hook: &FetchHook,
        reference: CollectionReference,
        console: Console,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let handle: FetchHandle<Pokemon> =
            hook.use_fetch(POKEMON_PATH, Some(&reference.name), cancel)?;
        tracing::trace!(url = handle.url(), "item view mounted");
        let mut view = Self {
            reference,
            handle,
            console,
            reported: false,
        };
        view.report_failure();
        Ok(view)
    }

    pub fn reference(&self) -> &CollectionReference {
        &self.reference
    }

    /// Apply any newly published result. Returns whether the state changed.
    pub fn poll(&mut self) -> bool {
        let changed = self.handle.poll();
        if changed {
            self.report_failure();
        }
        changed
    }

    fn report_failure(&mut self) {
        if self.reported {
            return;
        }
        if let Some(err) = self.handle.state().error() {
            self.console.report(&self.reference.name, err);
            self.reported = true;
        }
    }

    pub fn render(&self) -> ItemRender {
        match self.handle.state() {
            FetchState::Pending => ItemRender::Loading,
            FetchState::Error(_) => ItemRender::Failed,
            FetchState::Success(pokemon) => ItemRender::Card(Card::from(pokemon)),
        }
    }
}

/// The collection view. Mounts one `ItemView` per reference once the
/// collection resolves, preserving upstream order.
pub struct ListView {
    hook: FetchHook,
    console: Console,
    /// Parent of every token handed to this view's fetches.
    cancel: CancellationToken,
    handle: FetchHandle<CollectionPage>,
    items: Vec<ItemView>,
    /// References the current items were mounted from.
    mounted: Option<Vec<CollectionReference>>,
    reported: bool,
    pub list_state: ListState,
}

impl ListView {
    pub fn mount(hook: FetchHook, console: Console) -> Result<Self> {
        let cancel = CancellationToken::new();
        let handle = hook.use_fetch(POKEMON_PATH, None, cancel.child_token())?;
        let mut view = Self {
            hook,
            console,
            cancel,
            handle,
            items: Vec::new(),
            mounted: None,
            reported: false,
            list_state: ListState::default(),
        };
        view.sync()?;
        Ok(view)
    }

    pub fn items(&self) -> &[ItemView] {
        &self.items
    }

    /// Total number of entries upstream, if reported.
    pub fn total_count(&self) -> Option<u64> {
        self.handle.state().data().and_then(|page| page.count)
    }

    /// Apply newly published results for the collection and every item.
    pub fn poll(&mut self) -> Result<bool> {
        let mut changed = self.handle.poll();
        if changed {
            self.sync()?;
        }
        for item in &mut self.items {
            changed |= item.poll();
        }
        Ok(changed)
    }

    /// Bring mounted items in line with the collection state.
    fn sync(&mut self) -> Result<()> {
        if let Some(err) = self.handle.state().error() {
            if !self.reported {
                self.console.report(POKEMON_PATH, err);
                self.reported = true;
            }
            return Ok(());
        }

        let Some(page) = self.handle.state().data() else {
            return Ok(());
        };
        if self.mounted.as_ref() == Some(&page.results) {
            return Ok(());
        }

        let references = page.results.clone();
        self.mount_items(references)
    }

    fn mount_items(&mut self, references: Vec<CollectionReference>) -> Result<()> {
        tracing::debug!(count = references.len(), "mounting item views");
        let items = references
            .iter()
            .cloned()
            .map(|reference| {
                ItemView::mount(
                    &self.hook,
                    reference,
                    self.console.clone(),
                    self.cancel.child_token(),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        // Dropping the previous items cancels their fetches
        self.items = items;
        self.mounted = Some(references);
        self.reset_selection();
        Ok(())
    }

    pub fn render(&self) -> ListRender {
        match self.handle.state() {
            FetchState::Pending => ListRender::Loading,
            FetchState::Error(_) => ListRender::Failed,
            FetchState::Success(_) => {
                ListRender::Items(self.items.iter().map(ItemView::render).collect())
            }
        }
    }

    /// Select the next item in the list.
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            Some(i) => i, // Stay at end
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item in the list.
    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected_item(&self) -> Option<&ItemView> {
        self.items.get(self.list_state.selected()?)
    }

    fn reset_selection(&mut self) {
        let selected = if self.items.is_empty() { None } else { Some(0) };
        self.list_state.select(selected);
    }
}

impl Drop for ListView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
