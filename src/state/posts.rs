// Posts tab state.
// Fetches the posts list and keeps the upstream JSON, pretty-printed, for the viewer.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, Result};
use crate::fetch::{FetchHandle, FetchHook, FetchState};

use super::console::Console;

pub const POSTS_PATH: &str = "posts";

pub const POSTS_LOADING_MESSAGE: &str = "loading...";
pub const POSTS_FAILURE_MESSAGE: &str = "Error";

/// What the posts viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostsRender<'a> {
    Loading,
    Failed,
    Json(&'a str),
}

pub struct PostsView {
    /// Kept untyped so the dump shows every upstream field in upstream order.
    handle: FetchHandle<Value>,
    console: Console,
    /// Pretty-printed body, rebuilt whenever the data changes.
    text: Option<std::result::Result<String, FetchError>>,
    reported: bool,
    pub scroll_y: u16,
}

impl PostsView {
    pub fn mount(hook: &FetchHook, console: Console) -> Result<Self> {
        let handle = hook.use_fetch(POSTS_PATH, None, CancellationToken::new())?;
        let mut view = Self {
            handle,
            console,
            text: None,
            reported: false,
            scroll_y: 0,
        };
        view.sync();
        Ok(view)
    }

    pub fn poll(&mut self) -> bool {
        let changed = self.handle.poll();
        if changed {
            self.sync();
        }
        changed
    }

    fn sync(&mut self) {
        self.text = match self.handle.state() {
            FetchState::Pending => None,
            FetchState::Error(err) => Some(Err(err.clone())),
            FetchState::Success(posts) => Some(
                serde_json::to_string_pretty(posts).map_err(|e| FetchError::Parse(e.to_string())),
            ),
        };

        if let Some(Err(err)) = &self.text
            && !self.reported
        {
            self.console.report(POSTS_PATH, err);
            self.reported = true;
        }
    }

    pub fn post_count(&self) -> Option<usize> {
        self.handle.state().data().and_then(Value::as_array).map(Vec::len)
    }

    pub fn render(&self) -> PostsRender<'_> {
        match &self.text {
            None => PostsRender::Loading,
            Some(Err(_)) => PostsRender::Failed,
            Some(Ok(text)) => PostsRender::Json(text),
        }
    }

    fn line_count(&self) -> u16 {
        match &self.text {
            Some(Ok(text)) => u16::try_from(text.lines().count()).unwrap_or(u16::MAX),
            _ => 0,
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_y = self.scroll_y.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.line_count().saturating_sub(1);
        self.scroll_y = self.scroll_y.saturating_add(lines).min(max);
    }

    pub fn scroll_to_start(&mut self) {
        self.scroll_y = 0;
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_y = self.line_count().saturating_sub(10);
    }
}
