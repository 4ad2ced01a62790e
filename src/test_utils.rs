//! Test data builders for app and view testing.

use crate::api::{FeedClient, FeedItem};
use crate::app::{App, AsyncResult, ViewerOptions};
use crate::feed::DEFAULT_PAGE_SIZE;
use crate::player::Player;
use crate::theme::{ResolvedTheme, ThemeVariant, default_for_variant};

/// Nothing listens here, so stray fetches from tests fail fast.
pub const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:1";

pub struct FeedItemBuilder {
    title: String,
    description: String,
    url: String,
}

impl Default for FeedItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedItemBuilder {
    pub fn new() -> Self {
        Self {
            title: "Test Short".to_string(),
            description: "A short test video".to_string(),
            url: "https://cdn.example.com/test.mp4".to_string(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn build(self) -> FeedItem {
        FeedItem {
            title: self.title,
            description: self.description,
            url: self.url,
        }
    }
}

/// `count` distinct items as the server would return them for `page`.
pub fn items_page(page: usize, count: usize) -> Vec<FeedItem> {
    (0..count)
        .map(|i| {
            FeedItemBuilder::new()
                .title(&format!("Short {page}-{i}"))
                .description(&format!("Clip {i} of page {page}"))
                .url(&format!("https://cdn.example.com/{page}/{i}.mp4"))
                .build()
        })
        .collect()
}

pub struct TestAppBuilder {
    items: Vec<FeedItem>,
    exhausted: bool,
    selected: usize,
    error: Option<String>,
    show_help: bool,
    page_size: usize,
    endpoint: String,
    theme: ResolvedTheme,
    viewport_height: Option<u16>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            exhausted: false,
            selected: 0,
            error: None,
            show_help: false,
            page_size: DEFAULT_PAGE_SIZE,
            endpoint: UNREACHABLE_ENDPOINT.to_string(),
            theme: default_for_variant(ThemeVariant::Dark),
            viewport_height: None,
        }
    }

    /// Items already loaded, delivered as the first page.
    pub fn with_items(mut self, items: Vec<FeedItem>) -> Self {
        self.items = items;
        self
    }

    /// Mark the feed exhausted after the loaded items.
    pub fn exhausted(mut self) -> Self {
        self.exhausted = true;
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }

    pub fn error(mut self, msg: &str) -> Self {
        self.error = Some(msg.to_string());
        self
    }

    pub fn show_help(mut self) -> Self {
        self.show_help = true;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn viewport_height(mut self, height: u16) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn build(self) -> App {
        let client = FeedClient::new(&self.endpoint, None).unwrap();
        let options = ViewerOptions {
            page_size: self.page_size,
            player: Player::default(),
            autoplay: false,
        };
        let mut app = App::new(self.theme, client, options);

        // Load through the session so pagination state matches the items.
        if !self.items.is_empty() {
            deliver(&mut app, self.items);
        }
        if self.exhausted {
            deliver(&mut app, Vec::new());
        }
        for _ in 0..self.selected {
            app.session.next();
        }

        // Set after loading so building never triggers a fetch.
        app.viewport_height = self.viewport_height;
        app.show_help = self.show_help;
        if let Some(error) = self.error {
            app.load.set_error(error);
        }
        app
    }
}

fn deliver(app: &mut App, items: Vec<FeedItem>) {
    let request = app.session.begin_fetch().unwrap();
    app.handle_async_result(AsyncResult::Page {
        generation: app.generation,
        task_id: 0,
        request,
        result: Ok(items),
    });
}
