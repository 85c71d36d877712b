use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};

use carewatch_core::{
    AggregatedParticipant, ApiConfig, CallMonitor, CarewatchConfig, FileTokenStore, GridSize,
    OperatorMediaControls, RoomDescriptor, SessionConnection, StaticTokenStore, TokenStore,
    VideoGrid,
};

use crate::events::{map_key, Action};
use crate::ui;

const TICK_RATE: Duration = Duration::from_millis(250);

pub struct App {
    monitor: Arc<CallMonitor>,
    pub grid: VideoGrid,
    pub controls: OperatorMediaControls,
    pub connections: Vec<SessionConnection>,
    pub rooms: Vec<RoomDescriptor>,
    pub roster: Vec<AggregatedParticipant>,
    pub room_rosters: HashMap<String, Vec<AggregatedParticipant>>,
    pub banner: Option<String>,
    pub loading: bool,
    pub selected_slot: usize,
    pub should_quit: bool,
}

impl App {
    pub async fn new() -> Result<Self> {
        load_dotenv_files();

        let api_url = std::env::var("CAREWATCH_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let config = CarewatchConfig {
            api: ApiConfig {
                base_url: api_url,
                ..Default::default()
            },
            ..Default::default()
        };

        let monitor = Arc::new(CallMonitor::new(&config, token_store()));
        monitor.start().await?;

        Ok(Self {
            monitor,
            grid: VideoGrid::new(GridSize::new(config.grid.default_size)),
            controls: OperatorMediaControls::new(),
            connections: Vec::new(),
            rooms: Vec::new(),
            roster: Vec::new(),
            room_rosters: HashMap::new(),
            banner: None,
            loading: true,
            selected_slot: 0,
            should_quit: false,
        })
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        while !self.should_quit {
            self.refresh().await;
            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = map_key(key) {
                            self.apply(action);
                        }
                    }
                }
            }
        }

        self.monitor.stop().await;
        Ok(())
    }

    async fn refresh(&mut self) {
        self.connections = self.monitor.pool().connections().await;
        self.rooms = self.monitor.directory().rooms().await;
        self.roster = self.monitor.roster().merged_roster().await;
        self.banner = self.monitor.directory().error().await;
        self.loading = self.monitor.directory().loading().await;

        let names: Vec<String> = self
            .connections
            .iter()
            .map(|c| c.room_name.clone())
            .collect();
        self.room_rosters.clear();
        for name in names {
            let entries = self.monitor.roster().room_roster(&name).await;
            self.room_rosters.insert(name, entries);
        }

        let live = self.connections.len().min(self.grid.size().slot_count());
        if live == 0 {
            self.selected_slot = 0;
        } else if self.selected_slot >= live {
            self.selected_slot = live - 1;
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::EnlargeGrid => self.grid.enlarge(),
            Action::ShrinkGrid => self.grid.shrink(),
            Action::ToggleMic => self.controls.toggle_mic(),
            Action::ToggleCamera => self.controls.toggle_camera(),
            Action::NextSlot => {
                let live = self.connections.len().min(self.grid.size().slot_count());
                if live > 0 {
                    self.selected_slot = (self.selected_slot + 1) % live;
                }
            }
            Action::PrevSlot => {
                let live = self.connections.len().min(self.grid.size().slot_count());
                if live > 0 {
                    self.selected_slot = (self.selected_slot + live - 1) % live;
                }
            }
            Action::ToggleFocus => {
                if let Some(connection) = self.connections.get(self.selected_slot) {
                    self.grid.toggle_focus(connection.room_name.clone());
                }
            }
            Action::Refetch => {
                let feed = self.monitor.directory().clone();
                tokio::spawn(async move {
                    feed.refetch().await;
                });
            }
        }
    }
}

fn token_store() -> Arc<dyn TokenStore> {
    if let Ok(token) = std::env::var("CAREWATCH_TOKEN") {
        if !token.is_empty() {
            return Arc::new(StaticTokenStore::new(token));
        }
    }
    match FileTokenStore::default_path() {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(StaticTokenStore::empty()),
    }
}

fn load_dotenv_files() {
    let current_dir = std::env::current_dir().ok();

    let env_paths = [
        current_dir.as_ref().map(|d| d.join(".env")),
        dirs::config_dir().map(|d| d.join("carewatch").join(".env")),
    ];

    for path in env_paths.iter().flatten() {
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
