use crate::dispatch::{Notification, NotificationKind};
use crate::state::{Action, AppState, DomainState};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::collections::VecDeque;
use std::error::Error;
use std::io;
use std::sync::{Arc, Mutex};

type DynError = Box<dyn Error + Send + Sync>;

const TOAST_TTL_SECS: i64 = 6;
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    raised_at: i64,
}

#[derive(Clone)]
pub struct Dashboard {
    pub state: Arc<Mutex<AppState>>,
    toasts: Arc<Mutex<VecDeque<Toast>>>,
    selected_news: Arc<Mutex<usize>>,
    running: Arc<Mutex<bool>>,
    tracked_city: String,
}

impl Dashboard {
    pub fn new(tracked_city: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::new())),
            toasts: Arc::new(Mutex::new(VecDeque::new())),
            selected_news: Arc::new(Mutex::new(0)),
            running: Arc::new(Mutex::new(true)),
            tracked_city: tracked_city.to_string(),
        }
    }

    pub async fn run(
        &self,
        mut action_rx: tokio::sync::mpsc::Receiver<Action>,
        mut notify_rx: tokio::sync::mpsc::Receiver<Notification>,
    ) -> Result<(), DynError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        while *self.running.lock().unwrap() {
            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_input(key);
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                self.state.lock().unwrap().apply(action);
            }

            while let Ok(notification) = notify_rx.try_recv() {
                self.push_toast(notification, Local::now().timestamp());
            }

            self.prune_toasts(Local::now().timestamp());

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Length(3),
                        Constraint::Length(MAX_TOASTS as u16 + 2),
                        Constraint::Length(2),
                    ])
                    .split(f.size());

                self.render_header(f, chunks[0]);
                self.render_panels(f, chunks[1]);
                self.render_favorites(f, chunks[2]);
                self.render_toasts(f, chunks[3]);
                self.render_footer(f, chunks[4]);
            })?;
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        Ok(())
    }

    fn handle_key_input(&self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => *self.running.lock().unwrap() = false,
            KeyCode::Char('w') => {
                let city = self.tracked_city.clone();
                self.state
                    .lock()
                    .unwrap()
                    .apply(Action::ToggleFavoriteCity(city));
            }
            KeyCode::Char('b') => {
                self.state
                    .lock()
                    .unwrap()
                    .apply(Action::ToggleFavoriteCrypto("bitcoin".to_string()));
            }
            KeyCode::Char('e') => {
                self.state
                    .lock()
                    .unwrap()
                    .apply(Action::ToggleFavoriteCrypto("ethereum".to_string()));
            }
            KeyCode::Up => {
                let mut selected = self.selected_news.lock().unwrap();
                *selected = selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let mut selected = self.selected_news.lock().unwrap();
                *selected = selected.saturating_add(1);
            }
            _ => (),
        }
    }

    fn push_toast(&self, notification: Notification, now: i64) {
        let mut toasts = self.toasts.lock().unwrap();
        toasts.push_back(Toast {
            notification,
            raised_at: now,
        });
        while toasts.len() > MAX_TOASTS {
            toasts.pop_front();
        }
    }

    fn prune_toasts(&self, now: i64) {
        let mut toasts = self.toasts.lock().unwrap();
        while toasts
            .front()
            .map_or(false, |t| now - t.raised_at >= TOAST_TTL_SECS)
        {
            toasts.pop_front();
        }
    }

    fn render_header(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let header = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(
                "CRYPTOWEATHER NEXUS",
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Last update: {}", Local::now().format("%H:%M:%S")),
                Style::default().fg(Color::Gray),
            )),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));

        f.render_widget(header, area);
    }

    fn render_panels(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(area);

        self.render_weather_panel(f, chunks[0]);
        self.render_crypto_panel(f, chunks[1]);
        self.render_news_panel(f, chunks[2]);
    }

    fn render_weather_panel(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let state = self.state.lock().unwrap();

        let block = Block::default().borders(Borders::ALL).title("Weather");
        let inner_area = block.inner(area);
        f.render_widget(block, area);

        let text = match &state.weather {
            DomainState::Loading => Text::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            )),
            DomainState::Failed(err) => Text::from(Span::styled(
                format!("Error: {}", err),
                Style::default().fg(Color::Red),
            )),
            DomainState::Ready(report) => {
                let star = if state.favorites.has_city(&report.city) {
                    "★ "
                } else {
                    ""
                };
                Text::from(vec![
                    Line::from(Span::styled(
                        format!("{}{}", star, report.city),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("{:.1}°C", report.temperature_c)),
                    Line::from(report.conditions.clone()),
                ])
            }
        };

        f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner_area);
    }

    fn render_crypto_panel(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let state = self.state.lock().unwrap();

        let block = Block::default().borders(Borders::ALL).title("Cryptocurrency");
        let inner_area = block.inner(area);
        f.render_widget(block, area);

        let text = match &state.crypto {
            DomainState::Loading => Text::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            )),
            DomainState::Failed(err) => Text::from(Span::styled(
                format!("Error: {}", err),
                Style::default().fg(Color::Red),
            )),
            DomainState::Ready(quotes) => {
                let lines = quotes
                    .iter()
                    .map(|quote| {
                        let star = if state.favorites.has_crypto(&quote.id) {
                            "★ "
                        } else {
                            ""
                        };
                        let change_color = if quote.change_24h < 0.0 {
                            Color::Red
                        } else {
                            Color::Green
                        };
                        Line::from(vec![
                            Span::styled(
                                format!("{}{:<10}", star, quote.id),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!(" ${:.2} ", quote.price_usd)),
                            Span::styled(
                                format!("{:+.2}%", quote.change_24h),
                                Style::default().fg(change_color),
                            ),
                        ])
                    })
                    .collect::<Vec<_>>();
                Text::from(lines)
            }
        };

        f.render_widget(Paragraph::new(text), inner_area);
    }

    fn render_news_panel(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let state = self.state.lock().unwrap();
        let selected = *self.selected_news.lock().unwrap();

        let block = Block::default().borders(Borders::ALL).title("News");
        let inner_area = block.inner(area);
        f.render_widget(block, area);

        match &state.news {
            DomainState::Loading => {
                f.render_widget(
                    Paragraph::new(Span::styled(
                        "Loading...",
                        Style::default().fg(Color::DarkGray),
                    )),
                    inner_area,
                );
            }
            DomainState::Failed(err) => {
                f.render_widget(
                    Paragraph::new(Span::styled(
                        format!("Error: {}", err),
                        Style::default().fg(Color::Red),
                    ))
                    .wrap(Wrap { trim: true }),
                    inner_area,
                );
            }
            DomainState::Ready(items) => {
                let list_items = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let style = if i == selected.min(items.len().saturating_sub(1)) {
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Yellow)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        ListItem::new(Line::from(vec![
                            Span::styled(item.title.clone(), style),
                            Span::styled(
                                format!(" ({})", item.source),
                                Style::default().fg(Color::DarkGray),
                            ),
                        ]))
                    })
                    .collect::<Vec<_>>();
                f.render_widget(List::new(list_items), inner_area);
            }
        }
    }

    fn render_favorites(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let state = self.state.lock().unwrap();

        let favorites = Paragraph::new(Line::from(vec![
            Span::styled("Cities: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(state.favorites.city_summary()),
            Span::raw("   "),
            Span::styled("Cryptos: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(state.favorites.crypto_summary()),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Favorites"));

        f.render_widget(favorites, area);
    }

    fn render_toasts(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let toasts = self.toasts.lock().unwrap();

        let lines = toasts
            .iter()
            .rev()
            .map(|toast| {
                let color = match toast.notification.kind {
                    NotificationKind::Success => Color::Green,
                    NotificationKind::Error => Color::Red,
                };
                let ts = chrono::DateTime::from_timestamp(toast.raised_at, 0)
                    .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
                    .unwrap_or_default();
                Line::from(vec![
                    Span::styled(format!("[{}] ", ts), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        toast.notification.text.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect::<Vec<_>>();

        let paragraph = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title("Notifications"));

        f.render_widget(paragraph, area);
    }

    fn render_footer(&self, f: &mut Frame<CrosstermBackend<io::Stdout>>, area: Rect) {
        let controls = vec![
            Span::raw("Controls: "),
            Span::styled("↑/↓", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" News  "),
            Span::styled("w", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Favorite city  "),
            Span::styled("b", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Favorite BTC  "),
            Span::styled("e", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Favorite ETH  "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Quit"),
        ];

        f.render_widget(Paragraph::new(Line::from(controls)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Notification, NotificationKind};

    fn notification(text: &str) -> Notification {
        Notification {
            kind: NotificationKind::Success,
            text: text.to_string(),
        }
    }

    #[test]
    fn toasts_expire_after_ttl() {
        let dashboard = Dashboard::new("New York");
        dashboard.push_toast(notification("old"), 100);
        dashboard.push_toast(notification("fresh"), 100 + TOAST_TTL_SECS - 1);

        dashboard.prune_toasts(100 + TOAST_TTL_SECS);

        let toasts = dashboard.toasts.lock().unwrap();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].notification.text, "fresh");
    }

    #[test]
    fn toast_queue_is_bounded() {
        let dashboard = Dashboard::new("New York");
        for i in 0..10 {
            dashboard.push_toast(notification(&format!("toast {}", i)), 100);
        }

        let toasts = dashboard.toasts.lock().unwrap();
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts.back().unwrap().notification.text, "toast 9");
    }
}
