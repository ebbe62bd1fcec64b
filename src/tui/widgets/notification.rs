//! Toast notification widget
//!
//! Displays temporary notifications to the user.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Type of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// Neutral hint, e.g. nothing selected
    Info,
    /// A request the backend accepted
    Success,
    /// Something the user should double-check
    Warning,
    /// A failed request or a refused form
    Error,
}

impl NotificationType {
    /// Border and title color
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    /// One-character marker shown before the title
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "i",
            Self::Success => "+",
            Self::Warning => "!",
            Self::Error => "x",
        }
    }

    /// Block title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// A toast notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    /// When the toast reached the front of the queue
    pub created_at: Instant,
    /// How long it stays up once shown
    pub duration: Duration,
}

impl Notification {
    /// Toast shown for three seconds
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    /// Keep the toast up for `seconds`
    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration = Duration::from_secs(seconds);
        self
    }

    /// Whether the display time has run out
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Widget for rendering a notification
pub struct NotificationWidget<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationWidget<'a> {
    /// Render `notification` as a bordered box
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }
}

impl Widget for NotificationWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = self.notification.notification_type;
        let color = kind.color();

        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} {} ", kind.icon(), kind.title()))
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

        Paragraph::new(self.notification.message.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

/// Toasts shown one at a time, oldest first
#[derive(Debug, Default)]
pub struct NotificationQueue {
    notifications: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast behind the ones already waiting
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Drop the toast on screen once its time is up
    ///
    /// Only the front toast ages; the ones queued behind it wait their turn.
    pub fn remove_expired(&mut self) {
        if self.notifications.first().is_some_and(Notification::is_expired) {
            self.notifications.remove(0);
            if let Some(next) = self.notifications.first_mut() {
                next.created_at = Instant::now();
            }
        }
    }

    /// Dismiss the toast on screen
    pub fn dismiss(&mut self) {
        if !self.notifications.is_empty() {
            self.notifications.remove(0);
        }
    }

    /// The toast on screen, if any
    pub fn current(&self) -> Option<&Notification> {
        self.notifications.first()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

/// Top-right corner of `area`, sized for a short message
pub fn toast_area(area: Rect, message: &str) -> Rect {
    let width = 48.min(area.width);
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let text_lines = message.chars().count().div_ceil(inner_width).max(1) as u16;
    let height = (text_lines + 2).min(area.height);
    Rect::new(area.x + area.width - width, area.y, width, height)
}
