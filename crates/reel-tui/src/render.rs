//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference and draw to a
//! ratatui frame; they never mutate state or return effects. The reducer
//! reuses the line-building helpers for scroll math, so the two always agree
//! on transcript geometry.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use reel_core::story::{Media, Message};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::state::AppState;

/// Horizontal padding on each side of the transcript.
const TRANSCRIPT_MARGIN: u16 = 1;

/// Rows taken by header, faux input bar, and hint line.
const CHROME_HEIGHT: u16 = 3;

/// Bubble width cap as a share of the content width.
const BUBBLE_WIDTH_PERCENT: usize = 70;

/// Typing indicator animation frames; one step every few ticks.
const TYPING_FRAMES: &[&str] = &["·", "··", "···"];

/// Ticks per indicator animation step.
const TYPING_FRAME_TICKS: usize = 8;

fn received_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

fn sent_style() -> Style {
    Style::default().bg(Color::Green).fg(Color::Black)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Content width available for transcript lines.
pub fn transcript_content_width(width: u16) -> usize {
    width.saturating_sub(TRANSCRIPT_MARGIN * 2) as usize
}

/// Rows available for transcript lines.
pub fn transcript_viewport_height(height: u16) -> usize {
    height.saturating_sub(CHROME_HEIGHT) as usize
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, chunks[0]);
    render_transcript(app, frame, chunks[1]);
    render_input_bar(frame, chunks[2]);
    render_hints(app, frame, chunks[3]);
}

fn render_header(app: &AppState, frame: &mut Frame, area: Rect) {
    let story = app.current_story();
    let position = format!(
        "{}/{}",
        app.story_index + 1,
        app.library.stories().len()
    );
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(story.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {position} · {}", app.language), dim()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_transcript(app: &AppState, frame: &mut Frame, area: Rect) {
    let inner = area.inner(Margin {
        horizontal: TRANSCRIPT_MARGIN,
        vertical: 0,
    });
    let lines = transcript_lines(app, inner.width as usize);
    let viewport = inner.height as usize;
    let offset = app.scroll.effective_offset(lines.len(), viewport);
    let end = (offset + viewport).min(lines.len());
    let visible: Vec<Line<'static>> = lines[offset..end].to_vec();
    frame.render_widget(Paragraph::new(Text::from(visible)), inner);
}

fn render_input_bar(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        " Type a message…",
        dim().add_modifier(Modifier::ITALIC),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_hints(app: &AppState, frame: &mut Frame, area: Rect) {
    let status = if app.player.state().typing {
        "typing…"
    } else if app.player.is_complete() {
        "done · r replays"
    } else if app.player.is_running() {
        "replaying…"
    } else {
        ""
    };
    let hints = " ←/→ story · l language · r replay · space skip · ↑/↓ scroll · q quit";
    let pad = (area.width as usize)
        .saturating_sub(hints.width() + status.width() + 1);
    let line = Line::from(vec![
        Span::styled(hints, dim()),
        Span::raw(" ".repeat(pad)),
        Span::styled(status.to_string(), dim()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Builds all transcript lines (bubbles plus typing indicator) at `width`.
///
/// Shared with the reducer so scroll clamping sees the same line count the
/// renderer draws.
pub fn transcript_lines(app: &AppState, width: usize) -> Vec<Line<'static>> {
    let state = app.player.state();
    let bubble_width = (width * BUBBLE_WIDTH_PERCENT / 100).max(8);
    let mut lines = Vec::new();

    for (index, message) in state.revealed.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        push_message_lines(
            &mut lines,
            message,
            shows_sender(&state.revealed, index),
            bubble_width,
        );
    }

    if state.typing {
        if !state.revealed.is_empty() {
            lines.push(Line::default());
        }
        let frame = TYPING_FRAMES[(app.indicator_frame / TYPING_FRAME_TICKS) % TYPING_FRAMES.len()];
        lines.push(Line::from(Span::styled(
            format!(" {frame:<3} "),
            received_style(),
        )));
    }

    lines
}

/// Whether the message at `index` shows its sender label.
///
/// Grouping follows the revealed list, not the full transcript: a label
/// appears only when the previous visible message came from someone else.
pub fn shows_sender(revealed: &[Message], index: usize) -> bool {
    index == 0 || revealed[index - 1].sender != revealed[index].sender
}

fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    show_sender: bool,
    bubble_width: usize,
) {
    let alignment = if message.is_sent_by_me {
        Alignment::Right
    } else {
        Alignment::Left
    };
    let bubble = if message.is_sent_by_me {
        sent_style()
    } else {
        received_style()
    };

    if show_sender && !message.is_sent_by_me {
        lines.push(Line::from(Span::styled(message.sender.clone(), dim())));
    }

    let wrapped = wrap_text(&message.text, bubble_width);
    let last = wrapped.len().saturating_sub(1);
    for (i, row) in wrapped.into_iter().enumerate() {
        let mut spans = vec![Span::styled(" ".to_string(), bubble)];
        spans.extend(mention_spans(&row, bubble));
        spans.push(Span::styled(" ".to_string(), bubble));
        if i == last && !message.timestamp.is_empty() && message.media().is_none() {
            spans.push(Span::styled(format!(" {}", message.timestamp), dim()));
        }
        lines.push(Line::from(spans).alignment(alignment));
    }

    if let Some(media) = message.media() {
        let mut spans = vec![Span::styled(
            format!(" {} ", media_label(media)),
            bubble.add_modifier(Modifier::ITALIC),
        )];
        if !message.timestamp.is_empty() {
            spans.push(Span::styled(format!(" {}", message.timestamp), dim()));
        }
        lines.push(Line::from(spans).alignment(alignment));
    }
}

/// Splits a bubble row into spans, highlighting @mentions.
fn mention_spans(row: &str, bubble: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    for word in row.split_inclusive(' ') {
        if word.trim_end().starts_with('@') {
            if !plain.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut plain), bubble));
            }
            spans.push(Span::styled(word.to_string(), bubble.fg(Color::Cyan)));
        } else {
            plain.push_str(word);
        }
    }
    if !plain.is_empty() {
        spans.push(Span::styled(plain, bubble));
    }
    spans
}

/// One-line label for a media attachment.
pub fn media_label(media: Media<'_>) -> String {
    fn suffix(size: Option<&str>) -> String {
        size.map(|s| format!(" · {s}")).unwrap_or_default()
    }
    match media {
        Media::Document { title, size } => format!("≡ {title}{}", suffix(size)),
        Media::Video { title, size, .. } => {
            format!("▶ {}{}", title.unwrap_or("video"), suffix(size))
        }
        Media::Image { title, .. } => format!("▣ {}", title.unwrap_or("photo")),
        Media::Audio { .. } => "♫ voice note".to_string(),
        Media::Button { label } => format!("[ {label} ]"),
    }
}

/// Greedy word wrap to a display width, preserving explicit newlines.
///
/// Words wider than the limit are hard-split so a long URL cannot push a
/// bubble past the viewport.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let sep = usize::from(!row.is_empty());

            if row_width + sep + word_width <= width {
                if sep == 1 {
                    row.push(' ');
                }
                row.push_str(word);
                row_width += sep + word_width;
                continue;
            }

            if !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }

            if word_width <= width {
                row.push_str(word);
                row_width = word_width;
            } else {
                // Hard-split an overlong word.
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if row_width + ch_width > width {
                        rows.push(std::mem::take(&mut row));
                        row_width = 0;
                    }
                    row.push(ch);
                    row_width += ch_width;
                }
            }
        }

        rows.push(row);
    }

    rows
}
