use crate::app::{App, InputMode, OverlayTone};
use focusclock_core::{duration::Field, Mode, OverlayPosition, Preset};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;
use tachyonfx::Duration as TachyonDuration;

/// Overlay units per terminal column and row.
pub const CELL_WIDTH: f64 = 10.0;
pub const CELL_HEIGHT: f64 = 20.0;

const GLYPH_HEIGHT: u16 = 5;

/// Where things landed in the last frame; used to hit-test the mouse.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiLayout {
    pub display: Rect,
    /// Terminal cell that overlay coordinate (0, 0) maps to.
    pub canvas_origin: (i32, i32),
    pub overlay: Option<Rect>,
}

impl UiLayout {
    pub fn pointer_to_canvas(&self, column: u16, row: u16) -> OverlayPosition {
        OverlayPosition::new(
            f64::from(i32::from(column) - self.canvas_origin.0) * CELL_WIDTH,
            f64::from(i32::from(row) - self.canvas_origin.1) * CELL_HEIGHT,
        )
    }

    pub fn canvas_to_cell(&self, position: OverlayPosition) -> (i32, i32) {
        (
            self.canvas_origin.0 + (position.x / CELL_WIDTH).round() as i32,
            self.canvas_origin.1 + (position.y / CELL_HEIGHT).round() as i32,
        )
    }

    pub fn overlay_hit(&self, column: u16, row: u16) -> bool {
        self.overlay.is_some_and(|r| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        })
    }
}

pub fn draw(f: &mut Frame, app: &mut App) -> UiLayout {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(GLYPH_HEIGHT + 4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    draw_location(f, chunks[1], app);
    draw_display(f, chunks[2], app);
    draw_mode_label(f, chunks[3], app);
    draw_banner(f, chunks[4], app);
    draw_duration_controls(f, chunks[5], app);
    draw_status_bar(f, chunks[7], app);

    let mut layout = UiLayout {
        display: chunks[2],
        canvas_origin: (i32::from(chunks[2].x) + 5, i32::from(chunks[2].y) + 2),
        overlay: None,
    };
    if app.overlay_visible() {
        layout.overlay = Some(draw_overlay(f, area, &layout, app));
    }

    match app.mode {
        InputMode::SelectingPreset => draw_preset_overlay(f, app),
        InputMode::EditingDuration => draw_custom_overlay(f, app),
        InputMode::Normal => {}
    }

    let elapsed = app.last_frame.elapsed();
    app.last_frame = Instant::now();
    app.effect_manager.process_effects(
        TachyonDuration::from_millis(elapsed.as_millis() as u32),
        f.buffer_mut(),
        area,
    );
    layout
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "FOCUSCLOCK",
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.black)),
        ),
        area,
    );
}

fn draw_location(f: &mut Frame, area: Rect, app: &App) {
    let Some(country) = app.location.country.as_deref() else {
        return;
    };
    let theme = &app.config.theme;
    let line = Line::from(Span::styled(
        format!("{} {}", app.config.icons.location, country),
        Style::default().fg(theme.selection),
    ));
    let bottom = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), bottom);
}

fn draw_display(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let border = if app.completion_visible {
        theme.green
    } else {
        theme.blue
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let rows: Vec<Line> = big_text(&app.display_text())
        .into_iter()
        .map(|row| Line::from(Span::styled(row, Style::default().fg(theme.foreground))))
        .collect();
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(GLYPH_HEIGHT)])
        .split(inner_area);
    f.render_widget(
        Paragraph::new(rows).alignment(Alignment::Center),
        v_chunks[0],
    );
}

fn draw_mode_label(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let mode = app.engine.mode();
    let icon = match mode {
        Mode::Clock => &icons.clock,
        Mode::Timer => &icons.timer,
        Mode::Stopwatch => &icons.stopwatch,
    };
    let mut spans = vec![Span::styled(
        format!("{} {}", icon, mode.label().to_uppercase()),
        Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
    )];
    if mode.has_counter() {
        let state = if app.engine.is_running() {
            &icons.play
        } else {
            &icons.pause
        };
        spans.push(Span::styled(
            format!(" {} {}", icons.separator, state),
            Style::default().fg(theme.gray),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_banner(f: &mut Frame, area: Rect, app: &App) {
    if !app.completion_visible {
        return;
    }
    f.render_widget(
        Paragraph::new(Span::styled(
            "FOCUS COMPLETE!",
            Style::default()
                .fg(app.config.theme.green)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        area,
    );
}

fn draw_duration_controls(f: &mut Frame, area: Rect, app: &App) {
    if !app.duration_editable() {
        return;
    }
    let theme = &app.config.theme;
    let mut spans = Vec::new();
    for (i, preset) in Preset::ALL.iter().enumerate() {
        let active = app.engine.configured_duration_secs() == preset.seconds();
        let style = if active {
            Style::default().fg(theme.background).bg(theme.selection)
        } else {
            Style::default().fg(theme.selection).bg(theme.black)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, preset.label()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        " c custom ",
        Style::default().fg(theme.selection).bg(theme.black),
    ));
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

/// Draws the currency overlay, clamped onto the screen so it can always be
/// grabbed, and returns the cells it covers.
fn draw_overlay(f: &mut Frame, screen: Rect, layout: &UiLayout, app: &App) -> Rect {
    let theme = &app.config.theme;
    let text = app.overlay_text();
    let style = match app.overlay_tone() {
        OverlayTone::Gain => Style::default().fg(theme.green).add_modifier(Modifier::BOLD),
        OverlayTone::Loss => Style::default().fg(theme.red).add_modifier(Modifier::BOLD),
        OverlayTone::Idle => Style::default().fg(theme.gray),
    };
    let style = if app.tracker.is_dragging() {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    };
    let line = Line::from(Span::styled(text, style));
    let width = (line.width() as u16).clamp(1, screen.width.max(1));
    let (col, row) = layout.canvas_to_cell(app.tracker.position());
    let max_col = i32::from(screen.x + screen.width.saturating_sub(width));
    let max_row = i32::from(screen.y + screen.height.saturating_sub(1));
    let rect = Rect::new(
        col.clamp(i32::from(screen.x), max_col) as u16,
        row.clamp(i32::from(screen.y), max_row) as u16,
        width,
        1,
    )
    .intersection(screen);
    f.render_widget(Clear, rect);
    f.render_widget(Paragraph::new(line), rect);
    rect
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let (mode_text, mode_color) = match app.mode {
        InputMode::Normal if app.tracker.is_dragging() => ("DRAG", theme.yellow),
        InputMode::Normal => ("NORMAL", theme.green),
        InputMode::SelectingPreset => ("PRESET", theme.magenta),
        InputMode::EditingDuration => ("CUSTOM", theme.blue),
    };
    let help = match app.mode {
        InputMode::Normal if app.duration_editable() => {
            "space:start │ r:reset │ m:mode │ 1-4:preset │ c:custom │ q:quit"
        }
        InputMode::Normal => "space:start/pause │ r:reset │ m:mode │ q:quit",
        InputMode::SelectingPreset => "1-4:choose │ c:custom │ esc:cancel",
        InputMode::EditingDuration => "0-9:type │ tab:next field │ enter:set │ esc:cancel",
    };
    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode_text),
            Style::default()
                .bg(mode_color)
                .fg(theme.background)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::raw(help),
    ];
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!(" {} {}", app.config.icons.separator, notice),
            Style::default().fg(theme.red),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .block(Block::default().style(Style::default().bg(theme.black).fg(theme.gray))),
        area,
    );
}

fn draw_preset_overlay(f: &mut Frame, app: &App) {
    let theme = &app.config.theme;
    let area = centered_rect(40, 40, f.area());
    f.render_widget(Clear, area);
    let lines: Vec<Line> = Preset::ALL
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(theme.blue)),
                Span::raw(preset.label()),
                Span::styled(
                    format!(" ({}m)", preset.minutes()),
                    Style::default().fg(theme.gray),
                ),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Select Preset ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(theme.magenta))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

fn draw_custom_overlay(f: &mut Frame, app: &App) {
    let theme = &app.config.theme;
    let area = centered_rect(40, 30, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(" Custom Duration (hh:mm:ss) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.yellow))
        .border_type(BorderType::Double)
        .style(Style::default().bg(theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let mut spans = Vec::new();
    for (i, field) in [Field::Hours, Field::Minutes, Field::Seconds]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::styled(" : ", Style::default().fg(theme.gray)));
        }
        let focused = app.custom.focus() == field;
        let text = app.custom.field(field);
        let style = if focused {
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.foreground)
        };
        spans.push(Span::styled(format!("{:>2}", text), style));
        if focused {
            spans.push(Span::styled(
                app.config.icons.input_cursor.clone(),
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        inner_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn glyph(c: char) -> [&'static str; GLYPH_HEIGHT as usize] {
    match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => ["  █", "  █", "  █", "  █", "  █"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        ':' => [" ", "█", " ", "█", " "],
        _ => ["   "; GLYPH_HEIGHT as usize],
    }
}

/// Renders `text` in a five-row block font, one space between glyphs.
pub fn big_text(text: &str) -> Vec<String> {
    (0..GLYPH_HEIGHT as usize)
        .map(|row| {
            text.chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
