use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use carewatch_core::{AggregatedParticipant, GridSlot};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(chunks[1]);

    render_grid(frame, app, body[0]);
    render_sidebar(frame, app, body[1]);
    render_footer(frame, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mic = if app.controls.mic_enabled {
        Span::styled("mic on", Style::default().fg(Color::Green))
    } else {
        Span::styled("mic off", Style::default().fg(Color::Red))
    };
    let camera = if app.controls.camera_enabled {
        Span::styled("cam on", Style::default().fg(Color::Green))
    } else {
        Span::styled("cam off", Style::default().fg(Color::Red))
    };

    let mut status = vec![
        Span::raw(format!(
            "{} room(s) · {} monitored · ",
            app.rooms.len(),
            app.connections.len()
        )),
        mic,
        Span::raw(" · "),
        camera,
    ];

    if app.loading {
        status.push(Span::styled(
            " · loading",
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(banner) = &app.banner {
        status.push(Span::styled(
            format!(" · {}", banner),
            Style::default().fg(Color::Red),
        ));
    }

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Carewatch — live call grid",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(status),
    ])
    .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let size = app.grid.size().get();
    let slots = app.grid.slots(&app.connections);

    let row_constraints: Vec<Constraint> =
        (0..size).map(|_| Constraint::Ratio(1, size as u32)).collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_index, row_area) in rows.iter().enumerate() {
        let col_constraints: Vec<Constraint> =
            (0..size).map(|_| Constraint::Ratio(1, size as u32)).collect();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints)
            .split(*row_area);

        for (col_index, cell_area) in cols.iter().enumerate() {
            let slot_index = row_index * size + col_index;
            if let Some(slot) = slots.get(slot_index) {
                render_slot(frame, app, slot, *cell_area);
            }
        }
    }
}

fn render_slot(frame: &mut Frame, app: &App, slot: &GridSlot, area: Rect) {
    match slot {
        GridSlot::Live { index, session } => {
            let selected = *index == app.selected_slot;
            let focused = app.grid.focused() == Some(session.room_name.as_str());

            let border_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Green)
            };
            let border_type = if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            };

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .border_type(border_type)
                .title(session.room_name.clone());

            let lines = tile_lines(app, &session.room_name);
            frame.render_widget(Paragraph::new(lines).block(block), area);
        }
        GridSlot::Empty { .. } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray));
            let placeholder = Paragraph::new(Line::from(Span::styled(
                "no call",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(placeholder, area);
        }
    }
}

fn tile_lines(app: &App, room_name: &str) -> Vec<Line<'static>> {
    // Live transport state when available, directory snapshot otherwise.
    if let Some(entries) = app.room_rosters.get(room_name) {
        if !entries.is_empty() {
            return entries.iter().map(participant_line).collect();
        }
    }

    app.rooms
        .iter()
        .find(|room| room.name == room_name)
        .map(|room| {
            room.participants
                .iter()
                .filter(|p| p.is_visitor())
                .map(|p| Line::from(format!("● {}", p.name)))
                .collect()
        })
        .unwrap_or_default()
}

fn participant_line(participant: &AggregatedParticipant) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("● {}", participant.name))];
    if participant.speaking {
        spans.push(Span::styled(
            " speaking",
            Style::default().fg(Color::Green),
        ));
    }
    if participant.muted {
        spans.push(Span::styled(" muted", Style::default().fg(Color::Red)));
    }
    if participant.camera_off {
        spans.push(Span::styled(
            " cam off",
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = if app.roster.is_empty() {
        vec![ListItem::new(Span::styled(
            "No participants",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.roster
            .iter()
            .map(|p| ListItem::new(participant_line(p)))
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Participants"),
    );
    frame.render_widget(list, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " +/- grid size   m mic   v camera   arrows select   enter focus   r refresh   q quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, area);
}
