//! Full-screen pre-game loadout editor.
//!
//! Both drafts are shown side by side; the one being edited carries the row
//! cursor. Every control reflects the draft's own enabled/checked state, so
//! the screen never offers a choice the solver would refuse.
use client_frontend_core::{LoadoutDraft, LoadoutRules};
use game_core::{Side, SideMap};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::presentation::theme::Theme;
use crate::state::{EditorRow, LoadoutEditor};

fn row_line(draft: &LoadoutDraft, row: EditorRow, selected: bool) -> Line<'static> {
    let (label, control, suffix) = match row {
        EditorRow::Element => {
            let control = client_frontend_core::Control {
                checked: true,
                enabled: true,
            };
            (format!("Element: {}", draft.element()), control, String::new())
        }
        EditorRow::Item(item) => (
            format!("{} {}", Theme::checkbox(draft.has_item(item)), item),
            draft.item_control(item),
            format!(" (cost {})", item.slot_cost()),
        ),
        EditorRow::Ability(ability) => {
            let scope = draft.scope_control(ability);
            let suffix = match (draft.scope(ability), scope.enabled) {
                (Some(kind), _) => format!(" -> {kind}"),
                (None, true) => " -> any".to_string(),
                (None, false) => String::new(),
            };
            (
                format!("{} {}", Theme::checkbox(draft.has_ability(ability)), ability),
                draft.ability_control(ability),
                suffix,
            )
        }
    };

    let style = if selected {
        Theme::highlight()
    } else {
        Theme::control(control)
    };
    Line::from(vec![
        Span::raw(if selected { "> " } else { "  " }),
        Span::styled(label, style),
        Span::styled(suffix, Theme::hint()),
    ])
}

fn render_draft(
    frame: &mut Frame,
    area: Rect,
    side: Side,
    draft: &LoadoutDraft,
    editor: &LoadoutEditor,
    rules: &LoadoutRules,
) {
    let editing = editor.side == side;
    let mut lines: Vec<Line> = editor
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| row_line(draft, *row, editing && i == editor.cursor))
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Ability slots ", Theme::label()),
        Span::styled(
            format!("{}/{}", draft.slots_used(), draft.ability_slots()),
            Theme::gauge(draft.slots_used() as u32, draft.ability_slots() as u32),
        ),
        Span::styled("  Scoping ", Theme::label()),
        Span::raw(if draft.scoping_allowed() { "yes" } else { "no" }),
    ]));
    let cost = Span::styled(
        format!("Item cost {}/{}", draft.item_cost(), rules.item_cost_cap),
        Theme::label(),
    );
    if draft.exceeds_cost_cap(rules.item_cost_cap) {
        lines.push(Line::from(vec![
            cost,
            Span::styled("  over budget", Style::default().fg(Color::Yellow)),
        ]));
    } else {
        lines.push(Line::from(cost));
    }

    let border = if editing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(format!(" {side} "), Theme::side(side))),
    );
    frame.render_widget(paragraph, area);
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    editor: &LoadoutEditor,
    drafts: &SideMap<LoadoutDraft>,
    rules: &LoadoutRules,
) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" New game: loadouts ")
        .title_alignment(Alignment::Center);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    render_draft(frame, columns[0], Side::White, &drafts.white, editor, rules);
    render_draft(frame, columns[1], Side::Black, &drafts.black, editor, rules);
}
