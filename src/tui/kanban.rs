//! Kanban board interface.
//!
//! Renders the board columns side by side and turns keyboard and mouse input
//! into store operations. Pointer drags are resolved to a drop target with
//! the closest-corners heuristic and handed to the drag reconciler; a
//! keyboard drag (space to pick up, arrows, space to drop) goes through the
//! same reconciler. The view never reads the store directly for rendering:
//! it keeps the latest snapshot pushed by its store subscription.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::board::{Board, Column};
use crate::config::Config;
use crate::dates::{format_date_br, format_due_relative};
use crate::dnd::{DragReconciler, Resolution};
use crate::store::BoardStore;
use crate::task::Task;
use crate::tui::collision::{closest_corners, contains, DragRect, Droppable};
use crate::tui::colors::{column_color, CARD_BG, DROP_CURSOR, ERROR_RED, MUTED};
use crate::tui::enums::AppState;
use crate::tui::task_form::{
    TaskForm, DATE_FIELD, DESCRIPTION_FIELD, RESPONSIBLES_FIELD, TITLE_FIELD,
};

/// Rows taken by one card, borders included.
const CARD_HEIGHT: usize = 6;

/// A mouse press on a card that may become a drag.
#[derive(Debug, Clone)]
struct PointerDrag {
    item_id: String,
    origin: (u16, u16),
    current: (u16, u16),
    card_area: Rect,
    activated: bool,
}

impl PointerDrag {
    fn delta(&self) -> (i32, i32) {
        (
            self.current.0 as i32 - self.origin.0 as i32,
            self.current.1 as i32 - self.origin.1 as i32,
        )
    }

    fn travelled(&self) -> u16 {
        let (dx, dy) = self.delta();
        dx.unsigned_abs().max(dy.unsigned_abs()).min(u16::MAX as u32) as u16
    }

    /// The dragged card's rectangle at the pointer's current position.
    fn ghost(&self) -> DragRect {
        let (dx, dy) = self.delta();
        DragRect::from(self.card_area).translate(dx, dy)
    }
}

/// Geometry of the last frame, used for hit testing and collisions.
#[derive(Debug, Default)]
struct BoardLayout {
    droppables: Vec<Droppable>,
    cards: Vec<(String, Rect)>,
}

impl BoardLayout {
    fn clear(&mut self) {
        self.droppables.clear();
        self.cards.clear();
    }

    fn card_at(&self, column: u16, row: u16) -> Option<(String, Rect)> {
        self.cards
            .iter()
            .find(|(_, area)| contains(*area, column, row))
            .cloned()
    }
}

/// How a card should be highlighted.
#[derive(Debug, Clone, Copy, Default)]
struct CardLook {
    selected: bool,
    dragging: bool,
    drop_target: bool,
}

/// Main board application state
pub struct KanbanApp {
    store: BoardStore,
    snapshot: Rc<RefCell<Arc<Board>>>,
    reconciler: DragReconciler,
    activation_distance: u16,
    state: AppState,
    selected_column: usize,
    selected_card: usize,
    column_scroll_offsets: Vec<usize>,
    task_form: TaskForm,
    detail_task_id: Option<String>,
    status_message: String,
    layout: BoardLayout,
    pointer: Option<PointerDrag>,
    drop_cursor: Option<(usize, usize)>, // (column, card) while dragging with the keyboard
    should_quit: bool,
}

impl KanbanApp {
    /// Create the view around an injected store.
    pub fn new(config: &Config, mut store: BoardStore) -> Self {
        let snapshot = Rc::new(RefCell::new(store.snapshot()));
        let sink = Rc::clone(&snapshot);
        store.subscribe(move |board| *sink.borrow_mut() = Arc::clone(board));
        let column_count = store.board().columns().len();

        KanbanApp {
            store,
            snapshot,
            reconciler: DragReconciler::new(),
            activation_distance: config.drag_activation_distance,
            state: AppState::Board,
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: vec![0; column_count],
            task_form: TaskForm::new(config.responsibles.clone()),
            detail_task_id: None,
            status_message: String::new(),
            layout: BoardLayout::default(),
            pointer: None,
            drop_cursor: None,
            should_quit: false,
        }
    }

    /// Latest board snapshot received from the store.
    pub fn board(&self) -> Arc<Board> {
        Arc::clone(&self.snapshot.borrow())
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn selected_task_id(&self) -> Option<String> {
        let board = self.board();
        let column = board.columns().get(self.selected_column)?;
        column.tasks.get(self.selected_card).map(|t| t.id.clone())
    }

    /// Ensure selected column and card indices are valid
    fn clamp_selection(&mut self) {
        let board = self.board();
        let columns = board.columns().len();
        if self.selected_column >= columns {
            self.selected_column = columns.saturating_sub(1);
        }
        let column_len = board
            .columns()
            .get(self.selected_column)
            .map_or(0, |c| c.tasks.len());
        if column_len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= column_len {
            self.selected_card = column_len - 1;
        }
    }

    /// Move the selection onto a task wherever it now lives.
    fn select_task(&mut self, task_id: &str) {
        let board = self.board();
        if let Some((column, index)) = board.locate(task_id) {
            if let Some(col_index) = board.columns().iter().position(|c| c.id == column) {
                self.selected_column = col_index;
                self.selected_card = index;
            }
        }
    }

    fn open_detail(&mut self, task_id: String) {
        self.detail_task_id = Some(task_id);
        self.state = AppState::TaskDetail;
    }

    fn close_form(&mut self) {
        self.state = AppState::Board;
        if !self.store.is_submitting() {
            self.task_form.reset();
        }
    }

    /// Dispatch one terminal event.
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // pointer capture is lost with the focus or the geometry
            Event::FocusLost | Event::Resize(_, _) => self.cancel_pointer_drag(),
            _ => {}
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // a key press ends any mouse gesture before it can change the view
        self.cancel_pointer_drag();
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.state {
            AppState::Board => self.handle_board_key(key),
            AppState::NewTask => self.handle_form_key(key, now),
            AppState::TaskDetail => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.detail_task_id = None;
                    self.state = AppState::Board;
                }
            }
            AppState::Help => self.state = AppState::Board,
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        if self.drop_cursor.is_some() {
            self.handle_keyboard_drag(key);
            return;
        }

        self.clear_status_message();
        let column_count = self.board().columns().len();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,

            // Card movement between columns (check first, before regular navigation)
            KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => self.move_card(false),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => self.move_card(true),

            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Right => {
                if self.selected_column + 1 < column_count {
                    self.selected_column += 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Up => {
                self.selected_card = self.selected_card.saturating_sub(1);
            }
            KeyCode::Down => {
                self.selected_card += 1;
                self.clamp_selection();
            }

            KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    self.open_detail(id);
                }
            }
            KeyCode::Char(' ') => self.pick_up_selected(),
            KeyCode::Char('n') => {
                self.state = AppState::NewTask;
            }
            KeyCode::Char('?') | KeyCode::Char('h') => self.state = AppState::Help,
            _ => {}
        }
    }

    /// Move the selected card to the adjacent column.
    fn move_card(&mut self, right: bool) {
        let board = self.board();
        let Some(task_id) = self.selected_task_id() else {
            return;
        };
        let target_index = if right {
            self.selected_column + 1
        } else {
            match self.selected_column.checked_sub(1) {
                Some(i) => i,
                None => return,
            }
        };
        let (Some(source), Some(target)) = (
            board.columns().get(self.selected_column),
            board.columns().get(target_index),
        ) else {
            return;
        };

        if self.store.move_task(&task_id, source.id, target.id) {
            self.set_status_message(format!("Tarefa movida para {}.", target.title));
            self.select_task(&task_id);
        }
    }

    fn pick_up_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.reconciler.drag_start(id);
            self.drop_cursor = Some((self.selected_column, self.selected_card));
        }
    }

    fn handle_keyboard_drag(&mut self, key: KeyEvent) {
        let Some((column, card)) = self.drop_cursor else {
            return;
        };
        let board = self.board();
        let len_of = |i: usize| board.columns().get(i).map_or(0, |c| c.tasks.len());

        match key.code {
            KeyCode::Left if column > 0 => {
                let c = column - 1;
                self.drop_cursor = Some((c, card.min(len_of(c).saturating_sub(1))));
            }
            KeyCode::Right if column + 1 < board.columns().len() => {
                let c = column + 1;
                self.drop_cursor = Some((c, card.min(len_of(c).saturating_sub(1))));
            }
            KeyCode::Up => self.drop_cursor = Some((column, card.saturating_sub(1))),
            KeyCode::Down if card + 1 < len_of(column) => {
                self.drop_cursor = Some((column, card + 1));
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.drop_cursor = None;
                let Some(active) = self.reconciler.active_id().map(str::to_string) else {
                    return;
                };
                let over = board.columns().get(column).map(|c| {
                    c.tasks
                        .get(card)
                        .map_or_else(|| c.id.as_str().to_string(), |t| t.id.clone())
                });
                let resolution = self.reconciler.drag_end(&mut self.store, &active, over.as_deref());
                self.after_drop(&resolution, &active);
            }
            KeyCode::Esc => {
                self.drop_cursor = None;
                self.reconciler.drag_cancel();
            }
            _ => {}
        }
    }

    /// Follow the dropped card and announce cross-column moves.
    fn after_drop(&mut self, resolution: &Resolution, task_id: &str) {
        match resolution {
            Resolution::Moved { to, .. } => {
                let title = self
                    .board()
                    .column(*to)
                    .map_or_else(|| to.title().to_string(), |c| c.title.clone());
                self.set_status_message(format!("Tarefa movida para {}.", title));
                self.select_task(task_id);
            }
            Resolution::Reordered { .. } => self.select_task(task_id),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
        if self.store.is_submitting() {
            if key.code == KeyCode::Esc {
                self.close_form();
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Enter => self.submit_form(now),
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self, now: Instant) {
        let today = Local::now().date_naive();
        match self.task_form.validate(today) {
            Some(fields) => {
                self.store.submit_task(fields, now);
                self.clear_status_message();
            }
            None => self.set_status_message(
                "Por favor, preencha todos os campos obrigatórios".to_string(),
            ),
        }
    }

    /// Handle mouse input: press on a card, drag past the activation distance, release.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state != AppState::Board || self.drop_cursor.is_some() {
            self.cancel_pointer_drag();
            return;
        }
        let position = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((item_id, card_area)) = self.layout.card_at(mouse.column, mouse.row) {
                    self.select_task(&item_id);
                    self.pointer = Some(PointerDrag {
                        item_id,
                        origin: position,
                        current: position,
                        card_area,
                        activated: false,
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(pointer) = self.pointer.as_mut() {
                    pointer.current = position;
                    if !pointer.activated && pointer.travelled() >= self.activation_distance {
                        pointer.activated = true;
                        self.reconciler.drag_start(pointer.item_id.clone());
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(mut pointer) = self.pointer.take() else {
                    return;
                };
                pointer.current = position;
                if !pointer.activated {
                    self.open_detail(pointer.item_id);
                    return;
                }
                let over = closest_corners(pointer.ghost(), &self.layout.droppables)
                    .map(str::to_string);
                debug!(item_id = %pointer.item_id, ?over, "pointer released");
                let resolution =
                    self.reconciler
                        .drag_end(&mut self.store, &pointer.item_id, over.as_deref());
                self.after_drop(&resolution, &pointer.item_id);
            }
            _ => {}
        }
    }

    fn cancel_pointer_drag(&mut self) {
        if let Some(pointer) = self.pointer.take() {
            if pointer.activated {
                self.reconciler.drag_cancel();
            }
        }
    }

    /// Complete a pending submission once its delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(task) = self.store.poll_submission(now) {
            self.task_form.reset();
            if self.state == AppState::NewTask {
                self.state = AppState::Board;
            }
            self.set_status_message(format!("Tarefa criada: {}", task.title));
            self.select_task(&task.id);
        }
    }

    /// Render the whole screen
    pub fn render(&mut self, f: &mut Frame) {
        let board = self.board();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0], &board);
        self.render_board(f, chunks[1], &board);
        self.render_status_bar(f, chunks[2], &board);
        self.render_drag_ghost(f, &board);

        match self.state {
            AppState::Board => {}
            AppState::NewTask => self.render_task_form(f),
            AppState::TaskDetail => self.render_task_detail(f, &board),
            AppState::Help => self.render_help(f),
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect, board: &Board) {
        let header_text = vec![Line::from(vec![
            Span::styled("QUADRO KANBAN", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{} tarefas", board.task_count()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
            Span::raw("  "),
            Span::styled("[n] Criar Tarefa", Style::default().fg(Color::White)),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect, board: &Board) {
        self.layout.clear();
        let column_count = board.columns().len();
        if column_count == 0 {
            return;
        }
        if self.column_scroll_offsets.len() != column_count {
            self.column_scroll_offsets = vec![0; column_count];
        }

        let constraints: Vec<Constraint> = (0..column_count)
            .map(|_| Constraint::Ratio(1, column_count as u32))
            .collect();
        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, column) in board.columns().iter().enumerate() {
            self.render_column(f, columns_layout[i], i, column);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize, column: &Column) {
        let is_selected = column_index == self.selected_column;
        let color = column_color(column.id);
        let border_style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let title = Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::styled(column.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" ({})", column.tasks.len()), Style::default().fg(MUTED)),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        self.layout.droppables.push(Droppable {
            id: column.id.as_str().to_string(),
            area: inner,
        });

        let drop_here = self.drop_cursor.filter(|(c, _)| *c == column_index);

        if column.tasks.is_empty() {
            let outline = if drop_here.is_some() { DROP_CURSOR } else { MUTED };
            let placeholder = Paragraph::new("Sem tarefas")
                .alignment(Alignment::Center)
                .style(Style::default().fg(MUTED))
                .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(outline)));
            let placeholder_area = Rect {
                height: inner.height.min(3),
                ..inner
            };
            f.render_widget(placeholder, placeholder_area);
            return;
        }

        let available_height = inner.height as usize;
        let visible_cards = (available_height / CARD_HEIGHT).max(1);
        let focus = match drop_here {
            Some((_, card)) => Some(card),
            None if is_selected => Some(self.selected_card),
            None => None,
        };

        // Keep the focused card visible
        let scroll_offset = {
            let start_visible = self.column_scroll_offsets[column_index];
            let offset = match focus {
                Some(card) if card < start_visible => card,
                Some(card) if card >= start_visible + visible_cards => card + 1 - visible_cards,
                _ => start_visible,
            };
            let offset = offset.min(column.tasks.len().saturating_sub(1));
            self.column_scroll_offsets[column_index] = offset;
            offset
        };

        let active_id = self.reconciler.active_id().map(str::to_string);
        let today = Local::now().date_naive();
        let mut current_y = 0;
        let mut rendered_cards = 0;

        for (card_index, task) in column.tasks.iter().enumerate().skip(scroll_offset) {
            if current_y + CARD_HEIGHT > available_height {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + current_y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            let look = CardLook {
                selected: is_selected && card_index == self.selected_card && active_id.is_none(),
                dragging: active_id.as_deref() == Some(task.id.as_str()),
                drop_target: drop_here == Some((column_index, card_index)),
            };
            render_card(f, card_area, task, color, look, today);

            self.layout.droppables.push(Droppable {
                id: task.id.clone(),
                area: card_area,
            });
            self.layout.cards.push((task.id.clone(), card_area));
            current_y += CARD_HEIGHT;
            rendered_cards += 1;
        }

        if scroll_offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{} acima", scroll_offset))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { height: 1, ..inner });
        }
        let remaining = column.tasks.len() - scroll_offset - rendered_cards;
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{} abaixo", remaining))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    y: inner.y + inner.height - 1,
                    height: 1,
                    ..inner
                },
            );
        }
    }

    /// Card following the pointer while a mouse drag is active.
    fn render_drag_ghost(&self, f: &mut Frame, board: &Board) {
        let Some(pointer) = self.pointer.as_ref().filter(|p| p.activated) else {
            return;
        };
        let Some(task) = board.get_task(&pointer.item_id) else {
            return;
        };
        let Some(area) = pointer.ghost().clip(f.area()) else {
            return;
        };
        let color = column_color(task.status);
        let ghost = Paragraph::new(task.title.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            )
            .style(Style::default().bg(CARD_BG).add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true });
        f.render_widget(Clear, area);
        f.render_widget(ghost, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect, board: &Board) {
        let status_text = if self.store.is_submitting() {
            "Salvando tarefa...".to_string()
        } else if self.drop_cursor.is_some() {
            "Arrastando: setas escolhem o destino | Espaço/Enter: soltar | Esc: cancelar".to_string()
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            format!(
                "Tarefas: {} | Espaço: arrastar | Ctrl+←/→: mover | Enter: detalhes | n: nova | ?: ajuda | q: sair",
                board.task_count()
            )
        };

        let bar_color = board
            .columns()
            .get(self.selected_column)
            .map_or(Color::Blue, |c| column_color(c.id));
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(bar_color).fg(Color::Black))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_task_form(&self, f: &mut Frame) {
        let popup_area = centered_rect(60, 80, f.area());
        f.render_widget(Clear, popup_area);

        let submitting = self.store.is_submitting();
        let title = if submitting {
            "Criar Tarefa (salvando...)"
        } else {
            "Criar Tarefa"
        };
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black));
        let inner = outer.inner(popup_area);
        f.render_widget(outer, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(1),
                Constraint::Length(5), // Description
                Constraint::Length(1),
                Constraint::Length(3), // Responsibles
                Constraint::Length(1),
                Constraint::Length(3), // Due date
                Constraint::Length(1),
                Constraint::Min(1),    // Instructions
            ])
            .split(inner);

        let form = &self.task_form;
        let focus_style = |field: usize| {
            if form.current_field == field {
                Style::default().fg(DROP_CURSOR)
            } else {
                Style::default()
            }
        };
        let error_line = |msg: &Option<String>| {
            Paragraph::new(msg.clone().unwrap_or_default()).style(Style::default().fg(ERROR_RED))
        };

        let title_input = Paragraph::new(form.title.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Título da Tarefa *")
                .border_style(focus_style(TITLE_FIELD)),
        );
        f.render_widget(title_input, rows[0]);
        f.render_widget(error_line(&form.errors.title), rows[1]);

        let desc_input = Paragraph::new(form.description.value.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Descrição *")
                    .border_style(focus_style(DESCRIPTION_FIELD)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(desc_input, rows[2]);
        f.render_widget(error_line(&form.errors.description), rows[3]);

        let mut spans = Vec::new();
        for (i, name) in form.responsible_options.iter().enumerate() {
            let mark = if form.chosen.get(i).copied().unwrap_or(false) { "[x]" } else { "[ ]" };
            let mut style = Style::default();
            if form.current_field == RESPONSIBLES_FIELD && i == form.responsible_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("{} {}", mark, name), style));
            spans.push(Span::raw("  "));
        }
        let responsibles = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Responsáveis * (←/→ escolher, Espaço marcar)")
                .border_style(focus_style(RESPONSIBLES_FIELD)),
        );
        f.render_widget(responsibles, rows[4]);
        f.render_widget(error_line(&form.errors.responsibles), rows[5]);

        let date_input = Paragraph::new(form.date.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Data Limite * (dd/mm/aaaa, aaaa-mm-dd, hoje, amanha, in 3d)")
                .border_style(focus_style(DATE_FIELD)),
        );
        f.render_widget(date_input, rows[6]);
        f.render_widget(error_line(&form.errors.date), rows[7]);

        let instructions = Paragraph::new(vec![
            Line::from("Tab/Shift+Tab: campo | Enter: criar | Esc: cancelar"),
            Line::from(if submitting { "Aguarde, salvando a tarefa..." } else { "" }),
        ])
        .style(Style::default().fg(MUTED));
        f.render_widget(instructions, rows[8]);

        if !submitting {
            let cursor_target = match form.current_field {
                TITLE_FIELD => Some((rows[0], &form.title)),
                DESCRIPTION_FIELD => Some((rows[2], &form.description)),
                DATE_FIELD => Some((rows[6], &form.date)),
                _ => None,
            };
            if let Some((area, field)) = cursor_target {
                let x = area.x + 1 + field.cursor.min(area.width.saturating_sub(3) as usize) as u16;
                f.set_cursor_position((x, area.y + 1));
            }
        }
    }

    fn render_task_detail(&self, f: &mut Frame, board: &Board) {
        let popup_area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, popup_area);

        let task = self.detail_task_id.as_deref().and_then(|id| board.get_task(id));
        let (lines, color) = match task {
            Some(task) => (detail_lines(task, board), column_color(task.status)),
            None => (vec![Line::from("Tarefa não encontrada")], ERROR_RED),
        };

        let popup_block = Block::default()
            .borders(Borders::ALL)
            .title("Detalhes da Tarefa (Enter/Esc para fechar)")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        let popup = Paragraph::new(lines)
            .block(popup_block)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, popup_area);
    }

    fn render_help(&self, f: &mut Frame) {
        let popup_area = centered_rect(50, 60, f.area());
        f.render_widget(Clear, popup_area);
        let lines = vec![
            Line::from(Span::styled("Atalhos", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("←/→/↑/↓      navegar entre colunas e cartões"),
            Line::from("Espaço       pegar o cartão; setas + Espaço para soltar"),
            Line::from("Esc          cancelar o arraste"),
            Line::from("Ctrl+←/→     mover o cartão para a coluna vizinha"),
            Line::from("Enter        ver detalhes"),
            Line::from("n            criar tarefa"),
            Line::from("Mouse        clique abre, arraste move"),
            Line::from("q/Esc        sair"),
        ];
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Ajuda"))
            .style(Style::default().bg(Color::Black));
        f.render_widget(help, popup_area);
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                let ev = event::read()?;
                self.handle_event(ev, Instant::now());
            }
            self.tick(Instant::now());
        }
        Ok(())
    }
}

/// Render a single task card
fn render_card(f: &mut Frame, area: Rect, task: &Task, color: Color, look: CardLook, today: chrono::NaiveDate) {
    let mut style = if look.selected {
        Style::default().bg(color).fg(Color::Black).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(CARD_BG)
    };
    if look.dragging {
        style = style.add_modifier(Modifier::DIM | Modifier::ITALIC);
    }
    let border_style = if look.drop_target {
        Style::default().fg(DROP_CURSOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };

    let available_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = wrap_title(&task.title, available_width, 2)
        .into_iter()
        .map(Line::from)
        .collect();
    lines.push(Line::from(format!("@ {}", task.responsibles.join(", "))));
    lines.push(Line::from(format!(
        "{} ({})",
        format_date_br(task.date),
        format_due_relative(task.date, today)
    )));

    let card = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(border_style))
        .style(style);
    f.render_widget(card, area);
}

/// Simple word wrapping, at most `max_lines` lines.
fn wrap_title(title: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in title.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current_line));
            if lines.len() >= max_lines {
                return lines;
            }
            current_line = word.to_string();
        }
    }
    if !current_line.is_empty() && lines.len() < max_lines {
        lines.push(current_line);
    }
    lines
}

fn detail_lines<'a>(task: &'a Task, board: &'a Board) -> Vec<Line<'a>> {
    let column_title = board
        .column(task.status)
        .map_or(task.status.title(), |c| c.title.as_str());
    let label = Style::default().fg(MUTED);
    vec![
        Line::from(Span::styled(task.title.as_str(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Descrição", label)),
        Line::from(task.description.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Responsáveis: ", label),
            Span::raw(task.responsibles.join(", ")),
        ]),
        Line::from(vec![
            Span::styled("Data Limite:  ", label),
            Span::raw(format_date_br(task.date)),
        ]),
        Line::from(vec![Span::styled("Coluna:       ", label), Span::raw(column_title)]),
    ]
}

/// Centered popup area taking the given percentages of `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y) / 100) as u16;
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
