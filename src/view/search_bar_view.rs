//! Widgets drawing the search bar and its overflow menu.

use crate::model::{IconSlot, TapTarget};
use crate::state::{InputSurface, Motion, Region, RenderSurface};
use crate::view::TerminalSearchBar;
use crate::view::surface::MenuPopup;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

const COLLAPSE_ARROW: &str = "←";
const CLEAR_BUTTON: &str = "✕";
const MENU_ICON: &str = "⋮";

/// Bordered one-line search bar.
pub struct SearchBarView<'a> {
    bar: &'a TerminalSearchBar,
}

impl<'a> SearchBarView<'a> {
    /// Create a view of `bar`.
    pub fn new(bar: &'a TerminalSearchBar) -> Self {
        Self { bar }
    }

    fn block(&self) -> Block<'static> {
        let style = if self.bar.is_search_enabled() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default().borders(Borders::ALL).border_style(style)
    }

    /// Cells of `full` covered by a container this frame.
    fn container_width(&self, region: Region, full: u16) -> u16 {
        let surface = self.bar.render();
        match surface.effect_on(region) {
            Some((effect, progress)) => {
                let shown = match effect.motion {
                    Motion::Reveal => progress,
                    Motion::Conceal => 1.0 - progress,
                };
                (f32::from(full) * shown).ceil() as u16
            }
            None if surface.is_visible(region) => full,
            None => 0,
        }
    }

    /// Where the text cursor goes when the bar is drawn in `area`.
    ///
    /// `None` unless the keyboard is shown, the field is focused and the
    /// input container is fully drawn.
    pub fn cursor_position(&self, area: Rect) -> Option<Position> {
        let field = self.bar.input();
        if !self.bar.keyboard().is_shown() || !field.has_focus() {
            return None;
        }
        let row = self.block().inner(area);
        let (text_x, width) = self.text_span(row);
        if self.container_width(Region::InputContainer, row.width) < row.width {
            return None;
        }
        let column = u16::try_from(field.cursor_column()).unwrap_or(u16::MAX);
        Some(Position::new(
            text_x.saturating_add(column.min(width.saturating_sub(1))),
            row.y,
        ))
    }

    /// Which part of the bar drawn in `area` sits under `position`.
    ///
    /// Anywhere inside the bar that is not an icon or button is the bar
    /// itself.
    pub fn hit_test(&self, area: Rect, position: Position) -> Option<TapTarget> {
        if !area.contains(position) {
            return None;
        }
        let surface = self.bar.render();
        let row = self.block().inner(area);
        if position.y != row.y || row.width == 0 {
            return Some(TapTarget::Bar);
        }

        if surface.is_visible(Region::NavIcon) && position.x == row.x + 1 {
            return Some(TapTarget::NavIcon);
        }
        let last = row.right() - 1;
        if surface.is_visible(Region::InputContainer) {
            let start = row.x + surface.leading_inset().min(row.width);
            if surface.is_visible(Region::CollapseArrow) && position.x == start {
                return Some(TapTarget::CollapseArrow);
            }
            if position.x == last && !self.bar.input().text().is_empty() {
                return Some(TapTarget::Clear);
            }
        } else {
            let mut leading = last;
            if surface.is_visible(Region::MenuIcon) {
                if position.x == last {
                    return Some(TapTarget::Menu);
                }
                leading = last.saturating_sub(2);
            }
            if surface.is_visible(Region::LeadingIcon) && position.x == leading {
                return Some(TapTarget::LeadingIcon);
            }
        }
        Some(TapTarget::Bar)
    }

    /// Start column and width of the text inside the input container.
    fn text_span(&self, row: Rect) -> (u16, u16) {
        let surface = self.bar.render();
        let mut x = row.x + surface.leading_inset().min(row.width);
        if surface.is_visible(Region::CollapseArrow) {
            x += 2;
        }
        // Room for the clear button.
        let end = row.right().saturating_sub(2);
        (x.min(end), end.saturating_sub(x))
    }

    fn render_placeholder(&self, row: Rect, buf: &mut Buffer) {
        let surface = self.bar.render();
        let mut right = row.right();

        if surface.is_drawn(Region::MenuIcon) && right > row.x {
            right -= 1;
            buf.set_string(right, row.y, MENU_ICON, Style::default());
            right = right.saturating_sub(1);
        }
        if surface.is_drawn(Region::LeadingIcon) && right > row.x {
            right -= 1;
            let glyph = surface.icon(IconSlot::Leading).glyph();
            buf.set_string(right, row.y, glyph, Style::default().fg(Color::Yellow));
        }

        let x = row.x + surface.leading_inset().min(row.width);
        if let Some(prompt) = surface.placeholder() {
            let width = usize::from(right.saturating_sub(x + 1));
            buf.set_stringn(
                x,
                row.y,
                prompt,
                width,
                Style::default().fg(Color::Gray),
            );
        }
    }

    fn render_input(&self, row: Rect, buf: &mut Buffer) {
        let surface = self.bar.render();
        let field = self.bar.input();
        let inset = surface.leading_inset().min(row.width);
        let container = Rect::new(row.x + inset, row.y, row.width - inset, 1);
        let shown = self.container_width(Region::InputContainer, container.width);
        if shown == 0 {
            return;
        }
        let clip = Rect::new(container.x, container.y, shown, 1);
        Clear.render(clip, buf);

        let mut line = Vec::new();
        if surface.is_visible(Region::CollapseArrow) {
            line.push((COLLAPSE_ARROW.to_string(), Style::default().fg(Color::Cyan)));
            line.push((" ".to_string(), Style::default()));
        }
        let text = field.text();
        if text.is_empty() {
            let hint = field.hint().unwrap_or_default().to_string();
            line.push((hint, Style::default().fg(Color::DarkGray)));
        } else {
            line.push((text.clone(), Style::default()));
        }

        let mut x = container.x;
        for (content, style) in line {
            let remaining = usize::from(clip.right().saturating_sub(x));
            let (next_x, _) = buf.set_stringn(x, row.y, &content, remaining, style);
            x = next_x;
        }

        if !text.is_empty() && shown == container.width && container.width >= 2 {
            buf.set_string(
                container.right() - 1,
                row.y,
                CLEAR_BUTTON,
                Style::default().fg(Color::Red),
            );
        }
    }
}

impl Widget for SearchBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let row = Rect::new(inner.x, inner.y, inner.width, 1);
        let surface = self.bar.render();

        if surface.is_drawn(Region::NavIcon) && row.width > 1 {
            let glyph = surface.icon(IconSlot::Navigation).glyph();
            buf.set_string(row.x + 1, row.y, glyph, Style::default().fg(Color::Yellow));
        }
        if surface.is_visible(Region::PlaceholderContainer) {
            self.render_placeholder(row, buf);
        } else if surface.is_drawn(Region::LeadingIcon) {
            // Leading icon fading back in during a collapse.
            let glyph = surface.icon(IconSlot::Leading).glyph();
            buf.set_string(
                row.right() - 1,
                row.y,
                glyph,
                Style::default().fg(Color::Yellow),
            );
        }
        self.render_input(row, buf);
    }
}

/// Overflow menu drawn as a popup below the bar's right edge.
pub struct MenuView<'a> {
    menu: &'a MenuPopup,
}

impl<'a> MenuView<'a> {
    /// Create a view of an open menu.
    pub fn new(menu: &'a MenuPopup) -> Self {
        Self { menu }
    }

    /// Popup rectangle for a bar drawn at `bar`, clipped to `screen`.
    pub fn area(&self, bar: Rect, screen: Rect) -> Rect {
        let widest = self
            .menu
            .items()
            .iter()
            .map(|item| Line::from(item.as_str()).width())
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest + 4).unwrap_or(u16::MAX).min(screen.width);
        let height = u16::try_from(self.menu.items().len() + 2)
            .unwrap_or(u16::MAX)
            .min(screen.height.saturating_sub(bar.bottom()));
        Rect::new(bar.right().saturating_sub(width), bar.bottom(), width, height)
    }
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let items: Vec<ListItem> = self
            .menu
            .items()
            .iter()
            .map(|item| ListItem::new(item.as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(self.menu.selected()));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}
