use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use quotype::{session::CharState, stats::format_duration};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = self.controller.presenter();
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let caps_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC);

        let prompt: String = display.target.iter().collect();
        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_occupied_lines = if prompt.width() <= max_chars_per_line as usize {
            1
        } else {
            ((prompt.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };

        let padding = area.height.saturating_sub(prompt_occupied_lines + 4) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN.min(area.height / 4))
            .constraints(
                [
                    Constraint::Length(1), // caps lock banner
                    Constraint::Length(padding),
                    Constraint::Length(2), // clock or results
                    Constraint::Length(prompt_occupied_lines),
                    Constraint::Min(0),
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        if display.caps_lock {
            Paragraph::new(Span::styled("CAPS LOCK IS ON", caps_style))
                .alignment(Alignment::Center)
                .render(chunks[0], buf);
        }

        match &display.stats {
            None => {
                if self.live_timer {
                    let elapsed = self.controller.session().elapsed().as_millis() as u64;
                    Paragraph::new(Span::styled(format_duration(elapsed), dim_bold_style))
                        .alignment(Alignment::Center)
                        .render(chunks[2], buf);
                }
            }
            Some(stats) => {
                let mut lines = vec![Line::from(Span::styled(stats.to_string(), bold_style))];
                if let Some(author) = self.controller.attribution() {
                    lines.push(Line::from(Span::styled(format!("- {author}"), italic_style)));
                }
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(chunks[2], buf);
            }
        }

        let spans = display
            .target
            .iter()
            .zip(display.states.iter())
            .enumerate()
            .map(|(idx, (expected, state))| match state {
                // a missed space would otherwise be invisible
                CharState::Incorrect => Span::styled(
                    match expected {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red_bold_style,
                ),
                CharState::Correct => Span::styled(expected.to_string(), green_bold_style),
                CharState::Untyped if idx == display.cursor => {
                    Span::styled(expected.to_string(), underlined_dim_bold_style)
                }
                CharState::Untyped => Span::styled(expected.to_string(), dim_bold_style),
            })
            .collect::<Vec<Span>>();

        Paragraph::new(Line::from(spans))
            .alignment(if prompt_occupied_lines == 1 {
                // when the prompt is small enough to fit on one line
                // centering the text gives a nice zen feeling
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        let legend = if display.is_finished() {
            "(esc) new quote / (←) retry / (ctrl+c) quit"
        } else {
            "(esc) new quote / (←) restart / (ctrl+c) quit"
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use quotype::quotes::{BundledQuotes, FixedQuote, Quote, QuoteBook};

    fn rendered(app: &App) -> String {
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_prompt_and_legend() {
        let app = App::new(Box::new(FixedQuote("hello there".to_string())), true);

        let screen = rendered(&app);

        assert!(screen.contains("hello there"));
        assert!(screen.contains("(esc) new quote"));
        assert!(!screen.contains("CAPS LOCK"));
    }

    #[test]
    fn renders_missed_space_marker() {
        let mut app = App::new(Box::new(FixedQuote("a b".to_string())), false);
        app.on_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        app.on_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));

        assert!(rendered(&app).contains("a·b"));
    }

    #[test]
    fn renders_results_when_finished() {
        let mut app = App::new(Box::new(FixedQuote("ok".to_string())), true);
        app.on_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE));
        app.on_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE));

        let screen = rendered(&app);

        assert!(screen.contains("% acc"));
        assert!(screen.contains("wpm"));
        assert!(!screen.contains("- "));
    }

    #[test]
    fn renders_author_under_results() {
        let source = BundledQuotes::from_book(QuoteBook {
            name: "test".to_string(),
            quotes: vec![Quote {
                text: "go".to_string(),
                author: "Ada Lovelace".to_string(),
            }],
        });
        let mut app = App::new(Box::new(source), true);
        assert!(!rendered(&app).contains("Ada Lovelace"));

        app.on_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE));
        app.on_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE));

        assert!(rendered(&app).contains("- Ada Lovelace"));
    }
}
