use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Frame;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;

use dock_wm::area::{AreaId, DockArea};
use dock_wm::event_loop::{ConsoleInput, ControlFlow, EventLoop};
use dock_wm::manager::{DockEvent, DockManager};
use dock_wm::style::DockStyle;
use dock_wm::tabs::TabPosition;
use dock_wm::tree::InsertPosition;
use dock_wm::widget::{DockWidget, WidgetId};

const PANEL_TITLES: [&str; 8] = [
    "files", "search", "outline", "terminal", "log", "problems", "scene", "inspector",
];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TabEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl From<TabEdge> for TabPosition {
    fn from(edge: TabEdge) -> Self {
        match edge {
            TabEdge::Top => TabPosition::Top,
            TabEdge::Bottom => TabPosition::Bottom,
            TabEdge::Left => TabPosition::Left,
            TabEdge::Right => TabPosition::Right,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dock-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Dockable panel demo: drag tabs between areas, split, float and redock"
)]
struct Cli {
    /// Number of demo panels to seed the layout with.
    #[arg(short = 'n', long = "panels", default_value_t = 4)]
    panels: usize,

    /// Edge of each area that carries the tab strip.
    #[arg(long = "tabs", value_enum, default_value = "top")]
    tabs: TabEdge,

    /// Use the desktop-scale metrics instead of the terminal-tuned ones.
    #[arg(long)]
    classic: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    dock_wm::tracing_sub::init_default();

    let mut app = App::new(&cli);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut event_loop = EventLoop::new(ConsoleInput, Duration::from_millis(16));
    let result = event_loop.run(|_, event| match event {
        None => {
            terminal.draw(|frame| app.draw(frame))?;
            Ok(ControlFlow::Continue)
        }
        Some(event) => Ok(app.handle(&event)),
    });

    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

struct App {
    docks: DockManager,
    status: VecDeque<String>,
}

impl App {
    fn new(cli: &Cli) -> Self {
        let style = if cli.classic {
            DockStyle::default()
        } else {
            DockStyle::compact()
        };
        let mut docks = DockManager::new(style);

        let count = cli.panels.clamp(1, PANEL_TITLES.len());
        let (_, first_area) =
            docks.add_widget_at_edge(DockWidget::new(PANEL_TITLES[0]), InsertPosition::Left);
        let mut second_area: Option<AreaId> = None;
        for (index, title) in PANEL_TITLES.iter().enumerate().take(count).skip(1) {
            let widget = DockWidget::new(*title);
            match index {
                1 => {
                    let (_, area) = docks.add_widget_at_edge(widget, InsertPosition::Right);
                    second_area = Some(area);
                }
                2 => {
                    let _ = docks.add_widget_to_area(widget, first_area);
                }
                3 => {
                    docks.add_widget_at_edge(widget, InsertPosition::Bottom);
                }
                // the rest round-robin as extra tabs
                _ => {
                    let target = if index % 2 == 0 {
                        first_area
                    } else {
                        second_area.unwrap_or(first_area)
                    };
                    let _ = docks.add_widget_to_area(widget, target);
                }
            }
        }
        let position = TabPosition::from(cli.tabs);
        for area in docks.area_ids() {
            let _ = docks.set_tab_position(area, position);
        }
        docks.take_events();

        Self {
            docks,
            status: VecDeque::new(),
        }
    }

    fn handle(&mut self, event: &Event) -> ControlFlow {
        if let Event::Key(key) = event
            && key.kind == KeyEventKind::Press
        {
            let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                || (key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL));
            if quit {
                return ControlFlow::Quit;
            }
        }
        self.docks.handle_event(event);
        for dock_event in self.docks.take_events() {
            self.note(dock_event);
        }
        ControlFlow::Continue
    }

    fn note(&mut self, event: DockEvent) {
        let line = match event {
            DockEvent::TabLayoutChanged(area) => format!("tab layout changed in {area:?}"),
            DockEvent::AreaClosed(area) => format!("{area:?} closed"),
            DockEvent::WidgetDocked { widget, area } => {
                format!("docked {} into {area:?}", self.title_of(widget))
            }
            DockEvent::WidgetFloated { widget, .. } => {
                format!("floated {}", self.title_of(widget))
            }
            DockEvent::WidgetClosed(widget) => format!("closed {widget:?}"),
            DockEvent::DragFeedback { merge_hint } => {
                if !merge_hint {
                    return;
                }
                "drop here to merge as tab".to_string()
            }
            DockEvent::OverflowRequested(area) => {
                // a real host would pop a menu; the demo just selects the
                // first hidden tab
                let Some(widget) = self
                    .docks
                    .area(area)
                    .and_then(|entry| entry.overflow_widgets().first().copied())
                else {
                    return;
                };
                let _ = self.docks.select_widget(widget);
                format!("selected overflowed {}", self.title_of(widget))
            }
        };
        self.status.push_back(line);
        while self.status.len() > 3 {
            self.status.pop_front();
        }
    }

    fn title_of(&self, widget: WidgetId) -> String {
        self.docks
            .widget(widget)
            .map(|w| w.title().to_string())
            .unwrap_or_else(|| format!("{widget:?}"))
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.width == 0 || area.height < 2 {
            return;
        }
        let body = Rect {
            height: area.height - 1,
            ..area
        };
        self.docks.layout(body);

        for id in self.docks.area_ids() {
            let Some(rect) = self.docks.area_rect(id) else {
                continue;
            };
            let content = content_rect(rect, self.docks.area(id), self.docks.style());
            let title = self
                .docks
                .area(id)
                .and_then(|entry| entry.current_widget())
                .map(|widget| self.title_of(widget))
                .unwrap_or_default();
            frame.render_widget(
                Paragraph::new(format!("{title}\n\ndrag a tab to rearrange"))
                    .style(Style::default().fg(Color::Gray)),
                content,
            );
        }

        dock_wm::render::render(frame, &self.docks);

        let status = self
            .status
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join("  |  ");
        let footer = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(format!(" q quit | double-click a tab to float | {status}")).style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Gray)
                    .add_modifier(Modifier::DIM),
            ),
            footer,
        );
    }
}

/// Area rect minus the tab-strip band, where the host draws its content.
fn content_rect(rect: Rect, area: Option<&DockArea>, style: &DockStyle) -> Rect {
    let Some(area) = area else {
        return rect;
    };
    let strip = area.strip_rect(style);
    match area.tab_position() {
        TabPosition::Top => Rect {
            y: rect.y.saturating_add(strip.height),
            height: rect.height.saturating_sub(strip.height),
            ..rect
        },
        TabPosition::Bottom => Rect {
            height: rect.height.saturating_sub(strip.height),
            ..rect
        },
        TabPosition::Left => Rect {
            x: rect.x.saturating_add(strip.width),
            width: rect.width.saturating_sub(strip.width),
            ..rect
        },
        TabPosition::Right => Rect {
            width: rect.width.saturating_sub(strip.width),
            ..rect
        },
    }
}
