use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
};

use dock_wm::manager::DockManager;
use dock_wm::style::DockStyle;
use dock_wm::tree::InsertPosition;
use dock_wm::widget::DockWidget;

#[derive(Parser, Debug)]
#[command(
    name = "dock-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Synthetic drag-protocol benchmark for the docking engine"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 10.0
    )]
    duration_seconds: f64,

    /// Target frames per second. Used to pace rendering so comparisons are repeatable.
    #[arg(short = 'f', long = "fps", value_name = "FPS", default_value_t = 60.0)]
    target_fps: f64,

    /// Pointer moves fed through the drag session per synthetic drag.
    #[arg(short = 'm', long = "moves", value_name = "COUNT", default_value_t = 48)]
    moves_per_drag: u32,
}

impl BenchCli {
    fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_seconds)
    }

    fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps)
    }
}

struct BenchConfig {
    duration: Duration,
    target_fps: f64,
    frame_budget: Duration,
    moves_per_drag: u32,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.5..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.5 and 600 seconds".to_string());
        }
        if !(1.0..=240.0).contains(&cli.target_fps) {
            return Err("fps must be between 1 and 240".to_string());
        }
        if !(4..=10_000).contains(&cli.moves_per_drag) {
            return Err("moves must be between 4 and 10000".to_string());
        }
        Ok(Self {
            duration: cli.duration(),
            target_fps: cli.target_fps,
            frame_budget: cli.frame_budget(),
            moves_per_drag: cli.moves_per_drag,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let bench_result = run_benchmark(&mut terminal, &config);

    terminal.show_cursor()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;

    let stats = bench_result?;
    println!("{}", stats.final_report(&config));

    Ok(())
}

type BenchTerminal = Terminal<CrosstermBackend<Stdout>>;

fn seed_layout(docks: &mut DockManager, bounds: Rect) {
    docks.layout(bounds);
    let (_, left) = docks.add_widget_at_edge(DockWidget::new("alpha"), InsertPosition::Left);
    for title in ["bravo", "charlie"] {
        let _ = docks.add_widget_to_area(DockWidget::new(title), left);
    }
    let (_, right) = docks.add_widget_at_edge(DockWidget::new("delta"), InsertPosition::Right);
    let _ = docks.add_widget_to_area(DockWidget::new("echo"), right);
    docks.add_widget_at_edge(DockWidget::new("foxtrot"), InsertPosition::Bottom);
    docks.take_events();
}

fn run_benchmark(terminal: &mut BenchTerminal, config: &BenchConfig) -> io::Result<BenchStats> {
    let mut stats = BenchStats::new();
    let mut docks = DockManager::new(DockStyle::compact());
    let size = terminal.size()?;
    let bounds = Rect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    seed_layout(&mut docks, bounds);
    let mut script = DragScript::new(config.moves_per_drag);
    let mut exit_reason = ExitReason::Completed;

    loop {
        let frame_start = Instant::now();

        for mouse in script.advance(&docks) {
            docks.handle_event(&Event::Mouse(mouse));
            stats.events_fed += 1;
        }
        stats.drag_cycles = script.completed_cycles;

        terminal.draw(|frame| draw_frame(frame, &mut docks, &stats, config))?;
        let draw_time = frame_start.elapsed();
        stats.record_frame(draw_time);

        if stats.elapsed() >= config.duration {
            break;
        }

        if poll_for_exit(config.frame_budget.saturating_sub(draw_time))? {
            exit_reason = ExitReason::UserAbort;
            break;
        }
    }

    stats.exit_reason = exit_reason;
    stats.mark_completed();
    Ok(stats)
}

fn draw_frame(frame: &mut Frame, docks: &mut DockManager, stats: &BenchStats, config: &BenchConfig) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }
    docks.layout(area);
    docks.take_events();
    dock_wm::render::render(frame, docks);

    let lines = overlay_lines(stats, config);
    let width = lines.iter().map(|line| line.len() as u16).max().unwrap_or(0);
    let panel = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: width.min(area.width.saturating_sub(2)),
        height: (lines.len() as u16).min(area.height.saturating_sub(2)),
    };
    frame.render_widget(
        Paragraph::new(lines.join("\n")).style(Style::default().fg(Color::White).bg(Color::Black)),
        panel,
    );
}

fn overlay_lines(stats: &BenchStats, config: &BenchConfig) -> Vec<String> {
    let elapsed = stats.elapsed().as_secs_f64();
    let fps = if elapsed > 0.0 {
        stats.frame_count as f64 / elapsed
    } else {
        0.0
    };
    let events_per_sec = if elapsed > 0.0 {
        stats.events_fed as f64 / elapsed
    } else {
        0.0
    };
    vec![
        "== Dock Bench ==".to_string(),
        format!(
            "elapsed {:>5.1}/{:>5.1}s",
            elapsed,
            config.duration.as_secs_f64()
        ),
        format!(
            "frames {:>7} | fps {:>5.1} / target {:>5.1}",
            stats.frame_count, fps, config.target_fps
        ),
        format!(
            "drag events {:>8} | {:>7.0}/s | cycles {}",
            stats.events_fed, events_per_sec, stats.drag_cycles
        ),
        format!(
            "frame ms avg {:>6.2} | best {:>5.2} | worst {:>5.2}",
            stats.average_frame_ms(),
            stats.fastest_frame_ms(),
            stats.slowest_frame_ms()
        ),
        "press q / esc / ctrl+c to stop".to_string(),
    ]
}

/// Scripted pointer: repeatedly picks up the first tab of the first area,
/// sweeps an elliptical path across the container (crossing both overlay
/// modes) and releases back on the originating tab so the layout is left
/// unchanged between cycles.
struct DragScript {
    moves_per_drag: u32,
    step: u32,
    origin: Option<(u16, u16)>,
    completed_cycles: u64,
}

impl DragScript {
    fn new(moves_per_drag: u32) -> Self {
        Self {
            moves_per_drag,
            step: 0,
            origin: None,
            completed_cycles: 0,
        }
    }

    /// Alternate between the first two tabs so back-to-back cycles never
    /// register as a double press (which would float the tab).
    fn tab_center(&self, docks: &DockManager) -> Option<(u16, u16)> {
        let area = docks.area_ids().into_iter().next()?;
        let layout = docks.area(area)?.tab_layout();
        let slot = (self.completed_cycles % 2) as usize;
        let rect = layout
            .slots
            .get(slot)
            .and_then(|s| s.rect)
            .or_else(|| layout.slots.first().and_then(|s| s.rect))?;
        Some((rect.x + rect.width / 2, rect.y + rect.height / 2))
    }

    fn advance(&mut self, docks: &DockManager) -> Vec<MouseEvent> {
        let Some(origin) = self.origin.or_else(|| self.tab_center(docks)) else {
            return Vec::new();
        };
        let bounds = docks.bounds();
        if bounds.width < 8 || bounds.height < 4 {
            return Vec::new();
        }

        let total = self.moves_per_drag + 2;
        let step = self.step;
        self.step = (self.step + 1) % total;

        if step == 0 {
            self.origin = Some(origin);
            return vec![mouse(MouseEventKind::Down(MouseButton::Left), origin)];
        }
        if step == total - 1 {
            self.origin = None;
            self.completed_cycles += 1;
            return vec![mouse(MouseEventKind::Up(MouseButton::Left), origin)];
        }

        // elliptical sweep around the container center; the first two
        // steps stay near the origin so the drag threshold is crossed
        // inside the tolerance box
        let progress = step as f64 / self.moves_per_drag as f64;
        if step <= 2 {
            let point = (origin.0 + step as u16 + 1, origin.1);
            return vec![mouse(MouseEventKind::Drag(MouseButton::Left), point)];
        }
        let angle = progress * std::f64::consts::TAU;
        let cx = bounds.x as f64 + bounds.width as f64 / 2.0;
        let cy = bounds.y as f64 + bounds.height as f64 / 2.0;
        let x = cx + (bounds.width as f64 / 2.5) * angle.cos();
        let y = cy + (bounds.height as f64 / 2.5) * (2.0 * angle).sin();
        let point = (
            x.round().clamp(0.0, (bounds.width - 1) as f64) as u16,
            y.round().clamp(0.0, (bounds.height - 1) as f64) as u16,
        );
        vec![mouse(MouseEventKind::Drag(MouseButton::Left), point)]
    }
}

fn mouse(kind: MouseEventKind, point: (u16, u16)) -> MouseEvent {
    MouseEvent {
        kind,
        column: point.0,
        row: point.1,
        modifiers: KeyModifiers::empty(),
    }
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    frame_count: u64,
    events_fed: u64,
    drag_cycles: u64,
    total_draw_time: Duration,
    fastest_frame: Duration,
    slowest_frame: Duration,
    exit_reason: ExitReason,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            frame_count: 0,
            events_fed: 0,
            drag_cycles: 0,
            total_draw_time: Duration::ZERO,
            fastest_frame: Duration::MAX,
            slowest_frame: Duration::ZERO,
            exit_reason: ExitReason::Completed,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_frame(&mut self, draw_time: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.total_draw_time += draw_time;
        if draw_time < self.fastest_frame {
            self.fastest_frame = draw_time;
        }
        if draw_time > self.slowest_frame {
            self.slowest_frame = draw_time;
        }
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (self.total_draw_time.as_secs_f64() / self.frame_count as f64) * 1_000.0
    }

    fn fastest_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.fastest_frame.as_secs_f64() * 1_000.0
    }

    fn slowest_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.slowest_frame.as_secs_f64() * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let fps_avg = if elapsed > 0.0 {
            self.frame_count as f64 / elapsed
        } else {
            0.0
        };
        let events_per_sec = if elapsed > 0.0 {
            self.events_fed as f64 / elapsed
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            Dock bench {status}.
            Duration: {elapsed:.2}s (target {target:.2}s)
            Frames: {frames} | Avg FPS: {fps:.1} (target {target_fps:.1})
            Avg frame: {avg:.2} ms | Best: {best:.2} ms | Worst: {worst:.2} ms
            Drag events: {events} total (~{events_per_sec:.0}/s) | Drag cycles: {cycles}
            "#,
            status = self.exit_reason.describe(),
            elapsed = elapsed,
            target = config.duration.as_secs_f64(),
            frames = self.frame_count,
            fps = fps_avg,
            target_fps = config.target_fps,
            avg = self.average_frame_ms(),
            best = self.fastest_frame_ms(),
            worst = self.slowest_frame_ms(),
            events = self.events_fed,
            events_per_sec = events_per_sec,
            cycles = self.drag_cycles,
        )
    }
}

#[derive(Copy, Clone)]
enum ExitReason {
    Completed,
    UserAbort,
}

impl ExitReason {
    fn describe(self) -> &'static str {
        match self {
            ExitReason::Completed => "completed full duration",
            ExitReason::UserAbort => "stopped by user",
        }
    }
}

fn poll_for_exit(wait: Duration) -> io::Result<bool> {
    if !event::poll(wait)? {
        return Ok(false);
    }
    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if matches!(
                    key.code,
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
                ) {
                    return Ok(true);
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(true);
                }
            }
            _ => {}
        }
        if !event::poll(Duration::ZERO)? {
            break;
        }
    }
    Ok(false)
}
