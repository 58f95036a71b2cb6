use std::io;
use std::time::Duration;

use crossterm::event::Event;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Source of input events. The trait exists so the loop can be driven by a
/// scripted sequence in tests instead of a live terminal.
pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }
}

/// Live terminal input via crossterm.
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl InputDriver for ConsoleInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        crossterm::event::read()
    }
}

/// The centralized event loop that drives the UI thread: the only place
/// that polls or reads the input driver. Events are dispatched to the
/// handler in arrival order, one at a time, so the dock state machine
/// never sees two pointer events concurrently.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Run until the handler asks to quit. The handler is called with
    /// `None` once per poll interval (the draw tick) and with
    /// `Some(event)` for every input event.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                return Ok(());
            }
            if !self.driver.poll(self.poll_interval)? {
                continue;
            }
            // Drain the queue before the next draw tick: processing a
            // single event per poll would fall behind the input stream
            // during mouse-drag bursts.
            loop {
                let event = self.driver.read()?;
                if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                    return Ok(());
                }
                if !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted {
        events: VecDeque<Event>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn drains_queued_events_between_ticks() {
        let driver = Scripted {
            events: [key(KeyCode::Char('a')), key(KeyCode::Char('b')), key(KeyCode::Char('q'))]
                .into_iter()
                .collect(),
        };
        let mut seen = Vec::new();
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(1));
        event_loop
            .run(|_, event| {
                if let Some(Event::Key(key)) = event {
                    seen.push(key.code);
                    if key.code == KeyCode::Char('q') {
                        return Ok(ControlFlow::Quit);
                    }
                }
                Ok(ControlFlow::Continue)
            })
            .unwrap();
        assert_eq!(
            seen,
            vec![KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Char('q')]
        );
    }

    #[test]
    fn tick_handler_can_quit_without_events() {
        let driver = Scripted {
            events: VecDeque::new(),
        };
        let mut ticks = 0;
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(1));
        event_loop
            .run(|_, event| {
                assert!(event.is_none());
                ticks += 1;
                Ok(if ticks == 3 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(ticks, 3);
    }
}
