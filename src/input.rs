//! Button capability and the gestures the state machine consumes.

use std::str::FromStr;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
}

impl Button {
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Confirm,
        Self::Back,
    ];

    /// Up and Left step backwards through lists.
    pub const fn is_prev(self) -> bool {
        matches!(self, Self::Up | Self::Left)
    }

    /// Down and Right step forwards through lists.
    pub const fn is_next(self) -> bool {
        matches!(self, Self::Down | Self::Right)
    }
}

#[derive(Debug, Error)]
#[error("unknown button: {0}")]
pub struct UnknownButton(String);

impl FromStr for Button {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "prev" => Ok(Self::Up),
            "down" | "next" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "confirm" | "ok" | "enter" => Ok(Self::Confirm),
            "back" => Ok(Self::Back),
            other => Err(UnknownButton(other.to_string())),
        }
    }
}

/// Polled button state, as exposed by the debouncing layer.
pub trait InputSource {
    /// `button` went up since the previous poll.
    fn was_released(&self, button: Button) -> bool;

    fn is_pressed(&self, button: Button) -> bool;

    /// Duration of the current press, or of the press that just ended.
    fn held_time(&self) -> Duration;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A press ended after `held`.
    Released { button: Button, held: Duration },
    /// `button` is still down and has been for `held`.
    Held { button: Button, held: Duration },
    /// The contextual settings gesture.
    Settings,
}

/// Turns polled button state into [`InputEvent`]s.
///
/// Holding Confirm for `settings_hold` produces [`InputEvent::Settings`] when
/// the current mode takes the gesture; the release of that press is then
/// swallowed so it does not leak into the mode the gesture switched to. In
/// other modes a long Confirm is an ordinary press.
#[derive(Debug)]
pub struct InputMapper {
    settings_hold: Duration,
    latched: Option<Button>,
}

impl InputMapper {
    pub fn new(settings_hold: Duration) -> Self {
        Self {
            settings_hold,
            latched: None,
        }
    }

    pub fn map(&mut self, input: &dyn InputSource, settings_enabled: bool) -> Option<InputEvent> {
        let held = input.held_time();

        if let Some(button) = Button::ALL.into_iter().find(|b| input.was_released(*b)) {
            if self.latched.take() == Some(button) {
                return None;
            }
            return Some(InputEvent::Released { button, held });
        }

        let button = Button::ALL.into_iter().find(|b| input.is_pressed(*b))?;
        if settings_enabled
            && button == Button::Confirm
            && held >= self.settings_hold
            && self.latched.is_none()
        {
            self.latched = Some(button);
            return Some(InputEvent::Settings);
        }
        Some(InputEvent::Held { button, held })
    }
}

/// One simulated press: the button and how long it was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub button: Button,
    pub held: Duration,
}

impl Press {
    pub const fn tap(button: Button) -> Self {
        Self {
            button,
            held: Duration::from_millis(50),
        }
    }

    pub const fn hold(button: Button, held: Duration) -> Self {
        Self { button, held }
    }
}

#[derive(Debug, Error)]
pub enum ParsePressError {
    #[error(transparent)]
    Button(#[from] UnknownButton),
    #[error("invalid hold duration: {0}")]
    Duration(String),
    #[error("expected `<button>` or `hold <button> <millis>`")]
    Syntax,
}

impl FromStr for Press {
    type Err = ParsePressError;

    /// `next` is a tap; `hold next 800` holds for 800ms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            [button] => Ok(Self::tap(button.parse()?)),
            ["hold", button, millis] => {
                let millis: u64 = millis
                    .parse()
                    .map_err(|_| ParsePressError::Duration((*millis).to_string()))?;
                Ok(Self::hold(button.parse()?, Duration::from_millis(millis)))
            }
            _ => Err(ParsePressError::Syntax),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Idle,
    Holding(Press),
    Released(Press),
}

/// Input source fed with whole presses over a channel. Each press spans two
/// polls: first reported held, then released.
#[derive(Debug)]
pub struct ScriptedInput {
    rx: Receiver<Press>,
    frame: Frame,
    closed: bool,
}

impl ScriptedInput {
    pub fn new(rx: Receiver<Press>) -> Self {
        Self {
            rx,
            frame: Frame::Idle,
            closed: false,
        }
    }

    /// Move to the next poll frame.
    pub fn advance(&mut self) {
        self.frame = match self.frame {
            Frame::Holding(press) => Frame::Released(press),
            Frame::Idle | Frame::Released(_) => match self.rx.try_recv() {
                Ok(press) => Frame::Holding(press),
                Err(TryRecvError::Empty) => Frame::Idle,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    Frame::Idle
                }
            },
        };
    }

    /// Every press has been delivered and the sender is gone.
    pub fn is_exhausted(&self) -> bool {
        self.closed && self.frame == Frame::Idle
    }
}

impl InputSource for ScriptedInput {
    fn was_released(&self, button: Button) -> bool {
        matches!(self.frame, Frame::Released(p) if p.button == button)
    }

    fn is_pressed(&self, button: Button) -> bool {
        matches!(self.frame, Frame::Holding(p) if p.button == button)
    }

    fn held_time(&self) -> Duration {
        match self.frame {
            Frame::Idle => Duration::ZERO,
            Frame::Holding(p) | Frame::Released(p) => p.held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn events(presses: &[Press], settings_hold: Duration) -> Vec<InputEvent> {
        events_with(presses, settings_hold, true)
    }

    fn events_with(presses: &[Press], settings_hold: Duration, settings_enabled: bool) -> Vec<InputEvent> {
        let (tx, rx) = unbounded();
        for p in presses {
            tx.send(*p).unwrap();
        }
        let mut input = ScriptedInput::new(rx);
        let mut mapper = InputMapper::new(settings_hold);
        let mut out = Vec::new();
        for _ in 0..presses.len() * 2 + 2 {
            input.advance();
            out.extend(mapper.map(&input, settings_enabled));
        }
        out
    }

    #[test]
    fn tap_reports_hold_then_release() {
        let out = events(&[Press::tap(Button::Down)], Duration::from_secs(1));
        assert_eq!(
            out,
            vec![
                InputEvent::Held {
                    button: Button::Down,
                    held: Duration::from_millis(50)
                },
                InputEvent::Released {
                    button: Button::Down,
                    held: Duration::from_millis(50)
                },
            ]
        );
    }

    #[test]
    fn long_confirm_becomes_settings_and_release_is_swallowed() {
        let out = events(
            &[
                Press::hold(Button::Confirm, Duration::from_millis(1200)),
                Press::tap(Button::Confirm),
            ],
            Duration::from_secs(1),
        );
        assert_eq!(out[0], InputEvent::Settings);
        assert!(matches!(out[1], InputEvent::Held { button: Button::Confirm, .. }));
        assert!(matches!(
            out[2],
            InputEvent::Released {
                button: Button::Confirm,
                ..
            }
        ));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn long_confirm_is_a_plain_press_where_settings_is_off() {
        let long = Duration::from_millis(1200);
        let out = events_with(&[Press::hold(Button::Confirm, long)], Duration::from_secs(1), false);
        assert_eq!(
            out,
            vec![
                InputEvent::Held {
                    button: Button::Confirm,
                    held: long
                },
                InputEvent::Released {
                    button: Button::Confirm,
                    held: long
                },
            ]
        );
    }

    #[test]
    fn long_back_is_not_a_settings_gesture() {
        let out = events(
            &[Press::hold(Button::Back, Duration::from_millis(1500))],
            Duration::from_secs(1),
        );
        assert_eq!(
            out.last(),
            Some(&InputEvent::Released {
                button: Button::Back,
                held: Duration::from_millis(1500)
            })
        );
    }

    #[test]
    fn exhausted_only_after_queued_presses_are_delivered() {
        let (tx, rx) = unbounded();
        tx.send(Press::tap(Button::Down)).unwrap();
        tx.send(Press::tap(Button::Confirm)).unwrap();
        drop(tx);

        let mut input = ScriptedInput::new(rx);
        let mut released = Vec::new();
        while !input.is_exhausted() {
            input.advance();
            released.extend(Button::ALL.into_iter().filter(|b| input.was_released(*b)));
        }
        assert_eq!(released, vec![Button::Down, Button::Confirm]);
    }

    #[test]
    fn parses_button_names() {
        assert_eq!("next".parse::<Button>().unwrap(), Button::Down);
        assert_eq!(" Confirm ".parse::<Button>().unwrap(), Button::Confirm);
        assert!("jump".parse::<Button>().is_err());
    }

    #[test]
    fn parses_presses() {
        assert_eq!("back".parse::<Press>().unwrap(), Press::tap(Button::Back));
        assert_eq!(
            "hold right 800".parse::<Press>().unwrap(),
            Press::hold(Button::Right, Duration::from_millis(800))
        );
        assert!(matches!(
            "hold right soon".parse::<Press>(),
            Err(ParsePressError::Duration(_))
        ));
        assert!(matches!("".parse::<Press>(), Err(ParsePressError::Syntax)));
    }

    #[test]
    fn prev_and_next_groups() {
        assert!(Button::Up.is_prev() && Button::Left.is_prev());
        assert!(Button::Down.is_next() && Button::Right.is_next());
        assert!(!Button::Confirm.is_prev() && !Button::Back.is_next());
    }
}
