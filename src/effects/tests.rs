use std::{
    cell::RefCell,
    io,
    rc::Rc,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use super::*;
use crate::{
    clock::ManualClock,
    methods::{MethodError, Writer},
    models::{LightPatch, MAX_BRIGHTNESS},
    registry::Lights,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Light { on: bool, brightness: u8 },
    Sleep(u64),
    Notice(String),
}

#[derive(Default)]
struct JournalData {
    start: Option<Instant>,
    elapsed: Duration,
    events: Vec<Event>,
    sleeps: usize,
    writes: usize,
    failing_writes: Vec<usize>,
    abort_after: Option<(usize, AbortSignal)>,
}

/// Records renders of light 1 and sleeps in a single ordered journal
#[derive(Default, Clone)]
struct Journal(Rc<RefCell<JournalData>>);

impl Journal {
    fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    fn lights(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, Event::Light { .. }))
            .collect()
    }

    fn abort_after(&self, sleeps: usize, signal: AbortSignal) {
        self.0.borrow_mut().abort_after = Some((sleeps, signal));
    }

    /// Make the given renders fail, counting from 1
    fn fail_writes(&self, writes: &[usize]) {
        self.0.borrow_mut().failing_writes = writes.to_vec();
    }
}

impl Clock for Journal {
    fn now(&self) -> Instant {
        let mut data = self.0.borrow_mut();
        let start = *data.start.get_or_insert_with(Instant::now);
        start + data.elapsed
    }

    fn sleep(&self, duration: Duration) {
        let mut data = self.0.borrow_mut();
        data.elapsed += duration;
        data.events.push(Event::Sleep(duration.as_millis() as u64));
        data.sleeps += 1;

        if let Some((after, signal)) = &data.abort_after {
            if data.sleeps >= *after {
                signal.trigger();
            }
        }
    }
}

impl Method for Journal {
    fn write(&mut self, lights: &Lights) -> Result<(), MethodError> {
        let light = lights.get(LightId(1)).expect("missing light 1");
        let mut data = self.0.borrow_mut();
        data.events.push(Event::Light {
            on: light.on,
            brightness: light.brightness,
        });

        data.writes += 1;
        if data.failing_writes.contains(&data.writes) {
            let message = format!("render {} failed", data.writes);
            return Err(io::Error::new(io::ErrorKind::Other, message).into());
        }

        Ok(())
    }

    fn notice(&mut self, line: &str) -> Result<(), MethodError> {
        self.0.borrow_mut().events.push(Event::Notice(line.to_owned()));
        Ok(())
    }
}

fn accept(_address: &str) -> io::Result<()> {
    Ok(())
}

fn setup() -> (Journal, Bridge<Journal>, Effects<Journal>) {
    let journal = Journal::default();
    let mut bridge = Bridge::new("127.0.0.1", journal.clone());
    bridge.connect(accept).unwrap();

    let effects = Effects::new(journal.clone(), &Config::default());

    // Forget the connection notice
    journal.0.borrow_mut().events.clear();

    (journal, bridge, effects)
}

const ON: Event = Event::Light {
    on: true,
    brightness: MAX_BRIGHTNESS,
};
const OFF: Event = Event::Light {
    on: false,
    brightness: 0,
};

#[test]
fn test_morse_pattern_table() {
    assert_eq!(morse_pattern('A'), Some(".-"));
    assert_eq!(morse_pattern('Q'), Some("--.-"));
    assert_eq!(morse_pattern(' '), Some(" "));
    assert_eq!(morse_pattern('a'), None);
    assert_eq!(morse_pattern('1'), None);
    assert!(('A'..='Z').all(|c| morse_pattern(c).is_some()));
}

#[test]
fn test_morse_single_letter() {
    let (journal, mut bridge, effects) = setup();

    let outcome = effects.morse(&mut bridge, LightId(1), "A").unwrap();

    assert_eq!(outcome, EffectOutcome::Completed);
    assert_eq!(
        journal.events(),
        vec![
            Event::Notice("Morse 'A': .-".to_owned()),
            ON,
            Event::Sleep(200),
            OFF,
            Event::Sleep(200),
            ON,
            Event::Sleep(600),
            OFF,
            Event::Sleep(200),
            Event::Sleep(600),
        ]
    );
}

#[test]
fn test_morse_skips_unmapped_characters() {
    let (journal, mut bridge, effects) = setup();
    effects.morse(&mut bridge, LightId(1), "a1!?").unwrap();
    let lowercase = journal.events();

    let (journal, mut bridge, effects) = setup();
    effects.morse(&mut bridge, LightId(1), "A").unwrap();

    assert_eq!(lowercase, journal.events());
}

#[test]
fn test_morse_space_is_character_gap_only() {
    let (journal, mut bridge, effects) = setup();

    effects.morse(&mut bridge, LightId(1), "E T").unwrap();

    assert_eq!(
        journal.events(),
        vec![
            Event::Notice("Morse 'E': .".to_owned()),
            ON,
            Event::Sleep(200),
            OFF,
            Event::Sleep(200),
            Event::Sleep(600),
            Event::Notice("Morse ' ':  ".to_owned()),
            Event::Sleep(600),
            Event::Notice("Morse 'T': -".to_owned()),
            ON,
            Event::Sleep(600),
            OFF,
            Event::Sleep(200),
            Event::Sleep(600),
        ]
    );
}

#[test]
fn test_morse_total_duration() {
    let journal = Journal::default();
    let mut bridge = Bridge::new("127.0.0.1", journal.clone());
    bridge.connect(accept).unwrap();
    let effects = Effects::new(ManualClock::new(), &Config::default());

    // S: 3 dots, O: 3 dashes
    effects.morse(&mut bridge, LightId(2), "sos").unwrap();

    let dots = 6 * (200 + 200);
    let dashes = 3 * (600 + 200);
    let chars = 3 * 600;
    assert_eq!(
        effects.clock().elapsed(),
        Duration::from_millis(dots + dashes + chars)
    );
    assert!(!bridge.light(LightId(2)).unwrap().on);
}

#[test]
fn test_morse_requires_connection() {
    let journal = Journal::default();
    let mut bridge = Bridge::new("127.0.0.1", journal.clone());
    let effects = Effects::new(journal.clone(), &Config::default());

    let result = effects.morse(&mut bridge, LightId(1), "   ");

    assert!(matches!(result, Err(BridgeError::NotConnected)));
    assert!(journal.events().is_empty());
}

#[test]
fn test_morse_unknown_light() {
    let (journal, mut bridge, effects) = setup();

    let result = effects.morse(&mut bridge, LightId(7), "A");

    assert!(matches!(result, Err(BridgeError::UnknownLight(LightId(7)))));
    assert!(journal.events().is_empty());
}

#[test]
fn test_morse_abort() {
    let (journal, mut bridge, effects) = setup();
    journal.abort_after(2, effects.abort_signal());

    let outcome = effects.morse(&mut bridge, LightId(1), "ET").unwrap();

    assert_eq!(outcome, EffectOutcome::Aborted);
    assert_eq!(journal.lights(), vec![ON, OFF]);
    assert!(!bridge.light(LightId(1)).unwrap().on);
    assert!(!effects.abort_signal().is_running());
    assert!(!effects.abort_signal().is_triggered());
}

#[test]
fn test_disco_zero_duration() {
    let (journal, mut bridge, effects) = setup();
    bridge
        .set_light(LightId(1), LightPatch::new().on(true).brightness(180))
        .unwrap();
    journal.0.borrow_mut().events.clear();

    let mut rng = fastrand::Rng::with_seed(7);
    let outcome = effects
        .disco(&mut bridge, LightId(1), Duration::ZERO, &mut rng)
        .unwrap();

    assert_eq!(outcome, EffectOutcome::Completed);
    assert_eq!(
        journal.events(),
        vec![
            Event::Notice("🪩 Starting disco mode for 0 seconds!".to_owned()),
            OFF
        ]
    );
}

#[test]
fn test_disco_ticks_once_per_second() {
    let mut bridge = Bridge::new("127.0.0.1", Writer::new(Vec::new(), false));
    bridge.connect(accept).unwrap();
    let effects = Effects::new(ManualClock::new(), &Config::default());
    let mut rng = fastrand::Rng::with_seed(42);

    let outcome = effects
        .disco(&mut bridge, LightId(2), Duration::from_secs(3), &mut rng)
        .unwrap();

    assert_eq!(outcome, EffectOutcome::Completed);
    assert_eq!(effects.clock().sleeps(), vec![Duration::from_secs(1); 3]);

    let light = bridge.light(LightId(2)).unwrap();
    assert!(!light.on);
    assert_eq!(light.brightness, 0);
    assert!((150..=254).contains(&light.saturation));
}

#[test]
fn test_disco_draws_in_range() {
    let (journal, mut bridge, effects) = setup();
    let mut rng = fastrand::Rng::with_seed(1234);

    effects
        .disco(&mut bridge, LightId(1), Duration::from_secs(20), &mut rng)
        .unwrap();

    let lights = journal.lights();
    assert_eq!(lights.len(), 21);
    assert_eq!(lights.last(), Some(&OFF));

    for event in &lights[..20] {
        match event {
            Event::Light { on, brightness } => {
                assert!(on);
                assert!((50..=254).contains(brightness));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}

#[test]
fn test_disco_is_reproducible_with_seed() {
    let run = |seed| {
        let (journal, mut bridge, effects) = setup();
        let mut rng = fastrand::Rng::with_seed(seed);
        effects
            .disco(&mut bridge, LightId(1), Duration::from_secs(5), &mut rng)
            .unwrap();
        journal.events()
    };

    assert_eq!(run(99), run(99));
}

#[test]
fn test_disco_abort_turns_light_off() {
    let (journal, mut bridge, effects) = setup();
    journal.abort_after(2, effects.abort_signal());
    let mut rng = fastrand::Rng::with_seed(3);

    let outcome = effects
        .disco(&mut bridge, LightId(1), Duration::from_secs(10), &mut rng)
        .unwrap();

    assert_eq!(outcome, EffectOutcome::Aborted);

    let lights = journal.lights();
    assert_eq!(lights.len(), 3);
    assert_eq!(lights.last(), Some(&OFF));
    assert!(!bridge.light(LightId(1)).unwrap().on);
}

#[test]
fn test_disco_unbounded_duration_runs_until_aborted() {
    let (journal, mut bridge, effects) = setup();
    journal.abort_after(3, effects.abort_signal());
    let mut rng = fastrand::Rng::with_seed(5);

    let outcome = effects
        .disco(
            &mut bridge,
            LightId(1),
            Duration::from_secs(u64::MAX),
            &mut rng,
        )
        .unwrap();

    assert_eq!(outcome, EffectOutcome::Aborted);

    let lights = journal.lights();
    assert_eq!(lights.len(), 4);
    assert_eq!(lights.last(), Some(&OFF));
    assert!(!bridge.light(LightId(1)).unwrap().on);
}

#[test]
fn test_disco_failure_turns_light_off() {
    let (journal, mut bridge, effects) = setup();
    journal.fail_writes(&[2]);
    let mut rng = fastrand::Rng::with_seed(11);

    let result = effects.disco(&mut bridge, LightId(1), Duration::from_secs(5), &mut rng);

    match result {
        Err(BridgeError::Method(error)) => assert!(error.to_string().contains("render 2")),
        other => panic!("unexpected result: {:?}", other),
    }

    let lights = journal.lights();
    assert_eq!(lights.len(), 3);
    assert_eq!(lights.last(), Some(&OFF));
    assert!(!bridge.light(LightId(1)).unwrap().on);
    assert!(!effects.abort_signal().is_running());
}

#[derive(Default, Clone)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_disco_failed_off_keeps_first_error() {
    let (journal, mut bridge, effects) = setup();
    journal.fail_writes(&[2, 3]);
    let mut rng = fastrand::Rng::with_seed(11);

    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        effects.disco(&mut bridge, LightId(1), Duration::from_secs(5), &mut rng)
    });

    match result {
        Err(BridgeError::Method(error)) => assert!(error.to_string().contains("render 2")),
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(journal.lights().last(), Some(&OFF));

    let logs = logs.contents();
    assert!(logs.contains("WARN"));
    assert!(logs.contains("failed to turn light off"));
    assert!(logs.contains("render 3 failed"));
}

#[test]
fn test_disco_requires_connection() {
    let journal = Journal::default();
    let mut bridge = Bridge::new("127.0.0.1", journal.clone());
    let effects = Effects::new(journal.clone(), &Config::default());
    let mut rng = fastrand::Rng::with_seed(0);

    let result = effects.disco(&mut bridge, LightId(1), Duration::ZERO, &mut rng);

    assert!(matches!(result, Err(BridgeError::NotConnected)));
    assert!(journal.events().is_empty());
}

#[test]
fn test_abort_signal_without_effect() {
    let signal = AbortSignal::new();

    assert!(!signal.trigger());
    assert!(!signal.is_triggered());
}
